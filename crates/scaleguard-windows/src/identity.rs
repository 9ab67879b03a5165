//! Machine identity from the SMBIOS UUID, read through WMI.

use scaleguard_core::MachineIdentity;
use windows::Win32::System::Com::{
    CLSCTX_INPROC_SERVER, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx,
    CoInitializeSecurity, CoUninitialize, EOAC_NONE, RPC_C_AUTHN_LEVEL_DEFAULT,
    RPC_C_IMP_LEVEL_IMPERSONATE,
};
use windows::Win32::System::Wmi::{
    IWbemClassObject, IWbemLocator, WBEM_FLAG_FORWARD_ONLY, WBEM_FLAG_RETURN_IMMEDIATELY,
    WBEM_INFINITE, WbemLocator,
};
use windows::core::{BSTR, HSTRING, VARIANT};

const UUID_QUERY: &str = "SELECT UUID FROM Win32_ComputerSystemProduct";

/// `Win32_ComputerSystemProduct.UUID`, falling back to `MachineGuid`.
pub struct WmiIdentity;

impl MachineIdentity for WmiIdentity {
    fn machine_id(&self) -> Option<String> {
        match product_uuid() {
            Ok(Some(uuid)) => return Some(uuid),
            Ok(None) => tracing::debug!("WMI returned no product UUID"),
            Err(e) => tracing::warn!("WMI product UUID query failed: {e}"),
        }
        match crate::registry::machine_guid() {
            Ok(guid) => guid,
            Err(e) => {
                tracing::warn!("could not read MachineGuid: {e}");
                None
            }
        }
    }
}

/// Keeps COM initialized for the duration of a query.
struct ComApartment {
    owned: bool,
}

impl ComApartment {
    fn enter() -> Self {
        // SAFETY: CoInitializeEx may be called repeatedly; S_FALSE still
        // needs a matching CoUninitialize, RPC_E_CHANGED_MODE does not.
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        Self { owned: hr.is_ok() }
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owned {
            unsafe { CoUninitialize() };
        }
    }
}

fn product_uuid() -> windows::core::Result<Option<String>> {
    let _com = ComApartment::enter();

    // SAFETY: plain COM calls on interfaces created here; every out
    // pointer references a local that lives across the call.
    unsafe {
        // Fails with RPC_E_TOO_LATE if the process already set security.
        let _ = CoInitializeSecurity(
            None,
            -1,
            None,
            None,
            RPC_C_AUTHN_LEVEL_DEFAULT,
            RPC_C_IMP_LEVEL_IMPERSONATE,
            None,
            EOAC_NONE,
            None,
        );

        let locator: IWbemLocator = CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER)?;
        let services = locator.ConnectServer(
            &BSTR::from(r"ROOT\CIMV2"),
            &BSTR::new(),
            &BSTR::new(),
            &BSTR::new(),
            0,
            &BSTR::new(),
            None,
        )?;
        let rows = services.ExecQuery(
            &BSTR::from("WQL"),
            &BSTR::from(UUID_QUERY),
            WBEM_FLAG_FORWARD_ONLY | WBEM_FLAG_RETURN_IMMEDIATELY,
            None,
        )?;

        let mut row: [Option<IWbemClassObject>; 1] = Default::default();
        let mut returned = 0u32;
        rows.Next(WBEM_INFINITE.0, &mut row, &mut returned).ok()?;
        let Some(product) = row[0].take() else {
            return Ok(None);
        };

        let mut value = VARIANT::default();
        product.Get(&HSTRING::from("UUID"), 0, &mut value, None, None)?;
        let uuid = BSTR::try_from(&value)?.to_string();
        Ok((!uuid.is_empty()).then_some(uuid))
    }
}
