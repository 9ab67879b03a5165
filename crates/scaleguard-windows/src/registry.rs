//! Per-monitor scaling in the HKCU `PerMonitorSettings` registry key.
//!
//! The shell keeps one subkey per monitor under
//! `HKEY_CURRENT_USER\Control Panel\Desktop\PerMonitorSettings`, each
//! holding a `DpiValue` DWORD. Subkeys are only read and overwritten,
//! never created. No elevation is required since HKCU is per-user.

use scaleguard_core::{Error, MonitorSettingsStore, Result};
use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS};
use windows::Win32::System::Registry::{
    HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_ENUMERATE_SUB_KEYS, KEY_QUERY_VALUE,
    KEY_SET_VALUE, KEY_WOW64_64KEY, REG_DWORD, REG_SAM_FLAGS, REG_SZ, REG_VALUE_TYPE,
    RegCloseKey, RegEnumKeyExW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
};
use windows::core::{PCWSTR, PWSTR};

use crate::wide::{from_wide, to_wide};

const PER_MONITOR_KEY: &str = r"Control Panel\Desktop\PerMonitorSettings";
const DPI_VALUE: &str = "DpiValue";
const CRYPTOGRAPHY_KEY: &str = r"SOFTWARE\Microsoft\Cryptography";
const MACHINE_GUID: &str = "MachineGuid";

/// Registry key names are limited to 255 characters.
const MAX_KEY_NAME: usize = 256;

/// The current user's `PerMonitorSettings` key.
pub struct PerMonitorSettings;

impl MonitorSettingsStore for PerMonitorSettings {
    fn entries(&self) -> Result<Option<Vec<String>>> {
        let Some(key) = Key::open(HKEY_CURRENT_USER, PER_MONITOR_KEY, KEY_ENUMERATE_SUB_KEYS)?
        else {
            return Ok(None);
        };
        key.subkey_names().map(Some)
    }

    fn read_scaling(&self, entry: &str) -> Result<Option<i32>> {
        let Some(key) = Key::open(HKEY_CURRENT_USER, &entry_path(entry), KEY_QUERY_VALUE)? else {
            return Err(Error::Store(format!("entry {entry} does not exist")));
        };
        key.read_dword(DPI_VALUE)
    }

    fn write_scaling(&self, entry: &str, value: i32) -> Result<()> {
        let Some(key) = Key::open(HKEY_CURRENT_USER, &entry_path(entry), KEY_SET_VALUE)? else {
            return Err(Error::Store(format!("entry {entry} does not exist")));
        };
        key.write_dword(DPI_VALUE, value)
    }
}

/// Reads the OS installation's `MachineGuid`.
///
/// Used when WMI cannot provide the hardware UUID.
pub fn machine_guid() -> Result<Option<String>> {
    let Some(key) = Key::open(
        HKEY_LOCAL_MACHINE,
        CRYPTOGRAPHY_KEY,
        KEY_QUERY_VALUE | KEY_WOW64_64KEY,
    )?
    else {
        return Ok(None);
    };
    key.read_string(MACHINE_GUID)
}

fn entry_path(entry: &str) -> String {
    format!(r"{PER_MONITOR_KEY}\{entry}")
}

/// An open registry key, closed on drop.
struct Key(HKEY);

impl Key {
    /// Opens `path` below `root`. A missing key is `Ok(None)`.
    fn open(root: HKEY, path: &str, access: REG_SAM_FLAGS) -> Result<Option<Self>> {
        let wide_path = to_wide(path);
        let mut key = HKEY::default();
        // SAFETY: RegOpenKeyExW is a standard Win32 registry API. We pass a
        // valid null-terminated path and the handle is closed by Drop.
        let status =
            unsafe { RegOpenKeyExW(root, PCWSTR(wide_path.as_ptr()), None, access, &mut key) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        if status.is_err() {
            return Err(Error::Store(format!("could not open {path}: {status:?}")));
        }
        Ok(Some(Self(key)))
    }

    fn subkey_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for index in 0.. {
            let mut buf = [0u16; MAX_KEY_NAME];
            let mut len = buf.len() as u32;
            // SAFETY: `buf` holds `len` u16s; the API writes at most that
            // many including the terminator and updates `len`.
            let status = unsafe {
                RegEnumKeyExW(
                    self.0,
                    index,
                    Some(PWSTR(buf.as_mut_ptr())),
                    &mut len,
                    None,
                    None,
                    None,
                    None,
                )
            };
            if status == ERROR_NO_MORE_ITEMS {
                break;
            }
            if status != ERROR_SUCCESS {
                return Err(Error::Store(format!("could not enumerate subkeys: {status:?}")));
            }
            names.push(from_wide(&buf[..len as usize]));
        }
        Ok(names)
    }

    fn read_dword(&self, name: &str) -> Result<Option<i32>> {
        let mut data = [0u8; 4];
        let Some(kind) = self.query(name, &mut data)? else {
            return Ok(None);
        };
        if kind != REG_DWORD {
            return Err(Error::Store(format!("{name} is not a DWORD ({kind:?})")));
        }
        Ok(Some(i32::from_ne_bytes(data)))
    }

    fn read_string(&self, name: &str) -> Result<Option<String>> {
        let mut data = [0u8; 512];
        let Some(kind) = self.query(name, &mut data)? else {
            return Ok(None);
        };
        if kind != REG_SZ {
            return Err(Error::Store(format!("{name} is not a string ({kind:?})")));
        }
        let wide: Vec<u16> = data
            .chunks_exact(2)
            .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Some(from_wide(&wide)))
    }

    /// Reads a value into `data`. A missing value is `Ok(None)`.
    fn query(&self, name: &str, data: &mut [u8]) -> Result<Option<REG_VALUE_TYPE>> {
        let wide_name = to_wide(name);
        let mut kind = REG_VALUE_TYPE::default();
        let mut size = data.len() as u32;
        // SAFETY: `data` is valid for `size` bytes and the API never writes
        // more than that.
        let status = unsafe {
            RegQueryValueExW(
                self.0,
                PCWSTR(wide_name.as_ptr()),
                None,
                Some(&mut kind),
                Some(data.as_mut_ptr()),
                Some(&mut size),
            )
        };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        if status.is_err() {
            return Err(Error::Store(format!("could not read {name}: {status:?}")));
        }
        Ok(Some(kind))
    }

    fn write_dword(&self, name: &str, value: i32) -> Result<()> {
        let wide_name = to_wide(name);
        // SAFETY: RegSetValueExW is a standard Win32 registry API. The data
        // slice is exactly one DWORD.
        let status = unsafe {
            RegSetValueExW(
                self.0,
                PCWSTR(wide_name.as_ptr()),
                None,
                REG_DWORD,
                Some(&value.to_ne_bytes()),
            )
        };
        if status.is_err() {
            return Err(Error::Store(format!("could not write {name}: {status:?}")));
        }
        Ok(())
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        // SAFETY: the handle was opened by RegOpenKeyExW and is closed once.
        let _ = unsafe { RegCloseKey(self.0) };
    }
}
