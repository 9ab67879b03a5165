use std::mem;
use std::path::Path;

use scaleguard_core::restart::ElevatedLauncher;
use scaleguard_core::{Error, Result};
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::SystemInformation::{
    GetNativeSystemInfo, PROCESSOR_ARCHITECTURE_AMD64, PROCESSOR_ARCHITECTURE_ARM64,
    PROCESSOR_ARCHITECTURE_IA64, SYSTEM_INFO,
};
use windows::Win32::System::Threading::{INFINITE, WaitForSingleObject};
use windows::Win32::UI::Shell::{
    SEE_MASK_NOASYNC, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW, ShellExecuteExW,
};
use windows::Win32::UI::WindowsAndMessaging::SW_HIDE;
use windows::core::{HSTRING, PCWSTR};

/// Runs a program through the shell's `runas` verb and waits for it.
///
/// Shows the UAC prompt. Declining it is reported as an error. The wait
/// has no timeout.
pub struct ShellRunAs;

impl ElevatedLauncher for ShellRunAs {
    fn run_elevated(
        &self,
        program: &Path,
        arguments: &str,
        working_dir: Option<&Path>,
    ) -> Result<()> {
        let verb = HSTRING::from("runas");
        let file = HSTRING::from(program.as_os_str());
        let params = HSTRING::from(arguments);
        let dir = working_dir.map(|d| HSTRING::from(d.as_os_str()));

        let mut info = SHELLEXECUTEINFOW {
            cbSize: mem::size_of::<SHELLEXECUTEINFOW>() as u32,
            fMask: SEE_MASK_NOCLOSEPROCESS | SEE_MASK_NOASYNC,
            lpVerb: PCWSTR(verb.as_ptr()),
            lpFile: PCWSTR(file.as_ptr()),
            lpParameters: PCWSTR(params.as_ptr()),
            lpDirectory: dir.as_ref().map_or(PCWSTR::null(), |d| PCWSTR(d.as_ptr())),
            nShow: SW_HIDE.0,
            ..Default::default()
        };

        // SAFETY: every string referenced by `info` outlives the call and
        // `cbSize` is set as the API requires.
        unsafe { ShellExecuteExW(&mut info) }
            .map_err(|e| Error::Helper(format!("could not launch {}: {e}", program.display())))?;

        if info.hProcess.is_invalid() {
            tracing::debug!("shell returned no process handle; not waiting");
            return Ok(());
        }

        // SAFETY: SEE_MASK_NOCLOSEPROCESS hands us the process handle; we
        // wait on it and close it exactly once.
        unsafe {
            WaitForSingleObject(info.hProcess, INFINITE);
            let _ = CloseHandle(info.hProcess);
        }
        Ok(())
    }
}

/// Returns true if the OS (not this process) is 64-bit.
pub fn is_native_64bit() -> bool {
    let mut info = SYSTEM_INFO::default();
    // SAFETY: GetNativeSystemInfo only fills the struct we pass.
    unsafe { GetNativeSystemInfo(&mut info) };
    // SAFETY: wProcessorArchitecture is valid in every SYSTEM_INFO variant.
    let arch = unsafe { info.Anonymous.Anonymous.wProcessorArchitecture };
    arch == PROCESSOR_ARCHITECTURE_AMD64
        || arch == PROCESSOR_ARCHITECTURE_ARM64
        || arch == PROCESSOR_ARCHITECTURE_IA64
}
