//! Ctrl+C shield using `SetConsoleCtrlHandler`.
//!
//! While a launched program runs, Ctrl+C in the shared console must stop
//! the program but not this process, or the scaling restore would never
//! run. The handler swallows Ctrl+C and Ctrl+Break; the child still
//! receives them and exits, after which restore proceeds normally.

use std::sync::atomic::{AtomicBool, Ordering};

use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Keeps this process alive on Ctrl+C / Ctrl+Break. Idempotent.
///
/// Call it before the first scaling write so an interrupt can never land
/// between a write and its restore.
pub fn shield() {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }
    if let Err(e) = unsafe { SetConsoleCtrlHandler(Some(handler), true) } {
        INSTALLED.store(false, Ordering::SeqCst);
        tracing::warn!("could not install Ctrl+C handler: {e}");
    }
}

unsafe extern "system" fn handler(ctrl_type: u32) -> windows::core::BOOL {
    if ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT {
        tracing::info!("interrupt received; waiting for the program to exit before restoring");
        return windows::core::BOOL(1);
    }
    windows::core::BOOL(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_installs_once() {
        // Act
        shield();
        shield();

        // Assert
        assert!(INSTALLED.load(Ordering::SeqCst));
    }

    #[test]
    fn handler_swallows_interrupts_only() {
        // SAFETY: the handler only inspects its argument.
        unsafe {
            assert_eq!(handler(CTRL_C_EVENT), windows::core::BOOL(1));
            assert_eq!(handler(CTRL_BREAK_EVENT), windows::core::BOOL(1));
            assert_eq!(handler(5), windows::core::BOOL(0));
        }
    }
}
