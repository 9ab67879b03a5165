use std::mem;

use scaleguard_core::{DisplayOutput, DisplaySource, Result};
use windows::Win32::Graphics::Gdi::{
    DISPLAY_DEVICE_ATTACHED_TO_DESKTOP, DISPLAY_DEVICEW, EnumDisplayDevicesW,
};
use windows::core::PCWSTR;

use crate::wide::from_wide;

/// Display outputs reported by `EnumDisplayDevicesW`.
///
/// Each adapter output that is part of the desktop is queried a second
/// time by name to get the attached monitor's label and device path.
pub struct Win32Displays;

impl DisplaySource for Win32Displays {
    fn outputs(&self) -> Box<dyn Iterator<Item = Result<DisplayOutput>> + '_> {
        Box::new(Outputs { index: 0 })
    }
}

struct Outputs {
    index: u32,
}

impl Iterator for Outputs {
    type Item = Result<DisplayOutput>;

    fn next(&mut self) -> Option<Self::Item> {
        // EnumDisplayDevicesW fails past the last adapter; that ends the scan.
        let adapter = query_device(None, self.index)?;
        self.index += 1;

        let attached = adapter.StateFlags.0 & DISPLAY_DEVICE_ATTACHED_TO_DESKTOP.0 != 0;
        if !attached {
            return Some(Ok(DisplayOutput {
                attached,
                label: from_wide(&adapter.DeviceString),
                device_path: String::new(),
            }));
        }

        let output = match query_device(Some(&adapter.DeviceName), 0) {
            Some(monitor) => DisplayOutput {
                attached,
                label: from_wide(&monitor.DeviceString),
                device_path: from_wide(&monitor.DeviceID),
            },
            None => DisplayOutput {
                attached,
                label: from_wide(&adapter.DeviceString),
                device_path: String::new(),
            },
        };
        Some(Ok(output))
    }
}

/// Queries the `index`th device below `parent` (adapters when `None`).
fn query_device(parent: Option<&[u16]>, index: u32) -> Option<DISPLAY_DEVICEW> {
    let mut device = DISPLAY_DEVICEW {
        cb: mem::size_of::<DISPLAY_DEVICEW>() as u32,
        ..Default::default()
    };
    let name = parent.map_or(PCWSTR::null(), |p| PCWSTR(p.as_ptr()));

    // SAFETY: `device.cb` is set as the API requires and `name` is either
    // null or points at a null-terminated DeviceName buffer that outlives
    // the call.
    let found = unsafe { EnumDisplayDevicesW(name, index, &mut device, 0) };
    found.as_bool().then_some(device)
}
