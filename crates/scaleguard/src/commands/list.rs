use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use scaleguard_core::config::Config;

pub fn execute(config: &Config, json: bool) {
    let controller = super::controller(config);
    let devices = controller.display_devices();

    if json {
        match serde_json::to_string_pretty(&devices) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Device ID"),
            Cell::new("Monitor"),
            Cell::new("Scaling").set_alignment(CellAlignment::Right),
            Cell::new("Settings entry"),
        ]);

    for device in &devices {
        let entry = controller
            .scaling()
            .find_entry(&device.device_id)
            .unwrap_or_else(|| "-".into());
        table.add_row(vec![
            Cell::new(&device.device_id),
            Cell::new(&device.device_label),
            Cell::new(device.scaling).set_alignment(CellAlignment::Right),
            Cell::new(entry),
        ]);
    }

    println!("{table}");
    println!("\n{} monitors found", devices.len());
}
