//! Table formatting helpers for CLI output.

use comfy_table::{ContentArrangement, Table};
use nodestack_runtime::StatusRow;

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Render the managed containers as a status table.
pub fn status_table(rows: &[StatusRow]) -> Table {
    let mut table = new_table(&["ID", "NAME", "STATUS", "IMAGE", "VOLUMES FROM", "BINDS"]);
    for row in rows {
        let volumes_from = row.volumes_from.join(" ");
        let binds = row.binds.join(" ");
        table.add_row([
            &row.id,
            &row.name,
            &row.status,
            &row.image,
            &volumes_from,
            &binds,
        ]);
    }
    table
}
