use anyhow::Result;

use crate::cli::display::print_contact_table;
use crate::db::Database;

/// Execute the list command
pub fn run_list(db: &Database) -> Result<()> {
    let rows = db.list_contacts()?;
    print_contact_table(&rows);
    Ok(())
}
