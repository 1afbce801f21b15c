use anyhow::Result;

use crate::cli::display::print_contact_details;
use crate::db::Database;
use crate::models::ContactId;

/// Execute the show command
pub fn run_show(db: &Database, id: ContactId) -> Result<()> {
    let contact = db.get_contact(id)?;
    print_contact_details(&contact);
    Ok(())
}
