use anyhow::Result;

use crate::cli::ui::confirm;
use crate::db::Database;
use crate::models::ContactId;

/// Execute the delete command
pub fn run_delete(db: &Database, id: ContactId, force: bool) -> Result<()> {
    let contact = db.get_contact(id)?;
    let display_name = contact.display_name();

    println!("{}  {}", display_name, contact.phone);
    println!();

    if !force && !confirm(&format!("Delete {}?", display_name))? {
        println!("Cancelled.");
        return Ok(());
    }

    db.delete_contact(id)?;
    println!("Deleted.");
    Ok(())
}
