use anyhow::Result;

use crate::cli::display::print_contact_table;
use crate::cli::SearchArgs;
use crate::db::Database;
use crate::models::SearchCriteria;

impl From<SearchArgs> for SearchCriteria {
    fn from(args: SearchArgs) -> Self {
        Self {
            first_name_contains: args.first,
            last_name_contains: args.last,
            phone_contains: args.phone,
        }
    }
}

/// Execute the search command. With no filters this is the full listing.
pub fn run_search(db: &Database, args: SearchArgs) -> Result<()> {
    let rows = db.search_contacts(&args.into())?;
    print_contact_table(&rows);
    Ok(())
}
