use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod add;
pub mod delete;
pub mod display;
pub mod list;
pub mod menu;
pub mod search;
pub mod show;
pub mod ui;
pub mod update;

pub use add::run_add;
pub use delete::run_delete;
pub use display::{print_contact_details, print_contact_table};
pub use list::run_list;
pub use menu::run_menu;
pub use search::run_search;
pub use show::run_show;
pub use update::run_update;

#[derive(Parser)]
#[command(name = "phonebook")]
#[command(about = "Personal phone book backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides PHONEBOOK_DB and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all contacts by last name, then first name
    List,
    /// Search contacts by first name, last name, or phone
    Search(SearchArgs),
    /// Show full details for a contact
    Show(IdArgs),
    /// Add a new contact
    Add(ContactArgs),
    /// Replace a contact's fields
    Edit(EditArgs),
    /// Delete a contact
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// First name contains
    #[arg(short, long)]
    pub first: Option<String>,
    /// Last name contains
    #[arg(short, long)]
    pub last: Option<String>,
    /// Phone contains
    #[arg(short, long)]
    pub phone: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Contact id
    pub id: i64,
}

#[derive(Args, Default)]
pub struct ContactArgs {
    #[arg(short, long)]
    pub first: Option<String>,
    #[arg(short, long)]
    pub last: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub address: Option<String>,
    #[arg(short, long)]
    pub company: Option<String>,
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl ContactArgs {
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
            && self.last.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.company.is_none()
            && self.notes.is_none()
    }
}

#[derive(Args)]
pub struct EditArgs {
    /// Contact id
    pub id: i64,
    // `-` clears a field; omitted fields keep their value
    #[command(flatten)]
    pub fields: ContactArgs,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Contact id
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}
