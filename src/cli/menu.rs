//! Interactive browse session for phonebook
//!
//! Uses inquire for terminal interaction. The rendered list and its row
//! bindings live in a [`ContactView`]; every action that needs a selected
//! contact goes through it.

use anyhow::{anyhow, Result};
use inquire::Select;
use std::io::{self, IsTerminal};

use crate::cli::add::{check_email, prompt_contact};
use crate::cli::display::{format_summary_row, format_table_header, print_contact_details};
use crate::cli::ui::{
    clear_screen, confirm, error, minimal_render_config, prompt_field, select, status,
    wait_for_continue, FormResult,
};
use crate::db::Database;
use crate::models::SearchCriteria;
use crate::view::{ContactView, Listing, RowKey};

/// Menu options with type-safe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Show,
    Edit,
    Delete,
    Add,
    Search,
    ClearSearch,
    Refresh,
    Quit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::Show,
        MenuOption::Edit,
        MenuOption::Delete,
        MenuOption::Add,
        MenuOption::Search,
        MenuOption::ClearSearch,
        MenuOption::Refresh,
        MenuOption::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::Show => "Show details",
            MenuOption::Edit => "Edit",
            MenuOption::Delete => "Delete",
            MenuOption::Add => "Add new",
            MenuOption::Search => "Search",
            MenuOption::ClearSearch => "Show all",
            MenuOption::Refresh => "Refresh",
            MenuOption::Quit => "Quit",
        }
    }

    fn from_label(s: &str) -> Option<MenuOption> {
        MenuOption::ALL.iter().find(|opt| opt.label() == s).copied()
    }

    fn needs_selection(self) -> bool {
        matches!(self, MenuOption::Show | MenuOption::Edit | MenuOption::Delete)
    }
}

/// Run the interactive browse session
pub fn run_menu(db: &Database) -> Result<()> {
    // TTY check: interactive menu requires a terminal
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive mode requires a terminal. Use subcommands for non-interactive use:\n  \
            phonebook list\n  \
            phonebook search --last <text>\n  \
            phonebook show <id>\n  \
            Run 'phonebook --help' for all options."
        ));
    }

    let mut view = ContactView::new();
    if let Err(e) = view.show_all(db) {
        error(&e.to_string());
        wait_for_continue();
    }

    let menu_labels: Vec<&str> = MenuOption::ALL.iter().map(|opt| opt.label()).collect();

    loop {
        let _ = clear_screen();
        print_view(&view);

        let selection = Select::new("phonebook", menu_labels.clone())
            .with_render_config(minimal_render_config())
            .with_page_size(menu_labels.len())
            .with_vim_mode(true)
            .prompt_skippable();

        // Ctrl+C, Escape or a terminal error ends the session
        let Ok(Some(choice_label)) = selection else {
            return Ok(());
        };
        let Some(choice) = MenuOption::from_label(choice_label) else {
            continue;
        };
        if choice == MenuOption::Quit {
            return Ok(());
        }

        // All errors are shown and the session continues
        if let Err(e) = execute_command(db, &mut view, choice) {
            eprintln!();
            error(&e.to_string());
            wait_for_continue();
        }
    }
}

fn print_view(view: &ContactView) {
    if let Listing::Search(ref criteria) = *view.listing() {
        status(&format!("Search: {}", describe_criteria(criteria)));
    }

    if view.is_stale() {
        status("List could not be refreshed. Choose \"Refresh\" to retry.");
    } else if view.rows().is_empty() {
        status("No contacts.");
    } else {
        status(&format_table_header());
        for row in view.rows() {
            status(&format_summary_row(row.key.index() + 1, &row.summary));
        }
    }
    status(&format!("\nContacts: {}\n", view.rows().len()));
}

fn describe_criteria(criteria: &SearchCriteria) -> String {
    [
        ("first", &criteria.first_name_contains),
        ("last", &criteria.last_name_contains),
        ("phone", &criteria.phone_contains),
    ]
    .iter()
    .filter_map(|(label, value)| {
        let value = value.as_deref()?.trim();
        (!value.is_empty()).then(|| format!("{} contains \"{}\"", label, value))
    })
    .collect::<Vec<_>>()
    .join(", ")
}

fn execute_command(db: &Database, view: &mut ContactView, choice: MenuOption) -> Result<()> {
    if choice.needs_selection() {
        return match pick_row(view, choice.label())? {
            Some(key) => execute_on_row(db, view, choice, key),
            None => Ok(()),
        };
    }

    match choice {
        MenuOption::Add => {
            if let Some(input) = prompt_contact(None)? {
                check_email(&input)?;
                let id = view.add(db, &input)?;
                status(&format!("Added (id {}).", id));
            }
        }
        MenuOption::Search => {
            if let Some(criteria) = prompt_criteria()? {
                view.search(db, criteria)?;
            }
        }
        MenuOption::ClearSearch => {
            view.clear_search(db)?;
        }
        MenuOption::Refresh => {
            view.refresh(db)?;
        }
        _ => {}
    }
    Ok(())
}

fn execute_on_row(
    db: &Database,
    view: &mut ContactView,
    choice: MenuOption,
    key: RowKey,
) -> Result<()> {
    match choice {
        MenuOption::Show => {
            let contact = view.details(db, key)?;
            let _ = clear_screen();
            print_contact_details(&contact);
            println!();
            wait_for_continue();
        }
        MenuOption::Edit => {
            let contact = view.details(db, key)?;
            println!("Editing {}\n", contact.display_name());
            if let Some(input) = prompt_contact(Some(&contact.to_input()))? {
                check_email(&input)?;
                view.edit(db, key, &input)?;
                status("Saved.");
            }
        }
        MenuOption::Delete => {
            let name = view
                .summary(key)
                .map(|s| s.display_name())
                .unwrap_or_default();
            if confirm(&format!("Delete {}?", name))? {
                view.delete(db, key)?;
                status("Deleted.");
            }
        }
        _ => {}
    }
    Ok(())
}

/// Let the user pick one of the rendered rows.
fn pick_row(view: &ContactView, action: &str) -> Result<Option<RowKey>> {
    if view.rows().is_empty() {
        status("No contacts to select.");
        wait_for_continue();
        return Ok(None);
    }

    let labels: Vec<String> = view
        .rows()
        .iter()
        .map(|row| format_summary_row(row.key.index() + 1, &row.summary))
        .collect();

    let picked = select(&format!("{}:", action.to_lowercase()), &labels)?;
    Ok(picked.and_then(|i| view.rows().get(i)).map(|row| row.key))
}

fn prompt_criteria() -> Result<Option<SearchCriteria>> {
    let mut values = Vec::with_capacity(3);
    for label in ["first name contains", "last name contains", "phone contains"] {
        match prompt_field(label, None)? {
            FormResult::Value(v) => values.push(v),
            FormResult::Cancelled => return Ok(None),
        }
    }

    let mut values = values.into_iter().map(Some);
    Ok(Some(SearchCriteria {
        first_name_contains: values.next().flatten(),
        last_name_contains: values.next().flatten(),
        phone_contains: values.next().flatten(),
    }))
}
