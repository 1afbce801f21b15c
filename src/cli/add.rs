use anyhow::{anyhow, Result};

use crate::cli::ui::{is_valid_email, prompt_field, FormResult};
use crate::cli::ContactArgs;
use crate::db::Database;
use crate::models::{ContactId, ContactInput};

/// Execute the add command
pub fn run_add(db: &Database, args: ContactArgs) -> Result<()> {
    // If no options provided, run interactive mode
    let input = if args.is_empty() {
        match prompt_contact(None)? {
            Some(input) => input,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        input_from_args(args)
    };

    let id = add_contact(db, &input)?;
    println!("Added: {} {} (id {})", input.first_name.trim(), input.last_name.trim(), id);
    Ok(())
}

/// Check the email shape, then insert.
pub fn add_contact(db: &Database, input: &ContactInput) -> Result<ContactId> {
    check_email(input)?;
    Ok(db.insert_contact(input)?)
}

fn input_from_args(args: ContactArgs) -> ContactInput {
    ContactInput {
        first_name: args.first.unwrap_or_default(),
        last_name: args.last.unwrap_or_default(),
        phone: args.phone.unwrap_or_default(),
        email: args.email,
        address: args.address,
        company: args.company,
        notes: args.notes,
    }
}

/// Reject an email that is present but not `local@domain.tld`.
pub fn check_email(input: &ContactInput) -> Result<()> {
    match input.email.as_deref().map(str::trim) {
        Some(e) if !e.is_empty() && !is_valid_email(e) => {
            Err(anyhow!("Invalid email format: {}", e))
        }
        _ => Ok(()),
    }
}

/// Prompt for every field. With `current`, empty answers keep the current
/// value and `-` clears it. `None` when the user cancels.
pub fn prompt_contact(current: Option<&ContactInput>) -> Result<Option<ContactInput>> {
    let fields: [(&str, Option<&str>); 7] = [
        ("first name*", current.map(|c| c.first_name.as_str())),
        ("last name*", current.map(|c| c.last_name.as_str())),
        ("phone*", current.map(|c| c.phone.as_str())),
        ("email", current.and_then(|c| c.email.as_deref())),
        ("address", current.and_then(|c| c.address.as_deref())),
        ("company", current.and_then(|c| c.company.as_deref())),
        ("notes", current.and_then(|c| c.notes.as_deref())),
    ];

    let mut values = Vec::with_capacity(fields.len());
    for (label, value) in fields {
        match prompt_field(label, value)? {
            FormResult::Value(v) => values.push(v),
            FormResult::Cancelled => return Ok(None),
        }
    }

    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or_default();
    let (first_name, last_name, phone) = (next(), next(), next());
    let optional = |v: String| if v.is_empty() { None } else { Some(v) };

    Ok(Some(ContactInput {
        first_name,
        last_name,
        phone,
        email: optional(next()),
        address: optional(next()),
        company: optional(next()),
        notes: optional(next()),
    }))
}
