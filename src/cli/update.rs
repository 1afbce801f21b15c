use anyhow::Result;

use crate::cli::add::{check_email, prompt_contact};
use crate::cli::ContactArgs;
use crate::db::Database;
use crate::models::{ContactId, ContactInput};

/// Execute the edit command
pub fn run_update(db: &Database, id: ContactId, fields: ContactArgs) -> Result<()> {
    let contact = db.get_contact(id)?;
    let current = contact.to_input();

    let updated = if fields.is_empty() {
        println!("Editing {} (id {})\n", contact.display_name(), contact.id);
        match prompt_contact(Some(&current))? {
            Some(input) => input,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        overlay(current, fields)
    };

    check_email(&updated)?;
    db.update_contact(id, &updated)?;
    println!("Saved.");
    Ok(())
}

/// Apply supplied fields on top of `current`. `-` clears a field; a cleared
/// required field is then rejected by the update itself.
fn overlay(current: ContactInput, fields: ContactArgs) -> ContactInput {
    fn required(current: String, new: Option<String>) -> String {
        match new {
            Some(v) if v.trim() == "-" => String::new(),
            Some(v) => v,
            None => current,
        }
    }
    fn optional(current: Option<String>, new: Option<String>) -> Option<String> {
        match new {
            Some(v) if v.trim() == "-" => None,
            Some(v) => Some(v),
            None => current,
        }
    }

    ContactInput {
        first_name: required(current.first_name, fields.first),
        last_name: required(current.last_name, fields.last),
        phone: required(current.phone, fields.phone),
        email: optional(current.email, fields.email),
        address: optional(current.address, fields.address),
        company: optional(current.company, fields.company),
        notes: optional(current.notes, fields.notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_keeps_unsupplied_fields() {
        let current = ContactInput::new("John", "Doe", "555")
            .with_email("john@example.com")
            .with_company("Acme");
        let fields = ContactArgs {
            phone: Some("777".to_string()),
            company: Some("-".to_string()),
            ..ContactArgs::default()
        };

        let merged = overlay(current, fields);
        assert_eq!(merged.first_name, "John");
        assert_eq!(merged.phone, "777");
        assert_eq!(merged.email.as_deref(), Some("john@example.com"));
        assert_eq!(merged.company, None);
    }

    #[test]
    fn test_run_update_overwrites_record() {
        let db = Database::open_memory().unwrap();
        let id = db
            .insert_contact(&ContactInput::new("John", "Doe", "555").with_notes("old"))
            .unwrap();

        let fields = ContactArgs {
            last: Some("Dough".to_string()),
            notes: Some("-".to_string()),
            ..ContactArgs::default()
        };
        run_update(&db, id, fields).unwrap();

        let contact = db.get_contact(id).unwrap();
        assert_eq!(contact.last_name, "Dough");
        assert_eq!(contact.notes, None);
    }

    #[test]
    fn test_clearing_required_field_is_rejected() {
        let db = Database::open_memory().unwrap();
        let id = db.insert_contact(&ContactInput::new("John", "Doe", "555")).unwrap();

        let fields = ContactArgs {
            phone: Some("-".to_string()),
            ..ContactArgs::default()
        };
        assert!(run_update(&db, id, fields).is_err());
        assert_eq!(db.get_contact(id).unwrap().phone, "555");
    }

    #[test]
    fn test_run_update_missing_contact() {
        let db = Database::open_memory().unwrap();
        let fields = ContactArgs {
            first: Some("X".to_string()),
            ..ContactArgs::default()
        };

        let err = run_update(&db, 5, fields).unwrap_err();
        assert!(err.downcast_ref::<crate::Error>().unwrap().is_not_found());
    }
}
