use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned contact identifier. Never reused after deletion.
pub type ContactId = i64;

/// Fields that must be non-empty (after trimming) on every persisted contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    FirstName,
    LastName,
    Phone,
}

impl RequiredField {
    pub const ALL: &'static [RequiredField] = &[
        RequiredField::FirstName,
        RequiredField::LastName,
        RequiredField::Phone,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Phone => "Phone",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The mutable fields of this contact, ready to be edited and written back.
    pub fn to_input(&self) -> ContactInput {
        ContactInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            company: self.company.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Caller-supplied contact fields for insert and full-record update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl ContactInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Required fields that are empty after trimming, in declaration order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .iter()
            .copied()
            .filter(|field| self.required(*field).trim().is_empty())
            .collect()
    }

    /// Trimmed copy. Blank optional fields become `None`.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: normalize_optional(self.email.as_deref()),
            address: normalize_optional(self.address.as_deref()),
            company: normalize_optional(self.company.as_deref()),
            // Notes keep their inner line breaks; only the outer whitespace goes.
            notes: normalize_optional(self.notes.as_deref()),
        }
    }

    fn required(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::FirstName => &self.first_name,
            RequiredField::LastName => &self.last_name,
            RequiredField::Phone => &self.phone,
        }
    }
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The projection of a contact used for list display.
///
/// Address, notes and timestamps are deliberately absent; fetch them with
/// `Database::get_contact` when a single contact's details are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
}

impl ContactSummary {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_reports_blank_required() {
        let input = ContactInput::new("  ", "Doe", "");
        assert_eq!(
            input.missing_fields(),
            vec![RequiredField::FirstName, RequiredField::Phone]
        );
    }

    #[test]
    fn test_missing_fields_empty_when_complete() {
        let input = ContactInput::new("John", "Doe", "555-1000");
        assert!(input.missing_fields().is_empty());
    }

    #[test]
    fn test_normalized_trims_and_drops_blank_optionals() {
        let input = ContactInput::new(" John ", "Doe\t", " 555 ")
            .with_email("   ")
            .with_company(" Acme ")
            .with_notes("\nline one\nline two\n");

        let normalized = input.normalized();
        assert_eq!(normalized.first_name, "John");
        assert_eq!(normalized.last_name, "Doe");
        assert_eq!(normalized.phone, "555");
        assert_eq!(normalized.email, None);
        assert_eq!(normalized.address, None);
        assert_eq!(normalized.company.as_deref(), Some("Acme"));
        assert_eq!(normalized.notes.as_deref(), Some("line one\nline two"));
    }
}
