//! Error taxonomy for the contact store.
//!
//! Every variant names the operation that failed so the caller can show an
//! actionable message without inspecting the source chain.

use thiserror::Error;

use crate::models::{ContactId, RequiredField};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be opened or its schema could not be ensured.
    /// No repository exists after this error.
    #[error("contact store unavailable at {location}: {source}")]
    StorageUnavailable {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A backend failure during a single operation. Nothing was applied.
    #[error("{op} failed: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Required fields were blank. The store was not touched.
    #[error("{op}: required field(s) missing: {}", join_fields(.missing))]
    Validation {
        op: &'static str,
        missing: Vec<RequiredField>,
    },

    /// The referenced contact does not exist.
    #[error("{op}: no contact with id {id}")]
    NotFound { op: &'static str, id: ContactId },

    /// A displayed row could not be mapped back to a contact, usually because
    /// the list was refreshed after the row was selected.
    #[error("{op}: could not resolve selection (row {row}); refresh the list")]
    UnresolvedSelection { op: &'static str, row: usize },
}

impl Error {
    pub(crate) fn storage(op: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Storage { op, source }
    }

    pub(crate) fn unavailable<E>(location: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StorageUnavailable {
            location: location.into(),
            source: Box::new(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::UnresolvedSelection { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Only a bootstrap failure stops further use of the store.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}
