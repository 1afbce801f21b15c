use serde::{Deserialize, Serialize};

/// Optional substring filters for a contact search.
///
/// A filter that is absent or blank after trimming does not restrict the
/// result. Supplied filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub first_name_contains: Option<String>,
    pub last_name_contains: Option<String>,
    pub phone_contains: Option<String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name_contains = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name_contains = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone_contains = Some(value.into());
        self
    }

    /// True when no filter would restrict the result.
    pub fn is_empty(&self) -> bool {
        [
            &self.first_name_contains,
            &self.last_name_contains,
            &self.phone_contains,
        ]
        .iter()
        .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}
