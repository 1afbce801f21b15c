//! Filtered contact listing.
//!
//! A query is a list of independently optional substring filters folded with
//! AND. Filter values are always bound as parameters, never spliced into SQL.

use rusqlite::{Connection, Row};

use crate::models::{ContactSummary, SearchCriteria};

const SUMMARY_COLUMNS: &str = "id, first_name, last_name, phone, email, company";

/// Standard listing order. `id` breaks ties so repeated calls agree.
pub const ORDER_BY: &str = "ORDER BY last_name ASC, first_name ASC, id ASC";

/// Columns a filter may target. Only these names ever reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    FirstName,
    LastName,
    Phone,
}

impl FilterColumn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Phone => "phone",
        }
    }
}

/// An unanchored substring match on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: FilterColumn,
    pattern: String,
}

impl Filter {
    /// `None` when the value is blank after trimming: a blank filter does not
    /// restrict anything.
    pub fn contains(column: FilterColumn, value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            column,
            pattern: format!("%{}%", escape_like(value)),
        })
    }

    pub fn column(&self) -> FilterColumn {
        self.column
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    filters: Vec<Filter>,
}

impl ContactQuery {
    /// The unfiltered listing.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        [
            (FilterColumn::FirstName, &criteria.first_name_contains),
            (FilterColumn::LastName, &criteria.last_name_contains),
            (FilterColumn::Phone, &criteria.phone_contains),
        ]
        .into_iter()
        .filter_map(|(column, value)| Filter::contains(column, value.as_deref()?))
        .fold(Self::all(), Self::and)
    }

    pub fn and(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM contacts", SUMMARY_COLUMNS);

        if !self.filters.is_empty() {
            // LIKE is case-insensitive in SQLite; ESCAPE '\' keeps % and _ literal
            let conditions: Vec<String> = self
                .filters
                .iter()
                .enumerate()
                .map(|(i, f)| format!("{} LIKE ?{} ESCAPE '\\'", f.column.as_sql(), i + 1))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        sql.push(' ');
        sql.push_str(ORDER_BY);
        sql
    }

    pub fn fetch(&self, conn: &Connection) -> rusqlite::Result<Vec<ContactSummary>> {
        let mut stmt = conn.prepare(&self.to_sql())?;
        let params = self.filters.iter().map(|f| f.pattern.as_str());

        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), row_to_summary)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn row_to_summary(row: &Row) -> rusqlite::Result<ContactSummary> {
    Ok(ContactSummary {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        company: row.get("company")?,
    })
}

/// Escape LIKE metacharacters (% _ \)
fn escape_like(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
