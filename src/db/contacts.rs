use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Row};
use tracing::{debug, error, info};

use super::query::ContactQuery;
use super::Database;
use crate::error::{Error, Result};
use crate::models::*;

/// Timestamps are written in the same shape as the schema's column default.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reads RFC 3339 text, or the `YYYY-MM-DD HH:MM:SS` shape of SQLite's
/// `CURRENT_TIMESTAMP`, which is UTC.
fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|e| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map(|naive| Utc.from_utc_datetime(&naive))
                .map_err(|_| e)
        })
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Log a backend failure and wrap it with the operation name.
fn failed(op: &'static str) -> impl FnOnce(rusqlite::Error) -> Error {
    move |source| {
        error!(op, error = %source, "contact store operation failed");
        Error::storage(op)(source)
    }
}

/// Reject blank required fields before the store is touched.
fn validated(op: &'static str, input: &ContactInput) -> Result<ContactInput> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        debug!(op, ?missing, "contact rejected");
        return Err(Error::Validation { op, missing });
    }
    Ok(input.normalized())
}

impl Database {
    // ==================== CREATE ====================

    /// Insert a new contact and return its id. `created_at` and
    /// `modified_at` are both set to now.
    pub fn insert_contact(&self, input: &ContactInput) -> Result<ContactId> {
        let input = validated("insert", input)?;
        let now = timestamp(Utc::now());

        self.conn
            .execute(
                r#"INSERT INTO contacts (
                    first_name, last_name, phone, email, address, company, notes,
                    created_at, modified_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)"#,
                params![
                    input.first_name,
                    input.last_name,
                    input.phone,
                    input.email,
                    input.address,
                    input.company,
                    input.notes,
                    now,
                ],
            )
            .map_err(failed("insert"))?;

        let id = self.conn.last_insert_rowid();
        info!(id, "contact inserted");
        Ok(id)
    }

    // ==================== READ ====================

    pub fn get_contact(&self, id: ContactId) -> Result<Contact> {
        let result = self.conn.query_row(
            r#"SELECT id, first_name, last_name, phone, email, address, company, notes,
                      created_at, modified_at
               FROM contacts WHERE id = ?"#,
            [id],
            Self::row_to_contact,
        );

        match result {
            Ok(contact) => Ok(contact),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                debug!(id, "contact not found");
                Err(Error::NotFound { op: "get", id })
            }
            Err(e) => Err(failed("get")(e)),
        }
    }

    /// All contacts in listing order, projected for display.
    pub fn list_contacts(&self) -> Result<Vec<ContactSummary>> {
        let rows = ContactQuery::all()
            .fetch(&self.conn)
            .map_err(failed("list"))?;
        info!(count = rows.len(), "contacts listed");
        Ok(rows)
    }

    /// Contacts matching every supplied criterion, in listing order. Blank
    /// criteria are ignored, so empty criteria list everything.
    pub fn search_contacts(&self, criteria: &SearchCriteria) -> Result<Vec<ContactSummary>> {
        let query = ContactQuery::from_criteria(criteria);
        let rows = query.fetch(&self.conn).map_err(failed("search"))?;
        info!(
            filters = query.filters().len(),
            count = rows.len(),
            "contact search finished"
        );
        Ok(rows)
    }

    pub fn count_contacts(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
            .map_err(failed("count"))?;
        Ok(count as usize)
    }

    // ==================== UPDATE ====================

    /// Overwrite every mutable field of contact `id` and set `modified_at`.
    ///
    /// No version check is made: a concurrent writer's changes to the same row
    /// are overwritten.
    pub fn update_contact(&self, id: ContactId, input: &ContactInput) -> Result<()> {
        let input = validated("update", input)?;
        let now = timestamp(Utc::now());

        // modified_at always lands at least 1ms after created_at, even when the
        // update runs in the same millisecond as the insert
        let rows = self
            .conn
            .execute(
                r#"UPDATE contacts SET
                    first_name = ?1, last_name = ?2, phone = ?3, email = ?4,
                    address = ?5, company = ?6, notes = ?7,
                    modified_at = MAX(
                        ?8,
                        strftime('%Y-%m-%dT%H:%M:%fZ', created_at, '+0.001 seconds')
                    )
                   WHERE id = ?9"#,
                params![
                    input.first_name,
                    input.last_name,
                    input.phone,
                    input.email,
                    input.address,
                    input.company,
                    input.notes,
                    now,
                    id,
                ],
            )
            .map_err(failed("update"))?;

        if rows == 0 {
            debug!(id, "update of missing contact");
            return Err(Error::NotFound { op: "update", id });
        }
        info!(id, "contact updated");
        Ok(())
    }

    // ==================== DELETE ====================

    /// Permanently delete contact `id`. A missing id is `NotFound`.
    pub fn delete_contact(&self, id: ContactId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?", [id])
            .map_err(failed("delete"))?;

        if rows == 0 {
            debug!(id, "delete of missing contact");
            return Err(Error::NotFound { op: "delete", id });
        }
        info!(id, "contact deleted");
        Ok(())
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        let created_at: String = row.get("created_at")?;
        let modified_at: String = row.get("modified_at")?;

        Ok(Contact {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            address: row.get("address")?,
            company: row.get("company")?,
            notes: row.get("notes")?,
            created_at: parse_timestamp(8, &created_at)?,
            modified_at: parse_timestamp(9, &modified_at)?,
        })
    }
}
