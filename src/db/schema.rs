/// Contacts table. `AUTOINCREMENT` keeps ids from being reused after a delete;
/// `NOCASE` makes ordering and comparison case-insensitive by default.
///
/// Timestamp defaults use the same millisecond RFC 3339 shape the repository
/// writes, so rows from either source compare correctly as text.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL COLLATE NOCASE,
    last_name TEXT NOT NULL COLLATE NOCASE,
    phone TEXT NOT NULL COLLATE NOCASE,
    email TEXT,
    address TEXT,
    company TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    modified_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(last_name, first_name);
CREATE INDEX IF NOT EXISTS idx_contacts_phone ON contacts(phone);
"#;

/// Columns every bootstrapped `contacts` table must carry.
pub const CONTACT_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "phone",
    "email",
    "address",
    "company",
    "notes",
    "created_at",
    "modified_at",
];
