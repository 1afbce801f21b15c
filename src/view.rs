//! Rendered-list state for interactive front ends.
//!
//! A [`ViewMapping`] binds each displayed row to the id of the contact it
//! shows. It is rebuilt from scratch on every refresh and never patched: each
//! rebuild starts a new generation, and a [`RowKey`] from an older generation
//! no longer resolves. [`ContactView`] owns the mapping together with the
//! active listing and routes every selection-dependent operation through it.

use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Contact, ContactId, ContactInput, ContactSummary, SearchCriteria};

/// Identifies one displayed row of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey {
    generation: u64,
    index: usize,
}

impl RowKey {
    /// Zero-based position in the rendered list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct ViewMapping {
    generation: u64,
    ids: Vec<ContactId>,
}

impl ViewMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every existing binding and bind `rows` under a new generation.
    pub fn rebuild(&mut self, rows: &[ContactSummary]) -> Vec<RowKey> {
        self.generation += 1;
        self.ids = rows.iter().map(|r| r.id).collect();
        (0..self.ids.len())
            .map(|index| RowKey {
                generation: self.generation,
                index,
            })
            .collect()
    }

    /// Drop every binding without producing new ones.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.ids.clear();
    }

    pub fn resolve(&self, key: RowKey) -> Option<ContactId> {
        if key.generation != self.generation {
            return None;
        }
        self.ids.get(key.index).copied()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// What the list currently shows; re-run on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Listing {
    #[default]
    All,
    Search(SearchCriteria),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub key: RowKey,
    pub summary: ContactSummary,
}

/// A displayed contact list and its row-to-id mapping.
#[derive(Debug, Default)]
pub struct ContactView {
    listing: Listing,
    mapping: ViewMapping,
    rows: Vec<ViewRow>,
    stale: bool,
}

impl ContactView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn mapping(&self) -> &ViewMapping {
        &self.mapping
    }

    /// True after a mutation whose follow-up refresh failed. Nothing resolves
    /// until [`ContactView::refresh`] succeeds.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn summary(&self, key: RowKey) -> Option<&ContactSummary> {
        self.mapping.resolve(key)?;
        self.rows.get(key.index).map(|row| &row.summary)
    }

    pub fn show_all(&mut self, db: &Database) -> Result<&[ViewRow]> {
        self.listing = Listing::All;
        self.refresh(db)
    }

    /// Show the contacts matching `criteria`. Criteria with nothing to filter
    /// on are the same as [`ContactView::show_all`].
    pub fn search(&mut self, db: &Database, criteria: SearchCriteria) -> Result<&[ViewRow]> {
        self.listing = if criteria.is_empty() {
            Listing::All
        } else {
            Listing::Search(criteria)
        };
        self.refresh(db)
    }

    pub fn clear_search(&mut self, db: &Database) -> Result<&[ViewRow]> {
        self.show_all(db)
    }

    /// Re-run the active listing and rebuild the mapping from its result.
    /// On failure the mapping is left empty.
    pub fn refresh(&mut self, db: &Database) -> Result<&[ViewRow]> {
        let fetched = match self.listing {
            Listing::All => db.list_contacts(),
            Listing::Search(ref criteria) => db.search_contacts(criteria),
        };

        let summaries = match fetched {
            Ok(summaries) => summaries,
            Err(e) => {
                self.mapping.invalidate();
                self.rows.clear();
                self.stale = true;
                return Err(e);
            }
        };

        let keys = self.mapping.rebuild(&summaries);
        self.rows = keys
            .into_iter()
            .zip(summaries)
            .map(|(key, summary)| ViewRow { key, summary })
            .collect();
        self.stale = false;
        debug!(
            generation = self.mapping.generation(),
            rows = self.rows.len(),
            "view rebuilt"
        );
        Ok(&self.rows)
    }

    /// Map a selected row to its contact id through the current mapping.
    pub fn resolve(&self, op: &'static str, key: RowKey) -> Result<ContactId> {
        self.mapping.resolve(key).ok_or_else(|| {
            debug!(op, row = key.index, generation = key.generation, "selection did not resolve");
            Error::UnresolvedSelection { op, row: key.index }
        })
    }

    /// Full record for the selected row.
    pub fn details(&self, db: &Database, key: RowKey) -> Result<Contact> {
        let id = self.resolve("show", key)?;
        db.get_contact(id)
    }

    pub fn add(&mut self, db: &Database, input: &ContactInput) -> Result<ContactId> {
        let id = db.insert_contact(input)?;
        self.after_mutation(db);
        Ok(id)
    }

    /// Overwrite the selected contact with `input`.
    pub fn edit(&mut self, db: &Database, key: RowKey, input: &ContactInput) -> Result<ContactId> {
        let id = self.resolve("update", key)?;
        db.update_contact(id, input)?;
        self.after_mutation(db);
        Ok(id)
    }

    pub fn delete(&mut self, db: &Database, key: RowKey) -> Result<ContactId> {
        let id = self.resolve("delete", key)?;
        db.delete_contact(id)?;
        self.after_mutation(db);
        Ok(id)
    }

    // The mutation already succeeded, so a failed refresh is not reported as
    // its error; the view is marked stale instead.
    fn after_mutation(&mut self, db: &Database) {
        self.mapping.invalidate();
        self.rows.clear();
        if let Err(e) = self.refresh(db) {
            warn!(error = %e, "refresh after change failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(db: &Database) -> Vec<ContactId> {
        [("Ann", "Smith", "1"), ("Bob", "Adams", "2"), ("Zoe", "Smith", "3")]
            .iter()
            .map(|(f, l, p)| db.insert_contact(&ContactInput::new(*f, *l, *p)).unwrap())
            .collect()
    }

    fn key_for(view: &ContactView, first_name: &str) -> RowKey {
        view.rows()
            .iter()
            .find(|row| row.summary.first_name == first_name)
            .map(|row| row.key)
            .unwrap()
    }

    #[test]
    fn test_mapping_rebuild_starts_new_generation() {
        let mut mapping = ViewMapping::new();
        let rows = vec![ContactSummary {
            id: 7,
            first_name: "A".into(),
            last_name: "B".into(),
            phone: "1".into(),
            email: None,
            company: None,
        }];

        let old = mapping.rebuild(&rows);
        assert_eq!(mapping.resolve(old[0]), Some(7));
        assert_eq!(mapping.len(), 1);

        let new = mapping.rebuild(&rows);
        assert_eq!(new[0].generation(), old[0].generation() + 1);
        assert_eq!(mapping.resolve(new[0]), Some(7));
        assert_eq!(mapping.resolve(old[0]), None);

        mapping.invalidate();
        assert!(mapping.is_empty());
        assert_eq!(mapping.resolve(new[0]), None);
    }

    #[test]
    fn test_rows_follow_listing_order() {
        let db = Database::open_memory().unwrap();
        let ids = seed(&db);

        let mut view = ContactView::new();
        view.show_all(&db).unwrap();

        let shown: Vec<_> = view
            .rows()
            .iter()
            .map(|row| view.resolve("show", row.key).unwrap())
            .collect();
        assert_eq!(shown, vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_details_resolve_through_mapping() {
        let db = Database::open_memory().unwrap();
        seed(&db);

        let mut view = ContactView::new();
        view.show_all(&db).unwrap();

        let contact = view.details(&db, key_for(&view, "Zoe")).unwrap();
        assert_eq!(contact.first_name, "Zoe");
        assert_eq!(contact.last_name, "Smith");
    }

    #[test]
    fn test_stale_selection_after_external_delete_is_not_found() {
        let db = Database::open_memory().unwrap();
        let ids = seed(&db);

        let mut view = ContactView::new();
        view.show_all(&db).unwrap();
        let selected = key_for(&view, "Ann");

        // Removed by someone else, then the list is refreshed
        db.delete_contact(ids[0]).unwrap();
        view.refresh(&db).unwrap();

        let err = view.delete(&db, selected).unwrap_err();
        assert!(err.is_not_found());
        let err = view
            .edit(&db, selected, &ContactInput::new("X", "Y", "Z"))
            .unwrap_err();
        assert!(err.is_not_found());

        // The other contacts are untouched
        assert_eq!(db.count_contacts().unwrap(), 2);
        assert_eq!(db.get_contact(ids[1]).unwrap().first_name, "Bob");
        assert_eq!(db.get_contact(ids[2]).unwrap().first_name, "Zoe");
    }

    #[test]
    fn test_external_delete_without_refresh_is_not_found() {
        let db = Database::open_memory().unwrap();
        let ids = seed(&db);

        let mut view = ContactView::new();
        view.show_all(&db).unwrap();
        let selected = key_for(&view, "Ann");

        db.delete_contact(ids[0]).unwrap();

        assert!(matches!(
            view.details(&db, selected),
            Err(Error::NotFound { op: "get", .. })
        ));
        assert!(matches!(
            view.delete(&db, selected),
            Err(Error::NotFound { op: "delete", .. })
        ));
        assert_eq!(db.count_contacts().unwrap(), 2);
    }

    #[test]
    fn test_mutation_refreshes_and_retires_old_keys() {
        let db = Database::open_memory().unwrap();
        seed(&db);

        let mut view = ContactView::new();
        view.show_all(&db).unwrap();
        let ann = key_for(&view, "Ann");
        let zoe = key_for(&view, "Zoe");

        view.delete(&db, ann).unwrap();

        assert_eq!(view.rows().len(), 2);
        assert!(!view.is_stale());
        assert!(view.resolve("update", zoe).unwrap_err().is_not_found());

        let zoe = key_for(&view, "Zoe");
        let id = view
            .edit(&db, zoe, &ContactInput::new("Zoe", "Smith", "999"))
            .unwrap();
        assert_eq!(db.get_contact(id).unwrap().phone, "999");
        assert_eq!(view.summary(key_for(&view, "Zoe")).unwrap().phone, "999");
    }

    #[test]
    fn test_add_refreshes_active_search() {
        let db = Database::open_memory().unwrap();
        seed(&db);

        let mut view = ContactView::new();
        view.search(&db, SearchCriteria::new().last_name("smith"))
            .unwrap();
        assert_eq!(view.rows().len(), 2);

        view.add(&db, &ContactInput::new("Al", "Smithers", "4")).unwrap();
        view.add(&db, &ContactInput::new("Cy", "Jones", "5")).unwrap();

        let firsts: Vec<_> = view
            .rows()
            .iter()
            .map(|row| row.summary.first_name.as_str())
            .collect();
        assert_eq!(firsts, vec!["Ann", "Zoe", "Al"]);
    }

    #[test]
    fn test_blank_search_is_full_listing() {
        let db = Database::open_memory().unwrap();
        seed(&db);

        let mut view = ContactView::new();
        view.search(&db, SearchCriteria::new().phone("  ")).unwrap();
        assert_eq!(view.listing(), &Listing::All);
        assert_eq!(view.rows().len(), 3);

        view.search(&db, SearchCriteria::new().first_name("o")).unwrap();
        assert_eq!(view.rows().len(), 2);
        view.clear_search(&db).unwrap();
        assert_eq!(view.rows().len(), 3);
    }

    #[test]
    fn test_failed_mutation_keeps_mapping() {
        let db = Database::open_memory().unwrap();
        seed(&db);

        let mut view = ContactView::new();
        view.show_all(&db).unwrap();
        let bob = key_for(&view, "Bob");

        let err = view
            .edit(&db, bob, &ContactInput::new("Bob", "", "2"))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(view.resolve("show", bob).unwrap(), view.details(&db, bob).unwrap().id);
    }

    #[test]
    fn test_failed_refresh_after_change_leaves_view_stale() {
        let db = Database::open_memory().unwrap();
        seed(&db);

        let mut view = ContactView::new();
        view.show_all(&db).unwrap();
        let bob = key_for(&view, "Bob");
        let zoe = key_for(&view, "Zoe");

        // Every delete leaves behind a row the listing cannot decode
        db.execute_batch(
            "CREATE TEMP TRIGGER poison AFTER DELETE ON contacts BEGIN
                 INSERT INTO contacts (first_name, last_name, phone) VALUES (X'00', 'x', 'x');
             END;",
        )
        .unwrap();

        let deleted = view.delete(&db, bob).unwrap();
        assert!(db.get_contact(deleted).unwrap_err().is_not_found());

        assert!(view.is_stale());
        assert!(view.rows().is_empty());
        assert!(view.mapping().is_empty());
        assert!(matches!(
            view.resolve("update", zoe),
            Err(Error::UnresolvedSelection { op: "update", .. })
        ));
        assert!(view.details(&db, zoe).unwrap_err().is_not_found());

        // Still broken: the view stays stale
        assert!(view.refresh(&db).is_err());
        assert!(view.is_stale());

        db.execute_batch(
            "DROP TRIGGER poison;
             DELETE FROM contacts WHERE typeof(first_name) = 'blob';",
        )
        .unwrap();

        view.refresh(&db).unwrap();
        assert!(!view.is_stale());
        assert_eq!(view.mapping().len(), 2);
        let zoe = key_for(&view, "Zoe");
        assert_eq!(view.details(&db, zoe).unwrap().first_name, "Zoe");
    }
}
