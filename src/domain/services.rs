//! Application review services.
//!
//! [`ApplicationStore`] owns the ordered record collection, keeps it in
//! sync with a [`KeyValueStore`] backend and derives statistics and CSV
//! documents from it.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, warn};

use super::errors::{DomainError, DomainResult};
use super::models::{seed_records, ApplicationRecord, ApplicationStatus, Statistics, StatusChange};

/// Key under which the serialized record sequence is stored.
pub const STORAGE_KEY: &str = "applicationData";

/// Column headers of the exported CSV document, in order.
pub const CSV_HEADERS: [&str; 10] = [
    "ID",
    "Name",
    "Roll Number",
    "Contact",
    "Team Preference",
    "Qualifications",
    "Event Idea",
    "Portfolio",
    "Status",
    "Applied Date",
];

/// A string key-value backend, the equivalent of browser local storage.
///
/// Writes replace the whole value of a key and are expected to be atomic
/// per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> DomainResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> DomainResult<()>;
}

/// How [`ApplicationStore::load`] populated the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Records were read back from storage.
    Restored(usize),
    /// Nothing was stored yet; the seed set was written.
    Seeded,
    /// Stored data could not be decoded and was replaced by the seed set.
    Reseeded,
}

/// A checkbox intent coming from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusToggle {
    pub id: u64,
    pub status: ApplicationStatus,
    pub checked: bool,
}

impl StatusToggle {
    /// Builds a toggle from an untyped status name, rejecting unknown names.
    pub fn parse(id: u64, status: &str, checked: bool) -> DomainResult<Self> {
        Ok(Self {
            id,
            status: status.parse()?,
            checked,
        })
    }

    /// Status the record ends up with: the toggled status when checked,
    /// otherwise back to `New`.
    pub fn target_status(&self) -> ApplicationStatus {
        if self.checked {
            self.status
        } else {
            ApplicationStatus::New
        }
    }
}

pub type ChangeListener = Box<dyn FnMut(&StatusChange)>;

/// Sole owner of the application records and their persistence.
///
/// # Examples
///
/// ```
/// use shortlist::domain::{ApplicationStatus, ApplicationStore};
/// use shortlist::infrastructure::MemoryStorage;
///
/// let mut store = ApplicationStore::open(MemoryStorage::default()).unwrap();
/// store.update_status(2, ApplicationStatus::Shortlisted).unwrap();
///
/// let stats = store.compute_statistics();
/// assert_eq!(stats.total, 4);
/// assert_eq!(stats.shortlisted, 1);
/// ```
pub struct ApplicationStore<S: KeyValueStore> {
    storage: S,
    records: Vec<ApplicationRecord>,
    listeners: Vec<ChangeListener>,
}

impl<S: KeyValueStore> fmt::Debug for ApplicationStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationStore")
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: KeyValueStore> ApplicationStore<S> {
    /// Creates an empty store over `storage`. Call [`load`](Self::load)
    /// before use.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            records: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Creates a store and immediately loads it.
    pub fn open(storage: S) -> DomainResult<Self> {
        let mut store = Self::new(storage);
        store.load()?;
        Ok(store)
    }

    /// Replaces the in-memory records with the stored ones.
    ///
    /// Seeds and persists the fixed record set when nothing is stored.
    /// Corrupt data is discarded and reseeded rather than returned as an
    /// error; only storage failures propagate.
    pub fn load(&mut self) -> DomainResult<LoadOutcome> {
        match self.storage.get(STORAGE_KEY)? {
            Some(payload) => match decode_records(&payload) {
                Ok(records) => {
                    let count = records.len();
                    self.records = records;
                    info!(count, "restored applications from storage");
                    Ok(LoadOutcome::Restored(count))
                }
                Err(err) => {
                    warn!(error = %err, "discarding stored applications and reseeding");
                    self.seed()?;
                    Ok(LoadOutcome::Reseeded)
                }
            },
            None => {
                self.seed()?;
                info!(count = self.records.len(), "seeded applications on first run");
                Ok(LoadOutcome::Seeded)
            }
        }
    }

    fn seed(&mut self) -> DomainResult<()> {
        self.records = seed_records();
        self.save()
    }

    /// Writes the full record sequence under [`STORAGE_KEY`].
    pub fn save(&mut self) -> DomainResult<()> {
        let payload = serde_json::to_string(&self.records)
            .map_err(|e| DomainError::Storage(format!("Serialization failed: {}", e)))?;
        self.storage.set(STORAGE_KEY, &payload).inspect_err(|err| {
            tracing::error!(error = %err, "failed to persist applications");
        })?;
        debug!(bytes = payload.len(), "persisted applications");
        Ok(())
    }

    /// Sets the status of the record with `id` and persists the collection.
    ///
    /// Returns `Ok(None)` without touching storage when no record has that
    /// id. On a storage failure the in-memory change is kept and the error
    /// is returned.
    pub fn update_status(
        &mut self,
        id: u64,
        status: ApplicationStatus,
    ) -> DomainResult<Option<StatusChange>> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            warn!(id, %status, "ignoring status update for unknown application");
            return Ok(None);
        };

        let change = StatusChange {
            id,
            previous: record.status,
            current: status,
        };
        record.status = status;
        self.save()?;

        info!(id, previous = %change.previous, current = %change.current, "application status updated");
        for listener in &mut self.listeners {
            listener(&change);
        }
        Ok(Some(change))
    }

    /// Applies a checkbox intent from the presentation layer.
    pub fn apply_toggle(&mut self, toggle: StatusToggle) -> DomainResult<Option<StatusChange>> {
        self.update_status(toggle.id, toggle.target_status())
    }

    /// Registers a listener invoked after every applied status change.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&StatusChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn compute_statistics(&self) -> Statistics {
        Statistics::from_records(&self.records)
    }

    /// Renders all records as a CSV document, see [`CsvExporter`].
    pub fn export_csv(&self) -> DomainResult<String> {
        CsvExporter::to_csv(&self.records)
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&ApplicationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn decode_records(payload: &str) -> DomainResult<Vec<ApplicationRecord>> {
    let records: Vec<ApplicationRecord> =
        serde_json::from_str(payload).map_err(|e| DomainError::CorruptData(e.to_string()))?;

    let mut seen = HashSet::new();
    if let Some(dup) = records.iter().find(|r| !seen.insert(r.id)) {
        return Err(DomainError::CorruptData(format!("duplicate application id {}", dup.id)));
    }
    Ok(records)
}

/// Builds CSV documents from application records.
pub struct CsvExporter;

impl CsvExporter {
    /// Produces a header row followed by one row per record.
    ///
    /// Fields are quoted only when they contain a comma, a quote or a line
    /// break; embedded quotes are doubled. The applied date column holds
    /// the UTC date as `YYYY-MM-DD`.
    pub fn to_csv(records: &[ApplicationRecord]) -> DomainResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADERS).map_err(export_error)?;
        for record in records {
            writer
                .write_record([
                    record.id.to_string(),
                    record.name.clone(),
                    record.roll_number.clone(),
                    record.contact.clone(),
                    record.team.clone(),
                    record.qualification.clone(),
                    record.event_idea.clone(),
                    record.portfolio.clone(),
                    record.status.to_string(),
                    record.applied_date().format("%Y-%m-%d").to_string(),
                ])
                .map_err(export_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DomainError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DomainError::Export(e.to_string()))
    }
}

fn export_error(err: csv::Error) -> DomainError {
    DomainError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seeded_store() -> ApplicationStore<MemoryStorage> {
        ApplicationStore::open(MemoryStorage::default()).unwrap()
    }

    fn statuses(store: &ApplicationStore<MemoryStorage>) -> Vec<ApplicationStatus> {
        store.records().iter().map(|r| r.status).collect()
    }

    #[test]
    fn test_first_load_seeds_and_persists() {
        let mut store = ApplicationStore::new(MemoryStorage::default());
        assert_eq!(store.load(), Ok(LoadOutcome::Seeded));
        assert_eq!(store.records().len(), 4);
        assert!(store.storage().get(STORAGE_KEY).unwrap().is_some());
        assert_eq!(store.storage().write_count(), 1);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = seeded_store();
        store.update_status(1, ApplicationStatus::Rejected).unwrap();
        store.update_status(3, ApplicationStatus::Shortlisted).unwrap();

        let storage = store.storage().clone();
        let mut reopened = ApplicationStore::new(storage);
        assert_eq!(reopened.load(), Ok(LoadOutcome::Restored(4)));
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn test_load_does_not_write_existing_data() {
        let store = seeded_store();
        let storage = store.storage().clone();
        let writes = storage.write_count();

        let reopened = ApplicationStore::open(storage).unwrap();
        assert_eq!(reopened.storage().write_count(), writes);
    }

    #[test]
    fn test_corrupt_data_is_reseeded() {
        let mut storage = MemoryStorage::default();
        storage.set(STORAGE_KEY, "{not json").unwrap();

        let mut store = ApplicationStore::new(storage);
        assert_eq!(store.load(), Ok(LoadOutcome::Reseeded));
        assert_eq!(store.records(), seed_records().as_slice());

        let stored = store.storage().get(STORAGE_KEY).unwrap().unwrap();
        assert!(decode_records(&stored).is_ok());
    }

    #[test]
    fn test_offset_less_timestamps_keep_decisions() {
        let payload = r#"[
            {"id":1,"timestamp":"2024-09-20T10:30:00Z","name":"Arjun Kumar","rollNumber":"21BCE1234","contact":"9876543210","team":"Tech Team","status":"Shortlisted"},
            {"id":2,"timestamp":"2024-09-21T14:15:00","name":"Priya Sharma","rollNumber":"21BME5678","contact":"9123456789","team":"Design Team","status":"Rejected"}
        ]"#;
        let mut storage = MemoryStorage::default();
        storage.set(STORAGE_KEY, payload).unwrap();

        let mut store = ApplicationStore::new(storage);
        assert_eq!(store.load(), Ok(LoadOutcome::Restored(2)));
        assert_eq!(
            statuses(&store),
            vec![ApplicationStatus::Shortlisted, ApplicationStatus::Rejected]
        );
        assert_eq!(store.get(2).unwrap().applied_date().to_string(), "2024-09-21");

        store.update_status(1, ApplicationStatus::New).unwrap();
        let stored = store.storage().get(STORAGE_KEY).unwrap().unwrap();
        assert!(stored.contains("\"timestamp\":\"2024-09-21T14:15:00\""));
        assert!(stored.contains("\"status\":\"Rejected\""));
    }

    #[test]
    fn test_unknown_stored_status_is_corrupt() {
        let payload = r#"[{"id":1,"timestamp":"2024-09-20T10:30:00Z","name":"A","rollNumber":"R","contact":"C","team":"T","status":"Maybe"}]"#;
        assert!(matches!(decode_records(payload), Err(DomainError::CorruptData(_))));
    }

    #[test]
    fn test_duplicate_ids_are_corrupt() {
        let mut records = seed_records();
        records[1].id = 1;
        let payload = serde_json::to_string(&records).unwrap();
        assert!(matches!(decode_records(&payload), Err(DomainError::CorruptData(_))));
    }

    #[test]
    fn test_seed_statistics() {
        let store = seeded_store();
        assert_eq!(
            store.compute_statistics(),
            Statistics { total: 4, new: 4, shortlisted: 0, rejected: 0 }
        );
    }

    #[test]
    fn test_shortlist_then_reject() {
        let mut store = seeded_store();

        store.update_status(2, ApplicationStatus::Shortlisted).unwrap();
        assert_eq!(
            store.compute_statistics(),
            Statistics { total: 4, new: 3, shortlisted: 1, rejected: 0 }
        );

        let change = store.update_status(2, ApplicationStatus::Rejected).unwrap();
        assert_eq!(
            change,
            Some(StatusChange {
                id: 2,
                previous: ApplicationStatus::Shortlisted,
                current: ApplicationStatus::Rejected,
            })
        );
        assert_eq!(
            statuses(&store),
            vec![
                ApplicationStatus::New,
                ApplicationStatus::Rejected,
                ApplicationStatus::New,
                ApplicationStatus::New,
            ]
        );
    }

    #[test]
    fn test_update_status_is_idempotent() {
        let mut once = seeded_store();
        once.update_status(4, ApplicationStatus::Shortlisted).unwrap();

        let mut twice = seeded_store();
        twice.update_status(4, ApplicationStatus::Shortlisted).unwrap();
        twice.update_status(4, ApplicationStatus::Shortlisted).unwrap();

        assert_eq!(once.records(), twice.records());
        assert_eq!(
            once.storage().get(STORAGE_KEY).unwrap(),
            twice.storage().get(STORAGE_KEY).unwrap()
        );
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let mut store = seeded_store();
        let writes = store.storage().write_count();

        assert_eq!(store.update_status(999, ApplicationStatus::Shortlisted), Ok(None));
        assert_eq!(statuses(&store), vec![ApplicationStatus::New; 4]);
        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_statistics_always_sum_to_total() {
        let mut store = seeded_store();
        let steps = [
            (1, ApplicationStatus::Shortlisted),
            (2, ApplicationStatus::Rejected),
            (1, ApplicationStatus::New),
            (3, ApplicationStatus::Rejected),
            (4, ApplicationStatus::Shortlisted),
            (2, ApplicationStatus::Rejected),
        ];

        for (id, status) in steps {
            store.update_status(id, status).unwrap();
            let stats = store.compute_statistics();
            assert_eq!(stats.new + stats.shortlisted + stats.rejected, stats.total);
        }
    }

    #[test]
    fn test_storage_failure_propagates() {
        let store = seeded_store();
        let payload_len = store.storage().get(STORAGE_KEY).unwrap().unwrap().len();

        // "Shortlisted" is longer than "New", so the next write exceeds the quota.
        let storage = store.storage().clone().with_quota(payload_len);
        let mut store = ApplicationStore::open(storage).unwrap();

        let result = store.update_status(1, ApplicationStatus::Shortlisted);
        assert!(matches!(result, Err(DomainError::Storage(_))));
        assert_eq!(store.get(1).unwrap().status, ApplicationStatus::Shortlisted);
    }

    #[test]
    fn test_toggle_mapping() {
        let checked = StatusToggle::parse(3, "Rejected", true).unwrap();
        assert_eq!(checked.target_status(), ApplicationStatus::Rejected);

        let unchecked = StatusToggle::parse(3, "Rejected", false).unwrap();
        assert_eq!(unchecked.target_status(), ApplicationStatus::New);

        assert_eq!(
            StatusToggle::parse(3, "Accepted", true),
            Err(DomainError::UnknownStatus("Accepted".to_string()))
        );
    }

    #[test]
    fn test_apply_toggle() {
        let mut store = seeded_store();

        store.apply_toggle(StatusToggle { id: 1, status: ApplicationStatus::Shortlisted, checked: true }).unwrap();
        assert_eq!(store.get(1).unwrap().status, ApplicationStatus::Shortlisted);

        store.apply_toggle(StatusToggle { id: 1, status: ApplicationStatus::Shortlisted, checked: false }).unwrap();
        assert_eq!(store.get(1).unwrap().status, ApplicationStatus::New);
    }

    #[test]
    fn test_listeners_receive_changes() {
        let mut store = seeded_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |change| sink.borrow_mut().push(*change));

        store.update_status(2, ApplicationStatus::Shortlisted).unwrap();
        store.update_status(999, ApplicationStatus::Rejected).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, 2);
        assert_eq!(seen[0].current, ApplicationStatus::Shortlisted);
    }

    #[test]
    fn test_csv_header_and_rows() {
        let store = seeded_store();
        let csv = store.export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "ID,Name,Roll Number,Contact,Team Preference,Qualifications,Event Idea,Portfolio,Status,Applied Date"
        );
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("2,Priya Sharma,21BME5678,9123456789,Design Team,"));
        assert!(lines[2].ends_with(",,https://dribbble.com/priyasharma,New,2024-09-21"));
        assert!(lines[3].ends_with(",,New,2024-09-22"));
    }

    #[test]
    fn test_csv_quotes_commas_and_quotes() {
        let mut records = seed_records();
        records[0].qualification = "He said \"hi\"".to_string();

        let csv = CsvExporter::to_csv(&records).unwrap();
        let first_row = csv.lines().nth(1).unwrap();

        assert!(first_row.contains(",\"He said \"\"hi\"\"\","));
        // Priya's qualification contains commas.
        assert!(csv.contains("\"Skilled in UI/UX design, Adobe Creative Suite, and Figma."));
    }

    #[test]
    fn test_csv_quotes_line_breaks() {
        let mut records = seed_records();
        records.truncate(1);
        records[0].event_idea = "line one\nline two".to_string();

        let csv = CsvExporter::to_csv(&records).unwrap();
        assert!(csv.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_csv_reflects_status_changes() {
        let mut store = seeded_store();
        store.update_status(4, ApplicationStatus::Rejected).unwrap();

        let csv = store.export_csv().unwrap();
        assert!(csv.lines().nth(4).unwrap().ends_with(",Rejected,2024-09-23"));
    }
}
