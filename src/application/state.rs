//! Application state for the review dashboard.
//!
//! Holds the store, the current selection and UI mode, and turns user
//! intents into store calls.

use crate::domain::{
    ApplicationRecord, ApplicationStatus, ApplicationStore, KeyValueStore, Statistics, StatusToggle,
};
use crate::infrastructure::{CsvFileSaver, FileStorage};
use chrono::{NaiveDate, Utc};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing applications and toggling their status
    Normal,
    /// Help screen is displayed
    Help,
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use shortlist::application::App;
/// use shortlist::domain::ApplicationStore;
/// use shortlist::infrastructure::{CsvFileSaver, MemoryStorage};
///
/// let store = ApplicationStore::open(MemoryStorage::default()).unwrap();
/// let app = App::new(store, CsvFileSaver::new("."));
/// assert_eq!(app.selected, 0);
/// assert_eq!(app.statistics().total, 4);
/// ```
#[derive(Debug)]
pub struct App<S: KeyValueStore = FileStorage> {
    pub store: ApplicationStore<S>,
    /// Index of the highlighted record
    pub selected: usize,
    pub mode: AppMode,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Result of the last action, shown in the status bar
    pub status_message: Option<String>,
    saver: CsvFileSaver,
    session_changes: Rc<Cell<usize>>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(mut store: ApplicationStore<S>, saver: CsvFileSaver) -> Self {
        let session_changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&session_changes);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        Self {
            store,
            selected: 0,
            mode: AppMode::Normal,
            help_scroll: 0,
            status_message: None,
            saver,
            session_changes,
        }
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        self.store.records()
    }

    pub fn selected_record(&self) -> Option<&ApplicationRecord> {
        self.store.records().get(self.selected)
    }

    pub fn statistics(&self) -> Statistics {
        self.store.compute_statistics()
    }

    /// Status changes applied since the dashboard was opened.
    pub fn session_changes(&self) -> usize {
        self.session_changes.get()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.records().len().saturating_sub(1);
    }

    /// Whether the checkbox for `status` is ticked on the selected record.
    pub fn is_checked(&self, status: ApplicationStatus) -> bool {
        self.selected_record()
            .is_some_and(|record| record.status == status)
    }

    /// Flips the `status` checkbox of the selected record.
    ///
    /// Ticking one box implicitly clears the other, since a record holds a
    /// single status; clearing a box returns the record to `New`.
    pub fn toggle_selected(&mut self, status: ApplicationStatus) {
        let Some(id) = self.selected_record().map(|record| record.id) else {
            return;
        };

        let toggle = StatusToggle {
            id,
            status,
            checked: !self.is_checked(status),
        };
        self.handle_toggle(toggle);
    }

    pub fn handle_toggle(&mut self, toggle: StatusToggle) {
        self.status_message = match self.store.apply_toggle(toggle) {
            Ok(Some(change)) => {
                let name = self
                    .store
                    .get(change.id)
                    .map(|record| record.name.as_str())
                    .unwrap_or("Application");
                Some(format!("{} marked {}", name, change.current))
            }
            Ok(None) => Some(format!("No application with id {}", toggle.id)),
            Err(error) => Some(format!("Save failed: {}", error)),
        };
    }

    /// Exports all records as CSV, dated with today's UTC date.
    pub fn export_csv(&mut self) {
        self.export_csv_on(Utc::now().date_naive());
    }

    pub fn export_csv_on(&mut self, date: NaiveDate) {
        let result = self
            .store
            .export_csv()
            .and_then(|contents| self.saver.save(&contents, date));
        self.set_csv_export_result(result.map_err(|e| e.to_string()));
    }

    pub fn set_csv_export_result(&mut self, result: Result<PathBuf, String>) {
        self.status_message = Some(match result {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(error) => format!("Export failed: {}", error),
        });
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}
