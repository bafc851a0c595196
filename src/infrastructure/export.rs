use crate::domain::{DomainError, DomainResult};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const CSV_MIME_TYPE: &str = "text/csv";

/// `applications_<YYYY-MM-DD>.csv` for the day the export happens.
pub fn export_filename(date: NaiveDate) -> String {
    format!("applications_{}.csv", date.format("%Y-%m-%d"))
}

/// Saves exported CSV documents into a directory.
#[derive(Debug, Clone)]
pub struct CsvFileSaver {
    directory: PathBuf,
}

impl CsvFileSaver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Writes `contents` under the dated export filename, replacing any
    /// earlier export from the same day, and returns the written path.
    pub fn save(&self, contents: &str, date: NaiveDate) -> DomainResult<PathBuf> {
        let path = self.directory.join(export_filename(date));
        fs::create_dir_all(&self.directory)
            .and_then(|_| fs::write(&path, contents))
            .map_err(|e| DomainError::Export(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), bytes = contents.len(), mime = CSV_MIME_TYPE, "exported applications");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(date(2024, 9, 5)), "applications_2024-09-05.csv");
        assert_eq!(export_filename(date(2025, 12, 31)), "applications_2025-12-31.csv");
    }

    #[test]
    fn test_save_writes_dated_file() {
        let dir = TempDir::new().unwrap();
        let saver = CsvFileSaver::new(dir.path().join("exports"));

        let path = saver.save("ID,Name\n1,A\n", date(2024, 10, 1)).unwrap();

        assert_eq!(path, dir.path().join("exports").join("applications_2024-10-01.csv"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "ID,Name\n1,A\n");
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let saver = CsvFileSaver::new(&blocker);
        assert!(matches!(saver.save("data", date(2024, 10, 1)), Err(DomainError::Export(_))));
    }
}
