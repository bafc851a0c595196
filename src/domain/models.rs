use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::DomainError;

/// Review state of a single application.
///
/// Serialized as the bare variant name, which is also the only spelling
/// accepted by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    New,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::New,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "New",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::UnknownStatus(s.to_string()))
    }
}

/// Submission time of an application.
///
/// Keeps the stored text verbatim so a load/save cycle does not rewrite it.
/// Accepts RFC 3339, then an offset-less date-time (read as UTC), then a
/// bare date (midnight UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    instant: DateTime<Utc>,
}

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        let instant = DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NAIVE_DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                    .map(|naive| naive.and_utc())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })?;

        Some(Self {
            raw: raw.to_string(),
            instant,
        })
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            instant,
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// A candidate's application as submitted.
///
/// Everything except `status` is fixed at creation. Field names are
/// camelCase on the wire to stay compatible with previously stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: u64,
    pub timestamp: Timestamp,
    pub name: String,
    pub roll_number: String,
    pub contact: String,
    pub team: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub event_idea: String,
    #[serde(default)]
    pub portfolio: String,
    #[serde(default)]
    pub status: ApplicationStatus,
}

impl ApplicationRecord {
    /// UTC calendar date the application was submitted on.
    pub fn applied_date(&self) -> NaiveDate {
        self.timestamp.instant().date_naive()
    }

    /// Human readable submission date, e.g. `Sep 20, 2024`.
    pub fn applied_date_display(&self) -> String {
        self.timestamp.instant().format("%b %-d, %Y").to_string()
    }
}

/// Aggregate counts over the record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub new: usize,
    pub shortlisted: usize,
    pub rejected: usize,
}

impl Statistics {
    pub fn from_records(records: &[ApplicationRecord]) -> Self {
        records.iter().fold(
            Statistics {
                total: records.len(),
                ..Statistics::default()
            },
            |mut stats, record| {
                match record.status {
                    ApplicationStatus::New => stats.new += 1,
                    ApplicationStatus::Shortlisted => stats.shortlisted += 1,
                    ApplicationStatus::Rejected => stats.rejected += 1,
                }
                stats
            },
        )
    }
}

/// Emitted after a status mutation has been applied and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub id: u64,
    pub previous: ApplicationStatus,
    pub current: ApplicationStatus,
}

fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
        .into()
}

/// Records written on first run, before anything has been stored.
pub fn seed_records() -> Vec<ApplicationRecord> {
    vec![
        ApplicationRecord {
            id: 1,
            timestamp: utc(2024, 9, 20, 10, 30),
            name: "Arjun Kumar".to_string(),
            roll_number: "21BCE1234".to_string(),
            contact: "9876543210".to_string(),
            team: "Tech Team".to_string(),
            qualification: "Experienced in JavaScript, React, and Node.js. Led multiple projects in college hackathons and have a strong passion for web development.".to_string(),
            event_idea: "A music recommendation app that uses AI to suggest songs based on mood and weather conditions.".to_string(),
            portfolio: "https://arjunkumar.dev".to_string(),
            status: ApplicationStatus::New,
        },
        ApplicationRecord {
            id: 2,
            timestamp: utc(2024, 9, 21, 14, 15),
            name: "Priya Sharma".to_string(),
            roll_number: "21BME5678".to_string(),
            contact: "9123456789".to_string(),
            team: "Design Team".to_string(),
            qualification: "Skilled in UI/UX design, Adobe Creative Suite, and Figma. Created brand identities for 5 startups and have experience in user research.".to_string(),
            event_idea: String::new(),
            portfolio: "https://dribbble.com/priyasharma".to_string(),
            status: ApplicationStatus::New,
        },
        ApplicationRecord {
            id: 3,
            timestamp: utc(2024, 9, 22, 9, 45),
            name: "Vikram Singh".to_string(),
            roll_number: "21BEC9012".to_string(),
            contact: "8765432109".to_string(),
            team: "Marketing Team".to_string(),
            qualification: "Strong background in digital marketing, content creation, and social media management. Managed Instagram accounts with 10K+ followers.".to_string(),
            event_idea: "An interactive campus event where students can showcase their talents through live streaming and voting.".to_string(),
            portfolio: String::new(),
            status: ApplicationStatus::New,
        },
        ApplicationRecord {
            id: 4,
            timestamp: utc(2024, 9, 23, 16, 20),
            name: "Ananya Gupta".to_string(),
            roll_number: "21BCE3456".to_string(),
            contact: "7654321098".to_string(),
            team: "Tech Team".to_string(),
            qualification: "Full-stack developer with expertise in Python, Django, and databases. Built 3 web applications from scratch and contributed to open source projects.".to_string(),
            event_idea: "A collaborative music creation platform where multiple users can contribute to the same song remotely.".to_string(),
            portfolio: "https://github.com/ananyagupta".to_string(),
            status: ApplicationStatus::New,
        },
    ]
}
