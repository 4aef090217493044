use serde::{Deserialize, Serialize};

/// Where a directory entry came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    #[default]
    UserSubmitted,
    Official,
}

/// Moderation state of a directory entry or a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

/// Issue categories a user can report against an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportIssue {
    Closed,
    WrongHours,
    WrongLocation,
    AccessChanged,
    Other,
}

impl std::fmt::Display for ReportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportIssue::Closed => write!(f, "CLOSED"),
            ReportIssue::WrongHours => write!(f, "WRONG_HOURS"),
            ReportIssue::WrongLocation => write!(f, "WRONG_LOCATION"),
            ReportIssue::AccessChanged => write!(f, "ACCESS_CHANGED"),
            ReportIssue::Other => write!(f, "OTHER"),
        }
    }
}

/// A directory entry as read back from the backend.
///
/// `hours` keeps the raw, untrusted hours value exactly as stored; it is
/// normalized on every read and never cached in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_accessible: bool,
    #[serde(default)]
    pub has_changing_tables: bool,
    #[serde(default)]
    pub requires_key: bool,
    #[serde(default)]
    pub source: EntrySource,
    #[serde(default)]
    pub rating_count: u32,
    /// Sum of all submitted ratings.
    #[serde(default)]
    pub total_rating: u32,
    #[serde(default)]
    pub status: VerificationStatus,
    #[serde(default)]
    pub hours: Option<serde_json::Value>,
}

impl Facility {
    /// Mean rating, or `0.0` when the entry has not been rated yet.
    #[must_use]
    pub fn average_rating(&self) -> f64 {
        if self.rating_count == 0 {
            0.0
        } else {
            f64::from(self.total_rating) / f64::from(self.rating_count)
        }
    }
}
