//! Documents written by the gateway and the backend contract that stores them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use loofind_core::{EntrySource, ReportIssue, VerificationStatus};
use serde::{Deserialize, Serialize};

use crate::device::DeviceIdentity;
use crate::error::PersistError;
use crate::validation::{SanitizedEntry, SanitizedReport};

/// A user-submitted entry awaiting moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEntryDocument {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_wheelchair_accessible: bool,
    pub rating: Option<u8>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub source: EntrySource,
    pub status: VerificationStatus,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
}

impl PendingEntryDocument {
    #[must_use]
    pub fn new(entry: SanitizedEntry, device: &DeviceIdentity, now: DateTime<Utc>) -> Self {
        Self {
            name: entry.name,
            description: entry.description,
            address: entry.address,
            latitude: entry.latitude,
            longitude: entry.longitude,
            is_wheelchair_accessible: entry.is_wheelchair_accessible,
            rating: entry.rating,
            tags: entry.tags,
            notes: entry.notes,
            source: EntrySource::UserSubmitted,
            status: VerificationStatus::Pending,
            submitted_by: device.to_string(),
            submitted_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDocument {
    pub entry_id: String,
    pub rating: u8,
    pub comment: String,
    pub tags: Vec<String>,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub entry_id: String,
    pub issue: ReportIssue,
    pub details: String,
    pub status: VerificationStatus,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
}

impl ReportDocument {
    #[must_use]
    pub fn new(report: SanitizedReport, device: &DeviceIdentity, now: DateTime<Utc>) -> Self {
        Self {
            entry_id: report.entry_id,
            issue: report.issue,
            details: report.details,
            status: VerificationStatus::Pending,
            device_id: device.to_string(),
            created_at: now,
        }
    }
}

/// Backend create primitive for the three document kinds.
///
/// Each call returns the new document's id. Implementations classify their
/// failures so the gateway can decide what to retry.
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn create_pending_entry(&self, doc: &PendingEntryDocument)
        -> Result<String, PersistError>;

    /// Must fail with [`PersistError::NotFound`] when `doc.entry_id` does not exist.
    async fn add_review(&self, doc: &ReviewDocument) -> Result<String, PersistError>;

    async fn add_report(&self, doc: &ReportDocument) -> Result<String, PersistError>;
}
