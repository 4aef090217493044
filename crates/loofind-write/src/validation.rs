//! Payload validation for the three write operations.
//!
//! Validators never fail: every violated rule is collected in field order,
//! and a sanitized copy of every text field is returned whether or not the
//! payload passed.

use loofind_core::ReportIssue;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::sanitize::sanitize_text;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_ADDRESS_CHARS: usize = 200;
pub const MAX_NOTES_CHARS: usize = 1000;
pub const MAX_COMMENT_CHARS: usize = 1000;
pub const MAX_DETAILS_CHARS: usize = 1000;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_CHARS: usize = 30;

/// Terms rejected anywhere in user text (case-insensitive substring match).
pub const BLOCKED_TERMS: &[&str] = &[
    "viagra",
    "casino",
    "porn",
    "free money",
    "click here",
    "buy followers",
];

/// A new directory entry as submitted by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_wheelchair_accessible: bool,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub entry_id: String,
    pub rating: f64,
    pub comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub entry_id: String,
    pub issue: ReportIssue,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedEntry {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_wheelchair_accessible: bool,
    /// `None` when absent or invalid.
    pub rating: Option<u8>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedReview {
    pub entry_id: String,
    /// `None` only when the submitted rating was invalid.
    pub rating: Option<u8>,
    pub comment: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedReport {
    pub entry_id: String,
    pub issue: ReportIssue,
    pub details: String,
}

/// Outcome of validating one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult<T> {
    pub errors: Vec<FieldError>,
    pub sanitized: T,
}

impl<T> ValidationResult<T> {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The sanitized payload when valid, otherwise every collected error.
    ///
    /// # Errors
    ///
    /// Returns the collected [`FieldError`]s when at least one rule failed.
    pub fn into_result(self) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(self.sanitized)
        } else {
            Err(self.errors)
        }
    }
}

#[must_use]
pub fn contains_blocked_term(text: &str) -> bool {
    let lowered = text.to_lowercase();
    BLOCKED_TERMS.iter().any(|term| lowered.contains(term))
}

#[must_use]
pub fn validate_submission(entry: &NewEntry) -> ValidationResult<SanitizedEntry> {
    let mut errors = Vec::new();

    check_text(&mut errors, "name", "Name", &entry.name, MAX_NAME_CHARS, true);
    check_optional_text(
        &mut errors,
        "description",
        "Description",
        entry.description.as_deref(),
        MAX_DESCRIPTION_CHARS,
    );
    check_optional_text(
        &mut errors,
        "address",
        "Address",
        entry.address.as_deref(),
        MAX_ADDRESS_CHARS,
    );
    check_coordinates(&mut errors, entry.latitude, entry.longitude);
    let rating = entry
        .rating
        .and_then(|rating| check_rating(&mut errors, rating));
    let tags = check_tags(&mut errors, &entry.tags);
    check_optional_text(
        &mut errors,
        "notes",
        "Notes",
        entry.notes.as_deref(),
        MAX_NOTES_CHARS,
    );

    ValidationResult {
        errors,
        sanitized: SanitizedEntry {
            name: sanitize_text(&entry.name),
            description: sanitize_optional(entry.description.as_deref()),
            address: sanitize_optional(entry.address.as_deref()),
            latitude: entry.latitude,
            longitude: entry.longitude,
            is_wheelchair_accessible: entry.is_wheelchair_accessible,
            rating,
            tags,
            notes: sanitize_optional(entry.notes.as_deref()),
        },
    }
}

#[must_use]
pub fn validate_review(review: &NewReview) -> ValidationResult<SanitizedReview> {
    let mut errors = Vec::new();

    check_entry_id(&mut errors, &review.entry_id);
    let rating = check_rating(&mut errors, review.rating);
    check_text(
        &mut errors,
        "comment",
        "Review comment",
        &review.comment,
        MAX_COMMENT_CHARS,
        true,
    );
    let tags = check_tags(&mut errors, &review.tags);

    ValidationResult {
        errors,
        sanitized: SanitizedReview {
            entry_id: review.entry_id.trim().to_owned(),
            rating,
            comment: sanitize_text(&review.comment),
            tags,
        },
    }
}

#[must_use]
pub fn validate_report(report: &NewReport) -> ValidationResult<SanitizedReport> {
    let mut errors = Vec::new();

    check_entry_id(&mut errors, &report.entry_id);
    check_text(
        &mut errors,
        "details",
        "Details",
        &report.details,
        MAX_DETAILS_CHARS,
        true,
    );

    ValidationResult {
        errors,
        sanitized: SanitizedReport {
            entry_id: report.entry_id.trim().to_owned(),
            issue: report.issue,
            details: sanitize_text(&report.details),
        },
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn check_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: &str,
    max_chars: usize,
    required: bool,
) {
    let trimmed = value.trim();
    if required && trimmed.is_empty() {
        errors.push(FieldError::new(field, format!("{label} is required")));
    } else if trimmed.chars().count() > max_chars {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at most {max_chars} characters"),
        ));
    }
    if contains_blocked_text(value) {
        errors.push(FieldError::new(
            field,
            format!("{label} contains inappropriate content"),
        ));
    }
}

fn check_optional_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: Option<&str>,
    max_chars: usize,
) {
    if let Some(value) = value {
        check_text(errors, field, label, value, max_chars, false);
    }
}

fn check_entry_id(errors: &mut Vec<FieldError>, entry_id: &str) {
    if entry_id.trim().is_empty() {
        errors.push(FieldError::new("entryId", "A location must be selected"));
    }
}

fn check_coordinates(errors: &mut Vec<FieldError>, latitude: f64, longitude: f64) {
    // `contains` is false for NaN, so non-finite values are rejected too.
    if !(-90.0..=90.0).contains(&latitude) {
        errors.push(FieldError::new(
            "latitude",
            "Latitude must be between -90 and 90 degrees",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        errors.push(FieldError::new(
            "longitude",
            "Longitude must be between -180 and 180 degrees",
        ));
    }
}

/// Returns the rating as `u8` when it is a whole number in 1..=5.
#[allow(clippy::float_cmp)]
fn check_rating(errors: &mut Vec<FieldError>, rating: f64) -> Option<u8> {
    if (1.0..=5.0).contains(&rating) && rating.fract() == 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        return Some(rating as u8);
    }
    errors.push(FieldError::new(
        "rating",
        "Rating must be a whole number between 1 and 5",
    ));
    None
}

fn check_tags(errors: &mut Vec<FieldError>, tags: &[String]) -> Vec<String> {
    if tags.len() > MAX_TAGS {
        errors.push(FieldError::new(
            "tags",
            format!("No more than {MAX_TAGS} tags are allowed"),
        ));
    }
    if tags
        .iter()
        .any(|tag| !(1..=MAX_TAG_CHARS).contains(&tag.trim().chars().count()))
    {
        errors.push(FieldError::new(
            "tags",
            format!("Each tag must be between 1 and {MAX_TAG_CHARS} characters"),
        ));
    }
    if tags.iter().any(|tag| contains_blocked_text(tag)) {
        errors.push(FieldError::new(
            "tags",
            "One or more tags contain inappropriate content",
        ));
    }

    tags.iter()
        .map(|tag| sanitize_text(tag))
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Checks the raw text and its sanitized form, since markup inside a word
/// disappears on sanitizing.
fn contains_blocked_text(value: &str) -> bool {
    contains_blocked_term(value) || contains_blocked_term(&sanitize_text(value))
}

fn sanitize_optional(value: Option<&str>) -> Option<String> {
    value.map(sanitize_text).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
