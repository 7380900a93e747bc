//! Field-activity reports and image-field normalization
use super::dates::{CalendarDay, TimeStamp};
use super::error::ValidationError;
use chrono::Utc;

pub const MAX_REPORT_IMAGES: usize = 10;

#[derive(Debug, PartialEq, Eq, Clone, minicbor::Encode, minicbor::Decode)]
pub struct ReportRecord {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub campaign_id: String,
    #[n(2)]
    pub acceptance_id: String,
    #[n(3)]
    pub reporter_name: String,
    #[n(4)]
    pub reporter_phone: String,
    #[n(5)]
    pub attendee_count: u32,
    #[n(6)]
    pub report_date: CalendarDay,
    #[n(7)]
    pub description: Option<String>,
    #[n(8)]
    pub images: Vec<String>,
    #[n(9)]
    pub filed_by: String,
    #[n(10)]
    pub created_at: TimeStamp<Utc>,
    #[n(11)]
    pub updated_at: TimeStamp<Utc>,
    /// Backend soft-delete marker, carried for display only.
    #[n(12)]
    pub is_deleted: bool,
}

// Used for constructing reports before they get an id
#[derive(Debug, Default)]
pub struct ReportDraft {
    reporter_name: Option<String>,
    reporter_phone: Option<String>,
    attendee_count: u32,
    report_date: Option<CalendarDay>,
    description: Option<String>,
    images: Vec<String>,
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_reporter_name(mut self, name: &str) -> Self {
        self.reporter_name = Some(name.to_string());
        self
    }
    pub fn set_reporter_phone(mut self, phone: &str) -> Self {
        self.reporter_phone = Some(phone.to_string());
        self
    }
    pub fn set_attendee_count(mut self, count: u32) -> Self {
        self.attendee_count = count;
        self
    }
    pub fn set_report_date(mut self, date: CalendarDay) -> Self {
        self.report_date = Some(date);
        self
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
    pub fn add_image(mut self, reference: &str) -> Self {
        self.images.push(reference.to_string());
        self
    }
    pub fn set_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.reporter_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {}
            _ => return Err(ValidationError::MissingReporterName),
        }
        match self.reporter_phone.as_deref().map(str::trim) {
            Some(phone) if !phone.is_empty() => {}
            _ => return Err(ValidationError::MissingReporterPhone),
        }
        if self.report_date.is_none() {
            return Err(ValidationError::MissingReportDate);
        }
        if self.images.len() > MAX_REPORT_IMAGES {
            return Err(ValidationError::TooManyImages(MAX_REPORT_IMAGES));
        }
        Ok(())
    }

    /// Checks fields, performs validation, and produces the stored record.
    pub fn finalise(
        self,
        id: String,
        campaign_id: String,
        acceptance_id: String,
        filed_by: String,
    ) -> anyhow::Result<ReportRecord> {
        self.validate()?;

        let now = TimeStamp::new();
        Ok(ReportRecord {
            id,
            campaign_id,
            acceptance_id,
            reporter_name: self.reporter_name.unwrap_or_default(),
            reporter_phone: self.reporter_phone.unwrap_or_default(),
            attendee_count: self.attendee_count,
            report_date: self.report_date.expect("checked by validate"),
            description: self.description,
            images: self.images,
            filed_by,
            created_at: now.clone(),
            updated_at: now,
            is_deleted: false,
        })
    }

    /// Replace an existing report's fields in place, keeping its identity
    /// and appending new images after the retained ones. `updated_at` is
    /// refreshed; `created_at` is not.
    pub fn apply_to(
        self,
        mut record: ReportRecord,
        existing_images: Vec<String>,
    ) -> anyhow::Result<ReportRecord> {
        let mut combined = existing_images;
        combined.extend(self.images.iter().cloned());
        let merged = Self {
            images: combined,
            ..self
        };
        merged.validate()?;

        record.reporter_name = merged.reporter_name.unwrap_or_default();
        record.reporter_phone = merged.reporter_phone.unwrap_or_default();
        record.attendee_count = merged.attendee_count;
        record.report_date = merged.report_date.expect("checked by validate");
        record.description = merged.description;
        record.images = merged.images;
        record.updated_at = TimeStamp::new();
        Ok(record)
    }
}

/// Flatten the backend's assorted image-field encodings into a plain list.
///
/// Defined, total parsing order: array passthrough, then JSON array in a
/// string, then a bare URL string wrapped as a single entry, then empty for
/// null or anything else.
pub fn normalize_image_list(raw: &serde_json::Value) -> Vec<String> {
    match raw {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        serde_json::Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            if let Ok(parsed) = serde_json::from_str::<Vec<String>>(trimmed) {
                return parsed;
            }
            vec![trimmed.to_string()]
        }
        serde_json::Value::Null => Vec::new(),
        other => {
            tracing::debug!(value = %other, "unexpected image field shape");
            Vec::new()
        }
    }
}
