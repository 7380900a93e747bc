//! Stored campaign records and the creation-time draft builder
use super::dates::{CalendarDay, TimeStamp};
use super::error::ValidationError;
use super::hierarchy::ScopeLevel;
use super::status::{CampaignState, resolve_active};
use super::utils;
use chrono::Utc;

/// One hierarchy placement a campaign was created under.
#[derive(Debug, PartialEq, Eq, Clone, minicbor::Encode, minicbor::Decode)]
pub struct ScopePlacement {
    #[n(0)]
    pub scope_id: String,
    #[n(1)]
    pub level: ScopeLevel,
    #[n(2)]
    pub level_id: String,
}

#[derive(Debug, PartialEq, Eq, Clone, minicbor::Encode, minicbor::Decode)]
pub struct CampaignRecord {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub description: Option<String>,
    #[n(3)]
    pub start_date: CalendarDay,
    #[n(4)]
    pub end_date: Option<CalendarDay>,
    /// Administrator override; `Some(false)` ends the campaign early.
    #[n(5)]
    pub explicit_active: Option<bool>,
    #[n(6)]
    pub creator_id: String,
    #[n(7)]
    pub scopes: Vec<ScopePlacement>,
    #[n(8)]
    pub created_at: TimeStamp<Utc>,
    #[n(9)]
    pub updated_at: TimeStamp<Utc>,
}

impl CampaignRecord {
    pub fn state(&self, today: CalendarDay) -> CampaignState {
        resolve_active(self.explicit_active, self.end_date, today)
    }

    pub fn is_creator(&self, viewer_id: &str) -> bool {
        self.creator_id == viewer_id
    }
}

// Used for constructing campaigns before they get an id
#[derive(Debug, Default)]
pub struct CampaignDraft {
    name: Option<String>,
    description: Option<String>,
    start_date: Option<CalendarDay>,
    end_date: Option<CalendarDay>,
    placements: Vec<(ScopeLevel, String)>,
}

impl CampaignDraft {
    /// Construct a new draft, the basis for a campaign
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
    pub fn set_start_date(mut self, date: CalendarDay) -> Self {
        self.start_date = Some(date);
        self
    }
    pub fn set_end_date(mut self, date: CalendarDay) -> Self {
        self.end_date = Some(date);
        self
    }
    pub fn add_placement(mut self, level: ScopeLevel, level_id: &str) -> Self {
        self.placements.push((level, level_id.to_string()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn start_date(&self) -> Option<CalendarDay> {
        self.start_date
    }
    pub fn end_date(&self) -> Option<CalendarDay> {
        self.end_date
    }

    /// Checks the predicate `start <= end`. An open end date passes.
    pub fn validate_dates(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    /// Checks fields, performs validation, and produces the stored record.
    pub fn finalise(self, creator_id: String) -> anyhow::Result<CampaignRecord> {
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(ValidationError::MissingName.into()),
        };
        let start_date = self
            .start_date
            .ok_or(ValidationError::MissingStartDate)?;
        if !self.validate_dates() {
            return Err(ValidationError::EndBeforeStart.into());
        }
        if self.placements.is_empty() {
            return Err(ValidationError::NoScopes.into());
        }

        let mut scopes = Vec::with_capacity(self.placements.len());
        for (level, level_id) in self.placements {
            scopes.push(ScopePlacement {
                scope_id: utils::new_scope_id()?,
                level,
                level_id,
            });
        }

        let now = TimeStamp::new();
        Ok(CampaignRecord {
            id: utils::new_campaign_id()?,
            name,
            description: self.description,
            start_date,
            end_date: self.end_date,
            explicit_active: None,
            creator_id,
            scopes,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_record_cbor_roundtrip() {
        let record = CampaignDraft::new()
            .set_name("Door to door drive")
            .set_start_date(CalendarDay::from_ymd(2025, 5, 1))
            .set_end_date(CalendarDay::from_ymd(2025, 5, 31))
            .add_placement(ScopeLevel::District, "district-12")
            .finalise("user_creator".to_string())
            .unwrap();

        let encoding = minicbor::to_vec(&record).unwrap();
        let decoded: CampaignRecord = minicbor::decode(&encoding).unwrap();

        assert_eq!(record, decoded);
    }

    #[test]
    fn finalise_rejects_end_before_start() {
        let result = CampaignDraft::new()
            .set_name("Backwards window")
            .set_start_date(CalendarDay::from_ymd(2025, 5, 31))
            .set_end_date(CalendarDay::from_ymd(2025, 5, 1))
            .add_placement(ScopeLevel::Block, "block-3")
            .finalise("user_creator".to_string());

        assert!(result.is_err());
    }

    #[test]
    fn finalise_requires_a_placement() {
        let result = CampaignDraft::new()
            .set_name("No placements")
            .set_start_date(CalendarDay::from_ymd(2025, 5, 1))
            .finalise("user_creator".to_string());

        assert!(result.is_err());
    }
}
