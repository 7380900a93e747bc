//! Backend campaign-list payloads and their reconciliation
//!
//! The list endpoint returns one row per `(campaign, scope)` pair, so a
//! campaign the viewer can see through three placements arrives three times.
//! `reconcile` folds those rows back into one record per logical campaign.

use super::acceptance::{MergedAcceptance, ScopeAcceptance, merge_scopes, normalize_acceptance};
use super::dates::{CalendarDay, parse_calendar_day};
use super::hierarchy::ScopeLevel;
use super::status::{CampaignState, resolve_active};
use serde::Deserialize;
use std::collections::HashMap;

/// Backend ids arrive as JSON strings or integers depending on the endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(i64),
    Text(String),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            Self::Num(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// One row of the campaign list fetch, loosely typed on purpose.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCampaignEntry {
    pub id: RawId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_by: Option<RawId>,
    #[serde(default)]
    pub scope_id: Option<RawId>,
    #[serde(default)]
    pub scope_level_type: Option<String>,
    #[serde(default)]
    pub scope_level_id: Option<RawId>,
    #[serde(default)]
    pub acceptance_status: Option<String>,
    #[serde(default)]
    pub acceptance_id: Option<RawId>,
    #[serde(default)]
    pub accepted_at: Option<String>,
    #[serde(default)]
    pub declined_at: Option<String>,
}

/// A deduplicated campaign, resolved for rendering.
#[derive(Debug, Clone)]
pub struct CampaignView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<CalendarDay>,
    pub end_date: Option<CalendarDay>,
    /// Original strings, kept for display even when they fail to parse.
    pub start_date_raw: Option<String>,
    pub end_date_raw: Option<String>,
    pub explicit_active: Option<bool>,
    pub created_by: Option<String>,
    pub scopes: Vec<ScopeAcceptance>,
    pub merged: MergedAcceptance,
}

impl CampaignView {
    pub fn state(&self, today: CalendarDay) -> CampaignState {
        resolve_active(self.explicit_active, self.end_date, today)
    }
}

fn scope_of(entry: &RawCampaignEntry) -> ScopeAcceptance {
    let (status, acceptance_id) = normalize_acceptance(
        entry.acceptance_status.as_deref(),
        entry.acceptance_id.clone().map(RawId::into_string),
    );

    ScopeAcceptance {
        scope_id: entry.scope_id.clone().map(RawId::into_string),
        level: entry.scope_level_type.as_deref().and_then(ScopeLevel::parse),
        level_id: entry.scope_level_id.clone().map(RawId::into_string),
        status,
        acceptance_id,
    }
}

/// Merge repeated per-scope rows into one `CampaignView` per campaign id.
///
/// First-seen order is preserved and the first row of a campaign supplies its
/// descriptive fields; later rows only contribute scopes.
pub fn reconcile(entries: Vec<RawCampaignEntry>) -> Vec<CampaignView> {
    let mut views: Vec<CampaignView> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let campaign_id = entry.id.clone().into_string();
        let scope = scope_of(&entry);

        match index.get(&campaign_id) {
            Some(&at) => views[at].scopes.push(scope),
            None => {
                index.insert(campaign_id.clone(), views.len());
                views.push(CampaignView {
                    id: campaign_id,
                    name: entry.name.unwrap_or_default(),
                    description: entry.description,
                    start_date: entry.start_date.as_deref().and_then(parse_calendar_day),
                    end_date: entry.end_date.as_deref().and_then(parse_calendar_day),
                    start_date_raw: entry.start_date,
                    end_date_raw: entry.end_date,
                    explicit_active: entry.is_active,
                    created_by: entry.created_by.map(RawId::into_string),
                    scopes: vec![scope],
                    merged: MergedAcceptance {
                        status: super::acceptance::AcceptanceStatus::Pending,
                        acceptance_id: None,
                    },
                });
            }
        }
    }

    for view in &mut views {
        view.merged = merge_scopes(&view.scopes);
    }

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptance::AcceptanceStatus;

    fn entry(json: serde_json::Value) -> RawCampaignEntry {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn repeated_rows_collapse_into_one_view() {
        let rows = vec![
            entry(serde_json::json!({
                "id": 7,
                "name": "Voter outreach",
                "endDate": "2099-12-31",
                "scopeId": "s1",
                "scopeLevelType": "District",
                "acceptanceStatus": "declined",
                "acceptanceId": 901,
            })),
            entry(serde_json::json!({
                "id": 7,
                "name": "Voter outreach",
                "scopeId": "s2",
                "scopeLevelType": "Assembly",
                "acceptanceStatus": "accepted",
                "acceptanceId": 902,
            })),
            entry(serde_json::json!({
                "id": "8",
                "name": "Booth survey",
            })),
        ];

        let views = reconcile(rows);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, "7");
        assert_eq!(views[0].scopes.len(), 2);
        assert_eq!(views[0].merged.status, AcceptanceStatus::Accepted);
        assert_eq!(views[0].merged.acceptance_id.as_deref(), Some("902"));
        assert_eq!(views[1].id, "8");
        assert_eq!(views[1].merged.status, AcceptanceStatus::Pending);
    }

    #[test]
    fn bad_end_date_is_kept_for_display_but_not_parsed() {
        let views = reconcile(vec![entry(serde_json::json!({
            "id": 1,
            "name": "Rally",
            "endDate": "soon",
        }))]);

        assert_eq!(views[0].end_date, None);
        assert_eq!(views[0].end_date_raw.as_deref(), Some("soon"));
        // unparseable end date must not hide the campaign
        assert_eq!(
            views[0].state(CalendarDay::from_ymd(2025, 6, 1)),
            CampaignState::Active
        );
    }
}
