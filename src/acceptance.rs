//! Acceptance normalization and cross-scope reconciliation
//!
//! The backend reports a viewer's response to a campaign once per hierarchy
//! placement, in several loosely-typed shapes. This module flattens each
//! placement's raw fields into one three-state status and folds all the
//! placements of a logical campaign into the single status the UI shows.

use super::dates::TimeStamp;
use super::hierarchy::ScopeLevel;
use chrono::Utc;

/// Normalized response state for one scope.
///
/// Variant order is the merge priority: `Declined < Pending < Accepted`.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, minicbor::Encode, minicbor::Decode,
)]
pub enum AcceptanceStatus {
    #[n(0)]
    Declined,
    #[n(1)]
    Pending,
    #[n(2)]
    Accepted,
}

impl AcceptanceStatus {
    /// Total parse of a backend status string. Absence and unrecognised
    /// values both mean the invitation is still unanswered.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Pending,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "accepted" => Self::Accepted,
                "declined" => Self::Declined,
                "pending" | "" => Self::Pending,
                other => {
                    tracing::debug!(value = other, "unrecognised acceptance status");
                    Self::Pending
                }
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declined => "declined",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

/// Map one scope's raw acceptance fields onto `(status, acceptance_id)`.
///
/// Never errors: missing fields are meaningful, not malformed. The id is
/// carried only for an accepted response, or for a declined response that
/// has a record id to reverse later.
pub fn normalize_acceptance(
    raw_status: Option<&str>,
    acceptance_id: Option<String>,
) -> (AcceptanceStatus, Option<String>) {
    let status = AcceptanceStatus::parse(raw_status);
    let id = match status {
        AcceptanceStatus::Accepted | AcceptanceStatus::Declined => acceptance_id,
        AcceptanceStatus::Pending => None,
    };
    (status, id)
}

/// One hierarchy placement of a campaign as the viewer sees it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ScopeAcceptance {
    pub scope_id: Option<String>,
    pub level: Option<ScopeLevel>,
    pub level_id: Option<String>,
    pub status: AcceptanceStatus,
    pub acceptance_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MergedAcceptance {
    pub status: AcceptanceStatus,
    pub acceptance_id: Option<String>,
}

/// Fold a campaign's scopes into its single displayed acceptance.
///
/// Strict priority `accepted > pending > declined`: if the viewer accepted
/// through any placement the campaign reads as accepted everywhere, however
/// the other placements answered. The acceptance id travels with whichever
/// scope produced the running status, and the first accepted scope wins.
pub fn merge_scopes(scopes: &[ScopeAcceptance]) -> MergedAcceptance {
    let mut running: Option<(AcceptanceStatus, Option<String>)> = None;

    for scope in scopes {
        match &running {
            None => running = Some((scope.status, scope.acceptance_id.clone())),
            Some((best, _)) if scope.status > *best => {
                running = Some((scope.status, scope.acceptance_id.clone()))
            }
            _ => {}
        }
    }

    let (status, acceptance_id) = running.unwrap_or((AcceptanceStatus::Pending, None));
    MergedAcceptance {
        status,
        acceptance_id,
    }
}

/// A viewer's stored response to one campaign placement.
#[derive(Debug, PartialEq, Eq, Clone, minicbor::Encode, minicbor::Decode)]
pub struct AcceptanceRecord {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub campaign_id: String,
    #[n(2)]
    pub scope_id: String,
    #[n(3)]
    pub responder_id: String,
    #[n(4)]
    pub status: AcceptanceStatus,
    #[n(5)]
    pub responded_at: Option<TimeStamp<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(status: AcceptanceStatus, acceptance_id: Option<&str>) -> ScopeAcceptance {
        ScopeAcceptance {
            scope_id: None,
            level: None,
            level_id: None,
            status,
            acceptance_id: acceptance_id.map(str::to_string),
        }
    }

    #[test]
    fn declined_plus_pending_merges_to_pending() {
        let merged = merge_scopes(&[
            scope(AcceptanceStatus::Declined, Some("accept_a")),
            scope(AcceptanceStatus::Pending, None),
        ]);

        assert_eq!(merged.status, AcceptanceStatus::Pending);
        assert_eq!(merged.acceptance_id, None);
    }

    #[test]
    fn any_accepted_scope_wins_and_carries_its_id() {
        let merged = merge_scopes(&[
            scope(AcceptanceStatus::Declined, Some("accept_a")),
            scope(AcceptanceStatus::Accepted, Some("accept_42")),
        ]);

        assert_eq!(merged.status, AcceptanceStatus::Accepted);
        assert_eq!(merged.acceptance_id.as_deref(), Some("accept_42"));
    }

    #[test]
    fn pending_id_is_dropped_by_the_normalizer() {
        let (status, id) = normalize_acceptance(None, Some("accept_a".into()));
        assert_eq!(status, AcceptanceStatus::Pending);
        assert_eq!(id, None);

        let (status, id) = normalize_acceptance(Some("Accepted"), Some("accept_a".into()));
        assert_eq!(status, AcceptanceStatus::Accepted);
        assert_eq!(id.as_deref(), Some("accept_a"));
    }
}
