//! Action gating for a resolved campaign
//!
//! Every action-triggering render asks this module what is currently legal.
//! Nothing here is cached: `today` advances and acceptance state can change
//! between renders, so callers query fresh each time.

use super::acceptance::AcceptanceStatus;
use super::dates::CalendarDay;
use super::error::ActionError;
use super::feed::CampaignView;
use super::status::CampaignState;
use std::collections::BTreeSet;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Action {
    ViewDetails,
    Accept,
    Decline,
    SubmitReport,
    ViewMyReports,
    EditCampaign,
    EndCampaign,
}

/// A viewer's reply to a campaign invitation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Decision {
    Accept,
    Decline,
}

impl Decision {
    pub fn status(&self) -> AcceptanceStatus {
        match self {
            Self::Accept => AcceptanceStatus::Accepted,
            Self::Decline => AcceptanceStatus::Declined,
        }
    }
}

/// The set of actions currently legal for `viewer_id` on this campaign.
///
/// A completed campaign is frozen: only details, plus the viewer's own
/// reports if they had accepted. While active, a declined invitation can
/// still be accepted so the viewer can change their mind, but an accepted
/// one cannot be re-answered.
pub fn permitted_actions(
    view: &CampaignView,
    today: CalendarDay,
    viewer_id: Option<&str>,
) -> BTreeSet<Action> {
    let mut actions = BTreeSet::from([Action::ViewDetails]);

    if view.state(today) == CampaignState::Completed {
        if view.merged.status == AcceptanceStatus::Accepted {
            actions.insert(Action::ViewMyReports);
        }
        return actions;
    }

    match view.merged.status {
        AcceptanceStatus::Pending => {
            actions.insert(Action::Accept);
            actions.insert(Action::Decline);
        }
        AcceptanceStatus::Accepted => {
            actions.insert(Action::SubmitReport);
            actions.insert(Action::ViewMyReports);
        }
        AcceptanceStatus::Declined => {
            actions.insert(Action::Accept);
        }
    }

    let is_creator = match (viewer_id, view.created_by.as_deref()) {
        (Some(viewer), Some(creator)) => viewer == creator,
        _ => false,
    };
    if is_creator {
        actions.insert(Action::EditCampaign);
        actions.insert(Action::EndCampaign);
    }

    actions
}

/// Precondition for the acceptance-update call, checked before any mutation.
pub fn ensure_response_allowed(
    state: CampaignState,
    current: AcceptanceStatus,
    decision: Decision,
) -> Result<(), ActionError> {
    if state == CampaignState::Completed {
        return Err(ActionError::CampaignCompleted);
    }
    match decision {
        Decision::Accept if current == AcceptanceStatus::Accepted => {
            Err(ActionError::AlreadyAccepted)
        }
        Decision::Decline if current != AcceptanceStatus::Pending => {
            Err(ActionError::DeclineNotPending)
        }
        _ => Ok(()),
    }
}

/// Precondition for filing a report against an acceptance.
pub fn ensure_report_allowed(
    state: CampaignState,
    acceptance: AcceptanceStatus,
) -> Result<(), ActionError> {
    if state == CampaignState::Completed {
        return Err(ActionError::CampaignCompleted);
    }
    if acceptance != AcceptanceStatus::Accepted {
        return Err(ActionError::ReportBeforeAcceptance);
    }
    Ok(())
}

/// Precondition for creator-only campaign mutations (edit, end).
pub fn ensure_creator_mutation(state: CampaignState, is_creator: bool) -> Result<(), ActionError> {
    if !is_creator {
        return Err(ActionError::NotCreator);
    }
    if state == CampaignState::Completed {
        return Err(ActionError::CampaignCompleted);
    }
    Ok(())
}
