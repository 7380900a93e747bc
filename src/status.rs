//! Active-window evaluation and campaign state resolution
use super::dates::CalendarDay;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CampaignState {
    Active,
    Completed,
}

/// Whether the campaign's effective time window still covers `today`.
///
/// No end date means no temporal constraint. Comparison is at day
/// granularity: a campaign remains active through the whole of its end date.
pub fn is_within_active_window(end_date: Option<CalendarDay>, today: CalendarDay) -> bool {
    match end_date {
        None => true,
        Some(end) => end >= today,
    }
}

/// Combine the administrator's explicit flag with the date window.
///
/// An explicit `false` wins unconditionally. An explicit `true` is only a
/// non-veto: it never extends a campaign past its end date.
pub fn resolve_active(
    explicit_active: Option<bool>,
    end_date: Option<CalendarDay>,
    today: CalendarDay,
) -> CampaignState {
    if explicit_active == Some(false) {
        return CampaignState::Completed;
    }
    if !is_within_active_window(end_date, today) {
        return CampaignState::Completed;
    }
    CampaignState::Active
}
