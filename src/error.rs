#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Campaign name is required")]
    MissingName,
    #[error("Campaign start date is required")]
    MissingStartDate,
    #[error("End date must be on or after the start date")]
    EndBeforeStart,
    #[error("Campaign needs at least one hierarchy placement")]
    NoScopes,
    #[error("Reporter name is required")]
    MissingReporterName,
    #[error("Reporter phone is required")]
    MissingReporterPhone,
    #[error("Report date is required")]
    MissingReportDate,
    #[error("A report can carry at most {0} images")]
    TooManyImages(usize),
    #[error("Party type name is required")]
    MissingPartyTypeName,
}

/// Gate precondition failures. These are raised before any storage mutation
/// and their messages are shown to the user as-is.
#[derive(thiserror::Error, Debug)]
pub enum ActionError {
    #[error("Accept the campaign before submitting a report.")]
    ReportBeforeAcceptance,
    #[error("This campaign has completed and can no longer be changed")]
    CampaignCompleted,
    #[error("This campaign is already accepted")]
    AlreadyAccepted,
    #[error("Only a pending invitation can be declined")]
    DeclineNotPending,
    #[error("Only the campaign creator can change this campaign")]
    NotCreator,
    #[error("Only the original filer can edit this report")]
    NotFiler,
}
