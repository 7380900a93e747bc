//! Service layer API for campaign workflow operations
use super::acceptance::{
    AcceptanceRecord, AcceptanceStatus, ScopeAcceptance, merge_scopes, normalize_acceptance,
};
use super::campaign::{CampaignDraft, CampaignRecord};
use super::dates::{CalendarDay, TimeStamp};
use super::error::{ActionError, ValidationError};
use super::feed::CampaignView;
use super::gate::{Decision, ensure_creator_mutation, ensure_report_allowed, ensure_response_allowed};
use super::party::PartyTypeRecord;
use super::report::{ReportDraft, ReportRecord};
use super::utils;
use std::sync::Arc;

pub struct CampaignService {
    instance: Arc<sled::Db>,
}

impl CampaignService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    fn save<T: minicbor::Encode<()>>(&self, id: &str, record: &T) -> anyhow::Result<()> {
        self.instance
            .insert(id.as_bytes(), minicbor::to_vec(record)?)?;
        Ok(())
    }

    fn load<T>(&self, id: &str) -> anyhow::Result<T>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        let bytes = self
            .instance
            .get(id.as_bytes())?
            .ok_or_else(|| anyhow::anyhow!("No record stored under id: {id}"))?;
        Ok(minicbor::decode(bytes.as_ref())?)
    }

    fn scan<T>(&self, prefix: &str) -> anyhow::Result<Vec<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        let mut records = Vec::new();
        for item in self.instance.scan_prefix(prefix.as_bytes()) {
            let (_, bytes) = item?;
            records.push(minicbor::decode(bytes.as_ref())?);
        }
        Ok(records)
    }

    fn viewer_responses(
        &self,
        campaign_id: &str,
        viewer_id: &str,
    ) -> anyhow::Result<Vec<AcceptanceRecord>> {
        let records: Vec<AcceptanceRecord> = self.scan(utils::ACCEPTANCE_PREFIX)?;
        Ok(records
            .into_iter()
            .filter(|a| a.campaign_id == campaign_id && a.responder_id == viewer_id)
            .collect())
    }

    /// Build the viewer's resolved view of one stored campaign. Placements
    /// without a stored response read as pending.
    fn view_of(&self, record: &CampaignRecord, viewer_id: &str) -> anyhow::Result<CampaignView> {
        let responses = self.viewer_responses(&record.id, viewer_id)?;

        let mut placements = record.scopes.clone();
        placements.sort_by_key(|p| p.level.rank());

        let mut scopes = Vec::with_capacity(placements.len());
        for placement in &placements {
            let (status, acceptance_id) = match responses
                .iter()
                .find(|a| a.scope_id == placement.scope_id)
            {
                Some(response) => normalize_acceptance(
                    Some(response.status.as_str()),
                    Some(response.id.clone()),
                ),
                None => (AcceptanceStatus::Pending, None),
            };
            scopes.push(ScopeAcceptance {
                scope_id: Some(placement.scope_id.clone()),
                level: Some(placement.level),
                level_id: Some(placement.level_id.clone()),
                status,
                acceptance_id,
            });
        }

        let merged = merge_scopes(&scopes);
        Ok(CampaignView {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            start_date: Some(record.start_date),
            end_date: record.end_date,
            start_date_raw: Some(record.start_date.to_string()),
            end_date_raw: record.end_date.map(|d| d.to_string()),
            explicit_active: record.explicit_active,
            created_by: Some(record.creator_id.clone()),
            scopes,
            merged,
        })
    }

    /// Create a new campaign from a validated draft
    pub fn create_campaign(
        &self,
        draft: CampaignDraft,
        creator_id: &str,
    ) -> anyhow::Result<CampaignRecord> {
        let record = draft.finalise(creator_id.to_string())?;
        self.save(&record.id, &record)?;
        Ok(record)
    }

    /// Edit a campaign's descriptive fields. Creator only, active only.
    pub fn update_campaign(
        &self,
        campaign_id: &str,
        viewer_id: &str,
        draft: CampaignDraft,
    ) -> anyhow::Result<CampaignRecord> {
        let mut campaign: CampaignRecord = self.load(campaign_id)?;
        ensure_creator_mutation(
            campaign.state(CalendarDay::today()),
            campaign.is_creator(viewer_id),
        )?;

        if let Some(name) = draft.name() {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::MissingName.into());
            }
            campaign.name = name.to_string();
        }
        if let Some(description) = draft.description() {
            campaign.description = Some(description.to_string());
        }
        if let Some(start) = draft.start_date() {
            campaign.start_date = start;
        }
        if let Some(end) = draft.end_date() {
            campaign.end_date = Some(end);
        }
        if let Some(end) = campaign.end_date {
            if campaign.start_date > end {
                return Err(ValidationError::EndBeforeStart.into());
            }
        }

        campaign.updated_at = TimeStamp::new();
        self.save(campaign_id, &campaign)?;
        Ok(campaign)
    }

    /// End a campaign early via the explicit-active override. Creator only.
    pub fn end_campaign(
        &self,
        campaign_id: &str,
        viewer_id: &str,
    ) -> anyhow::Result<CampaignRecord> {
        let mut campaign: CampaignRecord = self.load(campaign_id)?;
        ensure_creator_mutation(
            campaign.state(CalendarDay::today()),
            campaign.is_creator(viewer_id),
        )?;

        campaign.explicit_active = Some(false);
        campaign.updated_at = TimeStamp::new();
        self.save(campaign_id, &campaign)?;
        Ok(campaign)
    }

    /// Answer a campaign invitation through one hierarchy placement.
    ///
    /// Gated on the merged status of the viewer's current view, so accepting
    /// anywhere blocks re-answering everywhere. A fresh acceptance id is
    /// assigned on first response; later reversals update the same record.
    pub fn respond(
        &self,
        campaign_id: &str,
        scope_id: &str,
        viewer_id: &str,
        decision: Decision,
    ) -> anyhow::Result<AcceptanceRecord> {
        let campaign: CampaignRecord = self.load(campaign_id)?;
        if !campaign.scopes.iter().any(|p| p.scope_id == scope_id) {
            return Err(anyhow::anyhow!(
                "Campaign {campaign_id} has no scope {scope_id}"
            ));
        }

        let view = self.view_of(&campaign, viewer_id)?;
        ensure_response_allowed(
            campaign.state(CalendarDay::today()),
            view.merged.status,
            decision,
        )?;

        let existing = self
            .viewer_responses(campaign_id, viewer_id)?
            .into_iter()
            .find(|a| a.scope_id == scope_id);

        let record = match existing {
            Some(mut response) => {
                response.status = decision.status();
                response.responded_at = Some(TimeStamp::new());
                response
            }
            None => AcceptanceRecord {
                id: utils::new_acceptance_id()?,
                campaign_id: campaign_id.to_string(),
                scope_id: scope_id.to_string(),
                responder_id: viewer_id.to_string(),
                status: decision.status(),
                responded_at: Some(TimeStamp::new()),
            },
        };
        self.save(&record.id, &record)?;
        Ok(record)
    }

    /// The viewer's resolved view of one campaign
    pub fn campaign_view(
        &self,
        campaign_id: &str,
        viewer_id: &str,
    ) -> anyhow::Result<CampaignView> {
        let campaign: CampaignRecord = self.load(campaign_id)?;
        self.view_of(&campaign, viewer_id)
    }

    /// Campaigns the viewer has responded to through at least one placement
    pub fn my_campaigns(&self, viewer_id: &str) -> anyhow::Result<Vec<CampaignView>> {
        let responses: Vec<AcceptanceRecord> = self.scan(utils::ACCEPTANCE_PREFIX)?;
        let mut campaign_ids: Vec<String> = Vec::new();
        for response in responses {
            if response.responder_id == viewer_id && !campaign_ids.contains(&response.campaign_id) {
                campaign_ids.push(response.campaign_id);
            }
        }

        let mut views = Vec::with_capacity(campaign_ids.len());
        for campaign_id in campaign_ids {
            let campaign: CampaignRecord = self.load(&campaign_id)?;
            views.push(self.view_of(&campaign, viewer_id)?);
        }
        Ok(views)
    }

    /// Campaigns created by this viewer
    pub fn created_campaigns(&self, creator_id: &str) -> anyhow::Result<Vec<CampaignView>> {
        let campaigns: Vec<CampaignRecord> = self.scan(utils::CAMPAIGN_PREFIX)?;
        let mut views = Vec::new();
        for campaign in campaigns {
            if campaign.is_creator(creator_id) {
                views.push(self.view_of(&campaign, creator_id)?);
            }
        }
        Ok(views)
    }

    /// File a field-activity report against an accepted invitation.
    ///
    /// The precondition runs before anything is written: the referenced
    /// acceptance must be accepted and the campaign still active.
    pub fn submit_report(
        &self,
        acceptance_id: &str,
        draft: ReportDraft,
    ) -> anyhow::Result<ReportRecord> {
        let acceptance: AcceptanceRecord = self.load(acceptance_id)?;
        let campaign: CampaignRecord = self.load(&acceptance.campaign_id)?;
        ensure_report_allowed(campaign.state(CalendarDay::today()), acceptance.status)?;

        let record = draft.finalise(
            utils::new_report_id()?,
            acceptance.campaign_id.clone(),
            acceptance_id.to_string(),
            acceptance.responder_id.clone(),
        )?;
        self.save(&record.id, &record)?;
        Ok(record)
    }

    /// Edit a filed report in place. Original filer only; `existing_images`
    /// is the retained subset of the previously attached images.
    pub fn edit_report(
        &self,
        report_id: &str,
        editor_id: &str,
        draft: ReportDraft,
        existing_images: Vec<String>,
    ) -> anyhow::Result<ReportRecord> {
        let record: ReportRecord = self.load(report_id)?;
        if record.filed_by != editor_id {
            return Err(ActionError::NotFiler.into());
        }

        let updated = draft.apply_to(record, existing_images)?;
        self.save(report_id, &updated)?;
        Ok(updated)
    }

    /// Reports the viewer filed for one campaign
    pub fn my_reports(
        &self,
        campaign_id: &str,
        viewer_id: &str,
    ) -> anyhow::Result<Vec<ReportRecord>> {
        let records: Vec<ReportRecord> = self.scan(utils::REPORT_PREFIX)?;
        Ok(records
            .into_iter()
            .filter(|r| r.campaign_id == campaign_id && r.filed_by == viewer_id && !r.is_deleted)
            .collect())
    }

    pub fn create_party_type(&self, name: &str) -> anyhow::Result<PartyTypeRecord> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingPartyTypeName.into());
        }

        let now = TimeStamp::new();
        let record = PartyTypeRecord {
            id: utils::new_party_type_id()?,
            name: trimmed.to_string(),
            is_deleted: false,
            created_at: now.clone(),
            updated_at: now,
        };
        self.save(&record.id, &record)?;
        Ok(record)
    }

    pub fn list_party_types(&self) -> anyhow::Result<Vec<PartyTypeRecord>> {
        let records: Vec<PartyTypeRecord> = self.scan(utils::PARTY_TYPE_PREFIX)?;
        Ok(records.into_iter().filter(|p| !p.is_deleted).collect())
    }

    pub fn rename_party_type(&self, id: &str, name: &str) -> anyhow::Result<PartyTypeRecord> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingPartyTypeName.into());
        }

        let mut record: PartyTypeRecord = self.load(id)?;
        record.name = trimmed.to_string();
        record.updated_at = TimeStamp::new();
        self.save(id, &record)?;
        Ok(record)
    }

    /// Soft-delete a party type; it stays on disk but leaves listings.
    pub fn remove_party_type(&self, id: &str) -> anyhow::Result<PartyTypeRecord> {
        let mut record: PartyTypeRecord = self.load(id)?;
        record.is_deleted = true;
        record.updated_at = TimeStamp::new();
        self.save(id, &record)?;
        Ok(record)
    }
}
