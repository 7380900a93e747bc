//! End-to-end walk through the campaign workflow against a local sled db.
//!
//! Run with `cargo run --example sled`.

use campaign_lifecycle::campaign::CampaignDraft;
use campaign_lifecycle::dates::CalendarDay;
use campaign_lifecycle::gate::{Decision, permitted_actions};
use campaign_lifecycle::hierarchy::ScopeLevel;
use campaign_lifecycle::report::ReportDraft;
use campaign_lifecycle::service::CampaignService;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let db = sled::open("sled")?;
    if !db.is_empty() {
        db.clear()?;
    }
    let service = CampaignService::new(Arc::new(db));

    let creator = "user_organiser";
    let volunteer = "user_volunteer";
    let today = CalendarDay::today();

    let campaign = service.create_campaign(
        CampaignDraft::new()
            .set_name("Door to door voter outreach")
            .set_description("Cover every household in the assembly segment")
            .set_start_date(today)
            .add_placement(ScopeLevel::District, "district-12")
            .add_placement(ScopeLevel::Assembly, "assembly-104"),
        creator,
    )?;
    println!("created campaign {}", campaign.id);

    let district_scope = &campaign.scopes[0].scope_id;
    let acceptance = service.respond(&campaign.id, district_scope, volunteer, Decision::Accept)?;
    println!("accepted via district scope, acceptance id {}", acceptance.id);

    let view = service.campaign_view(&campaign.id, volunteer)?;
    println!(
        "merged status: {} ({} scopes)",
        view.merged.status.as_str(),
        view.scopes.len()
    );
    println!("permitted: {:?}", permitted_actions(&view, today, Some(volunteer)));

    let report = service.submit_report(
        &acceptance.id,
        ReportDraft::new()
            .set_reporter_name("A. Volunteer")
            .set_reporter_phone("9000000000")
            .set_attendee_count(120)
            .set_report_date(today)
            .set_description("Covered two wards before noon")
            .add_image("https://cdn.example/report-1.jpg"),
    )?;
    println!("filed report {}", report.id);

    let ended = service.end_campaign(&campaign.id, creator)?;
    println!(
        "campaign ended, state now {:?}",
        ended.state(CalendarDay::today())
    );

    Ok(())
}
