//! Id minting for stored entities.
//!
//! Every record id is a uuid7 encoded with bech32 under an entity-specific
//! human-readable prefix. The prefix doubles as the sled key namespace, so
//! `scan_prefix` over a constant below walks exactly one record family.

use bech32::Bech32m;
use uuid7::uuid7;

pub const CAMPAIGN_PREFIX: &str = "camp_";
pub const SCOPE_PREFIX: &str = "scope_";
pub const ACCEPTANCE_PREFIX: &str = "accept_";
pub const REPORT_PREFIX: &str = "report_";
pub const PARTY_TYPE_PREFIX: &str = "party_";

// construct a unique id then encode using bech32
fn mint(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

pub fn new_campaign_id() -> anyhow::Result<String> {
    mint(CAMPAIGN_PREFIX)
}

pub fn new_scope_id() -> anyhow::Result<String> {
    mint(SCOPE_PREFIX)
}

pub fn new_acceptance_id() -> anyhow::Result<String> {
    mint(ACCEPTANCE_PREFIX)
}

pub fn new_report_id() -> anyhow::Result<String> {
    mint(REPORT_PREFIX)
}

pub fn new_party_type_id() -> anyhow::Result<String> {
    mint(PARTY_TYPE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_their_namespace_prefix() {
        assert!(new_campaign_id().unwrap().starts_with("camp_1"));
        assert!(new_acceptance_id().unwrap().starts_with("accept_1"));
        assert!(new_report_id().unwrap().starts_with("report_1"));
    }

    #[test]
    fn ids_are_unique() {
        let a = new_campaign_id().unwrap();
        let b = new_campaign_id().unwrap();
        assert_ne!(a, b);
    }
}
