//! Party types, the small admin-managed lookup table
use super::dates::TimeStamp;
use chrono::Utc;

#[derive(Debug, PartialEq, Eq, Clone, minicbor::Encode, minicbor::Decode)]
pub struct PartyTypeRecord {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    /// Soft delete; removed entries stay on disk but drop out of listings.
    #[n(2)]
    pub is_deleted: bool,
    #[n(3)]
    pub created_at: TimeStamp<Utc>,
    #[n(4)]
    pub updated_at: TimeStamp<Utc>,
}
