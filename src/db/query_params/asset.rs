use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct AssetFilterParams<'a> {
    pub collection_id: Option<&'a str>,
    pub token_ids: &'a [String],
    pub owner: Option<&'a str>,
    pub created_at_from: Option<&'a DateTime<Utc>>,
    pub created_at_to: Option<&'a DateTime<Utc>>,
}
