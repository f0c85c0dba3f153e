use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CollectionRecord {
    pub id: String,
    pub chain_id: i32,
    pub collection_address: String,
    #[sqlx(rename = "type")]
    pub collection_type: String,
    pub decimal_data: Option<i16>,
    pub initial_block: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
}
