use crate::db::queries::Queries;
use crate::db::CollectionRecord;
use crate::services::error::{Error, Result};

pub const COLLECTIONS_TABLE: &str = "collections";

impl Queries {
    pub async fn get_collection(
        &self,
        chain_id: i32,
        collection_id: &str,
    ) -> Result<Option<CollectionRecord>> {
        sqlx::query_as::<_, CollectionRecord>(
            r#"
            select c.id,
                   c.chain_id,
                   c.collection_address,
                   c.type::text as "type",
                   c.decimal_data,
                   c.initial_block,
                   c.last_updated
            from collections c
            where c.chain_id = $1
              and c.id = $2
            "#,
        )
        .bind(chain_id)
        .bind(collection_id)
        .fetch_optional(self.db.as_ref())
        .await
        .map_err(|e| Error::execution(COLLECTIONS_TABLE, e))
    }
}
