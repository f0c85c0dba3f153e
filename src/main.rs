use asset_query::cfg::AssetQueryConfig;
use asset_query::model::HttpResponse;
use asset_query::{AssetQuery, MasterDbClient};
use chrono::{DateTime, Utc};
use config::Environment;
use serde::Deserialize;

/// The query to run, read from `QUERY_*` environment variables.
#[derive(Debug, Deserialize)]
struct QueryConfig {
    chain_id: i32,
    collection_id: String,
    /// Comma separated.
    token_ids: Option<String>,
    owner: Option<String>,
    created_at_from: Option<DateTime<Utc>>,
    created_at_to: Option<DateTime<Utc>>,
    page: Option<i64>,
    limit: Option<i64>,
}

impl QueryConfig {
    fn new() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(Environment::with_prefix("query").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn into_query(self, mut query: AssetQuery) -> AssetQuery {
        query = query
            .with_chain_id(self.chain_id)
            .with_collection_id(self.collection_id);
        if let Some(token_ids) = self.token_ids {
            query = query.with_token_ids(
                token_ids
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty()),
            );
        }
        if let Some(owner) = self.owner {
            query = query.with_owner(owner);
        }
        if let Some(from) = self.created_at_from {
            query = query.with_created_at_from(from);
        }
        if let Some(to) = self.created_at_to {
            query = query.with_created_at_to(to);
        }
        if let Some(page) = self.page {
            query = query.with_page(page);
        }
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        query
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    stackdriver_logger::init();
    log::info!("ASSET-QUERY");

    let cfg = AssetQueryConfig::new()?;
    let client = MasterDbClient::new(&cfg)?;
    log::info!(
        "using {} source: {}",
        if client.use_master_db() { "master" } else { "local" },
        client.db_url()
    );

    let query = QueryConfig::new()?.into_query(client.create_query_builder());
    match client.get_paginated_assets(&query).await {
        Ok(page) => {
            println!("{}", serde_json::to_string_pretty(&HttpResponse::ok(page))?);
            Ok(())
        }
        Err(e) => {
            log::error!("error getting paginated assets: {e}");
            Err(e.into())
        }
    }
}
