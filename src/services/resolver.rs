use std::future::Future;
use std::sync::Arc;

use crate::cfg::AssetQueryConfig;
use crate::db::{AssetRecord, Queries};
use crate::model::{
    AssetPage, Collection, CollectionType, FungibleAsset, Pagination, SemiFungibleAsset,
    UniqueAsset,
};
use crate::query::{AssetQuery, QueryParams};
use crate::services::error::{Error, Result};
use crate::services::master::MasterClient;

/// Process-wide entry point. Holds the store pool, the master client and the source
/// flag; every query is answered by exactly one of the two sources.
#[derive(Debug, Clone)]
pub struct MasterDbClient {
    queries: Queries,
    master: MasterClient,
    db_url: String,
    use_master_db: bool,
}

impl MasterDbClient {
    pub fn new(cfg: &AssetQueryConfig) -> Result<Self> {
        cfg.validate()?;
        let pool = cfg.database.init()?;
        let master = MasterClient::new(&cfg.master_db_url, cfg.request_timeout())?;
        Ok(Self {
            queries: Queries::new(Arc::new(pool)),
            master,
            db_url: cfg.database.url.clone(),
            use_master_db: cfg.use_master_db,
        })
    }

    pub fn from_parts(
        queries: Queries,
        master: MasterClient,
        db_url: impl Into<String>,
        use_master_db: bool,
    ) -> Self {
        Self {
            queries,
            master,
            db_url: db_url.into(),
            use_master_db,
        }
    }

    /// Address of the source that answers queries.
    pub fn db_url(&self) -> &str {
        if self.use_master_db {
            self.master.base_url()
        } else {
            &self.db_url
        }
    }

    pub fn use_master_db(&self) -> bool {
        self.use_master_db
    }

    pub fn create_query_builder(&self) -> AssetQuery {
        AssetQuery::new()
    }

    pub async fn get_collection(
        &self,
        chain_id: i32,
        collection_id: &str,
    ) -> Result<Option<Collection>> {
        if self.use_master_db {
            self.master.get_collection(chain_id, collection_id).await
        } else {
            let record = self.queries.get_collection(chain_id, collection_id).await?;
            Ok(record.map(Collection::from))
        }
    }

    /// Resolves the collection's token standard and returns one page of its assets.
    /// `Ok(None)` when the collection is unknown or of an unrecognized type.
    pub async fn get_paginated_assets(&self, query: &AssetQuery) -> Result<Option<AssetPage>> {
        let params = query.build()?;
        let stage = if self.use_master_db {
            "master service"
        } else {
            "local store"
        };
        with_deadline(query, stage, self.resolve(&params)).await
    }

    async fn resolve(&self, params: &QueryParams) -> Result<Option<AssetPage>> {
        let collection_type = self
            .get_collection(params.chain_id, &params.collection_id)
            .await?
            .map(|c| c.collection_type)
            .unwrap_or_default();

        let page = match collection_type {
            CollectionType::Fungible => {
                AssetPage::Fungible(self.fetch::<FungibleAsset>(params).await?)
            }
            CollectionType::NftUnique => {
                AssetPage::Unique(self.fetch::<UniqueAsset>(params).await?)
            }
            CollectionType::NftSemi => {
                AssetPage::SemiFungible(self.fetch::<SemiFungibleAsset>(params).await?)
            }
            CollectionType::Unknown => {
                log::warn!(
                    "collection {} on chain {} has no resolvable type, nothing to query",
                    params.collection_id,
                    params.chain_id
                );
                return Ok(None);
            }
        };

        Ok(Some(page))
    }

    async fn fetch<T: AssetRecord>(&self, params: &QueryParams) -> Result<Pagination<T>> {
        if self.use_master_db {
            return self.master.query_assets(&params.request_body()).await;
        }

        let page = params.page;
        if page.limit <= 0 {
            return Err(Error::validation(format!(
                "limit must be positive, got {}",
                page.limit
            )));
        }

        let (total_items, holders) = self
            .queries
            .count_items_with_filter(T::TABLE, &params.filters)
            .await?;
        let items = self
            .queries
            .query_with_dynamic_filter::<T>(T::TABLE, page.limit, page.offset, &params.filters)
            .await?;

        Ok(Pagination {
            page: page.page,
            limit: page.limit,
            total_items,
            total_pages: page.total_pages(total_items),
            holders: Some(holders),
            items,
        })
    }
}

async fn with_deadline<F, T>(query: &AssetQuery, stage: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match query.deadline() {
        Some(deadline) => tokio::time::timeout(deadline, fut)
            .await
            .map_err(|_| Error::DeadlineExceeded { stage })?,
        None => fut.await,
    }
}
