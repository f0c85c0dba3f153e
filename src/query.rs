use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::db::query_params::{AssetFilterParams, PageRequest};
use crate::db::FilterSet;
use crate::services::error::{Error, Result};

/// Parameters of one asset query. Each `with_*` call returns an updated copy;
/// [`AssetQuery::build`] validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    chain_id: Option<i32>,
    collection_id: Option<String>,
    token_ids: Vec<String>,
    owner: Option<String>,
    created_at_from: Option<DateTime<Utc>>,
    created_at_to: Option<DateTime<Utc>>,
    page: Option<i64>,
    limit: Option<i64>,
    offset: Option<i64>,
    deadline: Option<Duration>,
}

impl AssetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain_id(self, chain_id: i32) -> Self {
        Self {
            chain_id: Some(chain_id),
            ..self
        }
    }

    pub fn with_collection_id(self, collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: Some(collection_id.into()),
            ..self
        }
    }

    pub fn with_token_ids<I, S>(self, token_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            token_ids: token_ids.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_owner(self, owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..self
        }
    }

    pub fn with_created_at_from(self, created_at_from: DateTime<Utc>) -> Self {
        Self {
            created_at_from: Some(created_at_from),
            ..self
        }
    }

    pub fn with_created_at_to(self, created_at_to: DateTime<Utc>) -> Self {
        Self {
            created_at_to: Some(created_at_to),
            ..self
        }
    }

    pub fn with_page(self, page: i64) -> Self {
        Self {
            page: Some(page),
            ..self
        }
    }

    pub fn with_limit(self, limit: i64) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    /// Accepted for compatibility; the offset is always recomputed from page and limit.
    pub fn with_offset(self, offset: i64) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }

    /// Upper bound on the whole request, store and remote round-trips included.
    pub fn with_deadline(self, deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            ..self
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn build(&self) -> Result<QueryParams> {
        let chain_id = match self.chain_id {
            Some(id) if id != 0 => id,
            _ => return Err(Error::validation("chainId is required")),
        };
        let collection_id = match self.collection_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(Error::validation("collectionId is required")),
        };
        let page = PageRequest::new(self.page, self.limit)?;
        if let Some(offset) = self.offset.filter(|offset| *offset != page.offset) {
            log::debug!(
                "ignoring offset {offset}, using {} for page {}",
                page.offset,
                page.page
            );
        }

        let filters = FilterSet::compile(&AssetFilterParams {
            collection_id: Some(collection_id.as_str()),
            token_ids: &self.token_ids,
            owner: self.owner.as_deref(),
            created_at_from: self.created_at_from.as_ref(),
            created_at_to: self.created_at_to.as_ref(),
        });

        Ok(QueryParams {
            chain_id,
            collection_id,
            token_ids: self.token_ids.clone(),
            owner: self.owner.clone(),
            created_at_from: self.created_at_from,
            created_at_to: self.created_at_to,
            page,
            filters,
        })
    }
}

/// Validated query: normalized paging plus the compiled filter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub chain_id: i32,
    pub collection_id: String,
    pub token_ids: Vec<String>,
    pub owner: Option<String>,
    pub created_at_from: Option<DateTime<Utc>>,
    pub created_at_to: Option<DateTime<Utc>>,
    pub page: PageRequest,
    pub filters: FilterSet,
}

impl QueryParams {
    pub fn request_body(&self) -> QueryBuilderRequest<'_> {
        QueryBuilderRequest {
            chain_id: self.chain_id,
            collection_id: &self.collection_id,
            token_ids: &self.token_ids,
            owner: self.owner.as_deref(),
            created_at_from: self.created_at_from.as_ref(),
            created_at_to: self.created_at_to.as_ref(),
            page: self.page.page,
            limit: self.page.limit,
            offset: self.page.offset,
        }
    }
}

/// Body of `POST /query-builder` on the master service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBuilderRequest<'a> {
    pub chain_id: i32,
    pub collection_id: &'a str,
    pub token_ids: &'a [String],
    pub owner: Option<&'a str>,
    pub created_at_from: Option<&'a DateTime<Utc>>,
    pub created_at_to: Option<&'a DateTime<Utc>>,
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::FilterKey;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> AssetQuery {
        AssetQuery::new()
            .with_chain_id(1)
            .with_collection_id("1:0x0091BD12166d29539Db6bb37FB79670779aBf266")
            .with_token_ids(["1", "2", "3"])
            .with_owner("0x821dAb5C6fffD8183d4E3e4A5C1725c847c36789")
            .with_created_at_from(
                Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0)
                    .single()
                    .expect("valid date"),
            )
    }

    #[test]
    fn chain_id_is_required() {
        let err = AssetQuery::new()
            .with_collection_id("1:0xabc")
            .build()
            .expect_err("missing chain id");
        assert!(matches!(err, Error::Validation(_)));

        let err = AssetQuery::new()
            .with_chain_id(0)
            .with_collection_id("1:0xabc")
            .build()
            .expect_err("zero chain id");
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn collection_id_is_required() {
        let err = AssetQuery::new()
            .with_chain_id(1)
            .build()
            .expect_err("missing collection id");
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn with_methods_leave_original_untouched() {
        let base = sample();
        let paged = base.clone().with_page(3);
        assert_ne!(base, paged);
        assert_eq!(base.build().expect("valid").page.page, 1);
        assert_eq!(paged.build().expect("valid").page.page, 3);
    }

    #[test]
    fn caller_offset_is_overwritten() {
        let params = sample()
            .with_page(2)
            .with_limit(10)
            .with_offset(7)
            .build()
            .expect("valid query");
        assert_eq!(params.page.offset, 10);
    }

    #[test]
    fn invalid_paging_fails_build() {
        assert!(matches!(sample().with_page(0).build(), Err(Error::Validation(_))));
        assert!(matches!(sample().with_limit(101).build(), Err(Error::Validation(_))));
    }

    #[test]
    fn filters_compiled_from_params() {
        let params = sample().build().expect("valid query");
        assert_eq!(params.filters.len(), 4);
        assert_eq!(
            params.filters.get(FilterKey::TokenId),
            Some(&["1".to_string(), "2".to_string(), "3".to_string()][..])
        );
        assert!(params.filters.get(FilterKey::CreatedAtTo).is_none());
    }

    #[test]
    fn request_body_wire_shape() {
        let params = sample().with_page(2).with_limit(5).build().expect("valid query");
        assert_eq!(
            serde_json::to_value(params.request_body()).expect("encode"),
            json!({
                "chainId": 1,
                "collectionId": "1:0x0091BD12166d29539Db6bb37FB79670779aBf266",
                "tokenIds": ["1", "2", "3"],
                "owner": "0x821dAb5C6fffD8183d4E3e4A5C1725c847c36789",
                "createdAtFrom": "2025-01-05T00:00:00Z",
                "createdAtTo": null,
                "page": 2,
                "limit": 5,
                "offset": 5
            })
        );
    }
}
