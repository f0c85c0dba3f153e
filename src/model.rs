use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::CollectionRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
}

impl<T> HttpResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            message: "success".to_string(),
            data,
        }
    }
}

/// One page of assets plus the totals needed to page through the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holders: Option<i64>,
    #[serde(rename = "data", default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    #[serde(rename = "FUNGIBLE", alias = "ERC20")]
    Fungible,
    #[serde(rename = "NFT_UNIQUE", alias = "ERC721")]
    NftUnique,
    #[serde(rename = "NFT_SEMI", alias = "ERC1155")]
    NftSemi,
    #[default]
    #[serde(other)]
    Unknown,
}

impl From<&str> for CollectionType {
    fn from(value: &str) -> Self {
        match value {
            "FUNGIBLE" | "ERC20" => CollectionType::Fungible,
            "NFT_UNIQUE" | "ERC721" => CollectionType::NftUnique,
            "NFT_SEMI" | "ERC1155" => CollectionType::NftSemi,
            _ => CollectionType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub chain_id: i32,
    #[serde(default, alias = "collectionAddress")]
    pub address: String,
    #[serde(rename = "type", default)]
    pub collection_type: CollectionType,
    #[serde(default, alias = "decimalData")]
    pub decimals: Option<i16>,
    #[serde(default)]
    pub initial_block: Option<i64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<CollectionRecord> for Collection {
    fn from(record: CollectionRecord) -> Self {
        Self {
            collection_type: CollectionType::from(record.collection_type.as_str()),
            id: record.id,
            chain_id: record.chain_id,
            address: record.collection_address,
            decimals: record.decimal_data,
            initial_block: record.initial_block,
            last_updated: record.last_updated,
        }
    }
}

/// ERC-20 style holding: a balance, no token id, no attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FungibleAsset {
    pub id: Uuid,
    pub chain_id: i32,
    pub collection_id: String,
    pub owner: String,
    pub balance: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub signature: String,
}

/// ERC-721 style holding: one owner per token id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniqueAsset {
    pub id: Uuid,
    pub chain_id: i32,
    pub collection_id: String,
    pub token_id: String,
    pub owner: String,
    pub attributes: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub signature: String,
}

/// ERC-1155 style holding: a balance of a given token id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SemiFungibleAsset {
    pub id: Uuid,
    pub chain_id: i32,
    pub collection_id: String,
    pub token_id: String,
    pub owner: String,
    pub balance: String,
    pub attributes: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssetPage {
    Fungible(Pagination<FungibleAsset>),
    Unique(Pagination<UniqueAsset>),
    SemiFungible(Pagination<SemiFungibleAsset>),
}

impl AssetPage {
    pub fn collection_type(&self) -> CollectionType {
        match self {
            AssetPage::Fungible(_) => CollectionType::Fungible,
            AssetPage::Unique(_) => CollectionType::NftUnique,
            AssetPage::SemiFungible(_) => CollectionType::NftSemi,
        }
    }

    pub fn total_items(&self) -> i64 {
        match self {
            AssetPage::Fungible(p) => p.total_items,
            AssetPage::Unique(p) => p.total_items,
            AssetPage::SemiFungible(p) => p.total_items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AssetPage::Fungible(p) => p.items.len(),
            AssetPage::Unique(p) => p.items.len(),
            AssetPage::SemiFungible(p) => p.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
