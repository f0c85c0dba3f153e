//! Column tables for the asset record variants. Storage column names derive from the
//! wire names, so the tables double as the JSON contract with the master service.

use lazy_static::lazy_static;

use crate::db::columns::{AssetRecord, ColumnBinding, ColumnMap, FieldKind};
use crate::model::{FungibleAsset, SemiFungibleAsset, UniqueAsset};

pub const FUNGIBLE_ASSETS_TABLE: &str = "erc_20_assets";
pub const UNIQUE_ASSETS_TABLE: &str = "erc_721_assets";
pub const SEMI_FUNGIBLE_ASSETS_TABLE: &str = "erc_1155_assets";

const FUNGIBLE_COLUMNS: &[ColumnBinding<FungibleAsset>] = &[
    ColumnBinding::new("id", FieldKind::Uuid, |r, v| {
        r.id = v.uuid()?;
        Ok(())
    }),
    ColumnBinding::wire("chain_id", "chainId", FieldKind::Integer, |r, v| {
        r.chain_id = v.int32()?;
        Ok(())
    }),
    ColumnBinding::wire("collection_id", "collectionId", FieldKind::Text, |r, v| {
        r.collection_id = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("owner", "owner", FieldKind::Text, |r, v| {
        r.owner = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("balance", "balance", FieldKind::Decimal, |r, v| {
        r.balance = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("created_at", "createdAt", FieldKind::Timestamp, |r, v| {
        r.created_at = v.timestamp()?;
        Ok(())
    }),
    ColumnBinding::wire("updated_at", "updatedAt", FieldKind::Timestamp, |r, v| {
        r.updated_at = v.timestamp()?;
        Ok(())
    }),
    ColumnBinding::wire("updated_by", "updatedBy", FieldKind::Uuid, |r, v| {
        r.updated_by = v.uuid()?;
        Ok(())
    }),
    ColumnBinding::wire("signature", "signature", FieldKind::Text, |r, v| {
        r.signature = v.text()?;
        Ok(())
    }),
];

const UNIQUE_COLUMNS: &[ColumnBinding<UniqueAsset>] = &[
    ColumnBinding::new("id", FieldKind::Uuid, |r, v| {
        r.id = v.uuid()?;
        Ok(())
    }),
    ColumnBinding::wire("chain_id", "chainId", FieldKind::Integer, |r, v| {
        r.chain_id = v.int32()?;
        Ok(())
    }),
    ColumnBinding::wire("collection_id", "collectionId", FieldKind::Text, |r, v| {
        r.collection_id = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("token_id", "tokenId", FieldKind::Decimal, |r, v| {
        r.token_id = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("owner", "owner", FieldKind::Text, |r, v| {
        r.owner = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("attributes", "attributes", FieldKind::Json, |r, v| {
        r.attributes = v.json_opt()?;
        Ok(())
    }),
    ColumnBinding::wire("created_at", "createdAt", FieldKind::Timestamp, |r, v| {
        r.created_at = v.timestamp()?;
        Ok(())
    }),
    ColumnBinding::wire("updated_at", "updatedAt", FieldKind::Timestamp, |r, v| {
        r.updated_at = v.timestamp()?;
        Ok(())
    }),
    ColumnBinding::wire("updated_by", "updatedBy", FieldKind::Uuid, |r, v| {
        r.updated_by = v.uuid()?;
        Ok(())
    }),
    ColumnBinding::wire("signature", "signature", FieldKind::Text, |r, v| {
        r.signature = v.text()?;
        Ok(())
    }),
];

const SEMI_FUNGIBLE_COLUMNS: &[ColumnBinding<SemiFungibleAsset>] = &[
    ColumnBinding::new("id", FieldKind::Uuid, |r, v| {
        r.id = v.uuid()?;
        Ok(())
    }),
    ColumnBinding::wire("chain_id", "chainId", FieldKind::Integer, |r, v| {
        r.chain_id = v.int32()?;
        Ok(())
    }),
    ColumnBinding::wire("collection_id", "collectionId", FieldKind::Text, |r, v| {
        r.collection_id = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("token_id", "tokenId", FieldKind::Decimal, |r, v| {
        r.token_id = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("owner", "owner", FieldKind::Text, |r, v| {
        r.owner = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("balance", "balance", FieldKind::Decimal, |r, v| {
        r.balance = v.text()?;
        Ok(())
    }),
    ColumnBinding::wire("attributes", "attributes", FieldKind::Json, |r, v| {
        r.attributes = v.json_opt()?;
        Ok(())
    }),
    ColumnBinding::wire("created_at", "createdAt", FieldKind::Timestamp, |r, v| {
        r.created_at = v.timestamp()?;
        Ok(())
    }),
    ColumnBinding::wire("updated_at", "updatedAt", FieldKind::Timestamp, |r, v| {
        r.updated_at = v.timestamp()?;
        Ok(())
    }),
    ColumnBinding::wire("updated_by", "updatedBy", FieldKind::Uuid, |r, v| {
        r.updated_by = v.uuid()?;
        Ok(())
    }),
    ColumnBinding::wire("signature", "signature", FieldKind::Text, |r, v| {
        r.signature = v.text()?;
        Ok(())
    }),
];

lazy_static! {
    static ref FUNGIBLE_MAP: ColumnMap<FungibleAsset> = ColumnMap::new(FUNGIBLE_COLUMNS);
    static ref UNIQUE_MAP: ColumnMap<UniqueAsset> = ColumnMap::new(UNIQUE_COLUMNS);
    static ref SEMI_FUNGIBLE_MAP: ColumnMap<SemiFungibleAsset> =
        ColumnMap::new(SEMI_FUNGIBLE_COLUMNS);
}

impl AssetRecord for FungibleAsset {
    const TABLE: &'static str = FUNGIBLE_ASSETS_TABLE;

    fn column_map() -> &'static ColumnMap<Self> {
        &FUNGIBLE_MAP
    }
}

impl AssetRecord for UniqueAsset {
    const TABLE: &'static str = UNIQUE_ASSETS_TABLE;

    fn column_map() -> &'static ColumnMap<Self> {
        &UNIQUE_MAP
    }
}

impl AssetRecord for SemiFungibleAsset {
    const TABLE: &'static str = SEMI_FUNGIBLE_ASSETS_TABLE;

    fn column_map() -> &'static ColumnMap<Self> {
        &SEMI_FUNGIBLE_MAP
    }
}
