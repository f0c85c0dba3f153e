//! Runs against a real Postgres: `DATABASE_URL=postgres://... cargo test -- --ignored`.
//! Tables are created as temporary tables on a single-connection pool.

use std::sync::Arc;
use std::time::Duration;

use asset_query::db::query_params::AssetFilterParams;
use asset_query::db::{FilterSet, Queries, SEMI_FUNGIBLE_ASSETS_TABLE, UNIQUE_ASSETS_TABLE};
use asset_query::model::{AssetPage, SemiFungibleAsset, UniqueAsset};
use asset_query::services::MasterClient;
use asset_query::{AssetQuery, MasterDbClient};
use chrono::{TimeZone, Utc};
use serde_json::json;
use sqlx::postgres::{PgPool, PgPoolOptions};

const COLLECTION_ID: &str = "1:0xabc";

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

async fn connect() -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url())
        .await
        .expect("connect to postgres")
}

async fn seeded_pool() -> PgPool {
    let pool = connect().await;

    for statement in [
        r#"create temporary table collections (
               id text primary key,
               chain_id int4 not null,
               collection_address text not null,
               type text not null,
               decimal_data int2,
               initial_block int8,
               last_updated timestamptz
           )"#,
        r#"create temporary table erc_721_assets (
               id uuid primary key,
               chain_id int4 not null,
               collection_id text not null,
               token_id text not null,
               owner text not null,
               attributes jsonb,
               created_at timestamptz not null,
               updated_at timestamptz not null,
               updated_by uuid not null,
               signature text not null,
               block_number int8
           )"#,
        r#"insert into collections (id, chain_id, collection_address, type)
           values ('1:0xabc', 1, '0xabc', 'NFT_UNIQUE'),
                  ('1:0xdef', 1, '0xdef', 'SOMETHING_ELSE')"#,
        r#"insert into erc_721_assets
               (id, chain_id, collection_id, token_id, owner, attributes,
                created_at, updated_at, updated_by, signature, block_number)
           select ('00000000-0000-0000-0000-' || lpad(n::text, 12, '0'))::uuid,
                  1,
                  '1:0xabc',
                  n::text,
                  case when n % 2 = 0 then '0xeven' else '0xodd' end,
                  case when n = 1 then '{"rarity": "legendary"}'::jsonb end,
                  timestamptz '2025-01-01 00:00:00+00' + n * interval '1 day',
                  timestamptz '2025-01-01 00:00:00+00' + n * interval '1 day',
                  '00000000-0000-0000-0000-0000000000ff'::uuid,
                  'sig-' || n,
                  100 + n
           from generate_series(1, 12) as n"#,
    ] {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("seed statement");
    }

    pool
}

fn local_client(pool: PgPool) -> MasterDbClient {
    let remote =
        MasterClient::new("http://127.0.0.1:9", Duration::from_secs(1)).expect("http client");
    MasterDbClient::from_parts(Queries::new(Arc::new(pool)), remote, database_url(), false)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn count_matches_unbounded_select() {
    let queries = Queries::new(Arc::new(seeded_pool().await));
    let from = Utc
        .with_ymd_and_hms(2025, 1, 5, 0, 0, 0)
        .single()
        .expect("valid date");
    let tokens = vec!["2".to_string(), "4".to_string(), "6".to_string(), "7".to_string()];

    for params in [
        AssetFilterParams::default(),
        AssetFilterParams {
            collection_id: Some(COLLECTION_ID),
            created_at_from: Some(&from),
            ..Default::default()
        },
        AssetFilterParams {
            token_ids: &tokens,
            owner: Some("0xeven"),
            ..Default::default()
        },
    ] {
        let filters = FilterSet::compile(&params);
        let (items, holders) = queries
            .count_items_with_filter(UNIQUE_ASSETS_TABLE, &filters)
            .await
            .expect("count");
        let rows: Vec<UniqueAsset> = queries
            .query_with_dynamic_filter(UNIQUE_ASSETS_TABLE, 0, 0, &filters)
            .await
            .expect("select");

        assert_eq!(items, rows.len() as i64);
        let mut owners: Vec<&str> = rows.iter().map(|r| r.owner.as_str()).collect();
        owners.sort_unstable();
        owners.dedup();
        assert_eq!(holders, owners.len() as i64);
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn rows_map_every_known_column() {
    let queries = Queries::new(Arc::new(seeded_pool().await));
    let tokens = vec!["1".to_string()];
    let filters = FilterSet::compile(&AssetFilterParams {
        token_ids: &tokens,
        ..Default::default()
    });

    let rows: Vec<UniqueAsset> = queries
        .query_with_dynamic_filter(UNIQUE_ASSETS_TABLE, 10, 0, &filters)
        .await
        .expect("select");

    assert_eq!(rows.len(), 1);
    let asset = &rows[0];
    assert_eq!(asset.chain_id, 1);
    assert_eq!(asset.collection_id, COLLECTION_ID);
    assert_eq!(asset.token_id, "1");
    assert_eq!(asset.owner, "0xodd");
    assert_eq!(asset.attributes, Some(json!({"rarity": "legendary"})));
    assert_eq!(asset.signature, "sig-1");
    assert_eq!(
        asset.created_at,
        Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0)
            .single()
            .expect("valid date")
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn local_source_assembles_pages() {
    let client = local_client(seeded_pool().await);
    let query = AssetQuery::new()
        .with_chain_id(1)
        .with_collection_id(COLLECTION_ID)
        .with_page(2)
        .with_limit(5);

    assert_eq!(client.db_url(), database_url());

    let page = client
        .get_paginated_assets(&query)
        .await
        .expect("local query")
        .expect("collection resolves");

    match page {
        AssetPage::Unique(p) => {
            assert_eq!(p.page, 2);
            assert_eq!(p.limit, 5);
            assert_eq!(p.total_items, 12);
            assert_eq!(p.total_pages, 3);
            assert_eq!(p.holders, Some(2));
            assert_eq!(p.items.len(), 5);
        }
        other => panic!("unexpected page {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn local_unknown_type_yields_nothing() {
    let client = local_client(seeded_pool().await);
    let query = AssetQuery::new()
        .with_chain_id(1)
        .with_collection_id("1:0xdef");

    assert!(client
        .get_paginated_assets(&query)
        .await
        .expect("not an error")
        .is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn numeric_token_ids_can_be_filtered() {
    let pool = connect().await;
    for statement in [
        r#"create temporary table erc_1155_assets (
               id uuid primary key,
               chain_id int4 not null,
               collection_id text not null,
               token_id numeric not null,
               owner text not null,
               balance numeric not null,
               attributes jsonb,
               created_at timestamptz not null,
               updated_at timestamptz not null,
               updated_by uuid not null,
               signature text not null
           )"#,
        r#"insert into erc_1155_assets
               (id, chain_id, collection_id, token_id, owner, balance,
                created_at, updated_at, updated_by, signature)
           select ('00000000-0000-0000-0000-' || lpad(n::text, 12, '0'))::uuid,
                  1, '1:0xabc', n, '0xholder', n * 10,
                  now(), now(), '00000000-0000-0000-0000-0000000000ff'::uuid, 'sig'
           from generate_series(1, 3) as n"#,
    ] {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("seed statement");
    }
    let queries = Queries::new(Arc::new(pool));

    for tokens in [vec!["2".to_string()], vec!["1".to_string(), "3".to_string()]] {
        let filters = FilterSet::compile(&AssetFilterParams {
            token_ids: &tokens,
            ..Default::default()
        });
        let rows: Vec<SemiFungibleAsset> = queries
            .query_with_dynamic_filter(SEMI_FUNGIBLE_ASSETS_TABLE, 10, 0, &filters)
            .await
            .expect("filter on numeric token_id");
        let (items, _) = queries
            .count_items_with_filter(SEMI_FUNGIBLE_ASSETS_TABLE, &filters)
            .await
            .expect("count on numeric token_id");

        let mut found: Vec<String> = rows.into_iter().map(|r| r.token_id).collect();
        found.sort();
        assert_eq!(found, tokens);
        assert_eq!(items, tokens.len() as i64);
    }
}
