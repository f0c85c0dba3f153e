use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::db::query_params::AssetFilterParams;

/// Closed set of filter names. Declaration order is the order predicates are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    CollectionId,
    TokenId,
    Owner,
    CreatedAtFrom,
    CreatedAtTo,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::CollectionId => "collection_id",
            FilterKey::TokenId => "token_id",
            FilterKey::Owner => "owner",
            FilterKey::CreatedAtFrom => "created_at_from",
            FilterKey::CreatedAtTo => "created_at_to",
        }
    }

    /// Column the key constrains.
    pub fn column(&self) -> &'static str {
        match self {
            FilterKey::CreatedAtFrom | FilterKey::CreatedAtTo => "created_at",
            other => other.as_str(),
        }
    }

    /// Left-hand side of an equality or IN-list match. Values are bound as text, so
    /// `token_id` is compared through a text cast to also match NUMERIC storage.
    pub fn operand(&self) -> &'static str {
        match self {
            FilterKey::TokenId => "token_id::text",
            other => other.column(),
        }
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<'a> {
    Gte(&'static str, &'a str),
    Lte(&'static str, &'a str),
    Eq(&'static str, &'a str),
    In(&'static str, &'a [String]),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet(BTreeMap<FilterKey, Vec<String>>);

impl FilterSet {
    pub fn compile(params: &AssetFilterParams<'_>) -> Self {
        let mut filters = BTreeMap::new();

        if let Some(collection_id) = params.collection_id {
            filters.insert(FilterKey::CollectionId, vec![collection_id.to_string()]);
        }
        if !params.token_ids.is_empty() {
            filters.insert(FilterKey::TokenId, params.token_ids.to_vec());
        }
        if let Some(owner) = params.owner {
            filters.insert(FilterKey::Owner, vec![owner.to_string()]);
        }
        if let Some(from) = params.created_at_from {
            filters.insert(FilterKey::CreatedAtFrom, vec![format_timestamp(from)]);
        }
        if let Some(to) = params.created_at_to {
            filters.insert(FilterKey::CreatedAtTo, vec![format_timestamp(to)]);
        }

        FilterSet(filters)
    }

    pub fn get(&self, key: FilterKey) -> Option<&[String]> {
        self.0.get(&key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Column predicates in key order. Range keys always compare, never match equality.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        self.0
            .iter()
            .filter_map(|(key, values)| match (key, values.as_slice()) {
                (_, []) => None,
                (FilterKey::CreatedAtFrom, [from, ..]) => Some(Predicate::Gte(key.column(), from)),
                (FilterKey::CreatedAtTo, [to, ..]) => Some(Predicate::Lte(key.column(), to)),
                (_, [value]) => Some(Predicate::Eq(key.operand(), value)),
                (_, values) => Some(Predicate::In(key.operand(), values)),
            })
            .collect()
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
