mod asset;
mod collection;

pub use self::asset::*;
pub use self::collection::*;

use sqlx::postgres::PgPool;

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Queries {
    db: Arc<PgPool>,
}

impl Queries {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}
