pub mod bindings;
pub mod columns;
pub mod filter;
pub mod queries;
pub mod query_params;
mod types;

pub use self::bindings::*;
pub use self::columns::*;
pub use self::filter::*;
pub use self::queries::*;
pub use self::types::*;
