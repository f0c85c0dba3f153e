pub mod asset;
pub mod pagination;

pub use self::asset::*;
pub use self::pagination::*;
