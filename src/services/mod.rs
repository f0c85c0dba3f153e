pub mod error;
pub mod master;
pub mod resolver;

pub use self::master::MasterClient;
pub use self::resolver::MasterDbClient;
