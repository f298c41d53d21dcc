mod database;
mod myconfig;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::myconfig::{CardConfig, Config, CryptoConfig};
