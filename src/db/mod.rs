pub mod connection;
pub mod codec;
pub mod schema;
pub mod reports;
pub mod children;
pub mod snapshots;
pub mod users;

pub use connection::Database;
