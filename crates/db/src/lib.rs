pub mod connection;
pub mod indexes;
pub mod models;
pub mod seed;

pub use connection::connect;
