pub mod connection;

pub use connection::{ConnectionManager, SharedConnectionManager, handle_socket};
