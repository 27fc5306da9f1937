pub mod budget;
pub mod delivery;
pub mod message;
pub mod price_table;
pub mod shipment;

pub use message::*;
