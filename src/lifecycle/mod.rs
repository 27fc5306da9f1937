//! Shipment status lifecycle: transit, retention and document-driven
//! partial or final delivery.

pub mod ports;
pub mod request;
pub mod service;
pub mod status;

pub use ports::{
    Clock, DeliveryRepository, EventSink, ShipmentEvent, ShipmentRepository, SystemClock,
};
pub use request::{DeliveryReceipt, RetentionInput, StatusChangeRequest};
pub use service::{ShipmentLifecycle, TransitionOutcome, TransitionStep};
pub use status::{derived_status, resolve_status};
