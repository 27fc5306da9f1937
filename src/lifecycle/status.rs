use crate::models::shipment::{Document, Shipment, ShipmentStatus};

/// True when a multi-document shipment has some, but not all, documents
/// delivered.
pub fn is_partially_delivered(documents: &[Document]) -> bool {
    if documents.len() <= 1 {
        return false;
    }
    let delivered = documents.iter().filter(|d| d.is_delivered).count();
    delivered > 0 && delivered < documents.len()
}

/// Status a shipment ends up in when `requested` is applied over the given
/// documents. Document delivery counts win over the request, except for a
/// retention. A partial delivery that leaves nothing undelivered is final.
pub fn resolve_status(requested: ShipmentStatus, documents: &[Document]) -> ShipmentStatus {
    if requested == ShipmentStatus::Retained {
        return requested;
    }
    if is_partially_delivered(documents) {
        return ShipmentStatus::PartiallyDelivered;
    }
    if requested == ShipmentStatus::PartiallyDelivered && documents.iter().all(|d| d.is_delivered)
    {
        return ShipmentStatus::DeliveredFinal;
    }
    requested
}

/// Status to report for a stored shipment.
///
/// This is authoritative over the persisted `status` column: a crashed or
/// raced transition can leave documents delivered without the parent
/// updated, and reads must still show the partial delivery.
pub fn derived_status(shipment: &Shipment) -> ShipmentStatus {
    resolve_status(shipment.status, &shipment.documents)
}
