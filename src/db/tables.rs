//! Table names and schema statements for the record store.

/// Provides constants for the "price_tables" table.
pub struct PriceTableTable;

impl PriceTableTable {
    pub const TABLE_NAME: &'static str = "price_tables";

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                multiplier REAL NOT NULL,
                rates TEXT NOT NULL,
                door_to_door_rate_per_km REAL NOT NULL,
                waiting_hour_rates TEXT NOT NULL,
                insurance_rates TEXT NOT NULL,
                custom_services TEXT NOT NULL,
                last_edit TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }
}

/// Provides constants for the "budgets" table. Budgets keep their priced
/// totals, so the price table they were quoted on may be deleted later.
pub struct BudgetTable;

impl BudgetTable {
    pub const TABLE_NAME: &'static str = "budgets";

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                client_id TEXT NOT NULL,
                price_table_id TEXT NOT NULL,
                delivery_type TEXT NOT NULL,
                merchandise_value REAL NOT NULL,
                has_collection INTEGER NOT NULL,
                has_delivery INTEGER NOT NULL,
                packages TEXT NOT NULL,
                additional_services TEXT NOT NULL,
                total_volumes INTEGER NOT NULL,
                total_value REAL NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }
}

/// Provides constants for the "shipments" table.
pub struct ShipmentTable;

impl ShipmentTable {
    pub const TABLE_NAME: &'static str = "shipments";

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                client_id TEXT NOT NULL,
                transport_mode TEXT NOT NULL,
                carrier TEXT NOT NULL,
                tracking_number TEXT NOT NULL,
                packages INTEGER NOT NULL,
                weight REAL NOT NULL,
                arrival_flight TEXT,
                arrival_date TEXT,
                status TEXT NOT NULL,
                is_retained INTEGER NOT NULL,
                fiscal_action TEXT,
                receiver_name TEXT,
                delivery_date TEXT,
                delivery_time TEXT,
                last_edit TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }
}

/// Provides constants for the "shipment_documents" table. Documents keep
/// their position so a shipment reads back in the order it was created.
pub struct DocumentTable;

impl DocumentTable {
    pub const TABLE_NAME: &'static str = "shipment_documents";

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                shipment_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                minute_number TEXT NOT NULL,
                invoice_numbers TEXT NOT NULL,
                packages INTEGER,
                weight REAL,
                is_delivered INTEGER NOT NULL,
                notes TEXT,
                last_edit TEXT NOT NULL,
                FOREIGN KEY (shipment_id) REFERENCES {}(id)
            )",
            Self::TABLE_NAME,
            ShipmentTable::TABLE_NAME
        )
    }
}

/// Provides constants for the "deliveries" table. `shipment_id` is a plain
/// reference; shipments keep no list of their deliveries.
pub struct DeliveryTable;

impl DeliveryTable {
    pub const TABLE_NAME: &'static str = "deliveries";

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                client_id TEXT NOT NULL,
                shipment_id TEXT NOT NULL,
                document_id TEXT,
                delivery_date TEXT NOT NULL,
                delivery_time TEXT NOT NULL,
                receiver_name TEXT NOT NULL,
                weight REAL NOT NULL,
                packages INTEGER NOT NULL,
                notes TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }
}
