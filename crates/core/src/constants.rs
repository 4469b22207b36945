/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Earliest ledger year an entry may hold
pub const MIN_LEDGER_YEAR: i32 = 1;

/// Latest ledger year an entry may hold
pub const MAX_LEDGER_YEAR: i32 = 9999;

/// Number of months in a year table
pub const MONTHS_PER_YEAR: u32 = 12;

/// Growth rate used when a comparison is added without an explicit rate (5 %)
pub const DEFAULT_GROWTH_RATE: &str = "0.05";

/// Label of the depot value dataset
pub const DATASET_LABEL_DEPOT_VALUE: &str = "Depot value";

/// Label of the net transaction dataset
pub const DATASET_LABEL_TRANSACTIONS: &str = "Transactions";
