/// Canonical column names after header normalization.
/// The cleaned table always carries exactly these four, in this order.
pub const COL_SYSTEM: &str = "system";
pub const COL_PUBLICATION_DATE: &str = "publication_date";
pub const COL_TRAINING_COMPUTE: &str = "training_compute_flop";
pub const COL_DOMAIN: &str = "domain";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_SYSTEM,
    COL_PUBLICATION_DATE,
    COL_TRAINING_COMPUTE,
    COL_DOMAIN,
];

// Fixed relative paths used when no config or flag overrides them
pub const DEFAULT_CONFIG_PATH: &str = "compute_trends.toml";
pub const DEFAULT_INPUT_PATH: &str = "data/ai_training_compute.csv";
pub const DEFAULT_CHART_PATH: &str = "output/ai_training_compute.svg";

pub const LOG_DIR: &str = "logs";

/// Years subtracted from a date that parsed into the future.
pub const CENTURY_SHIFT_YEARS: i32 = 100;
