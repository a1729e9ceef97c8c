use thiserror::Error;

/// Fatal failures of a chart run.
///
/// Bad individual values never end up here: an unparsable number or date is
/// marked missing by the coercer, and an unknown domain label maps to `Other`.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited text error: {0}")]
    Parse(#[from] csv::Error),

    #[error("Input is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Chart rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
