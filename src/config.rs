use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CHART_PATH, DEFAULT_CONFIG_PATH, DEFAULT_INPUT_PATH};
use crate::error::{ChartError, Result};
use crate::types::Domain;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub output: OutputConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub input: PathBuf,
    pub delimiter: char,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub chart: PathBuf,
    pub clean_csv: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chart: PathBuf::from(DEFAULT_CHART_PATH),
            clean_csv: None,
        }
    }
}

/// A system called out by name on the chart
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Annotation {
    pub system: String,
    /// Text shown next to the point; defaults to the system name
    pub label: Option<String>,
}

impl Annotation {
    pub fn text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.system)
    }
}

/// Static presentation settings for the chart
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub subtitle: String,
    pub caption: String,
    pub x_label: String,
    pub y_label: String,
    pub point_size: u32,
    /// One `#rrggbb` color per domain, in category order
    pub colors: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let annotate = |system: &str| Annotation {
            system: system.to_string(),
            label: None,
        };

        Self {
            width: 1200,
            height: 800,
            title: "Training compute of notable AI systems".to_string(),
            subtitle: "Floating-point operations used to train each system, by publication date"
                .to_string(),
            caption: "Data: Epoch, Parameter, Compute and Data Trends in Machine Learning".to_string(),
            x_label: "Publication date".to_string(),
            y_label: "Training compute (FLOP)".to_string(),
            point_size: 4,
            colors: vec![
                "#1b9e77".to_string(),
                "#d95f02".to_string(),
                "#7570b3".to_string(),
                "#e7298a".to_string(),
                "#8c8c8c".to_string(),
            ],
            annotations: vec![
                annotate("Perceptron Mark I"),
                annotate("AlexNet"),
                annotate("AlphaGo Master"),
                annotate("GPT-3 175B (davinci)"),
            ],
        }
    }
}

impl ChartConfig {
    /// Parsed RGB color for a domain
    pub fn color_for(&self, domain: Domain) -> Result<(u8, u8, u8)> {
        let hex = self.colors.get(domain.index()).ok_or_else(|| {
            ChartError::Config(format!("No color configured for domain {}", domain))
        })?;
        parse_hex_color(hex)
    }
}

/// `#rrggbb` -> (r, g, b)
pub fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8)> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.is_ascii())
        .ok_or_else(|| ChartError::Config(format!("Invalid color '{}', expected #rrggbb", hex)))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| ChartError::Config(format!("Invalid color '{}', expected #rrggbb", hex)))
    };

    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// config file is used if present, otherwise built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_fallback(path, Path::new(DEFAULT_CONFIG_PATH))
    }

    fn load_with_fallback(path: Option<&Path>, fallback: &Path) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if fallback.exists() => Self::from_file(fallback)?,
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ChartError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Delimiter as the single byte the CSV reader expects. The quote
    /// character and line terminators are reserved by the CSV format.
    pub fn delimiter_byte(&self) -> Result<u8> {
        let delimiter = self.data.delimiter;
        if !delimiter.is_ascii() {
            return Err(ChartError::Config(format!(
                "Delimiter '{}' must be a single ASCII character",
                delimiter
            )));
        }
        if matches!(delimiter, '"' | '\n' | '\r') {
            return Err(ChartError::Config(format!(
                "Delimiter {:?} is reserved by the CSV format",
                delimiter
            )));
        }
        Ok(delimiter as u8)
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;

        let chart = &self.chart;
        if chart.width == 0 || chart.height == 0 {
            return Err(ChartError::Config(format!(
                "Chart size must be positive, got {}x{}",
                chart.width, chart.height
            )));
        }

        if chart.colors.len() < Domain::ALL.len() {
            return Err(ChartError::Config(format!(
                "Expected {} colors (one per domain), got {}",
                Domain::ALL.len(),
                chart.colors.len()
            )));
        }
        for color in &chart.colors {
            parse_hex_color(color)?;
        }

        Ok(())
    }
}
