use std::path::PathBuf;

use crate::model::IngredientDemandRow;

#[derive(Debug, thiserror::Error)]
pub enum LarderError {
    #[error("failed to read sales export: {0}")]
    InputFormat(String),

    #[error("invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("failed to load rule table from {path}: {reason}")]
    RulesetLoad { path: PathBuf, reason: String },

    #[error("invalid rule table: {0}")]
    RulesetInvalid(String),

    #[error("ingredient mass for '{product}' does not fit in a decimal")]
    Overflow { product: String },

    #[error("historical store at {location} is unusable: {reason}")]
    Storage { location: String, reason: String },

    /// The demand row was computed but could not be written. The row is
    /// handed back so the caller can retry persistence.
    #[error("demand row for {} was computed but not stored: {source}", .row.date)]
    Persist {
        row: Box<IngredientDemandRow>,
        #[source]
        source: Box<LarderError>,
    },

    #[error("invalid config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("no weather data found for the specified location and date range")]
    WeatherNoData,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LarderError {
    /// True for errors caused by the caller's input rather than by the
    /// store or the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LarderError::InputFormat(_)
                | LarderError::InvalidDate { .. }
                | LarderError::Overflow { .. }
        )
    }
}
