//! Flattening of forecast timeline payloads into CSV.
//!
//! The payload is the provider's JSON response: a `days` array of daily
//! observations plus `address`, `latitude` and `longitude` at the top level.
//! Fetching it is left to the caller.

use crate::error::LarderError;
use crate::parsing::dates::parse_iso_date;
use serde::Serialize;
use serde_json::Value;

/// Columns placed in front of the per-day fields.
const LEADING_COLUMNS: [&str; 4] = ["location", "latitude", "longitude", "datetime"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherCsv {
    pub content: String,
    pub filename: String,
    pub media_type: &'static str,
}

/// A validated forecast request window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

impl ForecastQuery {
    pub fn new(location: &str, start_date: &str, end_date: &str) -> Result<Self, LarderError> {
        parse_iso_date(start_date)?;
        parse_iso_date(end_date)?;
        Ok(ForecastQuery {
            location: location.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        })
    }

    /// Download name, e.g. `weather_forecast_Bandung_Indonesia_2025-07-01_to_2025-07-07.csv`.
    pub fn csv_filename(&self) -> String {
        let safe_location = self.location.replace([',', ' '], "_");
        format!(
            "weather_forecast_{}_{}_to_{}.csv",
            safe_location, self.start_date, self.end_date
        )
    }
}

/// Render the `days` of a forecast payload as CSV.
pub fn render_forecast_csv(payload: &Value, query: &ForecastQuery) -> Result<WeatherCsv, LarderError> {
    let days = payload
        .get("days")
        .and_then(Value::as_array)
        .ok_or(LarderError::WeatherNoData)?;

    let location = payload
        .get("address")
        .map(cell_text)
        .unwrap_or_else(|| query.location.clone());
    let latitude = payload.get("latitude").map(cell_text).unwrap_or_default();
    let longitude = payload.get("longitude").map(cell_text).unwrap_or_default();

    let mut columns: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
    for day in days.iter().filter_map(Value::as_object) {
        for key in day.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&columns)?;
    for day in days {
        let record: Vec<String> = columns
            .iter()
            .map(|col| match col.as_str() {
                "location" => location.clone(),
                "latitude" => latitude.clone(),
                "longitude" => longitude.clone(),
                key => day.get(key).map(cell_text).unwrap_or_default(),
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| LarderError::Io(e.into_error()))?;
    let content = String::from_utf8(bytes).map_err(|e| LarderError::InputFormat(e.to_string()))?;

    tracing::debug!(days = days.len(), columns = columns.len(), "rendered forecast csv");

    Ok(WeatherCsv {
        content,
        filename: query.csv_filename(),
        media_type: "text/csv",
    })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
