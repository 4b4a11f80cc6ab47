use larder_core::error::LarderError;
use larder_core::weather::{render_forecast_csv, ForecastQuery};
use std::path::Path;

pub fn run(
    payload_file: &Path,
    location: &str,
    start: &str,
    end: &str,
    out: Option<&Path>,
) -> Result<(), LarderError> {
    let query = ForecastQuery::new(location, start, end)?;
    let payload: serde_json::Value = serde_json::from_slice(&std::fs::read(payload_file)?)?;
    let csv = render_forecast_csv(&payload, &query)?;

    match out {
        Some(path) => {
            std::fs::write(path, &csv.content)?;
            eprintln!(
                "Forecast written to {} (suggested name {})",
                path.display(),
                csv.filename
            );
        }
        None => print!("{}", csv.content),
    }

    Ok(())
}
