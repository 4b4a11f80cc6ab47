use larder_core::error::LarderError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), LarderError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
