use rust_decimal::Decimal;
use std::str::FromStr;

/// Why a quantity cell could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityIssue {
    Missing,
    NotNumeric,
    Negative,
    TooLarge,
}

/// Largest quantity accepted for a single row.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

impl QuantityIssue {
    pub fn describe(&self) -> &'static str {
        match self {
            QuantityIssue::Missing => "missing quantity",
            QuantityIssue::NotNumeric => "quantity is not numeric",
            QuantityIssue::Negative => "quantity is negative",
            QuantityIssue::TooLarge => "quantity is out of range",
        }
    }
}

/// Coerce a quantity cell from a sales export into a number.
///
/// Handles formats like:
/// - "3" -> 3
/// - " 2.0 " -> 2.0
/// - "1,5" -> 1.5 (decimal comma)
/// - "1,000" or "1.000,5" -> rejected, the comma may be a thousands separator
/// - "" or "abc" -> rejected, never defaulted to zero
pub fn parse_quantity(raw: Option<&str>) -> Result<Decimal, QuantityIssue> {
    let s = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(QuantityIssue::Missing),
    };

    let normalized = normalize_decimal_comma(s).ok_or(QuantityIssue::NotNumeric)?;
    let value = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| QuantityIssue::NotNumeric)?;

    if value < Decimal::ZERO {
        return Err(QuantityIssue::Negative);
    }
    if value > MAX_QUANTITY {
        return Err(QuantityIssue::TooLarge);
    }
    Ok(value)
}

/// Turn a single decimal comma into a point. `None` when the comma could be
/// a thousands separator: more than one comma, a comma next to a point, or
/// exactly three digits after it.
fn normalize_decimal_comma(s: &str) -> Option<String> {
    let idx = match s.find(',') {
        Some(idx) => idx,
        None => return Some(s.to_string()),
    };
    if s.matches(',').count() > 1 || s.contains('.') {
        return None;
    }
    let fraction = &s[idx + 1..];
    if fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.replacen(',', ".", 1))
}

/// Whole servings sold; fractional quantities are truncated.
pub fn servings(quantity: Decimal) -> Decimal {
    quantity.trunc()
}
