use larder_core::classify::SalesReport;
use larder_core::error::LarderError;
use larder_core::model::{IngredientDemandRow, TRACKED_INGREDIENTS};
use std::io::{self, Write};

pub fn print_report(report: &SalesReport, verbose: bool) -> Result<(), LarderError> {
    write_report(&mut io::stdout().lock(), report, verbose)?;
    Ok(())
}

pub fn print_history(rows: &[IngredientDemandRow], location: &str) -> Result<(), LarderError> {
    write_history(&mut io::stdout().lock(), rows, location)?;
    Ok(())
}

pub fn write_report(out: &mut impl Write, report: &SalesReport, verbose: bool) -> io::Result<()> {
    writeln!(out, "=== Sales {} ===\n", report.sales_date)?;
    writeln!(
        out,
        "  Products: {} unique ({} perishable, {} non-perishable)\n",
        report.num_unique_products,
        report.perishable_products.len(),
        report.non_perishable_products.len()
    )?;

    writeln!(out, "  {:<12} {:>10}", "Ingredient", "Grams")?;
    writeln!(out, "  {}", "-".repeat(23))?;
    for ingredient in TRACKED_INGREDIENTS {
        let grams = report.ingredient_demand.get(ingredient).to_string();
        writeln!(out, "  {:<12} {:>10}", ingredient.id(), grams)?;
    }
    writeln!(
        out,
        "  {:<12} {:>10}\n",
        "total",
        report.ingredient_demand.total().to_string()
    )?;

    if verbose {
        writeln!(out, "  Perishable: {}", join_or_dash(&report.perishable_products))?;
        writeln!(
            out,
            "  Non-perishable: {}\n",
            join_or_dash(&report.non_perishable_products)
        )?;
    }

    if !report.unmapped_products.is_empty() {
        writeln!(
            out,
            "  Perishable products without ingredient rules: {}\n",
            report.unmapped_products.join(", ")
        )?;
    }

    if !report.dropped_rows.is_empty() {
        writeln!(out, "  Rows dropped: {}", report.dropped_row_count())?;
        for row in &report.dropped_rows {
            writeln!(
                out,
                "    {} [{}] ({})",
                row.product_name,
                row.raw_quantity.as_deref().unwrap_or(""),
                row.reason
            )?;
        }
        writeln!(out)?;
    }

    match &report.historical_store_location {
        Some(location) => writeln!(out, "  Stored in {location}"),
        None => writeln!(out, "  Dry run, nothing stored"),
    }
}

pub fn write_history(
    out: &mut impl Write,
    rows: &[IngredientDemandRow],
    location: &str,
) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No rows in {location}");
    }

    write!(out, "  {:<10}", "TANGGAL")?;
    for ingredient in TRACKED_INGREDIENTS {
        write!(out, "  {:>9}", ingredient.column())?;
    }
    writeln!(out)?;
    writeln!(out, "  {}", "-".repeat(10 + TRACKED_INGREDIENTS.len() * 11))?;

    for row in rows {
        write!(out, "  {:<10}", row.date.to_string())?;
        for ingredient in TRACKED_INGREDIENTS {
            write!(out, "  {:>9}", row.get(ingredient).to_string())?;
        }
        writeln!(out)?;
    }
    writeln!(out, "\n  {} day(s) in {}", rows.len(), location)
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
