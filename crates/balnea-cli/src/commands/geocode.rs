use balnea_core::error::BalneaError;
use balnea_core::geocode::{self, GeocodeTable};
use std::path::Path;

/// Report how many indexed stations still lack coordinates.
pub fn coverage(index: &Path, geocodes: &Path) -> Result<(), BalneaError> {
    // The index mirrors the geocode column layout, so the same parser reads both.
    let indexed = geocode::load(index)?;
    let table = geocode::load(geocodes)?;

    let missing: Vec<(&String, &geocode::GeocodeEntry)> = indexed
        .iter()
        .filter(|(code, _)| {
            table
                .get(*code)
                .map(|g| g.lat.is_empty() || g.lng.is_empty())
                .unwrap_or(true)
        })
        .collect();

    println!("Stations indexed: {}", indexed.len());
    println!("Missing coordinates: {}", missing.len());
    if !missing.is_empty() {
        println!("Examples:");
        for (code, entry) in missing.iter().take(10) {
            println!("  {} | {} | {}", code, entry.beach, entry.reference);
        }
    }

    Ok(())
}

/// Merge an official coordinates CSV into the geocode table file.
pub fn import(src: &Path, geocodes: &Path) -> Result<(), BalneaError> {
    let src_file = std::fs::File::open(src).map_err(|e| BalneaError::GeocodeLoad {
        path: src.to_path_buf(),
        reason: e.to_string(),
    })?;
    let incoming = geocode::from_reader_by_header(src_file)?;
    if incoming.is_empty() {
        eprintln!("Nothing to import: source file is empty or unreadable.");
        return Ok(());
    }

    let current = if geocodes.exists() {
        geocode::load(geocodes)?
    } else {
        GeocodeTable::new()
    };

    let merged = geocode::merge_official(&current, &incoming);
    write_table(geocodes, &merged)?;
    eprintln!(
        "Merged into {} ({} station(s))",
        geocodes.display(),
        merged.len()
    );

    Ok(())
}

fn write_table(path: &Path, table: &GeocodeTable) -> Result<(), BalneaError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(["code", "beach", "reference", "city", "lat", "lng"])?;
    for (code, entry) in table {
        wtr.write_record([
            code.as_str(),
            entry.beach.as_str(),
            entry.reference.as_str(),
            entry.city.as_str(),
            entry.lat.as_str(),
            entry.lng.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
