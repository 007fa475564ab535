use balnea_core::extraction::pdftotext::PdftotextExtractor;
use balnea_core::model::{CandidateRecord, StationPoint};
use balnea_core::parsing::normalize::extract_date_from_text;
use balnea_core::{consolidate, error::BalneaError, geocode, project};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

pub fn run(
    mut files: Vec<PathBuf>,
    geocodes: Option<PathBuf>,
    previous: Option<PathBuf>,
    points_out: PathBuf,
    index_out: Option<PathBuf>,
    source_url: Option<String>,
) -> Result<(), BalneaError> {
    // Newest bulletin first, so the first-wins aggregation policy prefers
    // the most recent document's wording. Undated filenames keep their
    // given order at the end.
    files.sort_by_key(|p| {
        let name = p.file_name().map(|n| n.to_string_lossy().into_owned());
        Reverse(name.as_deref().and_then(extract_date_from_text))
    });

    let extractor = PdftotextExtractor::new();
    let mut candidates: Vec<CandidateRecord> = Vec::new();
    let mut first_url: Option<String> = None;

    for file in &files {
        let bytes = std::fs::read(file)?;
        let url = source_url
            .clone()
            .unwrap_or_else(|| format!("file://{}", file.display()));
        first_url.get_or_insert_with(|| url.clone());

        let found = balnea_core::scan_document(&bytes, &extractor, &url)?;
        if found.is_empty() {
            eprintln!(
                "warning: {}: no records extracted (layout drift?)",
                file.display()
            );
        }
        candidates.extend(found);
    }

    let previous_points: Vec<StationPoint> = match &previous {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            serde_json::from_slice(&bytes)?
        }
        None => Vec::new(),
    };

    let table = match &geocodes {
        Some(path) => geocode::load(path)?,
        None => geocode::GeocodeTable::new(),
    };

    let run_url = source_url.or(first_url).unwrap_or_default();
    let mut stations = consolidate::seed_from_points(&previous_points);
    consolidate::aggregate_into(&mut stations, &candidates, &run_url);
    geocode::attach(&mut stations, &table);

    let points = project::project(&stations);
    if points.is_empty() {
        // An empty run must not clobber previously published output.
        eprintln!(
            "No stations consolidated; keeping existing {}",
            points_out.display()
        );
    } else {
        let json = serde_json::to_string_pretty(&points)?;
        std::fs::write(&points_out, json)?;
        eprintln!(
            "Wrote {} ({} station(s))",
            points_out.display(),
            points.len()
        );
    }

    if let Some(index_path) = index_out {
        write_index(&index_path, &project::index_rows(&stations))?;
        eprintln!("Wrote {}", index_path.display());
    }

    Ok(())
}

fn write_index(
    path: &Path,
    rows: &[balnea_core::model::IndexRow],
) -> Result<(), BalneaError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(["code", "beach", "reference", "city", "lat", "lng"])?;
    for row in rows {
        let lat = row.lat.map(|v| v.to_string()).unwrap_or_default();
        let lng = row.lng.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            row.code.as_str(),
            row.beach.as_str(),
            row.reference.as_str(),
            row.city.as_str(),
            lat.as_str(),
            lng.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
