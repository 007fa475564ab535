use balnea_core::error::BalneaError;
use balnea_core::extraction::pdftotext::PdftotextExtractor;
use balnea_core::model::CandidateRecord;
use std::path::PathBuf;

use crate::output;

pub fn run(
    files: Vec<PathBuf>,
    output_format: &str,
    out: Option<PathBuf>,
    source_url: Option<String>,
) -> Result<(), BalneaError> {
    let extractor = PdftotextExtractor::new();
    let mut candidates: Vec<CandidateRecord> = Vec::new();

    for file in &files {
        let bytes = std::fs::read(file)?;
        let url = source_url
            .clone()
            .unwrap_or_else(|| format!("file://{}", file.display()));
        let found = balnea_core::scan_document(&bytes, &extractor, &url)?;
        if found.is_empty() {
            eprintln!(
                "warning: {}: no records extracted (layout drift?)",
                file.display()
            );
        }
        candidates.extend(found);
    }

    match out {
        Some(path) => {
            let json = serde_json::to_string_pretty(&candidates)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Extracted {} record(s), written to {}",
                candidates.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&candidates)?,
            _ => output::table::candidates(&candidates),
        },
    }

    Ok(())
}
