pub mod consolidate;
pub mod error;
pub mod extraction;
pub mod geocode;
pub mod model;
pub mod parsing;
pub mod project;

use error::BalneaError;
use extraction::PdfExtractor;
use geocode::GeocodeTable;
use model::{CandidateRecord, StationPoint};

/// Extract candidate station records from one bulletin document.
///
/// Runs the heuristic cascade over the extracted page text. An empty result
/// means the document's layout drifted out of reach of every heuristic,
/// which is a normal outcome, not an error.
pub fn scan_document(
    doc_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    source_url: &str,
) -> Result<Vec<CandidateRecord>, BalneaError> {
    let pages = extractor.extract_pages(doc_bytes)?;
    Ok(parsing::extract_candidates(&pages, source_url))
}

/// Consolidate one run's candidates into the projected per-station output.
///
/// Pure function from extracted data plus tables to the output projection:
/// seeds the aggregate from the previous run's points (empty slice for a
/// fresh run), folds the candidates in, joins the geocode table, projects.
pub fn consolidate_run(
    candidates: &[CandidateRecord],
    source_url: &str,
    geocodes: &GeocodeTable,
    previous: &[StationPoint],
) -> Vec<StationPoint> {
    let mut stations = consolidate::seed_from_points(previous);
    consolidate::aggregate_into(&mut stations, candidates, source_url);
    geocode::attach(&mut stations, geocodes);
    project::project(&stations)
}
