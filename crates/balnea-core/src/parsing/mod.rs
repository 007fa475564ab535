pub mod heuristics;
pub mod normalize;

use crate::extraction::PageContent;
use crate::model::CandidateRecord;
use heuristics::{DocumentView, Heuristic, ScanContext};

/// Structured heuristics, in execution order. Both always run and their
/// outputs accumulate; duplicates are resolved later at aggregation.
pub const PRIMARY_HEURISTICS: &[(&str, Heuristic)] = &[
    ("block-split", heuristics::block_split),
    ("linear-pattern", heuristics::linear_pattern),
];

/// Last-resort heuristic with a higher false-positive risk.
pub const FALLBACK_HEURISTIC: (&str, Heuristic) = ("loose-row", heuristics::loose_row);

/// Gating policy: the fallback runs only when the structured heuristics
/// produced nothing at all for the document.
fn needs_fallback(primary: &[CandidateRecord]) -> bool {
    primary.is_empty()
}

/// Run the full heuristic cascade over one document's pages.
///
/// Primary heuristics accumulate, the fallback is gated, and history mining
/// runs last over whatever anchors were found. An empty result is a normal
/// outcome for a document whose layout drifted out of reach.
pub fn extract_candidates(pages: &[PageContent], source_url: &str) -> Vec<CandidateRecord> {
    let view = DocumentView::from_pages(pages);
    let ctx = ScanContext::new(&view, source_url);

    let mut candidates = Vec::new();
    for (_, heuristic) in PRIMARY_HEURISTICS {
        candidates.extend(heuristic(&view, &ctx));
    }
    if needs_fallback(&candidates) {
        let (_, fallback) = FALLBACK_HEURISTIC;
        candidates.extend(fallback(&view, &ctx));
    }
    if !candidates.is_empty() {
        let mined = heuristics::mine_history(&view, &candidates);
        candidates.extend(mined);
    }
    candidates
}
