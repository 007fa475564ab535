//! Integration tests for the scan -> consolidate -> project pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without invoking
//! pdftotext, so these tests run without poppler-utils.

use balnea_core::consolidate_run;
use balnea_core::error::BalneaError;
use balnea_core::extraction::{PageContent, PdfExtractor};
use balnea_core::geocode::{self, GeocodeTable};
use balnea_core::model::{STATUS_FIT, STATUS_UNFIT};
use balnea_core::scan_document;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, BalneaError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Test 1: linear-pattern row all the way to a projected station
// ---------------------------------------------------------------------------
#[test]
fn linear_row_to_projected_station() {
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            &["P19 Praia: Olho de Porco Ponto de referência: Em frente ao Farol Data da coleta: 01/09/2025 Status: PRÓPRIO"],
        )],
    };

    let url = "https://example.org/laudo-setembro.pdf";
    let candidates = scan_document(&[], &extractor, url).unwrap();
    // the linear pattern contributes the fully fielded candidate; the block
    // split may add a coarser one, which aggregation dedups
    assert!(candidates.iter().any(|c| c.code == "P19"
        && c.beach == "Olho de Porco"
        && c.reference == "Em frente ao Farol"
        && c.date == "01/09/2025"
        && c.status == STATUS_FIT));

    let points = consolidate_run(&candidates, url, &GeocodeTable::new(), &[]);
    assert_eq!(points.len(), 1);
    let p = &points[0];
    assert_eq!(p.code, "P19");
    assert_eq!(p.history.len(), 1);
    let latest = p.latest.as_ref().unwrap();
    assert_eq!(latest.date, "2025-09-01");
    assert_eq!(latest.status, STATUS_FIT);
    assert_eq!(p.source_laudo.as_deref(), Some(url));
}

// ---------------------------------------------------------------------------
// Test 2: history mining feeds the station's series without touching
// its descriptive fields
// ---------------------------------------------------------------------------
#[test]
fn mined_history_extends_station_series() {
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            &["P05Praia: Caolho Referência: Posto 3 Data da coleta: 09/04/2024 Status: PRÓPRIO Série histórica: 12/03/2024 - IMPRÓPRIO"],
        )],
    };

    let candidates = scan_document(&[], &extractor, "u").unwrap();
    let points = consolidate_run(&candidates, "u", &GeocodeTable::new(), &[]);
    assert_eq!(points.len(), 1);
    let p = &points[0];
    assert_eq!(p.beach.as_deref(), Some("Caolho"));
    assert_eq!(p.reference.as_deref(), Some("Posto 3"));
    assert_eq!(p.history.len(), 2);
    assert_eq!(p.history[0].date, "2024-03-12");
    assert_eq!(p.history[0].status, STATUS_UNFIT);
    assert_eq!(p.history[1].date, "2024-04-09");
    assert_eq!(p.history[1].status, STATUS_FIT);
}

// ---------------------------------------------------------------------------
// Test 3: re-ingesting the same document adds nothing
// ---------------------------------------------------------------------------
#[test]
fn reingesting_same_document_is_idempotent() {
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            &["P03 Praia: Calhau Referência: Quiosque 5 Data da coleta: 02/06/2025 Status: IMPRÓPRIO"],
        )],
    };

    let once = scan_document(&[], &extractor, "u").unwrap();
    let mut twice = once.clone();
    twice.extend(scan_document(&[], &extractor, "u").unwrap());

    let points_once = consolidate_run(&once, "u", &GeocodeTable::new(), &[]);
    let points_twice = consolidate_run(&twice, "u", &GeocodeTable::new(), &[]);
    assert_eq!(points_once[0].history, points_twice[0].history);
}

// ---------------------------------------------------------------------------
// Test 4: geocode table overrides extracted names and supplies coordinates
// ---------------------------------------------------------------------------
#[test]
fn geocode_table_is_authoritative_for_names() {
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            &["P19 Praia: olho de porco (rascunho) Referência: farol Status: PRÓPRIO"],
        )],
    };
    let candidates = scan_document(&[], &extractor, "u").unwrap();

    let table = geocode::from_reader(
        "code,beach,reference,city,lat,lng\n\
         P19,Olho de Porco,\"Em frente ao Farol\",São José de Ribamar,-2.561,-44.054\n"
            .as_bytes(),
    );
    let points = consolidate_run(&candidates, "u", &table, &[]);
    let p = &points[0];
    assert_eq!(p.beach.as_deref(), Some("Olho de Porco"));
    assert_eq!(p.reference.as_deref(), Some("Em frente ao Farol"));
    assert_eq!(p.city.as_deref(), Some("São José de Ribamar"));
    assert_eq!(p.lat, Some(-2.561));
    assert_eq!(p.lng, Some(-44.054));
}

// ---------------------------------------------------------------------------
// Test 5: output ordering is lexicographic on the code string
// ---------------------------------------------------------------------------
#[test]
fn projection_orders_codes_lexicographically() {
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            &[
                "P2 Praia: Dois Referência: A Status: PRÓPRIO",
                "P10 Praia: Dez Referência: B Status: PRÓPRIO",
                "P1 Praia: Um Referência: C Status: PRÓPRIO",
            ],
        )],
    };
    let candidates = scan_document(&[], &extractor, "u").unwrap();
    let points = consolidate_run(&candidates, "u", &GeocodeTable::new(), &[]);
    let codes: Vec<&str> = points.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["P1", "P10", "P2"]);
}

// ---------------------------------------------------------------------------
// Test 6: a drifted document contributes nothing and harms nothing
// ---------------------------------------------------------------------------
#[test]
fn drifted_document_yields_empty_candidates() {
    let extractor = MockExtractor {
        pages: vec![page(1, &["Boletim informativo sem tabela de pontos."])],
    };
    let candidates = scan_document(&[], &extractor, "u").unwrap();
    assert!(candidates.is_empty());
    let points = consolidate_run(&candidates, "u", &GeocodeTable::new(), &[]);
    assert!(points.is_empty());
}

// ---------------------------------------------------------------------------
// Test 7: previous run's output seeds the next run
// ---------------------------------------------------------------------------
#[test]
fn previous_points_seed_next_run() {
    let first = MockExtractor {
        pages: vec![page(
            1,
            &["P05 Praia: Caolho Referência: Posto 3 Data da coleta: 12/03/2024 Status: IMPRÓPRIO"],
        )],
    };
    let old_url = "https://example.org/laudo-marco.pdf";
    let candidates = scan_document(&[], &first, old_url).unwrap();
    let previous = consolidate_run(&candidates, old_url, &GeocodeTable::new(), &[]);

    let second = MockExtractor {
        pages: vec![page(
            1,
            &["P05 Praia: Caolho Referência: Posto 3 Data da coleta: 09/04/2024 Status: PRÓPRIO"],
        )],
    };
    let new_url = "https://example.org/laudo-abril.pdf";
    let candidates = scan_document(&[], &second, new_url).unwrap();
    let points = consolidate_run(&candidates, new_url, &GeocodeTable::new(), &previous);

    assert_eq!(points.len(), 1);
    let p = &points[0];
    assert_eq!(p.history.len(), 2);
    assert_eq!(p.history[0].date, "2024-03-12");
    assert_eq!(p.history[1].date, "2024-04-09");
    let latest = p.latest.as_ref().unwrap();
    assert_eq!(latest.status, STATUS_FIT);
    // provenance stays with the first document that ever contributed
    assert_eq!(p.source_laudo.as_deref(), Some(old_url));
}
