use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical status for water considered safe for bathing.
pub const STATUS_FIT: &str = "PRÓPRIO";
/// Canonical status for water considered unsafe for bathing.
pub const STATUS_UNFIT: &str = "IMPRÓPRIO";
/// Canonical status when a bulletin carries no recognizable status token.
pub const STATUS_UNKNOWN: &str = "DESCONHECIDO";

/// One raw observation produced by a single heuristic match.
///
/// Everything is kept as text at this stage; empty string means the field was
/// not found. Canonicalization of `status` and `date` happens again during
/// aggregation, so partially normalized candidates are safe to feed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub code: String,
    pub beach: String,
    pub reference: String,
    pub status: String,
    pub date: String,
    pub source_url: String,
}

/// A single dated status observation for a station.
///
/// Ordered by date first (ISO strings sort chronologically), so a
/// `BTreeSet<Sample>` materializes a station's history in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub date: String,
    pub status: String,
}

/// The durable per-station aggregate, keyed by station code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    pub beach: Option<String>,
    pub reference: Option<String>,
    pub city: Option<String>,
    pub history: BTreeSet<Sample>,
    pub source_laudo: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Station {
    pub fn new(code: impl Into<String>) -> Self {
        Station {
            code: code.into(),
            beach: None,
            reference: None,
            city: None,
            history: BTreeSet::new(),
            source_laudo: None,
            lat: None,
            lng: None,
        }
    }
}

/// Externally consumed output record, one per station.
///
/// `Deserialize` is implemented so a previous run's output can be re-read and
/// used to seed the next run's aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationPoint {
    pub code: String,
    pub beach: Option<String>,
    pub reference: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub latest: Option<Sample>,
    pub history: Vec<Sample>,
    pub source_laudo: Option<String>,
}

/// Flat operator-facing index row, mirroring the geocode table columns so the
/// index can be hand-completed and fed back in as a geocode table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRow {
    pub code: String,
    pub beach: String,
    pub reference: String,
    pub city: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
