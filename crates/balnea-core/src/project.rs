use crate::model::{IndexRow, Station, StationPoint};
use std::collections::BTreeMap;

/// Project the aggregate into the externally consumed output shape.
///
/// History comes out ascending by ISO date (the history set's ordering),
/// `latest` is its last element, and the whole sequence is ordered by code
/// so successive runs diff cleanly.
pub fn project(stations: &BTreeMap<String, Station>) -> Vec<StationPoint> {
    stations
        .values()
        .map(|s| {
            let history: Vec<_> = s.history.iter().cloned().collect();
            let latest = history.last().cloned();
            StationPoint {
                code: s.code.clone(),
                beach: s.beach.clone(),
                reference: s.reference.clone(),
                city: s.city.clone(),
                lat: s.lat,
                lng: s.lng,
                latest,
                history,
                source_laudo: s.source_laudo.clone(),
            }
        })
        .collect()
}

/// Flat operator index, one row per station in code order.
///
/// Mirrors the geocode table's columns so operators can fill in missing
/// coordinates and feed the file straight back in as a geocode table.
pub fn index_rows(stations: &BTreeMap<String, Station>) -> Vec<IndexRow> {
    stations
        .values()
        .map(|s| IndexRow {
            code: s.code.clone(),
            beach: s.beach.clone().unwrap_or_default(),
            reference: s.reference.clone().unwrap_or_default(),
            city: s.city.clone().unwrap_or_default(),
            lat: s.lat,
            lng: s.lng,
        })
        .collect()
}
