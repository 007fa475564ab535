use crate::error::BalneaError;
use crate::model::Station;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// One curated row of the geocode reference table. Coordinates stay raw text
/// until the merge so a malformed value can be skipped without losing the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeEntry {
    pub beach: String,
    pub reference: String,
    pub city: String,
    pub lat: String,
    pub lng: String,
}

pub type GeocodeTable = BTreeMap<String, GeocodeEntry>;

/// Load the geocode table from a CSV file.
pub fn load(path: &Path) -> Result<GeocodeTable, BalneaError> {
    let file = std::fs::File::open(path).map_err(|e| BalneaError::GeocodeLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(from_reader(file))
}

/// Parse the positional `code,beach,reference,city,lat,lng` format.
///
/// The header row is skipped, quoted fields may embed the delimiter, and
/// short or unparseable rows are silently dropped. Codes are uppercased to
/// form the join key.
pub fn from_reader<R: io::Read>(reader: R) -> GeocodeTable {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut table = GeocodeTable::new();
    for record in rdr.records() {
        let Ok(record) = record else { continue };
        if record.len() < 6 {
            continue;
        }
        let code = record[0].trim().to_uppercase();
        if code.is_empty() {
            continue;
        }
        table.insert(
            code,
            GeocodeEntry {
                beach: record[1].trim().to_string(),
                reference: record[2].trim().to_string(),
                city: record[3].trim().to_string(),
                lat: record[4].trim().to_string(),
                lng: record[5].trim().to_string(),
            },
        );
    }
    table
}

/// Parse a header-addressed CSV into a geocode table.
///
/// Accepts any column subset that includes `code` (e.g. `code,lat,lng`),
/// which is the shape official coordinate handoffs tend to arrive in.
pub fn from_reader_by_header<R: io::Read>(reader: R) -> Result<GeocodeTable, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let (code_col, beach_col, ref_col, city_col, lat_col, lng_col) = (
        col("code"),
        col("beach"),
        col("reference"),
        col("city"),
        col("lat"),
        col("lng"),
    );

    let mut table = GeocodeTable::new();
    for record in rdr.records() {
        let Ok(record) = record else { continue };
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let code = field(code_col).to_uppercase();
        if code.is_empty() {
            continue;
        }
        table.insert(
            code,
            GeocodeEntry {
                beach: field(beach_col),
                reference: field(ref_col),
                city: field(city_col),
                lat: field(lat_col),
                lng: field(lng_col),
            },
        );
    }
    Ok(table)
}

/// Join stations with the curated geocode table.
///
/// The table is the authoritative source for canonical names, so non-empty
/// text fields overwrite whatever extraction produced, inverting the
/// aggregator's first-wins rule. Coordinates are parsed independently and a
/// malformed value leaves the station's prior value in place.
pub fn attach(stations: &mut BTreeMap<String, Station>, table: &GeocodeTable) {
    for (code, station) in stations.iter_mut() {
        let Some(entry) = table.get(code) else {
            continue;
        };
        if !entry.city.is_empty() {
            station.city = Some(entry.city.clone());
        }
        if !entry.beach.is_empty() {
            station.beach = Some(entry.beach.clone());
        }
        if !entry.reference.is_empty() {
            station.reference = Some(entry.reference.clone());
        }
        if let Ok(lat) = entry.lat.trim().parse::<f64>() {
            station.lat = Some(lat);
        }
        if let Ok(lng) = entry.lng.trim().parse::<f64>() {
            station.lng = Some(lng);
        }
    }
}

/// Merge an official coordinates table into the current one.
///
/// Official values prevail whenever present; existing values survive
/// otherwise. Stations only known to one side are kept.
pub fn merge_official(current: &GeocodeTable, incoming: &GeocodeTable) -> GeocodeTable {
    let mut merged = current.clone();
    for (code, inc) in incoming {
        let entry = merged.entry(code.clone()).or_default();
        if !inc.beach.is_empty() {
            entry.beach = inc.beach.clone();
        }
        if !inc.reference.is_empty() {
            entry.reference = inc.reference.clone();
        }
        if !inc.city.is_empty() {
            entry.city = inc.city.clone();
        }
        if !inc.lat.is_empty() {
            entry.lat = inc.lat.clone();
        }
        if !inc.lng.is_empty() {
            entry.lng = inc.lng.clone();
        }
    }
    merged
}
