use crate::model::{CandidateRecord, Sample, Station, StationPoint};
use crate::parsing::normalize::{canonicalize_date_br, canonicalize_status, is_iso_date};
use std::collections::BTreeMap;

/// Fold raw candidate records into one station per code.
///
/// `source_url` is the run-level provenance fallback for candidates that
/// carry no source of their own.
pub fn aggregate(
    candidates: &[CandidateRecord],
    source_url: &str,
) -> BTreeMap<String, Station> {
    let mut stations = BTreeMap::new();
    aggregate_into(&mut stations, candidates, source_url);
    stations
}

/// Aggregate candidates into an existing station map.
///
/// Candidates must be fed in the order the heuristics executed: history
/// insertion is order-independent (set semantics), but the first-non-empty
/// wins rule for `beach`/`reference`/`source_laudo` is not, and feeding in
/// cascade order is what makes runs reproducible. Descriptive fields already
/// present in the map (from a previous run's seed) are never overwritten
/// here; the geocode merge is the only stage allowed to do that.
pub fn aggregate_into(
    stations: &mut BTreeMap<String, Station>,
    candidates: &[CandidateRecord],
    source_url: &str,
) {
    for candidate in candidates {
        let code = candidate.code.trim().to_uppercase();
        if code.is_empty() {
            continue;
        }
        let station = stations
            .entry(code.clone())
            .or_insert_with(|| Station::new(code));

        if station.beach.is_none() && !candidate.beach.is_empty() {
            station.beach = Some(candidate.beach.clone());
        }
        if station.reference.is_none() && !candidate.reference.is_empty() {
            station.reference = Some(candidate.reference.clone());
        }

        // Idempotent for candidates the extractor already canonicalized
        let status = canonicalize_status(&candidate.status);
        let date = canonicalize_date_br(&candidate.date);
        // A date that failed to canonicalize stays a passthrough string and
        // must not become a history sample.
        if is_iso_date(&date) {
            station.history.insert(Sample { date, status });
        }

        if station.source_laudo.is_none() {
            let src = if candidate.source_url.is_empty() {
                source_url
            } else {
                &candidate.source_url
            };
            if !src.is_empty() {
                station.source_laudo = Some(src.to_string());
            }
        }
    }
}

/// Rebuild a station map from a previous run's projected output.
///
/// This is how station identity persists across runs: the engine holds no
/// state, the caller re-reads the last output and seeds the next aggregate
/// with it before feeding in freshly extracted candidates.
pub fn seed_from_points(points: &[StationPoint]) -> BTreeMap<String, Station> {
    let mut stations = BTreeMap::new();
    for point in points {
        let code = point.code.trim().to_uppercase();
        if code.is_empty() {
            continue;
        }
        let station = stations
            .entry(code.clone())
            .or_insert_with(|| Station::new(code));

        if station.beach.is_none() {
            station.beach = point.beach.clone().filter(|s| !s.is_empty());
        }
        if station.reference.is_none() {
            station.reference = point.reference.clone().filter(|s| !s.is_empty());
        }
        if station.city.is_none() {
            station.city = point.city.clone().filter(|s| !s.is_empty());
        }
        if station.source_laudo.is_none() {
            station.source_laudo = point.source_laudo.clone().filter(|s| !s.is_empty());
        }
        station.lat = station.lat.or(point.lat);
        station.lng = station.lng.or(point.lng);

        for sample in &point.history {
            if is_iso_date(&sample.date) {
                station.history.insert(sample.clone());
            }
        }
    }
    stations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{STATUS_FIT, STATUS_UNFIT};

    fn candidate(code: &str, beach: &str, status: &str, date: &str) -> CandidateRecord {
        CandidateRecord {
            code: code.into(),
            beach: beach.into(),
            reference: String::new(),
            status: status.into(),
            date: date.into(),
            source_url: String::new(),
        }
    }

    #[test]
    fn test_aggregate_builds_history() {
        let agg = aggregate(
            &[candidate("P19", "Olho de Porco", "PRÓPRIO", "01/09/2025")],
            "http://example.org/laudo.pdf",
        );
        let s = &agg["P19"];
        assert_eq!(s.beach.as_deref(), Some("Olho de Porco"));
        assert_eq!(s.history.len(), 1);
        let sample = s.history.iter().next().unwrap();
        assert_eq!(sample.date, "2025-09-01");
        assert_eq!(sample.status, STATUS_FIT);
        assert_eq!(s.source_laudo.as_deref(), Some("http://example.org/laudo.pdf"));
    }

    #[test]
    fn test_empty_code_rejected() {
        let agg = aggregate(&[candidate("", "x", "PRÓPRIO", "01/09/2025")], "u");
        assert!(agg.is_empty());
    }

    #[test]
    fn test_first_non_empty_wins_for_beach() {
        let agg = aggregate(
            &[
                candidate("P01", "", "PRÓPRIO", ""),
                candidate("P01", "Calhau", "PRÓPRIO", ""),
                candidate("P01", "Outro Nome", "PRÓPRIO", ""),
            ],
            "u",
        );
        assert_eq!(agg["P01"].beach.as_deref(), Some("Calhau"));
    }

    #[test]
    fn test_source_laudo_prefers_candidate_provenance() {
        let mut first = candidate("P01", "", "PRÓPRIO", "");
        first.source_url = "http://example.org/a.pdf".into();
        let mut second = candidate("P01", "", "PRÓPRIO", "");
        second.source_url = "http://example.org/b.pdf".into();
        let agg = aggregate(&[first, second], "http://example.org/fallback");
        assert_eq!(
            agg["P01"].source_laudo.as_deref(),
            Some("http://example.org/a.pdf")
        );
    }

    #[test]
    fn test_unparseable_date_contributes_no_sample() {
        let agg = aggregate(&[candidate("P02", "", "IMPRÓPRIO", "31/02/2025")], "u");
        assert!(agg["P02"].history.is_empty());
        // the station itself is still created and keeps its status-free fields
        assert_eq!(agg["P02"].code, "P02");
    }

    #[test]
    fn test_empty_date_contributes_no_sample() {
        let agg = aggregate(&[candidate("P02", "Araçagi", "IMPRÓPRIO", "")], "u");
        assert!(agg["P02"].history.is_empty());
        assert_eq!(agg["P02"].beach.as_deref(), Some("Araçagi"));
    }

    #[test]
    fn test_history_is_a_set() {
        let rows = vec![
            candidate("P05", "", "IMPRÓPRIO", "12/03/2024"),
            candidate("P05", "", "IMPRÓPRIO", "12/03/2024"),
            candidate("P05", "", "PRÓPRIO", "26/03/2024"),
        ];
        let agg = aggregate(&rows, "u");
        assert_eq!(agg["P05"].history.len(), 2);
    }

    #[test]
    fn test_reingestion_is_idempotent() {
        let rows = vec![
            candidate("P05", "Caolho", "IMPRÓPRIO", "12/03/2024"),
            candidate("P05", "Caolho", "PRÓPRIO", "26/03/2024"),
        ];
        let once = aggregate(&rows, "u");
        let mut twice_rows = rows.clone();
        twice_rows.extend(rows.clone());
        let twice = aggregate(&twice_rows, "u");
        assert_eq!(once["P05"].history, twice["P05"].history);
    }

    #[test]
    fn test_history_order_independent() {
        let rows = vec![
            candidate("P05", "", "IMPRÓPRIO", "12/03/2024"),
            candidate("P05", "", "PRÓPRIO", "26/03/2024"),
            candidate("P05", "", "PRÓPRIO", "02/01/2024"),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();
        assert_eq!(
            aggregate(&rows, "u")["P05"].history,
            aggregate(&reversed, "u")["P05"].history
        );
    }

    #[test]
    fn test_status_recanonicalized_during_aggregation() {
        // A raw token that slipped through extraction still lands canonical
        let agg = aggregate(&[candidate("P03", "", "improprio", "05/05/2025")], "u");
        let sample = agg["P03"].history.iter().next().unwrap();
        assert_eq!(sample.status, STATUS_UNFIT);
    }

    #[test]
    fn test_seed_from_points_round_trip() {
        let rows = vec![
            candidate("P05", "Caolho", "IMPRÓPRIO", "12/03/2024"),
            candidate("P05", "Caolho", "PRÓPRIO", "26/03/2024"),
        ];
        let agg = aggregate(&rows, "http://example.org/old.pdf");
        let points = crate::project::project(&agg);

        // Next run: seed from the previous output, add one new sample
        let mut stations = seed_from_points(&points);
        aggregate_into(
            &mut stations,
            &[candidate("P05", "Renamed Beach", "PRÓPRIO", "09/04/2024")],
            "http://example.org/new.pdf",
        );
        let s = &stations["P05"];
        assert_eq!(s.history.len(), 3);
        // previous run's descriptive text and provenance win first-wins
        assert_eq!(s.beach.as_deref(), Some("Caolho"));
        assert_eq!(s.source_laudo.as_deref(), Some("http://example.org/old.pdf"));
    }
}
