use crate::model::{STATUS_FIT, STATUS_UNFIT, STATUS_UNKNOWN};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Replace any run of whitespace (including newlines) with a single space.
///
/// Used to build the "flattened" view of a document that cross-line patterns
/// match against. The newline-preserving text is kept separately because the
/// block-oriented heuristic needs line boundaries.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip diacritics so matching is locale-independent.
///
/// A direct character map over the Latin accented range bulletin text uses;
/// equivalent to NFD decomposition with combining marks removed.
pub fn fold_accents(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => c,
    }
}

/// Canonicalize a raw status token.
///
/// Uppercases, strips quote characters, accent-folds, then classifies. The
/// IMPROPRIO check must run before the PROPRIO check: the former contains the
/// latter as a substring, and an unfit reading must never come out as fit.
/// Idempotent, so re-running during aggregation is safe.
pub fn canonicalize_status(raw: &str) -> String {
    let upper: String = raw
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`'))
        .collect::<String>()
        .to_uppercase();
    let folded = fold_accents(&upper);
    if folded.contains("IMPROPRIO") {
        STATUS_UNFIT.to_string()
    } else if folded.contains("PROPRIO") {
        STATUS_FIT.to_string()
    } else if !upper.is_empty() {
        upper
    } else {
        STATUS_UNKNOWN.to_string()
    }
}

/// Convert a `DD/MM/YYYY` date to `YYYY-MM-DD`.
///
/// On failure the input is returned unchanged, never an error; consumers
/// treat a non-ISO result as "unparsed, passthrough".
pub fn canonicalize_date_br(s: &str) -> String {
    match NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => s.to_string(),
    }
}

/// Whether a string is a calendar date in canonical `YYYY-MM-DD` form.
pub fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[._/\-](\d{1,2})[._/\-](\d{2,4})").unwrap());

/// Scan free text (typically a file name or link title) for a date token.
///
/// Accepts `D[D]<sep>M[M]<sep>Y{2,4}` with separator `_ - . /`; two-digit
/// years are read as 2000 + yy. Used to rank candidate documents, not for
/// station dates.
pub fn extract_date_from_text(s: &str) -> Option<NaiveDate> {
    DATE_TOKEN_RE.captures_iter(s).find_map(|caps| {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    })
}
