use crate::extraction::PageContent;
use crate::model::CandidateRecord;
use crate::parsing::normalize::{canonicalize_date_br, canonicalize_status, collapse_whitespace};
use regex::Regex;
use std::sync::LazyLock;

/// How far past a station code the history miner looks for dated entries.
const HISTORY_WINDOW_CHARS: usize = 300;

/// The two text views every heuristic works from.
///
/// `lines` preserves the extractor's line breaks for block-oriented matching;
/// `flattened` collapses all whitespace so patterns can cross line breaks the
/// upstream page-text extraction may or may not have produced.
#[derive(Debug, Clone)]
pub struct DocumentView {
    pub lines: String,
    pub flattened: String,
}

impl DocumentView {
    pub fn from_pages(pages: &[PageContent]) -> Self {
        let lines = pages
            .iter()
            .map(|p| p.lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n");
        let flattened = collapse_whitespace(&lines);
        DocumentView { lines, flattened }
    }
}

/// Per-document context shared by all heuristics.
#[derive(Debug, Clone)]
pub struct ScanContext<'a> {
    pub source_url: &'a str,
    /// End date of the bulletin's reporting period ("período de X a Y"),
    /// used as the collection-date fallback when no date label matches.
    pub period_end: Option<String>,
}

static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)per[íi]odo de (\d{2}/\d{2}/\d{4}) a (\d{2}/\d{2}/\d{4})").unwrap()
});

impl<'a> ScanContext<'a> {
    pub fn new(view: &DocumentView, source_url: &'a str) -> Self {
        let period_end = PERIOD_RE
            .captures(&view.flattened)
            .map(|c| c[2].to_string());
        ScanContext {
            source_url,
            period_end,
        }
    }
}

/// A structural heuristic: pure function from document views to candidates.
pub type Heuristic = fn(&DocumentView, &ScanContext) -> Vec<CandidateRecord>;

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bP\d{1,3}\b").unwrap());

static BEACH_AT_LINE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*Praia\s*:?\s*(.+)$").unwrap());
static BEACH_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)\bPraia\s*:?\s*(.+)$").unwrap());

static REF_FULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)Ponto\s+de\s+refer[êe]ncia\s*:?\s*(.+)$").unwrap());
static REF_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)Refer[eê]ncia\s*:?\s*(.+)$").unwrap());
static REF_ABBREV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)\bRef\.?\s*:?\s*(.+)$").unwrap());

static COLLECTION_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Data\s+da\s+coleta\s*:?\s*(\d{2}/\d{2}/\d{4})").unwrap());

static STATUS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(IMPR[ÓO]PRIO|PR[ÓO]PRIO|IMPRPRIO)\b").unwrap());

static LINEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(P\d{1,3})[^P]*?Praia:\s*(.*?)\s*(?:Ponto\s+de\s+refer[êe]ncia|Refer[eê]ncia|Ref\.)\s*:\s*(.*?)\s*(?:Data\s+da\s+coleta\s*:?\s*(\d{2}/\d{2}/\d{4})\s*)?Status:\s*([A-ZÇÃÓÍÉÊÀÂÕÚ]+)",
    )
    .unwrap()
});

static LOOSE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(P\d{1,3}).{0,80}?([A-Za-zÀ-ÿ' \-]+).{0,200}?\b(?:Ponto\s+de\s+refer[êe]ncia|Refer[eê]ncia|Ref\.)\s*:?\s*([^\n\r]+?)\s+(?:Data\s+da\s+coleta\s*:?\s*(\d{2}/\d{2}/\d{4}))?.{0,80}?\b(PR[ÓO]PRIO|IMPR[ÓO]PRIO)\b",
    )
    .unwrap()
});

static HISTORY_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{2}/\d{2}/\d{4})\s*[-–—]\s*(PR[ÓO]PRIO|IMPR[ÓO]PRIO)").unwrap()
});

fn trim_field(s: &str) -> String {
    s.trim_matches(&[' ', ':', '-'][..]).to_string()
}

/// Search a block for the first pattern that captures a value.
fn find_labeled(block: &str, patterns: &[&LazyLock<Regex>]) -> Option<String> {
    patterns.iter().find_map(|pat| {
        pat.captures(block)
            .map(|c| trim_field(c.get(1).map_or("", |m| m.as_str())))
    })
}

/// Heuristic 1: block split.
///
/// Splits the line-oriented text at every station-code token and searches the
/// chunk after each code for labeled beach / reference / collection-date
/// fields plus a standalone status token. A chunk without a status token
/// emits nothing. The document-level report period supplies the date when no
/// date label matched.
pub fn block_split(view: &DocumentView, ctx: &ScanContext) -> Vec<CandidateRecord> {
    let text = &view.lines;
    let matches: Vec<_> = CODE_RE.find_iter(text).collect();

    let mut out = Vec::new();
    for (i, code_match) in matches.iter().enumerate() {
        let block_end = matches.get(i + 1).map_or(text.len(), |next| next.start());
        let block = text[code_match.end()..block_end].trim();
        if block.is_empty() {
            continue;
        }

        let Some(status) = STATUS_TOKEN.find(block) else {
            continue;
        };

        let beach = find_labeled(block, &[&BEACH_AT_LINE_START, &BEACH_ANYWHERE]);
        let reference = find_labeled(block, &[&REF_FULL, &REF_PLAIN, &REF_ABBREV]);
        let date = find_labeled(block, &[&COLLECTION_DATE]).or_else(|| ctx.period_end.clone());

        out.push(CandidateRecord {
            code: code_match.as_str().to_uppercase(),
            beach: beach.unwrap_or_default(),
            reference: reference.unwrap_or_default(),
            status: canonicalize_status(status.as_str()),
            date: date.unwrap_or_default(),
            source_url: ctx.source_url.to_string(),
        });
    }
    out
}

/// Heuristic 2: linear block pattern.
///
/// Matches one contiguous `code Praia: ... <reference label>: ... [Data da
/// coleta: ...] Status: ...` run on the flattened text. Recovers documents
/// whose line breaks were lost during page-text extraction, where heuristic
/// 1's block boundaries don't exist.
pub fn linear_pattern(view: &DocumentView, ctx: &ScanContext) -> Vec<CandidateRecord> {
    LINEAR_RE
        .captures_iter(&view.flattened)
        .map(|caps| {
            let date = caps
                .get(4)
                .map(|m| m.as_str().to_string())
                .or_else(|| ctx.period_end.clone())
                .unwrap_or_default();
            CandidateRecord {
                code: caps[1].to_uppercase(),
                beach: trim_field(&caps[2]),
                reference: trim_field(&caps[3]),
                status: canonicalize_status(&caps[5]),
                date,
                source_url: ctx.source_url.to_string(),
            }
        })
        .collect()
}

/// Heuristic 3: loose row (last-resort fallback).
///
/// Requires only code, a short run of letters, a reference-style label and a
/// status token within a bounded lookahead. Higher false-positive risk, so
/// the cascade gates it off whenever heuristics 1+2 found anything.
pub fn loose_row(view: &DocumentView, ctx: &ScanContext) -> Vec<CandidateRecord> {
    LOOSE_ROW_RE
        .captures_iter(&view.flattened)
        .map(|caps| {
            let date = caps
                .get(4)
                .map(|m| m.as_str().to_string())
                .or_else(|| ctx.period_end.clone())
                .unwrap_or_default();
            CandidateRecord {
                code: caps[1].to_uppercase(),
                beach: caps[2].trim().to_string(),
                reference: caps[3].trim().to_string(),
                status: canonicalize_status(&caps[5]),
                date,
                source_url: ctx.source_url.to_string(),
            }
        })
        .collect()
}

/// History mining pass.
///
/// For each anchor candidate, scans a fixed window after the first occurrence
/// of its code in the flattened text for `DD/MM/YYYY - STATUS` pairs, each of
/// which becomes an extra candidate inheriting the anchor's beach/reference.
/// Iterates a snapshot of the anchors only, never its own output.
pub fn mine_history(view: &DocumentView, anchors: &[CandidateRecord]) -> Vec<CandidateRecord> {
    let mut mined = Vec::new();
    for anchor in anchors {
        if anchor.code.is_empty() {
            continue;
        }
        let Some(pos) = view.flattened.find(&anchor.code) else {
            continue;
        };
        let start = pos + anchor.code.len();
        let window: String = view.flattened[start..]
            .chars()
            .take(HISTORY_WINDOW_CHARS)
            .collect();

        for caps in HISTORY_PAIR_RE.captures_iter(&window) {
            mined.push(CandidateRecord {
                code: anchor.code.clone(),
                beach: anchor.beach.clone(),
                reference: anchor.reference.clone(),
                status: canonicalize_status(&caps[2]),
                date: canonicalize_date_br(&caps[1]),
                source_url: anchor.source_url.clone(),
            });
        }
    }
    mined
}
