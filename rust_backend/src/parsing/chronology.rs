//! Parser for free-text chronology strings.
//!
//! Source tables describe dates in many shapes: `"3500-2000 a.C."`,
//! `"s. V a.C."`, `"ca. 1200 BCE"`, `"500 a.C. - 200 d.C."`. The parser maps
//! each to a [`DateRange`] of astronomical years plus a heuristic confidence.
//! Text without a usable date yields [`DateRange::undatable`]; the parser never
//! fails.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::domain::DateRange;

/// Substrings that lower confidence to [`UNCERTAIN_CONFIDENCE`]
const UNCERTAINTY_MARKERS: &[&str] = &["ca.", "aprox.", "?", "~", "circa"];

/// Qualifiers pointing at part of a period rather than a year
const VAGUE_QUALIFIERS: &[&str] = &[
    "principios",
    "mediados",
    "fines",
    "early",
    "mid",
    "late",
];

const BCE_MARKERS: &[&str] = &["a.c", "ac", "bce", "bc"];
const CE_MARKERS: &[&str] = &["d.c", "dc", "ce", "ad"];

/// Boilerplate from the chronology column title, stripped before extracting numbers
const TITLE_BOILERPLATE: &str = "(10k ac - 750 dc)";

const BASE_CONFIDENCE: f64 = 0.9;
const UNCERTAIN_CONFIDENCE: f64 = 0.6;

/// Bare numbers above this are assumed to be BCE in ranges without markers
const BCE_THRESHOLD: i64 = 750;
/// Single bare numbers above this are assumed to be BCE
const SINGLE_YEAR_BCE_THRESHOLD: i64 = 1000;

static CENTURY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bs\.?\s*([ivxl]+)\b\s*(a\.?c\.?|d\.?c\.?|bce|ce|ad|bc)?")
        .expect("century pattern is valid")
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("number pattern is valid"));

static BCE_SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"a\.c|ac|bce|bc").expect("era pattern is valid"));

static CE_SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"d\.c|dc|ce|ad").expect("era pattern is valid"));

/// Parse chronology text into a year range.
///
/// # Examples
///
/// ```
/// use atlas_rust::parsing::chronology::parse_date_range;
///
/// let range = parse_date_range("3500-2000 a.C.");
/// assert_eq!(range.start_year, Some(-3500));
/// assert_eq!(range.end_year, Some(-2000));
/// assert_eq!(range.confidence, 0.9);
///
/// let century = parse_date_range("s. III d.C.");
/// assert_eq!((century.start_year, century.end_year), (Some(200), Some(299)));
///
/// assert!(!parse_date_range("Neolítico medio").is_datable());
/// ```
pub fn parse_date_range(text: &str) -> DateRange {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return DateRange::undatable();
    }

    match parse_normalized(&normalized) {
        Some(range) if range.is_datable() => range,
        _ => {
            debug!("Undatable chronology: {:?}", text);
            DateRange::undatable()
        }
    }
}

/// Like [`parse_date_range`], treating a missing value as undatable.
pub fn parse_optional_date_range(text: Option<&str>) -> DateRange {
    text.map(parse_date_range)
        .unwrap_or_else(DateRange::undatable)
}

fn parse_normalized(text: &str) -> Option<DateRange> {
    let mut confidence = BASE_CONFIDENCE;
    if contains_any(text, UNCERTAINTY_MARKERS) {
        confidence = UNCERTAIN_CONFIDENCE;
    }
    if contains_any(text, VAGUE_QUALIFIERS) {
        confidence = (confidence - 0.2).max(0.2);
    }

    if let Some(range) = parse_century(text, confidence) {
        return Some(range);
    }

    parse_numeric(text, confidence)
}

/// Century notation such as `s. v a.c.` or `s.iii d.c.`.
///
/// Returns `None` when no numeral matches so the caller falls back to
/// numeric parsing.
fn parse_century(text: &str, confidence: f64) -> Option<DateRange> {
    let caps = CENTURY_RE.captures(text)?;
    let century = roman_to_int(caps.get(1)?.as_str())?;
    let is_bce = caps
        .get(2)
        .map(|era| {
            let era = era.as_str();
            era.starts_with('a') || era.contains("bc")
        })
        .unwrap_or(false);

    // Century N CE covers [(N-1)*100, N*100-1] (year 0 excluded); N BCE
    // covers [-N*100, -((N-1)*100+1)], so s. I a.C. is [-100, -1].
    let (mut start, mut end) = if is_bce {
        (-(century * 100), -((century - 1) * 100 + 1))
    } else {
        ((century - 1) * 100, century * 100 - 1)
    };
    if start == 0 {
        start = 1;
    }
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    Some(finish(
        start as i64,
        end as i64,
        (confidence - 0.2).max(0.2),
    ))
}

/// Convert a roman numeral written with I, V, X and L.
///
/// Uses the subtractive rule (`iv` = 4, `xl` = 40). Other letters and
/// non-positive results give `None`.
pub fn roman_to_int(numeral: &str) -> Option<i32> {
    let mut total = 0;
    let mut previous = 0;
    for c in numeral.chars().rev() {
        let value = match c.to_ascii_lowercase() {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            _ => return None,
        };
        if value < previous {
            total -= value;
        } else {
            total += value;
        }
        previous = value;
    }
    (total > 0).then_some(total)
}

fn parse_numeric(text: &str, mut confidence: f64) -> Option<DateRange> {
    let stripped = text.replacen(TITLE_BOILERPLATE, "", 1);
    let mut numbers = NUMBER_RE
        .find_iter(&stripped)
        .map(|m| m.as_str().parse::<i64>().ok());

    let first = numbers.next()??;
    let second = match numbers.next() {
        Some(parsed) => Some(parsed?),
        None => None,
    };

    let has_bce = contains_any(text, BCE_MARKERS);
    let has_ce = contains_any(text, CE_MARKERS);

    let (start, end) = match second {
        Some(second) => {
            let (start, end) = match (has_bce, has_ce) {
                (true, false) => (-first.max(second), -first.min(second)),
                (false, true) => (first.min(second), first.max(second)),
                (true, true) => mixed_era_range(text, first, second),
                (false, false) => {
                    confidence -= 0.1;
                    if first > BCE_THRESHOLD && second > BCE_THRESHOLD {
                        (-first.max(second), -first.min(second))
                    } else {
                        (bce_if_large(first), bce_if_large(second))
                    }
                }
            };
            (start.min(end), start.max(end))
        }
        None => {
            let start = if has_bce || (!has_ce && first > SINGLE_YEAR_BCE_THRESHOLD) {
                -first
            } else {
                first
            };
            let end = start + if start < 500 { 50 } else { 100 };
            confidence = (confidence - 0.3).max(0.1);
            (start, end)
        }
    };

    Some(finish(start, end, confidence))
}

/// Range carrying both BCE and CE markers.
///
/// Whichever marker family appears first decides which number is BCE; the
/// other number is read as CE. Marker substrings overlap (`bce` contains
/// `ce`), so inputs like `"3000-2000 bce"` come out as a straddling range.
fn mixed_era_range(text: &str, first: i64, second: i64) -> (i64, i64) {
    let bce_at = BCE_SEARCH_RE.find(text).map(|m| m.start());
    let ce_at = CE_SEARCH_RE.find(text).map(|m| m.start());
    match (bce_at, ce_at) {
        (Some(bce), Some(ce)) if bce < ce => (-first, second),
        (Some(_), Some(_)) => (-second, first),
        _ => (bce_if_large(first), bce_if_large(second)),
    }
}

fn bce_if_large(year: i64) -> i64 {
    if year > BCE_THRESHOLD {
        -year
    } else {
        year
    }
}

/// Build the final range; out-of-range years make the text undatable.
fn finish(start: i64, end: i64, confidence: f64) -> DateRange {
    match (i32::try_from(start), i32::try_from(end)) {
        (Ok(start), Ok(end)) if start <= end => DateRange {
            start_year: Some(start),
            end_year: Some(end),
            confidence: round_confidence(confidence),
        },
        _ => DateRange::undatable(),
    }
}

fn round_confidence(confidence: f64) -> f64 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Format a year for axis ticks and tooltips.
///
/// # Examples
///
/// ```
/// use atlas_rust::parsing::chronology::format_year;
///
/// assert_eq!(format_year(Some(-3500)), "3500 a.C.");
/// assert_eq!(format_year(Some(0)), "Año 0");
/// assert_eq!(format_year(Some(200)), "200 d.C.");
/// assert_eq!(format_year(None), "?");
/// ```
pub fn format_year(year: Option<i32>) -> String {
    match year {
        None => "?".to_string(),
        Some(0) => "Año 0".to_string(),
        Some(y) if y < 0 => format!("{} a.C.", y.unsigned_abs()),
        Some(y) => format!("{} d.C.", y),
    }
}

/// [`format_year`] for fractional axis values, rounded to the nearest year.
pub fn format_year_value(value: f64) -> String {
    if !value.is_finite() {
        return format_year(None);
    }
    let rounded = value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
    format_year(Some(rounded))
}
