//! Relative importance and dated milestones derived from a record's text.
//!
//! Both heuristics work on lowercase substring checks over the descriptive
//! columns. The Spanish keywords are literal: they match the vocabulary of
//! the source tables.

use crate::core::domain::{Event, EventType, RawRecord};
use crate::parsing::chronology::parse_date_range;

pub const MIN_SIGNIFICANCE: f64 = 0.6;
pub const MAX_SIGNIFICANCE: f64 = 1.6;

/// Markers meaning the column holds no real evidence
const NO_EVIDENCE: &str = "no evid";

/// Hierarchy keywords indicating state-level organization
const STATE_KEYWORDS: &[&str] = &["estado", "imperio", "monarquía", "centralizada", "compleja"];

/// Architecture keywords indicating monumental construction
const MONUMENTAL_KEYWORDS: &[&str] = &[
    "monumental",
    "pirámide",
    "templo",
    "palacio",
    "zigurat",
    "muralla",
    "megalito",
];

const METAL_KEYWORDS: &[&str] = &["bronce", "hierro", "metalurgia"];

/// Lowercased descriptive columns, computed once per record.
struct Descriptors {
    architecture: String,
    technology: String,
    writing: String,
    hierarchy: String,
}

impl Descriptors {
    fn of(record: &RawRecord) -> Self {
        let lower = |value: &Option<String>| RawRecord::field(value).to_lowercase();
        Self {
            architecture: lower(&record.architecture),
            technology: lower(&record.technology),
            writing: lower(&record.writing),
            hierarchy: lower(&record.hierarchy),
        }
    }

    fn has_notable_architecture(&self) -> bool {
        char_len(&self.architecture) > 15
            && !self.architecture.contains(NO_EVIDENCE)
            && !self.architecture.contains("simple")
    }

    fn has_notable_technology(&self) -> bool {
        char_len(&self.technology) > 20 && !self.technology.contains(NO_EVIDENCE)
    }

    fn has_writing(&self) -> bool {
        char_len(&self.writing) > 5
            && !self.writing.contains("ausente")
            && !self.writing.contains(NO_EVIDENCE)
    }

    fn has_state_organization(&self) -> bool {
        contains_any(&self.hierarchy, STATE_KEYWORDS)
    }
}

/// Relative importance of a record, in `[0.6, 1.6]`.
///
/// Starts at 1.0 and is raised by evidence of notable architecture,
/// technology, writing and state organization, then lowered for undatable or
/// short-lived records. Only used to scale bar height.
///
/// # Examples
///
/// ```
/// use atlas_rust::algorithms::significance::significance;
/// use atlas_rust::core::domain::RawRecord;
///
/// let plain = RawRecord::new("Europa", "Aldea", "3000-2000 a.C.");
/// assert_eq!(significance(Some(&plain)), 1.0);
/// assert_eq!(significance(None), 1.0);
/// ```
pub fn significance(record: Option<&RawRecord>) -> f64 {
    let Some(record) = record else {
        return 1.0;
    };
    let descriptors = Descriptors::of(record);

    let mut score: f64 = 1.0;
    if descriptors.has_notable_architecture() {
        score += 0.1;
    }
    if descriptors.has_notable_technology() {
        score += 0.1;
    }
    if descriptors.has_writing() {
        score += 0.2;
    }
    if descriptors.has_state_organization() {
        score += 0.15;
    }

    match parse_date_range(&record.chronology).span() {
        None => score -= 0.2,
        Some(span) if span < 200 => score -= 0.05,
        Some(_) => {}
    }

    score.clamp(MIN_SIGNIFICANCE, MAX_SIGNIFICANCE)
}

/// Milestones placed along a record's date range.
///
/// Anchors sit at 20%, 50% and 80% of the span. Returns nothing for
/// undatable records or zero-length ranges. Every returned year lies within
/// the record's range.
pub fn extract_events(record: &RawRecord) -> Vec<Event> {
    let Some((start, end)) = parse_date_range(&record.chronology).bounds() else {
        return Vec::new();
    };
    let span = f64::from(end - start);
    if span <= 0.0 {
        return Vec::new();
    }

    let start = f64::from(start);
    let early = start + span * 0.2;
    let middle = start + span * 0.5;
    let late = start + span * 0.8;

    let descriptors = Descriptors::of(record);
    let mut events = Vec::new();

    if contains_any(&descriptors.technology, METAL_KEYWORDS) {
        events.push(event("Metalurgia", middle, EventType::Metal));
    }
    if descriptors.has_writing() {
        events.push(event("Escritura", early + span * 0.1, EventType::Writing));
    }
    if descriptors.has_notable_architecture()
        && contains_any(&descriptors.architecture, MONUMENTAL_KEYWORDS)
    {
        events.push(event("Arq. Monumental", middle, EventType::Architecture));
    }
    if descriptors.has_state_organization() {
        events.push(event("Org. Estatal", late, EventType::State));
    }

    let end = start + span;
    events.retain(|e| e.year >= start && e.year <= end);
    events
}

fn event(name: &str, year: f64, kind: EventType) -> Event {
    Event {
        name: name.to_string(),
        year,
        kind,
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
