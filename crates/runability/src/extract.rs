//! Label and duration extraction from a song page.
//!
//! The page exposes its qualitative ratings as semi-bold inline spans
//! ("high energy", "very danceable") and its length as a definition-list
//! entry (`<dt>Duration </dt><dd>3:45</dd>`). Extraction is best-effort:
//! anything missing comes back as `None`.
//!
//! `scraper` types are `!Send`, so the parsed document never leaves
//! [`extract_labels`]; callers get owned data back and may hold it across
//! an `.await`.

use crate::types::ExtractedLabels;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

const ENERGY_MARKER: &str = "energy";
const DANCEABLE_MARKER: &str = "danceable";

fn rating_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("span.font-semibold").expect("rating selector is valid"))
}

fn term_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("dt").expect("term selector is valid"))
}

fn duration_term() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Duration\s").expect("duration regex is valid"))
}

/// Parse a song page and pull out the energy label, the danceability
/// label and the duration text.
pub fn extract_labels(html: &str) -> ExtractedLabels {
    let document = Html::parse_document(html);
    let mut labels = ExtractedLabels::default();

    extract_ratings(&document, &mut labels);
    labels.duration = extract_duration(&document);

    labels
}

/// Scan the semi-bold spans in document order. Later matches overwrite
/// earlier ones.
fn extract_ratings(document: &Html, labels: &mut ExtractedLabels) {
    for span in document.select(rating_selector()) {
        let text = element_text(&span);
        if text.contains(ENERGY_MARKER) {
            labels.energy_label = Some(text);
        } else if text.contains(DANCEABLE_MARKER) {
            labels.danceability_label = Some(text);
        }
    }
}

/// Find the first `Duration` term and read its following `dd` sibling.
fn extract_duration(document: &Html) -> Option<String> {
    let term = document
        .select(term_selector())
        .find(|dt| duration_term().is_match(&dt.text().collect::<String>()))?;

    term.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "dd")
        .map(|dd| element_text(&dd))
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
