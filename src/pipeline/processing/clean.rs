//! Field cleaners: pure functions that normalize one attribute family each.
//!
//! A cleaner never fails. Malformed input for a field turns that field absent
//! and the reason is visible in the returned [`FieldQuality`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::domain::{Coordinates, FieldQuality, Image};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));
static URL_WITH_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("valid regex"));

/// Values suppliers use to mean "nothing here". Short tokens such as `NA` or
/// `-` are real country codes and ids, so they are not listed.
const PLACEHOLDER_TOKENS: &[&str] = &["null", "nil", "n/a", "undefined"];

/// Amenity spellings folded onto one canonical token
const AMENITY_ALIASES: &[(&str, &str)] = &[("wi fi", "wifi"), ("wi-fi", "wifi")];

/// Score for a value that needed cleaning before use
const CLEANED_SCORE: f32 = 0.8;

/// A cleaned single value plus how it got there
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<T> {
    pub value: Option<T>,
    pub quality: FieldQuality,
}

impl<T> Cleaned<T> {
    fn missing() -> Self {
        Self { value: None, quality: FieldQuality::MISSING }
    }

    fn blank() -> Self {
        Self { value: None, quality: FieldQuality::BLANK }
    }

    fn present(value: T, untouched: bool) -> Self {
        let score = if untouched { 1.0 } else { CLEANED_SCORE };
        Self { value: Some(value), quality: FieldQuality::present(score) }
    }
}

/// A cleaned list. `raw_count` is `None` when the supplier sent no list at all.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedList<T> {
    pub items: Vec<T>,
    pub raw_count: Option<usize>,
}

impl<T> CleanedList<T> {
    pub fn quality(&self) -> FieldQuality {
        match self.raw_count {
            None => FieldQuality::MISSING,
            Some(_) if self.items.is_empty() => FieldQuality::BLANK,
            Some(raw) => FieldQuality::present(self.items.len() as f32 / raw.max(1) as f32),
        }
    }
}

/// Combined quality of several lists that feed one field.
pub fn combined_list_quality<T>(lists: &[&CleanedList<T>]) -> FieldQuality {
    let raw_total: Option<usize> = lists
        .iter()
        .filter_map(|l| l.raw_count)
        .fold(None, |acc, n| Some(acc.unwrap_or(0) + n));
    let kept: usize = lists.iter().map(|l| l.items.len()).sum();
    match raw_total {
        None => FieldQuality::MISSING,
        Some(_) if kept == 0 => FieldQuality::BLANK,
        Some(raw) => FieldQuality::present(kept as f32 / raw.max(1) as f32),
    }
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_TOKENS.iter().any(|p| value.eq_ignore_ascii_case(p))
}

fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned()
}

/// Trim, collapse whitespace runs, and map blanks and placeholders to absent.
pub fn clean_text(raw: Option<&str>) -> Cleaned<String> {
    let Some(raw) = raw else {
        return Cleaned::missing();
    };
    let cleaned = collapse_whitespace(raw);
    if cleaned.is_empty() || is_placeholder(&cleaned) {
        return Cleaned::blank();
    }
    let untouched = cleaned == raw;
    Cleaned::present(cleaned, untouched)
}

/// Identifiers are trimmed only. Any non-empty value is an id, even one that
/// reads like a placeholder.
pub fn clean_identifier(raw: Option<&str>) -> Cleaned<String> {
    let Some(raw) = raw else {
        return Cleaned::missing();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cleaned::blank();
    }
    Cleaned::present(trimmed.to_string(), trimmed.len() == raw.len())
}

/// Text cleaning plus title-casing of names written in a single case.
///
/// `"BEACH VILLAS"` and `"beach villas"` become `"Beach Villas"`, while a
/// mixed-case name such as `"InterContinental"` is kept as written.
pub fn clean_name(raw: Option<&str>) -> Cleaned<String> {
    let mut cleaned = clean_text(raw);
    if let Some(name) = cleaned.value.as_mut() {
        if is_single_case(name) {
            let titled = title_case(name);
            if titled != *name {
                *name = titled;
                cleaned.quality = FieldQuality::present(CLEANED_SCORE);
            }
        }
    }
    cleaned
}

fn is_single_case(value: &str) -> bool {
    let has_lower = value.chars().any(char::is_lowercase);
    let has_upper = value.chars().any(char::is_uppercase);
    has_lower != has_upper
}

/// Upper-case the first letter after any non-alphanumeric boundary, so
/// `RITZ-CARLTON` and `(CHINATOWN)` keep a capital after `-` and `(`.
fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut at_boundary = true;
    for c in value.chars() {
        if at_boundary {
            titled.extend(c.to_uppercase());
        } else {
            titled.extend(c.to_lowercase());
        }
        at_boundary = !c.is_alphanumeric();
    }
    titled
}

/// Descriptions are only trimmed; their internal layout is kept.
pub fn clean_description(raw: Option<&str>) -> Cleaned<String> {
    let Some(raw) = raw else {
        return Cleaned::missing();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        return Cleaned::blank();
    }
    Cleaned::present(trimmed.to_string(), trimmed.len() == raw.len())
}

/// Address sub-fields: present-but-blank becomes absent.
pub fn clean_address_part(raw: Option<&str>) -> Cleaned<String> {
    clean_text(raw)
}

/// Canonical form of one amenity, or `None` when nothing is left.
pub fn canonical_amenity(raw: &str) -> Option<String> {
    let spaced = CAMEL_BOUNDARY.replace_all(raw, "$1 $2");
    let lowered = collapse_whitespace(&spaced.to_lowercase());
    if lowered.is_empty() || is_placeholder(&lowered) {
        return None;
    }
    let canonical = AMENITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(lowered);
    Some(canonical)
}

/// Canonicalize, drop empty tokens, and dedupe keeping the first occurrence.
pub fn clean_amenities<S: AsRef<str>>(raw: Option<&[S]>) -> CleanedList<String> {
    let Some(raw) = raw else {
        return CleanedList { items: Vec::new(), raw_count: None };
    };
    let mut seen = HashSet::new();
    let items = raw
        .iter()
        .filter_map(|a| canonical_amenity(a.as_ref()))
        .filter(|a| seen.insert(a.clone()))
        .collect();
    CleanedList { items, raw_count: Some(raw.len()) }
}

/// An image entry before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawImage {
    pub url: Option<String>,
    pub description: Option<String>,
}

/// A URL is accepted when it is non-empty and starts with `scheme://`.
pub fn is_well_formed_url(url: &str) -> bool {
    URL_WITH_SCHEME.is_match(url)
}

/// Keep entries with a well-formed URL, in order, first occurrence of each
/// URL only. Called per category, so nothing is deduped across categories.
pub fn clean_images(raw: Option<&[RawImage]>) -> CleanedList<Image> {
    let Some(raw) = raw else {
        return CleanedList { items: Vec::new(), raw_count: None };
    };
    let mut seen = HashSet::new();
    let items = raw
        .iter()
        .filter_map(|img| {
            let url = img.url.as_deref()?.trim();
            if !is_well_formed_url(url) || !seen.insert(url.to_string()) {
                return None;
            }
            Some(Image {
                url: url.to_string(),
                description: clean_text(img.description.as_deref()).value,
            })
        })
        .collect();
    CleanedList { items, raw_count: Some(raw.len()) }
}

/// Trim each condition, drop blanks, dedupe keeping the first occurrence.
pub fn clean_booking_conditions<S: AsRef<str>>(raw: Option<&[S]>) -> CleanedList<String> {
    let Some(raw) = raw else {
        return CleanedList { items: Vec::new(), raw_count: None };
    };
    let mut seen = HashSet::new();
    let items = raw
        .iter()
        .filter_map(|c| clean_text(Some(c.as_ref())).value)
        .filter(|c| seen.insert(c.clone()))
        .collect();
    CleanedList { items, raw_count: Some(raw.len()) }
}

/// Both halves must be present, finite and in range.
pub fn clean_coordinates(lat: Option<f64>, lng: Option<f64>) -> Cleaned<Coordinates> {
    match (lat, lng) {
        (None, None) => Cleaned::missing(),
        (Some(lat), Some(lng))
            if lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) =>
        {
            Cleaned::present(Coordinates { lat, lng }, true)
        }
        _ => Cleaned::blank(),
    }
}
