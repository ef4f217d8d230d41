use std::collections::BTreeMap;

use super::ClassifiedClass;

/// Scores `text` against each class corpus.
///
/// A class matches when its corpus contains `text` as a literal substring.
/// Classes are sorted by match (stable, so ties keep corpus order), cut to
/// `max_results`, and normalised: with no match anywhere every kept class
/// gets `1 / kept`, otherwise each kept class gets `raw / total` where
/// `total` counts matches across all classes.
pub fn score(
    classes: &BTreeMap<String, String>,
    text: &str,
    max_results: usize,
) -> Vec<ClassifiedClass> {
    let mut scored: Vec<(&str, f64)> = classes
        .iter()
        .map(|(name, corpus)| {
            let raw = if corpus.contains(text) { 1.0 } else { 0.0 };
            (name.as_str(), raw)
        })
        .collect();
    let total = scored.iter().filter(|(_, raw)| *raw > 0.0).count();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(max_results);

    let kept = scored.len();
    scored
        .into_iter()
        .map(|(name, raw)| ClassifiedClass {
            class_name: name.to_string(),
            confidence: if total == 0 {
                1.0 / kept as f64
            } else {
                raw / total as f64
            },
        })
        .collect()
}
