use chrono::{SecondsFormat, Utc};
use rand::Rng;

/// Template for classifier ids; every `_` becomes a lowercase hex digit.
pub(crate) const CLASSIFIER_ID_TEMPLATE: &str = "______x___-nlc-_____";

const PLACEHOLDER: char = '_';

/// Fills every placeholder of `template` with a random lowercase hex digit.
pub(crate) fn fill_template<R: Rng>(template: &str, rng: &mut R) -> String {
    template
        .chars()
        .map(|c| {
            if c == PLACEHOLDER {
                char::from_digit(rng.random_range(0..16), 16).unwrap_or('0')
            } else {
                c
            }
        })
        .collect()
}

pub(crate) fn generate_classifier_id() -> String {
    fill_template(CLASSIFIER_ID_TEMPLATE, &mut rand::rng())
}

/// Current UTC time as ISO-8601 with millisecond precision and a `Z` suffix.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Removes one leading and one trailing quote character (`"` or `'`),
/// trimming whitespace both outside and inside the quotes.
pub(crate) fn strip_quotes(field: &str) -> &str {
    let field = field.trim();
    let field = field.strip_prefix(['"', '\'']).unwrap_or(field);
    let field = field.strip_suffix(['"', '\'']).unwrap_or(field);
    field.trim()
}
