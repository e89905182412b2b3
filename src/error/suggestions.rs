//! Context-aware error suggestions.
//!
//! Complements the static hints in the `codes` module with text built from
//! the error context.

use std::collections::HashSet;

use serde_json::Value;

use super::codes::ErrorCode;

/// Suggestion for `code`, specialised with `context` when it carries details.
#[must_use]
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::SuiteLabelDuplicate => suggest_label_duplicate(context),
        ErrorCode::SelectionEmpty => suggest_selection_empty(context),
        ErrorCode::ConfigParseError => suggest_config_parse(context),
        _ => code.suggestion().to_string(),
    }
}

fn context_str<'a>(context: Option<&'a Value>, key: &str) -> Option<&'a str> {
    context.and_then(|c| c.get(key)).and_then(Value::as_str)
}

fn suggest_label_duplicate(context: Option<&Value>) -> String {
    context_str(context, "label").map_or_else(
        || ErrorCode::SuiteLabelDuplicate.suggestion().to_string(),
        |label| format!("Rename one of the children labelled '{label}' so siblings are unique"),
    )
}

fn suggest_selection_empty(context: Option<&Value>) -> String {
    let near: Vec<&str> = context
        .and_then(|c| c.get("did_you_mean"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if near.is_empty() {
        ErrorCode::SelectionEmpty.suggestion().to_string()
    } else {
        format!("Did you mean: {}?", near.join(", "))
    }
}

fn suggest_config_parse(context: Option<&Value>) -> String {
    context_str(context, "path").map_or_else(
        || ErrorCode::ConfigParseError.suggestion().to_string(),
        |path| format!("Fix the TOML syntax in {path}"),
    )
}

/// Suite labels and paths close to a selection pattern that matched nothing.
#[must_use]
pub fn suggest_similar_labels(query: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut scored: Vec<_> = available
        .iter()
        .map(|s| (s, similarity_score(&query_lower, &s.to_lowercase())))
        .filter(|(_, score)| *score > 0.3)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(s, _)| (*s).to_string())
        .collect()
}

/// Jaccard similarity over character trigrams.
fn similarity_score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_trigrams: HashSet<_> = trigrams(a).collect();
    let b_trigrams: HashSet<_> = trigrams(b).collect();

    if a_trigrams.is_empty() || b_trigrams.is_empty() {
        // Short strings
        if a.starts_with(b) || b.starts_with(a) {
            return 0.8;
        }
        if a.contains(b) || b.contains(a) {
            return 0.5;
        }
        return 0.0;
    }

    let intersection = a_trigrams.intersection(&b_trigrams).count();
    let union = a_trigrams.union(&b_trigrams).count();

    #[allow(clippy::cast_precision_loss)]
    let score = intersection as f64 / union as f64;
    score
}

fn trigrams(s: &str) -> impl Iterator<Item = &str> {
    (0..s.len().saturating_sub(2)).filter_map(move |i| s.get(i..i + 3))
}
