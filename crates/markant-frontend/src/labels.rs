//! # Completion-state labeling
//!
//! Derives short human-readable summaries for "completion" states: states
//! whose label shows the simulated process reached a terminal or summary
//! condition worth reporting.
//!
//! Two label shapes are recognized:
//!
//! - Terminal summaries written by the simulator's strategy loop:
//!   `Completed <on_time> <priority>` (e.g. `Completed True medium`),
//!   summarized as `On Time Medium Priority` / `Late High Priority`.
//! - Structured `{key:value, ...}` labels carrying both a
//!   `command_executed` and a `current_revenue` field.
//!
//! Field extraction is deliberately tolerant: fields may appear in any
//! order, optional fields may be absent, and an individual field that
//! fails to parse is skipped rather than failing the whole node. States
//! matching neither shape are simply absent from the map; callers treat
//! "not present" as "not a completion state".

use rustc_hash::FxHashMap;

use crate::model::{NodeId, StateGraph};

/// Marker token opening a terminal summary label.
const COMPLETED_MARKER: &str = "Completed";
/// Field marker: name of the last strategy command the state reflects.
const COMMAND_FIELD: &str = "command_executed";
/// Field marker: revenue accumulated when the state was observed.
const REVENUE_FIELD: &str = "current_revenue";

/// A single structured field extracted from a state label.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Number(_) => "",
            FieldValue::Text(t) => t,
        }
    }
}

/// Extracts structured fields from a `{key:value, key:value, ...}` label.
///
/// Braces are optional, field order is irrelevant, values may be quoted
/// with `'`. Each value is first tried as a number; anything unparseable
/// as a field (no `:` separator, empty key) is skipped.
pub fn parse_label_fields(label: &str) -> FxHashMap<String, FieldValue> {
    let body = label
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}');

    let mut fields = FxHashMap::default();
    for part in body.split(',') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('\'').trim();
        let parsed = match value.parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) => FieldValue::Text(value.to_string()),
        };
        fields.insert(key.to_string(), parsed);
    }
    fields
}

/// Builds the completion-state label map for a graph.
///
/// Only states recognized as completion states appear in the map; every
/// other state is excluded, not given an empty label.
pub fn completion_labels(graph: &StateGraph) -> FxHashMap<NodeId, String> {
    let mut labels = FxHashMap::default();
    for node in graph.nodes() {
        if let Some(summary) = summarize(&node.label) {
            labels.insert(node.id, summary);
        }
    }
    labels
}

/// Derives the summary for one label, or `None` if the label does not
/// mark a completion state.
pub fn summarize(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if let Some(rest) = trimmed.strip_prefix(COMPLETED_MARKER) {
        // Marker must be a whole word: "CompletedX" is not a summary.
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return summarize_terminal(rest);
        }
    }

    let fields = parse_label_fields(trimmed);
    let command = fields.get(COMMAND_FIELD)?;
    let revenue = fields.get(REVENUE_FIELD)?;
    Some(match revenue.as_number() {
        Some(r) => format!("{} (revenue {:.2})", command.as_text(), r),
        // Revenue marker present but not numeric: keep the command, skip
        // the unparseable figure.
        None => command.as_text().to_string(),
    })
}

/// Summarizes `Completed <on_time> <priority>` terminal labels.
///
/// The on-time flag is required (a bare `Completed` is not enough to
/// report anything); the priority is optional.
fn summarize_terminal(rest: &str) -> Option<String> {
    let mut parts = rest.split_whitespace();
    let on_time = match parts.next()? {
        "True" => "On Time",
        _ => "Late",
    };
    match parts.next() {
        Some(priority) => Some(format!("{} {} Priority", on_time, capitalize(priority))),
        None => Some(on_time.to_string()),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_labels_summarize() {
        assert_eq!(
            summarize("Completed True medium").as_deref(),
            Some("On Time Medium Priority")
        );
        assert_eq!(
            summarize("Completed False high").as_deref(),
            Some("Late High Priority")
        );
    }

    #[test]
    fn bare_completed_is_not_a_completion_state() {
        assert_eq!(summarize("Completed"), None);
    }

    #[test]
    fn terminal_label_tolerates_missing_priority() {
        assert_eq!(summarize("Completed True").as_deref(), Some("On Time"));
    }

    #[test]
    fn structured_label_needs_both_markers() {
        let with_both =
            "{command_executed:'m2_maintenance', current_revenue:12.50, m1_stored:0.33}";
        assert_eq!(
            summarize(with_both).as_deref(),
            Some("m2_maintenance (revenue 12.50)")
        );
        assert_eq!(summarize("{command_executed:'step'}"), None);
        assert_eq!(summarize("{m1_status:'idle', m1_stored:0.17}"), None);
    }

    #[test]
    fn field_extraction_skips_unparseable_fields() {
        let fields = parse_label_fields("{a:1.5, garbage, b:'idle', :3}");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["a"].as_number(), Some(1.5));
        assert_eq!(fields["b"].as_text(), "idle");
    }

    #[test]
    fn field_order_is_irrelevant() {
        let a = parse_label_fields("{x:1, y:'two'}");
        let b = parse_label_fields("{y:'two', x:1}");
        assert_eq!(a, b);
    }
}
