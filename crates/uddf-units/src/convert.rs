//! Leaf and tree conversion.
//!
//! Conversion is total: anything that is not a recognised numeric
//! measurement comes back unchanged, so there is no error type here.

use tracing::trace;
use uddf_xml::{Mapping, Node, Scalar};

use crate::taxonomy::category_for;
use crate::UnitSystem;

/// Field whose `type` attribute names the dive mode.
const DIVE_MODE: &str = "divemode";
/// Field whose `ref` attribute names the gas mix switched to.
const SWITCH_MIX: &str = "switchmix";

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to `places` decimals using [`round_half_up`].
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    round_half_up(value * factor) / factor
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let unsigned = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return Some(if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    // Rejects the `inf`/`nan` spellings `f64::from_str` would accept.
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    trimmed.parse().ok()
}

/// Turn numeric text into a number; any other scalar is returned as is.
pub fn coerce(scalar: &Scalar) -> Scalar {
    match scalar {
        Scalar::Text(text) => match parse_number(text) {
            Some(value) => Scalar::Number(value),
            None => scalar.clone(),
        },
        Scalar::Number(_) => scalar.clone(),
    }
}

/// Convert a single value stored under `field`.
///
/// Containers are returned unchanged; [`convert_tree`] handles them. Numeric
/// text is coerced first, then converted when `field` names a measurement.
/// Under [`UnitSystem::Imperial`] time fields may come back as `0:SS` text.
pub fn convert_leaf(field: &str, node: &Node, unit: UnitSystem) -> Node {
    let Node::Scalar(scalar) = node else {
        return node.clone();
    };
    let value = coerce(scalar);
    match (category_for(field), &value) {
        (Some(category), Scalar::Number(number)) => {
            let converted = category.convert(*number, unit);
            trace!(
                field,
                quantity = ?category.quantity,
                from = *number,
                to = %converted,
                "converted measurement"
            );
            Node::Scalar(converted)
        }
        _ => Node::Scalar(value),
    }
}

fn compound_label(field: &str, mapping: &Mapping) -> Option<String> {
    let (prefix, key) = match field.to_lowercase().as_str() {
        DIVE_MODE => ("Type", "type"),
        SWITCH_MIX => ("Ref", "ref"),
        _ => return None,
    };
    let value = mapping.get(key)?.as_scalar()?;
    if matches!(value, Scalar::Text(text) if text.is_empty()) {
        return None;
    }
    Some(format!("{prefix}: {value}"))
}

/// Convert whatever is stored under `field`, including compound values.
///
/// A `divemode` element with a `type` attribute collapses to `Type: <type>`
/// and a `switchmix` element with a `ref` attribute to `Ref: <ref>`. Other
/// containers are rebuilt by [`convert_tree`]: each scalar is keyed by its
/// own name, so element text under `_` and items of a repeated scalar list
/// are only coerced.
pub fn convert_field(field: &str, node: &Node, unit: UnitSystem) -> Node {
    match node {
        Node::Scalar(_) => convert_leaf(field, node, unit),
        Node::Mapping(mapping) => match compound_label(field, mapping) {
            Some(label) => Node::text(label),
            None => convert_tree(node, unit),
        },
        Node::Sequence(_) => convert_tree(node, unit),
    }
}

fn convert_mapping(mapping: &Mapping, unit: UnitSystem) -> Mapping {
    mapping
        .iter()
        .map(|(key, value)| (key.to_string(), convert_field(key, value, unit)))
        .collect()
}

/// Rebuild `node` depth-first with every measurement converted to `unit`.
///
/// Shape, keys, and key order are preserved. A scalar with no owning field
/// is only coerced.
pub fn convert_tree(node: &Node, unit: UnitSystem) -> Node {
    match node {
        Node::Scalar(scalar) => Node::Scalar(coerce(scalar)),
        Node::Sequence(items) => {
            Node::Sequence(items.iter().map(|item| convert_tree(item, unit)).collect())
        }
        Node::Mapping(mapping) => Node::Mapping(convert_mapping(mapping, unit)),
    }
}
