use anyhow::Result;
use serde::Serialize;
use tracing::debug;
use uddf::units::convert_leaf;
use uddf::{category_for, format_measurement, Node, UnitSystem};

use crate::common;

#[derive(Serialize)]
struct FieldValue<'a> {
    field: &'a str,
    input: &'a str,
    value: Node,
    quantity: Option<String>,
    unit: Option<&'static str>,
}

pub fn run(name: &str, value: &str, unit: UnitSystem, json: bool) -> Result<()> {
    let category = category_for(name);
    let converted = convert_leaf(name, &Node::text(value), unit);
    debug!(field = name, quantity = ?category.map(|c| c.quantity), "converted field");

    if json {
        let payload = FieldValue {
            field: name,
            input: value,
            value: converted,
            quantity: category.map(|c| format!("{:?}", c.quantity).to_lowercase()),
            unit: category.map(|c| c.unit_label(unit)),
        };
        common::print_json(&payload)?;
        return Ok(());
    }

    match category {
        Some(category) => println!(
            "{name} = {} ({:?})",
            format_measurement(name, converted.as_scalar(), unit),
            category.quantity
        ),
        None => println!(
            "{name} = {} (not a measurement)",
            converted.as_scalar().map(ToString::to_string).unwrap_or_default()
        ),
    }
    Ok(())
}
