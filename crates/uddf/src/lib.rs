#![cfg_attr(docsrs, feature(doc_cfg))]
//! High level UDDF facade: parse a dive log, normalize its repeatable
//! collections, and convert every dive's measurements to one unit system.
//!
//! ```rust
//! use uddf::{Node, UnitSystem};
//!
//! # async fn run() -> Result<(), uddf::UddfError> {
//! let xml = r#"<uddf><profiledata><repetitiongroup><dive>
//!     <samples><waypoint><depth>10</depth><temperature>293.15</temperature></waypoint></samples>
//! </dive></repetitiongroup></profiledata></uddf>"#;
//! let doc = uddf::parse(xml, UnitSystem::Imperial).await?;
//! assert_eq!(doc.unit, UnitSystem::Imperial);
//! let dive = doc.dives().next().expect("one dive");
//! let waypoint = dive.get("samples").and_then(|s| s.get("waypoint")).unwrap();
//! assert_eq!(waypoint.get("depth"), Some(&Node::number(33.0)));
//! # Ok(())
//! # }
//! ```

pub use uddf_units as units;
pub use uddf_xml as xml;

pub mod normalize;
pub mod summary;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use normalize::{convert_dives, ensure_sequence, normalize};
pub use summary::DiveSummary;
pub use uddf_units::{category_for, format_measurement, Category, Quantity, UnitError, UnitSystem};
pub use uddf_xml::{Mapping, Node, Scalar, XmlError};

use crate::normalize::{DIVE, PROFILE_DATA, REPETITION_GROUP, ROOT};

/// Error type produced by the facade.
#[derive(Debug, Error)]
pub enum UddfError {
    /// Loading or parsing the XML failed.
    #[error(transparent)]
    Xml(#[from] XmlError),
    /// Serialising the converted document failed.
    #[error("json: {0}")]
    Json(String),
}

/// Parsed, normalized, and unit-converted document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDocument {
    /// Unit system the dives were converted to.
    pub unit: UnitSystem,
    /// Tree rooted like the source XML (`{ "uddf": ... }`).
    pub data: Node,
}

impl ParsedDocument {
    /// All repetition groups, in document order.
    pub fn repetition_groups(&self) -> &[Node] {
        self.data
            .path(&[ROOT, PROFILE_DATA, REPETITION_GROUP])
            .and_then(Node::as_sequence)
            .unwrap_or(&[])
    }

    /// Every dive across all repetition groups, in document order.
    pub fn dives(&self) -> impl Iterator<Item = &Mapping> {
        self.repetition_groups()
            .iter()
            .filter_map(|group| group.get(DIVE).and_then(Node::as_sequence))
            .flatten()
            .filter_map(Node::as_mapping)
    }

    pub fn summaries(&self) -> Vec<DiveSummary> {
        self.dives().map(DiveSummary::from_dive).collect()
    }

    pub fn to_json_pretty(&self) -> Result<String, UddfError> {
        serde_json::to_string_pretty(self).map_err(|err| UddfError::Json(err.to_string()))
    }
}

/// Synchronous twin of [`parse`].
pub fn parse_str(xml: &str, unit: UnitSystem) -> Result<ParsedDocument, UddfError> {
    let tree = uddf_xml::parse_tree(xml)?;
    let data = convert_dives(&tree, unit);
    let doc = ParsedDocument { unit, data };
    debug!(
        %unit,
        groups = doc.repetition_groups().len(),
        dives = doc.dives().count(),
        "parsed uddf document"
    );
    Ok(doc)
}

/// Parse UDDF text and convert every dive to `unit`.
///
/// XML syntax errors are returned unchanged as [`UddfError::Xml`]; any
/// irregularity inside a well-formed document is passed through.
pub async fn parse(xml: &str, unit: UnitSystem) -> Result<ParsedDocument, UddfError> {
    parse_str(xml, unit)
}

/// Read a UDDF file and [`parse`] it.
pub async fn parse_file(
    path: impl AsRef<Path>,
    unit: UnitSystem,
) -> Result<ParsedDocument, UddfError> {
    let xml = uddf_xml::load_xml_file(path).await?;
    parse(&xml, unit).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE1: &str = include_str!("../testdata/sample1.uddf");
    const SUBSURFACE: &str = include_str!("../testdata/subsurface_manual.uddf");
    const SUUNTO: &str = include_str!("../testdata/suunto_eon.uddf");

    fn waypoints(doc: &ParsedDocument) -> &[Node] {
        doc.dives()
            .next()
            .and_then(|dive| dive.get("samples"))
            .and_then(|samples| samples.get("waypoint"))
            .and_then(Node::as_sequence)
            .expect("waypoint sequence")
    }

    fn number(node: &Node, key: &str) -> f64 {
        node.get(key)
            .and_then(Node::as_f64)
            .unwrap_or_else(|| panic!("{key} is not a number"))
    }

    #[tokio::test]
    async fn si_is_the_default_and_identity() {
        let doc = parse(SAMPLE1, UnitSystem::default()).await.expect("parse");
        assert_eq!(doc.unit, UnitSystem::Si);
        let waypoints = waypoints(&doc);
        assert_eq!(number(&waypoints[0], "temperature"), 293.15);
        assert_eq!(number(&waypoints[0], "tankVolume"), 0.012);
        assert_eq!(number(&waypoints[0], "depth"), 10.0);
    }

    #[tokio::test]
    async fn metric_conversion() {
        let doc = parse(SAMPLE1, UnitSystem::Metric).await.expect("parse");
        assert_eq!(doc.unit, UnitSystem::Metric);
        let waypoints = waypoints(&doc);
        assert_eq!(waypoints.len(), 2);
        assert!((number(&waypoints[0], "temperature") - 20.0).abs() < 0.005);
        assert_eq!(number(&waypoints[0], "tankVolume"), 12.0);
        assert_eq!(number(&waypoints[0], "depth"), 10.0);
        assert!((number(&waypoints[1], "temperature") - 22.0).abs() < 0.005);
        assert_eq!(number(&waypoints[1], "tankVolume"), 11.0);
        assert_eq!(number(&waypoints[1], "depth"), 15.0);
    }

    #[tokio::test]
    async fn imperial_conversion() {
        let doc = parse(SAMPLE1, UnitSystem::Imperial).await.expect("parse");
        let waypoints = waypoints(&doc);
        assert_eq!(number(&waypoints[0], "temperature"), 68.0);
        assert!((number(&waypoints[0], "tankVolume") - 0.4238).abs() < 0.0005);
        assert_eq!(number(&waypoints[0], "depth"), 33.0);
        assert_eq!(number(&waypoints[1], "divetime"), 1.0);
    }

    #[tokio::test]
    async fn manually_entered_dive_imperial() {
        let doc = parse(SUBSURFACE, UnitSystem::Imperial).await.expect("parse");
        assert_eq!(doc.unit.as_str(), "imperial");
        let dive = doc.dives().next().expect("dive");
        assert!(dive.contains_key("informationbeforedive"));
        assert!(dive.contains_key("informationafterdive"));
        assert!(dive.contains_key("tankdata"));

        let waypoints = waypoints(&doc);
        assert_eq!(waypoints.len(), 4);
        assert_eq!(number(&waypoints[1], "depth"), 19.0);
        assert_eq!(waypoints[0].get("divemode"), Some(&Node::text("Type: opencircuit")));
        assert_eq!(waypoints[0].get("switchmix"), Some(&Node::text("Ref: mix1")));
        assert_eq!(waypoints[1].get("divetime"), Some(&Node::text("0:08")));

        let after = dive.get("informationafterdive").expect("after dive");
        assert_eq!(number(after, "greatestdepth"), 19.0);
        assert_eq!(after.get("diveduration"), Some(&Node::text("0:32")));
        assert_eq!(
            after.path(&["notes", "para"]).and_then(Node::as_str),
            Some("Manually entered & checked")
        );

        let tank = dive.get("tankdata").expect("tank data");
        assert_eq!(number(tank, "tankpressurebegin"), 2901.0);
        assert_eq!(number(tank, "tankvolume"), 0.424);
        assert_eq!(
            tank.path(&["link", "ref"]).and_then(Node::as_str),
            Some("mix1")
        );

        // gas definitions sit outside the dives and keep their raw text
        assert_eq!(
            doc.data
                .path(&["uddf", "gasdefinitions", "mix", "maximumoperatingdepth"])
                .and_then(Node::as_str),
            Some("56")
        );
    }

    #[tokio::test]
    async fn manually_entered_dive_metric() {
        let doc = parse(SUBSURFACE, UnitSystem::Metric).await.expect("parse");
        assert_eq!(waypoints(&doc).len(), 4);
        let dive = doc.dives().next().expect("dive");
        let tank = dive.get("tankdata").expect("tank data");
        assert_eq!(number(tank, "tankpressurebegin"), 200.0);
        assert_eq!(number(tank, "tankpressureend"), 50.0);
        assert_eq!(number(tank, "tankvolume"), 12.0);
    }

    #[tokio::test]
    async fn dive_computer_log() {
        let doc = parse(SUUNTO, UnitSystem::Imperial).await.expect("parse");
        assert_eq!(doc.repetition_groups().len(), 2);
        assert_eq!(doc.dives().count(), 3);
        let waypoints = waypoints(&doc);
        assert_eq!(waypoints.len(), 8);
        let pressure = waypoints[1].get("tankpressure").expect("tank pressure");
        assert_eq!(pressure.get("ref").and_then(Node::as_str), Some("tank1"));
        assert_eq!(pressure.get("_"), Some(&Node::number(20_000_000.0)));

        let summaries = doc.summaries();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].id.as_deref(), Some("eon-1"));
        assert_eq!(summaries[0].waypoints, 8);
        assert_eq!(summaries[0].greatest_depth, Some(Scalar::Number(60.0)));
        assert_eq!(summaries[0].duration, Some(Scalar::Number(10.0)));
        assert_eq!(summaries[2].id.as_deref(), Some("eon-3"));
        assert_eq!(summaries[2].waypoints, 0);
    }

    #[tokio::test]
    async fn source_tree_is_not_mutated() {
        let tree = uddf_xml::parse_tree(SAMPLE1).expect("parse");
        let before = tree.clone();
        let _ = convert_dives(&tree, UnitSystem::Imperial);
        assert_eq!(tree, before);
    }

    #[tokio::test]
    async fn syntax_errors_are_propagated() {
        let err = parse("<uddf><profiledata></uddf>", UnitSystem::Si)
            .await
            .unwrap_err();
        assert!(matches!(err, UddfError::Xml(XmlError::Xml(_))));
    }

    #[tokio::test]
    async fn parse_file_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("uddf-rs-{}.uddf", std::process::id()));
        tokio::fs::write(&path, SAMPLE1).await.expect("write fixture");
        let doc = parse_file(&path, UnitSystem::Metric).await.expect("parse file");
        tokio::fs::remove_file(&path).await.expect("remove fixture");
        assert_eq!(doc.dives().count(), 1);

        let missing = parse_file(path.with_extension("missing"), UnitSystem::Si).await;
        assert!(matches!(missing, Err(UddfError::Xml(XmlError::Io(_)))));
    }

    #[test]
    fn json_output_carries_unit_and_data() {
        let doc = parse_str(SAMPLE1, UnitSystem::Imperial).expect("parse");
        let json = doc.to_json_pretty().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["unit"], "imperial");
        let waypoint = &value["data"]["uddf"]["profiledata"]["repetitiongroup"][0]["dive"][0]
            ["samples"]["waypoint"][0];
        assert_eq!(waypoint["depth"], 33);
        assert_eq!(waypoint["temperature"], 68);
    }
}
