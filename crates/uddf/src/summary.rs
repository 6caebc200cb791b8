//! Per-dive overview extracted from a converted dive.

use serde::Serialize;
use uddf_xml::{Mapping, Scalar};

use crate::normalize::ensure_sequence;

/// Headline figures of one dive, in whatever units the dive was converted to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiveSummary {
    pub id: Option<String>,
    pub datetime: Option<String>,
    pub greatest_depth: Option<Scalar>,
    /// May be `0:SS` text under imperial units.
    pub duration: Option<Scalar>,
    pub waypoints: usize,
}

impl DiveSummary {
    pub fn from_dive(dive: &Mapping) -> Self {
        let scalar_at = |path: &[&str]| -> Option<Scalar> {
            let (first, rest) = path.split_first()?;
            dive.get(first)?.path(rest)?.as_scalar().cloned()
        };
        let text_at = |path: &[&str]| scalar_at(path).map(|value| value.to_string());
        let waypoints = dive
            .get("samples")
            .map(|samples| ensure_sequence(samples.get("waypoint")).len())
            .unwrap_or(0);

        Self {
            id: text_at(&["id"]),
            datetime: text_at(&["informationbeforedive", "datetime"]),
            greatest_depth: scalar_at(&["informationafterdive", "greatestdepth"]),
            duration: scalar_at(&["informationafterdive", "diveduration"]),
            waypoints,
        }
    }
}

impl From<&Mapping> for DiveSummary {
    fn from(dive: &Mapping) -> Self {
        DiveSummary::from_dive(dive)
    }
}
