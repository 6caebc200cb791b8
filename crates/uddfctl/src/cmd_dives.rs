use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use uddf::{format_measurement, DiveSummary, UnitSystem};

use crate::common;

#[derive(Serialize)]
struct DivesReport<'a> {
    unit: UnitSystem,
    dives: &'a [DiveSummary],
}

pub async fn run(path: &Path, unit: UnitSystem, json: bool) -> Result<()> {
    let doc = common::load_document(path, unit).await?;
    let summaries = doc.summaries();

    if json {
        common::print_json(&DivesReport {
            unit,
            dives: &summaries,
        })?;
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No dives found.");
        return Ok(());
    }

    println!(
        "{:<6} {:<16} {:<20} {:<12} {:<10} {}",
        "INDEX", "ID", "Date", "Max depth", "Duration", "Samples"
    );
    for (idx, dive) in summaries.iter().enumerate() {
        println!(
            "{idx:<6} {:<16} {:<20} {:<12} {:<10} {}",
            dive.id.as_deref().unwrap_or("-"),
            dive.datetime.as_deref().unwrap_or("-"),
            format_measurement("greatestdepth", dive.greatest_depth.as_ref(), unit),
            format_measurement("diveduration", dive.duration.as_ref(), unit),
            dive.waypoints,
        );
    }

    Ok(())
}
