use std::path::Path;

use anyhow::{Context, Result};
use uddf::UnitSystem;

use crate::common;

pub async fn run(path: &Path, unit: UnitSystem, compact: bool) -> Result<()> {
    let doc = common::load_document(path, unit).await?;
    if compact {
        let text = serde_json::to_string(&doc).context("serialise JSON output")?;
        println!("{text}");
    } else {
        common::print_json(&doc)?;
    }
    Ok(())
}
