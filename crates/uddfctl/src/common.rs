use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use uddf::{ParsedDocument, UnitSystem};

pub async fn load_document(path: &Path, unit: UnitSystem) -> Result<ParsedDocument> {
    let doc = uddf::parse_file(path, unit)
        .await
        .with_context(|| format!("parse {}", path.display()))?;
    info!(path = %path.display(), %unit, dives = doc.dives().count(), "loaded dive log");
    Ok(doc)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}
