use std::env;

use uddf::{format_measurement, UnitSystem};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: dive_summary <FILE.uddf>");
        return Ok(());
    };

    for unit in UnitSystem::ALL {
        let doc = uddf::parse_file(&path, unit).await?;
        println!("[{unit}] {} dives", doc.dives().count());
        for dive in doc.summaries() {
            println!(
                "  {:<12} depth {:<10} duration {:<8} samples {}",
                dive.id.as_deref().unwrap_or("-"),
                format_measurement("greatestdepth", dive.greatest_depth.as_ref(), unit),
                format_measurement("diveduration", dive.duration.as_ref(), unit),
                dive.waypoints,
            );
        }
    }
    Ok(())
}
