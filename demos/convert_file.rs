use std::env;

use uddf::UnitSystem;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: convert_file <FILE.uddf> [si|metric|imperial]");
        return Ok(());
    };
    let unit: UnitSystem = match args.next() {
        Some(label) => label.parse()?,
        None => UnitSystem::default(),
    };

    let doc = uddf::parse_file(&path, unit).await?;
    println!("{}", doc.to_json_pretty()?);
    Ok(())
}
