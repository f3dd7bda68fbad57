use epsg_rs::EpsgObject;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let code = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "4400-cs".to_string());

    println!("Resolving coordinate system {}...", code);

    match epsg_rs::get(code.as_str()).await? {
        EpsgObject::CartesianCs(cs) => {
            println!("\n✓ {}", cs);
            println!("  Remarks: {}", cs.remarks()?);

            for axis in cs.axes()? {
                println!("  - {} in {}", axis.direction()?, axis.uom_name().await?);
            }
        }
        other => {
            eprintln!("\n✗ {} is a {}, not a cartesian CS", code, other.kind());
        }
    }

    Ok(())
}
