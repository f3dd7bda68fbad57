use epsg_rs::{CachePolicy, EpsgObject, Resolver, ResolverConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Get code from command line or use default
    let code = std::env::args().nth(1).unwrap_or_else(|| "27700".to_string());

    let config = ResolverConfig::default().with_cache_policy(CachePolicy::Unbounded);
    let resolver = Resolver::with_config(config)?;

    println!("Resolving EPSG:{}...", code);

    let object = match resolver.resolve(code.as_str()).await {
        Ok(object) => object,
        Err(e) => {
            eprintln!("\n✗ Error resolving code: {}", e);
            return Ok(());
        }
    };

    println!("\n✓ {}", object);

    let Some(crs) = object.as_crs() else {
        println!("  Not a coordinate reference system ({})", object.kind());
        return Ok(());
    };

    println!("  Identifier: {}", crs.identifier()?);
    println!("  Scope: {}", crs.scope()?);

    match crs.domain_of_validity().await {
        Ok(domain) => println!(
            "  Domain: west {} east {} south {} north {}",
            domain.west, domain.east, domain.south, domain.north
        ),
        Err(e) => println!("  Domain: unavailable ({})", e),
    }

    if let EpsgObject::ProjectedCrs(projected) = &object {
        println!("  Base CRS: {}", projected.base_geodetic_crs().await?);
        println!("  Coordinate system: {}", projected.cartesian_cs().await?);
    }

    println!("\n  PROJ.4: {}", crs.as_proj4().await?);
    println!("  WKT: {}", crs.as_wkt().await?);

    Ok(())
}
