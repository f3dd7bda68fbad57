//! # EPSG SDK for Rust
//!
//! A Rust SDK for looking up coordinate reference systems, coordinate
//! systems and units of measure in the EPSG registry served by epsg.io.
//!
//! ## Quick Start
//!
//! ```no_run
//! use epsg_rs::EpsgObject;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Resolve a projected CRS
//!     let object = epsg_rs::get(27700).await?;
//!     println!("{}", object);
//!
//!     if let EpsgObject::ProjectedCrs(crs) = object {
//!         println!("PROJ.4: {}", crs.as_proj4().await?);
//!         println!("Base: {}", crs.base_geodetic_crs().await?);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod cache;
pub mod client;
pub mod config;
pub mod crs;
pub mod cs;
pub mod error;
pub mod models;
pub mod parser;
pub mod resolver;
pub mod validity;

#[cfg(test)]
mod testing;

// Re-exports
pub use client::{EpsgClient, Fetch, Format};
pub use config::{CachePolicy, ResolverConfig, EPSG_IO_URL};
pub use crs::{CompoundCrs, Crs, GeodeticCrs, ProjectedCrs};
pub use cs::{Axis, CartesianCs, Uom};
pub use error::{EpsgError, EpsgResult};
pub use models::{Code, Definition, DomainOfValidity, EpsgObject, ObjectKind};
pub use resolver::Resolver;

use tokio::sync::OnceCell;

static DEFAULT_RESOLVER: OnceCell<Resolver> = OnceCell::const_new();

/// Return the object registered under `code` using a process-wide resolver
/// for https://epsg.io/.
///
/// Supported object types are geodetic, projected and compound CRSs,
/// cartesian coordinate systems and units of measure.
pub async fn get(code: impl Into<Code>) -> EpsgResult<EpsgObject> {
    let resolver = DEFAULT_RESOLVER
        .get_or_try_init(|| async { Resolver::new() })
        .await?;
    resolver.resolve(code).await
}
