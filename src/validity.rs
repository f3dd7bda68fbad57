use crate::client::Format;
use crate::error::EpsgResult;
use crate::models::{Code, DomainOfValidity};
use crate::parser::{Element, GMD_NS};
use crate::resolver::Resolver;

/// Bound elements in `[west, east, south, north]` order.
const BOUND_TAGS: [&str; 4] = [
    "westBoundLongitude",
    "eastBoundLongitude",
    "southBoundLatitude",
    "northBoundLatitude",
];

/// Read the first `gmd:EX_GeographicBoundingBox` of an extent document.
///
/// Each bound is the decimal held by the bound element's first child
/// (normally `gco:Decimal`). Extents described only by polygons or
/// identifiers are reported as malformed.
pub fn extract_bounds(document: &Element) -> EpsgResult<DomainOfValidity> {
    let bbox = if document.name().matches(GMD_NS, "EX_GeographicBoundingBox") {
        document
    } else {
        document.require_descendant(GMD_NS, "EX_GeographicBoundingBox")?
    };

    let mut bounds = [0.0_f64; 4];
    for (slot, tag) in bounds.iter_mut().zip(BOUND_TAGS) {
        let bound = bbox.require_child(GMD_NS, tag)?;
        let value = match bound.first_child_element() {
            Some(decimal) => decimal.require_text()?,
            None => bound.require_text()?,
        };
        *slot = value.trim().parse::<f64>()?;
    }

    let [west, east, south, north] = bounds;
    Ok(DomainOfValidity {
        west,
        east,
        south,
        north,
    })
}

/// Fetch the extent document `area` and extract its bounds.
pub(crate) async fn fetch_domain(resolver: &Resolver, area: &Code) -> EpsgResult<DomainOfValidity> {
    area.validate()?;
    let xml = resolver.fetch(area.as_str(), Format::Gml).await?;
    let domain = extract_bounds(&Element::parse(&xml)?)?;
    tracing::debug!("Area {} bounds: {:?}", area, domain.to_array());
    Ok(domain)
}
