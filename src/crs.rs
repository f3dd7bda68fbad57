use crate::client::Format;
use crate::cs::CartesianCs;
use crate::error::{EpsgError, EpsgResult};
use crate::models::{Code, Definition, DomainOfValidity, ObjectKind};
use crate::parser::GML_NS;
use crate::resolver::Resolver;
use crate::validity;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Accessors common to geodetic, projected and compound CRSs, reachable
/// from each variant through `Deref`.
///
/// ```no_run
/// # async fn run() -> epsg_rs::EpsgResult<()> {
/// let crs = epsg_rs::get(27700).await?.into_projected_crs()?;
/// println!("{}", crs.as_wkt().await?);
/// println!("{:?}", crs.domain_of_validity().await?.to_array());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Crs {
    definition: Arc<Definition>,
    resolver: Resolver,
}

impl Crs {
    pub(crate) fn new(definition: Arc<Definition>, resolver: Resolver) -> Self {
        Self {
            definition,
            resolver,
        }
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    pub fn kind(&self) -> ObjectKind {
        self.definition.kind()
    }

    /// The EPSG code for this CRS.
    pub fn id(&self) -> EpsgResult<&str> {
        self.definition.id()
    }

    /// The official URN for this CRS.
    pub fn identifier(&self) -> EpsgResult<&str> {
        self.definition.identifier()
    }

    pub fn name(&self) -> EpsgResult<&str> {
        self.definition.name()
    }

    /// Human-readable description of the intended usage.
    pub fn scope(&self) -> EpsgResult<&str> {
        self.definition.element().child_text(GML_NS, "scope")
    }

    /// OGC WKT, e.g. `PROJCS["OSGB 1936 / British National Grid",...`
    pub async fn as_wkt(&self) -> EpsgResult<&str> {
        self.memoized(&self.definition.memo().wkt, Format::Wkt).await
    }

    /// ESRI flavoured WKT, e.g. `PROJCS["OSGB_1936_British_National_Grid",...`
    pub async fn as_esri_wkt(&self) -> EpsgResult<&str> {
        self.memoized(&self.definition.memo().esri_wkt, Format::EsriWkt)
            .await
    }

    /// OGC WKT marked up as HTML.
    pub async fn as_html(&self) -> EpsgResult<&str> {
        self.memoized(&self.definition.memo().html, Format::Html).await
    }

    /// PROJ.4 parameters without surrounding whitespace.
    pub async fn as_proj4(&self) -> EpsgResult<&str> {
        self.memoized(&self.definition.memo().proj4, Format::Proj4)
            .await
    }

    /// Code of the linked area-of-use document.
    pub fn domain_of_validity_code(&self) -> EpsgResult<Code> {
        let href = self.definition.element().child_href("domainOfValidity")?;
        Ok(Code::from_href(href))
    }

    /// Geographic bounds of the area of use.
    pub async fn domain_of_validity(&self) -> EpsgResult<DomainOfValidity> {
        let domain = self
            .definition
            .memo()
            .domain
            .get_or_try_init(|| async {
                let area = self.domain_of_validity_code()?;
                validity::fetch_domain(&self.resolver, &area).await
            })
            .await?;
        Ok(*domain)
    }

    async fn memoized<'a>(
        &'a self,
        cell: &'a OnceCell<String>,
        format: Format,
    ) -> EpsgResult<&'a str> {
        let text = cell
            .get_or_try_init(|| async {
                let id = self.id()?;
                tracing::debug!("Loading {} representation of {}", format, id);
                let body = self.resolver.fetch(id, format).await?;
                Ok::<_, EpsgError>(match format {
                    Format::Proj4 => body.trim().to_string(),
                    _ => body,
                })
            })
            .await?;
        Ok(text.as_str())
    }

    pub(crate) fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn fmt_as(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, {}",
            self.kind(),
            self.id().unwrap_or("?"),
            self.name().unwrap_or("?")
        )
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_as(f)
    }
}

/// A single geodetic CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticCrs(Crs);

impl GeodeticCrs {
    pub(crate) fn new(crs: Crs) -> Self {
        Self(crs)
    }
}

impl Deref for GeodeticCrs {
    type Target = Crs;

    fn deref(&self) -> &Crs {
        &self.0
    }
}

impl fmt::Display for GeodeticCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_as(f)
    }
}

/// A projected CRS, built on a geodetic CRS and a cartesian CS.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCrs(Crs);

impl ProjectedCrs {
    pub(crate) fn new(crs: Crs) -> Self {
        Self(crs)
    }

    pub fn base_geodetic_crs_code(&self) -> EpsgResult<Code> {
        let href = self.definition().element().child_href("baseGeodeticCRS")?;
        Ok(Code::from_href(href))
    }

    pub fn cartesian_cs_code(&self) -> EpsgResult<Code> {
        let href = self.definition().element().child_href("cartesianCS")?;
        Ok(Code::from_href(href))
    }

    /// The geodetic CRS this projection is based on.
    pub async fn base_geodetic_crs(&self) -> EpsgResult<GeodeticCrs> {
        let code = self.base_geodetic_crs_code()?;
        self.resolver().resolve(code).await?.into_geodetic_crs()
    }

    /// The cartesian coordinate system describing the projected axes.
    pub async fn cartesian_cs(&self) -> EpsgResult<CartesianCs> {
        let code = self.cartesian_cs_code()?;
        self.resolver().resolve(code).await?.into_cartesian_cs()
    }
}

impl Deref for ProjectedCrs {
    type Target = Crs;

    fn deref(&self) -> &Crs {
        &self.0
    }
}

impl fmt::Display for ProjectedCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_as(f)
    }
}

/// A compound (e.g. horizontal + vertical) CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundCrs(Crs);

impl CompoundCrs {
    pub(crate) fn new(crs: Crs) -> Self {
        Self(crs)
    }
}

impl Deref for CompoundCrs {
    type Target = Crs;

    fn deref(&self) -> &Crs {
        &self.0
    }
}

impl fmt::Display for CompoundCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_as(f)
    }
}
