use crate::crs::{CompoundCrs, Crs, GeodeticCrs, ProjectedCrs};
use crate::cs::{CartesianCs, Uom};
use crate::error::{EpsgError, EpsgResult};
use crate::parser::{Element, QualifiedName, GML_NS};
use crate::resolver::Resolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// External identifier of an EPSG object, e.g. `27700` or `"4400-cs"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Code(String);

impl Code {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_string())
    }

    /// Code referenced by an `xlink:href` value. The value is used verbatim.
    pub fn from_href(href: &str) -> Self {
        Self::new(href)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reject codes that cannot be embedded in a request path.
    pub fn validate(&self) -> EpsgResult<()> {
        if self.0.is_empty() {
            return Err(EpsgError::InvalidCode("code must not be empty".to_string()));
        }
        if let Some(bad) = self
            .0
            .chars()
            .find(|c| c.is_whitespace() || *c == '?' || *c == '#')
        {
            return Err(EpsgError::InvalidCode(format!(
                "{:?} contains {:?}",
                self.0, bad
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Code {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Code {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&String> for Code {
    fn from(code: &String) -> Self {
        Self::new(code.as_str())
    }
}

impl From<&Code> for Code {
    fn from(code: &Code) -> Self {
        code.clone()
    }
}

impl From<i32> for Code {
    fn from(code: i32) -> Self {
        Self(code.to_string())
    }
}

impl From<u32> for Code {
    fn from(code: u32) -> Self {
        Self(code.to_string())
    }
}

impl From<u64> for Code {
    fn from(code: u64) -> Self {
        Self(code.to_string())
    }
}

/// The closed set of document kinds the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    CartesianCs,
    GeodeticCrs,
    ProjectedCrs,
    CompoundCrs,
    BaseUnit,
}

impl ObjectKind {
    /// Map a document root to its kind.
    pub fn classify(root: &QualifiedName) -> EpsgResult<Self> {
        if root.namespace() != Some(GML_NS) {
            return Err(EpsgError::UnsupportedType(root.to_string()));
        }
        match root.local() {
            "CartesianCS" => Ok(ObjectKind::CartesianCs),
            "GeodeticCRS" => Ok(ObjectKind::GeodeticCrs),
            "ProjectedCRS" => Ok(ObjectKind::ProjectedCrs),
            "CompoundCRS" => Ok(ObjectKind::CompoundCrs),
            "BaseUnit" => Ok(ObjectKind::BaseUnit),
            _ => Err(EpsgError::UnsupportedType(root.to_string())),
        }
    }

    /// Local name of the GML root element for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectKind::CartesianCs => "CartesianCS",
            ObjectKind::GeodeticCrs => "GeodeticCRS",
            ObjectKind::ProjectedCrs => "ProjectedCRS",
            ObjectKind::CompoundCrs => "CompoundCRS",
            ObjectKind::BaseUnit => "BaseUnit",
        }
    }

    pub fn is_crs(&self) -> bool {
        matches!(
            self,
            ObjectKind::GeodeticCrs | ObjectKind::ProjectedCrs | ObjectKind::CompoundCrs
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Geographic extent of a CRS in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainOfValidity {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl DomainOfValidity {
    /// Bounds as `[west, east, south, north]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.east, self.south, self.north]
    }
}

impl From<DomainOfValidity> for [f64; 4] {
    fn from(domain: DomainOfValidity) -> Self {
        domain.to_array()
    }
}

/// Values derived from the network once per object.
#[derive(Debug, Default)]
pub(crate) struct Memo {
    pub(crate) wkt: OnceCell<String>,
    pub(crate) esri_wkt: OnceCell<String>,
    pub(crate) html: OnceCell<String>,
    pub(crate) proj4: OnceCell<String>,
    pub(crate) domain: OnceCell<DomainOfValidity>,
}

/// A classified GML document. Shared by every view of the same object and
/// owned by the resolver cache.
#[derive(Debug)]
pub struct Definition {
    code: Code,
    kind: ObjectKind,
    element: Element,
    memo: Memo,
}

impl Definition {
    pub(crate) fn new(code: Code, kind: ObjectKind, element: Element) -> Self {
        Self {
            code,
            kind,
            element,
            memo: Memo::default(),
        }
    }

    /// The code this object was resolved from.
    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The root element of the source document.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The EPSG code taken from `gml:id` (text after the last `-`).
    pub fn id(&self) -> EpsgResult<&str> {
        let gml_id = self.element.require_attribute(Some(GML_NS), "id")?;
        Ok(gml_id.rsplit('-').next().unwrap_or(gml_id))
    }

    /// The official URN of this object.
    pub fn identifier(&self) -> EpsgResult<&str> {
        self.element.child_text(GML_NS, "identifier")
    }

    pub fn name(&self) -> EpsgResult<&str> {
        self.element.child_text(GML_NS, "name")
    }

    pub(crate) fn memo(&self) -> &Memo {
        &self.memo
    }
}

impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.element == other.element
    }
}

/// Any object the resolver can return.
#[derive(Debug, Clone, PartialEq)]
pub enum EpsgObject {
    GeodeticCrs(GeodeticCrs),
    ProjectedCrs(ProjectedCrs),
    CompoundCrs(CompoundCrs),
    CartesianCs(CartesianCs),
    Uom(Uom),
}

impl EpsgObject {
    pub(crate) fn from_definition(definition: Arc<Definition>, resolver: Resolver) -> Self {
        match definition.kind() {
            ObjectKind::GeodeticCrs => {
                EpsgObject::GeodeticCrs(GeodeticCrs::new(Crs::new(definition, resolver)))
            }
            ObjectKind::ProjectedCrs => {
                EpsgObject::ProjectedCrs(ProjectedCrs::new(Crs::new(definition, resolver)))
            }
            ObjectKind::CompoundCrs => {
                EpsgObject::CompoundCrs(CompoundCrs::new(Crs::new(definition, resolver)))
            }
            ObjectKind::CartesianCs => {
                EpsgObject::CartesianCs(CartesianCs::new(definition, resolver))
            }
            ObjectKind::BaseUnit => EpsgObject::Uom(Uom::new(definition)),
        }
    }

    pub fn definition(&self) -> &Arc<Definition> {
        match self {
            EpsgObject::GeodeticCrs(crs) => crs.definition(),
            EpsgObject::ProjectedCrs(crs) => crs.definition(),
            EpsgObject::CompoundCrs(crs) => crs.definition(),
            EpsgObject::CartesianCs(cs) => cs.definition(),
            EpsgObject::Uom(uom) => uom.definition(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.definition().kind()
    }

    pub fn id(&self) -> EpsgResult<&str> {
        self.definition().id()
    }

    pub fn identifier(&self) -> EpsgResult<&str> {
        self.definition().identifier()
    }

    pub fn name(&self) -> EpsgResult<&str> {
        self.definition().name()
    }

    /// True when both values share one cached definition.
    pub fn same_instance(&self, other: &EpsgObject) -> bool {
        Arc::ptr_eq(self.definition(), other.definition())
    }

    /// The CRS capability set, for any of the three CRS variants.
    pub fn as_crs(&self) -> Option<&Crs> {
        match self {
            EpsgObject::GeodeticCrs(crs) => Some(crs),
            EpsgObject::ProjectedCrs(crs) => Some(crs),
            EpsgObject::CompoundCrs(crs) => Some(crs),
            _ => None,
        }
    }

    fn unexpected(&self, expected: ObjectKind) -> EpsgError {
        EpsgError::UnexpectedKind {
            code: self.definition().code().to_string(),
            expected,
            found: self.kind(),
        }
    }

    pub fn into_geodetic_crs(self) -> EpsgResult<GeodeticCrs> {
        match self {
            EpsgObject::GeodeticCrs(crs) => Ok(crs),
            other => Err(other.unexpected(ObjectKind::GeodeticCrs)),
        }
    }

    pub fn into_projected_crs(self) -> EpsgResult<ProjectedCrs> {
        match self {
            EpsgObject::ProjectedCrs(crs) => Ok(crs),
            other => Err(other.unexpected(ObjectKind::ProjectedCrs)),
        }
    }

    pub fn into_compound_crs(self) -> EpsgResult<CompoundCrs> {
        match self {
            EpsgObject::CompoundCrs(crs) => Ok(crs),
            other => Err(other.unexpected(ObjectKind::CompoundCrs)),
        }
    }

    pub fn into_cartesian_cs(self) -> EpsgResult<CartesianCs> {
        match self {
            EpsgObject::CartesianCs(cs) => Ok(cs),
            other => Err(other.unexpected(ObjectKind::CartesianCs)),
        }
    }

    pub fn into_uom(self) -> EpsgResult<Uom> {
        match self {
            EpsgObject::Uom(uom) => Ok(uom),
            other => Err(other.unexpected(ObjectKind::BaseUnit)),
        }
    }
}

impl fmt::Display for EpsgObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpsgObject::GeodeticCrs(crs) => write!(f, "{}", crs),
            EpsgObject::ProjectedCrs(crs) => write!(f, "{}", crs),
            EpsgObject::CompoundCrs(crs) => write!(f, "{}", crs),
            EpsgObject::CartesianCs(cs) => write!(f, "{}", cs),
            EpsgObject::Uom(uom) => write!(f, "{}", uom),
        }
    }
}
