use crate::error::EpsgResult;
use crate::models::{Code, Definition, ObjectKind};
use crate::parser::{Element, GML_NS};
use crate::resolver::Resolver;
use futures::future::try_join_all;
use std::fmt;
use std::sync::Arc;

/// Names longer than this are shortened in `Display` output.
const DISPLAY_NAME_LIMIT: usize = 38;

/// A 1-, 2- or 3-dimensional cartesian coordinate system.
#[derive(Debug, Clone)]
pub struct CartesianCs {
    definition: Arc<Definition>,
    resolver: Resolver,
}

impl CartesianCs {
    pub(crate) fn new(definition: Arc<Definition>, resolver: Resolver) -> Self {
        Self {
            definition,
            resolver,
        }
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    pub fn id(&self) -> EpsgResult<&str> {
        self.definition.id()
    }

    pub fn identifier(&self) -> EpsgResult<&str> {
        self.definition.identifier()
    }

    pub fn name(&self) -> EpsgResult<&str> {
        self.definition.name()
    }

    pub fn remarks(&self) -> EpsgResult<&str> {
        self.definition.element().child_text(GML_NS, "remarks")
    }

    /// Axes in document order.
    pub fn axes(&self) -> EpsgResult<Vec<Axis>> {
        self.definition
            .element()
            .children_named(GML_NS, "axis")
            .map(|axis| {
                let element = axis.require_child(GML_NS, "CoordinateSystemAxis")?;
                Ok(Axis {
                    element: element.clone(),
                    resolver: self.resolver.clone(),
                })
            })
            .collect()
    }

    /// Unit names of every axis, in axis order.
    pub async fn axis_units(&self) -> EpsgResult<Vec<String>> {
        let axes = self.axes()?;
        try_join_all(axes.iter().map(|axis| axis.uom_name())).await
    }
}

impl PartialEq for CartesianCs {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
    }
}

impl fmt::Display for CartesianCs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name().unwrap_or("?");
        match name.char_indices().nth(DISPLAY_NAME_LIMIT) {
            Some((cut, _)) => write!(f, "{}: {}..", ObjectKind::CartesianCs, &name[..cut]),
            None => write!(f, "{}: {}", ObjectKind::CartesianCs, name),
        }
    }
}

/// A single coordinate axis.
#[derive(Debug, Clone)]
pub struct Axis {
    element: Element,
    resolver: Resolver,
}

impl Axis {
    /// Orientation of this axis, e.g. `east`.
    pub fn direction(&self) -> EpsgResult<&str> {
        self.element.child_text(GML_NS, "axisDirection")
    }

    /// Code of the axis unit, taken from the `uom` attribute.
    pub fn uom_code(&self) -> EpsgResult<Code> {
        let uom = self.element.require_attribute(None, "uom")?;
        Ok(Code::from_href(uom))
    }

    pub async fn uom(&self) -> EpsgResult<Uom> {
        let code = self.uom_code()?;
        self.resolver.resolve(code).await?.into_uom()
    }

    /// Name of the unit of measure used on this axis.
    pub async fn uom_name(&self) -> EpsgResult<String> {
        Ok(self.uom().await?.name()?.to_string())
    }
}

impl PartialEq for Axis {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uom = self.element.attribute(None, "uom").unwrap_or("?");
        write!(f, "Axis: {} / {}", self.direction().unwrap_or("?"), uom)
    }
}

/// A unit of measure.
#[derive(Debug, Clone, PartialEq)]
pub struct Uom {
    definition: Arc<Definition>,
}

impl Uom {
    pub(crate) fn new(definition: Arc<Definition>) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    pub fn id(&self) -> EpsgResult<&str> {
        self.definition.id()
    }

    pub fn identifier(&self) -> EpsgResult<&str> {
        self.definition.identifier()
    }

    pub fn name(&self) -> EpsgResult<&str> {
        self.definition.name()
    }
}

impl fmt::Display for Uom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UOM: {}", self.name().unwrap_or("?"))
    }
}
