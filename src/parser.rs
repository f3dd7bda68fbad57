use crate::error::{EpsgError, EpsgResult};
use roxmltree::{Document, Node};
use std::fmt;

/// GML 3.2 namespace used by every CRS, coordinate system and unit document.
pub const GML_NS: &str = "http://www.opengis.net/gml/3.2";

/// XLink namespace carrying cross-reference `href` attributes.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// ISO 19115 metadata namespace used by area (extent) documents.
pub const GMD_NS: &str = "http://www.isotc211.org/2005/gmd";

/// ISO 19139 basic types namespace (`gco:Decimal` and friends).
pub const GCO_NS: &str = "http://www.isotc211.org/2005/gco";

/// A namespace-qualified element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace: Option<String>,
    local: String,
}

impl QualifiedName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    /// True when this name is `local` in namespace `namespace`.
    pub fn matches(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local == local
    }
}

/// Clark notation: `{namespace}local`.
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Short human-readable form used in error messages.
fn prefixed(namespace: &str, local: &str) -> String {
    let prefix = match namespace {
        GML_NS => "gml",
        XLINK_NS => "xlink",
        GMD_NS => "gmd",
        GCO_NS => "gco",
        other => return format!("{{{}}}{}", other, local),
    };
    format!("{}:{}", prefix, local)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: QualifiedName,
    value: String,
}

/// An immutable XML element together with its attributes, direct text and
/// element children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: QualifiedName,
    attributes: Vec<Attribute>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> EpsgResult<Self> {
        let doc = Document::parse(xml)?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        let attributes = node
            .attributes()
            .map(|attr| Attribute {
                name: QualifiedName::new(attr.namespace(), attr.name()),
                value: attr.value().to_string(),
            })
            .collect();

        let mut text: Option<String> = None;
        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(Self::from_node(child));
            } else if child.is_text() && children.is_empty() {
                if let Some(chunk) = child.text() {
                    text.get_or_insert_with(String::new).push_str(chunk);
                }
            }
        }

        Self {
            name: QualifiedName::new(tag.namespace(), tag.name()),
            attributes,
            text,
            children,
        }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Text before the first child element, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    pub fn first_child_element(&self) -> Option<&Element> {
        self.children.first()
    }

    /// First direct child named `namespace:local`.
    pub fn child(&self, namespace: &str, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name.matches(namespace, local))
    }

    /// All direct children named `namespace:local`, in document order.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |c| c.name.matches(namespace, local))
    }

    /// First descendant (depth-first, document order) named `namespace:local`.
    pub fn descendant(&self, namespace: &str, local: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name.matches(namespace, local) {
                return Some(child);
            }
            if let Some(found) = child.descendant(namespace, local) {
                return Some(found);
            }
        }
        None
    }

    /// Attribute value; `namespace` is `None` for unqualified attributes.
    pub fn attribute(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace() == namespace && a.name.local() == local)
            .map(|a| a.value.as_str())
    }

    pub fn require_child(&self, namespace: &str, local: &str) -> EpsgResult<&Element> {
        self.child(namespace, local).ok_or_else(|| {
            EpsgError::MalformedDocument(format!(
                "missing element {} in {}",
                prefixed(namespace, local),
                self.name
            ))
        })
    }

    pub fn require_descendant(&self, namespace: &str, local: &str) -> EpsgResult<&Element> {
        self.descendant(namespace, local).ok_or_else(|| {
            EpsgError::MalformedDocument(format!(
                "no {} found under {}",
                prefixed(namespace, local),
                self.name
            ))
        })
    }

    pub fn require_attribute(&self, namespace: Option<&str>, local: &str) -> EpsgResult<&str> {
        self.attribute(namespace, local).ok_or_else(|| {
            let attr = match namespace {
                Some(ns) => prefixed(ns, local),
                None => local.to_string(),
            };
            EpsgError::MalformedDocument(format!("missing attribute {} on {}", attr, self.name))
        })
    }

    pub fn require_text(&self) -> EpsgResult<&str> {
        self.text()
            .ok_or_else(|| EpsgError::MalformedDocument(format!("{} has no text", self.name)))
    }

    /// Text of the direct child `namespace:local`.
    pub fn child_text(&self, namespace: &str, local: &str) -> EpsgResult<&str> {
        self.require_child(namespace, local)?.require_text()
    }

    /// The `xlink:href` of the direct child `gml:local`.
    pub fn child_href(&self, local: &str) -> EpsgResult<&str> {
        self.require_child(GML_NS, local)?
            .require_attribute(Some(XLINK_NS), "href")
    }
}
