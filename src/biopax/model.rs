//! BioPAX Level 3 object graph produced by the converter.
//!
//! Elements are stored in a single map keyed by URI. Links between elements (entity
//! references, participants, components, cross-references, ...) are URIs as well, so the
//! graph can be serialized as-is and checked for dangling links.
//!
//! Each family of BioPAX classes is one struct with a `kind` tag instead of a class
//! hierarchy:
//!
//! | Family            | Kinds                                                  |
//! |-------------------|--------------------------------------------------------|
//! | `PhysicalEntity`  | `Protein`, `SmallMolecule`, `Complex`                  |
//! | `EntityReference` | `ProteinReference`, `SmallMoleculeReference`           |
//! | `Conversion`      | `BiochemicalReaction`, `Transport`                     |
//! | `Xref`            | `UnificationXref`, `RelationshipXref`, `PublicationXref` |
//!
//! Shared capabilities are exposed through the [`Named`], [`Commented`] and
//! [`XReferrable`] traits.

use std::fmt::{self, Display};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use variantly::Variantly;

/// Name fields shared by every named BioPAX class.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Names {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub name: IndexSet<String>,
}

impl Names {
    /// Uses `name` as display name, standard name and alternative name at once.
    pub fn all(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: Some(name.clone()),
            standard_name: Some(name.clone()),
            name: IndexSet::from([name]),
        }
    }
}

pub trait Named {
    fn names(&self) -> &Names;
    fn names_mut(&mut self) -> &mut Names;

    fn display_name(&self) -> Option<&str> {
        self.names().display_name.as_deref()
    }
}

pub trait Commented {
    fn comments(&self) -> &[String];
    fn comments_mut(&mut self) -> &mut Vec<String>;
}

/// Classes that can carry cross-references.
pub trait XReferrable {
    fn xrefs(&self) -> &IndexSet<String>;
    fn xrefs_mut(&mut self) -> &mut IndexSet<String>;
}

macro_rules! impl_capabilities {
    (named: $($named:ty),*; commented: $($commented:ty),*; xreferrable: $($xref:ty),*) => {
        $(
            impl Named for $named {
                fn names(&self) -> &Names {
                    &self.names
                }

                fn names_mut(&mut self) -> &mut Names {
                    &mut self.names
                }
            }
        )*
        $(
            impl Commented for $commented {
                fn comments(&self) -> &[String] {
                    &self.comments
                }

                fn comments_mut(&mut self) -> &mut Vec<String> {
                    &mut self.comments
                }
            }
        )*
        $(
            impl XReferrable for $xref {
                fn xrefs(&self) -> &IndexSet<String> {
                    &self.xrefs
                }

                fn xrefs_mut(&mut self) -> &mut IndexSet<String> {
                    &mut self.xrefs
                }
            }
        )*
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Variantly)]
pub enum PhysicalEntityKind {
    Protein,
    SmallMolecule,
    Complex,
}

impl PhysicalEntityKind {
    /// The entity reference kind matching this entity kind. Complexes have none.
    pub fn reference_kind(&self) -> Option<EntityReferenceKind> {
        match self {
            PhysicalEntityKind::Protein => Some(EntityReferenceKind::ProteinReference),
            PhysicalEntityKind::SmallMolecule => Some(EntityReferenceKind::SmallMoleculeReference),
            PhysicalEntityKind::Complex => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Variantly)]
pub enum EntityReferenceKind {
    ProteinReference,
    SmallMoleculeReference,
}

impl EntityReferenceKind {
    /// Whether this is a BioPAX `SequenceEntityReference`, which may carry an organism.
    pub fn is_sequence(&self) -> bool {
        matches!(self, EntityReferenceKind::ProteinReference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Variantly)]
pub enum ConversionKind {
    BiochemicalReaction,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Variantly)]
pub enum XrefKind {
    #[serde(rename = "UnificationXref")]
    Unification,
    #[serde(rename = "RelationshipXref")]
    Relationship,
    #[serde(rename = "PublicationXref")]
    Publication,
}

impl XrefKind {
    /// Lower-case class name, used as identifier prefix.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            XrefKind::Unification => "unificationxref",
            XrefKind::Relationship => "relationshipxref",
            XrefKind::Publication => "publicationxref",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversionDirection {
    #[default]
    #[serde(rename = "LEFT-TO-RIGHT")]
    LeftToRight,
    #[serde(rename = "REVERSIBLE")]
    Reversible,
}

impl ConversionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionDirection::LeftToRight => "LEFT-TO-RIGHT",
            ConversionDirection::Reversible => "REVERSIBLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    #[default]
    #[serde(rename = "ACTIVATION")]
    Activation,
    #[serde(rename = "INHIBITION")]
    Inhibition,
    #[serde(rename = "INHIBITION-COMPETITIVE")]
    InhibitionCompetitive,
    #[serde(rename = "INHIBITION-NONCOMPETITIVE")]
    InhibitionNoncompetitive,
}

impl ControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Activation => "ACTIVATION",
            ControlType::Inhibition => "INHIBITION",
            ControlType::InhibitionCompetitive => "INHIBITION-COMPETITIVE",
            ControlType::InhibitionNoncompetitive => "INHIBITION-NONCOMPETITIVE",
        }
    }
}

/// A `Protein`, `SmallMolecule` or `Complex`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicalEntity {
    pub kind: PhysicalEntityKind,
    #[serde(flatten)]
    pub names: Names,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellular_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_reference: Option<String>,
    /// Members of a complex; always empty for other kinds.
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub components: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub data_sources: IndexSet<String>,
}

impl PhysicalEntity {
    pub fn new(kind: PhysicalEntityKind, names: Names) -> Self {
        Self {
            kind,
            names,
            comments: Vec::new(),
            xrefs: IndexSet::new(),
            cellular_location: None,
            entity_reference: None,
            components: IndexSet::new(),
            data_sources: IndexSet::new(),
        }
    }
}

/// A `ProteinReference` or `SmallMoleculeReference`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityReference {
    pub kind: EntityReferenceKind,
    #[serde(flatten)]
    pub names: Names,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
}

impl EntityReference {
    pub fn new(kind: EntityReferenceKind, names: Names) -> Self {
        Self {
            kind,
            names,
            comments: Vec::new(),
            xrefs: IndexSet::new(),
            organism: None,
        }
    }
}

/// A `BiochemicalReaction` or `Transport`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversion {
    pub kind: ConversionKind,
    #[serde(flatten)]
    pub names: Names,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
    pub direction: ConversionDirection,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub left: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub right: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub data_sources: IndexSet<String>,
}

impl Conversion {
    pub fn new(kind: ConversionKind, names: Names) -> Self {
        Self {
            kind,
            names,
            comments: Vec::new(),
            xrefs: IndexSet::new(),
            direction: ConversionDirection::default(),
            left: IndexSet::new(),
            right: IndexSet::new(),
            data_sources: IndexSet::new(),
        }
    }
}

/// A `Control` interaction between a controller entity and a controlled conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Control {
    #[serde(flatten)]
    pub names: Names,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
    pub control_type: ControlType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled: Option<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub data_sources: IndexSet<String>,
}

impl Control {
    pub fn new(control_type: ControlType, names: Names) -> Self {
        Self {
            names,
            comments: Vec::new(),
            xrefs: IndexSet::new(),
            control_type,
            controller: None,
            controlled: None,
            data_sources: IndexSet::new(),
        }
    }
}

/// A unification, relationship or publication cross-reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Xref {
    pub kind: XrefKind,
    pub db: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl Xref {
    pub fn new(kind: XrefKind, db: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind,
            db: db.into(),
            id: id.into(),
            comments: Vec::new(),
        }
    }
}

impl Display for Xref {
    /// `db:id`, the form used to compare cross-references by content.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.db, self.id)
    }
}

/// A `CellularLocationVocabulary` term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CellularLocation {
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub terms: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pathway {
    #[serde(flatten)]
    pub names: Names,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub components: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub data_sources: IndexSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Provenance {
    #[serde(flatten)]
    pub names: Names,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
}

/// The organism entity references and pathways are stamped with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BioSource {
    #[serde(flatten)]
    pub names: Names,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub xrefs: IndexSet<String>,
}

impl_capabilities!(
    named: PhysicalEntity, EntityReference, Conversion, Control, Pathway, Provenance, BioSource;
    commented: PhysicalEntity, EntityReference, Conversion, Control, Xref, CellularLocation,
        Pathway, Provenance, BioSource;
    xreferrable: PhysicalEntity, EntityReference, Conversion, Control, CellularLocation, Pathway,
        Provenance, BioSource
);

/// Any element of the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Variantly)]
#[serde(tag = "family")]
pub enum Element {
    PhysicalEntity(PhysicalEntity),
    EntityReference(EntityReference),
    Conversion(Conversion),
    Control(Control),
    Xref(Xref),
    CellularLocation(CellularLocation),
    Pathway(Pathway),
    Provenance(Provenance),
    BioSource(BioSource),
}

impl Element {
    /// Name of the element family, used in error messages.
    pub fn family(&self) -> &'static str {
        match self {
            Element::PhysicalEntity(_) => PhysicalEntity::FAMILY,
            Element::EntityReference(_) => EntityReference::FAMILY,
            Element::Conversion(_) => Conversion::FAMILY,
            Element::Control(_) => Control::FAMILY,
            Element::Xref(_) => Xref::FAMILY,
            Element::CellularLocation(_) => CellularLocation::FAMILY,
            Element::Pathway(_) => Pathway::FAMILY,
            Element::Provenance(_) => Provenance::FAMILY,
            Element::BioSource(_) => BioSource::FAMILY,
        }
    }

    /// The concrete BioPAX class name of the element.
    pub fn class_name(&self) -> &'static str {
        match self {
            Element::PhysicalEntity(pe) => match pe.kind {
                PhysicalEntityKind::Protein => "Protein",
                PhysicalEntityKind::SmallMolecule => "SmallMolecule",
                PhysicalEntityKind::Complex => "Complex",
            },
            Element::EntityReference(er) => match er.kind {
                EntityReferenceKind::ProteinReference => "ProteinReference",
                EntityReferenceKind::SmallMoleculeReference => "SmallMoleculeReference",
            },
            Element::Conversion(conversion) => match conversion.kind {
                ConversionKind::BiochemicalReaction => "BiochemicalReaction",
                ConversionKind::Transport => "Transport",
            },
            Element::Control(_) => "Control",
            Element::Xref(xref) => match xref.kind {
                XrefKind::Unification => "UnificationXref",
                XrefKind::Relationship => "RelationshipXref",
                XrefKind::Publication => "PublicationXref",
            },
            Element::CellularLocation(_) => "CellularLocationVocabulary",
            Element::Pathway(_) => "Pathway",
            Element::Provenance(_) => "Provenance",
            Element::BioSource(_) => "BioSource",
        }
    }

    pub fn as_named(&self) -> Option<&dyn Named> {
        match self {
            Element::PhysicalEntity(e) => Some(e),
            Element::EntityReference(e) => Some(e),
            Element::Conversion(e) => Some(e),
            Element::Control(e) => Some(e),
            Element::Pathway(e) => Some(e),
            Element::Provenance(e) => Some(e),
            Element::BioSource(e) => Some(e),
            Element::Xref(_) | Element::CellularLocation(_) => None,
        }
    }

    pub fn as_commented(&self) -> &dyn Commented {
        match self {
            Element::PhysicalEntity(e) => e,
            Element::EntityReference(e) => e,
            Element::Conversion(e) => e,
            Element::Control(e) => e,
            Element::Xref(e) => e,
            Element::CellularLocation(e) => e,
            Element::Pathway(e) => e,
            Element::Provenance(e) => e,
            Element::BioSource(e) => e,
        }
    }

    pub fn as_xreferrable(&self) -> Option<&dyn XReferrable> {
        match self {
            Element::PhysicalEntity(e) => Some(e),
            Element::EntityReference(e) => Some(e),
            Element::Conversion(e) => Some(e),
            Element::Control(e) => Some(e),
            Element::CellularLocation(e) => Some(e),
            Element::Pathway(e) => Some(e),
            Element::Provenance(e) => Some(e),
            Element::BioSource(e) => Some(e),
            Element::Xref(_) => None,
        }
    }

    pub fn as_xreferrable_mut(&mut self) -> Option<&mut dyn XReferrable> {
        match self {
            Element::PhysicalEntity(e) => Some(e),
            Element::EntityReference(e) => Some(e),
            Element::Conversion(e) => Some(e),
            Element::Control(e) => Some(e),
            Element::CellularLocation(e) => Some(e),
            Element::Pathway(e) => Some(e),
            Element::Provenance(e) => Some(e),
            Element::BioSource(e) => Some(e),
            Element::Xref(_) => None,
        }
    }

    /// Data sources of BioPAX `Entity` classes; `None` for utility classes.
    pub fn data_sources_mut(&mut self) -> Option<&mut IndexSet<String>> {
        match self {
            Element::PhysicalEntity(e) => Some(&mut e.data_sources),
            Element::Conversion(e) => Some(&mut e.data_sources),
            Element::Control(e) => Some(&mut e.data_sources),
            Element::Pathway(e) => Some(&mut e.data_sources),
            _ => None,
        }
    }

    /// Every URI this element links to, paired with the property name.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        let mut links: Vec<(&'static str, &str)> = Vec::new();

        if let Some(xreferrable) = self.as_xreferrable() {
            links.extend(xreferrable.xrefs().iter().map(|x| ("xref", x.as_str())));
        }

        match self {
            Element::PhysicalEntity(e) => {
                links.extend(e.cellular_location.as_deref().map(|l| ("cellularLocation", l)));
                links.extend(e.entity_reference.as_deref().map(|r| ("entityReference", r)));
                links.extend(e.components.iter().map(|c| ("component", c.as_str())));
                links.extend(e.data_sources.iter().map(|d| ("dataSource", d.as_str())));
            }
            Element::EntityReference(e) => {
                links.extend(e.organism.as_deref().map(|o| ("organism", o)));
            }
            Element::Conversion(e) => {
                links.extend(e.left.iter().map(|l| ("left", l.as_str())));
                links.extend(e.right.iter().map(|r| ("right", r.as_str())));
                links.extend(e.data_sources.iter().map(|d| ("dataSource", d.as_str())));
            }
            Element::Control(e) => {
                links.extend(e.controller.as_deref().map(|c| ("controller", c)));
                links.extend(e.controlled.as_deref().map(|c| ("controlled", c)));
                links.extend(e.data_sources.iter().map(|d| ("dataSource", d.as_str())));
            }
            Element::Pathway(e) => {
                links.extend(e.components.iter().map(|c| ("pathwayComponent", c.as_str())));
                links.extend(e.organism.as_deref().map(|o| ("organism", o)));
                links.extend(e.data_sources.iter().map(|d| ("dataSource", d.as_str())));
            }
            _ => {}
        }

        links
    }
}

/// Typed access to one element family stored in an [`Element`].
pub trait ModelElement: Into<Element> {
    const FAMILY: &'static str;

    fn from_element(element: &Element) -> Option<&Self>;
    fn from_element_mut(element: &mut Element) -> Option<&mut Self>;
}

macro_rules! model_element {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Element::$ty(value)
                }
            }

            impl ModelElement for $ty {
                const FAMILY: &'static str = stringify!($ty);

                fn from_element(element: &Element) -> Option<&Self> {
                    match element {
                        Element::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_element_mut(element: &mut Element) -> Option<&mut Self> {
                    match element {
                        Element::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

model_element!(
    PhysicalEntity,
    EntityReference,
    Conversion,
    Control,
    Xref,
    CellularLocation,
    Pathway,
    Provenance,
    BioSource,
);

/// The converted BioPAX model: elements keyed by URI, in creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BioPaxModel {
    /// Namespace prefix of every synthesized identifier.
    pub xml_base: String,
    #[serde(default)]
    elements: IndexMap<String, Element>,
}

impl BioPaxModel {
    pub fn new(xml_base: impl Into<String>) -> Self {
        Self {
            xml_base: xml_base.into(),
            elements: IndexMap::new(),
        }
    }

    pub fn get(&self, uri: &str) -> Option<&Element> {
        self.elements.get(uri)
    }

    /// Returns the element registered under `uri` if it belongs to family `T`.
    pub fn get_as<T: ModelElement>(&self, uri: &str) -> Option<&T> {
        self.elements.get(uri).and_then(T::from_element)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.elements.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements with their URIs, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Element)> {
        self.elements.iter()
    }

    /// All URIs, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.elements.keys()
    }

    /// All elements of family `T` with their URIs.
    pub fn objects<'a, T: ModelElement + 'a>(&'a self) -> impl Iterator<Item = (&'a String, &'a T)> {
        self.elements
            .iter()
            .filter_map(|(uri, element)| T::from_element(element).map(|inner| (uri, inner)))
    }

    pub(crate) fn elements_mut(&mut self) -> &mut IndexMap<String, Element> {
        &mut self.elements
    }
}
