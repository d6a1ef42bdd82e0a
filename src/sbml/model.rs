//! In-memory SBML model consumed by the converter.
//!
//! These structs mirror the subset of SBML that metabolic-pathway models actually use:
//! compartments, species, reactions with reactant/product/modifier references and
//! RDF CV-term annotations. They are produced by [`crate::sbml::reader`] (or deserialized
//! from JSON) and are never mutated by the conversion.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Root object of a source model.
///
/// The reaction list is optional because an SBML document may omit `<listOfReactions>`
/// entirely. The converter treats that as a structural failure.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Default, PartialEq)]
pub struct SourceModel {
    /// SBML identifier of the model.
    #[builder(setter(into))]
    pub id: String,

    /// Human-readable name of the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Free-text notes attached to the model, as raw XHTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub notes: Option<String>,

    /// CV-term annotations of the model itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotation")))]
    pub annotation: Vec<AnnotationTerm>,

    /// All compartments of the model, in document order.
    #[serde(default)]
    #[builder(default, setter(into, each(name = "to_compartments")))]
    pub compartments: Vec<Compartment>,

    /// All species of the model, in document order.
    #[serde(default)]
    #[builder(default, setter(into, each(name = "to_species")))]
    pub species: Vec<Species>,

    /// All reactions of the model, in document order. `None` when the list is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub reactions: Option<Vec<Reaction>>,
}

impl SourceModel {
    /// Looks up a species by its identifier.
    pub fn get_species(&self, id: &str) -> Option<&Species> {
        self.species.iter().find(|species| species.id == id)
    }

    /// Looks up a compartment by its identifier.
    pub fn get_compartment(&self, id: &str) -> Option<&Compartment> {
        self.compartments
            .iter()
            .find(|compartment| compartment.id == id)
    }

    /// Returns the reactions of the model, or an empty slice if the list is absent.
    pub fn reactions(&self) -> &[Reaction] {
        self.reactions.as_deref().unwrap_or_default()
    }
}

/// A compartment, converted to a cellular location vocabulary term.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Default, PartialEq)]
pub struct Compartment {
    #[builder(setter(into))]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotation")))]
    pub annotation: Vec<AnnotationTerm>,
}

/// A species, converted to a physical entity.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Default, PartialEq)]
pub struct Species {
    /// SBML identifier of the species.
    #[builder(setter(into))]
    pub id: String,

    /// Display name. Complex names concatenate their member names with `:`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Numeric SBO term, e.g. `247` for `SBO:0000247`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub sbo_term: Option<u32>,

    /// Identifier of the owning compartment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub compartment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotation")))]
    pub annotation: Vec<AnnotationTerm>,
}

/// A reaction, converted to a conversion plus its participants and controls.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Default, PartialEq)]
pub struct Reaction {
    #[builder(setter(into))]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub sbo_term: Option<u32>,

    /// SBML defaults `reversible` to true when the attribute is absent.
    #[serde(default = "default_reversible")]
    #[builder(default = "true")]
    pub reversible: bool,

    /// Identifiers of the reactant species, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_reactants", into)))]
    pub reactants: Vec<String>,

    /// Identifiers of the product species, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_products", into)))]
    pub products: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_modifiers")))]
    pub modifiers: Vec<ModifierReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotation")))]
    pub annotation: Vec<AnnotationTerm>,
}

fn default_reversible() -> bool {
    true
}

/// A modifier species reference of a reaction.
///
/// SBML modifier references usually carry no identifier of their own.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Default, PartialEq)]
pub struct ModifierReference {
    /// Identifier of the referenced species.
    #[builder(setter(into))]
    pub species: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Role of the modifier as an SBO term, e.g. `20` for an inhibitor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub sbo_term: Option<u32>,
}

impl ModifierReference {
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            ..Default::default()
        }
    }
}

/// A controlled-vocabulary term: one qualifier and the resources it points to.
///
/// Resources are MIRIAM URNs (`urn:miriam:chebi:CHEBI%3A15589`) or identifiers.org URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AnnotationTerm {
    /// Qualifier element name, e.g. `is` or `isVersionOf`.
    pub qualifier: String,
    pub resources: Vec<String>,
}

impl AnnotationTerm {
    pub fn new<I, S>(qualifier: impl Into<String>, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            qualifier: qualifier.into(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }

    /// Shorthand for a `bqbiol:is` term, the usual identity annotation.
    pub fn is<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("is", resources)
    }

    /// Identity key of one resource of the term.
    ///
    /// The key depends on the qualifier and the resource only, so the same annotation
    /// yields the same key wherever it appears in the document. Cross-references are
    /// keyed by it.
    pub fn resource_key(&self, resource: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.qualifier.as_bytes());
        hasher.update([0u8]);
        hasher.update(resource.as_bytes());

        hasher
            .finalize()
            .iter()
            .take(8)
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}
