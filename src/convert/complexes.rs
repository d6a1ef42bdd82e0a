//! Reconstruction of complex members.
//!
//! SBML models rarely list the members of a complex. By convention the complex name
//! joins the member names with `:` (`"HK1:GCK"`), and the complex may be annotated with
//! the same database entries as its members. [`NameTokenPolicy`] uses both hints: members
//! are first matched through shared cross-references, and the remaining name tokens are
//! turned into proteins identified by their gene symbol.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    biopax::model::{
        EntityReference, EntityReferenceKind, Named, Names, PhysicalEntity, PhysicalEntityKind,
        Xref, XrefKind,
    },
    convert::{entities::MISSING_NAME, error::ConvertError},
    registry::IdentityRegistry,
};

/// Database of the cross-references created for member name tokens.
pub const SYMBOL_DATABASE: &str = "hgnc.symbol";

/// Separator of member names in complex names.
pub const NAME_SEPARATOR: char = ':';

/// Characters of a name token that are escaped in identifiers.
const TOKEN_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Strategy filling in the components of the complexes of a converted model.
pub trait ComplexPolicy {
    fn fill_complexes(&self, registry: &mut IdentityRegistry) -> Result<(), ConvertError>;
}

/// Default policy: match members by cross-reference, then by name token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameTokenPolicy;

impl ComplexPolicy for NameTokenPolicy {
    fn fill_complexes(&self, registry: &mut IdentityRegistry) -> Result<(), ConvertError> {
        let index = protein_reference_index(registry);

        let complexes: Vec<String> = registry
            .model()
            .objects::<PhysicalEntity>()
            .filter(|(_, entity)| entity.kind.is_complex())
            .map(|(uri, _)| uri.clone())
            .collect();

        for complex in complexes {
            fill_complex(registry, &index, &complex)?;
        }

        Ok(())
    }
}

/// Splits a complex name into its member name tokens.
pub fn name_tokens(name: &str) -> IndexSet<String> {
    if name == MISSING_NAME {
        return IndexSet::new();
    }

    name.split(NAME_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps every `db:id` cross-reference of a protein reference to the references carrying it.
fn protein_reference_index(registry: &IdentityRegistry) -> HashMap<String, Vec<String>> {
    let mut index: HashMap<String, Vec<String>> = HashMap::new();

    for (uri, reference) in registry.model().objects::<EntityReference>() {
        if reference.kind != EntityReferenceKind::ProteinReference {
            continue;
        }

        for xref in reference.xrefs.iter().filter_map(|x| registry.get::<Xref>(x)) {
            let owners = index.entry(xref.to_string()).or_default();
            if !owners.contains(uri) {
                owners.push(uri.clone());
            }
        }
    }

    index
}

fn fill_complex(
    registry: &mut IdentityRegistry,
    index: &HashMap<String, Vec<String>>,
    complex: &str,
) -> Result<(), ConvertError> {
    let (mut tokens, xrefs, location) = match registry.get::<PhysicalEntity>(complex) {
        Some(entity) => (
            name_tokens(entity.display_name().unwrap_or(MISSING_NAME)),
            entity.xrefs.clone(),
            entity.cellular_location.clone(),
        ),
        None => return Err(ConvertError::MissingElement(complex.to_string())),
    };

    let complex_local = registry.local_id(complex).to_string();
    let mut components: Vec<String> = Vec::new();

    // Members sharing a cross-reference with the complex
    let matches: Vec<&String> = xrefs
        .iter()
        .filter_map(|x| registry.get::<Xref>(x))
        .filter_map(|xref| index.get(&xref.to_string()))
        .flatten()
        .collect();

    for reference in matches {
        let Some(names) = registry
            .get::<EntityReference>(reference)
            .map(|r| r.names().clone())
        else {
            continue;
        };

        let covers_token = names
            .display_name
            .as_ref()
            .is_some_and(|name| tokens.shift_remove(name));
        if !covers_token {
            continue;
        }

        let protein = registry.complete_id(&format!(
            "{complex_local}_{}",
            registry.local_id(reference)
        ));
        component(registry, &protein, names, reference, &location)?;
        components.push(protein);
    }

    // Remaining tokens become proteins identified by their symbol
    for token in tokens {
        let escaped = utf8_percent_encode(&token, TOKEN_ESCAPES).to_string();

        let xref = registry.complete_id(&format!("symbol_{escaped}"));
        registry.get_or_create(&xref, || {
            Xref::new(XrefKind::Relationship, SYMBOL_DATABASE, token.clone())
        })?;

        let reference = registry.complete_id(&format!("ref_protein_{escaped}"));
        registry.get_or_create(&reference, || {
            EntityReference::new(EntityReferenceKind::ProteinReference, Names::all(&token))
        })?;
        registry.add_xref(&reference, &xref)?;

        let protein = registry.complete_id(&format!("{complex_local}_protein_{escaped}"));
        component(registry, &protein, Names::all(&token), &reference, &location)?;
        components.push(protein);
    }

    debug!(
        "Complex '{complex}' has {} reconstructed components",
        components.len()
    );

    if let Some(entity) = registry.get_mut::<PhysicalEntity>(complex) {
        entity.components.extend(components);
    }

    Ok(())
}

/// Creates a member protein of a complex, placed in the complex's location.
fn component(
    registry: &mut IdentityRegistry,
    uri: &str,
    names: Names,
    reference: &str,
    location: &Option<String>,
) -> Result<(), ConvertError> {
    let protein = registry.get_or_create(uri, || {
        PhysicalEntity::new(PhysicalEntityKind::Protein, names)
    })?;
    protein.entity_reference = Some(reference.to_string());
    protein.cellular_location = location.clone();

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn complex(registry: &mut IdentityRegistry, id: &str, name: &str, xrefs: &[&str]) {
        let mut entity = PhysicalEntity::new(PhysicalEntityKind::Complex, Names::all(name));
        entity.cellular_location = Some("cytosol".to_string());
        registry.create_new(id, entity).unwrap();
        for xref in xrefs {
            registry.add_xref(id, xref).unwrap();
        }
    }

    fn component_names(registry: &IdentityRegistry, complex: &str) -> Vec<String> {
        let entity = registry.get::<PhysicalEntity>(complex).unwrap();
        entity
            .components
            .iter()
            .map(|c| {
                registry
                    .get::<PhysicalEntity>(c)
                    .unwrap()
                    .display_name()
                    .unwrap()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_name_tokens() {
        let tokens: Vec<String> = name_tokens("A: B::C:A").into_iter().collect();
        assert_eq!(tokens, vec!["A", "B", "C"]);
        assert!(name_tokens(MISSING_NAME).is_empty());
    }

    #[test]
    fn test_tokens_become_symbol_proteins() {
        let mut registry = IdentityRegistry::new("");
        complex(&mut registry, "c1", "A:B:C", &[]);

        NameTokenPolicy.fill_complexes(&mut registry).unwrap();

        assert_eq!(component_names(&registry, "c1"), vec!["A", "B", "C"]);

        let protein = registry.get::<PhysicalEntity>("c1_protein_A").unwrap();
        assert_eq!(protein.entity_reference.as_deref(), Some("ref_protein_A"));
        assert_eq!(protein.cellular_location.as_deref(), Some("cytosol"));

        let symbol = registry.get::<Xref>("symbol_A").unwrap();
        assert_eq!(symbol.db, SYMBOL_DATABASE);
        assert_eq!(symbol.id, "A");
    }

    #[test]
    fn test_symbol_reference_shared_between_complexes() {
        let mut registry = IdentityRegistry::new("");
        complex(&mut registry, "c1", "A:B", &[]);
        complex(&mut registry, "c2", "B:C", &[]);

        NameTokenPolicy.fill_complexes(&mut registry).unwrap();

        let first = registry.get::<PhysicalEntity>("c1_protein_B").unwrap();
        let second = registry.get::<PhysicalEntity>("c2_protein_B").unwrap();
        assert_eq!(first.entity_reference, second.entity_reference);
        assert_eq!(registry.xref_owners("symbol_B").count(), 1);
    }

    #[test]
    fn test_xref_match_reuses_reference() {
        let mut registry = IdentityRegistry::new("");
        registry
            .create_new("x_unif", Xref::new(XrefKind::Unification, "uniprot", "P1"))
            .unwrap();
        registry
            .create_new("x_rel", Xref::new(XrefKind::Relationship, "uniprot", "P1"))
            .unwrap();
        registry
            .create_new(
                "ref_s1",
                EntityReference::new(EntityReferenceKind::ProteinReference, Names::all("X")),
            )
            .unwrap();
        registry.add_xref("ref_s1", "x_unif").unwrap();
        complex(&mut registry, "c1", "X:Y", &["x_rel"]);

        NameTokenPolicy.fill_complexes(&mut registry).unwrap();

        assert_eq!(component_names(&registry, "c1"), vec!["X", "Y"]);
        let member = registry.get::<PhysicalEntity>("c1_ref_s1").unwrap();
        assert_eq!(member.entity_reference.as_deref(), Some("ref_s1"));
        assert!(!registry.contains("ref_protein_X"));
    }

    #[test]
    fn test_xref_match_must_cover_a_token() {
        let mut registry = IdentityRegistry::new("");
        registry
            .create_new("x", Xref::new(XrefKind::Unification, "uniprot", "P1"))
            .unwrap();
        registry
            .create_new(
                "ref_s1",
                EntityReference::new(EntityReferenceKind::ProteinReference, Names::all("Z")),
            )
            .unwrap();
        registry.add_xref("ref_s1", "x").unwrap();
        complex(&mut registry, "c1", "X:Y", &["x"]);

        NameTokenPolicy.fill_complexes(&mut registry).unwrap();

        assert_eq!(component_names(&registry, "c1"), vec!["X", "Y"]);
    }

    #[test]
    fn test_token_escaping() {
        let mut registry = IdentityRegistry::new("http://example.org/#");
        complex(&mut registry, "http://example.org/#c1", "p53 (human)", &[]);

        NameTokenPolicy.fill_complexes(&mut registry).unwrap();

        assert!(registry.contains("http://example.org/#ref_protein_p53%20%28human%29"));
        assert!(registry.contains("http://example.org/#c1_protein_p53%20%28human%29"));
    }
}
