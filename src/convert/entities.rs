//! Conversion of single SBML elements into BioPAX elements.
//!
//! Every function returns the identifier of the converted element. Elements are created
//! through the [`IdentityRegistry`], so converting the same SBML element twice returns the
//! existing BioPAX element. Names and comments are only set on creation.

use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, warn};
use quick_xml::{escape::resolve_predefined_entity, events::Event, Reader};

use crate::{
    biopax::model::{
        CellularLocation, Control, Conversion, ConversionDirection, EntityReference,
        EntityReferenceKind, Names, PhysicalEntity, Xref, XrefKind,
    },
    convert::{
        error::ConvertError,
        ontology::{classify_modifier, classify_reaction, classify_species},
        xrefs::{attach_xrefs, prune_orphans, resolve_xrefs},
    },
    registry::IdentityRegistry,
    sbml::model::{Compartment, ModifierReference, Reaction, SourceModel, Species},
};

/// Name used for elements without a usable name.
pub const MISSING_NAME: &str = "N/A";

/// Converts a species into a `Protein`, `SmallMolecule` or `Complex`.
///
/// Proteins and small molecules share their entity reference with every species that
/// carries one of the same unification cross-references. Complex members are filled in
/// later by the complex reconstruction.
pub fn convert_species(
    registry: &mut IdentityRegistry,
    source: &SourceModel,
    species: &Species,
) -> Result<String, ConvertError> {
    let uri = registry.complete_id(&species.id);
    if registry.find::<PhysicalEntity>(&uri)?.is_some() {
        return Ok(uri);
    }

    let location = match &species.compartment {
        Some(compartment_id) => {
            let compartment = source.get_compartment(compartment_id).ok_or_else(|| {
                ConvertError::UnknownCompartment {
                    species: species.id.clone(),
                    compartment: compartment_id.clone(),
                }
            })?;
            Some(convert_compartment(registry, compartment)?)
        }
        None => None,
    };

    let kind = classify_species(species.sbo_term);
    let names = element_names(species.name.as_deref());

    let reference = match kind.reference_kind() {
        Some(reference_kind) => {
            let xrefs = resolve_xrefs(registry, &species.annotation, XrefKind::Unification)?;
            let reference =
                resolve_reference(registry, &species.id, reference_kind, &names, &xrefs)?;
            prune_orphans(registry, &xrefs);
            Some(reference)
        }
        None => None,
    };

    let mut entity = PhysicalEntity::new(kind, names);
    entity.comments.extend(species.notes.as_deref().and_then(notes_to_comment));
    entity.cellular_location = location;
    entity.entity_reference = reference;
    registry.create_new(&uri, entity)?;

    if kind.is_complex() {
        attach_xrefs(registry, &uri, &species.annotation, XrefKind::Relationship)?;
    }

    debug!("Converted species '{}' to {:?}", species.id, kind);
    Ok(uri)
}

/// Finds the entity reference for a species by its unification cross-references, or
/// creates `ref_<species-id>` carrying them.
fn resolve_reference(
    registry: &mut IdentityRegistry,
    species_id: &str,
    kind: EntityReferenceKind,
    names: &Names,
    xrefs: &[String],
) -> Result<String, ConvertError> {
    // Only unification cross-references identify a molecule
    let candidates: IndexSet<String> = xrefs
        .iter()
        .filter(|xref| {
            registry
                .get::<Xref>(xref)
                .is_some_and(|x| x.kind == XrefKind::Unification)
        })
        .flat_map(|xref| registry.xref_owners(xref))
        .filter(|owner| {
            registry
                .get::<EntityReference>(owner)
                .is_some_and(|reference| reference.kind == kind)
        })
        .map(str::to_string)
        .collect();

    match candidates.len() {
        0 => {
            let uri = registry.complete_id(&format!("ref_{species_id}"));
            registry.get_or_create(&uri, || EntityReference::new(kind, names.clone()))?;
            for xref in xrefs {
                registry.add_xref(&uri, xref)?;
            }
            Ok(uri)
        }
        1 => Ok(candidates[0].clone()),
        _ => {
            warn!(
                "Species '{species_id}' matches {} entity references ({}), using the first",
                candidates.len(),
                candidates.iter().join(", ")
            );
            Ok(candidates[0].clone())
        }
    }
}

/// Converts a compartment into a cellular location vocabulary term.
pub fn convert_compartment(
    registry: &mut IdentityRegistry,
    compartment: &Compartment,
) -> Result<String, ConvertError> {
    let uri = registry.complete_id(&compartment.id);
    let term = compartment
        .name
        .clone()
        .unwrap_or_else(|| compartment.id.clone());

    registry.get_or_create(&uri, || CellularLocation {
        terms: IndexSet::from([term]),
        ..Default::default()
    })?;
    attach_xrefs(registry, &uri, &compartment.annotation, XrefKind::Unification)?;

    Ok(uri)
}

/// Converts a reaction into a `BiochemicalReaction` or `Transport` without participants.
pub fn convert_reaction(
    registry: &mut IdentityRegistry,
    reaction: &Reaction,
) -> Result<String, ConvertError> {
    let uri = registry.complete_id(&reaction.id);

    registry.get_or_create(&uri, || {
        let mut conversion = Conversion::new(
            classify_reaction(reaction.sbo_term),
            element_names(reaction.name.as_deref()),
        );
        conversion.direction = if reaction.reversible {
            ConversionDirection::Reversible
        } else {
            ConversionDirection::LeftToRight
        };
        conversion
            .comments
            .extend(reaction.notes.as_deref().and_then(notes_to_comment));
        conversion
    })?;
    attach_xrefs(registry, &uri, &reaction.annotation, XrefKind::Relationship)?;

    Ok(uri)
}

/// Converts a modifier of `reaction` into an unwired control.
///
/// The identifier is `control_<reaction>_<species>_<role>`, with the role being
/// `sbo<code>` or `modifier` if the modifier has no SBO term.
pub fn convert_modifier(
    registry: &mut IdentityRegistry,
    reaction: &Reaction,
    modifier: &ModifierReference,
) -> Result<String, ConvertError> {
    let role = modifier
        .sbo_term
        .map(|code| format!("sbo{code}"))
        .unwrap_or_else(|| "modifier".to_string());
    let uri = registry.complete_id(&format!(
        "control_{}_{}_{}",
        reaction.id, modifier.species, role
    ));

    registry.get_or_create(&uri, || {
        Control::new(
            classify_modifier(modifier.sbo_term),
            element_names(modifier.name.as_deref()),
        )
    })?;

    Ok(uri)
}

/// Names of a converted element. Missing, blank or `null` names become `N/A`.
pub fn element_names(name: Option<&str>) -> Names {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() && !name.eq_ignore_ascii_case("null") => Names::all(name),
        _ => Names::all(MISSING_NAME),
    }
}

/// Strips the markup from SBML notes.
///
/// Returns `None` for empty notes. Notes that are not well-formed are logged and dropped.
pub fn notes_to_comment(notes: &str) -> Option<String> {
    match strip_markup(notes) {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!("Failed to parse notes, omitting comment: {e}");
            None
        }
    }
}

fn strip_markup(notes: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(notes);
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&e.decode()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref()? {
                    text.push(ch);
                } else if let Some(entity) = resolve_predefined_entity(&e.decode()?) {
                    text.push_str(entity);
                }
            }
            Event::Start(_) | Event::End(_) | Event::Empty(_) => text.push(' '),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text.split_whitespace().join(" "))
}
