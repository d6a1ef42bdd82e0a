//! SBML Document Reader
//!
//! This module reads SBML Level 2/3 documents into a [`SourceModel`]. Only the elements
//! found in metabolic-pathway models are extracted:
//!
//! - **Model**: identifier, name, notes and CV-term annotations
//! - **Compartments** → [`Compartment`]
//! - **Species** → [`Species`] (with `sboTerm`, owning compartment, notes, annotations)
//! - **Reactions** → [`Reaction`] (reactant, product and modifier species references)
//!
//! Everything else (kinetic laws, units, rules, events, ...) is skipped.
//!
//! ## Annotations
//!
//! CV terms are read from the RDF block inside `<annotation>`:
//!
//! ```xml
//! <rdf:Description rdf:about="#meta_s1">
//!   <bqbiol:is>
//!     <rdf:Bag>
//!       <rdf:li rdf:resource="urn:miriam:chebi:CHEBI%3A15589"/>
//!     </rdf:Bag>
//!   </bqbiol:is>
//! </rdf:Description>
//! ```
//!
//! Each qualifier element becomes one [`AnnotationTerm`] holding the resources of its bag.
//!
//! ## Notes
//!
//! Notes are kept as raw inner XML. Turning them into a plain-text comment is left to
//! the converter, which tolerates malformed markup.

use std::{collections::HashMap, path::Path};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::sbml::{
    error::SBMLError,
    model::{AnnotationTerm, Compartment, ModifierReference, Reaction, SourceModel, Species},
};

/// Namespace prefixes used for MIRIAM qualifiers.
const QUALIFIER_PREFIXES: [&[u8]; 2] = [b"bqbiol", b"bqmodel"];

/// Reads an SBML file from disk.
///
/// # Arguments
/// * `path` - Path to the SBML file
///
/// # Returns
/// * `Result<SourceModel, SBMLError>` - The parsed model or a read/parse error
pub fn read_sbml_file(path: impl AsRef<Path>) -> Result<SourceModel, SBMLError> {
    let bytes = std::fs::read(path)?;
    let xml = String::from_utf8(bytes)?;
    read_sbml_str(&xml)
}

/// Parses an SBML document from a string.
///
/// # Errors
/// Returns `SBMLError::MissingModel` if the document has no `<model>` element, and an
/// XML error if the document is not well-formed.
pub fn read_sbml_str(xml: &str) -> Result<SourceModel, SBMLError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"model" => {
                return read_model(&mut reader, &e);
            }
            Event::Empty(e) if e.local_name().as_ref() == b"model" => {
                return Ok(SourceModel {
                    id: model_id(&attributes(&e)?),
                    ..Default::default()
                });
            }
            Event::Eof => return Err(SBMLError::MissingModel),
            _ => {}
        }
    }
}

fn read_model<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
) -> Result<SourceModel, SBMLError> {
    let attrs = attributes(start)?;
    let mut model = SourceModel {
        id: model_id(&attrs),
        name: attrs.get("name").cloned(),
        ..Default::default()
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"notes" => model.notes = Some(reader.read_text(e.name())?.into_owned()),
                b"annotation" => model.annotation = read_annotation(reader)?,
                b"listOfCompartments" => {
                    model.compartments = read_list(reader, b"compartment", read_compartment)?
                }
                b"listOfSpecies" => model.species = read_list(reader, b"species", read_species)?,
                b"listOfReactions" => {
                    model.reactions = Some(read_list(reader, b"reaction", read_reaction)?)
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if e.local_name().as_ref() == b"listOfReactions" => {
                model.reactions = Some(Vec::new());
            }
            Event::End(e) if e.local_name().as_ref() == b"model" => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(model)
}

/// Reads the items of a `listOf*` element, dispatching each `item` element to `read_item`.
///
/// The boolean passed to `read_item` tells whether the element was self-closing.
fn read_list<'a, T, F>(
    reader: &mut Reader<&'a [u8]>,
    item: &[u8],
    mut read_item: F,
) -> Result<Vec<T>, SBMLError>
where
    F: FnMut(&mut Reader<&'a [u8]>, &BytesStart<'a>, bool) -> Result<T, SBMLError>,
{
    let mut items = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == item => {
                items.push(read_item(reader, &e, false)?)
            }
            Event::Empty(e) if e.local_name().as_ref() == item => {
                items.push(read_item(reader, &e, true)?)
            }
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

fn read_compartment<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<Compartment, SBMLError> {
    let attrs = attributes(start)?;
    let mut compartment = Compartment {
        id: required(&attrs, "compartment", "id")?,
        name: attrs.get("name").cloned(),
        annotation: Vec::new(),
    };

    if !empty {
        let children = read_common_children(reader, start)?;
        compartment.annotation = children.annotation;
    }

    Ok(compartment)
}

fn read_species<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<Species, SBMLError> {
    let attrs = attributes(start)?;
    let mut species = Species {
        id: required(&attrs, "species", "id")?,
        name: attrs.get("name").cloned(),
        sbo_term: attrs.get("sboTerm").map(|term| parse_sbo_term(term)).transpose()?,
        compartment: attrs.get("compartment").cloned(),
        ..Default::default()
    };

    if !empty {
        let children = read_common_children(reader, start)?;
        species.notes = children.notes;
        species.annotation = children.annotation;
    }

    Ok(species)
}

fn read_reaction<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<Reaction, SBMLError> {
    let attrs = attributes(start)?;
    let mut reaction = Reaction {
        id: required(&attrs, "reaction", "id")?,
        name: attrs.get("name").cloned(),
        sbo_term: attrs.get("sboTerm").map(|term| parse_sbo_term(term)).transpose()?,
        reversible: attrs
            .get("reversible")
            .map(|value| parse_bool(value))
            .unwrap_or(true),
        ..Default::default()
    };

    if empty {
        return Ok(reaction);
    }

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"notes" => reaction.notes = Some(reader.read_text(e.name())?.into_owned()),
                b"annotation" => reaction.annotation = read_annotation(reader)?,
                b"listOfReactants" => {
                    reaction.reactants = read_list(reader, b"speciesReference", read_species_ref)?
                }
                b"listOfProducts" => {
                    reaction.products = read_list(reader, b"speciesReference", read_species_ref)?
                }
                b"listOfModifiers" => {
                    reaction.modifiers =
                        read_list(reader, b"modifierSpeciesReference", read_modifier_ref)?
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(reaction)
}

fn read_species_ref<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<String, SBMLError> {
    let attrs = attributes(start)?;
    if !empty {
        reader.read_to_end(start.name())?;
    }
    required(&attrs, "speciesReference", "species")
}

fn read_modifier_ref<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
    empty: bool,
) -> Result<ModifierReference, SBMLError> {
    let attrs = attributes(start)?;
    if !empty {
        reader.read_to_end(start.name())?;
    }

    Ok(ModifierReference {
        species: required(&attrs, "modifierSpeciesReference", "species")?,
        name: attrs.get("name").cloned(),
        sbo_term: attrs.get("sboTerm").map(|term| parse_sbo_term(term)).transpose()?,
    })
}

/// Notes and annotation shared by every SBase element.
#[derive(Default)]
struct CommonChildren {
    notes: Option<String>,
    annotation: Vec<AnnotationTerm>,
}

fn read_common_children<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'a>,
) -> Result<CommonChildren, SBMLError> {
    let mut children = CommonChildren::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"notes" => children.notes = Some(reader.read_text(e.name())?.into_owned()),
                b"annotation" => children.annotation = read_annotation(reader)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name() == start.name() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(children)
}

/// Collects the CV terms of an `<annotation>` element. The reader must be positioned
/// right after the annotation's start tag; it is left after the matching end tag.
fn read_annotation(reader: &mut Reader<&[u8]>) -> Result<Vec<AnnotationTerm>, SBMLError> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut in_description = false;
    let mut current: Option<AnnotationTerm> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let local = e.local_name();
                match local.as_ref() {
                    b"Description" => in_description = true,
                    b"li" => push_resource(&mut current, &e)?,
                    name if in_description && current.is_none() && is_qualifier(&e) => {
                        current = Some(AnnotationTerm::new(
                            String::from_utf8_lossy(name).into_owned(),
                            Vec::<String>::new(),
                        ));
                    }
                    _ => {}
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == b"li" => {
                push_resource(&mut current, &e)?;
            }
            Event::End(e) => {
                if depth == 0 {
                    // End of </annotation>
                    break;
                }
                depth -= 1;

                let local = e.local_name();
                match local.as_ref() {
                    b"Description" => in_description = false,
                    name => {
                        let closes_term = current
                            .as_ref()
                            .is_some_and(|term| term.qualifier.as_bytes() == name);
                        if closes_term {
                            if let Some(term) = current.take() {
                                if !term.resources.is_empty() {
                                    terms.push(term);
                                }
                            }
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(terms)
}

fn is_qualifier(e: &BytesStart) -> bool {
    e.name()
        .prefix()
        .is_some_and(|prefix| QUALIFIER_PREFIXES.contains(&prefix.as_ref()))
}

fn push_resource(current: &mut Option<AnnotationTerm>, e: &BytesStart) -> Result<(), SBMLError> {
    if let Some(term) = current.as_mut() {
        if let Some(resource) = attributes(e)?.remove("resource") {
            term.resources.push(resource);
        }
    }
    Ok(())
}

/// Collects the attributes of an element, keyed by local name (prefixes are dropped).
fn attributes(e: &BytesStart) -> Result<HashMap<String, String>, SBMLError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn required(
    attrs: &HashMap<String, String>,
    element: &str,
    attribute: &str,
) -> Result<String, SBMLError> {
    attrs
        .get(attribute)
        .cloned()
        .ok_or_else(|| SBMLError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
}

/// SBML Level 3 makes the model id optional; fall back to the metaid.
fn model_id(attrs: &HashMap<String, String>) -> String {
    attrs
        .get("id")
        .or_else(|| attrs.get("metaid"))
        .cloned()
        .unwrap_or_else(|| "model".to_string())
}

/// Parses `SBO:0000247` (or a bare `247`) into its numeric code.
pub(crate) fn parse_sbo_term(term: &str) -> Result<u32, SBMLError> {
    let digits = term.trim().strip_prefix("SBO:").unwrap_or(term.trim());
    digits
        .parse::<u32>()
        .map_err(|_| SBMLError::InvalidSBOTerm(term.to_string()))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}
