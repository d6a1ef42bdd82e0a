//! BioPAX Level 3 RDF/XML serialization.
//!
//! Every element of a [`BioPaxModel`] becomes one `bp:<Class>` node with an `rdf:about`
//! identifier. Links to other elements are written as `rdf:resource` properties, names,
//! comments and other values as `xsd:string` literals.

use std::{fs::File, io::Write, path::Path};

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use super::{
    error::WriteError,
    model::{BioPaxModel, Element, Names},
};

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const BIOPAX_NS: &str = "http://www.biopax.org/release/biopax-level3.owl#";

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Writes `model` as BioPAX Level 3 OWL to a file.
pub fn write_owl_file(model: &BioPaxModel, path: impl AsRef<Path>) -> Result<(), WriteError> {
    let file = File::create(path)?;
    write_owl(model, file)
}

/// Serializes `model` as BioPAX Level 3 OWL into a string.
pub fn to_owl_string(model: &BioPaxModel) -> Result<String, WriteError> {
    let mut buffer = Vec::new();
    write_owl(model, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Writes `model` as BioPAX Level 3 OWL.
pub fn write_owl<W: Write>(model: &BioPaxModel, output: W) -> Result<(), WriteError> {
    let mut writer = Writer::new_with_indent(output, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("rdf:RDF").with_attributes([
        ("xmlns:rdf", RDF_NS),
        ("xmlns:rdfs", RDFS_NS),
        ("xmlns:owl", OWL_NS),
        ("xmlns:xsd", XSD_NS),
        ("xmlns:bp", BIOPAX_NS),
    ]);
    if !model.xml_base.is_empty() {
        root.push_attribute(("xml:base", model.xml_base.as_str()));
    }
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(
        BytesStart::new("owl:Ontology").with_attributes([("rdf:about", "")]),
    ))?;
    writer
        .create_element("owl:imports")
        .with_attribute(("rdf:resource", BIOPAX_NS))
        .write_empty()?;
    writer.write_event(Event::End(BytesEnd::new("owl:Ontology")))?;

    for (uri, element) in model.iter() {
        write_element(&mut writer, uri, element)?;
    }

    writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
    writer.get_mut().flush()?;

    Ok(())
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    uri: &str,
    element: &Element,
) -> Result<(), WriteError> {
    let tag = format!("bp:{}", element.class_name());
    writer.write_event(Event::Start(
        BytesStart::new(tag.as_str()).with_attributes([("rdf:about", uri)]),
    ))?;

    if let Some(named) = element.as_named() {
        write_names(writer, named.names())?;
    }
    for comment in element.as_commented().comments() {
        write_literal(writer, "bp:comment", comment)?;
    }

    match element {
        Element::Xref(xref) => {
            write_literal(writer, "bp:db", &xref.db)?;
            write_literal(writer, "bp:id", &xref.id)?;
        }
        Element::CellularLocation(location) => {
            for term in &location.terms {
                write_literal(writer, "bp:term", term)?;
            }
        }
        Element::Conversion(conversion) => {
            write_literal(writer, "bp:conversionDirection", conversion.direction.as_str())?;
        }
        Element::Control(control) => {
            write_literal(writer, "bp:controlType", control.control_type.as_str())?;
        }
        _ => {}
    }

    for (property, target) in element.links() {
        // BioPAX only defines organism on sequence entity references and pathways
        if property == "organism"
            && matches!(element, Element::EntityReference(r) if !r.kind.is_sequence())
        {
            continue;
        }

        writer
            .create_element(format!("bp:{property}"))
            .with_attribute(("rdf:resource", target))
            .write_empty()?;
    }

    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

fn write_names<W: Write>(writer: &mut Writer<W>, names: &Names) -> Result<(), WriteError> {
    if let Some(display_name) = &names.display_name {
        write_literal(writer, "bp:displayName", display_name)?;
    }
    if let Some(standard_name) = &names.standard_name {
        write_literal(writer, "bp:standardName", standard_name)?;
    }
    for name in &names.name {
        write_literal(writer, "bp:name", name)?;
    }

    Ok(())
}

fn write_literal<W: Write>(
    writer: &mut Writer<W>,
    property: &str,
    value: &str,
) -> Result<(), WriteError> {
    writer
        .create_element(property)
        .with_attribute(("rdf:datatype", XSD_STRING))
        .write_text_content(BytesText::new(value))?;

    Ok(())
}
