use std::collections::HashSet;

use crate::biopax::model::{BioPaxModel, Element, PhysicalEntityKind};
use crate::validation::consistency::{location, Report, Severity, ValidationResult};

/// Element families a link property may point to.
fn expected_families(property: &str) -> &'static [&'static str] {
    match property {
        "xref" => &["Xref"],
        "cellularLocation" => &["CellularLocation"],
        "entityReference" => &["EntityReference"],
        "component" | "left" | "right" | "controller" => &["PhysicalEntity"],
        "controlled" => &["Conversion"],
        "dataSource" => &["Provenance"],
        "organism" => &["BioSource"],
        "pathwayComponent" => &["Conversion", "Control", "Pathway"],
        _ => &[],
    }
}

/// Checks that every link of every element points to an existing element of the
/// expected family.
pub fn check_links(model: &BioPaxModel, report: &mut Report) {
    for (uri, element) in model.iter() {
        for (property, target) in element.links() {
            let Some(linked) = model.get(target) else {
                report.add_result(ValidationResult::new(
                    location(uri, property),
                    format!("'{property}' refers to unknown element '{target}'."),
                    Severity::Error,
                    Some(uri.clone()),
                ));
                continue;
            };

            let expected = expected_families(property);
            if !expected.contains(&linked.family()) {
                report.add_result(ValidationResult::new(
                    location(uri, property),
                    format!(
                        "'{property}' refers to {} '{target}', expected {}.",
                        linked.class_name(),
                        expected.join(" or ")
                    ),
                    Severity::Error,
                    Some(uri.clone()),
                ));
            }
        }

        match element {
            Element::PhysicalEntity(entity) => check_reference_kind(
                model,
                uri,
                entity.kind,
                entity.entity_reference.as_deref(),
                report,
            ),
            Element::Control(control)
                if control.controller.is_none() || control.controlled.is_none() =>
            {
                report.add_result(ValidationResult::new(
                    location(uri, "controller"),
                    "Control is missing its controller or controlled interaction.".to_string(),
                    Severity::Warning,
                    Some(uri.clone()),
                ));
            }
            _ => {}
        }
    }
}

/// Checks that proteins point to protein references and small molecules to small
/// molecule references.
fn check_reference_kind(
    model: &BioPaxModel,
    uri: &str,
    kind: PhysicalEntityKind,
    reference: Option<&str>,
    report: &mut Report,
) {
    let Some(reference) = reference
        .and_then(|r| model.get(r))
        .and_then(Element::entity_reference_ref)
    else {
        return;
    };

    if kind.reference_kind() != Some(reference.kind) {
        report.add_result(ValidationResult::new(
            location(uri, "entityReference"),
            format!("{kind:?} refers to an entity reference of kind {:?}.", reference.kind),
            Severity::Error,
            Some(uri.to_string()),
        ));
    }
}

/// Checks that every cross-reference is carried by at least one element.
pub fn check_orphan_xrefs(model: &BioPaxModel, report: &mut Report) {
    let referenced: HashSet<&str> = model
        .iter()
        .flat_map(|(_, element)| element.links())
        .filter(|(property, _)| *property == "xref")
        .map(|(_, target)| target)
        .collect();

    for (uri, element) in model.iter() {
        if matches!(element, Element::Xref(_)) && !referenced.contains(uri.as_str()) {
            report.add_result(ValidationResult::new(
                location(uri, "xrefOf"),
                format!("Cross-reference '{uri}' is not attached to any element."),
                Severity::Error,
                Some(uri.clone()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biopax::model::{
        Control, ControlType, EntityReference, EntityReferenceKind, Names, PhysicalEntity, Xref,
        XrefKind,
    };
    use crate::registry::IdentityRegistry;

    #[test]
    fn test_dangling_link() {
        let mut registry = IdentityRegistry::new("");
        let mut entity = PhysicalEntity::new(PhysicalEntityKind::Protein, Names::all("A"));
        entity.cellular_location = Some("nowhere".to_string());
        registry.create_new("a", entity).unwrap();

        let mut report = Report::new();
        check_links(registry.model(), &mut report);

        assert!(!report.is_valid);
        assert_eq!(report.errors[0].location(), "/elements/a/cellularLocation");
    }

    #[test]
    fn test_wrong_reference_kind() {
        let mut registry = IdentityRegistry::new("");
        registry
            .create_new(
                "ref",
                EntityReference::new(EntityReferenceKind::SmallMoleculeReference, Names::all("A")),
            )
            .unwrap();
        let mut entity = PhysicalEntity::new(PhysicalEntityKind::Protein, Names::all("A"));
        entity.entity_reference = Some("ref".to_string());
        registry.create_new("a", entity).unwrap();

        let mut report = Report::new();
        check_links(registry.model(), &mut report);

        assert_eq!(report.errors.len(), 1);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_unwired_control_is_a_warning() {
        let mut registry = IdentityRegistry::new("");
        registry
            .create_new("c", Control::new(ControlType::Activation, Names::all("c")))
            .unwrap();

        let mut report = Report::new();
        check_links(registry.model(), &mut report);

        assert!(report.is_valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_orphan_xref() {
        let mut registry = IdentityRegistry::new("");
        registry
            .create_new("x", Xref::new(XrefKind::Unification, "chebi", "CHEBI:1"))
            .unwrap();

        let mut report = Report::new();
        check_orphan_xrefs(registry.model(), &mut report);

        assert!(!report.is_valid);
        assert_eq!(report.filter_results("x").len(), 1);
    }
}
