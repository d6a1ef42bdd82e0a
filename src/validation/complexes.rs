use indexmap::IndexSet;
use itertools::Itertools;

use crate::biopax::model::{BioPaxModel, Named, PhysicalEntity};
use crate::convert::complexes::name_tokens;
use crate::validation::consistency::{location, Report, Severity, ValidationResult};

/// Checks that the components of every complex cover exactly the tokens of its name.
pub fn check_complexes(model: &BioPaxModel, report: &mut Report) {
    let complexes = model
        .objects::<PhysicalEntity>()
        .filter(|(_, entity)| entity.kind.is_complex());

    for (uri, complex) in complexes {
        let tokens = name_tokens(complex.display_name().unwrap_or_default());
        let components: IndexSet<String> = complex
            .components
            .iter()
            .filter_map(|c| model.get_as::<PhysicalEntity>(c))
            .filter_map(|c| c.display_name().map(str::to_string))
            .collect();

        let missing = tokens.difference(&components).collect_vec();
        if !missing.is_empty() {
            report.add_result(ValidationResult::new(
                location(uri, "component"),
                format!(
                    "Complex has no component for {}.",
                    missing.iter().map(|t| format!("'{t}'")).join(", ")
                ),
                Severity::Error,
                Some(uri.clone()),
            ));
        }

        let extra = components.difference(&tokens).collect_vec();
        if !extra.is_empty() {
            report.add_result(ValidationResult::new(
                location(uri, "component"),
                format!(
                    "Complex components {} do not appear in its name.",
                    extra.iter().map(|t| format!("'{t}'")).join(", ")
                ),
                Severity::Warning,
                Some(uri.clone()),
            ));
        }
    }
}
