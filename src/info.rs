//! Human-readable summaries of converted models.
//!
//! [`ConversionSummary`] counts the elements of a [`BioPaxModel`] per BioPAX class and
//! lists its conversions and complexes. Its `Display` implementation renders everything as
//! nested tables, which is what the `inspect` command prints.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::biopax::model::{BioPaxModel, Conversion, Named, PhysicalEntity};

/// Trait for converting summary rows to table records
trait TableRecord {
    /// Get the column headers for the table
    fn columns() -> Vec<String>;

    /// Convert the instance to a record for display in a table
    fn to_record(&self) -> Vec<String>;
}

/// Element counts and overview rows of a converted model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    /// Number of elements per BioPAX class, in order of first appearance.
    pub counts: IndexMap<&'static str, usize>,
    pub conversions: Vec<ConversionRow>,
    pub complexes: Vec<ComplexRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRow {
    pub id: String,
    pub name: String,
    pub class: &'static str,
    pub direction: &'static str,
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexRow {
    pub id: String,
    pub name: String,
    pub components: Vec<String>,
}

impl ConversionSummary {
    pub fn new(model: &BioPaxModel) -> Self {
        let mut counts: IndexMap<&'static str, usize> = IndexMap::new();
        for (_, element) in model.iter() {
            *counts.entry(element.class_name()).or_default() += 1;
        }

        let conversions = model
            .iter()
            .filter_map(|(uri, element)| {
                let conversion: &Conversion = element.conversion_ref()?;
                Some(ConversionRow {
                    id: uri.clone(),
                    name: display_name(conversion),
                    class: element.class_name(),
                    direction: conversion.direction.as_str(),
                    left: conversion.left.len(),
                    right: conversion.right.len(),
                })
            })
            .collect();

        let complexes = model
            .objects::<PhysicalEntity>()
            .filter(|(_, entity)| entity.kind.is_complex())
            .map(|(uri, complex)| ComplexRow {
                id: uri.clone(),
                name: display_name(complex),
                components: complex
                    .components
                    .iter()
                    .filter_map(|c| model.get_as::<PhysicalEntity>(c))
                    .map(display_name)
                    .collect(),
            })
            .collect();

        Self {
            counts,
            conversions,
            complexes,
        }
    }

    /// Number of elements of the given BioPAX class.
    pub fn count(&self, class: &str) -> usize {
        self.counts.get(class).copied().unwrap_or(0)
    }
}

impl From<&BioPaxModel> for ConversionSummary {
    fn from(model: &BioPaxModel) -> Self {
        Self::new(model)
    }
}

impl Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(vec!["BioPAX Model"]);

        let mut counts = Builder::default();
        counts.push_record(vec!["Class", "Count"]);
        for (class, count) in &self.counts {
            counts.push_record(vec![class.to_string(), count.to_string()]);
        }
        let mut counts = counts.build();
        counts.with(Style::rounded());

        builder.push_record(vec!["Elements"]);
        builder.push_record(vec![counts.to_string()]);

        if !self.conversions.is_empty() {
            builder.push_record(vec!["Conversions"]);
            builder.push_record(vec![to_table(&self.conversions)]);
        }

        if !self.complexes.is_empty() {
            builder.push_record(vec!["Complexes"]);
            builder.push_record(vec![to_table(&self.complexes)]);
        }

        let mut table = builder.build();
        table.with(Style::sharp());
        write!(f, "{table}")
    }
}

impl Display for BioPaxModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ConversionSummary::new(self))
    }
}

fn to_table<T: TableRecord>(records: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::columns());

    for record in records {
        builder.push_record(record.to_record());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn display_name(named: &impl Named) -> String {
    named.display_name().unwrap_or_default().to_string()
}

impl TableRecord for ConversionRow {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Class".to_string(),
            "Direction".to_string(),
            "Left".to_string(),
            "Right".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.class.to_string(),
            self.direction.to_string(),
            self.left.to_string(),
            self.right.to_string(),
        ]
    }
}

impl TableRecord for ComplexRow {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Components".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.components.iter().join(", "),
        ]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        biopax::model::{ConversionKind, Names, PhysicalEntityKind},
        registry::IdentityRegistry,
    };

    fn model() -> BioPaxModel {
        let mut registry = IdentityRegistry::new("");
        registry
            .create_new(
                "a",
                PhysicalEntity::new(PhysicalEntityKind::Protein, Names::all("A")),
            )
            .unwrap();

        let mut complex = PhysicalEntity::new(PhysicalEntityKind::Complex, Names::all("A:B"));
        complex.components.insert("a".to_string());
        registry.create_new("c", complex).unwrap();

        let mut conversion = Conversion::new(ConversionKind::Transport, Names::all("T"));
        conversion.left.insert("c".to_string());
        registry.create_new("r", conversion).unwrap();

        registry.into_model()
    }

    #[test]
    fn test_summary_counts() {
        let summary = ConversionSummary::new(&model());

        assert_eq!(summary.count("Protein"), 1);
        assert_eq!(summary.count("Complex"), 1);
        assert_eq!(summary.count("Transport"), 1);
        assert_eq!(summary.count("Pathway"), 0);
        assert_eq!(summary.complexes[0].components, vec!["A".to_string()]);
        assert_eq!(summary.conversions[0].left, 1);
    }

    #[test]
    fn test_summary_display() {
        let rendered = model().to_string();

        assert!(rendered.contains("BioPAX Model"));
        assert!(rendered.contains("Transport"));
        assert!(rendered.contains("LEFT-TO-RIGHT"));
    }
}
