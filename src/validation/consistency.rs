//! Consistency checks for converted BioPAX models.
//!
//! [`check_consistency`] runs every check on a [`BioPaxModel`]:
//! - links point to existing elements of the expected family
//! - every cross-reference is carried by some element
//! - complex components match the tokens of the complex name
//!
//! Errors make the model inconsistent; warnings only point at suspicious content.

use std::fmt;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::biopax::model::BioPaxModel;
use crate::validation::complexes::check_complexes;
use crate::validation::links::{check_links, check_orphan_xrefs};

/// Runs all consistency checks on `model`.
///
/// Link targets, orphaned cross-references and complex components are checked in
/// that order. Every finding is collected, the checks never stop early.
///
/// # Arguments
///
/// * `model` - The converted BioPAX model to check
///
/// # Returns
///
/// A [`Report`] holding every finding. `is_valid` is false if at least one finding
/// is an error.
pub fn check_consistency(model: &BioPaxModel) -> Report {
    let mut report = Report::new();

    check_links(model, &mut report);
    check_orphan_xrefs(model, &mut report);
    check_complexes(model, &mut report);

    report
}

/// Findings of the consistency checks.
///
/// `is_valid` turns false as soon as one finding has [`Severity::Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub is_valid: bool,
    pub errors: Vec<ValidationResult>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: ValidationResult) {
        if result.severity == Severity::Error {
            self.is_valid = false;
        }
        self.errors.push(result);
    }

    /// Findings concerning the element `identifier`.
    pub fn filter_results(&self, identifier: &str) -> Vec<ValidationResult> {
        self.errors
            .iter()
            .filter(|result| result.identifier.as_deref() == Some(identifier))
            .cloned()
            .collect()
    }
}

/// A single finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `/elements/<uri>/<property>`
    location: String,
    message: String,
    severity: Severity,
    /// URI of the element the finding is about
    identifier: Option<String>,
}

impl ValidationResult {
    pub fn new(
        location: String,
        message: String,
        severity: Severity,
        identifier: Option<String>,
    ) -> Self {
        Self {
            location,
            message,
            severity,
            identifier,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (severity, message) = match self.severity {
            Severity::Error => ("Error".bold().red(), self.message.red()),
            Severity::Warning => ("Warning".bold().yellow(), self.message.yellow()),
        };

        write!(
            f,
            "[{}] {}:\n\t└── {}",
            self.location.bold(),
            severity,
            message
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// The model is inconsistent and should not be written
    Error,
    /// The model is consistent but looks suspicious
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// Location path of an element property.
pub(crate) fn location(uri: &str, property: &str) -> String {
    format!("/elements/{uri}/{property}")
}
