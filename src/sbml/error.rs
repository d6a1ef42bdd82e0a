use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors that can occur while reading an SBML document
#[derive(Debug, Error)]
pub enum SBMLError {
    /// Error when reading an SBML file fails
    #[error("Failed to read SBML file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error when the SBML file is not valid UTF-8
    #[error("Failed to read SBML file: {0}")]
    SBMLReaderError(#[from] FromUtf8Error),

    /// Error when the document is not well-formed XML
    #[error("Failed to parse SBML document: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Error when an attribute cannot be parsed
    #[error("Failed to parse attribute: {0}")]
    AttributeError(#[from] quick_xml::events::attributes::AttrError),

    /// Error when an invalid SBOTerm is encountered
    #[error("Invalid SBOTerm: {0}")]
    InvalidSBOTerm(String),

    /// Error when the SBML document doesn't contain a model
    #[error("Cannot convert SBML document: missing model")]
    MissingModel,

    /// Error when a required attribute is missing on an element
    #[error("Missing attribute '{attribute}' on element <{element}>")]
    MissingAttribute { element: String, attribute: String },
}
