//! SBML to BioPAX Rust Library
//!
//! This library converts biochemical pathway models written in SBML into BioPAX Level 3:
//! - Reading SBML documents into an in-memory source model
//! - Mapping species, reactions, modifiers and compartments onto BioPAX entities
//! - Deduplicating entity references and cross-references across the model
//! - Reconstructing complex members from names and cross-references
//! - Checking the consistency of the converted model
//! - Writing BioPAX OWL (RDF/XML) or JSON

#![warn(unused_imports)]

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::biopax::model::*;
    pub use crate::convert::assembler::SbmlToBiopaxConverter;
    pub use crate::convert::complexes::{ComplexPolicy, NameTokenPolicy};
    pub use crate::convert::config::*;
    pub use crate::convert::error::ConvertError;
    pub use crate::io::*;
    pub use crate::registry::IdentityRegistry;
    pub use crate::sbml::model::*;
    pub use crate::sbml::reader::{read_sbml_file, read_sbml_str};
}

/// Source side: SBML models and their reader
pub mod sbml {
    /// Error types for SBML reading failures
    pub mod error;
    /// In-memory SBML model
    pub mod model;
    /// SBML XML reader
    pub mod reader;
}

/// Target side: the BioPAX object graph and its writer
pub mod biopax {
    /// Error types for BioPAX writing failures
    pub mod error;
    /// BioPAX elements and model
    pub mod model;
    /// BioPAX OWL writer
    pub mod writer;
}

/// Identity registry shared by all conversion steps
pub mod registry;

/// SBML to BioPAX conversion
pub mod convert {
    /// Whole-model conversion
    pub mod assembler;
    /// Complex member reconstruction
    pub mod complexes;
    /// Conversion settings
    pub mod config;
    /// Species, compartment, reaction and modifier conversion
    pub mod entities;
    /// Error types for conversion failures
    pub mod error;
    /// SBO term lookup tables
    pub mod ontology;
    /// Cross-references from annotations
    pub mod xrefs;
}

/// Consistency checks of converted models
pub mod validation {
    pub mod complexes;
    pub mod consistency;
    pub mod links;
}

/// Summary tables of converted models
pub mod info;

/// Loading and saving of models
pub mod io;
