use thiserror::Error;

/// Fatal errors of a conversion run.
///
/// Data-quality problems such as malformed annotation resources or ambiguous reference
/// matches are not errors. They are logged and the conversion continues.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source model has no reaction list at all
    #[error("Cannot convert model '{0}': missing list of reactions")]
    MissingReactions(String),

    /// A reaction refers to a species that is not declared in the model
    #[error("Reaction '{reaction}' refers to unknown species '{species}'")]
    UnknownSpecies { reaction: String, species: String },

    /// A species refers to a compartment that is not declared in the model
    #[error("Species '{species}' refers to unknown compartment '{compartment}'")]
    UnknownCompartment {
        species: String,
        compartment: String,
    },

    /// An identifier is already registered for a different element family
    #[error("Identifier '{id}' is registered as {found}, expected {expected}")]
    KindMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An identifier that must be fresh is already registered
    #[error("Identifier '{0}' is already registered")]
    DuplicateIdentifier(String),

    /// An identifier that must be registered is not
    #[error("No element registered under '{0}'")]
    MissingElement(String),
}
