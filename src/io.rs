use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{
    biopax::{error::WriteError, model::BioPaxModel, writer::write_owl_file},
    sbml::{error::SBMLError, model::SourceModel, reader::read_sbml_file},
};

/// Loads a source model, choosing the format by file extension.
///
/// Files ending in `.json` are read as serialized [`SourceModel`]s, everything else is
/// parsed as SBML.
///
/// # Arguments
///
/// * `path` - Path to an SBML (`.xml`, `.sbml`) or JSON file
///
/// # Returns
///
/// The parsed [`SourceModel`].
///
/// # Errors
///
/// This function will return an error if:
/// * The file cannot be found or opened (`IOError::FileNotFound`)
/// * The JSON structure does not match a source model (`IOError::JsonParseError`)
/// * The SBML document cannot be parsed (`IOError::SBMLError`)
pub fn load_source_model(path: impl Into<PathBuf>) -> Result<SourceModel, IOError> {
    let path = path.into();
    match OutputFormat::from_path(&path) {
        Some(OutputFormat::Json) => {
            let file = std::fs::File::open(path).map_err(IOError::FileNotFound)?;
            serde_json::from_reader(file).map_err(IOError::JsonParseError)
        }
        _ => Ok(read_sbml_file(path)?),
    }
}

/// Saves a source model as pretty-printed JSON.
pub fn save_source_model(path: impl Into<PathBuf>, model: &SourceModel) -> Result<(), IOError> {
    let file = std::fs::File::create(path.into()).map_err(IOError::FileNotFound)?;
    serde_json::to_writer_pretty(file, model).map_err(IOError::JsonParseError)
}

/// Loads a BioPAX model saved with [`save_biopax_model`] in JSON format.
pub fn load_biopax_json(path: impl Into<PathBuf>) -> Result<BioPaxModel, IOError> {
    let file = std::fs::File::open(path.into()).map_err(IOError::FileNotFound)?;
    serde_json::from_reader(file).map_err(IOError::JsonParseError)
}

/// Saves a BioPAX model as OWL (RDF/XML) or JSON.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `model` - The converted model
/// * `format` - Output format. `None` picks it from the file extension, defaulting to OWL.
///
/// # Returns
///
/// `Ok(())` once the file has been written. Fails with `IOError::FileNotFound` if the
/// file cannot be created and with the writer's error if serialization fails.
pub fn save_biopax_model(
    path: impl Into<PathBuf>,
    model: &BioPaxModel,
    format: Option<OutputFormat>,
) -> Result<(), IOError> {
    let path = path.into();
    let format = format
        .or_else(|| OutputFormat::from_path(&path))
        .unwrap_or_default();

    match format {
        OutputFormat::Owl => Ok(write_owl_file(model, path)?),
        OutputFormat::Json => {
            let file = std::fs::File::create(path).map_err(IOError::FileNotFound)?;
            serde_json::to_writer_pretty(file, model).map_err(IOError::JsonParseError)
        }
    }
}

/// Serialization format of a converted model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// BioPAX Level 3 RDF/XML
    #[default]
    Owl,
    /// Serialized [`BioPaxModel`]
    Json,
}

impl OutputFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "owl" | "rdf" | "xml" => Some(OutputFormat::Owl),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Represents errors that can occur while loading or saving models.
#[derive(Error, Debug)]
pub enum IOError {
    /// Indicates that the specified file could not be found, opened or created.
    #[error("File not found: {0}")]
    FileNotFound(#[from] std::io::Error),

    /// Indicates that the file contents could not be parsed or written as JSON.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// Indicates that the SBML document could not be read.
    #[error(transparent)]
    SBMLError(#[from] SBMLError),

    /// Indicates that the BioPAX document could not be written.
    #[error(transparent)]
    WriteError(#[from] WriteError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sbml::model::{Reaction, SourceModelBuilder, SpeciesBuilder};

    #[test]
    fn test_source_model_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = SourceModelBuilder::default()
            .id("M1")
            .to_species(SpeciesBuilder::default().id("s1").sbo_term(247u32).build().unwrap())
            .reactions(Vec::<Reaction>::new())
            .build()
            .unwrap();

        save_source_model(&path, &model).unwrap();
        let loaded = load_source_model(&path).unwrap();

        assert_eq!(loaded, model);
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out.OWL")),
            Some(OutputFormat::Owl)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out.json")),
            Some(OutputFormat::Json)
        );
        assert_eq!(OutputFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_missing_file() {
        let result = load_source_model("does/not/exist.json");
        assert!(matches!(result, Err(IOError::FileNotFound(_))));
    }
}
