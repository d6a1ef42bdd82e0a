use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Settings of a conversion run.
///
/// # Examples
///
/// ```
/// use sbml2biopax::convert::config::ConverterConfigBuilder;
///
/// let config = ConverterConfigBuilder::default()
///     .xml_base("http://example.org/#")
///     .make_pathway(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.organism.taxon, "9606");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Builder, PartialEq)]
pub struct ConverterConfig {
    /// Namespace prepended to every synthesized identifier. Blank means none.
    #[serde(default)]
    #[builder(default, setter(into))]
    pub xml_base: String,

    /// Whether to create a root pathway holding every conversion and control.
    #[serde(default)]
    #[builder(default)]
    pub make_pathway: bool,

    /// Organism stamped onto entity references and pathways.
    #[serde(default)]
    #[builder(default)]
    pub organism: Organism,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            xml_base: String::new(),
            make_pathway: false,
            organism: Organism::default(),
        }
    }
}

/// An NCBI taxonomy organism.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, PartialEq)]
pub struct Organism {
    #[builder(setter(into))]
    pub name: String,

    /// NCBI taxonomy identifier, e.g. `9606`.
    #[builder(setter(into))]
    pub taxon: String,
}

impl Organism {
    pub fn new(name: impl Into<String>, taxon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            taxon: taxon.into(),
        }
    }
}

impl Default for Organism {
    fn default() -> Self {
        Self::new("Homo sapiens", "9606")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfigBuilder::default().build().unwrap();

        assert_eq!(config, ConverterConfig::default());
        assert_eq!(config.xml_base, "");
        assert!(!config.make_pathway);
        assert_eq!(config.organism.name, "Homo sapiens");
    }

    #[test]
    fn test_custom_organism() {
        let organism = OrganismBuilder::default()
            .name("Mus musculus")
            .taxon("10090")
            .build()
            .unwrap();

        let config = ConverterConfigBuilder::default()
            .organism(organism.clone())
            .build()
            .unwrap();

        assert_eq!(config.organism, organism);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"make_pathway": true}"#).unwrap();

        assert!(config.make_pathway);
        assert_eq!(config.organism, Organism::default());
    }
}
