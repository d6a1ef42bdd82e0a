//! Conversion of a whole SBML model.
//!
//! [`SbmlToBiopaxConverter`] runs the passes of a conversion in order:
//!
//! 1. Provenance (and optionally a root pathway) for the model
//! 2. One conversion per reaction, with its controls and participants
//! 3. Complex reconstruction
//! 4. Organism assignment
//! 5. Provenance stamping of every entity
//!
//! # Examples
//!
//! ```
//! use sbml2biopax::prelude::*;
//!
//! let source = SourceModelBuilder::default()
//!     .id("BIOMD0000000001")
//!     .reactions(Vec::<Reaction>::new())
//!     .build()
//!     .unwrap();
//!
//! let converter = SbmlToBiopaxConverter::new(ConverterConfig::default());
//! let model = converter.convert(&source).unwrap();
//!
//! assert!(model.contains("bioregistry.io/biomodels.db:BIOMD0000000001"));
//! ```

use log::{debug, info, trace};

use crate::{
    biopax::model::{
        BioPaxModel, BioSource, Control, Conversion, Names, Pathway, Provenance, Xref, XrefKind,
    },
    convert::{
        complexes::{ComplexPolicy, NameTokenPolicy},
        config::ConverterConfig,
        entities::{
            convert_modifier, convert_reaction, convert_species, element_names, notes_to_comment,
        },
        error::ConvertError,
        xrefs::attach_xrefs,
    },
    registry::IdentityRegistry,
    sbml::model::{Reaction, SourceModel, Species},
};

/// Prefix of provenance identifiers, followed by the model identifier.
pub const PROVENANCE_PREFIX: &str = "bioregistry.io/biomodels.db:";

/// Prefix of organism identifiers, followed by the NCBI taxon.
pub const ORGANISM_PREFIX: &str = "bioregistry.io/ncbitaxon:";

/// Converts SBML models into BioPAX models.
#[derive(Debug, Clone)]
pub struct SbmlToBiopaxConverter<P: ComplexPolicy = NameTokenPolicy> {
    config: ConverterConfig,
    policy: P,
}

impl SbmlToBiopaxConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            policy: NameTokenPolicy,
        }
    }
}

impl Default for SbmlToBiopaxConverter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl<P: ComplexPolicy> SbmlToBiopaxConverter<P> {
    /// Creates a converter reconstructing complexes with a custom policy.
    pub fn with_policy(config: ConverterConfig, policy: P) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts `source` into a new BioPAX model.
    ///
    /// The source model is not modified. Each call uses its own registry, so the same
    /// source always yields the same identifiers.
    pub fn convert(&self, source: &SourceModel) -> Result<BioPaxModel, ConvertError> {
        let reactions = source
            .reactions
            .as_ref()
            .ok_or_else(|| ConvertError::MissingReactions(source.id.clone()))?;

        info!(
            "Converting model '{}' with {} reactions",
            source.id,
            reactions.len()
        );

        let mut registry = IdentityRegistry::new(&self.config.xml_base);
        let provenance = create_provenance(&mut registry, source)?;
        let pathway = if self.config.make_pathway {
            Some(create_pathway(&mut registry, source)?)
        } else {
            None
        };

        for reaction in reactions {
            trace!("Converting reaction '{}'", reaction.id);
            let components = convert_reaction_with_participants(&mut registry, source, reaction)?;

            if let Some(pathway) = pathway.as_deref() {
                if let Some(pathway) = registry.get_mut::<Pathway>(pathway) {
                    pathway.components.extend(components);
                }
            }
        }

        self.policy.fill_complexes(&mut registry)?;
        self.assign_organism(&mut registry)?;
        stamp_provenance(&mut registry, &provenance);

        info!(
            "Converted model '{}' into {} BioPAX elements",
            source.id,
            registry.model().len()
        );

        Ok(registry.into_model())
    }

    /// Links every entity reference and pathway to the configured organism.
    fn assign_organism(&self, registry: &mut IdentityRegistry) -> Result<(), ConvertError> {
        let organism = &self.config.organism;
        let uri = format!("{ORGANISM_PREFIX}{}", organism.taxon);
        let xref = format!("ncbitaxon:{}", organism.taxon);

        registry.get_or_create(&uri, || BioSource {
            names: Names::all(&organism.name),
            ..Default::default()
        })?;
        registry.get_or_create(&xref, || {
            Xref::new(XrefKind::Unification, "ncbitaxon", organism.taxon.clone())
        })?;
        registry.add_xref(&uri, &xref)?;

        let mut stamped = 0;
        for (_, element) in registry.elements_mut() {
            if let Some(reference) = element.entity_reference_mut() {
                reference.organism = Some(uri.clone());
                stamped += 1;
            } else if let Some(pathway) = element.pathway_mut() {
                pathway.organism = Some(uri.clone());
                stamped += 1;
            }
        }

        debug!("Assigned organism '{}' to {stamped} elements", organism.name);
        Ok(())
    }
}

/// Converts a reaction, its modifiers, reactants and products.
///
/// Returns the conversion and its controls.
fn convert_reaction_with_participants(
    registry: &mut IdentityRegistry,
    source: &SourceModel,
    reaction: &Reaction,
) -> Result<Vec<String>, ConvertError> {
    let conversion = convert_reaction(registry, reaction)?;
    let mut components = vec![conversion.clone()];

    debug!(
        "Reaction '{}' has {} modifiers, {} reactants and {} products",
        reaction.id,
        reaction.modifiers.len(),
        reaction.reactants.len(),
        reaction.products.len()
    );

    for modifier in &reaction.modifiers {
        let species = participant(source, reaction, &modifier.species)?;
        let controller = convert_species(registry, source, species)?;
        let control = convert_modifier(registry, reaction, modifier)?;

        if let Some(entity) = registry.get_mut::<Control>(&control) {
            entity.controller = Some(controller);
            entity.controlled = Some(conversion.clone());
        }
        components.push(control);
    }

    for reactant in &reaction.reactants {
        let species = participant(source, reaction, reactant)?;
        let entity = convert_species(registry, source, species)?;
        if let Some(conversion) = registry.get_mut::<Conversion>(&conversion) {
            conversion.left.insert(entity);
        }
    }

    for product in &reaction.products {
        let species = participant(source, reaction, product)?;
        let entity = convert_species(registry, source, species)?;
        if let Some(conversion) = registry.get_mut::<Conversion>(&conversion) {
            conversion.right.insert(entity);
        }
    }

    Ok(components)
}

fn participant<'a>(
    source: &'a SourceModel,
    reaction: &Reaction,
    species: &str,
) -> Result<&'a Species, ConvertError> {
    source
        .get_species(species)
        .ok_or_else(|| ConvertError::UnknownSpecies {
            reaction: reaction.id.clone(),
            species: species.to_string(),
        })
}

/// Creates the provenance of the model, identified by its BioModels identifier.
fn create_provenance(
    registry: &mut IdentityRegistry,
    source: &SourceModel,
) -> Result<String, ConvertError> {
    let uri = format!("{PROVENANCE_PREFIX}{}", source.id);

    registry.get_or_create(&uri, || Provenance {
        names: element_names(source.name.as_deref()),
        comments: source
            .notes
            .as_deref()
            .and_then(notes_to_comment)
            .into_iter()
            .collect(),
        ..Default::default()
    })?;
    attach_xrefs(registry, &uri, &source.annotation, XrefKind::Relationship)?;

    let xref = format!("biomodels.db:{}", source.id);
    registry.get_or_create(&xref, || {
        Xref::new(XrefKind::Unification, "biomodels.db", source.id.clone())
    })?;
    registry.add_xref(&uri, &xref)?;

    Ok(uri)
}

/// Creates the root pathway of the model.
fn create_pathway(
    registry: &mut IdentityRegistry,
    source: &SourceModel,
) -> Result<String, ConvertError> {
    let uri = registry.complete_id(&source.id);

    registry.get_or_create(&uri, || Pathway {
        names: element_names(source.name.as_deref()),
        comments: source
            .notes
            .as_deref()
            .and_then(notes_to_comment)
            .into_iter()
            .collect(),
        ..Default::default()
    })?;
    attach_xrefs(registry, &uri, &source.annotation, XrefKind::Relationship)?;

    Ok(uri)
}

/// Adds the provenance to the data sources of every entity.
fn stamp_provenance(registry: &mut IdentityRegistry, provenance: &str) {
    for (_, element) in registry.elements_mut() {
        if let Some(data_sources) = element.data_sources_mut() {
            data_sources.insert(provenance.to_string());
        }
    }
}
