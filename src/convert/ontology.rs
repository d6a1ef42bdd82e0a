//! SBO term lookup tables.
//!
//! Each table maps a numeric SBO term to a BioPAX class. Codes missing from a table fall
//! back to the documented default instead of failing, since SBO coverage in real models
//! is always partial. Extend the tables to support further codes.

use std::collections::HashMap;

use crate::biopax::model::{ControlType, ConversionKind, PhysicalEntityKind};

pub(crate) const COMPLEX_SBO_TERM: u32 = 297;
pub(crate) const SMALL_MOLECULE_SBO_TERM: u32 = 247;
pub(crate) const PROTEIN_SBO_TERM: u32 = 252;
pub(crate) const TRANSPORT_SBO_TERM: u32 = 185;
pub(crate) const BIOCHEMICAL_REACTION_SBO_TERM: u32 = 176;

/// Kind used for species without a known SBO term.
pub const DEFAULT_SPECIES_KIND: PhysicalEntityKind = PhysicalEntityKind::Protein;

/// Kind used for reactions without a known SBO term.
pub const DEFAULT_REACTION_KIND: ConversionKind = ConversionKind::BiochemicalReaction;

/// Control type used for modifiers without a known role.
pub const DEFAULT_CONTROL_TYPE: ControlType = ControlType::Activation;

lazy_static::lazy_static! {
    pub static ref SPECIES_KINDS: HashMap<u32, PhysicalEntityKind> = {
        let mut m = HashMap::new();
        m.insert(COMPLEX_SBO_TERM, PhysicalEntityKind::Complex);
        m.insert(SMALL_MOLECULE_SBO_TERM, PhysicalEntityKind::SmallMolecule);
        m.insert(PROTEIN_SBO_TERM, PhysicalEntityKind::Protein);
        m
    };

    pub static ref REACTION_KINDS: HashMap<u32, ConversionKind> = {
        let mut m = HashMap::new();
        m.insert(TRANSPORT_SBO_TERM, ConversionKind::Transport);
        m.insert(BIOCHEMICAL_REACTION_SBO_TERM, ConversionKind::BiochemicalReaction);
        m
    };

    pub static ref CONTROL_TYPES: HashMap<u32, ControlType> = {
        let mut m = HashMap::new();
        // Inhibitors
        m.insert(20, ControlType::Inhibition);
        m.insert(206, ControlType::InhibitionCompetitive);
        m.insert(207, ControlType::InhibitionNoncompetitive);

        // Stimulators and catalysts
        m.insert(13, ControlType::Activation);
        m.insert(459, ControlType::Activation);
        m.insert(461, ControlType::Activation);
        m.insert(462, ControlType::Activation);
        m
    };
}

/// Maps a species SBO term to the physical entity kind it becomes.
pub fn classify_species(sbo_term: Option<u32>) -> PhysicalEntityKind {
    lookup(&SPECIES_KINDS, sbo_term, DEFAULT_SPECIES_KIND)
}

/// Maps a reaction SBO term to the conversion kind it becomes.
pub fn classify_reaction(sbo_term: Option<u32>) -> ConversionKind {
    lookup(&REACTION_KINDS, sbo_term, DEFAULT_REACTION_KIND)
}

/// Maps a modifier role SBO term to a control type.
pub fn classify_modifier(sbo_term: Option<u32>) -> ControlType {
    lookup(&CONTROL_TYPES, sbo_term, DEFAULT_CONTROL_TYPE)
}

fn lookup<T: Copy>(table: &HashMap<u32, T>, sbo_term: Option<u32>, default: T) -> T {
    sbo_term
        .and_then(|code| table.get(&code).copied())
        .unwrap_or(default)
}
