#[cfg(test)]
mod test_conversion {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use sbml2biopax::{
        biopax::writer::to_owl_string,
        prelude::*,
        validation::consistency::check_consistency,
    };

    const FIXTURE: &str = "tests/data/glycolysis.xml";

    fn convert_fixture(make_pathway: bool) -> BioPaxModel {
        let source = read_sbml_file(FIXTURE).expect("Failed to read the fixture");
        let config = ConverterConfigBuilder::default()
            .make_pathway(make_pathway)
            .build()
            .unwrap();

        SbmlToBiopaxConverter::new(config)
            .convert(&source)
            .expect("Failed to convert the fixture")
    }

    fn entity<'a>(model: &'a BioPaxModel, uri: &str) -> &'a PhysicalEntity {
        model
            .get_as::<PhysicalEntity>(uri)
            .unwrap_or_else(|| panic!("Missing physical entity '{uri}'"))
    }

    fn species(id: &str, name: &str, sbo: u32, resources: &[&str]) -> Species {
        let mut builder = SpeciesBuilder::default();
        builder.id(id).name(name).sbo_term(sbo).compartment("c");
        if !resources.is_empty() {
            builder.to_annotation(AnnotationTerm::is(resources.iter().copied()));
        }
        builder.build().unwrap()
    }

    fn cytosol() -> Compartment {
        CompartmentBuilder::default()
            .id("c")
            .name("cytosol")
            .build()
            .unwrap()
    }

    /// Converting the same document twice yields the same identifiers and links.
    #[test]
    fn test_conversion_is_deterministic() {
        let first = convert_fixture(true);
        let second = convert_fixture(true);

        let first_ids: Vec<&String> = first.ids().collect();
        let second_ids: Vec<&String> = second.ids().collect();
        assert_eq!(first_ids, second_ids);

        for (uri, entity) in first.objects::<PhysicalEntity>() {
            assert_eq!(
                entity.entity_reference,
                second.get_as::<PhysicalEntity>(uri).unwrap().entity_reference
            );
        }
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixture_species_share_references() {
        let model = convert_fixture(false);

        let glc_e = entity(&model, "glc_e");
        let glc_c = entity(&model, "glc_c");

        assert_eq!(glc_e.entity_reference.as_deref(), Some("ref_glc_e"));
        assert_eq!(glc_c.entity_reference, glc_e.entity_reference);
        assert_eq!(glc_e.cellular_location.as_deref(), Some("e"));
        assert_eq!(glc_c.cellular_location.as_deref(), Some("c"));
        assert!(!model.contains("ref_glc_c"));

        // Distinct molecules keep distinct references
        let atp = entity(&model, "atp_c");
        assert_eq!(atp.entity_reference.as_deref(), Some("ref_atp_c"));

        let reference = model.get_as::<EntityReference>("ref_glc_e").unwrap();
        assert_eq!(reference.kind, EntityReferenceKind::SmallMoleculeReference);
        assert_eq!(reference.xrefs.len(), 1);

        let xref = model
            .get_as::<Xref>(reference.xrefs.first().unwrap())
            .unwrap();
        assert_eq!(xref.kind, XrefKind::Unification);
        assert_eq!(xref.db, "chebi");
        assert_eq!(xref.id, "CHEBI:4167");
    }

    #[test]
    fn test_species_with_equal_annotations_share_a_reference() {
        let source = SourceModelBuilder::default()
            .id("shared")
            .to_compartments(cytosol())
            .to_species(species("s1", "Acetate", 247, &["urn:miriam:chebi:CHEBI%3A15589"]))
            .to_species(species("s2", "Acetate", 247, &["urn:miriam:chebi:CHEBI%3A15589"]))
            .reactions(vec![ReactionBuilder::default()
                .id("r1")
                .to_reactants("s1")
                .to_products("s2")
                .build()
                .unwrap()])
            .build()
            .unwrap();

        let model = SbmlToBiopaxConverter::default().convert(&source).unwrap();

        let s1 = entity(&model, "s1");
        let s2 = entity(&model, "s2");
        assert_eq!(s1.entity_reference.as_deref(), Some("ref_s1"));
        assert_eq!(s1.entity_reference, s2.entity_reference);
        assert_eq!(model.objects::<EntityReference>().count(), 1);
        assert_eq!(model.objects::<Xref>().filter(|(_, x)| x.db == "chebi").count(), 1);
    }

    #[test]
    fn test_fixture_complexes_cover_their_names() {
        let model = convert_fixture(false);

        let gck_complex = entity(&model, "cplx_hk1_gck");
        let components: Vec<&str> = gck_complex.components.iter().map(String::as_str).collect();
        assert_eq!(
            components,
            vec!["cplx_hk1_gck_ref_hk1", "cplx_hk1_gck_ref_gck"]
        );
        assert_eq!(
            entity(&model, "cplx_hk1_gck_ref_hk1").entity_reference.as_deref(),
            Some("ref_hk1")
        );

        let hkdc1_complex = entity(&model, "cplx_hk1_hkdc1");
        let components: Vec<&str> = hkdc1_complex.components.iter().map(String::as_str).collect();
        assert_eq!(
            components,
            vec!["cplx_hk1_hkdc1_ref_hk1", "cplx_hk1_hkdc1_protein_HKDC1"]
        );

        let hkdc1 = entity(&model, "cplx_hk1_hkdc1_protein_HKDC1");
        assert_eq!(hkdc1.kind, PhysicalEntityKind::Protein);
        assert_eq!(hkdc1.display_name(), Some("HKDC1"));
        assert_eq!(hkdc1.entity_reference.as_deref(), Some("ref_protein_HKDC1"));
        assert_eq!(hkdc1.cellular_location.as_deref(), Some("c"));

        let reference = model
            .get_as::<EntityReference>("ref_protein_HKDC1")
            .unwrap();
        assert!(reference.xrefs.contains("symbol_HKDC1"));

        let symbol = model.get_as::<Xref>("symbol_HKDC1").unwrap();
        assert_eq!(symbol.kind, XrefKind::Relationship);
        assert_eq!(symbol.db, "hgnc.symbol");
        assert_eq!(symbol.id, "HKDC1");
    }

    #[test]
    fn test_complex_components_match_name_tokens() {
        let complex = species("abc", "A:B:C", 297, &[]);
        let source = SourceModelBuilder::default()
            .id("tokens")
            .to_compartments(cytosol())
            .to_species(complex)
            .reactions(vec![ReactionBuilder::default()
                .id("r1")
                .to_products("abc")
                .build()
                .unwrap()])
            .build()
            .unwrap();

        let model = SbmlToBiopaxConverter::default().convert(&source).unwrap();

        let names: HashSet<&str> = entity(&model, "abc")
            .components
            .iter()
            .map(|c| entity(&model, c).display_name().unwrap())
            .collect();
        assert_eq!(names, HashSet::from(["A", "B", "C"]));
    }

    /// A complex annotated with the UniProt entry of one of its members reuses the
    /// reference of that member instead of creating a symbol-based one.
    #[test]
    fn test_complex_member_matched_by_xref() {
        let x = species("x", "X", 252, &["urn:miriam:uniprot:P12345"]);
        let complex = SpeciesBuilder::default()
            .id("xy")
            .name("X:Y")
            .sbo_term(297u32)
            .compartment("c")
            .to_annotation(AnnotationTerm::new(
                "hasPart",
                ["urn:miriam:uniprot:P12345"],
            ))
            .build()
            .unwrap();

        let source = SourceModelBuilder::default()
            .id("complex_match")
            .to_compartments(cytosol())
            .to_species(x)
            .to_species(complex)
            .reactions(vec![
                ReactionBuilder::default()
                    .id("r1")
                    .to_reactants("x")
                    .to_products("xy")
                    .build()
                    .unwrap(),
                ReactionBuilder::default()
                    .id("r2")
                    .to_products("xy")
                    .build()
                    .unwrap(),
            ])
            .build()
            .unwrap();

        let model = SbmlToBiopaxConverter::default().convert(&source).unwrap();

        let components: Vec<&PhysicalEntity> = entity(&model, "xy")
            .components
            .iter()
            .map(|c| entity(&model, c))
            .collect();
        assert_eq!(components.len(), 2);
        assert!(components
            .iter()
            .any(|c| c.entity_reference.as_deref() == Some("ref_x")));
        assert!(!model.contains("ref_protein_X"));
        assert!(model.contains("ref_protein_Y"));
    }

    #[test]
    fn test_shared_annotations_use_one_xref() {
        let model = convert_fixture(false);

        let shared: Vec<&String> = model
            .objects::<Xref>()
            .filter(|(_, x)| {
                x.kind == XrefKind::Relationship && x.db == "uniprot" && x.id == "P19367"
            })
            .map(|(uri, _)| uri)
            .collect();
        assert_eq!(shared.len(), 1);

        for complex in ["cplx_hk1_gck", "cplx_hk1_hkdc1"] {
            assert!(entity(&model, complex).xrefs.contains(shared[0]));
        }
    }

    #[test]
    fn test_no_orphan_xrefs() {
        let model = convert_fixture(true);

        let referenced: HashSet<&str> = model
            .iter()
            .flat_map(|(_, element)| element.links())
            .filter(|(property, _)| *property == "xref")
            .map(|(_, target)| target)
            .collect();

        for (uri, _) in model.objects::<Xref>() {
            assert!(referenced.contains(uri.as_str()), "Orphan xref '{uri}'");
        }
    }

    #[test]
    fn test_fixture_reactions_and_controls() {
        let model = convert_fixture(false);

        let transport = model.get_as::<Conversion>("R_GLCt").unwrap();
        assert_eq!(transport.kind, ConversionKind::Transport);
        assert_eq!(transport.direction, ConversionDirection::Reversible);

        let hexokinase = model.get_as::<Conversion>("R_HEX1").unwrap();
        assert_eq!(hexokinase.kind, ConversionKind::BiochemicalReaction);
        assert_eq!(hexokinase.direction, ConversionDirection::LeftToRight);
        assert_eq!(
            hexokinase.comments,
            vec!["GENE_ASSOCIATION: HK1 or GCK".to_string()]
        );

        // No reversible attribute defaults to a reversible reaction
        let isomerase = model.get_as::<Conversion>("R_PGI").unwrap();
        assert_eq!(isomerase.direction, ConversionDirection::Reversible);

        let activation = model.get_as::<Control>("control_R_HEX1_hk1_sbo13").unwrap();
        assert_eq!(activation.control_type, ControlType::Activation);
        assert_eq!(activation.controller.as_deref(), Some("hk1"));
        assert_eq!(activation.controlled.as_deref(), Some("R_HEX1"));

        let unclassified = model
            .get_as::<Control>("control_R_HEX1_cplx_hk1_gck_modifier")
            .unwrap();
        assert_eq!(unclassified.control_type, ControlType::Activation);

        let inhibition = model
            .get_as::<Control>("control_R_PGI_cplx_hk1_hkdc1_sbo20")
            .unwrap();
        assert_eq!(inhibition.control_type, ControlType::Inhibition);

        let unnamed = entity(&model, "f6p_c");
        assert_eq!(unnamed.display_name(), Some("N/A"));
    }

    /// One irreversible reaction with two small molecule reactants, a protein product
    /// and an unclassified modifier.
    #[test]
    fn test_single_reaction_model() {
        let modifier = species("enzyme", "Enzyme", 252, &["urn:miriam:uniprot:Q00001"]);
        let source = SourceModelBuilder::default()
            .id("single")
            .to_compartments(cytosol())
            .to_species(species("a", "A", 247, &["urn:miriam:chebi:CHEBI%3A1"]))
            .to_species(species("b", "B", 247, &["urn:miriam:chebi:CHEBI%3A2"]))
            .to_species(species("p", "P", 252, &["urn:miriam:uniprot:P00001"]))
            .to_species(modifier)
            .reactions(vec![ReactionBuilder::default()
                .id("r1")
                .sbo_term(176u32)
                .reversible(false)
                .to_reactants("a")
                .to_reactants("b")
                .to_products("p")
                .to_modifiers(ModifierReference::new("enzyme"))
                .build()
                .unwrap()])
            .build()
            .unwrap();

        let model = SbmlToBiopaxConverter::default().convert(&source).unwrap();

        let reaction = model.get_as::<Conversion>("r1").unwrap();
        assert_eq!(reaction.kind, ConversionKind::BiochemicalReaction);
        assert_eq!(reaction.direction, ConversionDirection::LeftToRight);

        let left: Vec<&PhysicalEntity> = reaction.left.iter().map(|l| entity(&model, l)).collect();
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|e| e.kind == PhysicalEntityKind::SmallMolecule));
        assert_ne!(left[0].entity_reference, left[1].entity_reference);

        let right: Vec<&PhysicalEntity> =
            reaction.right.iter().map(|r| entity(&model, r)).collect();
        assert_eq!(right.len(), 1);
        assert_eq!(right[0].kind, PhysicalEntityKind::Protein);

        let controls: Vec<&Control> = model.objects::<Control>().map(|(_, c)| c).collect();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].control_type, ControlType::Activation);
        assert_eq!(controls[0].controlled.as_deref(), Some("r1"));
    }

    #[test]
    fn test_pathway_and_provenance() {
        let model = convert_fixture(true);

        let pathway = model.get_as::<Pathway>("glycolysis_excerpt").unwrap();
        assert_eq!(pathway.display_name(), Some("Glycolysis excerpt"));
        // Four conversions and three controls
        assert_eq!(pathway.components.len(), 7);

        let provenance_uri = "bioregistry.io/biomodels.db:glycolysis_excerpt";
        let provenance = model.get_as::<Provenance>(provenance_uri).unwrap();
        let kinds: Vec<XrefKind> = provenance
            .xrefs
            .iter()
            .map(|x| model.get_as::<Xref>(x).unwrap().kind)
            .collect();
        assert!(kinds.contains(&XrefKind::Publication));
        assert!(kinds.contains(&XrefKind::Unification));

        for (_, conversion) in model.objects::<Conversion>() {
            assert!(conversion.data_sources.contains(provenance_uri));
        }
    }

    #[test]
    fn test_converted_fixture_is_consistent() {
        let model = convert_fixture(true);
        let report = check_consistency(&model);

        assert!(report.is_valid, "{:#?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_write_owl() {
        let model = convert_fixture(true);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glycolysis.owl");

        save_biopax_model(&path, &model, None).expect("Failed to write OWL");
        let written = std::fs::read_to_string(&path).unwrap();

        assert_eq!(written, to_owl_string(&model).unwrap());
        assert!(written.contains("<bp:BiochemicalReaction rdf:about=\"R_HEX1\">"));
        assert!(written.contains("<bp:Complex rdf:about=\"cplx_hk1_hkdc1\">"));
        assert!(written.contains("<bp:PublicationXref"));
    }

    #[test]
    fn test_json_roundtrip() {
        let model = convert_fixture(true);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glycolysis.json");

        save_biopax_model(&path, &model, None).expect("Failed to write JSON");
        let loaded = load_biopax_json(&path).expect("Failed to read JSON");

        assert_eq!(model, loaded);
    }

    #[test]
    fn test_source_model_from_json() {
        let source = read_sbml_file(FIXTURE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.json");

        save_source_model(&path, &source).unwrap();
        let loaded = load_source_model(&path).unwrap();
        assert_eq!(source, loaded);

        let from_sbml = SbmlToBiopaxConverter::default().convert(&source).unwrap();
        let from_json = SbmlToBiopaxConverter::default().convert(&loaded).unwrap();
        assert_eq!(from_sbml, from_json);
    }
}
