use fgprep::config::FailurePolicy;
use fgprep::filter::{self, FilterIssue};
use fgprep::normalize::{neutralize_charges, select_largest_fragment};
use fgprep::{
    normalize_for_analysis, parse_smiles, to_canonical_smiles, Huckel, InputError, Molecule,
    Normalized, PipelineConfig, Rejection, ValenceTyper,
};
use petgraph::graph::NodeIndex;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Ready,
    NoAtomsOrBonds,
    InvalidAtomicNumber,
}

#[derive(Deserialize)]
struct NormalizationEntry {
    smiles: String,
    outcome: Outcome,
    canonical: Option<String>,
}

#[test]
fn approval_normalization() {
    let data: Vec<NormalizationEntry> =
        serde_json::from_str(include_str!("approval_data/normalization.json")).unwrap();
    let cfg = PipelineConfig::standard();
    for entry in data {
        let mol = parse_smiles(&entry.smiles).unwrap();
        let outcome = normalize_for_analysis(mol, &Huckel::default(), &cfg);
        match (entry.outcome, outcome) {
            (Outcome::Ready, Normalized::Ready(ready)) => {
                assert_eq!(
                    Some(to_canonical_smiles(&ready).unwrap()),
                    entry.canonical,
                    "{}",
                    entry.smiles
                );
                assert_eq!(filter::is_ready_for_analysis(&ready, &cfg), Ok(true));
            }
            (Outcome::NoAtomsOrBonds, Normalized::Rejected(Rejection::NoAtomsOrBonds)) => {}
            (Outcome::InvalidAtomicNumber, Normalized::Rejected(Rejection::InvalidAtomicNumber)) => {}
            (_, other) => panic!("{}: unexpected outcome {other:?}", entry.smiles),
        }
    }
}

#[test]
fn largest_fragment_is_connected_and_maximal() {
    for smiles in ["CC.OO", "C.CCC.CC", "c1ccccc1.CCO", "[Na+].OC(=O)C"] {
        let mol = parse_smiles(smiles).unwrap();
        let largest = fgprep::graph_ops::connected_components(&mol)
            .iter()
            .map(Vec::len)
            .max()
            .unwrap();
        let frag = select_largest_fragment(&mol).unwrap();
        assert!(!filter::is_disconnected(&frag), "{smiles}");
        assert_eq!(frag.atom_count(), largest, "{smiles}");
    }
}

#[test]
fn largest_fragment_tie_is_first_encountered() {
    let mut mol = parse_smiles("CC.OO").unwrap();
    mol.set_property("title", "tie");
    let frag = select_largest_fragment(&mol).unwrap();
    assert_eq!(to_canonical_smiles(&frag).unwrap(), "CC");
    assert_eq!(frag.property("title"), Some("tie"));
}

#[test]
fn neutralization_without_charges_changes_nothing() {
    for smiles in ["CCO", "c1ccncc1", "*OC(*)=O", "N#CC"] {
        let mol = parse_smiles(smiles).unwrap();
        let mut copy = mol.clone();
        neutralize_charges(&mut copy, &ValenceTyper).unwrap();
        assert_eq!(copy, mol, "{smiles}");
    }
}

#[test]
fn ethoxide_with_methane_normalizes_to_ethanol() {
    let cfg = PipelineConfig::standard();
    let ready = normalize_for_analysis(parse_smiles("CC[O-].C").unwrap(), &Huckel::default(), &cfg)
        .ready()
        .unwrap();
    assert_eq!(to_canonical_smiles(&ready).unwrap(), "OCC");
}

#[test]
fn readiness_is_idempotent() {
    let cfg = PipelineConfig::standard();
    for smiles in ["CCO", "CC[O-].C", "C", "C[Hg]C"] {
        let mol = parse_smiles(smiles).unwrap();
        let first = filter::is_ready_for_analysis(&mol, &cfg);
        let second = filter::is_ready_for_analysis(&mol, &cfg);
        assert_eq!(first, second, "{smiles}");
    }
}

#[test]
fn failure_policy_is_configurable() {
    let mut mol = parse_smiles("CCO").unwrap();
    mol.atom_mut(NodeIndex::new(2)).formal_charge = None;

    let closed = PipelineConfig::from_json(r#"{"failure_policy": "fail_closed"}"#).unwrap();
    assert_eq!(filter::is_ready_for_analysis(&mol, &closed), Ok(false));

    let open = closed.with_failure_policy(FailurePolicy::Propagate);
    assert_eq!(
        filter::is_ready_for_analysis(&mol, &open),
        Err(InputError::MissingFormalCharge { atom: 2 })
    );
    assert_eq!(
        filter::check_ready_for_analysis(&mol, &open),
        Err(vec![FilterIssue::Input(InputError::MissingFormalCharge { atom: 2 })])
    );
}

#[test]
fn empty_molecule_is_rejected() {
    let cfg = PipelineConfig::standard();
    assert!(filter::should_reject(&Molecule::new(), &cfg));
    assert_eq!(
        normalize_for_analysis(Molecule::new(), &Huckel::default(), &cfg).rejection(),
        Some(&Rejection::NoAtomsOrBonds)
    );
}
