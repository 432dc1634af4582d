use fgprep::placeholder::PlaceholderTable;
use fgprep::smiles::CanonicalSmiles;
use fgprep::{
    config, normalize_for_analysis, parse_smiles, pseudo_smiles, AromaticityModel, Huckel,
    PseudoSmilesEncoder,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct PseudoSmilesEntry {
    smiles: String,
    pseudo_smiles: String,
}

fn entries() -> Vec<PseudoSmilesEntry> {
    serde_json::from_str(include_str!("approval_data/pseudo_smiles.json")).unwrap()
}

#[test]
fn approval_pseudo_smiles() {
    let mut failures = Vec::new();
    for entry in entries() {
        let mut mol = parse_smiles(&entry.smiles).unwrap();
        let got = pseudo_smiles(&mut mol).unwrap();
        if got != entry.pseudo_smiles {
            failures.push(format!(
                "{}: expected {}, got {got}",
                entry.smiles, entry.pseudo_smiles
            ));
        }
    }
    assert!(failures.is_empty(), "pseudo-SMILES mismatches:\n{}", failures.join("\n"));
}

#[test]
fn molecule_unchanged_after_encoding() {
    for entry in entries() {
        let mut mol = parse_smiles(&entry.smiles).unwrap();
        mol.set_property("smiles", entry.smiles.as_str());
        let before = mol.clone();
        pseudo_smiles(&mut mol).unwrap();
        assert_eq!(mol, before, "{} was not restored", entry.smiles);
    }
}

#[test]
fn repeated_encoding_is_stable() {
    let mut mol = parse_smiles("*c1ccc(O*)cc1").unwrap();
    let first = pseudo_smiles(&mut mol).unwrap();
    let second = pseudo_smiles(&mut mol).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("C*"));
    assert!(!first.contains('c'));
}

#[test]
fn encoding_ignores_atom_order() {
    let a = pseudo_smiles(&mut parse_smiles("*n1cccc1").unwrap()).unwrap();
    let b = pseudo_smiles(&mut parse_smiles("c1ccn(*)c1").unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn lowercase_and_kekule_rings_encode_alike() {
    let pairs = [
        ("Oc1ccccc1", "OC1=CC=CC=C1"),
        ("*n1cccc1", "*N1C=CC=C1"),
        ("c1ccncc1", "C1=CC=NC=C1"),
        ("*c1ccc(*)cc1", "*C1=CC=C(*)C=C1"),
        ("c1ccc2ccccc2c1", "C1=CC2=CC=CC=C2C=C1"),
    ];
    for (lower, kekule) in pairs {
        let mut a = parse_smiles(lower).unwrap();
        let mut b = parse_smiles(kekule).unwrap();
        Huckel::default().apply(&mut a).unwrap();
        Huckel::default().apply(&mut b).unwrap();
        let (a, b) = (pseudo_smiles(&mut a).unwrap(), pseudo_smiles(&mut b).unwrap());
        assert_eq!(a, b, "{lower} vs {kekule}");
        assert!(!a.contains('['), "{lower}: {a}");
    }
}

#[test]
fn normalized_phenol_encodes_alike() {
    let cfg = config::shared();
    for smiles in ["Oc1ccccc1", "OC1=CC=CC=C1"] {
        let mut ready = normalize_for_analysis(parse_smiles(smiles).unwrap(), &Huckel::default(), cfg)
            .ready()
            .unwrap();
        assert_eq!(pseudo_smiles(&mut ready).unwrap(), "OC*1=C*C*=C*C*=C*1", "{smiles}");
    }
}

#[test]
fn unknown_elements_surface_as_wildcards() {
    let mut mol = parse_smiles("C[Uup]").unwrap();
    let encoded = pseudo_smiles(&mut mol).unwrap();
    assert_eq!(encoded, "*C");
    assert!(!encoded.contains('R'));
}

#[test]
fn explicit_encoder_matches_default() {
    let encoder = PseudoSmilesEncoder::new(PlaceholderTable::standard(), &CanonicalSmiles);
    let mut mol = parse_smiles("*OC(*)=O").unwrap();
    assert_eq!(encoder.encode(&mut mol).unwrap(), "ROC(R)=O");
}
