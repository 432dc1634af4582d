use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::element::Element;
use crate::mol::Molecule;

/// The bonding pattern an atom is expected to have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomType {
    pub element: Element,
    pub formal_charge: i8,
    /// Target sum of bond orders plus hydrogens.
    pub valence: u8,
    /// Hydrogens needed to reach `valence`.
    pub hydrogens: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomTypeError {
    #[error("no atom type matches {symbol} at atom {atom}")]
    NoMatchingType { atom: usize, symbol: String },
    #[error("atom {atom} is not part of the molecule")]
    AtomOutOfRange { atom: usize },
}

/// Assigns an [`AtomType`] to an atom in the context of its molecule.
pub trait AtomTyper {
    fn find_matching_type(&self, mol: &Molecule, idx: NodeIndex)
        -> Result<AtomType, AtomTypeError>;
}

/// Default-valence typing with an isoelectronic charge shift.
///
/// A charged atom takes the valences of the element `charge` places to its
/// left (N+ types like C, O- like F). The lowest valence is the target while
/// it still covers the bond-order sum; past that, the smallest higher valence
/// that fits is used and no hydrogens are added. A neutral nitrogen with four
/// bonds therefore types as pentavalent with zero hydrogens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValenceTyper;

impl AtomTyper for ValenceTyper {
    fn find_matching_type(
        &self,
        mol: &Molecule,
        idx: NodeIndex,
    ) -> Result<AtomType, AtomTypeError> {
        let atom = mol
            .get_atom(idx)
            .ok_or(AtomTypeError::AtomOutOfRange { atom: idx.index() })?;
        let no_match = || AtomTypeError::NoMatchingType {
            atom: idx.index(),
            symbol: atom.symbol.clone(),
        };

        let element = atom.element().ok_or_else(no_match)?;
        let charge = atom.formal_charge.unwrap_or(0);
        let shifted = i16::from(element.atomic_num()) - i16::from(charge);
        let valences = u8::try_from(shifted)
            .ok()
            .and_then(Element::from_atomic_num)
            .map(Element::default_valences)
            .filter(|v| !v.is_empty())
            .ok_or_else(no_match)?;

        let sum = mol.bond_order_sum(idx);
        let primary = valences[0];
        let (valence, hydrogens) = if sum <= primary {
            (primary, primary - sum)
        } else {
            let v = valences.iter().copied().find(|&v| v >= sum).ok_or_else(no_match)?;
            (v, 0)
        };

        Ok(AtomType {
            element,
            formal_charge: charge,
            valence,
            hydrogens,
        })
    }
}

/// Fills in missing implicit-hydrogen counts for every atom the typer can
/// handle. Atoms that already carry a count are left alone. Returns the
/// atoms no type matched.
pub fn perceive_atom_types(mol: &mut Molecule, typer: &dyn AtomTyper) -> Vec<NodeIndex> {
    let mut untyped = Vec::new();
    let atoms: Vec<NodeIndex> = mol.atoms().collect();
    for idx in atoms {
        match typer.find_matching_type(mol, idx) {
            Ok(atom_type) => {
                let atom = mol.atom_mut(idx);
                if atom.implicit_hydrogens.is_none() {
                    atom.implicit_hydrogens = Some(atom_type.hydrogens);
                }
            }
            Err(_) => untyped.push(idx),
        }
    }
    untyped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn type_of(smiles: &str, i: usize) -> Result<AtomType, AtomTypeError> {
        let mol = parse_smiles(smiles).unwrap();
        ValenceTyper.find_matching_type(&mol, NodeIndex::new(i))
    }

    #[test]
    fn neutral_atoms() {
        let t = type_of("CO", 1).unwrap();
        assert_eq!((t.valence, t.hydrogens), (2, 1));
        let t = type_of("CC(C)(C)C", 1).unwrap();
        assert_eq!((t.valence, t.hydrogens), (4, 0));
    }

    #[test]
    fn charge_shifts_valence() {
        let t = type_of("C[O-]", 1).unwrap();
        assert_eq!((t.valence, t.hydrogens), (1, 0));
        let t = type_of("C[NH3+]", 1).unwrap();
        assert_eq!((t.valence, t.hydrogens), (4, 3));
    }

    #[test]
    fn four_bonded_neutral_nitrogen_gets_no_hydrogens() {
        let mut mol = parse_smiles("C[N+](C)(C)C").unwrap();
        mol.atom_mut(NodeIndex::new(1)).formal_charge = Some(0);
        let t = ValenceTyper.find_matching_type(&mol, NodeIndex::new(1)).unwrap();
        assert_eq!((t.valence, t.hydrogens), (5, 0));
    }

    #[test]
    fn aromatic_atoms_use_kekule_orders() {
        let t = type_of("c1ccccc1", 0).unwrap();
        assert_eq!((t.valence, t.hydrogens), (4, 1));
        let t = type_of("c1ccncc1", 3).unwrap();
        assert_eq!((t.valence, t.hydrogens), (3, 0));
        let t = type_of("c1cc[nH]c1", 3).unwrap();
        assert_eq!((t.valence, t.hydrogens), (3, 1));
    }

    #[test]
    fn untypable_atoms() {
        assert!(matches!(
            type_of("[Fe]", 0),
            Err(AtomTypeError::NoMatchingType { .. })
        ));
        assert!(matches!(
            type_of("*C", 0),
            Err(AtomTypeError::NoMatchingType { .. })
        ));
        let mut mol = parse_smiles("C[O+](C)C").unwrap();
        mol.atom_mut(NodeIndex::new(1)).formal_charge = Some(0);
        assert!(ValenceTyper
            .find_matching_type(&mol, NodeIndex::new(1))
            .is_err());
        assert_eq!(
            type_of("C", 5),
            Err(AtomTypeError::AtomOutOfRange { atom: 5 })
        );
    }

    #[test]
    fn perceive_fills_only_missing_counts() {
        let mut mol = parse_smiles("CC[Fe]").unwrap();
        mol.atom_mut(NodeIndex::new(0)).implicit_hydrogens = None;
        mol.atom_mut(NodeIndex::new(1)).implicit_hydrogens = Some(7);
        let untyped = perceive_atom_types(&mut mol, &ValenceTyper);
        assert_eq!(untyped, vec![NodeIndex::new(2)]);
        assert_eq!(mol.atom(NodeIndex::new(0)).implicit_hydrogens, Some(3));
        assert_eq!(mol.atom(NodeIndex::new(1)).implicit_hydrogens, Some(7));
    }
}
