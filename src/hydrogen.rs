use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::mol::Molecule;
use crate::valence::AtomType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaturationError {
    #[error("atom {atom} is not part of the molecule")]
    AtomOutOfRange { atom: usize },
    #[error("atom {atom} already has bond-order sum {sum}, above the target valence {valence}")]
    OverValence { atom: usize, sum: u8, valence: u8 },
}

/// Applies `atom_type` to the atom at `idx`: sets its formal charge and its
/// implicit hydrogens, never more than the type's valence leaves room for.
/// Returns the new hydrogen count.
pub fn add_implicit_hydrogens(
    mol: &mut Molecule,
    idx: NodeIndex,
    atom_type: &AtomType,
) -> Result<u8, SaturationError> {
    let sum = mol.bond_order_sum(idx);
    let atom = mol
        .get_atom_mut(idx)
        .ok_or(SaturationError::AtomOutOfRange { atom: idx.index() })?;
    if sum > atom_type.valence {
        return Err(SaturationError::OverValence {
            atom: idx.index(),
            sum,
            valence: atom_type.valence,
        });
    }
    let hydrogens = atom_type.hydrogens.min(atom_type.valence - sum);
    atom.formal_charge = Some(atom_type.formal_charge);
    atom.implicit_hydrogens = Some(hydrogens);
    Ok(hydrogens)
}
