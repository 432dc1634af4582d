//! Boundary to a functional-group finder, and frequency counting of what it
//! extracts.

use std::collections::HashMap;

use crate::error::CodecError;
use crate::hash::MoleculeHasher;
use crate::mol::Molecule;
use crate::pseudo_smiles::PseudoSmilesEncoder;

/// Whether a finder replaces environment atoms by generic substituents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinderMode {
    #[default]
    Generalizing,
    NonGeneralizing,
}

/// Extracts functional groups from a normalized molecule.
pub trait FunctionalGroupFinder {
    fn find(&self, mol: &Molecule) -> Vec<Molecule>;

    fn mode(&self) -> FinderMode {
        FinderMode::Generalizing
    }
}

/// One distinct functional group and how often it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: u64,
    /// Pseudo-SMILES of the first occurrence.
    pub pseudo_smiles: String,
    pub frequency: usize,
}

/// Groups equivalent sub-structures by hash key, in first-seen order.
pub fn tally_groups(
    groups: impl IntoIterator<Item = Molecule>,
    encoder: &PseudoSmilesEncoder<'_>,
    hasher: &MoleculeHasher,
) -> Result<Vec<GroupCount>, CodecError> {
    let mut counts: Vec<GroupCount> = Vec::new();
    let mut by_key: HashMap<u64, usize> = HashMap::new();
    for mut group in groups {
        let key = hasher.hash(&group);
        if let Some(&i) = by_key.get(&key) {
            counts[i].frequency += 1;
            continue;
        }
        let pseudo_smiles = encoder.encode(&mut group)?;
        by_key.insert(key, counts.len());
        counts.push(GroupCount {
            key,
            pseudo_smiles,
            frequency: 1,
        });
    }
    Ok(counts)
}

/// Runs `finder` on every molecule and tallies all groups found.
pub fn tally_molecules<'m>(
    finder: &dyn FunctionalGroupFinder,
    molecules: impl IntoIterator<Item = &'m Molecule>,
    encoder: &PseudoSmilesEncoder<'_>,
    hasher: &MoleculeHasher,
) -> Result<Vec<GroupCount>, CodecError> {
    let groups = molecules.into_iter().flat_map(|mol| finder.find(mol));
    tally_groups(groups, encoder, hasher)
}
