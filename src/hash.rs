//! Equivalence keys for deduplicating extracted functional groups.
//!
//! A [`HashScheme`] only names the per-atom features that discriminate two
//! groups. [`MoleculeHasher`] turns a scheme into a `u64` key with a
//! Morgan-style neighbourhood refinement over FNV-1a seeds.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::mol::Molecule;

/// A per-atom feature contributing to the seed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomEncoder {
    /// Atomic number, or the symbol when there is none worth using.
    Elemental,
    /// Sum of bond orders. Stands in for hybridization, which is misleading
    /// on fragments with open valences.
    BondOrderSum,
    /// One of two fixed seeds depending on the aromaticity flag.
    Aromaticity,
}

pub const AROMATIC_SEED: u64 = 3;
pub const ALIPHATIC_SEED: u64 = 2;

/// Which features make two graphs equivalent, and how far around each atom
/// to look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashScheme {
    pub depth: usize,
    pub encoders: Vec<AtomEncoder>,
}

impl HashScheme {
    /// The scheme used for functional groups: depth 8, element, bond-order
    /// sum and aromaticity.
    pub fn functional_group() -> Self {
        Self {
            depth: 8,
            encoders: vec![
                AtomEncoder::Elemental,
                AtomEncoder::BondOrderSum,
                AtomEncoder::Aromaticity,
            ],
        }
    }
}

impl Default for HashScheme {
    fn default() -> Self {
        Self::functional_group()
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a_bytes(hash: u64, bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(hash, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

fn fnv1a_update(hash: u64, value: u64) -> u64 {
    fnv1a_bytes(hash, &value.to_le_bytes())
}

fn xorshift(mut x: u64) -> u64 {
    x ^= x << 21;
    x ^= x >> 35;
    x ^= x << 4;
    x
}

/// Evaluates a [`HashScheme`] on molecules.
#[derive(Debug, Clone)]
pub struct MoleculeHasher {
    scheme: HashScheme,
}

impl MoleculeHasher {
    pub fn new(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &HashScheme {
        &self.scheme
    }

    /// Equivalence key for `mol`. Independent of atom order and of
    /// implicit-hydrogen counts.
    pub fn hash(&self, mol: &Molecule) -> u64 {
        let mut values: Vec<u64> = mol.atoms().map(|idx| self.seed(mol, idx)).collect();

        for _ in 0..self.scheme.depth {
            values = mol
                .atoms()
                .map(|idx| {
                    let mut neighbors: Vec<u64> =
                        mol.neighbors(idx).map(|nb| values[nb.index()]).collect();
                    neighbors.sort_unstable();
                    neighbors
                        .into_iter()
                        .fold(fnv1a_update(FNV_OFFSET, values[idx.index()]), |h, v| {
                            fnv1a_update(h, xorshift(v))
                        })
                })
                .collect();
        }

        values.sort_unstable();
        values
            .into_iter()
            .fold(fnv1a_update(FNV_OFFSET, mol.atom_count() as u64), |h, v| {
                xorshift(h ^ v).wrapping_mul(FNV_PRIME)
            })
    }

    fn seed(&self, mol: &Molecule, idx: NodeIndex) -> u64 {
        let atom = mol.atom(idx);
        self.scheme
            .encoders
            .iter()
            .fold(FNV_OFFSET, |h, encoder| match encoder {
                AtomEncoder::Elemental => match atom.atomic_num {
                    Some(z) if z > 0 => fnv1a_update(h, u64::from(z)),
                    _ => fnv1a_bytes(h, atom.symbol.as_bytes()),
                },
                AtomEncoder::BondOrderSum => fnv1a_update(h, u64::from(mol.bond_order_sum(idx))),
                AtomEncoder::Aromaticity => fnv1a_update(
                    h,
                    if atom.is_aromatic {
                        AROMATIC_SEED
                    } else {
                        ALIPHATIC_SEED
                    },
                ),
            })
    }
}

impl Default for MoleculeHasher {
    fn default() -> Self {
        Self::new(HashScheme::functional_group())
    }
}
