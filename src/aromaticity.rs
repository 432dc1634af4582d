use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::bond::BondOrder;
use crate::kekulize::{is_kekulized, kekulize, KekulizeError};
use crate::mol::Molecule;
use crate::rings::find_rings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AromaticityError {
    #[error("ring perception found {found} rings, more than the limit of {limit}")]
    TooManyRings { found: usize, limit: usize },
    #[error(transparent)]
    Kekulize(#[from] KekulizeError),
}

/// Decides which atoms and bonds of a molecule are aromatic.
pub trait AromaticityModel {
    /// Updates aromaticity flags in place. Returns `true` when any atom is
    /// aromatic afterwards.
    fn apply(&self, mol: &mut Molecule) -> Result<bool, AromaticityError>;
}

/// Leaves the flags as parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preserve;

impl AromaticityModel for Preserve {
    fn apply(&self, mol: &mut Molecule) -> Result<bool, AromaticityError> {
        Ok(mol.atoms().any(|idx| mol.atom(idx).is_aromatic))
    }
}

/// Hückel 4n+2 counting over the smallest rings through each bond.
///
/// Flags are only ever added: atoms already marked aromatic stay aromatic,
/// and a ring whose atoms are all marked aromatic is accepted without
/// counting. Generic substituents never become aromatic. Aromatic bonds
/// without a valid Kekulé order afterwards are kekulized.
#[derive(Debug, Clone, Copy)]
pub struct Huckel {
    pub max_ring_size: usize,
    pub max_rings: usize,
}

impl Default for Huckel {
    fn default() -> Self {
        Self {
            max_ring_size: 8,
            max_rings: 1024,
        }
    }
}

const SP2_CAPABLE: [u8; 9] = [5, 6, 7, 8, 15, 16, 33, 34, 52];

impl AromaticityModel for Huckel {
    fn apply(&self, mol: &mut Molecule) -> Result<bool, AromaticityError> {
        let rings = find_rings(mol, self.max_ring_size);
        if rings.len() > self.max_rings {
            return Err(AromaticityError::TooManyRings {
                found: rings.len(),
                limit: self.max_rings,
            });
        }

        let aromatic_rings: Vec<&Vec<NodeIndex>> =
            rings.iter().filter(|ring| is_aromatic_ring(mol, ring)).collect();

        for ring in aromatic_rings {
            for i in 0..ring.len() {
                let a = ring[i];
                let b = ring[(i + 1) % ring.len()];
                mol.atom_mut(a).is_aromatic = true;
                if let Some(edge) = mol.bond_between(a, b) {
                    mol.bond_mut(edge).is_aromatic = true;
                }
            }
        }
        if !is_kekulized(mol) {
            kekulize(mol)?;
        }
        Ok(mol.atoms().any(|idx| mol.atom(idx).is_aromatic))
    }
}

fn is_aromatic_ring(mol: &Molecule, ring: &[NodeIndex]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let sp2_capable = ring.iter().all(|&idx| {
        let atom = mol.atom(idx);
        !atom.is_generic && atom.atomic_num.is_some_and(|z| SP2_CAPABLE.contains(&z))
    });
    if !sp2_capable {
        return false;
    }
    if ring.iter().all(|&idx| mol.atom(idx).is_aromatic) {
        return true;
    }

    let mut total: u32 = 0;
    for (i, &idx) in ring.iter().enumerate() {
        let prev = ring[(i + ring.len() - 1) % ring.len()];
        let next = ring[(i + 1) % ring.len()];
        for (a, b) in [(prev, idx), (idx, next)] {
            let triple = mol
                .bond_between(a, b)
                .is_some_and(|e| mol.bond(e).order == BondOrder::Triple);
            if triple {
                return false;
            }
        }
        match pi_electrons(mol, idx, prev, next) {
            Some(e) => total += u32::from(e),
            None => return false,
        }
    }
    is_huckel(total)
}

fn pi_electrons(mol: &Molecule, idx: NodeIndex, prev: NodeIndex, next: NodeIndex) -> Option<u8> {
    let atom = mol.atom(idx);
    let z = atom.atomic_num?;
    let charge = atom.formal_charge.unwrap_or(0);
    let has_double = mol
        .bonds_of(idx)
        .any(|e| mol.bond(e).order == BondOrder::Double);
    let has_double_in_ring = [prev, next].iter().any(|&nb| {
        mol.bond_between(idx, nb)
            .is_some_and(|e| mol.bond(e).order == BondOrder::Double)
    });
    let degree = mol.degree(idx) + usize::from(atom.hydrogen_count());

    if atom.is_aromatic {
        return Some(match z {
            8 | 16 | 34 | 52 => 2,
            7 | 15 if atom.hydrogen_count() > 0 || mol.degree(idx) == 3 => 2,
            _ => 1,
        });
    }

    match (z, charge) {
        (6, 0) => has_double.then_some(1),
        (6, -1) => Some(2),
        (6, 1) => Some(u8::from(has_double)),
        (7 | 15 | 33, 0) if has_double => Some(1),
        (7 | 15 | 33, 0) if degree <= 3 => Some(2),
        (7, 1) => has_double_in_ring.then_some(1),
        (8 | 16 | 34 | 52, 0) if has_double_in_ring => Some(1),
        (8 | 16 | 34 | 52, 0) if mol.degree(idx) == 2 => Some(2),
        (5, 0) => Some(u8::from(has_double)),
        _ => None,
    }
}

fn is_huckel(pi_electrons: u32) -> bool {
    pi_electrons >= 2 && (pi_electrons - 2) % 4 == 0
}
