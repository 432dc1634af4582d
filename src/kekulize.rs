//! Kekulé assignment for aromatic bond systems.
//!
//! Aromatic bonds keep their aromatic flag and receive a concrete single or
//! double order, so a ring read from lowercase SMILES has the same bond-order
//! sums as the same ring written in Kekulé form. The assignment is a maximum
//! matching over the atoms that still need a double bond, grown by
//! augmenting paths.

use std::collections::{HashSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

use crate::bond::BondOrder;
use crate::element::Element;
use crate::mol::Molecule;

/// No Kekulé structure exists for the aromatic system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KekulizeError {
    /// These atoms could not be assigned a double bond.
    #[error("cannot kekulize aromatic system: unmatched atoms {0:?}")]
    Unkekulizable(Vec<usize>),
}

/// Gives every aromatic bond a Kekulé order in place, matching atoms in index
/// order. On error the molecule is left untouched.
pub fn kekulize(mol: &mut Molecule) -> Result<(), KekulizeError> {
    let priority: Vec<usize> = (0..mol.atom_count()).collect();
    let doubles = kekule_double_bonds(mol, &priority)?;
    let aromatic: Vec<EdgeIndex> = mol.bonds().filter(|&e| mol.bond(e).is_aromatic).collect();
    for edge in aromatic {
        mol.bond_mut(edge).order = if doubles.contains(&edge) {
            BondOrder::Double
        } else {
            BondOrder::Single
        };
    }
    Ok(())
}

/// `true` when the aromatic bonds already form a Kekulé structure: every
/// atom that needs a double bond has exactly one aromatic double bond, and
/// no other atom has any.
pub fn is_kekulized(mol: &Molecule) -> bool {
    mol.atoms().all(|idx| {
        let mut aromatic = mol
            .bonds_of(idx)
            .map(|e| mol.bond(e))
            .filter(|b| b.is_aromatic)
            .peekable();
        if aromatic.peek().is_none() {
            return true;
        }
        let doubles = aromatic.filter(|b| b.order == BondOrder::Double).count();
        doubles == usize::from(needs_double_bond(mol, idx))
    })
}

/// The aromatic bonds that take order two in a Kekulé structure.
///
/// `priority` ranks the atoms, lowest first, and must cover every atom.
/// Matching starts from atoms in that order and explores neighbours in that
/// order, so isomorphic molecules ranked alike get the same assignment.
pub fn kekule_double_bonds(
    mol: &Molecule,
    priority: &[usize],
) -> Result<HashSet<EdgeIndex>, KekulizeError> {
    let n = mol.atom_count();
    let mut aromatic_adj: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![Vec::new(); n];
    for edge in mol.bonds().filter(|&e| mol.bond(e).is_aromatic) {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            aromatic_adj[a.index()].push((b, edge));
            aromatic_adj[b.index()].push((a, edge));
        }
    }
    for adj in &mut aromatic_adj {
        adj.sort_by_key(|(nb, _)| priority[nb.index()]);
    }

    let needs_double: Vec<bool> = mol
        .atoms()
        .map(|idx| !aromatic_adj[idx.index()].is_empty() && needs_double_bond(mol, idx))
        .collect();
    let mut candidates: Vec<NodeIndex> = mol.atoms().filter(|v| needs_double[v.index()]).collect();
    candidates.sort_by_key(|v| priority[v.index()]);

    let mut matched_edge: Vec<Option<EdgeIndex>> = vec![None; n];
    for &start in &candidates {
        if matched_edge[start.index()].is_none() {
            augment(mol, &aromatic_adj, &needs_double, &mut matched_edge, start);
        }
    }

    let mut unmatched: Vec<usize> = candidates
        .iter()
        .filter(|v| matched_edge[v.index()].is_none())
        .map(|v| v.index())
        .collect();
    if !unmatched.is_empty() {
        unmatched.sort_unstable();
        return Err(KekulizeError::Unkekulizable(unmatched));
    }
    Ok(matched_edge.into_iter().flatten().collect())
}

/// Counting aromatic bonds as single, the atom is one short of its target
/// valence, or two short while charged and without hydrogens.
fn needs_double_bond(mol: &Molecule, idx: NodeIndex) -> bool {
    let atom = mol.atom(idx);
    let Some(element) = atom.element() else {
        return false;
    };
    let bonds = mol.bonds_of(idx).fold(0u8, |sum, e| {
        let bond = mol.bond(e);
        let order = if bond.is_aromatic { 1 } else { bond.order.valence() };
        sum.saturating_add(order)
    });
    let hydrogens = atom.hydrogen_count();
    let used = bonds.saturating_add(hydrogens);
    let charge = atom.formal_charge.unwrap_or(0);

    match target_valence(element, used, charge) {
        Some(target) => {
            let gap = target - used;
            gap == 1 || (gap == 2 && hydrogens == 0 && charge != 0)
        }
        None => false,
    }
}

fn target_valence(element: Element, used: u8, formal_charge: i8) -> Option<u8> {
    let charge = i16::from(formal_charge);
    element
        .default_valences()
        .iter()
        .filter_map(|&v| u8::try_from(i16::from(v) + charge).ok().filter(|&v| v > 0))
        .find(|&v| v >= used)
}

fn augment(
    mol: &Molecule,
    aromatic_adj: &[Vec<(NodeIndex, EdgeIndex)>],
    needs_double: &[bool],
    matched_edge: &mut [Option<EdgeIndex>],
    start: NodeIndex,
) {
    let n = mol.atom_count();
    let mut prev: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    visited[start.index()] = true;
    queue.push_back(start);

    while let Some(u) = queue.pop_front() {
        for &(v, e) in &aromatic_adj[u.index()] {
            if !needs_double[v.index()] || visited[v.index()] {
                continue;
            }
            if Some(e) == matched_edge[u.index()] {
                continue;
            }
            visited[v.index()] = true;
            prev[v.index()] = Some((u, e));

            let Some(matched) = matched_edge[v.index()] else {
                flip_path(matched_edge, &prev, start, v);
                return;
            };
            let Some((a, b)) = mol.bond_endpoints(matched) else {
                continue;
            };
            let w = if a == v { b } else { a };
            if !visited[w.index()] {
                visited[w.index()] = true;
                prev[w.index()] = Some((v, matched));
                queue.push_back(w);
            }
        }
    }
}

fn flip_path(
    matched_edge: &mut [Option<EdgeIndex>],
    prev: &[Option<(NodeIndex, EdgeIndex)>],
    start: NodeIndex,
    end: NodeIndex,
) {
    let mut cur = end;
    let mut is_new_match = true;
    while cur != start {
        let Some((p, e)) = prev[cur.index()] else {
            break;
        };
        if is_new_match {
            matched_edge[cur.index()] = Some(e);
            matched_edge[p.index()] = Some(e);
        }
        is_new_match = !is_new_match;
        cur = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::smiles::parse_smiles;

    fn double_count(mol: &Molecule, idx: NodeIndex) -> usize {
        mol.bonds_of(idx)
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count()
    }

    fn hand_built_benzene() -> Molecule {
        let mut mol = Molecule::new();
        let ring: Vec<NodeIndex> = (0..6)
            .map(|_| mol.add_atom(Atom::new(Element::C).with_hydrogens(1).aromatic()))
            .collect();
        for i in 0..6 {
            mol.add_bond(ring[i], ring[(i + 1) % 6], Bond::aromatic());
        }
        mol
    }

    #[test]
    fn benzene() {
        let mut mol = hand_built_benzene();
        assert!(!is_kekulized(&mol));
        kekulize(&mut mol).unwrap();
        assert!(is_kekulized(&mol));
        for idx in mol.atoms() {
            assert_eq!(double_count(&mol, idx), 1);
        }
        assert!(mol.bonds().all(|e| mol.bond(e).is_aromatic));
    }

    #[test]
    fn naphthalene() {
        let mol = parse_smiles("c1ccc2ccccc2c1").unwrap();
        let doubles = mol
            .bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 5);
        assert!(mol.atoms().all(|idx| double_count(&mol, idx) == 1));
    }

    #[test]
    fn pyrrole_nitrogen_keeps_single_bonds() {
        let mol = parse_smiles("c1cc[nH]c1").unwrap();
        assert_eq!(double_count(&mol, NodeIndex::new(3)), 0);
        let mol = parse_smiles("*n1cccc1").unwrap();
        assert_eq!(double_count(&mol, NodeIndex::new(1)), 0);
        assert!(is_kekulized(&mol));
    }

    #[test]
    fn exocyclic_double_bond_is_respected() {
        let mol = parse_smiles("Cn1cnc2c1c(=O)n(C)c(=O)n2C").unwrap();
        assert!(is_kekulized(&mol));
        assert_eq!(double_count(&mol, NodeIndex::new(6)), 1);
    }

    #[test]
    fn odd_ring_cannot_be_kekulized() {
        let mut mol = hand_built_benzene();
        mol.atom_mut(NodeIndex::new(0)).implicit_hydrogens = Some(2);
        let before = mol.clone();
        assert_eq!(
            kekulize(&mut mol),
            Err(KekulizeError::Unkekulizable(vec![5]))
        );
        assert_eq!(mol, before);
    }

    #[test]
    fn priority_decides_between_kekule_forms() {
        let mol = hand_built_benzene();
        let forward = kekule_double_bonds(&mol, &[0, 1, 2, 3, 4, 5]).unwrap();
        let shifted = kekule_double_bonds(&mol, &[5, 0, 1, 2, 3, 4]).unwrap();
        assert_eq!(forward.len(), 3);
        assert_eq!(shifted.len(), 3);
        assert_ne!(forward, shifted);
    }
}
