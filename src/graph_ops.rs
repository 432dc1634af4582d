use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::mol::Molecule;

/// Connected components, each sorted by node index.
///
/// Components are returned in order of their lowest atom index, so the
/// first component is the one containing atom 0.
pub fn connected_components(mol: &Molecule) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for node in mol.atoms() {
        if visited[node.index()] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            component.push(current);
            for neighbor in mol.neighbors(current) {
                if !visited[neighbor.index()] {
                    stack.push(neighbor);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components
}

pub fn num_components(mol: &Molecule) -> usize {
    connected_components(mol).len()
}

/// Builds a new molecule from `component`, keeping the atoms' relative order.
/// Bonds leaving the component are dropped. Properties are not copied.
pub fn extract_fragment(mol: &Molecule, component: &[NodeIndex]) -> Molecule {
    let mut frag = Molecule::new();
    let mut index_map: Vec<Option<NodeIndex>> = vec![None; mol.atom_count()];
    for &old_idx in component {
        index_map[old_idx.index()] = Some(frag.add_atom(mol.atom(old_idx).clone()));
    }
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        if let (Some(na), Some(nb)) = (index_map[a.index()], index_map[b.index()]) {
            frag.add_bond(na, nb, mol.bond(edge).clone());
        }
    }
    frag
}

pub fn get_fragments(mol: &Molecule) -> Vec<Molecule> {
    connected_components(mol)
        .iter()
        .map(|component| extract_fragment(mol, component))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenumberError {
    #[error("new_order length {got} != atom count {expected}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("new_order is not a valid permutation")]
    InvalidPermutation,
}

/// Rebuilds `mol` with its atoms in a new order: `new_order[new_idx] = old_idx`.
///
/// Bonds are re-added in their original edge order. Properties carry over.
pub fn renumber_atoms(mol: &Molecule, new_order: &[usize]) -> Result<Molecule, RenumberError> {
    let n = mol.atom_count();
    if new_order.len() != n {
        return Err(RenumberError::LengthMismatch {
            expected: n,
            got: new_order.len(),
        });
    }
    let mut seen = vec![false; n];
    for &old_idx in new_order {
        if old_idx >= n || seen[old_idx] {
            return Err(RenumberError::InvalidPermutation);
        }
        seen[old_idx] = true;
    }

    let mut new_mol = Molecule::new();
    for &old_idx in new_order {
        new_mol.add_atom(mol.atom(NodeIndex::new(old_idx)).clone());
    }

    let mut old_to_new = vec![0usize; n];
    for (new_idx, &old_idx) in new_order.iter().enumerate() {
        old_to_new[old_idx] = new_idx;
    }

    for edge in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            new_mol.add_bond(
                NodeIndex::new(old_to_new[a.index()]),
                NodeIndex::new(old_to_new[b.index()]),
                mol.bond(edge).clone(),
            );
        }
    }
    new_mol.copy_properties_from(mol);
    Ok(new_mol)
}
