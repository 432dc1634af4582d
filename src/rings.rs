use std::collections::{BTreeSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Molecule;

/// Smallest rings through each bond, deduplicated, up to `max_size` atoms.
///
/// Every ring is returned in path order, starting at its first bond's
/// endpoint. This covers all rings of a fused system's SSSR for the ring
/// sizes that matter to aromaticity. The result is sorted by ring size, then
/// by member atoms.
pub fn find_rings(mol: &Molecule, max_size: usize) -> Vec<Vec<NodeIndex>> {
    let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut rings: Vec<Vec<NodeIndex>> = Vec::new();
    for edge in mol.bonds() {
        let Some((u, v)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let Some(path) = shortest_path_avoiding(mol, v, u, edge, max_size) else {
            continue;
        };
        let mut key: Vec<usize> = path.iter().map(|n| n.index()).collect();
        key.sort_unstable();
        if seen.insert(key) {
            rings.push(path);
        }
    }
    rings.sort_by_key(|ring| {
        let mut members: Vec<usize> = ring.iter().map(|n| n.index()).collect();
        members.sort_unstable();
        (ring.len(), members)
    });
    rings
}

/// Breadth-first path `from → to` that does not use `banned`, at most
/// `max_len` atoms long.
fn shortest_path_avoiding(
    mol: &Molecule,
    from: NodeIndex,
    to: NodeIndex,
    banned: EdgeIndex,
    max_len: usize,
) -> Option<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut pred: Vec<Option<NodeIndex>> = vec![None; n];
    let mut depth = vec![usize::MAX; n];
    depth[from.index()] = 1;
    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        if depth[current.index()] >= max_len {
            continue;
        }
        for e in mol.bonds_of(current) {
            if e == banned {
                continue;
            }
            let Some((a, b)) = mol.bond_endpoints(e) else {
                continue;
            };
            let next = if a == current { b } else { a };
            if depth[next.index()] != usize::MAX {
                continue;
            }
            depth[next.index()] = depth[current.index()] + 1;
            pred[next.index()] = Some(current);
            if next == to {
                let mut path = vec![to];
                let mut node = to;
                while let Some(p) = pred[node.index()] {
                    path.push(p);
                    node = p;
                }
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    None
}
