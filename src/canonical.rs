use petgraph::graph::NodeIndex;

use crate::bond::Bond;
use crate::mol::Molecule;

/// Per-atom starting point of the ranking. Field order is comparison order:
/// low-degree atoms rank first, so chains are written from their ends.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
struct AtomInvariant {
    degree: usize,
    hydrogen_count: u8,
    atomic_num: u8,
    symbol: String,
    formal_charge: i8,
    isotope: u16,
    is_aromatic: bool,
    bonds: Vec<(u8, bool)>,
}

/// Aromatic bonds rank as one class whatever Kekulé order they carry.
fn bond_label(bond: &Bond) -> u8 {
    if bond.is_aromatic {
        1
    } else {
        bond.order.valence()
    }
}

fn atom_invariant(mol: &Molecule, idx: NodeIndex) -> AtomInvariant {
    let atom = mol.atom(idx);
    let mut bonds: Vec<(u8, bool)> = mol
        .bonds_of(idx)
        .map(|e| {
            let bond = mol.bond(e);
            (bond_label(bond), bond.is_aromatic)
        })
        .collect();
    bonds.sort_unstable();
    AtomInvariant {
        degree: mol.degree(idx),
        hydrogen_count: atom.hydrogen_count(),
        atomic_num: atom.atomic_num.unwrap_or(u8::MAX),
        symbol: atom.symbol.clone(),
        formal_charge: atom.formal_charge.unwrap_or(0),
        isotope: atom.isotope,
        is_aromatic: atom.is_aromatic,
        bonds,
    }
}

/// Rank of each key: the position of its first occurrence after sorting.
/// Equal keys share a rank.
fn ranks_from_keys<K: Ord>(keys: &[K]) -> Vec<usize> {
    let n = keys.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut ranks = vec![0usize; n];
    for pos in 1..n {
        let (prev, cur) = (order[pos - 1], order[pos]);
        ranks[cur] = if keys[cur] == keys[prev] { ranks[prev] } else { pos };
    }
    ranks
}

fn count_distinct(ranks: &[usize]) -> usize {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

fn neighbor_signature(mol: &Molecule, idx: NodeIndex, ranks: &[usize]) -> Vec<(usize, u8)> {
    let mut sig: Vec<(usize, u8)> = mol
        .bonds_of(idx)
        .filter_map(|e| {
            let (a, b) = mol.bond_endpoints(e)?;
            let other = if a == idx { b } else { a };
            Some((ranks[other.index()], bond_label(mol.bond(e))))
        })
        .collect();
    sig.sort_unstable();
    sig
}

/// Splits rank classes by their neighbors' ranks until nothing changes.
fn refine(mol: &Molecule, ranks: &mut Vec<usize>) {
    let mut distinct = count_distinct(ranks);
    loop {
        let keys: Vec<(usize, Vec<(usize, u8)>)> = mol
            .atoms()
            .map(|idx| (ranks[idx.index()], neighbor_signature(mol, idx, ranks)))
            .collect();
        let next = ranks_from_keys(&keys);
        let next_distinct = count_distinct(&next);
        if next_distinct <= distinct {
            return;
        }
        *ranks = next;
        distinct = next_distinct;
    }
}

fn lowest_tied_rank(ranks: &[usize]) -> Option<usize> {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
}

fn trace(mol: &Molecule, ranks: &[usize]) -> Vec<(usize, Vec<(usize, u8)>)> {
    let mut t: Vec<(usize, Vec<(usize, u8)>)> = mol
        .atoms()
        .map(|idx| (ranks[idx.index()], neighbor_signature(mol, idx, ranks)))
        .collect();
    t.sort();
    t
}

/// Canonical rank of every atom, indexed by node index.
///
/// Ranks form a permutation of `0..atom_count`. Ties that survive
/// neighborhood refinement are broken by trying each atom of the lowest tied
/// class and keeping the candidate whose refined graph trace is smallest.
pub fn canonical_ranks(mol: &Molecule) -> Vec<usize> {
    let n = mol.atom_count();
    if n == 0 {
        return Vec::new();
    }
    let invariants: Vec<AtomInvariant> = mol.atoms().map(|idx| atom_invariant(mol, idx)).collect();
    let mut ranks = ranks_from_keys(&invariants);
    refine(mol, &mut ranks);

    while let Some(tied) = lowest_tied_rank(&ranks) {
        let mut best: Option<(Vec<(usize, Vec<(usize, u8)>)>, Vec<usize>)> = None;
        for candidate in (0..n).filter(|&i| ranks[i] == tied) {
            let mut trial: Vec<usize> = ranks
                .iter()
                .enumerate()
                .map(|(i, &r)| if r == tied && i != candidate { r + 1 } else { r })
                .collect();
            refine(mol, &mut trial);
            let t = trace(mol, &trial);
            if best.as_ref().map_or(true, |(best_trace, _)| t < *best_trace) {
                best = Some((t, trial));
            }
        }
        match best {
            Some((_, trial)) => ranks = trial,
            None => break,
        }
    }
    ranks
}
