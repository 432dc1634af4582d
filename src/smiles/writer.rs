use std::collections::{BTreeSet, HashSet};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::canonical::canonical_ranks;
use crate::graph_ops::connected_components;
use crate::kekulize::kekule_double_bonds;
use crate::mol::Molecule;
use crate::smiles::builder::implicit_hydrogens;
use crate::smiles::error::WriteError;

/// Anything that turns a molecule into a line-notation string.
pub trait LineNotationWriter {
    fn write(&self, mol: &Molecule) -> Result<String, WriteError>;
}

/// Canonical SMILES: the same string for every atom ordering of a molecule.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalSmiles;

impl LineNotationWriter for CanonicalSmiles {
    fn write(&self, mol: &Molecule) -> Result<String, WriteError> {
        to_canonical_smiles(mol)
    }
}

/// SMILES in input atom order.
pub fn to_smiles(mol: &Molecule) -> Result<String, WriteError> {
    let ranks: Vec<usize> = (0..mol.atom_count()).collect();
    write_with_ranks(mol, &ranks)
}

pub fn to_canonical_smiles(mol: &Molecule) -> Result<String, WriteError> {
    write_with_ranks(mol, &canonical_ranks(mol))
}

fn write_with_ranks(mol: &Molecule, ranks: &[usize]) -> Result<String, WriteError> {
    let mut components = connected_components(mol);
    components.sort_by_key(|c| c.iter().map(|n| ranks[n.index()]).min());
    let kekule = written_kekule_form(mol, ranks);
    let parts = components
        .iter()
        .map(|component| write_fragment(mol, kekule.as_ref(), component, ranks))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("."))
}

/// Aromatic bonds between aromatic atoms are written implicitly. An aromatic
/// bond with a non-aromatic end (an aromatic atom written under another
/// label) needs an explicit order; those come from a Kekulé form chosen in
/// rank order, so the text does not depend on the stored assignment. `None`
/// when no such bond exists or no Kekulé form is found, in which case the
/// stored orders are written.
fn written_kekule_form(mol: &Molecule, ranks: &[usize]) -> Option<HashSet<EdgeIndex>> {
    let needed = mol
        .bonds()
        .any(|e| mol.bond(e).is_aromatic && !between_aromatic_atoms(mol, e));
    if !needed {
        return None;
    }
    kekule_double_bonds(mol, ranks).ok()
}

fn between_aromatic_atoms(mol: &Molecule, edge: EdgeIndex) -> bool {
    mol.bond_endpoints(edge)
        .is_some_and(|(a, b)| mol.atom(a).is_aromatic && mol.atom(b).is_aromatic)
}

/// The order a reader will see for `edge`. Implicit aromatic bonds read as
/// one.
fn written_order(mol: &Molecule, kekule: Option<&HashSet<EdgeIndex>>, edge: EdgeIndex) -> u8 {
    let bond = mol.bond(edge);
    if !bond.is_aromatic {
        return bond.order.valence();
    }
    if between_aromatic_atoms(mol, edge) {
        return 1;
    }
    match kekule {
        Some(doubles) if doubles.contains(&edge) => 2,
        Some(_) => 1,
        None => bond.order.valence(),
    }
}

struct RingBond {
    edge: EdgeIndex,
    other: NodeIndex,
}

struct DfsTree {
    children: Vec<Vec<NodeIndex>>,
    ring_opens: Vec<Vec<RingBond>>,
    ring_closes: Vec<Vec<RingBond>>,
}

fn build_dfs_tree(mol: &Molecule, start: NodeIndex, ranks: &[usize]) -> DfsTree {
    let n = mol.atom_count();
    let mut tree = DfsTree {
        children: (0..n).map(|_| Vec::new()).collect(),
        ring_opens: (0..n).map(|_| Vec::new()).collect(),
        ring_closes: (0..n).map(|_| Vec::new()).collect(),
    };
    let mut visited = vec![false; n];
    let mut used_edge = vec![false; mol.bond_count()];

    let neighbor_lists: Vec<Vec<(NodeIndex, EdgeIndex)>> = mol
        .atoms()
        .map(|node| {
            let mut nbs: Vec<(NodeIndex, EdgeIndex)> = mol
                .bonds_of(node)
                .filter_map(|e| {
                    let (a, b) = mol.bond_endpoints(e)?;
                    Some((if a == node { b } else { a }, e))
                })
                .collect();
            nbs.sort_by_key(|(nb, _)| ranks[nb.index()]);
            nbs
        })
        .collect();

    let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
    visited[start.index()] = true;
    while let Some((node, next)) = stack.last_mut() {
        let node = *node;
        let Some(&(neighbor, edge)) = neighbor_lists[node.index()].get(*next) else {
            stack.pop();
            continue;
        };
        *next += 1;
        if used_edge[edge.index()] {
            continue;
        }
        used_edge[edge.index()] = true;
        if visited[neighbor.index()] {
            tree.ring_opens[neighbor.index()].push(RingBond { edge, other: node });
            tree.ring_closes[node.index()].push(RingBond {
                edge,
                other: neighbor,
            });
        } else {
            visited[neighbor.index()] = true;
            tree.children[node.index()].push(neighbor);
            stack.push((neighbor, 0));
        }
    }
    tree
}

fn write_fragment(
    mol: &Molecule,
    kekule: Option<&HashSet<EdgeIndex>>,
    component: &[NodeIndex],
    ranks: &[usize],
) -> Result<String, WriteError> {
    let Some(&start) = component.iter().min_by_key(|n| ranks[n.index()]) else {
        return Ok(String::new());
    };
    let tree = build_dfs_tree(mol, start, ranks);
    let mut writer = FragmentWriter {
        mol,
        kekule,
        tree: &tree,
        free_digits: (1..=99).collect(),
        open_digits: vec![None; mol.bond_count()],
        out: String::new(),
    };
    writer.write_node(start)?;
    Ok(writer.out)
}

struct FragmentWriter<'a> {
    mol: &'a Molecule,
    kekule: Option<&'a HashSet<EdgeIndex>>,
    tree: &'a DfsTree,
    free_digits: BTreeSet<u8>,
    open_digits: Vec<Option<u8>>,
    out: String,
}

impl FragmentWriter<'_> {
    fn write_node(&mut self, node: NodeIndex) -> Result<(), WriteError> {
        write_atom(self.mol, self.kekule, node, &mut self.out)?;

        for rb in &self.tree.ring_opens[node.index()] {
            let digit = self
                .free_digits
                .pop_first()
                .ok_or(WriteError::TooManyRingClosures)?;
            self.open_digits[rb.edge.index()] = Some(digit);
            write_bond(self.mol, self.kekule, rb.edge, node, rb.other, &mut self.out);
            write_ring_digit(digit, &mut self.out);
        }

        for rb in &self.tree.ring_closes[node.index()] {
            if let Some(digit) = self.open_digits[rb.edge.index()].take() {
                write_ring_digit(digit, &mut self.out);
                self.free_digits.insert(digit);
            }
        }

        let kids = &self.tree.children[node.index()];
        let last = kids.len().saturating_sub(1);
        for (i, &child) in kids.iter().enumerate() {
            let is_branch = i < last;
            if is_branch {
                self.out.push('(');
            }
            if let Some(edge) = self.mol.bond_between(node, child) {
                write_bond(self.mol, self.kekule, edge, node, child, &mut self.out);
            }
            self.write_node(child)?;
            if is_branch {
                self.out.push(')');
            }
        }
        Ok(())
    }
}

fn write_bond(
    mol: &Molecule,
    kekule: Option<&HashSet<EdgeIndex>>,
    edge: EdgeIndex,
    from: NodeIndex,
    to: NodeIndex,
    out: &mut String,
) {
    let between_aromatic = mol.atom(from).is_aromatic && mol.atom(to).is_aromatic;
    if between_aromatic && mol.bond(edge).is_aromatic {
        return;
    }
    match written_order(mol, kekule, edge) {
        1 if between_aromatic => out.push('-'),
        2 => out.push('='),
        3 => out.push('#'),
        _ => {}
    }
}

fn write_ring_digit(digit: u8, out: &mut String) {
    if digit <= 9 {
        out.push(char::from(b'0' + digit));
    } else {
        out.push('%');
        out.push(char::from(b'0' + digit / 10));
        out.push(char::from(b'0' + digit % 10));
    }
}

fn write_atom(
    mol: &Molecule,
    kekule: Option<&HashSet<EdgeIndex>>,
    node: NodeIndex,
    out: &mut String,
) -> Result<(), WriteError> {
    let atom = mol.atom(node);
    if atom.symbol.is_empty() {
        return Err(WriteError::EmptySymbol { atom: node.index() });
    }
    let symbol = if atom.is_aromatic {
        atom.symbol.to_ascii_lowercase()
    } else {
        atom.symbol.clone()
    };

    if can_write_bare(mol, kekule, node) {
        out.push_str(&symbol);
        return Ok(());
    }

    out.push('[');
    if atom.isotope != 0 {
        out.push_str(&atom.isotope.to_string());
    }
    out.push_str(&symbol);
    let h = atom.hydrogen_count();
    if h > 0 {
        out.push('H');
        if h > 1 {
            out.push_str(&h.to_string());
        }
    }
    let charge = atom.formal_charge.unwrap_or(0);
    if charge != 0 {
        out.push(if charge > 0 { '+' } else { '-' });
        if charge.unsigned_abs() > 1 {
            out.push_str(&charge.unsigned_abs().to_string());
        }
    }
    out.push(']');
    Ok(())
}

/// Bare atoms are organic-subset elements or wildcards, neutral, with no
/// isotope, and with exactly the hydrogens a reader would infer.
///
/// The decision looks at the atomic number, not the symbol, so an atom
/// relabelled under a foreign symbol is bracketed exactly when the element
/// it stands for would be.
fn can_write_bare(mol: &Molecule, kekule: Option<&HashSet<EdgeIndex>>, node: NodeIndex) -> bool {
    let atom = mol.atom(node);
    let element = atom.element();
    let writable = match atom.atomic_num {
        Some(0) => true,
        Some(_) => element.is_some_and(|e| e.is_organic_subset()),
        None => false,
    };
    if !writable || atom.isotope != 0 || atom.is_charged() {
        return false;
    }
    if atom.is_aromatic && !matches!(atom.symbol.as_str(), "B" | "C" | "N" | "O" | "P" | "S") {
        return false;
    }
    let bond_sum = mol
        .bonds_of(node)
        .fold(0u8, |sum, e| sum.saturating_add(written_order(mol, kekule, e)));
    atom.hydrogen_count() == implicit_hydrogens(element, atom.is_aromatic, bond_sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::element::Element;
    use crate::graph_ops::renumber_atoms;
    use crate::smiles::parse_smiles;

    fn canonical(smiles: &str) -> String {
        to_canonical_smiles(&parse_smiles(smiles).unwrap()).unwrap()
    }

    fn round_trip(smiles: &str) {
        let mol = parse_smiles(smiles).unwrap();
        let written = to_canonical_smiles(&mol).unwrap();
        let reparsed = parse_smiles(&written).unwrap();
        assert_eq!(mol.atom_count(), reparsed.atom_count(), "{smiles} -> {written}");
        assert_eq!(mol.bond_count(), reparsed.bond_count(), "{smiles} -> {written}");
        assert_eq!(
            to_canonical_smiles(&reparsed).unwrap(),
            written,
            "canonical form not stable for {smiles}"
        );
    }

    #[test]
    fn simple_chains() {
        assert_eq!(canonical("C"), "C");
        assert_eq!(canonical("CCO"), "OCC");
        assert_eq!(canonical("OCC"), "OCC");
        assert_eq!(canonical("C=O"), "O=C");
    }

    #[test]
    fn bracket_atoms() {
        assert_eq!(canonical("[NH4+]"), "[NH4+]");
        assert_eq!(canonical("C[O-]"), "[O-]C");
        assert_eq!(canonical("[13CH4]"), "[13CH4]");
        assert_eq!(canonical("[se]"), "[se]");
        assert_eq!(canonical("[As]"), "[As]");
    }

    #[test]
    fn explicit_hydrogen_stays_bracketed() {
        assert_eq!(canonical("[H]O[c]"), "[H]O[c]");
    }

    #[test]
    fn wildcards() {
        assert_eq!(canonical("*O*"), "*O*");
        assert_eq!(canonical("*OC(*)=O"), "*OC(*)=O");
    }

    #[test]
    fn fragments_joined_with_dot() {
        let s = canonical("C.O");
        assert!(s == "C.O" || s == "O.C", "{s}");
        assert_eq!(canonical("[Na+].[Cl-]"), canonical("[Cl-].[Na+]"));
    }

    #[test]
    fn rings_round_trip() {
        for smi in [
            "c1ccccc1",
            "C1CCCCC1",
            "c1ccc2ccccc2c1",
            "C1CC2CCC1C2",
            "c1ccncc1",
            "O=C1CCC(=O)N1",
            "c1ccc(-c2ccccc2)cc1",
        ] {
            round_trip(smi);
        }
    }

    #[test]
    fn canonical_under_renumbering() {
        for smi in ["OC(=O)c1ccccc1", "CC(C)CN", "C1CC1C(=O)O", "*n(*)*"] {
            let mol = parse_smiles(smi).unwrap();
            let expected = to_canonical_smiles(&mol).unwrap();
            let n = mol.atom_count();
            for offset in 1..n {
                let perm: Vec<usize> = (0..n).map(|i| (i + offset) % n).collect();
                let renum = renumber_atoms(&mol, &perm).unwrap();
                assert_eq!(to_canonical_smiles(&renum).unwrap(), expected, "{smi} offset {offset}");
            }
        }
    }

    #[test]
    fn relabelled_atom_uses_element_rules() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let o = mol.add_atom(Atom::new(Element::O).with_hydrogens(1));
        mol.add_bond(c, o, crate::Bond::default());
        mol.atom_mut(c).symbol = "Ce".to_string();
        assert_eq!(to_smiles(&mol).unwrap(), "CeO");
    }

    #[test]
    fn empty_symbol_is_an_error() {
        let mut mol = Molecule::new();
        let mut atom = Atom::new(Element::C);
        atom.symbol.clear();
        mol.add_atom(atom);
        assert_eq!(
            to_smiles(&mol).unwrap_err(),
            WriteError::EmptySymbol { atom: 0 }
        );
    }

    #[test]
    fn writer_trait() {
        let mol = parse_smiles("OCC").unwrap();
        assert_eq!(CanonicalSmiles.write(&mol).unwrap(), "OCC");
    }
}
