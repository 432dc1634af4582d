use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::bond::Bond;

/// A molecular graph: atoms as nodes, bonds as edges, plus a free-form
/// property bag (title, identifiers, …) that travels with the structure.
///
/// Node indices are stable as long as no atom is removed. The pipeline never
/// removes atoms from a molecule it was handed; fragment selection builds a
/// new `Molecule` instead.
#[derive(Clone, Default)]
pub struct Molecule {
    graph: UnGraph<Atom, Bond>,
    properties: HashMap<String, String>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &UnGraph<Atom, Bond> {
        &self.graph
    }

    /// # Panics
    ///
    /// Panics if `idx` does not belong to this molecule. Use
    /// [`Molecule::get_atom`] for a checked lookup.
    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut Atom {
        &mut self.graph[idx]
    }

    pub fn get_atom(&self, idx: NodeIndex) -> Option<&Atom> {
        self.graph.node_weight(idx)
    }

    pub fn get_atom_mut(&mut self, idx: NodeIndex) -> Option<&mut Atom> {
        self.graph.node_weight_mut(idx)
    }

    /// Swaps the atom at `idx` for `atom`, keeping every bond attached.
    /// Returns the atom that was there, or `None` if `idx` is out of range.
    pub fn replace_atom(&mut self, idx: NodeIndex, atom: Atom) -> Option<Atom> {
        self.graph
            .node_weight_mut(idx)
            .map(|slot| std::mem::replace(slot, atom))
    }

    pub fn bond(&self, idx: EdgeIndex) -> &Bond {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut Bond {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Sum of the orders of all bonds at `idx`. Aromatic bonds count with
    /// their Kekulé order.
    pub fn bond_order_sum(&self, idx: NodeIndex) -> u8 {
        self.graph
            .edges(idx)
            .fold(0u8, |sum, e| sum.saturating_add(e.weight().order.valence()))
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Copies every property of `other` onto this molecule, overwriting
    /// values under the same key.
    pub fn copy_properties_from(&mut self, other: &Molecule) {
        self.properties
            .extend(other.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Atom and bond equality by index, ignoring the property bag.
    pub fn same_structure(&self, other: &Molecule) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        let atoms_match = self
            .atoms()
            .all(|idx| other.get_atom(idx) == Some(self.atom(idx)));
        atoms_match
            && self.bonds().all(|idx| {
                other.graph.edge_weight(idx) == Some(self.bond(idx))
                    && other.bond_endpoints(idx) == self.bond_endpoints(idx)
            })
    }
}

impl PartialEq for Molecule {
    fn eq(&self, other: &Self) -> bool {
        self.same_structure(other) && self.properties == other.properties
    }
}

impl std::fmt::Debug for Molecule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Molecule")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("properties", &self.properties)
            .finish()
    }
}
