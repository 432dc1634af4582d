use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::Molecule;
use crate::smiles::parse_tree::ParseTree;
use crate::smiles::tokenizer::{AtomToken, BondToken};

pub fn build_mol(tree: &ParseTree) -> Molecule {
    let mut mol = Molecule::new();
    let indices: Vec<NodeIndex> = tree
        .atoms
        .iter()
        .map(|tok| mol.add_atom(atom_from_token(tok)))
        .collect();

    for edge in &tree.edges {
        let bond = resolve_bond(
            edge.bond,
            tree.atoms[edge.a].is_aromatic,
            tree.atoms[edge.b].is_aromatic,
        );
        mol.add_bond(indices[edge.a], indices[edge.b], bond);
    }

    for (tok, &idx) in tree.atoms.iter().zip(&indices) {
        if !tok.is_bracket {
            let h = implicit_hydrogens(tok.element, tok.is_aromatic, mol.bond_order_sum(idx));
            mol.atom_mut(idx).implicit_hydrogens = Some(h);
        }
    }

    mol
}

fn atom_from_token(tok: &AtomToken) -> Atom {
    let mut atom = match tok.element {
        Some(element) => Atom::new(element),
        None if tok.symbol == "*" => Atom::generic(),
        None => Atom::unknown(),
    };
    atom.is_aromatic = tok.is_aromatic && !atom.is_generic;
    atom.isotope = tok.isotope;
    atom.formal_charge = Some(tok.charge);
    atom.implicit_hydrogens = tok.hcount;
    atom
}

fn resolve_bond(tok: Option<BondToken>, from_aromatic: bool, to_aromatic: bool) -> Bond {
    match tok {
        Some(BondToken::Single) | Some(BondToken::Up) | Some(BondToken::Down) => {
            Bond::new(BondOrder::Single)
        }
        Some(BondToken::Double) => Bond::new(BondOrder::Double),
        Some(BondToken::Triple) => Bond::new(BondOrder::Triple),
        Some(BondToken::Aromatic) => Bond::aromatic(),
        None if from_aromatic && to_aromatic => Bond::aromatic(),
        None => Bond::new(BondOrder::Single),
    }
}

/// Hydrogens a reader assigns to a bare atom: fill up to the smallest
/// default valence that covers the bond-order sum, one less for aromatic
/// atoms. Wildcards and elements without default valences get none.
pub(crate) fn implicit_hydrogens(element: Option<Element>, is_aromatic: bool, bond_sum: u8) -> u8 {
    let Some(element) = element else {
        return 0;
    };
    let Some(&target) = element.default_valences().iter().find(|&&v| v >= bond_sum) else {
        return 0;
    };
    let h = target - bond_sum;
    if is_aromatic {
        h.saturating_sub(1)
    } else {
        h
    }
}
