use std::collections::HashMap;

use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, Token};

#[derive(Debug, Clone)]
pub struct ParseEdge {
    pub a: usize,
    pub b: usize,
    pub bond: Option<BondToken>,
}

#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    pub atoms: Vec<AtomToken>,
    pub edges: Vec<ParseEdge>,
}

struct RingOpen {
    atom: usize,
    bond: Option<BondToken>,
}

pub fn build_parse_tree(tokens: &[Token]) -> Result<ParseTree, SmilesError> {
    let mut tree = ParseTree::default();
    let mut branches: Vec<(usize, usize)> = Vec::new(); // (atom, paren pos)
    let mut current: Option<usize> = None;
    let mut pending_bond: Option<(BondToken, usize)> = None;
    let mut ring_opens: HashMap<u16, RingOpen> = HashMap::new();

    for token in tokens {
        match token {
            Token::Atom(atom_tok) => {
                let idx = tree.atoms.len();
                tree.atoms.push(atom_tok.clone());
                if let Some(cur) = current {
                    tree.edges.push(ParseEdge {
                        a: cur,
                        b: idx,
                        bond: pending_bond.take().map(|(b, _)| b),
                    });
                }
                current = Some(idx);
            }
            Token::Bond(bond, pos) => {
                if current.is_none() || pending_bond.is_some() {
                    return Err(SmilesError::DanglingBond { pos: *pos });
                }
                pending_bond = Some((*bond, *pos));
            }
            Token::RingClosure { digit, pos } => {
                let cur = current.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                let bond = pending_bond.take().map(|(b, _)| b);
                match ring_opens.remove(digit) {
                    Some(open) => {
                        let ring_bond = match (bond, open.bond) {
                            (Some(b1), Some(b2)) if b1 != b2 => {
                                return Err(SmilesError::RingBondConflict { digit: *digit })
                            }
                            (b1, b2) => b1.or(b2),
                        };
                        let duplicate = open.atom == cur
                            || tree.edges.iter().any(|e| {
                                (e.a == cur && e.b == open.atom) || (e.a == open.atom && e.b == cur)
                            });
                        if duplicate {
                            return Err(SmilesError::DuplicateRingBond {
                                digit: *digit,
                                pos: *pos,
                            });
                        }
                        tree.edges.push(ParseEdge {
                            a: open.atom,
                            b: cur,
                            bond: ring_bond,
                        });
                    }
                    None => {
                        ring_opens.insert(*digit, RingOpen { atom: cur, bond });
                    }
                }
            }
            Token::OpenParen(pos) => {
                let cur = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                branches.push((cur, *pos));
            }
            Token::CloseParen(pos) => {
                if let Some((_, bond_pos)) = pending_bond {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                let (atom, _) = branches.pop().ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                current = Some(atom);
            }
            Token::Dot(pos) => {
                if pending_bond.is_some() {
                    return Err(SmilesError::DanglingBond { pos: *pos });
                }
                current = None;
            }
        }
    }

    if let Some((_, pos)) = pending_bond {
        return Err(SmilesError::DanglingBond { pos });
    }
    if let Some(&(_, pos)) = branches.last() {
        return Err(SmilesError::UnmatchedParen { pos });
    }
    if let Some(&digit) = ring_opens.keys().min() {
        return Err(SmilesError::UnclosedRing { digit });
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::tokenizer::tokenize;

    fn tree(s: &str) -> Result<ParseTree, SmilesError> {
        build_parse_tree(&tokenize(s)?)
    }

    #[test]
    fn branches_attach_to_branch_point() {
        let t = tree("CC(O)N").unwrap();
        assert_eq!(t.atoms.len(), 4);
        let pairs: Vec<(usize, usize)> = t.edges.iter().map(|e| (e.a, e.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn ring_closure_bond_from_either_end() {
        let t = tree("C=1CCC1").unwrap();
        assert_eq!(t.edges.last().unwrap().bond, Some(BondToken::Double));
        let t = tree("C1CCC=1").unwrap();
        assert_eq!(t.edges.last().unwrap().bond, Some(BondToken::Double));
    }

    #[test]
    fn dot_disconnects() {
        let t = tree("C.C").unwrap();
        assert!(t.edges.is_empty());
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(tree("C(C"), Err(SmilesError::UnmatchedParen { .. })));
        assert!(matches!(tree("CC)"), Err(SmilesError::UnmatchedParen { .. })));
        assert!(matches!(tree("C1CC"), Err(SmilesError::UnclosedRing { digit: 1 })));
        assert!(matches!(tree("C="), Err(SmilesError::DanglingBond { .. })));
        assert!(matches!(tree("=C"), Err(SmilesError::DanglingBond { .. })));
        assert!(matches!(
            tree("C=1CCC#1"),
            Err(SmilesError::RingBondConflict { digit: 1 })
        ));
        assert!(matches!(tree("C11"), Err(SmilesError::DuplicateRingBond { .. })));
    }
}
