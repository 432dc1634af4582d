//! SMILES reading and writing.
//!
//! The reader keeps aromaticity as written: lowercase atoms are flagged
//! aromatic and bonds between them are flagged aromatic. Aromatic bonds are
//! then given a Kekulé order, so bond-order sums do not depend on whether a
//! ring was written in lowercase or Kekulé form. `*` atoms are generic
//! substituents; bracket symbols the periodic table does not know become
//! plain wildcards.

mod builder;
pub mod error;
mod parse_tree;
mod tokenizer;
mod writer;

use crate::kekulize::kekulize;
use crate::mol::Molecule;
pub use error::{SmilesError, WriteError};
pub(crate) use builder::implicit_hydrogens;
pub use writer::{to_canonical_smiles, to_smiles, CanonicalSmiles, LineNotationWriter};

pub fn parse_smiles(s: &str) -> Result<Molecule, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tree = parse_tree::build_parse_tree(&tokens)?;
    let mut mol = builder::build_mol(&tree);
    kekulize(&mut mol)?;
    Ok(mol)
}
