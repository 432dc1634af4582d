//! Pseudo-SMILES: canonical SMILES in which aromatic atoms are written
//! `C*`, `N*`, … and generic substituents `R`.
//!
//! The canonical writer only knows real elements, so encoding runs in three
//! steps. Every atom to be marked is swapped for a carrier atom with a rare
//! element symbol (see [`PlaceholderTable`]), the molecule is written, and
//! the carriers are replaced in the text by their markers. The original
//! atoms are put back afterwards, whatever happened in between.
//!
//! The molecule is borrowed mutably for the whole call. Between the swap and
//! the restore it holds carrier atoms, so nothing else may touch it.

use std::collections::BTreeMap;

use log::error;
use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::error::CodecError;
use crate::mol::Molecule;
use crate::placeholder::{PlaceholderEntry, PlaceholderTable};
use crate::smiles::{CanonicalSmiles, LineNotationWriter};

/// Pseudo-SMILES of `mol` with the standard table and the canonical writer.
///
/// ```
/// use fgprep::{parse_smiles, pseudo_smiles::pseudo_smiles};
///
/// let mut mol = parse_smiles("*n(*)*").unwrap();
/// assert_eq!(pseudo_smiles(&mut mol).unwrap(), "RN*(R)R");
/// ```
pub fn pseudo_smiles(mol: &mut Molecule) -> Result<String, CodecError> {
    PseudoSmilesEncoder::default().encode(mol)
}

#[derive(Clone, Copy)]
pub struct PseudoSmilesEncoder<'a> {
    table: &'a PlaceholderTable,
    writer: &'a dyn LineNotationWriter,
}

impl Default for PseudoSmilesEncoder<'static> {
    fn default() -> Self {
        Self {
            table: PlaceholderTable::standard(),
            writer: &CanonicalSmiles,
        }
    }
}

impl<'a> PseudoSmilesEncoder<'a> {
    pub fn new(table: &'a PlaceholderTable, writer: &'a dyn LineNotationWriter) -> Self {
        Self { table, writer }
    }

    /// Encodes `mol`. On return, successful or not, every atom of `mol` is
    /// what it was before the call.
    pub fn encode(&self, mol: &mut Molecule) -> Result<String, CodecError> {
        let guard = PlaceholderGuard::install(mol, self.table)?;
        let written = self.writer.write(guard.molecule());
        guard.finish()?;
        Ok(self.table.restore_text(&written?))
    }
}

struct Swapped {
    carrier: Atom,
    original: Atom,
}

/// Holds a molecule while carrier atoms stand in for marked atoms. Dropping
/// the guard puts the originals back.
struct PlaceholderGuard<'m> {
    mol: &'m mut Molecule,
    swapped: BTreeMap<NodeIndex, Swapped>,
}

impl<'m> PlaceholderGuard<'m> {
    fn install(mol: &'m mut Molecule, table: &PlaceholderTable) -> Result<Self, CodecError> {
        if let Some(idx) = mol.atoms().find(|&idx| table.is_carrier(&mol.atom(idx).symbol)) {
            return Err(CodecError::Collision {
                atom: idx.index(),
                symbol: mol.atom(idx).symbol.clone(),
            });
        }

        let mut guard = Self {
            mol,
            swapped: BTreeMap::new(),
        };
        let targets: Vec<(NodeIndex, Atom)> = guard
            .mol
            .atoms()
            .filter_map(|idx| {
                let atom = guard.mol.atom(idx);
                table.entry_for(atom).map(|entry| (idx, carrier_atom(entry, atom)))
            })
            .collect();
        for (idx, carrier) in targets {
            let original = guard
                .mol
                .replace_atom(idx, carrier.clone())
                .ok_or(CodecError::MissingPlaceholder { atom: idx.index() })?;
            guard.swapped.insert(idx, Swapped { carrier, original });
        }
        Ok(guard)
    }

    fn molecule(&self) -> &Molecule {
        self.mol
    }

    /// Puts back every original whose carrier is still in place. Returns the
    /// atoms whose carrier had gone missing.
    fn restore(&mut self) -> Vec<NodeIndex> {
        let mut missing = Vec::new();
        for (idx, swapped) in std::mem::take(&mut self.swapped) {
            if self.mol.get_atom(idx) == Some(&swapped.carrier) {
                self.mol.replace_atom(idx, swapped.original);
            } else {
                missing.push(idx);
            }
        }
        missing
    }

    fn finish(mut self) -> Result<(), CodecError> {
        match self.restore().first() {
            Some(idx) => Err(CodecError::MissingPlaceholder { atom: idx.index() }),
            None => Ok(()),
        }
    }
}

impl Drop for PlaceholderGuard<'_> {
    fn drop(&mut self) {
        for idx in self.restore() {
            error!(
                "placeholder atom {} was changed during encoding and could not be restored",
                idx.index()
            );
        }
    }
}

/// A non-aromatic stand-in with the carrier's symbol. It keeps the
/// original's atomic number so the writer brackets it as it would the
/// original, and its hydrogen count.
fn carrier_atom(entry: &PlaceholderEntry, original: &Atom) -> Atom {
    Atom {
        symbol: entry.carrier.to_string(),
        atomic_num: original.atomic_num,
        formal_charge: Some(0),
        isotope: 0,
        implicit_hydrogens: Some(original.hydrogen_count()),
        is_aromatic: false,
        is_generic: false,
    }
}
