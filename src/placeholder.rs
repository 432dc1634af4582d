use std::collections::HashSet;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::atom::Atom;

/// What kind of atom a placeholder stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderSource {
    /// An aromatic atom of the given element symbol.
    Aromatic(&'static str),
    /// A generic substituent.
    Generic,
}

/// One row of the placeholder table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderEntry {
    pub source: PlaceholderSource,
    /// Rare element symbol that carries the atom through the writer.
    pub carrier: &'static str,
    /// Replacement for the carrier written as a lone bracket atom, `[Ce]`.
    pub bracketed: &'static str,
    /// Replacement for the carrier anywhere else.
    pub bare: &'static str,
}

const fn aromatic(symbol: &'static str, carrier: &'static str, bracketed: &'static str, bare: &'static str) -> PlaceholderEntry {
    PlaceholderEntry {
        source: PlaceholderSource::Aromatic(symbol),
        carrier,
        bracketed,
        bare,
    }
}

/// Aromatic entries first, the generic substituent last. Replacement runs in
/// this order.
pub const STANDARD_ENTRIES: [PlaceholderEntry; 7] = [
    aromatic("C", "Ce", "[C*]", "C*"),
    aromatic("N", "Nd", "[N*]", "N*"),
    aromatic("S", "Sm", "[S*]", "S*"),
    aromatic("O", "Os", "[O*]", "O*"),
    aromatic("Se", "Sc", "[Se*]", "Se*"),
    aromatic("P", "Pm", "[P*]", "P*"),
    PlaceholderEntry {
        source: PlaceholderSource::Generic,
        carrier: "Es",
        bracketed: "R",
        bare: "R",
    },
];

static STANDARD: Lazy<PlaceholderTable> = Lazy::new(|| PlaceholderTable {
    entries: STANDARD_ENTRIES.to_vec(),
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("carrier symbol {0} is used twice")]
    DuplicateCarrier(&'static str),
    #[error("source {0:?} is mapped twice")]
    DuplicateSource(PlaceholderSource),
    #[error("carrier symbol {0} is also a source symbol")]
    CarrierIsSource(&'static str),
    #[error("carrier symbol {0} is not an uppercase letter followed by a lowercase letter")]
    MalformedCarrier(&'static str),
}

/// Bijection between the atoms pseudo-SMILES marks specially and the carrier
/// symbols used to smuggle them through a SMILES writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTable {
    entries: Vec<PlaceholderEntry>,
}

impl PlaceholderTable {
    /// Validates that `entries` form a bijection with two-letter carriers
    /// disjoint from the source symbols.
    pub fn new(entries: Vec<PlaceholderEntry>) -> Result<Self, TableError> {
        let mut carriers = HashSet::new();
        let mut sources = HashSet::new();
        for entry in &entries {
            let mut chars = entry.carrier.chars();
            let well_formed = matches!(
                (chars.next(), chars.next(), chars.next()),
                (Some(a), Some(b), None) if a.is_ascii_uppercase() && b.is_ascii_lowercase()
            );
            if !well_formed {
                return Err(TableError::MalformedCarrier(entry.carrier));
            }
            if !carriers.insert(entry.carrier) {
                return Err(TableError::DuplicateCarrier(entry.carrier));
            }
            if !sources.insert(entry.source) {
                return Err(TableError::DuplicateSource(entry.source));
            }
        }
        for entry in &entries {
            if sources.contains(&PlaceholderSource::Aromatic(entry.carrier)) {
                return Err(TableError::CarrierIsSource(entry.carrier));
            }
        }
        Ok(Self { entries })
    }

    /// The process-wide table, built once on first use.
    pub fn standard() -> &'static PlaceholderTable {
        &STANDARD
    }

    pub fn entries(&self) -> &[PlaceholderEntry] {
        &self.entries
    }

    /// The entry an atom should be carried by, if any.
    pub fn entry_for(&self, atom: &Atom) -> Option<&PlaceholderEntry> {
        let source = if atom.is_generic {
            PlaceholderSource::Generic
        } else if atom.is_aromatic {
            PlaceholderSource::Aromatic(self.source_symbol(&atom.symbol)?)
        } else {
            return None;
        };
        self.entries.iter().find(|e| e.source == source)
    }

    fn source_symbol(&self, symbol: &str) -> Option<&'static str> {
        self.entries.iter().find_map(|e| match e.source {
            PlaceholderSource::Aromatic(s) if s == symbol => Some(s),
            _ => None,
        })
    }

    pub fn is_carrier(&self, symbol: &str) -> bool {
        self.entries.iter().any(|e| e.carrier == symbol)
    }

    /// Rewrites carrier symbols in writer output into pseudo-SMILES markers.
    /// Each entry's bracketed form is replaced before its bare form.
    pub fn restore_text(&self, text: &str) -> String {
        let mut out = text.to_string();
        for entry in &self.entries {
            out = out.replace(&format!("[{}]", entry.carrier), entry.bracketed);
            out = out.replace(entry.carrier, entry.bare);
        }
        out
    }
}
