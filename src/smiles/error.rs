use thiserror::Error;

use crate::kekulize::KekulizeError;

/// Errors produced when parsing a SMILES string. Positions count chars.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    /// The input string was empty or contained only whitespace.
    #[error("empty SMILES string")]
    EmptyInput,
    /// An unexpected character was encountered at the given position.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    /// A bracket atom `[` was opened but never closed with `]`.
    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },
    /// A bracket atom held no element symbol.
    #[error("missing element symbol in bracket atom at position {pos}")]
    MissingElement { pos: usize },
    /// A charge, isotope or hydrogen count overflowed.
    #[error("number out of range in bracket atom at position {pos}")]
    NumberOverflow { pos: usize },
    /// A ring-opening digit was never matched by a ring-closing digit.
    #[error("unclosed ring {digit}")]
    UnclosedRing { digit: u16 },
    /// A ring closure or bond appeared before any atom.
    #[error("ring bond {digit} at position {pos} has no preceding atom")]
    InvalidRingBond { digit: u16, pos: usize },
    /// Both ends of a ring closure name a bond, and the bonds disagree.
    #[error("conflicting bond types on ring closure {digit}")]
    RingBondConflict { digit: u16 },
    /// A ring closure would bond an atom to itself or duplicate a bond.
    #[error("ring closure {digit} at position {pos} duplicates a bond")]
    DuplicateRingBond { digit: u16, pos: usize },
    /// A parenthesis was opened without a matching close, or vice versa.
    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    /// A bond symbol was not followed by an atom.
    #[error("dangling bond at position {pos}")]
    DanglingBond { pos: usize },
    /// Lowercase atoms that admit no Kekulé structure.
    #[error(transparent)]
    Kekulize(#[from] KekulizeError),
}

/// Errors produced when writing a molecule as SMILES.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// More than 99 ring closures were open at once.
    #[error("more than 99 simultaneously open ring closures")]
    TooManyRingClosures,
    /// An atom carries no symbol to write.
    #[error("atom {atom} has an empty symbol")]
    EmptySymbol { atom: usize },
}
