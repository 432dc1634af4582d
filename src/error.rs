use thiserror::Error;

use crate::aromaticity::AromaticityError;
use crate::hydrogen::SaturationError;
use crate::placeholder::TableError;
use crate::smiles::{SmilesError, WriteError};
use crate::valence::AtomTypeError;

/// A molecule or atom is missing something the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("atom {atom} has no formal charge")]
    MissingFormalCharge { atom: usize },
    #[error("atom {atom} has no atomic number")]
    MissingAtomicNumber { atom: usize },
    #[error("atom {atom} is not part of the molecule")]
    AtomOutOfRange { atom: usize },
}

/// Failures while bringing a molecule into analyzable form. These reject the
/// molecule, not the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("atom typing failed: {0}")]
    AtomType(#[from] AtomTypeError),
    #[error("hydrogen saturation failed: {0}")]
    Saturation(#[from] SaturationError),
    #[error("aromaticity perception failed: {0}")]
    Aromaticity(#[from] AromaticityError),
    #[error("molecule has no fragments")]
    NoFragments,
}

/// Failures of the pseudo-SMILES codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The carrier installed at `atom` was gone when restoring. Something
    /// mutated the molecule while it was being encoded.
    #[error("placeholder atom {atom} vanished before it could be restored")]
    MissingPlaceholder { atom: usize },
    #[error("atom {atom} already uses the placeholder symbol {symbol}")]
    Collision { atom: usize, symbol: String },
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Any error the crate can return.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Smiles(#[from] SmilesError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
