pub mod aromaticity;
pub mod atom;
pub mod bond;
pub mod canonical;
pub mod config;
pub mod element;
pub mod error;
pub mod filter;
pub mod graph_ops;
pub mod groups;
pub mod hash;
pub mod hydrogen;
pub mod kekulize;
pub mod mol;
pub mod normalize;
pub mod placeholder;
pub mod pseudo_smiles;
pub mod rings;
pub mod smiles;
pub mod valence;

pub use aromaticity::{AromaticityError, AromaticityModel, Huckel, Preserve};
pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use config::{FailurePolicy, PipelineConfig};
pub use element::Element;
pub use error::{CodecError, Error, InputError, NormalizeError, Result};
pub use hash::{AtomEncoder, HashScheme, MoleculeHasher};
pub use kekulize::{kekulize, KekulizeError};
pub use mol::Molecule;
pub use normalize::{normalize_for_analysis, Normalized, Normalizer, Rejection};
pub use placeholder::PlaceholderTable;
pub use pseudo_smiles::{pseudo_smiles, PseudoSmilesEncoder};
pub use smiles::{parse_smiles, to_canonical_smiles, LineNotationWriter, SmilesError, WriteError};
pub use valence::{AtomType, AtomTypeError, AtomTyper, ValenceTyper};
