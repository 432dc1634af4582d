//! Eligibility predicates: may a molecule go to the functional-group finder
//! as is, does it need normalizing first, or must it be rejected?
//!
//! Nothing here mutates its input. Rejection and normalization are separate
//! questions so a caller can reject early or always try normalizing first.

use log::warn;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::InputError;
use crate::graph_ops::num_components;
use crate::mol::Molecule;

/// `true` when the bond graph has more than one connected component.
pub fn is_disconnected(mol: &Molecule) -> bool {
    num_components(mol) > 1
}

pub fn has_zero_atoms_or_bonds(mol: &Molecule) -> bool {
    mol.atom_count() == 0 || mol.bond_count() == 0
}

/// `true` when any atom carries a non-zero formal charge. Stops at the first
/// one found.
///
/// With `require_formal_charge` set, an atom without a charge is an error
/// rather than neutral.
pub fn is_charged(mol: &Molecule, config: &PipelineConfig) -> Result<bool, InputError> {
    for idx in mol.atoms() {
        if is_atom_charged(mol, idx, config)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn is_atom_charged(
    mol: &Molecule,
    idx: NodeIndex,
    config: &PipelineConfig,
) -> Result<bool, InputError> {
    let atom = mol
        .get_atom(idx)
        .ok_or(InputError::AtomOutOfRange { atom: idx.index() })?;
    match atom.formal_charge {
        Some(charge) => Ok(charge != 0),
        None if config.require_formal_charge() => {
            Err(InputError::MissingFormalCharge { atom: idx.index() })
        }
        None => Ok(false),
    }
}

/// `true` when any atom has no atomic number or one outside the configured
/// set.
pub fn has_invalid_atomic_number(mol: &Molecule, config: &PipelineConfig) -> bool {
    mol.atoms().any(|idx| {
        mol.atom(idx)
            .atomic_num
            .map_or(true, |z| !config.is_valid_atomic_number(z))
    })
}

/// Atom-level validity check. Unlike [`has_invalid_atomic_number`], a
/// missing atomic number is an error here.
pub fn is_atomic_number_invalid(
    mol: &Molecule,
    idx: NodeIndex,
    config: &PipelineConfig,
) -> Result<bool, InputError> {
    let atom = mol
        .get_atom(idx)
        .ok_or(InputError::AtomOutOfRange { atom: idx.index() })?;
    let z = atom
        .atomic_num
        .ok_or(InputError::MissingAtomicNumber { atom: idx.index() })?;
    Ok(!config.is_valid_atomic_number(z))
}

pub fn should_reject(mol: &Molecule, config: &PipelineConfig) -> bool {
    has_invalid_atomic_number(mol, config) || has_zero_atoms_or_bonds(mol)
}

pub fn needs_normalization(mol: &Molecule, config: &PipelineConfig) -> Result<bool, InputError> {
    Ok(is_charged(mol, config)? || is_disconnected(mol))
}

/// `true` when the molecule needs neither rejecting nor normalizing.
///
/// Under [`FailurePolicy::FailClosed`] an input error is logged and read as
/// "not ready". Under [`FailurePolicy::Propagate`] it is returned.
pub fn is_ready_for_analysis(mol: &Molecule, config: &PipelineConfig) -> Result<bool, InputError> {
    if should_reject(mol, config) {
        return Ok(false);
    }
    match needs_normalization(mol, config) {
        Ok(needed) => Ok(!needed),
        Err(e) => fail_closed(config, e, false),
    }
}

/// Like [`should_reject`], but charge information is checked too, so that an
/// atom lacking a required charge is caught up front. Applies the failure
/// policy the same way [`is_ready_for_analysis`] does.
pub fn should_reject_strict(mol: &Molecule, config: &PipelineConfig) -> Result<bool, InputError> {
    if should_reject(mol, config) {
        return Ok(true);
    }
    match is_charged(mol, config) {
        Ok(_) => Ok(false),
        Err(e) => fail_closed(config, e, true),
    }
}

fn fail_closed(
    config: &PipelineConfig,
    error: InputError,
    answer: bool,
) -> Result<bool, InputError> {
    match config.failure_policy() {
        FailurePolicy::FailClosed => {
            warn!("eligibility check failed, answering {answer}: {error}");
            Ok(answer)
        }
        FailurePolicy::Propagate => Err(error),
    }
}

/// One reason a molecule is not ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterIssue {
    #[error("molecule has no atoms or no bonds")]
    NoAtomsOrBonds,
    #[error("atom {atom} has atomic number {atomic_num:?}, which the finder does not accept")]
    InvalidAtomicNumber { atom: usize, atomic_num: Option<u8> },
    #[error("atom {atom} has formal charge {charge}")]
    Charged { atom: usize, charge: i8 },
    #[error("molecule has {fragments} fragments")]
    Disconnected { fragments: usize },
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Every reason the molecule is not ready, for drivers that log them.
pub fn check_ready_for_analysis(
    mol: &Molecule,
    config: &PipelineConfig,
) -> Result<(), Vec<FilterIssue>> {
    let mut issues = Vec::new();
    if has_zero_atoms_or_bonds(mol) {
        issues.push(FilterIssue::NoAtomsOrBonds);
    }
    for idx in mol.atoms() {
        let atom = mol.atom(idx);
        if atom
            .atomic_num
            .map_or(true, |z| !config.is_valid_atomic_number(z))
        {
            issues.push(FilterIssue::InvalidAtomicNumber {
                atom: idx.index(),
                atomic_num: atom.atomic_num,
            });
        }
        match is_atom_charged(mol, idx, config) {
            Ok(true) => issues.push(FilterIssue::Charged {
                atom: idx.index(),
                charge: atom.formal_charge.unwrap_or(0),
            }),
            Ok(false) => {}
            Err(e) => issues.push(e.into()),
        }
    }
    let fragments = num_components(mol);
    if fragments > 1 {
        issues.push(FilterIssue::Disconnected { fragments });
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
