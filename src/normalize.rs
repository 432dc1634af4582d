//! Turns an eligible molecule into the form the functional-group finder
//! expects: one fragment, no formal charges, aromaticity perceived.

use std::fmt;

use log::debug;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::aromaticity::AromaticityModel;
use crate::config::PipelineConfig;
use crate::error::{InputError, NormalizeError};
use crate::filter;
use crate::graph_ops::{connected_components, extract_fragment};
use crate::hydrogen::add_implicit_hydrogens;
use crate::mol::Molecule;
use crate::valence::{perceive_atom_types, AtomTyper, ValenceTyper};

/// The fragment with the most atoms, as a new molecule carrying all of the
/// input's properties.
///
/// Ties go to the fragment met first in atom order, i.e. the one holding
/// the lowest atom index.
pub fn select_largest_fragment(mol: &Molecule) -> Result<Molecule, NormalizeError> {
    let components = connected_components(mol);
    let mut largest: Option<&Vec<NodeIndex>> = None;
    for component in &components {
        if largest.map_or(true, |best| component.len() > best.len()) {
            largest = Some(component);
        }
    }
    let largest = largest.ok_or(NormalizeError::NoFragments)?;
    if components.len() > 1 {
        debug!(
            "keeping a fragment of {} atoms out of {} fragments",
            largest.len(),
            components.len()
        );
    }
    let mut fragment = extract_fragment(mol, largest);
    fragment.copy_properties_from(mol);
    Ok(fragment)
}

/// Zeroes the charge of one atom and re-saturates it with hydrogens for the
/// neutral atom type `typer` assigns.
pub fn neutralize_atom(
    mol: &mut Molecule,
    idx: NodeIndex,
    typer: &dyn AtomTyper,
) -> Result<(), NormalizeError> {
    let atom = mol
        .get_atom_mut(idx)
        .ok_or(InputError::AtomOutOfRange { atom: idx.index() })?;
    atom.formal_charge = Some(0);
    let atom_type = typer.find_matching_type(mol, idx)?;
    add_implicit_hydrogens(mol, idx, &atom_type)?;
    Ok(())
}

/// Neutralizes every charged atom in place. Uncharged atoms are not touched.
///
/// There are no per-group rules here: a quaternary ammonium becomes a
/// four-bonded neutral nitrogen.
pub fn neutralize_charges<'m>(
    mol: &'m mut Molecule,
    typer: &dyn AtomTyper,
) -> Result<&'m mut Molecule, NormalizeError> {
    let charged: Vec<NodeIndex> = mol
        .atoms()
        .filter(|&idx| mol.atom(idx).is_charged())
        .collect();
    for idx in charged {
        neutralize_atom(mol, idx, typer)?;
    }
    Ok(mol)
}

/// Where in [`Normalizer::normalize`] a molecule was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FragmentSelection,
    ChargeCheck,
    Neutralization,
    Aromaticity,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::FragmentSelection => "fragment selection",
            Step::ChargeCheck => "charge check",
            Step::Neutralization => "charge neutralization",
            Step::Aromaticity => "aromaticity perception",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("molecule has no atoms or no bonds")]
    NoAtomsOrBonds,
    #[error("molecule contains an atomic number the finder does not accept")]
    InvalidAtomicNumber,
    #[error("{step} failed: {error}")]
    Failed {
        step: Step,
        #[source]
        error: NormalizeError,
    },
}

/// Outcome of [`Normalizer::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Ready(Molecule),
    Rejected(Rejection),
}

impl Normalized {
    pub fn is_ready(&self) -> bool {
        matches!(self, Normalized::Ready(_))
    }

    pub fn ready(self) -> Option<Molecule> {
        match self {
            Normalized::Ready(mol) => Some(mol),
            Normalized::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Normalized::Ready(_) => None,
            Normalized::Rejected(r) => Some(r),
        }
    }
}

/// The full normalization pipeline with its collaborators.
pub struct Normalizer<'a> {
    config: &'a PipelineConfig,
    typer: &'a dyn AtomTyper,
    aromaticity: &'a dyn AromaticityModel,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a PipelineConfig, aromaticity: &'a dyn AromaticityModel) -> Self {
        Self {
            config,
            typer: &ValenceTyper,
            aromaticity,
        }
    }

    pub fn with_typer(mut self, typer: &'a dyn AtomTyper) -> Self {
        self.typer = typer;
        self
    }

    /// Perceives atom types, rejects empty or bondless molecules, keeps the
    /// largest fragment, rejects atomic numbers outside the configured set,
    /// neutralizes charges and finally applies the aromaticity model.
    ///
    /// The molecule is consumed. A rejected molecule is dropped, never
    /// handed back half-processed.
    pub fn normalize(&self, mut mol: Molecule) -> Normalized {
        match self.run(&mut mol) {
            Ok(Some(ready)) => Normalized::Ready(ready),
            Ok(None) => Normalized::Ready(mol),
            Err(rejection) => {
                debug!("molecule rejected: {rejection}");
                Normalized::Rejected(rejection)
            }
        }
    }

    /// Returns `Some` when fragment selection replaced the molecule.
    fn run(&self, mol: &mut Molecule) -> Result<Option<Molecule>, Rejection> {
        let untyped = perceive_atom_types(mol, self.typer);
        if !untyped.is_empty() {
            debug!("{} atoms could not be typed", untyped.len());
        }

        if filter::has_zero_atoms_or_bonds(mol) {
            return Err(Rejection::NoAtomsOrBonds);
        }

        let mut selected = None;
        if filter::is_disconnected(mol) {
            let fragment = select_largest_fragment(mol).map_err(|error| Rejection::Failed {
                step: Step::FragmentSelection,
                error,
            })?;
            selected = Some(fragment);
        }
        let target = selected.as_mut().unwrap_or(mol);

        if filter::has_invalid_atomic_number(target, self.config) {
            return Err(Rejection::InvalidAtomicNumber);
        }

        let charged = filter::is_charged(target, self.config).map_err(|e| Rejection::Failed {
            step: Step::ChargeCheck,
            error: e.into(),
        })?;
        if charged {
            neutralize_charges(target, self.typer).map_err(|error| Rejection::Failed {
                step: Step::Neutralization,
                error,
            })?;
        }

        self.aromaticity
            .apply(target)
            .map_err(|e| Rejection::Failed {
                step: Step::Aromaticity,
                error: e.into(),
            })?;

        Ok(selected)
    }
}

/// [`Normalizer::normalize`] with the default atom typer.
pub fn normalize_for_analysis(
    mol: Molecule,
    aromaticity: &dyn AromaticityModel,
    config: &PipelineConfig,
) -> Normalized {
    Normalizer::new(config, aromaticity).normalize(mol)
}
