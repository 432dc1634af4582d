use crate::element::Element;

/// A node of a [`Molecule`](crate::Molecule).
///
/// `Atom` stores what a structure parser reads off a line-notation string.
/// Several fields are optional because molecules built by hand, or by other
/// engines, do not always carry them:
///
/// - `atomic_num: None` means the element is unknown. Wildcards use `Some(0)`.
/// - `formal_charge: None` means no charge concept applies.
/// - `implicit_hydrogens: None` means the count was never perceived; readers
///   treat it as zero.
///
/// The `symbol` is kept separately from the atomic number so that an atom can
/// be written out under a different label than its element. The pseudo-SMILES
/// codec relies on this to smuggle aromatic and wildcard atoms through the
/// canonical writer.
///
/// # Examples
///
/// ```
/// use fgprep::{Atom, Element};
///
/// let oxygen = Atom::new(Element::O);
/// assert_eq!(oxygen.symbol, "O");
/// assert_eq!(oxygen.atomic_num, Some(8));
/// assert!(!oxygen.is_charged());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    /// Label written by the line-notation writer. Usually the element symbol.
    pub symbol: String,
    /// Atomic number (1 = H, 6 = C, …), `0` for wildcards.
    pub atomic_num: Option<u8>,
    /// Formal charge in elementary charge units.
    pub formal_charge: Option<i8>,
    /// Mass number. `0` means natural isotopic abundance.
    pub isotope: u16,
    /// Number of suppressed hydrogens on this atom.
    pub implicit_hydrogens: Option<u8>,
    /// Aromaticity flag. Never set on a generic substituent.
    pub is_aromatic: bool,
    /// Marks an unspecified attachment point (`*` / `R`).
    pub is_generic: bool,
}

impl Atom {
    /// A neutral, non-aromatic atom of `element` with no hydrogens.
    pub fn new(element: Element) -> Self {
        Self {
            symbol: element.symbol().to_string(),
            atomic_num: Some(element.atomic_num()),
            formal_charge: Some(0),
            isotope: 0,
            implicit_hydrogens: Some(0),
            is_aromatic: false,
            is_generic: false,
        }
    }

    /// A generic substituent, written `*` in SMILES.
    pub fn generic() -> Self {
        Self {
            symbol: "*".to_string(),
            atomic_num: Some(0),
            formal_charge: Some(0),
            isotope: 0,
            implicit_hydrogens: Some(0),
            is_aromatic: false,
            is_generic: true,
        }
    }

    /// An element the reader could not identify. It is written as the
    /// wildcard `*` but is not a substituent marker.
    pub fn unknown() -> Self {
        Self {
            is_generic: false,
            ..Self::generic()
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = Some(charge);
        self
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.implicit_hydrogens = Some(count);
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.is_aromatic = true;
        self
    }

    pub fn element(&self) -> Option<Element> {
        self.atomic_num.and_then(Element::from_atomic_num)
    }

    /// Suppressed hydrogens, with an absent count read as zero.
    pub fn hydrogen_count(&self) -> u8 {
        self.implicit_hydrogens.unwrap_or(0)
    }

    /// `true` when a charge is present and non-zero.
    pub fn is_charged(&self) -> bool {
        self.formal_charge.is_some_and(|c| c != 0)
    }
}

impl Default for Atom {
    fn default() -> Self {
        Self::new(Element::C)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_is_never_aromatic() {
        let r = Atom::generic();
        assert!(r.is_generic);
        assert!(!r.is_aromatic);
        assert_eq!(r.atomic_num, Some(0));
        assert_eq!(r.element(), None);
    }

    #[test]
    fn unknown_element_is_not_generic() {
        let unknown = Atom::unknown();
        assert_eq!(unknown.symbol, "*");
        assert_eq!(unknown.atomic_num, Some(0));
        assert!(!unknown.is_generic);
    }

    #[test]
    fn missing_hydrogens_read_as_zero() {
        let mut atom = Atom::new(Element::N);
        atom.implicit_hydrogens = None;
        assert_eq!(atom.hydrogen_count(), 0);
    }

    #[test]
    fn missing_charge_is_not_charged() {
        let mut atom = Atom::new(Element::O).with_charge(-1);
        assert!(atom.is_charged());
        atom.formal_charge = None;
        assert!(!atom.is_charged());
    }
}
