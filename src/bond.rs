#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    pub fn valence(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// An edge of a [`Molecule`](crate::Molecule).
///
/// Aromatic bonds carry `is_aromatic = true` together with a Kekulé order,
/// so bond-order sums are the same however the ring was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bond {
    pub order: BondOrder,
    pub is_aromatic: bool,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order,
            is_aromatic: false,
        }
    }

    /// An aromatic bond awaiting its Kekulé order.
    pub fn aromatic() -> Self {
        Self {
            order: BondOrder::Single,
            is_aromatic: true,
        }
    }
}
