use crate::location::{Location, N_COLS};
use primitive_types::U128;
use std::fmt::Debug;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Shl, Shr};

/// A trait for an integer type that can be used as a bitfield over board cells, one bit per
/// cell in row-major order. See the [`crate::impl_bitfield_bigint!`] macro, which implements
/// this trait for the big integer types from [`primitive_types`].
pub trait BitField:
    Sized +
    Copy +
    From<u8> +
    BitAnd<Output=Self> +
    BitAndAssign +
    BitOr<Output=Self> +
    BitOrAssign +
    Not<Output=Self> +
    Shr<u32, Output=Self> +
    Shl<u32, Output=Self> +
    PartialEq +
    Default +
    Debug
{
    /// Returns the number of ones in the binary representation of `self`.
    fn count_ones(&self) -> u32;

    /// Return the number of trailing zeros in the bitfield.
    fn trailing_zeros(&self) -> u32;

    /// Whether the bitfield is empty (ie, no set bits).
    fn is_empty(&self) -> bool;

    /// Create a bitmask for the given location. Only the bit corresponding to the location's
    /// position on the board will be set.
    fn location_mask(l: Location) -> Self {
        Self::from(1) << (l.index() as u32)
    }

    /// Convert the given bit index to a location.
    fn bit_to_location(bit: u32) -> Location {
        let row = bit / (N_COLS as u32);
        let col = bit - (row * (N_COLS as u32));
        Location::new(col as u8, row as u8)
    }

    /// Whether the bit for the given location is set.
    fn contains(&self, l: Location) -> bool {
        !(*self & Self::location_mask(l)).is_empty()
    }

    /// Build a bitfield with the bits for the given locations set.
    fn from_locations(locations: &[Location]) -> Self {
        locations.iter().fold(Self::default(), |acc, l| acc | Self::location_mask(*l))
    }
}

/// Implement the [`BitField`] trait for the given big integer type from the [`primitive_types`]
/// crate.
#[macro_export] macro_rules! impl_bitfield_bigint {
    ($t:ty) => {
        impl BitField for $t {
            fn count_ones(&self) -> u32 {
                self.0.iter().map(|word| word.count_ones()).sum()
            }

            fn trailing_zeros(&self) -> u32 {
                <$t>::trailing_zeros(self)
            }

            fn is_empty(&self) -> bool {
                <$t>::is_zero(self)
            }
        }
    };
}

impl_bitfield_bigint!(U128);

/// Bitfield used to track which cells hold pieces of a player, or which cells are reserved.
pub type Occupancy = U128;

/// Iterator over the locations whose bits are set in a bitfield, lowest bit (ie, `a8`) first.
pub struct BitfieldIter<T: BitField> {
    /// Bitfield being iterated.
    state: T,
    /// Keeps track of current position in the bitfield.
    i: u32,
}

impl<T: BitField> BitfieldIter<T> {
    pub fn new(state: T) -> Self {
        Self { state, i: 0 }
    }
}

impl<T: BitField> Iterator for BitfieldIter<T> {
    type Item = Location;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= 128 {
            return None
        }
        let skipped = self.state >> self.i;
        if skipped.is_empty() {
            return None
        }
        self.i += skipped.trailing_zeros() + 1;
        Some(T::bit_to_location(self.i - 1))
    }
}
