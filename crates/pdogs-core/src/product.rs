//! Products: the positive integer tokens that flow across the board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// A product value. Always strictly positive; an empty slot is `None`,
/// never a zero product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Product(NonZeroU32);

impl Product {
    /// Returns `None` for zero.
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    pub const fn value(self) -> u32 {
        self.0.get()
    }

    /// The product a combiner emits for two inputs. Saturates at `u32::MAX`.
    pub fn merge(self, other: Product) -> Product {
        Self(self.0.saturating_add(other.value()))
    }
}

impl From<NonZeroU32> for Product {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_product() {
        assert!(Product::new(0).is_none());
        assert_eq!(Product::new(7).map(Product::value), Some(7));
    }

    #[test]
    fn merge_sums_values() {
        let a = Product::new(5).unwrap();
        let b = Product::new(13).unwrap();
        assert_eq!(a.merge(b).value(), 18);
    }

    #[test]
    fn merge_saturates() {
        let a = Product::new(u32::MAX - 1).unwrap();
        let b = Product::new(5).unwrap();
        assert_eq!(a.merge(b).value(), u32::MAX);
    }
}
