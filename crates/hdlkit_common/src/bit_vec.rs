//! Fixed-width bit vectors with a per-bit validity mask.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-width bit vector where every bit is either defined (`0`/`1`) or
/// undefined (`X`).
///
/// The value is stored as two planes: the raw magnitude `val` and the
/// validity mask `vld`. A bit is defined iff its `vld` bit is set. Both planes
/// are kept truncated to `width`, and `val` bits are always cleared where the
/// mask is clear, so two vectors with the same defined bits compare equal.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitVec {
    width: u32,
    val: BigUint,
    vld: BigUint,
}

/// Returns a mask with the low `width` bits set.
pub fn mask(width: u32) -> BigUint {
    (BigUint::one() << width as usize) - BigUint::one()
}

impl BitVec {
    /// Creates a vector from a magnitude and a validity mask.
    ///
    /// Bits above `width` are dropped from both planes.
    pub fn with_mask(val: BigUint, vld: BigUint, width: u32) -> Self {
        let full = mask(width);
        let vld = vld & &full;
        let val = val & &vld;
        Self { width, val, vld }
    }

    /// Creates a fully defined vector from an arbitrary-width magnitude.
    pub fn from_biguint(val: BigUint, width: u32) -> Self {
        Self::with_mask(val, mask(width), width)
    }

    /// Creates a fully defined vector from a `u64`.
    ///
    /// Bits beyond the given width are ignored.
    pub fn from_u64(value: u64, width: u32) -> Self {
        Self::from_biguint(BigUint::from(value), width)
    }

    /// Creates a fully defined single-bit vector from a boolean value.
    pub fn from_bool(value: bool) -> Self {
        Self::from_u64(value as u64, 1)
    }

    /// Creates a fully defined vector with all bits `0`.
    pub fn all_zero(width: u32) -> Self {
        Self::from_u64(0, width)
    }

    /// Creates a fully defined vector with all bits `1`.
    pub fn all_one(width: u32) -> Self {
        Self::from_biguint(mask(width), width)
    }

    /// Creates a vector with every bit undefined.
    pub fn undefined(width: u32) -> Self {
        Self::with_mask(BigUint::zero(), BigUint::zero(), width)
    }

    /// Parses a binary string like `"10X1"`, most significant bit first.
    ///
    /// Accepts `0`, `1`, and `x`/`X`. Returns `None` for other characters.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let width = s.len() as u32;
        let mut val = BigUint::zero();
        let mut vld = BigUint::zero();
        for (i, c) in s.chars().rev().enumerate() {
            let i = i as u64;
            match c {
                '0' => vld.set_bit(i, true),
                '1' => {
                    vld.set_bit(i, true);
                    val.set_bit(i, true);
                }
                'x' | 'X' => {}
                _ => return None,
            }
        }
        Some(Self::with_mask(val, vld, width))
    }

    /// Returns the number of bits in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the raw magnitude. Undefined bits read as zero.
    pub fn val(&self) -> &BigUint {
        &self.val
    }

    /// Returns the validity mask.
    pub fn vld(&self) -> &BigUint {
        &self.vld
    }

    /// Returns the bit at `index`, or `None` if it is undefined.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Option<bool> {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let index = index as u64;
        if self.vld.bit(index) {
            Some(self.val.bit(index))
        } else {
            None
        }
    }

    /// Returns true if every bit is defined.
    pub fn is_fully_valid(&self) -> bool {
        self.vld == mask(self.width)
    }

    /// Returns true if at least one bit is defined.
    pub fn has_valid_bits(&self) -> bool {
        !self.vld.is_zero()
    }

    /// Converts to a `u64` if every bit is defined and the value fits.
    pub fn to_u64(&self) -> Option<u64> {
        if !self.is_fully_valid() {
            return None;
        }
        self.val.to_u64()
    }

    /// Interprets the magnitude as a two's-complement signed number.
    pub fn to_signed(&self) -> BigInt {
        if self.width > 0 && self.val.bit(self.width as u64 - 1) {
            BigInt::from(self.val.clone()) - BigInt::from(BigUint::one() << self.width as usize)
        } else {
            BigInt::from(self.val.clone())
        }
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            match self.get(i) {
                Some(true) => write!(f, "1")?,
                Some(false) => write!(f, "0")?,
                None => write!(f, "X")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVec({self})")
    }
}
