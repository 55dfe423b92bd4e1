//! Typed constant values.
//!
//! A [`Value`] pairs a [`TypeId`] with its payload. Bit payloads carry a
//! per-bit validity mask, scalar payloads use `None` for an undefined value.

use crate::ids::TypeId;
use crate::types::TypeDb;
use hdlkit_common::BitVec;
use serde::{Deserialize, Serialize};

/// The payload of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueData {
    /// Bits with a validity mask.
    Bits(BitVec),
    /// A boolean, `None` when undefined.
    Bool(Option<bool>),
    /// An integer, `None` when undefined.
    Int(Option<i64>),
    /// A string, `None` when undefined.
    Str(Option<String>),
    /// An enum label index, `None` when undefined.
    Enum(Option<u32>),
}

/// A typed constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// The type of this value.
    pub ty: TypeId,
    /// The payload.
    pub data: ValueData,
}

impl Value {
    /// Creates a bits value of type `ty`.
    pub fn bits(ty: TypeId, bits: BitVec) -> Self {
        Self {
            ty,
            data: ValueData::Bits(bits),
        }
    }

    /// Creates a fully defined bits value, interning a plain bit/vector type.
    pub fn from_u64(types: &mut TypeDb, value: u64, width: u32) -> Self {
        let ty = types.bits(width);
        Self::bits(ty, BitVec::from_u64(value, width))
    }

    /// Creates a boolean value.
    pub fn boolean(ty: TypeId, value: bool) -> Self {
        Self {
            ty,
            data: ValueData::Bool(Some(value)),
        }
    }

    /// Creates an integer value.
    pub fn int(ty: TypeId, value: i64) -> Self {
        Self {
            ty,
            data: ValueData::Int(Some(value)),
        }
    }

    /// Creates a string value.
    pub fn string(ty: TypeId, value: impl Into<String>) -> Self {
        Self {
            ty,
            data: ValueData::Str(Some(value.into())),
        }
    }

    /// Returns the bit payload, if this is a bits value.
    pub fn as_bits(&self) -> Option<&BitVec> {
        match &self.data {
            ValueData::Bits(b) => Some(b),
            _ => None,
        }
    }

    /// Returns true if at least one bit (or the whole scalar) is defined.
    pub fn has_valid_bits(&self) -> bool {
        match &self.data {
            ValueData::Bits(b) => b.has_valid_bits(),
            ValueData::Bool(v) => v.is_some(),
            ValueData::Int(v) => v.is_some(),
            ValueData::Str(v) => v.is_some(),
            ValueData::Enum(v) => v.is_some(),
        }
    }

    /// Returns true if every bit (or the whole scalar) is defined.
    pub fn is_fully_valid(&self) -> bool {
        match &self.data {
            ValueData::Bits(b) => b.is_fully_valid(),
            _ => self.has_valid_bits(),
        }
    }
}
