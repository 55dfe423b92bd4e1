//! Hardware types and the type database.
//!
//! Scalar types are interned structurally, so two requests for an 8-bit
//! unsigned vector return the same [`TypeId`]. Enum and array types are
//! different: each declaration is its own type, and two structurally equal
//! arrays are distinct unless they share a [`TypeId`].

use crate::ids::TypeId;
use serde::{Deserialize, Serialize};

/// How the bits of a [`HdlType::Bits`] value are interpreted arithmetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signedness {
    /// Two's-complement signed.
    Signed,
    /// Unsigned.
    Unsigned,
    /// Plain bits without arithmetic interpretation.
    None,
}

/// A hardware type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HdlType {
    /// A bit or bit vector.
    Bits {
        /// The number of bits.
        width: u32,
        /// Arithmetic interpretation of the bits.
        signedness: Signedness,
        /// Render as a vector even when `width == 1`.
        force_vector: bool,
    },
    /// An enumeration with ordered labels.
    Enum {
        /// Suggested declaration name.
        name: Option<String>,
        /// Labels in declaration order.
        labels: Vec<String>,
    },
    /// A fixed-size array.
    Array {
        /// Suggested declaration name.
        name: Option<String>,
        /// The element type.
        element: TypeId,
        /// The number of elements.
        size: u32,
    },
    /// A boolean.
    Boolean,
    /// An integer.
    Integer,
    /// A string.
    String,
}

impl HdlType {
    /// A plain single bit.
    pub const BIT: HdlType = HdlType::Bits {
        width: 1,
        signedness: Signedness::None,
        force_vector: false,
    };

    /// Returns a plain bit vector of the given width.
    pub fn vector(width: u32) -> Self {
        HdlType::Bits {
            width,
            signedness: Signedness::None,
            force_vector: width == 1,
        }
    }

    /// Returns true for types that need a separate declaration before use.
    pub fn needs_declaration(&self) -> bool {
        matches!(self, HdlType::Enum { .. } | HdlType::Array { .. })
    }

    /// Returns true for a scalar single bit (not a one-element vector).
    pub fn is_scalar_bit(&self) -> bool {
        matches!(
            self,
            HdlType::Bits {
                width: 1,
                signedness: Signedness::None,
                force_vector: false,
            }
        )
    }
}

/// Central type database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDb {
    types: Vec<HdlType>,
}

impl TypeDb {
    /// Creates a new, empty type database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a scalar type, returning the existing ID for an identical type.
    ///
    /// Enum and array types are never merged here; passing one allocates a
    /// fresh declaration exactly like [`TypeDb::declare`].
    pub fn intern(&mut self, ty: HdlType) -> TypeId {
        if ty.needs_declaration() {
            return self.declare(ty);
        }
        if let Some(i) = self.types.iter().position(|existing| existing == &ty) {
            return TypeId::from_raw(i as u32);
        }
        self.declare(ty)
    }

    /// Allocates a new type without deduplication.
    pub fn declare(&mut self, ty: HdlType) -> TypeId {
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Declares a new enum type.
    pub fn declare_enum(&mut self, name: Option<&str>, labels: &[&str]) -> TypeId {
        self.declare(HdlType::Enum {
            name: name.map(str::to_owned),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        })
    }

    /// Declares a new array type.
    pub fn declare_array(&mut self, name: Option<&str>, element: TypeId, size: u32) -> TypeId {
        self.declare(HdlType::Array {
            name: name.map(str::to_owned),
            element,
            size,
        })
    }

    /// Interns a plain bit (`width == 1`) or bit vector of the given width.
    pub fn bits(&mut self, width: u32) -> TypeId {
        if width == 1 {
            self.intern(HdlType::BIT)
        } else {
            self.intern(HdlType::vector(width))
        }
    }

    /// Returns the type with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: TypeId) -> &HdlType {
        &self.types[id.as_raw() as usize]
    }

    /// Returns the bit width of bit-like types.
    ///
    /// Returns `None` for types without a fixed bit width.
    pub fn bit_width(&self, id: TypeId) -> Option<u32> {
        match self.get(id) {
            HdlType::Bits { width, .. } => Some(*width),
            HdlType::Boolean => Some(1),
            HdlType::Array { element, size, .. } => self.bit_width(*element).map(|w| w * size),
            _ => None,
        }
    }

    /// Returns the number of types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types have been added.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
