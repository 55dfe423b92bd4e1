//! Shared foundational types used across the hdlkit backend.
//!
//! This crate provides interned identifiers and bit vectors with a per-bit
//! validity mask.

#![warn(missing_docs)]

pub mod bit_vec;
pub mod ident;

pub use bit_vec::BitVec;
pub use ident::{Ident, Interner};
