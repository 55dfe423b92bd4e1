//! The typed design model consumed by interface synthesis and code generation.
//!
//! This crate defines the value model ([`Value`], [`HdlType`]), the
//! statement and expression trees ([`Statement`], [`Expr`]), and the
//! containers that own them ([`Architecture`], [`Process`], [`Entity`]).
//! [`ArchContext`] implements the [`SignalContext`] used by interface
//! synthesis to allocate and wire signals.

#![warn(missing_docs)]

pub mod arch;
pub mod arena;
pub mod context;
pub mod expr;
pub mod ids;
pub mod port;
pub mod process;
pub mod signal;
pub mod stmt;
pub mod types;
pub mod value;

pub use arch::{Architecture, ComponentInstance, Connection};
pub use arena::{Arena, ArenaId};
pub use context::{ArchContext, SignalContext};
pub use expr::{Expr, Operation, Operator};
pub use ids::*;
pub use port::{Entity, Port, PortDirection};
pub use process::Process;
pub use signal::{Driver, Reader, Signal};
pub use stmt::Statement;
pub use types::{HdlType, Signedness, TypeDb};
pub use value::{Value, ValueData};
