//! Interface synthesis: matching entity ports against hierarchical interface
//! templates and wiring interface instances together.
//!
//! The flow is two-phase. An [`InterfaceDef`] is built once into a shared
//! [`Template`] by the [`TemplateRegistry`]; each use deep-copies the template
//! into the [`Synthesizer`] arena as a tree of [`IntfNode`]s. Instances can then
//! be matched against the ports of an entity by name
//! ([`Synthesizer::try_extract_all`]), connected to each other, and finally
//! backed by signals through a [`SignalContext`](hdlkit_ir::SignalContext).

#![warn(missing_docs)]

pub mod claims;
pub mod def;
pub mod error;
pub mod node;
pub mod synth;
pub mod template;

pub use claims::ClaimLog;
pub use def::{ChildDef, InterfaceDef};
pub use error::IntfError;
pub use node::{IntfDirection, IntfNode};
pub use synth::Synthesizer;
pub use template::{Template, TemplateNode, TemplateRegistry};
