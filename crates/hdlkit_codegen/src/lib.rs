//! Code generation: renders a typed [`Architecture`] as VHDL text or as an
//! event-driven simulation model.
//!
//! The [`Serializer`] does the language-independent work (precedence,
//! literal encoding, type declarations, naming) and delegates surface syntax
//! to a [`Dialect`] and layout to a [`TemplateRenderer`].
//! [`render_architecture`] picks both from a [`CodegenConfig`].

#![warn(missing_docs)]

pub mod dialect;
pub mod error;
pub mod literal;
pub mod name_scope;
pub mod precedence;
pub mod serializer;
pub mod templates;

pub use dialect::{Dialect, SignalDecl, SignalKind, SimModel, Vhdl};
pub use error::SerializeError;
pub use name_scope::{NameScope, ScopeOwner};
pub use serializer::Serializer;
pub use templates::{SimModelTemplates, Template, TemplateRenderer, VhdlTemplates};

use hdlkit_common::Interner;
use hdlkit_config::{CodegenConfig, Dialect as OutputDialect};
use hdlkit_ir::{Architecture, TypeDb};

/// Renders `arch` in the dialect selected by `config`.
pub fn render_architecture(
    config: &CodegenConfig,
    arch: &Architecture,
    types: &TypeDb,
    interner: &Interner,
) -> Result<String, SerializeError> {
    match config.dialect {
        OutputDialect::Vhdl => {
            let mut scope = Vhdl.base_scope(&config.reserved);
            Serializer::new(Vhdl, arch, types, interner, &mut scope)
                .with_time_unit(config.wait_time_unit.as_str())
                .serialize_architecture(&VhdlTemplates::new(config.indent.as_str()))
        }
        OutputDialect::SimModel => {
            let mut scope = SimModel.base_scope(&config.reserved);
            Serializer::new(SimModel, arch, types, interner, &mut scope)
                .with_time_unit(config.wait_time_unit.as_str())
                .serialize_architecture(&SimModelTemplates::new(config.indent.as_str()))
        }
    }
}
