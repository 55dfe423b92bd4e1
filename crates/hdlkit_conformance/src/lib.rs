//! End-to-end helpers for the hdlkit backend.
//!
//! A [`Unit`] owns everything one synthesized unit needs: the entity and its
//! architecture, the type database, the interface synthesizer, and the port
//! claim table. Integration tests drive it from a flat port list through
//! interface extraction, signal materialization, and wiring to rendered text.

#![warn(missing_docs)]

use hdlkit_codegen::{render_architecture, SerializeError};
use hdlkit_common::Interner;
use hdlkit_config::{load_config_from_str, BackendConfig, CodegenConfig, ConfigError};
use hdlkit_intf::{ClaimLog, InterfaceDef, IntfError, Synthesizer};
use hdlkit_ir::{ArchContext, Architecture, Entity, IntfId, PortDirection, SignalId, TypeDb};
use thiserror::Error;

/// Any failure along the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration could not be loaded.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    /// Interface synthesis failed.
    #[error("interface synthesis: {0}")]
    Intf(#[from] IntfError),
    /// Rendering failed.
    #[error("code generation: {0}")]
    Serialize(#[from] SerializeError),
}

/// A port of the entity under test: name, direction, and width in bits.
pub type PortSpec<'a> = (&'a str, PortDirection, u32);

/// One unit under construction.
pub struct Unit {
    /// Names of every port, signal, and process.
    pub interner: Interner,
    /// Types of every port and signal.
    pub types: TypeDb,
    /// The architecture receiving materialized signals.
    pub arch: Architecture,
    /// Interface instances of this unit.
    pub synth: Synthesizer,
    /// Port claims made by extracted interfaces.
    pub claims: ClaimLog,
}

impl Unit {
    /// Creates a unit named `entity` with the given ports.
    pub fn new(config: &BackendConfig, entity: &str, ports: &[PortSpec<'_>]) -> Self {
        let interner = Interner::new();
        let mut types = TypeDb::new();
        let mut e = Entity::new(interner.get_or_intern(entity));
        for &(name, direction, width) in ports {
            let ty = types.bits(width);
            e.add_port(interner.get_or_intern(name), direction, ty);
        }
        let claims = ClaimLog::new(&e, &interner);
        let arch = Architecture::new(interner.get_or_intern("rtl"), e);
        Self {
            interner,
            types,
            arch,
            synth: Synthesizer::new(&config.synth),
            claims,
        }
    }

    /// Extracts every instance of `def` from the unclaimed ports.
    pub fn extract(&mut self, def: &InterfaceDef) -> Result<Vec<(String, IntfId)>, IntfError> {
        self.synth.try_extract_all(def, &mut self.claims)
    }

    /// Creates the backing signals of an extracted instance, named after it
    /// and bound to its ports.
    pub fn materialize(&mut self, name: &str, root: IntfId) -> Vec<SignalId> {
        let mut ctx = ArchContext {
            arch: &mut self.arch,
            types: &mut self.types,
            interner: &self.interner,
        };
        self.synth.materialize_signals(root, &mut ctx, name)
    }

    /// Wires `destination` to be driven by `source`.
    pub fn connect(&mut self, destination: IntfId, source: IntfId) -> Result<(), IntfError> {
        let mut ctx = ArchContext {
            arch: &mut self.arch,
            types: &mut self.types,
            interner: &self.interner,
        };
        self.synth.connect_to(destination, source, &mut ctx)
    }

    /// Names of the ports no interface claimed, in port order.
    pub fn unclaimed_ports(&self) -> Vec<&str> {
        self.claims
            .owners()
            .iter()
            .zip(self.arch.entity.ports.values())
            .filter(|(owner, _)| owner.is_none())
            .map(|(_, port)| self.interner.resolve(port.name))
            .collect()
    }

    /// Renders the architecture.
    pub fn render(&self, config: &CodegenConfig) -> Result<String, SerializeError> {
        render_architecture(config, &self.arch, &self.types, &self.interner)
    }
}

/// Parses a configuration file body.
pub fn make_config(toml: &str) -> Result<BackendConfig, PipelineError> {
    Ok(load_config_from_str(toml)?)
}

/// Extracts every instance of each definition in order, materializes its
/// signals, and renders the unit.
///
/// Returns the rendered text and the names of the extracted instances.
pub fn synthesize_and_render(
    config: &BackendConfig,
    entity: &str,
    ports: &[PortSpec<'_>],
    defs: &[InterfaceDef],
) -> Result<(String, Vec<String>), PipelineError> {
    let mut unit = Unit::new(config, entity, ports);
    let mut names = Vec::new();
    for def in defs {
        for (name, root) in unit.extract(def)? {
            unit.materialize(&name, root);
            names.push(name);
        }
    }
    log::debug!(
        "`{entity}`: {} instances, unclaimed ports {:?}",
        names.len(),
        unit.unclaimed_ports()
    );
    let text = unit.render(&config.codegen)?;
    Ok((text, names))
}
