//! Signal allocation for interface synthesis.

use crate::arch::Architecture;
use crate::ids::{IntfId, PortId, SignalId};
use crate::types::TypeDb;
use hdlkit_common::Interner;

/// Allocates and wires signals on behalf of interface synthesis.
pub trait SignalContext {
    /// Creates a new signal named `name` that is `width` bits wide.
    fn sig(&mut self, name: &str, width: u32) -> SignalId;

    /// Makes `dst` read from `src`.
    fn assign(&mut self, dst: SignalId, src: SignalId);

    /// Binds `signal` to a physical port of the unit being built.
    fn bind_port(&mut self, signal: SignalId, port: PortId);

    /// Records which interface leaf `signal` was created for.
    fn tag_interface(&mut self, signal: SignalId, intf: IntfId);
}

/// A [`SignalContext`] that builds into an [`Architecture`].
pub struct ArchContext<'a> {
    /// The architecture receiving the signals.
    pub arch: &'a mut Architecture,
    /// Type database used to intern signal types.
    pub types: &'a mut TypeDb,
    /// Interner for signal names.
    pub interner: &'a Interner,
}

impl SignalContext for ArchContext<'_> {
    fn sig(&mut self, name: &str, width: u32) -> SignalId {
        let ty = self.types.bits(width);
        let name = self.interner.get_or_intern(name);
        log::trace!("allocating signal `{}` ({width} bits)", self.interner.resolve(name));
        self.arch.add_signal(name, ty, None)
    }

    fn assign(&mut self, dst: SignalId, src: SignalId) {
        self.arch.connect(dst, src);
    }

    fn bind_port(&mut self, signal: SignalId, port: PortId) {
        self.arch.bind_port(signal, port);
    }

    fn tag_interface(&mut self, signal: SignalId, intf: IntfId) {
        self.arch.signals[signal].interface = Some(intf);
    }
}
