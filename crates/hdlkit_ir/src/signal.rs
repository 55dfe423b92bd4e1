//! Signals: the leaf primitives of an architecture.

use crate::expr::Expr;
use crate::ids::{IntfId, PortId, ProcessId, SignalId, StmtId, TypeId};
use crate::value::Value;
use hdlkit_common::Ident;
use serde::{Deserialize, Serialize};

/// Something that drives a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    /// An input port of the owning entity.
    Port(PortId),
    /// A concurrent connection reading from another signal.
    Connection(SignalId),
    /// An assignment statement in a process.
    Statement(StmtId),
    /// A port of a sub-instance, by position in the instance list.
    Instance(u32),
}

/// Something that reads a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reader {
    /// An output port of the owning entity.
    Port(PortId),
    /// A concurrent connection driving another signal.
    Connection(SignalId),
    /// A process that is sensitive to the signal.
    Process(ProcessId),
    /// A port of a sub-instance, by position in the instance list.
    Instance(u32),
}

/// A named, typed signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The unique ID of this signal within its architecture.
    pub id: SignalId,
    /// The signal name.
    pub name: Ident,
    /// The type of this signal.
    pub ty: TypeId,
    /// The value the signal holds before anything drives it.
    pub default: Option<Value>,
    /// Everything driving this signal.
    pub drivers: Vec<Driver>,
    /// Everything reading this signal.
    pub readers: Vec<Reader>,
    /// Hidden signals are never declared; they stand for [`Signal::origin`].
    pub hidden: bool,
    /// The expression a hidden signal stands for.
    pub origin: Option<Expr>,
    /// The interface leaf this signal was materialized for.
    pub interface: Option<IntfId>,
}

impl Signal {
    /// Returns the aliased expression of a hidden signal.
    pub fn alias(&self) -> Option<&Expr> {
        if self.hidden {
            self.origin.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Operator;

    fn plain(id: u32) -> Signal {
        Signal {
            id: SignalId::from_raw(id),
            name: Ident::from_raw(1),
            ty: TypeId::from_raw(0),
            default: None,
            drivers: Vec::new(),
            readers: Vec::new(),
            hidden: false,
            origin: None,
            interface: None,
        }
    }

    #[test]
    fn plain_signal_has_no_alias() {
        let mut sig = plain(0);
        sig.origin = Some(Expr::Signal(SignalId::from_raw(3)));
        assert!(sig.alias().is_none());
    }

    #[test]
    fn hidden_signal_aliases_origin() {
        let mut sig = plain(0);
        sig.hidden = true;
        sig.origin = Some(Expr::op(
            Operator::Not,
            vec![Expr::Signal(SignalId::from_raw(1))],
            TypeId::from_raw(0),
        ));
        assert!(matches!(sig.alias(), Some(Expr::Op(_))));
    }

    #[test]
    fn drivers_and_readers_are_distinct_kinds() {
        let mut sig = plain(2);
        sig.drivers.push(Driver::Port(PortId::from_raw(0)));
        sig.readers.push(Reader::Process(ProcessId::from_raw(0)));
        assert_eq!(sig.drivers, vec![Driver::Port(PortId::from_raw(0))]);
        assert_eq!(sig.readers.len(), 1);
    }
}
