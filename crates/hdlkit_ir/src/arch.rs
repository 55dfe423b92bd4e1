//! Architectures: the body of one synthesizable unit.
//!
//! An [`Architecture`] owns its signals, processes, concurrent connections,
//! and sub-instances. Construction order is free; code generation sorts
//! everything before rendering.

use crate::arena::Arena;
use crate::expr::Expr;
use crate::ids::{PortId, ProcessId, SignalId, StmtId, TypeId};
use crate::port::{Entity, PortDirection};
use crate::process::Process;
use crate::signal::{Driver, Reader, Signal};
use crate::stmt::Statement;
use crate::value::Value;
use hdlkit_common::Ident;
use serde::{Deserialize, Serialize};

/// A concurrent connection `dst <= src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The driven signal.
    pub dst: SignalId,
    /// The driving signal.
    pub src: SignalId,
}

/// An instance of another unit inside this architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// The instance label.
    pub name: Ident,
    /// The name of the instantiated entity.
    pub entity: Ident,
    /// Port name to connected signal, in port order.
    pub port_map: Vec<(Ident, SignalId)>,
}

/// The behavioral/structural body of one synthesizable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Architecture {
    /// The architecture name.
    pub name: Ident,
    /// The entity this architecture implements.
    pub entity: Entity,
    /// All signals, including hidden ones.
    pub signals: Arena<SignalId, Signal>,
    /// All processes.
    pub processes: Arena<ProcessId, Process>,
    /// Concurrent connections.
    pub connections: Vec<Connection>,
    /// Signals bound to entity ports.
    pub port_bindings: Vec<(PortId, SignalId)>,
    /// Sub-instances.
    pub instances: Vec<ComponentInstance>,
    next_stmt: u32,
}

impl Architecture {
    /// Creates an empty architecture for `entity`.
    pub fn new(name: Ident, entity: Entity) -> Self {
        Self {
            name,
            entity,
            signals: Arena::new(),
            processes: Arena::new(),
            connections: Vec::new(),
            port_bindings: Vec::new(),
            instances: Vec::new(),
            next_stmt: 0,
        }
    }

    /// Hands out the next statement ID.
    pub fn next_stmt_id(&mut self) -> StmtId {
        let id = StmtId::from_raw(self.next_stmt);
        self.next_stmt += 1;
        id
    }

    /// Adds a declared signal.
    pub fn add_signal(&mut self, name: Ident, ty: TypeId, default: Option<Value>) -> SignalId {
        self.signals.alloc_with(|id| Signal {
            id,
            name,
            ty,
            default,
            drivers: Vec::new(),
            readers: Vec::new(),
            hidden: false,
            origin: None,
            interface: None,
        })
    }

    /// Adds a hidden signal standing for `origin`.
    ///
    /// The signal is never declared; every reference renders `origin` instead.
    pub fn add_hidden(&mut self, name: Ident, ty: TypeId, origin: Expr) -> SignalId {
        let mut operands = Vec::new();
        origin.signals(&mut operands);
        let id = self.signals.alloc_with(|id| Signal {
            id,
            name,
            ty,
            default: None,
            drivers: Vec::new(),
            readers: Vec::new(),
            hidden: true,
            origin: Some(origin),
            interface: None,
        });
        for operand in operands {
            self.signals[operand].readers.push(Reader::Connection(id));
        }
        id
    }

    /// Adds a process and records its drivers and readers on the signals.
    pub fn add_process(
        &mut self,
        name: Ident,
        sensitivity: Vec<SignalId>,
        body: Vec<Statement>,
    ) -> ProcessId {
        let mut assigned = Vec::new();
        for stmt in &body {
            stmt.walk(&mut |s| {
                if let Statement::Assignment { id, dst, .. } = s {
                    assigned.push((*dst, *id));
                }
            });
        }
        let pid = self.processes.alloc_with(|id| Process {
            id,
            name,
            sensitivity,
            body,
        });
        for (dst, stmt) in assigned {
            self.signals[dst].drivers.push(Driver::Statement(stmt));
        }
        let sensitivity = self.processes[pid].sensitivity.clone();
        for sig in sensitivity {
            self.signals[sig].readers.push(Reader::Process(pid));
        }
        pid
    }

    /// Connects `dst` to read from `src`.
    pub fn connect(&mut self, dst: SignalId, src: SignalId) {
        self.connections.push(Connection { dst, src });
        self.signals[dst].drivers.push(Driver::Connection(src));
        self.signals[src].readers.push(Reader::Connection(dst));
    }

    /// Binds `signal` to a port of the entity.
    ///
    /// An input port drives the signal; an output port reads it.
    pub fn bind_port(&mut self, signal: SignalId, port: PortId) {
        self.port_bindings.push((port, signal));
        match self.entity.ports[port].direction {
            PortDirection::In => self.signals[signal].drivers.push(Driver::Port(port)),
            PortDirection::Out => self.signals[signal].readers.push(Reader::Port(port)),
            PortDirection::InOut => {
                self.signals[signal].drivers.push(Driver::Port(port));
                self.signals[signal].readers.push(Reader::Port(port));
            }
        }
    }

    /// Adds a sub-instance.
    ///
    /// Port directions of the instantiated unit are not known here, so every
    /// mapped signal counts as both driven and read by the instance.
    pub fn add_instance(&mut self, instance: ComponentInstance) {
        let index = self.instances.len() as u32;
        for &(_, sig) in &instance.port_map {
            let signal = &mut self.signals[sig];
            signal.drivers.push(Driver::Instance(index));
            signal.readers.push(Reader::Instance(index));
        }
        self.instances.push(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDb;

    fn arch() -> (Architecture, TypeId) {
        let mut db = TypeDb::new();
        let ty = db.bits(8);
        let mut entity = Entity::new(Ident::from_raw(0));
        entity.add_port(Ident::from_raw(1), PortDirection::In, ty);
        entity.add_port(Ident::from_raw(2), PortDirection::Out, ty);
        (Architecture::new(Ident::from_raw(3), entity), ty)
    }

    #[test]
    fn stmt_ids_are_monotonic() {
        let (mut a, _) = arch();
        let first = a.next_stmt_id();
        let second = a.next_stmt_id();
        assert!(first < second);
    }

    #[test]
    fn connect_records_both_sides() {
        let (mut a, ty) = arch();
        let x = a.add_signal(Ident::from_raw(4), ty, None);
        let y = a.add_signal(Ident::from_raw(5), ty, None);
        a.connect(y, x);
        assert_eq!(a.connections, vec![Connection { dst: y, src: x }]);
        assert_eq!(a.signals[y].drivers, vec![Driver::Connection(x)]);
        assert_eq!(a.signals[x].readers, vec![Reader::Connection(y)]);
    }

    #[test]
    fn port_binding_follows_direction() {
        let (mut a, ty) = arch();
        let x = a.add_signal(Ident::from_raw(4), ty, None);
        let y = a.add_signal(Ident::from_raw(5), ty, None);
        a.bind_port(x, PortId::from_raw(0));
        a.bind_port(y, PortId::from_raw(1));
        assert_eq!(a.signals[x].drivers, vec![Driver::Port(PortId::from_raw(0))]);
        assert_eq!(a.signals[y].readers, vec![Reader::Port(PortId::from_raw(1))]);
    }

    #[test]
    fn process_registers_drivers_and_readers() {
        let (mut a, ty) = arch();
        let clk = a.add_signal(Ident::from_raw(4), ty, None);
        let q = a.add_signal(Ident::from_raw(5), ty, None);
        let id = a.next_stmt_id();
        let body = vec![Statement::Assignment {
            id,
            dst: q,
            src: Expr::Signal(clk),
            indexes: None,
            is_event_dependent: false,
        }];
        let pid = a.add_process(Ident::from_raw(6), vec![clk], body);
        assert_eq!(a.signals[q].drivers, vec![Driver::Statement(id)]);
        assert_eq!(a.signals[clk].readers, vec![Reader::Process(pid)]);
    }

    #[test]
    fn instance_ports_use_their_signals() {
        let (mut a, ty) = arch();
        let link = a.add_signal(Ident::from_raw(4), ty, None);
        for (label, port) in [(8, 9), (10, 11)] {
            a.add_instance(ComponentInstance {
                name: Ident::from_raw(label),
                entity: Ident::from_raw(12),
                port_map: vec![(Ident::from_raw(port), link)],
            });
        }
        assert_eq!(
            a.signals[link].drivers,
            vec![Driver::Instance(0), Driver::Instance(1)]
        );
        assert_eq!(
            a.signals[link].readers,
            vec![Reader::Instance(0), Reader::Instance(1)]
        );
    }

    #[test]
    fn hidden_signal_reads_operands() {
        let (mut a, ty) = arch();
        let x = a.add_signal(Ident::from_raw(4), ty, None);
        let h = a.add_hidden(
            Ident::from_raw(7),
            ty,
            Expr::op(crate::expr::Operator::Not, vec![Expr::Signal(x)], ty),
        );
        assert!(a.signals[h].alias().is_some());
        assert_eq!(a.signals[x].readers, vec![Reader::Connection(h)]);
    }
}
