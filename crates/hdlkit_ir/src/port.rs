//! Entities and their physical ports.

use crate::arena::Arena;
use crate::ids::{PortId, TypeId};
use hdlkit_common::Ident;
use serde::{Deserialize, Serialize};

/// The direction of a port on an entity boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data flows into the entity.
    In,
    /// Data flows out of the entity.
    Out,
    /// Bidirectional.
    InOut,
}

impl PortDirection {
    /// Returns the opposite direction. `InOut` stays `InOut`.
    pub fn opposite(self) -> Self {
        match self {
            PortDirection::In => PortDirection::Out,
            PortDirection::Out => PortDirection::In,
            PortDirection::InOut => PortDirection::InOut,
        }
    }
}

/// A physical port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// The unique ID of this port on its entity.
    pub id: PortId,
    /// The port name.
    pub name: Ident,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The type of the port.
    pub ty: TypeId,
}

/// The external view of a synthesizable unit: its name and ordered ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// The entity name.
    pub name: Ident,
    /// Ports in declaration order.
    pub ports: Arena<PortId, Port>,
}

impl Entity {
    /// Creates an entity without ports.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            ports: Arena::new(),
        }
    }

    /// Appends a port and returns its ID.
    pub fn add_port(&mut self, name: Ident, direction: PortDirection, ty: TypeId) -> PortId {
        self.ports.alloc_with(|id| Port {
            id,
            name,
            direction,
            ty,
        })
    }
}
