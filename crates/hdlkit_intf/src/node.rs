//! Interface instance nodes.

use hdlkit_ir::{IntfId, PortDirection, PortId, SignalId};
use indexmap::IndexMap;

/// Which side of an interface an instance is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntfDirection {
    /// Drives the members whose master direction is `Out`.
    Master,
    /// Drives the members whose master direction is `In`.
    Slave,
}

impl IntfDirection {
    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            IntfDirection::Master => IntfDirection::Slave,
            IntfDirection::Slave => IntfDirection::Master,
        }
    }
}

/// A node of an instantiated interface tree, stored in the synthesizer arena.
#[derive(Debug, Clone)]
pub struct IntfNode {
    /// Member name; for a root, the class name until it is renamed.
    pub name: String,
    /// Direction as seen from the master side.
    pub master_dir: PortDirection,
    /// The resolved side.
    pub direction: IntfDirection,
    /// Member name to child node, in declaration order.
    pub children: IndexMap<String, IntfId>,
    /// The enclosing node.
    pub parent: Option<IntfId>,
    /// Width in bits for leaves.
    pub width: u32,
    /// The backing signal of a leaf, once materialized.
    pub signal: Option<SignalId>,
    /// The entity port this leaf was matched to.
    pub origin_port: Option<PortId>,
    /// The interface driving this one.
    pub src: Option<IntfId>,
    /// Interfaces driven by this one.
    pub destinations: Vec<IntfId>,
    /// Whether this instance is an external port group of the unit.
    pub is_extern: bool,
}

impl IntfNode {
    /// Returns `true` if this node has no members.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
