//! Declarative interface class descriptions.

use hdlkit_ir::PortDirection;

/// A member of an interface class.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildDef {
    /// A single signal.
    Leaf {
        /// Member name.
        name: String,
        /// Direction of the signal as seen from the master side.
        master_dir: PortDirection,
        /// Width in bits.
        width: u32,
    },
    /// A nested interface.
    Nested {
        /// Member name.
        name: String,
        /// Direction of the nested interface as seen from the master side.
        master_dir: PortDirection,
        /// The nested interface class.
        def: InterfaceDef,
    },
}

impl ChildDef {
    /// Returns the member name.
    pub fn name(&self) -> &str {
        match self {
            ChildDef::Leaf { name, .. } | ChildDef::Nested { name, .. } => name,
        }
    }
}

/// An interface class: a name, the classes it extends, and its own members.
///
/// ```
/// use hdlkit_intf::InterfaceDef;
/// use hdlkit_ir::PortDirection;
///
/// let handshake = InterfaceDef::new("Handshaked")
///     .leaf("valid", PortDirection::Out, 1)
///     .leaf("data", PortDirection::Out, 8);
/// let ready = InterfaceDef::new("ReadyHandshaked")
///     .extends(handshake)
///     .leaf("ready", PortDirection::In, 1);
/// assert_eq!(ready.children().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDef {
    name: String,
    parents: Vec<InterfaceDef>,
    children: Vec<ChildDef>,
}

impl InterfaceDef {
    /// Creates a class without members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Inherits the members of `parent`. Parents are merged in the order added.
    pub fn extends(mut self, parent: InterfaceDef) -> Self {
        self.parents.push(parent);
        self
    }

    /// Appends a signal member.
    pub fn leaf(mut self, name: impl Into<String>, master_dir: PortDirection, width: u32) -> Self {
        self.children.push(ChildDef::Leaf {
            name: name.into(),
            master_dir,
            width,
        });
        self
    }

    /// Appends a nested interface member.
    pub fn nested(
        mut self,
        name: impl Into<String>,
        master_dir: PortDirection,
        def: InterfaceDef,
    ) -> Self {
        self.children.push(ChildDef::Nested {
            name: name.into(),
            master_dir,
            def,
        });
        self
    }

    /// Returns the class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent classes.
    pub fn parents(&self) -> &[InterfaceDef] {
        &self.parents
    }

    /// Returns the members declared directly on this class.
    pub fn children(&self) -> &[ChildDef] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_order() {
        let def = InterfaceDef::new("Axis")
            .leaf("data", PortDirection::Out, 32)
            .leaf("last", PortDirection::Out, 1)
            .leaf("ready", PortDirection::In, 1);
        let names: Vec<&str> = def.children().iter().map(ChildDef::name).collect();
        assert_eq!(names, vec!["data", "last", "ready"]);
    }

    #[test]
    fn nested_member() {
        let inner = InterfaceDef::new("Inner").leaf("x", PortDirection::Out, 1);
        let def = InterfaceDef::new("Outer").nested("a", PortDirection::Out, inner.clone());
        match &def.children()[0] {
            ChildDef::Nested { name, def, .. } => {
                assert_eq!(name, "a");
                assert_eq!(def, &inner);
            }
            other => panic!("expected nested member, got {other:?}"),
        }
    }
}
