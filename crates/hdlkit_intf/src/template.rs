//! Built interface templates and the memo table that owns them.
//!
//! A [`Template`] is the flattened member tree of one interface class, with
//! inherited members merged in. Templates are built once per class name and
//! shared; instances are deep copies made by
//! [`Synthesizer::instantiate`](crate::Synthesizer::instantiate).

use std::collections::HashMap;
use std::rc::Rc;

use hdlkit_ir::PortDirection;
use indexmap::IndexMap;

use crate::def::{ChildDef, InterfaceDef};

/// One node of a template tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    /// Member name (the class name for the root).
    pub name: String,
    /// Direction as seen from the master side.
    pub master_dir: PortDirection,
    /// Width in bits; zero for non-leaves.
    pub width: u32,
    /// Index of the parent node.
    pub parent: Option<usize>,
    /// Member name to node index, in declaration order.
    pub children: IndexMap<String, usize>,
}

/// The flattened member tree of one interface class. The root is node `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<TemplateNode>,
}

impl Template {
    /// Returns the root node.
    pub fn root(&self) -> &TemplateNode {
        &self.nodes[0]
    }

    /// Returns the class name.
    pub fn class_name(&self) -> &str {
        &self.nodes[0].name
    }

    /// Returns all nodes; index `0` is the root.
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    /// Returns the node at `index`.
    pub fn node(&self, index: usize) -> &TemplateNode {
        &self.nodes[index]
    }

    /// Returns the first member of the root, if any.
    pub fn first_child(&self) -> Option<(&str, &TemplateNode)> {
        self.nodes[0]
            .children
            .first()
            .map(|(name, &index)| (name.as_str(), &self.nodes[index]))
    }
}

/// Memo table of built templates, keyed by class name.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Rc<Template>>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the template for `def`, building it on first request.
    ///
    /// Members of parent classes come first, in parent order, followed by the
    /// class's own members. A member redeclared by a later class keeps its
    /// original position but takes the later definition.
    pub fn build(&mut self, def: &InterfaceDef) -> Rc<Template> {
        if let Some(template) = self.templates.get(def.name()) {
            return Rc::clone(template);
        }
        let mut nodes = vec![TemplateNode {
            name: def.name().to_string(),
            master_dir: PortDirection::Out,
            width: 0,
            parent: None,
            children: IndexMap::new(),
        }];
        for (name, child) in merged_children(def) {
            self.push_child(&mut nodes, 0, name, &child);
        }
        log::debug!(
            "built interface template `{}` ({} nodes)",
            def.name(),
            nodes.len()
        );
        let template = Rc::new(Template { nodes });
        self.templates
            .insert(def.name().to_string(), Rc::clone(&template));
        template
    }

    /// Returns the number of templates built so far.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if no template has been built.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn push_child(&mut self, nodes: &mut Vec<TemplateNode>, parent: usize, name: String, child: &ChildDef) {
        let index = nodes.len();
        nodes[parent].children.insert(name.clone(), index);
        match child {
            ChildDef::Leaf {
                master_dir, width, ..
            } => nodes.push(TemplateNode {
                name,
                master_dir: *master_dir,
                width: *width,
                parent: Some(parent),
                children: IndexMap::new(),
            }),
            ChildDef::Nested {
                master_dir, def, ..
            } => {
                let nested = self.build(def);
                nodes.push(TemplateNode {
                    name,
                    master_dir: *master_dir,
                    width: 0,
                    parent: Some(parent),
                    children: IndexMap::new(),
                });
                copy_subtree(nodes, index, &nested, 0);
            }
        }
    }
}

/// Copies the members of `src` node `from` under `nodes[to]`.
fn copy_subtree(nodes: &mut Vec<TemplateNode>, to: usize, src: &Template, from: usize) {
    for (name, &child) in &src.nodes[from].children {
        let index = nodes.len();
        let node = &src.nodes[child];
        nodes.push(TemplateNode {
            name: name.clone(),
            master_dir: node.master_dir,
            width: node.width,
            parent: Some(to),
            children: IndexMap::new(),
        });
        nodes[to].children.insert(name.clone(), index);
        copy_subtree(nodes, index, src, child);
    }
}

fn merged_children(def: &InterfaceDef) -> IndexMap<String, ChildDef> {
    let mut merged = IndexMap::new();
    for parent in def.parents() {
        merged.extend(merged_children(parent));
    }
    for child in def.children() {
        merged.insert(child.name().to_string(), child.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handshaked() -> InterfaceDef {
        InterfaceDef::new("Handshaked")
            .leaf("valid", PortDirection::Out, 1)
            .leaf("data", PortDirection::Out, 8)
    }

    #[test]
    fn parent_members_come_first() {
        let def = InterfaceDef::new("ReadyHandshaked")
            .extends(handshaked())
            .leaf("ready", PortDirection::In, 1);
        let mut registry = TemplateRegistry::new();
        let t = registry.build(&def);
        let names: Vec<&String> = t.root().children.keys().collect();
        assert_eq!(names, vec!["valid", "data", "ready"]);
        assert_eq!(t.class_name(), "ReadyHandshaked");
        assert_eq!(t.first_child().unwrap().0, "valid");
    }

    #[test]
    fn build_is_memoized() {
        let mut registry = TemplateRegistry::new();
        let a = registry.build(&handshaked());
        let b = registry.build(&handshaked());
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn redeclared_member_keeps_position() {
        let def = InterfaceDef::new("Wide")
            .extends(handshaked())
            .leaf("valid", PortDirection::Out, 2);
        let t = TemplateRegistry::new().build(&def);
        let (name, node) = t.first_child().unwrap();
        assert_eq!(name, "valid");
        assert_eq!(node.width, 2);
        assert_eq!(t.root().children.len(), 2);
    }

    #[test]
    fn nested_members_are_inlined() {
        let def = InterfaceDef::new("Pair")
            .nested("a", PortDirection::Out, handshaked())
            .nested("b", PortDirection::In, handshaked());
        let mut registry = TemplateRegistry::new();
        let t = registry.build(&def);
        // root + 2 nested + 2 leaves each
        assert_eq!(t.nodes().len(), 7);
        let b = t.node(t.root().children["b"]);
        assert_eq!(b.master_dir, PortDirection::In);
        let b_data = t.node(b.children["data"]);
        assert_eq!(b_data.width, 8);
        assert_eq!(b_data.parent, Some(t.root().children["b"]));
        // the nested class is memoized on its own
        assert_eq!(registry.len(), 2);
    }
}
