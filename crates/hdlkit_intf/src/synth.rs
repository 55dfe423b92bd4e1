//! The interface synthesizer: instantiation, name matching, connection, and
//! signal materialization over an arena of [`IntfNode`]s.

use std::rc::Rc;

use hdlkit_config::SynthConfig;
use hdlkit_ir::{Arena, IntfId, PortDirection, SignalContext, SignalId};

use crate::claims::ClaimLog;
use crate::def::InterfaceDef;
use crate::error::IntfError;
use crate::node::{IntfDirection, IntfNode};
use crate::template::{Template, TemplateRegistry};

/// Owns every interface instance and the templates they were built from.
#[derive(Debug)]
pub struct Synthesizer {
    nodes: Arena<IntfId, IntfNode>,
    registry: TemplateRegistry,
    separator: String,
}

impl Synthesizer {
    /// Creates a synthesizer using the configured name separator.
    pub fn new(config: &SynthConfig) -> Self {
        Self::with_separator(config.name_separator.clone())
    }

    /// Creates a synthesizer with an explicit name separator.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            nodes: Arena::new(),
            registry: TemplateRegistry::new(),
            separator: separator.into(),
        }
    }

    /// Returns the separator placed between nested member names.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: IntfId) -> &IntfNode {
        &self.nodes[id]
    }

    /// Returns the node with the given ID for modification.
    pub fn node_mut(&mut self, id: IntfId) -> &mut IntfNode {
        &mut self.nodes[id]
    }

    /// Returns the number of nodes across all instances.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been instantiated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the template for `def`, building it on first use.
    pub fn template(&mut self, def: &InterfaceDef) -> Rc<Template> {
        self.registry.build(def)
    }

    /// Deep-copies `template` into the arena and returns the new root.
    ///
    /// The root starts as [`IntfDirection::Master`] when it is external and
    /// has no source, otherwise as [`IntfDirection::Slave`]. Members always
    /// start as slaves.
    pub fn instantiate(
        &mut self,
        template: &Template,
        is_extern: bool,
        src: Option<IntfId>,
        mut destinations: Vec<IntfId>,
    ) -> IntfId {
        let base = self.nodes.len() as u32;
        let at = |index: usize| IntfId::from_raw(base + index as u32);
        for (index, t) in template.nodes().iter().enumerate() {
            let root = index == 0;
            let direction = if root && is_extern && src.is_none() {
                IntfDirection::Master
            } else {
                IntfDirection::Slave
            };
            self.nodes.alloc(IntfNode {
                name: t.name.clone(),
                master_dir: t.master_dir,
                direction,
                children: t
                    .children
                    .iter()
                    .map(|(name, &child)| (name.clone(), at(child)))
                    .collect(),
                parent: t.parent.map(at),
                width: t.width,
                signal: None,
                origin_port: None,
                src: if root { src } else { None },
                destinations: if root {
                    std::mem::take(&mut destinations)
                } else {
                    Vec::new()
                },
                is_extern: root && is_extern,
            });
        }
        at(0)
    }

    /// Registers `id` as a destination of its source.
    pub fn propagate_src(&mut self, id: IntfId) {
        if let Some(src) = self.nodes[id].src {
            self.nodes[src].destinations.push(id);
        }
    }

    /// Lists instance-name candidates for `template` among the unclaimed ports.
    ///
    /// A port is a candidate when its name ends with `prefix` followed by the
    /// name of the template's first member; the candidate is the port name
    /// with that ending removed. A template without members matches every
    /// unclaimed port by its full name. The iterator reads the claim state as
    /// it goes.
    pub fn extract_candidate_names<'a>(
        template: &Template,
        claims: &'a ClaimLog,
        prefix: &str,
    ) -> Result<impl Iterator<Item = String> + 'a, IntfError> {
        let suffix = format!("{prefix}{}", first_member_name(template)?);
        Ok((0..claims.len()).filter_map(move |index| claims.candidate(index, &suffix)))
    }

    /// Matches the subtree at `node` against the ports named `prefix` + member
    /// path, claiming every port it binds.
    ///
    /// A leaf binds to the one unclaimed port equal to `prefix` (ignoring
    /// case) and becomes a master when the port direction equals its master
    /// direction. A nested member matches when it resolved to the side its
    /// master direction names: master for `Out`, slave for `In`. A non-leaf
    /// becomes a master when every member matched, a slave when none did. On
    /// failure every claim made by this call is undone.
    pub fn match_by_name(
        &mut self,
        node: IntfId,
        prefix: &str,
        claims: &mut ClaimLog,
    ) -> Result<IntfId, IntfError> {
        let mark = claims.mark();
        let result = self.match_members(node, prefix, claims);
        if let Err(err) = &result {
            log::debug!("rolling back match of `{prefix}`: {err}");
            self.rollback(claims, mark);
        }
        result.map(|()| node)
    }

    fn match_members(
        &mut self,
        node: IntfId,
        prefix: &str,
        claims: &mut ClaimLog,
    ) -> Result<(), IntfError> {
        let members = self.members(node);
        if members.is_empty() {
            return self.match_leaf(node, prefix, claims);
        }

        let mut all_match = true;
        let mut none_match = true;
        for (name, child) in members {
            self.match_by_name(child, &format!("{prefix}{name}"), claims)?;
            let member = &self.nodes[child];
            let is_master = member.direction == IntfDirection::Master;
            let matched = if member.is_leaf() {
                is_master
            } else {
                is_master == (member.master_dir == PortDirection::Out)
            };
            all_match &= matched;
            none_match &= !matched;
        }
        self.nodes[node].direction = if all_match {
            IntfDirection::Master
        } else if none_match {
            IntfDirection::Slave
        } else {
            return Err(IntfError::incompatible(format!(
                "direction mismatch in `{prefix}`"
            )));
        };
        Ok(())
    }

    fn match_leaf(
        &mut self,
        node: IntfId,
        prefix: &str,
        claims: &mut ClaimLog,
    ) -> Result<(), IntfError> {
        let port = match claims.find_unclaimed(prefix).as_slice() {
            [port] => *port,
            [] => return Err(IntfError::incompatible(format!("missing {prefix}"))),
            many => {
                return Err(IntfError::incompatible(format!(
                    "{} ports match {prefix}",
                    many.len()
                )))
            }
        };
        claims.claim(port, node);
        let leaf = &mut self.nodes[node];
        leaf.origin_port = Some(port);
        leaf.direction = if claims.direction(port) == leaf.master_dir {
            IntfDirection::Master
        } else {
            IntfDirection::Slave
        };
        log::debug!(
            "bound `{prefix}` to port `{}` as {:?}",
            claims.name(port),
            leaf.direction
        );
        Ok(())
    }

    fn rollback(&mut self, claims: &mut ClaimLog, mark: usize) {
        for (_, leaf) in claims.rollback(mark) {
            self.nodes[leaf].origin_port = None;
        }
    }

    /// Finds every instance of `def` among the unclaimed ports of an entity.
    ///
    /// Candidates are tried in port order; each successful match claims its
    /// ports before the next candidate is considered. Incompatible candidates
    /// are skipped and leave no trace in the arena. Returns the instance names
    /// (one trailing separator removed) with their roots.
    pub fn try_extract_all(
        &mut self,
        def: &InterfaceDef,
        claims: &mut ClaimLog,
    ) -> Result<Vec<(String, IntfId)>, IntfError> {
        let template = self.template(def);
        let suffix = first_member_name(&template)?.to_string();
        let mut found = Vec::new();
        for index in 0..claims.len() {
            let Some(candidate) = claims.candidate(index, &suffix) else {
                continue;
            };
            log::debug!("trying `{}` as `{candidate}`", def.name());
            let arena_mark = self.nodes.len();
            let root = self.instantiate(&template, true, None, Vec::new());
            match self.match_by_name(root, &candidate, claims) {
                Ok(root) => {
                    let name = candidate
                        .strip_suffix(self.separator.as_str())
                        .unwrap_or(&candidate)
                        .to_string();
                    log::debug!("extracted `{}` instance `{name}`", def.name());
                    self.nodes[root].name = name.clone();
                    found.push((name, root));
                }
                Err(IntfError::Incompatible { reason }) => {
                    log::debug!("`{candidate}` is not a `{}`: {reason}", def.name());
                    self.nodes.truncate(arena_mark);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(found)
    }

    /// Connects `destination` so that it is driven by `source`.
    ///
    /// Members are visited in order; the side that drives each member follows
    /// from the destination member's resolved direction and master direction.
    /// Leaves assign their backing signals through `ctx`.
    pub fn connect_to(
        &self,
        destination: IntfId,
        source: IntfId,
        ctx: &mut dyn SignalContext,
    ) -> Result<(), IntfError> {
        let dst = &self.nodes[destination];
        if dst.is_leaf() {
            return self.connect_leaf(destination, source, ctx);
        }
        for (name, &dst_child) in &dst.children {
            let src_child = self.nodes[source].children.get(name).copied().ok_or_else(|| {
                IntfError::configuration(format!(
                    "`{}` has no member `{name}` to drive `{}`",
                    self.full_name(source),
                    self.full_name(dst_child)
                ))
            })?;
            let child = &self.nodes[dst_child];
            match (child.direction, child.master_dir) {
                (IntfDirection::Master, PortDirection::Out)
                | (IntfDirection::Slave, PortDirection::In) => {
                    self.connect_to(src_child, dst_child, ctx)?
                }
                (IntfDirection::Slave, PortDirection::Out)
                | (IntfDirection::Master, PortDirection::In) => {
                    self.connect_to(dst_child, src_child, ctx)?
                }
                (direction, master_dir) => {
                    return Err(IntfError::configuration(format!(
                        "`{}` is {direction:?} with master direction {master_dir:?}",
                        self.full_name(dst_child)
                    )))
                }
            }
        }
        Ok(())
    }

    fn connect_leaf(
        &self,
        destination: IntfId,
        source: IntfId,
        ctx: &mut dyn SignalContext,
    ) -> Result<(), IntfError> {
        let dst = &self.nodes[destination];
        if dst.is_extern && dst.direction != IntfDirection::Slave {
            return Err(IntfError::configuration(format!(
                "external `{}` is driven from inside but is not a slave",
                dst.name
            )));
        }
        let dst_sig = self.backing_signal(destination)?;
        let src_sig = self.backing_signal(source)?;
        log::trace!(
            "connecting `{}` <= `{}`",
            self.full_name(destination),
            self.full_name(source)
        );
        ctx.assign(dst_sig, src_sig);
        Ok(())
    }

    fn backing_signal(&self, id: IntfId) -> Result<SignalId, IntfError> {
        self.nodes[id].signal.ok_or_else(|| {
            IntfError::configuration(format!(
                "no backing signal for `{}`",
                self.display_name(id)
            ))
        })
    }

    /// Connects every recorded destination below and at `root`, members first.
    pub fn propagate_connections(
        &self,
        root: IntfId,
        ctx: &mut dyn SignalContext,
    ) -> Result<(), IntfError> {
        for &child in self.nodes[root].children.values() {
            self.propagate_connections(child, ctx)?;
        }
        for &destination in &self.nodes[root].destinations {
            self.connect_to(destination, root, ctx)?;
        }
        Ok(())
    }

    /// Returns the backing signals of every leaf under `node`, creating the
    /// missing ones.
    ///
    /// A new signal is named `prefix` extended by the member path, sized to
    /// the leaf width, and bound to the port the leaf was matched to.
    pub fn materialize_signals(
        &mut self,
        node: IntfId,
        ctx: &mut dyn SignalContext,
        prefix: &str,
    ) -> Vec<SignalId> {
        let members = self.members(node);
        if !members.is_empty() {
            let mut signals = Vec::new();
            for (name, child) in members {
                let child_prefix = format!("{prefix}{}{name}", self.separator);
                signals.extend(self.materialize_signals(child, ctx, &child_prefix));
            }
            return signals;
        }

        if let Some(signal) = self.nodes[node].signal {
            return vec![signal];
        }
        let signal = ctx.sig(prefix, self.nodes[node].width);
        ctx.tag_interface(signal, node);
        self.nodes[node].signal = Some(signal);
        if let Some(port) = self.nodes[node].origin_port {
            ctx.bind_port(signal, port);
        }
        vec![signal]
    }

    /// Forgets the backing signals under `node`, and its connections when
    /// `remove_connections` is set.
    ///
    /// Used when a synthesized unit is reused inside a different hierarchy.
    pub fn detach_signals(&mut self, node: IntfId, remove_connections: bool) {
        let n = &mut self.nodes[node];
        n.signal = None;
        if remove_connections {
            n.src = None;
            n.destinations.clear();
        }
        for (_, child) in self.members(node) {
            self.detach_signals(child, remove_connections);
        }
    }

    /// Flips the resolved direction of `node` and all of its members.
    pub fn reverse_direction(&mut self, node: IntfId) {
        let n = &mut self.nodes[node];
        n.direction = n.direction.opposite();
        for (_, child) in self.members(node) {
            self.reverse_direction(child);
        }
    }

    /// Returns the dot-joined member path from the instance root to `node`.
    ///
    /// The root itself contributes no segment, so a root yields `""`.
    pub fn full_name(&self, node: IntfId) -> String {
        let mut segments = Vec::new();
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            segments.push(self.nodes[current].name.as_str());
            current = parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Releases every port claimed by leaves under `node`.
    pub fn un_extract(&mut self, node: IntfId, claims: &mut ClaimLog) {
        if let Some(port) = self.nodes[node].origin_port.take() {
            if claims.owner(port) == Some(node) {
                claims.release(port);
            }
        }
        for (_, child) in self.members(node) {
            self.un_extract(child, claims);
        }
    }

    fn members(&self, node: IntfId) -> Vec<(String, IntfId)> {
        self.nodes[node]
            .children
            .iter()
            .map(|(name, &child)| (name.clone(), child))
            .collect()
    }

    fn display_name(&self, id: IntfId) -> String {
        let path = self.full_name(id);
        if path.is_empty() {
            self.nodes[id].name.clone()
        } else {
            path
        }
    }
}

fn first_member_name(template: &Template) -> Result<&str, IntfError> {
    match template.first_child() {
        None => Ok(""),
        Some((name, node)) if !node.children.is_empty() => Err(IntfError::configuration(format!(
            "`{}` starts with nested member `{name}`; only one level can be matched by name",
            template.class_name()
        ))),
        Some((name, _)) => Ok(name),
    }
}
