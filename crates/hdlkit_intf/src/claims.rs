//! Port claims with an undo log.
//!
//! While interfaces are matched against an entity, every port a leaf binds to
//! is claimed. Claims are recorded in order so a failed match can be undone
//! exactly by truncating back to a mark.

use hdlkit_common::Interner;
use hdlkit_ir::{Entity, IntfId, PortDirection, PortId};

#[derive(Debug, Clone)]
struct PortEntry {
    name: String,
    lower: String,
    direction: PortDirection,
    owner: Option<IntfId>,
}

/// The claim state of the ports of one entity.
#[derive(Debug, Clone)]
pub struct ClaimLog {
    ports: Vec<PortEntry>,
    log: Vec<(PortId, IntfId)>,
}

impl ClaimLog {
    /// Creates a claim table with every port of `entity` unclaimed.
    pub fn new(entity: &Entity, interner: &Interner) -> Self {
        let ports = entity
            .ports
            .values()
            .map(|p| {
                let name = interner.resolve(p.name).to_string();
                PortEntry {
                    lower: name.to_ascii_lowercase(),
                    name,
                    direction: p.direction,
                    owner: None,
                }
            })
            .collect();
        Self {
            ports,
            log: Vec::new(),
        }
    }

    /// Returns the number of ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Returns `true` if the entity has no ports.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Returns the current undo-log position.
    pub fn mark(&self) -> usize {
        self.log.len()
    }

    /// Claims `port` for the interface leaf `intf`.
    pub fn claim(&mut self, port: PortId, intf: IntfId) {
        self.ports[port.as_raw() as usize].owner = Some(intf);
        self.log.push((port, intf));
    }

    /// Undoes every claim made after `mark`, newest first.
    ///
    /// Returns the undone `(port, leaf)` pairs.
    pub fn rollback(&mut self, mark: usize) -> Vec<(PortId, IntfId)> {
        let undone: Vec<_> = self.log.drain(mark..).rev().collect();
        for (port, _) in &undone {
            self.ports[port.as_raw() as usize].owner = None;
        }
        undone
    }

    /// Releases a single claim outside of the undo order.
    pub fn release(&mut self, port: PortId) {
        self.ports[port.as_raw() as usize].owner = None;
        self.log.retain(|(p, _)| *p != port);
    }

    /// Returns the leaf that claimed `port`.
    pub fn owner(&self, port: PortId) -> Option<IntfId> {
        self.ports[port.as_raw() as usize].owner
    }

    /// Returns the owner of every port, in port order.
    pub fn owners(&self) -> Vec<Option<IntfId>> {
        self.ports.iter().map(|p| p.owner).collect()
    }

    /// Returns the name of `port`.
    pub fn name(&self, port: PortId) -> &str {
        &self.ports[port.as_raw() as usize].name
    }

    /// Returns the direction of `port`.
    pub fn direction(&self, port: PortId) -> PortDirection {
        self.ports[port.as_raw() as usize].direction
    }

    /// Returns the instance-name candidate for port `index`, if any.
    ///
    /// The port must be unclaimed and its name must end with `suffix`,
    /// ignoring ASCII case; the candidate is the original name with the suffix removed.
    /// An empty suffix yields the whole port name.
    pub fn candidate(&self, index: usize, suffix: &str) -> Option<String> {
        let port = &self.ports[index];
        if port.owner.is_some() || !port.lower.ends_with(&suffix.to_ascii_lowercase()) {
            return None;
        }
        Some(port.name[..port.name.len() - suffix.len()].to_string())
    }

    /// Finds unclaimed ports whose name equals `name`, ignoring ASCII case.
    pub fn find_unclaimed(&self, name: &str) -> Vec<PortId> {
        self.ports
            .iter()
            .enumerate()
            .filter(|(_, p)| p.owner.is_none() && p.name.eq_ignore_ascii_case(name))
            .map(|(i, _)| PortId::from_raw(i as u32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlkit_ir::TypeDb;

    fn table(names: &[(&str, PortDirection)]) -> ClaimLog {
        let interner = Interner::new();
        let mut types = TypeDb::new();
        let ty = types.bits(1);
        let mut entity = Entity::new(interner.get_or_intern("top"));
        for (name, dir) in names {
            entity.add_port(interner.get_or_intern(name), *dir, ty);
        }
        ClaimLog::new(&entity, &interner)
    }

    #[test]
    fn candidates_strip_suffix() {
        let claims = table(&[("M_Valid", PortDirection::Out), ("clk", PortDirection::In)]);
        assert_eq!(claims.candidate(0, "valid"), Some("M_".to_string()));
        assert_eq!(claims.candidate(1, "valid"), None);
        assert_eq!(claims.candidate(1, ""), Some("clk".to_string()));
    }

    #[test]
    fn rollback_restores_owners() {
        let mut claims = table(&[("a", PortDirection::In), ("b", PortDirection::In)]);
        claims.claim(PortId::from_raw(0), IntfId::from_raw(0));
        let before = claims.owners();
        let mark = claims.mark();
        claims.claim(PortId::from_raw(1), IntfId::from_raw(1));
        assert!(claims.candidate(1, "").is_none());
        let undone = claims.rollback(mark);
        assert_eq!(undone, vec![(PortId::from_raw(1), IntfId::from_raw(1))]);
        assert_eq!(claims.owners(), before);
    }

    #[test]
    fn find_ignores_case_and_claimed_ports() {
        let mut claims = table(&[("DATA", PortDirection::In), ("data", PortDirection::Out)]);
        assert_eq!(claims.find_unclaimed("Data").len(), 2);
        claims.claim(PortId::from_raw(0), IntfId::from_raw(0));
        assert_eq!(claims.find_unclaimed("data"), vec![PortId::from_raw(1)]);
        claims.release(PortId::from_raw(0));
        assert_eq!(claims.mark(), 0);
        assert_eq!(claims.owner(PortId::from_raw(0)), None);
    }
}
