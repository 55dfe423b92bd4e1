//! Collision-free naming for generated declarations.
//!
//! A [`NameScope`] is a stack of levels. Level 0 holds the reserved words of
//! the target language; each unit being rendered pushes a level of its own.
//! A name is taken if any level on the stack uses it.

use std::collections::HashMap;

use hdlkit_ir::{PortId, ProcessId, SignalId, TypeId};
use indexmap::IndexSet;

/// The object a name is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeOwner {
    /// An entity port.
    Port(PortId),
    /// A declared signal.
    Signal(SignalId),
    /// A process.
    Process(ProcessId),
    /// An enum or array type declaration.
    Type(TypeId),
    /// A component instance, by position in the sorted instance list.
    Instance(u32),
}

#[derive(Debug, Default, Clone)]
struct Level {
    used: IndexSet<String>,
    owned: HashMap<(ScopeOwner, String), String>,
}

/// A stack of naming levels.
#[derive(Debug, Clone)]
pub struct NameScope {
    levels: Vec<Level>,
    ignore_case: bool,
}

impl NameScope {
    /// Creates a scope whose base level reserves `keywords`.
    ///
    /// With `ignore_case`, names differing only in ASCII case collide.
    pub fn new<'k>(keywords: impl IntoIterator<Item = &'k str>, ignore_case: bool) -> Self {
        let mut base = Level::default();
        for kw in keywords {
            base.used.insert(normalize(kw, ignore_case));
        }
        Self {
            levels: vec![base],
            ignore_case,
        }
    }

    /// Reserves additional words on the base level.
    pub fn reserve<'k>(&mut self, words: impl IntoIterator<Item = &'k str>) {
        for word in words {
            let key = normalize(word, self.ignore_case);
            self.levels[0].used.insert(key);
        }
    }

    /// Opens a nested level.
    pub fn push_level(&mut self) {
        self.levels.push(Level::default());
    }

    /// Closes the innermost level, forgetting its names. The base level stays.
    pub fn pop_level(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Returns the number of levels, including the base level.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if `name` is used on any level.
    pub fn is_used(&self, name: &str) -> bool {
        let key = normalize(name, self.ignore_case);
        self.levels.iter().any(|l| l.used.contains(&key))
    }

    /// Returns a name for `owner` based on `candidate` that is unique within
    /// the scope and not reserved.
    ///
    /// The same owner asking again for the same candidate gets the same name.
    /// Collisions are resolved by appending `_0`, `_1`, ….
    pub fn checked_name(&mut self, candidate: &str, owner: ScopeOwner) -> String {
        let request = (owner, candidate.to_string());
        if let Some(name) = self.levels.iter().rev().find_map(|l| l.owned.get(&request)) {
            return name.clone();
        }

        let name = if self.is_used(candidate) {
            (0u32..)
                .map(|i| format!("{candidate}_{i}"))
                .find(|suffixed| !self.is_used(suffixed))
                .unwrap_or_else(|| candidate.to_string())
        } else {
            candidate.to_string()
        };
        if name != candidate {
            log::debug!("renamed `{candidate}` to `{name}`");
        }

        let key = normalize(&name, self.ignore_case);
        let innermost = self.levels.len() - 1;
        let top = &mut self.levels[innermost];
        top.used.insert(key);
        top.owned.insert(request, name.clone());
        name
    }
}

fn normalize(name: &str, ignore_case: bool) -> String {
    if ignore_case {
        name.to_ascii_lowercase()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(i: u32) -> ScopeOwner {
        ScopeOwner::Signal(SignalId::from_raw(i))
    }

    #[test]
    fn keywords_are_avoided() {
        let mut scope = NameScope::new(["signal", "in"], true);
        assert_eq!(scope.checked_name("SIGNAL", sig(0)), "SIGNAL_0");
        assert_eq!(scope.checked_name("data", sig(1)), "data");
    }

    #[test]
    fn collisions_get_suffixes() {
        let mut scope = NameScope::new([], false);
        scope.push_level();
        assert_eq!(scope.checked_name("a", sig(0)), "a");
        assert_eq!(scope.checked_name("a", sig(1)), "a_0");
        assert_eq!(scope.checked_name("a", sig(2)), "a_1");
    }

    #[test]
    fn same_owner_same_name() {
        let mut scope = NameScope::new([], false);
        let first = scope.checked_name("x", sig(0));
        let again = scope.checked_name("x", sig(0));
        assert_eq!(first, again);
        assert_eq!(scope.checked_name("x", sig(1)), "x_0");
    }

    #[test]
    fn case_sensitivity_follows_scope() {
        let mut vhdl = NameScope::new([], true);
        vhdl.checked_name("Clk", sig(0));
        assert_eq!(vhdl.checked_name("clk", sig(1)), "clk_0");

        let mut sim = NameScope::new([], false);
        sim.checked_name("Clk", sig(0));
        assert_eq!(sim.checked_name("clk", sig(1)), "clk");
    }

    #[test]
    fn popped_levels_release_names() {
        let mut scope = NameScope::new(["self"], false);
        scope.push_level();
        scope.checked_name("q", sig(0));
        assert_eq!(scope.depth(), 2);
        scope.pop_level();
        scope.pop_level();
        assert_eq!(scope.depth(), 1);
        assert!(!scope.is_used("q"));
        assert!(scope.is_used("self"));
    }

    #[test]
    fn reserved_words_extend_base() {
        let mut scope = NameScope::new([], false);
        scope.reserve(["tmp"]);
        assert_eq!(
            scope.checked_name("tmp", ScopeOwner::Process(ProcessId::from_raw(0))),
            "tmp_0"
        );
    }
}
