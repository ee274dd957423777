// src/resolver/level.rs

//! Grouping resolved packages into build levels and dependency loops

use super::depth::{CycleCounter, resolve_depth};
use super::graph::{DependencyTable, NodeDepth};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Packages that can be built once every lower level is done
pub type Level = BTreeSet<String>;

/// Packages sharing one dependency loop id
pub type CycleGroup = BTreeSet<String>;

/// Build levels and loop groups of a dependency table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// `levels[0]` holds depth 1 (leaves), `levels[1]` depth 2, ...
    pub levels: Vec<Level>,
    /// `cycles[0]` holds loop id 1, `cycles[1]` loop id 2, ...
    pub cycles: Vec<CycleGroup>,
}

impl Partition {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// The one-based level a package was placed on
    pub fn level_of(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|level| level.contains(name)).map(|i| i + 1)
    }

    /// The one-based loop group a package was placed in
    pub fn cycle_of(&self, name: &str) -> Option<usize> {
        self.cycles.iter().position(|group| group.contains(name)).map(|i| i + 1)
    }

    pub fn package_count(&self) -> usize {
        self.levels.iter().chain(&self.cycles).map(BTreeSet::len).sum()
    }
}

/// Resolve every node's depth and bucket the table into levels and loops
pub fn partition(table: &mut DependencyTable) -> Partition {
    let mut counter = CycleCounter::new();
    for id in table.ids() {
        if table.node(id).depth == NodeDepth::Unresolved {
            let outcome = resolve_depth(table, id, counter.current());
            counter.record(outcome);
        }
    }

    let mut result = Partition::default();
    for node in table.iter() {
        let bucket = match node.depth {
            NodeDepth::Level(level) => slot(&mut result.levels, level as usize - 1),
            NodeDepth::Cycle(cycle) => slot(&mut result.cycles, cycle.index()),
            other => {
                warn!("{} left unresolved ({:?})", node.name, other);
                continue;
            }
        };
        bucket.insert(node.name.clone());
    }

    result
}

fn slot(groups: &mut Vec<BTreeSet<String>>, index: usize) -> &mut BTreeSet<String> {
    if groups.len() <= index {
        groups.resize_with(index + 1, BTreeSet::new);
    }
    &mut groups[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(edges: &[(&str, &[&str])]) -> DependencyTable {
        let mut table = DependencyTable::new();
        for (name, deps) in edges {
            let (from, _) = table.get_or_insert(name);
            for dep in *deps {
                let (to, _) = table.get_or_insert(dep);
                table.add_dependency(from, to);
            }
        }
        table
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chain_levels() {
        let mut t = table(&[("a", &["b"]), ("b", &["c"])]);
        let p = partition(&mut t);

        assert_eq!(p.levels, vec![set(&["c"]), set(&["b"]), set(&["a"])]);
        assert!(!p.has_cycles());
    }

    #[test]
    fn test_siblings_share_a_level() {
        let mut t = table(&[("a", &["b", "c"])]);
        let p = partition(&mut t);

        assert_eq!(p.levels, vec![set(&["b", "c"]), set(&["a"])]);
        assert_eq!(p.level_of("a"), Some(2));
    }

    #[test]
    fn test_loop_group() {
        let mut t = table(&[("a", &["b"]), ("b", &["a"])]);
        let p = partition(&mut t);

        assert!(p.levels.is_empty());
        assert_eq!(p.cycles, vec![set(&["a", "b"])]);
        assert_eq!(p.cycle_of("b"), Some(1));
    }

    #[test]
    fn test_separate_loops_get_separate_ids() {
        let mut t = table(&[
            ("a", &["b"]),
            ("b", &["a"]),
            ("x", &["y"]),
            ("y", &["z"]),
            ("z", &["x"]),
            ("leaf", &[]),
        ]);
        let p = partition(&mut t);

        assert_eq!(p.cycles, vec![set(&["a", "b"]), set(&["x", "y", "z"])]);
        assert_eq!(p.levels, vec![set(&["leaf"])]);
    }

    #[test]
    fn test_dependents_of_loops_join_the_loop() {
        let mut t = table(&[("top", &["a"]), ("a", &["b"]), ("b", &["a"])]);
        let p = partition(&mut t);

        assert_eq!(p.cycles, vec![set(&["top", "a", "b"])]);
    }

    #[test]
    fn test_short_circuited_dependencies_still_placed() {
        let mut t = table(&[("a", &["b", "c"]), ("b", &["a"]), ("c", &["d"])]);
        let p = partition(&mut t);

        assert_eq!(p.cycles, vec![set(&["a", "b"])]);
        assert_eq!(p.levels, vec![set(&["d"]), set(&["c"])]);
        assert_eq!(p.package_count(), 4);
    }
}
