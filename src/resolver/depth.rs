// src/resolver/depth.rs

//! Build depth and dependency loop computation
//!
//! A node's depth is 1 for leaves and `1 + max(dependency depths)`
//! otherwise. While a node is being resolved it carries the attempt's
//! loop id as an in-progress marker. Reaching such a node again closes a
//! loop: the id propagates back along the path and every node on it
//! settles into that loop instead of a level. A node stops looking at its
//! remaining dependencies as soon as one of them reports a loop.

use super::graph::{CycleId, DependencyTable, NodeDepth, NodeId};

/// Settled outcome of resolving one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Level(u32),
    Cycle(CycleId),
}

impl From<Resolved> for NodeDepth {
    fn from(resolved: Resolved) -> Self {
        match resolved {
            Resolved::Level(level) => NodeDepth::Level(level),
            Resolved::Cycle(id) => NodeDepth::Cycle(id),
        }
    }
}

/// Hands out loop ids to successive resolution attempts
///
/// The id only advances when an attempt closes a loop nobody had seen yet,
/// so assigned ids are dense from 1.
#[derive(Debug, Clone)]
pub struct CycleCounter {
    next: CycleId,
}

impl CycleCounter {
    pub fn new() -> Self {
        Self {
            next: CycleId::FIRST,
        }
    }

    /// The id to hand to the next resolution attempt
    pub fn current(&self) -> CycleId {
        self.next
    }

    /// Record the outcome of an attempt started with `current()`
    pub fn record(&mut self, outcome: Resolved) {
        if outcome == Resolved::Cycle(self.next) {
            self.next = self.next.next();
        }
    }

    /// Number of loops discovered so far
    pub fn discovered(&self) -> u32 {
        self.next.get() - 1
    }
}

impl Default for CycleCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A node whose dependencies are being resolved
struct Frame {
    id: NodeId,
    next: usize,
    max_depth: u32,
    cycle: Option<CycleId>,
}

impl Frame {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            next: 0,
            max_depth: 0,
            cycle: None,
        }
    }
}

/// Settle a node without descending, or mark it in progress
///
/// Returns `None` when the node's dependencies still need to be visited.
fn enter(table: &mut DependencyTable, id: NodeId, sentinel: CycleId) -> Option<Resolved> {
    let node = table.node_mut(id);
    if node.is_leaf() {
        node.depth = NodeDepth::Level(1);
        return Some(Resolved::Level(1));
    }

    match node.depth {
        NodeDepth::Level(level) => Some(Resolved::Level(level)),
        NodeDepth::Cycle(cycle) | NodeDepth::InProgress(cycle) => Some(Resolved::Cycle(cycle)),
        NodeDepth::Unresolved => {
            node.depth = NodeDepth::InProgress(sentinel);
            None
        }
    }
}

/// Resolve the depth of `start` and everything it needs
///
/// `sentinel` is the loop id assigned if this attempt closes a new loop.
/// Results are memoized in each node's `depth`.
pub fn resolve_depth(table: &mut DependencyTable, start: NodeId, sentinel: CycleId) -> Resolved {
    if let Some(settled) = enter(table, start, sentinel) {
        return settled;
    }

    let mut stack = vec![Frame::new(start)];
    let mut finished: Option<Resolved> = None;

    while let Some(frame) = stack.last_mut() {
        match finished.take() {
            Some(Resolved::Cycle(cycle)) => frame.cycle = Some(cycle),
            Some(Resolved::Level(level)) => frame.max_depth = frame.max_depth.max(level + 1),
            None => {}
        }

        let next_dep = match frame.cycle {
            Some(_) => None,
            None => table.node(frame.id).dependencies.get(frame.next).copied(),
        };

        if let Some(dep) = next_dep {
            frame.next += 1;
            match enter(table, dep, sentinel) {
                Some(settled) => finished = Some(settled),
                None => stack.push(Frame::new(dep)),
            }
            continue;
        }

        let outcome = match frame.cycle {
            Some(cycle) => Resolved::Cycle(cycle),
            None => Resolved::Level(frame.max_depth),
        };
        table.node_mut(frame.id).depth = outcome.into();
        stack.pop();
        if stack.is_empty() {
            return outcome;
        }
        finished = Some(outcome);
    }

    unreachable!("resolution stack emptied without settling the start node")
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

    fn depth(table: &DependencyTable, name: &str) -> NodeDepth {
        table.get(name).unwrap().depth
    }

    #[test]
    fn test_chain_depths() {
        let mut t = table(&[("a", &["b"]), ("b", &["c"])]);
        let a = t.id_of("a").unwrap();

        assert_eq!(resolve_depth(&mut t, a, CycleId::FIRST), Resolved::Level(3));
        assert_eq!(depth(&t, "b"), NodeDepth::Level(2));
        assert_eq!(depth(&t, "c"), NodeDepth::Level(1));
    }

    #[test]
    fn test_depth_takes_longest_chain() {
        let mut t = table(&[("a", &["c", "b"]), ("b", &["c"])]);
        let a = t.id_of("a").unwrap();

        assert_eq!(resolve_depth(&mut t, a, CycleId::FIRST), Resolved::Level(3));
    }

    #[test]
    fn test_two_node_loop() {
        let mut t = table(&[("a", &["b"]), ("b", &["a"])]);
        let a = t.id_of("a").unwrap();

        assert_eq!(resolve_depth(&mut t, a, CycleId::FIRST), Resolved::Cycle(CycleId::FIRST));
        assert_eq!(depth(&t, "a"), NodeDepth::Cycle(CycleId::FIRST));
        assert_eq!(depth(&t, "b"), NodeDepth::Cycle(CycleId::FIRST));
    }

    #[test]
    fn test_loop_short_circuits_remaining_dependencies() {
        let mut t = table(&[("a", &["b", "c"]), ("b", &["a"]), ("c", &["d"])]);
        let a = t.id_of("a").unwrap();

        resolve_depth(&mut t, a, CycleId::FIRST);
        assert_eq!(depth(&t, "c"), NodeDepth::Unresolved);
        assert_eq!(depth(&t, "d"), NodeDepth::Unresolved);
    }

    #[test]
    fn test_settled_loop_is_reused() {
        let mut t = table(&[("a", &["b"]), ("b", &["a"]), ("x", &["a"])]);
        let a = t.id_of("a").unwrap();
        let x = t.id_of("x").unwrap();
        let second = CycleId::FIRST.next();

        resolve_depth(&mut t, a, CycleId::FIRST);
        // x depends on an already-settled loop: it inherits that id, not its own
        assert_eq!(resolve_depth(&mut t, x, second), Resolved::Cycle(CycleId::FIRST));
    }

    #[test]
    fn test_counter_advances_only_on_new_loops() {
        let mut counter = CycleCounter::new();
        counter.record(Resolved::Level(4));
        assert_eq!(counter.current(), CycleId::FIRST);

        counter.record(Resolved::Cycle(CycleId::FIRST));
        assert_eq!(counter.current(), CycleId::FIRST.next());

        counter.record(Resolved::Cycle(CycleId::FIRST));
        assert_eq!(counter.discovered(), 1);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut t = DependencyTable::new();
        let mut prev = t.get_or_insert("pkg0").0;
        for i in 1..200_000 {
            let (next, _) = t.get_or_insert(&format!("pkg{}", i));
            t.add_dependency(prev, next);
            prev = next;
        }
        let root = t.id_of("pkg0").unwrap();

        assert_eq!(resolve_depth(&mut t, root, CycleId::FIRST), Resolved::Level(200_000));
    }
}
