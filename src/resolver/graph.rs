// src/resolver/graph.rs

//! Dependency table data structures
//!
//! Nodes live in an arena addressed by package name. Every name that is
//! ever referenced, as a root or as somebody's dependency, gets exactly one
//! node, and nodes are never removed during a run.

use serde::Serialize;
use std::collections::HashMap;

/// Index of a node in a `DependencyTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifier of a dependency loop, numbered from 1 in discovery order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CycleId(u32);

impl CycleId {
    /// The id handed out for the first loop of a run
    pub const FIRST: CycleId = CycleId(1);

    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id a later-discovered loop receives
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Zero-based index into a list of cycle groups
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

/// Resolution state of a node's build depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeDepth {
    /// Not yet visited by the depth resolver
    #[default]
    Unresolved,
    /// On the current resolution path; reaching it again closes a loop
    InProgress(CycleId),
    /// Settled build level, 1 for leaves
    Level(u32),
    /// Settled as part of, or dependent on, a dependency loop
    Cycle(CycleId),
}

impl NodeDepth {
    pub fn is_resolved(&self) -> bool {
        matches!(self, NodeDepth::Level(_) | NodeDepth::Cycle(_))
    }

    /// The signed encoding: positive levels, negative loop ids, 0 unresolved
    pub fn as_signed(&self) -> i64 {
        match *self {
            NodeDepth::Unresolved => 0,
            NodeDepth::Level(level) => i64::from(level),
            NodeDepth::InProgress(id) | NodeDepth::Cycle(id) => -i64::from(id.get()),
        }
    }
}

/// Independent facts recorded about a package during graph construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeFlags {
    /// The builder has expanded this node
    pub visited: bool,
    /// Some package needs this one only at build time
    pub build_only: bool,
    /// The store has no usable version of this package
    pub not_found: bool,
    /// A declared version relation on this package has no satisfying version
    pub dependency_unmet: bool,
}

/// A package referenced during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub name: String,
    pub version: Option<String>,
    pub depth: NodeDepth,
    pub flags: NodeFlags,
    /// Dependencies in the order the store returned them
    pub dependencies: Vec<NodeId>,
}

impl PackageNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            depth: NodeDepth::Unresolved,
            flags: NodeFlags::default(),
            dependencies: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Arena of package nodes keyed by name, in insertion order
#[derive(Debug, Default, Clone)]
pub struct DependencyTable {
    nodes: Vec<PackageNode>,
    index: HashMap<String, NodeId>,
}

impl DependencyTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the node id for a package name
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Get a node by package name
    pub fn get(&self, name: &str) -> Option<&PackageNode> {
        self.id_of(name).map(|id| &self.nodes[id.0])
    }

    pub fn node(&self, id: NodeId) -> &PackageNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut PackageNode {
        &mut self.nodes[id.0]
    }

    /// Return the node for `name`, creating it if needed
    ///
    /// The flag is true when the node was created by this call.
    pub fn get_or_insert(&mut self, name: &str) -> (NodeId, bool) {
        if let Some(id) = self.id_of(name) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(PackageNode::new(name));
        self.index.insert(name.to_string(), id);
        (id, true)
    }

    /// Record that `from` depends on `to`
    pub fn add_dependency(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.0].dependencies.push(to);
    }

    /// Names of a package's dependencies, in discovery order
    pub fn dependency_names(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|node| {
                node.dependencies
                    .iter()
                    .map(|&dep| self.nodes[dep.0].name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Node ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PackageNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_insert_is_unique_by_name() {
        let mut table = DependencyTable::new();
        let (a, created) = table.get_or_insert("bash");
        assert!(created);
        let (again, created) = table.get_or_insert("bash");
        assert!(!created);
        assert_eq!(a, again);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_dependency_names_in_order() {
        let mut table = DependencyTable::new();
        let (gcc, _) = table.get_or_insert("gcc");
        let (glibc, _) = table.get_or_insert("glibc");
        let (binutils, _) = table.get_or_insert("binutils");
        table.add_dependency(gcc, glibc);
        table.add_dependency(gcc, binutils);

        assert_eq!(table.dependency_names("gcc"), vec!["glibc", "binutils"]);
        assert!(table.dependency_names("missing").is_empty());
        assert!(table.node(glibc).is_leaf());
    }

    #[test]
    fn test_depth_signed_encoding() {
        assert_eq!(NodeDepth::Unresolved.as_signed(), 0);
        assert_eq!(NodeDepth::Level(3).as_signed(), 3);
        assert_eq!(NodeDepth::Cycle(CycleId::FIRST.next()).as_signed(), -2);
        assert!(!NodeDepth::InProgress(CycleId::FIRST).is_resolved());
    }

    #[test]
    fn test_cycle_id_index() {
        assert_eq!(CycleId::FIRST.index(), 0);
        assert_eq!(CycleId::new(3).unwrap().index(), 2);
        assert!(CycleId::new(0).is_none());
    }
}
