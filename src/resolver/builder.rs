// src/resolver/builder.rs

//! Dependency graph construction
//!
//! Walks outward from the requested packages, depth-first, asking the data
//! source for each package's version and outstanding dependencies. Every
//! subtree is completed before the next sibling is started. The walk uses
//! an explicit stack, so deep dependency chains cannot overflow the call
//! stack.
//!
//! Only the `visited` flag bounds the walk. Loops are left in the table for
//! the depth resolver to report.

use super::ResolveOptions;
use super::graph::{DependencyTable, NodeId};
use super::source::DataSource;
use crate::error::Result;
use crate::trace::{StderrTrace, TraversalEdge, TraversalObserver};
use tracing::debug;

/// A sibling list being walked
struct Frame {
    parent: Option<NodeId>,
    siblings: Vec<NodeId>,
    next: usize,
    depth: usize,
}

/// Populates a `DependencyTable` from a data source
pub struct GraphBuilder<'a, S: DataSource> {
    source: S,
    options: &'a ResolveOptions,
}

impl<'a, S: DataSource> GraphBuilder<'a, S> {
    pub fn new(source: S, options: &'a ResolveOptions) -> Self {
        Self { source, options }
    }

    /// Add every package reachable from `roots` to `table`
    ///
    /// Each walked edge is reported to `observer`, including edges into
    /// packages that were already expanded. Verbose runs also print every
    /// edge to stderr.
    pub fn build<I, T>(
        &self,
        roots: I,
        table: &mut DependencyTable,
        observer: &mut dyn TraversalObserver,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let roots: Vec<NodeId> = roots
            .into_iter()
            .map(|name| table.get_or_insert(name.as_ref()).0)
            .collect();

        let mut stack = vec![Frame {
            parent: None,
            siblings: roots,
            next: 0,
            depth: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&id) = frame.siblings.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let (parent, depth) = (frame.parent, frame.depth);

            let edge = TraversalEdge {
                depth,
                parent: parent.map(|p| table.node(p).name.clone()),
                child: table.node(id).name.clone(),
            };
            if self.options.verbose {
                StderrTrace.on_edge(&edge);
            }
            observer.on_edge(&edge);

            if let Some(children) = self.expand(id, table)? {
                stack.push(Frame {
                    parent: Some(id),
                    siblings: children,
                    next: 0,
                    depth: depth + 1,
                });
            }
        }

        Ok(())
    }

    /// Visit one node, returning the dependencies to walk next
    ///
    /// Returns `None` for nodes that were already visited and for packages
    /// the data source does not know.
    fn expand(&self, id: NodeId, table: &mut DependencyTable) -> Result<Option<Vec<NodeId>>> {
        let node = table.node_mut(id);
        if node.flags.visited {
            return Ok(None);
        }
        node.flags.visited = true;
        let name = node.name.clone();
        let arch = self.options.arch.as_str();

        if node.version.is_none() {
            match self.source.resolve_version(&name, arch)? {
                Some(version) => table.node_mut(id).version = Some(version),
                None => {
                    debug!("{} not found for {}", name, arch);
                    table.node_mut(id).flags.not_found = true;
                    return Ok(None);
                }
            }
        }

        let rows = self
            .source
            .list_dependencies(&name, arch, self.options.include_build_deps)?;

        for row in rows {
            let (dep, created) = table.get_or_insert(&row.name);
            table.add_dependency(id, dep);

            let dep_node = table.node_mut(dep);
            if created {
                dep_node.version = row.version.clone();
            }
            if row.build_only {
                dep_node.flags.build_only = true;
            }
            if row.version.is_none() {
                dep_node.flags.dependency_unmet = true;
            }
        }

        Ok(Some(table.node(id).dependencies.clone()))
    }
}
