// src/trace.rs

//! Traversal tracing for the graph builder
//!
//! The builder reports every `parent -> child` edge it walks, including
//! edges into packages it has already expanded. Observers only watch; they
//! never influence the graph.
//!
//! Implementations:
//! - `StderrTrace`: prints each edge to the diagnostic stream (`--verbose`)
//! - `LogTrace`: forwards edges to tracing at debug level
//! - `RecordingTrace`: keeps edges in memory
//! - `SilentTrace`: discards everything

use std::fmt;
use std::io::Write;
use tracing::debug;

/// One edge walked by the graph builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEdge {
    /// Recursion depth of the sibling list, 0 for the requested packages
    pub depth: usize,
    /// The package whose dependency list is being walked, `None` for roots
    pub parent: Option<String>,
    pub child: String,
}

impl fmt::Display for TraversalEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{} {} -> {}", self.depth, parent, self.child),
            None => write!(f, "{} (root) -> {}", self.depth, self.child),
        }
    }
}

/// Receives edges as the graph builder walks them
pub trait TraversalObserver {
    fn on_edge(&mut self, edge: &TraversalEdge);
}

/// Observer that ignores all edges
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentTrace;

impl TraversalObserver for SilentTrace {
    fn on_edge(&mut self, _edge: &TraversalEdge) {}
}

/// Observer that prints edges to stderr, one per line
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrTrace;

impl TraversalObserver for StderrTrace {
    fn on_edge(&mut self, edge: &TraversalEdge) {
        // A closed stderr must not abort resolution
        let _ = writeln!(std::io::stderr().lock(), "{}", edge);
    }
}

/// Observer that logs edges through tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl TraversalObserver for LogTrace {
    fn on_edge(&mut self, edge: &TraversalEdge) {
        debug!(depth = edge.depth, parent = ?edge.parent, child = %edge.child, "traverse");
    }
}

/// Observer that records every edge
#[derive(Debug, Default, Clone)]
pub struct RecordingTrace {
    edges: Vec<TraversalEdge>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[TraversalEdge] {
        &self.edges
    }
}

impl TraversalObserver for RecordingTrace {
    fn on_edge(&mut self, edge: &TraversalEdge) {
        self.edges.push(edge.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_display() {
        let root = TraversalEdge {
            depth: 0,
            parent: None,
            child: "gcc".to_string(),
        };
        assert_eq!(root.to_string(), "0 (root) -> gcc");

        let nested = TraversalEdge {
            depth: 2,
            parent: Some("gcc".to_string()),
            child: "glibc".to_string(),
        };
        assert_eq!(nested.to_string(), "2 gcc -> glibc");
    }

    #[test]
    fn test_recording_trace_keeps_order() {
        let mut trace = RecordingTrace::new();
        for child in ["a", "b"] {
            trace.on_edge(&TraversalEdge {
                depth: 0,
                parent: None,
                child: child.to_string(),
            });
        }
        let children: Vec<_> = trace.edges().iter().map(|e| e.child.as_str()).collect();
        assert_eq!(children, vec!["a", "b"]);
    }
}
