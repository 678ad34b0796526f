//! The seam between layout logic and a solid-modeling backend.
//!
//! Everything in this crate that produces geometry goes through
//! [`GeometryKernel`]. [`CsgTree`] is the built-in backend: it records the
//! operations as a serializable tree that a real modeler can replay.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::Box3;

/// Solid construction operations a backend must provide.
pub trait GeometryKernel {
    type Solid;

    /// An axis-aligned box.
    fn cuboid(&mut self, bounds: &Box3) -> Self::Solid;

    /// The union of all `parts`.
    fn union(&mut self, parts: Vec<Self::Solid>) -> Self::Solid;

    /// `base` with every tool removed.
    fn difference(&mut self, base: Self::Solid, tools: Vec<Self::Solid>) -> Self::Solid;
}

/// A recorded constructive-solid-geometry expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CsgNode {
    Cuboid { bounds: Box3 },
    Union { children: Vec<CsgNode> },
    Difference { base: Box<CsgNode>, tools: Vec<CsgNode> },
}

impl CsgNode {
    /// Number of nodes in this expression, itself included.
    pub fn node_count(&self) -> usize {
        match self {
            CsgNode::Cuboid { .. } => 1,
            CsgNode::Union { children } => 1 + children.iter().map(CsgNode::node_count).sum::<usize>(),
            CsgNode::Difference { base, tools } => {
                1 + base.node_count() + tools.iter().map(CsgNode::node_count).sum::<usize>()
            }
        }
    }

    /// Every cuboid in the expression, in depth-first order.
    pub fn cuboids(&self) -> Vec<&Box3> {
        let mut out = Vec::new();
        self.collect_cuboids(&mut out);
        out
    }

    fn collect_cuboids<'a>(&'a self, out: &mut Vec<&'a Box3>) {
        match self {
            CsgNode::Cuboid { bounds } => out.push(bounds),
            CsgNode::Union { children } => children.iter().for_each(|c| c.collect_cuboids(out)),
            CsgNode::Difference { base, tools } => {
                base.collect_cuboids(out);
                tools.iter().for_each(|t| t.collect_cuboids(out));
            }
        }
    }
}

/// Backend that builds [`CsgNode`] expressions.
#[derive(Debug, Default)]
pub struct CsgTree {
    operations: usize,
}

impl CsgTree {
    /// Operations performed so far.
    pub fn operations(&self) -> usize {
        self.operations
    }
}

impl GeometryKernel for CsgTree {
    type Solid = CsgNode;

    fn cuboid(&mut self, bounds: &Box3) -> CsgNode {
        self.operations += 1;
        CsgNode::Cuboid { bounds: *bounds }
    }

    fn union(&mut self, mut parts: Vec<CsgNode>) -> CsgNode {
        self.operations += 1;
        if parts.len() == 1 {
            if let Some(only) = parts.pop() {
                return only;
            }
        }
        CsgNode::Union { children: parts }
    }

    fn difference(&mut self, base: CsgNode, tools: Vec<CsgNode>) -> CsgNode {
        self.operations += 1;
        trace!(tools = tools.len(), "difference");
        CsgNode::Difference {
            base: Box::new(base),
            tools,
        }
    }
}
