//! Combine per-filament forests into one renumbered node list

use super::forest::Forest;
use crate::swc::{SwcNode, ROOT_PARENT};

/// Where one source forest landed in a combined node list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestSpan {
    /// Position of the forest in the merge input
    pub source: usize,
    /// Amount added to its ids
    pub offset: i64,
    pub len: usize,
}

/// Several forests concatenated with globally unique, dense ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedSwc {
    nodes: Vec<SwcNode>,
    spans: Vec<ForestSpan>,
}

impl CombinedSwc {
    pub fn nodes(&self) -> &[SwcNode] {
        &self.nodes
    }

    pub fn spans(&self) -> &[ForestSpan] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Concatenate forests in order, shifting ids by a running offset
///
/// Root markers keep their `-1` parent. Empty forests are skipped.
pub fn merge<'a, I>(forests: I) -> CombinedSwc
where
    I: IntoIterator<Item = &'a Forest>,
{
    let mut combined = CombinedSwc::default();
    let mut offset: i64 = 0;

    for (source, forest) in forests.into_iter().enumerate() {
        if forest.is_empty() {
            continue;
        }
        combined.nodes.extend(forest.nodes().iter().map(|node| {
            let mut node = *node;
            node.id += offset;
            if node.parent != ROOT_PARENT {
                node.parent += offset;
            }
            node
        }));
        combined.spans.push(ForestSpan {
            source,
            offset,
            len: forest.len(),
        });
        offset += forest.len() as i64;
    }

    combined
}
