//! Graph bisection
//!
//! Splits a traced graph into two chunks at the block boundary nearest the
//! midpoint of the block stack. The head chunk keeps the conv stem; the
//! tail chunk starts at the split block and ends with the final norm. The
//! boundary tensor becomes the tail chunk's declared input.

use crate::trace::TracedGraph;
use crate::{Error, Result};

/// Split `graph` before block `n_layers / 2`.
pub fn bisect_graph(graph: &TracedGraph, n_layers: usize) -> Result<(TracedGraph, TracedGraph)> {
    if n_layers < 2 {
        return Err(Error::Package(format!(
            "cannot bisect a {n_layers}-block encoder"
        )));
    }
    let split_block = n_layers / 2;

    let boundary = graph
        .ops
        .iter()
        .position(|op| op.block == Some(split_block))
        .ok_or_else(|| Error::Package(format!("block {split_block} not found in graph")))?;

    let head_ops = graph.ops[..boundary].to_vec();
    let tail_ops = graph.ops[boundary..].to_vec();

    let boundary_tensor = head_ops
        .last()
        .ok_or_else(|| Error::Package("bisection produced an empty head chunk".to_string()))?
        .output
        .clone();

    let head = TracedGraph {
        input: graph.input.clone(),
        output: boundary_tensor.clone(),
        ops: head_ops,
    };
    let tail = TracedGraph {
        input: boundary_tensor,
        output: graph.output.clone(),
        ops: tail_ops,
    };

    head.validate()?;
    tail.validate()?;
    Ok((head, tail))
}
