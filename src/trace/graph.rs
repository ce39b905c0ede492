//! Traced graph representation

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A named tensor with a fixed shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSpec {
    pub name: String,
    pub shape: Vec<usize>,
}

impl TensorSpec {
    pub fn new(name: impl Into<String>, shape: Vec<usize>) -> Self {
        Self { name: name.into(), shape }
    }
}

/// Primitive operations the tracer records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpKind {
    Conv1d { stride: usize, padding: usize },
    Gelu,
    Permute { axes: Vec<usize> },
    AddPositional,
    LayerNorm,
    Attention { n_head: usize },
    Linear,
    Residual,
}

/// One step of the traced computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedOp {
    pub id: usize,
    pub kind: OpKind,
    /// Names of consumed tensors (two for residual adds, one otherwise)
    pub inputs: Vec<String>,
    pub output: TensorSpec,
    /// Checkpoint names of the weights this op reads
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weights: Vec<String>,
    /// Owning encoder block, absent for the stem and final norm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<usize>,
}

/// A straight-line SSA graph of the encoder forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedGraph {
    pub input: TensorSpec,
    pub output: TensorSpec,
    pub ops: Vec<TracedOp>,
}

impl TracedGraph {
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// All weight names the graph references, in first-use order.
    pub fn weight_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();
        for op in &self.ops {
            for w in &op.weights {
                if seen.insert(w.clone()) {
                    names.push(w.clone());
                }
            }
        }
        names
    }

    /// Check SSA form: every op input must be the graph input or the output
    /// of an earlier op, and the declared graph output must be produced.
    pub fn validate(&self) -> Result<()> {
        let mut produced = std::collections::HashSet::new();
        produced.insert(self.input.name.as_str());

        for op in &self.ops {
            for input in &op.inputs {
                if !produced.contains(input.as_str()) {
                    return Err(Error::Trace(format!(
                        "op {} reads undefined tensor {input}",
                        op.id
                    )));
                }
            }
            produced.insert(op.output.name.as_str());
        }

        if !produced.contains(self.output.name.as_str()) {
            return Err(Error::Trace(format!(
                "graph output {} is never produced",
                self.output.name
            )));
        }
        Ok(())
    }
}
