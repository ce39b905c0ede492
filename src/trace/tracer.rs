//! Graph capture for the audio encoder

use serde::{Deserialize, Serialize};

use crate::encoder::AudioEncoder;
use crate::{Error, Result};

use super::graph::{OpKind, TensorSpec, TracedGraph, TracedOp};

/// Declared tensor names for the traced graph boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceOptions {
    pub input_name: String,
    pub output_name: String,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self { input_name: "logmel_data".to_string(), output_name: "output".to_string() }
    }
}

/// Sequential op emitter with shape bookkeeping.
struct Emitter {
    ops: Vec<TracedOp>,
    current: TensorSpec,
}

impl Emitter {
    fn new(input: TensorSpec) -> Self {
        Self { ops: Vec::new(), current: input }
    }

    /// Record an op consuming the current tensor, producing `shape`.
    fn push(
        &mut self,
        kind: OpKind,
        shape: Vec<usize>,
        weights: Vec<String>,
        block: Option<usize>,
    ) -> String {
        let id = self.ops.len();
        let output = TensorSpec::new(format!("t{id}"), shape);
        self.ops.push(TracedOp {
            id,
            kind,
            inputs: vec![self.current.name.clone()],
            output: output.clone(),
            weights,
            block,
        });
        self.current = output.clone();
        output.name
    }

    /// Record a residual add of the current tensor with `other`.
    fn push_residual(&mut self, other: &str, block: Option<usize>) {
        let id = self.ops.len();
        let output = TensorSpec::new(format!("t{id}"), self.current.shape.clone());
        self.ops.push(TracedOp {
            id,
            kind: OpKind::Residual,
            inputs: vec![self.current.name.clone(), other.to_string()],
            output: output.clone(),
            weights: vec![],
            block,
        });
        self.current = output;
    }
}

/// Trace the encoder's forward computation at its fixed input shape
/// `[1, n_mels, 2 * n_audio_ctx]`.
///
/// Shape propagation is checked as the graph is built; an encoder whose
/// layers disagree with its positional embedding is a trace error.
pub fn trace_encoder(encoder: &AudioEncoder, options: &TraceOptions) -> Result<TracedGraph> {
    let config = &encoder.config;
    let n_state = config.n_audio_state;
    let n_frames = config.n_frames();

    let input = TensorSpec::new(options.input_name.clone(), vec![1, config.n_mels, n_frames]);
    let mut em = Emitter::new(input.clone());

    // Conv stem
    let conv1_len = encoder.conv1.output_len(n_frames);
    em.push(
        OpKind::Conv1d { stride: encoder.conv1.stride, padding: encoder.conv1.padding },
        vec![1, encoder.conv1.out_channels(), conv1_len],
        vec!["encoder.conv1.weight".to_string(), "encoder.conv1.bias".to_string()],
        None,
    );
    em.push(OpKind::Gelu, em.current.shape.clone(), vec![], None);

    let conv2_len = encoder.conv2.output_len(conv1_len);
    em.push(
        OpKind::Conv1d { stride: encoder.conv2.stride, padding: encoder.conv2.padding },
        vec![1, encoder.conv2.out_channels(), conv2_len],
        vec!["encoder.conv2.weight".to_string(), "encoder.conv2.bias".to_string()],
        None,
    );
    em.push(OpKind::Gelu, em.current.shape.clone(), vec![], None);

    em.push(OpKind::Permute { axes: vec![0, 2, 1] }, vec![1, conv2_len, n_state], vec![], None);

    if encoder.positional_embedding.shape() != [conv2_len, n_state] {
        return Err(Error::Trace(format!(
            "positional embedding is {:?} but the conv stem produces [{conv2_len}, {n_state}]",
            encoder.positional_embedding.shape()
        )));
    }
    em.push(
        OpKind::AddPositional,
        em.current.shape.clone(),
        vec!["encoder.positional_embedding".to_string()],
        None,
    );

    // Block stack
    for (i, block) in encoder.blocks.iter().enumerate() {
        let prefix = format!("encoder.blocks.{i}");
        let block_id = Some(i);
        let block_input = em.current.name.clone();

        em.push(
            OpKind::LayerNorm,
            em.current.shape.clone(),
            vec![format!("{prefix}.attn_ln.weight"), format!("{prefix}.attn_ln.bias")],
            block_id,
        );
        em.push(
            OpKind::Attention { n_head: block.attn.n_head },
            em.current.shape.clone(),
            vec![
                format!("{prefix}.attn.query.weight"),
                format!("{prefix}.attn.query.bias"),
                format!("{prefix}.attn.key.weight"),
                format!("{prefix}.attn.value.weight"),
                format!("{prefix}.attn.value.bias"),
                format!("{prefix}.attn.out.weight"),
                format!("{prefix}.attn.out.bias"),
            ],
            block_id,
        );
        em.push_residual(&block_input, block_id);
        let attn_residual = em.current.name.clone();

        em.push(
            OpKind::LayerNorm,
            em.current.shape.clone(),
            vec![format!("{prefix}.mlp_ln.weight"), format!("{prefix}.mlp_ln.bias")],
            block_id,
        );
        em.push(
            OpKind::Linear,
            vec![1, conv2_len, block.mlp.hidden_width()],
            vec![format!("{prefix}.mlp.0.weight"), format!("{prefix}.mlp.0.bias")],
            block_id,
        );
        em.push(OpKind::Gelu, em.current.shape.clone(), vec![], block_id);
        em.push(
            OpKind::Linear,
            vec![1, conv2_len, n_state],
            vec![format!("{prefix}.mlp.2.weight"), format!("{prefix}.mlp.2.bias")],
            block_id,
        );
        em.push_residual(&attn_residual, block_id);
    }

    // Final norm produces the declared output tensor
    em.push(
        OpKind::LayerNorm,
        em.current.shape.clone(),
        vec!["encoder.ln_post.weight".to_string(), "encoder.ln_post.bias".to_string()],
        None,
    );
    let last = em.ops.len() - 1;
    em.ops[last].output.name = options.output_name.clone();

    let graph = TracedGraph {
        input,
        output: em.ops[last].output.clone(),
        ops: em.ops,
    };
    graph.validate()?;
    Ok(graph)
}
