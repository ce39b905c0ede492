//! Checkpoint binding for the encoder
//!
//! Tensor names follow the original checkpoint layout:
//! `encoder.conv1.weight`, `encoder.blocks.{i}.attn.query.weight`,
//! `encoder.blocks.{i}.mlp.0.weight`, and so on. Feed-forward hidden widths
//! are read from the tensors themselves, not the config, so pruned
//! checkpoints (narrower `mlp.0`/`mlp.2`) load through the same path.

use ndarray::{Array1, Array2, Array3, Ix1, Ix2, Ix3};
use std::collections::HashMap;

use crate::io::Checkpoint;
use crate::{Error, Result};

use super::attention::MultiHeadAttention;
use super::block::EncoderBlock;
use super::config::EncoderConfig;
use super::conv::Conv1d;
use super::feedforward::FeedForward;
use super::linear::Linear;
use super::model::AudioEncoder;
use super::norm::LayerNorm;
use super::ops::sinusoids;

fn tensor<'a>(params: &'a Checkpoint, name: &str) -> Result<&'a ndarray::ArrayD<f32>> {
    params
        .get(name)
        .ok_or_else(|| Error::Checkpoint(format!("missing tensor: {name}")))
}

fn array1(params: &Checkpoint, name: &str, len: usize) -> Result<Array1<f32>> {
    let raw = tensor(params, name)?;
    if raw.shape() != [len] {
        return Err(Error::shape(name, &[len], raw.shape()));
    }
    Ok(raw
        .clone()
        .into_dimensionality::<Ix1>()
        .expect("shape checked above"))
}

/// 2-D tensor with optional row check (rows may be a pruned hidden width).
fn array2(params: &Checkpoint, name: &str, rows: Option<usize>, cols: usize) -> Result<Array2<f32>> {
    let raw = tensor(params, name)?;
    let shape = raw.shape();
    let ok = shape.len() == 2 && shape[1] == cols && rows.map_or(true, |r| shape[0] == r);
    if !ok {
        let expected_rows = rows.unwrap_or_else(|| shape.first().copied().unwrap_or(0));
        return Err(Error::shape(name, &[expected_rows, cols], shape));
    }
    Ok(raw
        .clone()
        .into_dimensionality::<Ix2>()
        .expect("shape checked above"))
}

fn array3(params: &Checkpoint, name: &str, shape: [usize; 3]) -> Result<Array3<f32>> {
    let raw = tensor(params, name)?;
    if raw.shape() != shape {
        return Err(Error::shape(name, &shape, raw.shape()));
    }
    Ok(raw
        .clone()
        .into_dimensionality::<Ix3>()
        .expect("shape checked above"))
}

fn layer_norm(params: &Checkpoint, prefix: &str, size: usize) -> Result<LayerNorm> {
    Ok(LayerNorm::new(
        array1(params, &format!("{prefix}.weight"), size)?,
        array1(params, &format!("{prefix}.bias"), size)?,
    ))
}

fn linear(params: &Checkpoint, prefix: &str, out: Option<usize>, inp: usize, bias: bool) -> Result<Linear> {
    let weight = array2(params, &format!("{prefix}.weight"), out, inp)?;
    let bias = if bias {
        Some(array1(params, &format!("{prefix}.bias"), weight.nrows())?)
    } else {
        None
    };
    Ok(Linear::new(weight, bias))
}

impl AudioEncoder {
    /// Build the encoder from a loaded checkpoint.
    ///
    /// The positional embedding is taken from the checkpoint when present
    /// and recomputed as sinusoids otherwise; both paths yield the same
    /// values for pretrained checkpoints.
    pub fn from_params(config: &EncoderConfig, params: &Checkpoint) -> Result<Self> {
        let n_state = config.n_audio_state;

        let conv1 = Conv1d::new(
            array3(params, "encoder.conv1.weight", [n_state, config.n_mels, 3])?,
            array1(params, "encoder.conv1.bias", n_state)?,
            1,
            1,
        );
        let conv2 = Conv1d::new(
            array3(params, "encoder.conv2.weight", [n_state, n_state, 3])?,
            array1(params, "encoder.conv2.bias", n_state)?,
            2,
            1,
        );

        let positional_embedding = match params.get("encoder.positional_embedding") {
            Some(raw) => {
                if raw.shape() != [config.n_audio_ctx, n_state] {
                    return Err(Error::shape(
                        "encoder.positional_embedding",
                        &[config.n_audio_ctx, n_state],
                        raw.shape(),
                    ));
                }
                raw.clone().into_dimensionality::<Ix2>().expect("shape checked above")
            }
            None => sinusoids(config.n_audio_ctx, n_state),
        };

        let mut blocks = Vec::with_capacity(config.n_audio_layer);
        for i in 0..config.n_audio_layer {
            let prefix = format!("encoder.blocks.{i}");

            let attn = MultiHeadAttention::new(
                config.n_audio_head,
                linear(params, &format!("{prefix}.attn.query"), Some(n_state), n_state, true)?,
                linear(params, &format!("{prefix}.attn.key"), Some(n_state), n_state, false)?,
                linear(params, &format!("{prefix}.attn.value"), Some(n_state), n_state, true)?,
                linear(params, &format!("{prefix}.attn.out"), Some(n_state), n_state, true)?,
            );

            // Hidden width comes from the tensor: pruned blocks are narrower
            let fc1 = linear(params, &format!("{prefix}.mlp.0"), None, n_state, true)?;
            let hidden = fc1.out_features();
            let fc2_weight = array2(params, &format!("{prefix}.mlp.2.weight"), Some(n_state), hidden)?;
            let fc2 = Linear::new(
                fc2_weight,
                Some(array1(params, &format!("{prefix}.mlp.2.bias"), n_state)?),
            );

            blocks.push(EncoderBlock::new(
                layer_norm(params, &format!("{prefix}.attn_ln"), n_state)?,
                attn,
                layer_norm(params, &format!("{prefix}.mlp_ln"), n_state)?,
                FeedForward::new(fc1, fc2),
            ));
        }

        let ln_post = layer_norm(params, "encoder.ln_post", n_state)?;

        Ok(Self { config: config.clone(), conv1, conv2, positional_embedding, blocks, ln_post })
    }

    /// Export every weight under its checkpoint name.
    ///
    /// The inverse of [`AudioEncoder::from_params`]; used for pruned
    /// checkpoint output and for package weight payloads.
    pub fn to_params(&self) -> Checkpoint {
        let mut params: Checkpoint = HashMap::new();
        let mut put1 = |name: String, a: &Array1<f32>| {
            params.insert(name, a.clone().into_dyn());
        };

        put1("encoder.conv1.bias".to_string(), &self.conv1.bias);
        put1("encoder.conv2.bias".to_string(), &self.conv2.bias);
        put1("encoder.ln_post.weight".to_string(), &self.ln_post.weight);
        put1("encoder.ln_post.bias".to_string(), &self.ln_post.bias);
        params.insert("encoder.conv1.weight".to_string(), self.conv1.weight.clone().into_dyn());
        params.insert("encoder.conv2.weight".to_string(), self.conv2.weight.clone().into_dyn());
        params.insert(
            "encoder.positional_embedding".to_string(),
            self.positional_embedding.clone().into_dyn(),
        );

        for (i, block) in self.blocks.iter().enumerate() {
            let prefix = format!("encoder.blocks.{i}");
            for (ln_name, ln) in [("attn_ln", &block.attn_ln), ("mlp_ln", &block.mlp_ln)] {
                params.insert(format!("{prefix}.{ln_name}.weight"), ln.weight.clone().into_dyn());
                params.insert(format!("{prefix}.{ln_name}.bias"), ln.bias.clone().into_dyn());
            }
            let linears = [
                ("attn.query", &block.attn.query),
                ("attn.key", &block.attn.key),
                ("attn.value", &block.attn.value),
                ("attn.out", &block.attn.out),
                ("mlp.0", &block.mlp.fc1),
                ("mlp.2", &block.mlp.fc2),
            ];
            for (name, layer) in linears {
                params.insert(format!("{prefix}.{name}.weight"), layer.weight.clone().into_dyn());
                if let Some(bias) = &layer.bias {
                    params.insert(format!("{prefix}.{name}.bias"), bias.clone().into_dyn());
                }
            }
        }

        params
    }
}
