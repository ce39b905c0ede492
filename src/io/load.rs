//! Checkpoint loading and saving
//!
//! Checkpoints are SafeTensors files mapping tensor names to F32 arrays.
//! Loading preserves shapes; saving writes keys in sorted order so the
//! output bytes are deterministic.

use crate::{Error, Result};
use ndarray::ArrayD;
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::Path;

/// A loaded checkpoint: tensor name to shaped F32 data.
pub type Checkpoint = HashMap<String, ArrayD<f32>>;

/// Load a checkpoint from a SafeTensors file.
///
/// All tensors must be F32; any other dtype is a checkpoint error.
pub fn load_checkpoint(path: impl AsRef<Path>) -> Result<Checkpoint> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| Error::Checkpoint(format!("failed to read {}: {e}", path.display())))?;

    let tensors = SafeTensors::deserialize(&data)
        .map_err(|e| Error::Checkpoint(format!("SafeTensors parsing failed: {e}")))?;

    let mut params = HashMap::new();
    for name in tensors.names() {
        let view = tensors
            .tensor(name)
            .map_err(|e| Error::Checkpoint(format!("failed to get tensor {name}: {e}")))?;

        if view.dtype() != Dtype::F32 {
            return Err(Error::Checkpoint(format!(
                "tensor {name} has dtype {:?}, expected F32",
                view.dtype()
            )));
        }

        let values: Vec<f32> = view
            .data()
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        let array = ArrayD::from_shape_vec(view.shape().to_vec(), values)
            .map_err(|e| Error::Checkpoint(format!("tensor {name} has inconsistent shape: {e}")))?;
        params.insert(name.to_string(), array);
    }

    Ok(params)
}

/// Save a checkpoint to a SafeTensors file.
pub fn save_checkpoint(path: impl AsRef<Path>, params: &Checkpoint) -> Result<()> {
    // Sort keys for deterministic output
    let mut names: Vec<&String> = params.keys().collect();
    names.sort();

    let tensor_data: Vec<(String, Vec<u8>, Vec<usize>)> = names
        .iter()
        .map(|name| {
            let array = &params[*name];
            let contiguous: Vec<f32> = array.iter().copied().collect();
            let bytes: Vec<u8> = bytemuck::cast_slice(&contiguous).to_vec();
            ((*name).clone(), bytes, array.shape().to_vec())
        })
        .collect();

    let views: Vec<(&str, TensorView<'_>)> = tensor_data
        .iter()
        .map(|(name, bytes, shape)| {
            let view = TensorView::new(Dtype::F32, shape.clone(), bytes)
                .expect("TensorView construction must not fail for valid F32 data");
            (name.as_str(), view)
        })
        .collect();

    let serialized = safetensors::serialize(views, &None)
        .map_err(|e| Error::Checkpoint(format!("SafeTensors serialization failed: {e}")))?;

    std::fs::write(path, serialized)?;
    Ok(())
}
