//! Graph conversion and package assembly
//!
//! Takes a traced encoder graph and produces an on-disk inference package:
//! a manifest with the conversion options, the serialized graph, and the
//! weight payload. Large variants are bisected into two chunks merged into
//! a pipeline package.

mod bisect;
mod options;
mod package;

pub use bisect::bisect_graph;
pub use options::{ComputeUnits, ConvertOptions, DeploymentTarget, SplitPolicy};
pub use package::{write_package, ChunkManifest, EncoderPackage, PackageChunk, PackageManifest};

use crate::encoder::AudioEncoder;
use crate::io::ModelSize;
use crate::trace::{trace_encoder, TraceOptions, TracedGraph};
use crate::{Error, Result};

/// Convert an encoder into a package: trace, optionally bisect, and bind
/// the weight payload to each chunk's graph.
pub fn convert(
    encoder: &AudioEncoder,
    size: ModelSize,
    options: &ConvertOptions,
) -> Result<EncoderPackage> {
    let trace_options = TraceOptions {
        input_name: options.input_name.clone(),
        output_name: options.output_name.clone(),
    };
    let graph = trace_encoder(encoder, &trace_options)?;

    let graphs: Vec<TracedGraph> = if options.split.should_split(size) {
        let (head, tail) = bisect_graph(&graph, encoder.config.n_audio_layer)?;
        vec![head, tail]
    } else {
        vec![graph]
    };

    let params = encoder.to_params();
    let mut chunks = Vec::with_capacity(graphs.len());
    for graph in graphs {
        let mut weights = crate::io::Checkpoint::new();
        for name in graph.weight_names() {
            let tensor = params
                .get(&name)
                .ok_or_else(|| Error::Package(format!("graph references missing weight {name}")))?;
            weights.insert(name, tensor.clone());
        }
        chunks.push(PackageChunk { graph, weights });
    }

    Ok(EncoderPackage { size, options: options.clone(), chunks })
}
