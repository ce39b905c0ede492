//! Static graph capture
//!
//! Walks the encoder's forward computation at its fixed input shape and
//! records one op per primitive, with propagated tensor shapes and the
//! checkpoint names of the weights each op consumes. The captured graph is
//! a straight-line SSA sequence; the converter serializes it as-is.

mod graph;
mod tracer;

pub use graph::{OpKind, TensorSpec, TracedGraph, TracedOp};
pub use tracer::{trace_encoder, TraceOptions};
