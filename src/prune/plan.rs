//! Cut-length selection
//!
//! Turns per-unit saliency scores into a retained-unit set. The adjustment
//! order is normative: round the cut length down to a multiple, then clip
//! to half the width, then floor small cuts to zero.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Tunable knobs for the pruning heuristic. Defaults are the values the
/// pretrained encoders were validated with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PruneOptions {
    /// Units scoring below this are candidates for removal
    pub threshold: f32,
    /// The cut length is rounded down to a multiple of this
    pub multiple: usize,
    /// Cuts smaller than this are dropped entirely (not worth a rebuild)
    pub min_cut: usize,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self { threshold: 0.08, multiple: 64, min_cut: 100 }
    }
}

/// The retained-unit set for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct CutPlan {
    /// Retained unit indices, ordered by descending saliency
    pub keep: Vec<usize>,
    /// Number of units removed
    pub cut_len: usize,
    /// Hidden width before pruning
    pub original_width: usize,
    /// Highest score in the block
    pub top_score: f32,
    /// Lowest score in the block
    pub min_score: f32,
    /// Score of the strongest removed unit, if any were removed
    pub cut_boundary_score: Option<f32>,
}

impl CutPlan {
    /// Width after pruning.
    pub fn retained_width(&self) -> usize {
        self.original_width - self.cut_len
    }

    /// True when the block keeps its original weights.
    pub fn is_noop(&self) -> bool {
        self.cut_len == 0
    }
}

/// Decide which hidden units of one block to keep.
///
/// Scores are sorted descending (stable, so equal scores keep their index
/// order and the result is reproducible). The cut length starts as the
/// number of sub-threshold units, is rounded down to `multiple`, clipped
/// to half the width, and zeroed when below `min_cut` — in that order.
pub fn plan_block(scores: &Array1<f32>, options: &PruneOptions) -> CutPlan {
    let width = scores.len();

    let mut order: Vec<usize> = (0..width).collect();
    order.sort_by(|&a, &b| {
        scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut cut_len = scores.iter().filter(|&&s| s < options.threshold).count();
    cut_len -= cut_len % options.multiple;
    if cut_len > width / 2 {
        cut_len = width / 2;
    }
    if cut_len < options.min_cut {
        cut_len = 0;
    }

    let top_score = scores[order[0]];
    let min_score = scores[order[width - 1]];
    let cut_boundary_score = (cut_len > 0).then(|| scores[order[width - cut_len]]);

    order.truncate(width - cut_len);

    CutPlan {
        keep: order,
        cut_len,
        original_width: width,
        top_score,
        min_score,
        cut_boundary_score,
    }
}
