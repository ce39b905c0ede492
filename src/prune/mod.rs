//! Feed-forward hidden-unit pruning
//!
//! Shrinks each block's feed-forward hidden dimension by a saliency
//! heuristic over the learned weights:
//!
//! 1. Score every hidden unit from the magnitudes of the expand and project
//!    weights ([`saliency_scores`])
//! 2. Decide how many low-scoring units to cut, with rounding to a multiple
//!    of 64, a half-width ceiling, and a minimum-cut floor ([`CutPlan`])
//! 3. Rebuild the feed-forward with only the retained rows/columns
//!    ([`rebuild_feed_forward`])
//!
//! The heuristic is an upper bound on each unit's contribution magnitude;
//! it was tuned against the pretrained encoders in the registry and is not
//! assumed to generalize beyond them.

mod plan;
mod rebuild;
mod report;
mod saliency;

pub use plan::{plan_block, CutPlan, PruneOptions};
pub use rebuild::rebuild_feed_forward;
pub use report::{BlockPruneEntry, PruneReport};
pub use saliency::saliency_scores;

use crate::encoder::AudioEncoder;

/// Prune every block of an encoder in place and report what was cut.
///
/// Blocks whose cut length resolves to zero keep their original weights
/// bit-for-bit; only blocks with a non-empty cut are rebuilt.
pub fn prune_encoder(encoder: &mut AudioEncoder, options: &PruneOptions) -> PruneReport {
    let mut report = PruneReport::new();

    for (block_id, block) in encoder.blocks.iter_mut().enumerate() {
        let scores = saliency_scores(&block.mlp);
        let plan = plan_block(&scores, options);

        report.push(BlockPruneEntry::from_plan(block_id, &plan));

        if plan.cut_len > 0 {
            block.mlp = rebuild_feed_forward(&block.mlp, &plan.keep);
        }
    }

    report
}
