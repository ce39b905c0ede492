//! Pruning report
//!
//! Per-block record of what was cut, serializable as a JSON sidecar next
//! to the pruned checkpoint or exported package.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

use super::plan::CutPlan;

/// What happened to one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPruneEntry {
    /// Block index within the encoder
    pub block: usize,
    /// Hidden width before pruning
    pub original_width: usize,
    /// Hidden width after pruning
    pub retained_width: usize,
    /// Units removed (zero means the block was left untouched)
    pub cut_len: usize,
    /// Highest saliency score in the block
    pub top_score: f32,
    /// Lowest saliency score in the block
    pub min_score: f32,
    /// Score of the strongest removed unit
    pub cut_boundary_score: Option<f32>,
}

impl BlockPruneEntry {
    pub fn from_plan(block: usize, plan: &CutPlan) -> Self {
        Self {
            block,
            original_width: plan.original_width,
            retained_width: plan.retained_width(),
            cut_len: plan.cut_len,
            top_score: plan.top_score,
            min_score: plan.min_score,
            cut_boundary_score: plan.cut_boundary_score,
        }
    }
}

/// Full pruning report across all blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PruneReport {
    pub entries: Vec<BlockPruneEntry>,
}

impl PruneReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: BlockPruneEntry) {
        self.entries.push(entry);
    }

    /// Total hidden units before pruning.
    pub fn original_units(&self) -> usize {
        self.entries.iter().map(|e| e.original_width).sum()
    }

    /// Total hidden units after pruning.
    pub fn retained_units(&self) -> usize {
        self.entries.iter().map(|e| e.retained_width).sum()
    }

    /// Total units removed.
    pub fn cut_units(&self) -> usize {
        self.entries.iter().map(|e| e.cut_len).sum()
    }

    /// True when no block was changed.
    pub fn is_noop(&self) -> bool {
        self.entries.iter().all(|e| e.cut_len == 0)
    }

    /// Fraction of hidden units removed, 0.0 when the encoder has none.
    pub fn cut_fraction(&self) -> f32 {
        let total = self.original_units();
        if total == 0 {
            return 0.0;
        }
        self.cut_units() as f32 / total as f32
    }

    /// Write the report as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Package(format!("failed to serialize prune report: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
