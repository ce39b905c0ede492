//! Feed-forward reconstruction from a retained-unit set

use ndarray::{Array1, Array2};

use crate::encoder::{FeedForward, Linear};

/// Build a narrower feed-forward from the retained hidden units.
///
/// Copies row `keep[j]` of the expand weight/bias into row `j`, and column
/// `keep[j]` of the project weight into column `j`; the project bias is
/// unchanged. Because both layers are permuted consistently, reordering by
/// descending saliency does not change the output.
pub fn rebuild_feed_forward(ffn: &FeedForward, keep: &[usize]) -> FeedForward {
    let w1 = &ffn.fc1.weight;
    let w2 = &ffn.fc2.weight;
    let new_hidden = keep.len();

    let mut new_w1 = Array2::zeros((new_hidden, w1.ncols()));
    let mut new_w2 = Array2::zeros((w2.nrows(), new_hidden));
    for (j, &unit) in keep.iter().enumerate() {
        new_w1.row_mut(j).assign(&w1.row(unit));
        new_w2.column_mut(j).assign(&w2.column(unit));
    }

    let new_b1 = ffn
        .fc1
        .bias
        .as_ref()
        .map(|b| Array1::from_shape_fn(new_hidden, |j| b[keep[j]]));

    FeedForward::new(
        Linear::new(new_w1, new_b1),
        Linear::new(new_w2, ffn.fc2.bias.clone()),
    )
}
