//! Saliency scores for feed-forward hidden units

use ndarray::Array1;

use crate::encoder::FeedForward;

/// Score every hidden unit of a feed-forward sub-module.
///
/// For expand weight `W1: [hidden, n_state]` and project weight
/// `W2: [n_state, hidden]`:
///
/// ```text
/// score[i] = (sum_k |W1[i, k]|) * (mean_o |W2[o, i]|)
/// ```
///
/// The first factor bounds the unit's largest possible activation
/// magnitude; the second averages how strongly the projection reads the
/// unit across the output width. Units scoring near zero cannot contribute
/// meaningfully to the block output.
pub fn saliency_scores(ffn: &FeedForward) -> Array1<f32> {
    let w1 = &ffn.fc1.weight;
    let w2 = &ffn.fc2.weight;
    debug_assert_eq!(w1.nrows(), w2.ncols());

    let hidden = w1.nrows();
    let n_out = w2.nrows() as f32;

    Array1::from_shape_fn(hidden, |i| {
        let row_sum: f32 = w1.row(i).iter().map(|v| v.abs()).sum();
        let col_mean: f32 = w2.column(i).iter().map(|v| v.abs()).sum::<f32>() / n_out;
        row_sum * col_mean
    })
}
