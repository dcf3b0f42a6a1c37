use ndarray::prelude::*;
use std::cmp::Ordering;

/// Indices that sort `v` by decreasing absolute value. The sort is stable, entries of equal
/// magnitude keep their order.
pub fn argsort_abs_descending(v: ArrayView1<f64>) -> Vec<usize> {
    let mut idx = (0..v.len()).collect::<Vec<_>>();
    idx.sort_by(|&i, &j| {
        v[j].abs()
            .partial_cmp(&v[i].abs())
            .unwrap_or(Ordering::Equal)
    });
    idx
}
