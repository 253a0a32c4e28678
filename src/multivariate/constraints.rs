//! Block-diagonal assembly of sub-model constraints and bounds.
//!
//! Each sub-model owns linear inequality constraints over its own parameter
//! block only; constraints never couple across blocks. Assembly places each
//! block's rows and columns on the diagonal of one combined system in the
//! fixed `(mean, volatility, distribution)` order, leaving every off-block
//! entry zero. Bounds are concatenated in the same order.

use crate::multivariate::core::layout::ParamLayout;
use crate::optimization::constrained::types::LinearInequalities;
use ndarray::{s, Array1, Array2};

/// Merge the three blocks into one `A·x − b ≥ 0` system over the full
/// parameter vector.
///
/// Zero-row blocks contribute nothing and are skipped; if every block is
/// unconstrained the result has zero rows and `layout.total()` columns.
pub fn assemble_constraints(
    mean: &LinearInequalities, volatility: &LinearInequalities, dist: &LinearInequalities,
    layout: &ParamLayout,
) -> LinearInequalities {
    let blocks = [mean, volatility, dist];
    let widths = [layout.mean, layout.volatility, layout.distribution];
    let total_rows: usize = blocks.iter().map(|c| c.num_rows()).sum();
    let total_params = layout.total();

    let mut a = Array2::zeros((total_rows, total_params));
    let mut b = Array1::zeros(total_rows);

    let mut row = 0;
    let mut col = 0;
    for (block, &width) in blocks.iter().zip(widths.iter()) {
        let rows = block.num_rows();
        if rows > 0 {
            a.slice_mut(s![row..row + rows, col..col + width]).assign(&block.a);
            b.slice_mut(s![row..row + rows]).assign(&block.b);
        }
        row += rows;
        col += width;
    }

    LinearInequalities { a, b }
}

/// Concatenate per-block bound lists in `(mean, volatility, distribution)`
/// order.
pub fn assemble_bounds(
    mean: Vec<(f64, f64)>, volatility: Vec<(f64, f64)>, dist: Vec<(f64, f64)>,
) -> Vec<(f64, f64)> {
    let mut bounds = mean;
    bounds.extend(volatility);
    bounds.extend(dist);
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // When every sub-model is unconstrained the assembled system must have
    // zero rows and a column count equal to the total parameter count.
    fn all_unconstrained_blocks_assemble_to_degenerate_system() {
        let layout = ParamLayout::new(2, 3, 1);

        let assembled = assemble_constraints(
            &LinearInequalities::none(2),
            &LinearInequalities::none(3),
            &LinearInequalities::none(1),
            &layout,
        );

        assert_eq!(assembled.num_rows(), 0);
        assert_eq!(assembled.num_params(), 6);
        assert!(assembled.satisfied(array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0].view()));
    }

    #[test]
    // Purpose
    // -------
    // Each block must land in its own row range and column range, with zeros
    // everywhere else, and zero-row blocks must be skipped cleanly.
    //
    // Given
    // -----
    // - Mean block (2 params): one row [1, -1] with offset 0.5.
    // - Volatility block (1 param): unconstrained.
    // - Distribution block (1 param): one row [2] with offset 1.
    //
    // Expect
    // ------
    // - A 2 x 4 system with the mean row in columns 0..2 and the
    //   distribution row in column 3.
    fn blocks_are_placed_on_the_diagonal() {
        let layout = ParamLayout::new(2, 1, 1);
        let mean = LinearInequalities::new(array![[1.0, -1.0]], array![0.5]).expect("valid");
        let vol = LinearInequalities::none(1);
        let dist = LinearInequalities::new(array![[2.0]], array![1.0]).expect("valid");

        let assembled = assemble_constraints(&mean, &vol, &dist, &layout);

        assert_eq!(assembled.a.shape(), &[2, 4]);
        assert_eq!(assembled.a, array![[1.0, -1.0, 0.0, 0.0], [0.0, 0.0, 0.0, 2.0]]);
        assert_eq!(assembled.b, array![0.5, 1.0]);
    }

    #[test]
    fn bounds_concatenate_in_block_order() {
        let bounds = assemble_bounds(
            vec![(-1.0, 1.0)],
            vec![(0.0, 10.0), (0.0, 10.0)],
            vec![(2.05, 500.0)],
        );
        assert_eq!(bounds, vec![(-1.0, 1.0), (0.0, 10.0), (0.0, 10.0), (2.05, 500.0)]);
    }
}
