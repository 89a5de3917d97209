//! Tile stager
//!
//! A base-case kernel never works on the big matrix directly. It first stages the blocks it
//! touches into small contiguous buffers, runs on those, and writes the block it owns back.
//!
//! Layout is column-major with a column stride of `max(block, rows)`:
//!
//! ```text
//! buffer[(j - cols.begin) * stride + (i - rows.begin)] = M[i][j]
//! ```
//!
//! For tiles of at most `block` rows this is exactly a `block`-wide layout. Midpoint splitting
//! can hand a kernel one axis of `block + 1`; the stride grows so columns never overlap.

use super::element::Element;
use super::interval::Interval;
use super::matrix::{DistMatrix, SharedCells};

/// Contiguous copy of the block `rows × cols`
#[derive(Debug, Clone, PartialEq)]
pub struct Tile<T> {
    rows: Interval,
    cols: Interval,
    stride: usize,
    cells: Vec<T>,
}

impl<T: Element> Tile<T> {
    /// Copy `rows × cols` of `matrix` into a fresh tile
    pub fn stage(matrix: &DistMatrix<T>, rows: Interval, cols: Interval, block: usize) -> Self {
        debug_assert!(rows.end() <= matrix.dim() && cols.end() <= matrix.dim());
        Self::fill(rows, cols, block, |i, j| matrix.get(i, j))
    }

    /// Write the tile back over the block it was staged from
    pub fn unstage(&self, matrix: &mut DistMatrix<T>) {
        debug_assert!(self.rows.end() <= matrix.dim() && self.cols.end() <= matrix.dim());
        self.drain(|i, j, value| matrix.set(i, j, value));
    }

    /// # Safety
    /// No other task may write `rows × cols` while it is being staged.
    pub(crate) unsafe fn stage_shared(
        cells: SharedCells<'_, T>,
        rows: Interval,
        cols: Interval,
        block: usize,
    ) -> Self {
        debug_assert!(rows.end() <= cells.dim() && cols.end() <= cells.dim());
        Self::fill(rows, cols, block, |i, j| cells.get(i, j))
    }

    /// # Safety
    /// The calling task must own `rows × cols` exclusively.
    pub(crate) unsafe fn unstage_shared(&self, cells: SharedCells<'_, T>) {
        self.drain(|i, j, value| cells.set(i, j, value));
    }

    fn fill(
        rows: Interval,
        cols: Interval,
        block: usize,
        mut read: impl FnMut(usize, usize) -> T,
    ) -> Self {
        let stride = block.max(rows.size());
        let mut cells = vec![T::UNDEFINED; stride * cols.size()];
        // Walk the matrix row by row; the buffer side is strided
        for i in rows.range() {
            for j in cols.range() {
                cells[(j - cols.begin()) * stride + (i - rows.begin())] = read(i, j);
            }
        }
        Self {
            rows,
            cols,
            stride,
            cells,
        }
    }

    fn drain(&self, mut write: impl FnMut(usize, usize, T)) {
        for i in self.rows.range() {
            for j in self.cols.range() {
                write(i, j, self.cells[self.offset(i, j)]);
            }
        }
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(self.rows.contains(i) && self.cols.contains(j));
        (j - self.cols.begin()) * self.stride + (i - self.rows.begin())
    }

    /// Cell by global matrix coordinates
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.cells[self.offset(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let at = self.offset(i, j);
        self.cells[at] = value;
    }

    pub fn rows(&self) -> Interval {
        self.rows
    }

    pub fn cols(&self) -> Interval {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> DistMatrix<i64> {
        DistMatrix::from_vec(n, (0..(n * n) as i64).collect()).unwrap()
    }

    #[test]
    fn test_column_major_layout() {
        let m = numbered(6);
        let tile = Tile::stage(&m, Interval::new(1, 3), Interval::new(2, 5), 4);

        assert_eq!(tile.stride(), 4);
        // (i=2, j=3) sits at column 1, row 1
        assert_eq!(tile.cells[4 + 1], m.get(2, 3));
        assert_eq!(tile.get(2, 3), 2 * 6 + 3);
        assert_eq!(tile.cells[0], m.get(1, 2));
    }

    #[test]
    fn test_stage_unstage_round_trip() {
        let original = numbered(7);
        let mut m = original.clone();
        let tile = Tile::stage(&m, Interval::new(2, 6), Interval::new(0, 3), 4);
        tile.unstage(&mut m);
        assert_eq!(m, original);
    }

    #[test]
    fn test_unstage_only_touches_its_block() {
        let mut m = numbered(5);
        let rows = Interval::new(1, 3);
        let cols = Interval::new(3, 5);
        let mut tile = Tile::stage(&m, rows, cols, 2);
        for i in rows.range() {
            for j in cols.range() {
                tile.set(i, j, -1);
            }
        }
        tile.unstage(&mut m);

        for i in 0..5 {
            for j in 0..5 {
                let expected = if rows.contains(i) && cols.contains(j) {
                    -1
                } else {
                    (i * 5 + j) as i64
                };
                assert_eq!(m.get(i, j), expected, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_stride_widens_for_oversized_rows() {
        let m = numbered(8);
        let tile = Tile::stage(&m, Interval::new(0, 5), Interval::new(0, 3), 4);
        assert_eq!(tile.stride(), 5);
        for i in 0..5 {
            for j in 0..3 {
                assert_eq!(tile.get(i, j), m.get(i, j));
            }
        }
    }
}
