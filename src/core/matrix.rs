//! Dense N×N distance matrix
//!
//! [`DistMatrix`] owns the row-major storage (`cell(i, j) = data[i * n + j]`).
//! [`SharedCells`] is the view the recursion hands to concurrently running tasks: it is `Copy`
//! and reads/writes through a raw pointer. Sibling tasks only ever write disjoint blocks, and
//! never read a block another running task writes, so no locking is needed. That invariant is
//! upheld by the dispatcher, which is why the accessors are `unsafe`.

use std::marker::PhantomData;

use super::element::Element;
use super::error::{Error, Result};

/// Owned dense row-major matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DistMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Element> DistMatrix<T> {
    /// `n × n` matrix with every cell undefined
    pub fn new(n: usize) -> Self {
        Self::filled(n, T::UNDEFINED)
    }

    pub fn filled(n: usize, value: T) -> Self {
        Self {
            n,
            data: vec![value; n * n],
        }
    }

    /// Wrap existing row-major storage
    pub fn from_vec(n: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != n * n {
            return Err(Error::DimensionMismatch {
                expected: n * n,
                actual: data.len(),
            });
        }
        Ok(Self { n, data })
    }

    /// Build from a square list of rows
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(Error::RaggedRow {
                    row,
                    expected: n,
                    actual: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self { n, data })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.n && j < self.n, "cell ({i}, {j}) outside {0}x{0}", self.n);
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.n && j < self.n, "cell ({i}, {j}) outside {0}x{0}", self.n);
        self.data[i * self.n + j] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics; an empty matrix simply has no rows
        self.data.chunks(self.n.max(1))
    }

    pub(crate) fn shared(&mut self) -> SharedCells<'_, T> {
        SharedCells {
            ptr: self.data.as_mut_ptr(),
            n: self.n,
            _marker: PhantomData,
        }
    }
}

/// Unsynchronized view of a [`DistMatrix`] shared by fork-join tasks
pub(crate) struct SharedCells<'a, T> {
    ptr: *mut T,
    n: usize,
    _marker: PhantomData<&'a mut [T]>,
}

impl<T> Clone for SharedCells<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SharedCells<'_, T> {}

// Tasks holding copies of the view touch disjoint blocks (see module docs).
unsafe impl<T: Send> Send for SharedCells<'_, T> {}
unsafe impl<T: Send + Sync> Sync for SharedCells<'_, T> {}

impl<T: Element> SharedCells<'_, T> {
    #[inline]
    pub(crate) fn dim(&self) -> usize {
        self.n
    }

    /// # Safety
    /// `(i, j)` must be in bounds and not concurrently written by another task.
    #[inline]
    pub(crate) unsafe fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.n && j < self.n);
        *self.ptr.add(i * self.n + j)
    }

    /// # Safety
    /// `(i, j)` must be in bounds and owned exclusively by the calling task.
    #[inline]
    pub(crate) unsafe fn set(&self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.n && j < self.n);
        *self.ptr.add(i * self.n + j) = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let m = DistMatrix::from_vec(2, vec![1i32, 2, 3, 4]).unwrap();
        assert_eq!(m.get(0, 1), 2);
        assert_eq!(m.get(1, 0), 3);
        let rows: Vec<&[i32]> = m.rows().collect();
        assert_eq!(rows, vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = DistMatrix::from_rows(vec![vec![0i32, 1], vec![2]]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = DistMatrix::from_vec(3, vec![0i64; 8]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 9,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_new_is_undefined() {
        let m: DistMatrix<f64> = DistMatrix::new(3);
        assert!(m.as_slice().iter().all(|v| *v == f64::INFINITY));
        assert_eq!(DistMatrix::<i32>::new(0).rows().count(), 0);
    }

    #[test]
    fn test_shared_view_writes_through() {
        let mut m = DistMatrix::filled(3, 0u32);
        {
            let cells = m.shared();
            unsafe {
                cells.set(2, 1, 7);
                assert_eq!(cells.get(2, 1), 7);
            }
        }
        assert_eq!(m.get(2, 1), 7);
    }
}
