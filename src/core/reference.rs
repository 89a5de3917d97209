//! Straightforward triple-loop evaluation, used to cross-check the recursive engine

use super::element::Element;
use super::matrix::DistMatrix;
use super::recurrence::Recurrence;

/// Evaluate the triangular recurrence in plain pivot-row-column order
pub fn relax_naive<T, R>(matrix: &mut DistMatrix<T>, recurrence: &R)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    let n = matrix.dim();
    for k in 0..n {
        for i in (k + 1)..n {
            let left = matrix.get(i, k);
            for j in (k + 1)..n {
                let v = recurrence.relax(matrix.get(i, j), left, matrix.get(k, j));
                matrix.set(i, j, v);
            }
        }
    }
}

/// First cell where two matrices differ, if any
pub fn first_difference<T: Element>(
    a: &DistMatrix<T>,
    b: &DistMatrix<T>,
) -> Option<(usize, usize)> {
    if a.dim() != b.dim() {
        return Some((0, 0));
    }
    let n = a.dim();
    (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .find(|&(i, j)| a.get(i, j) != b.get(i, j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recurrence::MinPlus;

    const U: i32 = i32::UNDEFINED;

    #[test]
    fn test_four_node_instance() {
        let mut m = DistMatrix::from_rows(vec![
            vec![0, 3, U, 7],
            vec![8, 0, 2, U],
            vec![5, U, 0, 1],
            vec![2, U, U, 0],
        ])
        .unwrap();
        relax_naive(&mut m, &MinPlus);

        let expected = DistMatrix::from_rows(vec![
            vec![0, 3, U, 7],
            vec![8, 0, 2, 15],
            vec![5, 8, 0, 1],
            vec![2, 5, 7, 0],
        ])
        .unwrap();
        assert_eq!(m, expected);
    }

    #[test]
    fn test_first_difference() {
        let a = DistMatrix::filled(3, 1i32);
        let mut b = a.clone();
        assert_eq!(first_difference(&a, &b), None);
        b.set(2, 0, 5);
        assert_eq!(first_difference(&a, &b), Some((2, 0)));
    }
}
