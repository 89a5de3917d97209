//! Random weighted digraphs for benchmarks and cross-checks

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{DistMatrix, Element, Error, Result};

/// Adjacency matrix of a random digraph on `n` nodes.
///
/// Each off-diagonal edge exists with probability `density` and gets a weight in
/// `1..=max_weight`; the diagonal is zero and missing edges are undefined. The same seed always
/// produces the same matrix. `max_weight` must stay below [`Element::UNDEFINED`].
pub fn random_graph<T>(n: usize, density: f64, max_weight: u32, seed: u64) -> Result<DistMatrix<T>>
where
    T: Element + From<u32>,
{
    if !(0.0..=1.0).contains(&density) {
        return Err(Error::InvalidInput(format!(
            "density must be within [0, 1], got {density}"
        )));
    }
    if max_weight == 0 {
        return Err(Error::InvalidInput("max weight must be at least 1".to_string()));
    }
    // Edge weights must stay clear of the undefined sentinel
    if T::from(max_weight) >= T::UNDEFINED {
        return Err(Error::InvalidInput(format!(
            "max weight {max_weight} reaches the undefined sentinel {:?}",
            T::UNDEFINED
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix = DistMatrix::new(n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                matrix.set(i, j, T::from(0));
            } else if rng.random_bool(density) {
                matrix.set(i, j, T::from(rng.random_range(1..=max_weight)));
            }
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_reproducible() {
        let a: DistMatrix<i64> = random_graph(12, 0.4, 50, 7).unwrap();
        let b: DistMatrix<i64> = random_graph(12, 0.4, 50, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shape() {
        let m: DistMatrix<u64> = random_graph(10, 0.5, 9, 1).unwrap();
        for i in 0..10 {
            assert_eq!(m.get(i, i), 0);
            for j in 0..10 {
                let v = m.get(i, j);
                assert!(v == u64::UNDEFINED || v <= 9);
            }
        }
        let empty: DistMatrix<u64> = random_graph(5, 0.0, 9, 1).unwrap();
        assert_eq!(empty.as_slice().iter().filter(|v| v.is_defined()).count(), 5);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(random_graph::<i64>(4, 1.5, 10, 0).is_err());
        assert!(random_graph::<i64>(4, 0.5, 0, 0).is_err());
    }

    #[test]
    fn test_weights_stay_below_sentinel() {
        assert!(matches!(
            random_graph::<i64>(4, 1.0, 1_000_000_000, 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(random_graph::<u64>(4, 1.0, u32::MAX, 0).is_err());

        let heaviest: DistMatrix<i64> = random_graph(6, 1.0, 999_999_999, 3).unwrap();
        assert!(heaviest.as_slice().iter().all(|v| v.is_defined()));

        // Float sentinel is infinity; any u32 weight is fine
        assert!(random_graph::<f64>(4, 1.0, u32::MAX, 0).is_ok());
    }
}
