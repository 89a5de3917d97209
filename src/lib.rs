//! # Butterfly-closure
//!
//! Cache-oblivious, recursively parallel evaluation of the triangular relaxation
//!
//! ```text
//! for k ascending, for every (i, j) with k < i and k < j:
//!     M[i][j] = relax(M[i][j], M[i][k], M[k][j])
//! ```
//!
//! over a dense N×N matrix. With the min-plus recurrence this is the triangle relaxation of
//! contraction-hierarchy customization: afterwards `M[i][j]` is the shortest `i -> j` path
//! whose intermediate nodes all rank below both endpoints.
//!
//! The matrix is split recursively at interval midpoints. Diagonal blocks are resolved first,
//! then the row and column blocks that depend on them (in parallel), then the off-diagonal
//! cross terms. Once any interval of a call is at most `block` wide, the blocks involved are
//! staged into contiguous tiles and a direct kernel runs on them.
//!
//! ## Quick start
//!
//! ```
//! use butterfly_closure::{ClosureEngine, DistMatrix, EngineConfig, Element};
//!
//! let u = i32::UNDEFINED;
//! let mut m = DistMatrix::from_rows(vec![
//!     vec![0, 3, u, 7],
//!     vec![8, 0, 2, u],
//!     vec![5, u, 0, 1],
//!     vec![2, u, u, 0],
//! ])?;
//!
//! let engine = ClosureEngine::new(EngineConfig::default().with_block(2))?;
//! engine.run(&mut m);
//! assert_eq!(m.get(3, 2), 7); // 3 -> 0 -> 1 -> 2
//! # Ok::<(), butterfly_closure::Error>(())
//! ```

pub mod core;
pub mod generate;
pub mod io;

pub use crate::core::{
    coalesce, guard, guard_with, BasePolicy, ClosureEngine, Direction, DirectionPair,
    DistMatrix, Element, EngineConfig, Error, ForkJoin, Interval, MaxMin, MinPlus, Phase,
    PhaseCounts, Plan, Rayon, Recurrence, Result, RunSummary, Sequential, Step, Tile,
};
pub use crate::core::reference::relax_naive;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Evaluate the min-plus recurrence over `matrix` with the given block threshold
pub fn solve<T>(matrix: &mut DistMatrix<T>, block: usize) -> Result<RunSummary>
where
    T: Element + std::ops::Add<Output = T>,
{
    let engine = ClosureEngine::new(EngineConfig::default().with_block(block))?;
    Ok(engine.run(matrix))
}
