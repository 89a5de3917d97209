//! Core engine modules for butterfly-closure
//!
//! Leaves first: intervals and the base-case policy, sentinel arithmetic and recurrences,
//! the tile stager and kernels, then the dispatcher that schedules them.

pub mod config;
pub mod dispatch;
pub mod element;
pub mod engine;
pub mod error;
pub mod executor;
pub mod interval;
pub mod kernel;
pub mod matrix;
pub mod policy;
pub mod recurrence;
pub mod reference;
pub mod tile;

pub use config::EngineConfig;
pub use dispatch::{PhaseCounts, Plan, Step};
pub use element::{coalesce, guard, guard_with, Element};
pub use engine::{ClosureEngine, RunSummary};
pub use error::{Error, Result};
pub use executor::{ForkJoin, Rayon, Sequential};
pub use interval::Interval;
pub use kernel::{Direction, DirectionPair, Phase};
pub use matrix::DistMatrix;
pub use policy::BasePolicy;
pub use recurrence::{MaxMin, MinPlus, Recurrence};
pub use tile::Tile;
