//! Monte Carlo simulation core.
//!
//! Pure, synchronous, CPU-bound. Every run is reproducible: per-asset
//! randomness is seeded from a stable content hash of the asset name,
//! so results do not depend on process, platform, or execution order.

pub mod momentum;
pub mod path;
pub mod rng;
pub mod stats;

pub use momentum::momentum_score;
pub use path::simulate_path;
pub use rng::{stable_seed, BoxMuller, ShockSource};
pub use stats::{run_statistics, SimulationConfig};
