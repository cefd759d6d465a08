//! DPPN Core - Token Economy Simulation Engine
//!
//! An ECS-based simulation of a closed token economy: a population of
//! citizens earns, spends, pays tax, receives redistribution, invests in
//! education, and reacts to market prices, while aggregate indicators
//! (inflation, Gini coefficient, price index) are derived every simulated
//! day.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Citizens
//! - **Components**: Pure data attached to entities (Wallet, Wellbeing, Learning, etc.)
//! - **Subsystems**: Economy, EducationSystem, and Market, each mutating a
//!   disjoint slice of citizen state within one tick
//!
//! # Example
//!
//! ```rust,no_run
//! use dppn_core::prelude::*;
//!
//! let config = SimulationConfig {
//!     population_size: 500,
//!     ..Default::default()
//! };
//! let mut sim = Simulator::new(config).expect("valid config");
//!
//! // Run 90 simulated days
//! sim.run(90);
//!
//! for snapshot in sim.metrics() {
//!     println!("day {}: gini {:.3}", snapshot.day, snapshot.gini);
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod metrics;
pub mod rng;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimulationConfig;
    pub use crate::engine::Simulator;
    pub use crate::metrics::DailyMetrics;
    pub use crate::rng::SimRng;
}
