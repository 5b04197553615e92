pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::AnswerStrategy;
pub use reports::{StrategyAggregate, aggregate_runs};
pub use seeds::{SeedInfo, resolve_seed, resolve_seed_inputs};
pub use simulation::{SimulationSummary, run_batch};
