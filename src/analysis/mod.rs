pub mod impact;
pub mod pipeline;
pub mod simulation;
pub mod stats;

pub use impact::{analyze_cost, CostAnalysis, CostAnalysisInput, FinancialAssumptions};
pub use pipeline::{SimulationError, SimulationPipeline, SimulationReport, SimulationRequest};
pub use simulation::{simulate, EnergyProfile, MonthlySimulationResult};
pub use stats::{aggregate, Metric, MonthlyAggregate, MonthlyStat};
