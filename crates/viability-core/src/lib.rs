pub mod error;
pub mod study;
pub mod time_value;
pub mod types;

#[cfg(feature = "market_data")]
pub mod market;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "diagnostics")]
pub mod diagnostics;

pub use error::ViabilityError;
pub use types::*;

/// Standard result type for all viability operations
pub type ViabilityResult<T> = Result<T, ViabilityError>;

#[cfg(feature = "diagnostics")]
pub use pipeline::{appraise, ViabilityReport};

#[cfg(feature = "diagnostics")]
mod pipeline {
    use std::time::Instant;

    use serde::{Deserialize, Serialize};

    use crate::diagnostics::{diagnose, Finding};
    use crate::projection::{simulate, SimulationResult};
    use crate::study::Study;
    use crate::types::{with_metadata, ComputationOutput};
    use crate::ViabilityResult;

    /// Projection and diagnosis of one study.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ViabilityReport {
        pub simulation: SimulationResult,
        pub findings: Vec<Finding>,
    }

    /// Simulate a study and diagnose the result in one pass.
    pub fn appraise(study: &Study) -> ViabilityResult<ComputationOutput<ViabilityReport>> {
        let start = Instant::now();

        let simulated = simulate(study)?;
        let findings = diagnose(study, &simulated.result);
        let warnings = simulated.warnings;

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "Monthly development cash-flow projection with benchmark diagnostics",
            study,
            warnings,
            elapsed,
            ViabilityReport {
                simulation: simulated.result,
                findings,
            },
        ))
    }
}
