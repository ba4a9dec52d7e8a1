pub mod findings;
pub mod rules;

use rust_decimal::Decimal;
use tracing::debug;

use crate::projection::SimulationResult;
use crate::study::Study;

pub use findings::{Finding, FindingCategory, Severity};

/// Compare a study and its projection against market benchmarks.
///
/// Every check runs independently and appends its findings; the list is then
/// stably sorted so critical findings come first and positives last, keeping
/// the battery order within each severity. A study with no sales value has
/// nothing to diagnose.
pub fn diagnose(study: &Study, result: &SimulationResult) -> Vec<Finding> {
    if result.vgv <= Decimal::ZERO {
        return Vec::new();
    }

    let ctx = rules::Context::new(study, result);
    let mut findings = Vec::new();
    for rule in rules::RULES {
        rule(&ctx, &mut findings);
    }
    findings.sort_by_key(|f| f.severity);

    debug!(count = findings.len(), "diagnostic complete");
    findings
}
