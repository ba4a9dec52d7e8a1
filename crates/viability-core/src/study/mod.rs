pub mod assumptions;
pub mod input;
pub mod sales_table;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use assumptions::{
    Assumption, AssumptionCategory, AssumptionKey, AssumptionSet, AssumptionUnit,
};
pub use input::{LandDeal, ProjectInput, Region, Tier, Typology};
pub use sales_table::{
    AmortizationSystem, CorrectionIndex, DeliveryFinancedPlan, InstallmentPlan, SalesConditions,
};

use crate::ViabilityResult;

/// A project input together with its editable assumptions: everything a
/// projection needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Study {
    pub input: ProjectInput,
    pub assumptions: AssumptionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_conditions: Option<SalesConditions>,
    /// Calendar month of timeline month 0, used only for labelling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl Study {
    pub fn new(input: ProjectInput, assumptions: AssumptionSet) -> Self {
        Study {
            input,
            assumptions,
            sales_conditions: None,
            start_date: None,
        }
    }

    /// The study's sales table, or the typology default when none is set.
    pub fn sales_table(&self) -> SalesConditions {
        self.sales_conditions
            .clone()
            .unwrap_or_else(|| SalesConditions::default_for(self.input.typology))
    }

    pub fn validate(&self) -> ViabilityResult<()> {
        self.input.validate()
    }
}
