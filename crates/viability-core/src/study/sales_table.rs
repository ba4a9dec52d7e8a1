use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::input::Typology;
use crate::types::Percent;

/// Amortization system of a directly financed balance. Recorded for
/// reporting; balances are collected in equal instalments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationSystem {
    Price,
    Sac,
    Gradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionIndex {
    Incc,
    Ipca,
    Igpm,
}

/// Developer-financed plan, typical of land subdivisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub down_payment_pct: Percent,
    pub down_payment_installments: u32,
    pub amortized_balance_pct: Percent,
    /// Annual balloon payments
    pub intermediate_pct: Percent,
    pub installment_count: u32,
    pub amortization_system: AmortizationSystem,
    pub monthly_rate_pct: Percent,
    pub correction_index: CorrectionIndex,
}

/// Plan where a bank finances the bulk of the price at key delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFinancedPlan {
    pub down_payment_pct: Percent,
    pub construction_installments_pct: Percent,
    pub delivery_financing_pct: Percent,
    pub reinforcement_pct: Percent,
    pub installment_count: u32,
    pub pre_delivery_index: CorrectionIndex,
    pub post_delivery_index: CorrectionIndex,
}

/// How a unit's price is collected over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum SalesConditions {
    Installment(InstallmentPlan),
    DeliveryFinanced(DeliveryFinancedPlan),
}

impl SalesConditions {
    /// Fallback table when a study carries none.
    pub fn default_for(typology: Typology) -> SalesConditions {
        if typology.is_land_subdivision() {
            SalesConditions::Installment(InstallmentPlan {
                down_payment_pct: dec!(10),
                down_payment_installments: 3,
                amortized_balance_pct: dec!(90),
                intermediate_pct: Decimal::ZERO,
                installment_count: 180,
                amortization_system: AmortizationSystem::Price,
                monthly_rate_pct: dec!(0.8),
                correction_index: CorrectionIndex::Ipca,
            })
        } else {
            SalesConditions::DeliveryFinanced(DeliveryFinancedPlan {
                down_payment_pct: dec!(10),
                construction_installments_pct: dec!(25),
                delivery_financing_pct: dec!(55),
                reinforcement_pct: dec!(10),
                installment_count: 24,
                pre_delivery_index: CorrectionIndex::Incc,
                post_delivery_index: CorrectionIndex::Igpm,
            })
        }
    }

    /// Whether this shape is the one normally used for `typology`.
    pub fn suits(&self, typology: Typology) -> bool {
        matches!(self, SalesConditions::Installment(_)) == typology.is_land_subdivision()
    }

    /// Sum of all price shares; 100 for a fully allocated table.
    pub fn total_pct(&self) -> Percent {
        match self {
            SalesConditions::Installment(p) => {
                p.down_payment_pct + p.amortized_balance_pct + p.intermediate_pct
            }
            SalesConditions::DeliveryFinanced(p) => {
                p.down_payment_pct
                    + p.construction_installments_pct
                    + p.delivery_financing_pct
                    + p.reinforcement_pct
            }
        }
    }

    pub fn installment_count(&self) -> u32 {
        match self {
            SalesConditions::Installment(p) => p.installment_count,
            SalesConditions::DeliveryFinanced(p) => p.installment_count,
        }
    }
}
