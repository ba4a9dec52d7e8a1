use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::params::{ProjectionParams, MAX_HORIZON_MONTHS};
use crate::study::SalesConditions;
use crate::types::Month;

/// Floor on the projection horizon.
pub const MIN_TOTAL_MONTHS: usize = 36;
/// Months over which launch volume is sold.
const LAUNCH_WINDOW: usize = 3;
/// Months after delivery over which remaining stock is sold.
const POST_DELIVERY_WINDOW: usize = 12;
/// Receivables tail after delivery for bank-financed tables.
const DELIVERY_FINANCED_TAIL: usize = 24;

/// Month-indexed horizon and unit sales curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub total_months: usize,
    pub launch_month: Month,
    pub delivery_month: Month,
    /// Units sold per month before cancellations
    pub gross_units: Vec<Decimal>,
    /// Units sold per month after cancellations
    pub net_units: Vec<Decimal>,
    /// Sales volume that fell past the horizon and was never sold
    pub truncated_units: Decimal,
}

impl Timeline {
    pub fn build(params: &ProjectionParams) -> Timeline {
        let registration = params.registration_months;
        let construction = params.construction_months;

        let tail = match &params.sales_table {
            SalesConditions::DeliveryFinanced(_) => DELIVERY_FINANCED_TAIL,
            SalesConditions::Installment(plan) => (plan.installment_count as usize + 12)
                .min(MAX_HORIZON_MONTHS.saturating_sub(registration + construction)),
        };
        let total_months = (registration + construction + tail).max(MIN_TOTAL_MONTHS);
        let launch_month = registration;
        let delivery_month = registration + construction;

        let mut gross_units = vec![Decimal::ZERO; total_months];
        let mut truncated_units = Decimal::ZERO;
        let units = params.unit_count;

        // Launch
        let launch_volume = units * params.launch_share;
        truncated_units += spread(
            &mut gross_units,
            launch_month,
            LAUNCH_WINDOW,
            launch_volume,
        );

        // Construction: whatever months remain after the launch window
        let construction_volume = units * params.construction_share;
        let construction_start = launch_month + LAUNCH_WINDOW;
        if delivery_month > construction_start {
            truncated_units += spread(
                &mut gross_units,
                construction_start,
                delivery_month - construction_start,
                construction_volume,
            );
        } else {
            truncated_units += spread(&mut gross_units, delivery_month, 1, construction_volume);
        }

        // Post-delivery
        let post_volume = units * params.post_delivery_share;
        truncated_units += spread(
            &mut gross_units,
            delivery_month,
            POST_DELIVERY_WINDOW,
            post_volume,
        );

        let net_factor = Decimal::ONE - params.cancellation_rate;
        let net_units = gross_units.iter().map(|u| u * net_factor).collect();

        debug!(total_months, launch_month, delivery_month, tail, "timeline built");

        Timeline {
            total_months,
            launch_month,
            delivery_month,
            gross_units,
            net_units,
            truncated_units,
        }
    }

    pub fn total_gross_units(&self) -> Decimal {
        self.gross_units.iter().copied().sum()
    }

    pub fn total_net_units(&self) -> Decimal {
        self.net_units.iter().copied().sum()
    }
}

/// Add `volume` evenly over `window` months from `start`. Returns the part
/// that fell past the end of `units`.
fn spread(units: &mut [Decimal], start: Month, window: usize, volume: Decimal) -> Decimal {
    if volume.is_zero() || window == 0 {
        return Decimal::ZERO;
    }
    let per_month = volume / Decimal::from(window as u64);
    let mut lost = Decimal::ZERO;
    for month in start..start + window {
        match units.get_mut(month) {
            Some(slot) => *slot += per_month,
            None => lost += per_month,
        }
    }
    if lost > Decimal::ZERO {
        debug!(%lost, start, window, "sales volume beyond horizon");
    }
    lost
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use crate::study::{CorrectionIndex, DeliveryFinancedPlan, Typology};

    fn params(registration: usize, construction: usize, table: SalesConditions) -> ProjectionParams {
        ProjectionParams {
            typology: Typology::VerticalDevelopment,
            unit_count: dec!(120),
            vgv: dec!(60000000),
            registration_months: registration,
            construction_months: construction,
            launch_share: dec!(0.30),
            construction_share: dec!(0.50),
            post_delivery_share: dec!(0.20),
            cancellation_rate: dec!(0.10),
            bad_debt_rate: dec!(0.05),
            construction_base: dec!(20000000),
            land_cost_rate: dec!(0.14),
            overhead_rate: Decimal::ZERO,
            design_rate: Decimal::ZERO,
            approvals_rate: Decimal::ZERO,
            property_tax_rate: Decimal::ZERO,
            transfer_tax_rate: Decimal::ZERO,
            commission_rate: Decimal::ZERO,
            bonus_rate: Decimal::ZERO,
            marketing_rate: Decimal::ZERO,
            booth_rate: Decimal::ZERO,
            coordination_rate: Decimal::ZERO,
            administrative_rate: Decimal::ZERO,
            management_fee_rate: Decimal::ZERO,
            insurance_rate: Decimal::ZERO,
            pre_operating_rate: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            registry_rate: Decimal::ZERO,
            deeds_rate: Decimal::ZERO,
            discount_rate: dec!(0.12),
            sales_table: table,
        }
    }

    fn delivery_financed() -> SalesConditions {
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

    #[test]
    fn test_horizon_and_milestones() {
        let t = Timeline::build(&params(6, 24, delivery_financed()));
        assert_eq!(t.launch_month, 6);
        assert_eq!(t.delivery_month, 30);
        assert_eq!(t.total_months, 54);
        assert_eq!(t.gross_units.len(), 54);
    }

    #[test]
    fn test_horizon_floor() {
        let t = Timeline::build(&params(0, 6, delivery_financed()));
        assert_eq!(t.total_months, MIN_TOTAL_MONTHS);
    }

    #[test]
    fn test_installment_tail_is_capped() {
        let table = SalesConditions::default_for(Typology::LandSubdivision);
        // 180 installments + 12 would overrun 300 months
        let t = Timeline::build(&params(10, 120, table));
        assert_eq!(t.total_months, 300);
    }

    #[test]
    fn test_phase_volumes_are_conserved() {
        let t = Timeline::build(&params(6, 24, delivery_financed()));
        assert_eq!(t.truncated_units, Decimal::ZERO);
        assert!((t.total_gross_units() - dec!(120)).abs() < dec!(0.000001));
        assert!((t.total_net_units() - dec!(108)).abs() < dec!(0.000001));
        // Launch: 36 units over 3 months
        assert_eq!(t.gross_units[6], dec!(12));
        assert_eq!(t.gross_units[5], Decimal::ZERO);
    }

    #[test]
    fn test_zero_registration_launches_at_month_zero() {
        let t = Timeline::build(&params(0, 24, delivery_financed()));
        assert_eq!(t.launch_month, 0);
        assert_eq!(t.gross_units[0], dec!(12));
    }

    #[test]
    fn test_empty_construction_window_collapses_on_delivery() {
        let t = Timeline::build(&params(2, 0, delivery_financed()));
        // Delivery at month 2 receives all 60 construction-phase units plus
        // its share of launch and post-delivery volume.
        assert_eq!(t.delivery_month, 2);
        assert_eq!(t.gross_units[2], dec!(12) + dec!(60) + dec!(2));
        assert!((t.total_gross_units() - dec!(120)).abs() < dec!(0.000001));
    }
}
