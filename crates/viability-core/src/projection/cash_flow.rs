use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::disbursement::monthly_share;
use super::params::ProjectionParams;
use super::series::{CashFlowLine, LineGroup, MonthlySeries};
use super::timeline::Timeline;
use crate::study::{DeliveryFinancedPlan, InstallmentPlan, SalesConditions};
use crate::types::{pct_to_rate, Money, Month};

/// Months between construction-phase reinforcements.
const REINFORCEMENT_INTERVAL: usize = 6;
/// Months after delivery covered by marketing and sales coordination.
const SALES_SUPPORT_AFTER_DELIVERY: usize = 12;
/// Months after delivery covered by administrative overheads.
const ADMIN_AFTER_DELIVERY: usize = 6;
const MIN_ADMIN_MONTHS: usize = 12;

/// Itemized monthly projection of one study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub series: MonthlySeries,
    /// Contract value of net units sold per month
    pub sold_value: Vec<Money>,
    /// Receivables scheduled past the last projected month
    pub revenue_beyond_horizon: Money,
    /// Costs and expenses scheduled past the last projected month
    pub outflows_beyond_horizon: Money,
}

/// Wraps the series and keeps track of what falls off the end.
struct Ledger {
    series: MonthlySeries,
    revenue_beyond_horizon: Money,
    outflows_beyond_horizon: Money,
}

impl Ledger {
    fn post(&mut self, line: CashFlowLine, month: Month, amount: Money) {
        if amount.is_zero() {
            return;
        }
        if !self.series.add(line, month, amount) {
            match line.group() {
                LineGroup::Revenue => self.revenue_beyond_horizon += amount,
                _ => self.outflows_beyond_horizon += amount,
            }
        }
    }

    /// Post `amount` split evenly over `count` months from `start`.
    fn post_even(&mut self, line: CashFlowLine, start: Month, count: usize, amount: Money) {
        if count == 0 {
            self.post(line, start, amount);
            return;
        }
        let each = amount / Decimal::from(count as u64);
        for month in start..start + count {
            self.post(line, month, each);
        }
    }
}

/// Run the projector over a timeline.
pub fn project(params: &ProjectionParams, timeline: &Timeline) -> Projection {
    let mut ledger = Ledger {
        series: MonthlySeries::new(timeline.total_months),
        revenue_beyond_horizon: Decimal::ZERO,
        outflows_beyond_horizon: Decimal::ZERO,
    };

    let price = params.unit_price();
    let sold_value: Vec<Money> = timeline.net_units.iter().map(|u| price * u).collect();

    project_revenue(&mut ledger, params, timeline, &sold_value);
    apply_bad_debt(&mut ledger, params);
    project_costs(&mut ledger, params, timeline);
    project_expenses(&mut ledger, params, timeline);

    debug!(
        months = timeline.total_months,
        revenue_beyond_horizon = %ledger.revenue_beyond_horizon,
        "cash flow projected"
    );

    Projection {
        series: ledger.series,
        sold_value,
        revenue_beyond_horizon: ledger.revenue_beyond_horizon,
        outflows_beyond_horizon: ledger.outflows_beyond_horizon,
    }
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

fn project_revenue(
    ledger: &mut Ledger,
    params: &ProjectionParams,
    timeline: &Timeline,
    sold_value: &[Money],
) {
    for (month, value) in sold_value.iter().enumerate() {
        if *value <= Decimal::ZERO {
            continue;
        }
        match &params.sales_table {
            SalesConditions::Installment(plan) => {
                collect_installment_plan(ledger, plan, month, *value, timeline.total_months)
            }
            SalesConditions::DeliveryFinanced(plan) => {
                collect_delivery_financed(ledger, plan, month, *value, timeline.delivery_month)
            }
        }
    }
}

fn collect_installment_plan(
    ledger: &mut Ledger,
    plan: &InstallmentPlan,
    sale_month: Month,
    value: Money,
    total_months: usize,
) {
    let down_count = plan.down_payment_installments.max(1) as usize;
    ledger.post_even(
        CashFlowLine::DownPayment,
        sale_month,
        down_count,
        value * pct_to_rate(plan.down_payment_pct),
    );

    ledger.post_even(
        CashFlowLine::Installments,
        sale_month + down_count,
        plan.installment_count as usize,
        value * pct_to_rate(plan.amortized_balance_pct),
    );

    if plan.intermediate_pct > Decimal::ZERO {
        // One balloon per anniversary over the whole years left in the horizon
        let years = (total_months.saturating_sub(sale_month) / 12).max(1);
        let each = value * pct_to_rate(plan.intermediate_pct) / Decimal::from(years as u64);
        for year in 1..=years {
            ledger.post(CashFlowLine::IntermediatePayments, sale_month + 12 * year, each);
        }
    }
}

fn collect_delivery_financed(
    ledger: &mut Ledger,
    plan: &DeliveryFinancedPlan,
    sale_month: Month,
    value: Money,
    delivery_month: Month,
) {
    ledger.post(
        CashFlowLine::DownPayment,
        sale_month,
        value * pct_to_rate(plan.down_payment_pct),
    );

    let installments = value * pct_to_rate(plan.construction_installments_pct);
    if plan.installment_count > 0 {
        ledger.post_even(
            CashFlowLine::Installments,
            sale_month + 1,
            plan.installment_count as usize,
            installments,
        );
    } else {
        ledger.post(CashFlowLine::Installments, sale_month, installments);
    }

    // Recognized on the delivery month even for units sold afterwards
    ledger.post(
        CashFlowLine::DeliveryFinancing,
        delivery_month,
        value * pct_to_rate(plan.delivery_financing_pct),
    );

    if plan.reinforcement_pct > Decimal::ZERO {
        let count =
            (delivery_month.saturating_sub(sale_month) / REINFORCEMENT_INTERVAL).max(1);
        let each = value * pct_to_rate(plan.reinforcement_pct) / Decimal::from(count as u64);
        for r in 1..=count {
            ledger.post(
                CashFlowLine::Reinforcements,
                sale_month + REINFORCEMENT_INTERVAL * r,
                each,
            );
        }
    }
}

fn apply_bad_debt(ledger: &mut Ledger, params: &ProjectionParams) {
    if params.bad_debt_rate.is_zero() {
        return;
    }
    let gross = ledger.series.group_monthly(LineGroup::Revenue);
    for (month, amount) in gross.iter().enumerate() {
        ledger.post(CashFlowLine::BadDebt, month, amount * params.bad_debt_rate);
    }
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

fn project_costs(ledger: &mut Ledger, params: &ProjectionParams, timeline: &Timeline) {
    let vgv = params.vgv;
    let registration = params.registration_months;

    // Land and transfer tax up front
    let land_value = vgv * params.land_cost_rate;
    ledger.post(CashFlowLine::LandAcquisition, 0, land_value);
    ledger.post(CashFlowLine::LandTransferTax, 0, land_value * params.transfer_tax_rate);

    // Design across the registration period, approvals on its last month
    let design = vgv * params.design_rate;
    let approvals = vgv * params.approvals_rate;
    if registration > 0 {
        ledger.post_even(CashFlowLine::Design, 0, registration, design);
        let approvals_month = (registration - 1).min(timeline.total_months.saturating_sub(1));
        ledger.post(CashFlowLine::Approvals, approvals_month, approvals);
    } else {
        ledger.post(CashFlowLine::Design, 0, design);
        ledger.post(CashFlowLine::Approvals, 0, approvals);
    }

    // Construction along the S-curve from launch
    let base = params.construction_base;
    let construction = params.construction_months;
    if construction == 0 {
        ledger.post(CashFlowLine::ConstructionRaw, timeline.delivery_month, base);
        ledger.post(
            CashFlowLine::ConstructionOverhead,
            timeline.delivery_month,
            base * params.overhead_rate,
        );
    } else {
        for step in 0..construction {
            let share = monthly_share(params.typology, step, construction);
            let month = timeline.launch_month + step;
            ledger.post(CashFlowLine::ConstructionRaw, month, base * share);
            ledger.post(
                CashFlowLine::ConstructionOverhead,
                month,
                base * params.overhead_rate * share,
            );
        }
    }

    // Property tax on the land, monthly up to and including delivery
    if land_value > Decimal::ZERO && params.property_tax_rate > Decimal::ZERO {
        let monthly = land_value * params.property_tax_rate / Decimal::from(12);
        let last = timeline.delivery_month.min(timeline.total_months.saturating_sub(1));
        for month in 0..=last {
            ledger.post(CashFlowLine::LandPropertyTax, month, monthly);
        }
    }
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

fn project_expenses(ledger: &mut Ledger, params: &ProjectionParams, timeline: &Timeline) {
    let vgv = params.vgv;
    let total = timeline.total_months;
    let launch = timeline.launch_month;
    let delivery = timeline.delivery_month;
    let registration = params.registration_months;

    ledger.post(CashFlowLine::PreOperating, 0, vgv * params.pre_operating_rate);

    let registry_month = if registration > 0 && registration < total {
        registration - 1
    } else {
        0
    };
    ledger.post(
        CashFlowLine::IncorporationRegistry,
        registry_month,
        vgv * params.registry_rate,
    );

    // Brokers are paid on every contract signed, cancelled or not
    let price = params.unit_price();
    for (month, units) in timeline.gross_units.iter().enumerate() {
        if *units <= Decimal::ZERO {
            continue;
        }
        let signed = price * units;
        ledger.post(CashFlowLine::Commissions, month, signed * params.commission_rate);
        ledger.post(CashFlowLine::SalesBonus, month, signed * params.bonus_rate);
    }

    let sales_end = (delivery + SALES_SUPPORT_AFTER_DELIVERY).min(total);
    let sales_months = sales_end.saturating_sub(launch).max(1);
    let window = sales_end.saturating_sub(launch);
    let marketing = vgv * params.marketing_rate / Decimal::from(sales_months as u64);
    let coordination = vgv * params.coordination_rate / Decimal::from(sales_months as u64);
    for month in launch..launch + window {
        ledger.post(CashFlowLine::Marketing, month, marketing);
        ledger.post(CashFlowLine::SalesCoordination, month, coordination);
    }

    ledger.post(CashFlowLine::SalesBooth, launch, vgv * params.booth_rate);

    let project_months = (delivery + ADMIN_AFTER_DELIVERY).max(MIN_ADMIN_MONTHS);
    let divisor = Decimal::from(project_months as u64);
    let admin = vgv * params.administrative_rate / divisor;
    let management = vgv * params.management_fee_rate / divisor;
    for month in 0..project_months.min(total) {
        ledger.post(CashFlowLine::Administrative, month, admin);
        ledger.post(CashFlowLine::ManagementFee, month, management);
    }

    let years = (project_months / 12).max(1);
    let premium = vgv * params.insurance_rate / Decimal::from(years as u64);
    for year in 0..years {
        ledger.post(CashFlowLine::Insurance, 12 * year, premium);
    }

    ledger.post(CashFlowLine::Deeds, delivery, vgv * params.deeds_rate);

    // Tax on what is actually collected
    let gross = ledger.series.group_monthly(LineGroup::Revenue);
    let bad_debt = ledger.series.group_monthly(LineGroup::RevenueDeduction);
    for (month, (g, b)) in gross.iter().zip(&bad_debt).enumerate() {
        ledger.post(CashFlowLine::Tax, month, (g - b) * params.tax_rate);
    }
}
