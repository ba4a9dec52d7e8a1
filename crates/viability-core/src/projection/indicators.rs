use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value::{annualize_monthly, monthly_rate_from_annual, npv, solve_irr, IrrSolution};
use crate::types::{ratio_pct, Money, Month, Percent, Rate};
use crate::ViabilityResult;

/// Investment-appraisal figures derived from the monthly flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    /// Net revenue minus cost minus expense
    pub result: Money,
    pub margin_on_sales_pct: Percent,
    pub margin_on_cost_pct: Percent,
    pub margin_on_net_revenue_pct: Percent,
    pub irr: IrrSolution,
    pub irr_monthly_pct: Percent,
    pub irr_annual_pct: Percent,
    /// NPV at the monthly equivalent of the annual discount rate
    pub npv: Money,
    /// Most negative cumulative flow, or zero
    pub peak_exposure: Money,
    pub payback_month: Month,
    /// Result over the absolute peak exposure, when there is exposure
    pub profit_on_exposure_pct: Option<Percent>,
}

impl Indicators {
    pub fn zero() -> Self {
        Indicators {
            result: Decimal::ZERO,
            margin_on_sales_pct: Decimal::ZERO,
            margin_on_cost_pct: Decimal::ZERO,
            margin_on_net_revenue_pct: Decimal::ZERO,
            irr: solve_irr(&[]),
            irr_monthly_pct: Decimal::ZERO,
            irr_annual_pct: Decimal::ZERO,
            npv: Decimal::ZERO,
            peak_exposure: Decimal::ZERO,
            payback_month: 0,
            profit_on_exposure_pct: None,
        }
    }
}

/// Aggregates the indicator calculation needs.
pub struct IndicatorInputs<'a> {
    pub vgv: Money,
    pub net_revenue: Money,
    pub total_cost: Money,
    pub total_expense: Money,
    pub net_flow: &'a [Money],
    pub cumulative_flow: &'a [Money],
    /// Annual
    pub discount_rate: Rate,
}

/// Running sum of a flow series.
pub fn cumulative(flows: &[Money]) -> Vec<Money> {
    flows
        .iter()
        .scan(Decimal::ZERO, |acc, cf| {
            *acc += *cf;
            Some(*acc)
        })
        .collect()
}

/// First month whose cumulative flow is positive; the horizon length if none.
pub fn payback_month(cumulative_flow: &[Money]) -> Month {
    cumulative_flow
        .iter()
        .position(|c| *c > Decimal::ZERO)
        .unwrap_or(cumulative_flow.len())
}

pub fn peak_exposure(cumulative_flow: &[Money]) -> Money {
    cumulative_flow
        .iter()
        .copied()
        .min()
        .unwrap_or(Decimal::ZERO)
        .min(Decimal::ZERO)
}

pub fn calculate(inputs: &IndicatorInputs<'_>) -> ViabilityResult<Indicators> {
    let result = inputs.net_revenue - inputs.total_cost - inputs.total_expense;

    let irr = solve_irr(inputs.net_flow);
    let irr_annual = annualize_monthly(irr.rate)?;

    let monthly_discount = monthly_rate_from_annual(inputs.discount_rate)?;
    let npv_value = npv(monthly_discount, inputs.net_flow)?;

    let peak = peak_exposure(inputs.cumulative_flow);
    let profit_on_exposure_pct = if peak < Decimal::ZERO {
        Some(ratio_pct(result, peak.abs()))
    } else {
        None
    };

    Ok(Indicators {
        result,
        margin_on_sales_pct: ratio_pct(result, inputs.vgv),
        margin_on_cost_pct: ratio_pct(result, inputs.total_cost),
        margin_on_net_revenue_pct: ratio_pct(result, inputs.net_revenue),
        irr,
        irr_monthly_pct: irr.rate * Decimal::ONE_HUNDRED,
        irr_annual_pct: irr_annual * Decimal::ONE_HUNDRED,
        npv: npv_value,
        peak_exposure: peak,
        payback_month: payback_month(inputs.cumulative_flow),
        profit_on_exposure_pct,
    })
}
