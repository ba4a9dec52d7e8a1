pub mod cash_flow;
pub mod disbursement;
pub mod indicators;
pub mod params;
pub mod series;
pub mod timeline;

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Months;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::study::Study;
use crate::time_value::IrrMethod;
use crate::types::{with_metadata, ComputationOutput, Money, Month};
use crate::ViabilityResult;

pub use cash_flow::{project, Projection};
pub use indicators::Indicators;
pub use params::{resolve_vgv, ProjectionParams};
pub use series::{CashFlowLine, LineGroup, MonthlySeries};
pub use timeline::Timeline;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Full output of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Total target sales value (VGV)
    pub vgv: Money,
    pub unit_price: Money,
    /// Units sold over the horizon after cancellations
    pub net_units: Decimal,
    /// VGV lost to cancellations
    pub cancelled_sales_value: Money,
    pub total_months: usize,
    pub launch_month: Month,
    pub delivery_month: Month,
    /// Net units sold per month
    pub units_sold: Vec<Decimal>,
    /// Contract value of net units sold per month
    pub sold_value: Vec<Money>,
    /// Itemized monthly lines
    pub lines: MonthlySeries,
    /// Flat `line -> total` map, for persistence
    pub line_totals: BTreeMap<CashFlowLine, Money>,
    pub gross_revenue: Money,
    pub bad_debt: Money,
    pub net_revenue: Money,
    pub total_cost: Money,
    pub total_expense: Money,
    /// Net revenue per month (gross less bad debt)
    pub revenue: Vec<Money>,
    pub cost: Vec<Money>,
    pub expense: Vec<Money>,
    pub net_flow: Vec<Money>,
    pub cumulative_flow: Vec<Money>,
    pub indicators: Indicators,
    /// Receivables scheduled past the last projected month
    pub revenue_beyond_horizon: Money,
}

impl SimulationResult {
    /// Zero-valued result returned for a non-positive sales value.
    pub fn empty(vgv: Money) -> Self {
        SimulationResult {
            vgv,
            unit_price: Decimal::ZERO,
            net_units: Decimal::ZERO,
            cancelled_sales_value: Decimal::ZERO,
            total_months: 0,
            launch_month: 0,
            delivery_month: 0,
            units_sold: Vec::new(),
            sold_value: Vec::new(),
            lines: MonthlySeries::new(0),
            line_totals: MonthlySeries::new(0).totals(),
            gross_revenue: Decimal::ZERO,
            bad_debt: Decimal::ZERO,
            net_revenue: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            revenue: Vec::new(),
            cost: Vec::new(),
            expense: Vec::new(),
            net_flow: Vec::new(),
            cumulative_flow: Vec::new(),
            indicators: Indicators::zero(),
            revenue_beyond_horizon: Decimal::ZERO,
        }
    }
}

/// One month of the consolidated cash-flow report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRow {
    pub month: Month,
    /// Calendar month (`YYYY-MM`) when the study has a start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub units_sold: Decimal,
    pub revenue: Money,
    pub cost: Money,
    pub expense: Money,
    pub net_flow: Money,
    pub cumulative_flow: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project a study month by month and derive its viability indicators.
pub fn simulate(study: &Study) -> ViabilityResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let vgv = resolve_vgv(study)?;
    if vgv <= Decimal::ZERO {
        warnings.push("Target sales value is not positive; returning an empty projection".into());
        let elapsed = start.elapsed().as_micros() as u64;
        return Ok(with_metadata(
            "Monthly development cash-flow projection",
            study,
            warnings,
            elapsed,
            SimulationResult::empty(vgv),
        ));
    }

    let params = ProjectionParams::from_study(study)?;
    check_params(study, &params, &mut warnings);

    let timeline = Timeline::build(&params);
    if timeline.truncated_units > Decimal::ZERO {
        warnings.push(format!(
            "{:.2} units fall past the {}-month horizon and are never sold",
            timeline.truncated_units, timeline.total_months
        ));
    }

    let projection = project(&params, &timeline);
    if projection.revenue_beyond_horizon > Decimal::ZERO {
        warnings.push(format!(
            "R$ {:.2} of receivables fall past the {}-month horizon and are not recognised",
            projection.revenue_beyond_horizon, timeline.total_months
        ));
    }
    if projection.outflows_beyond_horizon > Decimal::ZERO {
        warnings.push(format!(
            "R$ {:.2} of costs and expenses fall past the {}-month horizon and are not recognised",
            projection.outflows_beyond_horizon, timeline.total_months
        ));
    }

    let result = assemble(&params, &timeline, projection)?;
    match result.indicators.irr.method {
        IrrMethod::NewtonRaphson => {}
        IrrMethod::Bisection => {
            warnings.push("IRR found by bisection after Newton-Raphson failed".into())
        }
        IrrMethod::BestEstimate => {
            warn!("IRR did not converge");
            warnings.push("IRR did not converge; reporting the best estimate".into())
        }
        IrrMethod::Undefined => {
            warnings.push("Cash flow never changes sign; IRR is undefined and reported as 0".into())
        }
    }

    debug!(
        months = result.total_months,
        result = %result.indicators.result,
        "simulation complete"
    );

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Monthly development cash-flow projection",
        study,
        warnings,
        elapsed,
        result,
    ))
}

/// Month-by-month consolidated rows for tabular export.
pub fn cash_flow_rows(study: &Study, result: &SimulationResult) -> Vec<CashFlowRow> {
    (0..result.total_months)
        .map(|month| CashFlowRow {
            month,
            label: study.start_date.and_then(|date| {
                date.checked_add_months(Months::new(month as u32))
                    .map(|d| d.format("%Y-%m").to_string())
            }),
            units_sold: result.units_sold[month],
            revenue: result.revenue[month],
            cost: result.cost[month],
            expense: result.expense[month],
            net_flow: result.net_flow[month],
            cumulative_flow: result.cumulative_flow[month],
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn check_params(study: &Study, params: &ProjectionParams, warnings: &mut Vec<String>) {
    if !params.sales_table.suits(params.typology) {
        warnings.push(format!(
            "Sales table shape is unusual for {}",
            params.typology.label()
        ));
    }
    let table_total = params.sales_table.total_pct();
    if table_total != Decimal::ONE_HUNDRED {
        warnings.push(format!(
            "Sales table percentages add up to {table_total}%, not 100%"
        ));
    }
    let phases = params.launch_share + params.construction_share + params.post_delivery_share;
    if phases != Decimal::ONE {
        warnings.push(format!(
            "Sales phase split adds up to {}%, not 100%",
            phases * Decimal::ONE_HUNDRED
        ));
    }
    if study.sales_conditions.is_none() {
        debug!("no sales table supplied; using the typology default");
    }
}

fn assemble(
    params: &ProjectionParams,
    timeline: &Timeline,
    projection: Projection,
) -> ViabilityResult<SimulationResult> {
    let lines = projection.series;

    let gross = lines.group_monthly(LineGroup::Revenue);
    let bad_debt = lines.group_monthly(LineGroup::RevenueDeduction);
    let revenue: Vec<Money> = gross.iter().zip(&bad_debt).map(|(g, b)| g - b).collect();
    let cost = lines.group_monthly(LineGroup::Cost);
    let expense = lines.group_monthly(LineGroup::Expense);
    let net_flow: Vec<Money> = revenue
        .iter()
        .zip(&cost)
        .zip(&expense)
        .map(|((r, c), e)| r - c - e)
        .collect();
    let cumulative_flow = indicators::cumulative(&net_flow);

    let gross_revenue: Money = gross.iter().copied().sum();
    let bad_debt_total: Money = bad_debt.iter().copied().sum();
    let net_revenue: Money = revenue.iter().copied().sum();
    let total_cost: Money = cost.iter().copied().sum();
    let total_expense: Money = expense.iter().copied().sum();

    let indicators = indicators::calculate(&indicators::IndicatorInputs {
        vgv: params.vgv,
        net_revenue,
        total_cost,
        total_expense,
        net_flow: &net_flow,
        cumulative_flow: &cumulative_flow,
        discount_rate: params.discount_rate,
    })?;

    Ok(SimulationResult {
        vgv: params.vgv,
        unit_price: params.unit_price(),
        net_units: timeline.total_net_units(),
        cancelled_sales_value: params.vgv * params.cancellation_rate,
        total_months: timeline.total_months,
        launch_month: timeline.launch_month,
        delivery_month: timeline.delivery_month,
        units_sold: timeline.net_units.clone(),
        sold_value: projection.sold_value,
        line_totals: lines.totals(),
        lines,
        gross_revenue,
        bad_debt: bad_debt_total,
        net_revenue,
        total_cost,
        total_expense,
        revenue,
        cost,
        expense,
        net_flow,
        cumulative_flow,
        indicators,
        revenue_beyond_horizon: projection.revenue_beyond_horizon,
    })
}
