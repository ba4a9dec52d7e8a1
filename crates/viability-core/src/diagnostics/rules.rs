use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::findings::{fmt_money, fmt_pct, fmt_whole, Finding, FindingCategory, Severity};
use crate::projection::{CashFlowLine, SimulationResult};
use crate::study::{AssumptionKey, Study};
use crate::types::{ratio_pct, Percent};

/// Everything a check may look at.
pub struct Context<'a> {
    pub study: &'a Study,
    pub result: &'a SimulationResult,
    pub land_subdivision: bool,
}

impl<'a> Context<'a> {
    pub fn new(study: &'a Study, result: &'a SimulationResult) -> Self {
        Context {
            study,
            result,
            land_subdivision: study.input.typology.is_land_subdivision(),
        }
    }

    /// Assumption value (or its default). `None` skips the check.
    fn value(&self, key: AssumptionKey) -> Option<Decimal> {
        self.study.assumptions.value_or_default(key)
    }

    fn line_pct_of_vgv(&self, lines: &[CashFlowLine]) -> Percent {
        let total: Decimal = lines.iter().map(|l| self.result.lines.total(*l)).sum();
        ratio_pct(total, self.result.vgv)
    }

    fn construction_pct(&self) -> Percent {
        self.line_pct_of_vgv(&[CashFlowLine::ConstructionRaw])
    }

    fn construction_benchmark(&self) -> Percent {
        if self.land_subdivision {
            dec!(35)
        } else {
            dec!(40)
        }
    }

    fn construction_word(&self) -> &'static str {
        if self.land_subdivision {
            "infrastructure"
        } else {
            "construction"
        }
    }
}

pub type Rule = fn(&Context<'_>, &mut Vec<Finding>);

/// The battery, in reporting order before severity sorting.
pub const RULES: &[Rule] = &[
    cancellation,
    bad_debt,
    sales_velocity,
    launch_concentration,
    land_cost,
    construction_cost,
    overhead_markup,
    commercial_expenses,
    tax_regime,
    administrative_expenses,
    discount_rate,
    overall_margin,
    payback,
    peak_exposure,
    strengths,
    out_of_range,
];

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

fn cancellation(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(rate) = ctx.value(AssumptionKey::CancellationRate) else {
        return;
    };
    let (benchmark, ceiling) = if ctx.land_subdivision {
        (dec!(12), dec!(18))
    } else {
        (dec!(8), dec!(15))
    };
    let current = fmt_pct(rate, 1);
    let bench = format!("{}%", fmt_whole(benchmark));

    if rate > ceiling {
        out.push(
            Finding::new(
                FindingCategory::Revenue,
                Severity::Critical,
                "Cancellation rate far too high",
                format!(
                    "A cancellation rate of {current} is well above the market benchmark \
                     ({bench}). A significant share of sales is lost, reducing net revenue."
                ),
            )
            .values(current, bench)
            .recommend(
                "Tighten buyer credit analysis, require a larger down payment, offer \
                 renegotiation before a contract is cancelled and strengthen after-sales. \
                 Consider a 20-25% termination penalty clause.",
            ),
        );
    } else if rate > benchmark {
        out.push(
            Finding::new(
                FindingCategory::Revenue,
                Severity::Attention,
                "Cancellation rate above market",
                format!("A cancellation rate of {current} is above the benchmark ({bench})."),
            )
            .values(current, bench)
            .recommend(
                "Improve buyer qualification at sale and offer renegotiation before \
                 formalising a cancellation.",
            ),
        );
    }
}

fn bad_debt(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(rate) = ctx.value(AssumptionKey::BadDebtRate) else {
        return;
    };
    let (benchmark, ceiling) = if ctx.land_subdivision {
        (dec!(15), dec!(25))
    } else {
        (dec!(5), dec!(10))
    };
    let current = fmt_pct(rate, 1);
    let bench = format!("{}%", fmt_whole(benchmark));

    if rate > ceiling {
        out.push(
            Finding::new(
                FindingCategory::Revenue,
                Severity::Critical,
                "Bad debt far too high",
                format!(
                    "Bad debt of {current} is well above the benchmark ({bench}), \
                     causing a significant loss of collected revenue."
                ),
            )
            .values(current, bench)
            .recommend(
                "Run active, automated collections and require a larger down payment. \
                 For land subdivisions use fiduciary alienation so lots can be recovered \
                 and resold. Strengthen credit analysis before the sale.",
            ),
        );
    } else if rate > benchmark {
        out.push(
            Finding::new(
                FindingCategory::Revenue,
                Severity::Attention,
                "Bad debt above market",
                format!("Bad debt of {current} is above the benchmark ({bench})."),
            )
            .values(current, bench)
            .recommend(
                "Reinforce collections and consider a sales table with a larger down payment.",
            ),
        );
    }
}

fn sales_velocity(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(velocity) = ctx.value(AssumptionKey::SalesVelocity) else {
        return;
    };
    if velocity >= dec!(2) {
        return;
    }
    let benchmark = if ctx.land_subdivision { dec!(3.5) } else { dec!(3.0) };
    let current = format!("{}%/month", velocity.round_dp(1));
    out.push(
        Finding::new(
            FindingCategory::Revenue,
            Severity::Critical,
            "Sales velocity too low",
            format!(
                "Selling {current} of stock implies a very long sales period, raising \
                 financial cost and project exposure."
            ),
        )
        .values(current, format!("{benchmark}%/month"))
        .recommend(
            "Revisit product positioning: price, location and competition. Invest more \
             in marketing and the sales booth, partner with local brokers or digital \
             platforms, and check the product fits the regional buyer.",
        ),
    );
}

fn launch_concentration(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(launch) = ctx.value(AssumptionKey::LaunchSalesPct) else {
        return;
    };
    if launch >= dec!(25) {
        return;
    }
    let current = fmt_pct(launch, 0);
    out.push(
        Finding::new(
            FindingCategory::Revenue,
            Severity::Attention,
            "Few sales at launch",
            format!(
                "Only {current} of sales happen at launch. Concentrating 30-50% there \
                 brings revenue forward and reduces exposure."
            ),
        )
        .values(current, "30-50%")
        .recommend(
            "Invest in pre-launch and a waiting list, offer launch-table conditions to \
             early buyers and have the sales booth and team ready before launch.",
        ),
    );
}

// ---------------------------------------------------------------------------
// Cost
// ---------------------------------------------------------------------------

const LAND_BENCHMARK: Decimal = dec!(15);

fn land_cost(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(land) = ctx.value(AssumptionKey::LandCostPct) else {
        return;
    };
    let current = format!("{} of VGV", fmt_pct(land, 1));
    let bench = format!("{}% of VGV", fmt_whole(LAND_BENCHMARK));

    if land > dec!(22) {
        out.push(
            Finding::new(
                FindingCategory::Cost,
                Severity::Critical,
                "Land cost excessive",
                format!(
                    "Land is {current}, far above the {bench} benchmark. Land is typically \
                     the largest drag on development viability."
                ),
            )
            .values(current, bench)
            .recommend(
                "Renegotiate the land as a physical or financial swap to cut the upfront \
                 outlay. Check whether the sales value supports the land price; if not, \
                 raise density to dilute it, or look for another site.",
            ),
        );
    } else if land > dec!(18) {
        out.push(
            Finding::new(
                FindingCategory::Cost,
                Severity::Attention,
                "Land cost high",
                format!("Land at {current} is above the ideal ({bench})."),
            )
            .values(current, bench)
            .recommend(
                "Negotiate a partial swap (part cash, part units) and revisit the \
                 buildable potential to raise the sales value.",
            ),
        );
    }
}

fn construction_cost(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let pct = ctx.construction_pct();
    let benchmark = ctx.construction_benchmark();
    let word = ctx.construction_word();
    let current = format!("{} of VGV", fmt_pct(pct, 1));

    if pct > benchmark * dec!(1.3) {
        out.push(
            Finding::new(
                FindingCategory::Cost,
                Severity::Critical,
                format!("{} cost far too high", capitalise(word)),
                format!(
                    "The {word} cost is {current}, above the {}% benchmark. It squeezes \
                     the margin directly.",
                    fmt_whole(benchmark)
                ),
            )
            .values(current, format!("up to {}% of VGV", fmt_whole(benchmark)))
            .recommend(
                "Review the specification so the finish suits the target buyer, source \
                 alternative suppliers and buy at scale. If the cost cannot come down, \
                 check whether the sales price can go up.",
            ),
        );
    } else if pct > benchmark {
        out.push(
            Finding::new(
                FindingCategory::Cost,
                Severity::Attention,
                format!("{} cost above market", capitalise(word)),
                format!(
                    "{} at {current}, above the benchmark ({}%).",
                    capitalise(word),
                    fmt_whole(benchmark)
                ),
            )
            .values(current, format!("{}% of VGV", fmt_whole(benchmark)))
            .recommend("Look for value-engineering gains and rationalise the design."),
        );
    }
}

fn overhead_markup(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(bdi) = ctx.value(AssumptionKey::OverheadMarkup) else {
        return;
    };
    if bdi <= dec!(20) {
        return;
    }
    let current = fmt_pct(bdi, 1);
    out.push(
        Finding::new(
            FindingCategory::Cost,
            Severity::Attention,
            "Construction overhead (BDI) high",
            format!("A BDI of {current} is above the 15% benchmark and inflates total build cost."),
        )
        .values(current, "15%")
        .recommend(
            "Negotiate the markup with the contractor or build under a cost-plus \
             contract with tighter cost control.",
        ),
    );
}

// ---------------------------------------------------------------------------
// Expense
// ---------------------------------------------------------------------------

fn commercial_expenses(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let pct = ctx.line_pct_of_vgv(&[
        CashFlowLine::Commissions,
        CashFlowLine::SalesBonus,
        CashFlowLine::SalesBooth,
        CashFlowLine::SalesCoordination,
        CashFlowLine::Marketing,
    ]);
    let current = format!("{} of VGV", fmt_pct(pct, 1));

    if pct > dec!(12) {
        out.push(
            Finding::new(
                FindingCategory::Expense,
                Severity::Critical,
                "Commercial expenses excessive",
                format!(
                    "Commercial expenses add up to {current} (benchmark: up to 9%). \
                     Commissions, marketing, booth and bonuses are eating the margin."
                ),
            )
            .values(current, "up to 9% of VGV")
            .recommend(
                "Renegotiate brokerage (the market pays 4-5%), use digital show units or \
                 a smaller booth, focus marketing on digital channels and tie bonuses to \
                 sales-velocity targets.",
            ),
        );
    } else if pct > dec!(9) {
        out.push(
            Finding::new(
                FindingCategory::Expense,
                Severity::Attention,
                "Commercial expenses above market",
                format!("Commercial expenses at {current}. Benchmark: 9%."),
            )
            .values(current, "9% of VGV")
            .recommend("Review the commercial structure and look for marketing efficiencies."),
        );
    }
}

fn tax_regime(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(tax) = ctx.value(AssumptionKey::TaxRate) else {
        return;
    };
    if tax < dec!(6) {
        return;
    }
    let current = fmt_pct(tax, 2);
    out.push(
        Finding::new(
            FindingCategory::Expense,
            Severity::Attention,
            "Tax burden high",
            format!(
                "A tax rate of {current} (presumed profit) is far above the special regime \
                 (4%) or its social-housing variant (1%)."
            ),
        )
        .values(current, "4.00% (RET) or 1.00% (RET-MCMV)")
        .recommend(
            "Check eligibility for the special taxation regime, which unifies the \
             federal taxes at 4% (1% for the lowest social-housing band). Use a \
             dedicated SPE per development to qualify.",
        ),
    );
}

fn administrative_expenses(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let admin = ctx.value(AssumptionKey::Administrative);
    let management = ctx.value(AssumptionKey::ManagementFee);
    if admin.is_none() && management.is_none() {
        return;
    }
    let total = admin.unwrap_or_default() + management.unwrap_or_default();
    if total <= dec!(6) {
        return;
    }
    let current = format!("{} of VGV", fmt_pct(total, 1));
    out.push(
        Finding::new(
            FindingCategory::Expense,
            Severity::Attention,
            "Administrative expenses high",
            format!("Administrative plus management = {current} (benchmark: up to 4%)."),
        )
        .values(current, "up to 4% of VGV")
        .recommend(
            "Trim the SPE's administrative structure, share fixed costs across the \
             developer's projects and consider outsourcing the back office.",
        ),
    );
}

// ---------------------------------------------------------------------------
// Financial and thesis
// ---------------------------------------------------------------------------

fn discount_rate(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let Some(tma) = ctx.value(AssumptionKey::DiscountRate) else {
        return;
    };
    if tma <= dec!(18) || ctx.result.indicators.npv >= Decimal::ZERO {
        return;
    }
    let current = format!("{}% p.a.", tma.round_dp(1));
    out.push(
        Finding::new(
            FindingCategory::Financial,
            Severity::Attention,
            "Discount rate very conservative",
            format!(
                "A discount rate of {current} is conservative. With a negative NPV the \
                 project may still be viable at a rate closer to the market."
            ),
        )
        .values(current, "12-15% p.a.")
        .recommend(
            "Check the rate against the real opportunity cost of the equity. 12-15% p.a. \
             is usual for medium-risk developments.",
        ),
    );
}

fn overall_margin(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let ind = &ctx.result.indicators;
    let margin = ind.margin_on_sales_pct;
    if margin >= dec!(10) {
        return;
    }
    let land = ctx.value(AssumptionKey::LandCostPct).unwrap_or_default();
    let construction = ctx.construction_pct();
    let spend = ratio_pct(
        ctx.result.total_cost + ctx.result.total_expense,
        ctx.result.vgv,
    );
    let margin_text = fmt_pct(margin, 1);

    if construction > ctx.construction_benchmark() && land > dec!(18) {
        out.push(
            Finding::new(
                FindingCategory::Thesis,
                Severity::Critical,
                "Cost to revenue unfavourable",
                format!(
                    "Costs plus expenses are {} of VGV, leaving a margin of only \
                     {margin_text}. Land ({}) and {} ({}) are the two largest offenders.",
                    fmt_pct(spend, 0),
                    fmt_pct(land, 1),
                    ctx.construction_word(),
                    fmt_pct(construction, 1)
                ),
            )
            .values(format!("Margin {margin_text}"), "Minimum margin 15-20%")
            .recommend(format!(
                "The business case needs a structural change:\n\
                 1. Renegotiate the land as a financial or physical swap to bring it from \
                 {} down to at most 15% of VGV.\n\
                 2. Raise the sales value through price per m², more units or a better mix.\n\
                 3. Cut construction cost through value engineering.\n\
                 4. Combine small gains across several assumptions.",
                fmt_pct(land, 0)
            )),
        );
    } else if land > dec!(20) {
        out.push(
            Finding::new(
                FindingCategory::Thesis,
                Severity::Critical,
                "Land undermines viability",
                format!(
                    "Land at {} of VGV is the main offender. With a margin of \
                     {margin_text} the project does not hold up.",
                    fmt_pct(land, 1)
                ),
            )
            .values(format!("Land {} of VGV", fmt_pct(land, 1)), "up to 15% of VGV")
            .recommend(
                "Prioritise renegotiating the land: swap it for finished units or a share \
                 of revenue. That removes most of the upfront outlay and improves IRR and \
                 payback.",
            ),
        );
    } else {
        out.push(
            Finding::new(
                FindingCategory::Thesis,
                Severity::Attention,
                "Tight margin",
                format!(
                    "A margin of {margin_text} is below the recommended minimum (15-20%). \
                     Costs plus expenses = {} of VGV.",
                    fmt_pct(spend, 0)
                ),
            )
            .values(format!("Margin {margin_text}"), "15-20%")
            .recommend(
                "Go through every cost and expense line for small savings, and consider \
                 a higher sales price if the market allows.",
            ),
        );
    }
}

fn payback(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let result = ctx.result;
    let construction = result.delivery_month - result.launch_month;
    let reference = construction + 12;
    let month = result.indicators.payback_month;
    if Decimal::from(month as u64) <= Decimal::from(reference as u64) * dec!(1.5)
        || month >= result.total_months
    {
        return;
    }
    out.push(
        Finding::new(
            FindingCategory::Thesis,
            Severity::Attention,
            "Long payback",
            format!(
                "A payback of {month} months ({} years) is long for the typology. \
                 Ideally the investment is recovered within {reference} months.",
                (Decimal::from(month as u64) / dec!(12)).round_dp(1)
            ),
        )
        .values(format!("{month} months"), format!("up to {reference} months"))
        .recommend(
            "Sell more at launch, raise the down payment in the sales table to bring \
             revenue forward, and consider production financing to ease cash during \
             construction.",
        ),
    );
}

fn peak_exposure(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let exposure = ctx.result.indicators.peak_exposure.abs();
    let pct = ratio_pct(exposure, ctx.result.vgv);

    if pct > dec!(50) {
        out.push(
            Finding::new(
                FindingCategory::Financial,
                Severity::Critical,
                "Peak exposure very high",
                format!(
                    "A peak exposure of {} ({} of VGV) means the developer needs a very \
                     large equity commitment.",
                    fmt_money(exposure),
                    fmt_pct(pct, 0)
                ),
            )
            .values(
                format!("{} ({} of VGV)", fmt_money(exposure), fmt_pct(pct, 0)),
                "up to 35-40% of VGV",
            )
            .recommend(
                "Use production financing (a bank line of 50-80% of construction cost), \
                 swap the land to avoid the upfront outlay and concentrate sales at launch.",
            ),
        );
    } else if pct > dec!(35) {
        out.push(
            Finding::new(
                FindingCategory::Financial,
                Severity::Attention,
                "Cash exposure high",
                format!(
                    "Exposure of {} of VGV. The equity required is significant.",
                    fmt_pct(pct, 0)
                ),
            )
            .values(format!("{} of VGV", fmt_pct(pct, 0)), "up to 30-35% of VGV")
            .recommend(
                "Consider production financing or real-estate receivables certificates \
                 to reduce the equity needed.",
            ),
        );
    }
}

fn strengths(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    let ind = &ctx.result.indicators;

    if ind.margin_on_sales_pct >= dec!(20) {
        let margin = fmt_pct(ind.margin_on_sales_pct, 1);
        out.push(
            Finding::new(
                FindingCategory::Thesis,
                Severity::Positive,
                "Healthy margin",
                format!("A margin of {margin} is above the 20% benchmark."),
            )
            .values(margin, "20%")
            .recommend("Keep the current assumptions. The project has comfortable headroom."),
        );
    }

    if ind.irr_annual_pct >= dec!(20) {
        let irr = format!("{}% p.a.", ind.irr_annual_pct.round_dp(1));
        let tma = ctx
            .value(AssumptionKey::DiscountRate)
            .map(|t| format!("{}% p.a. (discount rate)", t.round_dp(1)))
            .unwrap_or_default();
        out.push(
            Finding::new(
                FindingCategory::Financial,
                Severity::Positive,
                "Attractive IRR",
                format!("An IRR of {irr} is above the discount rate."),
            )
            .values(irr, tma)
            .recommend("The project pays the invested capital well."),
        );
    }

    if let Some(land) = ctx.value(AssumptionKey::LandCostPct) {
        if land <= dec!(12) {
            let current = fmt_pct(land, 1);
            out.push(
                Finding::new(
                    FindingCategory::Cost,
                    Severity::Positive,
                    "Land well priced against VGV",
                    format!("Land at {current} of VGV is below the benchmark."),
                )
                .values(current, "up to 15%")
                .recommend("An excellent land deal. It lifts the margin."),
            );
        }
    }

    if let Some(launch) = ctx.value(AssumptionKey::LaunchSalesPct) {
        if launch >= dec!(40) {
            let current = fmt_pct(launch, 0);
            out.push(
                Finding::new(
                    FindingCategory::Revenue,
                    Severity::Positive,
                    "Strong launch sales",
                    format!("{current} of sales at launch brings revenue forward."),
                )
                .values(current, "30-50%")
                .recommend("Keep the pre-launch strategy. It improves IRR and payback."),
            );
        }
    }
}

fn out_of_range(ctx: &Context<'_>, out: &mut Vec<Finding>) {
    for assumption in ctx.study.assumptions.iter() {
        if !assumption.is_out_of_range() {
            continue;
        }
        let (Some(min), Some(max)) = (assumption.min, assumption.max) else {
            continue;
        };
        let symbol = assumption.unit().symbol();
        out.push(
            Finding::new(
                category_of(assumption.category()),
                Severity::Attention,
                format!("{} outside market range", assumption.name()),
                format!(
                    "{} is {} {symbol}, outside the usual market range.",
                    assumption.name(),
                    assumption.value
                ),
            )
            .values(
                format!("{} {symbol}", assumption.value),
                format!("{min} - {max} {symbol}"),
            )
            .recommend("Confirm the value against local market evidence or bring it inside the range."),
        );
    }
}

fn category_of(category: crate::study::AssumptionCategory) -> FindingCategory {
    use crate::study::AssumptionCategory as C;
    match category {
        C::Revenue => FindingCategory::Revenue,
        C::Cost => FindingCategory::Cost,
        C::Expense => FindingCategory::Expense,
        C::Financial => FindingCategory::Financial,
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::MonthlySeries;
    use crate::study::{Assumption, LandDeal, ProjectInput, Tier, Typology};

    const VGV: Decimal = dec!(100000000);

    fn study(typology: Typology, assumptions: &[(AssumptionKey, Decimal)]) -> Study {
        let input = ProjectInput {
            typology,
            tier: Tier::Mid,
            state: "SC".into(),
            city: "Joinville".into(),
            unit_count: 100,
            land_deal: LandDeal::OutrightPurchase,
            land_area_m2: None,
            target_sales_value: None,
            avg_private_area_m2: None,
        };
        let set = assumptions
            .iter()
            .map(|(key, value)| Assumption::new(*key, *value))
            .collect();
        Study::new(input, set)
    }

    /// 24-month build from month 4, 120-month horizon, nothing posted yet.
    fn result() -> SimulationResult {
        let mut r = SimulationResult::empty(VGV);
        r.lines = MonthlySeries::new(1);
        r.total_months = 120;
        r.launch_month = 4;
        r.delivery_month = 28;
        r.indicators.margin_on_sales_pct = dec!(15);
        r
    }

    fn with_lines(mut r: SimulationResult, lines: &[(CashFlowLine, Percent)]) -> SimulationResult {
        for (line, pct) in lines {
            r.lines.add(*line, 0, VGV * *pct / Decimal::ONE_HUNDRED);
        }
        r
    }

    fn check(rule: Rule, study: &Study, result: &SimulationResult) -> Vec<(Severity, String)> {
        let mut out = Vec::new();
        rule(&Context::new(study, result), &mut out);
        out.into_iter().map(|f| (f.severity, f.title)).collect()
    }

    fn single(severity: Severity, title: &str) -> Vec<(Severity, String)> {
        vec![(severity, title.to_string())]
    }

    #[test]
    fn test_cancellation_tiers_by_typology() {
        let r = result();
        let run = |typology: Typology, rate: Decimal| {
            let s = study(typology, &[(AssumptionKey::CancellationRate, rate)]);
            check(cancellation, &s, &r)
        };
        let vertical = Typology::VerticalDevelopment;
        assert!(run(vertical, dec!(8)).is_empty());
        assert_eq!(
            run(vertical, dec!(8.01)),
            single(Severity::Attention, "Cancellation rate above market")
        );
        assert_eq!(
            run(vertical, dec!(15)),
            single(Severity::Attention, "Cancellation rate above market")
        );
        assert_eq!(
            run(vertical, dec!(15.01)),
            single(Severity::Critical, "Cancellation rate far too high")
        );
        assert!(run(Typology::LandSubdivision, dec!(12)).is_empty());
        assert_eq!(
            run(Typology::LandSubdivision, dec!(18.01)),
            single(Severity::Critical, "Cancellation rate far too high")
        );
    }

    #[test]
    fn test_bad_debt_tiers_by_typology() {
        let r = result();
        let run = |typology: Typology, rate: Decimal| {
            let s = study(typology, &[(AssumptionKey::BadDebtRate, rate)]);
            check(bad_debt, &s, &r)
        };
        assert!(run(Typology::VerticalDevelopment, dec!(5)).is_empty());
        assert_eq!(
            run(Typology::VerticalDevelopment, dec!(10.01)),
            single(Severity::Critical, "Bad debt far too high")
        );
        assert_eq!(
            run(Typology::LandSubdivision, dec!(15.01)),
            single(Severity::Attention, "Bad debt above market")
        );
        assert!(run(Typology::LandSubdivision, dec!(15)).is_empty());
    }

    #[test]
    fn test_launch_share_boundary() {
        let r = result();
        let run = |launch: Decimal| {
            let s = study(Typology::VerticalDevelopment, &[(AssumptionKey::LaunchSalesPct, launch)]);
            check(launch_concentration, &s, &r)
        };
        assert!(run(dec!(25)).is_empty());
        assert_eq!(run(dec!(24.9)), single(Severity::Attention, "Few sales at launch"));
    }

    #[test]
    fn test_land_cost_boundaries() {
        let r = result();
        let run = |land: Decimal| {
            let s = study(Typology::VerticalDevelopment, &[(AssumptionKey::LandCostPct, land)]);
            check(land_cost, &s, &r)
        };
        assert!(run(dec!(18)).is_empty());
        assert_eq!(run(dec!(18.01)), single(Severity::Attention, "Land cost high"));
        assert_eq!(run(dec!(22)), single(Severity::Attention, "Land cost high"));
        assert_eq!(run(dec!(22.01)), single(Severity::Critical, "Land cost excessive"));
    }

    #[test]
    fn test_construction_cost_tiers() {
        let vertical = study(Typology::VerticalDevelopment, &[]);
        let run = |s: &Study, pct: Decimal| {
            let r = with_lines(result(), &[(CashFlowLine::ConstructionRaw, pct)]);
            check(construction_cost, s, &r)
        };
        assert!(run(&vertical, dec!(40)).is_empty());
        assert_eq!(
            run(&vertical, dec!(40.01)),
            single(Severity::Attention, "Construction cost above market")
        );
        assert_eq!(
            run(&vertical, dec!(52)),
            single(Severity::Attention, "Construction cost above market")
        );
        assert_eq!(
            run(&vertical, dec!(52.01)),
            single(Severity::Critical, "Construction cost far too high")
        );

        let land = study(Typology::LandSubdivision, &[]);
        assert!(run(&land, dec!(35)).is_empty());
        assert_eq!(
            run(&land, dec!(36)),
            single(Severity::Attention, "Infrastructure cost above market")
        );
        assert_eq!(
            run(&land, dec!(45.6)),
            single(Severity::Critical, "Infrastructure cost far too high")
        );
    }

    #[test]
    fn test_overhead_markup_boundary() {
        let r = result();
        let run = |bdi: Decimal| {
            let s = study(Typology::VerticalDevelopment, &[(AssumptionKey::OverheadMarkup, bdi)]);
            check(overhead_markup, &s, &r)
        };
        assert!(run(dec!(20)).is_empty());
        assert_eq!(
            run(dec!(20.01)),
            single(Severity::Attention, "Construction overhead (BDI) high")
        );
    }

    #[test]
    fn test_commercial_expense_tiers() {
        let s = study(Typology::VerticalDevelopment, &[]);
        let run = |booth: Decimal| {
            let r = with_lines(
                result(),
                &[
                    (CashFlowLine::Commissions, dec!(5)),
                    (CashFlowLine::SalesBonus, dec!(0.5)),
                    (CashFlowLine::SalesCoordination, dec!(0.5)),
                    (CashFlowLine::Marketing, dec!(3)),
                    (CashFlowLine::SalesBooth, booth),
                ],
            );
            check(commercial_expenses, &s, &r)
        };
        assert!(run(Decimal::ZERO).is_empty());
        assert_eq!(
            run(dec!(0.01)),
            single(Severity::Attention, "Commercial expenses above market")
        );
        assert_eq!(
            run(dec!(3)),
            single(Severity::Attention, "Commercial expenses above market")
        );
        assert_eq!(
            run(dec!(3.01)),
            single(Severity::Critical, "Commercial expenses excessive")
        );
    }

    #[test]
    fn test_tax_regime_boundary() {
        let r = result();
        let run = |tax: Decimal| {
            let s = study(Typology::VerticalDevelopment, &[(AssumptionKey::TaxRate, tax)]);
            check(tax_regime, &s, &r)
        };
        assert!(run(dec!(5.99)).is_empty());
        assert_eq!(run(dec!(6)), single(Severity::Attention, "Tax burden high"));
    }

    #[test]
    fn test_administrative_plus_management() {
        let r = result();
        let run = |admin: Decimal, management: Decimal| {
            let s = study(
                Typology::VerticalDevelopment,
                &[
                    (AssumptionKey::Administrative, admin),
                    (AssumptionKey::ManagementFee, management),
                ],
            );
            check(administrative_expenses, &s, &r)
        };
        assert!(run(dec!(4), dec!(2)).is_empty());
        assert_eq!(
            run(dec!(4), dec!(2.01)),
            single(Severity::Attention, "Administrative expenses high")
        );
    }

    #[test]
    fn test_discount_rate_needs_negative_npv() {
        let run = |tma: Decimal, npv: Decimal| {
            let mut r = result();
            r.indicators.npv = npv;
            let s = study(Typology::VerticalDevelopment, &[(AssumptionKey::DiscountRate, tma)]);
            check(discount_rate, &s, &r)
        };
        assert!(run(dec!(18), dec!(-1)).is_empty());
        assert!(run(dec!(18.5), Decimal::ZERO).is_empty());
        assert_eq!(
            run(dec!(18.5), dec!(-1)),
            single(Severity::Attention, "Discount rate very conservative")
        );
    }

    #[test]
    fn test_thin_margin_diagnosis() {
        let run = |margin: Decimal, land: Decimal, construction: Decimal| {
            let mut r = with_lines(result(), &[(CashFlowLine::ConstructionRaw, construction)]);
            r.indicators.margin_on_sales_pct = margin;
            let s = study(Typology::VerticalDevelopment, &[(AssumptionKey::LandCostPct, land)]);
            check(overall_margin, &s, &r)
        };
        assert!(run(dec!(10), dec!(25), dec!(45)).is_empty());
        // Land and construction both over their benchmarks
        assert_eq!(
            run(dec!(9.99), dec!(18.01), dec!(40.01)),
            single(Severity::Critical, "Cost to revenue unfavourable")
        );
        assert_eq!(
            run(dec!(9.99), dec!(18), dec!(41)),
            single(Severity::Attention, "Tight margin")
        );
        assert_eq!(
            run(dec!(5), dec!(20.01), dec!(30)),
            single(Severity::Critical, "Land undermines viability")
        );
        assert_eq!(
            run(dec!(5), dec!(20), dec!(30)),
            single(Severity::Attention, "Tight margin")
        );
    }

    #[test]
    fn test_payback_against_construction_period() {
        let s = study(Typology::VerticalDevelopment, &[]);
        let run = |month: usize| {
            let mut r = result();
            r.indicators.payback_month = month;
            check(payback, &s, &r)
        };
        // 24 months of construction plus a year, with 50% slack
        assert!(run(54).is_empty());
        assert_eq!(run(55), single(Severity::Attention, "Long payback"));
        assert_eq!(run(119), single(Severity::Attention, "Long payback"));
        // Never paid back within the horizon
        assert!(run(120).is_empty());
    }

    #[test]
    fn test_peak_exposure_tiers() {
        let s = study(Typology::VerticalDevelopment, &[]);
        let run = |pct: Decimal| {
            let mut r = result();
            r.indicators.peak_exposure = -(VGV * pct / Decimal::ONE_HUNDRED);
            check(peak_exposure, &s, &r)
        };
        assert!(run(dec!(35)).is_empty());
        assert_eq!(run(dec!(35.01)), single(Severity::Attention, "Cash exposure high"));
        assert_eq!(run(dec!(50)), single(Severity::Attention, "Cash exposure high"));
        assert_eq!(run(dec!(50.01)), single(Severity::Critical, "Peak exposure very high"));
    }

    #[test]
    fn test_strength_thresholds() {
        let mut r = result();
        r.indicators.margin_on_sales_pct = dec!(20);
        r.indicators.irr_annual_pct = dec!(19.99);
        let s = study(
            Typology::VerticalDevelopment,
            &[
                (AssumptionKey::LandCostPct, dec!(12)),
                (AssumptionKey::LaunchSalesPct, dec!(39)),
            ],
        );
        let titles: Vec<String> = check(strengths, &s, &r).into_iter().map(|(_, t)| t).collect();
        assert_eq!(titles, ["Healthy margin", "Land well priced against VGV"]);
    }
}
