use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use viability_core::market::suggest_study;
use viability_core::projection::{
    cash_flow_rows, simulate, CashFlowLine, LineGroup, SimulationResult,
};
use viability_core::study::{
    AmortizationSystem, Assumption, AssumptionKey, CorrectionIndex, InstallmentPlan, LandDeal,
    ProjectInput, SalesConditions, Study, Tier, Typology,
};
use viability_core::time_value::{npv, solve_irr};
use viability_core::ViabilityError;

// ===========================================================================
// Fixtures
// ===========================================================================

fn vertical_input() -> ProjectInput {
    ProjectInput {
        typology: Typology::VerticalDevelopment,
        tier: Tier::Mid,
        state: "SP".into(),
        city: "Campinas".into(),
        unit_count: 120,
        land_deal: LandDeal::OutrightPurchase,
        land_area_m2: None,
        target_sales_value: None,
        avg_private_area_m2: None,
    }
}

fn land_input() -> ProjectInput {
    ProjectInput {
        typology: Typology::LandSubdivision,
        tier: Tier::Standard,
        state: "GO".into(),
        city: "Anápolis".into(),
        unit_count: 200,
        land_deal: LandDeal::OutrightPurchase,
        land_area_m2: Some(dec!(90000)),
        target_sales_value: None,
        avg_private_area_m2: None,
    }
}

fn run(study: &Study) -> SimulationResult {
    simulate(study).unwrap().result
}

fn close(a: Decimal, b: Decimal) -> bool {
    let scale = a.abs().max(b.abs()).max(Decimal::ONE);
    (a - b).abs() / scale < dec!(0.000001)
}

// ===========================================================================
// Ledger consistency
// ===========================================================================

#[test]
fn test_every_line_sums_to_its_total() {
    let study = suggest_study(&vertical_input()).unwrap();
    let r = run(&study);

    for line in CashFlowLine::ALL {
        let monthly: Decimal = r.lines.line(line).iter().copied().sum();
        let total = r.line_totals[&line];
        assert!(close(monthly, total), "{line:?}: {monthly} vs {total}");
    }

    assert!(close(r.lines.group_total(LineGroup::Revenue), r.gross_revenue));
    assert!(close(r.gross_revenue - r.bad_debt, r.net_revenue));
    assert!(close(r.lines.group_total(LineGroup::Cost), r.total_cost));
    assert!(close(r.lines.group_total(LineGroup::Expense), r.total_expense));
}

#[test]
fn test_cumulative_ends_at_total_flow_and_result() {
    let study = suggest_study(&vertical_input()).unwrap();
    let r = run(&study);

    let flow_total: Decimal = r.net_flow.iter().copied().sum();
    let last = *r.cumulative_flow.last().unwrap();
    assert!(close(last, flow_total));
    assert!(close(last, r.indicators.result));
    assert_eq!(r.net_flow.len(), r.total_months);
    assert_eq!(r.units_sold.len(), r.total_months);
}

#[test]
fn test_simulation_is_deterministic() {
    let study = suggest_study(&vertical_input()).unwrap();
    let first = run(&study);
    let second = run(&study);
    assert_eq!(first, second);
}

#[test]
fn test_assumptions_echoed_in_envelope() {
    let study = suggest_study(&vertical_input()).unwrap();
    let out = simulate(&study).unwrap();
    assert_eq!(out.methodology, "Monthly development cash-flow projection");
    assert_eq!(out.assumptions["input"]["city"], "Campinas");
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_delivery_financing_only_in_delivery_month() {
    let study = suggest_study(&vertical_input()).unwrap();
    let r = run(&study);
    let financing = r.lines.line(CashFlowLine::DeliveryFinancing);

    assert!(financing[r.delivery_month] > Decimal::ZERO);
    for (month, amount) in financing.iter().enumerate() {
        if month != r.delivery_month {
            assert_eq!(*amount, Decimal::ZERO, "financing booked in month {month}");
        }
    }
    // Post-delivery sales are financed too, so the lump covers more than
    // the contracts signed up to delivery
    let sold_after: Decimal = r.sold_value[r.delivery_month + 1..].iter().copied().sum();
    assert!(sold_after > Decimal::ZERO);
}

// ===========================================================================
// Indicators
// ===========================================================================

#[test]
fn test_irr_of_two_flow_series() {
    let flows = [dec!(-100), dec!(121)];
    let irr = solve_irr(&flows);
    assert!((irr.rate - dec!(0.21)).abs() < dec!(0.0001));
    assert!(npv(irr.rate, &flows).unwrap().abs() < dec!(0.01));
}

#[test]
fn test_npv_falls_as_rate_rises_for_investment_profile() {
    let study = suggest_study(&vertical_input()).unwrap();
    let r = run(&study);
    // Every outlay brought forward to month 0, receipts left where they fall
    let outlay: Decimal = r.net_flow.iter().filter(|f| f.is_sign_negative()).sum();
    let mut flows = vec![outlay];
    flows.extend(r.net_flow.iter().map(|f| (*f).max(Decimal::ZERO)));
    assert!(flows[1..].iter().any(|f| *f > Decimal::ZERO));

    let rates = [dec!(0), dec!(0.005), dec!(0.01), dec!(0.02), dec!(0.05)];
    let values: Vec<Decimal> = rates.iter().map(|rate| npv(*rate, &flows).unwrap()).collect();
    assert!(values.windows(2).all(|w| w[0] > w[1]), "{values:?}");
}

#[test]
fn test_npv_rises_with_rate_for_borrowing_profile() {
    // Cash in first, repaid later: discounting shrinks the repayments
    let flows = [dec!(100), dec!(-50), dec!(-60)];
    let rates = [dec!(0), dec!(0.01), dec!(0.05), dec!(0.10), dec!(0.25)];
    let values: Vec<Decimal> = rates.iter().map(|rate| npv(*rate, &flows).unwrap()).collect();
    assert_eq!(values[0], dec!(-10));
    assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
}

#[test]
fn test_payback_is_first_positive_cumulative_month() {
    let study = suggest_study(&vertical_input()).unwrap();
    let r = run(&study);
    let payback = r.indicators.payback_month;

    assert!(r.cumulative_flow[..payback.min(r.total_months)]
        .iter()
        .all(|c| *c <= Decimal::ZERO));
    if payback < r.total_months {
        assert!(r.cumulative_flow[payback] > Decimal::ZERO);
    }
    assert!(r.indicators.peak_exposure <= Decimal::ZERO);
}

#[test]
fn test_loss_making_study_never_pays_back() {
    let mut study = suggest_study(&vertical_input()).unwrap();
    study
        .assumptions
        .set_value(AssumptionKey::ConstructionCostPerSqm, dec!(40000));
    let r = run(&study);
    assert!(r.indicators.result < Decimal::ZERO);
    assert_eq!(r.indicators.payback_month, r.total_months);
}

// ===========================================================================
// Edge cases
// ===========================================================================

#[test]
fn test_zero_vgv_returns_empty_projection() {
    let mut study = suggest_study(&vertical_input()).unwrap();
    study.assumptions.upsert(Assumption::new(
        AssumptionKey::TargetSalesValue,
        Decimal::ZERO,
    ));
    let out = simulate(&study).unwrap();
    assert_eq!(out.result.vgv, Decimal::ZERO);
    assert_eq!(out.result.total_months, 0);
    assert_eq!(out.result.indicators.result, Decimal::ZERO);
    assert!(!out.warnings.is_empty());
}

#[test]
fn test_land_subdivision_paid_in_full_on_signing() {
    let mut study = suggest_study(&land_input()).unwrap();
    study
        .assumptions
        .set_value(AssumptionKey::CancellationRate, Decimal::ZERO);
    study
        .assumptions
        .set_value(AssumptionKey::BadDebtRate, Decimal::ZERO);
    study.sales_conditions = Some(SalesConditions::Installment(InstallmentPlan {
        down_payment_pct: dec!(100),
        down_payment_installments: 1,
        amortized_balance_pct: Decimal::ZERO,
        intermediate_pct: Decimal::ZERO,
        installment_count: 0,
        amortization_system: AmortizationSystem::Price,
        monthly_rate_pct: Decimal::ZERO,
        correction_index: CorrectionIndex::Ipca,
    }));

    let r = run(&study);
    assert!(close(r.line_totals[&CashFlowLine::DownPayment], r.vgv));
    assert_eq!(r.line_totals[&CashFlowLine::Installments], Decimal::ZERO);
    assert_eq!(r.line_totals[&CashFlowLine::IntermediatePayments], Decimal::ZERO);
    assert_eq!(r.bad_debt, Decimal::ZERO);
    assert!(close(r.gross_revenue, r.vgv));
    assert_eq!(r.revenue_beyond_horizon, Decimal::ZERO);
}

#[test]
fn test_missing_required_assumption_is_named() {
    let mut study = suggest_study(&vertical_input()).unwrap();
    study.assumptions = study
        .assumptions
        .iter()
        .filter(|a| a.key != AssumptionKey::TaxRate)
        .cloned()
        .collect();
    match simulate(&study) {
        Err(ViabilityError::MissingAssumption { name }) => assert_eq!(name, "Tax rate (suggested regime)"),
        other => panic!("expected missing assumption, got {other:?}"),
    }
}

#[test]
fn test_horizon_beyond_limit_rejected() {
    let mut study = suggest_study(&vertical_input()).unwrap();
    study
        .assumptions
        .set_value(AssumptionKey::ConstructionPeriod, dec!(300));
    assert!(matches!(
        simulate(&study),
        Err(ViabilityError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Cash-flow report
// ===========================================================================

#[test]
fn test_cash_flow_rows_labelled_from_start_date() {
    let mut study = suggest_study(&vertical_input()).unwrap();
    study.start_date = NaiveDate::from_ymd_opt(2025, 11, 1);
    let r = run(&study);
    let rows = cash_flow_rows(&study, &r);

    assert_eq!(rows.len(), r.total_months);
    assert_eq!(rows[0].label.as_deref(), Some("2025-11"));
    assert_eq!(rows[2].label.as_deref(), Some("2026-01"));
    assert_eq!(rows[5].net_flow, r.net_flow[5]);
    assert_eq!(rows.last().unwrap().cumulative_flow, *r.cumulative_flow.last().unwrap());
}

#[test]
fn test_cash_flow_rows_unlabelled_without_start_date() {
    let study = suggest_study(&vertical_input()).unwrap();
    let r = run(&study);
    assert!(cash_flow_rows(&study, &r).iter().all(|row| row.label.is_none()));
}
