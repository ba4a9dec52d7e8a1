use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use viability_core::appraise;
use viability_core::diagnostics::{diagnose, FindingCategory, Severity};
use viability_core::market::suggest_study;
use viability_core::projection::simulate;
use viability_core::study::{
    Assumption, AssumptionKey, LandDeal, ProjectInput, Study, Tier, Typology,
};

// ===========================================================================
// Fixtures
// ===========================================================================

fn suggested(typology: Typology) -> Study {
    suggest_study(&ProjectInput {
        typology,
        tier: Tier::UpperMid,
        state: "RS".into(),
        city: "Porto Alegre".into(),
        unit_count: 90,
        land_deal: LandDeal::OutrightPurchase,
        land_area_m2: None,
        target_sales_value: None,
        avg_private_area_m2: None,
    })
    .unwrap()
}

// ===========================================================================
// Ordering and coverage
// ===========================================================================

#[test]
fn test_severities_never_decrease() {
    for typology in Typology::ALL {
        let mut study = suggested(typology);
        study
            .assumptions
            .set_value(AssumptionKey::CancellationRate, dec!(18));
        study
            .assumptions
            .set_value(AssumptionKey::LandCostPct, dec!(8));
        let sim = simulate(&study).unwrap().result;
        let findings = diagnose(&study, &sim);
        assert!(!findings.is_empty());
        assert!(
            findings.windows(2).all(|w| w[0].severity <= w[1].severity),
            "{typology:?} out of order"
        );
    }
}

#[test]
fn test_stressed_study_raises_critical_findings() {
    let mut study = suggested(Typology::VerticalDevelopment);
    study
        .assumptions
        .set_value(AssumptionKey::CancellationRate, dec!(22));
    study
        .assumptions
        .set_value(AssumptionKey::SalesVelocity, dec!(1));
    study
        .assumptions
        .set_value(AssumptionKey::LandCostPct, dec!(30));

    let sim = simulate(&study).unwrap().result;
    let findings = diagnose(&study, &sim);
    let critical: Vec<&str> = findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .map(|f| f.title.as_str())
        .collect();

    assert!(critical.contains(&"Cancellation rate far too high"));
    assert!(critical.contains(&"Sales velocity too low"));
    assert!(critical.contains(&"Land cost excessive"));
    assert_eq!(findings[0].severity, Severity::Critical);
}

#[test]
fn test_land_and_construction_together_sink_the_margin() {
    let mut study = suggested(Typology::VerticalDevelopment);
    study
        .assumptions
        .set_value(AssumptionKey::LandCostPct, dec!(25));
    study
        .assumptions
        .set_value(AssumptionKey::ConstructionCostPerSqm, dec!(40000));

    let sim = simulate(&study).unwrap().result;
    assert!(sim.indicators.margin_on_sales_pct < dec!(10));
    let findings = diagnose(&study, &sim);
    let thesis: Vec<&str> = findings
        .iter()
        .filter(|f| f.category == FindingCategory::Thesis && f.severity != Severity::Positive)
        .map(|f| f.title.as_str())
        .collect();

    // The combined diagnosis takes precedence over the land-only one
    assert!(thesis.contains(&"Cost to revenue unfavourable"));
    assert!(!thesis.contains(&"Land undermines viability"));
    assert!(!thesis.contains(&"Tight margin"));
}

#[test]
fn test_every_finding_is_explained() {
    let study = suggested(Typology::HorizontalDevelopment);
    let sim = simulate(&study).unwrap().result;
    for f in diagnose(&study, &sim) {
        assert!(!f.title.is_empty());
        assert!(!f.explanation.is_empty(), "{} has no explanation", f.title);
    }
}

#[test]
fn test_user_value_outside_market_range_reported() {
    let mut study = suggested(Typology::VerticalDevelopment);
    let commission = study
        .assumptions
        .get(AssumptionKey::BrokerCommission)
        .cloned()
        .unwrap();
    let above = commission.max.unwrap() + dec!(1);
    study.assumptions.set_value(AssumptionKey::BrokerCommission, above);

    let sim = simulate(&study).unwrap().result;
    let findings = diagnose(&study, &sim);
    let f = findings
        .iter()
        .find(|f| f.title == format!("{} outside market range", commission.name()))
        .unwrap();
    assert_eq!(f.severity, Severity::Attention);
    assert_eq!(f.category, FindingCategory::Expense);
}

// ===========================================================================
// Pipeline
// ===========================================================================

#[test]
fn test_zero_vgv_has_no_findings() {
    let mut study = suggested(Typology::MixedUse);
    study.assumptions.upsert(Assumption::new(
        AssumptionKey::TargetSalesValue,
        Decimal::ZERO,
    ));
    let report = appraise(&study).unwrap().result;
    assert_eq!(report.simulation.vgv, Decimal::ZERO);
    assert!(report.findings.is_empty());
}

#[test]
fn test_appraise_matches_separate_steps() {
    let study = suggested(Typology::FractionalOwnership);
    let simulated = simulate(&study).unwrap();
    let findings = diagnose(&study, &simulated.result);

    let report = appraise(&study).unwrap();
    assert_eq!(report.result.simulation, simulated.result);
    assert_eq!(report.result.findings, findings);
    assert_eq!(report.warnings, simulated.warnings);
}
