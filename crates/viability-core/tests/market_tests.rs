use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use viability_core::market::{suggest_study, suggested_sales_table};
use viability_core::projection::simulate;
use viability_core::study::{
    AssumptionKey, LandDeal, ProjectInput, SalesConditions, Tier, Typology,
};

fn input(typology: Typology, tier: Tier, state: &str) -> ProjectInput {
    ProjectInput {
        typology,
        tier,
        state: state.into(),
        city: "Test".into(),
        unit_count: 60,
        land_deal: LandDeal::OutrightPurchase,
        land_area_m2: None,
        target_sales_value: None,
        avg_private_area_m2: None,
    }
}

// ===========================================================================
// Suggested studies
// ===========================================================================

#[test]
fn test_every_suggestion_simulates() {
    for typology in Typology::ALL {
        for tier in Tier::ALL {
            let study = suggest_study(&input(typology, tier, "MG")).unwrap();
            let out = simulate(&study).unwrap();
            assert!(out.result.vgv > Decimal::ZERO, "{typology:?}/{tier:?}");
            assert!(out.result.total_months >= 36);
        }
    }
}

#[test]
fn test_unknown_state_priced_as_southeast() {
    let sp = suggest_study(&input(Typology::VerticalDevelopment, Tier::High, "SP")).unwrap();
    let unknown =
        suggest_study(&input(Typology::VerticalDevelopment, Tier::High, "ZZ")).unwrap();
    assert_eq!(
        sp.assumptions.value(AssumptionKey::TargetSalesValue),
        unknown.assumptions.value(AssumptionKey::TargetSalesValue)
    );
}

#[test]
fn test_target_override_drives_vgv() {
    let mut project = input(Typology::HorizontalDevelopment, Tier::Standard, "BA");
    project.target_sales_value = Some(dec!(25000000));
    let study = suggest_study(&project).unwrap();

    let vgv = study.assumptions.get(AssumptionKey::TargetSalesValue).unwrap();
    assert_eq!(vgv.value, dec!(25000000));
    assert!(!vgv.editable);
    assert_eq!(simulate(&study).unwrap().result.vgv, dec!(25000000));
}

#[test]
fn test_suggested_tables_are_complete() {
    for typology in Typology::ALL {
        for tier in Tier::ALL {
            let table = suggested_sales_table(&input(typology, tier, "PE"));
            assert_eq!(table.total_pct(), dec!(100), "{typology:?}/{tier:?}");
            assert!(table.suits(typology));
        }
    }
}

#[test]
fn test_land_subdivision_financed_directly() {
    let table = suggested_sales_table(&input(Typology::LandSubdivision, Tier::Economy, "PA"));
    match table {
        SalesConditions::Installment(plan) => {
            assert!(plan.installment_count > 0);
            assert!(plan.down_payment_pct < dec!(50));
        }
        other => panic!("expected an installment plan, got {other:?}"),
    }
}
