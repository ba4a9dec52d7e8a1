use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::benchmarks::{self as bench, Band, TaxRegime};
use crate::study::{
    AmortizationSystem, Assumption, AssumptionKey, AssumptionSet, CorrectionIndex,
    DeliveryFinancedPlan, InstallmentPlan, ProjectInput, SalesConditions, Study,
};
use crate::ViabilityResult;

const MARKET_SURVEY: &str = "Market surveys 2024/2025";
const USER_INPUT: &str = "User input";

/// Down-payment installments offered on subdivision lot sales.
const LOT_DOWN_PAYMENT_INSTALLMENTS: u32 = 3;

fn banded(key: AssumptionKey, band: Band, source: &str) -> Assumption {
    Assumption::new(key, band.mid)
        .with_range(band.min, band.max)
        .with_source(source)
}

/// Build a complete study for `input` from market reference tables.
///
/// User overrides on the input (target sales value, private area) replace
/// the table-derived values and are locked against editing.
pub fn suggest_study(input: &ProjectInput) -> ViabilityResult<Study> {
    input.validate()?;

    let region = input.region().index();
    let tier = input.tier.index();
    let typology = input.typology.index();
    let land = input.typology.is_land_subdivision();
    let units = Decimal::from(input.unit_count);

    let mut set = AssumptionSet::new();

    // Revenue
    let area_band = bench::PRIVATE_AREA[typology][tier];
    let area = match input.avg_private_area_m2 {
        Some(area) => {
            set.upsert(
                Assumption::new(AssumptionKey::PrivateAreaPerUnit, area)
                    .with_source(USER_INPUT)
                    .locked(),
            );
            area
        }
        None => {
            set.upsert(banded(
                AssumptionKey::PrivateAreaPerUnit,
                area_band,
                "Recent launches by typology and tier",
            ));
            area_band.mid
        }
    };

    let price = if land {
        bench::LOT_PRICE_PER_SQM[region][tier]
    } else {
        bench::SALES_PRICE_PER_SQM[region][tier]
    };
    set.upsert(
        banded(AssumptionKey::SalesPricePerSqm, price, "FipeZap, DataZap, regional surveys")
            .with_description(if land {
                "Average sales price per m² of lot"
            } else {
                "Average sales price per m² of private area"
            }),
    );

    let vgv_min = price.min * area * units;
    let vgv_max = price.max * area * units;
    let vgv = match input.target_sales_value {
        Some(vgv) => {
            set.upsert(
                Assumption::new(AssumptionKey::TargetSalesValue, vgv)
                    .with_range(vgv_min, vgv_max)
                    .with_source(USER_INPUT)
                    .locked(),
            );
            vgv
        }
        None => {
            let vgv = price.mid * area * units;
            set.upsert(
                Assumption::new(AssumptionKey::TargetSalesValue, vgv)
                    .with_range(vgv_min, vgv_max)
                    .with_source("Price per m² x area x units"),
            );
            vgv
        }
    };
    set.upsert(
        Assumption::new(AssumptionKey::AverageTicket, vgv / units)
            .with_range(vgv_min / units, vgv_max / units)
            .with_source("VGV / units"),
    );

    set.upsert(banded(
        AssumptionKey::SalesVelocity,
        bench::SALES_VELOCITY[typology][tier],
        "SECOVI, Abrainc, CBIC 2024",
    ));
    set.upsert(banded(
        AssumptionKey::BadDebtRate,
        bench::BAD_DEBT[typology][tier],
        "Abrainc, SECOVI 2024",
    ));
    set.upsert(banded(
        AssumptionKey::CancellationRate,
        bench::CANCELLATION[tier],
        "Abrainc, SECOVI 2024",
    ));
    let [launch, construction, post] = bench::SALES_PHASES[typology];
    for (key, value) in [
        (AssumptionKey::LaunchSalesPct, launch),
        (AssumptionKey::ConstructionSalesPct, construction),
        (AssumptionKey::PostDeliverySalesPct, post),
    ] {
        set.upsert(Assumption::new(key, value).with_source("Moderate sales scenario"));
    }

    // Cost
    if land {
        set.upsert(banded(
            AssumptionKey::InfrastructureCostPerSqm,
            bench::INFRASTRUCTURE_COST_PER_SQM[tier],
            "AELO, SECOVI",
        ));
    } else {
        set.upsert(banded(
            AssumptionKey::ConstructionCostPerSqm,
            bench::CONSTRUCTION_COST_PER_SQM[region][tier],
            "Regional CUB 2024/2025",
        ));
    }
    set.upsert(banded(
        AssumptionKey::LandCostPct,
        bench::LAND_COST_PCT[input.land_deal.index()][tier],
        "Market practice by land deal",
    ));
    set.upsert(banded(
        AssumptionKey::ConstructionPeriod,
        bench::CONSTRUCTION_PERIOD[typology][tier],
        "CBIC",
    ));
    set.upsert(banded(
        AssumptionKey::RegistrationPeriod,
        bench::REGISTRATION_PERIOD[typology],
        MARKET_SURVEY,
    ));
    set.upsert(banded(AssumptionKey::OverheadMarkup, bench::OVERHEAD_MARKUP[tier], MARKET_SURVEY));
    set.upsert(banded(AssumptionKey::DesignCost, bench::DESIGN_COST[typology][tier], MARKET_SURVEY));
    set.upsert(banded(
        AssumptionKey::ApprovalCost,
        bench::APPROVAL_COST[typology][tier],
        MARKET_SURVEY,
    ));
    set.upsert(banded(AssumptionKey::LandPropertyTax, bench::LAND_PROPERTY_TAX, MARKET_SURVEY));

    // Expense
    for (key, band) in [
        (AssumptionKey::BrokerCommission, bench::BROKER_COMMISSION[tier]),
        (AssumptionKey::SalesBonus, bench::SALES_BONUS[tier]),
        (AssumptionKey::Marketing, bench::MARKETING[tier]),
        (AssumptionKey::SalesBooth, bench::SALES_BOOTH[tier]),
        (AssumptionKey::SalesCoordination, bench::SALES_COORDINATION[tier]),
    ] {
        set.upsert(banded(key, band, "SECOVI, market practice"));
    }
    for (key, band) in [
        (AssumptionKey::Administrative, bench::ADMINISTRATIVE[tier]),
        (AssumptionKey::ManagementFee, bench::MANAGEMENT_FEE[tier]),
        (AssumptionKey::Insurance, bench::INSURANCE[tier]),
        (AssumptionKey::PreOperating, bench::PRE_OPERATING[tier]),
    ] {
        set.upsert(banded(key, band, MARKET_SURVEY));
    }

    let regime = TaxRegime::for_tier(input.tier);
    let (tax_min, tax_max) = bench::TAX_RATE_RANGE;
    set.upsert(
        Assumption::new(AssumptionKey::TaxRate, regime.rate())
            .with_range(tax_min, tax_max)
            .with_source("Federal tax legislation")
            .with_description(regime.description()),
    );

    for (key, band) in [
        (AssumptionKey::RegistrationFees, bench::REGISTRY_FEES),
        (AssumptionKey::DeedsAndRegistry, bench::DEEDS),
        (AssumptionKey::LandTransferTax, bench::LAND_TRANSFER_TAX),
    ] {
        set.upsert(banded(key, band, "Regional notary fee schedules"));
    }

    // Financial
    for (key, band) in [
        (AssumptionKey::DiscountRate, bench::DISCOUNT_RATE),
        (AssumptionKey::Incc, bench::INCC),
        (AssumptionKey::Ipca, bench::IPCA),
        (AssumptionKey::Igpm, bench::IGPM),
        (AssumptionKey::ProductionLoanRate, bench::PRODUCTION_LOAN_RATE),
        (AssumptionKey::ProductionLoanGrace, bench::PRODUCTION_LOAN_GRACE),
        (AssumptionKey::ProductionLoanTerm, bench::PRODUCTION_LOAN_TERM),
        (AssumptionKey::ProductionLoanCoverage, bench::PRODUCTION_LOAN_COVERAGE),
    ] {
        set.upsert(banded(key, band, "Brazilian financial market 2024/2025"));
    }

    debug!(
        typology = ?input.typology,
        tier = ?input.tier,
        assumptions = set.len(),
        %vgv,
        "study suggested"
    );

    let mut study = Study::new(input.clone(), set);
    study.sales_conditions = Some(suggested_sales_table(input));
    Ok(study)
}

/// Typical sales table for the input's typology and tier.
pub fn suggested_sales_table(input: &ProjectInput) -> SalesConditions {
    let row = bench::SALES_TABLE[input.typology.index()][input.tier.index()];
    if input.typology.is_land_subdivision() {
        SalesConditions::Installment(InstallmentPlan {
            down_payment_pct: row.down_payment,
            down_payment_installments: LOT_DOWN_PAYMENT_INSTALLMENTS,
            amortized_balance_pct: row.construction_installments + row.financing,
            intermediate_pct: row.reinforcements,
            installment_count: row.installments,
            amortization_system: AmortizationSystem::Price,
            monthly_rate_pct: dec!(0.8),
            correction_index: CorrectionIndex::Ipca,
        })
    } else {
        SalesConditions::DeliveryFinanced(DeliveryFinancedPlan {
            down_payment_pct: row.down_payment,
            construction_installments_pct: row.construction_installments,
            delivery_financing_pct: row.financing,
            reinforcement_pct: row.reinforcements,
            installment_count: row.installments,
            pre_delivery_index: CorrectionIndex::Incc,
            post_delivery_index: CorrectionIndex::Igpm,
        })
    }
}
