use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ViabilityError;
use crate::study::{AssumptionKey, AssumptionSet, SalesConditions, Study, Typology};
use crate::types::{pct_to_rate, Money, Rate};
use crate::ViabilityResult;

/// Longest timeline the projector accepts for registration plus construction.
pub const MAX_HORIZON_MONTHS: usize = 300;

/// Land area assumed per lot when a subdivision gives no land area.
const DEFAULT_LAND_AREA_PER_LOT: Decimal = dec!(200);

/// Every assumption the projector reads, resolved once into rates, months
/// and money. Building this record is where a missing assumption fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub typology: Typology,
    pub unit_count: Decimal,
    pub vgv: Money,
    pub registration_months: usize,
    pub construction_months: usize,
    pub launch_share: Rate,
    pub construction_share: Rate,
    pub post_delivery_share: Rate,
    pub cancellation_rate: Rate,
    pub bad_debt_rate: Rate,
    /// Raw construction (or infrastructure) cost before overhead
    pub construction_base: Money,
    pub land_cost_rate: Rate,
    pub overhead_rate: Rate,
    pub design_rate: Rate,
    pub approvals_rate: Rate,
    /// Annual, on land value
    pub property_tax_rate: Rate,
    /// On land value
    pub transfer_tax_rate: Rate,
    pub commission_rate: Rate,
    pub bonus_rate: Rate,
    pub marketing_rate: Rate,
    pub booth_rate: Rate,
    pub coordination_rate: Rate,
    pub administrative_rate: Rate,
    pub management_fee_rate: Rate,
    pub insurance_rate: Rate,
    pub pre_operating_rate: Rate,
    pub tax_rate: Rate,
    pub registry_rate: Rate,
    pub deeds_rate: Rate,
    /// Annual discount rate (TMA)
    pub discount_rate: Rate,
    pub sales_table: SalesConditions,
}

/// Resolve the target sales value alone: assumption first, then the input
/// override. Used to short-circuit before the remaining assumptions are read.
pub fn resolve_vgv(study: &Study) -> ViabilityResult<Money> {
    study
        .assumptions
        .value(AssumptionKey::TargetSalesValue)
        .or(study.input.target_sales_value)
        .ok_or_else(|| ViabilityError::MissingAssumption {
            name: AssumptionKey::TargetSalesValue.label().to_string(),
        })
}

impl ProjectionParams {
    pub fn from_study(study: &Study) -> ViabilityResult<Self> {
        study.validate()?;
        let a = &study.assumptions;
        let input = &study.input;
        let typology = input.typology;
        let unit_count = Decimal::from(input.unit_count);
        let rate = |key: AssumptionKey| a.require(key).map(pct_to_rate);

        let registration_months = months(a, AssumptionKey::RegistrationPeriod)?;
        let construction_months = months(a, AssumptionKey::ConstructionPeriod)?;
        if registration_months + construction_months > MAX_HORIZON_MONTHS {
            return Err(ViabilityError::InvalidInput {
                field: "construction_period".into(),
                reason: format!(
                    "Registration plus construction exceeds {MAX_HORIZON_MONTHS} months"
                ),
            });
        }

        let construction_base = if typology.is_land_subdivision() {
            let per_sqm = a.require(AssumptionKey::InfrastructureCostPerSqm)?;
            let land_area = input
                .land_area_m2
                .unwrap_or(unit_count * DEFAULT_LAND_AREA_PER_LOT);
            per_sqm * land_area
        } else {
            let per_sqm = a.require(AssumptionKey::ConstructionCostPerSqm)?;
            let area = match a
                .value(AssumptionKey::PrivateAreaPerUnit)
                .or(input.avg_private_area_m2)
            {
                Some(area) => area,
                None => a.require(AssumptionKey::PrivateAreaPerUnit)?,
            };
            per_sqm * area * unit_count
        };

        Ok(ProjectionParams {
            typology,
            unit_count,
            vgv: resolve_vgv(study)?,
            registration_months,
            construction_months,
            launch_share: rate(AssumptionKey::LaunchSalesPct)?,
            construction_share: rate(AssumptionKey::ConstructionSalesPct)?,
            post_delivery_share: rate(AssumptionKey::PostDeliverySalesPct)?,
            cancellation_rate: rate(AssumptionKey::CancellationRate)?,
            bad_debt_rate: rate(AssumptionKey::BadDebtRate)?,
            construction_base,
            land_cost_rate: rate(AssumptionKey::LandCostPct)?,
            overhead_rate: rate(AssumptionKey::OverheadMarkup)?,
            design_rate: rate(AssumptionKey::DesignCost)?,
            approvals_rate: rate(AssumptionKey::ApprovalCost)?,
            property_tax_rate: rate(AssumptionKey::LandPropertyTax)?,
            transfer_tax_rate: rate(AssumptionKey::LandTransferTax)?,
            commission_rate: rate(AssumptionKey::BrokerCommission)?,
            bonus_rate: rate(AssumptionKey::SalesBonus)?,
            marketing_rate: rate(AssumptionKey::Marketing)?,
            booth_rate: rate(AssumptionKey::SalesBooth)?,
            coordination_rate: rate(AssumptionKey::SalesCoordination)?,
            administrative_rate: rate(AssumptionKey::Administrative)?,
            management_fee_rate: rate(AssumptionKey::ManagementFee)?,
            insurance_rate: rate(AssumptionKey::Insurance)?,
            pre_operating_rate: rate(AssumptionKey::PreOperating)?,
            tax_rate: rate(AssumptionKey::TaxRate)?,
            registry_rate: rate(AssumptionKey::RegistrationFees)?,
            deeds_rate: rate(AssumptionKey::DeedsAndRegistry)?,
            discount_rate: rate(AssumptionKey::DiscountRate)?,
            sales_table: study.sales_table(),
        })
    }

    /// Price of one unit.
    pub fn unit_price(&self) -> Money {
        if self.unit_count.is_zero() {
            Decimal::ZERO
        } else {
            self.vgv / self.unit_count
        }
    }
}

/// Whole months from a period assumption, truncating any fraction.
fn months(assumptions: &AssumptionSet, key: AssumptionKey) -> ViabilityResult<usize> {
    let value = assumptions.require(key)?;
    if value < Decimal::ZERO {
        return Err(ViabilityError::InvalidInput {
            field: key.label().to_string(),
            reason: "Period cannot be negative".into(),
        });
    }
    value
        .trunc()
        .to_usize()
        .ok_or_else(|| ViabilityError::InvalidInput {
            field: key.label().to_string(),
            reason: "Period is out of range".into(),
        })
}
