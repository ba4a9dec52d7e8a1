use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ViabilityError;
use crate::ViabilityResult;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionCategory {
    Revenue,
    Cost,
    Expense,
    Financial,
}

/// Unit an assumption value is expressed in. Percentages are stored as
/// points (5 = 5%) and converted to rates when a projection resolves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionUnit {
    Percent,
    PercentOfSalesValue,
    PercentOfLandValue,
    PercentOfConstructionCost,
    PercentOfStockPerMonth,
    PercentPerYear,
    CurrencyPerSqm,
    Currency,
    SquareMeters,
    Months,
}

impl AssumptionUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            AssumptionUnit::Percent => "%",
            AssumptionUnit::PercentOfSalesValue => "% of VGV",
            AssumptionUnit::PercentOfLandValue => "% of land value",
            AssumptionUnit::PercentOfConstructionCost => "% of construction cost",
            AssumptionUnit::PercentOfStockPerMonth => "% of stock/month",
            AssumptionUnit::PercentPerYear => "% p.a.",
            AssumptionUnit::CurrencyPerSqm => "R$/m²",
            AssumptionUnit::Currency => "R$",
            AssumptionUnit::SquareMeters => "m²",
            AssumptionUnit::Months => "months",
        }
    }
}

/// Closed set of market assumptions a study can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionKey {
    // Revenue
    PrivateAreaPerUnit,
    SalesPricePerSqm,
    TargetSalesValue,
    AverageTicket,
    SalesVelocity,
    BadDebtRate,
    CancellationRate,
    LaunchSalesPct,
    ConstructionSalesPct,
    PostDeliverySalesPct,
    // Cost
    ConstructionCostPerSqm,
    InfrastructureCostPerSqm,
    LandCostPct,
    ConstructionPeriod,
    RegistrationPeriod,
    OverheadMarkup,
    DesignCost,
    ApprovalCost,
    LandPropertyTax,
    // Expense
    BrokerCommission,
    SalesBonus,
    Marketing,
    SalesBooth,
    SalesCoordination,
    Administrative,
    ManagementFee,
    Insurance,
    PreOperating,
    TaxRate,
    RegistrationFees,
    DeedsAndRegistry,
    LandTransferTax,
    // Financial
    DiscountRate,
    Incc,
    Ipca,
    Igpm,
    ProductionLoanRate,
    ProductionLoanGrace,
    ProductionLoanTerm,
    ProductionLoanCoverage,
}

impl AssumptionKey {
    pub const ALL: [AssumptionKey; 40] = [
        AssumptionKey::PrivateAreaPerUnit,
        AssumptionKey::SalesPricePerSqm,
        AssumptionKey::TargetSalesValue,
        AssumptionKey::AverageTicket,
        AssumptionKey::SalesVelocity,
        AssumptionKey::BadDebtRate,
        AssumptionKey::CancellationRate,
        AssumptionKey::LaunchSalesPct,
        AssumptionKey::ConstructionSalesPct,
        AssumptionKey::PostDeliverySalesPct,
        AssumptionKey::ConstructionCostPerSqm,
        AssumptionKey::InfrastructureCostPerSqm,
        AssumptionKey::LandCostPct,
        AssumptionKey::ConstructionPeriod,
        AssumptionKey::RegistrationPeriod,
        AssumptionKey::OverheadMarkup,
        AssumptionKey::DesignCost,
        AssumptionKey::ApprovalCost,
        AssumptionKey::LandPropertyTax,
        AssumptionKey::BrokerCommission,
        AssumptionKey::SalesBonus,
        AssumptionKey::Marketing,
        AssumptionKey::SalesBooth,
        AssumptionKey::SalesCoordination,
        AssumptionKey::Administrative,
        AssumptionKey::ManagementFee,
        AssumptionKey::Insurance,
        AssumptionKey::PreOperating,
        AssumptionKey::TaxRate,
        AssumptionKey::RegistrationFees,
        AssumptionKey::DeedsAndRegistry,
        AssumptionKey::LandTransferTax,
        AssumptionKey::DiscountRate,
        AssumptionKey::Incc,
        AssumptionKey::Ipca,
        AssumptionKey::Igpm,
        AssumptionKey::ProductionLoanRate,
        AssumptionKey::ProductionLoanGrace,
        AssumptionKey::ProductionLoanTerm,
        AssumptionKey::ProductionLoanCoverage,
    ];

    pub fn label(self) -> &'static str {
        use AssumptionKey::*;
        match self {
            PrivateAreaPerUnit => "Average private area per unit",
            SalesPricePerSqm => "Average sales price per m²",
            TargetSalesValue => "Target sales value (VGV)",
            AverageTicket => "Average ticket per unit",
            SalesVelocity => "Sales velocity",
            BadDebtRate => "Bad debt rate",
            CancellationRate => "Cancellation rate",
            LaunchSalesPct => "Sales at launch",
            ConstructionSalesPct => "Sales during construction",
            PostDeliverySalesPct => "Sales after delivery",
            ConstructionCostPerSqm => "Construction cost per m²",
            InfrastructureCostPerSqm => "Infrastructure cost per m²",
            LandCostPct => "Land cost (% of VGV)",
            ConstructionPeriod => "Construction period",
            RegistrationPeriod => "Incorporation registration period",
            OverheadMarkup => "Construction overhead (BDI)",
            DesignCost => "Design and consulting",
            ApprovalCost => "Approvals and permits",
            LandPropertyTax => "Land property tax (IPTU)",
            BrokerCommission => "Broker commission",
            SalesBonus => "Broker bonus",
            Marketing => "Marketing and advertising",
            SalesBooth => "Sales booth",
            SalesCoordination => "Sales coordination",
            Administrative => "Administrative expenses",
            ManagementFee => "Project management fee",
            Insurance => "Insurance",
            PreOperating => "Pre-operating expenses",
            TaxRate => "Tax rate (suggested regime)",
            RegistrationFees => "Incorporation registry fees",
            DeedsAndRegistry => "Deeds and property registry",
            LandTransferTax => "Land transfer tax (ITBI)",
            DiscountRate => "Minimum attractive rate of return (TMA)",
            Incc => "INCC (annual projection)",
            Ipca => "IPCA (annual projection)",
            Igpm => "IGP-M (annual projection)",
            ProductionLoanRate => "Production loan rate",
            ProductionLoanGrace => "Production loan grace period",
            ProductionLoanTerm => "Production loan term",
            ProductionLoanCoverage => "Production loan coverage",
        }
    }

    pub fn category(self) -> AssumptionCategory {
        use AssumptionKey::*;
        match self {
            PrivateAreaPerUnit | SalesPricePerSqm | TargetSalesValue | AverageTicket
            | SalesVelocity | BadDebtRate | CancellationRate | LaunchSalesPct
            | ConstructionSalesPct | PostDeliverySalesPct => AssumptionCategory::Revenue,
            ConstructionCostPerSqm | InfrastructureCostPerSqm | LandCostPct
            | ConstructionPeriod | RegistrationPeriod | OverheadMarkup | DesignCost
            | ApprovalCost | LandPropertyTax => AssumptionCategory::Cost,
            BrokerCommission | SalesBonus | Marketing | SalesBooth | SalesCoordination
            | Administrative | ManagementFee | Insurance | PreOperating | TaxRate
            | RegistrationFees | DeedsAndRegistry | LandTransferTax => AssumptionCategory::Expense,
            DiscountRate | Incc | Ipca | Igpm | ProductionLoanRate | ProductionLoanGrace
            | ProductionLoanTerm | ProductionLoanCoverage => AssumptionCategory::Financial,
        }
    }

    pub fn subcategory(self) -> &'static str {
        use AssumptionKey::*;
        match self {
            PrivateAreaPerUnit => "Sizing",
            SalesPricePerSqm => "Sales price",
            TargetSalesValue | AverageTicket => "Sales value",
            SalesVelocity | BadDebtRate | CancellationRate => "Sales",
            LaunchSalesPct | ConstructionSalesPct | PostDeliverySalesPct => "Sales curve",
            ConstructionCostPerSqm | OverheadMarkup => "Construction",
            InfrastructureCostPerSqm => "Infrastructure",
            LandCostPct | LandPropertyTax => "Land",
            ConstructionPeriod | RegistrationPeriod => "Schedule",
            DesignCost | ApprovalCost => "Design and approvals",
            BrokerCommission | SalesBonus | SalesBooth | SalesCoordination => "Commercial",
            Marketing => "Marketing",
            Administrative | ManagementFee | Insurance | PreOperating => "Administrative",
            TaxRate => "Tax",
            RegistrationFees | DeedsAndRegistry | LandTransferTax => "Notary and registry",
            DiscountRate => "Discount rate",
            Incc | Ipca | Igpm => "Indices",
            ProductionLoanRate | ProductionLoanGrace | ProductionLoanTerm
            | ProductionLoanCoverage => "Production financing",
        }
    }

    pub fn unit(self) -> AssumptionUnit {
        use AssumptionKey::*;
        match self {
            PrivateAreaPerUnit => AssumptionUnit::SquareMeters,
            SalesPricePerSqm | ConstructionCostPerSqm | InfrastructureCostPerSqm => {
                AssumptionUnit::CurrencyPerSqm
            }
            TargetSalesValue | AverageTicket => AssumptionUnit::Currency,
            SalesVelocity => AssumptionUnit::PercentOfStockPerMonth,
            BadDebtRate | CancellationRate | LaunchSalesPct | ConstructionSalesPct
            | PostDeliverySalesPct | TaxRate => AssumptionUnit::Percent,
            ConstructionPeriod | RegistrationPeriod | ProductionLoanGrace
            | ProductionLoanTerm => AssumptionUnit::Months,
            OverheadMarkup | ProductionLoanCoverage => AssumptionUnit::PercentOfConstructionCost,
            LandPropertyTax | LandTransferTax => AssumptionUnit::PercentOfLandValue,
            DiscountRate | Incc | Ipca | Igpm | ProductionLoanRate => {
                AssumptionUnit::PercentPerYear
            }
            LandCostPct | DesignCost | ApprovalCost | BrokerCommission | SalesBonus
            | Marketing | SalesBooth | SalesCoordination | Administrative | ManagementFee
            | Insurance | PreOperating | RegistrationFees | DeedsAndRegistry => {
                AssumptionUnit::PercentOfSalesValue
            }
        }
    }

    /// Value used when the assumption is absent from a study.
    /// `None` marks assumptions that are either required or purely informational.
    pub fn default_value(self) -> Option<Decimal> {
        use AssumptionKey::*;
        match self {
            PrivateAreaPerUnit => Some(dec!(60)),
            LaunchSalesPct => Some(dec!(30)),
            ConstructionSalesPct => Some(dec!(50)),
            PostDeliverySalesPct => Some(dec!(20)),
            BadDebtRate | CancellationRate => Some(dec!(5)),
            ConstructionPeriod => Some(dec!(24)),
            RegistrationPeriod => Some(dec!(6)),
            DiscountRate => Some(dec!(15)),
            OverheadMarkup | DesignCost | ApprovalCost | LandPropertyTax | SalesBonus
            | SalesBooth | SalesCoordination | ManagementFee | Insurance | PreOperating
            | RegistrationFees | DeedsAndRegistry | LandTransferTax => Some(Decimal::ZERO),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Assumption records
// ---------------------------------------------------------------------------

fn editable_by_default() -> bool {
    true
}

/// One market assumption. `[min, max]` is the market range; values outside it
/// are reported by the diagnostic, never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub key: AssumptionKey,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    #[serde(default)]
    pub source: String,
    #[serde(default = "editable_by_default")]
    pub editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Assumption {
    pub fn new(key: AssumptionKey, value: Decimal) -> Self {
        Assumption {
            key,
            value,
            min: None,
            max: None,
            source: String::new(),
            editable: true,
            description: None,
        }
    }

    pub fn with_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn name(&self) -> &'static str {
        self.key.label()
    }

    pub fn unit(&self) -> AssumptionUnit {
        self.key.unit()
    }

    pub fn category(&self) -> AssumptionCategory {
        self.key.category()
    }

    pub fn subcategory(&self) -> &'static str {
        self.key.subcategory()
    }

    /// True when both bounds are known and the value lies outside them.
    pub fn is_out_of_range(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => self.value < min || self.value > max,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Assumption set
// ---------------------------------------------------------------------------

/// Ordered list of assumptions, at most one per key. Deserializing a list
/// with repeated keys keeps the last value in the first key's position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Assumption>", into = "Vec<Assumption>")]
pub struct AssumptionSet(Vec<Assumption>);

impl AssumptionSet {
    pub fn new() -> Self {
        AssumptionSet(Vec::new())
    }

    pub fn get(&self, key: AssumptionKey) -> Option<&Assumption> {
        self.0.iter().find(|a| a.key == key)
    }

    /// Value if present in the set.
    pub fn value(&self, key: AssumptionKey) -> Option<Decimal> {
        self.get(key).map(|a| a.value)
    }

    /// Value if present, otherwise the key's default.
    pub fn value_or_default(&self, key: AssumptionKey) -> Option<Decimal> {
        self.value(key).or_else(|| key.default_value())
    }

    /// Value or default, failing when the key has neither.
    pub fn require(&self, key: AssumptionKey) -> ViabilityResult<Decimal> {
        self.value_or_default(key)
            .ok_or_else(|| ViabilityError::MissingAssumption {
                name: key.label().to_string(),
            })
    }

    /// Update the value of an existing assumption. Returns false if absent.
    pub fn set_value(&mut self, key: AssumptionKey, value: Decimal) -> bool {
        match self.0.iter_mut().find(|a| a.key == key) {
            Some(existing) => {
                existing.value = value;
                true
            }
            None => false,
        }
    }

    /// Insert, replacing any assumption with the same key in place.
    pub fn upsert(&mut self, assumption: Assumption) {
        match self.0.iter_mut().find(|a| a.key == assumption.key) {
            Some(existing) => *existing = assumption,
            None => self.0.push(assumption),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assumption> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Assumption> for AssumptionSet {
    fn from_iter<I: IntoIterator<Item = Assumption>>(iter: I) -> Self {
        let mut set = AssumptionSet::new();
        for assumption in iter {
            set.upsert(assumption);
        }
        set
    }
}

impl From<Vec<Assumption>> for AssumptionSet {
    fn from(list: Vec<Assumption>) -> Self {
        list.into_iter().collect()
    }
}

impl From<AssumptionSet> for Vec<Assumption> {
    fn from(set: AssumptionSet) -> Self {
        set.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_falls_back_to_default() {
        let set = AssumptionSet::new();
        assert_eq!(set.require(AssumptionKey::ConstructionPeriod).unwrap(), dec!(24));
        assert_eq!(set.require(AssumptionKey::DiscountRate).unwrap(), dec!(15));
    }

    #[test]
    fn test_require_names_missing_assumption() {
        let set = AssumptionSet::new();
        let err = set.require(AssumptionKey::TargetSalesValue).unwrap_err();
        match err {
            ViabilityError::MissingAssumption { name } => {
                assert_eq!(name, "Target sales value (VGV)")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut set: AssumptionSet = vec![
            Assumption::new(AssumptionKey::LandCostPct, dec!(14)),
            Assumption::new(AssumptionKey::TaxRate, dec!(4)),
        ]
        .into_iter()
        .collect();
        set.upsert(Assumption::new(AssumptionKey::LandCostPct, dec!(20)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().unwrap().value, dec!(20));
    }

    #[test]
    fn test_set_value_only_touches_existing() {
        let mut set = AssumptionSet::new();
        assert!(!set.set_value(AssumptionKey::Marketing, dec!(3)));
        set.upsert(Assumption::new(AssumptionKey::Marketing, dec!(2)));
        assert!(set.set_value(AssumptionKey::Marketing, dec!(3)));
        assert_eq!(set.value(AssumptionKey::Marketing), Some(dec!(3)));
    }

    #[test]
    fn test_out_of_range_needs_both_bounds() {
        let open = Assumption::new(AssumptionKey::BadDebtRate, dec!(40));
        assert!(!open.is_out_of_range());
        let bounded = open.with_range(dec!(1), dec!(10));
        assert!(bounded.is_out_of_range());
    }

    #[test]
    fn test_deserializes_minimal_record() {
        let json = r#"[{"key": "land_cost_pct", "value": 14}]"#;
        let set: AssumptionSet = serde_json::from_str(json).unwrap();
        let land = set.get(AssumptionKey::LandCostPct).unwrap();
        assert_eq!(land.value, dec!(14));
        assert!(land.editable);
        assert_eq!(land.unit(), AssumptionUnit::PercentOfSalesValue);
    }

    #[test]
    fn test_deserialized_duplicates_collapse_to_last() {
        let json = r#"[
            {"key": "marketing", "value": 2, "min": 1, "max": 4},
            {"key": "tax_rate", "value": 4},
            {"key": "marketing", "value": 9, "min": 1, "max": 4}
        ]"#;
        let set: AssumptionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.value(AssumptionKey::Marketing), Some(dec!(9)));
        assert_eq!(set.iter().next().unwrap().key, AssumptionKey::Marketing);
        let flagged = set.iter().filter(|a| a.is_out_of_range()).count();
        assert_eq!(flagged, 1);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let set: AssumptionSet = vec![Assumption::new(AssumptionKey::TaxRate, dec!(4))]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["key"], "tax_rate");
    }
}
