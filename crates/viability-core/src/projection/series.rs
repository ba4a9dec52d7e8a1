use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Month};

/// Top-level grouping of cash-flow lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineGroup {
    Revenue,
    RevenueDeduction,
    Cost,
    Expense,
}

/// Every itemized monthly line the projector produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowLine {
    // Revenue
    DownPayment,
    Installments,
    IntermediatePayments,
    DeliveryFinancing,
    Reinforcements,
    // Revenue deduction
    BadDebt,
    // Cost
    LandAcquisition,
    LandTransferTax,
    LandPropertyTax,
    ConstructionRaw,
    ConstructionOverhead,
    Design,
    Approvals,
    // Expense
    Commissions,
    SalesBonus,
    Marketing,
    SalesBooth,
    SalesCoordination,
    Administrative,
    ManagementFee,
    Insurance,
    PreOperating,
    IncorporationRegistry,
    Deeds,
    Tax,
}

impl CashFlowLine {
    pub const ALL: [CashFlowLine; 25] = [
        CashFlowLine::DownPayment,
        CashFlowLine::Installments,
        CashFlowLine::IntermediatePayments,
        CashFlowLine::DeliveryFinancing,
        CashFlowLine::Reinforcements,
        CashFlowLine::BadDebt,
        CashFlowLine::LandAcquisition,
        CashFlowLine::LandTransferTax,
        CashFlowLine::LandPropertyTax,
        CashFlowLine::ConstructionRaw,
        CashFlowLine::ConstructionOverhead,
        CashFlowLine::Design,
        CashFlowLine::Approvals,
        CashFlowLine::Commissions,
        CashFlowLine::SalesBonus,
        CashFlowLine::Marketing,
        CashFlowLine::SalesBooth,
        CashFlowLine::SalesCoordination,
        CashFlowLine::Administrative,
        CashFlowLine::ManagementFee,
        CashFlowLine::Insurance,
        CashFlowLine::PreOperating,
        CashFlowLine::IncorporationRegistry,
        CashFlowLine::Deeds,
        CashFlowLine::Tax,
    ];

    pub fn group(self) -> LineGroup {
        use CashFlowLine::*;
        match self {
            DownPayment | Installments | IntermediatePayments | DeliveryFinancing
            | Reinforcements => LineGroup::Revenue,
            BadDebt => LineGroup::RevenueDeduction,
            LandAcquisition | LandTransferTax | LandPropertyTax | ConstructionRaw
            | ConstructionOverhead | Design | Approvals => LineGroup::Cost,
            Commissions | SalesBonus | Marketing | SalesBooth | SalesCoordination
            | Administrative | ManagementFee | Insurance | PreOperating
            | IncorporationRegistry | Deeds | Tax => LineGroup::Expense,
        }
    }

    pub fn label(self) -> &'static str {
        use CashFlowLine::*;
        match self {
            DownPayment => "Down payment",
            Installments => "Installments",
            IntermediatePayments => "Intermediate payments",
            DeliveryFinancing => "Delivery financing",
            Reinforcements => "Reinforcements",
            BadDebt => "Bad debt",
            LandAcquisition => "Land acquisition",
            LandTransferTax => "Land transfer tax (ITBI)",
            LandPropertyTax => "Land property tax (IPTU)",
            ConstructionRaw => "Construction",
            ConstructionOverhead => "Construction overhead (BDI)",
            Design => "Design and consulting",
            Approvals => "Approvals and permits",
            Commissions => "Commissions",
            SalesBonus => "Broker bonus",
            Marketing => "Marketing",
            SalesBooth => "Sales booth",
            SalesCoordination => "Sales coordination",
            Administrative => "Administrative",
            ManagementFee => "Management fee",
            Insurance => "Insurance",
            PreOperating => "Pre-operating",
            IncorporationRegistry => "Incorporation registry",
            Deeds => "Deeds and registry",
            Tax => "Tax",
        }
    }
}

/// Rectangular month-by-line table. Every line has exactly `months` entries,
/// so a line's total is always the sum of its months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    months: usize,
    lines: BTreeMap<CashFlowLine, Vec<Money>>,
}

impl MonthlySeries {
    pub fn new(months: usize) -> Self {
        let lines = CashFlowLine::ALL
            .iter()
            .map(|line| (*line, vec![Decimal::ZERO; months]))
            .collect();
        MonthlySeries { months, lines }
    }

    pub fn months(&self) -> usize {
        self.months
    }

    /// Accumulate `amount` into `line` at `month`. Amounts past the horizon
    /// are dropped and reported back as `false`.
    pub fn add(&mut self, line: CashFlowLine, month: Month, amount: Money) -> bool {
        if month >= self.months {
            return false;
        }
        if let Some(values) = self.lines.get_mut(&line) {
            values[month] += amount;
        }
        true
    }

    pub fn line(&self, line: CashFlowLine) -> &[Money] {
        self.lines.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self, line: CashFlowLine) -> Money {
        self.line(line).iter().copied().sum()
    }

    /// Per-month sum of every line in `group`.
    pub fn group_monthly(&self, group: LineGroup) -> Vec<Money> {
        let mut out = vec![Decimal::ZERO; self.months];
        for (_, values) in self.lines.iter().filter(|(line, _)| line.group() == group) {
            for (slot, value) in out.iter_mut().zip(values) {
                *slot += *value;
            }
        }
        out
    }

    pub fn group_total(&self, group: LineGroup) -> Money {
        self.group_monthly(group).iter().copied().sum()
    }

    /// Flat `line -> total` map for persistence and reporting.
    pub fn totals(&self) -> BTreeMap<CashFlowLine, Money> {
        self.lines
            .iter()
            .map(|(line, values)| (*line, values.iter().copied().sum()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_accumulates_and_drops_past_horizon() {
        let mut series = MonthlySeries::new(3);
        assert!(series.add(CashFlowLine::Marketing, 1, dec!(10)));
        assert!(series.add(CashFlowLine::Marketing, 1, dec!(5)));
        assert!(!series.add(CashFlowLine::Marketing, 3, dec!(99)));
        assert_eq!(series.line(CashFlowLine::Marketing), &[dec!(0), dec!(15), dec!(0)]);
        assert_eq!(series.total(CashFlowLine::Marketing), dec!(15));
    }

    #[test]
    fn test_group_sums() {
        let mut series = MonthlySeries::new(2);
        series.add(CashFlowLine::LandAcquisition, 0, dec!(100));
        series.add(CashFlowLine::ConstructionRaw, 1, dec!(40));
        series.add(CashFlowLine::Tax, 1, dec!(7));
        assert_eq!(series.group_monthly(LineGroup::Cost), vec![dec!(100), dec!(40)]);
        assert_eq!(series.group_total(LineGroup::Expense), dec!(7));
        assert_eq!(series.totals()[&CashFlowLine::ConstructionRaw], dec!(40));
    }

    #[test]
    fn test_every_line_is_rectangular() {
        let series = MonthlySeries::new(7);
        for line in CashFlowLine::ALL {
            assert_eq!(series.line(line).len(), 7);
        }
    }
}
