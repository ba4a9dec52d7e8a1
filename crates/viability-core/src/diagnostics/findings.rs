use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// How a finding should be read. Ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Attention,
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Revenue,
    Cost,
    Expense,
    Financial,
    /// The business case as a whole
    Thesis,
}

/// One explained benchmark comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub title: String,
    pub explanation: String,
    /// Current value, formatted for display
    pub current_value: String,
    /// Market reference, formatted for display
    pub benchmark: String,
    pub recommendation: String,
}

impl Finding {
    pub fn new(
        category: FindingCategory,
        severity: Severity,
        title: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Finding {
            category,
            severity,
            title: title.into(),
            explanation: explanation.into(),
            current_value: String::new(),
            benchmark: String::new(),
            recommendation: String::new(),
        }
    }

    pub fn values(mut self, current: impl Into<String>, benchmark: impl Into<String>) -> Self {
        self.current_value = current.into();
        self.benchmark = benchmark.into();
        self
    }

    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }
}

/// `12.3%`, with the given number of decimals.
pub fn fmt_pct(value: Percent, decimals: u32) -> String {
    format!("{}%", value.round_dp(decimals))
}

/// `R$ 1,234,567`, rounded to whole reais.
pub fn fmt_money(value: Money) -> String {
    let rounded = value.round().to_i128().unwrap_or_default();
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-R$ {grouped}")
    } else {
        format!("R$ {grouped}")
    }
}

/// Whole number display for benchmarks held as decimals.
pub fn fmt_whole(value: Decimal) -> String {
    value.round().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_severity_orders_critical_first() {
        let mut v = vec![Severity::Positive, Severity::Critical, Severity::Attention];
        v.sort();
        assert_eq!(v, vec![Severity::Critical, Severity::Attention, Severity::Positive]);
    }

    #[test]
    fn test_money_grouping() {
        assert_eq!(fmt_money(dec!(1234567.4)), "R$ 1,234,567");
        assert_eq!(fmt_money(dec!(999)), "R$ 999");
        assert_eq!(fmt_money(dec!(-15000)), "-R$ 15,000");
        assert_eq!(fmt_money(Decimal::ZERO), "R$ 0");
    }

    #[test]
    fn test_pct_rounding() {
        assert_eq!(fmt_pct(dec!(12.345), 1), "12.3%");
        assert_eq!(fmt_pct(dec!(8), 0), "8%");
    }
}
