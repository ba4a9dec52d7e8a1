use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ViabilityError;
use crate::types::{Money, Rate};
use crate::ViabilityResult;

const IRR_TOLERANCE: Decimal = dec!(0.00000001);
const MAX_IRR_ITERATIONS: u32 = 500;
const IRR_INITIAL_GUESS: Rate = dec!(0.01);
const IRR_LOWER_BOUND: Rate = dec!(-0.5);
const IRR_UPPER_BOUND: Rate = dec!(5);
/// Trailing flows below this magnitude are dropped before solving.
const NEGLIGIBLE_FLOW: Money = dec!(0.01);

/// How an IRR figure was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrMethod {
    NewtonRaphson,
    Bisection,
    /// Neither method met the tolerance; the last bisection midpoint is reported.
    BestEstimate,
    /// The flow series never changes sign, so no rate zeroes its NPV.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSolution {
    /// Periodic rate (monthly for project flows). Zero when undefined.
    pub rate: Rate,
    pub method: IrrMethod,
    pub iterations: u32,
}

/// Net Present Value of a series of cash flows, first flow undiscounted.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ViabilityResult<Money> {
    if rate <= dec!(-1) {
        return Err(ViabilityError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount
                .checked_mul(one_plus_r)
                .ok_or_else(|| ViabilityError::Overflow {
                    context: format!("NPV discount factor at period {t}"),
                })?;
        }
        if discount.is_zero() {
            return Err(ViabilityError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}

/// Monthly rate equivalent to an annual effective rate: `(1+annual)^(1/12) - 1`.
pub fn monthly_rate_from_annual(annual: Rate) -> ViabilityResult<Rate> {
    if annual <= dec!(-1) {
        return Err(ViabilityError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate must be greater than -100%".into(),
        });
    }
    if annual.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let twelfth = Decimal::ONE / dec!(12);
    Ok((Decimal::ONE + annual).powd(twelfth) - Decimal::ONE)
}

/// Annual effective rate from a monthly rate: `(1+monthly)^12 - 1`.
pub fn annualize_monthly(monthly: Rate) -> ViabilityResult<Rate> {
    (Decimal::ONE + monthly)
        .checked_powu(12)
        .map(|factor| factor - Decimal::ONE)
        .ok_or_else(|| ViabilityError::Overflow {
            context: "annualising monthly rate".into(),
        })
}

/// Drop trailing near-zero flows, always keeping at least two periods.
pub fn trim_trailing_negligible(cash_flows: &[Money]) -> &[Money] {
    let mut end = cash_flows.len();
    while end > 2 && cash_flows[end - 1].abs() < NEGLIGIBLE_FLOW {
        end -= 1;
    }
    &cash_flows[..end]
}

/// Internal rate of return of a periodic flow series.
///
/// Newton-Raphson from 1% per period, with steps that would leave
/// [-50%, +500%] pulled back halfway instead. If the derivative vanishes,
/// arithmetic overflows or the iteration budget runs out, bisection over the
/// same range takes over. A series with no sign change is reported as
/// `Undefined` with a zero rate.
pub fn solve_irr(cash_flows: &[Money]) -> IrrSolution {
    let flows = trim_trailing_negligible(cash_flows);

    let has_positive = flows.iter().any(|cf| *cf > Decimal::ZERO);
    let has_negative = flows.iter().any(|cf| *cf < Decimal::ZERO);
    if !has_positive || !has_negative {
        debug!(periods = flows.len(), "IRR undefined: no sign change");
        return IrrSolution {
            rate: Decimal::ZERO,
            method: IrrMethod::Undefined,
            iterations: 0,
        };
    }

    if let Some(solution) = newton_raphson_irr(flows) {
        return solution;
    }

    warn!("Newton-Raphson IRR did not converge; falling back to bisection");
    bisection_irr(flows)
}

fn newton_raphson_irr(flows: &[Money]) -> Option<IrrSolution> {
    let mut rate = IRR_INITIAL_GUESS;

    for i in 0..MAX_IRR_ITERATIONS {
        let (value, derivative) = npv_and_derivative(flows, rate)?;

        if value.abs() < IRR_TOLERANCE {
            debug!(iterations = i + 1, %rate, "IRR converged (Newton-Raphson)");
            return Some(IrrSolution {
                rate,
                method: IrrMethod::NewtonRaphson,
                iterations: i + 1,
            });
        }

        if derivative.is_zero() {
            return None;
        }

        let mut next = rate.checked_sub(value.checked_div(derivative)?)?;

        // Pull runaway steps back inside the solver range
        if next < IRR_LOWER_BOUND {
            next = rate / dec!(2);
        } else if next > IRR_UPPER_BOUND {
            next = (rate + IRR_UPPER_BOUND) / dec!(2);
        }
        rate = next;
    }

    None
}

fn bisection_irr(flows: &[Money]) -> IrrSolution {
    let mut low = IRR_LOWER_BOUND;
    let mut high = IRR_UPPER_BOUND;

    for i in 0..MAX_IRR_ITERATIONS {
        let mid = (low + high) / dec!(2);
        let value = npv_or_dominant_sign(flows, mid);

        if value.abs() < IRR_TOLERANCE {
            return IrrSolution {
                rate: mid,
                method: IrrMethod::Bisection,
                iterations: i + 1,
            };
        }

        if value > Decimal::ZERO {
            low = mid;
        } else {
            high = mid;
        }

        if mid == low && mid == high {
            break;
        }
    }

    let rate = (low + high) / dec!(2);
    warn!(%rate, "IRR bisection exhausted; reporting best estimate");
    IrrSolution {
        rate,
        method: IrrMethod::BestEstimate,
        iterations: MAX_IRR_ITERATIONS,
    }
}

/// NPV(r) = sum CF_t / (1+r)^t and its derivative d(NPV)/dr.
/// `None` when the discounting overflows decimal range.
fn npv_and_derivative(flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut value = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;
    let mut discount = Decimal::ONE; // 1 / (1+r)^t

    for (t, cf) in flows.iter().enumerate() {
        value = value.checked_add(cf.checked_mul(discount)?)?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let term = Decimal::from(t as u64)
                .checked_mul(*cf)?
                .checked_mul(discount)?
                .checked_div(one_plus_r)?;
            derivative = derivative.checked_sub(term)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((value, derivative))
}

/// NPV at `rate`; when discounting overflows, the most distant non-zero flow
/// dominates, so its sign stands in for the value.
fn npv_or_dominant_sign(flows: &[Money], rate: Rate) -> Decimal {
    match npv_and_derivative(flows, rate) {
        Some((value, _)) => value,
        None => flows
            .iter()
            .rev()
            .find(|cf| !cf.is_zero())
            .map(|cf| {
                if cf.is_sign_negative() {
                    Decimal::NEGATIVE_ONE
                } else {
                    Decimal::ONE
                }
            })
            .unwrap_or(Decimal::ZERO),
    }
}
