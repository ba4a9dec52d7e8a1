use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::study::Typology;
use crate::types::Rate;

/// Cumulative share of construction cost (in %) at each tenth of the
/// construction period, from 0% to 100% elapsed.
type Curve = [Decimal; 11];

const LAND_SUBDIVISION: Curve = [
    dec!(0), dec!(8), dec!(20), dec!(35), dec!(50), dec!(63),
    dec!(74), dec!(83), dec!(90), dec!(96), dec!(100),
];

const VERTICAL: Curve = [
    dec!(0), dec!(5), dec!(12), dec!(22), dec!(35), dec!(50),
    dec!(65), dec!(78), dec!(88), dec!(95), dec!(100),
];

const HORIZONTAL: Curve = [
    dec!(0), dec!(6), dec!(15), dec!(28), dec!(42), dec!(55),
    dec!(68), dec!(80), dec!(89), dec!(96), dec!(100),
];

const MIXED_USE: Curve = [
    dec!(0), dec!(4), dec!(10), dec!(20), dec!(33), dec!(48),
    dec!(63), dec!(77), dec!(88), dec!(95), dec!(100),
];

fn curve_for(typology: Typology) -> &'static Curve {
    match typology {
        Typology::LandSubdivision => &LAND_SUBDIVISION,
        Typology::VerticalDevelopment | Typology::FractionalOwnership => &VERTICAL,
        Typology::HorizontalDevelopment => &HORIZONTAL,
        Typology::MixedUse => &MIXED_USE,
    }
}

/// Cumulative disbursed fraction (0..=1) after `elapsed` of the construction
/// period has passed. Inputs outside [0, 1] clamp.
pub fn cumulative_share(typology: Typology, elapsed: Rate) -> Rate {
    let curve = curve_for(typology);
    let x = elapsed.max(Decimal::ZERO).min(Decimal::ONE) * dec!(10);
    let segment = x.floor();
    // x == 10 sits on the last point
    let idx = segment.to_usize().unwrap_or(10).min(9);
    let t = x - Decimal::from(idx as u64);
    let y0 = curve[idx];
    let y1 = curve[idx + 1];
    (y0 + (y1 - y0) * t) / dec!(100)
}

/// Share of construction cost falling in construction month `month`
/// (zero-based) of a `duration`-month build.
pub fn monthly_share(typology: Typology, month: usize, duration: usize) -> Rate {
    if duration == 0 {
        return Decimal::ONE;
    }
    let d = Decimal::from(duration as u64);
    let before = cumulative_share(typology, Decimal::from(month as u64) / d);
    let after = cumulative_share(typology, Decimal::from(month as u64 + 1) / d);
    after - before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_endpoints_and_knots() {
        assert_eq!(cumulative_share(Typology::VerticalDevelopment, dec!(0)), dec!(0));
        assert_eq!(cumulative_share(Typology::VerticalDevelopment, dec!(1)), dec!(1));
        assert_eq!(cumulative_share(Typology::VerticalDevelopment, dec!(0.5)), dec!(0.5));
        assert_eq!(cumulative_share(Typology::LandSubdivision, dec!(0.3)), dec!(0.35));
    }

    #[test]
    fn test_interpolates_between_knots() {
        // Halfway between 10% (5) and 20% (12) on the vertical curve
        assert_eq!(cumulative_share(Typology::VerticalDevelopment, dec!(0.15)), dec!(0.085));
    }

    #[test]
    fn test_clamps_outside_unit_interval() {
        assert_eq!(cumulative_share(Typology::MixedUse, dec!(-0.5)), dec!(0));
        assert_eq!(cumulative_share(Typology::MixedUse, dec!(1.7)), dec!(1));
    }

    #[test]
    fn test_monthly_shares_sum_to_one() {
        for typology in Typology::ALL {
            for duration in [1usize, 7, 24, 37] {
                let total: Decimal = (0..duration)
                    .map(|m| monthly_share(typology, m, duration))
                    .sum();
                assert!((total - Decimal::ONE).abs() < dec!(0.0000001), "{typology:?} {duration}");
            }
        }
    }
}
