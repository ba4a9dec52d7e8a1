//! Brazilian market reference tables used to seed a study.
//!
//! Sources: regional CUB/SINAPI surveys, SECOVI, CBIC, Abrainc and FipeZap
//! references for 2024/2025. Region-keyed tables are indexed by
//! [`Region::index`](crate::study::Region::index), typology-keyed tables by
//! [`Typology::index`](crate::study::Typology::index), land-deal tables by
//! [`LandDeal::index`](crate::study::LandDeal::index) and every inner row by
//! [`Tier::index`](crate::study::Tier::index).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::study::Tier;

/// Typical market value with its usual range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub mid: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

/// Typical sales table: percentages of the unit price plus installment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRow {
    pub down_payment: Decimal,
    pub construction_installments: Decimal,
    pub financing: Decimal,
    pub reinforcements: Decimal,
    pub installments: u32,
}

macro_rules! band {
    ($mid:tt, $min:tt, $max:tt) => {
        Band {
            mid: dec!($mid),
            min: dec!($min),
            max: dec!($max),
        }
    };
}

macro_rules! row {
    ($down:tt, $constr:tt, $fin:tt, $reinf:tt, $n:tt) => {
        TableRow {
            down_payment: dec!($down),
            construction_installments: dec!($constr),
            financing: dec!($fin),
            reinforcements: dec!($reinf),
            installments: $n,
        }
    };
}

// ---------------------------------------------------------------------------
// Single-band references
// ---------------------------------------------------------------------------

/// Annual minimum attractive rate of return.
pub const DISCOUNT_RATE: Band = band!(12, 9, 18);
pub const INCC: Band = band!(6.5, 4, 10);
pub const IPCA: Band = band!(4.5, 3, 7);
pub const IGPM: Band = band!(5, 3, 8);
pub const PRODUCTION_LOAN_RATE: Band = band!(12.5, 10, 15);
/// Months
pub const PRODUCTION_LOAN_GRACE: Band = band!(6, 3, 12);
/// Months
pub const PRODUCTION_LOAN_TERM: Band = band!(36, 24, 48);
/// % of construction cost financed
pub const PRODUCTION_LOAN_COVERAGE: Band = band!(70, 50, 80);

/// Incorporation registry, % of VGV.
pub const REGISTRY_FEES: Band = band!(0.3, 0.1, 0.5);
/// Deeds and property registry, % of VGV.
pub const DEEDS: Band = band!(0.5, 0.3, 0.8);
/// Land transfer tax (ITBI), % of land value.
pub const LAND_TRANSFER_TAX: Band = band!(2.5, 2, 3);
/// Land property tax (IPTU), annual % of land value.
pub const LAND_PROPERTY_TAX: Band = band!(1, 0.5, 1.5);

// ---------------------------------------------------------------------------
// Tax regimes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Special taxation regime: single rate on gross receipts
    Ret,
    /// Special regime for the lowest social-housing band
    RetSocialHousing,
    PresumedProfit,
}

impl TaxRegime {
    pub fn for_tier(tier: Tier) -> TaxRegime {
        match tier {
            Tier::Economy => TaxRegime::RetSocialHousing,
            Tier::Standard | Tier::Mid | Tier::UpperMid => TaxRegime::Ret,
            Tier::High | Tier::Luxury => TaxRegime::PresumedProfit,
        }
    }

    /// Rate in % of recognised revenue.
    pub fn rate(self) -> Decimal {
        match self {
            TaxRegime::Ret => dec!(4),
            TaxRegime::RetSocialHousing => dec!(1),
            TaxRegime::PresumedProfit => dec!(6.73),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TaxRegime::Ret => "Special taxation regime (RET), single rate on gross receipts",
            TaxRegime::RetSocialHousing => "RET for social-housing band 1 developments",
            TaxRegime::PresumedProfit => {
                "Presumed profit (PIS 0.65% + COFINS 3% + IRPJ 1.2% + CSLL 1.08% + IRPJ surcharge 0.8%)"
            }
        }
    }
}

/// Range the tax rate is judged against, cheapest to dearest regime.
pub const TAX_RATE_RANGE: (Decimal, Decimal) = (dec!(1), dec!(6.73));

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Construction cost (CUB) in R$/m² by region and tier.
pub const CONSTRUCTION_COST_PER_SQM: [[Band; 6]; 5] = [
    [
        band!(1850, 1600, 2100),
        band!(2100, 1850, 2350),
        band!(2400, 2100, 2700),
        band!(2750, 2400, 3100),
        band!(3200, 2800, 3600),
        band!(3800, 3300, 4500),
    ],
    [
        band!(1800, 1550, 2050),
        band!(2050, 1800, 2300),
        band!(2350, 2050, 2650),
        band!(2700, 2350, 3050),
        band!(3100, 2700, 3500),
        band!(3700, 3200, 4400),
    ],
    [
        band!(2000, 1750, 2250),
        band!(2250, 2000, 2500),
        band!(2600, 2250, 2950),
        band!(3000, 2600, 3400),
        band!(3500, 3000, 4000),
        band!(4200, 3600, 5000),
    ],
    [
        band!(2200, 1900, 2500),
        band!(2500, 2200, 2800),
        band!(2900, 2500, 3300),
        band!(3400, 2900, 3900),
        band!(4000, 3400, 4600),
        band!(5000, 4200, 6000),
    ],
    [
        band!(2100, 1850, 2350),
        band!(2400, 2100, 2700),
        band!(2750, 2400, 3100),
        band!(3200, 2750, 3650),
        band!(3800, 3200, 4400),
        band!(4600, 3900, 5500),
    ],
];

/// Sales price in R$/m² of private area by region and tier.
pub const SALES_PRICE_PER_SQM: [[Band; 6]; 5] = [
    [
        band!(3500, 2800, 4200),
        band!(4500, 3800, 5500),
        band!(6000, 5000, 7500),
        band!(8000, 6500, 10000),
        band!(11000, 8500, 14000),
        band!(16000, 12000, 22000),
    ],
    [
        band!(3800, 3000, 4500),
        band!(5000, 4000, 6000),
        band!(6500, 5500, 8000),
        band!(9000, 7000, 11500),
        band!(13000, 10000, 17000),
        band!(20000, 15000, 28000),
    ],
    [
        band!(3800, 3200, 4500),
        band!(5200, 4200, 6500),
        band!(7000, 5800, 8500),
        band!(9500, 7500, 12000),
        band!(13500, 10500, 17000),
        band!(20000, 15000, 28000),
    ],
    [
        band!(4500, 3500, 5500),
        band!(6000, 5000, 7500),
        band!(8500, 7000, 10500),
        band!(12000, 9500, 15000),
        band!(17000, 13000, 22000),
        band!(28000, 20000, 45000),
    ],
    [
        band!(4200, 3500, 5000),
        band!(5500, 4500, 7000),
        band!(7500, 6000, 9500),
        band!(10500, 8500, 13000),
        band!(15000, 11500, 19000),
        band!(24000, 18000, 35000),
    ],
];

/// Lot sales price in R$/m² by region and tier.
pub const LOT_PRICE_PER_SQM: [[Band; 6]; 5] = [
    [
        band!(350, 200, 500),
        band!(550, 350, 750),
        band!(800, 550, 1100),
        band!(1200, 850, 1600),
        band!(1800, 1200, 2500),
        band!(2800, 1800, 4000),
    ],
    [
        band!(400, 250, 600),
        band!(650, 400, 900),
        band!(950, 650, 1300),
        band!(1400, 1000, 1900),
        band!(2200, 1500, 3000),
        band!(3500, 2500, 5000),
    ],
    [
        band!(450, 300, 650),
        band!(700, 450, 1000),
        band!(1050, 700, 1400),
        band!(1500, 1050, 2000),
        band!(2500, 1700, 3500),
        band!(4000, 2800, 5500),
    ],
    [
        band!(550, 350, 800),
        band!(850, 550, 1200),
        band!(1300, 850, 1800),
        band!(2000, 1400, 2800),
        band!(3200, 2200, 4500),
        band!(5500, 3500, 8000),
    ],
    [
        band!(500, 300, 700),
        band!(780, 500, 1100),
        band!(1150, 780, 1600),
        band!(1750, 1200, 2400),
        band!(2800, 1900, 3800),
        band!(4500, 3000, 6500),
    ],
];

/// Share of stock sold per month by typology and tier.
pub const SALES_VELOCITY: [[Band; 6]; 5] = [
    [
        band!(6, 4, 10),
        band!(5, 3, 8),
        band!(4, 2.5, 6.5),
        band!(3.5, 2, 5.5),
        band!(3, 1.5, 5),
        band!(2, 1, 3.5),
    ],
    [
        band!(5, 3.5, 8),
        band!(4, 2.5, 6),
        band!(3, 2, 5),
        band!(2.5, 1.5, 4),
        band!(2, 1, 3.5),
        band!(1.5, 0.8, 2.5),
    ],
    [
        band!(5.5, 3.5, 8.5),
        band!(4.5, 3, 7),
        band!(3.5, 2, 5.5),
        band!(3, 1.5, 4.5),
        band!(2.5, 1, 4),
        band!(1.5, 0.8, 3),
    ],
    [
        band!(8, 5, 12),
        band!(7, 4, 10),
        band!(6, 3.5, 9),
        band!(5, 3, 8),
        band!(4, 2.5, 6.5),
        band!(3, 1.5, 5),
    ],
    [
        band!(4, 2.5, 6),
        band!(3.5, 2, 5),
        band!(3, 1.5, 4.5),
        band!(2.5, 1.5, 4),
        band!(2, 1, 3),
        band!(1.5, 0.8, 2.5),
    ],
];

/// Construction period in months by typology and tier.
pub const CONSTRUCTION_PERIOD: [[Band; 6]; 5] = [
    [
        band!(18, 12, 24),
        band!(20, 15, 28),
        band!(24, 18, 30),
        band!(24, 18, 32),
        band!(28, 20, 36),
        band!(30, 24, 40),
    ],
    [
        band!(24, 18, 30),
        band!(28, 22, 34),
        band!(30, 24, 38),
        band!(34, 28, 42),
        band!(38, 30, 48),
        band!(42, 34, 54),
    ],
    [
        band!(18, 14, 24),
        band!(22, 16, 28),
        band!(24, 18, 32),
        band!(28, 22, 36),
        band!(32, 24, 40),
        band!(36, 28, 48),
    ],
    [
        band!(24, 18, 30),
        band!(28, 22, 36),
        band!(30, 24, 38),
        band!(34, 28, 42),
        band!(38, 30, 48),
        band!(42, 34, 54),
    ],
    [
        band!(28, 22, 34),
        band!(30, 24, 38),
        band!(34, 28, 42),
        band!(38, 30, 46),
        band!(42, 34, 52),
        band!(48, 38, 60),
    ],
];

/// Average private area (lot area for subdivisions) in m² by typology and tier.
pub const PRIVATE_AREA: [[Band; 6]; 5] = [
    [
        band!(160, 125, 200),
        band!(200, 160, 250),
        band!(250, 200, 350),
        band!(350, 250, 500),
        band!(500, 350, 800),
        band!(800, 500, 1500),
    ],
    [
        band!(42, 35, 50),
        band!(55, 45, 70),
        band!(75, 60, 95),
        band!(110, 85, 140),
        band!(160, 120, 220),
        band!(250, 180, 400),
    ],
    [
        band!(55, 42, 70),
        band!(80, 60, 100),
        band!(120, 90, 160),
        band!(170, 130, 220),
        band!(250, 180, 350),
        band!(400, 280, 600),
    ],
    [
        band!(30, 20, 40),
        band!(35, 25, 45),
        band!(45, 35, 60),
        band!(60, 45, 80),
        band!(80, 60, 110),
        band!(120, 80, 180),
    ],
    [
        band!(38, 30, 48),
        band!(50, 38, 65),
        band!(70, 55, 90),
        band!(100, 75, 130),
        band!(140, 100, 200),
        band!(220, 150, 350),
    ],
];

/// Design and consulting, % of VGV, by typology and tier.
pub const DESIGN_COST: [[Band; 6]; 5] = [
    [
        band!(1, 0.7, 1.5),
        band!(1, 0.7, 1.5),
        band!(1.2, 0.8, 1.5),
        band!(1.2, 0.8, 1.8),
        band!(1.5, 1, 2),
        band!(1.5, 1, 2.5),
    ],
    [
        band!(1, 0.5, 1.5),
        band!(1.2, 0.8, 1.5),
        band!(1.2, 0.8, 1.8),
        band!(1.5, 1, 2),
        band!(1.5, 1, 2.5),
        band!(2, 1.5, 3),
    ],
    [
        band!(1, 0.5, 1.5),
        band!(1.2, 0.8, 1.5),
        band!(1.2, 0.8, 1.8),
        band!(1.5, 1, 2),
        band!(1.5, 1, 2.5),
        band!(2, 1.5, 3),
    ],
    [
        band!(1.2, 0.8, 1.5),
        band!(1.2, 0.8, 1.8),
        band!(1.5, 1, 2),
        band!(1.5, 1, 2.5),
        band!(2, 1.5, 3),
        band!(2.5, 1.5, 3.5),
    ],
    [
        band!(1.2, 0.8, 1.5),
        band!(1.2, 0.8, 1.8),
        band!(1.5, 1, 2),
        band!(1.5, 1, 2.5),
        band!(2, 1.5, 3),
        band!(2.5, 1.5, 3.5),
    ],
];

/// Approvals and permits, % of VGV, by typology and tier.
pub const APPROVAL_COST: [[Band; 6]; 5] = [
    [
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.8, 0.5, 1.2),
        band!(1, 0.5, 1.5),
    ],
    [
        band!(0.3, 0.2, 0.8),
        band!(0.5, 0.3, 0.8),
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.8, 0.5, 1.2),
        band!(1, 0.5, 1.5),
    ],
    [
        band!(0.3, 0.2, 0.8),
        band!(0.5, 0.3, 0.8),
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.8, 0.5, 1.2),
        band!(1, 0.5, 1.5),
    ],
    [
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.8, 0.5, 1.2),
        band!(0.8, 0.5, 1.5),
        band!(1, 0.5, 1.5),
    ],
    [
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.5, 0.3, 1),
        band!(0.8, 0.5, 1.2),
        band!(0.8, 0.5, 1.5),
        band!(1, 0.5, 1.5),
    ],
];

/// Bad debt, %, by typology and tier.
pub const BAD_DEBT: [[Band; 6]; 5] = [
    [
        band!(28, 22, 35),
        band!(25, 20, 30),
        band!(20, 15, 28),
        band!(15, 10, 22),
        band!(12, 8, 18),
        band!(10, 5, 15),
    ],
    [
        band!(8, 5, 12),
        band!(6, 4, 9),
        band!(5, 3, 7),
        band!(4, 2, 6),
        band!(3, 1.5, 5),
        band!(2.5, 1, 4),
    ],
    [
        band!(10, 6, 15),
        band!(8, 5, 12),
        band!(6, 4, 9),
        band!(5, 3, 7),
        band!(4, 2, 6),
        band!(3, 1.5, 5),
    ],
    [
        band!(10, 6, 15),
        band!(8, 5, 12),
        band!(6, 4, 9),
        band!(5, 3, 8),
        band!(4, 2, 6),
        band!(3, 1.5, 5),
    ],
    [
        band!(8, 5, 12),
        band!(6, 4, 9),
        band!(5, 3, 7),
        band!(4, 2, 6),
        band!(3, 1.5, 5),
        band!(2.5, 1, 4),
    ],
];

/// Land cost, % of VGV, by land deal and tier.
pub const LAND_COST_PCT: [[Band; 6]; 4] = [
    [
        band!(10, 7, 14),
        band!(12, 8, 16),
        band!(14, 10, 18),
        band!(16, 12, 22),
        band!(18, 14, 25),
        band!(22, 16, 30),
    ],
    [
        band!(12, 8, 16),
        band!(14, 10, 18),
        band!(16, 12, 22),
        band!(18, 14, 25),
        band!(22, 16, 28),
        band!(25, 18, 32),
    ],
    [
        band!(11, 7, 15),
        band!(13, 9, 17),
        band!(15, 11, 20),
        band!(17, 13, 23),
        band!(20, 15, 26),
        band!(23, 17, 30),
    ],
    [
        band!(13, 9, 17),
        band!(15, 10, 20),
        band!(17, 12, 23),
        band!(20, 15, 26),
        band!(23, 17, 30),
        band!(27, 20, 35),
    ],
];

/// Subdivision infrastructure in R$/m² of total land by tier.
pub const INFRASTRUCTURE_COST_PER_SQM: [Band; 6] = [
    band!(80, 55, 110),
    band!(110, 80, 150),
    band!(150, 110, 200),
    band!(200, 150, 270),
    band!(280, 200, 380),
    band!(400, 300, 550),
];

/// Broker commission, % of VGV, by tier.
pub const BROKER_COMMISSION: [Band; 6] = [
    band!(4, 3, 5),
    band!(4.5, 3.5, 5.5),
    band!(5, 4, 6),
    band!(5, 4, 6),
    band!(5.5, 4, 6.5),
    band!(6, 4.5, 7),
];

/// Marketing, % of VGV, by tier.
pub const MARKETING: [Band; 6] = [
    band!(2, 1, 3),
    band!(2.5, 1.5, 3.5),
    band!(3, 2, 4),
    band!(3.5, 2, 4.5),
    band!(3.5, 2.5, 5),
    band!(4, 2.5, 5.5),
];

/// Sales booth, % of VGV, by tier.
pub const SALES_BOOTH: [Band; 6] = [
    band!(0.5, 0.3, 1),
    band!(0.8, 0.5, 1.2),
    band!(1, 0.5, 1.5),
    band!(1.2, 0.7, 1.8),
    band!(1.5, 0.8, 2),
    band!(2, 1, 3),
];

/// Sales coordination, % of VGV, by tier.
pub const SALES_COORDINATION: [Band; 6] = [
    band!(0.5, 0.3, 1),
    band!(0.8, 0.5, 1.2),
    band!(1, 0.5, 1.5),
    band!(1, 0.5, 1.5),
    band!(1.2, 0.8, 1.5),
    band!(1.5, 1, 2),
];

/// Broker bonus, % of VGV, by tier.
pub const SALES_BONUS: [Band; 6] = [
    band!(0.3, 0, 0.5),
    band!(0.5, 0.3, 0.8),
    band!(0.5, 0.3, 1),
    band!(0.5, 0.3, 1),
    band!(0.8, 0.5, 1.2),
    band!(1, 0.5, 1.5),
];

/// Administrative expenses, % of VGV, by tier.
pub const ADMINISTRATIVE: [Band; 6] = [
    band!(2, 1.5, 3),
    band!(2.5, 1.5, 3.5),
    band!(3, 2, 4),
    band!(3, 2, 4.5),
    band!(3.5, 2.5, 5),
    band!(4, 2.5, 5.5),
];

/// Project management fee, % of VGV, by tier.
pub const MANAGEMENT_FEE: [Band; 6] = [
    band!(1, 0.5, 1.5),
    band!(1, 0.5, 2),
    band!(1.5, 1, 2.5),
    band!(1.5, 1, 2.5),
    band!(2, 1, 3),
    band!(2.5, 1.5, 3.5),
];

/// Insurance, % of VGV, by tier.
pub const INSURANCE: [Band; 6] = [
    band!(0.3, 0.1, 0.5),
    band!(0.3, 0.2, 0.5),
    band!(0.4, 0.2, 0.6),
    band!(0.4, 0.2, 0.7),
    band!(0.5, 0.3, 0.8),
    band!(0.5, 0.3, 1),
];

/// Pre-operating expenses, % of VGV, by tier.
pub const PRE_OPERATING: [Band; 6] = [
    band!(0.3, 0.1, 0.5),
    band!(0.3, 0.2, 0.5),
    band!(0.4, 0.2, 0.6),
    band!(0.4, 0.2, 0.7),
    band!(0.5, 0.3, 0.8),
    band!(0.5, 0.3, 1),
];

/// Construction overhead (BDI), % of raw cost, by tier.
pub const OVERHEAD_MARKUP: [Band; 6] = [
    band!(10, 8, 15),
    band!(12, 8, 15),
    band!(12, 10, 18),
    band!(15, 10, 20),
    band!(15, 12, 20),
    band!(18, 12, 22),
];

/// Cancellation rate, %, by tier.
pub const CANCELLATION: [Band; 6] = [
    band!(15, 10, 22),
    band!(12, 8, 18),
    band!(10, 6, 15),
    band!(8, 5, 12),
    band!(6, 3, 10),
    band!(5, 2, 8),
];

/// Sales table by typology and tier: down payment, construction installments,
/// financing and reinforcement percentages, then installment count.
pub const SALES_TABLE: [[TableRow; 6]; 5] = [
    [
        row!(10, 60, 30, 0, 120),
        row!(10, 55, 30, 5, 100),
        row!(15, 50, 30, 5, 80),
        row!(20, 45, 30, 5, 60),
        row!(20, 40, 30, 10, 48),
        row!(30, 35, 25, 10, 36),
    ],
    [
        row!(10, 20, 70, 0, 30),
        row!(15, 20, 60, 5, 30),
        row!(20, 20, 50, 10, 30),
        row!(20, 25, 45, 10, 36),
        row!(25, 30, 35, 10, 36),
        row!(30, 35, 25, 10, 36),
    ],
    [
        row!(10, 20, 70, 0, 24),
        row!(15, 20, 60, 5, 24),
        row!(20, 25, 50, 5, 24),
        row!(20, 25, 45, 10, 30),
        row!(25, 30, 35, 10, 30),
        row!(30, 35, 25, 10, 30),
    ],
    [
        row!(10, 50, 40, 0, 48),
        row!(15, 45, 35, 5, 48),
        row!(15, 45, 35, 5, 60),
        row!(20, 40, 30, 10, 60),
        row!(25, 35, 30, 10, 48),
        row!(30, 30, 25, 15, 36),
    ],
    [
        row!(10, 25, 65, 0, 30),
        row!(15, 25, 55, 5, 30),
        row!(20, 25, 45, 10, 30),
        row!(20, 25, 45, 10, 36),
        row!(25, 30, 35, 10, 36),
        row!(30, 30, 25, 15, 36),
    ],
];

/// Moderate sales split (launch, construction, post-delivery) by typology.
pub const SALES_PHASES: [[Decimal; 3]; 5] = [
    [dec!(40), dec!(45), dec!(15)],
    [dec!(30), dec!(55), dec!(15)],
    [dec!(30), dec!(55), dec!(15)],
    [dec!(35), dec!(50), dec!(15)],
    [dec!(30), dec!(55), dec!(15)],
];

/// Incorporation or subdivision registration period in months by typology.
pub const REGISTRATION_PERIOD: [Band; 5] = [
    band!(4, 3, 6),
    band!(2, 1, 4),
    band!(2, 1, 4),
    band!(3, 2, 5),
    band!(3, 2, 5),
];
