use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ViabilityError;
use crate::types::Money;
use crate::ViabilityResult;

/// Kind of real-estate development being appraised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Typology {
    /// Urban land subdivision sold as lots, usually financed directly by the developer.
    LandSubdivision,
    VerticalDevelopment,
    HorizontalDevelopment,
    FractionalOwnership,
    MixedUse,
}

impl Typology {
    pub const ALL: [Typology; 5] = [
        Typology::LandSubdivision,
        Typology::VerticalDevelopment,
        Typology::HorizontalDevelopment,
        Typology::FractionalOwnership,
        Typology::MixedUse,
    ];

    pub fn is_land_subdivision(self) -> bool {
        matches!(self, Typology::LandSubdivision)
    }

    /// Row index into typology-keyed benchmark tables.
    pub fn index(self) -> usize {
        match self {
            Typology::LandSubdivision => 0,
            Typology::VerticalDevelopment => 1,
            Typology::HorizontalDevelopment => 2,
            Typology::FractionalOwnership => 3,
            Typology::MixedUse => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Typology::LandSubdivision => "Land subdivision",
            Typology::VerticalDevelopment => "Vertical development",
            Typology::HorizontalDevelopment => "Horizontal development",
            Typology::FractionalOwnership => "Fractional ownership",
            Typology::MixedUse => "Mixed use",
        }
    }
}

/// Target market tier, ordered from economy to luxury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Economy,
    Standard,
    Mid,
    UpperMid,
    High,
    Luxury,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::Economy,
        Tier::Standard,
        Tier::Mid,
        Tier::UpperMid,
        Tier::High,
        Tier::Luxury,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// How the land is acquired from its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandDeal {
    OutrightPurchase,
    /// Owner is paid in finished units.
    PhysicalSwap,
    /// Owner is paid a share of sales receipts.
    FinancialSwap,
    /// Owner is paid a share of the project result.
    ResultSwap,
}

impl LandDeal {
    pub fn index(self) -> usize {
        match self {
            LandDeal::OutrightPurchase => 0,
            LandDeal::PhysicalSwap => 1,
            LandDeal::FinancialSwap => 2,
            LandDeal::ResultSwap => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    Northeast,
    CentralWest,
    Southeast,
    South,
}

impl Region {
    pub fn index(self) -> usize {
        match self {
            Region::North => 0,
            Region::Northeast => 1,
            Region::CentralWest => 2,
            Region::Southeast => 3,
            Region::South => 4,
        }
    }

    /// Region of a Brazilian state code. Unknown codes fall back to Southeast.
    pub fn from_state(state: &str) -> Region {
        match state.trim().to_ascii_uppercase().as_str() {
            "AC" | "AM" | "AP" | "PA" | "RO" | "RR" | "TO" => Region::North,
            "AL" | "BA" | "CE" | "MA" | "PB" | "PE" | "PI" | "RN" | "SE" => Region::Northeast,
            "DF" | "GO" | "MS" | "MT" => Region::CentralWest,
            "PR" | "RS" | "SC" => Region::South,
            _ => Region::Southeast,
        }
    }
}

/// The handful of facts a user supplies about the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub typology: Typology,
    pub tier: Tier,
    /// Two-letter state code (e.g. "SP")
    pub state: String,
    pub city: String,
    pub unit_count: u32,
    pub land_deal: LandDeal,
    /// Total land area in m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_area_m2: Option<Decimal>,
    /// Target sales value (VGV) if already known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sales_value: Option<Money>,
    /// Average private area per unit in m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_private_area_m2: Option<Decimal>,
}

impl ProjectInput {
    pub fn region(&self) -> Region {
        Region::from_state(&self.state)
    }

    pub fn validate(&self) -> ViabilityResult<()> {
        if self.unit_count == 0 {
            return Err(ViabilityError::InvalidInput {
                field: "unit_count".into(),
                reason: "Project must have at least one unit".into(),
            });
        }
        for (field, value) in [
            ("land_area_m2", self.land_area_m2),
            ("avg_private_area_m2", self.avg_private_area_m2),
        ] {
            if value.is_some_and(|v| v <= Decimal::ZERO) {
                return Err(ViabilityError::InvalidInput {
                    field: field.into(),
                    reason: "Area override must be positive".into(),
                });
            }
        }
        Ok(())
    }
}
