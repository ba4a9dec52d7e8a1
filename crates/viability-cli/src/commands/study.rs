use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use viability_core::market;
use viability_core::study::{LandDeal, ProjectInput, Tier, Typology};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypologyArg {
    LandSubdivision,
    Vertical,
    Horizontal,
    Fractional,
    MixedUse,
}

impl From<TypologyArg> for Typology {
    fn from(arg: TypologyArg) -> Self {
        match arg {
            TypologyArg::LandSubdivision => Typology::LandSubdivision,
            TypologyArg::Vertical => Typology::VerticalDevelopment,
            TypologyArg::Horizontal => Typology::HorizontalDevelopment,
            TypologyArg::Fractional => Typology::FractionalOwnership,
            TypologyArg::MixedUse => Typology::MixedUse,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TierArg {
    Economy,
    Standard,
    Mid,
    UpperMid,
    High,
    Luxury,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Economy => Tier::Economy,
            TierArg::Standard => Tier::Standard,
            TierArg::Mid => Tier::Mid,
            TierArg::UpperMid => Tier::UpperMid,
            TierArg::High => Tier::High,
            TierArg::Luxury => Tier::Luxury,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LandDealArg {
    Purchase,
    PhysicalSwap,
    FinancialSwap,
    ResultSwap,
}

impl From<LandDealArg> for LandDeal {
    fn from(arg: LandDealArg) -> Self {
        match arg {
            LandDealArg::Purchase => LandDeal::OutrightPurchase,
            LandDealArg::PhysicalSwap => LandDeal::PhysicalSwap,
            LandDealArg::FinancialSwap => LandDeal::FinancialSwap,
            LandDealArg::ResultSwap => LandDeal::ResultSwap,
        }
    }
}

/// Arguments for assumption suggestion
#[derive(Args)]
pub struct SuggestArgs {
    /// Path to a JSON project input (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum)]
    pub typology: Option<TypologyArg>,

    #[arg(long, value_enum)]
    pub tier: Option<TierArg>,

    /// Two-letter state code, e.g. SP
    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, default_value = "")]
    pub city: String,

    /// Number of units or lots
    #[arg(long)]
    pub units: Option<u32>,

    #[arg(long, value_enum, default_value = "purchase")]
    pub land_deal: LandDealArg,

    /// Total land area in m²
    #[arg(long)]
    pub land_area: Option<Decimal>,

    /// Target sales value (VGV) in R$
    #[arg(long)]
    pub target_vgv: Option<Decimal>,

    /// Average private area per unit in m²
    #[arg(long)]
    pub private_area: Option<Decimal>,
}

pub fn run_suggest(args: SuggestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document: Option<ProjectInput> = input::read_optional(args.input.as_deref())?;
    let project = if let Some(project) = document {
        project
    } else {
        let typology = args
            .typology
            .ok_or("--typology is required (or provide --input)")?;
        let tier = args.tier.ok_or("--tier is required (or provide --input)")?;
        let state = args.state.ok_or("--state is required (or provide --input)")?;
        let units = args.units.ok_or("--units is required (or provide --input)")?;

        ProjectInput {
            typology: typology.into(),
            tier: tier.into(),
            state,
            city: args.city,
            unit_count: units,
            land_deal: args.land_deal.into(),
            land_area_m2: args.land_area,
            target_sales_value: args.target_vgv,
            avg_private_area_m2: args.private_area,
        }
    };

    let study = market::suggest_study(&project)?;
    Ok(serde_json::to_value(study)?)
}
