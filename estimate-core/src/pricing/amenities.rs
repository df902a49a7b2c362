//! Optional trades: outdoor works, extras, kitchen and bathroom.

use rust_decimal::Decimal;

use crate::pricing::{Quantity, unit_line};

tariff! {
    /// Outdoor works, per m².
    pub enum LandscapingWork: Landscaping {
        Lawn => "ENGAZONNEMENT" = 12,
        LandscapedGarden => "JARDIN PAYSAGER" = 45,
        PavedPath => "ALLEE PAVEE" = 80,
        WoodenDeck => "TERRASSE BOIS" = 120,
    }
}

tariff! {
    /// Extras, per unit.
    pub enum HomeOption: Options {
        ElectricGate => "PORTAIL ELECTRIQUE" = 3500,
        Fence => "CLOTURE" = 6000,
        Garage => "GARAGE" = 15000,
        Veranda => "VERANDA" = 18000,
        Pool => "PISCINE" = 25000,
    }
}

tariff! {
    /// Fitted kitchens, per kitchen.
    pub enum KitchenTier: Kitchen {
        Basic => "CUISINE DE BASE" = 8500,
        Equipped => "CUISINE EQUIPEE" = 15000,
        HighEnd => "CUISINE HAUT DE GAMME" = 28000,
    }
}

tariff! {
    /// Bathrooms, per room.
    pub enum BathroomTier: Bathroom {
        Basic => "BASIQUE" = 6000,
        Standard => "STANDARD" = 9500,
        Premium => "PREMIUM" = 15000,
    }
}

pub fn calculate_landscaping_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<LandscapingWork>(selection, area.into()).amount
}

pub fn calculate_options_cost(
    selection: &str,
    count: impl Into<Quantity>,
) -> Decimal {
    unit_line::<HomeOption>(selection, count.into()).amount
}

pub fn calculate_kitchen_cost(
    selection: &str,
    count: impl Into<Quantity>,
) -> Decimal {
    unit_line::<KitchenTier>(selection, count.into()).amount
}

pub fn calculate_bathroom_cost(
    selection: &str,
    count: impl Into<Quantity>,
) -> Decimal {
    unit_line::<BathroomTier>(selection, count.into()).amount
}
