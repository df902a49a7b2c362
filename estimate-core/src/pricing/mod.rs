//! Per-category pricing tables and cost functions.
//!
//! Each category owns a private tariff: a closed enum of selections, each
//! with a fixed rate. A cost function looks the selection up, multiplies by
//! the quantity and rounds to cents. Unknown selections price at zero and
//! quantities are clamped to be non-negative, so every function returns an
//! amount `>= 0`.
//!
//! Two categories are percentages rather than unit prices: eco solutions and
//! renewable energy apply their rate to the running total *before* their own
//! delta is added.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use estimate_core::pricing::{calculate_kitchen_cost, calculate_roofing_cost};
//!
//! let roofing = calculate_roofing_cost("ARDOISE", 100);
//! let kitchen = calculate_kitchen_cost("CUISINE DE BASE", 1);
//!
//! assert_eq!(roofing + kitchen, dec!(26500));
//! ```

macro_rules! tariff {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $category:ident {
            $( $variant:ident => $key:literal = $rate:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $( #[serde(rename = $key)] $variant ),+
        }

        impl $crate::pricing::Tariff for $name {
            const CATEGORY: $crate::pricing::Category = $crate::pricing::Category::$category;

            fn all() -> &'static [Self] {
                &[$( $name::$variant ),+]
            }

            fn key(&self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }

            fn rate(&self) -> ::rust_decimal::Decimal {
                match self {
                    $( $name::$variant => ::rust_decimal::Decimal::from($rate) ),+
                }
            }
        }
    };
}

pub mod amenities;
pub mod common;
pub mod environment;
pub mod equipment;
pub mod structure;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coerce::coerce_number;
use common::{non_negative, round_half_up};

pub use amenities::{
    BathroomTier, HomeOption, KitchenTier, LandscapingWork, calculate_bathroom_cost,
    calculate_kitchen_cost, calculate_landscaping_cost, calculate_options_cost,
};
pub use environment::{
    EcoSolution, RenewableSource, calculate_eco_solutions_cost, calculate_renewable_energy_cost,
};
pub use equipment::{
    ElectricalGrade, FinishGrade, HeatingSystem, PlumbingGrade, WindowFrame,
    calculate_electrical_cost, calculate_finishes_cost, calculate_heating_cost,
    calculate_plumbing_cost, calculate_windows_cost,
};
pub use structure::{
    DemolitionKind, InsulationMaterial, MasonryMaterial, RoofingMaterial, RoofingRenovMaterial,
    TerrainKind, calculate_demolition_cost, calculate_insulation_cost, calculate_masonry_cost,
    calculate_roofing_cost, calculate_roofing_renov_cost, calculate_terrain_cost,
};

/// Trade category a cost line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Terrain,
    Demolition,
    Masonry,
    Roofing,
    Windows,
    Insulation,
    Electrical,
    Plumbing,
    Heating,
    Finishes,
    EcoSolutions,
    RenewableEnergy,
    Landscaping,
    Options,
    Kitchen,
    Bathroom,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Terrain => "Terrain preparation",
            Self::Demolition => "Demolition",
            Self::Masonry => "Masonry",
            Self::Roofing => "Roofing",
            Self::Windows => "Windows and doors",
            Self::Insulation => "Insulation",
            Self::Electrical => "Electrical",
            Self::Plumbing => "Plumbing",
            Self::Heating => "Heating",
            Self::Finishes => "Finishes",
            Self::EcoSolutions => "Eco solutions",
            Self::RenewableEnergy => "Renewable energy",
            Self::Landscaping => "Landscaping",
            Self::Options => "Options",
            Self::Kitchen => "Kitchen",
            Self::Bathroom => "Bathroom",
        }
    }

    /// Percentage categories price against the running total.
    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::EcoSolutions | Self::RenewableEnergy)
    }
}

impl fmt::Display for Category {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A closed selection → rate table.
///
/// `rate` is euros per unit, or a percentage for
/// [`Category::is_percentage`] categories.
pub trait Tariff: Copy + Sized + 'static {
    const CATEGORY: Category;

    fn all() -> &'static [Self];

    fn key(&self) -> &'static str;

    fn rate(&self) -> Decimal;

    /// Looks a selection up, ignoring case and surrounding whitespace.
    fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.key().eq_ignore_ascii_case(wanted))
    }
}

/// A non-negative quantity (area, length or count).
///
/// Built from raw text through the shared numeric coercion, so empty or
/// garbage input is zero. Negative values are clamped to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(non_negative(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Quantity::new(value)
    }
}

impl From<&str> for Quantity {
    fn from(raw: &str) -> Self {
        Quantity::new(coerce_number(raw))
    }
}

impl From<i32> for Quantity {
    fn from(value: i32) -> Self {
        Quantity::new(Decimal::from(value))
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Quantity::new(Decimal::from(value))
    }
}

/// One priced item: what was chosen, against what basis, for how much.
///
/// `basis` is the quantity for unit-priced categories and the pre-addition
/// running total for percentage categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
    pub category: Category,
    pub selection: String,
    pub basis: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

fn lookup_rate<T: Tariff>(selection: &str) -> Decimal {
    match T::parse(selection) {
        Some(tariff) => tariff.rate(),
        None => {
            debug!(
                category = %T::CATEGORY,
                selection,
                "unknown selection priced at zero"
            );
            Decimal::ZERO
        }
    }
}

/// An amount too large for a `Decimal` prices at zero.
fn checked_amount(
    category: Category,
    amount: Option<Decimal>,
) -> Decimal {
    match amount {
        Some(amount) => round_half_up(amount),
        None => {
            debug!(%category, "amount out of range priced at zero");
            Decimal::ZERO
        }
    }
}

/// Prices `quantity` units of `selection` from tariff `T`.
pub fn unit_line<T: Tariff>(
    selection: &str,
    quantity: Quantity,
) -> CostLine {
    let rate = lookup_rate::<T>(selection);
    CostLine {
        category: T::CATEGORY,
        selection: selection.trim().to_string(),
        basis: quantity.value(),
        rate,
        amount: checked_amount(T::CATEGORY, rate.checked_mul(quantity.value())),
    }
}

/// Prices `selection` from percentage tariff `T` against `running_total`.
pub fn share_line<T: Tariff>(
    selection: &str,
    running_total: Decimal,
) -> CostLine {
    let rate = lookup_rate::<T>(selection);
    let base = non_negative(running_total);
    CostLine {
        category: T::CATEGORY,
        selection: selection.trim().to_string(),
        basis: base,
        rate,
        amount: checked_amount(
            T::CATEGORY,
            base.checked_mul(rate).map(|share| share / Decimal::ONE_HUNDRED),
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn quantity_coerces_text() {
        assert_eq!(Quantity::from("50").value(), dec!(50));
        assert_eq!(Quantity::from("").value(), dec!(0));
        assert_eq!(Quantity::from("beaucoup").value(), dec!(0));
    }

    #[test]
    fn quantity_clamps_negative_values() {
        assert_eq!(Quantity::from(-3).value(), dec!(0));
        assert_eq!(Quantity::from(dec!(-0.5)).value(), dec!(0));
    }

    #[test]
    fn tariff_parse_ignores_case_and_whitespace() {
        assert_eq!(RoofingMaterial::parse(" ardoise "), Some(RoofingMaterial::Slate));
        assert_eq!(KitchenTier::parse("Cuisine de base"), Some(KitchenTier::Basic));
        assert_eq!(BathroomTier::parse("UNKNOWN_TYPE"), None);
    }

    #[test]
    fn unit_line_records_rate_and_basis() {
        let line = unit_line::<RoofingMaterial>("ARDOISE", Quantity::from(100));

        assert_eq!(
            line,
            CostLine {
                category: Category::Roofing,
                selection: "ARDOISE".into(),
                basis: dec!(100),
                rate: dec!(180),
                amount: dec!(18000),
            }
        );
    }

    #[test]
    fn unit_line_unknown_selection_is_unpriced() {
        let line = unit_line::<BathroomTier>("JACUZZI", Quantity::from(2));

        assert_eq!(line.amount, dec!(0));
        assert_eq!(line.rate, dec!(0));
    }

    #[test]
    fn share_line_ignores_negative_totals() {
        let line = share_line::<RenewableSource>("GEOTHERMIE", dec!(-100));

        assert_eq!(line.basis, dec!(0));
        assert_eq!(line.amount, dec!(0));
    }

    #[test]
    fn every_tariff_prices_non_negative_at_the_extremes() {
        fn assert_non_negative<T: Tariff>() {
            for tariff in T::all() {
                for quantity in [dec!(-250), Decimal::ZERO, dec!(0.5), Decimal::MAX] {
                    let line = if T::CATEGORY.is_percentage() {
                        share_line::<T>(tariff.key(), quantity)
                    } else {
                        unit_line::<T>(tariff.key(), Quantity::new(quantity))
                    };
                    assert!(
                        line.amount >= Decimal::ZERO,
                        "{} {} x {quantity} = {}",
                        T::CATEGORY,
                        tariff.key(),
                        line.amount
                    );
                }
            }
        }

        assert_non_negative::<TerrainKind>();
        assert_non_negative::<DemolitionKind>();
        assert_non_negative::<MasonryMaterial>();
        assert_non_negative::<RoofingMaterial>();
        assert_non_negative::<RoofingRenovMaterial>();
        assert_non_negative::<WindowFrame>();
        assert_non_negative::<InsulationMaterial>();
        assert_non_negative::<ElectricalGrade>();
        assert_non_negative::<PlumbingGrade>();
        assert_non_negative::<HeatingSystem>();
        assert_non_negative::<FinishGrade>();
        assert_non_negative::<EcoSolution>();
        assert_non_negative::<RenewableSource>();
        assert_non_negative::<LandscapingWork>();
        assert_non_negative::<HomeOption>();
        assert_non_negative::<KitchenTier>();
        assert_non_negative::<BathroomTier>();
    }

    #[test]
    fn out_of_range_amounts_price_at_zero() {
        assert_eq!(calculate_roofing_cost("ARDOISE", "79228162514264337593543950335"), dec!(0));
        assert_eq!(calculate_renewable_energy_cost("GEOTHERMIE", Decimal::MAX), dec!(0));
        assert_eq!(calculate_kitchen_cost("CUISINE DE BASE", 1), dec!(8500));
    }

    #[test]
    fn tariff_keys_are_unique_within_each_table() {
        fn assert_unique<T: Tariff>() {
            let mut keys: Vec<&str> = T::all().iter().map(|t| t.key()).collect();
            let total = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), total, "duplicate key in {}", T::CATEGORY);
        }

        assert_unique::<TerrainKind>();
        assert_unique::<DemolitionKind>();
        assert_unique::<MasonryMaterial>();
        assert_unique::<RoofingMaterial>();
        assert_unique::<RoofingRenovMaterial>();
        assert_unique::<WindowFrame>();
        assert_unique::<InsulationMaterial>();
        assert_unique::<ElectricalGrade>();
        assert_unique::<PlumbingGrade>();
        assert_unique::<HeatingSystem>();
        assert_unique::<FinishGrade>();
        assert_unique::<EcoSolution>();
        assert_unique::<RenewableSource>();
        assert_unique::<LandscapingWork>();
        assert_unique::<HomeOption>();
        assert_unique::<KitchenTier>();
        assert_unique::<BathroomTier>();
    }
}
