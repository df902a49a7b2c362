//! Percentage-of-total categories.
//!
//! These price against the running total as it stood *before* their own
//! delta. Passing a total that already includes the delta compounds it.

use rust_decimal::Decimal;

use crate::pricing::share_line;

tariff! {
    /// Environmental add-ons, in percent of the running total.
    pub enum EcoSolution: EcoSolutions {
        RainwaterHarvesting => "RECUPERATION EAU" = 2,
        EarthTube => "PUITS CANADIEN" = 3,
        GreenRoof => "TOITURE VEGETALE" = 4,
        HeatRecoveryVentilation => "VMC DOUBLE FLUX" = 5,
    }
}

tariff! {
    /// Renewable energy installations, in percent of the running total.
    pub enum RenewableSource: RenewableEnergy {
        SolarThermal => "SOLAIRE THERMIQUE" = 5,
        SolarPanels => "PANNEAUX SOLAIRES" = 8,
        WindTurbine => "EOLIENNE" = 10,
        Geothermal => "GEOTHERMIE" = 12,
    }
}

pub fn calculate_eco_solutions_cost(
    selection: &str,
    running_total: Decimal,
) -> Decimal {
    share_line::<EcoSolution>(selection, running_total).amount
}

pub fn calculate_renewable_energy_cost(
    selection: &str,
    running_total: Decimal,
) -> Decimal {
    share_line::<RenewableSource>(selection, running_total).amount
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn renewable_energy_is_a_share_of_the_total() {
        assert_eq!(
            calculate_renewable_energy_cost("PANNEAUX SOLAIRES", dec!(100000)),
            dec!(8000)
        );
    }

    #[test]
    fn eco_solutions_rounds_to_cents() {
        assert_eq!(
            calculate_eco_solutions_cost("PUITS CANADIEN", dec!(1234.56)),
            dec!(37.04)
        );
    }

    #[test]
    fn zero_total_gives_zero() {
        assert_eq!(calculate_renewable_energy_cost("GEOTHERMIE", dec!(0)), dec!(0));
    }

    #[test]
    fn unknown_source_gives_zero() {
        assert_eq!(
            calculate_renewable_energy_cost("NUCLEAIRE", dec!(50000)),
            dec!(0)
        );
    }
}
