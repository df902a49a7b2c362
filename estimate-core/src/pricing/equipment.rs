//! Second-fix trades: joinery, networks, heating and finishes.

use rust_decimal::Decimal;

use crate::pricing::{Quantity, unit_line};

tariff! {
    /// Windows and exterior doors, per unit.
    pub enum WindowFrame: Windows {
        Pvc => "PVC" = 450,
        Aluminium => "ALUMINIUM" = 750,
        Wood => "BOIS" = 850,
        WoodAluminium => "MIXTE BOIS ALU" = 1100,
    }
}

tariff! {
    /// Electrical installation, per m² of living space.
    pub enum ElectricalGrade: Electrical {
        Standard => "STANDARD" = 80,
        Comfort => "CONFORT" = 110,
        HomeAutomation => "DOMOTIQUE" = 160,
    }
}

tariff! {
    /// Plumbing, per water point.
    pub enum PlumbingGrade: Plumbing {
        Standard => "STANDARD" = 800,
        Comfort => "CONFORT" = 1200,
        HighEnd => "HAUT DE GAMME" = 1800,
    }
}

tariff! {
    /// Heating system, per m² heated.
    pub enum HeatingSystem: Heating {
        ElectricRadiators => "RADIATEURS ELECTRIQUES" = 45,
        WoodStove => "POELE A BOIS" = 60,
        GasBoiler => "CHAUDIERE GAZ" = 85,
        UnderfloorHeating => "PLANCHER CHAUFFANT" = 95,
        HeatPump => "POMPE A CHALEUR" = 120,
    }
}

tariff! {
    /// Floor coverings, plaster and paint, per m².
    pub enum FinishGrade: Finishes {
        Budget => "ECONOMIQUE" = 40,
        Standard => "STANDARD" = 70,
        HighEnd => "HAUT DE GAMME" = 120,
    }
}

pub fn calculate_windows_cost(
    selection: &str,
    count: impl Into<Quantity>,
) -> Decimal {
    unit_line::<WindowFrame>(selection, count.into()).amount
}

pub fn calculate_electrical_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<ElectricalGrade>(selection, area.into()).amount
}

pub fn calculate_plumbing_cost(
    selection: &str,
    water_points: impl Into<Quantity>,
) -> Decimal {
    unit_line::<PlumbingGrade>(selection, water_points.into()).amount
}

pub fn calculate_heating_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<HeatingSystem>(selection, area.into()).amount
}

pub fn calculate_finishes_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<FinishGrade>(selection, area.into()).amount
}
