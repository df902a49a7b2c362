//! Structural trades: groundwork, demolition, walls, roof and insulation.

use rust_decimal::Decimal;

use crate::pricing::{Quantity, unit_line};

tariff! {
    /// Site preparation, per m² of plot.
    pub enum TerrainKind: Terrain {
        Flat => "TERRAIN PLAT" = 15,
        GentleSlope => "LEGERE PENTE" = 35,
        SteepSlope => "FORTE PENTE" = 60,
        Rocky => "TERRAIN ROCHEUX" = 85,
    }
}

tariff! {
    /// Demolition work, per m² of floor.
    pub enum DemolitionKind: Demolition {
        StripOut => "CURAGE" = 45,
        Partial => "PARTIELLE" = 60,
        Total => "TOTALE" = 95,
    }
}

tariff! {
    /// Wall construction, per m² of wall.
    pub enum MasonryMaterial: Masonry {
        ConcreteBlock => "PARPAING" = 90,
        Brick => "BRIQUE" = 110,
        AeratedConcrete => "BETON CELLULAIRE" = 105,
        TimberFrame => "OSSATURE BOIS" = 130,
        Stone => "PIERRE" = 220,
    }
}

tariff! {
    /// New-build roof covering, per m².
    pub enum RoofingMaterial: Roofing {
        Tiles => "TUILES" = 120,
        Slate => "ARDOISE" = 180,
        Zinc => "ZINC" = 150,
        SteelSheet => "BAC ACIER" = 85,
        FlatRoof => "TOIT TERRASSE" = 140,
    }
}

tariff! {
    /// Replacement of an existing roof covering, per m².
    pub enum RoofingRenovMaterial: Roofing {
        Tiles => "TUILES" = 110,
        Slate => "ARDOISE" = 180,
        Zinc => "ZINC" = 160,
        SteelSheet => "BAC ACIER" = 95,
        FlatRoof => "TOIT TERRASSE" = 150,
    }
}

tariff! {
    /// Insulation, per m² of insulated surface.
    pub enum InsulationMaterial: Insulation {
        GlassWool => "LAINE DE VERRE" = 25,
        RockWool => "LAINE DE ROCHE" = 30,
        Polyurethane => "POLYURETHANE" = 40,
        Cellulose => "OUATE DE CELLULOSE" = 35,
        WoodFibre => "FIBRE DE BOIS" = 45,
    }
}

pub fn calculate_terrain_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<TerrainKind>(selection, area.into()).amount
}

pub fn calculate_demolition_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<DemolitionKind>(selection, area.into()).amount
}

pub fn calculate_masonry_cost(
    selection: &str,
    wall_area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<MasonryMaterial>(selection, wall_area.into()).amount
}

pub fn calculate_roofing_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<RoofingMaterial>(selection, area.into()).amount
}

pub fn calculate_roofing_renov_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<RoofingRenovMaterial>(selection, area.into()).amount
}

pub fn calculate_insulation_cost(
    selection: &str,
    area: impl Into<Quantity>,
) -> Decimal {
    unit_line::<InsulationMaterial>(selection, area.into()).amount
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn roofing_renov_slate_is_idempotent() {
        let first = calculate_roofing_renov_cost("ARDOISE", 50);
        let second = calculate_roofing_renov_cost("ARDOISE", 50);

        assert_eq!(first, dec!(9000));
        assert_eq!(first, second);
    }

    #[test]
    fn roofing_new_build_slate() {
        assert_eq!(calculate_roofing_cost("ARDOISE", 100), dec!(18000));
    }

    #[test]
    fn roofing_tables_differ_for_renovation() {
        assert_eq!(calculate_roofing_cost("TUILES", 10), dec!(1200));
        assert_eq!(calculate_roofing_renov_cost("TUILES", 10), dec!(1100));
    }

    #[test]
    fn terrain_uses_area() {
        assert_eq!(calculate_terrain_cost("FORTE PENTE", "250"), dec!(15000));
    }

    #[test]
    fn demolition_partial() {
        assert_eq!(calculate_demolition_cost("PARTIELLE", 40), dec!(2400));
    }

    #[test]
    fn masonry_accepts_fractional_areas() {
        assert_eq!(calculate_masonry_cost("BRIQUE", "12,5"), dec!(1375));
    }

    #[test]
    fn insulation_unknown_material_is_zero() {
        assert_eq!(calculate_insulation_cost("PAILLE", 100), dec!(0));
    }

    #[test]
    fn empty_area_is_zero() {
        assert_eq!(calculate_roofing_cost("ZINC", ""), dec!(0));
        assert_eq!(calculate_terrain_cost("TERRAIN PLAT", "n/a"), dec!(0));
    }
}
