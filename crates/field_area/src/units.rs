use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// Square meters per hectare
pub const SQ_METERS_PER_HECTARE: f64 = 10_000.0;
/// Square meters per international acre, as used for land records
pub const SQ_METERS_PER_ACRE: f64 = 4_046.86;
/// A gunta is 1/40 of an acre
pub const GUNTAS_PER_ACRE: f64 = 40.0;
pub const SQ_FEET_PER_SQ_METER: f64 = 10.7639;
/// Stored records only carry hectare/acre/gunta; square feet is rebuilt from gunta
pub const SQ_FEET_PER_GUNTA: f64 = 1_089.0;

/// Land-area units reported for a field
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AreaUnit {
    Hectare,
    Acre,
    Gunta,
    #[serde(rename = "sqft")]
    #[strum(serialize = "sqft")]
    SquareFeet,
}

impl AreaUnit {
    /// Convert an unrounded area in square meters to this unit
    pub fn from_square_meters(self, area_m2: f64) -> f64 {
        match self {
            Self::Hectare => area_m2 / SQ_METERS_PER_HECTARE,
            Self::Acre => area_m2 / SQ_METERS_PER_ACRE,
            Self::Gunta => area_m2 / SQ_METERS_PER_ACRE * GUNTAS_PER_ACRE,
            Self::SquareFeet => area_m2 * SQ_FEET_PER_SQ_METER,
        }
    }

    /// Decimal places kept in an [`crate::AreaReport`]
    pub fn precision(self) -> i32 {
        match self {
            Self::SquareFeet => 2,
            _ => 4,
        }
    }

    /// Convert and round for the output boundary
    pub fn report_value(self, area_m2: f64) -> f64 {
        round_to(self.from_square_meters(area_m2), self.precision())
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Hectare => "ha",
            Self::Acre => "ac",
            Self::Gunta => "gunta",
            Self::SquareFeet => "ft²",
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
