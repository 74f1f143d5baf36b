use serde::Serialize;
use utoipa::ToSchema;

/// Fixed pricing data: hourly material rates, flat color surcharges and a base cost.
///
/// All amounts are whole currency units (KRW).
#[derive(Debug, Clone, Copy)]
pub struct PricingTable {
    pub materials: &'static [(&'static str, u32)],
    pub colors: &'static [(&'static str, u32)],
    /// Hourly rate applied when the material identifier is not in the table.
    pub default_material_rate: u32,
    /// Added to every quote regardless of material, color or duration.
    pub base_material_cost: u32,
}

pub const STANDARD_PRICING: PricingTable = PricingTable {
    materials: &[
        ("PLA", 8000),
        ("PETG", 9000),
        ("ABS", 10000),
        ("ASA", 11000),
        ("TPU", 12000),
    ],
    colors: &[
        ("화이트", 0),
        ("블랙", 0),
        ("그레이", 1000),
        ("컬러", 2000),
        ("투명", 3000),
    ],
    default_material_rate: 10000,
    base_material_cost: 20000,
};

impl PricingTable {
    /// Hourly rate for a material. Identifiers match exactly; anything else gets the default rate.
    pub fn material_rate(&self, material: &str) -> u32 {
        self.materials
            .iter()
            .find(|(name, _)| *name == material)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.default_material_rate)
    }

    /// Flat surcharge for a color; unknown colors cost nothing extra.
    pub fn color_surcharge(&self, color: &str) -> u32 {
        self.colors
            .iter()
            .find(|(name, _)| *name == color)
            .map(|(_, surcharge)| *surcharge)
            .unwrap_or(0)
    }

    pub fn summary(&self) -> PricingSummary {
        let entries = |table: &[(&str, u32)]| {
            table
                .iter()
                .map(|(name, amount)| RateEntry {
                    id: name.to_string(),
                    amount: *amount,
                })
                .collect()
        };

        PricingSummary {
            materials: entries(self.materials),
            colors: entries(self.colors),
            default_material_rate: self.default_material_rate,
            base_material_cost: self.base_material_cost,
        }
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        STANDARD_PRICING
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RateEntry {
    pub id: String,
    pub amount: u32,
}

/// Public view of the pricing table.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    /// Hourly rate per material
    pub materials: Vec<RateEntry>,
    /// Flat surcharge per color
    pub colors: Vec<RateEntry>,
    pub default_material_rate: u32,
    pub base_material_cost: u32,
}
