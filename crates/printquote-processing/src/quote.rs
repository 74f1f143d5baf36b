//! Duration text + material + color -> price.

use printquote_core::{PriceQuote, PricingTable};
use regex::Regex;

/// Converts duration text into hours and prices it against a [`PricingTable`].
///
/// Each unit is read independently as the first integer directly followed by its
/// suffix, so `"45m 0s"` and `"2h 30m 15s"` both work and text with no recognizable
/// component is zero hours. Only `h`, `m` and `s` are read.
#[derive(Debug, Clone)]
pub struct QuoteCalculator {
    pricing: PricingTable,
    hours: Regex,
    minutes: Regex,
    seconds: Regex,
}

impl QuoteCalculator {
    pub fn new(pricing: PricingTable) -> Result<Self, regex::Error> {
        Ok(Self {
            pricing,
            hours: Regex::new(r"(\d+)h")?,
            minutes: Regex::new(r"(\d+)m")?,
            seconds: Regex::new(r"(\d+)s")?,
        })
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn duration_hours(&self, duration: &str) -> f64 {
        let component = |re: &Regex| -> f64 {
            re.captures(duration)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };

        component(&self.hours)
            + component(&self.minutes) / 60.0
            + component(&self.seconds) / 3600.0
    }

    /// Price a print whose duration is given as text.
    pub fn quote(&self, duration: &str, material: &str, color: &str) -> PriceQuote {
        let hours = self.duration_hours(duration);
        self.quote_hours(duration, hours, material, color)
    }

    /// Price an already known number of hours; `print_time` is reported as given.
    pub fn quote_hours(
        &self,
        print_time: &str,
        hours: f64,
        material: &str,
        color: &str,
    ) -> PriceQuote {
        let rate = self.pricing.material_rate(material);
        let surcharge = self.pricing.color_surcharge(color);
        let raw = hours * f64::from(rate)
            + f64::from(surcharge)
            + f64::from(self.pricing.base_material_cost);
        // Inputs are non-negative, so the cast cannot wrap.
        let total = raw.round().max(0.0) as u64;

        tracing::debug!(
            print_time = %print_time,
            print_hours = hours,
            material = %material,
            color = %color,
            rate,
            surcharge,
            total,
            "Quote computed"
        );

        PriceQuote {
            print_time: print_time.to_string(),
            print_hours: hours,
            material: material.to_string(),
            color: color.to_string(),
            total,
        }
    }
}
