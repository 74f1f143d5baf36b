use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of pricing one print: derived, never persisted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Human-readable duration the price was computed from
    pub print_time: String,
    pub print_hours: f64,
    pub material: String,
    pub color: String,
    pub total: u64,
}

/// Success body returned by the quote endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub print_time: String,
    pub estimated_price: u64,
    pub original_name: String,
    pub calculation: QuoteCalculation,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCalculation {
    /// Printed hours formatted with two decimals
    pub print_hours: String,
    pub material: String,
    pub color: String,
}

impl QuoteResponse {
    pub fn from_quote(quote: PriceQuote, original_name: impl Into<String>) -> Self {
        Self {
            success: true,
            print_time: quote.print_time,
            estimated_price: quote.total,
            original_name: original_name.into(),
            calculation: QuoteCalculation {
                print_hours: format!("{:.2}", quote.print_hours),
                material: quote.material,
                color: quote.color,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let quote = PriceQuote {
            print_time: "2h 30m 15s".to_string(),
            print_hours: 2.504166,
            material: "PLA".to_string(),
            color: "화이트".to_string(),
            total: 40033,
        };
        let json = serde_json::to_value(QuoteResponse::from_quote(quote, "benchy.stl")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["printTime"], "2h 30m 15s");
        assert_eq!(json["estimatedPrice"], 40033);
        assert_eq!(json["originalName"], "benchy.stl");
        assert_eq!(json["calculation"]["printHours"], "2.50");
        assert_eq!(json["calculation"]["material"], "PLA");
        assert_eq!(json["calculation"]["color"], "화이트");
    }
}
