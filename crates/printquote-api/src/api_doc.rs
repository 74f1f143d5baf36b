//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use printquote_core::models::{PricingSummary, QuoteCalculation, QuoteResponse, RateEntry};

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PrintQuote API",
        version = "0.1.0",
        description = "Instant 3D-printing quotes: upload a mesh, the service slices it, reads the estimated print time from the G-code and prices it by material and color. Endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::quote::create_quote,
        handlers::pricing::get_pricing,
    ),
    components(schemas(
        QuoteResponse,
        QuoteCalculation,
        PricingSummary,
        RateEntry,
        ErrorResponse,
        handlers::quote::QuoteForm,
    )),
    tags(
        (name = "quotes", description = "Print time estimation and pricing")
    )
)]
struct ApiDoc;
