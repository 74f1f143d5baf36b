//! API paths.

pub const API_VERSION: &str = "v0";

/// Versioned prefix for every domain route.
pub const API_PREFIX: &str = "/api/v0";

/// Path used by the storefront before the API was versioned.
pub const LEGACY_QUOTE_PATH: &str = "/api/calculate-price";

pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Extra request body allowance for multipart framing and text fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub const DEFAULT_MATERIAL: &str = "PLA";
pub const DEFAULT_COLOR: &str = "화이트";
