//! HTTP-level constants for the Braintree gateway API.

use std::time::Duration;

/// Header carrying the gateway API version.
pub const API_VERSION_HEADER: &str = "X-ApiVersion";

/// Gateway API version spoken by this client.
pub const API_VERSION: &str = "6";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("braintree-facade-rust/", env!("CARGO_PKG_VERSION"));

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Top-level key of an unsuccessful (422) response body.
pub const API_ERROR_RESPONSE_KEY: &str = "apiErrorResponse";

/// Client token version requested from the gateway.
pub const CLIENT_TOKEN_VERSION: u8 = 2;
