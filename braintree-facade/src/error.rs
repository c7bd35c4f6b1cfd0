//! Error type returned by facade operations.

use crate::config::ConfigurationError;
use crate::gateway::GatewayError;
use crate::options::OptionsError;

/// Errors returned by [`BraintreeFacade`](crate::facade::BraintreeFacade).
///
/// Unsuccessful gateway results are not errors: they come back as an
/// [`Outcome`](crate::types::Outcome) with `status == false`.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    /// Credentials were incomplete.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Transaction options could not be interpreted.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// The operation needs a field the options do not carry.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An argument was rejected before contacting the gateway.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The gateway client failed.
    #[error("gateway error: {0}")]
    Gateway(#[source] GatewayError),
}

impl FacadeError {
    /// Returns `true` when the error came from the gateway client.
    #[must_use]
    pub const fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}
