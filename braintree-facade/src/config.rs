//! Merchant credentials and gateway environment.
//!
//! [`GatewayConfig`] is the raw configuration as it comes out of a file or the
//! process environment: every field is optional. [`Credentials`] is the
//! validated form. Converting one into the other fails fast with a
//! [`ConfigurationError`] naming the first missing attribute.
//!
//! # Example
//!
//! ```rust
//! use braintree_facade::config::{Credentials, Environment, GatewayConfig};
//!
//! let config = GatewayConfig {
//!     environment: Some(Environment::Sandbox),
//!     merchant_id: Some("merchant".into()),
//!     public_key: Some("public".into()),
//!     private_key: Some("private".into()),
//!     ..GatewayConfig::default()
//! };
//! let credentials = Credentials::try_from(config).unwrap();
//! assert_eq!(credentials.merchant_id(), "merchant");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Master merchant account used by [`create_merchant`] when none is configured.
///
/// [`create_merchant`]: crate::facade::BraintreeFacade::create_merchant
pub const DEFAULT_MASTER_MERCHANT_ACCOUNT_ID: &str = "masterMerchantAccount";

/// Gateway environment the merchant credentials belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Test environment, no real money moves.
    Sandbox,
    /// Live environment.
    Production,
    /// Locally running gateway, used for development only.
    Development,
}

impl Environment {
    /// Returns the lowercase name of the environment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
            Self::Development => "development",
        }
    }

    /// Returns the gateway base URL for this environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.sandbox.braintreegateway.com",
            Self::Production => "https://api.braintreegateway.com",
            Self::Development => "http://localhost:3000",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            _ => Err(ConfigurationError::UnknownEnvironment(s.to_owned())),
        }
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

/// Errors raised while validating gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// A required credential attribute was absent or blank.
    #[error("\"Credentials::{0}\" cannot be empty.")]
    MissingAttribute(&'static str),
    /// The environment name is not one of `sandbox`, `production`, `development`.
    #[error("unknown gateway environment {0:?}")]
    UnknownEnvironment(String),
}

/// Raw gateway configuration, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway environment.
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Merchant identifier.
    #[serde(default)]
    pub merchant_id: Option<String>,

    /// Public API key.
    #[serde(default)]
    pub public_key: Option<String>,

    /// Private API key.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Master merchant account that sub-merchants are created under.
    #[serde(default)]
    pub master_merchant_account_id: Option<String>,

    /// Overrides the environment's base URL (proxies, local fakes).
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Validated merchant credentials.
///
/// Immutable once built. The private key is redacted from [`Debug`] output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    environment: Environment,
    merchant_id: String,
    public_key: String,
    private_key: String,
    master_merchant_account_id: Option<String>,
}

impl Credentials {
    /// Creates credentials from the four required attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingAttribute`] if any attribute is
    /// blank, checked in the order `merchant_id`, `public_key`, `private_key`.
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        Self::try_from(GatewayConfig {
            environment: Some(environment),
            merchant_id: Some(merchant_id.into()),
            public_key: Some(public_key.into()),
            private_key: Some(private_key.into()),
            ..GatewayConfig::default()
        })
    }

    /// Sets the master merchant account used for sub-merchant creation.
    #[must_use]
    pub fn with_master_merchant_account_id(mut self, id: impl Into<String>) -> Self {
        self.master_merchant_account_id = Some(id.into());
        self
    }

    /// Returns the gateway environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the merchant identifier.
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Returns the public API key.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Returns the private API key.
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Returns the master merchant account id, falling back to
    /// [`DEFAULT_MASTER_MERCHANT_ACCOUNT_ID`].
    #[must_use]
    pub fn master_merchant_account_id(&self) -> &str {
        self.master_merchant_account_id
            .as_deref()
            .unwrap_or(DEFAULT_MASTER_MERCHANT_ACCOUNT_ID)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field(
                "master_merchant_account_id",
                &self.master_merchant_account_id,
            )
            .finish()
    }
}

fn required(value: Option<String>, attribute: &'static str) -> Result<String, ConfigurationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigurationError::MissingAttribute(attribute)),
    }
}

impl TryFrom<GatewayConfig> for Credentials {
    type Error = ConfigurationError;

    fn try_from(config: GatewayConfig) -> Result<Self, Self::Error> {
        let merchant_id = required(config.merchant_id, "merchant_id")?;
        let public_key = required(config.public_key, "public_key")?;
        let private_key = required(config.private_key, "private_key")?;
        let environment = config
            .environment
            .ok_or(ConfigurationError::MissingAttribute("environment"))?;
        let master_merchant_account_id = config
            .master_merchant_account_id
            .filter(|id| !id.trim().is_empty());

        Ok(Self {
            environment,
            merchant_id,
            public_key,
            private_key,
            master_merchant_account_id,
        })
    }
}

impl TryFrom<&GatewayConfig> for Credentials {
    type Error = ConfigurationError;

    fn try_from(config: &GatewayConfig) -> Result<Self, Self::Error> {
        Self::try_from(config.clone())
    }
}
