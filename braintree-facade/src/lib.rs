#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types and facade for the Braintree payment gateway.
//!
//! This crate wraps a Braintree gateway client behind a small facade that
//! validates merchant credentials, builds request payloads from an immutable
//! options builder and normalises gateway answers into a `{ status, result }`
//! envelope. It does not talk HTTP itself: the client is injected, and
//! `braintree-facade-http` provides the production implementation.
//!
//! # Modules
//!
//! - [`amount`] - Two-decimal currency amounts
//! - [`config`] - Environments, raw configuration and validated credentials
//! - [`error`] - Facade error type
//! - [`facade`] - The [`BraintreeFacade`] itself
//! - [`gateway`] - Capability traits implemented by gateway clients
//! - [`options`] - The [`TransactionOptions`] request builder
//! - [`request`] - Request payloads sent to the gateway
//! - [`types`] - Vendor objects and result envelopes
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation of facade operations
//!
//! # Example
//!
//! ```rust,ignore
//! use braintree_facade::{BraintreeFacade, ChargeOptions, CreditCard, TransactionOptions};
//!
//! let facade = BraintreeFacade::initialize(credentials, client).await?;
//! let options = TransactionOptions::new()
//!     .with_amount("19.99".parse()?)
//!     .with_credit_card(CreditCard::new("4111111111111111").with_cvv("123"));
//! let outcome = facade.single_charge(&options, ChargeOptions::default()).await?;
//! assert!(outcome.status);
//! ```

pub mod amount;
pub mod config;
pub mod error;
pub mod facade;
pub mod gateway;
pub mod options;
pub mod request;
pub mod types;

pub use amount::{Amount, AmountError};
pub use config::{ConfigurationError, Credentials, Environment, GatewayConfig};
pub use error::FacadeError;
pub use facade::BraintreeFacade;
pub use gateway::{GatewayClient, GatewayError};
pub use options::{AddressFields, CreditCard, CustomerFields, OptionsError, TransactionOptions};
pub use request::ChargeOptions;
pub use types::{GatewayResult, Outcome};
