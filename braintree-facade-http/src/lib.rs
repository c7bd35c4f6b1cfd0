#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP gateway client for the Braintree facade.
//!
//! Provides [`HttpGatewayClient`], a `reqwest`-based implementation of every
//! capability trait in [`braintree_facade::gateway`].
//!
//! # Example
//!
//! ```rust,ignore
//! use braintree_facade::{BraintreeFacade, Credentials, Environment};
//! use braintree_facade_http::HttpGatewayClient;
//!
//! let credentials = Credentials::new(Environment::Sandbox, "merchant", "public", "private")?;
//! let client = HttpGatewayClient::new(credentials.clone())?;
//! let facade = BraintreeFacade::initialize(credentials, client).await?;
//! let plans = facade.get_plan_ids().await?;
//! ```
//!
//! # Feature Flags
//!
//! - `telemetry` - Records a tracing span per gateway call

pub mod client;
pub mod constants;
pub mod error;

pub use client::HttpGatewayClient;
pub use error::HttpGatewayError;
