//! Vendor objects returned by the gateway.
//!
//! These types mirror the gateway's own resources. The facade never
//! transforms them: whatever the client returns is handed back to the caller.
//! Each resource keeps fields this crate does not model in an `extra` map so
//! nothing the gateway sends is lost. Monetary fields are plain [`Decimal`]s
//! so the gateway's formatting (e.g. `"1000"` for JPY) survives a round trip.
//! Absent fields are omitted on serialization rather than written as `null`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A field-level validation error reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Attribute the error refers to (e.g. `"number"`).
    #[serde(default)]
    pub attribute: String,
    /// Gateway error code (e.g. `"81715"`).
    #[serde(default)]
    pub code: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// The gateway's result object for a create/sale call.
///
/// `success` is the gateway's own verdict. An unsuccessful result may still
/// carry its `target`: a sale declined by the processor returns the declined
/// transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResult<T> {
    /// Whether the gateway accepted the request.
    pub success: bool,
    /// The created or affected resource, when the gateway returned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<T>,
    /// Summary message for unsuccessful results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Validation errors for unsuccessful results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl<T> GatewayResult<T> {
    /// Creates a successful result around `target`.
    #[must_use]
    pub const fn successful(target: T) -> Self {
        Self {
            success: true,
            target: Some(target),
            message: None,
            errors: Vec::new(),
        }
    }

    /// Creates an unsuccessful result with a message and no target.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            target: None,
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }

    /// Attaches the resource the gateway returned alongside a failure.
    #[must_use]
    pub fn with_target(mut self, target: T) -> Self {
        self.target = Some(target);
        self
    }

    /// Appends validation errors.
    #[must_use]
    pub fn with_errors(mut self, errors: impl IntoIterator<Item = ValidationError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Normalised `{ status, result }` envelope returned by facade operations.
///
/// `status` is `result.success` and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// Copy of the gateway's success flag.
    pub status: bool,
    /// The gateway's result, unmodified.
    pub result: GatewayResult<T>,
}

impl<T> From<GatewayResult<T>> for Outcome<T> {
    fn from(result: GatewayResult<T>) -> Self {
        Self {
            status: result.success,
            result,
        }
    }
}

/// Card details embedded in transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Vault token, if the card was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// First six digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    /// Last four digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    /// Card brand (e.g. `"Visa"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    /// Expiration date as `MM/YYYY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// Cardholder name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
}

/// A gateway transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction id.
    pub id: String,
    /// Lifecycle status (e.g. `"submitted_for_settlement"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `"sale"` or `"credit"`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Charged amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_iso_code: Option<String>,
    /// Merchant account the transaction was processed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<String>,
    /// Fee collected by the master merchant, for sub-merchant sales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee_amount: Option<Decimal>,
    /// Processor response code (e.g. `"1000"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor_response_code: Option<String>,
    /// Processor response text (e.g. `"Approved"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor_response_text: Option<String>,
    /// Card used for the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CardDetails>,
    /// Creation timestamp as sent by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A credit card stored in the vault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultCreditCard {
    /// Vault token.
    pub token: String,
    /// Owning customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// First six digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    /// Last four digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    /// Card brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    /// Expiration month, `MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<String>,
    /// Expiration year, `YYYY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<String>,
    /// Cardholder name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    /// Whether this is the customer's default payment method.
    #[serde(default)]
    pub default: bool,
    /// Billing address attached to the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An address stored on a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    /// Apartment, suite, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_address: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// State or province.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Two letter country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code_alpha2: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A customer stored in the vault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer id.
    pub id: String,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Stored cards.
    #[serde(default)]
    pub credit_cards: Vec<VaultCreditCard>,
    /// Stored addresses.
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A (sub-)merchant account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAccount {
    /// Merchant account id.
    pub id: String,
    /// Onboarding status (e.g. `"pending"`, `"active"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_iso_code: Option<String>,
    /// Id of the master merchant account this account belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_merchant_account_id: Option<String>,
    /// Fields not modelled above (`individual`, `business`, `funding`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recurring billing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Plan id.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price per billing cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_iso_code: Option<String>,
    /// Billing frequency in months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_frequency: Option<u32>,
    /// Number of billing cycles, `None` for never-ending plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_billing_cycles: Option<u32>,
    /// Whether the plan starts with a trial period.
    #[serde(default)]
    pub trial_period: bool,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single-use nonce for a vaulted payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodNonce {
    /// The nonce string.
    pub nonce: String,
    /// Payment method type (e.g. `"CreditCard"`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Whether the nonce has already been consumed.
    #[serde(default)]
    pub consumed: bool,
    /// Fields not modelled above (`details`, `threeDSecureInfo`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client-side authorization token handed to browser or mobile code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientToken(String);

impl ClientToken {
    /// Wraps a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
