//! Transaction options builder.
//!
//! [`TransactionOptions`] collects the fields a charge, customer, card or
//! address operation needs. It is an owned value: every setter consumes the
//! builder and returns the updated one, and each facade operation borrows the
//! builder it is given. Nothing is carried over between operations.
//!
//! ```rust
//! use braintree_facade::options::{CreditCard, TransactionOptions};
//!
//! let options = TransactionOptions::new()
//!     .with_credit_card(CreditCard::new("4111111111111111").with_cvv("123"))
//!     .with_options(serde_json::json!({ "amount": 10 }))
//!     .unwrap();
//! assert_eq!(options.amount().unwrap().to_string(), "10.00");
//! assert_eq!(options.credit_card().unwrap().number, "4111111111111111");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::amount::{Amount, AmountError};

/// Errors raised while merging a generic field bag into [`TransactionOptions`].
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The bag was not a JSON object.
    #[error("options must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    /// The `amount` value could not be turned into an [`Amount`].
    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),
    /// The `amount` value was neither a number nor a string.
    #[error("amount must be a number or a string")]
    AmountType,
    /// A credit card bag had no `number`.
    #[error("credit card number is required")]
    MissingCardNumber,
    /// A routed key held a value of the wrong shape.
    #[error("invalid value for {key:?}: {source}")]
    InvalidField {
        /// The offending key.
        key: &'static str,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Credit card fields for a charge or a vault operation.
///
/// Use either `expiration_month` + `expiration_year` or `expiration_date`,
/// not both; the gateway decides what to do with conflicting values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    /// Card number.
    pub number: String,
    /// Security code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    /// Expiration month, `MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<String>,
    /// Expiration year, `YYYY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<String>,
    /// Expiration date, `MM/YYYY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// Cardholder name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    /// Vault token to assign when the card is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl CreditCard {
    /// Optional fields copied by [`CreditCard::from_fields`].
    pub const OPTIONAL_FIELDS: [&'static str; 6] = [
        "cvv",
        "expirationMonth",
        "expirationYear",
        "expirationDate",
        "cardholderName",
        "token",
    ];

    /// Creates a card with only a number.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            ..Self::default()
        }
    }

    /// Sets the security code.
    #[must_use]
    pub fn with_cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }

    /// Sets expiration month (`MM`) and year (`YYYY`).
    #[must_use]
    pub fn with_expiration(mut self, month: impl Into<String>, year: impl Into<String>) -> Self {
        self.expiration_month = Some(month.into());
        self.expiration_year = Some(year.into());
        self
    }

    /// Sets the composite expiration date (`MM/YYYY`).
    #[must_use]
    pub fn with_expiration_date(mut self, date: impl Into<String>) -> Self {
        self.expiration_date = Some(date.into());
        self
    }

    /// Sets the cardholder name.
    #[must_use]
    pub fn with_cardholder_name(mut self, name: impl Into<String>) -> Self {
        self.cardholder_name = Some(name.into());
        self
    }

    /// Builds a card from a generic field bag.
    ///
    /// `number` is required. Of the [`OPTIONAL_FIELDS`](Self::OPTIONAL_FIELDS),
    /// only those present and non-null are copied; numbers are accepted and
    /// kept as their decimal text. Any other key is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::MissingCardNumber`] if `number` is absent or
    /// null, and [`OptionsError::NotAnObject`] if `fields` is not an object.
    pub fn from_fields(fields: &Value) -> Result<Self, OptionsError> {
        let Value::Object(map) = fields else {
            return Err(OptionsError::NotAnObject(json_kind(fields)));
        };
        let number = map
            .get("number")
            .and_then(scalar_text)
            .ok_or(OptionsError::MissingCardNumber)?;

        let mut card = Self::new(number);
        for name in Self::OPTIONAL_FIELDS {
            let Some(value) = map.get(name).and_then(scalar_text) else {
                continue;
            };
            let slot = match name {
                "cvv" => &mut card.cvv,
                "expirationMonth" => &mut card.expiration_month,
                "expirationYear" => &mut card.expiration_year,
                "expirationDate" => &mut card.expiration_date,
                "cardholderName" => &mut card.cardholder_name,
                _ => &mut card.token,
            };
            *slot = Some(value);
        }
        Ok(card)
    }
}

/// Returns the text of a string or number value; `None` for null and
/// compound values.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Address fields for billing addresses and stored addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
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
    /// Any other gateway address field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Customer fields for vault customer creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFields {
    /// Customer id to assign; the gateway generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
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
    /// Website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Any other gateway customer field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields for one charge, customer, card or address operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionOptions {
    amount: Option<Amount>,
    credit_card: Option<CreditCard>,
    billing: Option<AddressFields>,
    customer: Option<CustomerFields>,
    customer_id: Option<String>,
    payment_method_nonce: Option<String>,
    extra: Map<String, Value>,
}

impl TransactionOptions {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the amount to charge. The amount is already rounded to two
    /// decimal places by [`Amount`].
    #[must_use]
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the credit card.
    #[must_use]
    pub fn with_credit_card(mut self, card: CreditCard) -> Self {
        self.credit_card = Some(card);
        self
    }

    /// Sets the billing address.
    #[must_use]
    pub fn with_billing(mut self, billing: AddressFields) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Sets the customer fields.
    #[must_use]
    pub fn with_customer(mut self, customer: CustomerFields) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Sets the vault customer id.
    #[must_use]
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Sets the payment method nonce.
    #[must_use]
    pub fn with_payment_method_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.payment_method_nonce = Some(nonce.into());
        self
    }

    /// Sets an arbitrary gateway field, passed through verbatim.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Merges a generic field bag into the builder.
    ///
    /// `amount` goes through [`Amount`] rounding and `creditCard` through
    /// [`CreditCard::from_fields`]. `billing`, `customer`, `customerId` and
    /// `paymentMethodNonce` are parsed into their typed slots. Every other key
    /// is kept as given. Later values replace earlier ones. A routed key set to
    /// null clears its slot. A null bag or an empty object leaves the builder
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError`] if `values` is not an object or a routed key
    /// holds a malformed value.
    pub fn with_options(mut self, values: Value) -> Result<Self, OptionsError> {
        let map = match values {
            Value::Null => return Ok(self),
            Value::Object(map) => map,
            other => return Err(OptionsError::NotAnObject(json_kind(&other))),
        };

        for (key, value) in map {
            match key.as_str() {
                "amount" if value.is_null() => self.amount = None,
                "amount" => self.amount = Some(parse_amount(&value)?),
                "creditCard" if value.is_null() => self.credit_card = None,
                "creditCard" => self.credit_card = Some(CreditCard::from_fields(&value)?),
                "billing" => self.billing = parse_field("billing", value)?,
                "customer" => self.customer = parse_field("customer", value)?,
                "customerId" => self.customer_id = parse_field("customerId", value)?,
                "paymentMethodNonce" => {
                    self.payment_method_nonce = parse_field("paymentMethodNonce", value)?;
                }
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
        Ok(self)
    }

    /// Returns the amount, if set.
    #[must_use]
    pub const fn amount(&self) -> Option<Amount> {
        self.amount
    }

    /// Returns the credit card, if set.
    #[must_use]
    pub const fn credit_card(&self) -> Option<&CreditCard> {
        self.credit_card.as_ref()
    }

    /// Returns the billing address, if set.
    #[must_use]
    pub const fn billing(&self) -> Option<&AddressFields> {
        self.billing.as_ref()
    }

    /// Returns the customer fields, if set.
    #[must_use]
    pub const fn customer(&self) -> Option<&CustomerFields> {
        self.customer.as_ref()
    }

    /// Returns the vault customer id, if set.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    /// Returns the payment method nonce, if set.
    #[must_use]
    pub fn payment_method_nonce(&self) -> Option<&str> {
        self.payment_method_nonce.as_deref()
    }

    /// Returns the pass-through fields.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn parse_amount(value: &Value) -> Result<Amount, OptionsError> {
    match value {
        Value::Number(n) => Ok(n.to_string().parse::<Amount>()?),
        Value::String(s) => Ok(s.parse::<Amount>()?),
        _ => Err(OptionsError::AmountType),
    }
}

fn parse_field<T>(key: &'static str, value: Value) -> Result<T, OptionsError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|source| OptionsError::InvalidField { key, source })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_card_then_amount_do_not_mix() {
        let options = TransactionOptions::new()
            .with_credit_card(CreditCard::new("4111111111111111").with_cvv("123"))
            .with_options(json!({ "amount": 10 }))
            .unwrap();

        assert_eq!(options.amount(), Some(Amount::from(10)));
        let card = options.credit_card().unwrap();
        assert_eq!(card, &CreditCard::new("4111111111111111").with_cvv("123"));
        assert!(options.extra().is_empty());
    }

    #[test]
    fn test_with_options_routes_amount_through_rounding() {
        let options = TransactionOptions::new()
            .with_options(json!({ "amount": 19.999 }))
            .unwrap();
        assert_eq!(options.amount().unwrap().to_string(), "20.00");

        let options = TransactionOptions::new()
            .with_options(json!({ "amount": "5.5" }))
            .unwrap();
        assert_eq!(options.amount().unwrap().to_string(), "5.50");
    }

    #[test]
    fn test_with_options_routes_credit_card() {
        let options = TransactionOptions::new()
            .with_options(json!({
                "creditCard": {
                    "number": "4111111111111111",
                    "expirationDate": "05/2030",
                    "cvv": null,
                    "unknown": "dropped"
                }
            }))
            .unwrap();
        let card = options.credit_card().unwrap();
        assert_eq!(card.expiration_date.as_deref(), Some("05/2030"));
        assert_eq!(card.cvv, None);
        assert_eq!(
            serde_json::to_value(card).unwrap(),
            json!({ "number": "4111111111111111", "expirationDate": "05/2030" })
        );
    }

    #[test]
    fn test_from_fields_accepts_numbers() {
        let card = CreditCard::from_fields(&json!({
            "number": 4_111_111_111_111_111_u64,
            "cvv": 123,
            "expirationMonth": 5,
            "expirationYear": 2030
        }))
        .unwrap();
        assert_eq!(card.number, "4111111111111111");
        assert_eq!(card.cvv.as_deref(), Some("123"));
        assert_eq!(card.expiration_month.as_deref(), Some("5"));
        assert_eq!(card.expiration_year.as_deref(), Some("2030"));
    }

    #[test]
    fn test_from_fields_requires_number() {
        let err = CreditCard::from_fields(&json!({ "cvv": "123" })).unwrap_err();
        assert!(matches!(err, OptionsError::MissingCardNumber));
    }

    #[test]
    fn test_with_options_keeps_other_keys() {
        let options = TransactionOptions::new()
            .with_options(json!({
                "orderId": "A-1",
                "customerId": "cust-9",
                "paymentMethodNonce": "fake-valid-nonce",
                "billing": { "postalCode": "60622", "countryName": "United States" },
                "customer": { "email": "jane@example.com" }
            }))
            .unwrap();
        assert_eq!(options.extra()["orderId"], "A-1");
        assert_eq!(options.customer_id(), Some("cust-9"));
        assert_eq!(options.payment_method_nonce(), Some("fake-valid-nonce"));
        let billing = options.billing().unwrap();
        assert_eq!(billing.postal_code.as_deref(), Some("60622"));
        assert_eq!(billing.extra["countryName"], "United States");
        assert_eq!(
            options.customer().unwrap().email.as_deref(),
            Some("jane@example.com")
        );
    }

    #[test]
    fn test_with_options_empty_is_noop() {
        let before = TransactionOptions::new().with_amount(Amount::from(3));
        let after = before.clone().with_options(json!({})).unwrap();
        assert_eq!(before, after);
        let after = before.clone().with_options(Value::Null).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_with_options_null_routed_keys_are_absent() {
        let options = TransactionOptions::new()
            .with_customer_id("cust-1")
            .with_options(json!({
                "amount": 5,
                "paymentMethodNonce": null,
                "customerId": null,
                "billing": null,
                "customer": null,
                "creditCard": null
            }))
            .unwrap();

        assert_eq!(options.amount(), Some(Amount::from(5)));
        assert_eq!(options.payment_method_nonce(), None);
        assert_eq!(options.customer_id(), None);
        assert!(options.billing().is_none());
        assert!(options.customer().is_none());
        assert!(options.credit_card().is_none());
        assert!(options.extra().is_empty());
    }

    #[test]
    fn test_with_options_rejects_bad_shapes() {
        assert!(matches!(
            TransactionOptions::new().with_options(json!([1, 2])),
            Err(OptionsError::NotAnObject("an array"))
        ));
        assert!(matches!(
            TransactionOptions::new().with_options(json!({ "amount": true })),
            Err(OptionsError::AmountType)
        ));
        assert!(matches!(
            TransactionOptions::new().with_options(json!({ "amount": -4 })),
            Err(OptionsError::Amount(AmountError::Negative(_)))
        ));
        assert!(matches!(
            TransactionOptions::new().with_options(json!({ "customerId": 7 })),
            Err(OptionsError::InvalidField { key: "customerId", .. })
        ));
    }
}
