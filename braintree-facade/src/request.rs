//! Request payloads handed to the gateway client.
//!
//! Each payload is the exact body of one gateway call, serialized with the
//! gateway's camelCase field names. Optional fields that are unset are left
//! out of the body entirely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::amount::Amount;
use crate::options::{AddressFields, CreditCard, CustomerFields, TransactionOptions};

/// Settlement and vault flags of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeOptions {
    /// Submit the authorization for settlement right away.
    pub submit_for_settlement: bool,
    /// Store the payment method in the vault when the sale succeeds.
    pub store_in_vault_on_success: bool,
}

impl Default for ChargeOptions {
    fn default() -> Self {
        Self {
            submit_for_settlement: true,
            store_in_vault_on_success: true,
        }
    }
}

/// Body of a sale (`Transaction::sale`) call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Amount to charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Raw card details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCard>,
    /// Tokenized payment method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_nonce: Option<String>,
    /// Vault customer to charge or attach to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Inline customer details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerFields>,
    /// Billing address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<AddressFields>,
    /// Sub-merchant account to process the sale under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<String>,
    /// Fee kept by the master merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee_amount: Option<Amount>,
    /// Settlement and vault flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ChargeOptions>,
    /// Any other gateway transaction field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SaleRequest {
    /// Builds a sale from transaction options plus charge flags.
    #[must_use]
    pub fn from_options(options: &TransactionOptions, flags: ChargeOptions) -> Self {
        Self {
            amount: options.amount(),
            credit_card: options.credit_card().cloned(),
            payment_method_nonce: options.payment_method_nonce().map(str::to_owned),
            customer_id: options.customer_id().map(str::to_owned),
            customer: options.customer().cloned(),
            billing: options.billing().cloned(),
            merchant_account_id: None,
            service_fee_amount: None,
            options: Some(flags),
            extra: options.extra().clone(),
        }
    }

    /// Builds a nonce sale that is submitted for settlement and vaulted on
    /// success.
    #[must_use]
    pub fn with_payment_nonce(amount: Amount, nonce: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            payment_method_nonce: Some(nonce.into()),
            options: Some(ChargeOptions::default()),
            ..Self::default()
        }
    }

    /// Builds a sub-merchant sale that collects a service fee.
    ///
    /// No charge flags are sent; the gateway defaults apply.
    #[must_use]
    pub fn with_service_fee(
        merchant_account_id: impl Into<String>,
        amount: Amount,
        nonce: Option<String>,
        service_fee_amount: Amount,
    ) -> Self {
        Self {
            merchant_account_id: Some(merchant_account_id.into()),
            amount: Some(amount),
            payment_method_nonce: nonce,
            service_fee_amount: Some(service_fee_amount),
            ..Self::default()
        }
    }
}

/// Body of a customer create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRequest {
    /// Customer fields.
    #[serde(flatten)]
    pub customer: CustomerFields,
}

impl CustomerRequest {
    /// Builds a customer payload from transaction options.
    ///
    /// Starts from the options' customer fields (empty when unset). A
    /// configured customer id becomes the customer's `id`.
    #[must_use]
    pub fn from_options(options: &TransactionOptions) -> Self {
        let mut customer = options.customer().cloned().unwrap_or_default();
        if let Some(id) = options.customer_id() {
            customer.id = Some(id.to_owned());
        }
        Self { customer }
    }
}

/// Body of a credit card create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardRequest {
    /// Card fields.
    #[serde(flatten)]
    pub card: CreditCard,
    /// Billing address to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AddressFields>,
    /// Owning vault customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl CreditCardRequest {
    /// Creates a request for a bare card.
    #[must_use]
    pub fn new(card: CreditCard) -> Self {
        Self {
            card,
            ..Self::default()
        }
    }

    /// Sets the owning customer.
    #[must_use]
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Sets the billing address.
    #[must_use]
    pub fn with_billing_address(mut self, address: AddressFields) -> Self {
        self.billing_address = Some(address);
        self
    }

    /// Builds a card payload from transaction options.
    ///
    /// Returns `None` when the options carry no credit card.
    #[must_use]
    pub fn from_options(options: &TransactionOptions) -> Option<Self> {
        let card = options.credit_card()?.clone();
        Some(Self {
            card,
            billing_address: options.billing().cloned(),
            customer_id: options.customer_id().map(str::to_owned),
        })
    }
}

/// Body of an address create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    /// Address fields.
    #[serde(flatten)]
    pub address: AddressFields,
    /// Owning vault customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl AddressRequest {
    /// Builds an address payload from the options' billing address.
    ///
    /// Returns `None` when the options carry no billing address.
    #[must_use]
    pub fn from_options(options: &TransactionOptions) -> Option<Self> {
        let address = options.billing()?.clone();
        Some(Self {
            address,
            customer_id: options.customer_id().map(str::to_owned),
        })
    }
}

/// Postal address used in merchant onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAddress {
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// State or province.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Individual (owner) details of a sub-merchant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualDetails {
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Date of birth, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    /// Social security number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    /// Home address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<MerchantAddress>,
}

/// Business details of a sub-merchant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    /// Registered legal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    /// "Doing business as" name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dba_name: Option<String>,
    /// Tax identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    /// Business address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<MerchantAddress>,
}

/// Where a sub-merchant's funds are paid out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingDetails {
    /// Statement descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    /// `"bank"`, `"email"` or `"mobile_phone"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Payout email, for `email` destinations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Payout phone, for `mobile_phone` destinations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    /// Bank account number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// Bank routing number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
}

/// Body of a sub-merchant account create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAccountRequest {
    /// Owner details.
    pub individual: IndividualDetails,
    /// Business details.
    pub business: BusinessDetails,
    /// Payout details.
    pub funding: FundingDetails,
    /// Whether the sub-merchant accepted the terms of service.
    pub tos_accepted: bool,
    /// Master merchant account the new account belongs to.
    pub master_merchant_account_id: String,
    /// Requested account id; the gateway generates one when `None`.
    pub id: Option<String>,
}
