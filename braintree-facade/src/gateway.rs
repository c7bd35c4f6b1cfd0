//! Capability traits implemented by gateway clients.
//!
//! Each trait covers one family of gateway calls. The facade is generic over
//! its client and only asks for the capabilities an operation needs, so a
//! test fake can implement just the traits a test exercises.
//!
//! Implementations return `Ok` for every response the gateway produced,
//! including unsuccessful [`GatewayResult`]s with validation errors. `Err` is
//! reserved for failures to reach the gateway or to understand its reply.

use crate::request::{
    AddressRequest, CreditCardRequest, CustomerRequest, MerchantAccountRequest, SaleRequest,
};
use crate::types::{
    Address, ClientToken, Customer, GatewayResult, MerchantAccount, PaymentMethodNonce, Plan,
    Transaction, VaultCreditCard,
};

/// Boxed error returned by gateway clients.
pub type GatewayError = Box<dyn std::error::Error + Send + Sync>;

/// Issues client tokens for client-side SDKs.
#[async_trait::async_trait]
pub trait GeneratesClientTokens: Send + Sync {
    /// Generates a fresh client token.
    async fn generate_client_token(&self) -> Result<ClientToken, GatewayError>;
}

/// Creates sale transactions.
#[async_trait::async_trait]
pub trait CreatesTransactions: Send + Sync {
    /// Submits a sale.
    async fn sale(&self, request: &SaleRequest) -> Result<GatewayResult<Transaction>, GatewayError>;
}

/// Looks up transactions by id.
#[async_trait::async_trait]
pub trait FindsTransactions: Send + Sync {
    /// Fetches one transaction.
    async fn find_transaction(&self, id: &str) -> Result<Transaction, GatewayError>;
}

/// Creates vault customers.
#[async_trait::async_trait]
pub trait CreatesCustomers: Send + Sync {
    /// Creates a customer.
    async fn create_customer(
        &self,
        request: &CustomerRequest,
    ) -> Result<GatewayResult<Customer>, GatewayError>;
}

/// Looks up vault customers by id.
#[async_trait::async_trait]
pub trait FindsCustomers: Send + Sync {
    /// Fetches one customer.
    async fn find_customer(&self, id: &str) -> Result<Customer, GatewayError>;
}

/// Stores credit cards in the vault.
#[async_trait::async_trait]
pub trait CreatesCreditCards: Send + Sync {
    /// Creates a vaulted credit card.
    async fn create_credit_card(
        &self,
        request: &CreditCardRequest,
    ) -> Result<GatewayResult<VaultCreditCard>, GatewayError>;
}

/// Stores addresses in the vault.
#[async_trait::async_trait]
pub trait CreatesAddresses: Send + Sync {
    /// Creates an address for a customer.
    async fn create_address(
        &self,
        request: &AddressRequest,
    ) -> Result<GatewayResult<Address>, GatewayError>;
}

/// Onboards sub-merchants.
#[async_trait::async_trait]
pub trait CreatesMerchantAccounts: Send + Sync {
    /// Creates a sub-merchant account.
    async fn create_merchant_account(
        &self,
        request: &MerchantAccountRequest,
    ) -> Result<GatewayResult<MerchantAccount>, GatewayError>;
}

/// Looks up merchant accounts by id.
#[async_trait::async_trait]
pub trait FindsMerchantAccounts: Send + Sync {
    /// Fetches one merchant account.
    async fn find_merchant_account(&self, id: &str) -> Result<MerchantAccount, GatewayError>;
}

/// Creates one-time nonces for vaulted payment methods.
#[async_trait::async_trait]
pub trait CreatesPaymentMethodNonces: Send + Sync {
    /// Creates a nonce for the payment method with `token`.
    async fn create_payment_method_nonce(
        &self,
        token: &str,
    ) -> Result<GatewayResult<PaymentMethodNonce>, GatewayError>;
}

/// Lists recurring billing plans.
#[async_trait::async_trait]
pub trait ListsPlans: Send + Sync {
    /// Returns every plan, in gateway order.
    async fn all_plans(&self) -> Result<Vec<Plan>, GatewayError>;
}

/// A client offering every gateway capability.
///
/// Implemented automatically for any type implementing all capability traits.
pub trait GatewayClient:
    GeneratesClientTokens
    + CreatesTransactions
    + FindsTransactions
    + CreatesCustomers
    + FindsCustomers
    + CreatesCreditCards
    + CreatesAddresses
    + CreatesMerchantAccounts
    + FindsMerchantAccounts
    + CreatesPaymentMethodNonces
    + ListsPlans
{
}

impl<T> GatewayClient for T where
    T: GeneratesClientTokens
        + CreatesTransactions
        + FindsTransactions
        + CreatesCustomers
        + FindsCustomers
        + CreatesCreditCards
        + CreatesAddresses
        + CreatesMerchantAccounts
        + FindsMerchantAccounts
        + CreatesPaymentMethodNonces
        + ListsPlans
{
}
