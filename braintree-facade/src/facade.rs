//! The gateway facade.
//!
//! [`BraintreeFacade`] wraps a gateway client with validated credentials and
//! the client token fetched at start-up. Each operation builds one request
//! payload, makes one gateway call and hands back the gateway's answer. Create
//! and sale calls are normalised into an [`Outcome`].
//!
//! The facade is generic over its client. Operations are only available when
//! the client implements the capability trait they need, so a client that
//! cannot list plans simply has no `get_all_plans`.

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::amount::Amount;
use crate::config::{Credentials, GatewayConfig};
use crate::error::FacadeError;
use crate::gateway::{
    CreatesAddresses, CreatesCreditCards, CreatesCustomers, CreatesMerchantAccounts,
    CreatesPaymentMethodNonces, CreatesTransactions, FindsCustomers, FindsMerchantAccounts,
    FindsTransactions, GeneratesClientTokens, ListsPlans,
};
use crate::options::TransactionOptions;
use crate::request::{
    AddressRequest, BusinessDetails, ChargeOptions, CreditCardRequest, CustomerRequest,
    FundingDetails, IndividualDetails, MerchantAccountRequest, SaleRequest,
};
use crate::types::{
    Address, ClientToken, Customer, GatewayResult, MerchantAccount, Outcome, PaymentMethodNonce,
    Plan, Transaction, VaultCreditCard,
};

/// Facade over a Braintree gateway client.
///
/// Holds no mutable state after [`initialize`](Self::initialize); a single
/// instance can serve concurrent requests.
pub struct BraintreeFacade<C> {
    credentials: Credentials,
    client: C,
    client_side_key: ClientToken,
}

impl<C> std::fmt::Debug for BraintreeFacade<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraintreeFacade")
            .field("credentials", &self.credentials)
            .field("client_side_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn non_blank(value: &str, what: &str) -> Result<(), FacadeError> {
    if value.trim().is_empty() {
        return Err(FacadeError::InvalidArgument(format!("{what} must not be empty")));
    }
    Ok(())
}

impl<C: GeneratesClientTokens> BraintreeFacade<C> {
    /// Creates the facade and fetches a client token.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the client token cannot be
    /// generated.
    #[cfg_attr(feature = "telemetry", instrument(
        name = "braintree.facade.initialize",
        skip_all,
        err,
        fields(merchant_id = %credentials.merchant_id(), environment = %credentials.environment())
    ))]
    pub async fn initialize(credentials: Credentials, client: C) -> Result<Self, FacadeError> {
        let client_side_key = client
            .generate_client_token()
            .await
            .map_err(FacadeError::Gateway)?;
        Ok(Self {
            credentials,
            client,
            client_side_key,
        })
    }

    /// Validates raw configuration, then [`initialize`](Self::initialize)s.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Configuration`] naming the first missing
    /// credential, before any gateway call is made.
    pub async fn from_config(config: &GatewayConfig, client: C) -> Result<Self, FacadeError> {
        let credentials = Credentials::try_from(config)?;
        Self::initialize(credentials, client).await
    }
}

impl<C> BraintreeFacade<C> {
    /// Returns the validated credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the client token fetched during initialisation.
    #[must_use]
    pub const fn client_side_key(&self) -> &ClientToken {
        &self.client_side_key
    }

    /// Returns the underlying gateway client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }
}

impl<C: CreatesTransactions> BraintreeFacade<C> {
    /// Charges using the given options and settlement flags.
    ///
    /// `status` is the gateway's success flag. A declined sale still carries
    /// the declined transaction in `result.target`.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(
        name = "braintree.facade.single_charge",
        skip_all,
        err,
        fields(amount = ?options.amount())
    ))]
    pub async fn single_charge(
        &self,
        options: &TransactionOptions,
        flags: ChargeOptions,
    ) -> Result<Outcome<Transaction>, FacadeError> {
        let request = SaleRequest::from_options(options, flags);
        let result = self
            .client
            .sale(&request)
            .await
            .map_err(FacadeError::Gateway)?;
        #[cfg(feature = "telemetry")]
        tracing::debug!(success = result.success, "sale completed");
        Ok(Outcome::from(result))
    }

    /// Sells `amount` against a payment method nonce, submitting for
    /// settlement and vaulting on success.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidArgument`] for a blank nonce and
    /// [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(
        name = "braintree.facade.sale_with_payment_nonce",
        skip_all,
        err,
        fields(amount = %amount)
    ))]
    pub async fn sale_with_payment_nonce(
        &self,
        amount: Amount,
        nonce: &str,
    ) -> Result<GatewayResult<Transaction>, FacadeError> {
        non_blank(nonce, "payment method nonce")?;
        let request = SaleRequest::with_payment_nonce(amount, nonce);
        self.client
            .sale(&request)
            .await
            .map_err(FacadeError::Gateway)
    }

    /// Sells `amount` on behalf of a sub-merchant, collecting
    /// `service_fee_amount` for the master merchant.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidArgument`] for a blank merchant account
    /// id and [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(
        name = "braintree.facade.sale_with_service_fee",
        skip_all,
        err,
        fields(merchant_account_id = %merchant_account_id, amount = %amount, service_fee = %service_fee_amount)
    ))]
    pub async fn sale_with_service_fee(
        &self,
        merchant_account_id: &str,
        amount: Amount,
        nonce: Option<&str>,
        service_fee_amount: Amount,
    ) -> Result<GatewayResult<Transaction>, FacadeError> {
        non_blank(merchant_account_id, "merchant account id")?;
        let request = SaleRequest::with_service_fee(
            merchant_account_id,
            amount,
            nonce.map(str::to_owned),
            service_fee_amount,
        );
        self.client
            .sale(&request)
            .await
            .map_err(FacadeError::Gateway)
    }
}

impl<C: CreatesCustomers> BraintreeFacade<C> {
    /// Creates a vault customer from the options' customer fields.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(name = "braintree.facade.save_customer", skip_all, err))]
    pub async fn save_customer(
        &self,
        options: &TransactionOptions,
    ) -> Result<Outcome<Customer>, FacadeError> {
        let request = CustomerRequest::from_options(options);
        let result = self
            .client
            .create_customer(&request)
            .await
            .map_err(FacadeError::Gateway)?;
        Ok(Outcome::from(result))
    }
}

impl<C: CreatesCreditCards> BraintreeFacade<C> {
    /// Vaults the options' credit card, with its billing address and owning
    /// customer when present.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::MissingField`] when the options carry no card
    /// and [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(name = "braintree.facade.save_credit_card", skip_all, err))]
    pub async fn save_credit_card(
        &self,
        options: &TransactionOptions,
    ) -> Result<Outcome<VaultCreditCard>, FacadeError> {
        let request =
            CreditCardRequest::from_options(options).ok_or(FacadeError::MissingField("creditCard"))?;
        let result = self
            .client
            .create_credit_card(&request)
            .await
            .map_err(FacadeError::Gateway)?;
        Ok(Outcome::from(result))
    }

    /// Vaults a card and returns it, or `None` when the gateway rejected it.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(
        name = "braintree.facade.create_customer_credit_card",
        skip_all,
        err
    ))]
    pub async fn create_customer_credit_card(
        &self,
        request: &CreditCardRequest,
    ) -> Result<Option<VaultCreditCard>, FacadeError> {
        let result = self
            .client
            .create_credit_card(request)
            .await
            .map_err(FacadeError::Gateway)?;
        if !result.success {
            #[cfg(feature = "telemetry")]
            tracing::warn!(message = ?result.message, "credit card rejected");
            return Ok(None);
        }
        Ok(result.target)
    }
}

impl<C: CreatesAddresses> BraintreeFacade<C> {
    /// Stores the options' billing address for the configured customer.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::MissingField`] when the options carry no billing
    /// address and [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(name = "braintree.facade.save_address", skip_all, err))]
    pub async fn save_address(
        &self,
        options: &TransactionOptions,
    ) -> Result<Outcome<Address>, FacadeError> {
        let request =
            AddressRequest::from_options(options).ok_or(FacadeError::MissingField("billing"))?;
        let result = self
            .client
            .create_address(&request)
            .await
            .map_err(FacadeError::Gateway)?;
        Ok(Outcome::from(result))
    }
}

impl<C: CreatesMerchantAccounts> BraintreeFacade<C> {
    /// Onboards a sub-merchant under the configured master merchant account.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(
        name = "braintree.facade.create_merchant",
        skip_all,
        err,
        fields(master = %self.credentials.master_merchant_account_id())
    ))]
    pub async fn create_merchant(
        &self,
        individual: IndividualDetails,
        business: BusinessDetails,
        funding: FundingDetails,
        tos_accepted: bool,
        id: Option<String>,
    ) -> Result<Outcome<MerchantAccount>, FacadeError> {
        let request = MerchantAccountRequest {
            individual,
            business,
            funding,
            tos_accepted,
            master_merchant_account_id: self.credentials.master_merchant_account_id().to_owned(),
            id,
        };
        let result = self
            .client
            .create_merchant_account(&request)
            .await
            .map_err(FacadeError::Gateway)?;
        Ok(Outcome::from(result))
    }
}

impl<C: FindsTransactions> BraintreeFacade<C> {
    /// Fetches a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidArgument`] for a blank id and
    /// [`FacadeError::Gateway`] if the lookup fails.
    #[cfg_attr(feature = "telemetry", instrument(name = "braintree.facade.find_transaction", skip(self), err))]
    pub async fn find_transaction(&self, id: &str) -> Result<Transaction, FacadeError> {
        non_blank(id, "transaction id")?;
        self.client
            .find_transaction(id)
            .await
            .map_err(FacadeError::Gateway)
    }
}

impl<C: FindsCustomers> BraintreeFacade<C> {
    /// Fetches a vault customer by id.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidArgument`] for a blank id and
    /// [`FacadeError::Gateway`] if the lookup fails.
    #[cfg_attr(feature = "telemetry", instrument(name = "braintree.facade.find_customer", skip(self), err))]
    pub async fn find_customer(&self, id: &str) -> Result<Customer, FacadeError> {
        non_blank(id, "customer id")?;
        self.client
            .find_customer(id)
            .await
            .map_err(FacadeError::Gateway)
    }
}

impl<C: FindsMerchantAccounts> BraintreeFacade<C> {
    /// Fetches a merchant account by id.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidArgument`] for a blank id and
    /// [`FacadeError::Gateway`] if the lookup fails.
    #[cfg_attr(feature = "telemetry", instrument(name = "braintree.facade.find_merchant", skip(self), err))]
    pub async fn find_merchant(&self, id: &str) -> Result<MerchantAccount, FacadeError> {
        non_blank(id, "merchant account id")?;
        self.client
            .find_merchant_account(id)
            .await
            .map_err(FacadeError::Gateway)
    }
}

impl<C: CreatesPaymentMethodNonces> BraintreeFacade<C> {
    /// Creates a one-time nonce for a vaulted payment method.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidArgument`] for a blank token and
    /// [`FacadeError::Gateway`] if the gateway call fails.
    #[cfg_attr(feature = "telemetry", instrument(
        name = "braintree.facade.create_payment_method_nonce",
        skip_all,
        err
    ))]
    pub async fn create_payment_method_nonce(
        &self,
        token: &str,
    ) -> Result<GatewayResult<PaymentMethodNonce>, FacadeError> {
        non_blank(token, "payment method token")?;
        self.client
            .create_payment_method_nonce(token)
            .await
            .map_err(FacadeError::Gateway)
    }
}

impl<C: ListsPlans> BraintreeFacade<C> {
    /// Returns every billing plan.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the plans cannot be listed.
    #[cfg_attr(feature = "telemetry", instrument(name = "braintree.facade.get_all_plans", skip_all, err))]
    pub async fn get_all_plans(&self) -> Result<Vec<Plan>, FacadeError> {
        self.client.all_plans().await.map_err(FacadeError::Gateway)
    }

    /// Returns the id of every billing plan, in gateway order.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the plans cannot be listed.
    pub async fn get_plan_ids(&self) -> Result<Vec<String>, FacadeError> {
        Ok(plan_ids(&self.get_all_plans().await?))
    }

    /// Returns the first plan with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Gateway`] if the plans cannot be listed.
    pub async fn get_plan_by_id(&self, id: &str) -> Result<Option<Plan>, FacadeError> {
        let plans = self.get_all_plans().await?;
        Ok(find_plan(plans, id))
    }
}

fn plan_ids(plans: &[Plan]) -> Vec<String> {
    plans.iter().map(|plan| plan.id.clone()).collect()
}

fn find_plan(plans: Vec<Plan>, id: &str) -> Option<Plan> {
    plans.into_iter().find(|plan| plan.id == id)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::config::Environment;
    use crate::gateway::GatewayError;
    use crate::options::{AddressFields, CreditCard};
    use crate::types::ValidationError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        ClientToken,
        Sale(SaleRequest),
        FindTransaction(String),
        CreateCustomer(CustomerRequest),
        FindCustomer(String),
        CreateCreditCard(CreditCardRequest),
        CreateAddress(AddressRequest),
        CreateMerchant(MerchantAccountRequest),
        FindMerchant(String),
        CreateNonce(String),
        AllPlans,
    }

    #[derive(Default)]
    struct FakeGateway {
        calls: Mutex<Vec<Call>>,
        decline: bool,
        fail_token: bool,
        plans: Vec<Plan>,
    }

    impl FakeGateway {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn verdict<T>(&self, target: T) -> GatewayResult<T> {
            if self.decline {
                GatewayResult::failed("Do Not Honor")
                    .with_target(target)
                    .with_errors([ValidationError {
                        attribute: "base".into(),
                        code: "2000".into(),
                        message: "Do Not Honor".into(),
                    }])
            } else {
                GatewayResult::successful(target)
            }
        }
    }

    #[async_trait::async_trait]
    impl GeneratesClientTokens for FakeGateway {
        async fn generate_client_token(&self) -> Result<ClientToken, GatewayError> {
            self.record(Call::ClientToken);
            if self.fail_token {
                return Err("token service unavailable".into());
            }
            Ok(ClientToken::new("client-token"))
        }
    }

    #[async_trait::async_trait]
    impl CreatesTransactions for FakeGateway {
        async fn sale(
            &self,
            request: &SaleRequest,
        ) -> Result<GatewayResult<Transaction>, GatewayError> {
            self.record(Call::Sale(request.clone()));
            let transaction = Transaction {
                id: "txn-1".into(),
                status: Some(if self.decline {
                    "processor_declined".into()
                } else {
                    "submitted_for_settlement".into()
                }),
                amount: request.amount.map(|amount| amount.as_decimal()),
                ..Transaction::default()
            };
            Ok(self.verdict(transaction))
        }
    }

    #[async_trait::async_trait]
    impl FindsTransactions for FakeGateway {
        async fn find_transaction(&self, id: &str) -> Result<Transaction, GatewayError> {
            self.record(Call::FindTransaction(id.to_owned()));
            Ok(Transaction {
                id: id.to_owned(),
                ..Transaction::default()
            })
        }
    }

    #[async_trait::async_trait]
    impl CreatesCustomers for FakeGateway {
        async fn create_customer(
            &self,
            request: &CustomerRequest,
        ) -> Result<GatewayResult<Customer>, GatewayError> {
            self.record(Call::CreateCustomer(request.clone()));
            Ok(self.verdict(Customer {
                id: request.customer.id.clone().unwrap_or_else(|| "generated".into()),
                ..Customer::default()
            }))
        }
    }

    #[async_trait::async_trait]
    impl FindsCustomers for FakeGateway {
        async fn find_customer(&self, id: &str) -> Result<Customer, GatewayError> {
            self.record(Call::FindCustomer(id.to_owned()));
            Ok(Customer {
                id: id.to_owned(),
                ..Customer::default()
            })
        }
    }

    #[async_trait::async_trait]
    impl CreatesCreditCards for FakeGateway {
        async fn create_credit_card(
            &self,
            request: &CreditCardRequest,
        ) -> Result<GatewayResult<VaultCreditCard>, GatewayError> {
            self.record(Call::CreateCreditCard(request.clone()));
            Ok(self.verdict(VaultCreditCard {
                token: "card-token".into(),
                customer_id: request.customer_id.clone(),
                ..VaultCreditCard::default()
            }))
        }
    }

    #[async_trait::async_trait]
    impl CreatesAddresses for FakeGateway {
        async fn create_address(
            &self,
            request: &AddressRequest,
        ) -> Result<GatewayResult<Address>, GatewayError> {
            self.record(Call::CreateAddress(request.clone()));
            Ok(self.verdict(Address {
                id: Some("addr-1".into()),
                customer_id: request.customer_id.clone(),
                ..Address::default()
            }))
        }
    }

    #[async_trait::async_trait]
    impl CreatesMerchantAccounts for FakeGateway {
        async fn create_merchant_account(
            &self,
            request: &MerchantAccountRequest,
        ) -> Result<GatewayResult<MerchantAccount>, GatewayError> {
            self.record(Call::CreateMerchant(request.clone()));
            Ok(self.verdict(MerchantAccount {
                id: request.id.clone().unwrap_or_else(|| "generated".into()),
                status: Some("pending".into()),
                master_merchant_account_id: Some(request.master_merchant_account_id.clone()),
                ..MerchantAccount::default()
            }))
        }
    }

    #[async_trait::async_trait]
    impl FindsMerchantAccounts for FakeGateway {
        async fn find_merchant_account(&self, id: &str) -> Result<MerchantAccount, GatewayError> {
            self.record(Call::FindMerchant(id.to_owned()));
            Ok(MerchantAccount {
                id: id.to_owned(),
                status: Some("active".into()),
                ..MerchantAccount::default()
            })
        }
    }

    #[async_trait::async_trait]
    impl CreatesPaymentMethodNonces for FakeGateway {
        async fn create_payment_method_nonce(
            &self,
            token: &str,
        ) -> Result<GatewayResult<PaymentMethodNonce>, GatewayError> {
            self.record(Call::CreateNonce(token.to_owned()));
            Ok(self.verdict(PaymentMethodNonce {
                nonce: format!("nonce-for-{token}"),
                kind: Some("CreditCard".into()),
                ..PaymentMethodNonce::default()
            }))
        }
    }

    #[async_trait::async_trait]
    impl ListsPlans for FakeGateway {
        async fn all_plans(&self) -> Result<Vec<Plan>, GatewayError> {
            self.record(Call::AllPlans);
            Ok(self.plans.clone())
        }
    }

    fn credentials() -> Credentials {
        Credentials::new(Environment::Sandbox, "merchant", "public", "private").unwrap()
    }

    fn plan(id: &str, name: &str) -> Plan {
        serde_json::from_value(json!({ "id": id, "name": name, "price": "9.99" })).unwrap()
    }

    async fn facade(gateway: FakeGateway) -> BraintreeFacade<FakeGateway> {
        BraintreeFacade::initialize(credentials(), gateway)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_fetches_client_token() {
        let facade = facade(FakeGateway::default()).await;
        assert_eq!(facade.client_side_key().as_str(), "client-token");
        assert_eq!(facade.client().calls(), vec![Call::ClientToken]);
    }

    #[tokio::test]
    async fn test_from_config_fails_before_calling_gateway() {
        let config = GatewayConfig {
            environment: Some(Environment::Sandbox),
            merchant_id: Some("merchant".into()),
            public_key: Some("public".into()),
            ..GatewayConfig::default()
        };
        let err = BraintreeFacade::from_config(&config, FakeGateway::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FacadeError::Configuration(crate::config::ConfigurationError::MissingAttribute(
                "private_key"
            ))
        ));
    }

    #[tokio::test]
    async fn test_initialize_propagates_token_failure() {
        let gateway = FakeGateway {
            fail_token: true,
            ..FakeGateway::default()
        };
        let err = BraintreeFacade::initialize(credentials(), gateway)
            .await
            .unwrap_err();
        assert!(err.is_gateway());
    }

    #[tokio::test]
    async fn test_successful_sale_has_true_status() {
        let facade = facade(FakeGateway::default()).await;
        let options = TransactionOptions::new()
            .with_amount(Amount::from_f64(19.999).unwrap())
            .with_credit_card(CreditCard::new("4111111111111111"));

        let outcome = facade
            .single_charge(&options, ChargeOptions::default())
            .await
            .unwrap();

        assert!(outcome.status);
        assert!(outcome.result.success);
        let calls = facade.client().calls();
        let Call::Sale(sale) = &calls[1] else {
            panic!("expected a sale, got {calls:?}");
        };
        assert_eq!(sale.amount.unwrap().to_string(), "20.00");
        assert_eq!(sale.options, Some(ChargeOptions::default()));
    }

    #[tokio::test]
    async fn test_declined_sale_has_false_status_and_keeps_transaction() {
        let facade = facade(FakeGateway {
            decline: true,
            ..FakeGateway::default()
        })
        .await;
        let options = TransactionOptions::new().with_amount(Amount::from(10));

        let outcome = facade
            .single_charge(&options, ChargeOptions::default())
            .await
            .unwrap();

        assert!(!outcome.status);
        assert_eq!(outcome.status, outcome.result.success);
        assert_eq!(
            outcome.result.target.and_then(|t| t.status).as_deref(),
            Some("processor_declined")
        );
        assert_eq!(outcome.result.errors[0].code, "2000");
    }

    #[tokio::test]
    async fn test_nonce_sale_sets_both_flags() {
        let facade = facade(FakeGateway::default()).await;
        let result = facade
            .sale_with_payment_nonce(Amount::from(25), "fake-valid-nonce")
            .await
            .unwrap();
        assert!(result.success);

        let Call::Sale(sale) = &facade.client().calls()[1] else {
            panic!("expected a sale");
        };
        assert_eq!(sale.payment_method_nonce.as_deref(), Some("fake-valid-nonce"));
        assert_eq!(sale.options, Some(ChargeOptions::default()));
    }

    #[tokio::test]
    async fn test_service_fee_sale_targets_sub_merchant() {
        let facade = facade(FakeGateway::default()).await;
        facade
            .sale_with_service_fee("sub_merchant", Amount::from(100), None, Amount::from(3))
            .await
            .unwrap();

        let Call::Sale(sale) = &facade.client().calls()[1] else {
            panic!("expected a sale");
        };
        assert_eq!(sale.merchant_account_id.as_deref(), Some("sub_merchant"));
        assert_eq!(sale.service_fee_amount, Some(Amount::from(3)));
        assert_eq!(sale.options, None);
        assert_eq!(sale.payment_method_nonce, None);
    }

    #[tokio::test]
    async fn test_save_customer_uses_customer_id() {
        let facade = facade(FakeGateway::default()).await;
        let options = TransactionOptions::new().with_customer_id("cust-42");

        let outcome = facade.save_customer(&options).await.unwrap();

        assert!(outcome.status);
        assert_eq!(outcome.result.target.unwrap().id, "cust-42");
    }

    #[tokio::test]
    async fn test_save_credit_card_requires_card() {
        let facade = facade(FakeGateway::default()).await;
        let err = facade
            .save_credit_card(&TransactionOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FacadeError::MissingField("creditCard")));
        assert_eq!(facade.client().calls(), vec![Call::ClientToken]);
    }

    #[tokio::test]
    async fn test_save_credit_card_attaches_billing_address() {
        let facade = facade(FakeGateway::default()).await;
        let billing = AddressFields {
            postal_code: Some("60622".into()),
            ..AddressFields::default()
        };
        let options = TransactionOptions::new()
            .with_credit_card(CreditCard::new("4111111111111111"))
            .with_billing(billing.clone())
            .with_customer_id("cust-1");

        let outcome = facade.save_credit_card(&options).await.unwrap();

        assert!(outcome.status);
        let Call::CreateCreditCard(request) = &facade.client().calls()[1] else {
            panic!("expected a card create");
        };
        assert_eq!(request.billing_address, Some(billing));
        assert_eq!(request.customer_id.as_deref(), Some("cust-1"));
    }

    #[tokio::test]
    async fn test_save_address_requires_billing() {
        let facade = facade(FakeGateway::default()).await;
        let err = facade
            .save_address(&TransactionOptions::new().with_customer_id("cust-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FacadeError::MissingField("billing")));
    }

    #[tokio::test]
    async fn test_create_customer_credit_card_returns_none_on_failure() {
        let request = CreditCardRequest::new(CreditCard::new("4000111111111115"));

        let ok = facade(FakeGateway::default()).await;
        let card = ok.create_customer_credit_card(&request).await.unwrap();
        assert_eq!(card.map(|c| c.token), Some("card-token".to_owned()));

        let declined = facade(FakeGateway {
            decline: true,
            ..FakeGateway::default()
        })
        .await;
        assert_eq!(
            declined.create_customer_credit_card(&request).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_create_merchant_uses_master_account() {
        let credentials = credentials().with_master_merchant_account_id("acme_master");
        let facade = BraintreeFacade::initialize(credentials, FakeGateway::default())
            .await
            .unwrap();

        let outcome = facade
            .create_merchant(
                IndividualDetails::default(),
                BusinessDetails::default(),
                FundingDetails::default(),
                true,
                Some("blue_ladders_store".into()),
            )
            .await
            .unwrap();

        assert!(outcome.status);
        let Call::CreateMerchant(request) = &facade.client().calls()[1] else {
            panic!("expected a merchant create");
        };
        assert_eq!(request.master_merchant_account_id, "acme_master");
        assert!(request.tos_accepted);
    }

    #[tokio::test]
    async fn test_lookups_reject_blank_ids() {
        let facade = facade(FakeGateway::default()).await;
        assert!(matches!(
            facade.find_transaction(" ").await,
            Err(FacadeError::InvalidArgument(_))
        ));
        assert!(matches!(
            facade.find_customer("").await,
            Err(FacadeError::InvalidArgument(_))
        ));
        assert!(matches!(
            facade.find_merchant("").await,
            Err(FacadeError::InvalidArgument(_))
        ));
        assert!(matches!(
            facade.create_payment_method_nonce("").await,
            Err(FacadeError::InvalidArgument(_))
        ));
        assert_eq!(facade.client().calls(), vec![Call::ClientToken]);
    }

    #[tokio::test]
    async fn test_lookups_pass_through() {
        let facade = facade(FakeGateway::default()).await;
        assert_eq!(facade.find_transaction("txn-9").await.unwrap().id, "txn-9");
        assert_eq!(facade.find_customer("cust-9").await.unwrap().id, "cust-9");
        assert_eq!(
            facade.find_merchant("sub-9").await.unwrap().status.as_deref(),
            Some("active")
        );
        let nonce = facade.create_payment_method_nonce("card-token").await.unwrap();
        assert_eq!(nonce.target.unwrap().nonce, "nonce-for-card-token");
    }

    #[tokio::test]
    async fn test_plan_lookups() {
        let facade = facade(FakeGateway {
            plans: vec![plan("basic", "Basic"), plan("pro", "Pro")],
            ..FakeGateway::default()
        })
        .await;

        assert_eq!(facade.get_all_plans().await.unwrap().len(), 2);
        assert_eq!(facade.get_plan_ids().await.unwrap(), vec!["basic", "pro"]);
        assert_eq!(facade.get_plan_by_id("missing").await.unwrap(), None);
        let pro = facade.get_plan_by_id("pro").await.unwrap().unwrap();
        assert_eq!(pro.name.as_deref(), Some("Pro"));
    }

    #[test]
    fn test_find_plan_returns_first_match_once() {
        let plans = vec![plan("gold", "First"), plan("gold", "Second")];
        let found = find_plan(plans, "gold").unwrap();
        assert_eq!(found.name.as_deref(), Some("First"));
    }
}
