//! A gateway client that talks to the Braintree API over HTTP.
//!
//! [`HttpGatewayClient`] implements every capability trait from
//! [`braintree_facade::gateway`], so it can be handed straight to
//! [`BraintreeFacade`](braintree_facade::BraintreeFacade).
//!
//! ## Wire format
//!
//! All routes live under `{base}/merchants/{merchant_id}`. Request bodies are
//! wrapped under a root key (`{"transaction": {...}}`) and successful responses
//! come back the same way. An HTTP 422 carries an `apiErrorResponse` object and
//! is turned into an unsuccessful [`GatewayResult`] rather than an error.
//!
//! ## Error Handling
//!
//! [`HttpGatewayError`] captures
//! - URL construction
//! - HTTP transport failures
//! - JSON (de)serialization errors
//! - Well-known and unexpected HTTP statuses

use std::fmt::Display;
use std::time::Duration;

use braintree_facade::config::Credentials;
use braintree_facade::gateway::{
    CreatesAddresses, CreatesCreditCards, CreatesCustomers, CreatesMerchantAccounts,
    CreatesPaymentMethodNonces, CreatesTransactions, FindsCustomers, FindsMerchantAccounts,
    FindsTransactions, GatewayError, GeneratesClientTokens, ListsPlans,
};
use braintree_facade::request::{
    AddressRequest, CreditCardRequest, CustomerRequest, MerchantAccountRequest, SaleRequest,
};
use braintree_facade::types::{
    Address, ClientToken, Customer, GatewayResult, MerchantAccount, PaymentMethodNonce, Plan,
    Transaction, ValidationError, VaultCreditCard,
};
use reqwest::header::{ACCEPT, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::constants::{
    API_ERROR_RESPONSE_KEY, API_VERSION, API_VERSION_HEADER, CLIENT_TOKEN_VERSION,
    DEFAULT_TIMEOUT, USER_AGENT,
};
use crate::error::HttpGatewayError;

/// HTTP client for the Braintree gateway API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpGatewayClient {
    /// Merchant credentials used for basic auth and routing.
    credentials: Credentials,
    /// Gateway base URL (e.g. `https://api.sandbox.braintreegateway.com`)
    base_url: Url,
    /// Shared reqwest HTTP client
    client: Client,
    /// Per-request timeout
    timeout: Duration,
}

#[derive(Serialize)]
struct ClientTokenRequest {
    version: u8,
}

#[derive(Deserialize)]
struct ClientTokenBody {
    value: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ValidationError>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

fn parse_base_url(value: &str) -> Result<Url, HttpGatewayError> {
    let url = Url::parse(value.trim_end_matches('/')).map_err(|e| HttpGatewayError::UrlParse {
        context: "Failed to parse base url",
        source: e,
    })?;
    if url.cannot_be_a_base() {
        return Err(HttpGatewayError::InvalidBaseUrl(value.to_owned()));
    }
    Ok(url)
}

impl HttpGatewayClient {
    /// Creates a client for the credentials' environment.
    ///
    /// # Errors
    ///
    /// Returns [`HttpGatewayError::UrlParse`] if the environment URL is
    /// malformed.
    pub fn new(credentials: Credentials) -> Result<Self, HttpGatewayError> {
        let base_url = parse_base_url(credentials.environment().base_url())?;
        Ok(Self {
            credentials,
            base_url,
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Points the client at another base URL (proxies, local fakes).
    ///
    /// # Errors
    ///
    /// Returns [`HttpGatewayError::UrlParse`] or
    /// [`HttpGatewayError::InvalidBaseUrl`] if `base_url` is not usable.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, HttpGatewayError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Sets the timeout for all future requests.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the underlying reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the base URL used by this client.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the merchant credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Builds `{base}/merchants/{merchant_id}/{segments...}`, percent-encoding
    /// each segment.
    fn merchant_url(&self, segments: &[&str]) -> Result<Url, HttpGatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HttpGatewayError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("merchants")
            .push(self.credentials.merchant_id())
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(
                self.credentials.public_key(),
                Some(self.credentials.private_key()),
            )
            .header(ACCEPT, "application/json")
            .header(API_VERSION_HEADER, API_VERSION)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .timeout(self.timeout)
    }

    /// Sends a request and parses the JSON body.
    ///
    /// 2xx responses are returned as is. So is 422 when `accept_unprocessable`
    /// is set; every other status becomes an error.
    async fn send(
        &self,
        request: RequestBuilder,
        context: &'static str,
        accept_unprocessable: bool,
    ) -> Result<(StatusCode, Value), HttpGatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| HttpGatewayError::Http { context, source: e })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpGatewayError::ResponseBodyRead { context, source: e })?;

        let accepted = status.is_success()
            || (accept_unprocessable && status == StatusCode::UNPROCESSABLE_ENTITY);
        if !accepted {
            return Err(HttpGatewayError::from_status(context, status, body));
        }
        if body.trim().is_empty() {
            return Ok((status, Value::Null));
        }
        let value = serde_json::from_str(&body)
            .map_err(|e| HttpGatewayError::JsonDeserialization { context, source: e })?;
        Ok((status, value))
    }

    /// GET helper returning the resource under `root`.
    async fn get_json<R>(
        &self,
        segments: &[&str],
        root: &'static str,
        context: &'static str,
    ) -> Result<R, HttpGatewayError>
    where
        R: DeserializeOwned,
    {
        let url = self.merchant_url(segments)?;
        let result = self
            .send(self.request(Method::GET, url), context, false)
            .await
            .and_then(|(_, body)| take_root(body, root, context));

        record_result_on_span(&result);

        result
    }

    /// POST helper for calls that answer with a bare resource.
    async fn post_json<T, R>(
        &self,
        segments: &[&str],
        root: &'static str,
        payload: &T,
        context: &'static str,
    ) -> Result<R, HttpGatewayError>
    where
        T: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.merchant_url(segments)?;
        let body = wrap(root, payload, context)?;
        let result = self
            .send(self.request(Method::POST, url).json(&body), context, false)
            .await
            .and_then(|(_, body)| take_root(body, root, context));

        record_result_on_span(&result);

        result
    }

    /// POST helper for calls that answer with a gateway result.
    ///
    /// A 2xx becomes a successful result around the resource under `root`; a
    /// 422 becomes an unsuccessful one, keeping the resource when the gateway
    /// sent it along.
    async fn post_result<T, R>(
        &self,
        segments: &[&str],
        root: &'static str,
        payload: &T,
        context: &'static str,
    ) -> Result<GatewayResult<R>, HttpGatewayError>
    where
        T: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.merchant_url(segments)?;
        let body = wrap(root, payload, context)?;
        let result = self
            .send(self.request(Method::POST, url).json(&body), context, true)
            .await
            .and_then(|(status, body)| {
                if status == StatusCode::UNPROCESSABLE_ENTITY {
                    unsuccessful(body, root, context)
                } else {
                    take_root(body, root, context).map(GatewayResult::successful)
                }
            });

        record_result_on_span(&result);

        result
    }
}

fn wrap<T>(root: &'static str, payload: &T, context: &'static str) -> Result<Value, HttpGatewayError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(payload)
        .map_err(|e| HttpGatewayError::JsonSerialization { context, source: e })?;
    let mut map = Map::new();
    map.insert(root.to_owned(), value);
    Ok(Value::Object(map))
}

fn take_root<R>(body: Value, root: &'static str, context: &'static str) -> Result<R, HttpGatewayError>
where
    R: DeserializeOwned,
{
    let Value::Object(mut map) = body else {
        return Err(HttpGatewayError::MissingRoot { context, root });
    };
    let value = map
        .remove(root)
        .ok_or(HttpGatewayError::MissingRoot { context, root })?;
    serde_json::from_value(value)
        .map_err(|e| HttpGatewayError::JsonDeserialization { context, source: e })
}

fn unsuccessful<R>(
    body: Value,
    root: &'static str,
    context: &'static str,
) -> Result<GatewayResult<R>, HttpGatewayError>
where
    R: DeserializeOwned,
{
    let mut response: ApiErrorResponse = take_root(body, API_ERROR_RESPONSE_KEY, context)?;
    let target = response
        .rest
        .remove(root)
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| HttpGatewayError::JsonDeserialization { context, source: e })?;
    Ok(GatewayResult {
        success: false,
        target,
        message: response.message,
        errors: response.errors,
    })
}

#[async_trait::async_trait]
impl GeneratesClientTokens for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.client_token",
            skip_all,
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn generate_client_token(&self) -> Result<ClientToken, GatewayError> {
        let request = ClientTokenRequest {
            version: CLIENT_TOKEN_VERSION,
        };
        let body: ClientTokenBody = self
            .post_json(&["client_token"], "clientToken", &request, "POST /client_token")
            .await?;
        Ok(ClientToken::new(body.value))
    }
}

#[async_trait::async_trait]
impl CreatesTransactions for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.sale",
            skip_all,
            err,
            fields(
                timeout = ?self.timeout,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn sale(&self, request: &SaleRequest) -> Result<GatewayResult<Transaction>, GatewayError> {
        Ok(self
            .post_result(&["transactions"], "transaction", request, "POST /transactions")
            .await?)
    }
}

#[async_trait::async_trait]
impl FindsTransactions for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.find_transaction",
            skip(self),
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn find_transaction(&self, id: &str) -> Result<Transaction, GatewayError> {
        Ok(self
            .get_json(&["transactions", id], "transaction", "GET /transactions/{id}")
            .await?)
    }
}

#[async_trait::async_trait]
impl CreatesCustomers for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.create_customer",
            skip_all,
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn create_customer(
        &self,
        request: &CustomerRequest,
    ) -> Result<GatewayResult<Customer>, GatewayError> {
        Ok(self
            .post_result(&["customers"], "customer", request, "POST /customers")
            .await?)
    }
}

#[async_trait::async_trait]
impl FindsCustomers for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.find_customer",
            skip(self),
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn find_customer(&self, id: &str) -> Result<Customer, GatewayError> {
        Ok(self
            .get_json(&["customers", id], "customer", "GET /customers/{id}")
            .await?)
    }
}

#[async_trait::async_trait]
impl CreatesCreditCards for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.create_credit_card",
            skip_all,
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn create_credit_card(
        &self,
        request: &CreditCardRequest,
    ) -> Result<GatewayResult<VaultCreditCard>, GatewayError> {
        Ok(self
            .post_result(&["payment_methods"], "creditCard", request, "POST /payment_methods")
            .await?)
    }
}

#[async_trait::async_trait]
impl CreatesAddresses for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.create_address",
            skip_all,
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn create_address(
        &self,
        request: &AddressRequest,
    ) -> Result<GatewayResult<Address>, GatewayError> {
        const CONTEXT: &str = "POST /customers/{customer_id}/addresses";
        let customer_id = request
            .customer_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(HttpGatewayError::MissingField {
                context: CONTEXT,
                field: "customerId",
            })?;
        Ok(self
            .post_result(&["customers", customer_id, "addresses"], "address", request, CONTEXT)
            .await?)
    }
}

#[async_trait::async_trait]
impl CreatesMerchantAccounts for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.create_merchant_account",
            skip_all,
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn create_merchant_account(
        &self,
        request: &MerchantAccountRequest,
    ) -> Result<GatewayResult<MerchantAccount>, GatewayError> {
        Ok(self
            .post_result(
                &["merchant_accounts", "create_via_api"],
                "merchantAccount",
                request,
                "POST /merchant_accounts/create_via_api",
            )
            .await?)
    }
}

#[async_trait::async_trait]
impl FindsMerchantAccounts for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.find_merchant_account",
            skip(self),
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn find_merchant_account(&self, id: &str) -> Result<MerchantAccount, GatewayError> {
        Ok(self
            .get_json(
                &["merchant_accounts", id],
                "merchantAccount",
                "GET /merchant_accounts/{id}",
            )
            .await?)
    }
}

#[async_trait::async_trait]
impl CreatesPaymentMethodNonces for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.create_payment_method_nonce",
            skip_all,
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn create_payment_method_nonce(
        &self,
        token: &str,
    ) -> Result<GatewayResult<PaymentMethodNonce>, GatewayError> {
        Ok(self
            .post_result(
                &["payment_methods", token, "nonces"],
                "paymentMethodNonce",
                &Map::new(),
                "POST /payment_methods/{token}/nonces",
            )
            .await?)
    }
}

#[async_trait::async_trait]
impl ListsPlans for HttpGatewayClient {
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "braintree.http.all_plans",
            skip_all,
            err,
            fields(
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    async fn all_plans(&self) -> Result<Vec<Plan>, GatewayError> {
        Ok(self.get_json(&["plans"], "plans", "GET /plans").await?)
    }
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to gateway failed");
        }
    }
}

/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}
