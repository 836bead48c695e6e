//! REST client for the CryptoHub backend.
//!
//! Every call goes through [`ApiClient::execute`], which maps transport
//! failures and response codes onto [`ApiError`] kinds. Authenticated calls
//! read the bearer token from the session store; a `401` clears the store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::models::*;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, TransportError};

#[derive(Debug, Clone)]
pub struct ApiClient<T, S> {
    transport: T,
    session: SessionStore<S>,
}

/// Decode a response body, enforcing the `success: true` envelope.
fn decode<R: DeserializeOwned>(status: u16, body: &str) -> ApiResult<R> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        log::warn!("undecodable response body (HTTP {status}): {e}");
        ApiError::application(None, None).with_status(status)
    })?;
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(ApiError::application(None, server_message(&value)).with_status(status));
    }
    serde_json::from_value(value).map_err(|e| {
        log::warn!("unexpected response shape (HTTP {status}): {e}");
        ApiError::application(None, None).with_status(status)
    })
}

fn server_message(value: &Value) -> Option<String> {
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(String::from)
}

fn to_body<B: Serialize>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| {
        log::error!("failed to encode request body: {e}");
        ApiError::application(None, Some("Could not prepare the request.".into()))
    })
}

impl<T: HttpTransport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(transport: T, session: SessionStore<S>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and classify the outcome.
    pub async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let resp = self.exchange(request).await?;
        decode(resp.status, &resp.body)
    }

    /// Send a request, returning the raw response only for a 2xx status.
    async fn exchange(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let method = request.method.as_str();
        let path = request.path.clone();
        let authenticated = request.bearer.is_some();
        log::debug!("{method} {path}");

        let resp = self.transport.send(request).await.map_err(|e| {
            log::warn!("{method} {path} failed: {e}");
            match e {
                TransportError::Network(_) => ApiError::network(),
                TransportError::Timeout => ApiError::timeout(),
            }
        })?;

        // Only a rejected bearer token invalidates the session; a 401 from
        // `/login` is an ordinary credential failure.
        if resp.status == 401 && authenticated {
            log::info!("{method} {path} rejected with 401, clearing session");
            if let Err(e) = self.session.clear_session() {
                log::warn!("failed to clear session after 401: {e}");
            }
            return Err(ApiError::unauthorized().with_status(401));
        }

        if resp.is_success() {
            return Ok(resp);
        }

        let body: Option<Value> = serde_json::from_str(&resp.body).ok();
        let message = body.as_ref().and_then(server_message);
        let needs_verification = body
            .as_ref()
            .and_then(|b| b.get("needsVerification"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if resp.status == 403 && needs_verification {
            return Err(ApiError::verification_required(message));
        }

        log::warn!("{method} {path} failed with HTTP {}", resp.status);
        Err(ApiError::application(Some(resp.status), message))
    }

    /// Attach the stored token, or fail without touching the network.
    fn authed(&self, request: ApiRequest) -> ApiResult<ApiRequest> {
        match self.session.token() {
            Some(token) => Ok(request.bearer(token)),
            None => Err(ApiError::unauthorized()),
        }
    }

    // ── Auth ────────────────────────────────────────────────────────

    pub async fn register(&self, body: &RegisterRequest) -> ApiResult<MessageResponse> {
        self.execute(ApiRequest::post("/register", to_body(body)?)).await
    }

    /// Sign in. Only `200` carries a session; any other 2xx is rejected.
    pub async fn login(&self, body: &LoginRequest) -> ApiResult<LoginResponse> {
        let resp = self.exchange(ApiRequest::post("/login", to_body(body)?)).await?;
        if resp.status != 200 {
            log::warn!("POST /login answered HTTP {} instead of 200", resp.status);
            let message = serde_json::from_str::<Value>(&resp.body)
                .ok()
                .as_ref()
                .and_then(server_message);
            return Err(ApiError::application(Some(resp.status), message));
        }
        decode(resp.status, &resp.body)
    }

    pub async fn resend_verification(&self, email: &str) -> ApiResult<MessageResponse> {
        let body = ResendVerificationRequest {
            email: email.to_string(),
        };
        self.execute(ApiRequest::post("/resend-verification-email", to_body(&body)?))
            .await
    }

    pub async fn profile(&self) -> ApiResult<UserInfo> {
        let resp: ProfileResponse = self.execute(self.authed(ApiRequest::get("/profile"))?).await?;
        Ok(resp.user)
    }

    // ── Market ──────────────────────────────────────────────────────

    pub async fn market_data(&self) -> ApiResult<Vec<MarketAsset>> {
        let resp: MarketDataResponse = self.execute(ApiRequest::get("/market-data")).await?;
        Ok(resp.assets)
    }

    // ── Investments ─────────────────────────────────────────────────

    pub async fn investments(&self) -> ApiResult<Vec<Investment>> {
        let resp: InvestmentsResponse = self
            .execute(self.authed(ApiRequest::get("/investments"))?)
            .await?;
        Ok(resp.investments)
    }

    pub async fn create_investment(
        &self,
        body: &CreateInvestmentRequest,
    ) -> ApiResult<InvestmentResponse> {
        let req = self.authed(ApiRequest::post("/investments", to_body(body)?))?;
        self.execute(req).await
    }

    pub async fn withdraw_investment(&self, id: &str) -> ApiResult<MessageResponse> {
        let path = format!("/investments/{}/withdraw", urlencoding::encode(id));
        let req = self.authed(ApiRequest::post(path, Value::Object(Default::default())))?;
        self.execute(req).await
    }

    // ── Wallet ──────────────────────────────────────────────────────

    /// All balances. A fresh result replaces the cached copy.
    pub async fn wallet_balances(&self) -> ApiResult<Vec<Balance>> {
        let resp: BalancesResponse = self
            .execute(self.authed(ApiRequest::get("/wallet/balance"))?)
            .await?;
        if let Err(e) = self.session.cache_balances(&resp.balances) {
            log::warn!("failed to cache balances: {e}");
        }
        Ok(resp.balances)
    }

    pub async fn wallet_balance(&self, asset: &str) -> ApiResult<Balance> {
        let path = format!("/wallet/balance/{}", urlencoding::encode(asset));
        let resp: AssetBalanceResponse = self.execute(self.authed(ApiRequest::get(path))?).await?;
        Ok(resp.balance)
    }

    pub async fn transfer(&self, body: &TransferRequest) -> ApiResult<TransactionResponse> {
        let req = self.authed(ApiRequest::post("/transfer", to_body(body)?))?;
        self.execute(req).await
    }

    pub async fn withdraw(&self, body: &WithdrawRequest) -> ApiResult<TransactionResponse> {
        let req = self.authed(ApiRequest::post("/withdraw", to_body(body)?))?;
        self.execute(req).await
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Full history. A fresh result replaces the cached copy.
    pub async fn transactions(&self) -> ApiResult<Vec<Transaction>> {
        let resp: TransactionsResponse = self
            .execute(self.authed(ApiRequest::get("/transactions"))?)
            .await?;
        if let Err(e) = self.session.cache_transactions(&resp.transactions) {
            log::warn!("failed to cache transactions: {e}");
        }
        Ok(resp.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::MemoryStore;
    use crate::transport::Method;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses and records what was sent.
    #[derive(Default)]
    struct Canned {
        replies: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
        sent: RefCell<Vec<ApiRequest>>,
    }

    impl Canned {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(ApiResponse::new(status, body)));
            self
        }

        fn fail(self, err: TransportError) -> Self {
            self.replies.borrow_mut().push_back(Err(err));
            self
        }
    }

    impl HttpTransport for Canned {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.sent.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .expect("unexpected request")
        }
    }

    fn client(transport: Canned) -> ApiClient<Canned, MemoryStore> {
        ApiClient::new(transport, SessionStore::new(MemoryStore::new()))
    }

    fn signed_in(transport: Canned) -> ApiClient<Canned, MemoryStore> {
        let c = client(transport);
        c.session()
            .set_session("tok", &UserInfo::new("u1", "alice"))
            .unwrap();
        c
    }

    #[test]
    fn authenticated_calls_send_bearer() {
        let c = signed_in(Canned::default().reply(
            200,
            r#"{"success":true,"user":{"_id":"u1","username":"alice"}}"#,
        ));
        let user = block_on(c.profile()).unwrap();
        assert_eq!(user.username, "alice");

        let sent = c.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path, "/profile");
        assert_eq!(sent[0].authorization().as_deref(), Some("Bearer tok"));
    }

    #[test]
    fn missing_token_short_circuits() {
        let c = client(Canned::default());
        let err = block_on(c.transactions()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert!(c.transport().sent.borrow().is_empty());
    }

    #[test]
    fn unauthorized_response_clears_session() {
        let c = signed_in(Canned::default().reply(401, r#"{"success":false,"message":"jwt expired"}"#));
        c.session().cache_balances(&[]).unwrap();

        let err = block_on(c.wallet_balances()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.status, Some(401));
        assert_eq!(c.session().token(), None);
        assert_eq!(c.session().user(), None);
        assert_eq!(c.session().cached_balances(), None);
    }

    #[test]
    fn success_false_is_application_error() {
        let c = signed_in(
            Canned::default().reply(200, r#"{"success":false,"message":"Insufficient balance"}"#),
        );
        let req = TransferRequest {
            recipient: "bob".into(),
            asset: "BTC".into(),
            amount: 1.0,
        };
        let err = block_on(c.transfer(&req)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application);
        assert_eq!(err.message, "Insufficient balance");

        let sent = c.transport().sent.borrow();
        assert_eq!(
            sent[0].body.as_ref().unwrap()["recipient"],
            serde_json::json!("bob")
        );
    }

    #[test]
    fn malformed_success_body_is_application_error() {
        let c = signed_in(Canned::default().reply(200, "<html>oops</html>").reply(
            200,
            r#"{"success":true,"balances":"nope"}"#,
        ));
        assert_eq!(
            block_on(c.wallet_balances()).unwrap_err().kind,
            ErrorKind::Application
        );
        assert_eq!(
            block_on(c.wallet_balances()).unwrap_err().kind,
            ErrorKind::Application
        );
        assert_eq!(c.session().cached_balances(), None);
    }

    #[test]
    fn server_errors_use_message_or_fallback() {
        let c = client(
            Canned::default()
                .reply(500, r#"{"success":false,"message":"Database down"}"#)
                .reply(502, "Bad Gateway"),
        );
        assert_eq!(block_on(c.market_data()).unwrap_err().message, "Database down");
        assert_eq!(
            block_on(c.market_data()).unwrap_err().message,
            "Request failed (HTTP 502)"
        );
    }

    #[test]
    fn transport_failures_map_to_connectivity_kinds() {
        let c = client(
            Canned::default()
                .fail(TransportError::Network("TypeError: Failed to fetch".into()))
                .fail(TransportError::Timeout),
        );
        let err = block_on(c.market_data()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(!err.message.contains("TypeError"));
        assert_eq!(block_on(c.market_data()).unwrap_err().kind, ErrorKind::Timeout);
    }

    #[test]
    fn balances_refresh_cache() {
        let c = signed_in(Canned::default().reply(
            200,
            r#"{"success":true,"balances":[{"asset":"BTC","amount":0.5,"usdValue":30000.0}]}"#,
        ));
        let balances = block_on(c.wallet_balances()).unwrap();
        assert_eq!(c.session().cached_balances(), Some(balances));
    }

    #[test]
    fn unauthenticated_401_is_a_plain_failure() {
        let c = client(
            Canned::default().reply(401, r#"{"success":false,"message":"Invalid credentials"}"#),
        );
        let req = LoginRequest {
            email: "a@b.com".into(),
            password: "wrong".into(),
        };
        let err = block_on(c.login(&req)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application);
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(err.status, Some(401));
    }

    #[test]
    fn path_segments_are_encoded() {
        let c = signed_in(
            Canned::default().reply(200, r#"{"success":true,"message":"Withdrawn"}"#),
        );
        block_on(c.withdraw_investment("a/b")).unwrap();
        assert_eq!(c.transport().sent.borrow()[0].path, "/investments/a%2Fb/withdraw");
    }

    #[test]
    fn login_requires_exactly_200() {
        let c = client(Canned::default().reply(
            201,
            r#"{"success":true,"token":"tok","user":{"_id":"u1","username":"alice"}}"#,
        ));
        let req = LoginRequest {
            email: "a@b.com".into(),
            password: "secret1".into(),
        };
        let err = block_on(c.login(&req)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application);
        assert_eq!(err.status, Some(201));
        assert_eq!(c.session().token(), None);
    }
}
