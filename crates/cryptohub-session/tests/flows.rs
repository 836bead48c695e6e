//! End-to-end flow scenarios against a scripted transport.
//!
//! No server is involved: each test queues the responses the backend would
//! send and inspects both the outcome and what ended up in storage.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use futures::executor::block_on;
use serde_json::json;

use cryptohub_session::error::{ErrorKind, NETWORK_MESSAGE};
use cryptohub_session::flows::{self, LoginOutcome};
use cryptohub_session::gate::{self, GateDecision, Page, PageClass};
use cryptohub_session::models::{Balance, Transaction, UserInfo};
use cryptohub_session::session::{SESSION_KEYS, TOKEN_KEY};
use cryptohub_session::transport::Method;
use cryptohub_session::validation::{LoginForm, RegisterForm};
use cryptohub_session::{
    ApiClient, ApiRequest, ApiResponse, HttpTransport, KeyValueStore, MemoryStore, Scope,
    SessionStore, StorageError, TransportError,
};

const DELAY: Duration = Duration::from_millis(1_500);

#[derive(Default)]
struct ScriptedBackend {
    replies: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedBackend {
    fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body.to_string())));
        self
    }

    fn offline(self) -> Self {
        self.replies.borrow_mut().push_back(Err(TransportError::Network(
            "TypeError: NetworkError when attempting to fetch resource.".into(),
        )));
        self
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl HttpTransport for ScriptedBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }
}

/// Session storage works; local storage rejects every write.
#[derive(Clone, Default)]
struct QuotaExceeded(MemoryStore);

impl KeyValueStore for QuotaExceeded {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError> {
        self.0.get(scope, key)
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        if scope == Scope::Browser {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "QuotaExceededError".into(),
            });
        }
        self.0.set(scope, key, value)
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<(), StorageError> {
        self.0.remove(scope, key)
    }
}

fn setup(backend: ScriptedBackend) -> (ApiClient<ScriptedBackend, MemoryStore>, MemoryStore) {
    let mem = MemoryStore::new();
    (ApiClient::new(backend, SessionStore::new(mem.clone())), mem)
}

#[test]
fn login_success_stores_session_and_targets_dashboard() {
    let (client, _) = setup(ScriptedBackend::default().respond(
        200,
        json!({
            "success": true,
            "token": "tok123",
            "user": {"_id": "u1", "username": "alice"}
        }),
    ));

    let outcome = block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        None,
        DELAY,
    ));

    match outcome {
        LoginOutcome::Success {
            user,
            notice,
            target,
            delay,
        } => {
            assert_eq!(user, UserInfo::new("u1", "alice"));
            assert!(notice.starts_with("Login successful"));
            assert_eq!(target, "/dashboard");
            assert_eq!(delay, DELAY);
        }
        other => panic!("expected success, got {other:?}"),
    }

    assert_eq!(client.session().token().as_deref(), Some("tok123"));
    assert_eq!(client.session().user(), Some(UserInfo::new("u1", "alice")));

    let requests = client.transport().requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "/login");
    assert_eq!(
        requests[0].body,
        Some(json!({"email": "a@b.com", "password": "secret1"}))
    );
    assert!(requests[0].bearer.is_none());
}

#[test]
fn login_honours_protected_redirect_target() {
    let (client, _) = setup(ScriptedBackend::default().respond(
        200,
        json!({"success": true, "token": "t", "user": {"_id": "u1", "username": "alice"}}),
    ));
    let outcome = block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        Some("%2Fwallet"),
        DELAY,
    ));
    assert!(matches!(outcome, LoginOutcome::Success { ref target, .. } if target == "/wallet"));
}

#[test]
fn login_needing_verification_offers_resend() {
    let (client, mem) = setup(
        ScriptedBackend::default()
            .respond(
                403,
                json!({"success": false, "needsVerification": true, "message": "Email not verified"}),
            )
            .respond(200, json!({"success": true, "message": "Verification email sent"})),
    );

    let outcome = block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        None,
        DELAY,
    ));
    let email = match outcome {
        LoginOutcome::NeedsVerification { email, message } => {
            assert_eq!(message, "Email not verified");
            email
        }
        other => panic!("expected verification prompt, got {other:?}"),
    };
    assert!(mem.is_empty(), "no session may be written");

    let notice = block_on(flows::resend_verification(&client, &email)).unwrap();
    assert_eq!(notice, "Verification email sent");

    let requests = client.transport().requests.borrow();
    assert_eq!(requests[1].path, "/resend-verification-email");
    assert_eq!(requests[1].body, Some(json!({"email": "a@b.com"})));
}

#[test]
fn plain_403_is_a_generic_failure() {
    let (client, _) = setup(
        ScriptedBackend::default()
            .respond(403, json!({"success": false, "message": "Account suspended"})),
    );
    let outcome = block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        None,
        DELAY,
    ));
    match outcome {
        LoginOutcome::Failed(e) => {
            assert_eq!(e.kind, ErrorKind::Application);
            assert_eq!(e.message, "Account suspended");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn login_offline_reports_connectivity() {
    let (client, mem) = setup(ScriptedBackend::default().offline());
    let outcome = block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        None,
        DELAY,
    ));
    assert!(!outcome.keeps_submit_disabled());
    match outcome {
        LoginOutcome::Failed(e) => {
            assert_eq!(e.kind, ErrorKind::Network);
            assert_eq!(e.message, NETWORK_MESSAGE);
            assert!(!e.message.contains("TypeError"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(mem.is_empty());
}

#[test]
fn login_with_unexpected_body_is_rejected() {
    let (client, mem) = setup(
        ScriptedBackend::default().respond(200, json!({"success": true, "token": "tok"})),
    );
    let outcome = block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        None,
        DELAY,
    ));
    assert!(matches!(outcome, LoginOutcome::Failed(ref e) if e.kind == ErrorKind::Application));
    assert!(mem.is_empty());
}

#[test]
fn login_validation_never_hits_network() {
    let (client, _) = setup(ScriptedBackend::default());
    for form in [
        LoginForm::new("", "secret1"),
        LoginForm::new("a@b.com", ""),
        LoginForm::new("not-an-email", "secret1"),
    ] {
        let outcome = block_on(flows::login(&client, &form, None, DELAY));
        assert!(
            matches!(outcome, LoginOutcome::Failed(ref e) if e.kind == ErrorKind::Validation)
        );
    }
    assert_eq!(client.transport().request_count(), 0);
}

#[test]
fn registration_mismatch_makes_no_request() {
    let (client, _) = setup(ScriptedBackend::default());
    let form = RegisterForm {
        firstname: "Alice".into(),
        lastname: "Liddell".into(),
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret2".into(),
        accept_terms: true,
    };
    let err = block_on(flows::register(&client, &form)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Passwords do not match.");
    assert_eq!(client.transport().request_count(), 0);
}

#[test]
fn registration_success_does_not_sign_in() {
    let (client, mem) = setup(
        ScriptedBackend::default().respond(201, json!({"success": true, "message": "Created"})),
    );
    let form = RegisterForm {
        firstname: "Alice".into(),
        lastname: "Liddell".into(),
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        accept_terms: true,
    };
    let notice = block_on(flows::register(&client, &form)).unwrap();
    assert!(notice.contains("check your email"));
    assert!(mem.is_empty());

    let requests = client.transport().requests.borrow();
    assert_eq!(requests[0].path, "/register");
    assert_eq!(
        requests[0].body,
        Some(json!({
            "firstname": "Alice",
            "lastname": "Liddell",
            "username": "alice",
            "email": "alice@example.com",
            "password": "secret1"
        }))
    );
}

#[test]
fn logout_clears_every_key() {
    let mem = MemoryStore::new();
    let store = SessionStore::new(mem.clone());
    store
        .set_session("tok", &UserInfo::new("u1", "alice"))
        .unwrap();
    store
        .cache_balances(&[Balance {
            asset: "ETH".into(),
            amount: 2.0,
            usd_value: Some(6000.0),
        }])
        .unwrap();
    store
        .cache_transactions(&[Transaction {
            id: "t1".into(),
            kind: "deposit".into(),
            asset: "ETH".into(),
            amount: 2.0,
            status: "completed".into(),
            created_at: None,
            description: None,
        }])
        .unwrap();

    let target = flows::logout(&store);

    assert_eq!(target, "/login?logout=success");
    for (scope, key) in SESSION_KEYS {
        assert_eq!(mem.get(scope, key).unwrap(), None, "{key} survived logout");
    }
    assert_eq!(store.cached_balances(), None);
    assert_eq!(store.cached_transactions(), None);
}

#[test]
fn logout_redirects_even_when_storage_fails() {
    let mem = MemoryStore::new();
    let store = SessionStore::new(mem.clone());
    mem.set_unavailable(true);
    assert_eq!(flows::logout(&store), "/login?logout=success");
}

#[test]
fn gate_blocks_protected_pages_after_logout() {
    let (client, _) = setup(ScriptedBackend::default().respond(
        200,
        json!({"success": true, "token": "tok", "user": {"_id": "u1", "username": "alice"}}),
    ));
    block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        None,
        DELAY,
    ));

    for page in Page::ALL {
        let decision = gate::check(page, client.session());
        match page.class() {
            PageClass::Protected | PageClass::Public => assert!(decision.is_render()),
            PageClass::AuthFlow if page == Page::VerifyEmail => assert!(decision.is_render()),
            PageClass::AuthFlow => assert!(!decision.is_render()),
        }
    }

    flows::logout(client.session());

    for page in Page::ALL.into_iter().filter(|p| p.class() == PageClass::Protected) {
        assert!(matches!(
            gate::check(page, client.session()),
            GateDecision::Redirect(ref r) if r.target == Page::Login
        ));
    }
}

#[test]
fn expired_token_on_authenticated_call_signs_out() {
    let (client, mem) = setup(
        ScriptedBackend::default()
            .respond(401, json!({"success": false, "message": "Token expired"})),
    );
    mem.set(Scope::Tab, TOKEN_KEY, "stale").unwrap();

    let err = block_on(client.transactions()).unwrap_err();
    assert!(err.is_unauthorized());
    assert!(mem.is_empty());
    assert_eq!(
        gate::login_redirect_for(Page::Transactions).to_url(),
        "/login?redirectTo=%2Ftransactions&reason=auth_required"
    );
}

#[test]
fn login_with_blocked_profile_storage_stays_signed_out() {
    let store = QuotaExceeded::default();
    let client = ApiClient::new(
        ScriptedBackend::default().respond(
            200,
            json!({
                "success": true,
                "token": "tok123",
                "user": {"_id": "u1", "username": "alice"}
            }),
        ),
        SessionStore::new(store.clone()),
    );

    let outcome = block_on(flows::login(
        &client,
        &LoginForm::new("a@b.com", "secret1"),
        None,
        DELAY,
    ));

    assert!(matches!(outcome, LoginOutcome::Failed(_)));
    assert!(!outcome.keeps_submit_disabled());
    assert_eq!(client.session().token(), None);
    assert_eq!(store.get(Scope::Tab, TOKEN_KEY).unwrap(), None);
    assert!(!gate::check(Page::Dashboard, client.session()).is_render());
}
