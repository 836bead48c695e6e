//! Auth gate: decides, once per page load, whether a page renders or
//! redirects.

use crate::session::SessionStore;
use crate::storage::KeyValueStore;

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass {
    /// Requires a session.
    Protected,
    /// Establishes or recovers a session.
    AuthFlow,
    Public,
}

/// Every route the client serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Market,
    Login,
    Register,
    ForgotPassword,
    VerifyEmail,
    Dashboard,
    Wallet,
    Transfer,
    Withdraw,
    Deposit,
    Transactions,
    Investments,
}

impl Page {
    pub const ALL: [Page; 13] = [
        Page::Home,
        Page::Market,
        Page::Login,
        Page::Register,
        Page::ForgotPassword,
        Page::VerifyEmail,
        Page::Dashboard,
        Page::Wallet,
        Page::Transfer,
        Page::Withdraw,
        Page::Deposit,
        Page::Transactions,
        Page::Investments,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Market => "/market",
            Page::Login => "/login",
            Page::Register => "/register",
            Page::ForgotPassword => "/forgot-password",
            Page::VerifyEmail => "/verify-email",
            Page::Dashboard => "/dashboard",
            Page::Wallet => "/wallet",
            Page::Transfer => "/transfer",
            Page::Withdraw => "/withdraw",
            Page::Deposit => "/deposit",
            Page::Transactions => "/transactions",
            Page::Investments => "/investments",
        }
    }

    /// Page for a path, ignoring any query string and trailing slash.
    pub fn from_path(path: &str) -> Option<Page> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Page::ALL.into_iter().find(|p| p.path() == path)
    }

    pub fn class(self) -> PageClass {
        match self {
            Page::Home | Page::Market => PageClass::Public,
            Page::Login | Page::Register | Page::ForgotPassword | Page::VerifyEmail => {
                PageClass::AuthFlow
            }
            Page::Dashboard
            | Page::Wallet
            | Page::Transfer
            | Page::Withdraw
            | Page::Deposit
            | Page::Transactions
            | Page::Investments => PageClass::Protected,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Market => "Market Trends",
            Page::Login => "Sign In",
            Page::Register => "Create Account",
            Page::ForgotPassword => "Reset Password",
            Page::VerifyEmail => "Verify Email",
            Page::Dashboard => "Dashboard",
            Page::Wallet => "Wallet",
            Page::Transfer => "Transfer",
            Page::Withdraw => "Withdraw",
            Page::Deposit => "Deposit",
            Page::Transactions => "Transactions",
            Page::Investments => "Investments",
        }
    }
}

/// Why the gate sent the user elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    AuthRequired,
    AlreadyAuthenticated,
}

impl RedirectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectReason::AuthRequired => "auth_required",
            RedirectReason::AlreadyAuthenticated => "already_authenticated",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "auth_required" => Some(RedirectReason::AuthRequired),
            "already_authenticated" => Some(RedirectReason::AlreadyAuthenticated),
            _ => None,
        }
    }

    /// Notice shown on the page the user lands on.
    pub fn notice(self) -> &'static str {
        match self {
            RedirectReason::AuthRequired => "Please sign in to continue.",
            RedirectReason::AlreadyAuthenticated => "You are already signed in.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: Page,
    pub reason: RedirectReason,
    /// Page to return to after signing in.
    pub redirect_to: Option<Page>,
}

impl Redirect {
    pub fn to_url(&self) -> String {
        let mut url = format!("{}?", self.target.path());
        if let Some(back) = self.redirect_to {
            url.push_str("redirectTo=");
            url.push_str(&urlencoding::encode(back.path()));
            url.push('&');
        }
        url.push_str("reason=");
        url.push_str(self.reason.as_str());
        url
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    Redirect(Redirect),
}

impl GateDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GateDecision::Render)
    }
}

/// Redirect used whenever `page` needs a session it does not have,
/// either from the local presence check or a `401`.
pub fn login_redirect_for(page: Page) -> Redirect {
    Redirect {
        target: Page::Login,
        reason: RedirectReason::AuthRequired,
        redirect_to: Some(page),
    }
}

/// Pure gate rules over the page class and token presence.
pub fn decide(page: Page, has_valid_token: bool) -> GateDecision {
    match (page.class(), has_valid_token) {
        (PageClass::Protected, false) => GateDecision::Redirect(login_redirect_for(page)),
        (PageClass::AuthFlow, true) if page != Page::VerifyEmail => {
            GateDecision::Redirect(Redirect {
                target: Page::Dashboard,
                reason: RedirectReason::AlreadyAuthenticated,
                redirect_to: None,
            })
        }
        _ => GateDecision::Render,
    }
}

/// Run the gate against the store.
///
/// A protected page without a usable token clears the whole stored
/// session, so a stale profile or cached balance never outlives its token.
pub fn check<S: KeyValueStore>(page: Page, store: &SessionStore<S>) -> GateDecision {
    let decision = decide(page, store.has_valid_token());
    if page.class() == PageClass::Protected && !decision.is_render() {
        log::info!("no session for {}, redirecting to login", page.path());
        if let Err(e) = store.clear_session() {
            log::warn!("failed to clear stale session: {e}");
        }
    }
    decision
}

/// Where to go after a successful login. A `redirectTo` naming a protected
/// page is honoured; anything else lands on the dashboard.
pub fn post_login_target(redirect_to: Option<&str>) -> &'static str {
    redirect_to
        .and_then(|raw| {
            let decoded = urlencoding::decode(raw).ok()?;
            Page::from_path(&decoded)
        })
        .filter(|p| p.class() == PageClass::Protected)
        .unwrap_or(Page::Dashboard)
        .path()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserInfo;
    use crate::storage::MemoryStore;

    #[test]
    fn protected_pages_never_render_without_token() {
        for page in Page::ALL.into_iter().filter(|p| p.class() == PageClass::Protected) {
            match decide(page, false) {
                GateDecision::Redirect(r) => {
                    assert_eq!(r.target, Page::Login);
                    assert_eq!(r.reason, RedirectReason::AuthRequired);
                    assert_eq!(r.redirect_to, Some(page));
                }
                GateDecision::Render => panic!("{page:?} rendered without a session"),
            }
            assert!(decide(page, true).is_render());
        }
    }

    #[test]
    fn auth_flow_pages_bounce_signed_in_users() {
        for page in Page::ALL.into_iter().filter(|p| p.class() == PageClass::AuthFlow) {
            assert!(decide(page, false).is_render());
            let signed_in = decide(page, true);
            if page == Page::VerifyEmail {
                assert!(signed_in.is_render());
            } else {
                assert_eq!(
                    signed_in,
                    GateDecision::Redirect(Redirect {
                        target: Page::Dashboard,
                        reason: RedirectReason::AlreadyAuthenticated,
                        redirect_to: None,
                    })
                );
            }
        }
    }

    #[test]
    fn public_pages_always_render() {
        for page in [Page::Home, Page::Market] {
            assert!(decide(page, false).is_render());
            assert!(decide(page, true).is_render());
        }
    }

    #[test]
    fn redirect_urls() {
        assert_eq!(
            login_redirect_for(Page::Wallet).to_url(),
            "/login?redirectTo=%2Fwallet&reason=auth_required"
        );
        assert_eq!(
            decide(Page::Login, true),
            GateDecision::Redirect(Redirect {
                target: Page::Dashboard,
                reason: RedirectReason::AlreadyAuthenticated,
                redirect_to: None,
            })
        );
        if let GateDecision::Redirect(r) = decide(Page::Register, true) {
            assert_eq!(r.to_url(), "/dashboard?reason=already_authenticated");
        }
    }

    #[test]
    fn paths_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
        assert_eq!(Page::from_path("/wallet/"), Some(Page::Wallet));
        assert_eq!(Page::from_path("/login?logout=success"), Some(Page::Login));
        assert_eq!(Page::from_path("/nope"), None);
    }

    #[test]
    fn check_clears_stale_profile_on_protected_page() {
        let mem = MemoryStore::new();
        let store = SessionStore::new(mem.clone());
        store.set_session("tok", &UserInfo::new("u1", "alice")).unwrap();
        store.cache_balances(&[]).unwrap();
        mem.remove(crate::storage::Scope::Tab, crate::session::TOKEN_KEY)
            .unwrap();

        assert!(!check(Page::Dashboard, &store).is_render());
        assert_eq!(store.user(), None);
        assert_eq!(store.cached_balances(), None);
    }

    #[test]
    fn check_leaves_session_alone_elsewhere() {
        let store = SessionStore::new(MemoryStore::new());
        store.set_session("tok", &UserInfo::new("u1", "alice")).unwrap();

        assert!(check(Page::Wallet, &store).is_render());
        assert!(!check(Page::Login, &store).is_render());
        assert!(check(Page::VerifyEmail, &store).is_render());
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert!(store.user().is_some());
    }

    #[test]
    fn post_login_target_only_honours_protected_pages() {
        assert_eq!(post_login_target(None), "/dashboard");
        assert_eq!(post_login_target(Some("/wallet")), "/wallet");
        assert_eq!(post_login_target(Some("%2Ftransactions")), "/transactions");
        assert_eq!(post_login_target(Some("/login")), "/dashboard");
        assert_eq!(post_login_target(Some("https://evil.example")), "/dashboard");
    }

    #[test]
    fn every_page_has_a_distinct_title() {
        let titles: std::collections::HashSet<_> = Page::ALL.iter().map(|p| p.title()).collect();
        assert_eq!(titles.len(), Page::ALL.len());
        assert_eq!(Page::Market.title(), "Market Trends");
    }
}
