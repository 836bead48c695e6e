//! CryptoHub web client: Leptos CSR WASM application.
//!
//! Single-page app over the CryptoHub REST API. All persisted state goes
//! through `cryptohub_session::SessionStore`; every route is wrapped in the
//! auth gate before its page component runs.

pub mod api;
pub mod components;
pub mod format;
pub mod pages;
pub mod storage;

use cryptohub_session::flows;
use cryptohub_session::gate::{self, Page};
use cryptohub_session::models::UserInfo;
use cryptohub_session::{ApiError, ClientConfig, SessionStore};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use leptos_router::NavigateOptions;

use api::{Client, GlooTransport};
use components::{Footer, Gated, NavBar};
use pages::dashboard::DashboardPage;
use pages::deposit::DepositPage;
use pages::forgot_password::ForgotPasswordPage;
use pages::home::HomePage;
use pages::investments::InvestmentsPage;
use pages::login::LoginPage;
use pages::market::MarketPage;
use pages::register::RegisterPage;
use pages::transactions::TransactionsPage;
use pages::transfer::TransferPage;
use pages::verify_email::VerifyEmailPage;
use pages::wallet::WalletPage;
use pages::withdraw::WithdrawPage;
use storage::BrowserStore;

// ── Auth State ──────────────────────────────────────────────────────

/// Global authentication state, provided via Leptos context.
///
/// The session store is the source of truth; `signed_in` mirrors it so the
/// navigation re-renders when a session starts or ends.
#[derive(Clone)]
pub struct AuthState {
    pub signed_in: ReadSignal<bool>,
    set_signed_in: WriteSignal<bool>,
    client: Client,
}

impl AuthState {
    fn new(config: &ClientConfig) -> Self {
        let store = SessionStore::new(BrowserStore);
        let (signed_in, set_signed_in) = signal(store.has_valid_token());
        Self {
            signed_in,
            set_signed_in,
            client: Client::new(GlooTransport::new(config), store),
        }
    }

    /// A handle to the REST client for use inside a spawned task.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub fn store(&self) -> &SessionStore<BrowserStore> {
        self.client.session()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.store().user()
    }

    /// Re-read token presence after something outside the signal changed it.
    pub fn sync(&self) {
        let present = self.store().has_valid_token();
        if self.signed_in.get_untracked() != present {
            self.set_signed_in.set(present);
        }
    }

    /// Clear the session and return the login URL to navigate to.
    pub fn logout(&self) -> String {
        let url = flows::logout(self.store());
        self.set_signed_in.set(false);
        url
    }

    /// Route a failed request from `page`.
    ///
    /// A rejected session navigates to login exactly like the gate would and
    /// yields `None`; every other failure yields the message to show.
    pub fn handle_error(
        &self,
        page: Page,
        err: ApiError,
        navigate: &impl Fn(&str, NavigateOptions),
    ) -> Option<String> {
        if err.is_unauthorized() {
            self.sync();
            navigate(&gate::login_redirect_for(page).to_url(), Default::default());
            None
        } else {
            Some(err.message)
        }
    }
}

// ── App Root ────────────────────────────────────────────────────────

/// Leptos application root.
#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_build_env();
    log::debug!("API base: {}", config.api_base);
    let auth = AuthState::new(&config);

    provide_context(config);
    provide_context(auth);

    view! {
        <Router>
            <div class="flex flex-col min-h-screen bg-base-100">
                <NavBar />
                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes fallback=|| view! { <NotFound /> }>
                        <Route path=path!("/") view=|| view! { <Gated page=Page::Home><HomePage /></Gated> } />
                        <Route path=path!("/market") view=|| view! { <Gated page=Page::Market><MarketPage /></Gated> } />
                        <Route path=path!("/login") view=|| view! { <Gated page=Page::Login><LoginPage /></Gated> } />
                        <Route path=path!("/register") view=|| view! { <Gated page=Page::Register><RegisterPage /></Gated> } />
                        <Route path=path!("/forgot-password") view=|| view! { <Gated page=Page::ForgotPassword><ForgotPasswordPage /></Gated> } />
                        <Route path=path!("/verify-email") view=|| view! { <Gated page=Page::VerifyEmail><VerifyEmailPage /></Gated> } />
                        <Route path=path!("/dashboard") view=|| view! { <Gated page=Page::Dashboard><DashboardPage /></Gated> } />
                        <Route path=path!("/wallet") view=|| view! { <Gated page=Page::Wallet><WalletPage /></Gated> } />
                        <Route path=path!("/transfer") view=|| view! { <Gated page=Page::Transfer><TransferPage /></Gated> } />
                        <Route path=path!("/withdraw") view=|| view! { <Gated page=Page::Withdraw><WithdrawPage /></Gated> } />
                        <Route path=path!("/deposit") view=|| view! { <Gated page=Page::Deposit><DepositPage /></Gated> } />
                        <Route path=path!("/transactions") view=|| view! { <Gated page=Page::Transactions><TransactionsPage /></Gated> } />
                        <Route path=path!("/investments") view=|| view! { <Gated page=Page::Investments><InvestmentsPage /></Gated> } />
                    </Routes>
                </main>
                <Footer />
            </div>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-16 text-center">
            <div class="text-5xl mb-4">"🧭"</div>
            <h3 class="text-lg font-medium mb-2">"Page not found"</h3>
            <a class="link link-primary" href=Page::Home.path()>"Back to home"</a>
        </div>
    }
}

// ── WASM entry point ────────────────────────────────────────────────

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("CryptoHub web client starting");
    leptos::mount::mount_to_body(App);
}
