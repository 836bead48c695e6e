//! Shared layout pieces: the auth gate wrapper and navigation.

use cryptohub_session::gate::{self, GateDecision, Page};
use cryptohub_session::nav::{NavItem, NavVisibility};
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;

use crate::AuthState;

/// Runs the auth gate once for this page load and either renders the page
/// or redirects.
#[component]
pub fn Gated(page: Page, children: Children) -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let decision = gate::check(page, auth.store());
    auth.sync();

    match decision {
        GateDecision::Render => children().into_any(),
        GateDecision::Redirect(redirect) => {
            log::debug!("gate: {} -> {}", page.path(), redirect.to_url());
            view! { <Redirect path=redirect.to_url() /> }.into_any()
        }
    }
}

/// Error or success banner; renders nothing for `None`.
#[component]
pub fn Alert(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(default = "alert-error")] kind: &'static str,
) -> impl IntoView {
    move || {
        message.get().map(|m| {
            view! { <div class=format!("alert {kind} text-sm mb-4")>{m}</div> }
        })
    }
}

fn nav_link(item: NavItem) -> impl IntoView {
    let href = item.page().map(Page::path).unwrap_or("#");
    view! {
        <li><a href=href>{item.label()}</a></li>
    }
}

// ── Primary navigation ──────────────────────────────────────────────

const PRIMARY_ITEMS: [NavItem; 6] = NavItem::ALL;

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let signed_in = auth.signed_in;
    let navigate = use_navigate();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        let url = auth.logout();
        navigate(&url, Default::default());
    };

    view! {
        <nav class="navbar bg-base-200 border-b border-base-300 px-4">
            <div class="flex-1 gap-4">
                <a class="text-xl font-bold" href=Page::Home.path()>"CryptoHub"</a>
                <a class="link link-hover text-sm" href=Page::Market.path()>"Market"</a>
            </div>
            <ul class="menu menu-horizontal gap-1">
                {move || {
                    let nav = NavVisibility::for_session(signed_in.get());
                    nav.filter(&PRIMARY_ITEMS)
                        .filter(|item| *item != NavItem::Logout)
                        .map(nav_link)
                        .collect_view()
                }}
                {move || {
                    let on_logout = on_logout.clone();
                    NavVisibility::for_session(signed_in.get())
                        .is_visible(NavItem::Logout)
                        .then(|| view! {
                            <li>
                                <button class="btn btn-ghost btn-sm" on:click=on_logout>
                                    {NavItem::Logout.label()}
                                </button>
                            </li>
                        })
                }}
            </ul>
        </nav>
    }
}

// ── Footer ──────────────────────────────────────────────────────────

/// The footer carries a shorter link list than the navbar and no logout.
const FOOTER_ITEMS: [NavItem; 4] = [
    NavItem::Login,
    NavItem::Register,
    NavItem::Dashboard,
    NavItem::Wallet,
];

#[component]
pub fn Footer() -> impl IntoView {
    let signed_in = expect_context::<AuthState>().signed_in;

    view! {
        <footer class="footer footer-center bg-base-200 p-6 text-sm">
            <ul class="flex gap-4">
                <li><a href=Page::Market.path()>"Market"</a></li>
                {move || {
                    NavVisibility::for_session(signed_in.get())
                        .filter(&FOOTER_ITEMS)
                        .map(nav_link)
                        .collect_view()
                }}
            </ul>
            <p class="text-base-content/60">"© CryptoHub. Crypto assets are volatile; invest responsibly."</p>
        </footer>
    }
}

// ── Page fragments ──────────────────────────────────────────────────

pub fn loading_text() -> impl IntoView {
    view! { <p class="text-base-content/60">"Loading…"</p> }
}

pub fn empty_state(icon: &'static str, title: &'static str, hint: &'static str) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-16 text-center">
            <div class="text-5xl mb-4">{icon}</div>
            <h3 class="text-lg font-medium mb-2">{title}</h3>
            <p class="text-sm text-base-content/60">{hint}</p>
        </div>
    }
}

/// Title row shared by every page.
pub fn page_header(page: Page, subtitle: &'static str) -> impl IntoView {
    view! {
        <div class="mb-6">
            <h2 class="text-2xl font-semibold">{page.title()}</h2>
            <p class="text-sm text-base-content/60 mt-1">{subtitle}</p>
        </div>
    }
}

/// `<select>` over `options`, bound to `value`.
pub fn asset_select(
    options: Vec<String>,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <select
            class="select select-bordered w-full"
            prop:value=move || value.get()
            on:change=move |ev| set_value.set(event_target_value(&ev))
        >
            {options
                .into_iter()
                .map(|asset| view! { <option value=asset.clone()>{asset.clone()}</option> })
                .collect_view()}
        </select>
    }
}
