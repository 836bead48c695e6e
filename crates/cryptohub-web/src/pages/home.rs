//! Landing page.

use cryptohub_session::gate::Page;
use leptos::prelude::*;

use crate::AuthState;

#[component]
pub fn HomePage() -> impl IntoView {
    let signed_in = expect_context::<AuthState>().signed_in;

    view! {
        <div class="hero py-16">
            <div class="hero-content text-center">
                <div class="max-w-xl">
                    <h1 class="text-4xl font-bold">"Trade, hold and grow your crypto"</h1>
                    <p class="py-6 text-base-content/70">
                        "CryptoHub keeps your wallet, transfers and investments in one place."
                    </p>
                    <div class="flex justify-center gap-2">
                        {move || if signed_in.get() {
                            view! {
                                <a class="btn btn-primary" href=Page::Dashboard.path()>"Go to dashboard"</a>
                            }.into_any()
                        } else {
                            view! {
                                <a class="btn btn-primary" href=Page::Register.path()>"Get started"</a>
                                <a class="btn btn-ghost" href=Page::Login.path()>"Sign in"</a>
                            }.into_any()
                        }}
                        <a class="btn btn-outline" href=Page::Market.path()>"View market"</a>
                    </div>
                </div>
            </div>
        </div>
    }
}
