//! Post-registration "check your inbox" page. Reachable with or without a
//! session.

use cryptohub_session::flows;
use cryptohub_session::gate::Page;
use cryptohub_session::validation::is_valid_email;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::Alert;
use crate::AuthState;

#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let query = use_query_map();

    let initial = query
        .with_untracked(|q| q.get("email"))
        .or_else(|| auth.user().and_then(|u| u.email))
        .unwrap_or_default();
    let (email, set_email) = signal(initial);
    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (sending, set_sending) = signal(false);

    let on_resend = move |_| {
        let address = email.get_untracked();
        if !is_valid_email(address.trim()) {
            set_error.set(Some("Please enter a valid email address.".into()));
            return;
        }
        set_error.set(None);
        set_sending.set(true);
        let client = auth.client();
        leptos::task::spawn_local(async move {
            match flows::resend_verification(&client, address.trim()).await {
                Ok(msg) => set_notice.set(Some(msg)),
                Err(e) => set_error.set(Some(e.message)),
            }
            set_sending.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center">
            <div class="card bg-base-200 border border-base-300 w-full max-w-md">
                <div class="card-body text-center">
                    <div class="text-5xl mb-2">"📧"</div>
                    <h1 class="text-2xl font-bold">"Verify your email"</h1>
                    <p class="text-sm text-base-content/60 mb-4">
                        "We sent a verification link to your inbox. Follow it to activate your account."
                    </p>

                    <Alert message=notice kind="alert-success" />
                    <Alert message=error />

                    <input
                        class="input input-bordered w-full mb-2"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <button class="btn btn-outline w-full" disabled=move || sending.get() on:click=on_resend>
                        {move || if sending.get() { "Sending…" } else { "Resend verification email" }}
                    </button>
                    <a class="link text-sm mt-4" href=Page::Login.path()>"Back to sign in"</a>
                </div>
            </div>
        </div>
    }
}
