//! Login page component.

use cryptohub_session::flows::{self, LoginOutcome};
use cryptohub_session::gate::{Page, RedirectReason};
use cryptohub_session::validation::LoginForm;
use cryptohub_session::ClientConfig;
use leptos::ev;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::components::Alert;
use crate::AuthState;

/// Email/password form with a resend-verification fallback.
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();
    let query = use_query_map();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);
    // Set when the server says the account still needs email verification.
    let (resend_email, set_resend_email) = signal(Option::<String>::None);
    let (resending, set_resending) = signal(false);

    let redirect_to = query.with_untracked(|q| q.get("redirectTo"));
    query.with_untracked(|q| {
        if q.get("logout").as_deref() == Some("success") {
            set_notice.set(Some("You have been logged out.".into()));
        } else if let Some(reason) = q.get("reason").as_deref().and_then(RedirectReason::parse) {
            set_notice.set(Some(reason.notice().into()));
        }
    });

    let delay = config.redirect_delay;
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        set_loading.set(true);
        set_error.set(None);
        set_notice.set(None);
        set_resend_email.set(None);

        let form = LoginForm::new(email.get_untracked(), password.get_untracked());
        let auth = auth.clone();
        let navigate = navigate.clone();
        let redirect_to = redirect_to.clone();
        leptos::task::spawn_local(async move {
            let client = auth.client();
            let outcome = flows::login(&client, &form, redirect_to.as_deref(), delay).await;
            if !outcome.keeps_submit_disabled() {
                set_loading.set(false);
            }
            match outcome {
                LoginOutcome::Success {
                    notice,
                    target,
                    delay,
                    ..
                } => {
                    set_notice.set(Some(notice));
                    auth.sync();
                    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                    gloo_timers::future::TimeoutFuture::new(millis).await;
                    navigate(&target, Default::default());
                }
                LoginOutcome::NeedsVerification { email, message } => {
                    set_error.set(Some(message));
                    set_resend_email.set(Some(email));
                }
                LoginOutcome::Failed(e) => set_error.set(Some(e.message)),
            }
        });
    };

    let auth_resend = expect_context::<AuthState>();
    let on_resend = move |_| {
        let Some(email) = resend_email.get_untracked() else {
            return;
        };
        set_resending.set(true);
        let client = auth_resend.client();
        leptos::task::spawn_local(async move {
            match flows::resend_verification(&client, &email).await {
                Ok(msg) => {
                    set_error.set(None);
                    set_notice.set(Some(msg));
                    set_resend_email.set(None);
                }
                Err(e) => set_error.set(Some(e.message)),
            }
            set_resending.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center">
            <div class="card bg-base-200 border border-base-300 w-full max-w-sm">
                <div class="card-body">
                    <h1 class="text-2xl font-bold text-center">"Welcome back"</h1>
                    <p class="text-center text-sm text-base-content/60 mb-4">"Sign in to your CryptoHub account"</p>

                    <Alert message=notice kind="alert-success" />
                    <Alert message=error />

                    {move || resend_email.get().map(|_| view! {
                        <button
                            class="btn btn-outline btn-sm w-full mb-4"
                            disabled=move || resending.get()
                            on:click=on_resend.clone()
                        >
                            {move || if resending.get() { "Sending…" } else { "Resend verification email" }}
                        </button>
                    })}

                    <form on:submit=on_submit>
                        <fieldset class="fieldset">
                            <label class="fieldset-label" for="email">"Email"</label>
                            <input
                                id="email"
                                class="input input-bordered w-full"
                                type="email"
                                placeholder="you@example.com"
                                prop:value=move || email.get()
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                            />
                        </fieldset>
                        <fieldset class="fieldset">
                            <label class="fieldset-label" for="password">"Password"</label>
                            <input
                                id="password"
                                class="input input-bordered w-full"
                                type="password"
                                placeholder="••••••••"
                                prop:value=move || password.get()
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                            />
                        </fieldset>
                        <button
                            class="btn btn-primary w-full mt-4"
                            type="submit"
                            disabled=move || loading.get()
                        >
                            {move || if loading.get() { "Signing in…" } else { "Sign in" }}
                        </button>
                    </form>

                    <div class="flex justify-between text-sm mt-4">
                        <a class="link" href=Page::ForgotPassword.path()>"Forgot password?"</a>
                        <a class="link" href=Page::Register.path()>"Create an account"</a>
                    </div>
                </div>
            </div>
        </div>
    }
}
