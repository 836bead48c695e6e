//! Password reset request page.
//!
//! The backend exposes no reset endpoint, so this page only checks the
//! address and points the user at support.

use cryptohub_session::gate::Page;
use cryptohub_session::validation::is_valid_email;
use leptos::ev;
use leptos::prelude::*;

use crate::components::Alert;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let address = email.get_untracked();
        if !is_valid_email(address.trim()) {
            set_notice.set(None);
            set_error.set(Some("Please enter a valid email address.".into()));
            return;
        }
        set_error.set(None);
        set_notice.set(Some(format!(
            "Contact support from {} and we will help you reset your password.",
            address.trim()
        )));
    };

    view! {
        <div class="flex items-center justify-center">
            <div class="card bg-base-200 border border-base-300 w-full max-w-sm">
                <div class="card-body">
                    <h1 class="text-2xl font-bold text-center">"Reset password"</h1>

                    <Alert message=notice kind="alert-info" />
                    <Alert message=error />

                    <form on:submit=on_submit>
                        <fieldset class="fieldset">
                            <label class="fieldset-label" for="email">"Email"</label>
                            <input
                                id="email"
                                class="input input-bordered w-full"
                                type="email"
                                prop:value=move || email.get()
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                            />
                        </fieldset>
                        <button class="btn btn-primary w-full mt-4" type="submit">"Continue"</button>
                    </form>
                    <a class="link text-sm text-center mt-4" href=Page::Login.path()>"Back to sign in"</a>
                </div>
            </div>
        </div>
    }
}
