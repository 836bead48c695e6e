//! Registration page.

use cryptohub_session::flows;
use cryptohub_session::gate::Page;
use cryptohub_session::validation::RegisterForm;
use leptos::ev;
use leptos::prelude::*;

use crate::components::Alert;
use crate::AuthState;

fn text_field(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <fieldset class="fieldset">
            <label class="fieldset-label" for=id>{label}</label>
            <input
                id=id
                class="input input-bordered w-full"
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
        </fieldset>
    }
}

/// Account creation. Success asks the user to verify their email; it does
/// not sign them in.
#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();

    let (firstname, set_firstname) = signal(String::new());
    let (lastname, set_lastname) = signal(String::new());
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (terms, set_terms) = signal(false);

    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        set_error.set(None);
        set_notice.set(None);

        let form = RegisterForm {
            firstname: firstname.get_untracked(),
            lastname: lastname.get_untracked(),
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
            accept_terms: terms.get_untracked(),
        };
        // Report validation failures inline without a loading flash.
        if let Err(e) = form.validate() {
            set_error.set(Some(e.to_string()));
            return;
        }

        set_loading.set(true);
        let client = auth.client();
        leptos::task::spawn_local(async move {
            match flows::register(&client, &form).await {
                Ok(msg) => {
                    set_notice.set(Some(msg));
                    for setter in [
                        set_firstname,
                        set_lastname,
                        set_username,
                        set_email,
                        set_password,
                        set_confirm,
                    ] {
                        setter.set(String::new());
                    }
                    set_terms.set(false);
                }
                Err(e) => set_error.set(Some(e.message)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center">
            <div class="card bg-base-200 border border-base-300 w-full max-w-md">
                <div class="card-body">
                    <h1 class="text-2xl font-bold text-center">"Create your account"</h1>

                    <Alert message=notice kind="alert-success" />
                    <Alert message=error />

                    <form on:submit=on_submit>
                        <div class="grid grid-cols-2 gap-2">
                            {text_field("firstname", "First name", "text", firstname, set_firstname)}
                            {text_field("lastname", "Last name", "text", lastname, set_lastname)}
                        </div>
                        {text_field("username", "Username", "text", username, set_username)}
                        {text_field("email", "Email", "email", email, set_email)}
                        {text_field("password", "Password", "password", password, set_password)}
                        {text_field("confirm-password", "Confirm password", "password", confirm, set_confirm)}
                        <label class="label cursor-pointer justify-start gap-2 mt-2">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-sm"
                                prop:checked=move || terms.get()
                                on:change=move |ev| set_terms.set(event_target_checked(&ev))
                            />
                            <span class="text-sm">"I accept the terms and conditions"</span>
                        </label>
                        <button
                            class="btn btn-primary w-full mt-4"
                            type="submit"
                            disabled=move || loading.get()
                        >
                            {move || if loading.get() { "Creating account…" } else { "Create account" }}
                        </button>
                    </form>

                    <p class="text-sm text-center mt-4">
                        "Already registered? "
                        <a class="link" href=Page::Login.path()>"Sign in"</a>
                    </p>
                </div>
            </div>
        </div>
    }
}
