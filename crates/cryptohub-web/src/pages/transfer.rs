//! Send funds to another CryptoHub user.

use cryptohub_session::gate::Page;
use cryptohub_session::validation::TransferForm;
use leptos::ev;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::asset_choices;
use crate::components::{asset_select, page_header, Alert};
use crate::format::format_amount;
use crate::AuthState;

#[component]
pub fn TransferPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();
    let assets = asset_choices(auth.store());

    let (recipient, set_recipient) = signal(String::new());
    let (asset, set_asset) = signal(assets.first().cloned().unwrap_or_default());
    let (amount, set_amount) = signal(String::new());
    let (available, set_available) = signal(Option::<f64>::None);
    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (sending, set_sending) = signal(false);

    // Available balance follows the selected asset.
    let auth_balance = auth.clone();
    let navigate_balance = navigate.clone();
    Effect::new(move || {
        let selected = asset.get();
        if selected.is_empty() {
            return;
        }
        set_available.set(None);
        let auth = auth_balance.clone();
        let navigate = navigate_balance.clone();
        leptos::task::spawn_local(async move {
            match auth.client().wallet_balance(&selected).await {
                Ok(b) => set_available.set(Some(b.amount)),
                Err(e) => {
                    if let Some(msg) = auth.handle_error(Page::Transfer, e, &navigate) {
                        log::warn!("balance lookup for {selected} failed: {msg}");
                    }
                }
            }
        });
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() {
            return;
        }
        set_error.set(None);
        set_notice.set(None);

        let form = TransferForm {
            recipient: recipient.get_untracked(),
            asset: asset.get_untracked(),
            amount: amount.get_untracked(),
        };
        let body = match form.validate() {
            Ok(body) => body,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };

        set_sending.set(true);
        let auth = auth.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let client = auth.client();
            match client.transfer(&body).await {
                Ok(resp) => {
                    let msg = resp.message.unwrap_or_else(|| {
                        format!("Sent {} to {}.", format_amount(body.amount, &body.asset), body.recipient)
                    });
                    set_notice.set(Some(msg));
                    set_amount.set(String::new());
                    if let Ok(b) = client.wallet_balance(&body.asset).await {
                        set_available.set(Some(b.amount));
                    }
                }
                Err(e) => set_error.set(auth.handle_error(Page::Transfer, e, &navigate)),
            }
            set_sending.set(false);
        });
    };

    view! {
        <div class="max-w-lg">
            {page_header(Page::Transfer, "Send funds to another CryptoHub user")}

            <Alert message=notice kind="alert-success" />
            <Alert message=error />

            <form class="card bg-base-200 border border-base-300" on:submit=on_submit>
                <div class="card-body">
                    <fieldset class="fieldset">
                        <label class="fieldset-label" for="recipient">"Recipient (username or email)"</label>
                        <input
                            id="recipient"
                            class="input input-bordered w-full"
                            type="text"
                            prop:value=move || recipient.get()
                            on:input=move |ev| set_recipient.set(event_target_value(&ev))
                        />
                    </fieldset>
                    <fieldset class="fieldset">
                        <label class="fieldset-label">"Asset"</label>
                        {asset_select(assets, asset, set_asset)}
                        <p class="text-xs text-base-content/60">
                            {move || match available.get() {
                                Some(v) => format!("Available: {}", format_amount(v, &asset.get())),
                                None => "Available: —".to_string(),
                            }}
                        </p>
                    </fieldset>
                    <fieldset class="fieldset">
                        <label class="fieldset-label" for="amount">"Amount"</label>
                        <input
                            id="amount"
                            class="input input-bordered w-full"
                            type="text"
                            inputmode="decimal"
                            placeholder="0.00"
                            prop:value=move || amount.get()
                            on:input=move |ev| set_amount.set(event_target_value(&ev))
                        />
                    </fieldset>
                    <button class="btn btn-primary mt-4" type="submit" disabled=move || sending.get()>
                        {move || if sending.get() { "Sending…" } else { "Send" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
