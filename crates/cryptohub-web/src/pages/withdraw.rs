//! Withdraw to an external address.

use cryptohub_session::gate::Page;
use cryptohub_session::validation::WithdrawForm;
use leptos::ev;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::asset_choices;
use crate::components::{asset_select, page_header, Alert};
use crate::format::format_amount;
use crate::AuthState;

#[component]
pub fn WithdrawPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();
    let assets = asset_choices(auth.store());

    let (address, set_address) = signal(String::new());
    let (asset, set_asset) = signal(assets.first().cloned().unwrap_or_default());
    let (amount, set_amount) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (sending, set_sending) = signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() {
            return;
        }
        set_error.set(None);
        set_notice.set(None);

        let form = WithdrawForm {
            address: address.get_untracked(),
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
            match client.withdraw(&body).await {
                Ok(resp) => {
                    let msg = resp.message.unwrap_or_else(|| {
                        format!("Withdrawal of {} submitted.", format_amount(body.amount, &body.asset))
                    });
                    set_notice.set(Some(msg));
                    set_address.set(String::new());
                    set_amount.set(String::new());
                    // Keep the cached balances in step for the wallet and dashboard.
                    if let Err(e) = client.wallet_balances().await {
                        log::warn!("balance refresh after withdrawal failed: {e}");
                    }
                }
                Err(e) => set_error.set(auth.handle_error(Page::Withdraw, e, &navigate)),
            }
            set_sending.set(false);
        });
    };

    view! {
        <div class="max-w-lg">
            {page_header(Page::Withdraw, "Move funds to an external wallet")}

            <Alert message=notice kind="alert-success" />
            <Alert message=error />

            <form class="card bg-base-200 border border-base-300" on:submit=on_submit>
                <div class="card-body">
                    <fieldset class="fieldset">
                        <label class="fieldset-label">"Asset"</label>
                        {asset_select(assets, asset, set_asset)}
                    </fieldset>
                    <fieldset class="fieldset">
                        <label class="fieldset-label" for="address">"Destination address"</label>
                        <input
                            id="address"
                            class="input input-bordered w-full font-mono"
                            type="text"
                            prop:value=move || address.get()
                            on:input=move |ev| set_address.set(event_target_value(&ev))
                        />
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
                    <p class="text-xs text-base-content/60">
                        "Double-check the address. Withdrawals to the wrong network cannot be reversed."
                    </p>
                    <button class="btn btn-primary mt-4" type="submit" disabled=move || sending.get()>
                        {move || if sending.get() { "Submitting…" } else { "Withdraw" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
