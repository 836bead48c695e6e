//! Deposit addresses. These come from build configuration; there is no
//! deposit endpoint.

use cryptohub_session::gate::Page;
use cryptohub_session::ClientConfig;
use leptos::prelude::*;

use crate::components::{asset_select, empty_state, page_header, Alert};

#[component]
pub fn DepositPage() -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let addresses = config.deposit_addresses.clone();

    if addresses.is_empty() {
        return view! {
            <div>
                {page_header(Page::Deposit, "Fund your wallet")}
                {empty_state("🏦", "Deposits unavailable", "No deposit addresses are configured for this deployment.")}
            </div>
        }
        .into_any();
    }

    let assets: Vec<String> = addresses.keys().cloned().collect();
    let (asset, set_asset) = signal(assets[0].clone());
    let (notice, set_notice) = signal(Option::<String>::None);
    let (error, set_error) = signal(Option::<String>::None);

    let address = Memo::new(move |_| {
        asset.with(|a| addresses.get(a).cloned().unwrap_or_default())
    });

    let on_copy = move |_| {
        set_notice.set(None);
        set_error.set(None);
        let Some(window) = web_sys::window() else {
            return;
        };
        let text = address.get_untracked();
        let promise = window.navigator().clipboard().write_text(&text);
        leptos::task::spawn_local(async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => set_notice.set(Some("Address copied to clipboard.".into())),
                Err(e) => {
                    log::warn!("clipboard write failed: {e:?}");
                    set_error.set(Some("Could not copy. Select the address and copy it manually.".into()));
                }
            }
        });
    };

    view! {
        <div class="max-w-lg">
            {page_header(Page::Deposit, "Send crypto to your CryptoHub address")}

            <Alert message=notice kind="alert-success" />
            <Alert message=error />

            <div class="card bg-base-200 border border-base-300">
                <div class="card-body">
                    <fieldset class="fieldset">
                        <label class="fieldset-label">"Asset"</label>
                        {asset_select(assets, asset, set_asset)}
                    </fieldset>
                    <fieldset class="fieldset">
                        <label class="fieldset-label" for="deposit-address">"Deposit address"</label>
                        <div class="join w-full">
                            <input
                                id="deposit-address"
                                class="input input-bordered join-item w-full font-mono text-xs"
                                type="text"
                                readonly
                                prop:value=move || address.get()
                            />
                            <button class="btn join-item" on:click=on_copy>"Copy"</button>
                        </div>
                    </fieldset>
                    <p class="text-xs text-base-content/60">
                        {move || format!("Only send {} to this address.", asset.get())}
                    </p>
                </div>
            </div>
        </div>
    }
    .into_any()
}
