//! Wallet balances.

use cryptohub_session::gate::Page;
use cryptohub_session::models::Balance;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::{empty_state, loading_text, page_header, Alert};
use crate::format::{format_amount, format_usd};
use crate::AuthState;

#[component]
pub fn WalletPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();

    let (balances, set_balances) = signal(auth.store().cached_balances());
    let (error, set_error) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);

    let refresh = move || {
        if loading.get_untracked() {
            return;
        }
        set_loading.set(true);
        set_error.set(None);
        let auth = auth.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match auth.client().wallet_balances().await {
                Ok(list) => set_balances.set(Some(list)),
                Err(e) => set_error.set(auth.handle_error(Page::Wallet, e, &navigate)),
            }
            set_loading.set(false);
        });
    };

    // Initial load
    refresh();
    let on_refresh = {
        let refresh = refresh.clone();
        move |_| refresh()
    };

    view! {
        <div>
            <div class="flex justify-between items-start">
                {page_header(Page::Wallet, "Your balances across all assets")}
                <button class="btn btn-sm btn-outline" disabled=move || loading.get() on:click=on_refresh>
                    "Refresh"
                </button>
            </div>

            <div class="flex gap-2 mb-6">
                <a class="btn btn-primary btn-sm" href=Page::Deposit.path()>"Deposit"</a>
                <a class="btn btn-sm" href=Page::Transfer.path()>"Transfer"</a>
                <a class="btn btn-sm" href=Page::Withdraw.path()>"Withdraw"</a>
            </div>

            <Alert message=error />

            {move || match balances.get() {
                None if loading.get() => loading_text().into_any(),
                Some(list) if !list.is_empty() => balance_table(list).into_any(),
                _ => empty_state("👛", "Your wallet is empty", "Deposit an asset to see it here.").into_any(),
            }}
        </div>
    }
}

fn balance_table(list: Vec<Balance>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto">
            <table class="table table-sm">
                <thead>
                    <tr>
                        <th>"Asset"</th>
                        <th class="text-right">"Amount"</th>
                        <th class="text-right">"Value"</th>
                    </tr>
                </thead>
                <tbody>
                    {list.into_iter().map(|b| view! {
                        <tr>
                            <td class="font-medium">{b.asset.clone()}</td>
                            <td class="text-right font-mono">{format_amount(b.amount, &b.asset)}</td>
                            <td class="text-right">{b.usd_value.map(format_usd).unwrap_or_else(|| "—".into())}</td>
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}
