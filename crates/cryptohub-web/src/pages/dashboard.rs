//! Account overview: profile, balances and an investments summary.

use cryptohub_session::gate::Page;
use cryptohub_session::models::{Balance, Investment};
use cryptohub_session::ApiError;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::{empty_state, loading_text, Alert};
use crate::format::{format_amount, format_usd};
use crate::AuthState;

fn portfolio_value(balances: &[Balance]) -> f64 {
    balances.iter().filter_map(|b| b.usd_value).sum()
}

fn invested_total(investments: &[Investment]) -> f64 {
    investments
        .iter()
        .filter(|i| i.status == "active")
        .map(|i| i.current_value.unwrap_or(i.amount))
        .sum()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();

    let (user, set_user) = signal(auth.user());
    // Cached balances render immediately and are replaced once the fetch lands.
    let (balances, set_balances) = signal(auth.store().cached_balances());
    let (investments, set_investments) = signal(Option::<Vec<Investment>>::None);
    let (error, set_error) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(true);

    let auth_load = auth.clone();
    leptos::task::spawn_local(async move {
        let client = auth_load.client();
        let result = async {
            set_user.set(Some(client.profile().await?));
            set_balances.set(Some(client.wallet_balances().await?));
            set_investments.set(Some(client.investments().await?));
            Ok::<_, ApiError>(())
        }
        .await;
        if let Err(e) = result {
            set_error.set(auth_load.handle_error(Page::Dashboard, e, &navigate));
        }
        set_loading.set(false);
    });

    view! {
        <div>
            <div class="mb-6">
                <h2 class="text-2xl font-semibold">
                    {move || match user.get() {
                        Some(u) => format!("Welcome back, {}", u.display_name()),
                        None => "Welcome back".to_string(),
                    }}
                </h2>
                <p class="text-sm text-base-content/60 mt-1">
                    {move || user.get().and_then(|u| u.email).unwrap_or_default()}
                </p>
            </div>

            <Alert message=error />

            <div class="stats stats-vertical lg:stats-horizontal bg-base-200 border border-base-300 w-full mb-6">
                <div class="stat">
                    <div class="stat-title">"Portfolio value"</div>
                    <div class="stat-value text-2xl">
                        {move || balances.get().map(|b| format_usd(portfolio_value(&b))).unwrap_or_else(|| "—".into())}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Invested"</div>
                    <div class="stat-value text-2xl">
                        {move || investments.get().map(|i| format_usd(invested_total(&i))).unwrap_or_else(|| "—".into())}
                    </div>
                    <div class="stat-desc">
                        {move || investments.get().map(|i| {
                            let active = i.iter().filter(|i| i.status == "active").count();
                            format!("{active} active")
                        })}
                    </div>
                </div>
            </div>

            <div class="card bg-base-200 border border-base-300">
                <div class="card-body">
                    <div class="flex justify-between items-center">
                        <h3 class="card-title">"Balances"</h3>
                        <a class="link link-primary text-sm" href=Page::Wallet.path()>"Open wallet"</a>
                    </div>
                    {move || match balances.get() {
                        None if loading.get() => loading_text().into_any(),
                        Some(list) if !list.is_empty() => view! {
                            <ul class="divide-y divide-base-300">
                                {list.into_iter().map(|b| view! {
                                    <li class="flex justify-between py-2">
                                        <span class="font-medium">{b.asset.clone()}</span>
                                        <span class="font-mono">{format_amount(b.amount, &b.asset)}</span>
                                    </li>
                                }).collect_view()}
                            </ul>
                        }.into_any(),
                        _ => empty_state("👛", "No balances yet", "Deposit funds to get started.").into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}
