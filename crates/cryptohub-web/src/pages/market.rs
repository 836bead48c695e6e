//! Public market table, refreshed on a timer.

use cryptohub_session::gate::Page;
use cryptohub_session::models::MarketAsset;
use cryptohub_session::ClientConfig;
use gloo_timers::callback::Interval;
use leptos::prelude::*;

use crate::components::{empty_state, loading_text, page_header, Alert};
use crate::format::{change_class, format_change, format_usd};
use crate::AuthState;

#[component]
pub fn MarketPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let config = expect_context::<ClientConfig>();

    let (assets, set_assets) = signal(Option::<Vec<MarketAsset>>::None);
    let (error, set_error) = signal(Option::<String>::None);
    let (updated, set_updated) = signal(Option::<String>::None);
    let (in_flight, set_in_flight) = signal(false);

    let refresh = move || {
        if in_flight.get_untracked() {
            return;
        }
        set_in_flight.set(true);
        let client = auth.client();
        leptos::task::spawn_local(async move {
            match client.market_data().await {
                Ok(list) => {
                    set_assets.set(Some(list));
                    set_error.set(None);
                    set_updated.set(Some(chrono::Local::now().format("%H:%M:%S").to_string()));
                }
                Err(e) => {
                    // Keep the last good table on screen.
                    set_assets.update(|a| {
                        a.get_or_insert_with(Vec::new);
                    });
                    set_error.set(Some(e.message));
                }
            }
            set_in_flight.set(false);
        });
    };

    // Initial load
    refresh();

    // Periodic refresh. The interval is owned by this page and cancelled
    // when the page is disposed.
    let period = u32::try_from(config.market_refresh.as_millis()).unwrap_or(u32::MAX);
    let poller = Interval::new(period, {
        let refresh = refresh.clone();
        move || refresh()
    });
    StoredValue::new_local(poller);

    view! {
        <div>
            <div class="flex justify-between items-start">
                {page_header(Page::Market, "Live prices across supported assets")}
                <span class="text-xs text-base-content/60">
                    {move || updated.get().map(|t| format!("Updated {t}"))}
                </span>
            </div>

            <Alert message=error />

            {move || match assets.get() {
                None => loading_text().into_any(),
                Some(list) if list.is_empty() => {
                    empty_state("📉", "No market data", "Prices will appear once the feed is available.").into_any()
                }
                Some(list) => view! {
                    <div class="overflow-x-auto">
                        <table class="table table-sm">
                            <thead>
                                <tr>
                                    <th>"Asset"</th>
                                    <th class="text-right">"Price"</th>
                                    <th class="text-right">"24h"</th>
                                    <th class="text-right">"Volume"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {list.into_iter().map(|a| {
                                    let change = a.change_24h.unwrap_or(0.0);
                                    view! {
                                        <tr>
                                            <td>
                                                <span class="font-medium">{a.symbol.clone()}</span>
                                                <span class="text-xs text-base-content/60 ml-2">{a.name.clone().unwrap_or_default()}</span>
                                            </td>
                                            <td class="text-right font-mono">{format_usd(a.price)}</td>
                                            <td class=format!("text-right font-mono {}", change_class(change))>
                                                {a.change_24h.map(format_change).unwrap_or_else(|| "—".into())}
                                            </td>
                                            <td class="text-right font-mono">
                                                {a.volume.map(format_usd).unwrap_or_else(|| "—".into())}
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
