//! Transaction history with a type filter.

use cryptohub_session::gate::Page;
use cryptohub_session::models::Transaction;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::{empty_state, loading_text, page_header, Alert};
use crate::format::{format_amount, format_timestamp, status_badge};
use crate::AuthState;

/// Filter choices: (value, label). An empty value shows everything.
const FILTERS: [(&str, &str); 5] = [
    ("", "All"),
    ("deposit", "Deposits"),
    ("withdrawal", "Withdrawals"),
    ("transfer", "Transfers"),
    ("investment", "Investments"),
];

fn matches_filter(tx: &Transaction, filter: &str) -> bool {
    filter.is_empty() || tx.kind.eq_ignore_ascii_case(filter)
}

#[component]
pub fn TransactionsPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();

    let (transactions, set_transactions) = signal(auth.store().cached_transactions());
    let (filter, set_filter) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(true);

    leptos::task::spawn_local(async move {
        match auth.client().transactions().await {
            Ok(list) => set_transactions.set(Some(list)),
            Err(e) => set_error.set(auth.handle_error(Page::Transactions, e, &navigate)),
        }
        set_loading.set(false);
    });

    let visible = move || {
        let f = filter.get();
        transactions
            .get()
            .map(|list| list.into_iter().filter(|tx| matches_filter(tx, &f)).collect::<Vec<_>>())
    };

    view! {
        <div>
            <div class="flex justify-between items-start">
                {page_header(Page::Transactions, "Deposits, withdrawals, transfers and investments")}
                <select
                    class="select select-bordered select-sm"
                    prop:value=move || filter.get()
                    on:change=move |ev| set_filter.set(event_target_value(&ev))
                >
                    {FILTERS.iter().map(|(value, label)| view! {
                        <option value=*value>{*label}</option>
                    }).collect_view()}
                </select>
            </div>

            <Alert message=error />

            {move || match visible() {
                None if loading.get() => loading_text().into_any(),
                Some(list) if !list.is_empty() => view! {
                    <div class="overflow-x-auto">
                        <table class="table table-sm">
                            <thead>
                                <tr>
                                    <th>"Date"</th>
                                    <th>"Type"</th>
                                    <th class="text-right">"Amount"</th>
                                    <th>"Status"</th>
                                    <th>"Description"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || list.clone()
                                    key=|tx| tx.id.clone()
                                    children=move |tx| view! {
                                        <tr>
                                            <td class="text-xs">{format_timestamp(tx.created_at.as_deref())}</td>
                                            <td class="capitalize">{tx.kind.clone()}</td>
                                            <td class="text-right font-mono">{format_amount(tx.amount, &tx.asset)}</td>
                                            <td><span class=status_badge(&tx.status)>{tx.status.clone()}</span></td>
                                            <td class="text-xs">{tx.description.clone().unwrap_or_default()}</td>
                                        </tr>
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                }.into_any(),
                Some(_) if !filter.get().is_empty() => {
                    empty_state("🔍", "Nothing matches this filter", "Try another transaction type.").into_any()
                }
                _ => empty_state("🧾", "No transactions yet", "Your activity will appear here.").into_any(),
            }}
        </div>
    }
}
