//! Investment plans: list, open and withdraw.

use cryptohub_session::gate::Page;
use cryptohub_session::models::Investment;
use cryptohub_session::validation::InvestmentForm;
use leptos::ev;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::asset_choices;
use crate::components::{asset_select, empty_state, loading_text, page_header, Alert};
use crate::format::{format_amount, format_timestamp, status_badge};
use crate::AuthState;

/// Plans offered in the create form: (value, label).
const PLANS: [(&str, &str); 3] = [
    ("starter", "Starter"),
    ("growth", "Growth"),
    ("premium", "Premium"),
];

#[component]
pub fn InvestmentsPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();
    let assets = asset_choices(auth.store());

    let (investments, set_investments) = signal(Option::<Vec<Investment>>::None);
    let (error, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(true);
    // Id of the investment currently being withdrawn.
    let (withdrawing, set_withdrawing) = signal(Option::<String>::None);

    let (plan, set_plan) = signal(PLANS[0].0.to_string());
    let (asset, set_asset) = signal(assets.first().cloned().unwrap_or_default());
    let (amount, set_amount) = signal(String::new());
    let (creating, set_creating) = signal(false);

    let load = {
        let auth = auth.clone();
        let navigate = navigate.clone();
        move || {
            let auth = auth.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match auth.client().investments().await {
                    Ok(list) => set_investments.set(Some(list)),
                    Err(e) => set_error.set(auth.handle_error(Page::Investments, e, &navigate)),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let on_create = {
        let auth = auth.clone();
        let navigate = navigate.clone();
        let load = load.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            if creating.get_untracked() {
                return;
            }
            set_error.set(None);
            set_notice.set(None);

            let form = InvestmentForm {
                plan: plan.get_untracked(),
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

            set_creating.set(true);
            let auth = auth.clone();
            let navigate = navigate.clone();
            let load = load.clone();
            leptos::task::spawn_local(async move {
                match auth.client().create_investment(&body).await {
                    Ok(resp) => {
                        set_notice.set(Some(resp.message.unwrap_or_else(|| {
                            format!("Invested {}.", format_amount(body.amount, &body.asset))
                        })));
                        set_amount.set(String::new());
                        load();
                    }
                    Err(e) => set_error.set(auth.handle_error(Page::Investments, e, &navigate)),
                }
                set_creating.set(false);
            });
        }
    };

    let on_withdraw = move |id: String| {
        if withdrawing.get_untracked().is_some() {
            return;
        }
        set_error.set(None);
        set_notice.set(None);
        set_withdrawing.set(Some(id.clone()));
        let auth = auth.clone();
        let navigate = navigate.clone();
        let load = load.clone();
        leptos::task::spawn_local(async move {
            match auth.client().withdraw_investment(&id).await {
                Ok(resp) => {
                    set_notice.set(Some(
                        resp.message.unwrap_or_else(|| "Investment withdrawn.".into()),
                    ));
                    load();
                }
                Err(e) => set_error.set(auth.handle_error(Page::Investments, e, &navigate)),
            }
            set_withdrawing.set(None);
        });
    };

    view! {
        <div>
            {page_header(Page::Investments, "Put your idle balances to work")}

            <Alert message=notice kind="alert-success" />
            <Alert message=error />

            <form class="card bg-base-200 border border-base-300 mb-6" on:submit=on_create>
                <div class="card-body">
                    <h3 class="card-title">"New investment"</h3>
                    <div class="grid md:grid-cols-3 gap-2">
                        <fieldset class="fieldset">
                            <label class="fieldset-label">"Plan"</label>
                            <select
                                class="select select-bordered w-full"
                                prop:value=move || plan.get()
                                on:change=move |ev| set_plan.set(event_target_value(&ev))
                            >
                                {PLANS.iter().map(|(value, label)| view! {
                                    <option value=*value>{*label}</option>
                                }).collect_view()}
                            </select>
                        </fieldset>
                        <fieldset class="fieldset">
                            <label class="fieldset-label">"Asset"</label>
                            {asset_select(assets, asset, set_asset)}
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
                    </div>
                    <button class="btn btn-primary mt-2 self-start" type="submit" disabled=move || creating.get()>
                        {move || if creating.get() { "Investing…" } else { "Invest" }}
                    </button>
                </div>
            </form>

            {move || match investments.get() {
                None if loading.get() => loading_text().into_any(),
                Some(list) if !list.is_empty() => {
                    let on_withdraw = on_withdraw.clone();
                    view! {
                        <div class="overflow-x-auto">
                            <table class="table table-sm">
                                <thead>
                                    <tr>
                                        <th>"Plan"</th>
                                        <th class="text-right">"Amount"</th>
                                        <th class="text-right">"Current value"</th>
                                        <th>"Status"</th>
                                        <th>"Opened"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {list.into_iter().map(|inv| {
                                        let on_withdraw = on_withdraw.clone();
                                        let id = inv.id.clone();
                                        let busy_id = inv.id.clone();
                                        let active = inv.status == "active";
                                        view! {
                                            <tr>
                                                <td class="capitalize">{inv.plan.clone().unwrap_or_else(|| "—".into())}</td>
                                                <td class="text-right font-mono">{format_amount(inv.amount, &inv.asset)}</td>
                                                <td class="text-right font-mono">
                                                    {inv.current_value.map(|v| format_amount(v, &inv.asset)).unwrap_or_else(|| "—".into())}
                                                </td>
                                                <td><span class=status_badge(&inv.status)>{inv.status.clone()}</span></td>
                                                <td class="text-xs">{format_timestamp(inv.created_at.as_deref())}</td>
                                                <td>
                                                    {active.then(|| view! {
                                                        <button
                                                            class="btn btn-xs btn-outline"
                                                            disabled=move || withdrawing.get().is_some_and(|w| w == busy_id)
                                                            on:click=move |_| on_withdraw(id.clone())
                                                        >
                                                            "Withdraw"
                                                        </button>
                                                    })}
                                                </td>
                                            </tr>
                                        }
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </div>
                    }.into_any()
                }
                _ => empty_state("📈", "No investments yet", "Open a plan above to start earning.").into_any(),
            }}
        </div>
    }
}
