use crate::auth::{flash, spawn_scoped, use_auth, use_task_scope};
use crate::components::icons::{Calendar, MapPin, Search};
use crate::components::shell::{NoticeToast, PageSpinner};
use crate::components::top_nav::TopNav;
use crate::web::router::use_router;
use leptos::prelude::*;
use wellness_hub::controllers::{MarketplaceState, Notice, load_marketplace};
use wellness_shared::Profile;

fn practitioner_card(practitioner: Profile, state: RwSignal<MarketplaceState>) -> impl IntoView {
    let location = practitioner.location();
    let specialization = practitioner.specialization_or_default().to_string();
    let initial = practitioner.initial();
    let name = practitioner.name.clone();

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <div class="card-body">
                <div class="flex items-center gap-4">
                    <div class="avatar avatar-placeholder">
                        <div class="bg-secondary text-secondary-content w-14 rounded-full">
                            <span class="text-xl">{initial}</span>
                        </div>
                    </div>
                    <div>
                        <h3 class="card-title">{name}</h3>
                        <span class="badge badge-primary badge-outline">{specialization}</span>
                    </div>
                </div>
                {location
                    .map(|loc| {
                        view! {
                            <p class="flex items-center gap-1 text-sm text-base-content/70">
                                <MapPin attr:class="h-4 w-4" />
                                {loc}
                            </p>
                        }
                    })}
                <div class="card-actions justify-end mt-2">
                    <button
                        class="btn btn-primary btn-sm gap-2"
                        on:click=move |_| {
                            let picked = practitioner.clone();
                            state.update(|s| s.open_booking(picked));
                        }
                    >
                        <Calendar attr:class="h-4 w-4" />
                        "Book Session"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn MarketplacePage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let scope = use_task_scope();
    let notice_millis = ctx.config.notice_millis;

    let state = RwSignal::new(MarketplaceState {
        loading: true,
        ..Default::default()
    });
    let notice = RwSignal::new(Option::<Notice>::None);

    // 提示写入 state 后转交浮动提示，按配置时长自动隐藏
    {
        let scope = scope.clone();
        Effect::new(move |_| {
            if let Some(next) = state.with(|s| s.notice.clone()) {
                state.update_untracked(|s| s.notice = None);
                flash(&scope, notice, next, notice_millis);
            }
        });
    }

    {
        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { load_marketplace(&api).await },
            move |result| {
                state.update(|s| {
                    s.loading = false;
                    match result {
                        Ok(data) => {
                            s.practitioners = data.practitioners;
                            s.profile = data.profile;
                        }
                        Err(e) => {
                            s.notice = Some(Notice::Error(
                                e.user_message("Failed to load practitioners"),
                            ));
                        }
                    }
                });
            },
        );
    }

    let on_confirm = move |_| {
        if state.with_untracked(|s| s.booking) {
            return;
        }
        let request = match state.with_untracked(MarketplaceState::booking_request) {
            Ok(request) => request,
            Err(message) => {
                state.update(|s| s.notice = Some(Notice::Error(message)));
                return;
            }
        };
        state.update(|s| s.booking = true);

        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { api.create_booking(&request).await },
            move |result| state.update(|s| s.finish_booking(result)),
        );
    };

    let cards = move || {
        state.with(|s| {
            s.filtered()
                .into_iter()
                .cloned()
                .map(|p| practitioner_card(p, state))
                .collect_view()
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <TopNav />
            <NoticeToast notice=notice />

            <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
                <div class="flex flex-col md:flex-row md:items-end justify-between gap-4">
                    <div>
                        <h1 class="text-3xl font-bold">"Find Your Practitioner"</h1>
                        <p class="text-base-content/70">"Every listed practitioner has been verified."</p>
                    </div>
                    <div class="flex gap-2 items-center">
                        <label class="input input-bordered flex items-center gap-2 w-full md:w-80">
                            <Search attr:class="h-4 w-4 opacity-60" />
                            <input
                                type="text"
                                class="grow"
                                placeholder="Search by name or specialization"
                                prop:value=move || state.with(|s| s.search.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    state.update(|s| s.search = value);
                                }
                            />
                        </label>
                        <Show when=move || state.with(|s| s.profile.is_some())>
                            <button
                                class="btn btn-outline"
                                on:click=move |_| {
                                    router.navigate_to(state.with_untracked(MarketplaceState::dashboard_route))
                                }
                            >
                                "My Dashboard"
                            </button>
                        </Show>
                    </div>
                </div>

                <Show when=move || !state.with(|s| s.loading) fallback=|| view! { <PageSpinner /> }>
                    <Show
                        when=move || state.with(|s| !s.filtered().is_empty())
                        fallback=|| {
                            view! {
                                <div class="text-center py-16 text-base-content/50">
                                    "No practitioners match your search."
                                </div>
                            }
                        }
                    >
                        <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-6">{cards}</div>
                    </Show>
                </Show>
            </div>

            {move || {
                state
                    .with(|s| s.draft.clone())
                    .map(|draft| {
                        view! {
                            <div class="modal modal-open">
                                <div class="modal-box space-y-4">
                                    <h3 class="font-bold text-lg">
                                        "Book a session with " {draft.practitioner.name.clone()}
                                    </h3>
                                    <p class="text-sm text-base-content/70">
                                        {draft.practitioner.specialization_or_default().to_string()}
                                    </p>
                                    <textarea
                                        class="textarea textarea-bordered w-full"
                                        placeholder="Tell the practitioner what you'd like help with"
                                        prop:value=draft.notes.clone()
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            state.update_untracked(|s| s.set_notes(value));
                                        }
                                    ></textarea>
                                    <div class="modal-action">
                                        <button
                                            class="btn btn-ghost"
                                            on:click=move |_| state.update(MarketplaceState::close_booking)
                                        >
                                            "Cancel"
                                        </button>
                                        <button
                                            class="btn btn-primary"
                                            disabled=move || state.with(|s| s.booking)
                                            on:click=on_confirm.clone()
                                        >
                                            {move || {
                                                if state.with(|s| s.booking) {
                                                    "Booking..."
                                                } else {
                                                    "Confirm Booking"
                                                }
                                            }}
                                        </button>
                                    </div>
                                </div>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
