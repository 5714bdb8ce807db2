use crate::auth::{spawn_scoped, use_auth, use_task_scope};
use crate::components::badges::BookingBadge;
use crate::components::icons::{Calendar, Compass, LayoutDashboard, UserIcon};
use crate::components::profile_form::ProfileForm;
use crate::components::shell::{DashboardShell, ErrorBanner, PageSpinner, SidebarItem};
use crate::web::router::use_router;
use leptos::prelude::*;
use wellness_hub::AppRoute;
use wellness_hub::controllers::{
    USER_PROFILE_MESSAGES, UserDashboardData, UserTab, load_user_dashboard,
};
use wellness_shared::date::{format_date, format_date_time};
use wellness_shared::{Booking, Profile};

fn practitioner_name(practitioners: &[Profile], id: u64) -> String {
    practitioners
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("Practitioner #{}", id))
}

fn next_session_card(data: &UserDashboardData) -> impl IntoView + use<> {
    match data.next_session() {
        Some(booking) => {
            let name = practitioner_name(&data.practitioners, booking.practitioner_id);
            let when = format_date_time(booking.booking_date.as_ref());
            view! {
                <div class="card bg-primary text-primary-content shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title gap-2">
                            <Calendar attr:class="h-5 w-5" />
                            "Next Session"
                        </h3>
                        <p class="text-lg font-semibold">{name}</p>
                        <p>{when}</p>
                        <div>
                            <BookingBadge status=booking.status />
                        </div>
                    </div>
                </div>
            }
                .into_any()
        }
        None => {
            view! {
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"No upcoming sessions"</h3>
                        <p class="text-base-content/70">
                            "Browse the marketplace to book your first session."
                        </p>
                    </div>
                </div>
            }
                .into_any()
        }
    }
}

fn history_row(booking: &Booking, practitioners: &[Profile]) -> impl IntoView + use<> {
    let name = practitioner_name(practitioners, booking.practitioner_id);
    let date = format_date(booking.booking_date.as_ref());
    let notes = booking.notes.clone().unwrap_or_default();
    view! {
        <tr>
            <td>{name}</td>
            <td>{date}</td>
            <td>
                <BookingBadge status=booking.status />
            </td>
            <td class="hidden md:table-cell text-base-content/70">{notes}</td>
        </tr>
    }
}

#[component]
pub fn UserDashboardPage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let scope = use_task_scope();

    let tab = RwSignal::new(UserTab::default());
    let data = RwSignal::new(Option::<UserDashboardData>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    {
        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { load_user_dashboard(&api).await },
            move |result| match result {
                Ok(loaded) => data.set(Some(loaded)),
                Err(e) => set_error_msg.set(Some(e.user_message("Failed to load your dashboard"))),
            },
        );
    }

    let items = vec![
        SidebarItem::new(
            "Overview",
            view! { <LayoutDashboard attr:class="h-5 w-5" /> }.into_any(),
            Signal::derive(move || tab.get() == UserTab::Overview),
            move || tab.set(UserTab::Overview),
        ),
        SidebarItem::new(
            "Find Practitioners",
            view! { <Compass attr:class="h-5 w-5" /> }.into_any(),
            Signal::derive(|| false),
            move || router.navigate_to(AppRoute::Marketplace),
        ),
        SidebarItem::new(
            "My Profile",
            view! { <UserIcon attr:class="h-5 w-5" /> }.into_any(),
            Signal::derive(move || tab.get() == UserTab::Profile),
            move || tab.set(UserTab::Profile),
        ),
    ];

    // 不触发重新渲染，保存提示留在当前表单上
    let on_saved = Callback::new(move |saved: Profile| {
        data.update_untracked(|d| {
            if let Some(d) = d.as_mut() {
                d.profile = saved;
            }
        });
    });

    let overview = move |d: &UserDashboardData| {
        let rows = d
            .bookings
            .iter()
            .map(|b| history_row(b, &d.practitioners))
            .collect_view();
        let featured = d
            .featured_practitioners()
            .iter()
            .map(|p| {
                let name = p.name.clone();
                let spec = p.specialization_or_default().to_string();
                let initial = p.initial();
                view! {
                    <div class="flex items-center gap-3 p-3 rounded-box bg-base-200">
                        <div class="avatar avatar-placeholder">
                            <div class="bg-secondary text-secondary-content w-10 rounded-full">
                                <span>{initial}</span>
                            </div>
                        </div>
                        <div>
                            <div class="font-semibold">{name}</div>
                            <div class="text-xs text-base-content/60">{spec}</div>
                        </div>
                    </div>
                }
            })
            .collect_view();
        let total = d.bookings.len();

        view! {
            <div class="grid md:grid-cols-3 gap-6">
                <div class="md:col-span-2">{next_session_card(d)}</div>
                <div class="stats shadow bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Total Bookings"</div>
                        <div class="stat-value text-primary">{total}</div>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Featured Practitioners"</h3>
                    <div class="grid md:grid-cols-3 gap-3">{featured}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <h3 class="card-title p-6 pb-2">"Booking History"</h3>
                    <div class="overflow-x-auto">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Practitioner"</th>
                                    <th>"Date"</th>
                                    <th>"Status"</th>
                                    <th class="hidden md:table-cell">"Notes"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {if total == 0 {
                                    view! {
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                "No bookings yet."
                                            </td>
                                        </tr>
                                    }
                                        .into_any()
                                } else {
                                    rows.into_any()
                                }}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        }
    };

    view! {
        <DashboardShell subtitle="Holistic Portal" items=items>
            <ErrorBanner message=error_msg />
            {move || match data.get() {
                None if error_msg.get().is_none() => view! { <PageSpinner /> }.into_any(),
                None => ().into_any(),
                Some(d) => match tab.get() {
                    UserTab::Overview => overview(&d).into_any(),
                    UserTab::Profile => {
                        view! {
                            <ProfileForm
                                profile=d.profile.clone()
                                messages=USER_PROFILE_MESSAGES
                                on_saved=on_saved
                            />
                        }
                            .into_any()
                    }
                },
            }}
        </DashboardShell>
    }
}
