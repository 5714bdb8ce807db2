use crate::auth::{flash, spawn_scoped, use_auth, use_task_scope};
use crate::components::badges::{BookingBadge, VerificationHeadline};
use crate::components::degree_upload::DegreeFilePicker;
use crate::components::icons::{FileText, LayoutDashboard, ShieldCheck, Upload, UserIcon};
use crate::components::profile_form::ProfileForm;
use crate::components::shell::{DashboardShell, ErrorBanner, NoticeToast, PageSpinner, SidebarItem};
use crate::web::location::open_in_new_tab;
use leptos::prelude::*;
use wellness_hub::DegreeUpload;
use wellness_hub::controllers::{
    Notice, PRACTITIONER_PROFILE_MESSAGES, PractitionerDashboardData, PractitionerTab,
    load_practitioner_dashboard, resubmit_degree,
};
use wellness_shared::date::format_date_time;
use wellness_shared::{BookingStatus, Profile};

fn overview(d: &PractitionerDashboardData) -> impl IntoView + use<> {
    let total = d.bookings.len();
    let pending = d
        .bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Pending)
        .count();
    let confirmed = d
        .bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .count();
    let rows = d
        .bookings
        .iter()
        .map(|b| {
            let client = format!("Client #{}", b.user_id);
            let when = format_date_time(b.booking_date.as_ref());
            let notes = b.notes.clone().unwrap_or_default();
            view! {
                <tr>
                    <td>{client}</td>
                    <td>{when}</td>
                    <td>
                        <BookingBadge status=b.status />
                    </td>
                    <td class="hidden md:table-cell text-base-content/70">{notes}</td>
                </tr>
            }
        })
        .collect_view();
    let status = d.status();

    view! {
        <div class="flex items-center justify-between">
            <h2 class="text-2xl font-bold">"Practice Overview"</h2>
            <VerificationHeadline status=status />
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Total Bookings"</div>
                <div class="stat-value text-primary">{total}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Pending"</div>
                <div class="stat-value text-warning">{pending}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Confirmed"</div>
                <div class="stat-value text-success">{confirmed}</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <h3 class="card-title p-6 pb-2">"Upcoming Bookings"</h3>
                <div class="overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Client"</th>
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
}

#[component]
pub fn PractitionerDashboardPage() -> impl IntoView {
    let ctx = use_auth();
    let scope = use_task_scope();

    let tab = RwSignal::new(PractitionerTab::default());
    let data = RwSignal::new(Option::<PractitionerDashboardData>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let notice = RwSignal::new(Option::<Notice>::None);
    let upload = RwSignal::new(Option::<DegreeUpload>::None);
    let (uploading, set_uploading) = signal(false);
    let notice_millis = ctx.config.notice_millis;

    {
        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { load_practitioner_dashboard(&api).await },
            move |result| match result {
                Ok(loaded) => data.set(Some(loaded)),
                Err(e) => set_error_msg.set(Some(e.user_message("Failed to load your dashboard"))),
            },
        );
    }

    let tab_item = move |label: &'static str, icon: AnyView, which: PractitionerTab| {
        SidebarItem::new(
            label,
            icon,
            Signal::derive(move || tab.get() == which),
            move || tab.set(which),
        )
    };
    let items = vec![
        tab_item(
            "Overview",
            view! { <LayoutDashboard attr:class="h-5 w-5" /> }.into_any(),
            PractitionerTab::Overview,
        ),
        tab_item(
            "My Profile",
            view! { <UserIcon attr:class="h-5 w-5" /> }.into_any(),
            PractitionerTab::Profile,
        ),
        tab_item(
            "Verification",
            view! { <ShieldCheck attr:class="h-5 w-5" /> }.into_any(),
            PractitionerTab::Verification,
        ),
    ];

    let on_saved = Callback::new(move |saved: Profile| {
        data.update_untracked(|d| {
            if let Some(d) = d.as_mut() {
                d.profile = saved;
            }
        });
    });

    let on_pick = Callback::new(move |picked: DegreeUpload| upload.set(Some(picked)));
    let on_pick_error = {
        let scope = scope.clone();
        Callback::new(move |message: String| {
            upload.set(None);
            flash(&scope, notice, Notice::Error(message), notice_millis);
        })
    };

    let on_upload = {
        let ctx = ctx.clone();
        let scope = scope.clone();
        move |_| {
            if uploading.get_untracked() {
                return;
            }
            let Some(file) = upload.get_untracked() else {
                flash(
                    &scope,
                    notice,
                    Notice::Error("Please select a file".to_string()),
                    notice_millis,
                );
                return;
            };
            let Some(owner) = data.with_untracked(|d| d.as_ref().map(|d| d.profile.clone())) else {
                return;
            };
            set_uploading.set(true);

            let api = ctx.api.clone();
            let config = ctx.config.clone();
            let flash_scope = scope.clone();
            spawn_scoped(
                &scope,
                async move { resubmit_degree(&api, &config, &owner, file).await },
                move |result| {
                    set_uploading.set(false);
                    let message = match result {
                        Ok((reloaded, message)) => {
                            upload.set(None);
                            data.set(Some(reloaded));
                            message
                        }
                        Err(message) => message,
                    };
                    flash(&flash_scope, notice, message, notice_millis);
                },
            );
        }
    };

    let document_url = {
        let config = ctx.config.clone();
        move |user_id: u64| config.degree_document_url(user_id)
    };

    let verification = move |d: &PractitionerDashboardData| {
        let status = d.status();
        let comment = d.profile.visible_admin_comment().map(str::to_string);
        let has_document = d.profile.degree_file.is_some();
        let url = document_url(d.profile.id);
        let can_submit = d.can_submit_document();
        let on_upload = on_upload.clone();

        view! {
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body gap-4">
                    <h3 class="card-title">"Verification Status"</h3>
                    <div>
                        <VerificationHeadline status=status />
                    </div>

                    {comment
                        .map(|text| {
                            view! {
                                <div role="alert" class="alert alert-warning">
                                    <div>
                                        <div class="font-bold">"Admin Comment"</div>
                                        <div class="text-sm">{text}</div>
                                    </div>
                                </div>
                            }
                        })}

                    {has_document
                        .then(|| {
                            view! {
                                <button
                                    class="btn btn-outline btn-sm gap-2 w-fit"
                                    on:click=move |_| open_in_new_tab(&url)
                                >
                                    <FileText attr:class="h-4 w-4" />
                                    "View Current Document"
                                </button>
                            }
                        })}

                    {can_submit
                        .then(|| {
                            view! {
                                <div class="divider">"Submit Your Degree"</div>
                                <DegreeFilePicker
                                    on_pick=on_pick
                                    on_error=on_pick_error
                                    disabled=uploading
                                />
                                <button
                                    class="btn btn-primary gap-2 w-fit"
                                    disabled=move || uploading.get()
                                    on:click=on_upload
                                >
                                    <Upload attr:class="h-4 w-4" />
                                    {move || if uploading.get() { "Uploading..." } else { "Upload Degree" }}
                                </button>
                            }
                        })}
                </div>
            </div>
        }
    };

    view! {
        <DashboardShell subtitle="Practitioner Portal" items=items>
            <NoticeToast notice=notice />
            <ErrorBanner message=error_msg />
            {move || match data.get() {
                None if error_msg.get().is_none() => view! { <PageSpinner /> }.into_any(),
                None => ().into_any(),
                Some(d) => match tab.get() {
                    PractitionerTab::Overview => overview(&d).into_any(),
                    PractitionerTab::Profile => {
                        view! {
                            <ProfileForm
                                profile=d.profile.clone()
                                messages=PRACTITIONER_PROFILE_MESSAGES
                                on_saved=on_saved
                                with_specialization=true
                            />
                        }
                            .into_any()
                    }
                    PractitionerTab::Verification => verification(&d).into_any(),
                },
            }}
        </DashboardShell>
    }
}
