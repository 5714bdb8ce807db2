use crate::auth::{spawn_scoped, use_auth, use_task_scope};
use crate::components::badges::VerificationBadge;
use crate::components::icons::{
    CheckCircle, FileText, LayoutDashboard, Refresh, UsersIcon, XCircle,
};
use crate::components::shell::{DashboardShell, ErrorBanner, PageSpinner, SidebarItem};
use crate::web::location::open_in_new_tab;
use leptos::prelude::*;
use wellness_hub::controllers::{AdminBoard, AdminTab, load_admin_lists, run_admin_action};
use wellness_shared::{AdminAction, Profile};

fn stat(title: &'static str, value: usize, class: &'static str) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value {}", class)>{value}</div>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let ctx = use_auth();
    let scope = use_task_scope();

    let tab = RwSignal::new(AdminTab::default());
    let board = RwSignal::new(AdminBoard {
        loading: true,
        ..Default::default()
    });

    {
        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { load_admin_lists(&api).await },
            move |result| {
                board.update(|b| match result {
                    Ok(lists) => b.apply_lists(lists),
                    Err(e) => {
                        b.loading = false;
                        b.error = Some(e.user_message("Failed to load dashboard data"));
                    }
                })
            },
        );
    }

    let on_confirm = move |_| {
        let Some(pending) = board.try_update(AdminBoard::begin_action).flatten() else {
            return;
        };
        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { run_admin_action(&api, &pending).await },
            move |result| board.update(|b| b.finish_action(result)),
        );
    };

    let tab_item = move |label: &'static str, icon: AnyView, which: AdminTab| {
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
            AdminTab::Overview,
        ),
        tab_item(
            "Users",
            view! { <UsersIcon attr:class="h-5 w-5" /> }.into_any(),
            AdminTab::Users,
        ),
    ];

    let document_url = {
        let config = ctx.config.clone();
        move |id: u64| config.degree_document_url(id)
    };

    let action_button =
        move |p: &Profile, action: AdminAction, class: &'static str, icon: AnyView| {
            let target = p.clone();
            let id = p.id;
            view! {
                <button
                    class=class
                    title=action.label()
                    disabled=move || board.with(|b| b.processing.is_some())
                    on:click=move |_| board.update(|b| b.open_action(&target, action))
                >
                    {move || {
                        if board.with(|b| b.processing == Some(id)) {
                            view! { <span class="loading loading-spinner loading-xs"></span> }.into_any()
                        } else {
                            ().into_any()
                        }
                    }}
                    {icon}
                </button>
            }
        };

    let practitioner_row = move |p: &Profile| {
        let status = p.verification_status;
        let url = p.degree_file.as_ref().map(|_| document_url(p.id));
        let name = p.name.clone();
        let email = p.email.clone();
        let spec = p.specialization_or_default().to_string();
        view! {
            <tr>
                <td>
                    <div class="font-semibold">{name}</div>
                    <div class="text-xs text-base-content/60">{email}</div>
                </td>
                <td class="hidden md:table-cell">{spec}</td>
                <td>
                    {match status {
                        Some(status) => view! { <VerificationBadge status=status /> }.into_any(),
                        None => view! { <span class="text-base-content/50">"-"</span> }.into_any(),
                    }}
                </td>
                <td>
                    {match url {
                        Some(url) => {
                            view! {
                                <button
                                    class="btn btn-ghost btn-xs gap-1"
                                    on:click=move |_| open_in_new_tab(&url)
                                >
                                    <FileText attr:class="h-4 w-4" />
                                    "View"
                                </button>
                            }
                                .into_any()
                        }
                        None => view! { <span class="text-base-content/50">"No file"</span> }.into_any(),
                    }}
                </td>
                <td class="flex gap-1">
                    {action_button(
                        p,
                        AdminAction::Approve,
                        "btn btn-success btn-xs",
                        view! { <CheckCircle attr:class="h-4 w-4" /> }.into_any(),
                    )}
                    {action_button(
                        p,
                        AdminAction::Reject,
                        "btn btn-error btn-xs",
                        view! { <XCircle attr:class="h-4 w-4" /> }.into_any(),
                    )}
                    {action_button(
                        p,
                        AdminAction::RequestReupload,
                        "btn btn-warning btn-xs",
                        view! { <Refresh attr:class="h-4 w-4" /> }.into_any(),
                    )}
                </td>
            </tr>
        }
    };

    let user_row = |u: &Profile| {
        let name = u.name.clone();
        let email = u.email.clone();
        let role = u.role.label();
        let verified = if u.email_verified { "Verified" } else { "Unverified" };
        let location = u.location().unwrap_or_default();
        view! {
            <tr>
                <td>{name}</td>
                <td>{email}</td>
                <td>
                    <span class="badge badge-ghost">{role}</span>
                </td>
                <td>{verified}</td>
                <td class="hidden md:table-cell">{location}</td>
            </tr>
        }
    };

    let overview = move || {
        let stats = board.with(AdminBoard::stats);
        let rows = board.with(|b| {
            b.practitioners
                .iter()
                .map(|p| practitioner_row(p))
                .collect_view()
        });
        view! {
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                {stat("Total Practitioners", stats.practitioners, "text-primary")}
                {stat("Pending Approval", stats.pending_approval, "text-warning")}
                {stat("Approved", stats.approved, "text-success")}
                {stat("Total Users", stats.total_users, "text-secondary")}
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <h3 class="card-title p-6 pb-2">"Practitioner Verification"</h3>
                    <div class="overflow-x-auto">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Practitioner"</th>
                                    <th class="hidden md:table-cell">"Specialization"</th>
                                    <th>"Status"</th>
                                    <th>"Document"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>{rows}</tbody>
                        </table>
                    </div>
                </div>
            </div>
        }
    };

    let users = move || {
        let rows = board.with(|b| b.users.iter().map(|u| user_row(u)).collect_view());
        view! {
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <h3 class="card-title p-6 pb-2">"All Users"</h3>
                    <div class="overflow-x-auto">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Email"</th>
                                    <th>"Role"</th>
                                    <th>"Email Status"</th>
                                    <th class="hidden md:table-cell">"Location"</th>
                                </tr>
                            </thead>
                            <tbody>{rows}</tbody>
                        </table>
                    </div>
                </div>
            </div>
        }
    };

    let modal = move || {
        board.with(|b| b.pending.clone()).map(|pending| {
            let title = format!("{} {}?", pending.action.label(), pending.name);
            let with_comment = pending.action.accepts_comment();
            view! {
                <div class="modal modal-open">
                    <div class="modal-box space-y-4">
                        <h3 class="font-bold text-lg">{title}</h3>
                        {with_comment
                            .then(|| {
                                view! {
                                    <textarea
                                        class="textarea textarea-bordered w-full"
                                        placeholder="Comment for the practitioner (optional)"
                                        prop:value=pending.comment.clone()
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            board.update_untracked(|b| b.set_comment(value));
                                        }
                                    ></textarea>
                                }
                            })}
                        <div class="modal-action">
                            <button
                                class="btn btn-ghost"
                                disabled=move || board.with(|b| b.processing.is_some())
                                on:click=move |_| board.update(AdminBoard::cancel_action)
                            >
                                "Cancel"
                            </button>
                            <button
                                class="btn btn-primary"
                                disabled=move || board.with(|b| b.processing.is_some())
                                on:click=on_confirm.clone()
                            >
                                "Confirm"
                            </button>
                        </div>
                    </div>
                </div>
            }
        })
    };

    view! {
        <DashboardShell subtitle="Admin Console" items=items>
            <ErrorBanner message=Signal::derive(move || board.with(|b| b.error.clone())) />
            {move || {
                if board.with(|b| b.loading) {
                    view! { <PageSpinner /> }.into_any()
                } else {
                    match tab.get() {
                        AdminTab::Overview => overview().into_any(),
                        AdminTab::Users => users().into_any(),
                    }
                }
            }}
            {modal}
        </DashboardShell>
    }
}
