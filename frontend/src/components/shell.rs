//! 仪表盘外壳：侧边栏 + 顶栏 + 内容区
//!
//! 三个角色的仪表盘共用，除显示名称外不持有状态。

use crate::auth::{logout, use_auth};
use crate::components::icons::{LogOut, Sparkles};
use crate::web::router::use_router;
use leptos::prelude::*;
use wellness_hub::AppRoute;
use wellness_hub::controllers::Notice;

/// 侧边栏条目
///
/// `on_select` 既可以是路由跳转，也可以是页内的标签切换。
pub struct SidebarItem {
    pub label: &'static str,
    pub icon: AnyView,
    pub active: Signal<bool>,
    pub on_select: Callback<()>,
}

impl SidebarItem {
    pub fn new(
        label: &'static str,
        icon: AnyView,
        active: impl Into<Signal<bool>>,
        on_select: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            label,
            icon,
            active: active.into(),
            on_select: Callback::new(move |_| on_select()),
        }
    }
}

#[component]
pub fn DashboardShell(
    /// 品牌下方的小字，例如 "Holistic Portal"
    #[prop(into)]
    subtitle: String,
    items: Vec<SidebarItem>,
    children: Children,
) -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let name = ctx.display_name();
    let initial = move || {
        name.get()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        logout(&ctx);
        router.navigate_to(AppRoute::auth_failure_redirect());
    };

    let entries = items
        .into_iter()
        .map(|item| {
            let active = item.active;
            let on_select = item.on_select;
            view! {
                <li>
                    <a
                        class=move || if active.get() { "menu-active gap-3" } else { "gap-3" }
                        on:click=move |_| on_select.run(())
                    >
                        {item.icon}
                        {item.label}
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="min-h-screen bg-base-200 flex font-sans">
            <aside class="w-64 bg-base-100 shadow-xl hidden md:flex flex-col">
                <div class="p-6 flex items-center gap-3">
                    <div class="p-2 bg-primary/10 rounded-xl text-primary">
                        <Sparkles attr:class="h-6 w-6" />
                    </div>
                    <div>
                        <div class="font-bold text-lg">"Wellness Hub"</div>
                        <div class="text-xs text-base-content/60">{subtitle}</div>
                    </div>
                </div>
                <ul class="menu flex-1 w-full px-4 gap-1">{entries}</ul>
                <div class="p-4">
                    <button class="btn btn-outline btn-error w-full gap-2" on:click=on_logout>
                        <LogOut attr:class="h-4 w-4" />
                        "Logout"
                    </button>
                </div>
            </aside>

            <div class="flex-1 flex flex-col">
                <header class="navbar bg-base-100 shadow px-6">
                    <div class="flex-1">
                        <h2 class="text-xl font-semibold">"Welcome, " {move || name.get()}</h2>
                    </div>
                    <div class="avatar avatar-placeholder">
                        <div class="bg-primary text-primary-content w-10 rounded-full">
                            <span>{initial}</span>
                        </div>
                    </div>
                </header>
                <main class="p-4 md:p-8 space-y-6">{children()}</main>
            </div>
        </div>
    }
}

/// 右上角的浮动提示
#[component]
pub fn NoticeToast(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    move || {
        notice.get().map(|n| {
            let class = if n.is_error() {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{n.text().to_string()}</span>
                    </div>
                </div>
            }
        })
    }
}

/// 页内错误横幅
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{text}</span>
                </div>
            }
        })
    }
}

/// 整页加载指示
#[component]
pub fn PageSpinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-[40vh]">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}
