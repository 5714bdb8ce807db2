use crate::auth::{logout, use_auth};
use crate::components::icons::Sparkles;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use wellness_hub::AppRoute;

/// 公共页面（首页、市场）的顶部导航
#[component]
pub fn TopNav() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let session = ctx.session_signal();

    let home = move || {
        session
            .get()
            .map(|s| AppRoute::home_for(s.role).to_path())
            .unwrap_or(AppRoute::Login.to_path())
    };

    let on_logout = move |_| {
        logout(&ctx);
        router.navigate_to(AppRoute::Landing);
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4 md:px-8 sticky top-0 z-40">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-xl gap-2">
                    <Sparkles attr:class="h-6 w-6 text-primary" />
                    "Wellness Hub"
                </Link>
            </div>
            <div class="flex-none gap-2">
                <Link to="/marketplace" class="btn btn-ghost">
                    "Find a Practitioner"
                </Link>
                <Show
                    when=move || session.get().is_some()
                    fallback=|| {
                        view! {
                            <Link to="/login" class="btn btn-ghost">
                                "Login"
                            </Link>
                            <Link to="/register" class="btn btn-primary">
                                "Get Started"
                            </Link>
                        }
                    }
                >
                    <a
                        class="btn btn-primary"
                        href=home
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.prevent_default();
                            router.navigate(home());
                        }
                    >
                        "My Dashboard"
                    </a>
                    <button class="btn btn-outline" on:click=on_logout.clone()>
                        "Logout"
                    </button>
                </Show>
            </div>
        </div>
    }
}
