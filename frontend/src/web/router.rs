//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wellness_hub::{AppRoute, GuardDecision, RouteGuard, Session, log_info};

use super::location::current_path_and_query;

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 对请求路径求值，返回最终渲染的路由和地址栏应显示的路径
fn resolve(
    guard: &RouteGuard,
    path: &str,
    return_to: RwSignal<Option<String>>,
) -> (AppRoute, String) {
    let Some(route) = AppRoute::from_path(path) else {
        log_info!("[Router] Unknown path {}. Redirecting to landing.", path);
        let redirect = AppRoute::not_found_redirect();
        return (redirect, redirect.to_path().to_string());
    };

    match guard.check(route, path) {
        GuardDecision::Allow => (route, path.to_string()),
        GuardDecision::RedirectToLogin { from } => {
            log_info!("[Router] Access Denied. Redirecting to Login.");
            return_to.set(Some(from));
            let redirect = AppRoute::auth_failure_redirect();
            (redirect, redirect.to_path().to_string())
        }
        GuardDecision::RedirectToHome => {
            log_info!("[Router] Role not permitted for {}. Redirecting home.", path);
            let redirect = AppRoute::forbidden_redirect();
            (redirect, redirect.to_path().to_string())
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 守卫与会话信号由外部注入，实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    guard: StoredValue<RouteGuard>,
    /// 会话镜像，变化时重新执行守卫
    session: Signal<Option<Session>>,
    /// 被守卫拦截的原始路径，登录后尽力跳回
    return_to: RwSignal<Option<String>>,
}

impl RouterService {
    fn new(guard: RouteGuard, session: Signal<Option<Session>>) -> Self {
        let return_to = RwSignal::new(None);

        // 1. 初始化当前路由（从 URL 解析并执行守卫）
        let path = current_path_and_query();
        let (initial_route, target) = resolve(&guard, &path, return_to);
        if target != path {
            replace_history_state(&target);
        }
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            guard: StoredValue::new(guard),
            session,
            return_to,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 守卫 -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        let return_to = self.return_to;
        let (route, target) = self.guard.with_value(|g| resolve(g, path, return_to));
        push_history_state(&target);
        self.set_route.set(route);
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate(route.to_path());
    }

    /// 取出登录前被拦截的路径（只取一次）
    pub fn take_return_to(&self) -> Option<String> {
        let target = self.return_to.get_untracked();
        self.return_to.set(None);
        target
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let guard = self.guard;
        let return_to = self.return_to;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path_and_query();
            // popstate 时也执行守卫逻辑
            let (route, target) = guard.with_value(|g| resolve(g, &path, return_to));
            if target != path {
                replace_history_state(&target);
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化（登出、过期）时重新守卫当前页面
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;
        let guard = self.guard;
        let return_to = self.return_to;

        Effect::new(move |_| {
            session.track();
            let route = current_route.get_untracked();
            if !route.is_protected() {
                return;
            }
            let path = current_path_and_query();
            let (next, target) = guard.with_value(|g| resolve(g, &path, return_to));
            if next != route {
                log_info!("[Router] Session changed, leaving {}.", route);
                push_history_state(&target);
                set_route.set(next);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(guard: RouteGuard, session: Signal<Option<Session>>) -> RouterService {
    let router = RouterService::new(guard, session);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 路由守卫
    guard: RouteGuard,
    /// 会话信号
    session: Signal<Option<Session>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(guard, session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页刷新
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(into, optional)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
