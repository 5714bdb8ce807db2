//! 认证模块
//!
//! 持有唯一的 API 客户端和会话存储，与路由系统解耦。
//! 路由服务通过注入的守卫与会话信号来检查权限。

use std::future::Future;
use std::sync::Arc;

use crate::web::{BrowserNavigator, GlooHttpClient, LocalStorageBackend};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wellness_hub::{ClientConfig, RouteGuard, Session, SessionStore, TaskScope, WellnessApi};

/// 浏览器端的 API 客户端类型
pub type Api = WellnessApi<GlooHttpClient, BrowserNavigator>;

/// 认证上下文
///
/// 会话真正存放在 LocalStorage 中；这里的信号只是它在界面上的镜像，
/// 写入或清除会话后调用 `refresh` 同步。
#[derive(Clone)]
pub struct AuthContext {
    pub api: Api,
    pub config: ClientConfig,
    session: RwSignal<Option<Session>>,
    /// 跳转到验证码页时携带的邮箱
    pub pending_email: RwSignal<Option<String>>,
}

impl AuthContext {
    pub fn new() -> Self {
        let config = ClientConfig::from_build_env();
        let store = SessionStore::new(Arc::new(LocalStorageBackend));
        let api = WellnessApi::new(&config, GlooHttpClient, store.clone(), BrowserNavigator);
        Self {
            session: RwSignal::new(store.current()),
            pending_email: RwSignal::new(None),
            api,
            config,
        }
    }

    pub fn store(&self) -> &SessionStore {
        self.api.session()
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.store().clone())
    }

    /// 会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Option<Session>> {
        self.session.into()
    }

    pub fn refresh(&self) {
        self.session.set(self.store().current());
    }

    /// 顶栏显示的名称，未登录或名称为空时为 "Guest"
    pub fn display_name(&self) -> Signal<String> {
        let session = self.session;
        Signal::derive(move || {
            session
                .get()
                .map(|s| s.display_name)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Guest".to_string())
        })
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 注销：整体清除会话
///
/// 导航将由路由服务的会话监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.store().clear();
    ctx.refresh();
}

/// 创建随组件销毁而取消的任务作用域
pub fn use_task_scope() -> TaskScope {
    let scope = TaskScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.cancel()
    });
    scope
}

/// 在作用域内后台执行 `fut`，完成后把结果交给 `on_done`
///
/// 作用域已取消时 `on_done` 不会被调用。
pub fn spawn_scoped<F, T>(scope: &TaskScope, fut: F, on_done: impl FnOnce(T) + 'static)
where
    F: Future<Output = T> + 'static,
    T: 'static,
{
    let scope = scope.clone();
    spawn_local(async move {
        if let Some(result) = scope.run(fut).await {
            on_done(result);
        }
    });
}

/// 显示一条提示，`millis` 毫秒后自动隐藏
///
/// 期间被新提示覆盖时不清除新提示。
pub fn flash<T>(scope: &TaskScope, slot: RwSignal<Option<T>>, value: T, millis: u32)
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    slot.set(Some(value.clone()));
    spawn_scoped(scope, TimeoutFuture::new(millis), move |_| {
        if slot.get_untracked().as_ref() == Some(&value) {
            slot.set(None);
        }
    });
}
