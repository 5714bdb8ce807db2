//! Wellness Hub 客户端核心
//!
//! 与浏览器无关的部分：HTTP 抽象、API 客户端、会话、路由守卫以及各页面的控制逻辑。
//! 浏览器适配（fetch、LocalStorage、History）由 `wellness-frontend` 提供。

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys as __web_sys;

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::__web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::__web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::__web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod config;
pub mod controllers;
pub mod error;
pub mod forms;
pub mod guard;
pub mod otp;
pub mod request;
pub mod route;
pub mod scope;
pub mod session;

pub use api::{DegreeUpload, Navigator, WellnessApi};
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, ValidationError};
pub use guard::{GuardDecision, RouteGuard};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use scope::TaskScope;
pub use session::{Session, SessionBackend, SessionStore};
