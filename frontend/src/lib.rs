//! Wellness Hub 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `wellness_hub::route` / `guard`: 路由表与守卫（领域模型，无 DOM 依赖）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话与 API 客户端上下文
//! - `components`: UI 组件层，每个页面一个模块

mod auth;
mod components {
    pub mod admin_dashboard;
    pub mod badges;
    pub mod degree_upload;
    pub mod icons;
    pub mod landing;
    pub mod login;
    pub mod marketplace;
    pub mod otp;
    pub mod practitioner_dashboard;
    pub mod profile_form;
    pub mod register;
    pub mod shell;
    pub mod top_nav;
    pub mod user_dashboard;
    pub mod verify_email;
}

// 浏览器适配层：fetch、LocalStorage、location 与 History
pub(crate) mod web {
    pub mod file;
    pub mod http;
    pub mod location;
    pub mod router;
    pub mod storage;

    pub use http::GlooHttpClient;
    pub use location::BrowserNavigator;
    pub use storage::LocalStorageBackend;
}

use crate::auth::AuthContext;
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::degree_upload::DegreeUploadPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::marketplace::MarketplacePage;
use crate::components::otp::OtpVerificationPage;
use crate::components::practitioner_dashboard::PractitionerDashboardPage;
use crate::components::register::RegisterPage;
use crate::components::user_dashboard::UserDashboardPage;
use crate::components::verify_email::{VerificationSentPage, VerifyEmailPage};

use leptos::prelude::*;
use web::router::{Router, RouterOutlet};
use wellness_hub::AppRoute;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::VerificationSent => view! { <VerificationSentPage /> }.into_any(),
        AppRoute::OtpVerification => view! { <OtpVerificationPage /> }.into_any(),
        AppRoute::VerifyEmail => view! { <VerifyEmailPage /> }.into_any(),
        AppRoute::UploadDegree => view! { <DegreeUploadPage /> }.into_any(),
        AppRoute::Marketplace => view! { <MarketplacePage /> }.into_any(),
        AppRoute::UserDashboard => view! { <UserDashboardPage /> }.into_any(),
        AppRoute::PractitionerDashboard => view! { <PractitionerDashboardPage /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话与 API 上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx.clone());

    // 2. 守卫与会话信号注入路由服务
    let guard = auth_ctx.guard();
    let session = auth_ctx.session_signal();

    view! {
        <Router guard=guard session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
