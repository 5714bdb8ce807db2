//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;
use wellness_shared::Role;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Landing,
    Login,
    Register,
    /// 注册后提示查收验证邮件
    VerificationSent,
    OtpVerification,
    /// 邮件链接落地页 `/verify?token=`
    VerifyEmail,
    UploadDegree,
    Marketplace,
    UserDashboard,
    PractitionerDashboard,
    AdminDashboard,
}

impl AppRoute {
    pub const ALL: [AppRoute; 11] = [
        AppRoute::Landing,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::VerificationSent,
        AppRoute::OtpVerification,
        AppRoute::VerifyEmail,
        AppRoute::UploadDegree,
        AppRoute::Marketplace,
        AppRoute::UserDashboard,
        AppRoute::PractitionerDashboard,
        AppRoute::AdminDashboard,
    ];

    /// 将 URL path 解析为路由枚举
    ///
    /// 查询串会被忽略；未知路径返回 `None`，由路由服务重定向到首页。
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Self::ALL.into_iter().find(|route| route.to_path() == path)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::VerificationSent => "/verification-sent",
            Self::OtpVerification => "/otp-verification",
            Self::VerifyEmail => "/verify",
            Self::UploadDegree => "/upload-degree",
            Self::Marketplace => "/marketplace",
            Self::UserDashboard => "/user",
            Self::PractitionerDashboard => "/practitioner",
            Self::AdminDashboard => "/admin",
        }
    }

    /// **核心守卫属性：该路由允许的角色集合**
    ///
    /// `None` 表示该路由不受守卫保护。
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::UserDashboard => Some(&[Role::Client]),
            Self::PractitionerDashboard => Some(&[Role::Provider]),
            Self::AdminDashboard => Some(&[Role::Admin]),
            _ => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.allowed_roles().is_some()
    }

    /// 给定角色能否进入该路由
    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles()
            .is_none_or(|allowed| allowed.contains(&role))
    }

    /// 登录成功后的落脚点：记录的返回路径可用时优先使用
    pub fn after_login(role: Role, return_to: Option<&str>) -> String {
        return_to
            .filter(|path| Self::from_path(path).is_some_and(|route| route.permits(role)))
            .filter(|path| *path != Self::Login.to_path())
            .map(str::to_string)
            .unwrap_or_else(|| Self::home_for(role).to_path().to_string())
    }

    /// 各角色登录后的落脚页
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Provider => Self::PractitionerDashboard,
            Role::Client => Self::UserDashboard,
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 角色不符时的重定向目标
    pub fn forbidden_redirect() -> Self {
        Self::Landing
    }

    /// 未知路径的重定向目标
    pub fn not_found_redirect() -> Self {
        Self::Landing
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_through_the_table() {
        for route in AppRoute::ALL {
            assert_eq!(AppRoute::from_path(route.to_path()), Some(route));
        }
    }

    #[test]
    fn query_and_trailing_slash_are_ignored() {
        assert_eq!(
            AppRoute::from_path("/verify?token=abc"),
            Some(AppRoute::VerifyEmail)
        );
        assert_eq!(
            AppRoute::from_path("/register/?role=PRACTITIONER"),
            Some(AppRoute::Register)
        );
        assert_eq!(AppRoute::from_path("/nowhere"), None);
    }

    #[test]
    fn dashboards_are_role_gated() {
        assert_eq!(
            AppRoute::AdminDashboard.allowed_roles(),
            Some(&[Role::Admin][..])
        );
        assert!(!AppRoute::Marketplace.is_protected());
        assert_eq!(AppRoute::home_for(Role::Provider), AppRoute::PractitionerDashboard);
        assert!(AppRoute::Marketplace.permits(Role::Client));
        assert!(!AppRoute::AdminDashboard.permits(Role::Provider));
    }

    #[test]
    fn return_target_is_used_only_when_permitted() {
        assert_eq!(AppRoute::after_login(Role::Admin, Some("/admin")), "/admin");
        assert_eq!(AppRoute::after_login(Role::Client, Some("/admin")), "/user");
        assert_eq!(AppRoute::after_login(Role::Provider, None), "/practitioner");
        assert_eq!(AppRoute::after_login(Role::Client, Some("/bogus")), "/user");
    }
}
