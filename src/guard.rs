//! 路由守卫
//!
//! 每次渲染受保护路由前同步求值，只读取会话中的 token 与角色。

use crate::route::AppRoute;
use crate::session::SessionStore;
use wellness_shared::Role;

/// 守卫的三种结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 渲染目标内容
    Allow,
    /// 跳转登录页，`from` 为原始请求路径（登录后尽力跳回）
    RedirectToLogin { from: String },
    /// 角色不符，跳转首页
    RedirectToHome,
}

/// 纯函数形式的守卫判定
///
/// 有 token 但缺少角色时，声明了角色集合的路由一律拒绝并跳转登录，
/// 不会放行到受角色保护的内容。
pub fn decide(
    token: Option<&str>,
    role: Option<Role>,
    allowed_roles: Option<&[Role]>,
    requested: &str,
) -> GuardDecision {
    let has_token = token.is_some_and(|t| !t.is_empty());
    if !has_token {
        return GuardDecision::RedirectToLogin {
            from: requested.to_string(),
        };
    }

    match (allowed_roles, role) {
        (None, _) => GuardDecision::Allow,
        (Some(allowed), Some(role)) if allowed.contains(&role) => GuardDecision::Allow,
        (Some(_), Some(_)) => GuardDecision::RedirectToHome,
        (Some(_), None) => GuardDecision::RedirectToLogin {
            from: requested.to_string(),
        },
    }
}

/// 绑定了会话存储的守卫
#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// 对一次导航求值；未受保护的路由直接放行
    pub fn check(&self, route: AppRoute, requested: &str) -> GuardDecision {
        let Some(allowed) = route.allowed_roles() else {
            return GuardDecision::Allow;
        };
        let session = self.session.current();
        decide(
            session.as_ref().map(|s| s.access_token.as_str()),
            session.as_ref().map(|s| s.role),
            Some(allowed),
            requested,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn missing_token_redirects_to_login_for_any_role() {
        for role in [None, Some(Role::Client), Some(Role::Provider), Some(Role::Admin)] {
            assert_eq!(
                decide(None, role, Some(&[Role::Admin]), "/admin"),
                GuardDecision::RedirectToLogin {
                    from: "/admin".to_string()
                }
            );
            assert_eq!(
                decide(None, role, None, "/upload-degree"),
                GuardDecision::RedirectToLogin {
                    from: "/upload-degree".to_string()
                }
            );
        }
    }

    #[test]
    fn wrong_role_redirects_home() {
        assert_eq!(
            decide(Some("t"), Some(Role::Client), Some(&[Role::Admin]), "/admin"),
            GuardDecision::RedirectToHome
        );
    }

    #[test]
    fn matching_role_renders_content() {
        assert_eq!(
            decide(Some("t"), Some(Role::Admin), Some(&[Role::Admin]), "/admin"),
            GuardDecision::Allow
        );
    }

    #[test]
    fn missing_role_fails_closed() {
        assert_eq!(
            decide(Some("t"), None, Some(&[Role::Client]), "/user"),
            GuardDecision::RedirectToLogin {
                from: "/user".to_string()
            }
        );
        assert_eq!(decide(Some("t"), None, None, "/x"), GuardDecision::Allow);
    }

    #[test]
    fn guard_reads_the_injected_session() {
        let store = SessionStore::in_memory();
        let guard = RouteGuard::new(store.clone());
        assert_eq!(
            guard.check(AppRoute::Marketplace, "/marketplace"),
            GuardDecision::Allow
        );
        assert!(matches!(
            guard.check(AppRoute::UserDashboard, "/user"),
            GuardDecision::RedirectToLogin { .. }
        ));

        store.set(Session {
            access_token: "t".to_string(),
            role: Role::Provider,
            display_name: "P".to_string(),
            email_verified: true,
            email: None,
        });
        assert_eq!(
            guard.check(AppRoute::PractitionerDashboard, "/practitioner"),
            GuardDecision::Allow
        );
        assert_eq!(
            guard.check(AppRoute::AdminDashboard, "/admin"),
            GuardDecision::RedirectToHome
        );
    }
}
