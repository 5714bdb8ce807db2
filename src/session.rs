//! 会话存储模块
//!
//! 会话作为一条完整记录读写，`set`/`clear` 都是整体替换，
//! 不存在只写了一半字段的中间状态。

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use wellness_shared::{AuthResponse, Role};

/// 会话记录在持久化存储中的键
pub const SESSION_STORAGE_KEY: &str = "wellness.session";

/// 早期版本逐字段写入的键，清除会话时一并删除
pub const LEGACY_SESSION_KEYS: &[&str] = &[
    "accessToken",
    "userRole",
    "emailVerified",
    "userName",
    "userEmail",
];

/// 客户端持有的认证凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub role: Role,
    pub display_name: String,
    pub email_verified: bool,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    /// 由登录/注册/验证码校验的响应构造
    pub fn from_auth(resp: &AuthResponse, email: Option<&str>) -> Self {
        Self {
            access_token: resp.access_token.clone(),
            role: resp.role,
            display_name: resp.name.clone(),
            email_verified: resp.email_verified,
            email: email.map(str::to_string),
        }
    }
}

// =========================================================
// 存储后端 (Storage Backend)
// =========================================================

/// 持久化键值存储的抽象
///
/// 浏览器端由 LocalStorage 实现，测试使用内存实现。
pub trait SessionBackend: Send + Sync {
    /// 读取会话；记录不存在或无法解析时返回 `None`
    fn load(&self) -> Option<Session>;
    /// 整体写入会话
    fn save(&self, session: &Session) -> bool;
    /// 删除会话记录
    fn remove(&self) -> bool;
}

/// 内存存储
#[derive(Default)]
pub struct MemorySessionBackend {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemorySessionBackend {
    fn load(&self) -> Option<Session> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, session: &Session) -> bool {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session.clone());
        true
    }

    fn remove(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        true
    }
}

// =========================================================
// 会话存储 (Session Store)
// =========================================================

/// 可注入的会话上下文
///
/// API 客户端与路由守卫在构造时拿到同一个实例（克隆共享同一后端）。
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionBackend::new()))
    }

    pub fn current(&self) -> Option<Session> {
        self.backend.load()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.access_token)
    }

    pub fn role(&self) -> Option<Role> {
        self.current().map(|s| s.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// 整体替换会话
    pub fn set(&self, session: Session) {
        if self.backend.save(&session) {
            log_info!("[Session] Stored session for role {}", session.role);
        } else {
            log_warn!("[Session] Failed to persist session");
        }
    }

    /// 整体清除会话
    pub fn clear(&self) {
        if !self.backend.remove() {
            log_warn!("[Session] Failed to remove session record");
        }
    }

    /// 资料更新后同步显示名称（仍然是整条记录替换）
    pub fn rename(&self, display_name: &str) {
        if let Some(mut session) = self.current() {
            session.display_name = display_name.to_string();
            self.set(session);
        }
    }

    pub fn display_name(&self) -> Option<String> {
        self.current()
            .map(|s| s.display_name)
            .filter(|name| !name.trim().is_empty())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: Role, verified: bool) -> AuthResponse {
        AuthResponse {
            access_token: "tok".to_string(),
            role,
            name: "Mira".to_string(),
            email_verified: verified,
        }
    }

    #[test]
    fn set_and_clear_replace_the_whole_record() {
        let store = SessionStore::in_memory();
        assert!(store.current().is_none());

        store.set(Session::from_auth(&auth(Role::Client, false), Some("m@x.io")));
        let session = store.current().unwrap();
        assert_eq!(session.access_token, "tok");
        assert_eq!(session.role, Role::Client);
        assert_eq!(session.email.as_deref(), Some("m@x.io"));

        store.clear();
        assert!(store.current().is_none());
        assert!(store.token().is_none());
        assert!(store.role().is_none());
    }

    #[test]
    fn clones_share_one_backend() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set(Session::from_auth(&auth(Role::Admin, true), None));
        assert_eq!(other.role(), Some(Role::Admin));
        other.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn rename_keeps_other_fields() {
        let store = SessionStore::in_memory();
        store.set(Session::from_auth(&auth(Role::Provider, true), None));
        store.rename("Dr. Mira");
        let session = store.current().unwrap();
        assert_eq!(session.display_name, "Dr. Mira");
        assert_eq!(session.role, Role::Provider);
        assert!(session.email_verified);
    }

    #[test]
    fn record_serialises_as_one_json_object() {
        let session = Session::from_auth(&auth(Role::Client, true), Some("m@x.io"));
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["accessToken"], "tok");
        assert_eq!(json["role"], "CLIENT");
        assert_eq!(json["emailVerified"], true);
    }
}
