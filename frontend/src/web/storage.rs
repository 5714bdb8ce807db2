//! LocalStorage 会话后端
//!
//! 会话以一条 JSON 记录保存在 `wellness.session` 下。

use gloo_storage::{LocalStorage, Storage};
use wellness_hub::session::{LEGACY_SESSION_KEYS, SESSION_STORAGE_KEY};
use wellness_hub::{Session, SessionBackend};

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageBackend;

impl SessionBackend for LocalStorageBackend {
    /// 记录缺失或无法解析（例如未知角色）都视为未登录
    fn load(&self) -> Option<Session> {
        LocalStorage::get::<Session>(SESSION_STORAGE_KEY).ok()
    }

    fn save(&self, session: &Session) -> bool {
        LocalStorage::set(SESSION_STORAGE_KEY, session).is_ok()
    }

    /// 同时清掉旧版本逐字段写入的键
    fn remove(&self) -> bool {
        LocalStorage::delete(SESSION_STORAGE_KEY);
        for key in LEGACY_SESSION_KEYS {
            LocalStorage::delete(key);
        }
        true
    }
}
