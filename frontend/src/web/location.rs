//! `window.location` 封装

use wellness_hub::{AppRoute, Navigator};

/// 获取当前浏览器路径
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 路径加查询串，用作登录后的返回目标
pub fn current_path_and_query() -> String {
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    format!("{}{}", current_path(), search)
}

/// 读取当前 URL 的查询参数
pub fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get(name)
}

/// 整页跳转（会重新加载应用）
pub fn hard_navigate(path: &str) {
    if let Some(window) = web_sys::window()
        && window.location().set_href(path).is_err()
    {
        wellness_hub::log_error!("[Location] failed to navigate to {}", path);
    }
}

/// 在新标签页打开外部地址
pub fn open_in_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

/// 401 时的强制跳转
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect_to_login(&self) {
        hard_navigate(AppRoute::auth_failure_redirect().to_path());
    }
}
