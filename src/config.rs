// =========================================================
// 客户端配置 (Client Configuration)
// =========================================================

/// 这些是默认值，构建时没有设置对应环境变量则使用它们
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_OTP_COUNTDOWN_SECS: u32 = 60;
const DEFAULT_NOTICE_MILLIS: u32 = 4000;
const DEFAULT_MAX_DEGREE_BYTES: u64 = 5 * 1024 * 1024;

/// 客户端配置结构体
///
/// 浏览器里没有进程环境变量，基地址只能在编译期通过 `WELLNESS_API_BASE_URL` 覆盖。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// 重发验证码前的冷却时间
    pub otp_countdown_secs: u32,
    /// 页面提示自动消失的时间
    pub notice_millis: u32,
    /// 资质文件大小上限
    pub max_degree_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
    /// 读取编译期配置，读不到就用默认值
    pub fn from_build_env() -> Self {
        match option_env!("WELLNESS_API_BASE_URL") {
            Some(url) if !url.trim().is_empty() => Self::with_base_url(url),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(url: &str) -> Self {
        Self {
            api_base_url: url.trim().trim_end_matches('/').to_string(),
            otp_countdown_secs: DEFAULT_OTP_COUNTDOWN_SECS,
            notice_millis: DEFAULT_NOTICE_MILLIS,
            max_degree_bytes: DEFAULT_MAX_DEGREE_BYTES,
        }
    }

    /// 资质文件的直链，由浏览器直接打开
    pub fn degree_document_url(&self, user_id: u64) -> String {
        format!(
            "{}{}",
            self.api_base_url,
            wellness_shared::degree_document_path(user_id)
        )
    }
}
