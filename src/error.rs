use std::fmt;

use wellness_shared::ErrorBody;

// =========================================================
// 错误类型枚举
// =========================================================

/// 远程调用失败的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: 会话无效，由 API 客户端统一处理（清除会话并跳转登录）
    Unauthorized,
    /// 其余非 2xx 响应：重复邮箱、验证码错误、密码错误等
    Domain,
    /// 网络层失败，没有 HTTP 状态码
    Transport,
    /// 2xx 响应体与期望类型不符（包括未知的状态枚举值）
    Decode,
}

impl ApiErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Unauthorized => "UNAUTHORIZED",
            ApiErrorKind::Domain => "REQUEST_REJECTED",
            ApiErrorKind::Transport => "NETWORK_ERROR",
            ApiErrorKind::Decode => "RESPONSE_DECODE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用错误
///
/// - kind: 错误类别
/// - status: HTTP 状态码（网络错误时为 `None`）
/// - message: 服务端消息或底层错误描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    // --- Convenience constructors ---

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unauthorized, Some(401), message)
    }

    pub fn domain(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Domain, Some(status), message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, None, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, None, message)
    }

    /// 根据非 2xx 响应构造错误
    ///
    /// 响应体为 `{"error": "..."}` 时取其中的消息，否则保留原始文本。
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.trim().to_string());
        if status == 401 {
            Self::unauthorized(message)
        } else {
            Self::domain(status, message)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// 页面上展示的文本
    ///
    /// 业务错误优先使用服务端消息；网络错误与解码错误没有可读原因，使用 `fallback`。
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind {
            ApiErrorKind::Domain | ApiErrorKind::Unauthorized if !self.message.is_empty() => {
                self.message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "[{}] {} (HTTP {})",
                self.kind.error_code(),
                self.message,
                status
            ),
            None => write!(f, "[{}] {}", self.kind.error_code(), self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::decode(e.to_string())
    }
}

// =========================================================
// 表单校验错误
// =========================================================

/// 单条客户端校验错误，在发出请求前拦截
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_body_becomes_message() {
        let err = ApiError::from_response(409, r#"{"error":"Email already registered"}"#);
        assert_eq!(err.kind, ApiErrorKind::Domain);
        assert_eq!(err.status, Some(409));
        assert_eq!(err.user_message("fallback"), "Email already registered");
    }

    #[test]
    fn unauthorized_status_is_classified() {
        let err = ApiError::from_response(401, "");
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message("Invalid email or password"), "Invalid email or password");
    }

    #[test]
    fn transport_errors_use_fallback() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.user_message("Upload failed"), "Upload failed");
        assert_eq!(err.to_string(), "[NETWORK_ERROR] connection refused");
    }
}
