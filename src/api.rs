//! 后端 API 客户端
//!
//! 所有页面共用一个实例。发送前注入 Bearer token（公开端点除外），
//! 收到受保护端点的 401 时整体清除会话并强制跳转登录页，错误仍然返回给调用方。

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::request::{HttpClient, HttpRequest, HttpResponse, MultipartForm};
use crate::session::{Session, SessionStore};
use wellness_shared::{
    ApiRequest, ApprovePractitionerRequest, AuthResponse, BEARER_PREFIX, Booking,
    DEGREE_UPLOAD_PATH, ForgotPasswordRequest, GetProfileRequest, HEADER_AUTHORIZATION,
    HttpMethod, ListAllPractitionersRequest, ListAllUsersRequest,
    ListApprovedPractitionersRequest, ListPractitionerBookingsRequest,
    ListPractitionersForReviewRequest, ListUserBookingsRequest, LoginRequest, MessageResponse,
    Profile, ProfileUpdate, RegisterRequest, RejectPractitionerRequest, RequestReuploadRequest,
    ResendOtpRequest, VerifyEmailRequest, VerifyOtpRequest, degree_document_path,
    is_public_path,
};

#[cfg(test)]
pub(crate) mod tests;

/// 强制整页跳转到登录页
///
/// 浏览器端直接修改 `window.location`，测试中记录调用次数。
pub trait Navigator {
    fn redirect_to_login(&self);
}

/// 待上传的资质文件
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct WellnessApi<C, N> {
    base_url: String,
    client: C,
    session: SessionStore,
    navigator: N,
}

impl<C, N> WellnessApi<C, N>
where
    C: HttpClient,
    N: Navigator,
{
    pub fn new(config: &ClientConfig, client: C, session: SessionStore, navigator: N) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // =========================================================
    // 拦截器 (Interceptors)
    // =========================================================

    /// 非公开端点且存在 token 时附加认证头；没有 token 也照常发送，由服务端拒绝
    fn intercept_request(&self, path: &str, req: HttpRequest) -> HttpRequest {
        if is_public_path(path) {
            return req;
        }
        match self.session.token() {
            Some(token) => req.with_header(
                HEADER_AUTHORIZATION,
                &format!("{}{}", BEARER_PREFIX, token),
            ),
            None => req,
        }
    }

    /// 受保护端点返回 401 时整体清除会话并跳转登录
    ///
    /// 只处理发出请求时的那份会话：并发请求中后到的 401，
    /// 或会话已被新登录替换时，不再重复清除和跳转。
    fn intercept_response(&self, path: &str, sent_token: Option<&str>, resp: &HttpResponse) {
        if resp.status != 401 || is_public_path(path) {
            return;
        }
        if self.session.token().as_deref() != sent_token {
            log_info!("[Api] 401 on {} for a session already replaced, ignoring", path);
            return;
        }
        log_warn!(
            "[Api] 401 on {}. Token invalid or expired, redirecting to login.",
            path
        );
        self.session.clear();
        self.navigator.redirect_to_login();
    }

    async fn dispatch(&self, path: &str, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let req = self.intercept_request(path, req);
        let sent_token = req
            .header(HEADER_AUTHORIZATION)
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .map(str::to_string);
        let resp = self.client.send(req).await?;
        self.intercept_response(path, sent_token.as_deref(), &resp);

        if resp.is_success() {
            Ok(resp)
        } else {
            Err(ApiError::from_response(resp.status, &resp.body))
        }
    }

    async fn send_request<R: ApiRequest>(&self, request: &R) -> Result<HttpResponse, ApiError> {
        let path = request.path();
        let mut req = HttpRequest::new(&self.url(&path), R::METHOD);
        if R::SENDS_BODY {
            let body = serde_json::to_string(request)
                .map_err(|e| ApiError::decode(format!("encode request body: {}", e)))?;
            req = req.with_json(body);
        }
        self.dispatch(&path, req).await
    }

    /// 执行一个类型化的端点请求
    pub async fn execute<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let resp = self.send_request(request).await?;
        resp.json::<R::Response>()
    }

    /// 只返回提示信息的端点：部分接口直接回纯文本或空响应体
    async fn execute_message<R>(&self, request: &R) -> Result<MessageResponse, ApiError>
    where
        R: ApiRequest<Response = MessageResponse>,
    {
        let resp = self.send_request(request).await?;
        Ok(message_from(&resp))
    }

    fn remember(&self, resp: &AuthResponse, email: &str) {
        self.session.set(Session::from_auth(resp, Some(email)));
    }

    // =========================================================
    // 认证 (Auth)
    // =========================================================

    /// 登录，成功后写入会话
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let resp = self.execute(request).await?;
        self.remember(&resp, &request.email);
        Ok(resp)
    }

    /// 注册，成功后写入会话
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp = self.execute(request).await?;
        self.remember(&resp, &request.email);
        Ok(resp)
    }

    /// 校验邮箱验证码，成功后写入会话
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse, ApiError> {
        let request = VerifyOtpRequest {
            email: email.to_string(),
            otp: otp.to_string(),
        };
        let resp = self.execute(&request).await?;
        self.remember(&resp, email);
        Ok(resp)
    }

    pub async fn resend_otp(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.execute_message(&ResendOtpRequest {
            email: email.to_string(),
        })
        .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.execute_message(&ForgotPasswordRequest {
            email: email.to_string(),
        })
        .await
    }

    pub async fn verify_email_by_token(&self, token: &str) -> Result<MessageResponse, ApiError> {
        self.execute_message(&VerifyEmailRequest {
            token: token.to_string(),
        })
        .await
    }

    // =========================================================
    // 资料 (Profile)
    // =========================================================

    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.execute(&GetProfileRequest).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.execute(update).await
    }

    /// 上传资质文件（multipart：`file` + `userId`）
    pub async fn upload_degree(
        &self,
        user_id: u64,
        upload: DegreeUpload,
    ) -> Result<MessageResponse, ApiError> {
        let form = MultipartForm::new()
            .file("file", upload.file_name, upload.content_type, upload.bytes)
            .text("userId", user_id.to_string());
        let req = HttpRequest::new(&self.url(DEGREE_UPLOAD_PATH), HttpMethod::Post)
            .with_multipart(form);

        let resp = self.dispatch(DEGREE_UPLOAD_PATH, req).await?;
        Ok(message_from(&resp))
    }

    /// 资质文件地址，由浏览器直接打开，不经过 API 客户端
    pub fn degree_document_url(&self, user_id: u64) -> String {
        self.url(&degree_document_path(user_id))
    }

    pub async fn list_approved_practitioners(&self) -> Result<Vec<Profile>, ApiError> {
        self.execute(&ListApprovedPractitionersRequest).await
    }

    pub async fn list_all_practitioners(&self) -> Result<Vec<Profile>, ApiError> {
        self.execute(&ListAllPractitionersRequest).await
    }

    // =========================================================
    // 管理 (Admin)
    // =========================================================

    pub async fn list_practitioners_for_review(&self) -> Result<Vec<Profile>, ApiError> {
        self.execute(&ListPractitionersForReviewRequest).await
    }

    pub async fn list_all_users(&self) -> Result<Vec<Profile>, ApiError> {
        self.execute(&ListAllUsersRequest).await
    }

    pub async fn approve_practitioner(&self, id: u64) -> Result<MessageResponse, ApiError> {
        self.execute_message(&ApprovePractitionerRequest { id }).await
    }

    pub async fn reject_practitioner(
        &self,
        id: u64,
        comment: Option<String>,
    ) -> Result<MessageResponse, ApiError> {
        self.execute_message(&RejectPractitionerRequest {
            id,
            comment: comment.unwrap_or_default(),
        })
        .await
    }

    pub async fn request_reupload(
        &self,
        id: u64,
        comment: Option<String>,
    ) -> Result<MessageResponse, ApiError> {
        self.execute_message(&RequestReuploadRequest {
            id,
            comment: comment.unwrap_or_default(),
        })
        .await
    }

    // =========================================================
    // 预约 (Bookings)
    // =========================================================

    pub async fn create_booking(&self, booking: &Booking) -> Result<Booking, ApiError> {
        self.execute(booking).await
    }

    pub async fn list_user_bookings(&self, user_id: u64) -> Result<Vec<Booking>, ApiError> {
        self.execute(&ListUserBookingsRequest { user_id }).await
    }

    pub async fn list_practitioner_bookings(
        &self,
        practitioner_id: u64,
    ) -> Result<Vec<Booking>, ApiError> {
        self.execute(&ListPractitionerBookingsRequest { practitioner_id })
            .await
    }
}

fn message_from(resp: &HttpResponse) -> MessageResponse {
    resp.json::<MessageResponse>().unwrap_or_else(|_| MessageResponse {
        message: resp.body.trim().trim_matches('"').to_string(),
    })
}
