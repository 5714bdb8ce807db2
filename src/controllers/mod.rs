//! 页面控制逻辑
//!
//! 每个页面的状态都是普通数据结构，异步部分只负责调用 API 并把结果交回状态。
//! 组件层把这些状态放进 signal，渲染与事件绑定之外不再有其它逻辑。

use crate::api::{DegreeUpload, Navigator, WellnessApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::forms::{
    FieldErrors, LoginForm, ProfileEditForm, RegisterForm, filter_practitioners,
    validate_degree_file,
};
use crate::otp::OtpInput;
use crate::request::HttpClient;
use crate::route::AppRoute;
use crate::session::SessionStore;
use wellness_shared::{AdminAction, Booking, Profile, Role, VerificationStatus};

#[cfg(test)]
mod tests;

/// 忘记密码成功提示的显示时长
pub const PASSWORD_RESET_NOTICE_MILLIS: u32 = 5000;
/// 资料保存提示的显示时长
pub const PROFILE_NOTICE_MILLIS: u32 = 3000;
/// 患者仪表盘上展示的推荐执业者数量
pub const FEATURED_PRACTITIONERS: usize = 6;

// =========================================================
// 登录 (Login)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// 邮箱尚未验证，带着邮箱进入验证码页
    VerifyOtp { email: String },
    /// 进入角色首页
    Dashboard(AppRoute),
}

pub async fn submit_login<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    form: &LoginForm,
) -> Result<LoginOutcome, String> {
    let request = form.to_request().map_err(|e| e.to_string())?;
    let resp = api
        .login(&request)
        .await
        .map_err(|e| e.user_message("Invalid email or password"))?;

    if resp.email_verified {
        Ok(LoginOutcome::Dashboard(AppRoute::home_for(resp.role)))
    } else {
        Ok(LoginOutcome::VerifyOtp {
            email: request.email,
        })
    }
}

/// 发送临时密码；空邮箱直接忽略，返回 `Ok(None)`
pub async fn request_password_reset<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    email: &str,
) -> Result<Option<&'static str>, String> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(None);
    }
    api.forgot_password(email)
        .await
        .map(|_| Some("Temporary password sent!"))
        .map_err(|e| e.user_message("Failed to send recovery email"))
}

// =========================================================
// 注册 (Register)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterFailure {
    Fields(FieldErrors),
    Server(String),
}

/// 注册成功后返回需要验证的邮箱
pub async fn submit_registration<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    form: &RegisterForm,
) -> Result<String, RegisterFailure> {
    let request = form.to_request().map_err(RegisterFailure::Fields)?;
    api.register(&request).await.map_err(|e| {
        RegisterFailure::Server(e.user_message("Registration failed. Please try again."))
    })?;
    Ok(request.email)
}

// =========================================================
// 验证码 (OTP)
// =========================================================

/// 验证码页使用的邮箱：优先导航携带的值，其次会话中记录的值
pub fn otp_email(navigated: Option<String>, session: &SessionStore) -> Option<String> {
    navigated
        .filter(|e| !e.trim().is_empty())
        .or_else(|| session.current().and_then(|s| s.email))
        .filter(|e| !e.trim().is_empty())
}

pub async fn submit_otp<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    email: &str,
    input: &OtpInput,
) -> Result<AppRoute, String> {
    let code = input.code().map_err(|e| e.to_string())?;
    let resp = api
        .verify_otp(email, &code)
        .await
        .map_err(|e| e.user_message("Verification failed. Invalid OTP."))?;
    Ok(AppRoute::home_for(resp.role))
}

pub async fn resend_otp<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    email: &str,
) -> Result<(), String> {
    api.resend_otp(email)
        .await
        .map(|_| ())
        .map_err(|_| "Failed to resend OTP. Please try again.".to_string())
}

// =========================================================
// 邮件链接验证 (Verify Email)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyEmailState {
    Loading,
    Success,
    Error,
}

pub async fn verify_email_link<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    token: Option<&str>,
) -> VerifyEmailState {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return VerifyEmailState::Error;
    };
    match api.verify_email_by_token(token).await {
        Ok(_) => VerifyEmailState::Success,
        Err(e) => {
            log_warn!("[VerifyEmail] {}", e);
            VerifyEmailState::Error
        }
    }
}

// =========================================================
// 资质上传 (Degree Upload)
// =========================================================

/// 独立上传页：成功后进入执业者仪表盘
pub async fn submit_degree<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    config: &ClientConfig,
    profile: &Profile,
    upload: DegreeUpload,
) -> Result<AppRoute, String> {
    validate_degree_file(
        &upload.content_type,
        upload.bytes.len() as u64,
        config.max_degree_bytes,
    )
    .map_err(|e| e.to_string())?;
    api.upload_degree(profile.id, upload)
        .await
        .map_err(|e| e.user_message("Upload failed. Please try again."))?;
    Ok(AppRoute::PractitionerDashboard)
}

// =========================================================
// 市场 (Marketplace)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub practitioner: Profile,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketplaceState {
    pub practitioners: Vec<Profile>,
    /// 未登录时为空，仍可浏览
    pub profile: Option<Profile>,
    pub search: String,
    pub draft: Option<BookingDraft>,
    pub notice: Option<Notice>,
    pub loading: bool,
    pub booking: bool,
}

impl MarketplaceState {
    pub fn filtered(&self) -> Vec<&Profile> {
        filter_practitioners(&self.practitioners, &self.search)
    }

    pub fn open_booking(&mut self, practitioner: Profile) {
        self.draft = Some(BookingDraft {
            practitioner,
            notes: String::new(),
        });
    }

    pub fn close_booking(&mut self) {
        self.draft = None;
    }

    pub fn set_notes(&mut self, notes: String) {
        if let Some(draft) = self.draft.as_mut() {
            draft.notes = notes;
        }
    }

    /// “我的仪表盘”指向的页面
    pub fn dashboard_route(&self) -> AppRoute {
        match self.profile.as_ref().map(|p| p.role) {
            Some(Role::Provider) => AppRoute::PractitionerDashboard,
            _ => AppRoute::UserDashboard,
        }
    }

    /// 由当前草稿生成预约请求
    pub fn booking_request(&self) -> Result<Booking, String> {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| "Please choose a practitioner first.".to_string())?;
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| "Please log in to book a session.".to_string())?;
        Ok(Booking::request(
            profile.id,
            draft.practitioner.id,
            draft.notes.clone(),
        ))
    }

    /// 预约请求结束后更新页面：成功时关闭弹窗并清空备注
    pub fn finish_booking(&mut self, result: Result<Booking, ApiError>) {
        self.booking = false;
        match result {
            Ok(_) => {
                let name = self
                    .draft
                    .take()
                    .map(|d| d.practitioner.name)
                    .unwrap_or_default();
                self.notice = Some(Notice::Success(format!(
                    "Successfully requested booking with {}",
                    name
                )));
            }
            Err(e) => {
                log_error!("[Marketplace] booking failed: {}", e);
                self.notice = Some(Notice::Error(
                    "Failed to book session. Please try again.".to_string(),
                ));
            }
        }
    }
}

pub struct MarketplaceData {
    pub practitioners: Vec<Profile>,
    pub profile: Option<Profile>,
}

/// 已审核执业者列表；只有已登录时才加载个人资料
pub async fn load_marketplace<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
) -> Result<MarketplaceData, ApiError> {
    let practitioners = api.list_approved_practitioners().await?;
    let profile = if api.session().is_authenticated() {
        api.get_profile().await.ok()
    } else {
        None
    };
    Ok(MarketplaceData {
        practitioners,
        profile,
    })
}

/// 提交当前草稿；校验失败时直接写入提示，不发请求
pub async fn book_session<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    state: &mut MarketplaceState,
) {
    let request = match state.booking_request() {
        Ok(request) => request,
        Err(message) => {
            state.notice = Some(Notice::Error(message));
            return;
        }
    };
    state.booking = true;
    let result = api.create_booking(&request).await;
    state.finish_booking(result);
}

// =========================================================
// 患者仪表盘 (User Dashboard)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserTab {
    #[default]
    Overview,
    Profile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDashboardData {
    pub profile: Profile,
    pub bookings: Vec<Booking>,
    pub practitioners: Vec<Profile>,
}

impl UserDashboardData {
    pub fn next_session(&self) -> Option<&Booking> {
        self.bookings.first()
    }

    pub fn featured_practitioners(&self) -> &[Profile] {
        let end = self.practitioners.len().min(FEATURED_PRACTITIONERS);
        &self.practitioners[..end]
    }
}

pub async fn load_user_dashboard<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
) -> Result<UserDashboardData, ApiError> {
    let profile = api.get_profile().await?;
    let (bookings, practitioners) = futures::join!(
        api.list_user_bookings(profile.id),
        api.list_approved_practitioners()
    );
    Ok(UserDashboardData {
        profile,
        bookings: bookings?,
        practitioners: practitioners?,
    })
}

// =========================================================
// 资料编辑 (Profile Save)
// =========================================================

/// 成功与失败时分别使用的提示文案
#[derive(Debug, Clone, Copy)]
pub struct ProfileMessages {
    pub saved: &'static str,
    pub failed: &'static str,
}

pub const USER_PROFILE_MESSAGES: ProfileMessages = ProfileMessages {
    saved: "Profile updated successfully!",
    failed: "Failed to update profile.",
};

pub const PRACTITIONER_PROFILE_MESSAGES: ProfileMessages = ProfileMessages {
    saved: "Profile updated successfully",
    failed: "Failed to update profile",
};

/// 保存资料；成功后同步会话中的显示名称
pub async fn save_profile<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    form: &ProfileEditForm,
    messages: ProfileMessages,
) -> Result<(Profile, Notice), Notice> {
    let update = form
        .to_update()
        .map_err(|e| Notice::Error(e.to_string()))?;
    match api.update_profile(&update).await {
        Ok(profile) => {
            api.session().rename(&profile.name);
            Ok((profile, Notice::Success(messages.saved.to_string())))
        }
        Err(e) => {
            log_error!("[Profile] update failed: {}", e);
            Err(Notice::Error(messages.failed.to_string()))
        }
    }
}

// =========================================================
// 执业者仪表盘 (Practitioner Dashboard)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PractitionerTab {
    #[default]
    Overview,
    Profile,
    Verification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PractitionerDashboardData {
    pub profile: Profile,
    pub bookings: Vec<Booking>,
}

impl PractitionerDashboardData {
    /// 尚未提交过文件的执业者视为 `Pending`
    pub fn status(&self) -> VerificationStatus {
        self.profile
            .verification_status
            .unwrap_or(VerificationStatus::Pending)
    }

    pub fn can_submit_document(&self) -> bool {
        self.status().accepts_document()
    }
}

pub async fn load_practitioner_dashboard<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
) -> Result<PractitionerDashboardData, ApiError> {
    let profile = api.get_profile().await?;
    let bookings = api.list_practitioner_bookings(profile.id).await?;
    Ok(PractitionerDashboardData { profile, bookings })
}

/// 仪表盘内的资质（重新）提交，成功后重新加载
pub async fn resubmit_degree<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    config: &ClientConfig,
    profile: &Profile,
    upload: DegreeUpload,
) -> Result<(PractitionerDashboardData, Notice), Notice> {
    validate_degree_file(
        &upload.content_type,
        upload.bytes.len() as u64,
        config.max_degree_bytes,
    )
    .map_err(|e| Notice::Error(e.to_string()))?;

    if let Err(e) = api.upload_degree(profile.id, upload).await {
        log_error!("[Practitioner] degree upload failed: {}", e);
        return Err(Notice::Error("Failed to upload degree".to_string()));
    }
    let data = load_practitioner_dashboard(api).await.map_err(|e| {
        log_error!("[Practitioner] reload failed: {}", e);
        Notice::Error("Failed to upload degree".to_string())
    })?;
    Ok((
        data,
        Notice::Success("Degree uploaded successfully".to_string()),
    ))
}

// =========================================================
// 管理员仪表盘 (Admin Dashboard)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Overview,
    Users,
}

/// 等待确认的审核动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub id: u64,
    pub name: String,
    pub action: AdminAction,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdminStats {
    pub total_users: usize,
    pub practitioners: usize,
    pub pending_approval: usize,
    pub approved: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminBoard {
    /// 待审核视图：全部执业者账号
    pub practitioners: Vec<Profile>,
    /// 全部用户
    pub users: Vec<Profile>,
    pub pending: Option<PendingAction>,
    /// 同一时间只处理一行
    pub processing: Option<u64>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AdminBoard {
    pub fn stats(&self) -> AdminStats {
        let count = |status| {
            self.practitioners
                .iter()
                .filter(|p| p.verification_status == Some(status))
                .count()
        };
        AdminStats {
            total_users: self.users.len(),
            practitioners: self.practitioners.len(),
            pending_approval: count(VerificationStatus::PendingAdminApproval),
            approved: count(VerificationStatus::Approved),
        }
    }

    /// 打开确认弹窗；已有动作在处理中时忽略
    pub fn open_action(&mut self, practitioner: &Profile, action: AdminAction) {
        if self.processing.is_some() {
            return;
        }
        self.pending = Some(PendingAction {
            id: practitioner.id,
            name: practitioner.name.clone(),
            action,
            comment: String::new(),
        });
    }

    pub fn set_comment(&mut self, comment: String) {
        if let Some(pending) = self.pending.as_mut()
            && pending.action.accepts_comment()
        {
            pending.comment = comment;
        }
    }

    pub fn cancel_action(&mut self) {
        if self.processing.is_none() {
            self.pending = None;
        }
    }

    /// 确认弹窗中的动作，返回要执行的动作并标记处理中
    pub fn begin_action(&mut self) -> Option<PendingAction> {
        if self.processing.is_some() {
            return None;
        }
        let pending = self.pending.clone()?;
        self.processing = Some(pending.id);
        self.error = None;
        Some(pending)
    }

    pub fn apply_lists(&mut self, lists: (Vec<Profile>, Vec<Profile>)) {
        let (practitioners, users) = lists;
        self.practitioners = practitioners;
        self.users = users;
        self.loading = false;
    }

    /// 动作结束：成功时替换列表，失败时保留旧列表并显示错误
    pub fn finish_action(&mut self, result: Result<(Vec<Profile>, Vec<Profile>), ApiError>) {
        match result {
            Ok(lists) => self.apply_lists(lists),
            Err(e) => {
                log_error!("[Admin] action failed: {}", e);
                self.error = Some(e.user_message("Action failed. Please try again."));
            }
        }
        self.processing = None;
        self.pending = None;
    }
}

/// 并发拉取两份列表
pub async fn load_admin_lists<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
) -> Result<(Vec<Profile>, Vec<Profile>), ApiError> {
    let (practitioners, users) = futures::join!(
        api.list_practitioners_for_review(),
        api.list_all_users()
    );
    Ok((practitioners?, users?))
}

/// 执行审核动作，成功后重新拉取两份列表
pub async fn run_admin_action<C: HttpClient, N: Navigator>(
    api: &WellnessApi<C, N>,
    pending: &PendingAction,
) -> Result<(Vec<Profile>, Vec<Profile>), ApiError> {
    let comment = Some(pending.comment.trim().to_string()).filter(|c| !c.is_empty());
    match pending.action {
        AdminAction::Approve => api.approve_practitioner(pending.id).await?,
        AdminAction::Reject => api.reject_practitioner(pending.id, comment).await?,
        AdminAction::RequestReupload => api.request_reupload(pending.id, comment).await?,
    };
    log_info!(
        "[Admin] {} applied to practitioner {}",
        pending.action.label(),
        pending.id
    );
    load_admin_lists(api).await
}
