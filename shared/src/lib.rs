use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod date;
pub mod protocol;

pub use protocol::*;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 可供选择的执业方向（注册页与执业者资料页共用）
pub const SPECIALIZATIONS: &[&str] = &[
    "Acupuncture",
    "Ayurveda",
    "Chiropractic",
    "Homeopathy",
    "Naturopathy",
    "Yoga Therapy",
    "Massage Therapy",
    "Nutrition & Dietetics",
    "Reiki",
    "Hypnotherapy",
];

// =========================================================
// 角色 (Role)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Client,
    Provider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Provider => "PROVIDER",
            Role::Admin => "ADMIN",
        }
    }

    /// 面向用户的称呼
    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "Patient",
            Role::Provider => "Practitioner",
            Role::Admin => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 资质审核状态 (Verification Status)
// =========================================================

/// 执业者资质审核状态，由服务端维护。
///
/// ```text
/// Pending -> PendingAdminApproval -> { Approved | Rejected | ReuploadRequested }
/// ReuploadRequested --(重新上传)--> PendingAdminApproval
/// ```
///
/// 未知取值在反序列化时直接报错，不会被当作 `Pending` 吞掉。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    PendingAdminApproval,
    Approved,
    Rejected,
    ReuploadRequested,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "PENDING",
            VerificationStatus::PendingAdminApproval => "PENDING_ADMIN_APPROVAL",
            VerificationStatus::Approved => "APPROVED",
            VerificationStatus::Rejected => "REJECTED",
            VerificationStatus::ReuploadRequested => "REUPLOAD_REQUESTED",
        }
    }

    /// 客户端视角下的终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationStatus::Approved | VerificationStatus::Rejected
        )
    }

    /// 当前状态下是否提供（重新）提交资质文件的入口
    pub fn accepts_document(&self) -> bool {
        !self.is_terminal()
    }

    /// 审核员留言只在这两种状态下对执业者展示
    pub fn shows_admin_comment(&self) -> bool {
        matches!(
            self,
            VerificationStatus::Rejected | VerificationStatus::ReuploadRequested
        )
    }

    /// 管理端列表中的短标签
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "Pending",
            VerificationStatus::PendingAdminApproval => "Pending Approval",
            VerificationStatus::Approved => "Verified",
            VerificationStatus::Rejected => "Rejected",
            VerificationStatus::ReuploadRequested => "Reupload Requested",
        }
    }

    /// 执业者自己看到的长标签
    pub fn headline(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "Pending",
            VerificationStatus::PendingAdminApproval => "Pending Admin Review",
            VerificationStatus::Approved => "Verified Expert",
            VerificationStatus::Rejected => "Application Rejected",
            VerificationStatus::ReuploadRequested => "Reupload Required",
        }
    }
}

/// 管理员可以对执业者执行的审核动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Approve,
    Reject,
    RequestReupload,
}

impl AdminAction {
    pub fn accepts_comment(&self) -> bool {
        !matches!(self, AdminAction::Approve)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminAction::Approve => "Approve",
            AdminAction::Reject => "Reject",
            AdminAction::RequestReupload => "Request Reupload",
        }
    }
}

// =========================================================
// 预约状态 (Booking Status)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    pub email_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default)]
    pub degree_file: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub admin_comment: Option<String>,
}

impl Profile {
    /// 头像上显示的首字母
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// "城市, 国家"，缺哪个省哪个
    pub fn location(&self) -> Option<String> {
        match (non_empty(&self.city), non_empty(&self.country)) {
            (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(country)) => Some(country.to_string()),
            (None, None) => None,
        }
    }

    pub fn specialization_or_default(&self) -> &str {
        non_empty(&self.specialization).unwrap_or("General Wellness")
    }

    /// 审核员留言，仅在对执业者可见的状态下返回
    pub fn visible_admin_comment(&self) -> Option<&str> {
        let status = self.verification_status?;
        if status.shows_admin_comment() {
            non_empty(&self.admin_comment)
        } else {
            None
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 资料部分更新，缺省字段不参与序列化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user_id: u64,
    pub practitioner_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<NaiveDateTime>,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Booking {
    /// 客户端发起的新预约，状态总是 `Pending`
    pub fn request(user_id: u64, practitioner_id: u64, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        Self {
            id: None,
            user_id,
            practitioner_id,
            booking_date: None,
            status: BookingStatus::Pending,
            notes: if notes.trim().is_empty() {
                None
            } else {
                Some(notes)
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// 服务端统一的错误响应体 `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
