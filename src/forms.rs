//! 表单数据与客户端校验
//!
//! 校验失败的表单不会发出任何请求。组件层只负责把输入框绑定到这里的字段。

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use wellness_shared::{LoginRequest, Profile, ProfileUpdate, RegisterRequest, Role};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

// =========================================================
// 字段级错误 (Field Errors)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Specialization,
}

/// 按字段归档的校验错误
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<RegisterField, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: RegisterField, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    pub fn get(&self, field: RegisterField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// 用户修改某个字段后清掉它的错误
    pub fn clear(&mut self, field: RegisterField) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// 宽松的邮箱格式检查，调用方先去掉首尾空白
pub fn looks_like_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

// =========================================================
// 登录 (Login)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn to_request(&self) -> Result<LoginRequest, ValidationError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::new("Please enter your email and password"));
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

// =========================================================
// 注册 (Register)
// =========================================================

/// 注册页的两个身份标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationRole {
    #[default]
    Patient,
    Practitioner,
}

impl RegistrationRole {
    /// `?role=PRACTITIONER` 预选执业者，其余情况都是患者
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("PRACTITIONER") => RegistrationRole::Practitioner,
            _ => RegistrationRole::Patient,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RegistrationRole::Patient => Role::Client,
            RegistrationRole::Practitioner => Role::Provider,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RegistrationRole::Patient => "Patient",
            RegistrationRole::Practitioner => "Practitioner",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub role: RegistrationRole,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub specialization: String,
    pub city: String,
    pub country: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().chars().count() < 2 {
            errors.insert(
                RegisterField::Name,
                "Full name must be at least 2 characters",
            );
        }
        if !looks_like_email(self.email.trim()) {
            errors.insert(RegisterField::Email, "Please enter a valid email address");
        }
        if self.password.chars().count() < 8 {
            errors.insert(
                RegisterField::Password,
                "Password must be at least 8 characters",
            );
        }
        if self.password != self.confirm_password {
            errors.insert(RegisterField::ConfirmPassword, "Passwords do not match");
        }
        if self.role == RegistrationRole::Practitioner && self.specialization.trim().is_empty() {
            errors.insert(RegisterField::Specialization, "Specialization is required");
        }
        errors
    }

    pub fn to_request(&self) -> Result<RegisterRequest, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let specialization = match self.role {
            RegistrationRole::Practitioner => optional(&self.specialization),
            RegistrationRole::Patient => None,
        };
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role.role(),
            specialization,
            city: optional(&self.city),
            country: optional(&self.country),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =========================================================
// 资料编辑 (Profile Edit)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEditForm {
    pub name: String,
    pub city: String,
    pub country: String,
    pub specialization: String,
    pub password: String,
    pub confirm_password: String,
}

impl ProfileEditForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            city: profile.city.clone().unwrap_or_default(),
            country: profile.country.clone().unwrap_or_default(),
            specialization: profile.specialization.clone().unwrap_or_default(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }

    /// 转换为部分更新；密码留空表示不修改
    pub fn to_update(&self) -> Result<ProfileUpdate, ValidationError> {
        if !self.password.is_empty() && self.password != self.confirm_password {
            return Err(ValidationError::new("Passwords do not match!"));
        }
        Ok(ProfileUpdate {
            name: optional(&self.name),
            city: Some(self.city.trim().to_string()),
            country: Some(self.country.trim().to_string()),
            specialization: optional(&self.specialization),
            password: if self.password.is_empty() {
                None
            } else {
                Some(self.password.clone())
            },
        })
    }

    pub fn clear_passwords(&mut self) {
        self.password.clear();
        self.confirm_password.clear();
    }
}

// =========================================================
// 资质文件 (Degree File)
// =========================================================

/// 上传前的本地检查：只接受 PDF，且不超过 `max_bytes`
pub fn validate_degree_file(
    content_type: &str,
    size: u64,
    max_bytes: u64,
) -> Result<(), ValidationError> {
    if content_type != PDF_CONTENT_TYPE {
        return Err(ValidationError::new("Only PDF files are allowed"));
    }
    if size > max_bytes {
        return Err(ValidationError::new("File size must be less than 5MB"));
    }
    Ok(())
}

// =========================================================
// 市场搜索 (Marketplace Search)
// =========================================================

/// 按姓名或执业方向过滤（不区分大小写）
pub fn filter_practitioners<'a>(practitioners: &'a [Profile], query: &str) -> Vec<&'a Profile> {
    let needle = query.trim().to_lowercase();
    practitioners
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p
                    .specialization
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn practitioner(id: u64, name: &str, specialization: Option<&str>) -> Profile {
        Profile {
            id,
            name: name.to_string(),
            email: format!("p{}@example.org", id),
            role: Role::Provider,
            city: None,
            country: None,
            specialization: specialization.map(str::to_string),
            verification_status: None,
            degree_file: None,
            verified: Some(true),
            email_verified: true,
            admin_comment: None,
        }
    }

    #[test]
    fn email_check_matches_loose_pattern() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("first.last@mail.example.org"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@.co"));
        assert!(!looks_like_email("a@b."));
        assert!(!looks_like_email("plain"));
        assert!(!looks_like_email("a b@c.co"));
    }

    #[test]
    fn register_collects_every_field_error() {
        let form = RegisterForm {
            role: RegistrationRole::Practitioner,
            name: "A".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
            ..Default::default()
        };
        let errors = form.to_request().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(
            errors.get(RegisterField::Specialization),
            Some("Specialization is required")
        );
        assert_eq!(
            errors.get(RegisterField::ConfirmPassword),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut errors = RegisterForm::default().validate();
        assert!(errors.get(RegisterField::Name).is_some());
        errors.clear(RegisterField::Name);
        assert!(errors.get(RegisterField::Name).is_none());
    }

    #[test]
    fn patient_request_omits_specialization() {
        let form = RegisterForm {
            role: RegistrationRole::Patient,
            name: "Mira".to_string(),
            email: "mira@example.org".to_string(),
            password: "long-enough".to_string(),
            confirm_password: "long-enough".to_string(),
            specialization: "Reiki".to_string(),
            city: " Pune ".to_string(),
            country: String::new(),
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.role, Role::Client);
        assert_eq!(req.specialization, None);
        assert_eq!(req.city.as_deref(), Some("Pune"));
        assert_eq!(req.country, None);
    }

    #[test]
    fn registration_role_from_query() {
        assert_eq!(
            RegistrationRole::from_query(Some("PRACTITIONER")).role(),
            Role::Provider
        );
        assert_eq!(
            RegistrationRole::from_query(Some("PATIENT")),
            RegistrationRole::Patient
        );
        assert_eq!(RegistrationRole::from_query(None), RegistrationRole::Patient);
    }

    #[test]
    fn profile_edit_password_rules() {
        let mut form = ProfileEditForm::from_profile(&practitioner(1, "Asha", Some("Reiki")));
        let update = form.to_update().unwrap();
        assert_eq!(update.password, None);
        assert_eq!(update.specialization.as_deref(), Some("Reiki"));

        form.password = "new-secret".to_string();
        form.confirm_password = "typo".to_string();
        assert_eq!(
            form.to_update().unwrap_err().message(),
            "Passwords do not match!"
        );

        form.confirm_password = "new-secret".to_string();
        assert_eq!(form.to_update().unwrap().password.as_deref(), Some("new-secret"));
        form.clear_passwords();
        assert!(form.password.is_empty() && form.confirm_password.is_empty());
    }

    #[test]
    fn degree_file_rules() {
        let max = 5 * 1024 * 1024;
        assert!(validate_degree_file("application/pdf", 1024, max).is_ok());
        assert_eq!(
            validate_degree_file("image/png", 1024, max).unwrap_err().message(),
            "Only PDF files are allowed"
        );
        assert_eq!(
            validate_degree_file("application/pdf", max + 1, max)
                .unwrap_err()
                .message(),
            "File size must be less than 5MB"
        );
    }

    #[test]
    fn filter_matches_name_or_specialization() {
        let list = vec![
            practitioner(1, "Asha Rao", Some("Reiki")),
            practitioner(2, "Ben Ito", Some("Acupuncture")),
            practitioner(3, "Cara Diaz", None),
        ];
        let ids = |q: &str| {
            filter_practitioners(&list, q)
                .iter()
                .map(|p| p.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids("reiki"), vec![1]);
        assert_eq!(ids("BEN"), vec![2]);
        assert_eq!(ids("  "), vec![1, 2, 3]);
        assert!(ids("yoga").is_empty());
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            email: " mira@example.org ".to_string(),
            password: String::new(),
        };
        assert!(form.to_request().is_err());
        let form = LoginForm {
            password: "pw".to_string(),
            ..form
        };
        assert_eq!(form.to_request().unwrap().email, "mira@example.org");
    }
}
