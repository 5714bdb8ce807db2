use crate::{AuthResponse, Booking, MessageResponse, Profile, ProfileUpdate, Role};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request itself is sent as the JSON body.
    /// Requests that only carry path or query parameters set this to `false`.
    const SENDS_BODY: bool = true;
    /// The URL path relative to the API base, including any query string.
    fn path(&self) -> String;
}

// =========================================================
// Public endpoints
// =========================================================

/// Endpoints reachable without a bearer token. Matched by suffix on the
/// request path (query string excluded).
pub const PUBLIC_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/verify-otp",
    "/auth/resend-otp",
    "/auth/forgot-password",
];

pub fn is_public_path(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    PUBLIC_PATHS.iter().any(|public| path.ends_with(public))
}

pub const DEGREE_UPLOAD_PATH: &str = "/degree/upload";

/// Path of a practitioner's stored degree document.
pub fn degree_document_path(user_id: u64) -> String {
    format!("/degree/{}", user_id)
}

// Query strings only ever carry opaque tokens, so RFC 3986 unreserved
// characters pass through and everything else is percent-encoded.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/register".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

impl ApiRequest for VerifyOtpRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/verify-otp".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

impl ApiRequest for ResendOtpRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/resend-otp".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/forgot-password".to_string()
    }
}

/// Email verification through the link sent by mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

impl ApiRequest for VerifyEmailRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        format!("/auth/verify?token={}", encode_query_value(&self.token))
    }
}

// =========================================================
// Profile & practitioners
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = Profile;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        "/user/profile".to_string()
    }
}

impl ApiRequest for ProfileUpdate {
    type Response = Profile;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        "/user/profile".to_string()
    }
}

/// Approved practitioners only (marketplace, patient dashboard).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListApprovedPractitionersRequest;

impl ApiRequest for ListApprovedPractitionersRequest {
    type Response = Vec<Profile>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        "/user/practitioners".to_string()
    }
}

/// Every practitioner regardless of verification status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAllPractitionersRequest;

impl ApiRequest for ListAllPractitionersRequest {
    type Response = Vec<Profile>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        "/user/all-practitioners".to_string()
    }
}

// =========================================================
// Admin
// =========================================================

/// Admin view of all PROVIDER accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPractitionersForReviewRequest;

impl ApiRequest for ListPractitionersForReviewRequest {
    type Response = Vec<Profile>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        "/admin/users".to_string()
    }
}

/// Admin view of every CLIENT and PROVIDER account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAllUsersRequest;

impl ApiRequest for ListAllUsersRequest {
    type Response = Vec<Profile>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        "/admin/all-users".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovePractitionerRequest {
    pub id: u64,
}

impl ApiRequest for ApprovePractitionerRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        format!("/admin/approve/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectPractitionerRequest {
    #[serde(skip)]
    pub id: u64,
    pub comment: String,
}

impl ApiRequest for RejectPractitionerRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/admin/reject/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestReuploadRequest {
    #[serde(skip)]
    pub id: u64,
    pub comment: String,
}

impl ApiRequest for RequestReuploadRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/admin/request-reupload/{}", self.id)
    }
}

// =========================================================
// Bookings
// =========================================================

impl ApiRequest for Booking {
    type Response = Booking;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/bookings".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUserBookingsRequest {
    pub user_id: u64,
}

impl ApiRequest for ListUserBookingsRequest {
    type Response = Vec<Booking>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        format!("/bookings/user/{}", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPractitionerBookingsRequest {
    pub practitioner_id: u64,
}

impl ApiRequest for ListPractitionerBookingsRequest {
    type Response = Vec<Booking>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const SENDS_BODY: bool = false;
    fn path(&self) -> String {
        format!("/bookings/practitioner/{}", self.practitioner_id)
    }
}
