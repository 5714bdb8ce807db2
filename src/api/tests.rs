use super::*;
use crate::error::ApiErrorKind;
use crate::request::{MockHttpClient, ReqwestHttpClient, RequestBody};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use wellness_shared::{BookingStatus, Role, VerificationStatus};

// =========================================================
// 辅助函数
// =========================================================

/// 记录跳转次数的导航器
#[derive(Clone, Default)]
pub(crate) struct RecordingNavigator {
    redirects: Rc<Cell<usize>>,
}

impl RecordingNavigator {
    pub(crate) fn redirects(&self) -> usize {
        self.redirects.get()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.set(self.redirects.get() + 1);
    }
}

pub(crate) type TestApi = WellnessApi<MockHttpClient, RecordingNavigator>;

pub(crate) fn create_api() -> (TestApi, MockHttpClient, RecordingNavigator) {
    let client = MockHttpClient::new();
    let navigator = RecordingNavigator::default();
    let api = WellnessApi::new(
        &ClientConfig::default(),
        client.clone(),
        SessionStore::in_memory(),
        navigator.clone(),
    );
    (api, client, navigator)
}

pub(crate) fn signed_in(api: &TestApi, role: Role) {
    api.session().set(Session {
        access_token: "tok-123".to_string(),
        role,
        display_name: "Mira".to_string(),
        email_verified: true,
        email: Some("mira@example.org".to_string()),
    });
}

fn signed_in_as<C: HttpClient>(api: &WellnessApi<C, RecordingNavigator>, token: &str) {
    api.session().set(Session {
        access_token: token.to_string(),
        role: Role::Client,
        display_name: "Mira".to_string(),
        email_verified: true,
        email: None,
    });
}

fn auth_json(role: &str, verified: bool) -> serde_json::Value {
    json!({
        "accessToken": "fresh-token",
        "role": role,
        "name": "Mira",
        "emailVerified": verified
    })
}

fn profile_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Asha",
        "email": "asha@example.org",
        "role": "PROVIDER",
        "specialization": "Reiki",
        "verificationStatus": "PENDING_ADMIN_APPROVAL",
        "emailVerified": true
    })
}

// =========================================================
// 请求拦截器
// =========================================================

#[tokio::test]
async fn test_protected_call_without_token_is_still_sent() {
    let (api, client, _) = create_api();
    client.mock_response(HttpMethod::Get, "/user/profile", 200, profile_json(1));

    api.get_profile().await.unwrap();

    let req = client.last_request().unwrap();
    assert!(req.url.ends_with("/api/user/profile"));
    assert!(req.header(HEADER_AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_protected_call_carries_bearer_token() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Client);
    client.mock_response(HttpMethod::Get, "/user/practitioners", 200, json!([]));

    api.list_approved_practitioners().await.unwrap();

    let req = client.last_request().unwrap();
    assert_eq!(req.header("authorization"), Some("Bearer tok-123"));
}

fn register_request() -> RegisterRequest {
    RegisterRequest {
        name: "Mira".to_string(),
        email: "mira@example.org".to_string(),
        password: "secret-pass".to_string(),
        role: Role::Client,
        specialization: None,
        city: None,
        country: None,
    }
}

#[tokio::test]
async fn test_public_calls_never_carry_token() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Client);
    client.mock_response(HttpMethod::Post, "/auth/login", 200, auth_json("CLIENT", true));
    client.mock_response(
        HttpMethod::Post,
        "/auth/register",
        200,
        auth_json("CLIENT", false),
    );
    client.mock_response(
        HttpMethod::Post,
        "/auth/verify-otp",
        200,
        auth_json("CLIENT", true),
    );
    client.mock_response(
        HttpMethod::Post,
        "/auth/resend-otp",
        200,
        json!({"message": "sent"}),
    );
    client.mock_response(
        HttpMethod::Post,
        "/auth/forgot-password",
        200,
        json!({"message": "ok"}),
    );

    api.login(&LoginRequest {
        email: "mira@example.org".to_string(),
        password: "secret-pass".to_string(),
    })
    .await
    .unwrap();
    api.register(&register_request()).await.unwrap();
    api.verify_otp("mira@example.org", "123456").await.unwrap();
    api.resend_otp("mira@example.org").await.unwrap();
    api.forgot_password("mira@example.org").await.unwrap();

    // 每次调用前会话里都有令牌
    assert!(api.session().token().is_some());
    let requests = client.requests();
    assert_eq!(requests.len(), 5);
    for req in requests {
        assert!(
            req.header(HEADER_AUTHORIZATION).is_none(),
            "{} should be public",
            req.url
        );
    }
}

// =========================================================
// 响应拦截器
// =========================================================

#[tokio::test]
async fn test_unauthorized_clears_session_and_redirects_once() {
    let (api, client, navigator) = create_api();
    signed_in(&api, Role::Admin);
    client.mock_response(
        HttpMethod::Get,
        "/admin/all-users",
        401,
        json!({"error": "expired"}),
    );

    let err = api.list_all_users().await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    assert!(api.session().current().is_none());
    assert_eq!(navigator.redirects(), 1);
}

/// 先让出一次执行权再应答，让并发请求都在任何响应到达前发出
#[derive(Clone)]
struct YieldingClient(MockHttpClient);

#[async_trait::async_trait(?Send)]
impl HttpClient for YieldingClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        tokio::task::yield_now().await;
        self.0.send(req).await
    }
}

fn yielding_api() -> (
    WellnessApi<YieldingClient, RecordingNavigator>,
    MockHttpClient,
    RecordingNavigator,
) {
    let client = MockHttpClient::new();
    let navigator = RecordingNavigator::default();
    let api = WellnessApi::new(
        &ClientConfig::default(),
        YieldingClient(client.clone()),
        SessionStore::in_memory(),
        navigator.clone(),
    );
    (api, client, navigator)
}

#[tokio::test]
async fn test_concurrent_unauthorized_redirects_once() {
    let (api, client, navigator) = yielding_api();
    signed_in_as(&api, "tok-123");
    client.mock_response(HttpMethod::Get, "/bookings/user/3", 401, json!({}));
    client.mock_response(HttpMethod::Get, "/user/practitioners", 401, json!({}));

    let (bookings, practitioners) = futures::join!(
        api.list_user_bookings(3),
        api.list_approved_practitioners()
    );

    assert_eq!(bookings.unwrap_err().kind, ApiErrorKind::Unauthorized);
    assert_eq!(practitioners.unwrap_err().kind, ApiErrorKind::Unauthorized);
    assert!(
        client
            .requests()
            .iter()
            .all(|r| r.header(HEADER_AUTHORIZATION) == Some("Bearer tok-123"))
    );
    assert!(api.session().current().is_none());
    assert_eq!(navigator.redirects(), 1);
}

#[tokio::test]
async fn test_stale_unauthorized_keeps_new_session() {
    let (api, client, navigator) = yielding_api();
    signed_in_as(&api, "old-token");
    client.mock_response(HttpMethod::Get, "/user/profile", 401, json!({}));

    // 请求在途时用户重新登录
    let (profile, ()) = futures::join!(api.get_profile(), async {
        signed_in_as(&api, "new-token");
    });

    assert_eq!(profile.unwrap_err().kind, ApiErrorKind::Unauthorized);
    assert_eq!(api.session().token().as_deref(), Some("new-token"));
    assert_eq!(navigator.redirects(), 0);
}

#[tokio::test]
async fn test_unauthorized_on_public_path_keeps_session() {
    let (api, client, navigator) = create_api();
    signed_in(&api, Role::Provider);
    client.mock_response(
        HttpMethod::Post,
        "/auth/login",
        401,
        json!({"error": "Invalid email or password"}),
    );

    let err = api
        .login(&LoginRequest {
            email: "a@b.co".to_string(),
            password: "wrong-pass".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    assert_eq!(err.user_message("fallback"), "Invalid email or password");
    assert_eq!(api.session().token().as_deref(), Some("tok-123"));
    assert_eq!(api.session().role(), Some(Role::Provider));
    assert_eq!(navigator.redirects(), 0);
}

#[tokio::test]
async fn test_other_failures_leave_session_untouched() {
    let (api, client, navigator) = create_api();
    signed_in(&api, Role::Client);
    client.mock_response(
        HttpMethod::Get,
        "/user/profile",
        403,
        json!({"error": "forbidden"}),
    );
    client.mock_response(HttpMethod::Post, "/bookings", 500, json!({"error": "boom"}));
    client.mock_transport_error(HttpMethod::Get, "/bookings/user/3");

    let forbidden = api.get_profile().await.unwrap_err();
    assert_eq!(forbidden.kind, ApiErrorKind::Domain);
    assert_eq!(forbidden.status, Some(403));

    let failed = api.create_booking(&Booking::request(3, 9, "")).await.unwrap_err();
    assert_eq!(failed.status, Some(500));

    let transport = api.list_user_bookings(3).await.unwrap_err();
    assert_eq!(transport.kind, ApiErrorKind::Transport);

    assert_eq!(api.session().token().as_deref(), Some("tok-123"));
    assert_eq!(navigator.redirects(), 0);
}

#[tokio::test]
async fn test_transport_failure_from_real_client() {
    let session = SessionStore::in_memory();
    let api = WellnessApi::new(
        &ClientConfig::with_base_url("http://127.0.0.1:9/api"),
        ReqwestHttpClient::new(),
        session,
        RecordingNavigator::default(),
    );

    let err = api.list_approved_practitioners().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Transport);
    assert_eq!(err.user_message("Network unavailable"), "Network unavailable");
}

#[tokio::test]
async fn test_unknown_status_is_a_decode_error() {
    let (api, client, _) = create_api();
    let mut body = profile_json(4);
    body["verificationStatus"] = json!("SUSPENDED");
    client.mock_response(HttpMethod::Get, "/user/profile", 200, body);

    let err = api.get_profile().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

// =========================================================
// 会话写入
// =========================================================

#[tokio::test]
async fn test_login_replaces_whole_session() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Admin);
    client.mock_response(
        HttpMethod::Post,
        "/auth/login",
        200,
        auth_json("PROVIDER", false),
    );

    let resp = api
        .login(&LoginRequest {
            email: "new@example.org".to_string(),
            password: "secret-pass".to_string(),
        })
        .await
        .unwrap();
    assert!(!resp.email_verified);

    let session = api.session().current().unwrap();
    assert_eq!(session.access_token, "fresh-token");
    assert_eq!(session.role, Role::Provider);
    assert!(!session.email_verified);
    assert_eq!(session.email.as_deref(), Some("new@example.org"));
}

#[tokio::test]
async fn test_verify_otp_marks_session_verified() {
    let (api, client, _) = create_api();
    client.mock_response(
        HttpMethod::Post,
        "/auth/verify-otp",
        200,
        auth_json("CLIENT", true),
    );

    api.verify_otp("mira@example.org", "123456").await.unwrap();

    let req = client.last_request().unwrap();
    assert_eq!(
        req.body,
        RequestBody::Json(r#"{"email":"mira@example.org","otp":"123456"}"#.to_string())
    );
    assert!(api.session().current().unwrap().email_verified);
}

#[tokio::test]
async fn test_failed_login_writes_nothing() {
    let (api, client, _) = create_api();
    client.mock_response(
        HttpMethod::Post,
        "/auth/register",
        409,
        json!({"error": "Email already registered"}),
    );

    let err = api.register(&register_request()).await.unwrap_err();

    assert_eq!(
        err.user_message("Registration failed. Please try again."),
        "Email already registered"
    );
    assert!(api.session().current().is_none());
}

// =========================================================
// 其它端点
// =========================================================

#[tokio::test]
async fn test_degree_upload_is_multipart() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Provider);
    client.mock_response(
        HttpMethod::Post,
        "/degree/upload",
        200,
        json!({"message": "uploaded"}),
    );

    let resp = api
        .upload_degree(
            42,
            DegreeUpload {
                file_name: "degree.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: vec![0x25, 0x50, 0x44, 0x46],
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.message, "uploaded");

    let req = client.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer tok-123"));
    match req.body {
        RequestBody::Multipart(form) => {
            assert_eq!(form.text_value("userId"), Some("42"));
            assert_eq!(form.parts.len(), 2);
        }
        other => panic!("expected multipart body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_admin_actions_accept_plain_text_replies() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Admin);
    client.mock_response(HttpMethod::Put, "/admin/approve/5", 200, json!("Practitioner approved"));
    client.mock_response(
        HttpMethod::Put,
        "/admin/request-reupload/5",
        200,
        json!({"message": "ok"}),
    );

    let approved = api.approve_practitioner(5).await.unwrap();
    assert_eq!(approved.message, "Practitioner approved");
    assert_eq!(client.last_request().unwrap().body, RequestBody::Empty);

    api.request_reupload(5, None).await.unwrap();
    assert_eq!(
        client.last_request().unwrap().body,
        RequestBody::Json(r#"{"comment":""}"#.to_string())
    );
}

#[tokio::test]
async fn test_practitioner_lists_decode_typed_status() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Admin);
    client.mock_response(
        HttpMethod::Get,
        "/admin/users",
        200,
        json!([profile_json(1), profile_json(2)]),
    );

    let list = api.list_practitioners_for_review().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(
        list[0].verification_status,
        Some(VerificationStatus::PendingAdminApproval)
    );
}

#[tokio::test]
async fn test_create_booking_returns_server_copy() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Client);
    client.mock_response(
        HttpMethod::Post,
        "/bookings",
        200,
        json!({
            "id": 11,
            "userId": 3,
            "practitionerId": 9,
            "status": "PENDING",
            "notes": "knee pain"
        }),
    );

    let booking = api
        .create_booking(&Booking::request(3, 9, "knee pain"))
        .await
        .unwrap();
    assert_eq!(booking.id, Some(11));
    assert_eq!(booking.status, BookingStatus::Pending);
}

#[test]
fn test_degree_document_url_uses_base() {
    let (api, _, _) = create_api();
    assert_eq!(
        api.degree_document_url(8),
        "http://localhost:8080/api/degree/8"
    );
}
