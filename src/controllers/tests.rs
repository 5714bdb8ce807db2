use super::*;
use crate::api::tests::{create_api, signed_in};
use crate::forms::{RegisterField, RegistrationRole};
use crate::request::{HttpMethod, RequestBody};
use serde_json::json;
use wellness_shared::BookingStatus;

// =========================================================
// 辅助函数
// =========================================================

fn practitioner_json(
    id: u64,
    name: &str,
    status: &str,
    comment: Option<&str>,
) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("p{}@example.org", id),
        "role": "PROVIDER",
        "specialization": "Acupuncture",
        "verificationStatus": status,
        "adminComment": comment,
        "emailVerified": true
    })
}

fn client_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Mira",
        "email": "mira@example.org",
        "role": "CLIENT",
        "emailVerified": true
    })
}

fn login_form() -> LoginForm {
    LoginForm {
        email: "mira@example.org".to_string(),
        password: "secret-pass".to_string(),
    }
}

// =========================================================
// 登录与注册
// =========================================================

#[tokio::test]
async fn test_unverified_login_goes_to_otp_with_email() {
    let (api, client, _) = create_api();
    client.mock_response(
        HttpMethod::Post,
        "/auth/login",
        200,
        json!({"accessToken": "t", "role": "CLIENT", "name": "Mira", "emailVerified": false}),
    );

    let outcome = submit_login(&api, &login_form()).await.unwrap();

    assert_eq!(
        outcome,
        LoginOutcome::VerifyOtp {
            email: "mira@example.org".to_string()
        }
    );
}

#[tokio::test]
async fn test_verified_login_goes_to_role_home() {
    let (api, client, _) = create_api();
    client.mock_response(
        HttpMethod::Post,
        "/auth/login",
        200,
        json!({"accessToken": "t", "role": "ADMIN", "name": "Root", "emailVerified": true}),
    );

    let outcome = submit_login(&api, &login_form()).await.unwrap();
    assert_eq!(outcome, LoginOutcome::Dashboard(AppRoute::AdminDashboard));
}

#[tokio::test]
async fn test_login_failure_message() {
    let (api, client, _) = create_api();
    client.mock_transport_error(HttpMethod::Post, "/auth/login");
    assert_eq!(
        submit_login(&api, &login_form()).await.unwrap_err(),
        "Invalid email or password"
    );

    // 校验失败不发请求
    let empty = LoginForm::default();
    assert!(submit_login(&api, &empty).await.is_err());
    assert_eq!(client.count(HttpMethod::Post, "/auth/login"), 1);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (api, client, _) = create_api();
    assert_eq!(request_password_reset(&api, "  ").await, Ok(None));
    assert!(client.requests().is_empty());

    client.mock_response(
        HttpMethod::Post,
        "/auth/forgot-password",
        200,
        json!({"message": "sent"}),
    );
    client.mock_response(HttpMethod::Post, "/auth/forgot-password", 500, json!({}));
    assert_eq!(
        request_password_reset(&api, "mira@example.org").await,
        Ok(Some("Temporary password sent!"))
    );
    assert_eq!(
        request_password_reset(&api, "mira@example.org")
            .await
            .unwrap_err(),
        "Failed to send recovery email"
    );
}

#[tokio::test]
async fn test_registration_validates_before_sending() {
    let (api, client, _) = create_api();
    let form = RegisterForm {
        role: RegistrationRole::Practitioner,
        ..Default::default()
    };

    match submit_registration(&api, &form).await {
        Err(RegisterFailure::Fields(errors)) => {
            assert!(errors.get(RegisterField::Specialization).is_some());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn test_registration_success_returns_email() {
    let (api, client, _) = create_api();
    client.mock_response(
        HttpMethod::Post,
        "/auth/register",
        200,
        json!({"accessToken": "t", "role": "PROVIDER", "name": "Asha", "emailVerified": false}),
    );
    let form = RegisterForm {
        role: RegistrationRole::Practitioner,
        name: "Asha".to_string(),
        email: "asha@example.org".to_string(),
        password: "long-enough".to_string(),
        confirm_password: "long-enough".to_string(),
        specialization: "Reiki".to_string(),
        ..Default::default()
    };

    assert_eq!(
        submit_registration(&api, &form).await.unwrap(),
        "asha@example.org"
    );
    let body = match client.last_request().unwrap().body {
        RequestBody::Json(body) => serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        other => panic!("unexpected body {:?}", other),
    };
    assert_eq!(body["role"], "PROVIDER");
    assert_eq!(body["specialization"], "Reiki");
}

// =========================================================
// 验证码
// =========================================================

#[tokio::test]
async fn test_otp_email_falls_back_to_session() {
    let (api, _, _) = create_api();
    assert_eq!(otp_email(None, api.session()), None);
    signed_in(&api, Role::Client);
    assert_eq!(
        otp_email(Some(String::new()), api.session()).as_deref(),
        Some("mira@example.org")
    );
    assert_eq!(
        otp_email(Some("x@y.io".to_string()), api.session()).as_deref(),
        Some("x@y.io")
    );
}

#[tokio::test]
async fn test_otp_submit_and_resend() {
    let (api, client, _) = create_api();
    let mut input = OtpInput::new();
    input.input(0, "1");
    assert_eq!(
        submit_otp(&api, "mira@example.org", &input).await.unwrap_err(),
        "Please enter the full 6-digit code"
    );

    for (i, d) in ["2", "3", "4", "5", "6"].iter().enumerate() {
        input.input(i + 1, d);
    }
    client.mock_response(HttpMethod::Post, "/auth/verify-otp", 400, json!({}));
    assert_eq!(
        submit_otp(&api, "mira@example.org", &input).await.unwrap_err(),
        "Verification failed. Invalid OTP."
    );

    client.mock_response(HttpMethod::Post, "/auth/resend-otp", 500, json!({"error": "smtp"}));
    assert_eq!(
        resend_otp(&api, "mira@example.org").await.unwrap_err(),
        "Failed to resend OTP. Please try again."
    );
}

#[tokio::test]
async fn test_verify_email_link_states() {
    let (api, client, _) = create_api();
    assert_eq!(verify_email_link(&api, None).await, VerifyEmailState::Error);
    client.mock_response(HttpMethod::Get, "/auth/verify?token=abc", 200, json!("Email verified"));
    assert_eq!(
        verify_email_link(&api, Some("abc")).await,
        VerifyEmailState::Success
    );
}

// =========================================================
// 市场与预约
// =========================================================

#[tokio::test]
async fn test_booking_confirmation_clears_notes() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Client);
    client.mock_response(
        HttpMethod::Get,
        "/user/practitioners",
        200,
        json!([practitioner_json(9, "Dr. Lin", "APPROVED", None)]),
    );
    client.mock_response(HttpMethod::Get, "/user/profile", 200, client_json(3));
    client.mock_response(
        HttpMethod::Post,
        "/bookings",
        201,
        json!({
            "id": 55,
            "userId": 3,
            "practitionerId": 9,
            "status": "PENDING",
            "notes": "knee pain"
        }),
    );

    let data = load_marketplace(&api).await.unwrap();
    let mut state = MarketplaceState {
        practitioners: data.practitioners,
        profile: data.profile,
        ..Default::default()
    };
    let lin = state.practitioners[0].clone();
    state.open_booking(lin);
    state.set_notes("knee pain".to_string());

    book_session(&api, &mut state).await;

    let sent = match client.last_request().unwrap().body {
        RequestBody::Json(body) => serde_json::from_str::<Booking>(&body).unwrap(),
        other => panic!("unexpected body {:?}", other),
    };
    assert_eq!(sent.user_id, 3);
    assert_eq!(sent.practitioner_id, 9);
    assert_eq!(sent.status, BookingStatus::Pending);
    assert_eq!(sent.notes.as_deref(), Some("knee pain"));

    let notice = state.notice.clone().unwrap();
    assert!(!notice.is_error());
    assert!(notice.text().contains("Dr. Lin"));
    assert!(state.draft.is_none());
    assert!(!state.booking);
}

#[tokio::test]
async fn test_anonymous_marketplace_skips_profile() {
    let (api, client, navigator) = create_api();
    client.mock_response(HttpMethod::Get, "/user/practitioners", 200, json!([]));

    let data = load_marketplace(&api).await.unwrap();
    assert!(data.profile.is_none());
    assert_eq!(client.count(HttpMethod::Get, "/user/profile"), 0);
    assert_eq!(navigator.redirects(), 0);

    let mut state = MarketplaceState::default();
    state.open_booking(Profile {
        id: 9,
        name: "Dr. Lin".to_string(),
        email: "lin@example.org".to_string(),
        role: Role::Provider,
        city: None,
        country: None,
        specialization: None,
        verification_status: Some(VerificationStatus::Approved),
        degree_file: None,
        verified: Some(true),
        email_verified: true,
        admin_comment: None,
    });
    book_session(&api, &mut state).await;
    assert_eq!(
        state.notice,
        Some(Notice::Error("Please log in to book a session.".to_string()))
    );
    assert_eq!(client.count(HttpMethod::Post, "/bookings"), 0);
}

#[tokio::test]
async fn test_failed_booking_keeps_draft() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Client);
    client.mock_response(
        HttpMethod::Get,
        "/user/practitioners",
        200,
        json!([practitioner_json(9, "Dr. Lin", "APPROVED", None)]),
    );
    client.mock_response(HttpMethod::Get, "/user/profile", 200, client_json(3));
    client.mock_response(HttpMethod::Post, "/bookings", 500, json!({"error": "db down"}));

    let data = load_marketplace(&api).await.unwrap();
    let mut state = MarketplaceState {
        practitioners: data.practitioners,
        profile: data.profile,
        ..Default::default()
    };
    let lin = state.practitioners[0].clone();
    state.open_booking(lin);
    book_session(&api, &mut state).await;

    assert_eq!(
        state.notice,
        Some(Notice::Error("Failed to book session. Please try again.".to_string()))
    );
    assert!(state.draft.is_some());
}

// =========================================================
// 仪表盘
// =========================================================

#[tokio::test]
async fn test_user_dashboard_load_and_profile_save() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Client);
    client.mock_response(HttpMethod::Get, "/user/profile", 200, client_json(3));
    client.mock_response(
        HttpMethod::Get,
        "/bookings/user/3",
        200,
        json!([{
            "id": 1,
            "userId": 3,
            "practitionerId": 9,
            "status": "CONFIRMED",
            "bookingDate": "2026-03-01T10:30:00"
        }]),
    );
    let many: Vec<_> = (1..=8)
        .map(|i| practitioner_json(i, "P", "APPROVED", None))
        .collect();
    client.mock_response(HttpMethod::Get, "/user/practitioners", 200, json!(many));

    let data = load_user_dashboard(&api).await.unwrap();
    assert_eq!(data.featured_practitioners().len(), 6);
    assert_eq!(
        data.next_session().map(|b| b.status),
        Some(BookingStatus::Confirmed)
    );

    let mut form = ProfileEditForm::from_profile(&data.profile);
    form.name = "Mira K".to_string();
    let mut renamed = client_json(3);
    renamed["name"] = json!("Mira K");
    client.mock_response(HttpMethod::Put, "/user/profile", 200, renamed);

    let (profile, notice) = save_profile(&api, &form, USER_PROFILE_MESSAGES)
        .await
        .unwrap();
    assert_eq!(profile.name, "Mira K");
    assert_eq!(notice.text(), "Profile updated successfully!");
    assert_eq!(api.session().display_name().as_deref(), Some("Mira K"));
}

#[tokio::test]
async fn test_profile_password_mismatch_sends_nothing() {
    let (api, client, _) = create_api();
    let form = ProfileEditForm {
        name: "Mira".to_string(),
        password: "one-password".to_string(),
        confirm_password: "another".to_string(),
        ..Default::default()
    };
    let err = save_profile(&api, &form, USER_PROFILE_MESSAGES)
        .await
        .unwrap_err();
    assert_eq!(err, Notice::Error("Passwords do not match!".to_string()));
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn test_practitioner_resubmission_reloads() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Provider);
    client.mock_response(
        HttpMethod::Get,
        "/user/profile",
        200,
        practitioner_json(7, "Asha", "REUPLOAD_REQUESTED", Some("Scan is blurry")),
    );
    client.mock_response(
        HttpMethod::Get,
        "/user/profile",
        200,
        practitioner_json(7, "Asha", "PENDING_ADMIN_APPROVAL", None),
    );
    client.mock_response(HttpMethod::Get, "/bookings/practitioner/7", 200, json!([]));
    client.mock_response(HttpMethod::Post, "/degree/upload", 200, json!({"message": "ok"}));

    let before = load_practitioner_dashboard(&api).await.unwrap();
    assert!(before.can_submit_document());
    assert_eq!(before.profile.visible_admin_comment(), Some("Scan is blurry"));

    let upload = DegreeUpload {
        file_name: "degree.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: vec![1, 2, 3],
    };
    let (after, notice) = resubmit_degree(&api, &ClientConfig::default(), &before.profile, upload)
        .await
        .unwrap();
    assert_eq!(after.status(), VerificationStatus::PendingAdminApproval);
    assert_eq!(notice.text(), "Degree uploaded successfully");
}

#[tokio::test]
async fn test_degree_page_rejects_non_pdf_locally() {
    let (api, client, _) = create_api();
    let profile: Profile =
        serde_json::from_value(practitioner_json(7, "Asha", "PENDING", None)).unwrap();
    let upload = DegreeUpload {
        file_name: "degree.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![1],
    };
    assert_eq!(
        submit_degree(&api, &ClientConfig::default(), &profile, upload)
            .await
            .unwrap_err(),
        "Only PDF files are allowed"
    );
    assert!(client.requests().is_empty());
}

// =========================================================
// 管理员审核
// =========================================================

#[tokio::test]
async fn test_reject_with_comment_refetches_lists() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Admin);
    client.mock_response(
        HttpMethod::Get,
        "/admin/users",
        200,
        json!([practitioner_json(7, "Asha", "PENDING_ADMIN_APPROVAL", None)]),
    );
    client.mock_response(
        HttpMethod::Get,
        "/admin/users",
        200,
        json!([practitioner_json(7, "Asha", "REJECTED", Some("Please resubmit"))]),
    );
    client.mock_response(HttpMethod::Get, "/admin/all-users", 200, json!([client_json(3)]));
    client.mock_response(HttpMethod::Put, "/admin/reject/7", 200, json!({"message": "rejected"}));

    let mut board = AdminBoard::default();
    board.apply_lists(load_admin_lists(&api).await.unwrap());
    assert_eq!(board.stats().pending_approval, 1);

    let asha = board.practitioners[0].clone();
    board.open_action(&asha, AdminAction::Reject);
    board.set_comment("Please resubmit".to_string());
    let pending = board.begin_action().unwrap();
    assert_eq!(board.processing, Some(7));
    assert!(board.begin_action().is_none());

    let result = run_admin_action(&api, &pending).await;
    board.finish_action(result);

    let reject = client
        .requests()
        .into_iter()
        .find(|r| r.url.ends_with("/admin/reject/7"))
        .unwrap();
    assert_eq!(
        reject.body,
        RequestBody::Json(r#"{"comment":"Please resubmit"}"#.to_string())
    );

    let row = board.practitioners.iter().find(|p| p.id == 7).unwrap();
    assert_eq!(row.verification_status, Some(VerificationStatus::Rejected));
    assert_eq!(row.admin_comment.as_deref(), Some("Please resubmit"));
    assert_eq!(board.processing, None);
    assert!(board.pending.is_none());
    assert_eq!(client.count(HttpMethod::Get, "/admin/users"), 2);
    assert_eq!(client.count(HttpMethod::Get, "/admin/all-users"), 2);
}

#[tokio::test]
async fn test_failed_action_keeps_lists() {
    let (api, client, _) = create_api();
    signed_in(&api, Role::Admin);
    client.mock_response(
        HttpMethod::Get,
        "/admin/users",
        200,
        json!([practitioner_json(7, "Asha", "PENDING_ADMIN_APPROVAL", None)]),
    );
    client.mock_response(HttpMethod::Get, "/admin/all-users", 200, json!([]));
    client.mock_response(
        HttpMethod::Put,
        "/admin/approve/7",
        500,
        json!({"error": "Document missing"}),
    );

    let mut board = AdminBoard::default();
    board.apply_lists(load_admin_lists(&api).await.unwrap());
    let asha = board.practitioners[0].clone();
    board.open_action(&asha, AdminAction::Approve);
    board.set_comment("ignored".to_string());
    let pending = board.begin_action().unwrap();
    assert_eq!(pending.comment, "");

    let result = run_admin_action(&api, &pending).await;
    board.finish_action(result);

    assert_eq!(board.error.as_deref(), Some("Document missing"));
    assert_eq!(
        board.practitioners[0].verification_status,
        Some(VerificationStatus::PendingAdminApproval)
    );
    assert_eq!(client.count(HttpMethod::Get, "/admin/users"), 1);
}
