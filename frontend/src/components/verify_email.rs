use crate::auth::{spawn_scoped, use_auth, use_task_scope};
use crate::components::icons::{CheckCircle, Mail, XCircle};
use crate::web::location::{hard_navigate, query_param};
use crate::web::router::Link;
use leptos::prelude::*;
use wellness_hub::AppRoute;
use wellness_hub::controllers::{VerifyEmailState, verify_email_link};

/// 邮件链接落地页 `/verify?token=`
#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let ctx = use_auth();
    let scope = use_task_scope();
    let state = RwSignal::new(VerifyEmailState::Loading);

    let token = query_param("token");
    let api = ctx.api.clone();
    spawn_scoped(
        &scope,
        async move { verify_email_link(&api, token.as_deref()).await },
        move |result| state.set(result),
    );

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <div class="card-body items-center text-center gap-4">
                    {move || match state.get() {
                        VerifyEmailState::Loading => {
                            view! {
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                                <p>"Verifying your email..."</p>
                            }
                                .into_any()
                        }
                        VerifyEmailState::Success => {
                            view! {
                                <CheckCircle attr:class="h-12 w-12 text-success" />
                                <h1 class="text-2xl font-bold">"Email Verified!"</h1>
                                <p class="text-base-content/70">"You can now sign in to your account."</p>
                                <Link to="/login" class="btn btn-primary">
                                    "Go to Login"
                                </Link>
                            }
                                .into_any()
                        }
                        VerifyEmailState::Error => {
                            view! {
                                <XCircle attr:class="h-12 w-12 text-error" />
                                <h1 class="text-2xl font-bold">"Verification Failed"</h1>
                                <p class="text-base-content/70">
                                    "The link is invalid or has expired."
                                </p>
                                <Link to="/register" class="btn btn-outline">
                                    "Back to Register"
                                </Link>
                            }
                                .into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

/// 注册后的提示页
#[component]
pub fn VerificationSentPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <div class="card-body items-center text-center gap-4">
                    <Mail attr:class="h-12 w-12 text-primary" />
                    <h1 class="text-2xl font-bold">"Check Your Inbox"</h1>
                    <p class="text-base-content/70">
                        "We've sent a verification link to your email address. Click it to activate your account."
                    </p>
                    <button
                        class="btn btn-primary"
                        on:click=|_| hard_navigate(AppRoute::Login.to_path())
                    >
                        "Back to Login"
                    </button>
                </div>
            </div>
        </div>
    }
}
