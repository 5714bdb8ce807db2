use crate::auth::{flash, spawn_scoped, use_auth, use_task_scope};
use crate::components::icons::{Mail, ShieldCheck};
use crate::components::shell::ErrorBanner;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use wellness_hub::AppRoute;
use wellness_hub::controllers::{
    LoginOutcome, PASSWORD_RESET_NOTICE_MILLIS, request_password_reset, submit_login,
};
use wellness_hub::forms::LoginForm;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let scope = use_task_scope();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 忘记密码子表单
    let (show_forgot, set_show_forgot) = signal(false);
    let (forgot_email, set_forgot_email) = signal(String::new());
    let (forgot_sending, set_forgot_sending) = signal(false);
    let forgot_notice = RwSignal::new(Option::<String>::None);
    let (forgot_error, set_forgot_error) = signal(Option::<String>::None);

    let on_submit = {
        let ctx = ctx.clone();
        let scope = scope.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if is_submitting.get_untracked() {
                return;
            }
            let form = LoginForm {
                email: email.get_untracked(),
                password: password.get_untracked(),
            };
            set_is_submitting.set(true);
            set_error_msg.set(None);

            let ctx = ctx.clone();
            let api = ctx.api.clone();
            spawn_scoped(
                &scope,
                async move { submit_login(&api, &form).await },
                move |result| {
                    set_is_submitting.set(false);
                    ctx.refresh();
                    match result {
                        Ok(LoginOutcome::VerifyOtp { email }) => {
                            ctx.pending_email.set(Some(email));
                            router.navigate_to(AppRoute::OtpVerification);
                        }
                        Ok(LoginOutcome::Dashboard(home)) => {
                            let role = ctx.store().role();
                            let target = match role {
                                Some(role) => {
                                    AppRoute::after_login(role, router.take_return_to().as_deref())
                                }
                                None => home.to_path().to_string(),
                            };
                            router.navigate(&target);
                        }
                        Err(message) => set_error_msg.set(Some(message)),
                    }
                },
            );
        }
    };

    let on_forgot = {
        let ctx = ctx.clone();
        let scope = scope.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let address = forgot_email.get_untracked();
            set_forgot_sending.set(true);
            set_forgot_error.set(None);

            let api = ctx.api.clone();
            let flash_scope = scope.clone();
            spawn_scoped(
                &scope,
                async move { request_password_reset(&api, &address).await },
                move |result| {
                    set_forgot_sending.set(false);
                    match result {
                        Ok(Some(message)) => {
                            set_show_forgot.set(false);
                            set_forgot_email.set(String::new());
                            flash(
                                &flash_scope,
                                forgot_notice,
                                message.to_string(),
                                PASSWORD_RESET_NOTICE_MILLIS,
                            );
                        }
                        Ok(None) => {}
                        Err(message) => set_forgot_error.set(Some(message)),
                    }
                },
            );
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Welcome Back"</h1>
                        <p class="text-base-content/70">"Sign in to continue your wellness journey"</p>
                    </div>
                </div>

                {move || {
                    forgot_notice
                        .get()
                        .map(|text| {
                            view! {
                                <div role="alert" class="alert alert-success text-sm py-2 w-full">
                                    <span>{text}</span>
                                </div>
                            }
                        })
                }}

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show
                        when=move || show_forgot.get()
                        fallback=move || {
                            view! {
                                <form class="card-body" on:submit=on_submit.clone()>
                                    <ErrorBanner message=error_msg />
                                    <div class="form-control">
                                        <label class="label" for="email">
                                            <span class="label-text">"Email"</span>
                                        </label>
                                        <input
                                            id="email"
                                            type="email"
                                            placeholder="you@example.com"
                                            on:input=move |ev| set_email.set(event_target_value(&ev))
                                            prop:value=email
                                            class="input input-bordered"
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="password">
                                            <span class="label-text">"Password"</span>
                                        </label>
                                        <input
                                            id="password"
                                            type="password"
                                            placeholder="••••••••"
                                            on:input=move |ev| set_password.set(event_target_value(&ev))
                                            prop:value=password
                                            class="input input-bordered"
                                        />
                                        <label class="label">
                                            <a
                                                class="label-text-alt link link-hover"
                                                on:click=move |_| set_show_forgot.set(true)
                                            >
                                                "Forgot password?"
                                            </a>
                                        </label>
                                    </div>
                                    <div class="form-control mt-6">
                                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                            {move || {
                                                if is_submitting.get() {
                                                    view! {
                                                        <span class="loading loading-spinner"></span>
                                                        "Signing in..."
                                                    }
                                                        .into_any()
                                                } else {
                                                    "Sign In".into_any()
                                                }
                                            }}
                                        </button>
                                    </div>
                                    <p class="text-center text-sm mt-2">
                                        "New here? "
                                        <Link to="/register" class="link link-primary">
                                            "Create an account"
                                        </Link>
                                    </p>
                                </form>
                            }
                        }
                    >
                        <form class="card-body" on:submit=on_forgot.clone()>
                            <h2 class="card-title gap-2">
                                <Mail attr:class="h-5 w-5" />
                                "Reset Password"
                            </h2>
                            <p class="text-sm text-base-content/70">
                                "We'll email you a temporary password."
                            </p>
                            <ErrorBanner message=forgot_error />
                            <input
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_forgot_email.set(event_target_value(&ev))
                                prop:value=forgot_email
                                class="input input-bordered"
                            />
                            <div class="flex gap-2 mt-4">
                                <button
                                    type="button"
                                    class="btn btn-ghost flex-1"
                                    on:click=move |_| set_show_forgot.set(false)
                                >
                                    "Back"
                                </button>
                                <button class="btn btn-primary flex-1" disabled=move || forgot_sending.get()>
                                    "Send"
                                </button>
                            </div>
                        </form>
                    </Show>
                </div>
            </div>
        </div>
    }
}
