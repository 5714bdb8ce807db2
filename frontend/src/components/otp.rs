use crate::auth::{spawn_scoped, use_auth, use_task_scope};
use crate::components::icons::Mail;
use crate::components::shell::ErrorBanner;
use crate::web::router::use_router;
use gloo_timers::future::TimeoutFuture;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wellness_hub::AppRoute;
use wellness_hub::controllers::{otp_email, resend_otp, submit_otp};
use wellness_hub::otp::{Countdown, OTP_LENGTH, OtpInput};

#[component]
pub fn OtpVerificationPage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let scope = use_task_scope();

    let email = otp_email(ctx.pending_email.get_untracked(), ctx.store());

    // 没有邮箱无从验证，回到注册页
    let missing = email.is_none();
    Effect::new(move |_| {
        if missing {
            router.navigate_to(AppRoute::Register);
        }
    });
    let email = email.unwrap_or_default();

    let otp = RwSignal::new(OtpInput::new());
    let countdown = RwSignal::new(Countdown::new(ctx.config.otp_countdown_secs));
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (info_msg, set_info_msg) = signal(Option::<String>::None);
    let (is_verifying, set_is_verifying) = signal(false);
    let (is_resending, set_is_resending) = signal(false);
    let refs: [NodeRef<html::Input>; OTP_LENGTH] = std::array::from_fn(|_| NodeRef::new());

    // 每秒走一次，归零或页面卸载时停止；重发成功后重新启动
    let start_countdown = {
        let scope = scope.clone();
        move || {
            if countdown.with_untracked(Countdown::can_resend) {
                return;
            }
            let scope = scope.clone();
            spawn_local(async move {
                while scope.run(TimeoutFuture::new(1000)).await.is_some() {
                    if !countdown.try_update(Countdown::tick).unwrap_or(false) {
                        break;
                    }
                }
            });
        }
    };
    start_countdown();

    let move_focus = move || {
        let index = otp.with_untracked(OtpInput::focus);
        if let Some(el) = refs[index].get_untracked() {
            let _ = el.focus();
        }
    };

    let on_verify = {
        let ctx = ctx.clone();
        let scope = scope.clone();
        let email = email.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if is_verifying.get_untracked() {
                return;
            }
            let input = otp.get_untracked();
            if let Err(e) = input.code() {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
            set_is_verifying.set(true);
            set_error_msg.set(None);

            let ctx = ctx.clone();
            let api = ctx.api.clone();
            let email = email.clone();
            spawn_scoped(
                &scope,
                async move { submit_otp(&api, &email, &input).await },
                move |result| {
                    set_is_verifying.set(false);
                    match result {
                        Ok(home) => {
                            ctx.pending_email.set(None);
                            ctx.refresh();
                            router.navigate_to(home);
                        }
                        Err(message) => set_error_msg.set(Some(message)),
                    }
                },
            );
        }
    };

    let on_resend = {
        let email = email.clone();
        move |_| {
            if !countdown.with_untracked(Countdown::can_resend) || is_resending.get_untracked() {
                return;
            }
            set_is_resending.set(true);
            set_error_msg.set(None);
            set_info_msg.set(None);

            let api = ctx.api.clone();
            let email = email.clone();
            let start_countdown = start_countdown.clone();
            spawn_scoped(
                &scope,
                async move { resend_otp(&api, &email).await },
                move |result| {
                    set_is_resending.set(false);
                    match result {
                        Ok(()) => {
                            countdown.update(Countdown::reset);
                            start_countdown();
                            otp.update(OtpInput::clear);
                            set_info_msg.set(Some("A new code has been sent.".to_string()));
                            move_focus();
                        }
                        Err(message) => set_error_msg.set(Some(message)),
                    }
                },
            );
        }
    };

    let boxes = (0..OTP_LENGTH)
        .map(|index| {
            view! {
                <input
                    node_ref=refs[index]
                    type="text"
                    inputmode="numeric"
                    maxlength="2"
                    class="input input-bordered w-12 h-14 text-center text-2xl font-bold"
                    prop:value=move || otp.with(|o| o.digit(index).map(String::from).unwrap_or_default())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        otp.update(|o| o.input(index, &value));
                        move_focus();
                    }
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Backspace" {
                            otp.update(|o| o.backspace(index));
                            move_focus();
                        }
                    }
                />
            }
        })
        .collect_view();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="card w-full shadow-2xl bg-base-100">
                    <form class="card-body items-center text-center" on:submit=on_verify>
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Mail attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-2xl font-bold">"Verify Your Email"</h1>
                        <p class="text-base-content/70">
                            "Enter the 6-digit code we sent to " <span class="font-semibold">{email}</span>
                        </p>

                        <ErrorBanner message=error_msg />
                        {move || {
                            info_msg
                                .get()
                                .map(|text| {
                                    view! {
                                        <div role="status" class="alert alert-success text-sm py-2">
                                            <span>{text}</span>
                                        </div>
                                    }
                                })
                        }}

                        <div class="flex gap-2 my-4">{boxes}</div>

                        <button
                            class="btn btn-primary w-full"
                            disabled=move || is_verifying.get()
                        >
                            {move || if is_verifying.get() { "Verifying..." } else { "Verify" }}
                        </button>

                        <button
                            type="button"
                            class="btn btn-link"
                            disabled=move || !countdown.with(Countdown::can_resend) || is_resending.get()
                            on:click=on_resend
                        >
                            {move || {
                                let remaining = countdown.with(Countdown::remaining);
                                if remaining > 0 {
                                    format!("Resend code in {}s", remaining)
                                } else {
                                    "Resend code".to_string()
                                }
                            }}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
