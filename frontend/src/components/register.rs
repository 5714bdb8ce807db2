use crate::auth::{spawn_scoped, use_auth, use_task_scope};
use crate::components::icons::{Sparkles, UserIcon};
use crate::components::shell::ErrorBanner;
use crate::web::location::query_param;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use wellness_hub::AppRoute;
use wellness_hub::controllers::{RegisterFailure, submit_registration};
use wellness_hub::forms::{FieldErrors, RegisterField, RegisterForm, RegistrationRole};
use wellness_shared::SPECIALIZATIONS;

/// 带错误提示的单行输入框；编辑时清除该字段的错误
fn text_field(
    form: RwSignal<RegisterForm>,
    errors: RwSignal<FieldErrors>,
    field: RegisterField,
    label: &'static str,
    input_type: &'static str,
    get: fn(&RegisterForm) -> String,
    set: fn(&mut RegisterForm, String),
) -> impl IntoView {
    let error = move || errors.with(|e| e.get(field).map(str::to_string));
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type=input_type
                class=move || {
                    if error().is_some() {
                        "input input-bordered input-error"
                    } else {
                        "input input-bordered"
                    }
                }
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                    errors.update(|e| e.clear(field));
                }
            />
            {move || {
                error()
                    .map(|text| {
                        view! {
                            <label class="label">
                                <span class="label-text-alt text-error">{text}</span>
                            </label>
                        }
                    })
            }}
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let scope = use_task_scope();

    let initial_role = RegistrationRole::from_query(query_param("role").as_deref());
    let form = RwSignal::new(RegisterForm {
        role: initial_role,
        ..Default::default()
    });
    let errors = RwSignal::new(FieldErrors::new());
    let (server_error, set_server_error) = signal(Option::<String>::None);
    let (is_submitting, set_is_submitting) = signal(false);

    let is_practitioner = move || form.with(|f| f.role == RegistrationRole::Practitioner);

    let select_role = move |role: RegistrationRole| {
        form.update(|f| f.role = role);
        errors.update(|e| e.clear(RegisterField::Specialization));
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        let snapshot = form.get_untracked();
        let validation = snapshot.validate();
        if !validation.is_empty() {
            errors.set(validation);
            return;
        }
        set_is_submitting.set(true);
        set_server_error.set(None);

        let ctx = ctx.clone();
        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { submit_registration(&api, &snapshot).await },
            move |result| {
                set_is_submitting.set(false);
                match result {
                    Ok(email) => {
                        ctx.refresh();
                        ctx.pending_email.set(Some(email));
                        router.navigate_to(AppRoute::OtpVerification);
                    }
                    Err(RegisterFailure::Fields(fields)) => errors.set(fields),
                    Err(RegisterFailure::Server(message)) => set_server_error.set(Some(message)),
                }
            },
        );
    };

    let role_tab = move |role: RegistrationRole| {
        view! {
            <a
                role="tab"
                class=move || if form.with(|f| f.role == role) { "tab tab-active" } else { "tab" }
                on:click=move |_| select_role(role)
            >
                {role.label()}
            </a>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4 flex flex-col items-center gap-2">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <Sparkles attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"Create Your Account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div role="tablist" class="tabs tabs-boxed mb-2">
                            {role_tab(RegistrationRole::Patient)}
                            {role_tab(RegistrationRole::Practitioner)}
                        </div>

                        <ErrorBanner message=server_error />

                        {text_field(
                            form,
                            errors,
                            RegisterField::Name,
                            "Full Name",
                            "text",
                            |f| f.name.clone(),
                            |f, v| f.name = v,
                        )}
                        {text_field(
                            form,
                            errors,
                            RegisterField::Email,
                            "Email",
                            "email",
                            |f| f.email.clone(),
                            |f, v| f.email = v,
                        )}
                        <div class="grid grid-cols-2 gap-3">
                            {text_field(
                                form,
                                errors,
                                RegisterField::Password,
                                "Password",
                                "password",
                                |f| f.password.clone(),
                                |f, v| f.password = v,
                            )}
                            {text_field(
                                form,
                                errors,
                                RegisterField::ConfirmPassword,
                                "Confirm Password",
                                "password",
                                |f| f.confirm_password.clone(),
                                |f, v| f.confirm_password = v,
                            )}
                        </div>

                        <Show when=is_practitioner>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Specialization"</span>
                                </label>
                                <select
                                    class=move || {
                                        if errors.with(|e| e.get(RegisterField::Specialization).is_some()) {
                                            "select select-bordered select-error"
                                        } else {
                                            "select select-bordered"
                                        }
                                    }
                                    prop:value=move || form.with(|f| f.specialization.clone())
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        form.update(|f| f.specialization = value);
                                        errors.update(|e| e.clear(RegisterField::Specialization));
                                    }
                                >
                                    <option value="">"Select your specialization"</option>
                                    {SPECIALIZATIONS
                                        .iter()
                                        .map(|s| view! { <option value=*s>{*s}</option> })
                                        .collect_view()}
                                </select>
                                {move || {
                                    errors
                                        .with(|e| e.get(RegisterField::Specialization).map(str::to_string))
                                        .map(|text| {
                                            view! {
                                                <label class="label">
                                                    <span class="label-text-alt text-error">{text}</span>
                                                </label>
                                            }
                                        })
                                }}
                            </div>
                        </Show>

                        <div class="grid grid-cols-2 gap-3">
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"City"</span>
                                </label>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=move || form.with(|f| f.city.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        form.update(|f| f.city = value);
                                    }
                                />
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Country"</span>
                                </label>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=move || form.with(|f| f.country.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        form.update(|f| f.country = value);
                                    }
                                />
                            </div>
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary gap-2" disabled=move || is_submitting.get()>
                                <UserIcon attr:class="h-4 w-4" />
                                {move || {
                                    if is_submitting.get() {
                                        "Creating account...".to_string()
                                    } else {
                                        format!("Register as {}", form.with(|f| f.role.label()))
                                    }
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link to="/login" class="link link-primary">
                                "Sign in"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
