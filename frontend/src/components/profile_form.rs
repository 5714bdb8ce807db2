use crate::auth::{flash, spawn_scoped, use_auth, use_task_scope};
use leptos::prelude::*;
use wellness_hub::controllers::{Notice, PROFILE_NOTICE_MILLIS, ProfileMessages, save_profile};
use wellness_hub::forms::ProfileEditForm;
use wellness_shared::{Profile, SPECIALIZATIONS};

fn input_row(
    form: RwSignal<ProfileEditForm>,
    label: &'static str,
    input_type: &'static str,
    get: fn(&ProfileEditForm) -> String,
    set: fn(&mut ProfileEditForm, String),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type=input_type
                class="input input-bordered"
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </div>
    }
}

/// 资料编辑卡片（患者与执业者共用）
///
/// 密码留空表示不修改。保存成功后把新资料交给 `on_saved`。
#[component]
pub fn ProfileForm(
    profile: Profile,
    messages: ProfileMessages,
    on_saved: Callback<Profile>,
    /// 执业者可以修改执业方向
    #[prop(optional)]
    with_specialization: bool,
) -> impl IntoView {
    let ctx = use_auth();
    let scope = use_task_scope();

    let form = RwSignal::new(ProfileEditForm::from_profile(&profile));
    let notice = RwSignal::new(Option::<Notice>::None);
    let (saving, set_saving) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let snapshot = form.get_untracked();
        set_saving.set(true);

        let ctx = ctx.clone();
        let api = ctx.api.clone();
        let flash_scope = scope.clone();
        spawn_scoped(
            &scope,
            async move { save_profile(&api, &snapshot, messages).await },
            move |result| {
                set_saving.set(false);
                let message = match result {
                    Ok((saved, message)) => {
                        form.set(ProfileEditForm::from_profile(&saved));
                        ctx.refresh();
                        on_saved.run(saved);
                        message
                    }
                    Err(message) => message,
                };
                form.update(ProfileEditForm::clear_passwords);
                flash(&flash_scope, notice, message, PROFILE_NOTICE_MILLIS);
            },
        );
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body gap-2" on:submit=on_submit>
                <h3 class="card-title">"Edit Profile"</h3>

                {move || {
                    notice
                        .get()
                        .map(|n| {
                            let class = if n.is_error() {
                                "alert alert-error text-sm py-2"
                            } else {
                                "alert alert-success text-sm py-2"
                            };
                            view! {
                                <div role="alert" class=class>
                                    <span>{n.text().to_string()}</span>
                                </div>
                            }
                        })
                }}

                {input_row(form, "Full Name", "text", |f| f.name.clone(), |f, v| f.name = v)}
                <div class="form-control">
                    <label class="label">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input type="email" class="input input-bordered" value=profile.email disabled />
                </div>
                <div class="grid md:grid-cols-2 gap-3">
                    {input_row(form, "City", "text", |f| f.city.clone(), |f, v| f.city = v)}
                    {input_row(form, "Country", "text", |f| f.country.clone(), |f, v| f.country = v)}
                </div>

                <Show when=move || with_specialization>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Specialization"</span>
                        </label>
                        <select
                            class="select select-bordered"
                            prop:value=move || form.with(|f| f.specialization.clone())
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.specialization = value);
                            }
                        >
                            <option value="">"Select your specialization"</option>
                            {SPECIALIZATIONS
                                .iter()
                                .map(|s| view! { <option value=*s>{*s}</option> })
                                .collect_view()}
                        </select>
                    </div>
                </Show>

                <div class="divider">"Change Password"</div>
                <div class="grid md:grid-cols-2 gap-3">
                    {input_row(
                        form,
                        "New Password",
                        "password",
                        |f| f.password.clone(),
                        |f, v| f.password = v,
                    )}
                    {input_row(
                        form,
                        "Confirm Password",
                        "password",
                        |f| f.confirm_password.clone(),
                        |f, v| f.confirm_password = v,
                    )}
                </div>

                <div class="card-actions justify-end mt-4">
                    <button class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
