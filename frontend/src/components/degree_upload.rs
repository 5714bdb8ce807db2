use crate::auth::{spawn_scoped, use_auth, use_task_scope};
use crate::components::icons::{FileText, Upload};
use crate::components::shell::{ErrorBanner, PageSpinner};
use crate::web::file::{read_upload, selected_file};
use crate::web::router::use_router;
use leptos::prelude::*;
use wellness_hub::DegreeUpload;
use wellness_hub::controllers::submit_degree;
use wellness_hub::forms::validate_degree_file;
use wellness_shared::Profile;

/// PDF 选择框
///
/// 选中文件后先在本地检查类型与大小，通过后读入内存交给 `on_pick`；
/// 检查失败时把错误交给 `on_error`。
#[component]
pub fn DegreeFilePicker(
    on_pick: Callback<DegreeUpload>,
    on_error: Callback<String>,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let ctx = use_auth();
    let scope = use_task_scope();
    let max_bytes = ctx.config.max_degree_bytes;

    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = selected_file(&input) else {
            return;
        };
        if let Err(e) = validate_degree_file(&file.type_(), file.size() as u64, max_bytes) {
            input.set_value("");
            on_error.run(e.to_string());
            return;
        }
        spawn_scoped(
            &scope,
            async move { read_upload(&file).await },
            move |result| match result {
                Ok(upload) => on_pick.run(upload),
                Err(message) => on_error.run(message),
            },
        );
    };

    view! {
        <input
            type="file"
            accept="application/pdf"
            class="file-input file-input-bordered file-input-primary w-full"
            disabled=move || disabled.get()
            on:change=on_change
        />
    }
}

/// 执业者注册后的资质上传页
#[component]
pub fn DegreeUploadPage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let scope = use_task_scope();

    let profile = RwSignal::new(Option::<Profile>::None);
    let (loading, set_loading) = signal(true);
    let upload = RwSignal::new(Option::<DegreeUpload>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (is_uploading, set_is_uploading) = signal(false);

    {
        let api = ctx.api.clone();
        spawn_scoped(
            &scope,
            async move { api.get_profile().await },
            move |result| {
                set_loading.set(false);
                match result {
                    Ok(p) => profile.set(Some(p)),
                    Err(e) => set_error_msg.set(Some(e.user_message("Failed to load profile"))),
                }
            },
        );
    }

    let on_pick = Callback::new(move |picked: DegreeUpload| {
        set_error_msg.set(None);
        upload.set(Some(picked));
    });
    let on_error = Callback::new(move |message: String| {
        upload.set(None);
        set_error_msg.set(Some(message));
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_uploading.get_untracked() {
            return;
        }
        let Some(file) = upload.get_untracked() else {
            set_error_msg.set(Some("Please select a file".to_string()));
            return;
        };
        let Some(owner) = profile.get_untracked() else {
            return;
        };
        set_is_uploading.set(true);
        set_error_msg.set(None);

        let api = ctx.api.clone();
        let config = ctx.config.clone();
        spawn_scoped(
            &scope,
            async move { submit_degree(&api, &config, &owner, file).await },
            move |result| {
                set_is_uploading.set(false);
                match result {
                    Ok(next) => router.navigate_to(next),
                    Err(message) => set_error_msg.set(Some(message)),
                }
            },
        );
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <Show when=move || !loading.get() fallback=|| view! { <PageSpinner /> }>
                    <div class="card w-full shadow-2xl bg-base-100">
                        <form class="card-body gap-4" on:submit=on_submit.clone()>
                            <div class="flex items-center gap-3">
                                <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                    <FileText attr:class="h-8 w-8" />
                                </div>
                                <div>
                                    <h1 class="text-2xl font-bold">"Upload Your Degree"</h1>
                                    <p class="text-sm text-base-content/70">
                                        {move || {
                                            profile
                                                .get()
                                                .map(|p| {
                                                    format!(
                                                        "Hi {}, we need your credentials before you go live.",
                                                        p.name
                                                    )
                                                })
                                                .unwrap_or_default()
                                        }}
                                    </p>
                                </div>
                            </div>

                            <ErrorBanner message=error_msg />

                            <DegreeFilePicker on_pick=on_pick on_error=on_error disabled=is_uploading />
                            <p class="text-xs text-base-content/60">"PDF only, up to 5MB."</p>
                            {move || {
                                upload
                                    .get()
                                    .map(|u| {
                                        view! {
                                            <div class="badge badge-outline gap-2 p-3">
                                                <FileText attr:class="h-4 w-4" />
                                                {u.file_name}
                                            </div>
                                        }
                                    })
                            }}

                            <button
                                class="btn btn-primary gap-2"
                                disabled=move || is_uploading.get() || profile.get().is_none()
                            >
                                <Upload attr:class="h-4 w-4" />
                                {move || if is_uploading.get() { "Uploading..." } else { "Submit for Review" }}
                            </button>
                        </form>
                    </div>
                </Show>
            </div>
        </div>
    }
}
