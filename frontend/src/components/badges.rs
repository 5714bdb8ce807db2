//! 状态徽章
//!
//! 对状态枚举做穷尽匹配，没有兜底分支。

use crate::components::icons::{Activity, CheckCircle, Refresh, XCircle};
use leptos::prelude::*;
use wellness_shared::{BookingStatus, VerificationStatus};

fn verification_class(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Pending => "badge badge-ghost gap-1",
        VerificationStatus::PendingAdminApproval => "badge badge-warning gap-1",
        VerificationStatus::Approved => "badge badge-success gap-1",
        VerificationStatus::Rejected => "badge badge-error gap-1",
        VerificationStatus::ReuploadRequested => "badge badge-accent gap-1",
    }
}

fn verification_icon(status: VerificationStatus) -> AnyView {
    match status {
        VerificationStatus::Pending | VerificationStatus::PendingAdminApproval => {
            view! { <Activity attr:class="h-3 w-3" /> }.into_any()
        }
        VerificationStatus::Approved => view! { <CheckCircle attr:class="h-3 w-3" /> }.into_any(),
        VerificationStatus::Rejected => view! { <XCircle attr:class="h-3 w-3" /> }.into_any(),
        VerificationStatus::ReuploadRequested => {
            view! { <Refresh attr:class="h-3 w-3" /> }.into_any()
        }
    }
}

/// 列表中的短徽章
#[component]
pub fn VerificationBadge(status: VerificationStatus) -> impl IntoView {
    view! {
        <span class=verification_class(status)>
            {verification_icon(status)}
            {status.label()}
        </span>
    }
}

/// 执业者自己看到的大号徽章
#[component]
pub fn VerificationHeadline(status: VerificationStatus) -> impl IntoView {
    view! {
        <span class=format!("{} badge-lg p-4 font-bold", verification_class(status))>
            {verification_icon(status)}
            {status.headline()}
        </span>
    }
}

#[component]
pub fn BookingBadge(status: BookingStatus) -> impl IntoView {
    let class = match status {
        BookingStatus::Pending => "badge badge-warning",
        BookingStatus::Confirmed => "badge badge-success",
        BookingStatus::Cancelled => "badge badge-error",
    };
    view! { <span class=class>{status.as_str()}</span> }
}
