//! 个人资料页：查看资料、修改密码、删除账户、检查图床预设

use leptos::prelude::*;
use leptos::task::spawn_local;
use nestmatch::upload::PresetReport;
use nestmatch_shared::UserProfile;

use crate::auth::{delete_account, use_auth};
use crate::components::common::{Notice, NoticeBar, Page};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();

    let (notice, set_notice) = signal(Notice::None);
    let (current_pass, set_current_pass) = signal(String::new());
    let (new_pass, set_new_pass) = signal(String::new());
    let (delete_pass, set_delete_pass) = signal(String::new());
    let (preset_report, set_preset_report) = signal(Option::<PresetReport>::None);
    let (checking, set_checking) = signal(false);

    // 资料字段：缺失时显示占位
    let row = move |label: &'static str, read: fn(&UserProfile) -> Option<String>| {
        let value = move || {
            auth.user()
                .as_ref()
                .and_then(read)
                .unwrap_or_else(|| "-".to_string())
        };
        view! {
            <tr>
                <th>{label}</th>
                <td>{value}</td>
            </tr>
        }
    };

    let on_change_password = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (current, new) = (current_pass.get(), new_pass.get());
        if current.is_empty() || new.is_empty() {
            set_notice.set(Some(("Please fill in both password fields".to_string(), true)));
            return;
        }
        spawn_local(async move {
            let result = auth
                .dispatcher()
                .accounts()
                .change_password(&current, &new)
                .await;
            match result {
                Ok(_) => {
                    set_current_pass.set(String::new());
                    set_new_pass.set(String::new());
                    set_notice.set(Some(("Password updated".to_string(), false)));
                }
                Err(e) => set_notice.set(Some((e.to_string(), true))),
            }
        });
    };

    let on_delete = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let password = delete_pass.get();
        if password.is_empty() {
            set_notice.set(Some(("Enter your password to confirm".to_string(), true)));
            return;
        }
        spawn_local(async move {
            // 成功后会话被清空，路由服务会自动跳回登录页
            if let Err(e) = delete_account(auth, password).await {
                set_notice.set(Some((e.to_string(), true)));
            }
        });
    };

    let on_check_presets = move |_| {
        set_checking.set(true);
        spawn_local(async move {
            let report = auth.uploader().check_presets().await;
            set_preset_report.set(Some(report));
            set_checking.set(false);
        });
    };

    let report_rows = move || {
        preset_report.get().map(|report| {
            report
                .attempts
                .into_iter()
                .map(|attempt| {
                    let preset = attempt
                        .preset
                        .unwrap_or_else(|| "(account default)".to_string());
                    let (tone, outcome) = match attempt.outcome {
                        Ok(_) => ("text-success", "Works".to_string()),
                        Err(reason) => ("text-error", reason),
                    };
                    view! {
                        <tr>
                            <th>{preset}</th>
                            <td class=tone>{outcome}</td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <Page title="Profile">
            <NoticeBar notice=notice />

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <table class="table">
                        <tbody>
                            {row("Username", |u| u.username.clone())}
                            {row("Email", |u| u.email_address.clone())}
                            {row("Age", |u| u.age.map(|a| a.to_string()))}
                            {row("Gender", |u| u.gender.clone())}
                            {row("Affiliation", |u| u.affiliation.clone())}
                        </tbody>
                    </table>
                </div>
            </div>

            <form class="card bg-base-100 shadow" on:submit=on_change_password>
                <div class="card-body gap-3">
                    <h2 class="card-title">"Change password"</h2>
                    <input
                        type="password"
                        placeholder="Current password"
                        class="input input-bordered"
                        on:input=move |ev| set_current_pass.set(event_target_value(&ev))
                        prop:value=current_pass
                    />
                    <input
                        type="password"
                        placeholder="New password"
                        class="input input-bordered"
                        on:input=move |ev| set_new_pass.set(event_target_value(&ev))
                        prop:value=new_pass
                    />
                    <div class="card-actions justify-end">
                        <button class="btn btn-primary">"Update password"</button>
                    </div>
                </div>
            </form>

            <form class="card bg-base-100 shadow border border-error" on:submit=on_delete>
                <div class="card-body gap-3">
                    <h2 class="card-title text-error">"Delete account"</h2>
                    <p class="text-sm">"This permanently removes your account and postings."</p>
                    <input
                        type="password"
                        placeholder="Password"
                        class="input input-bordered"
                        on:input=move |ev| set_delete_pass.set(event_target_value(&ev))
                        prop:value=delete_pass
                    />
                    <div class="card-actions justify-end">
                        <button class="btn btn-error">"Delete my account"</button>
                    </div>
                </div>
            </form>
            <div class="card bg-base-100 shadow">
                <div class="card-body gap-3">
                    <h2 class="card-title">"Image service"</h2>
                    <p class="text-sm">"Send a test image through every configured upload preset."</p>
                    <table class="table table-sm">
                        <tbody>{report_rows}</tbody>
                    </table>
                    <div class="card-actions justify-end">
                        <button class="btn btn-outline" on:click=on_check_presets disabled=move || checking.get()>
                            {move || if checking.get() { "Checking..." } else { "Check upload presets" }}
                        </button>
                    </div>
                </div>
            </div>
        </Page>
    }
}
