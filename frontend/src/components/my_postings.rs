use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::auth::use_auth;
use crate::components::common::{Notice, NoticeBar, Page, record_id, records, text};

/// 当前用户发布的室友帖子
#[component]
pub fn MyPostingsPage() -> impl IntoView {
    let auth = use_auth();

    let (postings, set_postings) = signal(Vec::<Value>::new());
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Notice::None);

    Effect::new(move |_| {
        let Some(user) = auth.user_id() else {
            set_loading.set(false);
            return;
        };
        spawn_local(async move {
            match auth.dispatcher().roommates().get_by_poster(&user).await {
                // 单条帖子直接以对象返回
                Ok(data @ Value::Object(_)) if record_id(&data).is_some() => {
                    set_postings.set(vec![data])
                }
                Ok(data) => set_postings.set(records(&data)),
                Err(e) => set_notice.set(Some((
                    format!("Failed to load your postings: {}", e),
                    true,
                ))),
            }
            set_loading.set(false);
        });
    });

    let delete = move |id: String| {
        spawn_local(async move {
            match auth.dispatcher().roommates().delete(&id).await {
                Ok(_) => {
                    set_postings.update(|list| {
                        list.retain(|p| record_id(p).as_deref() != Some(id.as_str()))
                    });
                    set_notice.set(Some(("Posting deleted".to_string(), false)));
                }
                Err(e) => set_notice.set(Some((format!("Could not delete posting: {}", e), true))),
            }
        });
    };

    view! {
        <Page title="My Postings">
            <NoticeBar notice=notice />
            <Show
                when=move || !loading.get()
                fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
            >
                <Show when=move || !postings.with(Vec::is_empty) fallback=|| view! { <p>"You have no postings."</p> }>
                    <For
                        each=move || postings.get()
                        key=|posting| record_id(posting).unwrap_or_else(|| posting.to_string())
                        children=move |posting| {
                            let id = record_id(&posting).unwrap_or_default();
                            view! {
                                <div class="card bg-base-100 shadow">
                                    <div class="card-body">
                                        <h2 class="card-title">{text(&posting, "city")}</h2>
                                        <p>{text(&posting, "description")}</p>
                                        <p class="text-sm text-base-content/70">
                                            {format!("{} to {}", text(&posting, "startDate"), text(&posting, "endDate"))}
                                        </p>
                                        <div class="card-actions justify-end">
                                            <button class="btn btn-sm btn-error" on:click=move |_| delete(id.clone())>
                                                "Delete"
                                            </button>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </Show>
            </Show>
        </Page>
    }
}
