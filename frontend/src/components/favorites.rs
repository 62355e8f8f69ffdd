use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::auth::use_auth;
use crate::components::common::{Notice, NoticeBar, Page, records, text};

/// 收藏记录中的房源 ID
fn saved_item(record: &Value) -> String {
    match record {
        Value::String(item) => item.clone(),
        other => text(other, "item"),
    }
}

/// 收藏夹
#[component]
pub fn FavoritesPage() -> impl IntoView {
    let auth = use_auth();

    let (items, set_items) = signal(Vec::<Value>::new());
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Notice::None);

    Effect::new(move |_| {
        let Some(user) = auth.user_id() else {
            set_notice.set(Some(("Your profile has no user id yet".to_string(), true)));
            set_loading.set(false);
            return;
        };
        spawn_local(async move {
            match auth.dispatcher().saved_items().get_saved_items(&user).await {
                Ok(data) => set_items.set(records(&data)),
                Err(e) => set_notice.set(Some((format!("Failed to load favorites: {}", e), true))),
            }
            set_loading.set(false);
        });
    });

    let remove = move |item: String| {
        let Some(user) = auth.user_id() else { return };
        spawn_local(async move {
            match auth.dispatcher().saved_items().remove_item(&user, &item).await {
                Ok(_) => set_items.update(|list| list.retain(|r| saved_item(r) != item)),
                Err(e) => set_notice.set(Some((format!("Could not remove item: {}", e), true))),
            }
        });
    };

    view! {
        <Page title="Favorites">
            <NoticeBar notice=notice />
            <Show
                when=move || !loading.get()
                fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
            >
                <Show when=move || !items.with(Vec::is_empty) fallback=|| view! { <p>"Nothing saved yet."</p> }>
                    <ul class="menu bg-base-100 rounded-box shadow">
                        <For
                            each=move || items.get()
                            key=saved_item
                            children=move |record| {
                                let item = saved_item(&record);
                                let label = item.clone();
                                let tags = record
                                    .get("tags")
                                    .and_then(Value::as_array)
                                    .map(|t| t.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
                                    .unwrap_or_default();
                                view! {
                                    <li class="flex flex-row justify-between items-center">
                                        <span>{label}</span>
                                        <span class="text-sm text-base-content/70">{tags}</span>
                                        <button class="btn btn-ghost btn-xs" on:click=move |_| remove(item.clone())>
                                            "Remove"
                                        </button>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </Show>
            </Show>
        </Page>
    }
}
