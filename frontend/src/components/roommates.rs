use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::auth::use_auth;
use crate::components::common::{Notice, NoticeBar, Page, record_id, records, text};

/// 室友帖子列表
#[component]
pub fn FindRoommatesPage() -> impl IntoView {
    let auth = use_auth();

    let (postings, set_postings) = signal(Vec::<Value>::new());
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Notice::None);

    Effect::new(move |_| {
        spawn_local(async move {
            match auth.dispatcher().roommates().get_all().await {
                Ok(data) => set_postings.set(records(&data)),
                Err(e) => set_notice.set(Some((format!("Failed to load postings: {}", e), true))),
            }
            set_loading.set(false);
        });
    });

    let contact = move |id: String| {
        spawn_local(async move {
            let result = auth.dispatcher().roommates().contact(&id).await;
            set_notice.set(Some(match result {
                Ok(_) => ("Your contact request was sent".to_string(), false),
                Err(e) => (format!("Could not contact poster: {}", e), true),
            }));
        });
    };

    view! {
        <Page title="Find Roommates">
            <NoticeBar notice=notice />
            <Show
                when=move || !loading.get()
                fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
            >
                <div class="grid gap-4 md:grid-cols-2">
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
                                        <ul class="text-sm text-base-content/70">
                                            <li>{format!("Age: {}", text(&posting, "age"))}</li>
                                            <li>{format!("Gender: {}", text(&posting, "gender"))}</li>
                                            <li>{format!("Daily rhythm: {}", text(&posting, "dailyRhythm"))}</li>
                                            <li>{format!("Cleanliness: {}", text(&posting, "cleanlinessPreference"))}</li>
                                            <li>{format!("Roommates wanted: {}", text(&posting, "numberOfRoommates"))}</li>
                                        </ul>
                                        <div class="card-actions justify-end">
                                            <button class="btn btn-sm btn-primary" on:click=move |_| contact(id.clone())>
                                                "Contact"
                                            </button>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </Show>
        </Page>
    }
}
