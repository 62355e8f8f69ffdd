//! 首页：房源列表
//!
//! 每条房源可以收藏、表达意向或追加照片。照片先走图床降级链，
//! 图床全部失败时退回本地压缩的 data URL。上传期间显示缩略图与文件信息。

use leptos::prelude::*;
use leptos::task::spawn_local;
use nestmatch::upload::DEFAULT_THUMBNAIL_SIZE;
use nestmatch::{UploadOptions, log_error};
use serde_json::Value;

use crate::auth::use_auth;
use crate::components::common::{Notice, NoticeBar, Page, record_id, records, text};
use crate::web::read_file;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    let (listings, set_listings) = signal(Vec::<Value>::new());
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Notice::None);
    // (缩略图 data URL, 说明文字)
    let (preview, set_preview) = signal(Option::<(String, String)>::None);

    let load_listings = move || {
        set_loading.set(true);
        spawn_local(async move {
            match auth.dispatcher().listings().get_all().await {
                Ok(data) => set_listings.set(records(&data)),
                Err(e) => set_notice.set(Some((format!("Failed to load listings: {}", e), true))),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| load_listings());

    let save = move |id: String| {
        spawn_local(async move {
            let result = auth.dispatcher().saved_items().add_item(&id).await;
            set_notice.set(Some(match result {
                Ok(_) => ("Saved to favorites".to_string(), false),
                Err(e) => (format!("Could not save listing: {}", e), true),
            }));
        });
    };

    let interest = move |id: String| {
        spawn_local(async move {
            let result = auth.dispatcher().listings().send_interest(&id).await;
            set_notice.set(Some(match result {
                Ok(_) => ("The lister has been notified".to_string(), false),
                Err(e) => (format!("Could not send interest: {}", e), true),
            }));
        });
    };

    let add_photo = move |id: String, file: web_sys::File| {
        set_notice.set(Some(("Uploading photo...".to_string(), false)));
        spawn_local(async move {
            let image = match read_file(&file).await {
                Ok(image) => image,
                Err(e) => {
                    set_notice.set(Some((e.to_string(), true)));
                    return;
                }
            };
            let uploader = auth.uploader();

            // 预览只是辅助信息，失败不影响上传
            let thumb = uploader.thumbnail(&image, DEFAULT_THUMBNAIL_SIZE).await;
            if let (Ok(thumb), Ok(info)) = (thumb, uploader.image_info(&image).await) {
                let caption = format!(
                    "{} ({}, {}×{})",
                    info.name, info.size_formatted, info.width, info.height
                );
                set_preview.set(Some((thumb, caption)));
            }

            let uploaded = uploader
                .upload(&image, UploadOptions::with_local_fallback())
                .await;
            set_preview.set(None);
            let url = match uploaded {
                Ok(url) => url,
                Err(e) => {
                    log_error!("[Home] Photo upload failed: {}", e);
                    set_notice.set(Some((e.to_string(), true)));
                    return;
                }
            };
            match auth.dispatcher().listings().add_photo(&id, &url).await {
                Ok(_) => {
                    set_notice.set(Some(("Photo added".to_string(), false)));
                    load_listings();
                }
                Err(e) => set_notice.set(Some((format!("Could not attach photo: {}", e), true))),
            }
        });
    };

    view! {
        <Page title="Listings">
            <NoticeBar notice=notice />
            {move || preview.get().map(|(src, caption)| view! {
                <div class="flex items-center gap-3 text-sm">
                    <img src=src class="w-16 h-16 rounded object-cover" alt="Selected photo" />
                    <span>{caption}</span>
                    <span class="loading loading-dots loading-sm"></span>
                </div>
            })}
            <Show
                when=move || !loading.get()
                fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
            >
                <div class="grid gap-4 md:grid-cols-2">
                    <For
                        each=move || listings.get()
                        key=|listing| record_id(listing).unwrap_or_else(|| listing.to_string())
                        children=move |listing| {
                            let id = record_id(&listing).unwrap_or_default();
                            let (save_id, interest_id, photo_id) = (id.clone(), id.clone(), id);
                            let photo = listing
                                .get("photos")
                                .and_then(|p| p.get(0))
                                .and_then(|p| p.get("url"))
                                .and_then(Value::as_str)
                                .map(str::to_string);
                            view! {
                                <div class="card bg-base-100 shadow">
                                    {photo.map(|src| view! {
                                        <figure><img src=src alt="Housing listing photo" /></figure>
                                    })}
                                    <div class="card-body">
                                        <h2 class="card-title">{text(&listing, "title")}</h2>
                                        <p>{text(&listing, "address")}</p>
                                        <p class="text-sm text-base-content/70">
                                            {format!("${} / week", text(&listing, "price"))}
                                        </p>
                                        <div class="card-actions justify-end items-center">
                                            <input
                                                type="file"
                                                accept="image/*"
                                                class="file-input file-input-bordered file-input-sm"
                                                on:change=move |ev| {
                                                    let file = event_target::<web_sys::HtmlInputElement>(&ev)
                                                        .files()
                                                        .and_then(|files| files.get(0));
                                                    if let Some(file) = file {
                                                        add_photo(photo_id.clone(), file);
                                                    }
                                                }
                                            />
                                            <button class="btn btn-sm" on:click=move |_| save(save_id.clone())>
                                                "Save"
                                            </button>
                                            <button class="btn btn-sm btn-primary" on:click=move |_| interest(interest_id.clone())>
                                                "I'm interested"
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

