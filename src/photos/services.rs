use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::storage::StorageClient;

/// Where an uploaded photo ended up. `url` is what clients pass on as a
/// photo reference.
#[derive(Debug, Serialize)]
pub struct UploadedPhoto {
    pub key: String,
    pub url: String,
}

pub async fn upload_profile_photo(
    storage: &dyn StorageClient,
    user_id: Uuid,
    body: Bytes,
    content_type: &str,
) -> anyhow::Result<UploadedPhoto> {
    anyhow::ensure!(!body.is_empty(), "empty photo");
    let ext = ext_from_mime(content_type)
        .with_context(|| format!("unsupported content type {}", content_type))?;

    let key = format!("avatars/{}/{}.{}", user_id, Uuid::new_v4(), ext);
    storage
        .put_object(&key, body, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;

    let url = storage.object_url(&key);
    Ok(UploadedPhoto { key, url })
}

pub(crate) fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
