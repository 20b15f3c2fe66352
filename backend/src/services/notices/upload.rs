use actix_multipart::Multipart;
use futures_util::StreamExt;
use std::io::Write;

use common::requests::NoticePayload;

use crate::error::PortalError;
use crate::storage::MediaStore;

#[derive(Debug)]
pub struct NoticeUpload {
    pub payload: NoticePayload,
    /// Reference of a freshly stored attachment, when one was sent.
    pub file_ref: Option<String>,
}

/// Reads the `json`-then-optional-`file` multipart protocol. The attachment
/// is streamed chunk by chunk into the media store; nothing is buffered in
/// memory beyond the current chunk. When the request fails after the
/// attachment was already written, the stored file is removed here so no
/// caller has to remember to.
pub async fn read_upload(
    payload: Multipart,
    store: &MediaStore,
) -> Result<NoticeUpload, PortalError> {
    let mut parsed: Option<NoticePayload> = None;
    let mut file_ref: Option<String> = None;
    let outcome = read_fields(payload, store, &mut parsed, &mut file_ref).await;
    finalize(outcome, parsed, file_ref, store)
}

async fn read_fields(
    mut payload: Multipart,
    store: &MediaStore,
    parsed: &mut Option<NoticePayload>,
    file_ref: &mut Option<String>,
) -> Result<(), PortalError> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| PortalError::validation(format!("bad multipart payload: {}", e)))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("json") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| {
                        PortalError::validation(format!("bad multipart payload: {}", e))
                    })?;
                    bytes.extend_from_slice(&chunk);
                }
                let fields: NoticePayload = serde_json::from_slice(&bytes)
                    .map_err(|e| PortalError::validation(format!("invalid notice fields: {}", e)))?;
                *parsed = Some(fields);
            }

            Some("file") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();

                let (new_ref, mut out) = store.create(&filename)?;
                *file_ref = Some(new_ref);
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| {
                        PortalError::validation(format!("bad multipart payload: {}", e))
                    })?;
                    out.write_all(&chunk)?;
                }
            }

            _ => {}
        }
    }
    Ok(())
}

fn finalize(
    outcome: Result<(), PortalError>,
    parsed: Option<NoticePayload>,
    file_ref: Option<String>,
    store: &MediaStore,
) -> Result<NoticeUpload, PortalError> {
    let discard = |file_ref: &Option<String>| {
        if let Some(r) = file_ref {
            store.remove(r);
        }
    };
    if let Err(e) = outcome {
        discard(&file_ref);
        return Err(e);
    }
    match parsed {
        Some(payload) => Ok(NoticeUpload { payload, file_ref }),
        None => {
            discard(&file_ref);
            Err(PortalError::validation("missing 'json' field"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stored(store: &MediaStore) -> String {
        store.store("poster.png", b"png bytes").unwrap()
    }

    #[test]
    fn missing_json_field_discards_the_stored_attachment() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path()).unwrap();
        let file_ref = stored(&store);

        let err = finalize(Ok(()), None, Some(file_ref.clone()), &store).unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert!(store.read(&file_ref).is_err());
    }

    #[test]
    fn stream_error_discards_the_stored_attachment() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path()).unwrap();
        let file_ref = stored(&store);

        let err = finalize(
            Err(PortalError::validation("bad multipart payload")),
            None,
            Some(file_ref.clone()),
            &store,
        )
        .unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert!(store.read(&file_ref).is_err());
    }

    #[test]
    fn complete_upload_keeps_the_attachment() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path()).unwrap();
        let file_ref = stored(&store);
        let payload = NoticePayload {
            title: "t".into(),
            content: "c".into(),
            is_important: false,
        };

        let upload = finalize(Ok(()), Some(payload), Some(file_ref.clone()), &store).unwrap();
        assert_eq!(upload.file_ref.as_deref(), Some(file_ref.as_str()));
        assert_eq!(store.read(&file_ref).unwrap(), b"png bytes");
    }
}
