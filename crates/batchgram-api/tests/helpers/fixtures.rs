//! Test fixtures: upload forms and Telegram responses.

use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

/// 1KB blob with a JPEG signature.
pub fn jpeg_bytes() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(1024, 0);
    data
}

pub fn file_part(name: &str, mime: &str, data: Vec<u8>) -> Part {
    Part::bytes(data).file_name(name).mime_type(mime)
}

/// Form with `count` 1KB JPEGs named `photo{i}.jpg`.
pub fn jpeg_form(count: usize) -> MultipartForm {
    (0..count).fold(MultipartForm::new(), |form, i| {
        form.add_part(
            "files",
            file_part(&format!("photo{}.jpg", i), "image/jpeg", jpeg_bytes()),
        )
    })
}

/// Form with the given `(file name, MIME type)` pairs, 1KB each.
pub fn form_of(files: &[(&str, &str)]) -> MultipartForm {
    files.iter().fold(MultipartForm::new(), |form, (name, mime)| {
        form.add_part("files", file_part(name, mime, jpeg_bytes()))
    })
}

/// `sendMediaGroup` success with one photo message per id. Each photo carries a
/// small thumbnail and the full-size variant `id`.
pub fn photo_group_response(ids: &[&str]) -> Value {
    let result: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "message_id": 100 + i,
                "photo": [
                    {"file_id": format!("thumb_{}", id), "file_size": 900, "width": 90, "height": 90},
                    {"file_id": id, "file_size": 48000, "width": 1280, "height": 960}
                ]
            })
        })
        .collect();
    json!({ "ok": true, "result": result })
}

pub fn video_group_response(ids: &[&str]) -> Value {
    let result: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| json!({"message_id": 200 + i, "video": {"file_id": id, "file_size": 1024}}))
        .collect();
    json!({ "ok": true, "result": result })
}
