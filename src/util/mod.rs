use crate::api::UploadFile;
use futures::channel::oneshot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// ISO-8601 timestamp from the browser clock, used for `updated_at` bumps.
pub(crate) fn now_iso() -> String {
    js_sys::Date::new_0()
        .to_iso_string()
        .as_string()
        .unwrap_or_default()
}

pub(crate) fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}

/// Storage object names are `<unix_ms>-<original name>`; this recovers the original name.
pub(crate) fn display_file_name(object_name: &str) -> &str {
    match object_name.split_once('-') {
        Some((prefix, rest))
            if !rest.is_empty() && !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest
        }
        _ => object_name,
    }
}

/// Reads a picked file into memory. `None` when the browser refuses.
pub(crate) async fn read_file(file: &web_sys::File) -> Option<UploadFile> {
    let reader = web_sys::FileReader::new().ok()?;
    let (tx, rx) = oneshot::channel::<()>();

    let on_done = Closure::once_into_js(move || {
        let _ = tx.send(());
    });
    reader.set_onloadend(Some(on_done.unchecked_ref()));
    reader.read_as_array_buffer(file).ok()?;
    rx.await.ok()?;

    let result = reader.result().ok()?;
    if !result.is_instance_of::<js_sys::ArrayBuffer>() {
        tracing::warn!("could not read {}", file.name());
        return None;
    }

    Some(UploadFile {
        name: file.name(),
        mime: file.type_(),
        bytes: js_sys::Uint8Array::new(&result).to_vec(),
    })
}

/// Local preview URL for a picked file; release with `revoke_object_url`.
pub(crate) fn object_url(file: &web_sys::File) -> Option<String> {
    web_sys::Url::create_object_url_with_blob(file).ok()
}

pub(crate) fn revoke_object_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}

/// Selects the input's text and copies it. False when the browser refuses.
pub(crate) fn copy_input_text(input: &web_sys::HtmlInputElement) -> bool {
    input.select();
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        .and_then(|d| d.exec_command("copy").ok())
        .unwrap_or(false)
}

pub(crate) fn alert(message: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.alert_with_message(message);
    }
}

/// Blocking confirmation dialog. Missing window counts as "cancel".
pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_units() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(2_048_576), "2.0 MB");
        assert_eq!(format_file_size(10 * 1024 * 1024 * 1024), "10.0 GB");
    }

    #[test]
    fn test_display_file_name_strips_timestamp_prefix() {
        assert_eq!(display_file_name("1737331200000-hero.jpg"), "hero.jpg");
        assert_eq!(display_file_name("hero-background.jpg"), "hero-background.jpg");
        assert_eq!(display_file_name("1737331200000-"), "1737331200000-");
    }
}
