use crate::dom::{notify, DomError, DomResult};
use crate::messages;
use crate::util::share_url;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

pub(crate) const COPY_FEEDBACK_MS: u64 = 2000;
const COPY_FEEDBACK_COLOR: &str = "#28a745";

pub(crate) async fn write_text(text: &str) -> DomResult<()> {
    let promise = window().navigator().clipboard().write_text(text);
    JsFuture::from(promise).await?;
    Ok(())
}

/// Text of the `pre code` block enclosing `button`.
fn code_block_text(button: &web_sys::Element) -> DomResult<String> {
    let block = button
        .closest(".code-block")?
        .ok_or_else(|| DomError::Missing(".code-block".into()))?;
    let code = block
        .query_selector("pre code")?
        .ok_or_else(|| DomError::Missing(".code-block pre code".into()))?;
    Ok(code.text_content().unwrap_or_default())
}

const COPIED_MARKER: &str = "data-copied";

/// Temporarily relabels `button`; the original label and background come back
/// after [`COPY_FEEDBACK_MS`]. Clicks while the feedback is showing leave the
/// pending restore in charge.
fn flash_copied(button: web_sys::HtmlElement) {
    if button.has_attribute(COPIED_MARKER) {
        return;
    }

    let original_label = button.inner_html();
    let style = button.style();
    let original_background = style.get_property_value("background").unwrap_or_default();

    let _ = button.set_attribute(COPIED_MARKER, "");
    button.set_inner_html(&format!(r#"<i class="fas fa-check"></i> {}"#, messages::COPY_OK));
    let _ = style.set_property("background", COPY_FEEDBACK_COLOR);

    leptos_dom::helpers::set_timeout(
        move || {
            button.set_inner_html(&original_label);
            let style = button.style();
            let _ = if original_background.is_empty() {
                style.remove_property("background").map(|_| ())
            } else {
                style.set_property("background", &original_background)
            };
            let _ = button.remove_attribute(COPIED_MARKER);
        },
        Duration::from_millis(COPY_FEEDBACK_MS),
    );
}

pub(crate) fn copy_code(button: web_sys::Element) {
    spawn_local(async move {
        let result = match code_block_text(&button) {
            Ok(text) => write_text(&text).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                if let Ok(html) = button.dyn_into::<web_sys::HtmlElement>() {
                    flash_copied(html);
                }
            }
            Err(e) => {
                leptos::logging::error!("copy failed: {}", e);
                notify(messages::COPY_FAILED);
            }
        }
    });
}

pub(crate) fn share_post(post_id: String) {
    spawn_local(async move {
        let origin = window().location().origin().unwrap_or_default();
        match write_text(&share_url(&origin, &post_id)).await {
            Ok(()) => notify(messages::SHARE_OK),
            Err(e) => {
                leptos::logging::error!("copy link failed: {}", e);
                notify(messages::SHARE_FAILED);
            }
        }
    });
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::dom::test_support::{
        alerts, clipboard_writes, record_alerts, restore_clipboard, sleep, stub_clipboard,
    };
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_code_block(code: &str) -> (web_sys::Element, web_sys::Element) {
        let host = document().create_element("div").unwrap();
        host.set_inner_html(&format!(
            r#"<div class="code-block"><pre><code>{}</code></pre><button class="copy-btn">Copiar</button></div>"#,
            code
        ));
        document().body().unwrap().append_child(&host).unwrap();
        let button = host.query_selector(".copy-btn").unwrap().expect("button");
        (host, button)
    }

    fn mount_button() -> web_sys::HtmlElement {
        let button: web_sys::HtmlElement =
            document().create_element("button").unwrap().unchecked_into();
        button.set_inner_html("Copiar");
        document().body().unwrap().append_child(&button).unwrap();
        button
    }

    fn background(button: &web_sys::HtmlElement) -> String {
        button.style().get_property_value("background").unwrap()
    }

    #[wasm_bindgen_test]
    fn test_code_block_text_reads_enclosing_block() {
        let (host, button) = mount_code_block(r#"print("hi")"#);
        assert_eq!(code_block_text(&button).expect("text"), r#"print("hi")"#);
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn test_flash_copied_reverts_label_after_delay() {
        let button = mount_button();

        flash_copied(button.clone());
        assert!(button.inner_html().contains(messages::COPY_OK));

        sleep(COPY_FEEDBACK_MS + 100).await;

        assert_eq!(button.inner_html(), "Copiar");
        assert_eq!(background(&button), "");
        button.remove();
    }

    #[wasm_bindgen_test]
    async fn test_flash_copied_twice_still_reverts() {
        let button = mount_button();

        flash_copied(button.clone());
        sleep(500).await;
        flash_copied(button.clone());
        assert!(button.inner_html().contains(messages::COPY_OK));

        sleep(COPY_FEEDBACK_MS + 100).await;
        assert_eq!(button.inner_html(), "Copiar");
        assert_eq!(background(&button), "");
        assert!(!button.has_attribute(COPIED_MARKER));

        // A later click flashes again.
        flash_copied(button.clone());
        assert!(button.inner_html().contains(messages::COPY_OK));
        sleep(COPY_FEEDBACK_MS + 100).await;
        assert_eq!(button.inner_html(), "Copiar");
        button.remove();
    }

    #[wasm_bindgen_test]
    async fn test_copy_code_writes_block_text() {
        record_alerts();
        stub_clipboard(false);
        let (host, button) = mount_code_block("x = 1");

        copy_code(button.clone());
        sleep(50).await;

        assert_eq!(clipboard_writes(), vec!["x = 1".to_string()]);
        assert!(button.inner_html().contains(messages::COPY_OK));
        assert!(alerts().is_empty());

        restore_clipboard();
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn test_copy_code_reports_rejected_write() {
        record_alerts();
        stub_clipboard(true);
        let (host, button) = mount_code_block("x = 1");

        copy_code(button.clone());
        sleep(50).await;

        assert_eq!(clipboard_writes(), vec!["x = 1".to_string()]);
        assert_eq!(alerts(), vec![messages::COPY_FAILED.to_string()]);
        assert_eq!(button.inner_html(), "Copiar");

        restore_clipboard();
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn test_share_post_writes_post_link() {
        record_alerts();
        stub_clipboard(false);
        let origin = window().location().origin().unwrap();

        share_post("42".into());
        sleep(50).await;

        assert_eq!(clipboard_writes(), vec![format!("{}/post/42", origin)]);
        assert_eq!(alerts(), vec![messages::SHARE_OK.to_string()]);
        restore_clipboard();
    }

    #[wasm_bindgen_test]
    async fn test_share_post_reports_rejected_write() {
        record_alerts();
        stub_clipboard(true);

        share_post("42".into());
        sleep(50).await;

        assert_eq!(clipboard_writes().len(), 1);
        assert_eq!(alerts(), vec![messages::SHARE_FAILED.to_string()]);
        restore_clipboard();
    }
}
