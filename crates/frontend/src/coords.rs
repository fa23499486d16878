use pinmap_shared::geometry::Size;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Get the bounding client rect of an element by id.
pub fn element_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

pub fn element_size(id: &str) -> Option<Size> {
    element_rect(id).map(|r| Size::new(r.width(), r.height()))
}

/// Client coordinates relative to the element with `id`.
pub fn point_in_element(client_x: f64, client_y: f64, id: &str) -> Option<(f64, f64)> {
    let rect = element_rect(id)?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

/// Same clock as animation frame timestamps.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Resolves on the next animation frame with its timestamp.
pub async fn next_animation_frame() -> Option<f64> {
    let window = web_sys::window()?;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if window.request_animation_frame(&resolve).is_err() {
            tracing::warn!("requestAnimationFrame rejected");
        }
    });
    let timestamp: JsValue = JsFuture::from(promise).await.ok()?;
    timestamp.as_f64()
}

/// Whether an element with this tag (and `type` attribute for inputs) takes text.
pub fn accepts_text(tag_name: &str, input_type: Option<&str>) -> bool {
    match tag_name.to_ascii_uppercase().as_str() {
        "TEXTAREA" => true,
        "INPUT" => matches!(
            input_type.map(|t| t.to_ascii_lowercase()).as_deref(),
            None | Some("") | Some("text") | Some("search")
        ),
        _ => false,
    }
}

pub fn text_input_focused() -> bool {
    let Some(active) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
    else {
        return false;
    };
    accepts_text(&active.tag_name(), active.get_attribute("type").as_deref())
}

/// Warm the browser cache; the elements are dropped immediately.
pub fn preload_images<'a>(urls: impl IntoIterator<Item = &'a str>) {
    let mut count = 0;
    for url in urls {
        if let Ok(img) = web_sys::HtmlImageElement::new() {
            img.set_src(url);
            count += 1;
        }
    }
    tracing::debug!(count, "preloading detail images");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_container_origin() {
        let (x, y) = client_to_container(100.0, 200.0, 100.0, 200.0);
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_container_offset() {
        let (x, y) = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!((x - 130.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_fields_accept_text() {
        assert!(accepts_text("TEXTAREA", None));
        assert!(accepts_text("input", None));
        assert!(accepts_text("INPUT", Some("")));
        assert!(accepts_text("INPUT", Some("Search")));
    }

    #[test]
    fn test_other_controls_do_not_accept_text() {
        assert!(!accepts_text("INPUT", Some("range")));
        assert!(!accepts_text("INPUT", Some("checkbox")));
        assert!(!accepts_text("BUTTON", None));
        assert!(!accepts_text("DIV", None));
    }
}
