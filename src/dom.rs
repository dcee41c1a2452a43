use viewer_core::ContainerSize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::debug!("[dom] no #{} on page", element_id);
    }
}

/// Call `handler` with the new value whenever the `<select>` changes.
pub fn add_select_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(String) + 'static,
) {
    let Some(select) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlSelectElement>().ok())
    else {
        log::debug!("[dom] no <select id={}> on page", element_id);
        return;
    };
    let target = select.clone();
    let closure = Closure::wrap(Box::new(move || handler(target.value())) as Box<dyn FnMut()>);
    _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn set_select_value(document: &web::Document, element_id: &str, value: &str) {
    if let Some(select) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlSelectElement>().ok())
    {
        select.set_value(value);
    }
}

/// CSS size of `el` plus the current device pixel ratio.
pub fn container_size(el: &web::Element) -> ContainerSize {
    let rect = el.get_bounding_client_rect();
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    ContainerSize::new(rect.width() as f32, rect.height() as f32, dpr as f32)
}

pub fn set_canvas_backing_size(canvas: &web::HtmlCanvasElement, width: u32, height: u32) {
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }
}

#[inline]
pub fn set_visible(document: &web::Document, element_id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        _ = el.set_attribute("style", if visible { "" } else { "display:none" });
    }
}

#[inline]
pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}
