use web_sys as web;

// Optional "click anywhere to play" hint supplied by the host page.
const HINT_ID: &str = "start-overlay";

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        _ = el.set_attribute("style", "display:none");
    }
}
