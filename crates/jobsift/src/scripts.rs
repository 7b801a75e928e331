//! DOM query functions evaluated through [`crate::PageController::evaluate`].
//!
//! Each constant is a JavaScript function expression. Selectors are passed in
//! as arguments rather than spliced into the source.

/// `(listSelector, marker) -> string[] | null`
///
/// Collects the marker class of each result's first child. `null` when the
/// results container is missing.
pub const LISTING_IDS: &str = r#"(listSelector, marker) => {
  const list = document.querySelector(listSelector);
  if (!list) return null;
  return [...list.children]
    .map((item) => {
      const first = item.children[0];
      if (!first || typeof first.className !== "string") return undefined;
      return first.className.split(" ").find((name) => name.includes(marker));
    })
    .filter((id) => id !== undefined);
}"#;

/// `(selector) -> bool`
pub const ELEMENT_PRESENT: &str = r#"(selector) => !!document.querySelector(selector)"#;

/// `(selector) -> string | null`
pub const INNER_TEXT: &str = r#"(selector) => {
  const el = document.querySelector(selector);
  return el ? el.innerText : null;
}"#;

/// `(paneSelector) -> null`
///
/// Scrolls by the height of the results pane so lazily rendered listings load.
pub const SCROLL_TO_BOTTOM: &str = r#"(paneSelector) => {
  const pane = document.querySelector(paneSelector);
  const top = pane ? pane.scrollHeight : document.body.scrollHeight;
  window.scrollBy({ top, behavior: "smooth" });
  return null;
}"#;

/// `(selectors) -> DetailSnapshot`
///
/// Looks up every field on its own so one missing element only nulls that
/// field. The url falls back to the current location.
pub const DETAIL_SNAPSHOT: &str = r#"(s) => {
  const text = (sel) => {
    if (!sel) return null;
    const el = document.querySelector(sel);
    return el ? el.innerText : null;
  };
  const link = s.url ? document.querySelector(s.url) : null;
  return {
    company: text(s.company),
    location: text(s.location),
    title: text(s.title),
    url: link && link.href ? link.href : window.location.href,
    description: text(s.description),
    date_text: text(s.date),
  };
}"#;

/// `(selector, visible) -> bool`
///
/// With `visible`, the element must also have a layout box and not be hidden
/// through computed style.
pub const ELEMENT_READY: &str = r#"(selector, visible) => {
  const el = document.querySelector(selector);
  if (!el) return false;
  if (!visible) return true;
  const style = window.getComputedStyle(el);
  if (style.visibility === "hidden" || style.display === "none") return false;
  const rect = el.getBoundingClientRect();
  return rect.width > 0 && rect.height > 0;
}"#;
