// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay stylesheet.

use alloc::format;
use alloc::string::String;

use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::WebConfig;

/// Returns the rules that hide a loading container's content.
///
/// The hidden class goes on the container itself, so children inserted while
/// loading are hidden as well. Only the overlay is made visible again.
pub(crate) fn content_hiding_rules(hidden: &str, overlay: &str) -> String {
    format!(
        ".{hidden}{{visibility:hidden}}\n\
         .{hidden}>.{overlay}{{visibility:visible}}\n"
    )
}

/// Returns the CSS rules for the classes named in `config`.
#[must_use]
pub fn stylesheet(config: &WebConfig) -> String {
    let WebConfig {
        container_class: root,
        overlay_class: overlay,
        hidden_class: hidden,
        block_class: block,
        ..
    } = config;
    let hiding = content_hiding_rules(hidden, overlay);
    format!(
        ".{root}{{position:relative}}\n\
         {hiding}\
         .{overlay}{{position:absolute;inset:0;overflow:hidden;pointer-events:none}}\n\
         .{block}{{position:absolute;\
         background:linear-gradient(90deg,#e2e5e7 25%,#f0f2f3 37%,#e2e5e7 63%);\
         background-size:400% 100%;\
         animation:{block}-shimmer 1.4s ease infinite}}\n\
         @keyframes {block}-shimmer{{\
         0%{{background-position:100% 50%}}\
         100%{{background-position:0 50%}}}}\n"
    )
}

/// Adds the stylesheet for `config` to `document`'s `<head>`, once.
///
/// The `<style>` element is keyed by the overlay class, so attaching several
/// skeletons with the same configuration installs it a single time.
///
/// # Errors
///
/// Returns the JS exception if the document has no `<head>` or the element
/// cannot be created.
pub fn install_stylesheet(document: &Document, config: &WebConfig) -> Result<(), JsValue> {
    let id = format!("{}-style", config.overlay_class);
    if document.get_element_by_id(&id).is_some() {
        return Ok(());
    }
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?;
    let style = document.create_element("style")?;
    style.set_id(&id);
    style.set_text_content(Some(stylesheet(config).as_str()));
    head.append_child(&style)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::borrow::Cow;

    use super::*;

    #[test]
    fn rules_use_configured_classes() {
        let config = WebConfig {
            block_class: Cow::Borrowed("sk"),
            ..WebConfig::new()
        };
        let css = stylesheet(&config);
        assert!(css.contains(".umbra-root{position:relative}"));
        assert!(css.contains(".umbra-content-hidden{visibility:hidden}"));
        assert!(css.contains(".umbra-content-hidden>.umbra-overlay{visibility:visible}"));
        assert!(css.contains(".umbra-overlay{position:absolute;inset:0;"));
        assert!(css.contains(".sk{position:absolute;"));
        assert!(css.contains("@keyframes sk-shimmer{"));
    }

    #[test]
    fn hiding_applies_to_the_container_not_its_children() {
        let rules = content_hiding_rules("loading", "ov");
        // No per-child selector: anything inserted later inherits the
        // container's visibility.
        assert_eq!(
            rules,
            ".loading{visibility:hidden}\n.loading>.ov{visibility:visible}\n"
        );
    }

    #[test]
    fn braces_balance() {
        let css = stylesheet(&WebConfig::new());
        let open = css.matches('{').count();
        let close = css.matches('}').count();
        assert_eq!(open, close);
    }
}
