//! Trusted-markup policy for pages that gate their markup sinks.
//!
//! The host page's content security policy can require `innerHTML` values to
//! be built by a registered policy; a raw string assignment throws there.
//! [`MarkupPolicy::install`] registers a pass-through policy once per page
//! and [`MarkupPolicy::write_fragment`] routes writes through it. Where the
//! policy API is absent, or the page refuses the registration, writes fall
//! back to the plain setter. Every fragment is cleaned before it reaches a
//! writer, so the pass-through and the fallback are both safe to keep.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Window};

use crate::consts::MARKUP_POLICY_NAME;

/// The page's trusted-markup policy, when one could be registered.
pub struct MarkupPolicy {
    handle: Option<PolicyHandle>,
}

struct PolicyHandle {
    policy: JsValue,
    create_html: js_sys::Function,
}

impl MarkupPolicy {
    /// Registers the policy with the page. Runs once; the returned value is
    /// kept for the life of the panel.
    #[must_use]
    pub fn install(window: &Window) -> MarkupPolicy {
        MarkupPolicy { handle: register(window) }
    }

    /// Assigns a cleaned fragment to `target`'s markup sink, through the
    /// policy when one is installed.
    pub fn write_fragment(&self, target: &Element, fragment: &str) {
        if let Some(handle) = &self.handle {
            match handle.create_html.call1(&handle.policy, &JsValue::from_str(fragment)) {
                Ok(trusted) => {
                    let sink = JsValue::from_str("innerHTML");
                    match js_sys::Reflect::set(target.as_ref(), &sink, &trusted) {
                        Ok(_written) => return,
                        Err(err) => log::warn!("trusted fragment write failed: {err:?}"),
                    }
                }
                Err(err) => log::warn!("trusted fragment build failed: {err:?}"),
            }
        }
        target.set_inner_html(fragment);
    }
}

fn register(window: &Window) -> Option<PolicyHandle> {
    let factory = js_sys::Reflect::get(window.as_ref(), &JsValue::from_str("trustedTypes"))
        .unwrap_or(JsValue::UNDEFINED);
    if factory.is_undefined() || factory.is_null() {
        log::debug!("page has no trusted-markup factory, using plain assignment");
        return None;
    }
    let create_policy = js_sys::Reflect::get(&factory, &JsValue::from_str("createPolicy"))
        .unwrap_or(JsValue::UNDEFINED);
    let Some(create_policy) = create_policy.dyn_ref::<js_sys::Function>() else {
        log::debug!("trusted-markup factory has no registration hook");
        return None;
    };

    let pass_through = Closure::<dyn Fn(String) -> String>::new(|fragment: String| fragment);
    let rules = js_sys::Object::new();
    let name = JsValue::from_str("createHTML");
    if !matches!(js_sys::Reflect::set(&rules, &name, pass_through.as_ref()), Ok(true)) {
        return None;
    }
    let policy =
        match create_policy.call2(&factory, &JsValue::from_str(MARKUP_POLICY_NAME), rules.as_ref())
        {
            Ok(policy) => policy,
            Err(err) => {
                // The page's allowlist can refuse the name, or an earlier
                // injection pass already took it.
                log::warn!("trusted-markup policy refused: {err:?}");
                return None;
            }
        };
    // The policy retains the rules object, and with it the pass-through.
    pass_through.forget();

    let create_html = js_sys::Reflect::get(&policy, &JsValue::from_str("createHTML"))
        .unwrap_or(JsValue::UNDEFINED);
    match create_html.dyn_into::<js_sys::Function>() {
        Ok(create_html) => {
            log::info!("trusted-markup policy registered");
            Some(PolicyHandle { policy, create_html })
        }
        Err(_value) => {
            log::warn!("registered policy exposes no markup builder");
            None
        }
    }
}
