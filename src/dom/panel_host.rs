//! The injected panel: construction, placement, and interaction wiring.
//!
//! The panel element is built once and reused for the life of the page.
//! When a navigation tears it out of the document, [`PanelHost::schedule_mount`]
//! re-inserts the same element, so accumulated rows survive the rebuild.
//! All sizing and visibility decisions are made by [`crate::panel`]; this
//! module only reflects them into styles and storage.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, MouseEvent, Node, Window};

use crate::consts::{
    AVATAR_SIZE_PX, EMOJI_HEIGHT_PX, HOST_ANCHOR_SELECTORS, MOUNT_RETRY_MS, PANEL_ID, PANEL_TITLE,
    PLACEHOLDER_TEXT, POPOUT_LIST_SELECTOR,
};
use crate::dom::{prefs, trust};
use crate::feed::ChatEntry;
use crate::panel::{DragSession, PanelCore, PanelState, PrefsStore, clamp_height};
use crate::retry::{self, CancelToken};

/// Where the panel goes in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Immediately before the host page's chat widget.
    BeforeHostWidget,
    /// First child of the popout's message list.
    PopoutListHead,
}

/// Cloneable handle to the injected panel.
#[derive(Clone)]
pub struct PanelHost {
    inner: Rc<RefCell<HostInner>>,
}

struct HostInner {
    window: Window,
    document: Document,
    placement: Placement,
    prefs: Box<dyn PrefsStore>,
    markup: trust::MarkupPolicy,
    core: PanelCore,
    rendered: usize,
    drag: Option<DragSession>,
    dom: Option<PanelDom>,
    mount_retry: Option<CancelToken>,
}

/// Retained elements, built on the first successful mount.
struct PanelDom {
    panel: HtmlElement,
    body: HtmlElement,
    handle: HtmlElement,
    overlay: HtmlElement,
    placeholder: Option<HtmlElement>,
}

impl PanelHost {
    #[must_use]
    pub fn new(window: &Window, document: &Document, placement: Placement) -> PanelHost {
        let prefs = prefs::resolve(window);
        let state = PanelState::load(prefs.as_ref());
        PanelHost {
            inner: Rc::new(RefCell::new(HostInner {
                window: window.clone(),
                document: document.clone(),
                placement,
                prefs,
                markup: trust::MarkupPolicy::install(window),
                core: PanelCore::new(state),
                rendered: 0,
                drag: None,
                dom: None,
                mount_retry: None,
            })),
        }
    }

    /// Starts (or restarts) the anchor search. Safe to call repeatedly: the
    /// previous search is cancelled and mounting itself is idempotent.
    pub fn schedule_mount(&self) {
        if let Some(previous) = self.inner.borrow_mut().mount_retry.take() {
            previous.cancel();
        }
        let host = self.clone();
        let token = retry::spawn(MOUNT_RETRY_MS, move || host.try_mount());
        self.inner.borrow_mut().mount_retry = Some(token);
    }

    /// Appends an entry. Rows accumulate whether or not the panel is mounted
    /// or enabled; the DOM catches up on the next render.
    pub fn push(&self, entry: ChatEntry) {
        let mut inner = self.inner.borrow_mut();
        inner.core.push(entry);
        if inner.dom.is_some() {
            if let Err(err) = Self::render_pending(&mut inner) {
                log::warn!("row render failed: {err:?}");
            }
        }
    }

    fn try_mount(&self) -> bool {
        match self.mount_step() {
            Ok(mounted) => mounted,
            Err(err) => {
                log::warn!("panel mount failed: {err:?}");
                false
            }
        }
    }

    fn mount_step(&self) -> Result<bool, JsValue> {
        let mut inner = self.inner.borrow_mut();
        if inner.document.get_element_by_id(PANEL_ID).is_some() {
            return Ok(true);
        }
        let (parent, before): (Element, Option<Node>) = match inner.placement {
            Placement::BeforeHostWidget => {
                let Some(anchor) = first_match(&inner.document, &HOST_ANCHOR_SELECTORS) else {
                    return Ok(false);
                };
                let Some(parent) = anchor.parent_element() else {
                    return Ok(false);
                };
                (parent, Some(Node::from(anchor)))
            }
            Placement::PopoutListHead => {
                let Some(list) = query(&inner.document, POPOUT_LIST_SELECTOR) else {
                    return Ok(false);
                };
                let first = list.first_child();
                (list, first)
            }
        };
        if inner.dom.is_none() {
            let window = inner.window.clone();
            let document = inner.document.clone();
            let state = inner.core.state;
            inner.dom = Some(self.build_dom(&window, &document, state)?);
        }
        let inner = &mut *inner;
        if let Some(dom) = &inner.dom {
            parent.insert_before(&dom.panel, before.as_ref())?;
        }
        Self::apply_state(inner);
        Self::render_pending(inner)?;
        log::info!("panel mounted");
        Ok(true)
    }

    fn build_dom(
        &self,
        window: &Window,
        document: &Document,
        state: PanelState,
    ) -> Result<PanelDom, JsValue> {
        let panel = create(document, "div")?;
        panel.set_id(PANEL_ID);
        panel.style().set_css_text(
            "background:#fff;border:1px solid #ccc;border-radius:8px;margin-bottom:8px;\
             font-family:Roboto,Arial,sans-serif;overflow:hidden;",
        );

        let header = create(document, "div")?;
        header.style().set_css_text(
            "display:flex;align-items:center;gap:8px;padding:6px 10px;background:#f8f8f8;\
             border-bottom:1px solid #e0e0e0;font-size:13px;font-weight:500;",
        );
        let title = create(document, "span")?;
        title.set_inner_text(PANEL_TITLE);
        title.style().set_css_text("flex:1;");

        let toggle_label = create(document, "label")?;
        toggle_label
            .style()
            .set_css_text("display:flex;align-items:center;gap:4px;font-weight:400;cursor:pointer;");
        let toggle: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        toggle.set_type("checkbox");
        toggle.set_checked(state.enabled);
        let toggle_text = create(document, "span")?;
        toggle_text.set_inner_text("Show");
        toggle_label.append_child(&toggle)?;
        toggle_label.append_child(&toggle_text)?;

        let collapse = create(document, "button")?;
        collapse.set_inner_text("-");
        collapse
            .style()
            .set_css_text("border:none;background:none;cursor:pointer;font-size:14px;padding:0 4px;");

        header.append_child(&title)?;
        header.append_child(&toggle_label)?;
        header.append_child(&collapse)?;

        let body = create(document, "div")?;
        body.style().set_css_text("overflow-y:auto;padding:4px 0;");
        let placeholder = create(document, "div")?;
        placeholder.set_inner_text(PLACEHOLDER_TEXT);
        placeholder
            .style()
            .set_css_text("color:#999;font-size:12px;padding:10px;text-align:center;");
        body.append_child(&placeholder)?;

        let handle = create(document, "div")?;
        handle
            .style()
            .set_css_text("height:6px;cursor:ns-resize;background:#f0f0f0;border-top:1px solid #e0e0e0;");

        // Full-viewport shield attached only while a drag is active, so the
        // page under the pointer cannot swallow the mouseup.
        let overlay = create(document, "div")?;
        overlay
            .style()
            .set_css_text("position:fixed;inset:0;z-index:2147483647;cursor:ns-resize;");

        panel.append_child(&header)?;
        panel.append_child(&body)?;
        panel.append_child(&handle)?;

        self.attach_listeners(window, &toggle, &collapse, &handle)?;

        Ok(PanelDom {
            panel,
            body,
            handle,
            overlay,
            placeholder: Some(placeholder),
        })
    }

    fn attach_listeners(
        &self,
        window: &Window,
        toggle: &HtmlInputElement,
        collapse: &HtmlElement,
        handle: &HtmlElement,
    ) -> Result<(), JsValue> {
        let host = self.clone();
        let toggle_ref = toggle.clone();
        let on_toggle = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            host.set_enabled(toggle_ref.checked());
        });
        toggle.add_event_listener_with_callback("change", on_toggle.as_ref().unchecked_ref())?;
        on_toggle.forget();

        let host = self.clone();
        let collapse_ref = collapse.clone();
        let on_collapse = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
            let open = host.toggle_collapsed();
            collapse_ref.set_inner_text(if open { "-" } else { "+" });
        });
        collapse.add_event_listener_with_callback("click", on_collapse.as_ref().unchecked_ref())?;
        on_collapse.forget();

        let host = self.clone();
        let on_press = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            event.prevent_default();
            host.begin_drag(f64::from(event.client_y()));
        });
        handle.add_event_listener_with_callback("mousedown", on_press.as_ref().unchecked_ref())?;
        on_press.forget();

        // Window-level so the drag survives the pointer leaving the panel.
        // Both are no-ops while no drag session is active.
        let host = self.clone();
        let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            host.drag_to(f64::from(event.client_y()));
        });
        window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();

        let host = self.clone();
        let on_release = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            host.end_drag(f64::from(event.client_y()));
        });
        window.add_event_listener_with_callback("mouseup", on_release.as_ref().unchecked_ref())?;
        on_release.forget();
        Ok(())
    }

    fn set_enabled(&self, enabled: bool) {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;
        inner.core.state.set_enabled(enabled, inner.prefs.as_ref());
        Self::apply_visibility(inner);
    }

    fn toggle_collapsed(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        inner.core.state.toggle_collapsed();
        let open = !inner.core.state.collapsed;
        Self::apply_visibility(&inner);
        open
    }

    fn begin_drag(&self, pointer_y: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.drag = Some(DragSession::new(pointer_y, inner.core.state.height_px));
        if let Some(dom) = &inner.dom {
            if let Some(body) = inner.document.body() {
                if let Err(err) = body.append_child(&dom.overlay) {
                    log::warn!("drag shield attach failed: {err:?}");
                }
            }
        }
    }

    fn drag_to(&self, pointer_y: f64) {
        let inner = self.inner.borrow();
        let Some(session) = inner.drag else {
            return;
        };
        let height = session.height_at(pointer_y, viewport_height(&inner.window));
        if let Some(dom) = &inner.dom {
            set_style(&dom.body, "height", &format!("{height}px"));
        }
    }

    fn end_drag(&self, pointer_y: f64) {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;
        let Some(session) = inner.drag.take() else {
            return;
        };
        let viewport = viewport_height(&inner.window);
        let height = session.height_at(pointer_y, viewport);
        inner.core.state.commit_height(height, viewport, inner.prefs.as_ref());
        if let Some(dom) = &inner.dom {
            set_style(&dom.body, "height", &format!("{}px", inner.core.state.height_px));
            dom.overlay.remove();
        }
    }

    fn apply_state(inner: &HostInner) {
        let Some(dom) = &inner.dom else {
            return;
        };
        let height = clamp_height(inner.core.state.height_px, viewport_height(&inner.window));
        set_style(&dom.body, "height", &format!("{height}px"));
        Self::apply_visibility(inner);
    }

    fn apply_visibility(inner: &HostInner) {
        let Some(dom) = &inner.dom else {
            return;
        };
        let display = if inner.core.state.body_visible() { "block" } else { "none" };
        set_style(&dom.body, "display", display);
        set_style(&dom.handle, "display", display);
    }

    fn render_pending(inner: &mut HostInner) -> Result<(), JsValue> {
        let rendered_before = inner.rendered;
        let Some(dom) = &mut inner.dom else {
            return Ok(());
        };
        let rows = inner.core.rows();
        if inner.rendered < rows.len() {
            if let Some(placeholder) = dom.placeholder.take() {
                placeholder.remove();
            }
        }
        while inner.rendered < rows.len() {
            let row = build_row(&inner.document, &inner.markup, &rows[inner.rendered])?;
            dom.body.append_child(&row)?;
            inner.rendered += 1;
        }
        if inner.rendered > rendered_before {
            dom.body.set_scroll_top(dom.body.scroll_height());
        }
        Ok(())
    }
}

fn build_row(
    document: &Document,
    markup: &trust::MarkupPolicy,
    entry: &ChatEntry,
) -> Result<HtmlElement, JsValue> {
    let row = create(document, "div")?;
    row.style().set_css_text(
        "display:flex;align-items:flex-start;gap:8px;padding:6px 10px;\
         border-bottom:1px solid #f0f0f0;font-size:13px;",
    );

    if !entry.author_photo_url.is_empty() {
        let photo = create(document, "img")?;
        photo.set_attribute("src", &entry.author_photo_url)?;
        photo.style().set_css_text(&format!(
            "width:{AVATAR_SIZE_PX}px;height:{AVATAR_SIZE_PX}px;border-radius:50%;flex-shrink:0;"
        ));
        row.append_child(&photo)?;
    }

    let column = create(document, "div")?;
    column.style().set_css_text("flex:1;min-width:0;");

    let meta = create(document, "div")?;
    let badge = create(document, "span")?;
    badge.set_inner_text(&entry.author_name);
    badge.style().set_css_text(
        "background:#ffd600;color:#111;border-radius:3px;padding:0 4px;font-weight:500;",
    );
    let when = create(document, "span")?;
    when.set_inner_text(&entry.timestamp);
    when.style().set_css_text("float:right;color:#999;font-size:11px;");
    meta.append_child(&badge)?;
    meta.append_child(&when)?;

    // The fragment was cleaned at extraction (and again at the relay
    // receiver), so it is inert by the time it gets here.
    let content = create(document, "div")?;
    markup.write_fragment(&content, &entry.message_html);
    content.style().set_css_text("margin-top:2px;word-wrap:break-word;");
    let images = content.query_selector_all("img")?;
    for index in 0..images.length() {
        if let Some(node) = images.get(index) {
            if let Some(image) = node.dyn_ref::<HtmlElement>() {
                image.style().set_css_text(&format!(
                    "height:{EMOJI_HEIGHT_PX}px;width:{EMOJI_HEIGHT_PX}px;vertical-align:middle;"
                ));
            }
        }
    }

    column.append_child(&meta)?;
    column.append_child(&content)?;
    row.append_child(&column)?;
    Ok(row)
}

fn create(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element(tag)?.dyn_into::<HtmlElement>()?)
}

fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).unwrap_or(None)
}

fn first_match(document: &Document, selectors: &[&str]) -> Option<Element> {
    selectors.iter().find_map(|selector| query(document, selector))
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        log::warn!("style {property} update failed: {err:?}");
    }
}

fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .map_or(0.0, |value| value.as_f64().unwrap_or(0.0))
}
