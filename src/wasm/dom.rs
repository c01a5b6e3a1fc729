//! Host page lookups and event wiring.

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, Document, HtmlCanvasElement, HtmlElement, HtmlInputElement, MediaQueryList,
    MouseEvent, UrlSearchParams, Window,
};

use super::render::{self, CanvasSurface, SharedStage, Stage};
use crate::backdrop::Event;
use crate::config::Config;
use crate::error::{BackdropError, Result};
use crate::resize::Dimensions;
use crate::rng::parse_seed;

pub const CANVAS_ID: &str = "voronoi-canvas";
pub const CONTAINER_ID: &str = "shape-grid";
pub const TOGGLE_ID: &str = "anim-toggle-checkbox";
const REDUCED_MOTION: &str = "(prefers-reduced-motion: reduce)";

/// Attach the backdrop to the current page and start it.
pub fn mount() -> Result<SharedStage> {
    let window = window().ok_or(BackdropError::NoBrowserApi("window"))?;
    let document = window
        .document()
        .ok_or(BackdropError::NoBrowserApi("document"))?;

    let canvas: HtmlCanvasElement = element(&document, CANVAS_ID)?;
    let container: HtmlElement = element(&document, CONTAINER_ID)?;

    let seed = seed_from_location(&window).unwrap_or_else(random_seed);
    log::info!("Voronoi seed: {seed}");
    let config = config_from_canvas(&canvas);
    let debounce_ms = config.resize_debounce_ms;
    let poll_ms = config.resize_poll_ms;

    let surface = CanvasSurface::new(canvas, container)?;
    let stage = render::install(config, seed, surface);

    let motion = MotionControls {
        reduced: window.match_media(REDUCED_MOTION).ok().flatten(),
        toggle: document
            .get_element_by_id(TOGGLE_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok()),
    };
    if let Some(toggle) = &motion.toggle {
        toggle.set_checked(true);
    }

    wire_pointer(&stage, &window, &document)?;
    wire_resize(&stage, &window, &document, debounce_ms, poll_ms)?;
    wire_motion(&stage, &motion)?;

    schedule_resize(&stage, &window, &document, debounce_ms);
    motion.apply(&stage);
    Ok(stage)
}

pub fn now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

fn element<T: JsCast>(document: &Document, id: &'static str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or(BackdropError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| BackdropError::WrongElementType(id))
}

fn seed_from_location(window: &Window) -> Option<u32> {
    let search = window.location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    params.get("seed").as_deref().and_then(parse_seed)
}

fn random_seed() -> u32 {
    (js_sys::Math::random() * 999_999.0).floor() as u32
}

fn config_from_canvas(canvas: &HtmlCanvasElement) -> Config {
    let Some(json) = canvas.get_attribute("data-config") else {
        return Config::default();
    };
    Config::from_json(&json).unwrap_or_else(|err| {
        log::warn!("ignoring data-config: {err}");
        Config::default()
    })
}

/// Canvas size covering all scrollable content, not just the first screen.
pub fn measure(window: &Window, document: &Document) -> Dimensions {
    let px = |v: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    let width = px(window.inner_width());
    let viewport_height = px(window.inner_height());

    let footer = document
        .query_selector("footer")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let content_height = match footer {
        Some(footer) => f64::from(footer.offset_top() + footer.offset_height()),
        None => document
            .document_element()
            .map_or(0.0, |el| f64::from(el.scroll_height())),
    };

    let dpr = window.device_pixel_ratio();
    Dimensions::new(
        width.floor().max(0.0) as u32,
        viewport_height.max(content_height).floor().max(0.0) as u32,
        if dpr > 0.0 { dpr } else { 1.0 },
    )
}

/// Run `f` on the stage unless a frame currently holds it.
fn with_stage(stage: &SharedStage, f: impl FnOnce(&mut Stage)) {
    match stage.try_borrow_mut() {
        Ok(mut stage) => f(&mut stage),
        Err(_) => log::debug!("stage busy; event dropped"),
    }
}

fn wire_pointer(stage: &SharedStage, window: &Window, document: &Document) -> Result<()> {
    let on_move = {
        let stage = stage.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let x = f64::from(e.client_x()) + window.scroll_x().unwrap_or(0.0);
            let y = f64::from(e.client_y()) + window.scroll_y().unwrap_or(0.0);
            with_stage(&stage, |s| s.backdrop.update(Event::PointerMove { x, y }, now()));
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let on_leave = {
        let stage = stage.clone();
        Closure::wrap(Box::new(move || {
            with_stage(&stage, |s| s.backdrop.update(Event::PointerLeave, now()));
        }) as Box<dyn FnMut()>)
    };
    if let Some(root) = document.document_element() {
        root.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
    }
    on_leave.forget();
    Ok(())
}

/// Feed a fresh measurement to the coordinator and settle it once the quiet
/// period has passed, whether or not the frame loop is running.
fn schedule_resize(stage: &SharedStage, window: &Window, document: &Document, debounce_ms: f64) {
    let dims = measure(window, document);
    with_stage(stage, |s| s.backdrop.update(Event::Resize(dims), now()));

    let settle_stage = stage.clone();
    let callback = Closure::once_into_js(move || settle(&settle_stage));
    let delay = (debounce_ms.ceil() as i32).saturating_add(1);
    if let Err(err) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        log::debug!("setTimeout failed: {err:?}");
    }
}

fn settle(stage: &SharedStage) {
    with_stage(stage, |s| {
        let Stage { backdrop, surface } = s;
        backdrop.settle(now(), surface);
    });
}

fn wire_resize(
    stage: &SharedStage,
    window: &Window,
    document: &Document,
    debounce_ms: f64,
    poll_ms: u32,
) -> Result<()> {
    let on_resize = {
        let stage = stage.clone();
        let window = window.clone();
        let document = document.clone();
        Closure::wrap(Box::new(move || {
            schedule_resize(&stage, &window, &document, debounce_ms);
        }) as Box<dyn FnMut()>)
    };
    for name in ["resize", "orientationchange"] {
        window.add_event_listener_with_callback(name, on_resize.as_ref().unchecked_ref())?;
    }
    on_resize.forget();

    // Content can grow without a window resize; poll the page size as well.
    let on_poll = {
        let stage = stage.clone();
        let window = window.clone();
        let document = document.clone();
        let mut last = measure(&window, &document);
        Closure::wrap(Box::new(move || {
            let dims = measure(&window, &document);
            if dims.differs_from(&last) {
                last = dims;
                schedule_resize(&stage, &window, &document, debounce_ms);
            }
        }) as Box<dyn FnMut()>)
    };
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        on_poll.as_ref().unchecked_ref(),
        poll_ms.min(i32::MAX as u32) as i32,
    )?;
    on_poll.forget();
    Ok(())
}

/// The loop runs unless reduced motion is preferred or the toggle is off.
#[derive(Clone)]
struct MotionControls {
    reduced: Option<MediaQueryList>,
    toggle: Option<HtmlInputElement>,
}

impl MotionControls {
    fn should_run(&self) -> bool {
        let reduced = self.reduced.as_ref().map_or(false, MediaQueryList::matches);
        let enabled = self.toggle.as_ref().map_or(true, HtmlInputElement::checked);
        enabled && !reduced
    }

    fn apply(&self, stage: &SharedStage) {
        let run = self.should_run();
        with_stage(stage, |s| {
            let Stage { backdrop, surface } = s;
            backdrop.set_animated(run, surface);
        });
    }
}

fn wire_motion(stage: &SharedStage, motion: &MotionControls) -> Result<()> {
    let on_change = {
        let stage = stage.clone();
        let motion = motion.clone();
        Closure::wrap(Box::new(move || motion.apply(&stage)) as Box<dyn FnMut()>)
    };
    if let Some(query) = &motion.reduced {
        query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    }
    if let Some(toggle) = &motion.toggle {
        toggle.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    }
    on_change.forget();
    Ok(())
}
