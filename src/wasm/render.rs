use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::backdrop::{Backdrop, FrameScheduler};
use crate::config::{Config, Rgb};
use crate::error::{BackdropError, Result};
use crate::geometry::Point;
use crate::paint::{Fill, Surface};
use crate::resize::Dimensions;

/// 2-D context of the backdrop canvas plus the container it sizes.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    container: HtmlElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, container: HtmlElement) -> Result<Self> {
        // Opaque context: the backdrop always paints every pixel.
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::FALSE)?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context_with_context_options("2d", &options)?
            .ok_or(BackdropError::NoContext)?
            .dyn_into()
            .map_err(|_| BackdropError::NoContext)?;

        set_css(&container, "min-height", "100vh");

        Ok(Self {
            canvas,
            container,
            ctx,
            width: 0.0,
            height: 0.0,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn trace(&self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
    }

    fn fill_style(&self, fill: &Fill) -> JsValue {
        match fill {
            Fill::Solid(color) => JsValue::from_str(&color.to_css()),
            Fill::Linear {
                from,
                to,
                start,
                end,
            } => {
                let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
                let stops = gradient
                    .add_color_stop(0.0, &start.to_css())
                    .and_then(|_| gradient.add_color_stop(1.0, &end.to_css()));
                match stops {
                    Ok(()) => gradient.into(),
                    Err(err) => {
                        log::debug!("gradient stop rejected: {err:?}");
                        JsValue::from_str(&start.to_css())
                    }
                }
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, dims: Dimensions) {
        let (device_w, device_h) = dims.device_size();
        self.canvas.set_width(device_w);
        self.canvas.set_height(device_h);
        set_css(&self.canvas, "width", &format!("{}px", dims.width));
        set_css(&self.canvas, "height", &format!("{}px", dims.height));
        set_css(&self.container, "height", &format!("{}px", dims.height));
        set_css(&self.container, "opacity", "1");

        // Resizing the backing store resets the transform; draw in CSS pixels.
        if let Err(err) = self.ctx.set_transform(dims.dpr, 0.0, 0.0, dims.dpr, 0.0, 0.0) {
            log::debug!("setTransform failed: {err:?}");
        }
        self.width = f64::from(dims.width);
        self.height = f64::from(dims.height);
    }

    fn clear(&mut self, color: Rgb) {
        set_style(&self.ctx, "fillStyle", &JsValue::from_str(&color.to_css()));
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_polygon(&mut self, points: &[Point], fill: &Fill) {
        let style = self.fill_style(fill);
        set_style(&self.ctx, "fillStyle", &style);
        self.trace(points);
        self.ctx.fill();
    }

    fn stroke_polygon(&mut self, points: &[Point], alpha: f64) {
        set_style(
            &self.ctx,
            "strokeStyle",
            &JsValue::from_str(&format!("rgba(0,0,0,{alpha})")),
        );
        self.ctx.set_line_width(1.0);
        self.trace(points);
        self.ctx.stroke();
    }
}

// Setting the style properties through Reflect accepts both CSS strings and
// gradient objects without going through the deprecated typed setters.
fn set_style(ctx: &CanvasRenderingContext2d, property: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str(property), value);
}

fn set_css(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        log::debug!("could not set {property}: {err:?}");
    }
}

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame`-backed scheduler.
///
/// The slot holds the frame closure; it is filled in by [`install`] once the
/// stage the closure drives exists. Clones share the slot and the pending
/// request, so the frame closure can reschedule itself through its own copy.
#[derive(Clone)]
pub struct RafScheduler {
    slot: FrameSlot,
    handle: Rc<Cell<Option<i32>>>,
}

impl RafScheduler {
    /// True while an animation-frame request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let Some(win) = window() else {
            return;
        };
        let slot = self.slot.borrow();
        let Some(callback) = slot.as_ref() else {
            return;
        };
        match win.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
        }
    }

    fn cancel(&mut self) {
        if let (Some(id), Some(win)) = (self.handle.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
    }
}

pub struct Stage {
    pub backdrop: Backdrop<RafScheduler>,
    pub surface: CanvasSurface,
}

pub type SharedStage = Rc<RefCell<Stage>>;

/// Build the stage and its animation-frame callback. The loop does not run
/// until `backdrop.start()` is called.
pub fn install(config: Config, seed: u32, surface: CanvasSurface) -> SharedStage {
    // `slot` holds the animation-frame closure so that the scheduler can keep
    // calling `request_animation_frame` with it from inside the closure itself.
    let slot: FrameSlot = Rc::new(RefCell::new(None));
    let scheduler = RafScheduler {
        slot: slot.clone(),
        handle: Rc::new(Cell::new(None)),
    };
    let mut retry = scheduler.clone();
    let stage = Rc::new(RefCell::new(Stage {
        backdrop: Backdrop::new(config, seed, scheduler),
        surface,
    }));

    let frame_stage = stage.clone();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        retry.handle.set(None);
        // An event handler holds the stage; keep the loop alive and try again
        // next frame. `stop` cancels the retry like any other request.
        let Ok(mut stage) = frame_stage.try_borrow_mut() else {
            log::debug!("stage busy; frame deferred");
            retry.request_frame();
            return;
        };
        let Stage { backdrop, surface } = &mut *stage;
        backdrop.tick(now, surface);
    }) as Box<dyn FnMut(f64)>));

    stage
}

impl From<JsValue> for BackdropError {
    fn from(value: JsValue) -> Self {
        BackdropError::Js(format!("{value:?}"))
    }
}
