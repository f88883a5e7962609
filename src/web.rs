// Browser binding: a full-viewport canvas background driven by
// requestAnimationFrame, window mousemove and window resize.
//
// All closures hold a weak reference to the shared state, and `destroy` (also
// run on drop) cancels the pending frame, clears the decay timer and removes
// both listeners before the closures go away.

use crate::color::{Color, Palette};
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::field::ParticleField;
use crate::renderer::Surface;
use crate::scheduler::FrameHost;
use crate::store::Bounds;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

// Wraps a section in console.time / console.timeEnd
pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    fill_styles: [JsValue; 4],
}

impl CanvasSurface {
    pub fn acquire(canvas: &HtmlCanvasElement) -> Result<CanvasSurface, FieldError> {
        let context = canvas
            .get_context("2d")
            .map_err(|_| FieldError::SurfaceUnavailable)?
            .ok_or(FieldError::SurfaceUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FieldError::SurfaceUnavailable)?;
        let fill_styles = [
            JsValue::from_str(&Palette::Cyan.color().to_css()),
            JsValue::from_str(&Palette::Purple.color().to_css()),
            JsValue::from_str(&Palette::Pink.color().to_css()),
            JsValue::from_str(&Palette::Blue.color().to_css()),
        ];
        Ok(CanvasSurface { context, fill_styles })
    }

    fn fill_style(&self, color: Palette) -> &JsValue {
        match color {
            Palette::Cyan => &self.fill_styles[0],
            Palette::Purple => &self.fill_styles[1],
            Palette::Pink => &self.fill_styles[2],
            Palette::Blue => &self.fill_styles[3],
        }
    }
}

impl Surface for CanvasSurface {
    type Error = JsValue;

    fn clear(&mut self, bounds: Bounds) {
        self.context.clear_rect(0.0, 0.0, bounds.width, bounds.height);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: Palette, alpha: f64) -> Result<(), JsValue> {
        self.context.set_global_alpha(alpha);
        self.context.set_fill_style(self.fill_style(color));
        self.context.begin_path();
        self.context
            .arc(center[0], center[1], radius, 0.0, std::f64::consts::PI * 2.0)?;
        self.context.fill();
        Ok(())
    }

    // resizing the canvas resets the context, so this runs every frame
    #[allow(deprecated)]
    fn set_stroke(&mut self, color: Color, width: f64) {
        self.context.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.context.set_line_width(width);
    }

    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], alpha: f64) {
        self.context.set_global_alpha(alpha);
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.stroke();
    }
}

type Callback = Closure<dyn FnMut()>;

pub struct WebHost {
    window: Window,
    on_frame: Option<Callback>,
    on_decay: Option<Callback>,
}

impl WebHost {
    fn callback(cb: &Option<Callback>, what: &str) -> Result<js_sys::Function, FieldError> {
        cb.as_ref()
            .map(|cb| cb.as_ref().unchecked_ref::<js_sys::Function>().clone())
            .ok_or_else(|| FieldError::Host(format!("{} callback not installed", what)))
    }
}

impl FrameHost for WebHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Result<i32, FieldError> {
        let cb = WebHost::callback(&self.on_frame, "frame")?;
        Ok(self.window.request_animation_frame(&cb)?)
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }

    fn set_timeout(&mut self, delay_ms: u32) -> Result<i32, FieldError> {
        let cb = WebHost::callback(&self.on_decay, "decay")?;
        Ok(self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&cb, delay_ms as i32)?)
    }

    fn clear_timeout(&mut self, handle: i32) {
        self.window.clear_timeout_with_handle(handle);
    }
}

struct State {
    field: ParticleField<WebHost>,
    surface: CanvasSurface,
    host: WebHost,
    canvas: HtmlCanvasElement,
}

impl State {
    // canvas attributes follow the window, then the store is rebuilt
    fn fit_to_window(&mut self) {
        let (width, height) = window_size(&self.host.window);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.field.resize(width, height);
    }
}

fn window_size(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width.floor(), height.floor())
}

struct Listeners {
    window: Window,
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_resize: Callback,
}

impl Listeners {
    fn attach(window: &Window, state: &Rc<RefCell<State>>) -> Result<Listeners, FieldError> {
        let weak = Rc::downgrade(state);
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            with_state(&weak, |s| {
                let x = event.client_x() as f64;
                let y = event.client_y() as f64;
                if let Err(e) = s.field.pointer_moved(x, y, &mut s.host) {
                    log::warn!("pointer move ignored: {}", e);
                }
            });
        }) as Box<dyn FnMut(MouseEvent)>);

        let weak = Rc::downgrade(state);
        let on_resize = Closure::wrap(Box::new(move || {
            with_state(&weak, State::fit_to_window);
        }) as Box<dyn FnMut()>);

        let listeners = Listeners {
            window: window.clone(),
            on_move,
            on_resize,
        };
        if let Err(e) = listeners.add() {
            listeners.detach();
            return Err(e.into());
        }
        Ok(listeners)
    }

    fn add(&self) -> Result<(), JsValue> {
        self.window
            .add_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref())?;
        self.window
            .add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
    }

    fn detach(&self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
    }
}

fn with_state<T>(weak: &Weak<RefCell<State>>, f: impl FnOnce(&mut State) -> T) -> Option<T> {
    let state = weak.upgrade()?;
    let mut state = state.try_borrow_mut().ok()?;
    Some(f(&mut state))
}

struct Mounted {
    state: Rc<RefCell<State>>,
    listeners: Listeners,
}

/// Decorative particle background painted onto a dedicated canvas. If the
/// canvas has no 2d context the handle stays inert: nothing is listened to
/// and nothing is scheduled.
#[wasm_bindgen]
pub struct ParticleBackground {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl ParticleBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> ParticleBackground {
        ParticleBackground::mount(canvas, FieldConfig::default())
    }

    pub fn is_running(&self) -> bool {
        self.mounted
            .as_ref()
            .map_or(false, |m| m.state.borrow().field.scheduler().is_running())
    }

    pub fn particle_count(&self) -> usize {
        self.mounted
            .as_ref()
            .map_or(0, |m| m.state.borrow().field.store().len())
    }

    pub fn last_edge_count(&self) -> usize {
        self.mounted
            .as_ref()
            .map_or(0, |m| m.state.borrow().field.last_stats().edges)
    }

    /// Stops the loop and releases every browser callback. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.listeners.detach();
            let mut state = mounted.state.borrow_mut();
            let State { field, host, .. } = &mut *state;
            field.teardown(host);
            log::info!("particle background destroyed");
        }
    }
}

impl ParticleBackground {
    pub fn mount(canvas: HtmlCanvasElement, config: FieldConfig) -> ParticleBackground {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                FieldConfig::default()
            }
        };
        match ParticleBackground::try_mount(canvas, config) {
            Ok(mounted) => ParticleBackground { mounted: Some(mounted) },
            Err(e) => {
                log::warn!("particle background disabled: {}", e);
                ParticleBackground { mounted: None }
            }
        }
    }

    fn try_mount(canvas: HtmlCanvasElement, config: FieldConfig) -> Result<Mounted, FieldError> {
        let window = web_sys::window().ok_or_else(|| FieldError::Host("no window".to_owned()))?;
        let surface = CanvasSurface::acquire(&canvas)?;
        let rng = StdRng::from_rng(rand::thread_rng()).map_err(|e| FieldError::Host(e.to_string()))?;

        let state = Rc::new(RefCell::new(State {
            field: ParticleField::new(config, rng),
            surface,
            host: WebHost {
                window: window.clone(),
                on_frame: None,
                on_decay: None,
            },
            canvas,
        }));

        let weak = Rc::downgrade(&state);
        let on_frame = Closure::wrap(Box::new(move || {
            #[cfg(feature = "frame-timing")]
            let _timer = Timer::new("ParticleBackground::frame");
            with_state(&weak, |s| {
                if let Err(e) = s.field.on_frame(&mut s.surface, &mut s.host) {
                    log::error!("frame loop stopped: {}", e);
                }
            });
        }) as Box<dyn FnMut()>);

        let weak = Rc::downgrade(&state);
        let on_decay = Closure::wrap(Box::new(move || {
            with_state(&weak, |s| s.field.pointer_decayed());
        }) as Box<dyn FnMut()>);

        {
            let mut s = state.borrow_mut();
            s.host.on_frame = Some(on_frame);
            s.host.on_decay = Some(on_decay);
            s.fit_to_window();
        }

        let listeners = Listeners::attach(&window, &state)?;
        let started = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            s.field.start(&mut s.host)
        };
        if let Err(e) = started {
            listeners.detach();
            return Err(e);
        }
        log::info!(
            "particle background mounted with {} particles",
            state.borrow().field.store().len()
        );

        Ok(Mounted { state, listeners })
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.destroy();
    }
}
