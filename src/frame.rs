use crate::avatar_asset::AvatarMesh;
use crate::overlay::OverlaySync;
use crate::render::{self, WebSurface};
use crate::splat::JsSplatRenderer;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use viewer_core::{FrameOutcome, Viewer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedViewer = Rc<RefCell<Viewer<JsSplatRenderer>>>;

pub struct FrameContext {
    pub viewer: SharedViewer,
    pub surface: WebSurface,
    pub overlay: OverlaySync,
    pub document: web::Document,
    /// Parsed avatar geometry waiting for the GPU (filled by the avatar loader).
    pub pending_mesh: Rc<RefCell<Option<AvatarMesh>>>,
}

impl FrameContext {
    pub fn frame(&mut self) -> FrameOutcome {
        let pending = self.pending_mesh.borrow_mut().take();
        if let (Some(mesh), Some(g)) = (pending, &mut self.surface.gpu) {
            g.upload_mesh(&mesh);
        }

        let Ok(mut viewer) = self.viewer.try_borrow_mut() else {
            return FrameOutcome::Loading;
        };
        let outcome = viewer.frame(Instant::now(), &mut self.surface);
        if outcome != FrameOutcome::Stopped {
            self.overlay.apply(
                &self.document,
                viewer.overlay(),
                viewer.camera(),
                viewer.quality(),
                viewer.collision_active(),
            );
        }
        outcome
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}; avatar layer disabled", e);
            None
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(tick: &Tick) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive `frame_ctx` from requestAnimationFrame until the viewer stops.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Tick = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let outcome = frame_ctx.borrow_mut().frame();
        if outcome == FrameOutcome::Stopped {
            log::info!("[frame] loop stopped");
            return;
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
