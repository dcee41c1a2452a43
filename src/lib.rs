#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};
use viewer_core::{attach_input, InputAttachment, QualityProfile, Viewer, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

mod avatar_asset;
mod constants;
mod dom;
mod dom_input;
mod events;
mod frame;
mod overlay;
mod render;
mod splat;

use constants::*;
use events::DomEventSource;
use frame::{FrameContext, SharedViewer};
use splat::JsSplatRenderer;

static STARTED: AtomicBool = AtomicBool::new(false);

struct MountedApp {
    viewer: SharedViewer,
    source: DomEventSource,
    attachment: InputAttachment,
}

thread_local! {
    static MOUNTED: RefCell<Option<MountedApp>> = const { RefCell::new(None) };
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

async fn fetch_ok(window: &web::Window, url: &str) -> anyhow::Result<web::Response> {
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?;
    let resp: web::Response = resp.dyn_into().map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("GET {} returned {}", url, resp.status());
    }
    Ok(resp)
}

async fn fetch_text(window: &web::Window, url: &str) -> anyhow::Result<String> {
    let resp = fetch_ok(window, url).await?;
    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    text.as_string()
        .ok_or_else(|| anyhow::anyhow!("GET {} did not return text", url))
}

async fn fetch_bytes(window: &web::Window, url: &str) -> anyhow::Result<Vec<u8>> {
    let resp = fetch_ok(window, url).await?;
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Optional JSON config named by the container; defaults on any failure.
async fn load_config(window: &web::Window, container: &web::Element) -> ViewerConfig {
    let Some(url) = container.get_attribute(CONFIG_URL_ATTR) else {
        return ViewerConfig::default();
    };
    let parsed = match fetch_text(window, &url).await {
        Ok(text) => ViewerConfig::from_json(&text).map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    match parsed {
        Ok(cfg) => {
            log::info!("[config] loaded {}", url);
            cfg
        }
        Err(e) => {
            log::warn!("[config] {}: {:#}; using defaults", url, e);
            ViewerConfig::default()
        }
    }
}

fn with_viewer(
    weak: &Weak<RefCell<Viewer<JsSplatRenderer>>>,
    f: impl FnOnce(&mut Viewer<JsSplatRenderer>),
) {
    let Some(viewer) = weak.upgrade() else {
        return;
    };
    let Ok(mut viewer) = viewer.try_borrow_mut() else {
        log::debug!("[ui] viewer busy; control ignored");
        return;
    };
    f(&mut viewer);
}

fn wire_controls(document: &web::Document, viewer: &SharedViewer) {
    let weak = Rc::downgrade(viewer);
    dom::add_click_listener(document, AVATAR_BUTTON_ID, move || {
        with_viewer(&weak, |v| {
            if v.toggle_avatar().is_none() {
                log::debug!("[avatar] toggle ignored; not loaded");
            }
        });
    });

    let weak = Rc::downgrade(viewer);
    dom::add_click_listener(document, INFO_BUTTON_ID, move || {
        with_viewer(&weak, |v| {
            v.toggle_info();
        });
    });

    let weak = Rc::downgrade(viewer);
    dom::add_click_listener(document, RESET_BUTTON_ID, move || {
        with_viewer(&weak, |v| v.reset_camera());
    });

    let weak = Rc::downgrade(viewer);
    dom::add_select_listener(document, QUALITY_SELECT_ID, move |value| {
        match value.parse::<QualityProfile>() {
            Ok(profile) => with_viewer(&weak, |v| {
                v.set_quality(profile);
            }),
            Err(e) => log::warn!("[quality] {}", e),
        }
    });
    let current = viewer.borrow().quality();
    dom::set_select_value(document, QUALITY_SELECT_ID, current.as_str());
}

fn start_renderer_load(
    window: &web::Window,
    container: &web::Element,
    viewer: &SharedViewer,
) -> anyhow::Result<()> {
    let data_url = container.get_attribute(DATA_URL_ATTR).unwrap_or_default();
    let origin = window.location().origin().map_err(js_err)?;
    let request = viewer.borrow_mut().begin_renderer_load(&data_url, &origin)?;
    let initial = *viewer.borrow().camera();
    let token = request.token.clone();
    if let Err(e) = splat::load(request, container, Rc::downgrade(viewer), &initial) {
        viewer
            .borrow_mut()
            .on_renderer_failed(&token, &format!("{:#}", e));
    }
    Ok(())
}

fn start_avatar_load(
    window: &web::Window,
    viewer: &SharedViewer,
    pending_mesh: &Rc<RefCell<Option<avatar_asset::AvatarMesh>>>,
) {
    let begin = viewer.borrow_mut().begin_avatar_load();
    let Some((url, token)) = begin else {
        log::info!("[avatar] no avatar configured");
        return;
    };
    let window = window.clone();
    let weak = Rc::downgrade(viewer);
    let pending = pending_mesh.clone();
    spawn_local(async move {
        let asset = match fetch_bytes(&window, &url).await {
            Ok(bytes) => avatar_asset::parse_avatar(&bytes),
            Err(e) => Err(e),
        };
        with_viewer(&weak, |v| match asset {
            Ok(asset) => {
                let nodes = asset.rig.nodes.len();
                if v.on_avatar_ready(&token, asset.rig) {
                    log::info!(
                        "[avatar] ready: {} nodes, {} triangles",
                        nodes,
                        asset.mesh.indices.len() / 3
                    );
                    *pending.borrow_mut() = Some(asset.mesh);
                }
            }
            Err(e) => v.on_avatar_failed(&token, &format!("{:#}", e)),
        });
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("survey-viewer-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    if STARTED.swap(true, Ordering::SeqCst) {
        log::warn!("[mount] viewer already mounted");
        return Ok(());
    }
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let container = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CONTAINER_ID))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let config = load_config(&window, &container).await;
    let viewer: SharedViewer = Rc::new(RefCell::new(Viewer::new(config)));
    viewer
        .borrow_mut()
        .mount(dom::container_size(&container))?;

    let gpu = frame::init_gpu(&canvas).await;

    let mut source = DomEventSource::new(window.clone(), container.clone());
    let attachment = attach_input(&mut source, &viewer);
    wire_controls(&document, &viewer);

    if let Err(e) = start_renderer_load(&window, &container, &viewer) {
        log::error!("[load] {:#}", e);
    }
    let pending_mesh = Rc::new(RefCell::new(None));
    start_avatar_load(&window, &viewer, &pending_mesh);

    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        viewer: viewer.clone(),
        surface: render::WebSurface {
            container,
            canvas,
            gpu,
        },
        overlay: overlay::OverlaySync::new(),
        document,
        pending_mesh,
    }));
    frame::start_loop(frame_ctx);

    MOUNTED.with(|m| {
        *m.borrow_mut() = Some(MountedApp {
            viewer,
            source,
            attachment,
        });
    });
    Ok(())
}

/// Tear the viewer down: stop the frame loop, cancel loads and remove every
/// listener registered at mount.
#[wasm_bindgen]
pub fn unmount() {
    let Some(app) = MOUNTED.with(|m| m.borrow_mut().take()) else {
        log::debug!("[mount] unmount without a mounted viewer");
        return;
    };
    let MountedApp {
        viewer,
        mut source,
        attachment,
    } = app;
    match viewer.try_borrow_mut() {
        Ok(mut v) => v.teardown(),
        Err(_) => log::warn!("[mount] viewer busy during unmount"),
    };
    attachment.detach(&mut source);
    STARTED.store(false, Ordering::SeqCst);
}
