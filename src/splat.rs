//! Binding to the host-provided splat engine.
//!
//! The engine bundle exposes a global `SplatEngine` with
//! `load(config, onReady, onProgress, onError)`. The handle passed to
//! `onReady` carries the LOD setters, an optional `hasCollision` capability
//! and `intersectsCapsule`, and an `update()` called once per frame.

use crate::constants::SPLAT_ENGINE_GLOBAL;
use glam::Vec3;
use js_sys::{Array, Float32Array, Function, Object, Reflect};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Weak;
use viewer_core::{
    CameraState, CapsuleHit, CollisionCapsule, LoadRequest, SplatRenderer, Viewer,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    /// Loaded scene handle returned by the engine.
    pub type SplatHandle;

    #[wasm_bindgen(method, catch, js_name = setMaxDistance)]
    fn set_max_distance(this: &SplatHandle, distance: f32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setMaxSplats)]
    fn set_max_splats(this: &SplatHandle, splats: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setMaxNodeSplats)]
    fn set_max_node_splats(this: &SplatHandle, splats: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = intersectsCapsule)]
    fn intersects_capsule(this: &SplatHandle, capsule: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn update(this: &SplatHandle) -> Result<(), JsValue>;
}

#[derive(Serialize, Deserialize, Default, Clone, Copy)]
#[serde(default)]
struct Vec3Js {
    x: f32,
    y: f32,
    z: f32,
}

impl From<Vec3> for Vec3Js {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

#[derive(Serialize)]
struct CapsuleJs {
    start: Vec3Js,
    end: Vec3Js,
    radius: f32,
    delta: Vec3Js,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct HitJs {
    hit: bool,
    delta: Vec3Js,
}

/// `SplatRenderer` over a JS engine handle.
pub struct JsSplatRenderer {
    handle: SplatHandle,
    camera: Object,
}

impl JsSplatRenderer {
    pub fn new(handle: SplatHandle, camera: Object) -> Self {
        Self { handle, camera }
    }
}

fn warn_js(what: &str, r: Result<(), JsValue>) {
    if let Err(e) = r {
        log::warn!("[splat] {} failed: {:?}", what, e);
    }
}

impl SplatRenderer for JsSplatRenderer {
    fn set_max_distance(&mut self, distance: f32) {
        warn_js("setMaxDistance", self.handle.set_max_distance(distance));
    }

    fn set_max_splats(&mut self, splats: u32) {
        warn_js("setMaxSplats", self.handle.set_max_splats(splats));
    }

    fn set_max_node_splats(&mut self, splats: u32) {
        warn_js("setMaxNodeSplats", self.handle.set_max_node_splats(splats));
    }

    fn has_collision(&self) -> bool {
        let Ok(probe) = Reflect::get(&self.handle, &JsValue::from_str("hasCollision")) else {
            return false;
        };
        match probe.dyn_ref::<Function>() {
            Some(f) => f
                .call0(&self.handle)
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            None => probe.as_bool().unwrap_or(false),
        }
    }

    #[allow(deprecated)]
    fn intersects_capsule(&mut self, capsule: &CollisionCapsule) -> Option<CapsuleHit> {
        let arg = JsValue::from_serde(&CapsuleJs {
            start: capsule.start.into(),
            end: capsule.end.into(),
            radius: capsule.radius,
            delta: capsule.delta.into(),
        })
        .ok()?;
        let result = match self.handle.intersects_capsule(&arg) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("[collision] intersectsCapsule threw: {:?}", e);
                return None;
            }
        };
        if result.is_null() || result.is_undefined() {
            return None;
        }
        let hit: HitJs = result.into_serde().ok()?;
        Some(CapsuleHit {
            hit: hit.hit,
            delta: Vec3::new(hit.delta.x, hit.delta.y, hit.delta.z),
        })
    }

    fn sync_camera(&mut self, camera: &CameraState) {
        write_camera(&self.camera, camera);
    }

    fn update(&mut self) {
        warn_js("update", self.handle.update());
    }
}

fn set_prop(target: &Object, key: &str, value: &JsValue) {
    _ = Reflect::set(target, &JsValue::from_str(key), value);
}

/// Refresh the camera proxy the engine reads its view from.
pub fn write_camera(proxy: &Object, camera: &CameraState) {
    let q = camera.orientation();
    set_prop(
        proxy,
        "position",
        &Float32Array::from(&camera.position.to_array()[..]),
    );
    set_prop(proxy, "quaternion", &Float32Array::from(&q.to_array()[..]));
    set_prop(proxy, "fov", &JsValue::from_f64(camera.fov_deg as f64));
    set_prop(proxy, "aspect", &JsValue::from_f64(camera.aspect as f64));
    set_prop(proxy, "near", &JsValue::from_f64(camera.near as f64));
    set_prop(proxy, "far", &JsValue::from_f64(camera.far as f64));
    set_prop(
        proxy,
        "viewMatrix",
        &Float32Array::from(&camera.view_matrix().to_cols_array()[..]),
    );
    set_prop(
        proxy,
        "projectionMatrix",
        &Float32Array::from(&camera.projection_matrix().to_cols_array()[..]),
    );
}

/// Start loading `request.url` into `container`. Completion callbacks are
/// routed to `viewer`; callbacks after teardown are dropped by the viewer.
pub fn load(
    request: LoadRequest,
    container: &web::Element,
    viewer: Weak<RefCell<Viewer<JsSplatRenderer>>>,
    initial: &CameraState,
) -> anyhow::Result<()> {
    let engine = Reflect::get(&js_sys::global(), &JsValue::from_str(SPLAT_ENGINE_GLOBAL))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if engine.is_undefined() || engine.is_null() {
        anyhow::bail!("global `{}` is not loaded", SPLAT_ENGINE_GLOBAL);
    }
    let load_fn: Function = Reflect::get(&engine, &JsValue::from_str("load"))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("`{}.load` is not a function", SPLAT_ENGINE_GLOBAL))?;

    let camera = Object::new();
    write_camera(&camera, initial);
    let config = Object::new();
    set_prop(&config, "url", &JsValue::from_str(&request.url));
    set_prop(&config, "container", container);
    set_prop(&config, "camera", &camera);

    let LoadRequest { token, .. } = request;

    let ready_viewer = viewer.clone();
    let ready_token = token.clone();
    let on_ready = Closure::once_into_js(move |handle: JsValue| {
        let Some(v) = ready_viewer.upgrade() else {
            return;
        };
        let renderer = JsSplatRenderer::new(handle.unchecked_into(), camera);
        match v.try_borrow_mut() {
            Ok(mut v) => {
                v.on_renderer_ready(&ready_token, renderer);
            }
            Err(_) => log::error!("[load] renderer ready while viewer was busy; dropped"),
        };
    });

    let progress_viewer = viewer.clone();
    let progress_token = token.clone();
    let on_progress = Closure::wrap(Box::new(move |p: f64| {
        if let Some(v) = progress_viewer.upgrade() {
            if let Ok(mut v) = v.try_borrow_mut() {
                v.on_renderer_progress(&progress_token, p as f32);
            }
        }
    }) as Box<dyn FnMut(f64)>);

    let error_viewer = viewer;
    let on_error = Closure::once_into_js(move |err: JsValue| {
        let message = err
            .as_string()
            .or_else(|| {
                err.dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{:?}", err));
        let Some(v) = error_viewer.upgrade() else {
            return;
        };
        let handled = match v.try_borrow_mut() {
            Ok(mut v) => {
                v.on_renderer_failed(&token, &message);
                true
            }
            Err(_) => false,
        };
        if !handled {
            log::error!("[load] scene data failed: {}", message);
        }
    });

    let args = Array::of4(&config, &on_ready, on_progress.as_ref(), &on_error);
    let result = load_fn.apply(&engine, &args);
    // Progress may fire until the engine settles; the token makes late calls inert.
    on_progress.forget();
    result.map_err(|e| anyhow::anyhow!("{}.load threw: {:?}", SPLAT_ENGINE_GLOBAL, e))?;
    Ok(())
}
