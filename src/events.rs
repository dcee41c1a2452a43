//! DOM-backed `EventSource`: window/container listeners and a
//! `ResizeObserver`, translated into viewer input events.

use crate::constants::WHEEL_LINE_HEIGHT_PX;
use crate::dom;
use crate::dom_input::{key_event, KeyFacts};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use viewer_core::{EventKind, EventSource, InputEvent, InputHandler, PointerButton, SubscriptionId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type SharedHandler = Rc<RefCell<InputHandler>>;

struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

#[derive(Default)]
struct Registration {
    listeners: SmallVec<[Listener; 4]>,
    observer: Option<(web::ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>,
}

impl Registration {
    fn remove(self) {
        for l in self.listeners {
            _ = l
                .target
                .remove_event_listener_with_callback(l.event, l.closure.as_ref().unchecked_ref());
        }
        if let Some((observer, _closure)) = self.observer {
            observer.disconnect();
        }
    }
}

pub struct DomEventSource {
    window: web::Window,
    container: web::Element,
    next_id: u32,
    registrations: FnvHashMap<SubscriptionId, Registration>,
}

impl DomEventSource {
    pub fn new(window: web::Window, container: web::Element) -> Self {
        Self {
            window,
            container,
            next_id: 0,
            registrations: FnvHashMap::default(),
        }
    }

    fn listen(
        reg: &mut Registration,
        target: &web::EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(passive);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &opts,
        ) {
            log::warn!("[events] addEventListener({}) failed: {:?}", event, e);
            return;
        }
        reg.listeners.push(Listener {
            target: target.clone(),
            event,
            closure,
        });
    }

    fn wire_keyboard(&self, reg: &mut Registration, handler: &SharedHandler) {
        let window: &web::EventTarget = self.window.as_ref();
        for (name, down) in [("keydown", true), ("keyup", false)] {
            let h = handler.clone();
            Self::listen(reg, window, name, false, move |ev: web::Event| {
                let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() else {
                    return;
                };
                let facts = KeyFacts {
                    code: kev.code(),
                    down,
                    repeat: kev.repeat(),
                    in_form_control: down && targets_form_control(&ev),
                };
                let Some(event) = key_event(facts) else {
                    return;
                };
                if dispatch(&h, event) {
                    ev.prevent_default();
                }
            });
        }
    }

    fn wire_pointer(&self, reg: &mut Registration, handler: &SharedHandler) {
        let container: &web::EventTarget = self.container.as_ref();
        let window: &web::EventTarget = self.window.as_ref();

        let h = handler.clone();
        let el = self.container.clone();
        Self::listen(reg, container, "pointerdown", true, move |ev: web::Event| {
            if let Some(pev) = ev.dyn_ref::<web::PointerEvent>() {
                let (x, y) = local_position(&el, pev);
                let button = PointerButton::from_dom(pev.button());
                dispatch(&h, InputEvent::PointerDown { button, x, y });
            }
        });

        let h = handler.clone();
        let el = self.container.clone();
        Self::listen(reg, window, "pointermove", true, move |ev: web::Event| {
            if let Some(pev) = ev.dyn_ref::<web::PointerEvent>() {
                let (x, y) = local_position(&el, pev);
                dispatch(&h, InputEvent::PointerMove { x, y });
            }
        });

        // Released over the page or outside the container still ends look mode.
        let h = handler.clone();
        Self::listen(reg, window, "pointerup", true, move |ev: web::Event| {
            if let Some(pev) = ev.dyn_ref::<web::PointerEvent>() {
                let button = PointerButton::from_dom(pev.button());
                dispatch(&h, InputEvent::PointerUp { button });
            }
        });

        // A cancelled pointer carries no button; it always ends look mode.
        let h = handler.clone();
        Self::listen(reg, window, "pointercancel", true, move |_ev: web::Event| {
            dispatch(&h, InputEvent::PointerCancel);
        });
    }

    fn wire_wheel(&self, reg: &mut Registration, handler: &SharedHandler) {
        let container: &web::EventTarget = self.container.as_ref();
        let h = handler.clone();
        Self::listen(reg, container, "wheel", false, move |ev: web::Event| {
            let Some(wev) = ev.dyn_ref::<web::WheelEvent>() else {
                return;
            };
            let mut delta_y = wev.delta_y() as f32;
            if wev.delta_mode() == web::WheelEvent::DOM_DELTA_LINE {
                delta_y *= WHEEL_LINE_HEIGHT_PX;
            }
            if dispatch(&h, InputEvent::Wheel { delta_y }) {
                ev.prevent_default();
            }
        });
    }

    fn wire_resize(&self, reg: &mut Registration, handler: &SharedHandler) {
        let window: &web::EventTarget = self.window.as_ref();
        let h = handler.clone();
        let el = self.container.clone();
        Self::listen(reg, window, "resize", true, move |_ev: web::Event| {
            dispatch(&h, InputEvent::Resize(dom::container_size(&el)));
        });

        let h = handler.clone();
        let el = self.container.clone();
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            dispatch(&h, InputEvent::Resize(dom::container_size(&el)));
        }) as Box<dyn FnMut(js_sys::Array)>);
        match web::ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.container);
                reg.observer = Some((observer, closure));
            }
            Err(e) => log::warn!("[events] ResizeObserver unavailable: {:?}", e),
        }
    }

    fn wire_focus(&self, reg: &mut Registration, handler: &SharedHandler) {
        let window: &web::EventTarget = self.window.as_ref();
        let h = handler.clone();
        Self::listen(reg, window, "blur", true, move |_ev: web::Event| {
            dispatch(&h, InputEvent::FocusLost);
        });
    }
}

impl EventSource for DomEventSource {
    fn subscribe(&mut self, kind: EventKind, handler: InputHandler) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let handler: SharedHandler = Rc::new(RefCell::new(handler));
        let mut reg = Registration::default();
        match kind {
            EventKind::Keyboard => self.wire_keyboard(&mut reg, &handler),
            EventKind::Pointer => self.wire_pointer(&mut reg, &handler),
            EventKind::Wheel => self.wire_wheel(&mut reg, &handler),
            EventKind::Resize => self.wire_resize(&mut reg, &handler),
            EventKind::Focus => self.wire_focus(&mut reg, &handler),
        }
        self.registrations.insert(id, reg);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if let Some(reg) = self.registrations.remove(&id) {
            reg.remove();
        }
    }
}

fn dispatch(handler: &SharedHandler, event: InputEvent) -> bool {
    let mut handler = handler.borrow_mut();
    (*handler)(event)
}

fn local_position(el: &web::Element, ev: &web::MouseEvent) -> (f32, f32) {
    let rect = el.get_bounding_client_rect();
    (
        (ev.client_x() as f64 - rect.left()) as f32,
        (ev.client_y() as f64 - rect.top()) as f32,
    )
}

/// Typing into page controls must not drive the camera.
fn targets_form_control(ev: &web::Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "SELECT" | "TEXTAREA"))
        .unwrap_or(false)
}
