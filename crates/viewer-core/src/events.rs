//! Host input plumbing.
//!
//! An [`EventSource`] owns the platform listeners and turns them into
//! [`InputEvent`]s. Handlers hold only a weak reference to the viewer, so a
//! dropped viewer never stays alive through a dangling listener.

use crate::input::InputEvent;
use crate::renderer::SplatRenderer;
use crate::viewer::Viewer;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Keyboard,
    Pointer,
    Wheel,
    Resize,
    Focus,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Keyboard,
        EventKind::Pointer,
        EventKind::Wheel,
        EventKind::Resize,
        EventKind::Focus,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

/// Returns true when the event was consumed and its default action should
/// be suppressed.
pub type InputHandler = Box<dyn FnMut(InputEvent) -> bool>;

pub trait EventSource {
    fn subscribe(&mut self, kind: EventKind, handler: InputHandler) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Listener registrations made by [`attach_input`].
#[derive(Debug, Default)]
pub struct InputAttachment {
    ids: SmallVec<[SubscriptionId; 5]>,
}

impl InputAttachment {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Remove exactly the listeners that were registered.
    pub fn detach<E: EventSource + ?Sized>(self, source: &mut E) {
        for id in self.ids {
            source.unsubscribe(id);
        }
        log::debug!("[events] input detached");
    }
}

/// Register one handler per event kind, each forwarding into `viewer`.
pub fn attach_input<R, E>(source: &mut E, viewer: &Rc<RefCell<Viewer<R>>>) -> InputAttachment
where
    R: SplatRenderer + 'static,
    E: EventSource + ?Sized,
{
    let mut ids = SmallVec::new();
    for kind in EventKind::ALL {
        let weak: Weak<RefCell<Viewer<R>>> = Rc::downgrade(viewer);
        let handler: InputHandler = Box::new(move |event: InputEvent| {
            let Some(viewer) = weak.upgrade() else {
                return false;
            };
            // Re-entrant dispatch (an event raised while a frame holds the
            // borrow) is dropped rather than panicking.
            let Ok(mut viewer) = viewer.try_borrow_mut() else {
                return false;
            };
            viewer.handle_event(&event)
        });
        ids.push(source.subscribe(kind, handler));
    }
    log::debug!("[events] input attached ({} listeners)", ids.len());
    InputAttachment { ids }
}
