//! Browser host (`web` feature).
//!
//! [`mount`] binds a [`GlintEngine`](crate::GlintEngine) to the current
//! page. DOM callbacks never touch the engine directly: they post an
//! `Inbound` message to a shared `Inbox`, and the driver drains it
//! while holding the only mutable borrow of the engine. Callbacks fired
//! synchronously by the engine's own DOM mutations are queued and handled
//! by the drain already in progress.

mod document;
mod driver;

use std::cell::RefCell;
use std::collections::VecDeque;

pub use document::WebDocument;
pub use driver::{mount, GlintHandle};

use crate::dom::{ElementId, InputEvent};

/// Install the panic hook and route `log` output to the browser console.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        log::debug!("glint: console logger already installed");
    }
}

/// A host notification waiting for the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Inbound {
    Event {
        element: ElementId,
        event: InputEvent,
    },
    Intersection {
        element: ElementId,
        ratio: f32,
        intersecting: bool,
    },
}

/// Queue between DOM callbacks and the driver.
#[derive(Default)]
pub(crate) struct Inbox {
    queue: RefCell<VecDeque<Inbound>>,
    waker: RefCell<Option<Box<dyn Fn()>>>,
}

impl Inbox {
    /// Queue a message and wake the driver.
    pub(crate) fn push(&self, message: Inbound) {
        self.queue.borrow_mut().push_back(message);
        if let Ok(waker) = self.waker.try_borrow() {
            if let Some(wake) = waker.as_ref() {
                wake();
            }
        }
    }

    pub(crate) fn pop(&self) -> Option<Inbound> {
        self.queue.borrow_mut().pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub(crate) fn clear(&self) {
        self.queue.borrow_mut().clear();
    }

    pub(crate) fn set_waker(&self, wake: impl Fn() + 'static) {
        *self.waker.borrow_mut() = Some(Box::new(wake));
    }
}
