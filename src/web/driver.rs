//! Event pump and timer re-arming for a mounted engine.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_time::Instant;

use super::{Inbound, Inbox, WebDocument};
use crate::dom::DomError;
use crate::engine::GlintEngine;
use crate::error::GlintError;
use crate::options::Options;

type TimeoutClosure = Closure<dyn FnMut()>;

struct Driver {
    window: web_sys::Window,
    engine: RefCell<GlintEngine<WebDocument>>,
    inbox: Rc<Inbox>,
    /// Handle of the armed `setTimeout`, if any.
    timeout: Cell<Option<i32>>,
    on_timeout: RefCell<Option<TimeoutClosure>>,
}

impl Driver {
    fn start(&self) {
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            return;
        };
        engine.init(Instant::now());
        drop(engine);
        self.pump();
    }

    /// Drain the inbox, fire due timers, and re-arm the timeout. A
    /// re-entrant call returns at once; the outer drain picks up whatever
    /// was queued.
    fn pump(&self) {
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            return;
        };
        loop {
            while let Some(message) = self.inbox.pop() {
                let now = Instant::now();
                match message {
                    Inbound::Event { element, event } => {
                        engine.handle_event(element, event, now);
                    }
                    Inbound::Intersection {
                        element,
                        ratio,
                        intersecting,
                    } => {
                        let _ = engine
                            .handle_intersection(element, ratio, intersecting);
                    }
                }
            }
            let _ = engine.advance(Instant::now());
            if self.inbox.is_empty() {
                break;
            }
        }
        let deadline = engine.next_deadline();
        drop(engine);
        self.arm(deadline);
    }

    fn arm(&self, deadline: Option<Instant>) {
        self.disarm();
        let Some(deadline) = deadline else {
            return;
        };
        let delay = deadline.saturating_duration_since(Instant::now());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let on_timeout = self.on_timeout.borrow();
        let Some(callback) = on_timeout.as_ref() else {
            return;
        };
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => self.timeout.set(Some(handle)),
            Err(e) => log::debug!("glint: setTimeout failed: {e:?}"),
        }
    }

    fn disarm(&self) {
        if let Some(handle) = self.timeout.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// A mounted engine. Dropping the handle tears the engine down, so keep
/// it for as long as the page should stay interactive.
pub struct GlintHandle {
    driver: Rc<Driver>,
}

impl GlintHandle {
    /// Whether the engine is initialized and not torn down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.driver
            .engine
            .try_borrow()
            .is_ok_and(|engine| engine.is_active())
    }

    /// Detach every listener and observer, cancel pending work, and stop
    /// the timer.
    pub fn teardown(&self) {
        self.driver.disarm();
        self.driver.inbox.clear();
        if let Ok(mut engine) = self.driver.engine.try_borrow_mut() {
            engine.teardown();
        }
    }
}

impl Drop for GlintHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for GlintHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlintHandle")
            .field("active", &self.is_active())
            .field("timeout", &self.driver.timeout.get())
            .finish_non_exhaustive()
    }
}

/// Bind an engine to the current page, scoped to `root_selector`.
///
/// Initializes immediately when the document has finished parsing,
/// otherwise on `DOMContentLoaded`.
///
/// # Errors
///
/// Returns [`GlintError`] if the options do not validate or there is no
/// window or document.
pub fn mount(
    root_selector: &str,
    options: &Options,
) -> Result<GlintHandle, GlintError> {
    let window = web_sys::window().ok_or(DomError::Unsupported("window"))?;
    let document = window.document().ok_or(DomError::Unsupported("document"))?;

    let mut options = options.clone();
    root_selector.clone_into(&mut options.selectors.root);

    let inbox = Rc::new(Inbox::default());
    let page =
        WebDocument::new(window.clone(), document.clone(), Rc::clone(&inbox));
    let engine = GlintEngine::new(page, &options)?;

    let driver = Rc::new(Driver {
        window,
        engine: RefCell::new(engine),
        inbox,
        timeout: Cell::new(None),
        on_timeout: RefCell::new(None),
    });

    let weak = Rc::downgrade(&driver);
    driver.inbox.set_waker(move || pump(&weak));
    let weak = Rc::downgrade(&driver);
    *driver.on_timeout.borrow_mut() = Some(TimeoutClosure::new(move || {
        if let Some(driver) = weak.upgrade() {
            driver.timeout.set(None);
            driver.pump();
        }
    }));

    if document.ready_state() == "loading" {
        let weak = Rc::downgrade(&driver);
        let on_ready = Closure::once_into_js(move || {
            if let Some(driver) = weak.upgrade() {
                driver.start();
            }
        });
        document
            .add_event_listener_with_callback(
                "DOMContentLoaded",
                on_ready.unchecked_ref(),
            )
            .map_err(|e| DomError::Host(format!("{e:?}")))?;
        log::debug!("glint: waiting for DOMContentLoaded");
    } else {
        driver.start();
    }

    Ok(GlintHandle { driver })
}

fn pump(driver: &Weak<Driver>) {
    if let Some(driver) = driver.upgrade() {
        driver.pump();
    }
}
