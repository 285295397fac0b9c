use std::cell::Cell;

use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, Window};

/// A mouse listener registered on `window`, removed on [`detach`](Self::detach)
/// or drop.
pub struct WindowListener {
	event: &'static str,
	callback: Closure<dyn FnMut(MouseEvent)>,
	attached: Cell<bool>,
}

impl WindowListener {
	pub fn attach(
		window: &Window,
		event: &'static str,
		handler: impl FnMut(MouseEvent) + 'static,
	) -> Result<Self, JsValue> {
		let callback = Closure::<dyn FnMut(MouseEvent)>::new(handler);
		window.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			event,
			callback,
			attached: Cell::new(true),
		})
	}

	/// Deregisters without freeing the closure, so it is safe to call from
	/// inside the handler itself.
	pub fn detach(&self) {
		if !self.attached.replace(false) {
			return;
		}
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
		}
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		self.detach();
	}
}

/// The move/up pair that lives for the duration of one drag.
pub struct DragListeners {
	listeners: [WindowListener; 2],
}

impl DragListeners {
	pub fn attach(
		on_move: impl FnMut(MouseEvent) + 'static,
		on_up: impl FnMut(MouseEvent) + 'static,
	) -> Result<Self, JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		Ok(Self {
			listeners: [
				WindowListener::attach(&window, "mousemove", on_move)?,
				WindowListener::attach(&window, "mouseup", on_up)?,
			],
		})
	}

	pub fn detach(&self) {
		self.listeners.iter().for_each(WindowListener::detach);
	}
}
