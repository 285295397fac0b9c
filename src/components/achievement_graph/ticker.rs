use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Calls a subscriber once per animation frame with the frame time in
/// seconds. Dropping the ticker cancels the pending frame.
pub struct Ticker {
	frame: Rc<Cell<Option<i32>>>,
	callback: FrameCallback,
}

impl Ticker {
	pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let callback: FrameCallback = Rc::new(RefCell::new(None));

		let (frame_inner, callback_inner) = (frame.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move |timestamp_ms: f64| {
			on_frame(timestamp_ms / 1000.0);
			let next = callback_inner.borrow().as_ref().and_then(|cb| {
				web_sys::window()?
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok()
			});
			frame_inner.set(next);
		}));

		if let Some(ref cb) = *callback.borrow() {
			frame.set(Some(
				window.request_animation_frame(cb.as_ref().unchecked_ref())?,
			));
		}
		Ok(Self { frame, callback })
	}
}

impl Drop for Ticker {
	fn drop(&mut self) {
		if let (Some(id), Some(window)) = (self.frame.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// Breaks the closure's reference to itself.
		self.callback.borrow_mut().take();
		log::debug!("render ticker stopped");
	}
}
