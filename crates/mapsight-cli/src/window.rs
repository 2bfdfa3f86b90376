//! Interactive window: operator input and presentation over one surface.

use std::cell::RefCell;
use std::rc::Rc;

use image::RgbImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use mapsight_core::{
    Command, ControlInput, DisplaySink, KEY_ADVANCE, KEY_CYCLE_RENDER, KEY_QUIT,
};

const KEY_BINDINGS: [(Key, u8); 3] = [
    (Key::Enter, KEY_ADVANCE),
    (Key::Space, KEY_CYCLE_RENDER),
    (Key::Escape, KEY_QUIT),
];

pub struct OperatorWindow {
    window: Window,
    buffer: Vec<u32>,
}

impl OperatorWindow {
    /// Open the window and wrap it in a shared handle.
    ///
    /// The frame-rate cap doubles as the short fixed input wait that
    /// keeps the tick loop responsive without spinning.
    pub fn open(title: &str, size: (u32, u32)) -> Result<SharedWindow, minifb::Error> {
        let mut window = Window::new(
            title,
            size.0 as usize,
            size.1 as usize,
            WindowOptions::default(),
        )?;
        window.set_target_fps(60);
        Ok(SharedWindow(Rc::new(RefCell::new(Self {
            window,
            buffer: Vec::new(),
        }))))
    }
}

/// Cloneable handle so the controller can own the window once as input and
/// once as sink. The pipeline is single-threaded, so `RefCell` suffices.
#[derive(Clone)]
pub struct SharedWindow(Rc<RefCell<OperatorWindow>>);

impl ControlInput for SharedWindow {
    fn poll(&mut self) -> Option<Command> {
        let inner = self.0.borrow();
        if !inner.window.is_open() {
            return Some(Command::Quit);
        }
        for (key, code) in KEY_BINDINGS {
            if inner.window.is_key_pressed(key, KeyRepeat::No) {
                return Command::from_key_code(code);
            }
        }
        None
    }
}

impl DisplaySink for SharedWindow {
    // The window draws every tick to keep the event pump running, whether
    // or not the target was rebuilt.
    fn present(&mut self, target: &RgbImage, _refreshed: bool) {
        let mut inner = self.0.borrow_mut();
        let inner = &mut *inner;
        let (width, height) = (target.width() as usize, target.height() as usize);

        inner.buffer.clear();
        inner.buffer.extend(target.pixels().map(|p| {
            let [r, g, b] = p.0;
            (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
        }));

        if let Err(err) = inner.window.update_with_buffer(&inner.buffer, width, height) {
            log::warn!("window update failed: {err}");
        }
    }
}
