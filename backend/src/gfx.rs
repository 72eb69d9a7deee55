use std::ffi::CStr;

use gl::types::*;

/// Buffers cleared by [`GraphicsApi::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const COLOR_AND_DEPTH: ClearMask = ClearMask {
        color: true,
        depth: true,
    };

    fn bits(&self) -> GLbitfield {
        let mut bits = 0;
        if self.color {
            bits |= gl::COLOR_BUFFER_BIT;
        }
        if self.depth {
            bits |= gl::DEPTH_BUFFER_BIT;
        }
        bits
    }
}

/// The subset of GL the frame loop issues.
pub trait GraphicsApi {
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_depth(&mut self, depth: f64);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn enable_depth_test(&mut self);
    fn clear(&mut self, mask: ClearMask);
}

/// Handle to the process-wide GL entry points.
///
/// Only the loader constructs it, after `gl::load_with` has bound the
/// function pointers for the current context.
#[derive(Debug)]
pub struct Gl {
    _bound: (),
}

impl Gl {
    pub(crate) fn bound() -> Gl {
        Gl { _bound: () }
    }
}

impl GraphicsApi for Gl {
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    fn clear_depth(&mut self, depth: f64) {
        unsafe { gl::ClearDepth(depth) };
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) };
    }

    fn enable_depth_test(&mut self) {
        unsafe { gl::Enable(gl::DEPTH_TEST) };
        check_gl_err("glEnable(GL_DEPTH_TEST)");
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe { gl::Clear(mask.bits()) };
    }
}

/// Logs and drains the GL error flag.
pub fn check_gl_err(call: &str) {
    loop {
        let err = unsafe { gl::GetError() };
        if err == gl::NO_ERROR {
            return;
        }
        log::warn!("{call}: GL error 0x{err:04x}");
    }
}

/// Reads a `glGetString` value, empty when the driver returns null.
pub(crate) fn get_string(name: GLenum) -> String {
    let ptr = unsafe { gl::GetString(name) };
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr.cast()) }
        .to_string_lossy()
        .into_owned()
}

pub(crate) fn get_string_i(name: GLenum, index: GLuint) -> String {
    let ptr = unsafe { gl::GetStringi(name, index) };
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr.cast()) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_mask_bits() {
        assert_eq!(
            ClearMask::COLOR_AND_DEPTH.bits(),
            gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT
        );
        let color_only = ClearMask {
            color: true,
            depth: false,
        };
        assert_eq!(color_only.bits(), gl::COLOR_BUFFER_BIT);
    }
}
