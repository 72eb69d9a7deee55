use super::error::BootstrapError;

pub const DEFAULT_WIDTH: u32 = 600;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "cookie";

/// Current viewport dimensions. Both are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceState {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceState {
    fn default() -> Self {
        SurfaceState {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl SurfaceState {
    /// Applies a resize reported by the toolkit, clamping non-positive
    /// dimensions to 1.
    pub fn resize(&mut self, w: i32, h: i32) {
        self.width = clamp_dimension(w);
        self.height = clamp_dimension(h);
    }
}

fn clamp_dimension(v: i32) -> u32 {
    v.max(1) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub double_buffer: bool,
}

impl Default for PixelFormat {
    /// RGBA8, 24-bit depth, double-buffered.
    fn default() -> Self {
        PixelFormat {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 24,
            double_buffer: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextProfile {
    Core,
    Compatibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceParams {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// `None` leaves the version and profile to the driver.
    pub context_version: Option<(u8, u8, ContextProfile)>,
    /// Swap interval; `true` syncs presentation to the display refresh.
    pub vsync: bool,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        SurfaceParams {
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            format: PixelFormat::default(),
            context_version: None,
            vsync: true,
        }
    }
}

/// Presentation requests a frame callback may make.
pub trait Presenter {
    fn swap_buffers(&mut self);
    /// Asks for another frame callback once pending events are handled.
    fn request_redraw(&mut self);
}

/// Callbacks the event loop drives. Invoked on the event loop's thread, one
/// at a time.
pub trait FrameCallbacks {
    fn on_resize(&mut self, w: i32, h: i32);
    fn on_frame(&mut self, presenter: &mut dyn Presenter);
}

/// Window, context and event loop owner.
pub trait SurfaceManager {
    /// Token proving a context has been made current.
    type Context;

    fn init(&mut self, format: &PixelFormat) -> Result<(), BootstrapError>;

    /// Creates the window and its context and makes the context current.
    fn create_window(&mut self, params: &SurfaceParams) -> Result<Self::Context, BootstrapError>;

    /// Runs until the window is closed.
    fn run_event_loop(&mut self, callbacks: &mut dyn FrameCallbacks) -> Result<(), BootstrapError>;
}
