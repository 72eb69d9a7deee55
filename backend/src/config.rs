use super::capability::GlVersion;
use super::surface::{ContextProfile, PixelFormat, SurfaceParams};

/// Clear color used for every presented frame.
pub const PRESENTATION_COLOR: [f32; 4] = [1.0, 0.2, 0.7, 1.0];

/// Lowest GL version the bootstrap accepts. Only the major part is compared
/// directly; the full version is checked through
/// [`Feature::MeetsMinimumVersion`](super::capability::Feature::MeetsMinimumVersion).
pub const MIN_VERSION: GlVersion = GlVersion::new(2, 0);

/// Startup configuration.
///
/// # Default Values
///
/// - **Window**: "cookie", 600x600, RGBA8 + 24-bit depth, double-buffered
/// - **Context**: driver default version and profile, vsync on
/// - **Frame color**: (1.0, 0.2, 0.7, 1.0)
///
/// ```no_run
/// use backend::config::CookieConfig;
///
/// let config = CookieConfig::default()
///     .with_size(800, 600)
///     .with_vsync(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CookieConfig {
    pub surface: SurfaceParams,
    pub frame_color: [f32; 4],
}

impl Default for CookieConfig {
    fn default() -> Self {
        CookieConfig {
            surface: SurfaceParams::default(),
            frame_color: PRESENTATION_COLOR,
        }
    }
}

impl CookieConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.surface.title = title.into();
        self
    }

    /// Zero dimensions are raised to 1.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.surface.width = width.max(1);
        self.surface.height = height.max(1);
        self
    }

    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.surface.format = format;
        self
    }

    pub fn with_context_version(mut self, major: u8, minor: u8, profile: ContextProfile) -> Self {
        self.surface.context_version = Some((major, minor, profile));
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.surface.vsync = vsync;
        self
    }

    pub fn with_frame_color(mut self, color: [f32; 4]) -> Self {
        self.frame_color = color;
        self
    }
}
