use log::{debug, error, warn};

use super::capability::{Capabilities, CapabilityResolver, DriverString, GlVersion};
use super::gfx::{self, Gl};
use super::system::ActiveContext;

/// Resolves GL entry points through SDL's `SDL_GL_GetProcAddress`.
#[derive(Debug, Default)]
pub struct GlLoader {
    caps: Capabilities,
}

impl GlLoader {
    pub fn new() -> GlLoader {
        GlLoader::default()
    }

    fn extensions(version: GlVersion) -> Vec<String> {
        // GL_EXTENSIONS is not a valid glGetString name on 3.0+ core contexts
        if version.major >= 3 && gl::GetStringi::is_loaded() {
            let mut count: i32 = 0;
            unsafe { gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut count) };
            return (0..count.max(0) as u32)
                .map(|i| gfx::get_string_i(gl::EXTENSIONS, i))
                .collect();
        }
        gfx::get_string(gl::EXTENSIONS)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl CapabilityResolver for GlLoader {
    type Context = ActiveContext;
    type Api = Gl;

    fn resolve_capabilities(&mut self, context: &ActiveContext) -> u32 {
        gl::load_with(|name| context.proc_address(name));

        if !gl::GetString::is_loaded() {
            error!("glGetString could not be resolved");
            return 0;
        }

        let version_string = gfx::get_string(gl::VERSION);
        let version = match GlVersion::parse(&version_string) {
            Some(v) => v,
            None => {
                error!("unrecognized GL_VERSION {version_string:?}");
                return 0;
            }
        };

        let extensions = Self::extensions(version);
        debug!("{} extensions reported", extensions.len());
        if !gl::Viewport::is_loaded() || !gl::Clear::is_loaded() {
            warn!("core entry points missing for GL {version}");
        }

        self.caps = Capabilities::new(version, extensions);
        self.caps.encoded_version()
    }

    fn query_feature(&self, name: &str) -> bool {
        self.caps.has(name)
    }

    fn driver_string(&self, kind: DriverString) -> String {
        let name = match kind {
            DriverString::Vendor => gl::VENDOR,
            DriverString::Renderer => gl::RENDERER,
            DriverString::Version => gl::VERSION,
            DriverString::ShadingLanguageVersion => gl::SHADING_LANGUAGE_VERSION,
        };
        gfx::get_string(name)
    }

    fn bind(&self) -> Gl {
        Gl::bound()
    }
}
