use log::{debug, error, info};

use super::capability::{CapabilityResolver, DriverString, Feature, GlVersion};
use super::config::{CookieConfig, MIN_VERSION};
use super::error::BootstrapError;
use super::frame::FrameLoop;
use super::surface::SurfaceManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Uninitialized,
    SurfaceCreated,
    CapabilityResolved,
    Running,
    Failed(BootstrapError),
}

/// What the driver reported for a context that passed the version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub version: GlVersion,
    pub driver_version: String,
    pub shading_language_version: String,
}

/// Brings up the window and context, checks what the driver offers and hands
/// the frame loop to the surface manager.
///
/// ```text
///  Uninitialized -> SurfaceCreated -> CapabilityResolved -> Running
///                         |
///                         +--> Failed(LoaderFailed | UnsupportedVersion)
/// ```
pub struct Bootstrap<S, R> {
    surface: S,
    resolver: R,
    config: CookieConfig,
    stage: Stage,
    resolved: Option<Resolved>,
}

impl<S, R> Bootstrap<S, R>
where
    S: SurfaceManager,
    R: CapabilityResolver<Context = S::Context>,
{
    pub fn new(surface: S, resolver: R, config: CookieConfig) -> Self {
        Bootstrap {
            surface,
            resolver,
            config,
            stage: Stage::Uninitialized,
            resolved: None,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Runs the startup steps in order, stopping at the first failure.
    pub fn initialize(&mut self) -> Result<Resolved, BootstrapError> {
        match &self.stage {
            Stage::Uninitialized => {}
            Stage::Failed(e) => return Err(e.clone()),
            _ => {
                if let Some(resolved) = &self.resolved {
                    return Ok(resolved.clone());
                }
            }
        }

        match self.resolve() {
            Ok(resolved) => {
                self.stage = Stage::CapabilityResolved;
                self.resolved = Some(resolved.clone());
                Ok(resolved)
            }
            Err(e) => {
                error!("bootstrap failed: {e}");
                self.stage = Stage::Failed(e.clone());
                Err(e)
            }
        }
    }

    fn resolve(&mut self) -> Result<Resolved, BootstrapError> {
        self.surface.init(&self.config.surface.format)?;
        let context = self.surface.create_window(&self.config.surface)?;
        self.stage = Stage::SurfaceCreated;
        debug!("context current, resolving entry points");

        let encoded = self.resolver.resolve_capabilities(&context);
        if encoded == 0 {
            return Err(BootstrapError::LoaderFailed);
        }

        let version = GlVersion::from_encoded(encoded);
        info!("OpenGL {version}");

        if version.major < MIN_VERSION.major
            || !self.resolver.query_feature(Feature::MeetsMinimumVersion.name())
        {
            return Err(BootstrapError::UnsupportedVersion {
                major: version.major,
                minor: version.minor,
            });
        }

        let resolved = Resolved {
            version,
            driver_version: self.resolver.driver_string(DriverString::Version),
            shading_language_version: self
                .resolver
                .driver_string(DriverString::ShadingLanguageVersion),
        };
        info!(
            "driver {}, GLSL {} ({} / {})",
            resolved.driver_version,
            resolved.shading_language_version,
            self.resolver.driver_string(DriverString::Vendor),
            self.resolver.driver_string(DriverString::Renderer),
        );
        Ok(resolved)
    }

    /// Hands the frame loop to the surface manager. Returns once the window
    /// is closed.
    pub fn run(&mut self) -> Result<(), BootstrapError> {
        match &self.stage {
            Stage::CapabilityResolved => {}
            Stage::Failed(e) => return Err(e.clone()),
            Stage::Running => {
                return Err(BootstrapError::EventLoop(
                    "event loop already started".to_string(),
                ))
            }
            _ => {
                return Err(BootstrapError::EventLoop(
                    "capabilities not resolved".to_string(),
                ))
            }
        }

        let mut frame_loop =
            FrameLoop::new(self.resolver.bind()).with_frame_color(self.config.frame_color);
        self.stage = Stage::Running;
        let result = self.surface.run_event_loop(&mut frame_loop);
        info!("event loop finished after {} frames", frame_loop.frames());
        result
    }
}

/// Human-readable stdout lines for a bootstrap outcome.
pub fn diagnostic_lines(outcome: &Result<Resolved, BootstrapError>) -> Vec<String> {
    match outcome {
        Ok(resolved) => vec![
            format!("OpenGL {}", resolved.version),
            format!(
                "OpenGL {}, GLSL {}",
                resolved.driver_version, resolved.shading_language_version
            ),
        ],
        Err(BootstrapError::LoaderFailed) => vec!["Something went wrong!".to_string()],
        Err(BootstrapError::UnsupportedVersion { major, minor }) => vec![
            format!("OpenGL {major}.{minor}"),
            format!(
                "Your system doesn't support OpenGL >= {}!",
                MIN_VERSION.major
            ),
        ],
        Err(e) => vec![format!("{e}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::frame::tests::{Call, RecordingApi, RecordingPresenter};
    use crate::surface::{FrameCallbacks, PixelFormat, SurfaceParams};

    #[derive(Debug, Default)]
    struct FakeSurface {
        log: Vec<&'static str>,
        fail_context: bool,
        frames: usize,
        presented: Vec<Call>,
    }

    struct FakeContext;

    impl SurfaceManager for FakeSurface {
        type Context = FakeContext;

        fn init(&mut self, format: &PixelFormat) -> Result<(), BootstrapError> {
            assert!(format.double_buffer);
            self.log.push("init");
            Ok(())
        }

        fn create_window(&mut self, params: &SurfaceParams) -> Result<FakeContext, BootstrapError> {
            assert_eq!(params.title, "cookie");
            self.log.push("create_window");
            if self.fail_context {
                return Err(BootstrapError::ContextCreation("no context".to_string()));
            }
            Ok(FakeContext)
        }

        fn run_event_loop(
            &mut self,
            callbacks: &mut dyn FrameCallbacks,
        ) -> Result<(), BootstrapError> {
            self.log.push("run");
            callbacks.on_resize(0, 400);
            let mut presenter = RecordingPresenter::default();
            // stand-in for the close event
            for _ in 0..3 {
                callbacks.on_frame(&mut presenter);
                self.frames += 1;
                if presenter.calls.last() != Some(&Call::RequestRedraw) {
                    break;
                }
            }
            self.presented = presenter.calls;
            Ok(())
        }
    }

    struct FakeResolver {
        version: u32,
        caps: Capabilities,
        resolved: usize,
        hide_features: bool,
    }

    impl FakeResolver {
        fn reporting(version: u32) -> FakeResolver {
            FakeResolver {
                version,
                caps: Capabilities::default(),
                resolved: 0,
                hide_features: false,
            }
        }
    }

    impl CapabilityResolver for FakeResolver {
        type Context = FakeContext;
        type Api = RecordingApi;

        fn resolve_capabilities(&mut self, _context: &FakeContext) -> u32 {
            self.resolved += 1;
            if self.version != 0 {
                self.caps = Capabilities::new(GlVersion::from_encoded(self.version), Vec::new());
            }
            self.version
        }

        fn query_feature(&self, name: &str) -> bool {
            !self.hide_features && self.caps.has(name)
        }

        fn driver_string(&self, kind: DriverString) -> String {
            match kind {
                DriverString::Version => "2.0 Fake".to_string(),
                DriverString::ShadingLanguageVersion => "1.10".to_string(),
                DriverString::Vendor => "Fake Vendor".to_string(),
                DriverString::Renderer => "Fake Renderer".to_string(),
            }
        }

        fn bind(&self) -> RecordingApi {
            RecordingApi::default()
        }
    }

    fn bootstrap(version: u32) -> Bootstrap<FakeSurface, FakeResolver> {
        Bootstrap::new(
            FakeSurface::default(),
            FakeResolver::reporting(version),
            CookieConfig::default(),
        )
    }

    #[test]
    fn loader_failure_never_reaches_the_event_loop() {
        let mut b = bootstrap(0);
        let outcome = b.initialize();
        assert_eq!(outcome, Err(BootstrapError::LoaderFailed));
        assert_eq!(b.stage(), &Stage::Failed(BootstrapError::LoaderFailed));
        assert_eq!(diagnostic_lines(&outcome), vec!["Something went wrong!"]);

        assert_eq!(b.run(), Err(BootstrapError::LoaderFailed));
        assert_eq!(b.surface().log, vec!["init", "create_window"]);
        assert_eq!(b.surface().frames, 0);
        assert_eq!(BootstrapError::LoaderFailed.exit_code(), -1);
    }

    #[test]
    fn version_below_two_is_unsupported() {
        let mut b = bootstrap(15);
        let outcome = b.initialize();
        let expected = BootstrapError::UnsupportedVersion { major: 1, minor: 5 };
        assert_eq!(outcome, Err(expected.clone()));
        assert_eq!(
            diagnostic_lines(&outcome),
            vec!["OpenGL 1.5", "Your system doesn't support OpenGL >= 2!"]
        );

        assert_eq!(b.run(), Err(expected));
        assert!(!b.surface().log.contains(&"run"));
        assert_eq!(b.surface().frames, 0);
    }

    #[test]
    fn missing_minimum_version_feature_is_unsupported() {
        let mut b = Bootstrap::new(
            FakeSurface::default(),
            FakeResolver {
                hide_features: true,
                ..FakeResolver::reporting(33)
            },
            CookieConfig::default(),
        );
        let outcome = b.initialize();
        assert_eq!(
            outcome,
            Err(BootstrapError::UnsupportedVersion { major: 3, minor: 3 })
        );
        assert_eq!(
            diagnostic_lines(&outcome),
            vec!["OpenGL 3.3", "Your system doesn't support OpenGL >= 2!"]
        );

        assert!(b.run().is_err());
        assert!(!b.surface().log.contains(&"run"));
        assert_eq!(b.surface().frames, 0);
    }

    #[test]
    fn minor_component_never_rescues_major_one() {
        for minor in 0..10 {
            let mut b = bootstrap(10 + minor);
            assert!(matches!(
                b.initialize(),
                Err(BootstrapError::UnsupportedVersion { major: 1, .. })
            ));
        }
    }

    #[test]
    fn version_two_runs_the_frame_loop() {
        let mut b = bootstrap(20);
        let outcome = b.initialize();
        let resolved = outcome.clone().unwrap();
        assert_eq!(resolved.version, GlVersion::new(2, 0));
        assert_eq!(b.stage(), &Stage::CapabilityResolved);
        assert_eq!(
            diagnostic_lines(&outcome),
            vec!["OpenGL 2.0", "OpenGL 2.0 Fake, GLSL 1.10"]
        );

        assert_eq!(b.run(), Ok(()));
        assert_eq!(b.stage(), &Stage::Running);
        assert_eq!(b.surface().log, vec!["init", "create_window", "run"]);
        assert_eq!(b.surface().frames, 3);
        assert_eq!(
            b.surface().presented,
            [Call::SwapBuffers, Call::RequestRedraw].repeat(3)
        );
    }

    #[test]
    fn context_creation_failure_is_fatal() {
        let mut b = Bootstrap::new(
            FakeSurface {
                fail_context: true,
                ..FakeSurface::default()
            },
            FakeResolver::reporting(33),
            CookieConfig::default(),
        );
        assert!(matches!(
            b.initialize(),
            Err(BootstrapError::ContextCreation(_))
        ));
        assert_eq!(b.resolver.resolved, 0);
        assert!(b.run().is_err());
    }

    #[test]
    fn entry_points_are_resolved_once() {
        let mut b = bootstrap(46);
        b.initialize().unwrap();
        b.initialize().unwrap();
        assert_eq!(b.resolver.resolved, 1);
        b.run().unwrap();
        assert!(b.run().is_err());
    }

    #[test]
    fn run_before_initialize_is_refused() {
        let mut b = bootstrap(20);
        assert!(b.run().is_err());
        assert!(b.surface().log.is_empty());
    }
}
