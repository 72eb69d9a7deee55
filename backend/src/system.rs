use std::ffi::c_void;

use log::{debug, info, warn};
use sdl2::event::{Event, WindowEvent};
use sdl2::video::{GLProfile, SwapInterval};

use super::error::BootstrapError;
use super::surface::{
    ContextProfile, FrameCallbacks, PixelFormat, Presenter, SurfaceManager, SurfaceParams,
};

/// What the event loop does with one SDL event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Quit,
    Resize(i32, i32),
    Redraw,
    Ignore,
}

pub fn dispatch(event: &Event) -> Dispatch {
    match event {
        // SDL also raises Quit on SIGINT/SIGTERM
        Event::Quit { .. } => Dispatch::Quit,
        Event::Window { win_event, .. } => match win_event {
            WindowEvent::Close => Dispatch::Quit,
            WindowEvent::SizeChanged(w, h) => Dispatch::Resize(*w, *h),
            WindowEvent::Exposed => Dispatch::Redraw,
            _ => Dispatch::Ignore,
        },
        _ => Dispatch::Ignore,
    }
}

/// Converts a drawable size in pixels to the signed form resize callbacks take.
pub fn viewport_size((w, h): (u32, u32)) -> (i32, i32) {
    (
        i32::try_from(w).unwrap_or(i32::MAX),
        i32::try_from(h).unwrap_or(i32::MAX),
    )
}

/// A context made current on the calling thread by [`System::create_window`].
pub struct ActiveContext {
    video_subsystem: sdl2::VideoSubsystem,
}

impl ActiveContext {
    pub fn proc_address(&self, name: &str) -> *const c_void {
        self.video_subsystem.gl_get_proc_address(name) as *const _
    }
}

struct SdlPresenter<'a> {
    window: &'a sdl2::video::Window,
    redraw: bool,
}

impl Presenter for SdlPresenter<'_> {
    fn swap_buffers(&mut self) {
        self.window.gl_swap_window();
    }

    fn request_redraw(&mut self) {
        self.redraw = true;
    }
}

/// SDL2 window with a GL context.
#[derive(Default)]
pub struct System {
    sdl_context: Option<sdl2::Sdl>,
    video_subsystem: Option<sdl2::VideoSubsystem>,
    // dropped before the window it was created for
    gl_ctx: Option<sdl2::video::GLContext>,
    window: Option<sdl2::video::Window>,
}

impl System {
    pub fn new() -> System {
        System::default()
    }

    fn video(&self) -> Result<&sdl2::VideoSubsystem, BootstrapError> {
        self.video_subsystem.as_ref().ok_or_else(|| {
            BootstrapError::SurfaceInit("video subsystem not initialized".to_string())
        })
    }
}

impl SurfaceManager for System {
    type Context = ActiveContext;

    fn init(&mut self, format: &PixelFormat) -> Result<(), BootstrapError> {
        let sdl_context = sdl2::init().map_err(BootstrapError::SurfaceInit)?;
        let video_subsystem = sdl_context.video().map_err(BootstrapError::SurfaceInit)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_red_size(format.red_bits);
        gl_attr.set_green_size(format.green_bits);
        gl_attr.set_blue_size(format.blue_bits);
        gl_attr.set_alpha_size(format.alpha_bits);
        gl_attr.set_depth_size(format.depth_bits);
        gl_attr.set_double_buffer(format.double_buffer);
        debug!(
            "video driver {:?}, pixel format {format:?}",
            video_subsystem.current_video_driver()
        );

        self.sdl_context = Some(sdl_context);
        self.video_subsystem = Some(video_subsystem);
        Ok(())
    }

    fn create_window(&mut self, params: &SurfaceParams) -> Result<ActiveContext, BootstrapError> {
        let video_subsystem = self.video()?.clone();

        if let Some((major, minor, profile)) = params.context_version {
            let gl_attr = video_subsystem.gl_attr();
            gl_attr.set_context_profile(match profile {
                ContextProfile::Core => GLProfile::Core,
                ContextProfile::Compatibility => GLProfile::Compatibility,
            });
            gl_attr.set_context_version(major, minor);
        }

        let window = match video_subsystem
            .window(&params.title, params.width, params.height)
            .opengl()
            .resizable()
            .position_centered()
            .build()
        {
            Ok(w) => w,
            Err(e) => {
                return Err(BootstrapError::SurfaceInit(format!(
                    "Error while building OpenGL window: {e}"
                )))
            }
        };

        let gl_ctx = window
            .gl_create_context()
            .map_err(BootstrapError::ContextCreation)?;
        window
            .gl_make_current(&gl_ctx)
            .map_err(BootstrapError::ContextCreation)?;
        if !gl_ctx.is_current() {
            return Err(BootstrapError::ContextCreation(
                "context is not current after creation".to_string(),
            ));
        }

        let interval = if params.vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            warn!("swap interval {interval:?} not applied: {e}");
        }

        info!(
            "created window {:?} {}x{}",
            params.title, params.width, params.height
        );

        self.gl_ctx = Some(gl_ctx);
        self.window = Some(window);
        Ok(ActiveContext { video_subsystem })
    }

    fn run_event_loop(&mut self, callbacks: &mut dyn FrameCallbacks) -> Result<(), BootstrapError> {
        let (sdl_context, window) = match (&self.sdl_context, &self.window) {
            (Some(s), Some(w)) => (s, w),
            _ => {
                return Err(BootstrapError::EventLoop(
                    "no window to run the event loop for".to_string(),
                ))
            }
        };
        let mut event_pump = sdl_context.event_pump().map_err(BootstrapError::EventLoop)?;

        let (w, h) = viewport_size(window.drawable_size());
        callbacks.on_resize(w, h);

        let mut redraw = true;
        loop {
            // without a pending frame there is nothing to do until the next event
            let mut next = if redraw {
                event_pump.poll_event()
            } else {
                Some(event_pump.wait_event())
            };
            while let Some(event) = next {
                match dispatch(&event) {
                    Dispatch::Quit => {
                        info!("window closed");
                        return Ok(());
                    }
                    Dispatch::Resize(w, h) => {
                        // SizeChanged is in window coordinates; the viewport wants pixels
                        let (pw, ph) = viewport_size(window.drawable_size());
                        debug!("size changed to {w}x{h}, drawable {pw}x{ph}");
                        callbacks.on_resize(pw, ph);
                    }
                    Dispatch::Redraw => redraw = true,
                    Dispatch::Ignore => {}
                }
                next = event_pump.poll_event();
            }

            if redraw {
                let mut presenter = SdlPresenter {
                    window,
                    redraw: false,
                };
                callbacks.on_frame(&mut presenter);
                redraw = presenter.redraw;
            }
        }
    }
}
