use super::config::PRESENTATION_COLOR;
use super::gfx::{ClearMask, GraphicsApi};
use super::surface::{FrameCallbacks, Presenter, SurfaceState};

/// Resize and draw handlers, holding the surface state and the bound graphics
/// handle.
pub struct FrameLoop<A: GraphicsApi> {
    api: A,
    state: SurfaceState,
    frame_color: [f32; 4],
    frames: u64,
}

impl<A: GraphicsApi> FrameLoop<A> {
    pub fn new(api: A) -> FrameLoop<A> {
        FrameLoop {
            api,
            state: SurfaceState::default(),
            frame_color: PRESENTATION_COLOR,
            frames: 0,
        }
    }

    pub fn with_frame_color(mut self, color: [f32; 4]) -> Self {
        self.frame_color = color;
        self
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

impl<A: GraphicsApi> FrameCallbacks for FrameLoop<A> {
    fn on_resize(&mut self, w: i32, h: i32) {
        self.state.resize(w, h);
        let SurfaceState { width, height } = self.state;
        log::debug!("resize {w}x{h} -> viewport {width}x{height}");

        self.api.viewport(0, 0, width as i32, height as i32);
        self.api.clear_depth(1.0);
        self.api.clear_color(0.0, 0.0, 0.0, 0.0);
        self.api.enable_depth_test();
    }

    fn on_frame(&mut self, presenter: &mut dyn Presenter) {
        let [r, g, b, a] = self.frame_color;
        self.api.clear_color(r, g, b, a);
        self.api.clear(ClearMask::COLOR_AND_DEPTH);
        presenter.swap_buffers();
        presenter.request_redraw();
        self.frames += 1;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Call {
        Viewport(i32, i32, i32, i32),
        ClearDepth(f64),
        ClearColor(f32, f32, f32, f32),
        EnableDepthTest,
        Clear(ClearMask),
        SwapBuffers,
        RequestRedraw,
    }

    #[derive(Debug, Default)]
    pub struct RecordingApi {
        pub calls: Vec<Call>,
    }

    impl GraphicsApi for RecordingApi {
        fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
            self.calls.push(Call::Viewport(x, y, width, height));
        }
        fn clear_depth(&mut self, depth: f64) {
            self.calls.push(Call::ClearDepth(depth));
        }
        fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
            self.calls.push(Call::ClearColor(r, g, b, a));
        }
        fn enable_depth_test(&mut self) {
            self.calls.push(Call::EnableDepthTest);
        }
        fn clear(&mut self, mask: ClearMask) {
            self.calls.push(Call::Clear(mask));
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingPresenter {
        pub calls: Vec<Call>,
    }

    impl Presenter for RecordingPresenter {
        fn swap_buffers(&mut self) {
            self.calls.push(Call::SwapBuffers);
        }
        fn request_redraw(&mut self) {
            self.calls.push(Call::RequestRedraw);
        }
    }

    #[test]
    fn resize_clamps_viewport_and_resets_baseline_state() {
        let mut frame = FrameLoop::new(RecordingApi::default());
        frame.on_resize(0, 400);

        assert_eq!(frame.state(), SurfaceState { width: 1, height: 400 });
        assert_eq!(
            frame.api().calls,
            vec![
                Call::Viewport(0, 0, 1, 400),
                Call::ClearDepth(1.0),
                Call::ClearColor(0.0, 0.0, 0.0, 0.0),
                Call::EnableDepthTest,
            ]
        );
    }

    #[test]
    fn resize_never_forwards_zero_area() {
        for (w, h) in [(0, 0), (-5, 10), (10, -5), (i32::MIN, 0)] {
            let mut frame = FrameLoop::new(RecordingApi::default());
            frame.on_resize(w, h);
            match frame.api().calls[0] {
                Call::Viewport(_, _, vw, vh) => {
                    assert_eq!((vw, vh), (w.max(1), h.max(1)));
                }
                ref other => panic!("expected viewport first, got {other:?}"),
            }
        }
    }

    #[test]
    fn frame_clears_presents_and_reschedules() {
        let mut frame = FrameLoop::new(RecordingApi::default());
        let mut presenter = RecordingPresenter::default();
        frame.on_frame(&mut presenter);

        assert_eq!(
            frame.api().calls,
            vec![
                Call::ClearColor(1.0, 0.2, 0.7, 1.0),
                Call::Clear(ClearMask::COLOR_AND_DEPTH),
            ]
        );
        assert_eq!(
            presenter.calls,
            vec![Call::SwapBuffers, Call::RequestRedraw]
        );
    }

    #[test]
    fn every_frame_requests_the_next() {
        let mut frame = FrameLoop::new(RecordingApi::default());
        let mut presenter = RecordingPresenter::default();
        for _ in 0..100 {
            frame.on_frame(&mut presenter);
        }
        let redraws = presenter
            .calls
            .iter()
            .filter(|c| **c == Call::RequestRedraw)
            .count();
        assert_eq!(redraws, 100);
        assert_eq!(frame.frames(), 100);
    }

    #[test]
    fn custom_frame_color() {
        let mut frame =
            FrameLoop::new(RecordingApi::default()).with_frame_color([0.1, 0.2, 0.3, 0.4]);
        frame.on_frame(&mut RecordingPresenter::default());
        assert_eq!(frame.api().calls[0], Call::ClearColor(0.1, 0.2, 0.3, 0.4));
    }
}
