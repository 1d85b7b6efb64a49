use crate::gl::GlApi;
use crate::lifecycle::{Lifecycle, LifecycleEvent, LifecycleState};
use crate::renderer::{FrameContext, Renderer};

/// Routes context callbacks to a [`Renderer`], gated by the lifecycle.
///
/// Frames are only delivered while a context exists, and nothing reaches the
/// renderer once the surface is detached. The continuous-repaint flag is
/// bookkeeping for whoever drives the frame clock; on-demand frames still
/// render while it is off.
pub struct RenderSurface {
    lifecycle: Lifecycle,
    renderer: Box<dyn Renderer>,
    continuous_repaint: bool,
}

impl RenderSurface {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            renderer,
            continuous_repaint: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_continuous_repainting(&self) -> bool {
        self.continuous_repaint
    }

    pub fn set_continuous_repainting(&mut self, enabled: bool) {
        self.continuous_repaint = enabled && !self.lifecycle.is_detached();
    }

    pub fn context_created(&mut self, gl: &mut dyn GlApi) {
        match self.lifecycle.advance(LifecycleEvent::ContextCreated) {
            Ok(_) => self.renderer.context_created(gl),
            Err(e) => log::error!("ignoring context creation: {e}"),
        }
    }

    /// Returns whether the renderer was invoked.
    pub fn render(&mut self, gl: &mut dyn GlApi, frame: &FrameContext) -> bool {
        if !self.lifecycle.has_context() {
            return false;
        }
        match self.lifecycle.advance(LifecycleEvent::Frame) {
            Ok(_) => {
                self.renderer.render(gl, frame);
                true
            }
            Err(e) => {
                log::error!("dropping frame: {e}");
                false
            }
        }
    }

    pub fn context_closing(&mut self, gl: &mut dyn GlApi) {
        match self.lifecycle.advance(LifecycleEvent::ContextClosing) {
            Ok(_) => self.renderer.context_closing(gl),
            Err(e) => log::debug!("ignoring context closing: {e}"),
        }
    }

    /// Stops repainting and detaches for good.
    pub fn detach(&mut self) {
        self.continuous_repaint = false;
        self.lifecycle.detach();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use super::*;
    use crate::gl::fake::FakeGl;
    use crate::renderer::{QuadRenderer, SurfaceMetrics};
    use crate::shader::{GlslProfile, ShaderSources};

    #[derive(Default)]
    struct Counts {
        created: usize,
        frames: usize,
        closed: usize,
    }

    struct Counting(Rc<RefCell<Counts>>);

    impl Renderer for Counting {
        fn context_created(&mut self, _gl: &mut dyn GlApi) {
            self.0.borrow_mut().created += 1;
        }
        fn render(&mut self, _gl: &mut dyn GlApi, _frame: &FrameContext) {
            self.0.borrow_mut().frames += 1;
        }
        fn context_closing(&mut self, _gl: &mut dyn GlApi) {
            self.0.borrow_mut().closed += 1;
        }
    }

    fn counting() -> (RenderSurface, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut surface = RenderSurface::new(Box::new(Counting(counts.clone())));
        surface.set_continuous_repainting(true);
        (surface, counts)
    }

    fn frame() -> FrameContext {
        FrameContext {
            metrics: SurfaceMetrics::new(64, 64, 1.0),
            elapsed: Duration::ZERO,
            background_color: [0.0; 3],
        }
    }

    #[test]
    fn frames_need_a_context() {
        let mut gl = FakeGl::default();
        let (mut surface, counts) = counting();

        assert!(!surface.render(&mut gl, &frame()));
        surface.context_created(&mut gl);
        assert!(surface.render(&mut gl, &frame()));
        assert!(surface.render(&mut gl, &frame()));

        assert_eq!(counts.borrow().frames, 2);
        assert_eq!(surface.state(), LifecycleState::Rendering);
    }

    #[test]
    fn on_demand_frames_render_with_repaint_off() {
        let mut gl = FakeGl::default();
        let (mut surface, counts) = counting();
        surface.context_created(&mut gl);

        surface.set_continuous_repainting(false);
        assert!(!surface.is_continuous_repainting());
        assert!(surface.render(&mut gl, &frame()));
        assert_eq!(counts.borrow().frames, 1);
    }

    #[test]
    fn detach_stops_every_callback() {
        let mut gl = FakeGl::default();
        let (mut surface, counts) = counting();
        surface.context_created(&mut gl);
        surface.render(&mut gl, &frame());

        surface.detach();
        surface.set_continuous_repainting(true);

        assert!(!surface.is_continuous_repainting());
        assert!(!surface.render(&mut gl, &frame()));
        surface.context_created(&mut gl);
        surface.context_closing(&mut gl);

        let counts = counts.borrow();
        assert_eq!((counts.created, counts.frames, counts.closed), (1, 1, 0));
        assert_eq!(surface.state(), LifecycleState::Detached);
    }

    #[test]
    fn closing_then_recreating_reaches_renderer_again() {
        let mut gl = FakeGl::default();
        let (mut surface, counts) = counting();
        surface.context_created(&mut gl);
        surface.context_closing(&mut gl);
        assert!(!surface.render(&mut gl, &frame()));
        surface.context_created(&mut gl);
        assert!(surface.render(&mut gl, &frame()));

        let counts = counts.borrow();
        assert_eq!((counts.created, counts.frames, counts.closed), (2, 1, 1));
    }

    #[test]
    fn drives_quad_renderer_end_to_end() {
        let mut gl = FakeGl::default();
        let renderer = QuadRenderer::with_sources(
            ShaderSources::builtin(GlslProfile::Es),
            Box::new(|_| {}),
        );
        let mut surface = RenderSurface::new(Box::new(renderer));
        surface.set_continuous_repainting(true);

        surface.context_created(&mut gl);
        surface.render(&mut gl, &frame());
        surface.context_closing(&mut gl);
        surface.detach();
        surface.render(&mut gl, &frame());

        assert_eq!(gl.draw_count(), 1);
    }
}
