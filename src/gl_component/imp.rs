use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Instant,
};

use glam::{Mat4, Vec3};
use glib::Propagation;
use gtk::{GLArea, glib, pango, prelude::*, subclass::prelude::*};

use crate::{
    config::{ComponentConfig, StatusLabelConfig},
    gl::EpoxyGl,
    lifecycle::LifecycleState,
    orientation::{DraggableOrientation, Viewport},
    renderer::{FrameContext, QuadRenderer, StatusSink, SurfaceMetrics},
    shader::GlslProfile,
    status::StatusMailbox,
    surface::RenderSurface,
};

#[derive(Default)]
pub struct GlComponent {
    /// Holds the [`GLArea`] with the status label on top
    overlay: RefCell<Option<gtk::Overlay>>,
    area: RefCell<Option<GLArea>>,
    label: RefCell<Option<gtk::Label>>,
    surface: RefCell<Option<RenderSurface>>,
    /// Frame clock callback while repainting continuously
    tick: RefCell<Option<gtk::TickCallbackId>>,
    metrics: Cell<SurfaceMetrics>,
    background: Cell<[f32; 3]>,
    orientation: Cell<DraggableOrientation>,
    status: Rc<StatusMailbox>,
    created_at: Cell<Option<Instant>>,
}

#[glib::object_subclass]
impl ObjectSubclass for GlComponent {
    const NAME: &'static str = "GtkGlComponentGlComponent";
    type Type = super::GlComponent;
    type ParentType = gtk::Widget;

    fn class_init(klass: &mut Self::Class) {
        klass.set_layout_manager_type::<gtk::BinLayout>();
    }
}

impl ObjectImpl for GlComponent {
    fn constructed(&self) {
        self.parent_constructed();
        let obj = self.obj();

        let area = GLArea::new();
        area.set_has_depth_buffer(false);
        area.set_has_stencil_buffer(false);
        area.set_hexpand(true);
        area.set_vexpand(true);

        let label = gtk::Label::new(None);
        label.set_halign(gtk::Align::Start);
        label.set_valign(gtk::Align::Start);
        label.set_xalign(0.0);
        label.set_yalign(0.0);
        label.set_wrap(true);
        label.set_can_target(false);

        let overlay = gtk::Overlay::new();
        overlay.set_child(Some(&area));
        overlay.add_overlay(&label);
        overlay.set_parent(&*obj);

        *self.overlay.borrow_mut() = Some(overlay);
        *self.area.borrow_mut() = Some(area);
        *self.label.borrow_mut() = Some(label);
    }

    fn dispose(&self) {
        // No render callback may run past this point.
        self.set_continuous_repainting(false);
        if let Some(mut surface) = self.surface.borrow_mut().take() {
            if let Some(area) = self.area.borrow().as_ref()
                && area.is_realized()
            {
                area.make_current();
                if area.error().is_none() {
                    surface.context_closing(&mut EpoxyGl::new(profile_of(area)));
                }
            }
            surface.detach();
        }

        self.label.borrow_mut().take();
        self.area.borrow_mut().take();
        if let Some(overlay) = self.overlay.borrow_mut().take() {
            overlay.unparent();
        }
    }
}

impl WidgetImpl for GlComponent {}

impl GlComponent {
    pub fn initialize(&self, config: ComponentConfig) {
        let Some(area) = self.area.borrow().clone() else {
            log::error!("Missing GLArea, was this object properly initialized ?");
            return;
        };

        area.set_required_version(config.gl_version.major, config.gl_version.minor);
        if let Some(label) = self.label.borrow().as_ref() {
            style_label(label, &config.status_label);
        }

        self.background.set(config.clamped_background());
        self.reset_orientation(Vec3::from_array(config.orientation_axis));
        self.created_at.set(Some(Instant::now()));

        let renderer = QuadRenderer::new(self.status_sink());
        *self.surface.borrow_mut() = Some(RenderSurface::new(Box::new(renderer)));

        // using weakrefs to prevent reference loop
        let this = self.downgrade();
        area.connect_realize(move |area| {
            area.make_current();
            if let Some(e) = area.error() {
                log::error!("Failed to create GL context: {e}");
                return;
            }

            if let Some(this) = this.upgrade()
                && let Some(surface) = this.surface.borrow_mut().as_mut()
            {
                surface.context_created(&mut EpoxyGl::new(profile_of(area)));
            }
        });

        let this = self.downgrade();
        area.connect_unrealize(move |area| {
            area.make_current();
            if let Some(e) = area.error() {
                log::error!("Failed to release GL context: {e}");
                return;
            }

            if let Some(this) = this.upgrade()
                && let Some(surface) = this.surface.borrow_mut().as_mut()
            {
                surface.context_closing(&mut EpoxyGl::new(profile_of(area)));
            }
        });

        let this = self.downgrade();
        area.connect_resize(move |area, _width, _height| {
            if let Some(this) = this.upgrade() {
                this.resized(area);
            }
        });

        let this = self.downgrade();
        area.connect_render(move |area, _ctx| {
            if let Some(e) = area.error() {
                log::error!("Failed to render GL component: {e}");
                return Propagation::Stop;
            }

            if let Some(this) = this.upgrade() {
                let frame = this.frame_context();
                if let Some(surface) = this.surface.borrow_mut().as_mut() {
                    surface.render(&mut EpoxyGl::new(profile_of(area)), &frame);
                }
            }

            Propagation::Stop
        });

        let drag = gtk::GestureDrag::new();
        let this = self.downgrade();
        drag.connect_drag_begin(move |_, x, y| {
            if let Some(this) = this.upgrade() {
                this.with_orientation(|o| o.mouse_down(x as f32, y as f32));
            }
        });
        let this = self.downgrade();
        drag.connect_drag_update(move |gesture, dx, dy| {
            if let Some(this) = this.upgrade()
                && let Some((x, y)) = gesture.start_point()
            {
                this.with_orientation(|o| o.mouse_drag((x + dx) as f32, (y + dy) as f32));
            }
        });
        area.add_controller(drag);

        self.set_continuous_repainting(config.continuous_repaint);
    }

    pub fn status_text(&self) -> String {
        self.status.shown()
    }

    pub fn set_background_color(&self, rgb: [f32; 3]) {
        self.background.set(rgb.map(|c| c.clamp(0.0, 1.0)));
        if let Some(area) = self.area.borrow().as_ref() {
            area.queue_render();
        }
    }

    pub fn background_color(&self) -> [f32; 3] {
        self.background.get()
    }

    pub fn reset_orientation(&self, axis: Vec3) {
        self.with_orientation(|o| o.reset(axis));
    }

    pub fn rotation_matrix(&self) -> Mat4 {
        self.orientation.get().rotation_matrix()
    }

    pub fn set_continuous_repainting(&self, enabled: bool) {
        let mut surface = self.surface.borrow_mut();
        let Some(surface) = surface.as_mut() else {
            return;
        };
        surface.set_continuous_repainting(enabled);

        let mut tick = self.tick.borrow_mut();
        if surface.is_continuous_repainting() {
            if tick.is_none()
                && let Some(area) = self.area.borrow().as_ref()
            {
                *tick = Some(area.add_tick_callback(|area, _clock| {
                    area.queue_render();
                    glib::ControlFlow::Continue
                }));
            }
        } else if let Some(id) = tick.take() {
            id.remove();
        }
    }

    pub fn is_continuous_repainting(&self) -> bool {
        self.surface
            .borrow()
            .as_ref()
            .is_some_and(RenderSurface::is_continuous_repainting)
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.surface
            .borrow()
            .as_ref()
            .map_or(LifecycleState::Detached, RenderSurface::state)
    }

    fn resized(&self, area: &GLArea) {
        let (width, height) = (area.width(), area.height());
        self.metrics
            .set(SurfaceMetrics::new(width, height, area.scale_factor() as f32));
        self.with_orientation(|o| o.set_viewport(Viewport::new(0, 0, width, height)));
    }

    fn frame_context(&self) -> FrameContext {
        FrameContext {
            metrics: self.metrics.get(),
            elapsed: self
                .created_at
                .get()
                .map(|t| t.elapsed())
                .unwrap_or_default(),
            background_color: self.background.get(),
        }
    }

    fn with_orientation(&self, f: impl FnOnce(&mut DraggableOrientation)) {
        let mut orientation = self.orientation.get();
        f(&mut orientation);
        self.orientation.set(orientation);
    }

    /// Status lines are handed to the label from an idle callback, never
    /// from inside a GL callback.
    fn status_sink(&self) -> StatusSink {
        let mailbox = self.status.clone();
        let label = self.label.borrow().as_ref().map(ObjectExt::downgrade);
        Box::new(move |text| {
            if !mailbox.post(text) {
                return;
            }
            let mailbox = mailbox.clone();
            let label = label.clone();
            glib::idle_add_local_once(move || {
                let Some(text) = mailbox.take() else {
                    return;
                };
                if let Some(label) = label.as_ref().and_then(|l| l.upgrade()) {
                    label.set_text(&text);
                }
            });
        })
    }
}

fn profile_of(area: &GLArea) -> GlslProfile {
    if area.uses_es() {
        GlslProfile::Es
    } else {
        GlslProfile::Desktop
    }
}

fn style_label(label: &gtk::Label, config: &StatusLabelConfig) {
    let attrs = pango::AttrList::new();
    attrs.insert(pango::AttrSize::new(
        (config.font_size * pango::SCALE as f32) as i32,
    ));
    label.set_attributes(Some(&attrs));

    label.set_margin_top(config.inset);
    label.set_margin_bottom(config.inset);
    label.set_margin_start(config.inset);
    label.set_margin_end(config.inset);
    label.set_height_request(config.height);
}
