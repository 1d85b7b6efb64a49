//! OpenGL component widget for GTK4.
//!
//! [`GlComponent`] embeds a `GLArea`, draws a fullscreen quad with a fixed
//! shader pair and repaints it on every frame clock tick. A label in the
//! top-left corner shows the outcome of the last shader compile: the GLSL
//! version, or the driver's error log.
//!
//! # Shader Inputs
//!
//! - `resolution` - `vec2`, surface size in device pixels
//! - `time` - `float`, seconds since the widget was created
//! - `displayScaleFactor` - `float`, the monitor's scale factor
//! - `backgroundColor` - `vec3`, RGB in `0..1`
//!
//! # Example (from GJS)
//!
//! ```javascript
//! import GtkGlComponent from "gi://GtkGlComponent";
//!
//! const component = GtkGlComponent.GlComponent.new(null);
//! component.set_background_color(0.1, 0.1, 0.12);
//! ```

use glam::{Mat4, Vec3};
use glib::{Object, subclass::types::ObjectSubclassIsExt};
use gtk::glib;

use crate::{ComponentConfig, InitError, lifecycle::LifecycleState};

mod ffi;
mod imp;

glib::wrapper! {
    /// A GTK4 widget rendering the shader quad on an OpenGL surface.
    ///
    /// Mouse presses and drags on the surface drive a virtual trackball whose
    /// rotation is available through [`GlComponent::rotation_matrix`].
    pub struct GlComponent(ObjectSubclass<imp::GlComponent>)
        @extends gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget;
}

impl GlComponent {
    /// Creates a new `GlComponent`.
    ///
    /// Loads libepoxy and initializes GTK on first use. Repainting starts
    /// right away when `config.continuous_repaint` is set.
    pub fn new(config: ComponentConfig) -> Result<Self, InitError> {
        crate::init()?;
        let this: Self = Object::new();
        this.imp().initialize(config);
        Ok(this)
    }

    /// The status line currently shown on the label.
    #[must_use]
    pub fn status_text(&self) -> String {
        self.imp().status_text()
    }

    /// Channels are clamped to `0..=1`.
    pub fn set_background_color(&self, rgb: [f32; 3]) {
        self.imp().set_background_color(rgb);
    }

    #[must_use]
    pub fn background_color(&self) -> [f32; 3] {
        self.imp().background_color()
    }

    pub fn reset_orientation(&self, axis: Vec3) {
        self.imp().reset_orientation(axis);
    }

    #[must_use]
    pub fn rotation_matrix(&self) -> Mat4 {
        self.imp().rotation_matrix()
    }

    /// Starts or stops the per-frame redraw. Has no effect once the widget
    /// has been disposed.
    pub fn set_continuous_repainting(&self, enabled: bool) {
        self.imp().set_continuous_repainting(enabled);
    }

    #[must_use]
    pub fn is_continuous_repainting(&self) -> bool {
        self.imp().is_continuous_repainting()
    }

    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.imp().lifecycle_state()
    }
}
