//! C FFI bindings for `GlComponent`.
//!
//! These functions are called through GObject Introspection from
//! GJS/JavaScript. They wrap the safe Rust API and take care of pointer and
//! string conversion at the boundary.
//!
//! # Safety
//!
//! All functions in this module are `extern "C"`. Callers must pass valid
//! `GlComponent` instances and null-terminated strings.

use std::ffi::c_char;

use glam::Vec3;
use glib::{
    GString,
    ffi::GType,
    subclass::types::ObjectSubclass,
    translate::{FromGlibPtrNone, IntoGlib, ToGlibPtr},
    types::StaticType,
};
use log::error;

use crate::ComponentConfig;

pub type GlComponent = <super::imp::GlComponent as ObjectSubclass>::Instance;

/// Returns the `GType` for `GlComponent`.
///
/// This function is called by g-ir-scanner during introspection generation.
#[unsafe(no_mangle)]
pub extern "C" fn gtk_gl_component_get_type() -> GType {
    <super::GlComponent as StaticType>::static_type().into_glib()
}

/// Creates a new `GlComponent`.
///
/// Returns NULL when GTK or libepoxy could not be initialized, or when
/// `config` is not valid TOML for [`ComponentConfig`].
///
/// # Safety
///
/// `config` must be a valid null-terminated C string holding TOML, or null
/// for the defaults.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gtk_gl_component_new(config: *const c_char) -> *mut GlComponent {
    let config = if config.is_null() {
        ComponentConfig::default()
    } else {
        let src = unsafe { GString::from_glib_none(config) };
        match ComponentConfig::from_toml_str(src.as_str()) {
            Ok(config) => config,
            Err(e) => {
                error!("Invalid value passed to `config`: {e}");
                return std::ptr::null_mut();
            }
        }
    };

    match super::GlComponent::new(config) {
        Ok(component) => component.to_glib_full(),
        Err(e) => {
            error!("Failed to create GlComponent: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Returns a newly allocated copy of the status line.
///
/// # Safety
///
/// `this` must be a valid `GlComponent`. The caller frees the result with
/// `g_free`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gtk_gl_component_get_status_text(this: *mut GlComponent) -> *mut c_char {
    let this = unsafe { super::GlComponent::from_glib_none(this) };
    this.status_text().as_str().to_glib_full()
}

/// # Safety
///
/// `this` must be a valid `GlComponent`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gtk_gl_component_set_background_color(
    this: *mut GlComponent,
    red: f32,
    green: f32,
    blue: f32,
) {
    let this = unsafe { super::GlComponent::from_glib_none(this) };
    this.set_background_color([red, green, blue]);
}

/// # Safety
///
/// `this` must be a valid `GlComponent`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gtk_gl_component_reset_orientation(
    this: *mut GlComponent,
    x: f32,
    y: f32,
    z: f32,
) {
    let this = unsafe { super::GlComponent::from_glib_none(this) };
    this.reset_orientation(Vec3::new(x, y, z));
}

/// # Safety
///
/// `this` must be a valid `GlComponent`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gtk_gl_component_set_continuous_repainting(
    this: *mut GlComponent,
    enabled: glib::ffi::gboolean,
) {
    let this = unsafe { super::GlComponent::from_glib_none(this) };
    this.set_continuous_repainting(enabled != glib::ffi::GFALSE);
}
