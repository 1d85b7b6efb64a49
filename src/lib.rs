use std::sync::OnceLock;

use glib::{GlibLogger, GlibLoggerDomain, GlibLoggerFormat};
use log::LevelFilter;
use thiserror::Error;

pub mod config;
pub mod gl;
mod gl_component;
pub mod lifecycle;
pub mod orientation;
pub mod pipeline;
pub mod renderer;
pub mod shader;
pub mod status;
pub mod surface;
pub mod uniforms;

pub use config::ComponentConfig;
pub use gl_component::GlComponent;

static INIT: OnceLock<Result<(), InitError>> = OnceLock::new();
static GLIB_LOGGER: GlibLogger =
    GlibLogger::new(GlibLoggerFormat::Plain, GlibLoggerDomain::CrateTarget);

#[derive(Debug, Clone, Error)]
pub enum InitError {
    #[error("GTK initialization failed: {0}")]
    Gtk(String),
    #[error("can't load libepoxy.so.0: {0}")]
    Epoxy(String),
}

/// Initializes GTK, points epoxy at the system libepoxy and routes `log`
/// records to GLib's logger. Only the first call does any work.
pub fn init() -> Result<(), InitError> {
    INIT.get_or_init(|| {
        // initialize the `log` crate to forward to glib's logger
        let _ = log::set_logger(&GLIB_LOGGER);
        log::set_max_level(LevelFilter::Debug);

        // gtk need to be initialized for most operations
        gtk::init().map_err(|e| InitError::Gtk(e.to_string()))?;

        // libepoxy needs to be initialized before calling any opengl function
        gl::load_epoxy().map_err(|e| InitError::Epoxy(e.to_string()))
    })
    .clone()
}
