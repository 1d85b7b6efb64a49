use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use gtk::{glib, prelude::*};
use gtkglcomponent::{ComponentConfig, GlComponent};

const APP_ID: &str = "io.github.gtkglcomponent.Demo";

/// Opens a window showing the shader component.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML file overriding the component defaults
    #[arg(long, env = "GL_COMPONENT_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: i32,

    #[arg(long, default_value_t = 600)]
    height: i32,

    #[arg(long, default_value = "OpenGL Component")]
    title: String,
}

fn load_config(path: Option<&PathBuf>) -> ComponentConfig {
    let Some(path) = path else {
        return ComponentConfig::default();
    };
    ComponentConfig::load(path).unwrap_or_else(|e| {
        log::warn!("{e}; using defaults");
        ComponentConfig::default()
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = gtkglcomponent::init() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    let config = load_config(cli.config.as_ref());

    let app = gtk::Application::builder().application_id(APP_ID).build();
    app.connect_activate(move |app| {
        let component = match GlComponent::new(config.clone()) {
            Ok(component) => component,
            Err(e) => {
                log::error!("{e}");
                app.quit();
                return;
            }
        };

        let window = gtk::ApplicationWindow::builder()
            .application(app)
            .title(cli.title.as_str())
            .default_width(cli.width)
            .default_height(cli.height)
            .child(&component)
            .build();
        window.present();
    });

    // clap already consumed the command line
    if app.run_with_args::<&str>(&[]) == glib::ExitCode::SUCCESS {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
