//! Virtual museum walkthrough

#![warn(clippy::pedantic, clippy::nursery)]

// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use walk_engine::{
    control::controller::{keyboard::Keyboard, mouse::Mouse},
    window::Mode,
    MuseumApp, MuseumAppConfig, SceneDescriptor, WindowDescriptor,
};

mod cli;

fn main() {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level.map_or(
            if cfg!(debug_assertions) {
                tracing::Level::TRACE
            } else {
                tracing::Level::INFO
            },
            tracing::Level::from,
        ))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &cli::Args) -> Result<(), walk_engine::LoadError> {
    let scene = SceneDescriptor::from_file(&args.scene)?;

    let config = MuseumAppConfig {
        window: WindowDescriptor {
            width: args.width,
            height: args.height,
            title: "Museum".to_string(),
            mode: if args.fullscreen {
                Mode::BorderlessFullscreen
            } else {
                Mode::Windowed
            },
            ..WindowDescriptor::default()
        },
        scene,
        controllers: vec![Box::new(Keyboard::default()), Box::new(Mouse::default())],
    };

    let app = MuseumApp::new(config)?;

    app.run();
}
