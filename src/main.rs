use clap::Parser;

use log::{error, LevelFilter};

use simple_logger::SimpleLogger;

mod app;
mod args;
mod config;
mod input;
mod shaders;

use app::{App, AppError};
use args::Args;
use config::Config;
use shaders::ShaderSources;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    if let Err(e) = SimpleLogger::new()
        .with_level(args.log_level.into())
        .with_module_level("winit", LevelFilter::Warn)
        .init()
    {
        eprintln!("Could not initialize logging: {e}");
    }

    let app = match setup(&args) {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            std::process::exit(-1);
        }
    };

    app.run();
}

fn setup(args: &Args) -> Result<App, AppError> {
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    args.apply(&mut config);
    config.validate()?;

    let sources = ShaderSources::load(
        args.vertex_shader.as_deref(),
        args.fragment_shader.as_deref(),
    )?;

    App::new(&config, &sources)
}
