use std::process::ExitCode;

use env_logger::{Builder, Env};

use crate::config::Config;
use crate::render::Bindery;

mod config;
mod flags;
mod render;
mod util;

pub fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let flags = flags::Bindery::from_env_or_exit();
    let start = std::time::Instant::now();
    let result = Config::load(&flags)
        .and_then(Bindery::new)
        .and_then(|bindery| bindery.render(&flags.inputs));

    match result {
        Ok(_) => {
            log::info!("total time: {}ms", start.elapsed().as_millis());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
