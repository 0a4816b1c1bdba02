use std::env;

use tiny_rasterizer::app;
use tiny_rasterizer::config::Params;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = Params::from_args(env::args())?;
    log::info!("Rendering {:?} at {}x{}", params.scene, params.width, params.height);

    if let Some(frames) = params.headless_frames {
        return app::run_headless(&params, frames);
    }

    // The window event loop has to own the main thread; rendering runs on a
    // worker thread it spawns and the process exits when that returns.
    show_image::run_context(move || {
        if let Err(err) = app::run_window(&params) {
            log::error!("{err}");
            std::process::exit(1);
        }
    });
}
