mod app;
mod pet;
mod platform;
mod render;
mod tray;


fn main() {
    env_logger::init();
    log::info!("CursorCat starting up");

    tray::spawn();

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
