mod app;
mod config;
mod library;
mod media;
mod object_url;
mod player;
mod playlist;
mod runtime;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
