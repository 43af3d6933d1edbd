//! duetto - play the Duetto voice from the terminal
//!
//! Run with: cargo run --bin duetto
//! Set RUST_LOG=info to see what the voice and stream are doing.

mod app;
mod keys;

use app::Duetto;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    Duetto::new().run()
}
