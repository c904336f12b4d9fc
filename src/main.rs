#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tracing::info;

use tracing_subscriber::filter::LevelFilter;

mod app;
mod audio;
mod config;
mod error;
mod game;
mod graphics;
mod session;
mod timing;
mod visualisation;

use app::App;
use config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
  tracing_subscriber::fmt()
    .with_max_level(LevelFilter::INFO)
    .with_target(false)
    .init();

  // default config...
  let config = AppConfig::default();

  info!("beatfield spinning up...");

  let mut app = App::new(config)?;
  app.run().await?;

  info!("beatfield spinning down...");
  Ok(())
}
