mod app;
mod args;
mod constants;
mod episode;
mod logger;
mod process;
mod prompt;
mod utils;

use crate::app::App;

#[tokio::main]
async fn main() {
    App::new().run().await;
}
