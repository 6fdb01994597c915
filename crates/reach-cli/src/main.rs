//! Binary entrypoint for the Reach status watcher.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = reach_cli::run().await;
    process::exit(exit_code);
}
