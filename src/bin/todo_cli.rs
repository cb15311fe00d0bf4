use dotenv::dotenv;
use std::io;
use todo_tracker::manager::TaskManager;
use todo_tracker::{cli, logging};
use tracing::level_filters::LevelFilter;

fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    logging::setup_cli_logging(logging::init_env_filter(LevelFilter::WARN)?);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    cli::run_menu(&mut stdin.lock(), &mut stdout, &mut TaskManager::new())?;

    Ok(())
}
