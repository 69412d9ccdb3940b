use std::error::Error;

use od_tables::config::RunConfig;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = RunConfig::from_env()?;
    log::info!("reading survey from {}", config.survey_path.display());
    od_tables::run(&config)
}
