use pricing_bandits::{
    config::AppConfig, experiment::Experiment, history::History, policies::MaybeSeededRng,
};

use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let history = History::from_path(&config.history.path)?;
    let mut experiment = Experiment::new(&config.experiment, &config.policy, &history)?;
    info!(environment = %experiment.environment(), "Environment ready");

    if config.experiment.rounds > 0 {
        let mut rng = MaybeSeededRng::new(config.experiment.seed);
        let arms = experiment.simulate(config.experiment.rounds, rng.get_rng())?;
        info!(rounds = arms.len(), "Simulated rounds");
    }

    let recommendation = experiment.recommend();
    println!("{}", serde_json::to_string_pretty(&recommendation)?);

    Ok(())
}
