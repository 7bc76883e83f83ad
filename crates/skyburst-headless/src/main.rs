mod session;

use tracing_subscriber::EnvFilter;

use skyburst_core::storage::{CounterStore, JsonFileStore, MemoryStore};
use skyburst_powerups::{PowerUpConfig, PowerUpEngine};

use session::FlightSession;

fn arg_value(prefix: &str) -> Option<String> {
    std::env::args()
        .skip(1)
        .find_map(|a| a.strip_prefix(prefix).map(String::from))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let seed = arg_value("--seed=")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1);

    let seconds = arg_value("--seconds=")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(60);

    let store: Box<dyn CounterStore> = match arg_value("--store=") {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };

    let config = PowerUpConfig::load().with_seed(seed);
    let engine = PowerUpEngine::new(config, store);

    tracing::info!("Skyburst headless run: seed {seed}, {seconds}s");

    let mut session = FlightSession::new(engine, seed);
    let stats = session.run(seconds * 60, 1.0 / 60.0);

    tracing::info!(
        frames = stats.frames,
        pickups = stats.pickups,
        rejected = stats.rejected_pickups,
        absorbed = stats.hits_absorbed,
        crashes = stats.crashes,
        lives_used = stats.lives_used,
        explosions = stats.explosions,
        score = stats.score,
        "Run complete"
    );
    let counters = session.engine.counters();
    tracing::info!(
        missiles = counters.missile_count,
        sidewinders = counters.sidewinder_count,
        extra_life = counters.has_extra_life,
        double_time = counters.double_time,
        "Counters carried to next run"
    );
}
