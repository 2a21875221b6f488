mod arena;
mod match_registry;
mod match_service;
mod server_config;
mod service_error;

use clap::Parser;
use ultimate_common::config::{ConfigManager, FileContentConfigProvider, Validate};
use ultimate_common::games::SessionRng;
use ultimate_common::{log, logger};
use match_service::MatchService;
use server_config::ServerConfig;

#[derive(Parser)]
#[command(name = "ultimate_server", about = "Plays seeded bot-vs-bot ultimate tic-tac-toe matches")]
struct Args {
    /// YAML config; a missing file means defaults.
    #[arg(long, default_value = "ultimate_server.yaml")]
    config: String,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    pairings: Option<usize>,

    #[arg(long)]
    matches: Option<usize>,

    #[arg(long)]
    use_log_prefix: bool,
}

impl Args {
    fn apply_to(&self, config: &mut ServerConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(pairings) = self.pairings {
            config.pairings = pairings;
        }
        if let Some(matches) = self.matches {
            config.matches_per_pairing = matches;
        }
        if self.use_log_prefix && config.log_prefix.is_none() {
            config.log_prefix = Some("Arena".to_string());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_manager: ConfigManager<FileContentConfigProvider, ServerConfig> =
        ConfigManager::from_yaml_file(args.config.as_str());
    let mut config = config_manager.get_config()?;
    args.apply_to(&mut config);
    config.validate()?;

    logger::init_logger(config.log_prefix.clone());

    let mut rng = match config.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!(
        "Arena starting: {} pairings x {} matches, seed {}, lock timeout {}ms",
        config.pairings,
        config.matches_per_pairing,
        rng.seed(),
        config.lock_timeout_ms
    );

    let arena_rng = rng.fork();
    let service = MatchService::new(config.lock_timeout(), rng);
    let summary = arena::run(&service, arena_rng, config.pairings, config.matches_per_pairing).await;

    log!(
        "Arena finished: {} matches, cross won {}, circle won {}, {} draws, {} failed pairings",
        summary.matches(),
        summary.cross_wins,
        summary.circle_wins,
        summary.draws,
        summary.failed_pairings
    );

    if summary.failed_pairings > 0 {
        return Err(format!("{} pairings failed", summary.failed_pairings).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["ultimate_server", "--seed", "9", "--matches", "3", "--use-log-prefix"]);
        let mut config = ServerConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.matches_per_pairing, 3);
        assert_eq!(config.pairings, ServerConfig::default().pairings);
        assert_eq!(config.log_prefix.as_deref(), Some("Arena"));
    }

    #[test]
    fn test_configured_prefix_wins() {
        let args = Args::parse_from(["ultimate_server", "--use-log-prefix"]);
        let mut config = ServerConfig {
            log_prefix: Some("Nightly".to_string()),
            ..ServerConfig::default()
        };
        args.apply_to(&mut config);
        assert_eq!(config.log_prefix.as_deref(), Some("Nightly"));
    }
}
