use clap::Parser;
use nightsky::SeasonMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "starlight", version, about = "A night sky full of messages", long_about = None)]
pub struct Cli {
    /// Constellation mode: auto (by date), on or off
    #[arg(long, default_value_t = SeasonMode::Auto)]
    pub season: SeasonMode,

    /// Seed every random choice, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Store star letters in this file instead of the data directory
    #[arg(long)]
    pub letters: Option<PathBuf>,

    /// Write the default config file if missing, print its path and exit
    #[arg(long)]
    pub init_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["starlight"]).unwrap();
        assert_eq!(cli.season, SeasonMode::Auto);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.letters, None);
        assert!(!cli.init_config);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "starlight",
            "--season",
            "on",
            "--seed",
            "42",
            "--letters",
            "/tmp/stars.json",
        ])
        .unwrap();
        assert_eq!(cli.season, SeasonMode::On);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.letters, Some(PathBuf::from("/tmp/stars.json")));
    }

    #[test]
    fn test_init_config_flag() {
        let cli = Cli::try_parse_from(["starlight", "--init-config"]).unwrap();
        assert!(cli.init_config);
    }

    #[test]
    fn test_unknown_season_rejected() {
        assert!(Cli::try_parse_from(["starlight", "--season", "spring"]).is_err());
    }
}
