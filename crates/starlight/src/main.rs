use anyhow::Context;
use clap::Parser;
use nightsky::letters::JsonFileStore;
use nightsky::{Catalog, Sky, SkyOptions};
use relm4::prelude::*;
use starlight::cli::Cli;
use starlight::config::{self, Config};
use starlight::gui::app::AppModel;
use starlight::sys::haptics::LogHaptics;
use starlight::sys::runtime;

fn letter_store(cli: &Cli, config: &Config) -> anyhow::Result<JsonFileStore> {
    if let Some(path) = cli.letters.as_ref().or(config.letters.path.as_ref()) {
        return Ok(JsonFileStore::new(path));
    }
    let dir = config::get_data_dir().context("No place to keep star letters")?;
    Ok(JsonFileStore::in_dir(dir))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    if cli.init_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default();
    let store = letter_store(&cli, &config)?;
    log::info!("Star letters live in {}", store.path().display());

    let options = SkyOptions {
        timing: config.timing.into(),
        season: config.season.into(),
        season_mode: cli.season,
        seed: cli.seed,
        photo_count: config.media.photos.len(),
        ..SkyOptions::default()
    };
    let today = chrono::Local::now().date_naive();
    let mut sky = Sky::new(Catalog::builtin(), options, Box::new(store), today);
    sky.set_haptics(Box::new(LogHaptics));

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    // GTK must not see our own flags.
    let app = RelmApp::new("org.starlight.starlight").with_args(Vec::new());

    app.run::<AppModel>((sky, config, rx));
    Ok(())
}
