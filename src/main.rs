use clap::{
    CommandFactory, Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use scfetch::{
    cli,
    config::{self, Settings},
    downloader::Downloader,
    error,
    soundcloud::{SoundCloud, credential},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Link to a track, playlist or user profile
    url: Option<String>,

    /// Number of tracks downloaded at the same time
    #[clap(long, short)]
    jobs: Option<usize>,

    /// Print shell completions and exit
    #[clap(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let Some(url) = cli.url else {
        error!("You need to provide a link for downloading");
    };

    let mut settings = Settings::from_env();
    if let Some(jobs) = cli.jobs {
        settings = settings.with_concurrency(jobs);
    }

    let client_id = match credential::acquire(&settings).await {
        Ok(client_id) => client_id,
        Err(e) => error!("Failed to get client id: {}", e),
    };

    let sc = match SoundCloud::new(settings, client_id) {
        Ok(sc) => sc,
        Err(e) => error!("Failed to set up HTTP clients: {}", e),
    };

    cli::download(&Downloader::new(sc), &url).await;
}
