use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vidgrab::{Config, HttpBackend, Submission, cli_controller};

#[derive(Parser)]
#[command(
    name = "vidgrab",
    version,
    about = "Extract downloadable formats for online videos",
    long_about = "Send a video page URL to an extraction backend and list the video,\n\
    video-only and audio-only formats it finds, with subtitles when available.\n\n\
    Examples:\n\
      vidgrab https://youtu.be/dQw4w9WgXcQ               # List formats\n\
      vidgrab -j https://vimeo.com/76979871              # Print the result as JSON\n\
      vidgrab -d 22 https://youtu.be/dQw4w9WgXcQ         # Open format 22 in the browser\n\
      vidgrab --subtitle 1 https://youtu.be/dQw4w9WgXcQ  # Open the first subtitle track\n\
      vidgrab --history                                  # Show recent extractions\n\
      vidgrab --again 1                                  # Re-run the latest extraction"
)]
struct Args {
    /// Video page URL to extract
    url: Option<String>,

    #[arg(long, env = "VIDGRAB_BACKEND_URL", help = "Extraction backend base URL")]
    backend: Option<String>,

    #[arg(long, env = "VIDGRAB_HISTORY_FILE", help = "History file location")]
    history_file: Option<PathBuf>,

    #[arg(
        long,
        env = "VIDGRAB_HISTORY_LIMIT",
        help = "Maximum number of history entries kept"
    )]
    history_limit: Option<usize>,

    #[arg(
        long,
        env = "VIDGRAB_TIMEOUT",
        value_name = "SECONDS",
        help = "Request timeout in seconds"
    )]
    timeout: Option<u64>,

    #[arg(short = 'j', long, help = "Print results as JSON")]
    json: bool,

    #[arg(short = 'd', long, value_name = "FORMAT_ID", help = "Open a format's direct URL")]
    download: Option<String>,

    #[arg(long, value_name = "N", help = "Open subtitle track N (1-based)")]
    subtitle: Option<usize>,

    #[arg(long, help = "Show download history")]
    history: bool,

    #[arg(
        long,
        conflicts_with_all = ["url", "again"],
        help = "Delete all history entries"
    )]
    clear_history: bool,

    #[arg(
        long,
        value_name = "N",
        conflicts_with = "url",
        help = "Extract history entry N (1-based, most recent first) again"
    )]
    again: Option<usize>,

    #[arg(long, help = "Check that the backend is reachable")]
    health: bool,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(url) = &self.backend {
            config = config.with_backend_url(url);
        }
        if let Some(path) = &self.history_file {
            config = config.with_history_path(path.clone());
        }
        if let Some(limit) = self.history_limit {
            config = config.with_history_limit(limit);
        }
        if let Some(secs) = self.timeout {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "vidgrab=debug" } else { "vidgrab=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn check_health(config: &Config, json: bool) -> anyhow::Result<()> {
    config.validate()?;
    let backend = HttpBackend::new(&config.backend_url)?.with_timeout(config.request_timeout);
    let status = backend
        .health()
        .await
        .with_context(|| format!("backend at {} is not reachable", backend.base_url()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let service = status.service.as_deref().unwrap_or("backend");
        match &status.version {
            Some(version) => println!("✓ {} {}: {}", service, version, status.status),
            None => println!("✓ {}: {}", service, status.status),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = args.config();

    if args.health {
        return check_health(&config, args.json).await;
    }

    let mut controller = cli_controller(&config, args.json)?;

    if args.clear_history {
        controller.clear_history()?;
        return Ok(());
    }

    let url = match (&args.url, args.again) {
        (Some(url), _) => url.clone(),
        (None, Some(index)) => match controller.history_url(index) {
            Some(url) => url.to_string(),
            None => bail!(
                "no history entry {} ({} stored)",
                index,
                controller.history().len()
            ),
        },
        (None, None) => {
            controller.show_history();
            return Ok(());
        }
    };
    if args.history {
        controller.show_history();
    }

    if let Submission::Failed(_) = controller.submit(&url).await {
        std::process::exit(1);
    }

    if let Some(format_id) = &args.download {
        controller
            .download(format_id)
            .with_context(|| format!("could not open format {}", format_id))?;
        eprintln!("✓ Opened format {} in the browser", format_id);
    }
    if let Some(index) = args.subtitle {
        controller
            .open_subtitle(index)
            .with_context(|| format!("could not open subtitle track {}", index))?;
        eprintln!("✓ Opened subtitle track {} in the browser", index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_history_rejects_url() {
        let with_url = ["vidgrab", "--clear-history", "https://youtu.be/abc"];
        assert!(Args::try_parse_from(with_url).is_err());
        assert!(Args::try_parse_from(["vidgrab", "--clear-history", "--again", "1"]).is_err());

        let args = Args::try_parse_from(["vidgrab", "--clear-history"]).unwrap();
        assert!(args.clear_history);
        assert!(args.url.is_none());
    }

    #[test]
    fn test_flags_map_onto_config() {
        let args = Args::try_parse_from([
            "vidgrab",
            "--backend",
            "https://api.example.org",
            "--history-limit",
            "20",
            "--timeout",
            "5",
            "https://vimeo.com/1",
        ])
        .unwrap();
        let config = args.config();
        assert_eq!(config.backend_url, "https://api.example.org");
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(args.url.as_deref(), Some("https://vimeo.com/1"));
    }
}
