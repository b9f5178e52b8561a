pub mod client;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod history;
mod http;
pub mod platform;
pub mod render;

pub use client::{Backend, ExtractionClient, HttpBackend};
pub use config::Config;
pub use controller::{Controller, PageState, Submission};
pub use crate::core::{Extraction, ExtractionResult, Format, FormatKind, SubtitleInfo};
pub use error::{ExtractionFailure, Result, ValidationError, VidgrabError};
pub use history::{FileStorage, HistoryEntry, HistoryStore, MemoryStorage};
pub use platform::{Platform, detect};
pub use render::{BrowserOpener, TerminalView, partition};

/// Controller wired to the HTTP backend, file history, and terminal output
pub type CliController = Controller<
    HttpBackend,
    FileStorage,
    TerminalView<std::io::Stdout, std::io::Stderr>,
    BrowserOpener,
>;

/// Build a [`CliController`] from `config`
pub fn cli_controller(config: &Config, json: bool) -> Result<CliController> {
    config.validate()?;
    let backend = HttpBackend::new(&config.backend_url)?.with_timeout(config.request_timeout);
    let client = ExtractionClient::new(backend).with_timeout(config.request_timeout);
    let storage = FileStorage::new(config.history_path.clone());
    let history = HistoryStore::load(storage, config.history_limit);
    Ok(Controller::new(
        client,
        history,
        TerminalView::stdio(json),
        BrowserOpener,
    ))
}
