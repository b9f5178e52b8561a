//! Extraction workflow for one interactive session.
//!
//! ```text
//! Idle -> Validating -> Extracting -> Ready | Failed
//!            ^                          |
//!            +------- next submit ------+
//! ```

use tracing::{debug, info, warn};

use crate::client::{Backend, ExtractionClient, validate_url};
use crate::core::{Extraction, SubtitleInfo};
use crate::error::{Result, VidgrabError};
use crate::history::{HistoryEntry, HistoryStorage, HistoryStore};
use crate::platform::detect;
use crate::render::{Opener, Page, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Validating,
    Extracting,
    /// Success notice for the current result
    Ready(String),
    /// User-facing error message
    Failed(String),
}

/// What became of a submit
#[derive(Debug)]
pub enum Submission {
    Ready,
    Failed(VidgrabError),
}

pub struct Controller<B, S, V, O> {
    client: ExtractionClient<B>,
    history: HistoryStore<S>,
    view: V,
    opener: O,
    state: PageState,
    extraction: Option<Extraction>,
    subtitles: Option<SubtitleInfo>,
}

impl<B, S, V, O> Controller<B, S, V, O>
where
    B: Backend,
    S: HistoryStorage,
    V: View,
    O: Opener,
{
    pub fn new(client: ExtractionClient<B>, history: HistoryStore<S>, view: V, opener: O) -> Self {
        Self {
            client,
            history,
            view,
            opener,
            state: PageState::Idle,
            extraction: None,
            subtitles: None,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        self.extraction.as_ref()
    }

    pub fn subtitles(&self) -> Option<&SubtitleInfo> {
        self.subtitles.as_ref()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn client(&self) -> &ExtractionClient<B> {
        &self.client
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    fn transition(&mut self, state: PageState) {
        debug!(from = ?self.state, to = ?state, "state change");
        self.state = state;
        self.render();
    }

    fn render(&mut self) {
        let page = Page {
            state: &self.state,
            extraction: self.extraction.as_ref(),
            subtitles: self.subtitles.as_ref(),
        };
        self.view.render(&page);
    }

    /// Validate `input`, extract it, record it in history, and fetch subtitles.
    ///
    /// The exclusive borrow keeps a second submit out while one is in flight.
    /// A submit dropped mid-extraction leaves the state at `Extracting` until
    /// the next submit replaces it.
    pub async fn submit(&mut self, input: &str) -> Submission {
        if self.state == PageState::Extracting {
            debug!("previous extraction was abandoned");
        }

        self.extraction = None;
        self.subtitles = None;
        self.transition(PageState::Validating);

        let url = match validate_url(input) {
            Ok(url) => url,
            Err(e) => return self.fail(e.into()),
        };
        debug!(url = %url, platform = %detect(&url), "input accepted");

        self.transition(PageState::Extracting);
        let extraction = match self.client.extract(&url).await {
            Ok(extraction) => extraction,
            Err(e) => return self.fail(e),
        };

        let entry = HistoryEntry::from_extraction(&url, &extraction);
        if let Err(e) = self.history.append(entry) {
            warn!(error = %e, "failed to persist history");
        }

        let notice = format!("Successfully extracted video using {}!", extraction.method);
        self.extraction = Some(extraction);
        self.transition(PageState::Ready(notice));

        if let Some(subtitles) = self.client.fetch_subtitles(&url).await {
            info!(tracks = subtitles.subtitle_data.len(), "subtitles available");
            self.subtitles = Some(subtitles);
            self.render();
        }
        Submission::Ready
    }

    fn fail(&mut self, error: VidgrabError) -> Submission {
        info!(error = %error, "extraction failed");
        self.transition(PageState::Failed(error.to_string()));
        Submission::Failed(error)
    }

    /// Open the direct URL of a format from the current result
    pub fn download(&self, format_id: &str) -> Result<()> {
        let extraction = self.extraction.as_ref().ok_or(VidgrabError::NoResult)?;
        let format = extraction
            .result
            .formats
            .iter()
            .find(|f| f.format_id == format_id && !f.url.is_empty())
            .ok_or_else(|| VidgrabError::FormatNotFound(format_id.to_string()))?;
        info!(format_id, quality = format.quality_label(), "opening download");
        self.opener.open(&format.url)
    }

    /// Open subtitle track `index` (1-based) of the current result
    pub fn open_subtitle(&self, index: usize) -> Result<()> {
        let track = self
            .subtitles
            .as_ref()
            .and_then(|s| index.checked_sub(1).and_then(|i| s.subtitle_data.get(i)))
            .ok_or(VidgrabError::SubtitleNotFound(index))?;
        info!(language = %track.language_name, "opening subtitles");
        self.opener.open(&track.url)
    }

    /// URL of history row `index` (1-based, most recent first)
    pub fn history_url(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.history.entries().get(i))
            .map(|e| e.url.as_str())
    }

    pub fn show_history(&mut self) {
        self.view.render_history(self.history.entries());
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()?;
        info!("history cleared");
        self.show_history();
        Ok(())
    }
}
