use std::io::{self, Stderr, Stdout, Write};
use tracing::warn;

use crate::controller::PageState;
use crate::core::{Extraction, Format, SubtitleInfo};
use crate::history::HistoryEntry;
use crate::render::{Page, View, format_count, format_duration, format_relative};

/// History rows shown in a listing
pub const HISTORY_DISPLAY_LIMIT: usize = 10;

/// Line-oriented view; results go to `out`, progress and errors to `err`
pub struct TerminalView<O, E> {
    out: O,
    err: E,
    json: bool,
    result_shown: bool,
    subtitles_shown: bool,
}

impl TerminalView<Stdout, Stderr> {
    pub fn stdio(json: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), json)
    }
}

impl<O: Write, E: Write> TerminalView<O, E> {
    pub fn new(out: O, err: E, json: bool) -> Self {
        Self {
            out,
            err,
            json,
            result_shown: false,
            subtitles_shown: false,
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    fn write_page(&mut self, page: &Page<'_>) -> io::Result<()> {
        match page.state {
            PageState::Idle => Ok(()),
            PageState::Validating => {
                self.result_shown = false;
                self.subtitles_shown = false;
                Ok(())
            }
            PageState::Extracting => writeln!(self.err, "Extracting..."),
            PageState::Failed(message) => writeln!(self.err, "✗ Error: {}", message),
            PageState::Ready(notice) => {
                if !self.result_shown
                    && let Some(extraction) = page.extraction
                {
                    self.result_shown = true;
                    writeln!(self.err, "✓ {}", notice)?;
                    if self.json {
                        writeln!(self.out, "{}", serde_json::to_string_pretty(extraction)?)?;
                    } else {
                        self.write_extraction(extraction, page)?;
                    }
                }
                if !self.subtitles_shown
                    && let Some(subtitles) = page.subtitles
                {
                    self.subtitles_shown = true;
                    if self.json {
                        writeln!(self.out, "{}", serde_json::to_string_pretty(subtitles)?)?;
                    } else {
                        self.write_subtitles(subtitles)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn write_extraction(&mut self, extraction: &Extraction, page: &Page<'_>) -> io::Result<()> {
        let result = &extraction.result;
        writeln!(self.out)?;
        writeln!(self.out, "{}", result.title)?;
        writeln!(self.out, "    Platform: {}", result.platform)?;
        writeln!(self.out, "    Duration: {}", format_duration(result.duration))?;
        if let Some(uploader) = &result.uploader {
            writeln!(self.out, "    Uploader: {}", uploader)?;
        }
        if let Some(views) = result.view_count {
            writeln!(self.out, "    Views: {}", format_count(views))?;
        }

        let buckets = page.formats();
        if buckets.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "No downloadable formats found.")?;
            return Ok(());
        }
        self.write_formats("Video formats", &buckets.video)?;
        self.write_formats("Video only", &buckets.video_only)?;
        self.write_formats("Audio only", &buckets.audio)
    }

    fn write_formats(&mut self, heading: &str, formats: &[&Format]) -> io::Result<()> {
        if formats.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}:", heading)?;
        for format in formats {
            writeln!(
                self.out,
                "  [{}] {}  {}  {}",
                format.format_id,
                format.quality_label(),
                format.ext.as_deref().unwrap_or("?").to_uppercase(),
                format.filesize_readable.as_deref().unwrap_or("Unknown"),
            )?;
        }
        Ok(())
    }

    fn write_subtitles(&mut self, subtitles: &SubtitleInfo) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Subtitles ({}):", subtitles.subtitle_data.len())?;
        for (index, track) in subtitles.subtitle_data.iter().enumerate() {
            writeln!(
                self.out,
                "  [{}] {}  {} • {}",
                index + 1,
                track.language_name,
                track.kind.label(),
                track.format.to_uppercase(),
            )?;
        }
        Ok(())
    }

    fn write_history(&mut self, history: &[HistoryEntry]) -> io::Result<()> {
        if self.json {
            return writeln!(self.out, "{}", serde_json::to_string_pretty(history)?);
        }
        if history.is_empty() {
            return writeln!(self.out, "No history yet.");
        }

        let now = chrono::Utc::now().timestamp_millis();
        writeln!(self.out, "Download history ({} items):", history.len())?;
        for (index, entry) in history.iter().take(HISTORY_DISPLAY_LIMIT).enumerate() {
            writeln!(self.out, "  [{}] {}", index + 1, entry.title)?;
            writeln!(
                self.out,
                "      {} • {} • {}",
                entry.platform,
                format_relative(entry.timestamp, now),
                entry.url
            )?;
        }
        Ok(())
    }
}

impl<O: Write, E: Write> View for TerminalView<O, E> {
    fn render(&mut self, page: &Page<'_>) {
        if let Err(e) = self.write_page(page) {
            warn!(error = %e, "failed to write output");
        }
    }

    fn render_history(&mut self, history: &[HistoryEntry]) {
        if let Err(e) = self.write_history(history) {
            warn!(error = %e, "failed to write output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::sample_extraction;
    use crate::core::{SubtitleKind, SubtitleTrack};

    fn view() -> TerminalView<Vec<u8>, Vec<u8>> {
        TerminalView::new(Vec::new(), Vec::new(), false)
    }

    fn output(view: TerminalView<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, err) = view.into_parts();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_ready_page_groups_formats() {
        let extraction = sample_extraction();
        let state = PageState::Ready("done".to_string());
        let mut view = view();
        view.render(&Page {
            state: &state,
            extraction: Some(&extraction),
            subtitles: None,
        });

        let (out, err) = output(view);
        assert!(err.contains("✓ done"));
        assert!(out.contains("Sample"));
        assert!(out.contains("Duration: 5:23"));
        assert!(out.contains("Video formats:\n  [22] q22  MP4  1.0 MB\n  [18]"));
        assert!(out.contains("Audio only:\n  [140]"));
        assert!(!out.contains("Video only:"));
    }

    #[test]
    fn test_result_is_not_repeated_when_subtitles_arrive() {
        let extraction = sample_extraction();
        let subtitles = SubtitleInfo {
            available: true,
            subtitle_data: vec![SubtitleTrack {
                language: Some("en".to_string()),
                language_name: "English".to_string(),
                kind: SubtitleKind::Manual,
                format: "srt".to_string(),
                url: "https://subs.example/en.srt".to_string(),
            }],
            message: None,
        };
        let state = PageState::Ready("done".to_string());
        let mut view = view();
        view.render(&Page {
            state: &state,
            extraction: Some(&extraction),
            subtitles: None,
        });
        view.render(&Page {
            state: &state,
            extraction: Some(&extraction),
            subtitles: Some(&subtitles),
        });

        let (out, _) = output(view);
        assert_eq!(out.matches("Video formats:").count(), 1);
        assert!(out.contains("Subtitles (1):\n  [1] English  Manual • SRT"));
    }

    #[test]
    fn test_failure_goes_to_stderr() {
        let state = PageState::Failed("Please enter a valid URL".to_string());
        let mut view = view();
        view.render(&Page {
            state: &state,
            extraction: None,
            subtitles: None,
        });
        let (out, err) = output(view);
        assert!(out.is_empty());
        assert_eq!(err, "✗ Error: Please enter a valid URL\n");
    }

    #[test]
    fn test_history_listing_is_capped() {
        let entries: Vec<HistoryEntry> = (0..12)
            .map(|n| HistoryEntry {
                id: n.to_string(),
                url: format!("https://vimeo.com/{n}"),
                title: format!("Clip {n}"),
                platform: "Vimeo".to_string(),
                timestamp: chrono::Utc::now().timestamp_millis(),
                thumbnail: String::new(),
                method: None,
            })
            .collect();
        let mut view = view();
        view.render_history(&entries);
        view.render_history(&[]);

        let (out, _) = output(view);
        assert!(out.starts_with("Download history (12 items):"));
        assert!(out.contains("[10] Clip 9"));
        assert!(!out.contains("Clip 10"));
        assert!(out.ends_with("No history yet.\n"));
    }
}
