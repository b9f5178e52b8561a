use crate::controller::PageState;
use crate::core::{Extraction, Format, FormatKind, SubtitleInfo};
use crate::error::Result;
use crate::history::HistoryEntry;

pub mod terminal;

pub use terminal::TerminalView;

/// Formats grouped by stream content, each in backend order
#[derive(Debug, Default, PartialEq)]
pub struct FormatBuckets<'a> {
    pub video: Vec<&'a Format>,
    pub video_only: Vec<&'a Format>,
    pub audio: Vec<&'a Format>,
}

impl FormatBuckets<'_> {
    pub fn len(&self) -> usize {
        self.video.len() + self.video_only.len() + self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split formats into disjoint buckets; formats with neither stream are left out
pub fn partition(formats: &[Format]) -> FormatBuckets<'_> {
    let mut buckets = FormatBuckets::default();
    for format in formats {
        match format.category() {
            Some(FormatKind::Video) => buckets.video.push(format),
            Some(FormatKind::VideoOnly) => buckets.video_only.push(format),
            Some(FormatKind::Audio) => buckets.audio.push(format),
            None => {}
        }
    }
    buckets
}

/// Launches a resource URL outside the application
pub trait Opener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs in the system web browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener;

impl Opener for BrowserOpener {
    fn open(&self, url: &str) -> Result<()> {
        webbrowser::open(url)?;
        Ok(())
    }
}

/// Snapshot of controller state handed to a [`View`]
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub state: &'a PageState,
    pub extraction: Option<&'a Extraction>,
    pub subtitles: Option<&'a SubtitleInfo>,
}

impl<'a> Page<'a> {
    pub fn formats(&self) -> FormatBuckets<'a> {
        self.extraction
            .map(|e| partition(&e.result.formats))
            .unwrap_or_default()
    }
}

/// Presentation layer driven by the controller
pub trait View {
    /// Called after every state change
    fn render(&mut self, page: &Page<'_>);

    fn render_history(&mut self, history: &[HistoryEntry]);
}

/// `m:ss`, or `h:mm:ss` from one hour on; `N/A` when unknown
pub fn format_duration(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds.filter(|s| *s > 0) else {
        return "N/A".to_string();
    };
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Compact count such as `1.2K` or `3.4M`
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Age of an epoch-millisecond timestamp relative to `now_ms`
pub fn format_relative(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms).max(0);
    let minutes = diff / 60_000;
    let hours = diff / 3_600_000;
    let days = diff / 86_400_000;
    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::format;

    #[test]
    fn test_partition_is_disjoint() {
        let formats = vec![
            format("1", true, true),
            format("2", true, false),
            format("3", false, true),
            format("4", false, false),
            format("5", true, true),
        ];
        let buckets = partition(&formats);

        let ids = |v: &[&Format]| v.iter().map(|f| f.format_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&buckets.video), ["1", "5"]);
        assert_eq!(ids(&buckets.video_only), ["2"]);
        assert_eq!(ids(&buckets.audio), ["3"]);
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn test_partition_ignores_type_label() {
        let mut mislabeled = format("1", false, true);
        mislabeled.kind = Some(FormatKind::Video);
        let formats = [mislabeled];
        let buckets = partition(&formats);
        assert!(buckets.video.is_empty());
        assert_eq!(buckets.audio.len(), 1);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "N/A");
        assert_eq!(format_duration(Some(0)), "N/A");
        assert_eq!(format_duration(Some(59)), "0:59");
        assert_eq!(format_duration(Some(323)), "5:23");
        assert_eq!(format_duration(Some(3_725)), "1:02:05");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_247), "1.2K");
        assert_eq!(format_count(52_341), "52.3K");
        assert_eq!(format_count(3_400_000), "3.4M");
    }

    #[test]
    fn test_format_relative() {
        let now = 1_700_000_000_000;
        assert_eq!(format_relative(now - 5 * 60_000, now), "5m ago");
        assert_eq!(format_relative(now - 3 * 3_600_000, now), "3h ago");
        assert_eq!(format_relative(now - 2 * 86_400_000, now), "2d ago");
        // clock skew
        assert_eq!(format_relative(now + 10_000, now), "0m ago");
    }
}
