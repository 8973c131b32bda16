// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for document ingestion
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionStats {
    pub documents_ingested: usize,
    pub segments_created: usize,
    pub segments_embedded: usize,
    pub total_chars: u64,
    pub duration_ms: u64,
}

impl IngestionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.segments_embedded as f64 * 1000.0 / self.duration_ms as f64
    }

    pub fn average_segment_chars(&self) -> f64 {
        if self.segments_created == 0 {
            return 0.0;
        }
        self.total_chars as f64 / self.segments_created as f64
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    documents_ingested: Arc<AtomicUsize>,
    segments_created: Arc<AtomicUsize>,
    segments_embedded: Arc<AtomicUsize>,
    chars_processed: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_segments: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_segments as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(main_bar, detail_bar)
    }

    /// A tracker that records statistics without drawing anything.
    pub fn hidden() -> Self {
        Self::from_bars(ProgressBar::hidden(), ProgressBar::hidden())
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            documents_ingested: Arc::new(AtomicUsize::new(0)),
            segments_created: Arc::new(AtomicUsize::new(0)),
            segments_embedded: Arc::new(AtomicUsize::new(0)),
            chars_processed: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn add_segments(&self, count: usize, chars: u64) {
        self.segments_created.fetch_add(count, Ordering::SeqCst);
        self.chars_processed.fetch_add(chars, Ordering::SeqCst);
        self.main_bar.inc_length(count as u64);
        self.update_detail_bar();
    }

    pub fn inc_segments_embedded(&self, count: usize) {
        self.segments_embedded.fetch_add(count, Ordering::SeqCst);
        self.main_bar.inc(count as u64);
        self.update_detail_bar();
    }

    pub fn inc_documents_ingested(&self) {
        self.documents_ingested.fetch_add(1, Ordering::SeqCst);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.detail_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Embedding complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> IngestionStats {
        IngestionStats {
            documents_ingested: self.documents_ingested.load(Ordering::SeqCst),
            segments_created: self.segments_created.load(Ordering::SeqCst),
            segments_embedded: self.segments_embedded.load(Ordering::SeqCst),
            total_chars: self.chars_processed.load(Ordering::SeqCst),
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }

    fn update_detail_bar(&self) {
        let documents = self.documents_ingested.load(Ordering::SeqCst);
        let segments = self.segments_created.load(Ordering::SeqCst);

        let message = format!("Documents: {} | Segments: {}", documents, segments);

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Bar template and fill characters; the plain variant carries no colour directives.
fn progress_bar_style(colored: bool) -> (&'static str, &'static str) {
    if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments {msg}",
            "█▓▒░",
        )
    } else {
        (
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} segments {msg}",
            "=>-",
        )
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, progress_chars) = progress_bar_style(colored);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .expect("Failed to create progress bar template")
            .progress_chars(progress_chars),
    );
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_stats_calculations() {
        let mut stats = IngestionStats::new();
        stats.segments_created = 10;
        stats.segments_embedded = 10;
        stats.total_chars = 3000;
        stats.duration_ms = 2000;

        assert_eq!(stats.segments_per_second(), 5.0);
        assert_eq!(stats.average_segment_chars(), 300.0);
    }

    #[test]
    fn test_ingestion_stats_zero_duration() {
        let stats = IngestionStats::new();
        assert_eq!(stats.segments_per_second(), 0.0);
        assert_eq!(stats.average_segment_chars(), 0.0);
    }

    #[test]
    fn test_plain_progress_style_has_no_colors() {
        let (plain, _) = progress_bar_style(false);
        let (colored, _) = progress_bar_style(true);
        assert!(!plain.contains(".green") && !plain.contains(".cyan"));
        assert!(colored.contains(".green"));

        let tracker = ProgressTracker::with_color(2, false);
        tracker.add_segments(2, 10);
        tracker.inc_segments_embedded(2);
        assert_eq!(tracker.get_stats().segments_embedded, 2);
    }

    #[test]
    fn test_progress_tracker_counts() {
        let tracker = ProgressTracker::hidden();

        tracker.add_segments(4, 1024);
        tracker.inc_segments_embedded(3);
        tracker.inc_documents_ingested();

        let stats = tracker.get_stats();
        assert_eq!(stats.segments_created, 4);
        assert_eq!(stats.segments_embedded, 3);
        assert_eq!(stats.documents_ingested, 1);
        assert_eq!(stats.total_chars, 1024);
    }
}
