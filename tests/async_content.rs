//! Remote step content delivered through the async fetcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stepwise::content::{ContentFetcher, FetchError, StaticFetcher};
use stepwise::surface::{MemorySurface, PanelContent};
use stepwise::uid::UidCounter;
use stepwise::{Step, Wizard, WizardBuilder, WizardOptions};

fn build(fetcher: StaticFetcher, steps: Vec<Step>) -> Wizard<MemorySurface> {
    WizardBuilder::new(WizardOptions::default())
        .uid_from(&UidCounter::new())
        .fetcher(Arc::new(fetcher))
        .build(steps, MemorySurface::new())
        .unwrap()
}

fn html(panel: &PanelContent) -> &str {
    match panel {
        PanelContent::Html(markup) => markup,
        PanelContent::Frame { src } => panic!("expected markup, got frame {src}"),
    }
}

#[tokio::test]
async fn test_remote_step_is_fetched_when_shown() {
    let fetcher = StaticFetcher::new().with("/details", "<p>fetched</p>");
    let mut w = build(
        fetcher,
        vec![
            Step::html("Intro", "<p>hi</p>"),
            Step::remote("Details", "/details"),
        ],
    );
    assert!(!w.get_step(1).unwrap().content_loaded);

    assert!(w.next().unwrap());
    let panel = &w.surface().panels[1];
    assert!(panel.busy);
    assert!(html(&panel.content).contains("Loading ..."));

    assert!(w.await_content().await);
    let panel = &w.surface().panels[1];
    assert!(!panel.busy);
    assert_eq!(html(&panel.content), "<p>fetched</p>");
    assert!(w.get_step(1).unwrap().content_loaded);
}

#[tokio::test]
async fn test_remote_start_step_is_fetched_at_init() {
    let fetcher = StaticFetcher::new().with("/start", "ready");
    let mut w = build(fetcher, vec![Step::remote("Start", "/start")]);

    assert!(w.surface().panels[0].busy);
    assert!(w.await_content().await);
    assert_eq!(html(&w.surface().panels[0].content), "ready");
}

#[tokio::test]
async fn test_failed_fetch_keeps_placeholder() {
    let mut w = build(
        StaticFetcher::new(),
        vec![Step::html("Intro", ""), Step::remote("Missing", "/missing")],
    );
    assert!(w.next().unwrap());

    // The failure is delivered but applies nothing.
    assert!(!w.await_content().await);
    assert_eq!(w.poll_content(), 0);

    let panel = &w.surface().panels[1];
    assert!(panel.busy);
    assert!(html(&panel.content).contains("spinner"));
    assert!(!w.get_step(1).unwrap().content_loaded);
}

#[tokio::test]
async fn test_content_for_removed_step_is_dropped() {
    let fetcher = StaticFetcher::new().with("/late", "late body");
    let mut w = build(
        fetcher,
        vec![
            Step::html("One", ""),
            Step::remote("Late", "/late"),
            Step::html("Three", ""),
        ],
    );
    w.next().unwrap();
    w.next().unwrap();
    assert!(w.remove(1).unwrap());

    assert!(!w.await_content().await);
    assert_eq!(w.step_count(), 2);
    for panel in &w.surface().panels {
        assert_ne!(panel.content, PanelContent::Html("late body".to_string()));
    }
}

/// Counts requests so duplicate fetches show up.
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl ContentFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("<p>{url}</p>"))
    }
}

#[tokio::test]
async fn test_revisiting_step_during_fetch_requests_once() {
    let fetcher = Arc::new(CountingFetcher::default());
    let mut w = WizardBuilder::new(WizardOptions::default())
        .uid_from(&UidCounter::new())
        .fetcher(fetcher.clone())
        .build(
            vec![Step::html("Intro", ""), Step::remote("Remote", "/remote")],
            MemorySurface::new(),
        )
        .unwrap();

    assert!(w.next().unwrap());
    assert!(w.previous().unwrap());
    assert!(w.next().unwrap());

    assert!(w.await_content().await);
    let second = tokio::time::timeout(Duration::from_millis(50), w.await_content()).await;
    assert!(second.is_err());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(html(&w.surface().panels[1].content), "<p>/remote</p>");
}

#[tokio::test]
async fn test_uncached_step_fetches_again_after_completion() {
    let fetcher = Arc::new(CountingFetcher::default());
    let mut w = WizardBuilder::new(WizardOptions {
        enable_content_cache: false,
        ..WizardOptions::default()
    })
    .uid_from(&UidCounter::new())
    .fetcher(fetcher.clone())
    .build(
        vec![Step::html("Intro", ""), Step::remote("Remote", "/remote")],
        MemorySurface::new(),
    )
    .unwrap();

    assert!(w.next().unwrap());
    assert!(w.await_content().await);
    assert!(w.previous().unwrap());
    assert!(w.next().unwrap());
    assert!(w.await_content().await);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}
