use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::BoardError;
use crate::io::board_io::load_board;
use crate::io::config_io::BOARD_FILE;
use crate::io::signal;
use crate::model::board::Board;

/// Quiet window for coalescing native event bursts (a move is two file
/// events; a rank renumber is several).
const DEBOUNCE: Duration = Duration::from_millis(100);
/// Reload cadence in polling fallback mode.
const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// How often the wait loops check the stop flag.
const TICK: Duration = Duration::from_millis(200);
/// Consecutive reload failures tolerated before one is surfaced.
const FAILURE_THRESHOLD: u32 = 5;

/// Messages from the notify callback thread to the watch loop.
enum WatchSignal {
    /// A relevant file changed.
    Changed,
    /// The subscription reported a runtime error; native mode is over.
    Lost,
}

/// An owned watch session over one board root.
///
/// `run` renders once immediately, then re-renders on changes: via a
/// recursive notify subscription when one can be established, otherwise
/// by polling the board and diffing snapshots. A session that loses its
/// native subscription falls back to polling for the rest of its life —
/// there is no retry. Renders are serialized: the loop never starts a
/// render while one is in flight, and changes that arrive mid-render are
/// coalesced into exactly one follow-up render.
pub struct WatchSession {
    root: PathBuf,
    stop: Arc<AtomicBool>,
}

impl WatchSession {
    pub fn new(root: &Path) -> Self {
        WatchSession {
            root: root.to_path_buf(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for stopping the session from another thread (or a test).
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst) || signal::stop_requested()
    }

    /// Run until stopped. Blocks the calling thread.
    pub fn run<F>(&self, render: &mut F) -> Result<(), BoardError>
    where
        F: FnMut(&Board) -> Result<(), BoardError>,
    {
        let board = load_board(&self.root)?;
        render(&board)?;

        let (tx, rx) = mpsc::channel();
        let subscription = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if event_is_relevant(&event) {
                        let _ = tx.send(WatchSignal::Changed);
                    }
                }
                Err(_) => {
                    let _ = tx.send(WatchSignal::Lost);
                }
            },
            Config::default(),
        );

        let native = match subscription {
            Ok(mut watcher) => match watcher.watch(&self.root, RecursiveMode::Recursive) {
                Ok(()) => Some(watcher),
                Err(e) => {
                    log::warn!("cannot watch {}: {}", self.root.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("file notifications unavailable: {}", e);
                None
            }
        };

        match native {
            Some(watcher) => self.run_native(watcher, rx, board, render),
            None => self.run_polling(Some(board), render),
        }
    }

    /// Native mode: block on the channel, debounce bursts, render.
    fn run_native<F>(
        &self,
        watcher: RecommendedWatcher,
        rx: Receiver<WatchSignal>,
        initial: Board,
        render: &mut F,
    ) -> Result<(), BoardError>
    where
        F: FnMut(&Board) -> Result<(), BoardError>,
    {
        let mut last = Some(initial);
        let mut failures = 0u32;

        loop {
            if self.stopped() {
                return Ok(());
            }
            match rx.recv_timeout(TICK) {
                Ok(WatchSignal::Changed) => {
                    let lost = self.debounce(&rx);
                    if self.stopped() {
                        return Ok(());
                    }
                    self.reload_and_render(&mut last, &mut failures, true, render)?;
                    if lost {
                        break;
                    }
                }
                Ok(WatchSignal::Lost) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => continue,
            }
        }

        drop(watcher);
        log::warn!("native file watching lost, switching to polling");
        self.run_polling(last, render)
    }

    /// Drain the channel until the debounce window passes with no new
    /// events — each arrival restarts the window. Returns true if the
    /// subscription died while draining.
    fn debounce(&self, rx: &Receiver<WatchSignal>) -> bool {
        loop {
            match rx.recv_timeout(DEBOUNCE) {
                Ok(WatchSignal::Changed) => continue,
                Ok(WatchSignal::Lost) | Err(RecvTimeoutError::Disconnected) => return true,
                Err(RecvTimeoutError::Timeout) => return false,
            }
        }
    }

    /// Polling fallback: reload on an interval, render only when the
    /// loaded board differs from the previous snapshot.
    fn run_polling<F>(&self, initial: Option<Board>, render: &mut F) -> Result<(), BoardError>
    where
        F: FnMut(&Board) -> Result<(), BoardError>,
    {
        let mut last = initial;
        let mut failures = 0u32;

        loop {
            if self.stopped() {
                return Ok(());
            }
            self.sleep(POLL_INTERVAL);
            if self.stopped() {
                return Ok(());
            }
            self.reload_and_render(&mut last, &mut failures, false, render)?;
        }
    }

    /// Reload the board and render. With `force`, render unconditionally;
    /// otherwise only when the snapshot changed. Load failures are
    /// tolerated silently up to the threshold, then surfaced once and the
    /// counter reset.
    fn reload_and_render<F>(
        &self,
        last: &mut Option<Board>,
        failures: &mut u32,
        force: bool,
        render: &mut F,
    ) -> Result<(), BoardError>
    where
        F: FnMut(&Board) -> Result<(), BoardError>,
    {
        match load_board(&self.root) {
            Ok(board) => {
                *failures = 0;
                if force || last.as_ref() != Some(&board) {
                    render(&board)?;
                    *last = Some(board);
                }
                Ok(())
            }
            Err(e) => {
                *failures += 1;
                if *failures >= FAILURE_THRESHOLD {
                    log::warn!("board reload failing ({} attempts): {}", failures, e);
                    *failures = 0;
                }
                Ok(())
            }
        }
    }

    /// Sleep in short slices so a stop request is honored promptly.
    fn sleep(&self, total: Duration) {
        let deadline = Instant::now() + total;
        while Instant::now() < deadline && !self.stopped() {
            std::thread::sleep(TICK.min(deadline.saturating_duration_since(Instant::now())));
        }
    }
}

/// Event filter: creations, modifications, and removals of card files or
/// the board configuration. Temp files and dotfiles never trigger a
/// render.
fn event_is_relevant(event: &Event) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }
    event.paths.iter().any(|p| path_is_relevant(p))
}

fn path_is_relevant(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || name.ends_with(".tmp") {
        return false;
    }
    name == BOARD_FILE || name.ends_with(".md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_path_relevance() {
        assert!(path_is_relevant(Path::new("/b/todo/card.md")));
        assert!(path_is_relevant(Path::new("/b/board.yaml")));
        assert!(!path_is_relevant(Path::new("/b/todo/card.md.tmp")));
        assert!(!path_is_relevant(Path::new("/b/todo/.tmpAbc123")));
        assert!(!path_is_relevant(Path::new("/b/todo/.hidden.md")));
        assert!(!path_is_relevant(Path::new("/b/todo/notes.txt")));
        assert!(!path_is_relevant(Path::new("/b/other.yaml")));
    }

    #[test]
    fn test_run_renders_once_then_honors_stop() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".kanmd");
        fs::create_dir_all(&root).unwrap();

        let session = WatchSession::new(&root);
        session.stop_handle().store(true, Ordering::SeqCst);

        let mut renders = 0;
        session
            .run(&mut |_board| {
                renders += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(renders, 1);
    }

    #[test]
    fn test_snapshot_diff_skips_unchanged_board() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".kanmd");
        let session = WatchSession::new(&root);

        let initial = load_board(&root).unwrap();
        let mut last = Some(initial);
        let mut failures = 0;
        let mut renders = 0;

        // Unchanged board: no render
        session
            .reload_and_render(&mut last, &mut failures, false, &mut |_b| {
                renders += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(renders, 0);

        // New card on disk: exactly one render
        fs::write(root.join("todo/new.md"), "# New\n").unwrap();
        session
            .reload_and_render(&mut last, &mut failures, false, &mut |_b| {
                renders += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(renders, 1);
    }

    #[test]
    fn test_reload_failures_are_tolerated() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".kanmd");
        fs::create_dir_all(&root).unwrap();
        // A directory where board.yaml should be makes every load fail
        fs::create_dir_all(root.join("board.yaml")).unwrap();

        let session = WatchSession::new(&root);
        let mut last = None;
        let mut failures = 0;
        for _ in 0..3 {
            session
                .reload_and_render(&mut last, &mut failures, false, &mut |_b| {
                    panic!("must not render while loads fail")
                })
                .unwrap();
        }
        assert_eq!(failures, 3);
    }
}
