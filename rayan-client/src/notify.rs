//! User-facing notices
//!
//! Controllers report every outcome through a [`Notifier`]. [`NoticeBoard`]
//! keeps a stack of transient notices for a UI to render; [`TracingNotifier`]
//! writes them to the log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// How long a notice stays on the board
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Sink for notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Logs notices through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::error!("{}", notice.message),
            NoticeLevel::Warning => tracing::warn!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(kind = notice.level.as_str(), "{}", notice.message)
            }
        }
    }
}

/// Stack of transient notices, newest last.
///
/// Notices expire after the board's TTL. Expired entries are dropped on
/// every insert and read, so a board nobody polls stays bounded.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_NOTICE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn live_at(&self, now: Instant) -> MutexGuard<'_, Vec<Notice>> {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        notices.retain(|n| now.saturating_duration_since(n.raised_at) < self.ttl);
        notices
    }

    /// Notices still visible at `now`, oldest first
    pub fn active_at(&self, now: Instant) -> Vec<Notice> {
        self.live_at(now).clone()
    }

    pub fn active(&self) -> Vec<Notice> {
        self.active_at(Instant::now())
    }

    /// Live notices of one level
    pub fn count(&self, level: NoticeLevel) -> usize {
        self.live_at(Instant::now())
            .iter()
            .filter(|n| n.level == level)
            .count()
    }

    pub fn len(&self) -> usize {
        self.live_at(Instant::now()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        self.live_at(Instant::now()).push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_stacks_and_expires() {
        let board = NoticeBoard::with_ttl(Duration::from_secs(3));
        board.notify(Notice::success("Banner added"));
        board.notify(Notice::error("Request failed"));
        assert_eq!(board.len(), 2);
        assert_eq!(board.count(NoticeLevel::Error), 1);

        let now = Instant::now();
        assert_eq!(board.active_at(now).len(), 2);
        assert!(board.active_at(now + Duration::from_secs(4)).is_empty());
        assert!(board.is_empty());
    }

    #[test]
    fn test_expired_notices_dropped_on_insert() {
        let board = NoticeBoard::with_ttl(Duration::from_millis(20));
        for i in 0..100 {
            board.notify(Notice::info(format!("notice {i}")));
        }
        std::thread::sleep(Duration::from_millis(40));
        board.notify(Notice::success("Coupon added"));

        let stored = board.notices.lock().unwrap().len();
        assert_eq!(stored, 1);
        assert_eq!(board.active()[0].message, "Coupon added");
    }

    #[test]
    fn test_shared_handles() {
        let board = Arc::new(NoticeBoard::new());
        let by_ref: &NoticeBoard = &board;
        by_ref.notify(Notice::info("one"));
        board.notify(Notice::warning("two"));
        let active = board.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[1].level, NoticeLevel::Warning);

        let clone = (*board).clone();
        clone.clear();
        assert!(board.is_empty());
    }
}
