//! Transient notifications.
//!
//! `Toast` is a clock-driven state machine; callers pass `now` so tests can
//! step time. `ToastHost` binds one to the wall clock behind the `Notifier`
//! seam the pages report through.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::info;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Where pages send user-facing messages.
pub trait Notifier {
    fn notify(&self, message: &str, kind: ToastKind);
}

#[derive(Debug, Clone)]
pub struct Toast {
    duration: Duration,
    message: String,
    kind: ToastKind,
    shown_at: Option<Instant>,
}

impl Toast {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            message: String::new(),
            kind: ToastKind::Info,
            shown_at: None,
        }
    }

    /// Replace whatever is showing and restart the hide timer.
    pub fn show(&mut self, message: &str, kind: ToastKind, now: Instant) {
        self.message = message.to_string();
        self.kind = kind;
        self.shown_at = Some(now);
    }

    /// Hide once `duration` has elapsed since `show`. Returns whether it is
    /// still visible.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self
            .shown_at
            .is_some_and(|shown| now.saturating_duration_since(shown) >= self.duration)
        {
            self.shown_at = None;
        }
        self.is_visible()
    }

    pub fn is_visible(&self) -> bool {
        self.shown_at.is_some()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

/// A single toast slot driven by `Instant::now()`.
#[derive(Debug, Default)]
pub struct ToastHost {
    toast: Mutex<Toast>,
}

impl ToastHost {
    pub fn new(duration: Duration) -> Self {
        Self {
            toast: Mutex::new(Toast::new(duration)),
        }
    }

    pub fn duration(&self) -> Duration {
        self.toast.lock().unwrap_or_else(|p| p.into_inner()).duration()
    }

    /// The message currently on screen, if any.
    pub fn current(&self) -> Option<(String, ToastKind)> {
        let mut toast = self.toast.lock().unwrap_or_else(|p| p.into_inner());
        toast
            .tick(Instant::now())
            .then(|| (toast.message().to_string(), toast.kind()))
    }
}

impl Notifier for ToastHost {
    fn notify(&self, message: &str, kind: ToastKind) {
        info!("toast ({kind:?}): {message}");
        let mut toast = self.toast.lock().unwrap_or_else(|p| p.into_inner());
        toast.show(message, kind, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_hides_after_duration() {
        let start = Instant::now();
        let mut toast = Toast::default();
        toast.show("Usuario registrado", ToastKind::Success, start);

        assert!(toast.tick(start + Duration::from_millis(2499)));
        assert!(!toast.tick(start + Duration::from_millis(2500)));
        assert_eq!(toast.message(), "Usuario registrado");
    }

    #[test]
    fn new_message_restarts_timer() {
        let start = Instant::now();
        let mut toast = Toast::new(Duration::from_millis(100));
        toast.show("first", ToastKind::Info, start);
        toast.show("second", ToastKind::Error, start + Duration::from_millis(80));

        assert!(toast.tick(start + Duration::from_millis(150)));
        assert_eq!(toast.message(), "second");
        assert_eq!(toast.kind(), ToastKind::Error);
        assert!(!toast.tick(start + Duration::from_millis(180)));
    }

    #[test]
    fn fresh_toast_is_hidden() {
        let mut toast = Toast::default();
        assert!(!toast.tick(Instant::now()));
    }

    #[test]
    fn unbounded_duration_stays_visible() {
        let start = Instant::now();
        let mut toast = Toast::new(Duration::MAX);
        toast.show("fijo", ToastKind::Info, start);

        assert!(toast.tick(start + Duration::from_secs(86_400)));

        let host = ToastHost::new(Duration::MAX);
        host.notify("fijo", ToastKind::Info);
        assert_eq!(host.current(), Some(("fijo".to_string(), ToastKind::Info)));
    }

    #[test]
    fn host_shows_latest_message() {
        let host = ToastHost::new(Duration::from_secs(60));
        assert_eq!(host.current(), None);
        host.notify("Error interno", ToastKind::Error);
        assert_eq!(
            host.current(),
            Some(("Error interno".to_string(), ToastKind::Error))
        );
    }
}
