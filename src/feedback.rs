//! User-facing feedback: the log panel, toasts and the server status line.
//!
//! This is what the user sees, separate from the `log` diagnostics. The CLI
//! enables `echo` so every line is printed as it is recorded.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_TTL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown,
    Online,
    Offline,
}

impl ServerStatus {
    pub fn label(self) -> &'static str {
        match self {
            ServerStatus::Unknown => "-",
            ServerStatus::Online => "ONLINE",
            ServerStatus::Offline => "OFFLINE",
        }
    }
}

#[derive(Debug)]
pub struct Feedback {
    echo: bool,
    log: Mutex<Vec<String>>,
    toasts: Mutex<Vec<Toast>>,
    status: Mutex<ServerStatus>,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(false)
    }
}

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Feedback {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            log: Mutex::new(Vec::new()),
            toasts: Mutex::new(Vec::new()),
            status: Mutex::new(ServerStatus::Unknown),
        }
    }

    /// Append a timestamped line to the log panel.
    pub fn log(&self, msg: &str) {
        let line = format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), msg);
        if self.echo {
            eprintln!("{}", line);
        }
        guard(&self.log).push(line);
    }

    /// Show a transient notification.
    pub fn toast(&self, msg: &str) {
        let text = format!("// {}", msg);
        if self.echo {
            println!("{}", text);
        }
        guard(&self.toasts).push(Toast {
            text,
            shown_at: Instant::now(),
        });
    }

    pub fn set_status(&self, status: ServerStatus) {
        *guard(&self.status) = status;
    }

    pub fn status(&self) -> ServerStatus {
        *guard(&self.status)
    }

    pub fn log_lines(&self) -> Vec<String> {
        guard(&self.log).clone()
    }

    /// Toasts still on screen; expired ones are pruned.
    pub fn visible_toasts(&self) -> Vec<String> {
        let now = Instant::now();
        let mut toasts = guard(&self.toasts);
        toasts.retain(|t| !t.is_expired(now));
        toasts.iter().map(|t| t.text.clone()).collect()
    }

    /// Every toast ever shown, expired or not.
    pub fn toast_history(&self) -> Vec<String> {
        guard(&self.toasts).iter().map(|t| t.text.clone()).collect()
    }
}

/// Replace known missing-dependency errors with an install hint.
pub fn error_hint(message: &str) -> String {
    if message.contains("soffice") {
        "LIBREOFFICE NOT FOUND. PLEASE INSTALL IT.".to_string()
    } else if message.contains("ffmpeg") {
        "FFMPEG NOT FOUND. PLEASE INSTALL IT.".to_string()
    } else {
        message.to_string()
    }
}
