use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::time::Duration;

const DOTS12: &[&str] = &[
    "⢀⠀", "⡀⠀", "⠄⠀", "⢂⠀", "⡂⠀", "⠅⠀", "⢃⠀", "⡃⠀", "⠍⠀", "⢋⠀", "⡋⠀", "⠍⠁", "⢋⠁", "⡋⠁",
    "⠍⠉", "⠋⠉", "⠋⠉", "⠉⠙", "⠉⠙", "⠉⠩", "⠈⢙", "⠈⡙", "⢈⠩", "⡀⢙", "⠄⡙", "⢂⠩", "⡂⢘", "⠅⡘",
    "⢃⠨", "⡃⢐", "⠍⡐", "⢋⠠", "⡋⢀", "⠍⡁", "⢋⠁", "⡋⠁", "⠍⠉", "⠋⠉", "⠋⠉", "⠉⠙", "⠉⠙", "⠉⠩",
    "⠈⢙", "⠈⡙", "⠈⠩", "⠀⢙", "⠀⡙", "⠀⠩", "⠀⢘", "⠀⡘", "⠀⠨", "⠀⢐", "⠀⡐", "⠀⠠", "⠀⢀", "⠀⡀",
];

const PONG: &[&str] = &[
    "▐⠂       ▌",
    "▐⠈       ▌",
    "▐ ⠂      ▌",
    "▐ ⠠      ▌",
    "▐  ⡀     ▌",
    "▐  ⠠     ▌",
    "▐   ⠂    ▌",
    "▐   ⠈    ▌",
    "▐    ⠂   ▌",
    "▐    ⠠   ▌",
    "▐     ⡀  ▌",
    "▐     ⠠  ▌",
    "▐      ⠂ ▌",
    "▐      ⠈ ▌",
    "▐       ⠂▌",
    "▐       ⠠▌",
    "▐       ⡀▌",
    "▐      ⠠ ▌",
    "▐      ⠂ ▌",
    "▐     ⠈  ▌",
    "▐     ⠂  ▌",
    "▐    ⠠   ▌",
    "▐    ⡀   ▌",
    "▐   ⠠    ▌",
    "▐   ⠂    ▌",
    "▐  ⠈     ▌",
    "▐  ⠂     ▌",
    "▐ ⠠      ▌",
    "▐ ⡀      ▌",
    "▐⠠       ▌",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerKind {
    Dots,
    Pong,
}

/// Status line shown while the installer works.
///
/// Stages receive the handle explicitly. The wizard stage may finish it and
/// hand back a fresh one.
#[derive(Debug, Clone)]
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn start(text: &str, kind: SpinnerKind) -> Self {
        let bar = ProgressBar::new_spinner();
        let (frames, color, tick) = match kind {
            SpinnerKind::Dots => (DOTS12, "cyan", 80),
            SpinnerKind::Pong => (PONG, "yellow", 80),
        };
        // 樣板固定，解析失敗時退回預設樣式
        let style = ProgressStyle::with_template(&format!("{{spinner:.{}}} {{msg}}", color))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style.tick_strings(frames));
        bar.set_message(text.to_string());
        bar.enable_steady_tick(Duration::from_millis(tick));
        Self { bar }
    }

    /// A handle that draws nothing. Used for non-terminal output and tests.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Finishes this handle and returns a new one, hidden when this one was.
    pub fn restart(&self, text: &str, kind: SpinnerKind) -> Self {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
        if self.bar.is_hidden() {
            let next = Self::hidden();
            next.set_text(text);
            next
        } else {
            Self::start(text, kind)
        }
    }

    /// Prints a line without tearing the spinner.
    pub fn println(&self, line: &str) {
        self.bar.suspend(|| println!("{}", line));
    }

    pub fn set_text(&self, text: &str) {
        tracing::debug!("{}", text);
        self.bar.set_message(text.to_string());
    }

    pub fn text(&self) -> String {
        self.bar.message()
    }

    pub fn succeed(&self, text: &str) {
        tracing::info!("✅ {}", text);
        self.finish("✔", text);
    }

    pub fn fail(&self, err: &dyn Display) {
        tracing::error!("❌ {}", err);
        self.finish("✖", &err.to_string());
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    fn finish(&self, symbol: &str, text: &str) {
        if let Ok(style) = ProgressStyle::with_template("{prefix} {msg}") {
            self.bar.set_style(style);
        }
        self.bar.set_prefix(symbol.to_string());
        self.bar.finish_with_message(text.to_string());
    }
}
