//! Output formatting module

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use ec2ops_common::Response;
use owo_colors::OwoColorize as _;
use serde_json::Value;

pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Render a dispatcher response for a human reader.
///
/// Rejections print as warnings; failures go to stderr.
pub fn render_response(ctx: &OutputContext, response: &Response) {
    match response {
        Response::Success { message, response } => {
            ctx.success(message);
            if let Some(Value::Array(changes)) = response {
                for change in changes {
                    render_state_change(ctx, change);
                }
            }
        }
        Response::Rejected { message } => ctx.warn(message),
        Response::Failed { error } => ctx.error(error),
    }
}

fn render_state_change(ctx: &OutputContext, change: &Value) {
    let field = |name: &str| change.get(name).and_then(Value::as_str).unwrap_or("?");
    ctx.kv(
        field("instance_id"),
        &format!("{} → {}", field("previous_state"), field("current_state")),
    );
}
