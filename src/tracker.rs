//! Step reporting for the template pipeline.
//!
//! The pipeline reports discrete named steps (`fetch`, `download`, `extract`, ...)
//! through a [`Reporter`]. Three implementations are provided: a live tracker
//! rendered with indicatif, a plain console narrator for verbose output, and a
//! silent no-op default so library call sites stay branch-free.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use console::Style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Receives pipeline step signals.
///
/// Steps are identified by short stable keys. A step is `add`ed before any
/// other signal for it; `start`/`complete`/`skip`/`error` move it through its
/// lifecycle. `note` is free-form narration outside the step model, and
/// `progress` carries download percentages for steps with a known total.
pub trait Reporter {
    fn add(&self, key: &str, label: &str);
    fn start(&self, key: &str, note: Option<&str>);
    fn complete(&self, key: &str, note: Option<&str>);
    fn skip(&self, key: &str, reason: &str);
    fn error(&self, key: &str, message: &str);
    fn note(&self, message: &str);
    fn progress(&self, _key: &str, _percent: u8) {}
}

/// No-op reporter used as the default collaborator.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn add(&self, _key: &str, _label: &str) {}
    fn start(&self, _key: &str, _note: Option<&str>) {}
    fn complete(&self, _key: &str, _note: Option<&str>) {}
    fn skip(&self, _key: &str, _reason: &str) {}
    fn error(&self, _key: &str, _message: &str) {}
    fn note(&self, _message: &str) {}
}

/// Plain line-by-line narration for verbose runs without the live tracker.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn add(&self, _key: &str, _label: &str) {}

    fn start(&self, _key: &str, note: Option<&str>) {
        if let Some(note) = note {
            println!("{}", Style::new().cyan().apply_to(note));
        }
    }

    fn complete(&self, key: &str, note: Option<&str>) {
        match note {
            Some(note) => println!(
                "{} {} ({})",
                Style::new().green().apply_to("✓"),
                key,
                note
            ),
            None => println!("{} {}", Style::new().green().apply_to("✓"), key),
        }
    }

    fn skip(&self, key: &str, reason: &str) {
        println!("{} {} ({})", Style::new().dim().apply_to("○"), key, reason);
    }

    fn error(&self, key: &str, message: &str) {
        eprintln!("{} {}: {}", Style::new().red().apply_to("✗"), key, message);
    }

    fn note(&self, message: &str) {
        println!("{}", message);
    }
}

/// Live per-step tracker rendered as one indicatif line per step.
///
/// Glyphs: `●` done (green), `○` pending/skipped, spinner while running,
/// `✗` failed (red).
pub struct StepTracker {
    multi: MultiProgress,
    steps: Mutex<HashMap<String, Step>>,
}

struct Step {
    bar: ProgressBar,
    label: String,
}

impl StepTracker {
    pub fn new(title: &str) -> Self {
        let multi = MultiProgress::new();
        let header = multi.add(ProgressBar::new_spinner());
        header.set_style(ProgressStyle::with_template("{msg}").unwrap());
        header.finish_with_message(Style::new().bold().cyan().apply_to(title).to_string());
        Self {
            multi,
            steps: Mutex::new(HashMap::new()),
        }
    }

    fn with_step(&self, key: &str, f: impl FnOnce(&Step)) {
        if let Ok(steps) = self.steps.lock() {
            if let Some(step) = steps.get(key) {
                f(step);
            }
        }
    }
}

impl Reporter for StepTracker {
    fn add(&self, key: &str, label: &str) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(ProgressStyle::with_template("{prefix} {msg}").unwrap());
        bar.set_prefix(Style::new().dim().apply_to("○").to_string());
        bar.set_message(Style::new().dim().apply_to(label).to_string());
        if let Ok(mut steps) = self.steps.lock() {
            steps.insert(
                key.to_string(),
                Step {
                    bar,
                    label: label.to_string(),
                },
            );
        }
    }

    fn start(&self, key: &str, note: Option<&str>) {
        self.with_step(key, |step| {
            step.bar
                .set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap());
            let msg = match note {
                Some(note) => format!("{} ({})", step.label, Style::new().dim().apply_to(note)),
                None => step.label.clone(),
            };
            step.bar.set_message(msg);
            step.bar.enable_steady_tick(Duration::from_millis(100));
        });
    }

    fn complete(&self, key: &str, note: Option<&str>) {
        self.with_step(key, |step| {
            step.bar.disable_steady_tick();
            step.bar
                .set_style(ProgressStyle::with_template("{prefix} {msg}").unwrap());
            step.bar
                .set_prefix(Style::new().green().apply_to("●").to_string());
            let msg = match note {
                Some(note) => format!("{} ({})", step.label, Style::new().dim().apply_to(note)),
                None => step.label.clone(),
            };
            step.bar.finish_with_message(msg);
        });
    }

    fn skip(&self, key: &str, reason: &str) {
        self.with_step(key, |step| {
            step.bar.disable_steady_tick();
            step.bar
                .set_style(ProgressStyle::with_template("{prefix} {msg}").unwrap());
            step.bar
                .set_prefix(Style::new().dim().apply_to("○").to_string());
            step.bar.finish_with_message(format!(
                "{} {}",
                Style::new().dim().apply_to(&step.label),
                Style::new().dim().apply_to(format!("({})", reason))
            ));
        });
    }

    fn error(&self, key: &str, message: &str) {
        self.with_step(key, |step| {
            step.bar.disable_steady_tick();
            step.bar
                .set_style(ProgressStyle::with_template("{prefix} {msg}").unwrap());
            step.bar
                .set_prefix(Style::new().red().apply_to("✗").to_string());
            step.bar.abandon_with_message(format!(
                "{} - {}",
                step.label,
                Style::new().red().apply_to(message)
            ));
        });
    }

    fn note(&self, message: &str) {
        let _ = self.multi.println(message);
    }

    fn progress(&self, key: &str, percent: u8) {
        self.with_step(key, |step| {
            step.bar
                .set_message(format!("{} ({}%)", step.label, percent.min(100)));
        });
    }
}
