//! Human-readable scenario trace
//!
//! Lines are recorded as plain text for the result and, when echo is on,
//! printed to stdout with color as they happen.

use colored::Colorize;

/// Ordered trace lines of one scenario run
#[derive(Debug, Clone)]
pub struct Trace {
    lines: Vec<String>,
    echo: bool,
    verbose: bool,
}

impl Trace {
    pub fn new(echo: bool, verbose: bool) -> Self {
        Self {
            lines: Vec::new(),
            echo,
            verbose,
        }
    }

    /// Scenario title
    pub fn header(&mut self, title: &str) {
        if self.echo {
            println!("\n{} {}", "Running Scenario:".blue().bold(), title.white().bold());
        }
        self.lines.push(title.to_string());
    }

    /// Numbered step announcement
    pub fn step(&mut self, number: usize, title: &str) {
        let line = format!("{}. {}...", number, title);
        if self.echo {
            println!("\n{}", line.cyan());
        }
        self.lines.push(line);
    }

    /// Successful check
    pub fn ok(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if self.echo {
            println!("  {} {}", "✓".green(), message);
        }
        self.lines.push(format!("✓ {}", message));
    }

    /// Informational line, always recorded
    pub fn info(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if self.echo {
            println!("  {}", message);
        }
        self.lines.push(message.to_string());
    }

    /// Request/response detail, recorded only in verbose mode
    pub fn detail(&mut self, message: impl AsRef<str>) {
        if !self.verbose {
            return;
        }
        let message = message.as_ref();
        if self.echo {
            println!("  {}", message.dimmed());
        }
        self.lines.push(message.to_string());
    }

    /// Failure line
    pub fn fail(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if self.echo {
            println!("  {} {}", "✗".red(), message.red());
        }
        self.lines.push(format!("✗ {}", message));
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
