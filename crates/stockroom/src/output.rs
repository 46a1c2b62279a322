// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared output handling for commands: `--json`, `--plain`, and TTY detection.

use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;

use stockroom_core::StockroomError;
use stockroom_inventory::StockLevel;

/// How a command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub json: bool,
    pub color: bool,
}

impl Output {
    /// Colors only when `--plain` is absent and stdout is a terminal.
    pub fn from_flags(json: bool, plain: bool) -> Self {
        Self {
            json,
            color: !json && !plain && std::io::stdout().is_terminal(),
        }
    }

    /// Prints `value` as pretty JSON when `--json` is set, `text()` otherwise.
    pub fn emit<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce(bool) -> String,
    ) -> Result<(), StockroomError> {
        if self.json {
            let rendered = serde_json::to_string_pretty(value)
                .map_err(|e| StockroomError::Internal(format!("failed to render JSON: {e}")))?;
            println!("{rendered}");
        } else {
            print!("{}", text(self.color));
        }
        Ok(())
    }
}

/// Section header in the style every command shares.
pub fn header(title: &str, width: usize) -> String {
    format!("\n  {title}\n  {}\n", "-".repeat(width))
}

/// Stock level label, colored when asked.
pub fn level_label(level: StockLevel, color: bool) -> String {
    let (plain, tag) = match level {
        StockLevel::OutOfStock => ("[OUT]", "out of stock"),
        StockLevel::Low => ("[LOW]", "low"),
        StockLevel::Healthy => ("[OK]", "ok"),
    };
    if !color {
        return plain.to_string();
    }
    match level {
        StockLevel::OutOfStock => format!("{} {}", "✗".red(), tag.red()),
        StockLevel::Low => format!("{} {}", "!".yellow(), tag.yellow()),
        StockLevel::Healthy => format!("{} {}", "✓".green(), tag.green()),
    }
}

/// Quantity that is red when not positive.
pub fn quantity(value: i64, color: bool) -> String {
    if color && value <= 0 {
        value.to_string().red().to_string()
    } else {
        value.to_string()
    }
}
