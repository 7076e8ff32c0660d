//! Console command handlers
//!
//! Thin handlers that call into the service layer and render results, one
//! file per command area. Shared rendering helpers live at the bottom of
//! this module.

pub mod admin_commands;
pub mod config_commands;
pub mod gem_commands;
pub mod health_commands;
pub mod usage_commands;

pub use admin_commands::*;
pub use config_commands::*;
pub use gem_commands::*;
pub use health_commands::*;
pub use usage_commands::*;

/// Output format for console commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// How many trailing days the sparkline columns cover
pub(crate) const SPARK_DAYS: usize = 7;

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a series as block glyphs scaled to its own maximum
pub(crate) fn spark(values: &[u64]) -> String {
    let max = values.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return values.iter().map(|_| SPARK_GLYPHS[0]).collect();
    }
    values
        .iter()
        .map(|v| {
            let idx = (v.saturating_mul(7) / max) as usize;
            SPARK_GLYPHS[idx]
        })
        .collect()
}

/// Group digits with commas: 1234567 -> "1,234,567"
pub(crate) fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate to `max_len` characters, appending "…" if truncated
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// First ten characters of an ISO timestamp, i.e. the date part
pub(crate) fn date_part(s: &str) -> &str {
    s.get(..10).unwrap_or(s)
}

/// Coarse age of an RFC 3339 timestamp, e.g. "3d ago"
///
/// Returns `None` for unparsable or future timestamps so callers can fall
/// back to printing the raw value.
pub(crate) fn format_age(iso: &str) -> Option<String> {
    let then = chrono::DateTime::parse_from_rfc3339(iso).ok()?;
    let secs = chrono::Utc::now().signed_duration_since(then).num_seconds();
    if secs < 0 {
        return None;
    }
    let label = if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    };
    Some(label)
}
