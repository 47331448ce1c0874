//! iCalendar renderer.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sha2::{Digest, Sha256};

use crate::config::CalendarConfig;
use crate::domain::ScheduledDay;
use crate::error::{KondateError, Result};

/// Maximum content line length in octets, excluding CRLF
const MAX_LINE_OCTETS: usize = 75;

/// Renders scheduled days as one VEVENT each.
#[derive(Debug, Clone)]
pub struct IcsRenderer {
    product_id: String,
    title_prefix: String,
    description_field: Option<String>,
    /// Timed events when set, all-day events otherwise
    times: Option<(NaiveTime, NaiveTime)>,
}

impl Default for IcsRenderer {
    fn default() -> Self {
        Self {
            product_id: "-//kondate//menu rotation//EN".to_string(),
            title_prefix: String::new(),
            description_field: None,
            times: None,
        }
    }
}

impl IcsRenderer {
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        let times = config
            .event_times()
            .map_err(|e| KondateError::Configuration(format!("{:#}", e)))?;
        Ok(Self {
            product_id: config.product_id.clone(),
            title_prefix: config.title_prefix.clone(),
            description_field: config.description_field.clone(),
            times,
        })
    }

    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = prefix.into();
        self
    }

    pub fn with_description_field(mut self, field: impl Into<String>) -> Self {
        self.description_field = Some(field.into());
        self
    }

    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.times = Some((start, end));
        self
    }

    /// Render a full VCALENDAR. `stamp` becomes every event's DTSTAMP.
    pub fn render(&self, days: &[ScheduledDay], stamp: DateTime<Utc>) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.product_id),
            "CALSCALE:GREGORIAN".to_string(),
        ];

        let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
        for day in days {
            self.push_event(&mut lines, day, &dtstamp);
        }
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in lines {
            out.push_str(&fold_line(&line));
            out.push_str("\r\n");
        }
        out
    }

    fn push_event(&self, lines: &mut Vec<String>, day: &ScheduledDay, dtstamp: &str) {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", event_uid(day.date, day.item_name())));
        lines.push(format!("DTSTAMP:{}", dtstamp));

        match self.times {
            Some((start, end)) => {
                lines.push(format!("DTSTART:{}", day.date.and_time(start).format("%Y%m%dT%H%M%S")));
                lines.push(format!("DTEND:{}", day.date.and_time(end).format("%Y%m%dT%H%M%S")));
            }
            None => {
                let next = day.date.succ_opt().unwrap_or(day.date);
                lines.push(format!("DTSTART;VALUE=DATE:{}", day.date.format("%Y%m%d")));
                lines.push(format!("DTEND;VALUE=DATE:{}", next.format("%Y%m%d")));
            }
        }

        lines.push(format!(
            "SUMMARY:{}",
            escape_text(&format!("{}{}", self.title_prefix, day.item_name()))
        ));
        if let Some(description) = self
            .description_field
            .as_deref()
            .and_then(|field| day.item.field(field))
            .filter(|d| !d.trim().is_empty())
        {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        lines.push(format!("CATEGORIES:{}", escape_text(&day.category)));
        lines.push("TRANSP:TRANSPARENT".to_string());
        lines.push("END:VEVENT".to_string());
    }
}

/// Stable UID so re-rendering a month updates events instead of duplicating them.
fn event_uid(date: NaiveDate, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(name.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}@kondate", date.format("%Y%m%d"), &digest[..16])
}

/// Escape TEXT values: backslash, semicolon, comma, newline.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Fold a content line at 75 octets without splitting UTF-8 sequences.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    // continuation lines carry a leading space, which counts toward the limit
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > limit {
            out.push_str("\r\n ");
            width = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        out.push(c);
        width += len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use chrono::TimeZone;

    fn day(d: u32, name: &str) -> ScheduledDay {
        ScheduledDay {
            date: NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            category: "fish".to_string(),
            item: Item::new(name, ["fish"]).with_field("メモ", "salt, then grill"),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 20, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_render_all_day_event() {
        let ics = IcsRenderer::default()
            .with_title_prefix("夕食：")
            .render(&[day(31, "saba")], stamp());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("DTSTAMP:20250220T093000Z\r\n"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20250331\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20250401\r\n"));
        assert!(ics.contains("SUMMARY:夕食：saba\r\n"));
        assert!(!ics.contains("DESCRIPTION"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    }

    #[test]
    fn test_render_timed_event_with_description() {
        let ics = IcsRenderer::default()
            .with_times(
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            )
            .with_description_field("メモ")
            .render(&[day(1, "saba")], stamp());

        assert!(ics.contains("DTSTART:20250301T180000\r\n"));
        assert!(ics.contains("DTEND:20250301T190000\r\n"));
        assert!(ics.contains("DESCRIPTION:salt\\, then grill\r\n"));
    }

    #[test]
    fn test_one_event_per_day() {
        let days: Vec<ScheduledDay> = (1..=31).map(|d| day(d, &format!("m{}", d))).collect();
        let ics = IcsRenderer::default().render(&days, stamp());
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 31);
        assert_eq!(ics.matches("END:VEVENT").count(), 31);
    }

    #[test]
    fn test_uid_is_stable_and_distinct() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(event_uid(date, "saba"), event_uid(date, "saba"));
        assert_ne!(event_uid(date, "saba"), event_uid(date, "aji"));
        assert!(event_uid(date, "saba").starts_with("20250301-"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a;b,c\\d\r\ne"), "a\\;b\\,c\\\\d\\ne");
    }

    #[test]
    fn test_fold_line_ascii() {
        let line = format!("SUMMARY:{}", "x".repeat(200));
        let folded = fold_line(&line);
        let parts: Vec<&str> = folded.split("\r\n").collect();
        assert!(parts.iter().all(|p| p.len() <= MAX_LINE_OCTETS));
        assert!(parts[1..].iter().all(|p| p.starts_with(' ')));
        let unfolded = folded.replace("\r\n ", "");
        assert_eq!(unfolded, line);
    }

    #[test]
    fn test_fold_line_keeps_utf8_intact() {
        let line = format!("SUMMARY:{}", "鯖".repeat(60));
        let folded = fold_line(&line);
        assert!(folded.split("\r\n").all(|p| p.len() <= MAX_LINE_OCTETS));
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn test_short_line_untouched() {
        assert_eq!(fold_line("VERSION:2.0"), "VERSION:2.0");
    }

    #[test]
    fn test_from_config_rejects_bad_times() {
        let config = CalendarConfig {
            start: Some("18:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(IcsRenderer::from_config(&config), Err(KondateError::Configuration(_))));
    }
}
