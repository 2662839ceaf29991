use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use tasketo_core::{CalendarEngine, CalendarSystem, FormatStyle, Language, Priority, Status, Task};
use unicode_width::UnicodeWidthStr;

const TASK_COLUMNS: [&str; 7] = [
    "Title", "Status", "Priority", "Due", "When", "Subtasks", "Tags",
];

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    engine: CalendarEngine,
    calendar: CalendarSystem,
    language: Language,
    color: bool,
}

impl Renderer {
    pub fn new(engine: CalendarEngine, calendar: CalendarSystem, language: Language) -> Self {
        Self {
            engine,
            calendar,
            language,
            color: io::stdout().is_terminal(),
        }
    }

    #[tracing::instrument(skip(self, out, tasks, now))]
    pub fn write_task_table<W: Write>(
        &self,
        out: W,
        tasks: &[&Task],
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let (due, when) = match task.due {
                Some(due) => {
                    let text = self
                        .engine
                        .format(due, self.calendar, self.language, FormatStyle::DateTime)?;
                    let when = self
                        .engine
                        .relative_string(due, self.calendar, self.language, now)?;
                    let overdue = task.status != Status::Completed
                        && self.engine.is_overdue(due, self.calendar, now);
                    if overdue {
                        (self.paint(&text, "31"), self.paint(&when, "31"))
                    } else {
                        (text, when)
                    }
                }
                None => (String::new(), String::new()),
            };

            let (done, total) = task.subtask_progress();
            let subtasks = if total == 0 {
                String::new()
            } else {
                format!("{done}/{total}")
            };

            rows.push(vec![
                task.title.clone(),
                status_label(task.status).to_string(),
                self.paint(priority_label(task.priority), priority_color(task.priority)),
                due,
                when,
                subtasks,
                task.tags.join(", "),
            ]);
        }

        write_table(out, &TASK_COLUMNS, &rows)
    }

    #[tracing::instrument(skip(self, out, columns))]
    pub fn write_board<W: Write>(
        &self,
        mut out: W,
        columns: &[(Status, Vec<&Task>)],
    ) -> anyhow::Result<()> {
        for (status, tasks) in columns {
            writeln!(out, "{} ({})", status_label(*status), tasks.len())?;
            for task in tasks {
                let due = task
                    .due
                    .map(|due| {
                        self.engine
                            .format(due, self.calendar, self.language, FormatStyle::Date)
                    })
                    .transpose()?
                    .map(|text| format!("  [{text}]"))
                    .unwrap_or_default();
                writeln!(out, "  - {}{due}", task.title)?;
            }
        }
        Ok(())
    }

    /// Shows one instant under every calendar.
    pub fn write_instant<W: Write>(&self, mut out: W, ts: DateTime<Utc>, now: DateTime<Utc>) -> anyhow::Result<()> {
        writeln!(out, "canonical  {}", ts.to_rfc3339())?;
        writeln!(out, "zone       {}", self.engine.zone())?;
        for calendar in CalendarSystem::ALL {
            let text = self
                .engine
                .format(ts, calendar, self.language, FormatStyle::DateTime)?;
            let weekday = self.engine.weekday_name(ts, calendar, self.language);
            writeln!(
                out,
                "{:<10} {weekday}, {text}",
                calendar.display_name(Language::English)
            )?;
        }
        writeln!(
            out,
            "relative   {}",
            self.engine
                .relative_string(ts, self.calendar, self.language, now)?
        )?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Pending => "pending",
        Status::InProgress => "in progress",
        Status::Completed => "completed",
        Status::Cancelled => "cancelled",
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
        Priority::Urgent => "urgent",
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "32",
        Priority::Medium => "34",
        Priority::High => "33",
        Priority::Urgent => "31",
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: &[&str],
    rows: &[Vec<String>],
) -> anyhow::Result<()> {
    let visible = |cell: &str| UnicodeWidthStr::width(strip_ansi(cell).as_str());

    let mut widths: Vec<usize> = headers.iter().map(|h| visible(*h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(visible(cell.as_str()));
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let header_row: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();

    for row in std::iter::once(&header_row)
        .chain(std::iter::once(&rule))
        .chain(rows)
    {
        for (cell, width) in row.iter().zip(&widths) {
            let padding = width.saturating_sub(visible(cell.as_str()));
            write!(writer, "{cell}{} ", " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
