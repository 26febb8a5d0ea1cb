//! HTML rendering of the task list and calendar.
//!
//! All user text goes through [`escape_html`] before it reaches markup.

use std::fmt::Write as _;

use crate::calendar::{CalendarCell, CalendarView, WEEKDAY_HEADERS};
use crate::listing::TaskRow;

/// Neutralise markup in `text` (`& < > " '`).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<ul>` with a checkbox, label, date and delete button per row.
pub fn task_list_html(rows: &[TaskRow]) -> String {
    let mut out = String::from("<ul id=\"tasks\">\n");
    for row in rows {
        let _ = writeln!(
            out,
            "  <li><label><input type=\"checkbox\" data-id=\"{id}\"{checked}/> {label} <small>({date})</small> <button data-del=\"{id}\" class=\"small-del\">✖</button></label></li>",
            id = row.id,
            checked = if row.checked { " checked" } else { "" },
            label = row.label,
            date = row.date,
        );
    }
    out.push_str("</ul>\n");
    out
}

/// Month table; days with tasks get the `has-tasks` class and a title listing them.
pub fn calendar_html(view: &CalendarView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h4>{}</h4>", escape_html(&view.title()));
    out.push_str("<table class=\"calendar\">\n  <tr>");
    for h in WEEKDAY_HEADERS {
        let _ = write!(out, "<th>{h}</th>");
    }
    out.push_str("</tr>\n");
    for week in &view.weeks {
        out.push_str("  <tr>");
        for cell in week {
            match cell {
                CalendarCell::Blank => out.push_str("<td></td>"),
                CalendarCell::Day(day) if day.has_tasks() => {
                    let _ = write!(
                        out,
                        "<td data-date=\"{}\" class=\"has-tasks\" title=\"{}\">{}</td>",
                        day.date_key(),
                        escape_html(&day.summary().message()),
                        day.day
                    );
                }
                CalendarCell::Day(day) => {
                    let _ = write!(out, "<td data-date=\"{}\">{}</td>", day.date_key(), day.day);
                }
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Standalone page with tip, task list and calendar.
pub fn page(title: &str, tip: &str, rows: &[TaskRow], view: &CalendarView) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(title));
    out.push_str(concat!(
        "<style>\n",
        "body { font-family: sans-serif; background: #0f172a; color: #e2e8f0; }\n",
        "h1, h4, th { color: #16a34a; }\n",
        ".calendar { border-collapse: collapse; }\n",
        ".calendar td { padding: 6px; text-align: center; border: 1px solid #14532d; }\n",
        ".calendar td.has-tasks { background: #14532d; color: #22c55e; }\n",
        "small { color: #9ca3af; }\n",
        "</style>\n</head>\n<body>\n",
    ));
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(title));
    let _ = writeln!(out, "<p id=\"daily-tip\">{}</p>", escape_html(tip));
    out.push_str(&task_list_html(rows));
    out.push_str(&calendar_html(view));
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::render_calendar;
    use crate::listing::render_task_list;
    use crate::task::Task;
    use chrono::NaiveDate;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(escape_html(r#"a&b<c>d"e'f"#), "a&amp;b&lt;c&gt;d&quot;e&#039;f");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn script_task_renders_as_text() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let tasks = vec![Task::new(1, "<script>alert(1)</script>", date)];
        let rows = render_task_list(&tasks);
        let view = render_calendar(2025, 3, &tasks);
        let html = page("Garden", "tip", &rows, &view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn checked_rows_and_marked_days() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let mut task = Task::new(7, "Sow", date);
        task.done = true;
        let list = task_list_html(&render_task_list(&[task.clone()]));
        assert!(list.contains("data-id=\"7\" checked/>"));
        assert!(list.contains("data-del=\"7\""));

        let cal = calendar_html(&render_calendar(2025, 3, &[task]));
        assert!(cal.contains("<td data-date=\"2025-03-17\" class=\"has-tasks\""));
        assert!(cal.contains("<td data-date=\"2025-03-18\">18</td>"));
    }
}
