use console::{style, StyledObject};
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Kind of one-line status notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Success,
    Info,
    Warning,
}

impl Notice {
    fn label(self) -> &'static str {
        match self {
            Notice::Success => "success",
            Notice::Info => "info",
            Notice::Warning => "warning",
        }
    }

    fn symbol(self) -> StyledObject<&'static str> {
        match self {
            Notice::Success => style("✓").green().bold(),
            Notice::Info => style("ℹ").blue().bold(),
            Notice::Warning => style("⚠").yellow().bold(),
        }
    }
}

/// Command output, either styled for a terminal or as JSON documents.
///
/// In JSON mode every call prints exactly one JSON value per line (or one
/// pretty document for results), so stdout can be piped into `jq`.
pub struct OutputWriter {
    json: bool,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: impl Display) {
        self.notice(Notice::Success, message);
    }

    pub fn info(&self, message: impl Display) {
        self.notice(Notice::Info, message);
    }

    /// Warnings go to stderr in both modes
    pub fn warning(&self, message: impl Display) {
        self.notice(Notice::Warning, message);
    }

    fn notice(&self, kind: Notice, message: impl Display) {
        let line = if self.json {
            serde_json::json!({ "status": kind.label(), "message": message.to_string() })
                .to_string()
        } else {
            format!("{} {}", kind.symbol(), message)
        };

        if kind == Notice::Warning {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// Rows as a rounded table, or a JSON array
    pub fn table<T: Tabled + Serialize>(&self, rows: &[T]) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(rows)?);
        } else {
            println!("{}", render_table(rows));
        }
        Ok(())
    }

    /// Final command payload, wrapped as `{"status": "success", "data": ...}` in JSON mode
    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let document = if self.json {
            serde_json::json!({ "status": "success", "data": data })
        } else {
            serde_json::to_value(data)?
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        if self.json {
            println!("{}", serde_json::json!({ key.to_string(): value.to_string() }));
        } else {
            println!("{}: {}", style(key).bold(), value);
        }
    }

    /// Section headings only exist in human output
    pub fn section(&self, title: impl Display) {
        if !self.json {
            println!("\n{}", style(title).bold().underlined());
        }
    }
}

fn render_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return style("(no data)").dim().to_string();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: &'static str,
        count: usize,
    }

    #[test]
    fn test_render_table_contains_cells() {
        let rendered = render_table(&[Row { name: "Rural", count: 3 }]);
        assert!(rendered.contains("name"));
        assert!(rendered.contains("Rural"));
        assert!(rendered.contains('3'));
    }

    #[test]
    fn test_render_empty_table() {
        let rendered = render_table::<Row>(&[]);
        assert!(rendered.contains("(no data)"));
    }

    #[test]
    fn test_notice_labels() {
        assert_eq!(Notice::Success.label(), "success");
        assert_eq!(Notice::Warning.label(), "warning");
        assert!(OutputWriter::new(true).is_json());
        assert!(!OutputWriter::new(false).is_json());
    }
}
