use gridsift::highlight::HighlightPlan;
use owo_colors::OwoColorize;
use serde_json::Value;

pub struct ResultSummary {
    pub prefix: String,
    pub message: String,
}

impl ResultSummary {
    pub fn format(shown: usize, noun: &str) -> Self {
        if shown > 0 {
            Self {
                prefix: "✓".green().to_string(),
                message: format!("{} {}(s)", shown.green(), noun),
            }
        } else {
            Self {
                prefix: "•".yellow().to_string(),
                message: format!("No matching {}s found", noun),
            }
        }
    }
}

impl std::fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.prefix, self.message)
    }
}

/// セル値の表示文字列（null は空）
pub fn cell_display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// ハイライト部分を端末色で強調する
pub fn colorize(plan: Option<&HighlightPlan>, text: &str) -> String {
    let Some(plan) = plan else {
        return text.to_string();
    };

    plan.segments(text)
        .into_iter()
        .map(|segment| {
            if segment.highlighted {
                segment.text.black().on_yellow().to_string()
            } else {
                segment.text.to_string()
            }
        })
        .collect()
}

/// セルを表示用に整形する。ハイライトするのは文字列セルだけ
pub fn highlight_cell(plan: Option<&HighlightPlan>, value: Option<&Value>) -> String {
    let text = cell_display(value);
    match value {
        Some(Value::String(_)) => colorize(plan, &text),
        _ => text,
    }
}
