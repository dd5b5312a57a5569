//! Rounded message boxes and numbered choice lists.

use crate::tui::settings::{
    BOX_BOTTOM_LEFT, BOX_BOTTOM_RIGHT, BOX_HORIZONTAL, BOX_PADDING, BOX_TOP_LEFT, BOX_TOP_RIGHT,
    BOX_VERTICAL, COLOR_CHOICE_LABEL, COLOR_CHOICE_NUMBER, INDENT_1,
};
use crossterm::style::{Color, Stylize};

/// Render `message` inside a rounded box with `title` centered on the top edge.
///
/// The box has one blank line of margin above and below and one line of
/// vertical padding inside. Widths are computed on uncolored text.
pub fn render_box(title: &str, message: &str, accent: Color, color: bool) -> String {
    let lines = message.lines().collect::<Vec<_>>();
    let text_width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let title_label = format!(" {title} ");
    let inner = (text_width + 2 * BOX_PADDING).max(title_label.chars().count() + 4);

    let fill = inner - title_label.chars().count();
    let left = fill / 2;
    let right = fill - left;
    let top = format!(
        "{BOX_TOP_LEFT}{}{title_label}{}{BOX_TOP_RIGHT}",
        horizontal(left),
        horizontal(right)
    );
    let bottom = format!("{BOX_BOTTOM_LEFT}{}{BOX_BOTTOM_RIGHT}", horizontal(inner));
    let blank = format!("{BOX_VERTICAL}{}{BOX_VERTICAL}", " ".repeat(inner));

    let mut out = String::from("\n");
    push_line(&mut out, &paint(&top, accent, color));
    push_line(&mut out, &paint(&blank, accent, color));
    for line in &lines {
        let pad_right = inner - BOX_PADDING - line.chars().count();
        let text = paint(line, accent, color);
        let edge = paint(&BOX_VERTICAL.to_string(), accent, color);
        push_line(
            &mut out,
            &format!(
                "{edge}{}{text}{}{edge}",
                " ".repeat(BOX_PADDING),
                " ".repeat(pad_right)
            ),
        );
    }
    push_line(&mut out, &paint(&blank, accent, color));
    push_line(&mut out, &paint(&bottom, accent, color));
    out.push('\n');
    out
}

/// Render `1. label` rows for a multiple-choice prompt.
pub fn render_choices(labels: &[String], color: bool) -> String {
    let mut out = String::new();
    for (idx, label) in labels.iter().enumerate() {
        let number = format!("{}.", idx + 1);
        if color {
            out.push_str(&format!(
                "{INDENT_1}{} {}\n",
                number.with(COLOR_CHOICE_NUMBER),
                label.as_str().with(COLOR_CHOICE_LABEL)
            ));
        } else {
            out.push_str(&format!("{INDENT_1}{number} {label}\n"));
        }
    }
    out
}

fn horizontal(count: usize) -> String {
    std::iter::repeat(BOX_HORIZONTAL).take(count).collect()
}

fn paint(text: &str, accent: Color, color: bool) -> String {
    if color {
        text.with(accent).to_string()
    } else {
        text.to_string()
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push(' ');
    out.push_str(line);
    out.push('\n');
}
