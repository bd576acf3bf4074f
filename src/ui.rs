use ratatui::prelude::*;

use crate::app::ToastKind;
use crate::models::HttpMethod;

/// Simple JSON syntax highlighting for pretty-printed bodies
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_json_line).collect()
}

fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut escaped = false;

    let flush = |current: &mut String, spans: &mut Vec<Span<'static>>| {
        if current.is_empty() {
            return;
        }
        let word = std::mem::take(current);
        let trimmed = word.trim();
        let style = if matches!(trimmed, "true" | "false" | "null") {
            Style::default().fg(Color::Magenta)
        } else if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        spans.push(Span::styled(word, style));
    };

    for (i, c) in line.char_indices() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                // A key is a string followed by ':'
                let is_key = line[i + 1..].trim_start().starts_with(':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(std::mem::take(&mut current), Style::default().fg(color)));
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                flush(&mut current, &mut spans);
                in_string = true;
                current.push(c);
            }
            ':' | ',' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::White)));
            }
            '{' | '}' | '[' | ']' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut spans);

    Line::from(spans)
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        _ => Color::White,
    }
}

/// Endpoint availability badge color
pub fn endpoint_status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "ready" => Color::Green,
        "update" | "beta" => Color::Yellow,
        "error" | "offline" => Color::Red,
        _ => Color::DarkGray,
    }
}

pub fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
        ToastKind::Info => Color::Cyan,
    }
}

/// Toast box width: message plus borders and padding, capped at `max`
pub fn toast_width(message: &str, max: u16) -> u16 {
    u16::try_from(message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored(line: &Line, text: &str) -> Option<Color> {
        line.spans.iter().find(|s| s.content == text).and_then(|s| s.style.fg)
    }

    #[test]
    fn test_keys_and_values_differ() {
        let lines = highlight_json("  \"status\": \"ok\",");
        assert_eq!(colored(&lines[0], "\"status\""), Some(Color::Cyan));
        assert_eq!(colored(&lines[0], "\"ok\""), Some(Color::Green));
    }

    #[test]
    fn test_literals_and_numbers() {
        let lines = highlight_json("  \"a\": true,\n  \"b\": 12");
        assert_eq!(colored(&lines[0], " true"), Some(Color::Magenta));
        assert_eq!(colored(&lines[1], " 12"), Some(Color::Yellow));
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let lines = highlight_json(r#"  "k": "say \"hi\"""#);
        assert_eq!(colored(&lines[0], r#""say \"hi\"""#), Some(Color::Green));
    }

    #[test]
    fn test_method_colors() {
        assert_eq!(method_color(&HttpMethod::GET), Color::Green);
        assert_eq!(method_color(&HttpMethod::Other("PURGE".into())), Color::White);
    }

    #[test]
    fn test_toast_width_saturates_on_huge_messages() {
        assert_eq!(toast_width("Saved", 80), 9);
        assert_eq!(toast_width(&"x".repeat(200), 80), 80);
        assert_eq!(toast_width(&"x".repeat(65_533), u16::MAX), u16::MAX);
        assert_eq!(toast_width(&"x".repeat(70_000), 120), 120);
    }
}
