//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::display::ScreenSurface;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The assessment surface: a solid color field with centered body text
pub struct AssessmentPanel<'a> {
    surface: &'a ScreenSurface,
}

impl<'a> AssessmentPanel<'a> {
    pub fn new(surface: &'a ScreenSurface) -> Self {
        Self { surface }
    }
}

impl<'a> Widget for AssessmentPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::from(self.surface.background()))
            .fg(Color::from(self.surface.text_color()));
        buf.set_style(area, style);

        let lines: Vec<Line> = self
            .surface
            .body()
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();

        // Center the block of lines vertically
        let height = lines.len() as u16;
        let top = area.y + area.height.saturating_sub(height) / 2;
        let text_area = Rect::new(area.x, top, area.width, height.min(area.height));

        Paragraph::new(lines)
            .style(style.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .render(text_area, buf);
    }
}

/// One-line strip showing the labeled regions
pub struct StatsBar<'a> {
    entries: &'a [&'a str],
    colors: ThemeColors,
}

impl<'a> StatsBar<'a> {
    pub fn new(entries: &'a [&'a str], colors: ThemeColors) -> Self {
        Self { entries, colors }
    }
}

impl<'a> Widget for StatsBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.colors.bg));

        let mut spans = Vec::new();
        for (i, entry) in self.entries.iter().filter(|e| !e.is_empty()).enumerate() {
            if i > 0 {
                spans.push(Span::styled("  │  ", Style::default().fg(self.colors.dim)));
            }
            spans.push(Span::styled(*entry, Style::default().fg(self.colors.fg)));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Widget for the help screen
pub struct HelpPanel {
    colors: ThemeColors,
}

impl HelpPanel {
    pub fn new(colors: ThemeColors) -> Self {
        Self { colors }
    }
}

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Help - Reaction TestKit")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.accent));

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = [
            "",
            " HOW IT WORKS",
            " -----------",
            " Start a run, then wait for the panel to turn green.",
            " Respond as fast as you can once it does.",
            " Responding early is a strike; too many strikes fail the run.",
            " After the last stage your average and best average are shown.",
            "",
            " RESPOND",
            " -----------",
            " Left click       : On the assessment panel",
            " Space            : Anywhere",
            " W A S D          : Anywhere",
            " Arrow keys       : Anywhere",
            "",
            " CONTROLS",
            " -----------",
            " ? / Tab          : Toggle this help",
            " q / Esc          : Quit application",
            "",
            " The refresh rate in the stats bar counts drawn frames per second.",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.contains("---") {
                Style::default().fg(self.colors.dim)
            } else if line.len() > 1 && line[1..].chars().all(|c| c.is_uppercase() || c == ' ') {
                Style::default()
                    .fg(self.colors.message)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    state: &'a str,
    view: &'a str,
    elapsed: &'a str,
    activations: u64,
    message: Option<&'a str>,
    colors: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        state: &'a str,
        view: &'a str,
        elapsed: &'a str,
        activations: u64,
        colors: ThemeColors,
    ) -> Self {
        Self {
            state,
            view,
            elapsed,
            activations,
            message: None,
            colors,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.colors.bar_bg).fg(self.colors.fg);
        buf.set_style(area, bg_style);

        // Left side: state and view
        let left = format!(" {} | {} ", self.state, self.view);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        // Center: message if any
        if let Some(msg) = self.message {
            let msg_style = Style::default().bg(self.colors.bar_bg).fg(self.colors.message);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        // Right side: elapsed time and activations
        let right = format!(" {} | Inputs: {} ", self.elapsed, self.activations);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

/// Tab bar widget
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
    colors: ThemeColors,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize, colors: ThemeColors) -> Self {
        Self {
            tabs,
            selected,
            colors,
        }
    }
}

impl<'a> Widget for TabBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.colors.bar_bg));
        let mut x = area.x;

        for (i, tab) in self.tabs.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .fg(self.colors.bg)
                    .bg(self.colors.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg).bg(self.colors.bar_bg)
            };

            let label = format!(" {} ", tab);
            let width = label.len() as u16;

            if x + width <= area.x + area.width {
                buf.set_string(x, area.y, &label, style);
                x += width;

                if i < self.tabs.len() - 1 && x < area.x + area.width {
                    buf.set_string(x, area.y, "|", Style::default().fg(self.colors.dim));
                    x += 1;
                }
            }
        }
    }
}
