//! Control strip widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};

/// A row of vertical bars, one per control, filled to the control's reading
pub struct ControlStrip<'a> {
    readings: &'a [f64],
    style: Style,
    block: Option<Block<'a>>,
}

impl<'a> ControlStrip<'a> {
    pub fn new(readings: &'a [f64]) -> Self {
        Self {
            readings,
            style: Style::default(),
            block: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Rows filled for a reading, given the bar height
    fn filled_rows(reading: f64, height: u16) -> u16 {
        (reading.clamp(0.0, 1.0) * height as f64).round() as u16
    }

    fn render_strip(&self, area: Rect, buf: &mut Buffer) {
        // one row for the control numbers
        if area.width == 0 || area.height < 2 || self.readings.is_empty() {
            return;
        }

        let bar_height = area.height - 1;
        let column_width = (area.width as usize / self.readings.len()).max(1) as u16;
        let label_y = area.y + bar_height;

        for (i, &reading) in self.readings.iter().enumerate() {
            let column_x = area.x + i as u16 * column_width;
            if column_x >= area.x + area.width {
                break;
            }
            // leave a gap between bars when there is room
            let bar_width = if column_width > 2 { column_width - 1 } else { column_width };
            let bar_x_end = (column_x + bar_width).min(area.x + area.width);

            let filled = Self::filled_rows(reading, bar_height);
            for dy in 0..filled {
                let y = label_y - 1 - dy;
                for x in column_x..bar_x_end {
                    buf.set_string(x, y, "█", self.style);
                }
            }

            buf.set_string(column_x, label_y, format!("{}", i + 1), Style::default());
        }
    }
}

impl Widget for ControlStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.render_strip(inner_area, buf);
    }
}
