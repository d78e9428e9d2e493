//! Wheel widget for ratatui
//!
//! Rasterizes a wheel into terminal cells. Cells are roughly twice as tall
//! as they are wide, so horizontal distances are halved before measuring.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::wheel::{WheelGeometry, WheelItem};

/// Fraction of the radius where labels sit
const LABEL_RADIUS: f64 = 0.62;
/// Above this many sectors labels would overlap
const MAX_LABELS: usize = 16;

pub struct WheelWidget<'a> {
    items: &'a [WheelItem],
    rotation: f64,
    title: &'a str,
    spinning: bool,
    locked: Option<&'a WheelItem>,
    landed: Option<&'a WheelItem>,
}

impl<'a> WheelWidget<'a> {
    pub fn new(items: &'a [WheelItem], rotation: f64) -> Self {
        Self {
            items,
            rotation,
            title: "Wheel",
            spinning: false,
            locked: None,
            landed: None,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn spinning(mut self, spinning: bool) -> Self {
        self.spinning = spinning;
        self
    }

    pub fn locked(mut self, item: Option<&'a WheelItem>) -> Self {
        self.locked = item;
        self
    }

    pub fn landed(mut self, item: Option<&'a WheelItem>) -> Self {
        self.landed = item;
        self
    }
}

/// Sector shown at a screen offset from the center (y down) for a wheel
/// turned clockwise by `rotation`
pub fn sector_under(geometry: &WheelGeometry, rotation: f64, dx: f64, dy: f64) -> usize {
    let screen_angle = dy.atan2(dx).to_degrees();
    geometry.sector_at(screen_angle - rotation)
}

/// Black or white, whichever reads better on `bg`
pub fn label_color(bg: (u8, u8, u8)) -> Color {
    let (r, g, b) = bg;
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 140.0 {
        Color::Black
    } else {
        Color::White
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

impl Widget for WheelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.locked.is_some() { Color::Yellow } else { Color::DarkGray };
        let title = if self.locked.is_some() {
            format!(" {} (locked) ", self.title)
        } else {
            format!(" {} ", self.title)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 5 || inner.height < 5 {
            return;
        }

        // Top row: pointer. Bottom row: caption. Disc in between.
        let disc = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: inner.height - 2,
        };
        let cx = disc.x as f64 + disc.width as f64 / 2.0;
        let cy = disc.y as f64 + disc.height as f64 / 2.0;
        let radius = (disc.width as f64 / 4.0).min(disc.height as f64 / 2.0) - 0.25;

        buf.set_string(
            cx.floor() as u16,
            inner.y,
            "▼",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        );

        let geometry = match WheelGeometry::new(self.items.len()) {
            Some(g) => g,
            None => {
                let text = "Nothing to show";
                let x = (cx - text.chars().count() as f64 / 2.0).max(disc.x as f64) as u16;
                buf.set_stringn(x, cy as u16, text, disc.width as usize, Style::default().fg(Color::DarkGray));
                return;
            }
        };

        // Sector fills and spokes
        for row in disc.top()..disc.bottom() {
            for col in disc.left()..disc.right() {
                let dx = (col as f64 + 0.5 - cx) / 2.0;
                let dy = row as f64 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > radius {
                    continue;
                }

                let index = sector_under(&geometry, self.rotation, dx, dy);
                let color = geometry.sector_color(index, self.items[index].color);

                let wheel_angle = dy.atan2(dx).to_degrees() - self.rotation;
                let edge = geometry
                    .sector(index)
                    .edge_distance(wheel_angle)
                    .unwrap_or(0.0)
                    .to_radians()
                    * dist;
                let on_spoke = geometry.item_count() > 1 && dist > 1.0 && edge < 0.3;

                if let Some(cell) = buf.cell_mut((col, row)) {
                    cell.set_bg(rgb(color));
                    if on_spoke {
                        cell.set_symbol("·").set_fg(Color::Black);
                    } else {
                        cell.set_symbol(" ");
                    }
                }
            }
        }

        // Labels, horizontally centered on their anchor
        if geometry.item_count() <= MAX_LABELS {
            let max_len = ((radius * 2.0 * (1.0 - LABEL_RADIUS)) as usize).clamp(3, 14);
            let (sin, cos) = self.rotation.to_radians().sin_cos();
            for (index, item) in self.items.iter().enumerate() {
                // Anchor in the wheel frame, turned with the wheel
                let anchor = geometry.label_placement(index, radius * LABEL_RADIUS);
                let x = cx + (anchor.x * cos - anchor.y * sin) * 2.0;
                let y = cy + anchor.x * sin + anchor.y * cos;

                let label = item.short_label(max_len);
                let start = x - label.chars().count() as f64 / 2.0;
                if start < disc.x as f64 || y < disc.y as f64 || y >= disc.bottom() as f64 {
                    continue;
                }
                let bg = geometry.sector_color(index, item.color);
                buf.set_stringn(
                    start as u16,
                    y as u16,
                    &label,
                    disc.right().saturating_sub(start as u16) as usize,
                    Style::default().fg(label_color(bg)).bg(rgb(bg)),
                );
            }
        }

        // Caption: the item under the pointer while spinning, the result after
        let under_pointer = &self.items[geometry.sector_at_pointer(self.rotation)];
        let (caption, style) = match (self.spinning, self.landed) {
            (true, _) => (under_pointer.name.clone(), Style::default().fg(Color::Gray)),
            (false, Some(item)) => (
                item.name.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            (false, None) => (format!("{} options", self.items.len()), Style::default().fg(Color::DarkGray)),
        };
        let caption = crate::wheel::item::truncate_label(&caption, inner.width as usize);
        let x = (cx - caption.chars().count() as f64 / 2.0).max(inner.x as f64) as u16;
        buf.set_stringn(x, inner.bottom() - 1, &caption, inner.width as usize, style);
    }
}
