//! Main UI Application
//!
//! Coordinates rendering and input handling for the wheel view and the
//! build browser.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

use crate::audio::SoundId;
use crate::catalog::BuildEntry;
use crate::randomizer::{browser, BrowserState, BrowserTab, MessageKind, Randomizer, SortKey, View};
use crate::session::SessionPhase;
use crate::wheel::item::truncate_label;

use super::widgets::WheelWidget;

/// Which list the sidebar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    Classes,
    Builds,
}

/// Main UI application
#[derive(Debug, Default)]
pub struct App {
    tab: SidebarTab,
    class_cursor: usize,
    build_cursor: usize,
    browser_cursor: usize,
    /// Typed characters go to the browser name search
    searching: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns true when the program should exit.
    pub fn handle_input(&mut self, key: KeyEvent, r: &mut Randomizer) -> Result<bool> {
        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            r.quit();
            return Ok(true);
        }

        // A notice blocks everything until dismissed
        if r.notice().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                r.dismiss_notice();
            }
            return Ok(false);
        }

        match r.view() {
            View::Wheels => self.handle_wheels_input(key, r)?,
            View::Browser => self.handle_browser_input(key, r)?,
            View::Quit => {}
        }
        Ok(r.should_quit())
    }

    fn handle_wheels_input(&mut self, key: KeyEvent, r: &mut Randomizer) -> Result<()> {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => r.spin(),
            KeyCode::Tab => {
                self.tab = match self.tab {
                    SidebarTab::Classes => SidebarTab::Builds,
                    SidebarTab::Builds => SidebarTab::Classes,
                };
                r.play_sound(SoundId::MenuMove);
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(r, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(r, 1),
            KeyCode::Char('x') => match self.tab {
                SidebarTab::Classes => {
                    if let Some(id) = self.class_under_cursor(r) {
                        r.toggle_class_excluded(&id);
                    }
                }
                SidebarTab::Builds => {
                    if let Some(id) = self.build_under_cursor(r) {
                        r.toggle_build_excluded(&id);
                    }
                }
            },
            KeyCode::Char('l') => match self.tab {
                SidebarTab::Classes => {
                    if let Some(id) = self.class_under_cursor(r) {
                        r.toggle_class_lock(&id);
                    }
                }
                SidebarTab::Builds => {
                    if let Some(id) = self.build_under_cursor(r) {
                        r.toggle_build_lock(&id);
                    }
                }
            },
            KeyCode::Char('d') => r.cycle_difficulty(),
            KeyCode::Char('p') => r.cycle_playstyle(),
            KeyCode::Char('g') => {
                r.next_game();
                self.class_cursor = 0;
                self.build_cursor = 0;
                self.browser_cursor = 0;
            }
            KeyCode::Char('f') => r.toggle_favorite(),
            KeyCode::Char('s') => r.toggle_sound(),
            KeyCode::Char('r') => r.reset(),
            KeyCode::Char('b') => r.toggle_view(),
            KeyCode::Char('q') | KeyCode::Esc => r.quit(),
            _ => {}
        }
        Ok(())
    }

    fn handle_browser_input(&mut self, key: KeyEvent, r: &mut Randomizer) -> Result<()> {
        if self.searching {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.searching = false,
                KeyCode::Backspace => r.browser_mut().pop_query(),
                KeyCode::Char(c) => r.browser_mut().push_query(c),
                _ => return Ok(()),
            }
            self.browser_cursor = 0;
            return Ok(());
        }

        let row_count = r.browser().rows(r.game()).len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.browser_cursor = self.browser_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.browser_cursor + 1 < row_count {
                    self.browser_cursor += 1;
                }
            }
            KeyCode::PageUp => self.browser_cursor = self.browser_cursor.saturating_sub(10),
            KeyCode::PageDown => {
                self.browser_cursor = (self.browser_cursor + 10).min(row_count.saturating_sub(1));
            }
            KeyCode::Char('1') => r.browser_mut().sort_by(SortKey::Name),
            KeyCode::Char('2') => r.browser_mut().sort_by(SortKey::Class),
            KeyCode::Char('3') => r.browser_mut().sort_by(SortKey::Difficulty),
            KeyCode::Char('4') => r.browser_mut().sort_by(SortKey::Popularity),
            KeyCode::Char('o') => {
                r.cycle_browser_source();
                self.browser_cursor = 0;
            }
            KeyCode::Char('c') => {
                r.cycle_browser_class();
                self.browser_cursor = 0;
            }
            KeyCode::Char('t') => {
                r.cycle_browser_tier();
                self.browser_cursor = 0;
            }
            KeyCode::Tab => {
                if browser::has_off_meta(r.game()) {
                    r.browser_mut().toggle_tab();
                    self.browser_cursor = 0;
                    r.play_sound(SoundId::MenuMove);
                }
            }
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Backspace => {
                r.browser_mut().query.clear();
                self.browser_cursor = 0;
            }
            KeyCode::Char('l') => {
                let id = r
                    .browser()
                    .rows(r.game())
                    .get(self.browser_cursor)
                    .map(|row| row.build.id.clone());
                if let Some(id) = id {
                    r.toggle_build_lock(&id);
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => r.toggle_view(),
            KeyCode::Char('q') => r.quit(),
            _ => {}
        }
        Ok(())
    }

    fn move_cursor(&mut self, r: &mut Randomizer, step: isize) {
        let (cursor, len) = match self.tab {
            SidebarTab::Classes => (&mut self.class_cursor, r.game().classes.len()),
            SidebarTab::Builds => (&mut self.build_cursor, r.game().build_count()),
        };
        if len == 0 {
            return;
        }
        let next = (*cursor as isize + step).clamp(0, len as isize - 1) as usize;
        if next != *cursor {
            *cursor = next;
            r.play_sound(SoundId::MenuMove);
        }
    }

    fn class_under_cursor(&self, r: &Randomizer) -> Option<String> {
        r.game().classes.get(self.class_cursor).map(|c| c.id.clone())
    }

    fn build_under_cursor(&self, r: &Randomizer) -> Option<String> {
        r.game().all_builds().nth(self.build_cursor).map(|(_, b)| b.id.clone())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self, frame: &mut Frame, r: &Randomizer) {
        frame.render_widget(Clear, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(1)])
            .split(frame.area());

        match r.view() {
            View::Wheels => self.render_wheels(frame, r, chunks[0]),
            View::Browser => self.render_browser(frame, r, chunks[0]),
            View::Quit => {}
        }
        self.render_status_bar(frame, r, chunks[1]);

        if let Some(notice) = r.notice() {
            let area = centered_rect(50, 25, frame.area());
            frame.render_widget(Clear, area);
            let text = vec![
                Line::from(""),
                Line::from(notice.text.as_str()),
                Line::from(""),
                Line::from(Span::styled("[Enter] OK", Style::default().fg(Color::DarkGray))),
            ];
            let popup = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .title(format!(" {} ", notice.title))
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                );
            frame.render_widget(popup, area);
        }
    }

    fn render_wheels(&self, frame: &mut Frame, r: &Randomizer, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(area);

        let wheels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        let session = r.session();
        let phase = session.phase();

        let class_wheel = session.class_wheel();
        frame.render_widget(
            WheelWidget::new(class_wheel.items(), class_wheel.displayed_rotation())
                .title("Class")
                .spinning(phase == SessionPhase::ClassSpinning)
                .locked(session.locked_class())
                .landed(session.selected_class()),
            wheels[0],
        );

        let build_wheel = session.build_wheel();
        frame.render_widget(
            WheelWidget::new(build_wheel.items(), build_wheel.displayed_rotation())
                .title("Build")
                .spinning(phase == SessionPhase::BuildSpinning)
                .locked(session.locked_build())
                .landed(session.selected_build()),
            wheels[1],
        );

        self.render_sidebar(frame, r, columns[1]);
    }

    fn render_sidebar(&self, frame: &mut Frame, r: &Randomizer, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(8),
                Constraint::Length(7),
                Constraint::Length(5),
            ])
            .split(area);

        self.render_item_list(frame, r, chunks[0]);
        render_filters(frame, r, chunks[1]);
        render_result(frame, r, chunks[2]);
        render_history(frame, r, chunks[3]);
        render_favorites(frame, r, chunks[4]);
    }

    fn render_item_list(&self, frame: &mut Frame, r: &Randomizer, area: Rect) {
        let session = r.session();
        let filters = session.filters();
        let game = r.game();
        let width = area.width.saturating_sub(8) as usize;

        let (title, entries, cursor): (&str, Vec<(bool, bool, String)>, usize) = match self.tab {
            SidebarTab::Classes => (
                " Classes [Tab] ",
                game.classes
                    .iter()
                    .map(|c| {
                        let locked = session.locked_class().is_some_and(|l| l.id == c.id);
                        (!filters.is_class_excluded(&c.id), locked, c.name.clone())
                    })
                    .collect(),
                self.class_cursor,
            ),
            SidebarTab::Builds => (
                " Builds [Tab] ",
                game.all_builds()
                    .map(|(c, b)| {
                        let locked = session.locked_build().is_some_and(|l| l.id == b.id);
                        let label = format!("{} ({})", b.name, c.name);
                        (!filters.is_build_excluded(&b.id), locked, label)
                    })
                    .collect(),
                self.build_cursor,
            ),
        };

        // Keep the cursor in view
        let visible = area.height.saturating_sub(2) as usize;
        let offset = if visible == 0 { 0 } else { cursor.saturating_sub(visible - 1) };

        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, (included, locked, label))| {
                let check = if *included { "[x] " } else { "[ ] " };
                let lock = if *locked { " ◆" } else { "" };
                let mut style = if *included {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                if *locked {
                    style = style.fg(Color::Yellow);
                }
                if i == cursor {
                    style = style.bg(Color::Rgb(40, 40, 60)).add_modifier(Modifier::BOLD);
                }
                ListItem::new(Line::from(vec![
                    Span::styled(check, style),
                    Span::styled(truncate_label(label, width), style),
                    Span::styled(lock, style),
                ]))
            })
            .collect();

        let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, r: &Randomizer, area: Rect) {
        let hints = match r.view() {
            View::Wheels => {
                "[Space] Spin  [x] Exclude  [l] Lock  [d/p] Filters  [g] Game  [f] Fav  [s] Sound  [r] Reset  [b] Browse  [q] Quit"
            }
            View::Browser if self.searching => "Type to search  [Backspace] Delete  [Enter/Esc] Done",
            View::Browser => {
                "[1-4] Sort  [Tab] Off-meta  [c/t/o] Class/Tier/Source  [/] Search  [l] Lock build  [b] Back  [q] Quit"
            }
            View::Quit => "",
        };
        let sound = if r.sound_enabled() { "♪" } else { "-" };
        let last = r.messages().last().map(|m| {
            let color = match m.kind {
                MessageKind::Info => Color::Gray,
                MessageKind::Result => Color::Green,
                MessageKind::Warning => Color::Red,
            };
            Span::styled(format!("  {}", m.text), Style::default().fg(color))
        });

        let mut spans = vec![
            Span::styled(
                format!(" {} {} ", r.game().name, sound),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            Span::styled(format!(" {}", hints), Style::default().fg(Color::DarkGray)),
        ];
        spans.extend(last);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_browser(&self, frame: &mut Frame, r: &Randomizer, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(9)])
            .split(area);

        let state = r.browser();
        let rows = state.rows(r.game());
        let cursor = self.browser_cursor.min(rows.len().saturating_sub(1));

        let arrow = if state.descending { "▼" } else { "▲" };
        let header_cell = |key: SortKey, label: &str| {
            if state.sort == key {
                Cell::from(format!("{} {}", label, arrow))
                    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                Cell::from(label.to_string())
            }
        };
        let header = Row::new(vec![
            header_cell(SortKey::Name, "Build"),
            header_cell(SortKey::Class, "Class"),
            header_cell(SortKey::Difficulty, "Difficulty"),
            Cell::from("Playstyle"),
            Cell::from("Tier"),
            header_cell(SortKey::Popularity, "Popularity"),
            Cell::from("Source"),
        ])
        .style(Style::default().fg(Color::Gray));

        let visible = chunks[0].height.saturating_sub(3) as usize;
        let offset = if visible == 0 { 0 } else { cursor.saturating_sub(visible - 1) };
        let session = r.session();

        let body: Vec<Row> = rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, row)| {
                let b = row.build;
                let mut style = if session.filters().is_build_excluded(&b.id) {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                if session.locked_build().is_some_and(|l| l.id == b.id) {
                    style = style.fg(Color::Yellow);
                }
                if i == cursor {
                    style = style.bg(Color::Rgb(40, 40, 60)).add_modifier(Modifier::BOLD);
                }
                Row::new(vec![
                    Cell::from(b.name.clone()),
                    Cell::from(row.class.name.clone()),
                    Cell::from(b.difficulty.clone().unwrap_or_default()),
                    Cell::from(b.playstyle.clone().unwrap_or_default()),
                    Cell::from(b.tier.clone().unwrap_or_default()),
                    Cell::from(b.popularity.map(|p| format!("{:.1}%", p)).unwrap_or_default()),
                    Cell::from(b.source.clone().unwrap_or_default()),
                ])
                .style(style)
            })
            .collect();

        let title = format!(
            " {} {} builds ({}, {}) ",
            r.game().name,
            state.tab.label(),
            rows.len(),
            filter_summary(state, r),
        );
        let table = Table::new(
            body,
            [
                Constraint::Percentage(26),
                Constraint::Percentage(16),
                Constraint::Percentage(11),
                Constraint::Percentage(11),
                Constraint::Percentage(6),
                Constraint::Percentage(12),
                Constraint::Percentage(18),
            ],
        )
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(table, chunks[0]);

        let details = rows.get(cursor).map(|row| build_details(row.build)).unwrap_or_default();
        let panel = Paragraph::new(details)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Details ").borders(Borders::ALL));
        frame.render_widget(panel, chunks[1]);
    }
}

/// Active browser filters for the table title
fn filter_summary(state: &BrowserState, r: &Randomizer) -> String {
    let mut parts = Vec::new();
    if let Some(id) = &state.class {
        let class = r.game().classes.iter().find(|c| &c.id == id);
        parts.push(class.map_or_else(|| id.clone(), |c| c.name.clone()));
    }
    if state.tab == BrowserTab::Meta {
        if let Some(tier) = &state.tier {
            parts.push(format!("{}-tier", tier));
        }
        parts.extend(state.source.clone());
    }
    if !state.query.is_empty() {
        parts.push(format!("\"{}\"", state.query));
    }
    if parts.is_empty() {
        "no filters".to_string()
    } else {
        parts.join(", ")
    }
}

fn render_filters(frame: &mut Frame, r: &Randomizer, area: Rect) {
    let filters = r.session().filters();
    let value = |v: &Option<String>| v.clone().unwrap_or_else(|| "Any".to_string());
    let line = Line::from(vec![
        Span::styled("Difficulty: ", Style::default().fg(Color::Gray)),
        Span::styled(value(&filters.difficulty), Style::default().fg(Color::Cyan)),
        Span::styled("  Playstyle: ", Style::default().fg(Color::Gray)),
        Span::styled(value(&filters.playstyle), Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().title(" Filters ").borders(Borders::ALL)),
        area,
    );
}

fn render_result(frame: &mut Frame, r: &Randomizer, area: Rect) {
    let session = r.session();
    let mut lines = Vec::new();

    match (session.selected_class(), session.selected_build()) {
        (Some(class), Some(build)) if !session.is_spinning() => {
            lines.push(Line::from(vec![
                Span::styled("Class: ", Style::default().fg(Color::Gray)),
                Span::styled(class.name.clone(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Build: ", Style::default().fg(Color::Gray)),
                Span::styled(build.name.clone(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            ]));
            if let Some((_, entry)) = r.game().find_build(&build.id) {
                lines.extend(build_details(entry).into_iter().skip(1));
            }
            if r.current_favorite().is_some_and(|f| r.prefs().is_favorite(&f)) {
                lines.push(Line::from(Span::styled("★ Favorite", Style::default().fg(Color::Magenta))));
            }
        }
        (Some(class), _) => {
            lines.push(Line::from(format!("Class: {}", class.name)));
            lines.push(spinning_line("Spinning build", session.build_wheel().progress()));
        }
        _ if session.is_spinning() => {
            lines.push(spinning_line("Spinning", session.class_wheel().progress()));
        }
        _ => {
            lines.push(Line::from(Span::styled("Press Space to spin", Style::default().fg(Color::DarkGray))));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Result ").borders(Borders::ALL)),
        area,
    );
}

fn render_history(frame: &mut Frame, r: &Randomizer, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = r
        .session()
        .history()
        .iter()
        .map(|record| {
            let lock = if record.class_locked || record.build_locked { " ◆" } else { "" };
            ListItem::new(format!("{}{}", truncate_label(&record.label(), width), lock))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().title(" History ").borders(Borders::ALL)),
        area,
    );
}

fn render_favorites(frame: &mut Frame, r: &Randomizer, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = r
        .prefs()
        .favorites_for(&r.game().id)
        .map(|f| {
            let label = format!("{} / {}", f.class_name, f.build_name);
            ListItem::new(Span::styled(truncate_label(&label, width), Style::default().fg(Color::Magenta)))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().title(" Favorites ").borders(Borders::ALL)),
        area,
    );
}

fn spinning_line(label: &str, progress: Option<f64>) -> Line<'static> {
    let text = match progress {
        Some(p) => format!("{}… {:>3.0}%", label, p * 100.0),
        None => format!("{}…", label),
    };
    Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

/// Metadata lines for one build; the first line is its name
fn build_details(build: &BuildEntry) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        build.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let facts: Vec<String> = [
        build.tier.as_ref().map(|t| format!("Tier {}", t)),
        build.difficulty.clone(),
        build.playstyle.clone(),
        build.damage_type.clone(),
        build.league.as_ref().map(|l| format!("League {}", l)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !facts.is_empty() {
        lines.push(Line::from(Span::styled(facts.join(" · "), Style::default().fg(Color::Cyan))));
    }
    if !build.tags.is_empty() {
        lines.push(Line::from(Span::styled(build.tags.join(", "), Style::default().fg(Color::Gray))));
    }
    if let Some(description) = &build.description {
        lines.push(Line::from(description.clone()));
    }
    if !build.keystones.is_empty() {
        lines.push(Line::from(format!("Keystones: {}", build.keystones.join(", "))));
    }
    if !build.top_builds.is_empty() {
        let names: Vec<&str> = build.top_builds.iter().take(3).map(|t| t.name.as_str()).collect();
        lines.push(Line::from(format!("Top builds: {}", names.join(", "))));
    }
    if let Some(url) = build.guide_url.as_ref().or(build.planner_url.as_ref()) {
        lines.push(Line::from(Span::styled(url.clone(), Style::default().fg(Color::Blue))));
    }
    lines
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::catalog::default_catalog;
    use crate::config::RandomizerConfig;
    use crate::save::Preferences;
    use crossterm::event::KeyEventKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::{Terminal, backend::TestBackend};

    fn make() -> (App, Randomizer) {
        let r = Randomizer::with_parts(
            default_catalog(),
            RandomizerConfig::default(),
            Preferences::default(),
            AudioManager::silent(),
            StdRng::seed_from_u64(42),
        )
        .unwrap();
        (App::new(), r)
    }

    fn press(app: &mut App, r: &mut Randomizer, code: KeyCode) -> bool {
        let mut key = KeyEvent::new(code, KeyModifiers::NONE);
        key.kind = KeyEventKind::Press;
        app.handle_input(key, r).unwrap()
    }

    #[test]
    fn test_exclude_and_lock_from_sidebar() {
        let (mut app, mut r) = make();
        press(&mut app, &mut r, KeyCode::Down);
        press(&mut app, &mut r, KeyCode::Char('x'));
        let second = r.game().classes[1].id.clone();
        assert!(r.session().filters().is_class_excluded(&second));

        press(&mut app, &mut r, KeyCode::Char('l'));
        assert_eq!(r.session().locked_class().map(|c| c.id.clone()), Some(second));
    }

    #[test]
    fn test_notice_blocks_until_dismissed() {
        let (mut app, mut r) = make();
        press(&mut app, &mut r, KeyCode::Char('f'));
        assert!(r.notice().is_some());
        press(&mut app, &mut r, KeyCode::Char('b'));
        assert_eq!(r.view(), View::Wheels);
        press(&mut app, &mut r, KeyCode::Enter);
        assert!(r.notice().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, mut r) = make();
        assert!(!press(&mut app, &mut r, KeyCode::Char('b')));
        assert_eq!(r.view(), View::Browser);
        assert!(press(&mut app, &mut r, KeyCode::Char('q')));
    }

    #[test]
    fn test_browser_search_and_filters() {
        let (mut app, mut r) = make();
        press(&mut app, &mut r, KeyCode::Char('b'));

        // While searching, letters are text rather than commands
        press(&mut app, &mut r, KeyCode::Char('/'));
        for c in "QX".chars() {
            press(&mut app, &mut r, KeyCode::Char(c));
        }
        assert_eq!(r.browser().query, "QX");
        assert!(!r.should_quit());
        assert!(r.browser().rows(r.game()).is_empty());

        press(&mut app, &mut r, KeyCode::Backspace);
        press(&mut app, &mut r, KeyCode::Enter);
        assert_eq!(r.browser().query, "Q");
        press(&mut app, &mut r, KeyCode::Backspace);
        assert!(r.browser().query.is_empty());

        press(&mut app, &mut r, KeyCode::Char('c'));
        let first = r.game().classes[0].id.clone();
        assert_eq!(r.browser().class.as_deref(), Some(first.as_str()));
        assert!(r.browser().rows(r.game()).iter().all(|row| row.class.id == first));

        press(&mut app, &mut r, KeyCode::Char('t'));
        let tier = r.browser().tier.clone();
        assert!(tier.is_some());
        assert!(r.browser().rows(r.game()).iter().all(|row| row.build.tier == tier));
        assert_eq!(r.view(), View::Browser);
    }

    #[test]
    fn test_off_meta_tab_only_with_ninja_builds() {
        let (mut app, mut r) = make();
        press(&mut app, &mut r, KeyCode::Char('b'));
        let has_ninja = browser::has_off_meta(r.game());
        press(&mut app, &mut r, KeyCode::Tab);
        let expected = if has_ninja { BrowserTab::OffMeta } else { BrowserTab::Meta };
        assert_eq!(r.browser().tab, expected);

        press(&mut app, &mut r, KeyCode::Char('b'));
        press(&mut app, &mut r, KeyCode::Char('g'));
        press(&mut app, &mut r, KeyCode::Char('b'));
        assert_eq!(r.browser().tab, BrowserTab::Meta);
        assert_eq!(browser::has_off_meta(r.game()), !has_ninja);
        press(&mut app, &mut r, KeyCode::Tab);
        let rows = r.browser().rows(r.game());
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| {
            let ninja = row.build.source.as_deref() == Some(browser::OFF_META_SOURCE);
            ninja == (r.browser().tab == BrowserTab::OffMeta)
        }));
    }

    #[test]
    fn test_render_both_views() {
        let (mut app, mut r) = make();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        press(&mut app, &mut r, KeyCode::Char(' '));
        for _ in 0..30 {
            r.update(std::time::Duration::from_millis(16));
            terminal.draw(|frame| app.render(frame, &r)).unwrap();
        }

        press(&mut app, &mut r, KeyCode::Char('b'));
        press(&mut app, &mut r, KeyCode::Char('4'));
        terminal.draw(|frame| app.render(frame, &r)).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Popularity"));
    }
}
