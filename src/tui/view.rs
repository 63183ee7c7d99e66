use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Rectangle};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::session::SessionView;
use crate::shared::KEY_LABELS;

// Everything game-side works in the logical 1280x720 field with y growing
// downward; the canvas wants y growing upward, so positions flip here and
// nowhere else.
const STAFF_LINES: u32 = 5;
const STAFF_LINE_GAP: f32 = 20.0;
const STAFF_LOWER_Y: f32 = 200.0;
const STAFF_LEFT_X: f32 = 240.0;

fn flip(view: &SessionView, y: f32) -> f64 {
    (view.cfg.field_height - y) as f64
}

pub fn render_session(frame: &mut Frame, area: Rect, view: &SessionView) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // score / octave header
            Constraint::Min(10),   // play field
            Constraint::Length(1), // key labels
        ])
        .split(area);

    let header = Line::styled(
        format!(
            " score {:>6}   bar {}.{:<2}   octave {}   ↑/↓ octave · esc menu",
            view.score, view.bar, view.slot, view.octave
        ),
        Style::default().add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(header), sections[0]);

    draw_field(frame, sections[1], view);

    let labels: String = KEY_LABELS.map(|c| format!("{c} ")).concat();
    frame.render_widget(
        Paragraph::new(Line::styled(
            format!(" keys: {labels}"),
            Style::default().fg(Color::DarkGray),
        )),
        sections[2],
    );
}

fn draw_field(frame: &mut Frame, area: Rect, view: &SessionView) {
    let (box_x, box_y, box_w, box_h) = view.cfg.play_box;
    let canvas = Canvas::default()
        .block(Block::bordered())
        .x_bounds([0.0, view.cfg.field_width as f64])
        .y_bounds([0.0, view.cfg.field_height as f64])
        .paint(|ctx| {
            // the staff
            for i in 0..STAFF_LINES {
                let y = flip(view, STAFF_LOWER_Y - i as f32 * STAFF_LINE_GAP);
                ctx.draw(&CanvasLine {
                    x1: STAFF_LEFT_X as f64,
                    y1: y,
                    x2: view.cfg.field_width as f64,
                    y2: y,
                    color: Color::Gray,
                });
            }

            // the hit window
            ctx.draw(&Rectangle {
                x: box_x as f64,
                y: flip(view, box_y + box_h),
                width: box_w as f64,
                height: box_h as f64,
                color: Color::Green,
            });

            for note in view.notes {
                let style = if note.mirrored {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                };
                ctx.print(
                    note.x as f64,
                    flip(view, note.y),
                    Line::styled(note.kind.glyph().to_string(), style),
                );
            }
        });
    frame.render_widget(canvas, area);
}

pub fn render_menu(
    frame: &mut Frame,
    area: Rect,
    songs: &[String],
    cursor: usize,
    status: Option<&str>,
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // song list
            Constraint::Length(1), // status / errors
            Constraint::Length(1), // key help
        ])
        .split(area);

    let items: Vec<ListItem> = songs.iter().map(|name| ListItem::new(name.as_str())).collect();
    let list = List::new(items)
        .block(Block::bordered().title(" pianotty — pick a song "))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("♪ ");
    let mut state = ListState::default().with_selected(Some(cursor));
    frame.render_stateful_widget(list, sections[0], &mut state);

    if let Some(status) = status {
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!(" {status}"),
                Style::default().fg(Color::Red),
            )),
            sections[1],
        );
    }
    frame.render_widget(
        Paragraph::new(Line::styled(
            " ↑/↓ pick · enter play · esc quit",
            Style::default().fg(Color::DarkGray),
        )),
        sections[2],
    );
}
