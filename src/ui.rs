use std::io;

use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::game::{FrameCell, Snapshot};
use crate::piece::PieceKind;
use crate::runtime::Renderer;

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const INFO_WIDTH: u16 = 14;

pub const CONTROLS_HINT: &str = "h/l: Move | r: Rotate | j: Drop | q: Quit";

// ============================================================================
// Color Mapping
// ============================================================================

fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::T => Color::Magenta,
        PieceKind::L => Color::Rgb(255, 165, 0),
        PieceKind::S => Color::Green,
    }
}

// ============================================================================
// Renderer
// ============================================================================

pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(backend: B) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
        })
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn draw(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame, snapshot))?;
        Ok(())
    }
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render(frame: &mut Frame, snapshot: &Snapshot) {
    let area = frame.size();

    let grid_display_width = (snapshot.width() as u16 * CELL_WIDTH) + 2;
    let grid_display_height = snapshot.height() as u16 + 2;
    let total_width = (grid_display_width + INFO_WIDTH).max(CONTROLS_HINT.len() as u16);
    let total_height = grid_display_height + 2;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(INFO_WIDTH),
    ])
    .split(vertical[0]);

    render_grid(frame, snapshot, horizontal[0]);
    render_info(frame, snapshot, horizontal[1]);

    let controls = Paragraph::new(Line::from(CONTROLS_HINT))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(controls, vertical[1]);
}

fn render_grid(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let title = if snapshot.running {
        " Tetris "
    } else {
        " Game Over "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .frame()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    FrameCell::Empty => Span::raw(EMPTY_CHAR),
                    FrameCell::Locked => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(Color::Gray))
                    }
                    FrameCell::Active(kind) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(piece_color(*kind)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", snapshot.score)),
        Line::from(""),
        Line::from(Span::styled("Combo", Style::default().fg(Color::Magenta))),
        Line::from(format!("{}", snapshot.combo_count)),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", snapshot.lines_cleared)),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}
