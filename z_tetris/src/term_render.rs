use zenoh_leaderboard::{format_play_time, ScoreId, ScoreRecord};

use crate::game::GameStatus;
use crate::grid::{Cell, Grid};
use crate::piece::{Color, Piece, PieceKind};
use crate::state::GameSnapshot;

#[derive(Clone, PartialEq, Debug)]
pub enum TermCell {
    FieldCell(Cell),
    BorderVertical,
    BorderHorizontal,
    BorderTopLeft,
    BorderTopRight,
    BorderBottomLeft,
    BorderBottomRight,
    Space,
    Message(String),
}

pub trait TermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str;
    fn width(&self, cell: &TermCell) -> usize;
}

pub trait TermRender {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>>;
    fn render(&self, style: &impl TermStyle) -> Vec<String> {
        self.output(style)
            .iter()
            .map(|row| row.iter().map(|cell| style.display(cell)).collect())
            .collect()
    }
}

fn cell_width(cell: &TermCell) -> usize {
    match cell {
        TermCell::FieldCell(_) | TermCell::BorderHorizontal => 2,
        TermCell::Message(s) => console::measure_text_width(s),
        _ => 1,
    }
}

fn line_width(line: &[TermCell], style: &impl TermStyle) -> usize {
    line.iter().map(|c| style.width(c)).sum()
}

// Make all lines in block the same width by padding with TermCell::Space
pub fn pad_block_right(block: &mut [Vec<TermCell>], style: &impl TermStyle) {
    assert_eq!(style.width(&TermCell::Space), 1);
    let width = block
        .iter()
        .map(|row| line_width(row, style))
        .max()
        .unwrap_or(0);
    for row in block.iter_mut() {
        let padding = width - line_width(row, style);
        row.extend(std::iter::repeat_n(TermCell::Space, padding));
    }
}

/// Place blocks side by side, top aligned, separated by `gap` spaces
pub fn join_columns(
    mut blocks: Vec<Vec<Vec<TermCell>>>,
    gap: usize,
    style: &impl TermStyle,
) -> Vec<Vec<TermCell>> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    for block in blocks.iter_mut() {
        pad_block_right(block, style);
        let width = block.first().map(|row| line_width(row, style)).unwrap_or(0);
        while block.len() < height {
            block.push(vec![TermCell::Space; width]);
        }
    }
    (0..height)
        .map(|i| {
            let mut line = Vec::new();
            for (n, block) in blocks.iter().enumerate() {
                if n > 0 {
                    line.extend(std::iter::repeat_n(TermCell::Space, gap));
                }
                line.extend(block[i].iter().cloned());
            }
            line
        })
        .collect()
}

fn framed(mut lines: Vec<Vec<TermCell>>, inner_cells: usize, top: bool) -> Vec<Vec<TermCell>> {
    for line in &mut lines {
        line.insert(0, TermCell::BorderVertical);
        line.push(TermCell::BorderVertical);
    }
    if top {
        let mut line = vec![TermCell::BorderTopLeft];
        line.extend(std::iter::repeat_n(TermCell::BorderHorizontal, inner_cells));
        line.push(TermCell::BorderTopRight);
        lines.insert(0, line);
    }
    let mut line = vec![TermCell::BorderBottomLeft];
    line.extend(std::iter::repeat_n(TermCell::BorderHorizontal, inner_cells));
    line.push(TermCell::BorderBottomRight);
    lines.push(line);
    lines
}

pub struct PlainTermStyle;

impl TermStyle for PlainTermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str {
        match cell {
            TermCell::FieldCell(Cell::Empty) => "  ",
            TermCell::FieldCell(Cell::Filled(_)) => "[]",
            TermCell::BorderVertical => "|",
            TermCell::BorderTopLeft
            | TermCell::BorderTopRight
            | TermCell::BorderBottomLeft
            | TermCell::BorderBottomRight => "+",
            TermCell::BorderHorizontal => "--",
            TermCell::Space => " ",
            TermCell::Message(s) => s.as_str(),
        }
    }
    fn width(&self, cell: &TermCell) -> usize {
        cell_width(cell)
    }
}

pub struct AnsiTermStyle;

impl AnsiTermStyle {
    fn block(color: Color) -> &'static str {
        match color {
            Color::LightBlue => "\x1b[38;2;74;175;219m[]",
            Color::Yellow => "\x1b[38;2;232;197;71m[]",
            Color::Purple => "\x1b[38;2;155;93;229m[]",
            Color::Green => "\x1b[38;2;69;191;85m[]",
            Color::Red => "\x1b[38;2;241;91;91m[]",
            Color::Navy => "\x1b[38;2;74;105;189m[]",
            Color::Orange => "\x1b[38;2;230;126;34m[]",
        }
    }
}

impl TermStyle for AnsiTermStyle {
    fn display<'a>(&self, cell: &'a TermCell) -> &'a str {
        match cell {
            TermCell::FieldCell(Cell::Empty) => "\x1b[0m  ",
            TermCell::FieldCell(Cell::Filled(color)) => Self::block(*color),
            TermCell::BorderVertical => "\x1b[0m│",
            TermCell::BorderTopLeft => "\x1b[0m┌",
            TermCell::BorderTopRight => "\x1b[0m┐",
            TermCell::BorderBottomLeft => "\x1b[0m└",
            TermCell::BorderHorizontal => "\x1b[0m──",
            TermCell::BorderBottomRight => "\x1b[0m┘",
            TermCell::Space => " ",
            TermCell::Message(s) => s.as_str(),
        }
    }
    fn width(&self, cell: &TermCell) -> usize {
        cell_width(cell)
    }
}

impl TermRender for Grid {
    fn output(&self, _style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        (0..self.rows())
            .map(|y| self.row(y).iter().map(|c| TermCell::FieldCell(*c)).collect())
            .collect()
    }
}

/// The well with an overlay for pause and game over
pub struct WellView<'a> {
    well: &'a Grid,
    status: GameStatus,
}

impl<'a> WellView<'a> {
    pub fn new(well: &'a Grid, status: GameStatus) -> Self {
        Self { well, status }
    }
}

impl TermRender for WellView<'_> {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut lines = self.well.output(style);
        let overlay = match self.status {
            GameStatus::Running => None,
            GameStatus::Paused => Some(["       Paused", "  p to resume"]),
            GameStatus::GameOver => Some(["     Game Over", " Space to restart"]),
        };
        if let Some(messages) = overlay {
            let middle = lines.len() / 2;
            for (offset, message) in messages.iter().enumerate() {
                if let Some(line) = lines.get_mut(middle + offset) {
                    *line = vec![TermCell::Message(message.to_string())];
                }
            }
            pad_block_right(&mut lines, style);
        }
        framed(lines, self.well.cols(), false)
    }
}

/// Small framed box showing one piece kind, or nothing
pub struct PreviewBox {
    title: &'static str,
    kind: Option<PieceKind>,
}

impl PreviewBox {
    pub fn new(title: &'static str, kind: Option<PieceKind>) -> Self {
        Self { title, kind }
    }

    fn field(&self) -> Grid {
        let mut field = Grid::new(2, 4);
        if let Some(kind) = self.kind {
            let shape = kind.shape();
            let top = shape.filled_cells().map(|(_, dy)| dy).min().unwrap_or(0);
            let x = if shape.size() == 2 { 1 } else { 0 };
            field.merge(&Piece::new(kind, x, -(top as isize)));
        }
        field
    }
}

impl TermRender for PreviewBox {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let field = self.field();
        let mut lines = vec![vec![TermCell::Message(self.title.to_string())]];
        lines.extend(framed(field.output(style), field.cols(), true));
        lines
    }
}

/// Score, lines, level, time and player name
pub struct StatsPanel<'a> {
    snapshot: &'a GameSnapshot,
    username: &'a str,
}

impl<'a> StatsPanel<'a> {
    pub fn new(snapshot: &'a GameSnapshot, username: &'a str) -> Self {
        Self { snapshot, username }
    }
}

impl TermRender for StatsPanel<'_> {
    fn output(&self, _style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let s = self.snapshot;
        [
            format!("Player {}", self.username),
            format!("Score  {}", s.score),
            format!("Lines  {}", s.lines),
            format!("Level  {}", s.level),
            format!("Time   {}", format_play_time(s.play_time_ms)),
        ]
        .into_iter()
        .map(|text| vec![TermCell::Message(text)])
        .collect()
    }
}

/// Top list as a table: rank, player, score, time, date
pub struct LeaderboardTable<'a> {
    records: &'a [ScoreRecord],
    highlight: Option<&'a ScoreId>,
}

impl<'a> LeaderboardTable<'a> {
    pub fn new(records: &'a [ScoreRecord], highlight: Option<&'a ScoreId>) -> Self {
        Self { records, highlight }
    }
}

impl TermRender for LeaderboardTable<'_> {
    fn output(&self, _style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let mut lines = vec![
            vec![TermCell::Message(
                "  #  Player                  Score   Time  Date".to_string(),
            )],
        ];
        if self.records.is_empty() {
            lines.push(vec![TermCell::Message("     no scores yet".to_string())]);
        }
        for (i, record) in self.records.iter().enumerate() {
            let marker = if Some(&record.id) == self.highlight { '>' } else { ' ' };
            let name: String = record.username.as_str().chars().take(20).collect();
            lines.push(vec![TermCell::Message(format!(
                "{}{:>2}  {:<20} {:>8}  {}  {}",
                marker,
                i + 1,
                name,
                record.score,
                format_play_time(record.time),
                format_date(record)
            ))]);
        }
        lines
    }
}

/// Submission time in the player's local time zone
fn format_date(record: &ScoreRecord) -> String {
    record
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Whole screen: well, side panel and leaderboard
pub struct GameScreen<'a> {
    pub snapshot: &'a GameSnapshot,
    pub username: &'a str,
    pub leaderboard: &'a [ScoreRecord],
    pub highlight: Option<&'a ScoreId>,
    pub message: Vec<String>,
}

impl TermRender for GameScreen<'_> {
    fn output(&self, style: &impl TermStyle) -> Vec<Vec<TermCell>> {
        let well = WellView::new(&self.snapshot.well, self.snapshot.status).output(style);

        let mut side = PreviewBox::new("Next", Some(self.snapshot.next)).output(style);
        side.push(Vec::new());
        side.extend(PreviewBox::new("Hold", self.snapshot.hold).output(style));
        side.push(Vec::new());
        side.extend(StatsPanel::new(self.snapshot, self.username).output(style));
        side.push(Vec::new());
        side.extend(LeaderboardTable::new(self.leaderboard, self.highlight).output(style));
        if !self.message.is_empty() {
            side.push(Vec::new());
            for message in &self.message {
                side.push(vec![TermCell::Message(message.clone())]);
            }
        }

        join_columns(vec![well, side], 2, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SequencePieces;
    use crate::game::{Input, Session};
    use chrono::TimeZone;
    use zenoh_leaderboard::{ScoreSubmission, Username};

    fn snapshot_of(session: &Session) -> GameSnapshot {
        session.snapshot(0)
    }

    #[test]
    fn test_pad_block_right() {
        let mut block = vec![
            vec![TermCell::Message("abc".to_string())],
            vec![TermCell::FieldCell(Cell::Empty)],
            Vec::new(),
        ];
        pad_block_right(&mut block, &PlainTermStyle);
        for row in &block {
            assert_eq!(line_width(row, &PlainTermStyle), 3);
        }
    }

    #[test]
    fn test_well_frame() {
        let grid = Grid::default();
        let lines = WellView::new(&grid, GameStatus::Running).render(&PlainTermStyle);
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], format!("|{}|", " ".repeat(20)));
        assert_eq!(lines[20], format!("+{}+", "-".repeat(20)));
    }

    #[test]
    fn test_overlays() {
        let grid = Grid::default();
        let lines = WellView::new(&grid, GameStatus::GameOver).render(&PlainTermStyle);
        assert!(lines[10].contains("Game Over"));
        let lines = WellView::new(&grid, GameStatus::Paused).render(&PlainTermStyle);
        assert!(lines[10].contains("Paused"));
        // Overlay rows keep the frame width
        assert_eq!(lines[10].len(), lines[0].len());
    }

    #[test]
    fn test_preview_box() {
        let lines = PreviewBox::new("Next", Some(PieceKind::I)).render(&PlainTermStyle);
        assert_eq!(lines[0], "Next");
        assert_eq!(lines[2], "|[][][][]|");
        assert_eq!(lines[3], "|        |");

        let lines = PreviewBox::new("Hold", Some(PieceKind::O)).render(&PlainTermStyle);
        assert_eq!(lines[2], "|  [][]  |");
        assert_eq!(lines[3], "|  [][]  |");

        let lines = PreviewBox::new("Hold", None).render(&PlainTermStyle);
        assert_eq!(lines[2], "|        |");
    }

    #[test]
    fn test_leaderboard_table() {
        let store = zenoh_leaderboard::LocalScoreStore::in_memory();
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        let saved = store.add(
            ScoreSubmission::new(Username::new("ann").unwrap(), 1500, 65_000).with_timestamp(at),
        );
        store.add(ScoreSubmission::new(Username::new("bob").unwrap(), 900, 0).with_timestamp(at));
        let records = store.leaderboard();
        let date = at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        let lines = LeaderboardTable::new(&records, Some(&saved.id)).render(&PlainTermStyle);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Time  Date"));
        assert!(lines[1].starts_with("> 1  ann"));
        assert!(lines[1].ends_with(&format!("01:05  {}", date)));
        assert!(lines[2].starts_with("  2  bob"));
        assert!(lines[2].ends_with(&format!("--:--  {}", date)));

        let lines = LeaderboardTable::new(&[], None).render(&PlainTermStyle);
        assert!(lines[1].contains("no scores yet"));
    }

    #[test]
    fn test_game_screen_lines_have_equal_width() {
        let mut session = Session::new(Box::new(SequencePieces::new([PieceKind::T, PieceKind::L])), 0);
        session.handle_input(Input::Hold, 0);
        let snapshot = snapshot_of(&session);
        let screen = GameScreen {
            snapshot: &snapshot,
            username: "ann",
            leaderboard: &[],
            highlight: None,
            message: vec!["offline".to_string()],
        };
        let style = PlainTermStyle;
        let output = screen.output(&style);
        let width = line_width(&output[0], &style);
        assert!(output.iter().all(|line| line_width(line, &style) == width));

        let text = screen.render(&style).join("\n");
        assert!(text.contains("Player ann"));
        assert!(text.contains("Score  0"));
        assert!(text.contains("offline"));
    }
}
