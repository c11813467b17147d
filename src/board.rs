//! Rules engine for the fixed 8x8 Othello board.
//!
//! [`Board`] is the only authority on move legality and stone flipping. Invalid coordinates or
//! illegal placements are reported through boolean returns, never through errors or panics.

use std::fmt::Display;
use std::str::FromStr;

use crate::protocol::Move;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;
/// Number of cells on the board.
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Content of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No stone.
    Empty,
    /// Black stone.
    Black,
    /// White stone.
    White,
}

impl Cell {
    fn digit(self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Black => '1',
            Cell::White => '2',
        }
    }
}

/// One of the two players. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// First player, protocol id 1.
    Black,
    /// Second player, protocol id 2.
    White,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Number announced to agents in the `COLOR` line.
    pub fn protocol_id(self) -> u8 {
        match self {
            Side::Black => 1,
            Side::White => 2,
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Cell {
        match side {
            Side::Black => Cell::Black,
            Side::White => Cell::White,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Black => write!(f, "Black"),
            Side::White => write!(f, "White"),
        }
    }
}

/// Board state plus the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    active: Side,
}

impl Board {
    /// Creates a board in the standard starting position, Black to move.
    pub fn new() -> Self {
        let mut board = Board {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            active: Side::Black,
        };
        board.reset();
        board
    }

    /// Clears the board and puts the four centre stones back:
    /// d4=white, e4=black, d5=black, e5=white.
    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        self.cells[3][3] = Cell::White;
        self.cells[3][4] = Cell::Black;
        self.cells[4][3] = Cell::Black;
        self.cells[4][4] = Cell::White;
        self.active = Side::Black;
    }

    /// Side expected to play the next ply.
    pub fn active_side(&self) -> Side {
        self.active
    }

    /// Hands the turn to the other side.
    pub fn switch_side(&mut self) {
        self.active = self.active.opponent();
    }

    /// Content of a cell. Out of range coordinates read as [`Cell::Empty`].
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            self.cells[row][col]
        } else {
            Cell::Empty
        }
    }

    /// True if `side` may place a stone at (`row`, `col`).
    pub fn is_legal(&self, side: Side, row: usize, col: usize) -> bool {
        if row >= BOARD_SIZE || col >= BOARD_SIZE || self.cells[row][col] != Cell::Empty {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&direction| !self.bracketed_run(side, row, col, direction).is_empty())
    }

    /// Places a stone for `side` and flips every bracketed opponent run.
    ///
    /// Returns false, leaving the board untouched, when the placement is illegal.
    pub fn place(&mut self, side: Side, row: usize, col: usize) -> bool {
        if !self.is_legal(side, row, col) {
            return false;
        }

        // collect every direction first so that flips of one ray cannot affect another
        let flips = DIRECTIONS
            .iter()
            .flat_map(|&direction| self.bracketed_run(side, row, col, direction))
            .collect::<Vec<_>>();

        let stone = Cell::from(side);
        self.cells[row][col] = stone;
        for (r, c) in flips {
            self.cells[r][c] = stone;
        }
        true
    }

    /// True if `side` has at least one legal placement.
    pub fn has_legal_move(&self, side: Side) -> bool {
        (0..BOARD_SIZE).any(|row| (0..BOARD_SIZE).any(|col| self.is_legal(side, row, col)))
    }

    /// Every legal placement for `side`, in row-major order.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = vec![];
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.is_legal(side, row, col) {
                    moves.push(Move::Place { row, col });
                }
            }
        }
        moves
    }

    /// Number of cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }

    /// Row-major encoding, one digit per cell: 0=empty, 1=black, 2=white.
    pub fn serialize(&self) -> String {
        self.cells.iter().flatten().map(|c| c.digit()).collect()
    }

    /// Opponent cells walked from (`row`, `col`) along `direction`, if the walk ends on a stone
    /// of `side`. Empty otherwise.
    fn bracketed_run(
        &self,
        side: Side,
        row: usize,
        col: usize,
        (dr, dc): (isize, isize),
    ) -> Vec<(usize, usize)> {
        let own = Cell::from(side);
        let opponent = Cell::from(side.opponent());
        let mut run = vec![];

        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while in_bounds(r, c) {
            let cell = self.cells[r as usize][c as usize];
            if cell == opponent {
                run.push((r as usize, c as usize));
            } else if cell == own {
                return run;
            } else {
                break;
            }
            r += dr;
            c += dc;
        }
        vec![]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn in_bounds(row: isize, col: isize) -> bool {
    (0..BOARD_SIZE as isize).contains(&row) && (0..BOARD_SIZE as isize).contains(&col)
}

/// Error returned when a board string is not 64 digits in `0..=2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBoardError(String);

impl Display for ParseBoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid board: {}", self.0)
    }
}

impl std::error::Error for ParseBoardError {}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Inverse of [`Board::serialize`]. The parsed board has Black to move.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != NUM_CELLS {
            return Err(ParseBoardError(format!(
                "expected {NUM_CELLS} cells, got {len}"
            )));
        }

        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (i, ch) in s.chars().enumerate() {
            cells[i / BOARD_SIZE][i % BOARD_SIZE] = match ch {
                '0' => Cell::Empty,
                '1' => Cell::Black,
                '2' => Cell::White,
                other => return Err(ParseBoardError(format!("unexpected '{other}' at {i}"))),
            };
        }
        Ok(Board {
            cells,
            active: Side::Black,
        })
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (i, row) in self.cells.iter().enumerate() {
            write!(f, "{}", i + 1)?;
            for cell in row {
                let stone = match cell {
                    Cell::Black => '●',
                    Cell::White => '○',
                    Cell::Empty => '-',
                };
                write!(f, " {stone}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stones(board: &Board) -> usize {
        board.count(Cell::Black) + board.count(Cell::White)
    }

    #[test]
    fn initial_position() {
        let board = Board::new();
        assert_eq!(board.cell(3, 3), Cell::White);
        assert_eq!(board.cell(3, 4), Cell::Black);
        assert_eq!(board.cell(4, 3), Cell::Black);
        assert_eq!(board.cell(4, 4), Cell::White);
        assert_eq!(board.count(Cell::Empty), 60);
        assert_eq!(board.active_side(), Side::Black);
    }

    #[test]
    fn initial_black_legal_moves_are_four_expected_squares() {
        let board = Board::new();
        let expected = vec![
            Move::Place { row: 2, col: 3 }, // d3
            Move::Place { row: 3, col: 2 }, // c4
            Move::Place { row: 4, col: 5 }, // f5
            Move::Place { row: 5, col: 4 }, // e6
        ];
        assert_eq!(board.legal_moves(Side::Black), expected);
    }

    #[test]
    fn black_c4_flips_d4() {
        let mut board = Board::new();
        assert!(board.place(Side::Black, 3, 2));
        assert_eq!(board.cell(3, 2), Cell::Black);
        assert_eq!(board.cell(3, 3), Cell::Black);
        assert_eq!(board.count(Cell::Black), 4);
        assert_eq!(board.count(Cell::White), 1);
    }

    #[test]
    fn illegal_placements_leave_board_untouched() {
        let mut board = Board::new();
        let before = board.clone();

        assert!(!board.place(Side::Black, 0, 0)); // no bracket
        assert!(!board.place(Side::Black, 3, 3)); // occupied
        assert!(!board.place(Side::Black, 8, 2)); // out of range
        assert!(!board.place(Side::White, 3, 2)); // own stone adjacent, no opponent run
        assert_eq!(board, before);
    }

    #[test]
    fn is_legal_and_place_agree() {
        let board = Board::new();
        for side in [Side::Black, Side::White] {
            for row in 0..BOARD_SIZE {
                for col in 0..BOARD_SIZE {
                    let mut copy = board.clone();
                    assert_eq!(board.is_legal(side, row, col), copy.place(side, row, col));
                }
            }
        }
    }

    #[test]
    fn placement_adds_one_stone_plus_flips() {
        let mut board = Board::new();
        // d3, c3, c4 ... a short legal sequence
        let plies = [
            (Side::Black, 2, 3),
            (Side::White, 2, 2),
            (Side::Black, 3, 2),
            (Side::White, 4, 2),
        ];
        for (side, row, col) in plies {
            let before = board.clone();
            let own_before = before.count(Cell::from(side));
            assert!(board.place(side, row, col));

            let own_after = board.count(Cell::from(side));
            let flipped = own_after - own_before - 1;
            assert!(flipped >= 1);
            assert_eq!(stones(&board), stones(&before) + 1);
            assert_eq!(
                board.count(Cell::from(side.opponent())),
                before.count(Cell::from(side.opponent())) - flipped
            );

            // the only cell leaving Empty is the placed one
            for r in 0..BOARD_SIZE {
                for c in 0..BOARD_SIZE {
                    if before.cell(r, c) == Cell::Empty && (r, c) != (row, col) {
                        assert_eq!(board.cell(r, c), Cell::Empty);
                    }
                }
            }
        }
    }

    #[test]
    fn flips_in_several_directions_at_once() {
        let mut layout = ['0'; NUM_CELLS];
        let set = |layout: &mut [char; NUM_CELLS], r: usize, c: usize, ch: char| {
            layout[r * BOARD_SIZE + c] = ch
        };
        set(&mut layout, 3, 4, '2');
        set(&mut layout, 3, 5, '1');
        set(&mut layout, 4, 3, '2');
        set(&mut layout, 5, 3, '1');
        set(&mut layout, 4, 4, '2');
        set(&mut layout, 5, 5, '1');
        set(&mut layout, 2, 3, '2'); // open run upward, must not flip
        let mut board: Board = layout.iter().collect::<String>().parse().unwrap();

        assert!(board.place(Side::Black, 3, 3));
        assert_eq!(board.cell(3, 4), Cell::Black);
        assert_eq!(board.cell(4, 3), Cell::Black);
        assert_eq!(board.cell(4, 4), Cell::Black);
        assert_eq!(board.cell(2, 3), Cell::White);
    }

    #[test]
    fn run_ending_on_edge_does_not_flip() {
        let mut layout = ['0'; NUM_CELLS];
        layout[0] = '2';
        layout[1] = '2';
        layout[BOARD_SIZE + 2] = '2';
        layout[2 * BOARD_SIZE + 2] = '1';
        let board: Board = layout.iter().collect::<String>().parse().unwrap();

        // from c1 the row walk west hits the edge, the column walk south is bracketed
        assert!(board.is_legal(Side::Black, 0, 2));
        let mut copy = board.clone();
        copy.place(Side::Black, 0, 2);
        assert_eq!(copy.cell(0, 1), Cell::White);
        assert_eq!(copy.cell(1, 2), Cell::Black);
    }

    #[test]
    fn has_legal_move_detects_blocked_side() {
        let mut layout = ['0'; NUM_CELLS];
        layout[0] = '1';
        let board: Board = layout.iter().collect::<String>().parse().unwrap();
        assert!(!board.has_legal_move(Side::Black));
        assert!(!board.has_legal_move(Side::White));
        assert!(Board::new().has_legal_move(Side::White));
    }

    #[test]
    fn serialize_round_trip() {
        let mut board = Board::new();
        board.place(Side::Black, 3, 2);
        let encoded = board.serialize();
        assert_eq!(encoded.len(), NUM_CELLS);
        assert_eq!(&encoded[24..32], "00111000");

        let decoded: Board = encoded.parse().unwrap();
        assert_eq!(decoded.serialize(), encoded);
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                assert_eq!(decoded.cell(row, col), board.cell(row, col));
            }
        }
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("0".repeat(63).parse::<Board>().is_err());
        assert!(format!("{}3", "0".repeat(63)).parse::<Board>().is_err());
    }

    #[test]
    fn switch_side_alternates() {
        let mut board = Board::new();
        board.switch_side();
        assert_eq!(board.active_side(), Side::White);
        board.reset();
        assert_eq!(board.active_side(), Side::Black);
    }

    #[test]
    fn display_has_header_and_rows() {
        let rendered = Board::new().to_string();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), BOARD_SIZE + 1);
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[4], "4 - - - ○ ● - - -");
    }
}
