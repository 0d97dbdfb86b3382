use super::{Board, Color, Piece, fen_tables::CHAR_TO_PC, fen_tables::PC_TO_CHAR};
use crate::board::castle_bits::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::square::Square;

fn pc_index(piece: Piece, color: Color) -> usize {
    (color as usize) * 6 + (piece as usize)
}

impl Board {
    /// Parses a six-field position description into `self`, replacing all state.
    ///
    /// Fields: piece placement, side to move, castling rights, en-passant
    /// square, halfmove clock, fullmove number.
    pub fn set_fen(&mut self, s: &str) -> Result<(), String> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(format!(
                "expected 6 space-separated fields, found {}",
                fields.len()
            ));
        }

        let mut fresh = Board::new_empty();

        parse_placement(&mut fresh, fields[0])?;
        fresh.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("invalid side to move: {other}")),
        };
        fresh.castling_rights = parse_castling(fields[2])?;
        fresh.en_passant = parse_en_passant(fields[3])?;
        fresh.halfmove_clock = fields[4]
            .parse()
            .map_err(|_| format!("invalid halfmove clock: {}", fields[4]))?;
        fresh.fullmove_number = fields[5]
            .parse()
            .map_err(|_| format!("invalid fullmove number: {}", fields[5]))?;

        fresh.refresh_zobrist();
        fresh.history.clear();
        *self = fresh;
        Ok(())
    }

    /// Serializes the current position back into the six-field textual form.
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty_run = 0u32;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            row.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        row.push(PC_TO_CHAR[pc_index(piece, color)]);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                row.push_str(&empty_run.to_string());
            }
            ranks.push(row);
        }
        let placement = ranks.join("/");

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.castling_rights & CASTLE_WK != 0 {
            castling.push('K');
        }
        if self.castling_rights & CASTLE_WQ != 0 {
            castling.push('Q');
        }
        if self.castling_rights & CASTLE_BK != 0 {
            castling.push('k');
        }
        if self.castling_rights & CASTLE_BQ != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.en_passant {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            placement, side, castling, ep, self.halfmove_clock, self.fullmove_number
        )
    }
}

fn parse_placement(board: &mut Board, field: &str) -> Result<(), String> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(format!("expected 8 ranks, found {}", rows.len()));
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let rank = 7 - row_idx as u8;
        let mut file = 0u8;
        for ch in row.chars() {
            if file > 8 {
                return Err(format!("rank {} overflows files", rank + 1));
            }
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(format!("invalid empty-square count: {ch}"));
                }
                file += skip as u8;
                continue;
            }
            if (ch as usize) >= CHAR_TO_PC.len() {
                return Err(format!("unknown piece letter: {ch}"));
            }
            let (piece, color) = CHAR_TO_PC[ch as usize].ok_or_else(|| format!("unknown piece letter: {ch}"))?;
            if file > 7 {
                return Err(format!("rank {} overflows files", rank + 1));
            }
            let sq = Square::from_file_rank(file, rank);
            let bb = board.bb(color, piece) | sq.bit();
            board.set_bb(color, piece, bb);
            file += 1;
        }
        if file != 8 {
            return Err(format!("rank {} does not sum to 8 files", rank + 1));
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<u8, String> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for ch in field.chars() {
        rights |= match ch {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            other => return Err(format!("invalid castling right: {other}")),
        };
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, String> {
    if field == "-" {
        return Ok(None);
    }
    Square::from_name(field)
        .map(Some)
        .ok_or_else(|| format!("invalid en-passant square: {field}"))
}
