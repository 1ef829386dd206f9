//! SFEN形式の解析・出力

use crate::types::{Color, File, Piece, PieceType, Rank, Square};

use super::pos::Position;
use super::zobrist::{zobrist_hand, zobrist_psq, zobrist_side, HashKey};

/// 平手初期局面のSFEN
pub const SFEN_HIRATE: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// SFENパースエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SfenError {
    /// 盤面の形式が不正
    #[error("invalid board: {0}")]
    Board(String),
    /// 手番の形式が不正
    #[error("invalid side to move: {0}")]
    SideToMove(String),
    /// 手駒の形式が不正
    #[error("invalid hand: {0}")]
    Hand(String),
}

impl Position {
    /// 平手初期局面を設定
    pub fn set_hirate(&mut self) {
        self.set_sfen(SFEN_HIRATE).expect("hirate SFEN must parse");
    }

    /// SFEN文字列から局面を設定
    ///
    /// 盤面・手番・手駒の3フィールドは必須。手数フィールドは省略可能で、
    /// 欠落・不正な場合はエラーにせず0にフォールバックする。
    pub fn set_sfen(&mut self, sfen: &str) -> Result<(), SfenError> {
        // 局面をクリア（盤面・手駒・玉位置NBを含めて全て初期状態に戻す）
        *self = Position::new();

        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(SfenError::Board(
                "SFEN must have at least 3 fields (board, side, hand)".to_string(),
            ));
        }

        // 1. 盤面
        self.parse_board(parts[0])?;

        // 2. 手番
        match parts[1] {
            "b" => self.side_to_move = Color::Black,
            "w" => self.side_to_move = Color::White,
            _ => {
                return Err(SfenError::SideToMove(format!(
                    "expected 'b' or 'w', got '{}'",
                    parts[1]
                )))
            }
        }

        // 3. 手駒
        self.parse_hand(parts[2])?;

        // 4. 手数（欠落・不正は0扱い）
        self.game_ply = match parts.get(3) {
            Some(s) => s.parse().unwrap_or_else(|_| {
                log::warn!("unparsable ply field '{s}', defaulting to 0");
                0
            }),
            None => 0,
        };

        // ハッシュ値の計算
        self.compute_key();

        Ok(())
    }

    /// 現局面のSFEN文字列を取得
    pub fn to_sfen(&self) -> String {
        let mut result = String::new();

        // 1. 盤面（1段目から9段目、各段は9筋から1筋）
        for (rank_idx, r) in Rank::ALL.iter().enumerate() {
            let mut empty_count = 0;

            for file in (0..File::NUM).rev() {
                let sq = Square::new(File::ALL[file], *r);
                let pc = self.piece_on(sq);

                if pc.is_none() {
                    empty_count += 1;
                } else {
                    if empty_count > 0 {
                        result.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    result.push_str(&pc.to_usi());
                }
            }

            if empty_count > 0 {
                result.push_str(&empty_count.to_string());
            }

            if rank_idx < 8 {
                result.push('/');
            }
        }

        // 2. 手番
        result.push(' ');
        result.push(self.side_to_move.to_usi_char());

        // 3. 手駒（先手が先、両方空なら"-"）
        result.push(' ');
        let hand_str = self.hand_to_sfen();
        if hand_str.is_empty() {
            result.push('-');
        } else {
            result.push_str(&hand_str);
        }

        // 4. 手数
        result.push(' ');
        result.push_str(&self.game_ply.to_string());

        result
    }

    /// 盤面部分をパース
    fn parse_board(&mut self, board_str: &str) -> Result<(), SfenError> {
        let ranks: Vec<&str> = board_str.split('/').collect();
        if ranks.len() != 9 {
            return Err(SfenError::Board(format!("expected 9 ranks, got {}", ranks.len())));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = Rank::ALL[rank_idx];
            let mut file_idx = 8i32; // 9筋から開始
            let mut promoted = false;

            for c in rank_str.chars() {
                if c == '+' {
                    promoted = true;
                    continue;
                }

                if let Some(digit) = c.to_digit(10) {
                    file_idx -= digit as i32;
                    if file_idx < -1 {
                        return Err(SfenError::Board(format!(
                            "too many squares in rank {rank_idx}"
                        )));
                    }
                } else {
                    if file_idx < 0 {
                        return Err(SfenError::Board(format!(
                            "too many pieces in rank {rank_idx}"
                        )));
                    }

                    let file = File::ALL[file_idx as usize];
                    let sq = Square::new(file, rank);

                    let pc = sfen_char_to_piece(c, promoted)
                        .map_err(|e| SfenError::Board(format!("rank {rank_idx}: {e}")))?;
                    self.put_piece(pc, sq)
                        .map_err(|e| SfenError::Board(format!("rank {rank_idx}: {e}")))?;

                    promoted = false;
                    file_idx -= 1;
                }
            }

            if file_idx != -1 {
                return Err(SfenError::Board(format!(
                    "rank {rank_idx} has wrong number of squares"
                )));
            }
        }

        Ok(())
    }

    /// 手駒部分をパース
    fn parse_hand(&mut self, hand_str: &str) -> Result<(), SfenError> {
        if hand_str == "-" {
            return Ok(());
        }

        let mut count = 0u32;
        for c in hand_str.chars() {
            if let Some(digit) = c.to_digit(10) {
                count = count * 10 + digit;
            } else {
                let pt = match PieceType::from_usi_char(c) {
                    Some(pt) if pt.is_hand_piece() => pt,
                    _ => return Err(SfenError::Hand(format!("unknown hand piece: {c}"))),
                };
                let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
                let n = if count == 0 { 1 } else { count };

                self.hand[color.index()] = self.hand[color.index()].add_n(pt, n);
                count = 0;
            }
        }

        Ok(())
    }

    /// 手駒をSFEN文字列に変換（先手が先、両方空なら空文字列）
    fn hand_to_sfen(&self) -> String {
        let mut result = String::new();

        for color in [Color::Black, Color::White] {
            let hand = self.hand[color.index()];
            if hand.is_empty() {
                continue;
            }
            let token = hand.to_usi(color);
            // Hand::to_usiは末尾に区切り空白を付けるので連結時に剥がす
            result.push_str(token.trim_end());
        }

        result
    }

    /// ハッシュ値をゼロから計算する
    ///
    /// 盤上の駒と手駒をXORで畳み、手番は（sideキーのみbit 0を使う
    /// 取り決めにより）加算で合成する。
    pub(super) fn compute_key(&mut self) {
        let mut board_key = HashKey::ZERO;
        let mut hand_key = HashKey::ZERO;

        // 盤上の駒
        for sq in Square::all() {
            let pc = self.piece_on(sq);
            if pc.is_some() {
                board_key ^= zobrist_psq(pc, sq);
            }
        }

        // 手番
        if self.side_to_move == Color::White {
            board_key = board_key + zobrist_side();
        }

        // 手駒
        for color in [Color::Black, Color::White] {
            for pt in PieceType::HAND_PIECES {
                let cnt = self.hand[color.index()].count(pt);
                for _ in 0..cnt {
                    hand_key ^= zobrist_hand(color, pt);
                }
            }
        }

        self.board_key = board_key;
        self.hand_key = hand_key;
    }
}

/// SFEN文字を駒に変換
fn sfen_char_to_piece(c: char, promoted: bool) -> Result<Piece, String> {
    let pt = match PieceType::from_usi_char(c) {
        Some(pt) => pt,
        None => return Err(format!("unknown piece: {c}")),
    };
    let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };

    let pt = if promoted {
        match pt.promote() {
            Some(pt) => pt,
            None => return Err(format!("cannot promote: {c}")),
        }
    } else {
        pt
    };

    Ok(Piece::new(color, pt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_hirate() {
        let mut pos = Position::new();
        pos.set_hirate();

        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.game_ply(), 1);

        // 先手の駒配置チェック
        assert_eq!(pos.piece_on(Square::new(File::File9, Rank::Rank9)), Piece::B_LANCE);
        assert_eq!(pos.piece_on(Square::new(File::File5, Rank::Rank9)), Piece::B_KING);
        assert_eq!(pos.piece_on(Square::new(File::File7, Rank::Rank7)), Piece::B_PAWN);
        assert_eq!(pos.piece_on(Square::new(File::File8, Rank::Rank8)), Piece::B_BISHOP);
        assert_eq!(pos.piece_on(Square::new(File::File2, Rank::Rank8)), Piece::B_ROOK);

        // 後手の駒配置チェック
        assert_eq!(pos.piece_on(Square::new(File::File9, Rank::Rank1)), Piece::W_LANCE);
        assert_eq!(pos.piece_on(Square::new(File::File5, Rank::Rank1)), Piece::W_KING);
        assert_eq!(pos.piece_on(Square::new(File::File7, Rank::Rank3)), Piece::W_PAWN);

        // 玉の位置
        assert_eq!(pos.king_square(Color::Black), Square::new(File::File5, Rank::Rank9));
        assert_eq!(pos.king_square(Color::White), Square::new(File::File5, Rank::Rank1));

        // 手駒なし
        assert!(pos.hand(Color::Black).is_empty());
        assert!(pos.hand(Color::White).is_empty());
    }

    #[test]
    fn test_sfen_roundtrip() {
        let test_cases = [
            SFEN_HIRATE,
            "8l/1l+R2P3/p2pBG1pp/kps1p4/Nn1P2G2/P1P1P2PP/1PS6/1KSG3+r1/LN2+p3L w Sbgn3p 124",
            "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1",
        ];

        for sfen in test_cases {
            let mut pos = Position::new();
            pos.set_sfen(sfen).unwrap();
            let result = pos.to_sfen();
            assert_eq!(result, sfen, "SFEN roundtrip failed for: {sfen}");
        }
    }

    #[test]
    fn test_sfen_with_hands() {
        let sfen = "4k4/9/9/9/9/9/9/9/4K4 b 2P 1";
        let mut pos = Position::new();
        pos.set_sfen(sfen).unwrap();

        assert_eq!(pos.hand(Color::Black).count(PieceType::Pawn), 2);
        assert_eq!(pos.hand(Color::White).count(PieceType::Pawn), 0);
        assert_eq!(pos.to_sfen(), sfen);
    }

    #[test]
    fn test_sfen_promoted_pieces() {
        let sfen = "4k4/9/9/9/4+P4/9/9/9/4K4 b - 1";
        let mut pos = Position::new();
        pos.set_sfen(sfen).unwrap();

        assert_eq!(pos.piece_on(Square::SQ_55), Piece::B_PRO_PAWN);
    }

    #[test]
    fn test_sfen_white_to_move() {
        let sfen = "4k4/9/9/9/9/9/9/9/4K4 w - 1";
        let mut pos = Position::new();
        pos.set_sfen(sfen).unwrap();

        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn test_sfen_ply_defaults_to_zero() {
        // 手数フィールドの欠落
        let mut pos = Position::new();
        pos.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b -").unwrap();
        assert_eq!(pos.game_ply(), 0);

        // 手数フィールドが数値でない
        let mut pos = Position::new();
        pos.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b - xyz").unwrap();
        assert_eq!(pos.game_ply(), 0);
    }

    #[test]
    fn test_sfen_error_cases() {
        let mut pos = Position::new();

        // フィールド不足
        assert!(matches!(pos.set_sfen("invalid"), Err(SfenError::Board(_))));

        // 段の不足
        assert!(matches!(
            pos.set_sfen("9/9/9 b - 1"),
            Err(SfenError::Board(_))
        ));

        // 段中のマス数過多
        assert!(matches!(
            pos.set_sfen("ppppppppppp/9/9/9/9/9/9/9/9 b - 1"),
            Err(SfenError::Board(_))
        ));

        // 未知の駒文字
        assert!(matches!(
            pos.set_sfen("xnsgkgsnl/9/9/9/9/9/9/9/9 b - 1"),
            Err(SfenError::Board(_))
        ));

        // 不正な手番
        assert!(matches!(
            pos.set_sfen("4k4/9/9/9/9/9/9/9/4K4 x - 1"),
            Err(SfenError::SideToMove(_))
        ));

        // 不正な手駒
        assert!(matches!(
            pos.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b 2X 1"),
            Err(SfenError::Hand(_))
        ));
    }

    #[test]
    fn test_sfen_clears_previous_state() {
        let mut pos = Position::new();
        pos.set_hirate();

        // 手駒付きの別局面を読み込むと前の状態は残らない
        pos.set_sfen("4k4/9/9/9/9/9/9/9/9 b 2P 1").unwrap();
        assert_eq!(pos.king_square(Color::Black), Square::NB);
        assert_eq!(pos.hand(Color::Black).count(PieceType::Pawn), 2);
        assert_eq!(pos.occupied().count(), 1);
    }

    #[test]
    fn test_sfen_hash_key() {
        // 同一局面は同一キー、手番だけ違う局面はbit 0だけ違う
        let mut a = Position::new();
        a.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b - 1").unwrap();
        let mut b = Position::new();
        b.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b - 1").unwrap();
        assert_eq!(a.key(), b.key());

        let mut c = Position::new();
        c.set_sfen("4k4/9/9/9/9/9/9/9/4K4 w - 1").unwrap();
        assert_ne!(a.key(), c.key());
        assert_eq!(a.board_key().p0() & 1, 0);
        assert_eq!(c.board_key().p0() & 1, 1);

        // 手駒が違えばhand_keyが違う
        let mut d = Position::new();
        d.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b P 1").unwrap();
        assert_eq!(d.board_key(), a.board_key());
        assert_ne!(d.hand_key(), a.hand_key());
    }
}
