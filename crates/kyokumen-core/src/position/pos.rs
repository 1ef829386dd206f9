//! 局面（Position）

use crate::bitboard::Bitboard;
use crate::types::{Color, File, Hand, Move, Piece, PieceType, Rank, Square};

use super::board_type::BoardType;
use super::sfen::SfenError;
use super::zobrist::{zobrist_hand, zobrist_psq, zobrist_side, HashKey};

/// 盤面操作の契約違反（空きマスでないマスへのput等）
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOpError {
    /// 駒のあるマスに駒を置こうとした
    #[error("square {} is already occupied", .0.to_usi())]
    Occupied(Square),
    /// 空きマスから駒を取り除こうとした
    #[error("square {} is empty", .0.to_usi())]
    Empty(Square),
}

/// 構造的に不正な指し手
///
/// このコアは王手・ピン等の合法手判定を行わない。ここで弾くのは
/// 盤面構造として成立しない指し手だけで、意味的な合法性は呼び出し側の責務。
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// 打てない駒種（歩〜金の範囲外）を打とうとした
    #[error("piece type value {0} cannot be dropped")]
    BadDrop(u8),
    /// 手駒にない駒を打とうとした
    #[error("no {0:?} in hand")]
    NotInHand(PieceType),
    /// 取れない駒（玉）を取ろうとした
    #[error("{0:?} cannot be captured")]
    Uncapturable(Piece),
    /// 成れない駒に成りフラグが付いていた
    #[error("{0:?} cannot promote")]
    CannotPromote(Piece),
    /// 盤面操作の契約違反
    #[error(transparent)]
    Board(#[from] BoardOpError),
}

/// `do_move`の巻き戻しレコード
///
/// `undo_move`が取った駒を盤に戻すために呼び出し側が保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    /// 取った駒（取っていなければ`Piece::NONE`）
    pub captured: Piece,
}

/// 将棋の局面
///
/// 内部同期は持たない。複数スレッドから同一インスタンスを触る場合は
/// 呼び出し側が直列化するか、インスタンスごと複製すること。
#[derive(Clone)]
pub struct Position {
    // === 盤面 ===
    /// 各マスの駒 [Square]（末尾は玉不在時にking_square=NBで参照される余白）
    pub(super) board: [Piece; Square::NUM + 1],
    /// 駒種別Bitboard [PieceType]
    pub(super) by_type: [Bitboard; PieceType::NUM + 1],
    /// 先後別Bitboard
    pub(super) by_color: [Bitboard; Color::NUM],

    // === 手駒 ===
    /// 手駒 [Color]
    pub(super) hand: [Hand; Color::NUM],

    // === 状態 ===
    /// 玉の位置 [Color]（盤上にいなければNB）
    pub(super) king_square: [Square; Color::NUM],
    /// 手番
    pub(super) side_to_move: Color,
    /// 初期局面からの手数
    pub(super) game_ply: i32,
    /// 盤上の駒のハッシュ（手番込み）
    pub(super) board_key: HashKey,
    /// 手駒のハッシュ
    pub(super) hand_key: HashKey,
}

impl Position {
    // ========== 局面設定 ==========

    /// 空の局面を生成
    pub fn new() -> Self {
        Position {
            board: [Piece::NONE; Square::NUM + 1],
            by_type: [Bitboard::EMPTY; PieceType::NUM + 1],
            by_color: [Bitboard::EMPTY; Color::NUM],
            hand: [Hand::EMPTY; Color::NUM],
            king_square: [Square::NB; Color::NUM],
            side_to_move: Color::Black,
            game_ply: 0,
            board_key: HashKey::ZERO,
            hand_key: HashKey::ZERO,
        }
    }

    /// 指定の初期局面を設定
    pub fn init_board(&mut self, board_type: BoardType) -> Result<(), SfenError> {
        log::debug!("init board: {board_type:?}");
        self.set_sfen(board_type.sfen())
    }

    // ========== 盤面アクセス ==========

    /// 指定マスの駒を取得（番兵はNONE）
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    /// 全駒のBitboard（占有）
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[Color::Black.index()] | self.by_color[Color::White.index()]
    }

    /// 指定駒種のBitboard
    #[inline]
    pub fn pieces_pt(&self, pt: PieceType) -> Bitboard {
        self.by_type[pt.index()]
    }

    /// 指定手番の駒のBitboard
    #[inline]
    pub fn pieces_c(&self, c: Color) -> Bitboard {
        self.by_color[c.index()]
    }

    /// 指定手番・駒種のBitboard
    #[inline]
    pub fn pieces(&self, c: Color, pt: PieceType) -> Bitboard {
        self.by_color[c.index()] & self.by_type[pt.index()]
    }

    /// 手駒を取得
    #[inline]
    pub fn hand(&self, c: Color) -> Hand {
        self.hand[c.index()]
    }

    /// 玉の位置を取得（盤上にいなければNB）
    #[inline]
    pub fn king_square(&self, c: Color) -> Square {
        self.king_square[c.index()]
    }

    /// 手番を取得
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 手数を取得
    #[inline]
    pub fn game_ply(&self) -> i32 {
        self.game_ply
    }

    /// 盤上の駒のハッシュキー（手番込み）
    #[inline]
    pub fn board_key(&self) -> HashKey {
        self.board_key
    }

    /// 手駒のハッシュキー
    #[inline]
    pub fn hand_key(&self) -> HashKey {
        self.hand_key
    }

    /// 局面のハッシュキー
    #[inline]
    pub fn key(&self) -> HashKey {
        self.board_key ^ self.hand_key
    }

    // ========== 盤面操作 ==========

    /// 盤面に駒を置く
    ///
    /// 対象マスが空いていなければ`BoardOpError::Occupied`。
    /// 玉を置いた場合はking_squareも更新する。
    pub fn put_piece(&mut self, pc: Piece, sq: Square) -> Result<(), BoardOpError> {
        debug_assert!(sq.is_ok());
        debug_assert!(pc.is_some());
        if self.board[sq.index()].is_some() {
            return Err(BoardOpError::Occupied(sq));
        }
        self.board[sq.index()] = pc;
        self.by_type[pc.piece_type().index()].set(sq);
        self.by_color[pc.color().index()].set(sq);
        if pc.piece_type() == PieceType::King {
            self.king_square[pc.color().index()] = sq;
        }
        Ok(())
    }

    /// 盤面から駒を取り除き、その駒を返す
    ///
    /// 対象マスが空なら`BoardOpError::Empty`。
    /// 玉を取り除いた場合はking_squareをNBに戻す。
    pub fn remove_piece(&mut self, sq: Square) -> Result<Piece, BoardOpError> {
        debug_assert!(sq.is_ok());
        let pc = self.board[sq.index()];
        if pc.is_none() {
            return Err(BoardOpError::Empty(sq));
        }
        self.board[sq.index()] = Piece::NONE;
        self.by_type[pc.piece_type().index()].clear(sq);
        self.by_color[pc.color().index()].clear(sq);
        if pc.piece_type() == PieceType::King {
            self.king_square[pc.color().index()] = Square::NB;
        }
        Ok(pc)
    }

    // ========== 指し手実行 ==========

    /// 指し手を実行
    ///
    /// 盤面・手駒・手番・ハッシュキーを更新し、巻き戻し用の`Undo`を返す。
    /// game_plyは変更しない（手数の管理は棋譜層の責務）。
    /// 検証はすべて盤面に触る前に行うので、Errの場合に局面は変化しない。
    pub fn do_move(&mut self, m: Move) -> Result<Undo, MoveError> {
        let us = self.side_to_move;
        let captured;

        if m.is_drop() {
            let to = m.to();
            let pt = match PieceType::from_u8(m.drop_piece_raw()) {
                Some(pt) if pt.is_hand_piece() => pt,
                _ => return Err(MoveError::BadDrop(m.drop_piece_raw())),
            };
            if !self.hand[us.index()].has(pt) {
                return Err(MoveError::NotInHand(pt));
            }

            let pc = Piece::new(us, pt);
            self.put_piece(pc, to)?;
            self.hand[us.index()] = self.hand[us.index()].sub(pt);

            self.board_key ^= zobrist_psq(pc, to);
            self.hand_key ^= zobrist_hand(us, pt);
            captured = Piece::NONE;
        } else {
            let from = m.from();
            let to = m.to();

            let pc = self.piece_on(from);
            if pc.is_none() {
                return Err(BoardOpError::Empty(from).into());
            }
            let moved = if m.is_promote() {
                match pc.promote() {
                    Some(p) => p,
                    None => return Err(MoveError::CannotPromote(pc)),
                }
            } else {
                pc
            };

            captured = self.piece_on(to);
            if captured.is_some() && !captured.raw_piece_type().is_hand_piece() {
                // 玉は取れない
                return Err(MoveError::Uncapturable(captured));
            }

            self.remove_piece(from)?;
            self.board_key ^= zobrist_psq(pc, from);

            if captured.is_some() {
                // 移動先を先に空けてから動かす駒を置く
                let cap_pt = captured.raw_piece_type();
                self.remove_piece(to)?;
                self.hand[us.index()] = self.hand[us.index()].add(cap_pt);

                self.board_key ^= zobrist_psq(captured, to);
                self.hand_key ^= zobrist_hand(us, cap_pt);
            }

            self.put_piece(moved, to)?;
            self.board_key ^= zobrist_psq(moved, to);
        }

        self.side_to_move = !us;
        self.board_key ^= zobrist_side();

        Ok(Undo { captured })
    }

    /// 指し手を巻き戻す
    ///
    /// `do_move`が返した`Undo`を渡すこと。取った駒は盤に戻り、
    /// 手駒・手番・ハッシュキーも元に戻る。
    pub fn undo_move(&mut self, m: Move, undo: Undo) -> Result<(), MoveError> {
        let us = !self.side_to_move; // 指した側

        if m.is_drop() {
            let to = m.to();
            let pc = self.remove_piece(to)?;
            let pt = pc.piece_type();
            self.hand[us.index()] = self.hand[us.index()].add(pt);

            self.board_key ^= zobrist_psq(pc, to);
            self.hand_key ^= zobrist_hand(us, pt);
        } else {
            let from = m.from();
            let to = m.to();

            let moved = self.remove_piece(to)?;
            self.board_key ^= zobrist_psq(moved, to);

            let pc = if m.is_promote() { moved.unpromote() } else { moved };
            self.put_piece(pc, from)?;
            self.board_key ^= zobrist_psq(pc, from);

            if undo.captured.is_some() {
                let cap_pt = undo.captured.raw_piece_type();
                self.put_piece(undo.captured, to)?;
                self.hand[us.index()] = self.hand[us.index()].sub(cap_pt);

                self.board_key ^= zobrist_psq(undo.captured, to);
                self.hand_key ^= zobrist_hand(us, cap_pt);
            }
        }

        self.side_to_move = us;
        self.board_key ^= zobrist_side();

        Ok(())
    }

    // ========== 表示 ==========

    /// 表示用の文字列（盤面・手駒・手番）に変換
    pub fn pretty(&self) -> String {
        let mut result = String::new();
        for r in Rank::ALL {
            for f in File::ALL.iter().rev() {
                result.push_str(&self.piece_on(Square::new(*f, r)).pretty());
            }
            result.push('\n');
        }
        result.push_str(&format!("先手 手駒: {}\n", self.hand[Color::Black.index()].pretty()));
        result.push_str(&format!("後手 手駒: {}\n", self.hand[Color::White.index()].pretty()));
        result.push_str(&format!(
            "手番: {}\n",
            if self.side_to_move == Color::Black { "先手" } else { "後手" }
        ));
        result
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
