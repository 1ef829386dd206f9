//! 局面表現モジュール
//!
//! 将棋の局面を表現し、手の実行・巻き戻しを行う。
//!
//! - `Position`: 局面（盤面・手駒・手番・玉位置・ハッシュキー）
//! - `do_move` / `undo_move`: 手の実行と巻き戻し
//! - SFEN形式の解析・出力
//! - `BoardType`: 平手・駒落ちの初期局面
//! - Zobristハッシュテーブル

mod board_type;
mod json;
mod pos;
mod sfen;
mod zobrist;

pub use board_type::BoardType;
pub use json::{BoardStateJson, CellJson, HandJson, HandsJson, PieceJson};
pub use pos::{BoardOpError, MoveError, Position, Undo};
pub use sfen::{SfenError, SFEN_HIRATE};
pub use zobrist::{zobrist_hand, zobrist_psq, zobrist_side, HashKey, Prng, Zobrist, ZOBRIST};
