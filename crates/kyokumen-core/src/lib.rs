//! # kyokumen-core
//!
//! 将棋の局面コアライブラリ。盤面・指し手のビット詰め表現、SFEN入出力、
//! 局面同一性のためのZobristハッシュ基盤を提供する。
//!
//! 合法手判定・手生成・探索・評価・USIプロセスI/Oは扱わない。
//! それらの層は本クレートの公開面（SFEN文字列、`Move`/`Position`値）を
//! 消費する外部コンポーネントとして想定している。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, File, Rank, Square, Piece, Move, Hand）
//! - `bitboard`: 81マスのビットボードとマスクテーブル
//! - `position`: 局面表現、SFEN入出力、do_move/undo_move、Zobristハッシュ

pub mod bitboard;
pub mod position;
pub mod types;

pub use bitboard::Bitboard;
pub use position::{BoardType, HashKey, Position, SfenError};
pub use types::{Color, File, Hand, Move, Piece, PieceType, Rank, Square};
