//! 盤面状態のJSON表現
//!
//! GUI側で扱うためのDTO。局面本体の内部表現には依存させず、
//! 文字列ベースの安定した形に落とす。

use serde::{Deserialize, Serialize};

use crate::types::{Color, File, PieceType, Rank, Square};

use super::pos::Position;

/// 駒のJSON表現
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceJson {
    /// "sente" | "gote"
    pub owner: String,
    /// "K" | "R" | "B" | "G" | "S" | "N" | "L" | "P"
    #[serde(rename = "type")]
    pub piece_type: String,
    /// 成駒かどうか
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<bool>,
}

/// 盤面の1マス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellJson {
    /// "9a" 〜 "1i" 形式
    pub square: String,
    /// 駒（存在しない場合はnull）
    pub piece: Option<PieceJson>,
}

/// 持ち駒
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HandJson {
    #[serde(rename = "P", skip_serializing_if = "Option::is_none")]
    pub pawn: Option<u32>,
    #[serde(rename = "L", skip_serializing_if = "Option::is_none")]
    pub lance: Option<u32>,
    #[serde(rename = "N", skip_serializing_if = "Option::is_none")]
    pub knight: Option<u32>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub silver: Option<u32>,
    #[serde(rename = "G", skip_serializing_if = "Option::is_none")]
    pub gold: Option<u32>,
    #[serde(rename = "B", skip_serializing_if = "Option::is_none")]
    pub bishop: Option<u32>,
    #[serde(rename = "R", skip_serializing_if = "Option::is_none")]
    pub rook: Option<u32>,
}

/// 両者の持ち駒
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandsJson {
    pub sente: HandJson,
    pub gote: HandJson,
}

/// 盤面全体の状態
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardStateJson {
    /// 9x9のセル配列（外側0:1筋〜8:9筋、内側0:1段〜8:9段）
    pub cells: Vec<Vec<CellJson>>,
    /// 持ち駒
    pub hands: HandsJson,
    /// 手番: "sente" | "gote"
    pub turn: String,
    /// 手数（0は未設定扱いで省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ply: Option<i32>,
}

impl BoardStateJson {
    /// 局面からJSON表現を構築
    pub fn from_position(pos: &Position) -> BoardStateJson {
        let cells = File::ALL
            .iter()
            .map(|&f| {
                Rank::ALL
                    .iter()
                    .map(|&r| {
                        let sq = Square::new(f, r);
                        let pc = pos.piece_on(sq);
                        let piece = if pc.is_none() {
                            None
                        } else {
                            Some(PieceJson {
                                owner: color_str(pc.color()).to_string(),
                                piece_type: pc.piece_type().to_usi_char().to_string(),
                                promoted: if pc.piece_type().is_promoted() {
                                    Some(true)
                                } else {
                                    None
                                },
                            })
                        };
                        CellJson {
                            square: sq.to_usi(),
                            piece,
                        }
                    })
                    .collect()
            })
            .collect();

        BoardStateJson {
            cells,
            hands: HandsJson {
                sente: hand_json(pos, Color::Black),
                gote: hand_json(pos, Color::White),
            },
            turn: color_str(pos.side_to_move()).to_string(),
            ply: if pos.game_ply() > 0 { Some(pos.game_ply()) } else { None },
        }
    }
}

fn color_str(c: Color) -> &'static str {
    match c {
        Color::Black => "sente",
        Color::White => "gote",
    }
}

fn hand_json(pos: &Position, c: Color) -> HandJson {
    let hand = pos.hand(c);
    let cnt = |pt: PieceType| {
        let n = hand.count(pt);
        if n > 0 {
            Some(n)
        } else {
            None
        }
    };
    HandJson {
        pawn: cnt(PieceType::Pawn),
        lance: cnt(PieceType::Lance),
        knight: cnt(PieceType::Knight),
        silver: cnt(PieceType::Silver),
        gold: cnt(PieceType::Gold),
        bishop: cnt(PieceType::Bishop),
        rook: cnt(PieceType::Rook),
    }
}
