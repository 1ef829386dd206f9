//! 初期局面の種類（BoardType）

/// 初期局面の種類（平手 + 駒落ち13種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BoardType {
    /// 平手
    NoHandicap = 0,
    /// 香落ち
    HandicapKyo = 1,
    /// 右香落ち
    HandicapRightKyo = 2,
    /// 角落ち
    HandicapKaku = 3,
    /// 飛車落ち
    HandicapHisya = 4,
    /// 飛香落ち
    HandicapHisyaKyo = 5,
    /// 二枚落ち
    Handicap2 = 6,
    /// 三枚落ち
    Handicap3 = 7,
    /// 四枚落ち
    Handicap4 = 8,
    /// 五枚落ち
    Handicap5 = 9,
    /// 左五枚落ち
    HandicapLeft5 = 10,
    /// 六枚落ち
    Handicap6 = 11,
    /// 八枚落ち
    Handicap8 = 12,
    /// 十枚落ち
    Handicap10 = 13,
}

/// 各BoardTypeに対応するSFEN（ordinal順）
///
/// 駒落ちは上手（後手側）の駒を落とし、上手の先指しで開始する。
static BOARD_TYPE_SFEN: [&str; BoardType::NUM] = [
    // 平手
    "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1",
    // 香落ち
    "lnsgkgsn1/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 右香落ち
    "1nsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 角落ち
    "lnsgkgsnl/1r7/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 飛車落ち
    "lnsgkgsnl/7b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 飛香落ち
    "lnsgkgsn1/7b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 二枚落ち
    "lnsgkgsnl/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 三枚落ち
    "lnsgkgsn1/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 四枚落ち
    "1nsgkgsn1/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 五枚落ち
    "2sgkgsn1/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 左五枚落ち
    "1nsgkgs2/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 六枚落ち
    "2sgkgs2/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 八枚落ち
    "3gkg3/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
    // 十枚落ち
    "4k4/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1",
];

impl BoardType {
    /// 初期局面の種類数
    pub const NUM: usize = 14;

    /// 全ての種類
    pub const ALL: [BoardType; BoardType::NUM] = [
        BoardType::NoHandicap,
        BoardType::HandicapKyo,
        BoardType::HandicapRightKyo,
        BoardType::HandicapKaku,
        BoardType::HandicapHisya,
        BoardType::HandicapHisyaKyo,
        BoardType::Handicap2,
        BoardType::Handicap3,
        BoardType::Handicap4,
        BoardType::Handicap5,
        BoardType::HandicapLeft5,
        BoardType::Handicap6,
        BoardType::Handicap8,
        BoardType::Handicap10,
    ];

    /// 序数から変換（範囲外はNone）
    #[inline]
    pub const fn from_index(n: usize) -> Option<BoardType> {
        if n < BoardType::NUM {
            // SAFETY: n < 14 なので有効なBoardType値
            Some(unsafe { std::mem::transmute::<u8, BoardType>(n as u8) })
        } else {
            None
        }
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 対応する初期局面のSFEN
    #[inline]
    pub fn sfen(self) -> &'static str {
        BOARD_TYPE_SFEN[self.index()]
    }
}
