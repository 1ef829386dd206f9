//! 筋・段・升のBitboardマスク

use crate::types::{File, Rank, Square};

use super::Bitboard;

// staticの初期化式からstaticは参照できないので、実体はconstテーブルに
// 持たせて、公開はstatic経由で行う。

/// 筋iはbit 9i..9i+8を占める。1-7筋はp[0]に収まり、8-9筋は
/// bit 63の分割をまたぐためp[1]側に置かれる。
const FILE_BB_TABLE: [Bitboard; File::NUM] = [
    Bitboard::new(0x1FF, 0),
    Bitboard::new(0x1FF << 9, 0),
    Bitboard::new(0x1FF << 18, 0),
    Bitboard::new(0x1FF << 27, 0),
    Bitboard::new(0x1FF << 36, 0),
    Bitboard::new(0x1FF << 45, 0),
    Bitboard::new(0x1FF << 54, 0),
    Bitboard::new(0, 0x1FF),
    Bitboard::new(0, 0x1FF << 9),
];

/// 1段目の9bit周期パターン（p[0]は1-7筋の7マス、p[1]は8-9筋の2マス）
const RANK1_P0: u64 = 0x0040_2010_0804_0201;
const RANK1_P1: u64 = 0x0201;

const RANK_BB_TABLE: [Bitboard; Rank::NUM] = init_rank_bb();

const fn init_rank_bb() -> [Bitboard; Rank::NUM] {
    let mut result = [Bitboard::EMPTY; Rank::NUM];
    let mut rank = 0;
    while rank < 9 {
        result[rank] = Bitboard::new(RANK1_P0 << rank, RANK1_P1 << rank);
        rank += 1;
    }
    result
}

const SQUARE_BB_TABLE: [Bitboard; Square::NUM + 1] = init_square_bb();

const fn init_square_bb() -> [Bitboard; Square::NUM + 1] {
    let mut result = [Bitboard::EMPTY; Square::NUM + 1];
    let mut sq = 0;
    while sq < 81 {
        // SQUARE_BB[sq] = FILE_BB[file] & RANK_BB[rank]
        result[sq] = bb_and(FILE_BB_TABLE[sq / 9], RANK_BB_TABLE[sq % 9]);
        sq += 1;
    }
    // result[81]（番兵）は空のまま
    result
}

/// const文脈用のAND（traitはconst fnから呼べない）
const fn bb_and(a: Bitboard, b: Bitboard) -> Bitboard {
    Bitboard::new(a.p0() & b.p0(), a.p1() & b.p1())
}

/// 筋のBitboard
pub static FILE_BB: [Bitboard; File::NUM] = FILE_BB_TABLE;

/// 段のBitboard
pub static RANK_BB: [Bitboard; Rank::NUM] = RANK_BB_TABLE;

/// 各マスのBitboard（最終要素は番兵用の空マスク）
pub static SQUARE_BB: [Bitboard; Square::NUM + 1] = SQUARE_BB_TABLE;

/// 指定筋のマスク
#[inline]
pub fn file_bb(f: File) -> Bitboard {
    FILE_BB[f.index()]
}

/// 指定段のマスク
#[inline]
pub fn rank_bb(r: Rank) -> Bitboard {
    RANK_BB[r.index()]
}

/// 指定升のマスク（番兵は空マスク）
#[inline]
pub fn square_bb(sq: Square) -> Bitboard {
    SQUARE_BB[sq.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_rank_intersection() {
        // FILE_BB[f] & RANK_BB[r] == SQUARE_BB[f*9+r]
        for f in File::ALL {
            for r in Rank::ALL {
                let sq = Square::new(f, r);
                assert_eq!(
                    file_bb(f) & rank_bb(r),
                    square_bb(sq),
                    "mismatch at {}",
                    sq.to_usi()
                );
            }
        }
    }

    #[test]
    fn test_square_bb_single_bit() {
        for sq in Square::all() {
            assert_eq!(square_bb(sq).count(), 1, "{} should be a single bit", sq.to_usi());
            assert!(square_bb(sq).contains(sq));
        }
    }

    #[test]
    fn test_square_bb_partition() {
        // 81マスのマスクは互いに素で、合併はALLに一致する
        let mut union = Bitboard::EMPTY;
        for sq in Square::all() {
            assert!((union & square_bb(sq)).is_empty(), "{} overlaps", sq.to_usi());
            union |= square_bb(sq);
        }
        assert_eq!(union, Bitboard::ALL);
    }

    #[test]
    fn test_square_bb_sentinel() {
        assert!(square_bb(Square::NB).is_empty());
    }

    #[test]
    fn test_file_bb_counts() {
        for f in File::ALL {
            assert_eq!(file_bb(f).count(), 9);
        }
        // 8-9筋は上位ワード側
        assert_eq!(file_bb(File::File8).p0(), 0);
        assert_eq!(file_bb(File::File9).p0(), 0);
        assert_eq!(file_bb(File::File1).p1(), 0);
    }

    #[test]
    fn test_rank_bb_counts() {
        for r in Rank::ALL {
            assert_eq!(rank_bb(r).count(), 9);
        }
    }

    #[test]
    fn test_file_disjoint_union() {
        let mut union = Bitboard::EMPTY;
        for f in File::ALL {
            assert!((union & file_bb(f)).is_empty());
            union |= file_bb(f);
        }
        assert_eq!(union, Bitboard::ALL);
    }
}
