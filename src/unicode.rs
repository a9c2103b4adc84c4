//! Character classes and the shared hiragana/katakana table.

use std::{collections::HashMap, sync::LazyLock};

// Unified Han blocks + extensions A–I + compatibility block.
#[inline(always)]
pub fn is_kanji(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF   | // Unified
        0x3400..=0x4DBF   | // Ext A
        0x20000..=0x2A6DF | // Ext B
        0x2A700..=0x2EBEF | // Ext C–F
        0x30000..=0x323AF | // Ext G–H
        0xF900..=0xFAFF     // Compatibility
    )
}

// Standardized (FE00–FE0F) and ideographic (E0100–E01EF) variation selectors.
#[inline(always)]
pub fn is_variation_selector(c: char) -> bool {
    matches!(c as u32, 0xFE00..=0xFE0F | 0xE0100..=0xE01EF)
}

pub const COMBINING_VOICED_MARK: char = '\u{3099}';
pub const COMBINING_SEMI_VOICED_MARK: char = '\u{309A}';
pub const VOICED_MARK: char = '\u{309B}';
pub const SEMI_VOICED_MARK: char = '\u{309C}';
pub const HALFWIDTH_VOICED_MARK: char = '\u{FF9E}';
pub const HALFWIDTH_SEMI_VOICED_MARK: char = '\u{FF9F}';

/// One gojūon cell: the hiragana and katakana forms with their voiced and
/// semi-voiced variants, plus the half-width katakana if JIS X 0201 has one.
#[derive(Debug, Clone, Copy)]
pub struct KanaRow {
    pub hiragana: char,
    pub hiragana_voiced: Option<char>,
    pub hiragana_semi_voiced: Option<char>,
    pub katakana: char,
    pub katakana_voiced: Option<char>,
    pub katakana_semi_voiced: Option<char>,
    pub halfwidth: Option<char>,
}

const fn plain(h: char, k: char, hw: char) -> KanaRow {
    KanaRow {
        hiragana: h,
        hiragana_voiced: None,
        hiragana_semi_voiced: None,
        katakana: k,
        katakana_voiced: None,
        katakana_semi_voiced: None,
        halfwidth: Some(hw),
    }
}

const fn voiced(h: char, hv: char, k: char, kv: char, hw: char) -> KanaRow {
    KanaRow {
        hiragana: h,
        hiragana_voiced: Some(hv),
        hiragana_semi_voiced: None,
        katakana: k,
        katakana_voiced: Some(kv),
        katakana_semi_voiced: None,
        halfwidth: Some(hw),
    }
}

const fn both(h: char, hv: char, hs: char, k: char, kv: char, ks: char, hw: char) -> KanaRow {
    KanaRow {
        hiragana: h,
        hiragana_voiced: Some(hv),
        hiragana_semi_voiced: Some(hs),
        katakana: k,
        katakana_voiced: Some(kv),
        katakana_semi_voiced: Some(ks),
        halfwidth: Some(hw),
    }
}

// Katakana-only voiced forms (ヷヸヹヺ); ゐ/ゑ have no half-width form.
const fn wa_row(h: char, k: char, kv: char, hw: Option<char>) -> KanaRow {
    KanaRow {
        hiragana: h,
        hiragana_voiced: None,
        hiragana_semi_voiced: None,
        katakana: k,
        katakana_voiced: Some(kv),
        katakana_semi_voiced: None,
        halfwidth: hw,
    }
}

pub static KANA_ROWS: &[KanaRow] = &[
    plain('あ', 'ア', 'ｱ'),
    plain('い', 'イ', 'ｲ'),
    voiced('う', 'ゔ', 'ウ', 'ヴ', 'ｳ'),
    plain('え', 'エ', 'ｴ'),
    plain('お', 'オ', 'ｵ'),
    voiced('か', 'が', 'カ', 'ガ', 'ｶ'),
    voiced('き', 'ぎ', 'キ', 'ギ', 'ｷ'),
    voiced('く', 'ぐ', 'ク', 'グ', 'ｸ'),
    voiced('け', 'げ', 'ケ', 'ゲ', 'ｹ'),
    voiced('こ', 'ご', 'コ', 'ゴ', 'ｺ'),
    voiced('さ', 'ざ', 'サ', 'ザ', 'ｻ'),
    voiced('し', 'じ', 'シ', 'ジ', 'ｼ'),
    voiced('す', 'ず', 'ス', 'ズ', 'ｽ'),
    voiced('せ', 'ぜ', 'セ', 'ゼ', 'ｾ'),
    voiced('そ', 'ぞ', 'ソ', 'ゾ', 'ｿ'),
    voiced('た', 'だ', 'タ', 'ダ', 'ﾀ'),
    voiced('ち', 'ぢ', 'チ', 'ヂ', 'ﾁ'),
    voiced('つ', 'づ', 'ツ', 'ヅ', 'ﾂ'),
    voiced('て', 'で', 'テ', 'デ', 'ﾃ'),
    voiced('と', 'ど', 'ト', 'ド', 'ﾄ'),
    plain('な', 'ナ', 'ﾅ'),
    plain('に', 'ニ', 'ﾆ'),
    plain('ぬ', 'ヌ', 'ﾇ'),
    plain('ね', 'ネ', 'ﾈ'),
    plain('の', 'ノ', 'ﾉ'),
    both('は', 'ば', 'ぱ', 'ハ', 'バ', 'パ', 'ﾊ'),
    both('ひ', 'び', 'ぴ', 'ヒ', 'ビ', 'ピ', 'ﾋ'),
    both('ふ', 'ぶ', 'ぷ', 'フ', 'ブ', 'プ', 'ﾌ'),
    both('へ', 'べ', 'ぺ', 'ヘ', 'ベ', 'ペ', 'ﾍ'),
    both('ほ', 'ぼ', 'ぽ', 'ホ', 'ボ', 'ポ', 'ﾎ'),
    plain('ま', 'マ', 'ﾏ'),
    plain('み', 'ミ', 'ﾐ'),
    plain('む', 'ム', 'ﾑ'),
    plain('め', 'メ', 'ﾒ'),
    plain('も', 'モ', 'ﾓ'),
    plain('や', 'ヤ', 'ﾔ'),
    plain('ゆ', 'ユ', 'ﾕ'),
    plain('よ', 'ヨ', 'ﾖ'),
    plain('ら', 'ラ', 'ﾗ'),
    plain('り', 'リ', 'ﾘ'),
    plain('る', 'ル', 'ﾙ'),
    plain('れ', 'レ', 'ﾚ'),
    plain('ろ', 'ロ', 'ﾛ'),
    wa_row('わ', 'ワ', 'ヷ', Some('ﾜ')),
    wa_row('ゐ', 'ヰ', 'ヸ', None),
    wa_row('ゑ', 'ヱ', 'ヹ', None),
    wa_row('を', 'ヲ', 'ヺ', Some('ｦ')),
    plain('ん', 'ン', 'ﾝ'),
];

/// Small kana: (hiragana, katakana, half-width).
pub static SMALL_KANA: &[(char, char, Option<char>)] = &[
    ('ぁ', 'ァ', Some('ｧ')),
    ('ぃ', 'ィ', Some('ｨ')),
    ('ぅ', 'ゥ', Some('ｩ')),
    ('ぇ', 'ェ', Some('ｪ')),
    ('ぉ', 'ォ', Some('ｫ')),
    ('っ', 'ッ', Some('ｯ')),
    ('ゃ', 'ャ', Some('ｬ')),
    ('ゅ', 'ュ', Some('ｭ')),
    ('ょ', 'ョ', Some('ｮ')),
    ('ゎ', 'ヮ', None),
    ('ゕ', 'ヵ', None),
    ('ゖ', 'ヶ', None),
];

/// Iteration marks and their voiced counterparts.
pub static VOICED_ITERATION_MARKS: &[(char, char)] =
    &[('ゝ', 'ゞ'), ('ヽ', 'ヾ'), ('〱', '〲'), ('〳', '〴')];

struct Voicing {
    voiced: HashMap<char, char>,
    semi_voiced: HashMap<char, char>,
    unvoiced: HashMap<char, char>,
}

static VOICING: LazyLock<Voicing> = LazyLock::new(|| {
    let mut voiced = HashMap::new();
    let mut semi_voiced = HashMap::new();
    for row in KANA_ROWS {
        if let Some(v) = row.hiragana_voiced {
            voiced.insert(row.hiragana, v);
        }
        if let Some(v) = row.katakana_voiced {
            voiced.insert(row.katakana, v);
        }
        if let Some(s) = row.hiragana_semi_voiced {
            semi_voiced.insert(row.hiragana, s);
        }
        if let Some(s) = row.katakana_semi_voiced {
            semi_voiced.insert(row.katakana, s);
        }
    }
    voiced.extend(VOICED_ITERATION_MARKS.iter().copied());
    let unvoiced = voiced.iter().map(|(&base, &v)| (v, base)).collect();
    Voicing {
        voiced,
        semi_voiced,
        unvoiced,
    }
});

/// か → が, ウ → ヴ, ゝ → ゞ.
#[inline]
pub fn voiced_form(c: char) -> Option<char> {
    VOICING.voiced.get(&c).copied()
}

/// は → ぱ.
#[inline]
pub fn semi_voiced_form(c: char) -> Option<char> {
    VOICING.semi_voiced.get(&c).copied()
}

/// が → か. Only defined for voiced letters.
#[inline]
pub fn unvoiced_form(c: char) -> Option<char> {
    VOICING.unvoiced.get(&c).copied()
}

#[inline]
pub fn is_voiced(c: char) -> bool {
    VOICING.unvoiced.contains_key(&c)
}

pub fn is_semi_voiced(c: char) -> bool {
    VOICING.semi_voiced.values().any(|&s| s == c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiragana_and_katakana_are_0x60_apart() {
        for row in KANA_ROWS {
            assert_eq!(row.katakana as u32 - row.hiragana as u32, 0x60);
        }
        for &(h, k, _) in SMALL_KANA {
            assert_eq!(k as u32 - h as u32, 0x60);
        }
    }

    #[test]
    fn voicing_round_trips() {
        assert_eq!(voiced_form('か'), Some('が'));
        assert_eq!(voiced_form('ワ'), Some('ヷ'));
        assert_eq!(voiced_form('わ'), None);
        assert_eq!(unvoiced_form('ヴ'), Some('ウ'));
        assert_eq!(semi_voiced_form('ホ'), Some('ポ'));
        assert!(is_voiced('ゞ'));
        assert!(is_semi_voiced('ぷ'));
        assert!(!is_semi_voiced('ぶ'));
    }

    #[test]
    fn classes() {
        assert!(is_kanji('々') == false);
        assert!(is_kanji('佐'));
        assert!(is_kanji('\u{20B9F}'));
        assert!(is_variation_selector('\u{E0100}'));
        assert!(!is_variation_selector('\u{3099}'));
    }
}
