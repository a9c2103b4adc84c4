//! One-to-one table substitutions.
//!
//! All four rules share the same adapter: a hit replaces the unit with the
//! mapped tuple, an empty mapped tuple deletes it, a miss passes it through.

use std::sync::LazyLock;

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    table::{self, SortedTable, TableLoadError, decode_simple},
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
};

type SimpleTable = SortedTable<CodePointTuple>;

// ── Tables ──
static SPACES: LazyLock<Result<SimpleTable, TableLoadError>> = LazyLock::new(|| {
    table::load("spaces", include_bytes!("../../data/spaces.data"), decode_simple)
});
static RADICALS: LazyLock<Result<SimpleTable, TableLoadError>> = LazyLock::new(|| {
    table::load("radicals", include_bytes!("../../data/radicals.data"), decode_simple)
});
static MATHEMATICAL_ALPHANUMERICS: LazyLock<Result<SimpleTable, TableLoadError>> =
    LazyLock::new(|| {
        table::load(
            "mathematical-alphanumerics",
            include_bytes!("../../data/mathematical_alphanumerics.data"),
            decode_simple,
        )
    });
static IDEOGRAPHIC_ANNOTATIONS: LazyLock<Result<SimpleTable, TableLoadError>> =
    LazyLock::new(|| {
        table::load(
            "ideographic-annotations",
            include_bytes!("../../data/ideographic_annotations.data"),
            decode_simple,
        )
    });

/// Lazy adapter over a one-to-one table.
pub(crate) struct SimpleIter<'a> {
    input: CharIterator<'a>,
    table: &'static SimpleTable,
    out: Emitter<'a>,
}

impl<'a> SimpleIter<'a> {
    pub(crate) fn new(pool: &'a CharPool, input: CharIterator<'a>, table: &'static SimpleTable) -> Self {
        Self {
            input,
            table,
            out: Emitter::new(pool),
        }
    }
}

impl Iterator for SimpleIter<'_> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        loop {
            let c = self.input.next()?;
            if c.is_sentinel() {
                return Some(self.out.pass(&c));
            }
            return match self.table.get(&c.value) {
                Some(v) if v.is_empty() => continue,
                Some(v) => Some(self.out.replace(*v, &c)),
                None => Some(self.out.pass(&c)),
            };
        }
    }
}

/// Normalizes exotic spaces to U+0020; drops U+180E and U+FEFF.
#[derive(Debug, Clone, Copy)]
pub struct Spaces {
    table: &'static SimpleTable,
}

/// Kangxi radicals and CJK radical supplements to unified ideographs.
#[derive(Debug, Clone, Copy)]
pub struct Radicals {
    table: &'static SimpleTable,
}

/// Mathematical alphanumeric symbols (U+1D400–U+1D7FF) to plain letters and digits.
#[derive(Debug, Clone, Copy)]
pub struct MathematicalAlphanumerics {
    table: &'static SimpleTable,
}

/// Kanbun annotation marks (U+3192–U+319F) to ideographs.
#[derive(Debug, Clone, Copy)]
pub struct IdeographicAnnotations {
    table: &'static SimpleTable,
}

// Generates constructor, registry factory and trait impl for each rule.
macro_rules! impl_simple_transliterator {
    ($rule:ident, $name:literal, $table:ident) => {
        impl $rule {
            pub fn new() -> Result<Self, TransliteratorError> {
                Ok(Self {
                    table: table::get(&$table)?,
                })
            }

            pub(crate) fn factory(
                options: RuleOptions,
            ) -> Result<Box<dyn Transliterator>, TransliteratorError> {
                options.expect_default($name)?;
                Ok(Box::new(Self::new()?))
            }
        }

        impl Transliterator for $rule {
            fn name(&self) -> &'static str {
                $name
            }

            fn transliterate<'a>(
                &'a self,
                pool: &'a CharPool,
                input: CharIterator<'a>,
            ) -> CharIterator<'a> {
                CharIterator::new(SimpleIter::new(pool, input, self.table))
            }
        }
    };
}

impl_simple_transliterator!(Spaces, "spaces", SPACES);
impl_simple_transliterator!(Radicals, "radicals", RADICALS);
impl_simple_transliterator!(
    MathematicalAlphanumerics,
    "mathematical-alphanumerics",
    MATHEMATICAL_ALPHANUMERICS
);
impl_simple_transliterator!(
    IdeographicAnnotations,
    "ideographic-annotations",
    IDEOGRAPHIC_ANNOTATIONS
);

impl TransliteratorTestConfig for Spaces {
    fn samples() -> &'static [&'static str] {
        &["全角\u{3000}空白", "a\u{00A0}b", "\u{FEFF}bom", "x\u{2003}\u{2009}y"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("全角\u{3000}空白", "全角 空白"),
            ("\u{FEFF}bom", "bom"),
            ("a\u{180E}b\u{205F}c", "ab c"),
        ]
    }
}

impl TransliteratorTestConfig for Radicals {
    fn samples() -> &'static [&'static str] {
        &["⼀⼆⼈", "⺟親", "日本"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[("⼀⼆⼈", "一二人"), ("⼭⽔", "山水")]
    }
}

impl TransliteratorTestConfig for MathematicalAlphanumerics {
    fn samples() -> &'static [&'static str] {
        &["𝐀𝐁𝐂", "𝟎𝟏", "plain"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[("𝐀𝐁𝐂", "ABC"), ("𝒙 = 𝟏", "x = 1"), ("𝛼", "α")]
    }
}

impl TransliteratorTestConfig for IdeographicAnnotations {
    fn samples() -> &'static [&'static str] {
        &["㆒㆓㆔", "返り点"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[("㆒㆓㆔㆕", "一二三四"), ("㆖㆗㆘", "上中下"), ("㆜㆝㆞㆟", "丁天地人")]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(Spaces::new().unwrap());
        assert_transliterator_contract!(Radicals::new().unwrap());
        assert_transliterator_contract!(MathematicalAlphanumerics::new().unwrap());
        assert_transliterator_contract!(IdeographicAnnotations::new().unwrap());
    }

    #[test]
    fn deletion_keeps_offsets_contiguous() {
        let spaces = Spaces::new().unwrap();
        let pool = CharPool::new();
        let out: Vec<Char> = spaces.transliterate(&pool, pool.stream("a\u{FEFF}b")).collect();
        let offsets: Vec<usize> = out.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
        assert!(out[2].is_sentinel());
    }

    #[test]
    fn hits_record_provenance() {
        let spaces = Spaces::new().unwrap();
        let pool = CharPool::new();
        let out: Vec<Char> = spaces.transliterate(&pool, pool.stream("\u{3000}")).collect();
        let src = pool.source_of(&out[0]).unwrap();
        assert!(src.value.is_char('\u{3000}'));
        assert!(pool.is_transliterated(&out[0]));
    }

    #[test]
    fn variation_sequences_miss() {
        let radicals = Radicals::new().unwrap();
        assert_eq!(radicals.transliterate_str("葛\u{E0100}"), "葛\u{E0100}");
    }
}
