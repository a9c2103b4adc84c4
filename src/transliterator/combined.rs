//! One-to-many expansions: squared words, parenthesized forms, Roman numerals.

use std::sync::LazyLock;

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    table::{self, SortedTable, TableLoadError, decode_expansions},
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
};

type ExpansionTable = SortedTable<Box<[char]>>;

static COMBINED: LazyLock<Result<ExpansionTable, TableLoadError>> = LazyLock::new(|| {
    table::load("combined", include_bytes!("../../data/combined.data"), decode_expansions)
});
static ROMAN_NUMERALS: LazyLock<Result<ExpansionTable, TableLoadError>> = LazyLock::new(|| {
    table::load(
        "roman-numerals",
        include_bytes!("../../data/roman_numerals.data"),
        decode_expansions,
    )
});

/// Emits the first scalar of an expansion immediately and queues the rest.
struct ExpandIter<'a> {
    input: CharIterator<'a>,
    table: &'static ExpansionTable,
    out: Emitter<'a>,
}

impl Iterator for ExpandIter<'_> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        loop {
            if let Some(c) = self.out.pop() {
                return Some(c);
            }
            let c = self.input.next()?;
            if c.is_sentinel() {
                return Some(self.out.pass(&c));
            }
            match self.table.get(&c.value) {
                // An empty expansion is a deletion.
                Some(scalars) => self.out.enqueue_scalars(scalars.iter().copied(), &c),
                None => return Some(self.out.pass(&c)),
            }
        }
    }
}

/// Squared/parenthesized compounds: ㍿ → 株式会社, ⑴ → (1), ㋿ → 令和.
#[derive(Debug, Clone, Copy)]
pub struct Combined {
    table: &'static ExpansionTable,
}

/// Roman numeral symbols: Ⅻ → XII, ⅳ → iv.
#[derive(Debug, Clone, Copy)]
pub struct RomanNumerals {
    table: &'static ExpansionTable,
}

macro_rules! impl_expansion_transliterator {
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
                CharIterator::new(ExpandIter {
                    input,
                    table: self.table,
                    out: Emitter::new(pool),
                })
            }
        }
    };
}

impl_expansion_transliterator!(Combined, "combined", COMBINED);
impl_expansion_transliterator!(RomanNumerals, "roman-numerals", ROMAN_NUMERALS);

impl TransliteratorTestConfig for Combined {
    fn samples() -> &'static [&'static str] {
        &["㍿㍑㌠㋿", "⑴⒜", "㈱"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("㍿㍑㌠㋿", "株式会社リットルサンチーム令和"),
            ("⑴", "(1)"),
            ("⒜", "(a)"),
        ]
    }
}

impl TransliteratorTestConfig for RomanNumerals {
    fn samples() -> &'static [&'static str] {
        &["Ⅻ章", "ⅳ", "第Ⅲ部"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[("Ⅻ章", "XII章"), ("ⅳ", "iv"), ("ⅠⅡ", "III")]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(Combined::new().unwrap());
        assert_transliterator_contract!(RomanNumerals::new().unwrap());
    }

    #[test]
    fn expansion_offsets_are_sequential() {
        let combined = Combined::new().unwrap();
        let pool = CharPool::new();
        let out: Vec<Char> = combined.transliterate(&pool, pool.stream("a㍿b")).collect();
        let got: Vec<(String, usize)> = out
            .iter()
            .map(|c| (c.value.to_string(), c.offset))
            .collect();
        assert_eq!(
            got,
            vec![
                ("a".into(), 0),
                ("株".into(), 1),
                ("式".into(), 2),
                ("会".into(), 3),
                ("社".into(), 4),
                ("b".into(), 5),
                ("".into(), 6),
            ]
        );
        assert!(out[1..5].iter().all(|c| pool.source_of(c).is_some_and(|s| s.value.is_char('㍿'))));
    }
}
