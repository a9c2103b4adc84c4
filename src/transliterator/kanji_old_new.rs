//! Traditional (kyūjitai) to new-form (shinjitai) kanji, keyed by variation
//! sequence. Bare code points are never touched; the recipe brackets this
//! rule with `ivs-svs-base` so plain text takes the IVS route.
//!
//! The bundled table is partial: it covers a handful of common kyūjitai
//! (舊, 體, 變, 擔, ...), not the full Adobe-Japan1 old/new list.

use std::sync::LazyLock;

use crate::{
    char::CharPool,
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    table::{self, SortedTable, TableLoadError, decode_records},
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{RuleOptions, Transliterator, TransliteratorError, simple::SimpleIter},
};

const NAME: &str = "kanji-old-new";

// Each record yields one or two entries: traditional IVS → new IVS, and
// traditional SVS → new IVS when the record has an SVS.
fn decode_kanji_old_new(
    name: &'static str,
    bytes: &[u8],
) -> Result<SortedTable<CodePointTuple>, TableLoadError> {
    let records = decode_records(name, bytes, |w| {
        let ivs = w.tuple()?;
        let svs = w.tuple()?;
        let new = w.tuple()?;
        Ok((ivs, (svs, new)))
    })?;
    let entries = records
        .into_iter()
        .flat_map(|(ivs, (svs, new))| {
            std::iter::once((ivs, new)).chain((!svs.is_empty()).then_some((svs, new)))
        })
        .collect();
    SortedTable::from_unsorted(name, entries)
}

static KANJI_OLD_NEW: LazyLock<Result<SortedTable<CodePointTuple>, TableLoadError>> =
    LazyLock::new(|| {
        table::load(
            NAME,
            include_bytes!("../../data/kanji_old_new.data"),
            decode_kanji_old_new,
        )
    });

#[derive(Debug, Clone, Copy)]
pub struct KanjiOldNew {
    table: &'static SortedTable<CodePointTuple>,
}

impl KanjiOldNew {
    pub fn new() -> Result<Self, TransliteratorError> {
        Ok(Self {
            table: table::get(&KANJI_OLD_NEW)?,
        })
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        options.expect_default(NAME)?;
        Ok(Box::new(Self::new()?))
    }
}

impl Transliterator for KanjiOldNew {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        CharIterator::new(SimpleIter::new(pool, input, self.table))
    }
}

impl TransliteratorTestConfig for KanjiOldNew {
    fn samples() -> &'static [&'static str] {
        &["舊\u{E0100}字\u{E0100}體\u{E0100}", "福\u{FE00}", "舊字體"]
    }
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "舊字體", "字\u{E0100}", ""]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            (
                "舊\u{E0100}字\u{E0100}體\u{E0100}",
                "旧\u{E0100}字\u{E0100}体\u{E0100}",
            ),
            ("辻\u{E0101}", "辻\u{E0100}"),
            ("福\u{FE00}", "福\u{E0100}"),
            ("福\u{E0101}", "福\u{E0100}"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(KanjiOldNew::new().unwrap());
    }

    #[test]
    fn table_merges_ivs_and_svs_keys() {
        let rule = KanjiOldNew::new().unwrap();
        assert!(rule.table.get(&CodePointTuple::pair(0x798F, 0xFE00)).is_some());
        assert!(rule.table.get(&CodePointTuple::pair(0x798F, 0xE0101)).is_some());
        assert!(rule.table.get(&CodePointTuple::single(0x820A)).is_none());
    }

    #[test]
    fn kanji_outside_the_bundled_table_pass_through() {
        let rule = KanjiOldNew::new().unwrap();
        assert_eq!(rule.transliterate_str("國\u{E0100}"), "國\u{E0100}");
        assert!(rule.table.len() < 64);
    }
}
