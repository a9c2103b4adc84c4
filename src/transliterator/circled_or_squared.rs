//! Circled and squared glyphs rendered through templates: ① → (1), 🄰 → [A].

use std::sync::LazyLock;

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    table::{self, SortedTable, TableLoadError, decode_records},
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
};

const NAME: &str = "circled-or-squared";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
}

#[derive(Debug)]
pub struct CircledEntry {
    pub rendering: Box<[char]>,
    pub shape: Shape,
    pub emoji: bool,
}

fn decode_circled(
    name: &'static str,
    bytes: &[u8],
) -> Result<SortedTable<CircledEntry>, TableLoadError> {
    let entries = decode_records(name, bytes, |w| {
        let key = w.tuple()?;
        let rendering = w.scalars()?;
        let shape = if w.flag()? { Shape::Square } else { Shape::Circle };
        let emoji = w.flag()?;
        Ok((
            key,
            CircledEntry {
                rendering,
                shape,
                emoji,
            },
        ))
    })?;
    SortedTable::from_entries(name, entries)
}

static CIRCLED_OR_SQUARED: LazyLock<Result<SortedTable<CircledEntry>, TableLoadError>> =
    LazyLock::new(|| {
        table::load(
            NAME,
            include_bytes!("../../data/circled_or_squared.data"),
            decode_circled,
        )
    });

/// Output templates; `?` is replaced by the glyph's rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct Templates {
    pub circle: String,
    pub square: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            circle: "(?)".into(),
            square: "[?]".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct CircledOrSquaredOptions {
    pub templates: Templates,
    pub include_emojis: bool,
}

impl Default for CircledOrSquaredOptions {
    fn default() -> Self {
        Self {
            templates: Templates::default(),
            include_emojis: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CircledOrSquared {
    table: &'static SortedTable<CircledEntry>,
    options: CircledOrSquaredOptions,
}

impl CircledOrSquared {
    pub fn new(options: CircledOrSquaredOptions) -> Result<Self, TransliteratorError> {
        Ok(Self {
            table: table::get(&CIRCLED_OR_SQUARED)?,
            options,
        })
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let options = match options {
            RuleOptions::Default => CircledOrSquaredOptions::default(),
            RuleOptions::CircledOrSquared(o) => o,
            other => return Err(other.mismatch(NAME)),
        };
        Ok(Box::new(Self::new(options)?))
    }

    fn template(&self, shape: Shape) -> &str {
        match shape {
            Shape::Circle => &self.options.templates.circle,
            Shape::Square => &self.options.templates.square,
        }
    }
}

impl Transliterator for CircledOrSquared {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        CharIterator::new(CircledIter {
            rule: self,
            input,
            out: Emitter::new(pool),
        })
    }
}

struct CircledIter<'a> {
    rule: &'a CircledOrSquared,
    input: CharIterator<'a>,
    out: Emitter<'a>,
}

impl Iterator for CircledIter<'_> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        if let Some(c) = self.out.pop() {
            return Some(c);
        }
        let c = self.input.next()?;
        if c.is_sentinel() {
            return Some(self.out.pass(&c));
        }
        let Some(entry) = self.rule.table.get(&c.value) else {
            return Some(self.out.pass(&c));
        };
        if entry.emoji && !self.rule.options.include_emojis {
            return Some(self.out.pass(&c));
        }
        let template = self.rule.template(entry.shape);
        let rendering = &entry.rendering;
        let len: usize = template
            .chars()
            .map(|t| if t == '?' { rendering.len() } else { 1 })
            .sum();
        if len == 0 {
            return Some(self.out.pass(&c));
        }
        for t in template.chars() {
            if t == '?' {
                self.out.enqueue_scalars(rendering.iter().copied(), &c);
            } else {
                self.out.enqueue(CodePointTuple::from_char(t), &c);
            }
        }
        self.out.pop()
    }
}

impl TransliteratorTestConfig for CircledOrSquared {
    fn samples() -> &'static [&'static str] {
        &["①②③", "ⒶⒷⒸ", "🄰🅰", "㊗"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("①②③", "(1)(2)(3)"),
            ("⑳", "(20)"),
            ("Ⓐⓐ", "(A)(a)"),
            ("🄰", "[A]"),
            ("🅰㊗", "[A](祝)"),
            ("㋐", "(ア)"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(CircledOrSquared::new(Default::default()).unwrap());
    }

    #[test]
    fn emojis_can_be_excluded() {
        let rule = CircledOrSquared::new(CircledOrSquaredOptions {
            include_emojis: false,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rule.transliterate_str("🅰🄰Ⓜ①"), "🅰[A]Ⓜ(1)");
    }

    #[test]
    fn custom_templates() {
        let rule = CircledOrSquared::new(CircledOrSquaredOptions {
            templates: Templates {
                circle: "<?>".into(),
                square: "?".into(),
            },
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rule.transliterate_str("②🄱"), "<2>B");
    }

    #[test]
    fn empty_template_passes_through() {
        let rule = CircledOrSquared::new(CircledOrSquaredOptions {
            templates: Templates {
                circle: String::new(),
                square: "[?]".into(),
            },
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rule.transliterate_str("①"), "①");
    }

    #[test]
    fn wrong_options_are_rejected() {
        let err = CircledOrSquared::factory(RuleOptions::Hyphens(Default::default())).err();
        assert!(matches!(
            err,
            Some(TransliteratorError::InvalidOptions { rule: NAME, .. })
        ));
    }
}
