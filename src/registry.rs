//! Rule name → factory lookup.

use phf::{Map, phf_map};

use crate::transliterator::{
    CircledOrSquared, Combined, HiraKata, HiraKataComposition, Hyphens, IdeographicAnnotations,
    IvsSvsBase, JapaneseIterationMarks, Jisx0201AndAlike, KanjiOldNew, MathematicalAlphanumerics,
    ProlongedSoundMarks, Radicals, RomanNumerals, RuleOptions, Spaces, Transliterator,
    TransliteratorError,
};

pub type Factory = fn(RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError>;

static FACTORIES: Map<&'static str, Factory> = phf_map! {
    "spaces" => Spaces::factory as Factory,
    "radicals" => Radicals::factory as Factory,
    "mathematical-alphanumerics" => MathematicalAlphanumerics::factory as Factory,
    "mathematical_alphanumerics" => MathematicalAlphanumerics::factory as Factory,
    "ideographic-annotations" => IdeographicAnnotations::factory as Factory,
    "ideographic_annotations" => IdeographicAnnotations::factory as Factory,
    "hyphens" => Hyphens::factory as Factory,
    "ivs-svs-base" => IvsSvsBase::factory as Factory,
    "kanji-old-new" => KanjiOldNew::factory as Factory,
    "combined" => Combined::factory as Factory,
    "circled-or-squared" => CircledOrSquared::factory as Factory,
    "roman-numerals" => RomanNumerals::factory as Factory,
    "roman_numerals" => RomanNumerals::factory as Factory,
    "jisx0201-and-alike" => Jisx0201AndAlike::factory as Factory,
    "hira-kata" => HiraKata::factory as Factory,
    "hira-kata-composition" => HiraKataComposition::factory as Factory,
    "japanese-iteration-marks" => JapaneseIterationMarks::factory as Factory,
    "prolonged-sound-marks" => ProlongedSoundMarks::factory as Factory,
};

/// The process-wide set of known rules.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    factories: &'static Map<&'static str, Factory>,
}

impl Registry {
    pub fn global() -> Self {
        Self {
            factories: &FACTORIES,
        }
    }

    /// Instantiates `name` with `options`.
    pub fn make(&self, name: &str, options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| TransliteratorError::UnknownRule(name.to_owned()))?;
        factory(options)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Every accepted name, aliases included, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.factories.keys().copied()
    }
}
