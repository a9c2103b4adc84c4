//! An ordered chain of rules that is itself a rule.

use std::sync::Arc;

use crate::{
    char::CharPool,
    char_iter::CharIterator,
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Transliterator, TransliteratorError},
};

#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Transliterator>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Pipeline {
    pub fn new(stages: Vec<Arc<dyn Transliterator>>) -> Self {
        Self { stages }
    }

    /// Appends a stage; it runs after every stage already present.
    pub fn push<T: Transliterator + 'static>(&mut self, stage: T) {
        self.stages.push(Arc::new(stage));
    }

    pub fn push_boxed(&mut self, stage: Box<dyn Transliterator>) {
        self.stages.push(Arc::from(stage));
    }

    pub fn push_shared(&mut self, stage: Arc<dyn Transliterator>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|s| s.name())
    }

    /// Builds the chain through the registry.
    pub fn from_specs<'n, I>(specs: I) -> Result<Self, TransliteratorError>
    where
        I: IntoIterator<Item = (&'n str, crate::transliterator::RuleOptions)>,
    {
        let registry = crate::registry::Registry::global();
        let stages = specs
            .into_iter()
            .map(|(name, options)| registry.make(name, options).map(Arc::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stages })
    }
}

impl Transliterator for Pipeline {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        self.stages
            .iter()
            .fold(input, |chain, stage| stage.transliterate(pool, chain))
    }
}

impl TransliteratorTestConfig for Pipeline {
    fn samples() -> &'static [&'static str] {
        &["①②③", "ｶﾞｷﾞ", "舊字體", "佐々木"]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::{
        assert_transliterator_contract,
        transliterator::{Combined, HiraKata, JapaneseIterationMarks, RuleOptions, Spaces},
    };

    fn sample() -> Pipeline {
        let mut p = Pipeline::default();
        p.push(Spaces::new().unwrap());
        p.push(Combined::new().unwrap());
        p.push(JapaneseIterationMarks::new());
        p.push(HiraKata::default());
        p
    }

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(sample());
        assert_transliterator_contract!(Pipeline::default());
    }

    #[test]
    fn stages_run_in_order() {
        let p = sample();
        assert_eq!(p.names().collect::<Vec<_>>(), ["spaces", "combined", "japanese-iteration-marks", "hira-kata"]);
        assert_eq!(p.transliterate_str("㍿　ところゝ"), "株式会社 トコロロ");
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let p = Pipeline::default();
        assert!(p.is_empty());
        assert_eq!(p.transliterate_str("ｶﾞ①"), "ｶﾞ①");
    }

    #[test]
    fn from_specs_uses_registry() {
        let p = Pipeline::from_specs([("spaces", RuleOptions::Default), ("roman_numerals", RuleOptions::Default)])
            .unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.transliterate_str("Ⅻ\u{3000}"), "XII ");
        let err = Pipeline::from_specs([("nope", RuleOptions::Default)]).err();
        assert_eq!(err, Some(TransliteratorError::UnknownRule("nope".into())));
    }
}
