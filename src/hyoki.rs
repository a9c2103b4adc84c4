use std::{borrow::Cow, sync::Arc};

use thiserror::Error;
use tracing::trace;

use crate::{
    char::CharPool,
    pipeline::Pipeline,
    recipe::{RecipeError, TransliterationRecipe},
    registry::Registry,
    transliterator::{RuleOptions, Transliterator, TransliteratorError},
};

#[derive(Debug, Error)]
pub enum HyokiError {
    #[error("recipe error: {0}")]
    Recipe(#[from] RecipeError),
    #[error("transliterator error: {0}")]
    Transliterator(#[from] TransliteratorError),
}

/// A ready-to-use normalizer. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Hyoki {
    pipeline: Pipeline,
}

impl Hyoki {
    pub fn builder() -> HyokiBuilder {
        HyokiBuilder::default()
    }

    pub fn from_recipe(recipe: &TransliterationRecipe) -> Result<Self, HyokiError> {
        let mut builder = Self::builder();
        for spec in recipe.build_rules()? {
            builder = builder.add_rule(spec.name, spec.options)?;
        }
        Ok(builder.build())
    }

    /// Runs every rule over `text`. Unchanged input is returned borrowed.
    pub fn transliterate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.pipeline.is_empty() {
            return Cow::Borrowed(text);
        }
        let pool = CharPool::with_capacity(text.len() + 1);
        let out = self.pipeline.transliterate(&pool, pool.stream(text)).collect_string();
        if out == text {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(out)
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

#[derive(Debug, Default)]
pub struct HyokiBuilder {
    pipeline: Pipeline,
}

impl HyokiBuilder {
    /// Appends a registered rule by name.
    pub fn add_rule(mut self, name: &str, options: RuleOptions) -> Result<Self, TransliteratorError> {
        trace!(rule = name, ?options, "adding rule");
        self.pipeline.push_boxed(Registry::global().make(name, options)?);
        Ok(self)
    }

    pub fn add_transliterator<T: Transliterator + 'static>(mut self, rule: T) -> Self {
        trace!(rule = rule.name(), "adding transliterator");
        self.pipeline.push(rule);
        self
    }

    /// Appends a rule instance that is also used elsewhere.
    pub fn add_shared(mut self, rule: Arc<dyn Transliterator>) -> Self {
        self.pipeline.push_shared(rule);
        self
    }

    pub fn build(self) -> Hyoki {
        Hyoki {
            pipeline: self.pipeline,
        }
    }
}
