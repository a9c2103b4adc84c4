pub mod char;
pub mod char_iter;
pub mod codepoint;
pub mod hyoki;
pub mod pipeline;
pub mod recipe;
pub mod registry;
pub mod table;
pub mod testing;
pub mod transliterator;
pub mod unicode;

pub use char::{Char, CharId, CharPool};
pub use char_iter::CharIterator;
pub use codepoint::CodePointTuple;
pub use hyoki::{Hyoki, HyokiBuilder, HyokiError};
pub use pipeline::Pipeline;
pub use recipe::{
    CircledOrSquaredOption, HiraKataOption, HyphensOption, RecipeError, RemoveIvsSvsOption, RuleSpec,
    ToFullwidthOption, ToHalfwidthOption, TransliterationRecipe,
};
pub use registry::{Factory, Registry};
pub use table::TableLoadError;
pub use transliterator::{
    Charset, CircledOrSquared, CircledOrSquaredOptions, Combined, HiraKata, HiraKataComposition,
    HiraKataCompositionOptions, HiraKataMode, HiraKataOptions, Hyphens, HyphensOptions, HyphensVariant,
    IdeographicAnnotations, IvsSvsBase, IvsSvsBaseMode, IvsSvsBaseOptions, JapaneseIterationMarks,
    Jisx0201AndAlike, Jisx0201AndAlikeOptions, KanjiOldNew, MathematicalAlphanumerics, ProlongedSoundMarks,
    ProlongedSoundMarksOptions, Radicals, RomanNumerals, RuleOptions, Spaces, Templates, Transliterator,
    TransliteratorError,
};

#[cfg(test)]
mod tests {
    include!("tests/unit.rs");
    include!("tests/integration.rs");
    include!("tests/proptest.rs");
}
