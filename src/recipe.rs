//! High-level recipes: a set of switches that expands into an ordered rule list.
//!
//! Rules are collected in two lists. Head rules run first (composition and
//! the forward IVS/SVS pass); tail rules hold everything else, with width
//! conversion and the IVS/SVS base pass appended last.

use thiserror::Error;
use tracing::{debug, trace};

use crate::transliterator::{
    Charset, CircledOrSquaredOptions, HiraKataCompositionOptions, HiraKataMode, HiraKataOptions,
    HyphensOptions, HyphensVariant, IvsSvsBaseMode, IvsSvsBaseOptions, Jisx0201AndAlikeOptions,
    ProlongedSoundMarksOptions, RuleOptions,
};

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("to_fullwidth and to_halfwidth are mutually exclusive")]
    MutuallyExclusive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CircledOrSquaredOption {
    #[default]
    Disabled,
    Enabled,
    ExcludeEmojis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HyphensOption {
    #[default]
    Disabled,
    /// Windows code page first, then JIS X 0201.
    Enabled,
    Precedence(Vec<HyphensVariant>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ToFullwidthOption {
    #[default]
    Disabled,
    Enabled,
    /// Also read U+005C as YEN SIGN.
    U005cAsYenSign,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ToHalfwidthOption {
    #[default]
    Disabled,
    /// Alphanumerics and symbols only.
    Enabled,
    /// Katakana as well.
    HankakuKana,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HiraKataOption {
    #[default]
    None,
    HiraToKata,
    KataToHira,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RemoveIvsSvsOption {
    #[default]
    Disabled,
    Enabled,
    /// Strip selectors even when no base mapping exists.
    DropAllSelectors,
}

/// Switches for the standard normalization passes. Everything is off by default.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct TransliterationRecipe {
    /// 舊字體 → 旧字体.
    pub kanji_old_new: bool,
    pub replace_suspicious_hyphens_to_prolonged_sound_marks: bool,
    /// ㍿ → 株式会社.
    pub replace_combined_characters: bool,
    /// ① → (1).
    pub replace_circled_or_squared_characters: CircledOrSquaredOption,
    pub replace_ideographic_annotations: bool,
    pub replace_radicals: bool,
    pub replace_spaces: bool,
    pub replace_hyphens: HyphensOption,
    pub replace_mathematical_alphanumerics: bool,
    /// Ⅻ → XII.
    pub replace_roman_numerals: bool,
    /// か + U+3099 → が.
    pub combine_decomposed_hiraganas_and_katakanas: bool,
    pub to_fullwidth: ToFullwidthOption,
    pub hira_kata: HiraKataOption,
    /// 佐々木 → 佐佐木.
    pub replace_japanese_iteration_marks: bool,
    pub to_halfwidth: ToHalfwidthOption,
    pub remove_ivs_svs: RemoveIvsSvsOption,
    pub charset: Charset,
}

/// One entry of an expanded recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    pub name: &'static str,
    pub options: RuleOptions,
}

impl RuleSpec {
    pub fn new(name: &'static str, options: RuleOptions) -> Self {
        Self { name, options }
    }

    fn plain(name: &'static str) -> Self {
        Self::new(name, RuleOptions::Default)
    }
}

/// Head/tail rule lists. A rule occurs at most once per list.
#[derive(Debug, Default)]
struct RuleListBuilder {
    head: Vec<RuleSpec>,
    tail: Vec<RuleSpec>,
}

impl RuleListBuilder {
    fn place(list: &mut Vec<RuleSpec>, spec: RuleSpec, force_replace: bool, at_front: bool) {
        match list.iter().position(|s| s.name == spec.name) {
            Some(i) if force_replace => list[i] = spec,
            Some(_) => trace!(rule = spec.name, "already present, kept"),
            None if at_front => list.insert(0, spec),
            None => list.push(spec),
        }
    }

    fn insert_head(&mut self, spec: RuleSpec, force_replace: bool) {
        Self::place(&mut self.head, spec, force_replace, true);
    }

    fn insert_middle(&mut self, spec: RuleSpec, force_replace: bool) {
        Self::place(&mut self.tail, spec, force_replace, true);
    }

    fn insert_tail(&mut self, spec: RuleSpec, force_replace: bool) {
        Self::place(&mut self.tail, spec, force_replace, false);
    }

    fn build(self) -> Vec<RuleSpec> {
        let mut rules = self.head;
        rules.extend(self.tail);
        rules
    }
}

impl TransliterationRecipe {
    /// Expands the switches into rule specs in execution order.
    pub fn build_rules(&self) -> Result<Vec<RuleSpec>, RecipeError> {
        if self.to_fullwidth != ToFullwidthOption::Disabled && self.to_halfwidth != ToHalfwidthOption::Disabled {
            return Err(RecipeError::MutuallyExclusive);
        }
        let mut b = RuleListBuilder::default();

        if self.kanji_old_new {
            self.ivs_svs_pair(&mut b, false);
            b.insert_middle(RuleSpec::plain("kanji-old-new"), false);
        }
        if self.replace_suspicious_hyphens_to_prolonged_sound_marks {
            let options = ProlongedSoundMarksOptions {
                replace_prolonged_marks_following_alnums: true,
                ..Default::default()
            };
            b.insert_middle(
                RuleSpec::new("prolonged-sound-marks", RuleOptions::ProlongedSoundMarks(options)),
                false,
            );
        }
        if self.replace_circled_or_squared_characters != CircledOrSquaredOption::Disabled {
            let options = CircledOrSquaredOptions {
                include_emojis: self.replace_circled_or_squared_characters != CircledOrSquaredOption::ExcludeEmojis,
                ..Default::default()
            };
            b.insert_middle(
                RuleSpec::new("circled-or-squared", RuleOptions::CircledOrSquared(options)),
                false,
            );
        }
        let plain_switches = [
            (self.replace_combined_characters, "combined"),
            (self.replace_ideographic_annotations, "ideographic-annotations"),
            (self.replace_radicals, "radicals"),
            (self.replace_spaces, "spaces"),
        ];
        for (_, name) in plain_switches.into_iter().filter(|(on, _)| *on) {
            b.insert_middle(RuleSpec::plain(name), false);
        }
        let precedence = match &self.replace_hyphens {
            HyphensOption::Disabled => None,
            HyphensOption::Enabled => Some(vec![HyphensVariant::Jisx0208_90Windows, HyphensVariant::Jisx0201]),
            HyphensOption::Precedence(p) => Some(p.clone()),
        };
        if let Some(precedence) = precedence {
            b.insert_middle(
                RuleSpec::new("hyphens", RuleOptions::Hyphens(HyphensOptions { precedence })),
                false,
            );
        }
        if self.replace_mathematical_alphanumerics {
            b.insert_middle(RuleSpec::plain("mathematical-alphanumerics"), false);
        }
        if self.replace_roman_numerals {
            b.insert_middle(RuleSpec::plain("roman-numerals"), false);
        }
        if self.combine_decomposed_hiraganas_and_katakanas {
            b.insert_head(composition(), false);
        }
        if self.to_fullwidth != ToFullwidthOption::Disabled {
            let options = Jisx0201AndAlikeOptions {
                fullwidth_to_halfwidth: false,
                u005c_as_yen_sign: Some(self.to_fullwidth == ToFullwidthOption::U005cAsYenSign),
                ..Default::default()
            };
            b.insert_tail(
                RuleSpec::new("jisx0201-and-alike", RuleOptions::Jisx0201AndAlike(options)),
                false,
            );
        }
        let mode = match self.hira_kata {
            HiraKataOption::None => None,
            HiraKataOption::HiraToKata => Some(HiraKataMode::HiraToKata),
            HiraKataOption::KataToHira => Some(HiraKataMode::KataToHira),
        };
        if let Some(mode) = mode {
            b.insert_middle(
                RuleSpec::new("hira-kata", RuleOptions::HiraKata(HiraKataOptions { mode })),
                false,
            );
        }
        if self.replace_japanese_iteration_marks {
            b.insert_head(composition(), false);
            b.insert_middle(RuleSpec::plain("japanese-iteration-marks"), false);
        }
        if self.to_halfwidth != ToHalfwidthOption::Disabled {
            let options = Jisx0201AndAlikeOptions {
                fullwidth_to_halfwidth: true,
                convert_gl: true,
                convert_gr: self.to_halfwidth == ToHalfwidthOption::HankakuKana,
                ..Default::default()
            };
            b.insert_tail(
                RuleSpec::new("jisx0201-and-alike", RuleOptions::Jisx0201AndAlike(options)),
                false,
            );
        }
        if self.remove_ivs_svs != RemoveIvsSvsOption::Disabled {
            self.ivs_svs_pair(&mut b, self.remove_ivs_svs == RemoveIvsSvsOption::DropAllSelectors);
        }

        let rules = b.build();
        debug!(rules = ?rules.iter().map(|r| r.name).collect::<Vec<_>>(), "recipe assembled");
        Ok(rules)
    }

    /// Forward IVS/SVS pass at the head and the base pass at the tail.
    fn ivs_svs_pair(&self, b: &mut RuleListBuilder, drop_selectors_altogether: bool) {
        let forward = IvsSvsBaseOptions {
            mode: IvsSvsBaseMode::IvsOrSvs,
            charset: self.charset,
            ..Default::default()
        };
        let base = IvsSvsBaseOptions {
            mode: IvsSvsBaseMode::Base,
            charset: self.charset,
            drop_selectors_altogether,
            ..Default::default()
        };
        b.insert_head(RuleSpec::new("ivs-svs-base", RuleOptions::IvsSvsBase(forward)), true);
        b.insert_tail(RuleSpec::new("ivs-svs-base", RuleOptions::IvsSvsBase(base)), true);
    }
}

fn composition() -> RuleSpec {
    RuleSpec::new(
        "hira-kata-composition",
        RuleOptions::HiraKataComposition(HiraKataCompositionOptions {
            compose_non_combining_marks: true,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(recipe: &TransliterationRecipe) -> Vec<&'static str> {
        recipe.build_rules().unwrap().into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn empty_recipe_has_no_rules() {
        assert!(names(&TransliterationRecipe::default()).is_empty());
    }

    #[test]
    fn kanji_old_new_sits_between_ivs_passes() {
        let recipe = TransliterationRecipe {
            kanji_old_new: true,
            ..Default::default()
        };
        assert_eq!(names(&recipe), ["ivs-svs-base", "kanji-old-new", "ivs-svs-base"]);
        let rules = recipe.build_rules().unwrap();
        assert!(matches!(
            rules[0].options,
            RuleOptions::IvsSvsBase(IvsSvsBaseOptions {
                mode: IvsSvsBaseMode::IvsOrSvs,
                ..
            })
        ));
        assert!(matches!(
            rules[2].options,
            RuleOptions::IvsSvsBase(IvsSvsBaseOptions {
                mode: IvsSvsBaseMode::Base,
                drop_selectors_altogether: false,
                ..
            })
        ));
    }

    #[test]
    fn full_recipe_order() {
        let recipe = TransliterationRecipe {
            kanji_old_new: true,
            replace_spaces: true,
            replace_suspicious_hyphens_to_prolonged_sound_marks: true,
            replace_circled_or_squared_characters: CircledOrSquaredOption::Enabled,
            replace_combined_characters: true,
            replace_japanese_iteration_marks: true,
            to_fullwidth: ToFullwidthOption::Enabled,
            ..Default::default()
        };
        assert_eq!(
            names(&recipe),
            [
                "hira-kata-composition",
                "ivs-svs-base",
                "japanese-iteration-marks",
                "spaces",
                "combined",
                "circled-or-squared",
                "prolonged-sound-marks",
                "kanji-old-new",
                "ivs-svs-base",
                "jisx0201-and-alike",
            ]
        );
    }

    #[test]
    fn width_directions_exclude_each_other() {
        let recipe = TransliterationRecipe {
            to_fullwidth: ToFullwidthOption::Enabled,
            to_halfwidth: ToHalfwidthOption::HankakuKana,
            ..Default::default()
        };
        assert!(matches!(recipe.build_rules(), Err(RecipeError::MutuallyExclusive)));
    }

    #[test]
    fn remove_ivs_svs_replaces_the_pair() {
        let recipe = TransliterationRecipe {
            kanji_old_new: true,
            remove_ivs_svs: RemoveIvsSvsOption::DropAllSelectors,
            charset: Charset::Unijis90,
            ..Default::default()
        };
        let rules = recipe.build_rules().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(
            rules[2].options,
            RuleOptions::IvsSvsBase(IvsSvsBaseOptions {
                mode: IvsSvsBaseMode::Base,
                charset: Charset::Unijis90,
                prefer_svs: false,
                drop_selectors_altogether: true,
            })
        );
    }

    #[test]
    fn composition_is_shared() {
        let recipe = TransliterationRecipe {
            combine_decomposed_hiraganas_and_katakanas: true,
            replace_japanese_iteration_marks: true,
            hira_kata: HiraKataOption::KataToHira,
            ..Default::default()
        };
        assert_eq!(
            names(&recipe),
            ["hira-kata-composition", "japanese-iteration-marks", "hira-kata"]
        );
    }

    #[test]
    fn option_mapping() {
        let recipe = TransliterationRecipe {
            replace_hyphens: HyphensOption::Enabled,
            replace_circled_or_squared_characters: CircledOrSquaredOption::ExcludeEmojis,
            to_halfwidth: ToHalfwidthOption::Enabled,
            ..Default::default()
        };
        let rules = recipe.build_rules().unwrap();
        let find = |name| rules.iter().find(|r| r.name == name).map(|r| r.options.clone());
        assert_eq!(
            find("hyphens"),
            Some(RuleOptions::Hyphens(HyphensOptions {
                precedence: vec![HyphensVariant::Jisx0208_90Windows, HyphensVariant::Jisx0201]
            }))
        );
        assert!(matches!(
            find("circled-or-squared"),
            Some(RuleOptions::CircledOrSquared(CircledOrSquaredOptions { include_emojis: false, .. }))
        ));
        assert!(matches!(
            find("jisx0201-and-alike"),
            Some(RuleOptions::Jisx0201AndAlike(Jisx0201AndAlikeOptions {
                fullwidth_to_halfwidth: true,
                convert_gr: false,
                ..
            }))
        ));
    }
}
