use crate::transliterator::Transliterator;

/// Trait that rules implement to opt into the universal test suite.
pub trait TransliteratorTestConfig: Transliterator + Sized {
    /// General samples (may or may not trigger changes).
    fn samples() -> &'static [&'static str] {
        &["Hello World 123", "日本語のテキスト", ""]
    }

    /// Samples that must come out unchanged.
    ///
    /// Default: plain ASCII and kanji that no rule touches with default options.
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "world123", "abc def", "日本", ""]
    }

    /// Input/output pairs for known transformations.
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Rules that rewrite printable ASCII (e.g. half-width → full-width)
    /// opt out of the ASCII check.
    fn ascii_is_untouched() -> bool {
        true
    }
}

/// Asserts that a rule satisfies the universal stream contracts.
///
/// 1. `offsets_are_contiguous` → emitted offsets start at 0 and advance by scalar count
/// 2. `sentinel_is_forwarded_last` → exactly one sentinel, at the end, at the total length
/// 3. `changed_units_carry_provenance` → every rewritten unit links back to its input
/// 4. `pass_through_is_unchanged` / `known_transformations` → sample tables
/// 5. `handles_empty_string_and_ascii`
/// 6. `no_panic_on_mixed_scripts`
#[macro_export]
macro_rules! assert_transliterator_contract {
    ($rule:expr) => {{
        let rule = $rule;
        $crate::testing::transliterator_contract::offsets_are_contiguous(&rule);
        $crate::testing::transliterator_contract::sentinel_is_forwarded_last(&rule);
        $crate::testing::transliterator_contract::changed_units_carry_provenance(&rule);
        $crate::testing::transliterator_contract::pass_through_is_unchanged(&rule);
        $crate::testing::transliterator_contract::known_transformations(&rule);
        $crate::testing::transliterator_contract::handles_empty_string_and_ascii(&rule);
        $crate::testing::transliterator_contract::no_panic_on_mixed_scripts(&rule);
    }};
}

// ============================================================================
// Universal contract tests
// ============================================================================

#[cfg(test)]
use crate::char::{Char, CharPool};

#[cfg(test)]
const MIXED: &str = "Hello 世界 ｶﾞｷﾞ ①Ⓐ㍿ 舊字體 佐々木 ウッ－ 𝐀 ⼀ русский العربية";

#[cfg(test)]
fn run<S: Transliterator>(rule: &S, pool: &CharPool, input: &str) -> Vec<Char> {
    rule.transliterate(pool, pool.stream(input)).collect()
}

#[cfg(test)]
fn all_inputs<S: TransliteratorTestConfig>() -> Vec<&'static str> {
    let mut inputs: Vec<&'static str> = S::samples().to_vec();
    inputs.extend(S::should_pass_through());
    inputs.extend(S::should_transform().iter().map(|(i, _)| *i));
    inputs.push(MIXED);
    inputs
}

#[cfg(test)]
pub fn offsets_are_contiguous<S: TransliteratorTestConfig>(rule: &S) {
    for input in all_inputs::<S>() {
        let pool = CharPool::new();
        let mut expected = 0;
        for c in run(rule, &pool, input) {
            assert_eq!(
                c.offset,
                expected,
                "offset gap in `{}` on `{input}` at {:?}",
                rule.name(),
                c.value
            );
            expected += c.char_count();
        }
    }
}

#[cfg(test)]
pub fn sentinel_is_forwarded_last<S: TransliteratorTestConfig>(rule: &S) {
    for input in all_inputs::<S>() {
        let pool = CharPool::new();
        let out = run(rule, &pool, input);
        let last = out.last().expect("stream must not be empty");
        assert!(last.is_sentinel(), "`{}` dropped the sentinel on `{input}`", rule.name());
        assert_eq!(
            out.iter().filter(|c| c.is_sentinel()).count(),
            1,
            "`{}` emitted an empty unit mid-stream on `{input}`",
            rule.name()
        );
        let total: usize = out.iter().map(Char::char_count).sum();
        assert_eq!(last.offset, total);
    }
}

#[cfg(test)]
pub fn changed_units_carry_provenance<S: TransliteratorTestConfig>(rule: &S) {
    for input in all_inputs::<S>() {
        let pool = CharPool::new();
        let originals: Vec<Char> = pool.stream(input).collect();
        let out: Vec<Char> = rule
            .transliterate(&pool, crate::char_iter::CharIterator::new(originals.clone().into_iter()))
            .collect();
        for c in out.iter().filter(|c| !c.is_sentinel()) {
            let origin = pool.origin_of(c);
            assert!(
                originals.contains(&origin),
                "`{}` emitted {:?} with no link to the input",
                rule.name(),
                c.value
            );
            if origin.value != c.value {
                assert!(pool.is_transliterated(c));
            }
        }
    }
}

#[cfg(test)]
pub fn pass_through_is_unchanged<S: TransliteratorTestConfig>(rule: &S) {
    for &input in S::should_pass_through() {
        assert_eq!(
            rule.transliterate_str(input),
            input,
            "`{}` altered pass-through sample",
            rule.name()
        );
    }
}

#[cfg(test)]
pub fn known_transformations<S: TransliteratorTestConfig>(rule: &S) {
    for &(input, expected) in S::should_transform() {
        assert_eq!(
            rule.transliterate_str(input),
            expected,
            "`{}` on `{input}`",
            rule.name()
        );
    }
}

#[cfg(test)]
pub fn handles_empty_string_and_ascii<S: TransliteratorTestConfig>(rule: &S) {
    assert_eq!(rule.transliterate_str(""), "");
    if S::ascii_is_untouched() {
        let ascii = "hello world 123 !@#";
        assert_eq!(rule.transliterate_str(ascii), ascii);
    }
}

#[cfg(test)]
pub fn no_panic_on_mixed_scripts<S: TransliteratorTestConfig>(rule: &S) {
    let _ = rule.transliterate_str(MIXED);
    let _ = rule.transliterate_str("\u{3099}\u{309A}ﾞﾟ々ゝヽ〱ー－");
}
