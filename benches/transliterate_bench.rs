use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hyoki::{
    CircledOrSquaredOption, HiraKataOption, Hyoki, Registry, RuleOptions, ToFullwidthOption,
    ToHalfwidthOption, TransliterationRecipe, Transliterator,
};
use std::hint::black_box;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════
// TEST DATA
// ═══════════════════════════════════════════════════════════════════════════

struct TestCase {
    name: &'static str,
    base: &'static str,
}

const TEST_CASES: &[TestCase] = &[
    TestCase {
        name: "ascii",
        base: "The quick brown fox jumps over the lazy dog 0123456789. ",
    },
    TestCase {
        name: "japanese_clean",
        base: "今日は良い天気ですね。明日も晴れるでしょう。",
    },
    TestCase {
        name: "japanese_dirty",
        base: "①②③　ⒶⒷⒸ　㍿㍑㌠㋿ ﾃｽﾄﾓｼﾞﾚﾂ 佐々木 舊字體 スーパ−ボウル ",
    },
];

const LENGTH_CONFIGS: &[(&str, usize)] = &[("short", 500), ("medium", 2000), ("long", 10000)];

fn generate_text(base: &str, target_bytes: usize) -> String {
    let mut result = String::with_capacity(target_bytes + base.len());
    while result.len() < target_bytes {
        result.push_str(base);
    }
    let mut limit = target_bytes;
    while limit > 0 && !result.is_char_boundary(limit) {
        limit -= 1;
    }
    result.truncate(limit);
    result
}

fn recipes() -> Vec<(&'static str, TransliterationRecipe)> {
    vec![
        (
            "readme",
            TransliterationRecipe {
                kanji_old_new: true,
                replace_spaces: true,
                replace_suspicious_hyphens_to_prolonged_sound_marks: true,
                replace_circled_or_squared_characters: CircledOrSquaredOption::Enabled,
                replace_combined_characters: true,
                replace_japanese_iteration_marks: true,
                to_fullwidth: ToFullwidthOption::Enabled,
                ..Default::default()
            },
        ),
        (
            "hankaku",
            TransliterationRecipe {
                hira_kata: HiraKataOption::HiraToKata,
                to_halfwidth: ToHalfwidthOption::HankakuKana,
                ..Default::default()
            },
        ),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_recipes(c: &mut Criterion) {
    let mut group = c.benchmark_group("recipe");
    for (recipe_name, recipe) in recipes() {
        let hyoki = Hyoki::from_recipe(&recipe).expect("recipe builds");
        for case in TEST_CASES {
            for &(size_name, target_bytes) in LENGTH_CONFIGS {
                let text = generate_text(case.base, target_bytes);
                group.throughput(Throughput::Bytes(text.len() as u64));
                let id = format!("{recipe_name}/{}/{size_name}", case.name);
                group.bench_function(BenchmarkId::from_parameter(id), |b| {
                    b.iter(|| hyoki.transliterate(black_box(&text)).len())
                });
            }
        }
    }
    group.finish();
}

fn bench_single_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule");
    let registry = Registry::global();
    let text = generate_text(TEST_CASES[2].base, 2000);
    group.throughput(Throughput::Bytes(text.len() as u64));
    let mut names: Vec<&str> = registry.names().filter(|n| !n.contains('_')).collect();
    names.sort_unstable();
    for name in names {
        let rule = registry.make(name, RuleOptions::Default).expect("rule builds");
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| rule.transliterate_str(black_box(&text)))
        });
    }
    group.finish();
}

fn init_tracing() {
    // RUST_LOG=hyoki=debug shows table loads and recipe assembly.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn bench_all(c: &mut Criterion) {
    init_tracing();
    bench_recipes(c);
    bench_single_rules(c);
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(3))
        .warm_up_time(Duration::from_secs(1))
        .sample_size(200);
    targets = bench_all
);
criterion_main!(benches);
