use criterion::{criterion_group, criterion_main, Criterion};
use search::{IndexHandle, QueryEngine, Recipe, Tag};

fn synthetic_catalogue(n: usize) -> (Vec<Recipe>, Vec<Tag>) {
    let names = [
        "chicken", "beef", "salmon", "tofu", "mushroom", "spinach", "paprika",
        "tomato", "garlic", "ginger", "noodle", "barley", "lentil", "almond",
    ];
    let tags: Vec<Tag> = names
        .iter()
        .enumerate()
        .map(|(i, name)| Tag::new(i as i64 + 1, name, None))
        .collect();
    let recipes: Vec<Recipe> = (0..n)
        .map(|i| {
            let mut recipe = Recipe::new(
                i as i64 + 1,
                &format!("{} {} bake", names[i % names.len()], names[(i * 7) % names.len()]),
            );
            recipe.ingredients = names
                .iter()
                .skip(i % 5)
                .take(6)
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
            recipe.description = Some(format!("slow roasted {} dish", names[i % names.len()]));
            recipe.tags = vec![tags[i % tags.len()].clone()];
            recipe
        })
        .collect();
    (recipes, tags)
}

fn bench_build(c: &mut Criterion) {
    let (recipes, tags) = synthetic_catalogue(2000);
    let handle = IndexHandle::new();
    c.bench_function("rebuild_2k_recipes", |b| {
        b.iter(|| handle.rebuild(&recipes, &tags).unwrap())
    });
}

fn bench_search(c: &mut Criterion) {
    let (recipes, tags) = synthetic_catalogue(2000);
    let handle = IndexHandle::new();
    handle.rebuild(&recipes, &tags).unwrap();
    let engine = QueryEngine::new(handle);

    c.bench_function("search_exact", |b| b.iter(|| engine.search("chicken garlic", 20)));
    c.bench_function("search_prefix", |b| b.iter(|| engine.search("chick", 20)));
    c.bench_function("search_fuzzy", |b| b.iter(|| engine.search("chickn", 20)));
    c.bench_function("suggestions", |b| b.iter(|| engine.suggestions("ch", 10)));
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
