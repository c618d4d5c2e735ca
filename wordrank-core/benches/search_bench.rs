use criterion::{criterion_group, criterion_main, Criterion};
use wordrank_core::{process_queries, DocumentStatus, SearchIndex};

fn build_index(doc_count: i32) -> SearchIndex {
    let mut index = SearchIndex::from_stop_words_text("and in on the").unwrap();
    for id in 0..doc_count {
        let text = format!(
            "word{} word{} word{} word{} and the filler",
            id % 50,
            (id * 7) % 50,
            (id * 13) % 50,
            (id * 29) % 50
        );
        index
            .add_document(id, &text, DocumentStatus::Actual, &[id % 10])
            .unwrap();
    }
    index
}

fn bench_search(c: &mut Criterion) {
    let index = build_index(2000);
    c.bench_function("find_top_documents", |b| {
        b.iter(|| index.find_top_documents("word3 word17 -word40").unwrap())
    });

    let queries: Vec<String> = (0..64)
        .map(|i| format!("word{} word{}", i % 50, (i * 7) % 50))
        .collect();
    c.bench_function("process_queries_64", |b| {
        b.iter(|| process_queries(&index, &queries).unwrap())
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
