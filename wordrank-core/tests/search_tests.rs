use wordrank_core::{DocumentStatus, SearchError, SearchIndex, MAX_RESULT_COUNT};

const STOP_WORDS: &str = "and in on the";

/// Four documents with hand-checked TF-IDF relevances for the query
/// "fluffy groomed cat":
///   doc 2: 0.5 * ln(4) + 0.25 * ln(2)   ~= 0.8664
///   doc 4: (1/3) * ln(2)                ~= 0.2310
///   doc 1: 0.25 * ln(2)                 ~= 0.1733
///   doc 3: 0.25 * ln(2)                 ~= 0.1733
fn sample_index() -> SearchIndex {
    let mut index = SearchIndex::from_stop_words_text(STOP_WORDS).unwrap();
    index
        .add_document(1, "white cat and fancy collar", DocumentStatus::Actual, &[8, -3])
        .unwrap();
    index
        .add_document(2, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7])
        .unwrap();
    index
        .add_document(3, "groomed dog expressive eyes", DocumentStatus::Actual, &[5, -12, 2, 1])
        .unwrap();
    index
        .add_document(4, "groomed starling eugene", DocumentStatus::Banned, &[9])
        .unwrap();
    index
}

#[test]
fn ranks_by_relevance_then_rating() {
    let mut index = sample_index();
    // Re-status doc 4 so everything competes under the default filter.
    index.remove_document(4);
    index
        .add_document(4, "groomed starling eugene", DocumentStatus::Actual, &[9])
        .unwrap();

    let results = index.find_top_documents("fluffy groomed cat").unwrap();
    let ids: Vec<i32> = results.iter().map(|d| d.id).collect();
    // Docs 1 and 3 tie on relevance; doc 1 wins on rating (2 > -1).
    assert_eq!(ids, vec![2, 4, 1, 3]);

    let expected = [
        0.5 * 4.0f64.ln() + 0.25 * 2.0f64.ln(),
        (1.0 / 3.0) * 2.0f64.ln(),
        0.25 * 2.0f64.ln(),
        0.25 * 2.0f64.ln(),
    ];
    for (document, want) in results.iter().zip(expected) {
        assert!(
            (document.relevance - want).abs() < 1e-9,
            "doc {} relevance {} != {want}",
            document.id,
            document.relevance
        );
    }
    assert_eq!(results[0].rating, 5);
}

#[test]
fn returns_at_most_five_results() {
    let mut index = SearchIndex::from_stop_words_text(STOP_WORDS).unwrap();
    for id in 0..8 {
        index
            .add_document(id, "sparrow", DocumentStatus::Actual, &[id])
            .unwrap();
    }
    let results = index.find_top_documents("sparrow").unwrap();
    assert_eq!(results.len(), MAX_RESULT_COUNT);
    // Equal relevance everywhere, so ratings decide.
    let ratings: Vec<i32> = results.iter().map(|d| d.rating).collect();
    assert_eq!(ratings, vec![7, 6, 5, 4, 3]);
}

#[test]
fn term_frequencies_sum_to_one() {
    let index = sample_index();
    for document_id in index.iter() {
        let total: f64 = index.get_word_frequencies(document_id).values().sum();
        assert!(
            (total - 1.0).abs() < 1e-6,
            "doc {document_id} frequencies sum to {total}"
        );
    }
}

#[test]
fn repeated_words_accumulate_frequency() {
    let index = sample_index();
    let freqs = index.get_word_frequencies(2);
    assert_eq!(freqs.len(), 3);
    assert!((freqs["fluffy"] - 0.5).abs() < 1e-9);
    assert!((freqs["cat"] - 0.25).abs() < 1e-9);
}

#[test]
fn empty_ratings_mean_zero() {
    let mut index = SearchIndex::from_stop_words_text(STOP_WORDS).unwrap();
    index
        .add_document(1, "lonely owl", DocumentStatus::Actual, &[])
        .unwrap();
    let results = index.find_top_documents("owl").unwrap();
    assert_eq!(results[0].rating, 0);
}

#[test]
fn rejects_negative_and_duplicate_ids() {
    let mut index = sample_index();
    let before = index.document_count();

    let err = index
        .add_document(-1, "owl", DocumentStatus::Actual, &[])
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)));

    let err = index
        .add_document(2, "owl", DocumentStatus::Actual, &[])
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)));

    assert_eq!(index.document_count(), before);
    // Doc 2 keeps its original words; the rejected text left no trace.
    assert!(!index.get_word_frequencies(2).contains_key("owl"));
    assert!(index.find_top_documents("owl").unwrap().is_empty());
}

#[test]
fn rejects_control_characters_in_document_text() {
    let mut index = sample_index();
    let before = index.document_count();

    let err = index
        .add_document(10, "skunk \u{1}beaver", DocumentStatus::Actual, &[])
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)));

    // The add is atomic: no word of the rejected text was indexed.
    assert_eq!(index.document_count(), before);
    assert!(index.get_word_frequencies(10).is_empty());
    assert!(index.find_top_documents("skunk").unwrap().is_empty());
}

#[test]
fn rejects_invalid_stop_words_at_construction() {
    let err = SearchIndex::new(["in", "a\u{2}"]).unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)));
}

#[test]
fn rejects_malformed_query_tokens() {
    let index = sample_index();
    for raw in ["cat --fluffy", "cat -", "-", "ca\u{1}t"] {
        assert!(
            matches!(
                index.find_top_documents(raw),
                Err(SearchError::InvalidArgument(_))
            ),
            "expected rejection for {raw:?}"
        );
    }
}

#[test]
fn query_without_plus_words_is_empty() {
    let index = sample_index();
    assert!(index.find_top_documents("-cat").unwrap().is_empty());
    // All tokens are stop words.
    assert!(index.find_top_documents("and on the").unwrap().is_empty());
    assert!(index.find_top_documents("").unwrap().is_empty());
}

#[test]
fn minus_words_prune_candidates() {
    let index = sample_index();
    let results = index.find_top_documents("cat -fluffy").unwrap();
    let ids: Vec<i32> = results.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn default_search_filters_to_actual_status() {
    let index = sample_index();
    // Doc 4 is banned and must not appear by default.
    assert!(index.find_top_documents("starling").unwrap().is_empty());

    let banned = index
        .find_top_documents_with_status("groomed", DocumentStatus::Banned)
        .unwrap();
    let ids: Vec<i32> = banned.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![4]);
}

#[test]
fn predicate_search_sees_id_status_and_rating() {
    let index = sample_index();
    let even = index
        .find_top_documents_with("fluffy groomed cat", |id, _, _| id % 2 == 0)
        .unwrap();
    let ids: Vec<i32> = even.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![2, 4]);

    let positive = index
        .find_top_documents_with("fluffy groomed cat", |_, _, rating| rating > 0)
        .unwrap();
    assert!(positive.iter().all(|d| d.rating > 0));
}

#[test]
fn match_document_reports_sorted_plus_words() {
    let index = sample_index();
    let (words, status) = index.match_document("fluffy groomed cat", 2).unwrap();
    assert_eq!(words, vec!["cat".to_string(), "fluffy".to_string()]);
    assert_eq!(status, DocumentStatus::Actual);
}

#[test]
fn match_document_empties_on_any_minus_word() {
    let index = sample_index();
    let (words, status) = index.match_document("fluffy cat -tail", 2).unwrap();
    assert!(words.is_empty());
    assert_eq!(status, DocumentStatus::Actual);
}

#[test]
fn match_document_rejects_unknown_ids() {
    let index = sample_index();
    let err = index.match_document("cat", 99).unwrap_err();
    assert!(matches!(err, SearchError::OutOfRange(_)));
}

#[test]
fn positional_lookup_follows_insertion_order() {
    let index = sample_index();
    assert_eq!(index.document_count(), 4);
    assert_eq!(index.document_id_at(0).unwrap(), 1);
    assert_eq!(index.document_id_at(3).unwrap(), 4);
    assert!(matches!(
        index.document_id_at(4),
        Err(SearchError::OutOfRange(_))
    ));
    let ids: Vec<i32> = (&index).into_iter().collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn removal_erases_every_trace() {
    let mut index = sample_index();
    index.remove_document(2);

    assert_eq!(index.document_count(), 3);
    assert!(index.get_word_frequencies(2).is_empty());
    assert_eq!(index.iter().collect::<Vec<_>>(), vec![1, 3, 4]);
    // "fluffy" and "tail" only lived in doc 2.
    assert!(index.find_top_documents("fluffy").unwrap().is_empty());
    assert!(index.find_top_documents("tail").unwrap().is_empty());
    // "cat" survives through doc 1.
    let ids: Vec<i32> = index
        .find_top_documents("cat")
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![1]);
    assert!(matches!(
        index.match_document("cat", 2),
        Err(SearchError::OutOfRange(_))
    ));
}

#[test]
fn removing_an_unknown_id_is_a_no_op() {
    let mut index = sample_index();
    index.remove_document(99);
    index.remove_document(-5);
    assert_eq!(index.document_count(), 4);
}

#[test]
fn readding_a_removed_id_is_allowed() {
    // The store only tracks live ids; reuse after removal is permitted
    // deliberately. Changing that policy should fail this test.
    let mut index = sample_index();
    index.remove_document(3);
    index
        .add_document(3, "quiet hamster", DocumentStatus::Actual, &[4])
        .unwrap();
    let freqs = index.get_word_frequencies(3);
    assert!(freqs.contains_key("hamster"));
    assert!(!freqs.contains_key("dog"));
}

#[test]
fn documents_of_only_stop_words_are_registered_but_unsearchable() {
    let mut index = SearchIndex::from_stop_words_text(STOP_WORDS).unwrap();
    index
        .add_document(1, "in and on", DocumentStatus::Actual, &[3])
        .unwrap();
    assert_eq!(index.document_count(), 1);
    assert!(index.get_word_frequencies(1).is_empty());
    assert!(index.find_top_documents("cat").unwrap().is_empty());
}
