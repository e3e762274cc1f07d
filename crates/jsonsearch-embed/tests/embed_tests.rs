use jsonsearch_core::config::EmbedSettings;
use jsonsearch_core::traits::Embedder;
use jsonsearch_embed::{get_default_embedder, FakeEmbedder, FAKE_DIM};

#[test]
fn fake_embedder_shapes_and_determinism() {
    let embedder = FakeEmbedder::default();
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), FAKE_DIM);
    assert_eq!(embedder.dim(), FAKE_DIM);

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_single_matches_batch() {
    let embedder = FakeEmbedder::new(64);
    let batch = vec![
        "first document text".to_string(),
        "second, rather different text".to_string(),
        String::new(),
    ];
    let all = embedder.embed_batch(&batch).unwrap();
    assert_eq!(all.len(), batch.len());
    for (text, row) in batch.iter().zip(&all) {
        let single = embedder.embed_batch(std::slice::from_ref(text)).unwrap().remove(0);
        assert_eq!(&single, row);
    }
    assert!(all[2].iter().all(|x| *x == 0.0), "empty text embeds to the zero vector");
}

#[test]
fn default_embedder_honours_fake_setting() {
    let settings = EmbedSettings { fake: true, ..EmbedSettings::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    assert!(embedder.id().starts_with("fake:"));
    assert_eq!(embedder.dim(), FAKE_DIM);
}

/// Needs local all-MiniLM-L6-v2 weights (set APP_MODEL_DIR).
#[test]
#[ignore]
fn bert_embedder_batch_matches_single() {
    let embedder = jsonsearch_embed::BertEmbedder::new(&EmbedSettings::default()).expect("model");
    let texts = vec![
        "Returns a collection of the most recent Tweets".to_string(),
        "Sample API description for testing purposes".to_string(),
    ];
    let batch = embedder.embed_batch(&texts).unwrap();
    assert_eq!(batch[0].len(), embedder.dim());
    let single = embedder.embed_batch(&texts[1..]).unwrap().remove(0);
    let dist: f32 = single.iter().zip(&batch[1]).map(|(a, b)| (a - b) * (a - b)).sum();
    assert!(dist < 1e-4, "batched and single embeddings diverge: {dist}");
}
