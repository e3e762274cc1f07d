use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use indicatif::{ProgressBar, ProgressStyle};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};
use twox_hash::XxHash64;

use jsonsearch_core::config::{expand_path, EmbedSettings};
use jsonsearch_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::{tokenize_batch, TokenBatch};

pub const FAKE_DIM: usize = 384;
const FAKE_MAX_LEN: usize = 256;

/// Sentence-transformer style BERT encoder: mean pooling over real tokens, then L2 normalization.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    id: String,
    dim: usize,
    max_len: usize,
    batch_size: usize,
    pad_id: u32,
}

impl BertEmbedder {
    pub fn new(settings: &EmbedSettings) -> Result<Self> {
        let device = select_device();
        let model_dir = resolve_model_dir(settings)?;
        info!(model = %settings.model_name, dir = %model_dir.display(), "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams { max_length: settings.max_len, ..Default::default() }))
            .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;

        let config_path = model_dir.join("config.json");
        let raw_config = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw_config)?;
        let dim = serde_json::from_str::<serde_json::Value>(&raw_config)?
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;

        let weights = load_weights(&model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        debug!(dim, max_len = settings.max_len, "embedding model ready");

        Ok(Self {
            model,
            tokenizer,
            device,
            id: format!("bert:{}:d{}", settings.model_name, dim),
            dim,
            max_len: settings.max_len,
            batch_size: settings.batch_size.max(1),
            pad_id,
        })
    }

    fn embed_sub_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let batch = tokenize_batch(&self.tokenizer, texts, self.max_len, self.pad_id, &self.device)?;
        let hidden = self.model.forward(&batch.input_ids, &batch.token_type_ids, Some(&batch.attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &batch.attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_dtype(DType::F32)?.to_vec2::<f32>()?)
    }
}

impl Embedder for BertEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let pb = if texts.len() > self.batch_size {
            let pb = ProgressBar::new(texts.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} texts ({percent}%)")?
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut out = Vec::with_capacity(texts.len());
        for sub in texts.chunks(self.batch_size) {
            out.extend(self.embed_sub_batch(sub)?);
            pb.inc(sub.len() as u64);
        }
        pb.finish_and_clear();

        let per_text = start.elapsed().as_millis() / texts.len().max(1) as u128;
        if per_text > 100 { warn!(per_text_ms = per_text as u64, "slow embedding"); }
        Ok(out)
    }
}

/// Deterministic bag-of-words hashing embedder for tests and offline runs.
///
/// Identical texts always map to identical unit vectors.
pub struct FakeEmbedder { dim: usize, id: String }

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim, id: format!("fake:xxh64:d{dim}") } }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Default for FakeEmbedder {
    fn default() -> Self { Self::new(FAKE_DIM) }
}

impl Embedder for FakeEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { FAKE_MAX_LEN }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Picks the fake embedder when `settings.fake` or `APP_USE_FAKE_EMBEDDINGS` asks for it, else loads BERT.
pub fn get_default_embedder(settings: &EmbedSettings) -> Result<Box<dyn Embedder>> {
    let env_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if settings.fake || env_fake {
        info!("using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::default()));
    }
    Ok(Box::new(BertEmbedder::new(settings)?))
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        debug!(path = %safetensors.display(), "loading safetensors weights");
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        debug!(path = %pickle.display(), "loading pytorch weights");
        return Ok(candle_core::pickle::read_all(&pickle)?.into_iter().collect());
    }
    Err(anyhow!("No model.safetensors or pytorch_model.bin in {}", model_dir.display()))
}

fn resolve_model_dir(settings: &EmbedSettings) -> Result<PathBuf> {
    let configured = settings.model_dir_path();
    let from_env = ["APP_MODEL_DIR", "MODEL_DIR"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok().map(expand_path));
    let defaults = [
        Path::new("models").join(&settings.model_name),
        Path::new("../models").join(&settings.model_name),
    ];
    configured
        .into_iter()
        .chain(from_env)
        .chain(defaults)
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("Could not locate model directory for '{}'", settings.model_name))
}
