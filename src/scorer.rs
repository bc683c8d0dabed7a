// src/scorer.rs
//! Relevance scoring: sentence embeddings (all-MiniLM-L6-v2) + cosine
//! similarity, scaled to 0..=100.
//!
//! The model is expensive to load, so it lives on one dedicated thread for
//! the life of the process and requests flow over a channel. rust_bert
//! models hold tch state that cannot be shared across threads directly.

use anyhow::{Context, Result};
use rust_bert::pipelines::sentence_embeddings::{
    SentenceEmbeddingsBuilder, SentenceEmbeddingsModelType,
};
use std::sync::OnceLock;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

struct EmbedRequest {
    texts: Vec<String>,
    reply: oneshot::Sender<Result<Vec<Vec<f32>>>>,
}

/// Handle to the embedding worker thread. Cheap to share; the underlying
/// model is initialized at most once.
pub struct Embedder {
    tx: mpsc::UnboundedSender<EmbedRequest>,
}

static EMBEDDER: OnceLock<Embedder> = OnceLock::new();

impl Embedder {
    /// Process-wide singleton, spawned lazily on first use.
    pub fn global() -> &'static Embedder {
        EMBEDDER.get_or_init(Embedder::spawn)
    }

    fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EmbedRequest>();

        std::thread::spawn(move || {
            info!("Loading sentence embedding model (all-MiniLM-L6-v2)");
            let model = SentenceEmbeddingsBuilder::remote(SentenceEmbeddingsModelType::AllMiniLmL6V2)
                .create_model();

            match &model {
                Ok(_) => info!("Embedding model loaded"),
                Err(e) => warn!("Embedding model failed to load: {}", e),
            }

            while let Some(request) = rx.blocking_recv() {
                let result = match &model {
                    Ok(model) => model
                        .encode(&request.texts)
                        .context("Failed to encode texts"),
                    Err(e) => Err(anyhow::anyhow!("Embedding model unavailable: {}", e)),
                };
                let _ = request.reply.send(result);
            }
        });

        Self { tx }
    }

    pub async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(EmbedRequest { texts, reply })
            .map_err(|_| anyhow::anyhow!("Embedding worker is gone"))?;
        response
            .await
            .context("Embedding worker dropped the request")?
    }
}

/// Score a candidate text against the reference profile. Fails closed: any
/// embedding error yields 0 rather than propagating.
pub async fn score(reference: &str, candidate: &str) -> u8 {
    match try_score(reference, candidate).await {
        Ok(score) => score,
        Err(e) => {
            warn!("Similarity scoring failed, defaulting to 0: {:#}", e);
            0
        }
    }
}

async fn try_score(reference: &str, candidate: &str) -> Result<u8> {
    let embeddings = Embedder::global()
        .embed(vec![reference.to_string(), candidate.to_string()])
        .await?;

    anyhow::ensure!(embeddings.len() == 2, "Expected two embeddings");

    let similarity = cosine_similarity(&embeddings[0], &embeddings[1]);
    Ok(to_percentage(similarity))
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn to_percentage(similarity: f32) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
