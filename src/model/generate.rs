//! Character-level text generation with a recurrent model.
//!
//! The model sees the seed text once, then one sampled character at a time. Its
//! recurrent state is reset before every run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{InkpadError, InkpadResult},
    model::ModelHandle,
    tensor::Tensor,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Number of characters to produce after the seed.
    pub length: usize,
    /// Logits are divided by this before sampling; higher is more surprising.
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            length: 400,
            temperature: 0.1,
        }
    }
}

/// Vocabulary indices of the characters in `text`; unknown characters are skipped.
pub fn encode(vocabulary: &[char], text: &str) -> Vec<usize> {
    text.chars()
        .filter_map(|c| vocabulary.iter().position(|&v| v == c))
        .collect()
}

/// Draws one index from `softmax(logits / temperature)`.
pub fn sample_logits(
    logits: &[f32],
    temperature: f32,
    rng: &mut impl Rng,
) -> InkpadResult<usize> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(InkpadError::validation(
            "temperature must be finite and positive",
        ));
    }
    let max = logits
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        return Err(InkpadError::model("no finite logits to sample from"));
    }

    let weights: Vec<f32> = logits
        .iter()
        .map(|&l| {
            if l.is_nan() {
                0.0
            } else {
                ((l - max) / temperature).exp()
            }
        })
        .collect();
    let total: f32 = weights.iter().sum();

    let mut target = rng.r#gen::<f32>() * total;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return Ok(i);
        }
        target -= w;
        last_positive = i;
    }
    Ok(last_positive)
}

/// Continues `seed` by `opts.length` sampled characters.
///
/// The model takes a `[1, T]` tensor of vocabulary indices and returns logits shaped
/// `[1, T, V]` (or `[1, V]`); the last `V` values are the next-character logits.
#[tracing::instrument(skip(model, vocabulary, rng), fields(vocab = vocabulary.len()))]
pub fn generate_text(
    model: &mut ModelHandle,
    vocabulary: &[char],
    seed: &str,
    opts: &GenerateOptions,
    rng: &mut impl Rng,
) -> InkpadResult<String> {
    let indices = encode(vocabulary, seed);
    if indices.is_empty() {
        return Err(InkpadError::invalid_input(
            "seed text has no characters from the vocabulary",
        ));
    }

    model.reset_state();
    let mut input = Tensor::new(
        vec![1, indices.len()],
        indices.iter().map(|&i| i as f32).collect(),
    )?;

    let mut generated = String::with_capacity(opts.length);
    for _ in 0..opts.length {
        let output = model.predict(&input)?;
        let v = vocabulary.len();
        if output.len() < v || output.shape().last() != Some(&v) {
            return Err(InkpadError::model(format!(
                "model output {:?} does not end in the vocabulary size {v}",
                output.shape()
            )));
        }
        let logits = &output.data()[output.len() - v..];
        let next = sample_logits(logits, opts.temperature, rng)?;
        generated.push(vocabulary[next]);
        input = Tensor::new(vec![1, 1], vec![next as f32])?;
    }
    tracing::debug!(chars = generated.len(), "generated");
    Ok(format!("{seed}{generated}"))
}
