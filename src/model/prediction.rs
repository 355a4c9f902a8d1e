use serde::Serialize;

use crate::{
    foundation::error::{InkpadError, InkpadResult},
    tensor::Tensor,
};

/// Classification scores of one input, with the winning class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub probabilities: Vec<f32>,
    pub best: usize,
}

/// One bar of a probability chart; `value` is floored to one decimal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProbabilityBar {
    pub index: usize,
    pub value: f32,
}

impl Prediction {
    /// Reads a `[1, N]` (or `[N]`) output tensor.
    pub fn from_output(output: &Tensor) -> InkpadResult<Self> {
        let best = output
            .argmax()
            .ok_or_else(|| InkpadError::model("model output has no scores"))?;
        Ok(Self {
            probabilities: output.first_row().to_vec(),
            best,
        })
    }

    pub fn bars(&self) -> Vec<ProbabilityBar> {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(index, &p)| ProbabilityBar {
                index,
                value: (10.0 * p).floor() / 10.0,
            })
            .collect()
    }

    /// Runner-up classes: ranks 2 through `k + 1` by descending score.
    pub fn guesses(&self, k: usize) -> Vec<usize> {
        let mut ranked: Vec<usize> = (0..self.probabilities.len()).collect();
        ranked.sort_by(|&a, &b| {
            self.probabilities[b]
                .total_cmp(&self.probabilities[a])
                .then(a.cmp(&b))
        });
        ranked.into_iter().skip(1).take(k).collect()
    }

    pub fn label<'a>(&self, labels: &'a [String]) -> Option<&'a str> {
        labels.get(self.best).map(String::as_str)
    }
}
