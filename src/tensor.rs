use serde::{Deserialize, Serialize};

use crate::foundation::error::{InkpadError, InkpadResult};

/// Dense row-major `f32` tensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TensorRepr")]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Deserialize)]
struct TensorRepr {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl TryFrom<TensorRepr> for Tensor {
    type Error = InkpadError;

    fn try_from(repr: TensorRepr) -> Result<Self, Self::Error> {
        Tensor::new(repr.shape, repr.data)
    }
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> InkpadResult<Self> {
        let expected = element_count(&shape);
        if expected != data.len() {
            return Err(InkpadError::validation(format!(
                "tensor shape {shape:?} needs {expected} elements, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let n = element_count(&shape);
        Self {
            shape,
            data: vec![0.0; n],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn reshape(self, shape: Vec<usize>) -> InkpadResult<Self> {
        Self::new(shape, self.data)
    }

    pub fn get(&self, index: &[usize]) -> Option<f32> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        self.data.get(flat).copied()
    }

    /// Values of the first row along the last axis (`[1, N]` -> the `N` scores).
    pub fn first_row(&self) -> &[f32] {
        let n = self.shape.last().copied().unwrap_or(self.data.len());
        &self.data[..n.min(self.data.len())]
    }

    /// Index of the largest value in [`Tensor::first_row`]; ties resolve to the lowest index.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &v) in self.first_row().iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, b)| v > b) {
                best = Some((i, v));
            }
        }
        best.map(|(i, _)| i)
    }
}

fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_element_count() {
        assert!(Tensor::new(vec![2, 3], vec![0.0; 6]).is_ok());
        assert!(Tensor::new(vec![2, 3], vec![0.0; 5]).is_err());
    }

    #[test]
    fn get_uses_row_major_layout() {
        let t = Tensor::new(vec![2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(t.get(&[1, 0]), Some(3.0));
        assert_eq!(t.get(&[0, 2]), Some(2.0));
        assert_eq!(t.get(&[2, 0]), None);
        assert_eq!(t.get(&[0]), None);
    }

    #[test]
    fn reshape_keeps_data() {
        let t = Tensor::zeros(vec![28, 28]).reshape(vec![1, 28, 28, 1]).unwrap();
        assert_eq!(t.shape(), &[1, 28, 28, 1]);
        assert!(Tensor::zeros(vec![4]).reshape(vec![3]).is_err());
    }

    #[test]
    fn argmax_reads_first_row_and_prefers_lowest_index() {
        let t = Tensor::new(vec![2, 3], vec![0.1, 0.7, 0.7, 9.0, 9.0, 9.0]).unwrap();
        assert_eq!(t.argmax(), Some(1));
        assert_eq!(Tensor::zeros(vec![1, 0]).argmax(), None);
    }

    #[test]
    fn deserialize_checks_the_element_count() {
        let t: Tensor =
            serde_json::from_value(serde_json::json!({"shape": [1, 2], "data": [0.5, 1.0]}))
                .unwrap();
        assert_eq!(t.get(&[0, 1]), Some(1.0));

        let err = serde_json::from_value::<Tensor>(serde_json::json!({
            "shape": [2, 2],
            "data": [0.5, 1.0]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("needs 4 elements"));
    }
}
