// ============================================================
// Layer 4 — Episode Batcher
// ============================================================
// Turns an Episode into the flat tensors Model::apply expects.
//
//   examples: N rows of width W  →  Tensor [N·W]
//   inputs:   M rows of width V  →  Tensor [M·V]
//
// Rows are concatenated in order (row-major). The row counts
// travel next to the tensors because the tensors themselves
// no longer know them.

use burn::{prelude::*, tensor::TensorData};

use crate::domain::episode::Episode;

/// An episode ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct EpisodeBatch<B: Backend> {
    pub examples:     Tensor<B, 1>,
    pub inputs:       Tensor<B, 1>,
    pub num_examples: usize,
    pub num_inputs:   usize,
}

/// Holds the target device so tensors are created in the
/// right place.
#[derive(Clone, Debug)]
pub struct EpisodeBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> EpisodeBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    pub fn batch(&self, episode: &Episode) -> EpisodeBatch<B> {
        EpisodeBatch {
            examples:     self.flatten(&episode.examples),
            inputs:       self.flatten(&episode.inputs),
            num_examples: episode.num_examples(),
            num_inputs:   episode.num_inputs(),
        }
    }

    fn flatten(&self, rows: &[Vec<f32>]) -> Tensor<B, 1> {
        let values: Vec<f32> = rows.iter().flatten().copied().collect();
        let len = values.len();
        Tensor::from_data(TensorData::new(values, [len]), &self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_rows_are_concatenated_in_order() {
        let batcher = EpisodeBatcher::<TestBackend>::new(Default::default());
        let ep = Episode::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![5.0], vec![6.0], vec![7.0]],
        );
        let batch = batcher.batch(&ep);

        assert_eq!(batch.num_examples, 2);
        assert_eq!(batch.num_inputs, 3);
        assert_eq!(batch.examples.into_data().to_vec::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(batch.inputs.into_data().to_vec::<f32>().unwrap(), vec![5.0, 6.0, 7.0]);
    }
}
