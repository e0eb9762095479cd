// ============================================================
// Layer 3 — Episode Domain Type
// ============================================================
// One few-shot episode: a handful of example rows that all
// depict the same class, plus the query rows to be scored
// against that class.
//
// Rows are plain f32 vectors. By the time an Episode exists
// the pixels have already been flattened and normalised by
// whoever produced the file.
//
// Example (JSON):
//   {
//     "examples": [[0.0, 1.0], [0.5, 0.5]],
//     "inputs":   [[1.0, 0.0]]
//   }

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A support set (`examples`) and a query set (`inputs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Rows showing the class being taught
    pub examples: Vec<Vec<f32>>,

    /// Rows to classify against the examples
    pub inputs: Vec<Vec<f32>>,
}

impl Episode {
    pub fn new(examples: Vec<Vec<f32>>, inputs: Vec<Vec<f32>>) -> Self {
        Self { examples, inputs }
    }

    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Width of one example row. Zero when there are no examples.
    pub fn example_width(&self) -> usize {
        self.examples.first().map_or(0, Vec::len)
    }

    /// Width of one query row. Zero when there are no inputs.
    pub fn input_width(&self) -> usize {
        self.inputs.first().map_or(0, Vec::len)
    }

    /// Check the episode is well formed on its own: both sets
    /// non-empty, every row of a set the same width.
    ///
    /// Whether those widths fit a particular model is checked
    /// against its config (`FewShotConfig::check_episode`).
    pub fn validate(&self) -> Result<()> {
        if self.examples.is_empty() {
            bail!("episode has no example rows");
        }
        if self.inputs.is_empty() {
            bail!("episode has no input rows");
        }
        check_uniform("examples", &self.examples)?;
        check_uniform("inputs", &self.inputs)?;
        Ok(())
    }
}

fn check_uniform(name: &str, rows: &[Vec<f32>]) -> Result<()> {
    let width = rows[0].len();
    if width == 0 {
        bail!("{name} rows are empty");
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        bail!(
            "{name} row {i} has width {} but row 0 has width {width}",
            row.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_widths() {
        let ep = Episode::new(
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            vec![vec![0.0; 4]],
        );
        assert_eq!(ep.num_examples(), 2);
        assert_eq!(ep.num_inputs(), 1);
        assert_eq!(ep.example_width(), 3);
        assert_eq!(ep.input_width(), 4);
        assert!(ep.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_sets() {
        let no_examples = Episode::new(vec![], vec![vec![1.0]]);
        assert!(no_examples.validate().is_err());

        let no_inputs = Episode::new(vec![vec![1.0]], vec![]);
        assert!(no_inputs.validate().is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let ep = Episode::new(vec![vec![1.0, 2.0], vec![3.0]], vec![vec![1.0]]);
        let err = ep.validate().unwrap_err().to_string();
        assert!(err.contains("examples row 1"), "got: {err}");
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{ "examples": [[0.0, 1.0]], "inputs": [[1.0, 0.0], [0.5, 0.5]] }"#;
        let ep: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(ep.num_examples(), 1);
        assert_eq!(ep.num_inputs(), 2);
    }
}
