//! Train/test splitting and K-fold cross-validation indices.

use crate::utils::error::{RegressionError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    /// 測試集在原始資料中的列索引
    pub test_indices: Vec<usize>,
}

/// 依比例計算 (n_train, n_test)，測試集大小向上取整
pub fn split_sizes(n_samples: usize, test_size: f64) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(RegressionError::InvalidConfigValueError {
            field: "test_size".to_string(),
            value: test_size.to_string(),
            reason: "test_size must be strictly between 0 and 1".to_string(),
        });
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);

    if n_test == 0 || n_train == 0 {
        return Err(RegressionError::EmptyDataset {
            message: format!(
                "splitting {} samples with test_size={} leaves n_train={}, n_test={}",
                n_samples, test_size, n_train, n_test
            ),
        });
    }

    Ok((n_train, n_test))
}

pub fn shuffled_indices(n_samples: usize, random_state: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(random_state);
    indices.shuffle(&mut rng);
    indices
}

/// Shuffles rows with a seeded RNG and splits them into train and test sets.
pub fn train_test_split(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    test_size: f64,
    random_state: u64,
) -> Result<TrainTestSplit> {
    let n_samples = x.nrows();
    if n_samples != y.len() {
        return Err(RegressionError::ShapeMismatch {
            message: format!(
                "X has {} rows but y has {} values",
                n_samples,
                y.len()
            ),
        });
    }

    let (n_train, _) = split_sizes(n_samples, test_size)?;
    let indices = shuffled_indices(n_samples, random_state);
    let (train_idx, test_idx) = indices.split_at(n_train);

    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
        test_indices: test_idx.to_vec(),
    })
}

/// K-Fold cross-validator over contiguous, unshuffled folds.
///
/// The first `n_samples % n_splits` folds receive one extra sample.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// 回傳每一折的 (train_indices, test_indices)
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(RegressionError::InvalidConfigValueError {
                field: "cv_folds".to_string(),
                value: self.n_splits.to_string(),
                reason: "K-fold cross-validation needs at least 2 folds".to_string(),
            });
        }
        if self.n_splits > n_samples {
            return Err(RegressionError::InvalidConfigValueError {
                field: "cv_folds".to_string(),
                value: self.n_splits.to_string(),
                reason: format!("cannot make more folds than samples ({})", n_samples),
            });
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let size = if i < remainder { fold_size + 1 } else { fold_size };
            let end = start + size;

            let test: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n_samples).collect();
            folds.push((train, test));

            start = end;
        }

        Ok(folds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn toy_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        let y = Array1::from_shape_fn(n, |i| i as f64);
        (x, y)
    }

    #[test]
    fn test_split_sizes_round_up_test_set() {
        assert_eq!(split_sizes(205, 0.1).unwrap(), (184, 21));
        assert_eq!(split_sizes(10, 0.25).unwrap(), (7, 3));
        assert!(split_sizes(1, 0.5).is_err());
        assert!(split_sizes(10, 0.0).is_err());
        assert!(split_sizes(10, 1.0).is_err());
    }

    #[test]
    fn test_train_test_split_shapes_and_rows() {
        let (x, y) = toy_data(20);
        let split = train_test_split(x.view(), y.view(), 0.1, 42).unwrap();

        assert_eq!(split.x_train.dim(), (18, 2));
        assert_eq!(split.x_test.dim(), (2, 2));
        assert_eq!(split.y_train.len(), 18);
        assert_eq!(split.y_test.len(), 2);

        // 每一列的 X 與 y 必須保持對齊
        for (row, &idx) in split.test_indices.iter().enumerate() {
            assert_eq!(split.y_test[row], idx as f64);
            assert_eq!(split.x_test[[row, 0]], (idx * 2) as f64);
        }
    }

    #[test]
    fn test_train_test_split_is_a_partition() {
        let (x, y) = toy_data(30);
        let split = train_test_split(x.view(), y.view(), 0.3, 7).unwrap();

        let mut all: Vec<usize> = split
            .y_train
            .iter()
            .chain(split.y_test.iter())
            .map(|v| *v as usize)
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_train_test_split_reproducible() {
        let (x, y) = toy_data(50);
        let a = train_test_split(x.view(), y.view(), 0.2, 42).unwrap();
        let b = train_test_split(x.view(), y.view(), 0.2, 42).unwrap();
        let c = train_test_split(x.view(), y.view(), 0.2, 43).unwrap();

        assert_eq!(a.test_indices, b.test_indices);
        assert_ne!(a.test_indices, c.test_indices);
    }

    #[test]
    fn test_train_test_split_shape_mismatch() {
        let (x, _) = toy_data(10);
        let y = Array1::zeros(9);
        assert!(matches!(
            train_test_split(x.view(), y.view(), 0.2, 42),
            Err(RegressionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_kfold_uneven_split() {
        let folds = KFold::new(3).split(10).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|(_, test)| test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        assert_eq!(folds[0].1, vec![0, 1, 2, 3]);
        assert_eq!(folds[1].0, vec![0, 1, 2, 3, 7, 8, 9]);
    }

    #[test]
    fn test_kfold_covers_every_sample_once() {
        let folds = KFold::new(5).split(23).unwrap();
        let mut seen: Vec<usize> = folds.iter().flat_map(|(_, test)| test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..23).collect::<Vec<_>>());

        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), 23);
        }
    }

    #[test]
    fn test_kfold_rejects_bad_fold_counts() {
        assert!(KFold::new(1).split(10).is_err());
        assert!(KFold::new(11).split(10).is_err());
    }
}
