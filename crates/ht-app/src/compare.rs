//! Fixed-configuration comparison of labelled gain presets.

use ht_controls::ControllerGains;
use ht_sim::SimOptions;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::evaluate::evaluate;
use crate::metrics::Metrics;

/// A labelled gain triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub label: String,
}

impl Preset {
    pub fn new(kp: f64, ki: f64, kd: f64, label: impl Into<String>) -> Self {
        Self {
            kp,
            ki,
            kd,
            label: label.into(),
        }
    }

    pub fn gains(&self) -> ControllerGains {
        ControllerGains::new(self.kp, self.ki, self.kd)
    }
}

/// The reference set: each gain pushed too low and too high around (3.0, 0.5, 1.0).
pub fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new(1.0, 0.5, 1.0, "Kp too low"),
        Preset::new(5.0, 0.5, 1.0, "Kp too high"),
        Preset::new(3.0, 2.0, 1.0, "Ki too high"),
        Preset::new(3.0, 0.1, 1.0, "Ki too low"),
        Preset::new(3.0, 0.5, 0.1, "Kd too low"),
        Preset::new(3.0, 0.5, 5.0, "Kd too high"),
        Preset::new(3.0, 0.5, 1.0, "current configuration"),
    ]
}

/// One evaluated preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Position in the input list
    pub index: usize,
    /// 1-based rank by score; ties keep input order
    pub rank: usize,
    pub preset: Preset,
    pub metrics: Metrics,
}

impl RankedEntry {
    pub fn score(&self) -> f64 {
        self.metrics.score
    }
}

/// Result of comparing presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Entries in input order
    pub entries: Vec<RankedEntry>,
    /// Index (into `entries`) of the minimum score, first occurrence on ties
    pub best: usize,
}

impl Comparison {
    /// `None` only for a record whose `best` does not index `entries`.
    pub fn best_entry(&self) -> Option<&RankedEntry> {
        self.entries.get(self.best)
    }

    /// Entries sorted by rank.
    pub fn ranked(&self) -> Vec<&RankedEntry> {
        let mut sorted: Vec<&RankedEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.rank);
        sorted
    }
}

/// Evaluate every preset and rank them by score.
///
/// Presets are simulated in parallel; each run owns its own plant and
/// controller, and results are collected in input order.
///
/// # Errors
///
/// `InvalidInput` for an empty list; any simulation or scoring error.
pub fn compare(presets: &[Preset], opts: &SimOptions) -> AppResult<Comparison> {
    if presets.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one preset is required for a comparison".to_string(),
        ));
    }
    opts.validate()?;

    let metrics: Vec<Metrics> = presets
        .par_iter()
        .map(|preset| -> AppResult<Metrics> {
            let eval = evaluate(preset.gains(), opts)?;
            tracing::debug!(label = %preset.label, score = eval.metrics.score, "preset evaluated");
            Ok(eval.metrics)
        })
        .collect::<AppResult<Vec<_>>>()?;

    let mut order: Vec<usize> = (0..presets.len()).collect();
    // stable: equal scores keep input order
    order.sort_by(|&a, &b| metrics[a].score.total_cmp(&metrics[b].score));

    let mut ranks = vec![0; presets.len()];
    for (pos, &idx) in order.iter().enumerate() {
        ranks[idx] = pos + 1;
    }

    let mut best = 0;
    for (idx, m) in metrics.iter().enumerate() {
        if m.score < metrics[best].score {
            best = idx;
        }
    }

    let entries = presets
        .iter()
        .zip(metrics)
        .enumerate()
        .map(|(index, (preset, metrics))| RankedEntry {
            index,
            rank: ranks[index],
            preset: preset.clone(),
            metrics,
        })
        .collect();

    Ok(Comparison { entries, best })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_an_error() {
        let err = compare(&[], &SimOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn single_preset_is_best() {
        let c = compare(&[Preset::new(3.0, 0.5, 1.0, "only")], &SimOptions::default()).unwrap();
        assert_eq!(c.best, 0);
        assert_eq!(c.entries[0].rank, 1);
        assert_eq!(c.best_entry().map(|e| e.preset.label.as_str()), Some("only"));
    }

    #[test]
    fn best_entry_out_of_range_is_none() {
        let mut c = compare(&[Preset::new(3.0, 0.5, 1.0, "only")], &SimOptions::default()).unwrap();
        c.best = 5;
        assert!(c.best_entry().is_none());
    }

    #[test]
    fn default_presets_are_reference_set() {
        let presets = default_presets();
        assert_eq!(presets.len(), 7);
        assert_eq!(presets[6].gains(), ControllerGains::new(3.0, 0.5, 1.0));
    }
}
