//! Two-level branch predictor.
//!
//! Combines a [`Bht`] for direction with a [`Btb`] for targets. A prediction is
//! made when a branch is fetched and verified when it executes:
//! 1. **Predict:** Ask the BHT for a direction and the BTB for a target. Both are
//!    recorded even when only one of them will matter.
//! 2. **Verify:** Train the BHT, classify the outcome, train the BTB when a taken
//!    branch had no usable target, and charge the flush penalty on a misprediction.

use serde::Serialize;
use tracing::debug;

use super::bht::Bht;
use super::btb::Btb;
use crate::common::Cycles;
use crate::config::BranchConfig;
use crate::core::timing::{FlushPolicy, LatencyLog};

/// Direction and target predicted for one branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prediction {
    /// Predicted direction.
    pub taken: bool,
    /// Target found in the BTB, if any.
    pub target: Option<u64>,
}

/// How a verified prediction turned out. Every branch lands in exactly one class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Predicted taken with a BTB target, taken, target correct.
    BtbHitCorrectTarget,
    /// Predicted taken with a BTB target, taken, target wrong.
    BtbHitWrongTarget,
    /// Predicted taken with a BTB target, but not taken.
    BtbHitWrongDirection,
    /// Predicted taken without a target, and taken.
    BtbMissTaken,
    /// Predicted taken without a target, and not taken. No redirect happened.
    BtbMissNotTaken,
    /// Predicted not taken, and not taken.
    NotTakenCorrect,
    /// Predicted not taken, but taken.
    NotTakenIncorrect,
}

impl Outcome {
    /// Classifies a prediction against the actual outcome.
    pub fn classify(prediction: Prediction, taken: bool, target: u64) -> Self {
        match (prediction.taken, prediction.target, taken) {
            (true, Some(predicted), true) if predicted == target => Self::BtbHitCorrectTarget,
            (true, Some(_), true) => Self::BtbHitWrongTarget,
            (true, Some(_), false) => Self::BtbHitWrongDirection,
            (true, None, true) => Self::BtbMissTaken,
            (true, None, false) => Self::BtbMissNotTaken,
            (false, _, false) => Self::NotTakenCorrect,
            (false, _, true) => Self::NotTakenIncorrect,
        }
    }

    /// Returns `true` if fetch went down the wrong path.
    pub const fn is_mispredict(self) -> bool {
        !matches!(
            self,
            Self::BtbHitCorrectTarget | Self::BtbMissNotTaken | Self::NotTakenCorrect
        )
    }

    /// Returns `true` if the predicted direction was right.
    pub const fn direction_correct(self) -> bool {
        matches!(
            self,
            Self::BtbHitCorrectTarget
                | Self::BtbHitWrongTarget
                | Self::BtbMissTaken
                | Self::NotTakenCorrect
        )
    }
}

/// Counters of every prediction and how it was verified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BranchStats {
    /// Predictions made.
    pub predictions: u64,
    /// Predictions verified.
    pub verified: u64,
    /// Predicted taken.
    pub predicted_taken: u64,
    /// Predicted taken and the BTB supplied a target.
    pub btb_hits: u64,
    /// See [`Outcome::BtbHitCorrectTarget`].
    pub btb_hit_correct_target: u64,
    /// See [`Outcome::BtbHitWrongTarget`].
    pub btb_hit_wrong_target: u64,
    /// See [`Outcome::BtbHitWrongDirection`].
    pub btb_hit_wrong_direction: u64,
    /// See [`Outcome::BtbMissTaken`].
    pub btb_miss_taken: u64,
    /// See [`Outcome::BtbMissNotTaken`].
    pub btb_miss_not_taken: u64,
    /// See [`Outcome::NotTakenCorrect`].
    pub not_taken_correct: u64,
    /// See [`Outcome::NotTakenIncorrect`].
    pub not_taken_incorrect: u64,
}

impl BranchStats {
    fn record(&mut self, outcome: Outcome) {
        self.verified += 1;
        let counter = match outcome {
            Outcome::BtbHitCorrectTarget => &mut self.btb_hit_correct_target,
            Outcome::BtbHitWrongTarget => &mut self.btb_hit_wrong_target,
            Outcome::BtbHitWrongDirection => &mut self.btb_hit_wrong_direction,
            Outcome::BtbMissTaken => &mut self.btb_miss_taken,
            Outcome::BtbMissNotTaken => &mut self.btb_miss_not_taken,
            Outcome::NotTakenCorrect => &mut self.not_taken_correct,
            Outcome::NotTakenIncorrect => &mut self.not_taken_incorrect,
        };
        *counter += 1;
    }

    /// Predictions whose direction was right.
    pub const fn correct_direction(&self) -> u64 {
        self.btb_hit_correct_target + self.btb_hit_wrong_target + self.btb_miss_taken + self.not_taken_correct
    }

    /// Predictions that did not redirect fetch down a wrong path.
    pub const fn correct(&self) -> u64 {
        self.btb_hit_correct_target + self.btb_miss_not_taken + self.not_taken_correct
    }

    /// Predictions that did.
    pub const fn mispredictions(&self) -> u64 {
        self.verified - self.correct()
    }

    /// Predictions whose direction was wrong, whether or not fetch was redirected.
    pub const fn direction_mispredictions(&self) -> u64 {
        self.btb_hit_wrong_direction + self.btb_miss_not_taken + self.not_taken_incorrect
    }
}

/// BHT + BTB predictor with misprediction accounting.
#[derive(Debug)]
pub struct BranchPredictor {
    bht: Bht,
    btb: Btb,
    flush: Option<Box<dyn FlushPolicy>>,
    penalty: Cycles,
    stats: BranchStats,
    latency: LatencyLog,
    last: Option<Prediction>,
}

impl BranchPredictor {
    /// Creates a predictor with empty tables.
    ///
    /// # Arguments
    ///
    /// * `config` - Table geometry and misprediction penalty.
    /// * `flush` - Policy charged on every misprediction, or `None` to only log.
    pub fn new(config: &BranchConfig, flush: Option<Box<dyn FlushPolicy>>) -> Self {
        let penalty = flush
            .as_ref()
            .map_or(config.mispredict_penalty, |policy| policy.penalty());
        Self {
            bht: Bht::new(config.bht_size),
            btb: Btb::new(config.btb_sets, config.btb_ways),
            flush,
            penalty,
            stats: BranchStats::default(),
            latency: LatencyLog::default(),
            last: None,
        }
    }

    /// Predicts the branch at `pc`.
    ///
    /// The prediction is also kept for a following [`BranchPredictor::update_and_verify`].
    pub fn predict(&mut self, pc: u64) -> Prediction {
        let prediction = Prediction {
            taken: self.bht.predict(pc),
            target: self.btb.lookup(pc),
        };
        self.stats.predictions += 1;
        if prediction.taken {
            self.stats.predicted_taken += 1;
            if prediction.target.is_some() {
                self.stats.btb_hits += 1;
            }
        }
        self.last = Some(prediction);
        prediction
    }

    /// Verifies the most recent prediction against the actual outcome.
    ///
    /// # Panics
    ///
    /// Panics if no prediction has been made.
    pub fn update_and_verify(&mut self, pc: u64, taken: bool, target: u64) -> Outcome {
        let Some(prediction) = self.last.take() else {
            panic!("branch at {pc:#x} verified without a prediction");
        };
        self.resolve(pc, prediction, taken, target)
    }

    /// Verifies `prediction` for the branch at `pc` against the actual outcome.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch.
    /// * `prediction` - What [`BranchPredictor::predict`] returned when it was fetched.
    /// * `taken` - Actual direction.
    /// * `target` - Actual target (only meaningful when taken).
    ///
    /// # Returns
    ///
    /// The outcome class the branch was counted under.
    pub fn resolve(&mut self, pc: u64, prediction: Prediction, taken: bool, target: u64) -> Outcome {
        self.bht.update(pc, taken);

        let outcome = Outcome::classify(prediction, taken, target);
        self.stats.record(outcome);

        if taken && (outcome.is_mispredict() || prediction.target.is_none()) {
            self.btb.update(pc, target);
        }

        if outcome.is_mispredict() {
            debug!(pc, ?outcome, penalty = self.penalty, "branch mispredicted");
            if let Some(policy) = &self.flush {
                policy.flush();
            }
            self.latency.update(self.penalty);
        }
        outcome
    }

    /// Prediction and outcome counters.
    pub const fn stats(&self) -> &BranchStats {
        &self.stats
    }

    /// Cycles charged for mispredictions.
    pub const fn latency(&self) -> &LatencyLog {
        &self.latency
    }

    /// The direction table.
    pub const fn bht(&self) -> &Bht {
        &self.bht
    }
}
