//! Recurrent brain: a single tanh hidden layer fed by the inputs and by
//! its own previous activation.

use ndarray::{Array1, Array2};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::simulation::context::SimContext;

/// Mutation clamp for weights and biases.
const WEIGHT_BOUND: f32 = 3.0;

/// A recurrent network whose hidden state persists between ticks.
///
/// There is no lifetime learning for this variant; inheritance is purely
/// genetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrentBrain {
    /// Input -> hidden weights (`hidden` x `inputs`).
    pub w_input: Array2<f32>,
    /// Hidden(t-1) -> hidden(t) weights (`hidden` x `hidden`).
    pub w_recurrent: Array2<f32>,
    /// Hidden -> output weights (`outputs` x `hidden`); the output layer
    /// carries no bias.
    pub w_output: Array2<f32>,
    /// Hidden layer biases.
    pub b_hidden: Array1<f32>,
    /// Current hidden state; zeroed on clone.
    #[serde(skip)]
    hidden_state: Option<Array1<f32>>,
}

impl RecurrentBrain {
    /// Creates a brain with weights drawn from U[-1, 1] and a zero state.
    pub fn random(inputs: usize, hidden: usize, outputs: usize, ctx: &mut SimContext) -> Self {
        Self {
            w_input: Array2::from_shape_fn((hidden, inputs), |_| ctx.range(-1.0, 1.0)),
            w_recurrent: Array2::from_shape_fn((hidden, hidden), |_| ctx.range(-1.0, 1.0)),
            w_output: Array2::from_shape_fn((outputs, hidden), |_| ctx.range(-1.0, 1.0)),
            b_hidden: Array1::from_shape_fn(hidden, |_| ctx.range(-1.0, 1.0)),
            hidden_state: None,
        }
    }

    /// Number of inputs this brain accepts.
    pub fn input_size(&self) -> usize {
        self.w_input.ncols()
    }

    /// Number of outputs this brain produces.
    pub fn output_size(&self) -> usize {
        self.w_output.nrows()
    }

    /// Hidden layer width.
    pub fn hidden_size(&self) -> usize {
        self.b_hidden.len()
    }

    /// Forward pass: folds the previous hidden state into the new one.
    pub fn infer(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        let hidden = self.b_hidden.len();
        let previous = self
            .hidden_state
            .take()
            .unwrap_or_else(|| Array1::zeros(hidden));

        let mut state = self.w_input.dot(inputs);
        state += &self.w_recurrent.dot(&previous);
        state += &self.b_hidden;
        state.mapv_inplace(f32::tanh);

        let mut output = self.w_output.dot(&state);
        output.mapv_inplace(f32::tanh);

        self.hidden_state = Some(state);
        output
    }

    /// Zeroes the hidden state.
    pub fn reset_state(&mut self) {
        self.hidden_state = None;
    }

    /// Per-parameter Bernoulli mutation with Gaussian noise.
    pub fn mutate(&mut self, rate: f32, strength: f32, ctx: &mut SimContext) {
        let Ok(noise) = Normal::new(0.0_f32, strength.max(0.0)) else {
            return;
        };
        for w in self
            .w_input
            .iter_mut()
            .chain(self.w_recurrent.iter_mut())
            .chain(self.w_output.iter_mut())
            .chain(self.b_hidden.iter_mut())
        {
            if ctx.chance(rate) {
                *w = (*w + noise.sample(&mut ctx.rng)).clamp(-WEIGHT_BOUND, WEIGHT_BOUND);
            }
        }
    }

    /// Uniform per-parameter coin-flip inheritance. The child starts with
    /// a zero hidden state.
    pub fn crossover(a: &RecurrentBrain, b: &RecurrentBrain, ctx: &mut SimContext) -> RecurrentBrain {
        let mut child = a.clone();
        child.reset_state();
        for (w, other) in child
            .w_input
            .iter_mut()
            .chain(child.w_recurrent.iter_mut())
            .chain(child.w_output.iter_mut())
            .chain(child.b_hidden.iter_mut())
            .zip(
                b.w_input
                    .iter()
                    .chain(b.w_recurrent.iter())
                    .chain(b.w_output.iter())
                    .chain(b.b_hidden.iter()),
            )
        {
            if ctx.coin() {
                *w = *other;
            }
        }
        child
    }
}
