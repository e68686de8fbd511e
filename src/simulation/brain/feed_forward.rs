//! Fixed-topology feed-forward brain with optional lifetime learning.

use ndarray::{Array1, Array2, Axis};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::simulation::context::SimContext;

/// Mutation clamp for weights and biases.
const WEIGHT_BOUND: f32 = 3.0;
/// Looser clamp applied after reward-driven updates.
const LEARNED_WEIGHT_BOUND: f32 = 5.0;

/// A dense input -> hidden -> output network with tanh activations.
///
/// The forward pass caches its activations so that a later reward signal
/// can run one step of backpropagation against a reward-biased target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedForwardBrain {
    /// Hidden layer weights (`hidden` x `inputs`).
    pub w_hidden: Array2<f32>,
    /// Hidden layer biases.
    pub b_hidden: Array1<f32>,
    /// Output layer weights (`outputs` x `hidden`).
    pub w_output: Array2<f32>,
    /// Output layer biases.
    pub b_output: Array1<f32>,
    #[serde(skip)]
    cached_inputs: Option<Array1<f32>>,
    #[serde(skip)]
    cached_hidden: Option<Array1<f32>>,
    #[serde(skip)]
    cached_output: Option<Array1<f32>>,
}

impl FeedForwardBrain {
    /// Creates a brain with weights and biases drawn from U[-1, 1].
    pub fn random(inputs: usize, hidden: usize, outputs: usize, ctx: &mut SimContext) -> Self {
        Self {
            w_hidden: Array2::from_shape_fn((hidden, inputs), |_| ctx.range(-1.0, 1.0)),
            b_hidden: Array1::from_shape_fn(hidden, |_| ctx.range(-1.0, 1.0)),
            w_output: Array2::from_shape_fn((outputs, hidden), |_| ctx.range(-1.0, 1.0)),
            b_output: Array1::from_shape_fn(outputs, |_| ctx.range(-1.0, 1.0)),
            cached_inputs: None,
            cached_hidden: None,
            cached_output: None,
        }
    }

    /// Number of inputs this brain accepts.
    pub fn input_size(&self) -> usize {
        self.w_hidden.ncols()
    }

    /// Number of outputs this brain produces.
    pub fn output_size(&self) -> usize {
        self.w_output.nrows()
    }

    /// Hidden layer width.
    pub fn hidden_size(&self) -> usize {
        self.b_hidden.len()
    }

    /// Forward pass, caching activations for later learning.
    pub fn infer(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut hidden = self.w_hidden.dot(inputs);
        hidden += &self.b_hidden;
        hidden.mapv_inplace(f32::tanh);

        let mut output = self.w_output.dot(&hidden);
        output += &self.b_output;
        output.mapv_inplace(f32::tanh);

        self.cached_inputs = Some(inputs.clone());
        self.cached_hidden = Some(hidden);
        self.cached_output = Some(output.clone());
        output
    }

    /// Per-parameter Bernoulli mutation with Gaussian noise.
    pub fn mutate(&mut self, rate: f32, strength: f32, ctx: &mut SimContext) {
        let Ok(noise) = Normal::new(0.0_f32, strength.max(0.0)) else {
            return;
        };
        for w in self
            .w_hidden
            .iter_mut()
            .chain(self.b_hidden.iter_mut())
            .chain(self.w_output.iter_mut())
            .chain(self.b_output.iter_mut())
        {
            if ctx.chance(rate) {
                *w = (*w + noise.sample(&mut ctx.rng)).clamp(-WEIGHT_BOUND, WEIGHT_BOUND);
            }
        }
    }

    /// Uniform per-parameter coin-flip inheritance.
    pub fn crossover(a: &FeedForwardBrain, b: &FeedForwardBrain, ctx: &mut SimContext) -> FeedForwardBrain {
        let mut child = a.clone();
        child.reset_caches();
        for (w, other) in child
            .w_hidden
            .iter_mut()
            .chain(child.b_hidden.iter_mut())
            .chain(child.w_output.iter_mut())
            .chain(child.b_output.iter_mut())
            .zip(
                b.w_hidden
                    .iter()
                    .chain(b.b_hidden.iter())
                    .chain(b.w_output.iter())
                    .chain(b.b_output.iter()),
            )
        {
            if ctx.coin() {
                *w = *other;
            }
        }
        child
    }

    /// One step of reward-shaped backpropagation.
    ///
    /// Builds a target that pushes the cached outputs further in their own
    /// direction on positive reward (a larger step) and back on negative
    /// reward (a smaller step), then backpropagates the difference through
    /// the cached activations. A no-op until the first forward pass.
    pub fn learn_from_reward(&mut self, reward: f32, learning_rate: f32) {
        let (Some(inputs), Some(hidden), Some(output)) = (
            self.cached_inputs.as_ref(),
            self.cached_hidden.as_ref(),
            self.cached_output.as_ref(),
        ) else {
            return;
        };

        let step = if reward > 0.0 { 0.1 } else { 0.05 };
        let target = output.mapv(|o| (o + reward * step).clamp(-1.0, 1.0));

        // dE/dz for tanh outputs.
        let output_grad = (&target - output) * output.mapv(|o| 1.0 - o * o);
        let hidden_grad = self.w_output.t().dot(&output_grad) * hidden.mapv(|h| 1.0 - h * h);

        let out_delta = output_grad
            .view()
            .insert_axis(Axis(1))
            .dot(&hidden.view().insert_axis(Axis(0)));
        let hid_delta = hidden_grad
            .view()
            .insert_axis(Axis(1))
            .dot(&inputs.view().insert_axis(Axis(0)));

        self.w_output += &(out_delta * learning_rate);
        self.b_output += &(&output_grad * learning_rate);
        self.w_hidden += &(hid_delta * learning_rate);
        self.b_hidden += &(&hidden_grad * learning_rate);

        for w in self
            .w_hidden
            .iter_mut()
            .chain(self.b_hidden.iter_mut())
            .chain(self.w_output.iter_mut())
            .chain(self.b_output.iter_mut())
        {
            *w = w.clamp(-LEARNED_WEIGHT_BOUND, LEARNED_WEIGHT_BOUND);
        }
    }

    /// Drops the cached activations.
    pub fn reset_caches(&mut self) {
        self.cached_inputs = None;
        self.cached_hidden = None;
        self.cached_output = None;
    }

    /// Whether a forward pass has populated the learning caches.
    pub fn has_cached_pass(&self) -> bool {
        self.cached_output.is_some()
    }
}
