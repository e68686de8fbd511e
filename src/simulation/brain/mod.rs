//! Neural controllers for agents.
//!
//! Three interchangeable representations sit behind one enum: a
//! fixed-topology feed-forward network, a recurrent network, and a
//! NEAT-style evolving topology. All variants support inference, in-place
//! mutation, sexual crossover and deep cloning; lifetime reward learning is
//! a feed-forward capability and a no-op elsewhere.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use super::genome::NodeKind;

pub mod feed_forward;
pub mod neat;
pub mod recurrent;

pub use feed_forward::FeedForwardBrain;
pub use neat::NeatBrain;
pub use recurrent::RecurrentBrain;

/// Mutation intensity applied when crossing brains of different variants.
const HYBRID_MUTATION_RATE: f32 = 0.5;
/// Mutation noise applied when crossing brains of different variants.
const HYBRID_MUTATION_POWER: f32 = 0.5;

/// Discriminant for the brain representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrainKind {
    /// Fixed-topology feed-forward network.
    FeedForward,
    /// Recurrent network with persistent hidden state.
    Recurrent,
    /// NEAT evolving-topology network.
    Neat,
}

impl BrainKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            BrainKind::FeedForward => "FeedForward",
            BrainKind::Recurrent => "Recurrent",
            BrainKind::Neat => "NEAT",
        }
    }
}

/// Node category in a rendered topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutNodeKind {
    /// Input node.
    Input,
    /// Interior node.
    Hidden,
    /// Output node.
    Output,
}

/// A positioned node in a rendered topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Position within the requested region.
    pub x: f32,
    /// Position within the requested region.
    pub y: f32,
    /// Node category.
    pub kind: LayoutNodeKind,
}

/// A weighted link between two layout nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutLink {
    /// Index of the source node in [`BrainLayout::nodes`].
    pub from: usize,
    /// Index of the target node in [`BrainLayout::nodes`].
    pub to: usize,
    /// Connection weight.
    pub weight: f32,
}

/// Render-ready topology description for a brain.
///
/// This is the visualization hook: the simulation produces positions and
/// weighted links as plain data and never draws anything itself. The engine
/// is fully functional if no renderer ever asks for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrainLayout {
    /// Positioned nodes.
    pub nodes: Vec<LayoutNode>,
    /// Weighted links between nodes.
    pub links: Vec<LayoutLink>,
}

/// A neural controller in one of the three representations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Brain {
    /// Fixed-topology feed-forward network.
    FeedForward(FeedForwardBrain),
    /// Recurrent network.
    Recurrent(RecurrentBrain),
    /// NEAT evolving-topology network.
    Neat(NeatBrain),
}

impl Brain {
    /// Creates a random brain of the given kind.
    pub fn random(
        kind: BrainKind,
        inputs: usize,
        hidden: usize,
        outputs: usize,
        ctx: &mut SimContext,
    ) -> Self {
        match kind {
            BrainKind::FeedForward => {
                Brain::FeedForward(FeedForwardBrain::random(inputs, hidden, outputs, ctx))
            }
            BrainKind::Recurrent => {
                Brain::Recurrent(RecurrentBrain::random(inputs, hidden, outputs, ctx))
            }
            BrainKind::Neat => Brain::Neat(NeatBrain::random(inputs, outputs, ctx)),
        }
    }

    /// Which representation this brain uses.
    pub fn kind(&self) -> BrainKind {
        match self {
            Brain::FeedForward(_) => BrainKind::FeedForward,
            Brain::Recurrent(_) => BrainKind::Recurrent,
            Brain::Neat(_) => BrainKind::Neat,
        }
    }

    /// Number of inputs this brain accepts.
    pub fn input_size(&self) -> usize {
        match self {
            Brain::FeedForward(b) => b.input_size(),
            Brain::Recurrent(b) => b.input_size(),
            Brain::Neat(b) => b.input_size(),
        }
    }

    /// Number of outputs this brain produces.
    pub fn output_size(&self) -> usize {
        match self {
            Brain::FeedForward(b) => b.output_size(),
            Brain::Recurrent(b) => b.output_size(),
            Brain::Neat(b) => b.output_size(),
        }
    }

    /// Maps a sensor vector to tanh-bounded control outputs.
    pub fn infer(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        match self {
            Brain::FeedForward(b) => b.infer(inputs),
            Brain::Recurrent(b) => b.infer(inputs),
            Brain::Neat(b) => Array1::from_vec(b.infer(inputs.as_slice().unwrap_or(&[]))),
        }
    }

    /// In-place stochastic mutation.
    pub fn mutate(&mut self, rate: f32, strength: f32, ctx: &mut SimContext) {
        match self {
            Brain::FeedForward(b) => b.mutate(rate, strength, ctx),
            Brain::Recurrent(b) => b.mutate(rate, strength, ctx),
            Brain::Neat(b) => b.mutate(rate, strength, ctx),
        }
    }

    /// Sexual crossover. Same-variant parents mix per parameter (or per
    /// innovation-aligned gene for NEAT, with `self` as the not-less-fit
    /// parent). Parents of different variants cannot mix structurally: the
    /// child is a duplicate of either parent, chosen 50/50, with elevated
    /// mutation applied.
    pub fn crossover(&self, other: &Brain, ctx: &mut SimContext) -> Brain {
        match (self, other) {
            (Brain::FeedForward(a), Brain::FeedForward(b)) => {
                Brain::FeedForward(FeedForwardBrain::crossover(a, b, ctx))
            }
            (Brain::Recurrent(a), Brain::Recurrent(b)) => {
                Brain::Recurrent(RecurrentBrain::crossover(a, b, ctx))
            }
            (Brain::Neat(a), Brain::Neat(b)) => Brain::Neat(a.crossover(b, ctx)),
            _ => {
                let mut child = if ctx.coin() {
                    self.duplicate()
                } else {
                    other.duplicate()
                };
                child.mutate(HYBRID_MUTATION_RATE, HYBRID_MUTATION_POWER, ctx);
                child
            }
        }
    }

    /// Deep, independent copy with transient state zeroed: recurrent hidden
    /// state, feed-forward learning caches and the NEAT value buffer all
    /// start fresh.
    pub fn duplicate(&self) -> Brain {
        match self {
            Brain::FeedForward(b) => {
                let mut copy = b.clone();
                copy.reset_caches();
                Brain::FeedForward(copy)
            }
            Brain::Recurrent(b) => {
                let mut copy = b.clone();
                copy.reset_state();
                Brain::Recurrent(copy)
            }
            Brain::Neat(b) => Brain::Neat(b.duplicate()),
        }
    }

    /// Reward-driven weight adjustment; only the feed-forward variant
    /// learns during its lifetime, the others absorb the call.
    pub fn learn_from_reward(&mut self, reward: f32, learning_rate: f32) {
        if let Brain::FeedForward(b) = self {
            b.learn_from_reward(reward, learning_rate);
        }
    }

    /// Produces the topology layout for a `width` x `height` region.
    pub fn layout(&self, width: f32, height: f32) -> BrainLayout {
        match self {
            Brain::FeedForward(b) => layered_layout(
                &[b.input_size(), b.hidden_size(), b.output_size()],
                &[&b.w_hidden, &b.w_output],
                width,
                height,
            ),
            Brain::Recurrent(b) => layered_layout(
                &[b.input_size(), b.hidden_size(), b.output_size()],
                &[&b.w_input, &b.w_output],
                width,
                height,
            ),
            Brain::Neat(b) => {
                let mut layout = BrainLayout::default();
                let index_of: std::collections::HashMap<u32, usize> = b
                    .genome
                    .nodes
                    .iter()
                    .enumerate()
                    .map(|(i, n)| (n.id, i))
                    .collect();
                for node in &b.genome.nodes {
                    layout.nodes.push(LayoutNode {
                        x: node.x * width,
                        y: node.y.clamp(0.0, 1.0) * height,
                        kind: match node.kind {
                            NodeKind::Sensor => LayoutNodeKind::Input,
                            NodeKind::Hidden => LayoutNodeKind::Hidden,
                            NodeKind::Output => LayoutNodeKind::Output,
                        },
                    });
                }
                for con in &b.genome.connections {
                    if !con.enabled {
                        continue;
                    }
                    if let (Some(&from), Some(&to)) =
                        (index_of.get(&con.source), index_of.get(&con.target))
                    {
                        layout.links.push(LayoutLink {
                            from,
                            to,
                            weight: con.weight,
                        });
                    }
                }
                layout
            }
        }
    }
}

/// Lays out a dense layered network left to right across the region.
fn layered_layout(
    layer_sizes: &[usize],
    weights: &[&ndarray::Array2<f32>],
    width: f32,
    height: f32,
) -> BrainLayout {
    let mut layout = BrainLayout::default();
    let mut layer_start = Vec::with_capacity(layer_sizes.len());
    let layers = layer_sizes.len();

    for (li, &count) in layer_sizes.iter().enumerate() {
        layer_start.push(layout.nodes.len());
        let x = width * (li as f32 + 0.5) / layers as f32;
        for ni in 0..count {
            let y = height * (ni as f32 + 1.0) / (count as f32 + 1.0);
            layout.nodes.push(LayoutNode {
                x,
                y,
                kind: if li == 0 {
                    LayoutNodeKind::Input
                } else if li + 1 == layers {
                    LayoutNodeKind::Output
                } else {
                    LayoutNodeKind::Hidden
                },
            });
        }
    }

    for (li, matrix) in weights.iter().enumerate() {
        for ((row, col), &w) in matrix.indexed_iter() {
            layout.links.push(LayoutLink {
                from: layer_start[li] + col,
                to: layer_start[li + 1] + row,
                weight: w,
            });
        }
    }

    layout
}
