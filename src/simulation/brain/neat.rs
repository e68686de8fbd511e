//! NEAT brain: an evolving-topology genome compiled into a flat evaluator.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::simulation::context::SimContext;
use crate::simulation::genome::{Genome, NodeKind};

/// One node of the compiled network.
#[derive(Debug, Clone, Default)]
struct CompiledNode {
    id: u32,
    kind: Option<NodeKind>,
    bias: f32,
    value: f32,
    /// (index into the compiled node list, weight) per incoming connection.
    incoming: Vec<(usize, f32)>,
}

/// A brain whose topology evolves through NEAT genome operators.
///
/// The genome is the heritable representation; inference runs on a compiled
/// node list rebuilt after every structural change. The compiled form is
/// transient and rebuilt on demand after deserialization or cloning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeatBrain {
    /// The heritable topology.
    pub genome: Genome,
    input_size: usize,
    output_size: usize,
    #[serde(skip)]
    compiled: Vec<CompiledNode>,
}

impl NeatBrain {
    /// Creates a brain with a freshly initialized genome.
    pub fn random(inputs: usize, outputs: usize, ctx: &mut SimContext) -> Self {
        let genome = Genome::initialize(inputs, outputs, ctx);
        Self::from_genome(genome, inputs, outputs)
    }

    /// Wraps an inherited genome.
    pub fn from_genome(genome: Genome, inputs: usize, outputs: usize) -> Self {
        let mut brain = Self {
            genome,
            input_size: inputs,
            output_size: outputs,
            compiled: Vec::new(),
        };
        brain.recompile();
        brain
    }

    /// Number of inputs this brain accepts.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Number of outputs this brain produces.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Rebuilds the flat evaluator from the genome.
    ///
    /// Nodes are laid out sensors -> hidden -> outputs (ties by id); one
    /// linear pass over that order evaluates the network, which is valid
    /// while the genome's left-to-right connection rule holds. An order
    /// violation is reported, not repaired.
    pub fn recompile(&mut self) {
        let order = self.genome.evaluation_order();
        let mut index_of: HashMap<u32, usize> = HashMap::with_capacity(order.len());

        self.compiled = order
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                index_of.insert(id, i);
                let gene = self.genome.nodes.iter().find(|n| n.id == id);
                CompiledNode {
                    id,
                    kind: gene.map(|n| n.kind),
                    bias: gene.map_or(0.0, |n| n.bias),
                    value: 0.0,
                    incoming: Vec::new(),
                }
            })
            .collect();

        for con in &self.genome.connections {
            if !con.enabled {
                continue;
            }
            let (Some(&src), Some(&dst)) = (index_of.get(&con.source), index_of.get(&con.target))
            else {
                continue;
            };
            self.compiled[dst].incoming.push((src, con.weight));
        }

        let violations = self.genome.feed_forward_order_violations();
        if violations > 0 {
            warn!(
                "neat genome evaluation order violated by {violations} connection(s); \
                 stale values will flow across them"
            );
        }
    }

    /// Single-pass inference over the compiled order.
    pub fn infer(&mut self, inputs: &[f32]) -> Vec<f32> {
        if self.compiled.is_empty() {
            self.recompile();
        }

        for node in &mut self.compiled {
            node.value = 0.0;
        }

        let mut next_input = 0;
        for node in &mut self.compiled {
            if node.kind == Some(NodeKind::Sensor) {
                if next_input < inputs.len() {
                    node.value = inputs[next_input];
                    next_input += 1;
                }
            }
        }

        for i in 0..self.compiled.len() {
            if self.compiled[i].kind == Some(NodeKind::Sensor) {
                continue;
            }
            let mut sum = self.compiled[i].bias;
            for &(src, weight) in &self.compiled[i].incoming {
                sum += self.compiled[src].value * weight;
            }
            self.compiled[i].value = sum.tanh();
        }

        let mut outputs: Vec<f32> = self
            .compiled
            .iter()
            .filter(|n| n.kind == Some(NodeKind::Output))
            .map(|n| n.value)
            .collect();
        outputs.resize(self.output_size, 0.0);
        outputs
    }

    /// NEAT mutation schedule: weights at 0.8 x rate (power 0.5), new
    /// connections at 0.05 x rate, node splits at 0.03 x rate. `strength`
    /// is unused; structural change is this variant's strength axis.
    pub fn mutate(&mut self, rate: f32, _strength: f32, ctx: &mut SimContext) {
        self.genome.mutate_weights(0.8 * rate, 0.5, ctx);
        self.genome.mutate_add_connection(0.05 * rate, ctx);
        self.genome.mutate_add_node(0.03 * rate, ctx);
        debug_assert!(self.genome.validate_endpoints());
        self.recompile();
    }

    /// Innovation-aligned crossover; `self` is the not-less-fit parent.
    pub fn crossover(&self, other: &NeatBrain, ctx: &mut SimContext) -> NeatBrain {
        let child = Genome::crossover(&self.genome, &other.genome, ctx);
        debug_assert!(child.validate_endpoints());
        NeatBrain::from_genome(child, self.input_size, self.output_size)
    }

    /// Deep copy with a fresh value buffer.
    pub fn duplicate(&self) -> NeatBrain {
        NeatBrain::from_genome(self.genome.clone(), self.input_size, self.output_size)
    }
}
