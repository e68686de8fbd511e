//! NEAT genome representation and topology mutation operators.
//!
//! A genome is an ordered set of node genes and connection genes with
//! historical innovation markings. Crossover aligns parents by innovation
//! number; structural mutations register fresh innovations with the
//! process-wide [`InnovationRegistry`](super::context::InnovationRegistry).
//!
//! Invariant: every connection's endpoints resolve to a node in the
//! genome's node set. Crossover restores it by importing missing nodes from
//! the secondary parent; [`Genome::validate_endpoints`] re-checks it.

use serde::{Deserialize, Serialize};

use super::context::SimContext;

/// Role of a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    /// Input node; takes a sensor value verbatim.
    Sensor,
    /// Interior node created by splitting a connection.
    Hidden,
    /// Output node.
    Output,
}

/// A node gene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGene {
    /// Stable node id.
    pub id: u32,
    /// Node role.
    pub kind: NodeKind,
    /// Activation bias; unused for sensors.
    pub bias: f32,
    /// Layout x in [0, 1]; ordering proxy for feed-forward flow.
    pub x: f32,
    /// Layout y in [0, 1]; visualization only.
    pub y: f32,
}

/// A connection gene with its historical marking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionGene {
    /// Source node id.
    pub source: u32,
    /// Target node id.
    pub target: u32,
    /// Connection weight.
    pub weight: f32,
    /// Disabled connections are kept for history but not evaluated.
    pub enabled: bool,
    /// Innovation number shared by historically identical mutations.
    pub innovation: u32,
}

/// An evolving network topology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Genome {
    /// Node genes.
    pub nodes: Vec<NodeGene>,
    /// Connection genes.
    pub connections: Vec<ConnectionGene>,
}

impl Genome {
    /// Builds a starting genome: sensors at x = 0.1, outputs at x = 0.9,
    /// y evenly spaced, with ~50% of input/output pairs connected at
    /// weights drawn from U[-2, 2].
    pub fn initialize(inputs: usize, outputs: usize, ctx: &mut SimContext) -> Self {
        let mut genome = Genome::default();

        for i in 0..inputs {
            genome.nodes.push(NodeGene {
                id: i as u32,
                kind: NodeKind::Sensor,
                bias: ctx.range(-3.0, 3.0),
                x: 0.1,
                y: (i + 1) as f32 / (inputs + 1) as f32,
            });
        }
        for j in 0..outputs {
            genome.nodes.push(NodeGene {
                id: (inputs + j) as u32,
                kind: NodeKind::Output,
                bias: ctx.range(-3.0, 3.0),
                x: 0.9,
                y: (j + 1) as f32 / (outputs + 1) as f32,
            });
        }

        for i in 0..inputs {
            for j in 0..outputs {
                if ctx.chance(0.5) {
                    let source = i as u32;
                    let target = (inputs + j) as u32;
                    let innovation = ctx.innovations.innovation_for(source, target);
                    genome.connections.push(ConnectionGene {
                        source,
                        target,
                        weight: ctx.range(-2.0, 2.0),
                        enabled: true,
                        innovation,
                    });
                }
            }
        }

        genome
    }

    fn node(&self, id: u32) -> Option<&NodeGene> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn has_connection(&self, source: u32, target: u32) -> bool {
        self.connections
            .iter()
            .any(|c| c.source == source && c.target == target)
    }

    /// Per-connection weight mutation: at probability `rate`, 10% of hits
    /// replace the weight with U[-3, 3], the rest nudge by U[-power, power].
    /// Weights clamp to [-10, 10].
    pub fn mutate_weights(&mut self, rate: f32, power: f32, ctx: &mut SimContext) {
        for con in &mut self.connections {
            if ctx.chance(rate) {
                if ctx.chance(0.1) {
                    con.weight = ctx.range(-3.0, 3.0);
                } else {
                    con.weight += ctx.range(-power, power);
                }
                con.weight = con.weight.clamp(-10.0, 10.0);
            }
        }
    }

    /// At probability `rate`, tries to connect two nodes. Candidates must
    /// not both be outputs, not both be sensors, must flow left to right
    /// (source.x < target.x, which keeps the topology strictly
    /// feed-forward), and must not duplicate an existing connection.
    /// Gives up after a fixed retry budget.
    pub fn mutate_add_connection(&mut self, rate: f32, ctx: &mut SimContext) {
        if !ctx.chance(rate) || self.nodes.is_empty() {
            return;
        }

        for _ in 0..20 {
            let a = ctx.range(0.0, self.nodes.len() as f32) as usize;
            let b = ctx.range(0.0, self.nodes.len() as f32) as usize;
            let (a, b) = (
                &self.nodes[a.min(self.nodes.len() - 1)],
                &self.nodes[b.min(self.nodes.len() - 1)],
            );

            if a.kind == NodeKind::Output && b.kind == NodeKind::Output {
                continue;
            }
            if a.kind == NodeKind::Sensor && b.kind == NodeKind::Sensor {
                continue;
            }
            if a.x >= b.x {
                continue;
            }
            if self.has_connection(a.id, b.id) {
                continue;
            }

            let (source, target) = (a.id, b.id);
            let innovation = ctx.innovations.innovation_for(source, target);
            self.connections.push(ConnectionGene {
                source,
                target,
                weight: ctx.range(-2.0, 2.0),
                enabled: true,
                innovation,
            });
            return;
        }
    }

    /// At probability `rate`, splits a random enabled connection: the old
    /// connection is disabled, a hidden node appears at the midpoint of its
    /// endpoints (small y jitter), and two fresh connections take its place
    /// with weights 1.0 (in -> new) and the old weight (new -> out).
    pub fn mutate_add_node(&mut self, rate: f32, ctx: &mut SimContext) {
        if !ctx.chance(rate) || self.connections.is_empty() {
            return;
        }

        let mut picked = None;
        for _ in 0..10 {
            let idx = (ctx.range(0.0, self.connections.len() as f32) as usize)
                .min(self.connections.len() - 1);
            if self.connections[idx].enabled {
                picked = Some(idx);
                break;
            }
        }
        let Some(idx) = picked else { return };

        self.connections[idx].enabled = false;
        let source = self.connections[idx].source;
        let target = self.connections[idx].target;
        let old_weight = self.connections[idx].weight;

        let (sx, sy) = self.node(source).map_or((0.0, 0.0), |n| (n.x, n.y));
        let (tx, ty) = self.node(target).map_or((1.0, 1.0), |n| (n.x, n.y));

        let new_id = ctx.innovations.fresh_node_id();
        let jitter = ctx.range(-0.1, 0.1);
        self.nodes.push(NodeGene {
            id: new_id,
            kind: NodeKind::Hidden,
            bias: ctx.range(-3.0, 3.0),
            x: (sx + tx) / 2.0,
            y: (sy + ty) / 2.0 + jitter,
        });

        let innov_in = ctx.innovations.innovation_for(source, new_id);
        self.connections.push(ConnectionGene {
            source,
            target: new_id,
            weight: 1.0,
            enabled: true,
            innovation: innov_in,
        });
        let innov_out = ctx.innovations.innovation_for(new_id, target);
        self.connections.push(ConnectionGene {
            source: new_id,
            target,
            weight: old_weight,
            enabled: true,
            innovation: innov_out,
        });
    }

    /// Innovation-aligned crossover. `mom` is the not-less-fit parent: the
    /// child inherits all of mom's nodes, matching innovations pick either
    /// parent 50/50, disjoint and excess genes from mom are inherited, and
    /// disjoint genes from dad are discarded. Any connection endpoint not
    /// among the inherited nodes is imported from dad afterwards, so no
    /// connection ever dangles.
    pub fn crossover(mom: &Genome, dad: &Genome, ctx: &mut SimContext) -> Genome {
        let mut child = Genome {
            nodes: mom.nodes.clone(),
            connections: Vec::with_capacity(mom.connections.len()),
        };

        let mut mom_genes = mom.connections.clone();
        let mut dad_genes = dad.connections.clone();
        mom_genes.sort_by_key(|c| c.innovation);
        dad_genes.sort_by_key(|c| c.innovation);

        let (mut m, mut d) = (0, 0);
        while m < mom_genes.len() && d < dad_genes.len() {
            if mom_genes[m].innovation == dad_genes[d].innovation {
                let gene = if ctx.coin() {
                    mom_genes[m].clone()
                } else {
                    dad_genes[d].clone()
                };
                child.connections.push(gene);
                m += 1;
                d += 1;
            } else if mom_genes[m].innovation < dad_genes[d].innovation {
                child.connections.push(mom_genes[m].clone());
                m += 1;
            } else {
                d += 1;
            }
        }
        while m < mom_genes.len() {
            child.connections.push(mom_genes[m].clone());
            m += 1;
        }

        // A matching gene taken from dad can reference a node mom never
        // had. Import those nodes so every endpoint resolves.
        for i in 0..child.connections.len() {
            for endpoint in [child.connections[i].source, child.connections[i].target] {
                if child.node(endpoint).is_none() {
                    if let Some(node) = dad.node(endpoint) {
                        child.nodes.push(node.clone());
                    }
                }
            }
        }

        child
    }

    /// Checks that every connection endpoint resolves to a node.
    pub fn validate_endpoints(&self) -> bool {
        self.connections
            .iter()
            .all(|c| self.node(c.source).is_some() && self.node(c.target).is_some())
    }

    /// Node ids in evaluation order: sensors, then hidden, then outputs,
    /// ties broken by id. Valid as a topological order only while layout
    /// x-coordinates reflect dependency depth.
    pub fn evaluation_order(&self) -> Vec<u32> {
        let mut order: Vec<&NodeGene> = self.nodes.iter().collect();
        order.sort_by(|a, b| a.kind.cmp(&b.kind).then(a.id.cmp(&b.id)));
        order.iter().map(|n| n.id).collect()
    }

    /// Counts enabled connections whose source does not precede its target
    /// in [`evaluation_order`](Self::evaluation_order). The single-pass
    /// evaluator reads stale values across such edges; the y-jittered node
    /// splits cannot introduce them, but x-coordinate inversions between
    /// hidden nodes could. Callers log a warning instead of repairing.
    pub fn feed_forward_order_violations(&self) -> usize {
        let order = self.evaluation_order();
        let rank = |id: u32| order.iter().position(|&n| n == id);
        self.connections
            .iter()
            .filter(|c| c.enabled)
            .filter(|c| match (rank(c.source), rank(c.target)) {
                (Some(s), Some(t)) => s >= t,
                _ => true,
            })
            .count()
    }
}
