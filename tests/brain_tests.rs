#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use vivarium::simulation::brain::{Brain, BrainKind};
use vivarium::simulation::context::SimContext;

const INPUTS: usize = 6;
const HIDDEN: usize = 8;
const OUTPUTS: usize = 2;

fn make(kind: BrainKind, ctx: &mut SimContext) -> Brain {
    Brain::random(kind, INPUTS, HIDDEN, OUTPUTS, ctx)
}

fn probe() -> Array1<f32> {
    Array1::from_vec(vec![0.5, 0.2, -0.3, 0.9, 0.0, -0.7])
}

/// Flattens a brain's heritable parameters for comparison.
fn parameters(brain: &Brain) -> Vec<f32> {
    match brain {
        Brain::FeedForward(b) => b
            .w_hidden
            .iter()
            .chain(b.b_hidden.iter())
            .chain(b.w_output.iter())
            .chain(b.b_output.iter())
            .copied()
            .collect(),
        Brain::Recurrent(b) => b
            .w_input
            .iter()
            .chain(b.w_recurrent.iter())
            .chain(b.w_output.iter())
            .chain(b.b_hidden.iter())
            .copied()
            .collect(),
        Brain::Neat(b) => b
            .genome
            .connections
            .iter()
            .map(|c| c.weight)
            .chain(b.genome.nodes.iter().map(|n| n.bias))
            .collect(),
    }
}

#[test]
fn test_infer_output_shape_and_bounds() {
    let mut ctx = SimContext::seeded(2);
    for kind in [BrainKind::FeedForward, BrainKind::Recurrent, BrainKind::Neat] {
        let mut brain = make(kind, &mut ctx);
        let out = brain.infer(&probe());
        assert_eq!(out.len(), OUTPUTS, "{:?}", kind);
        for v in out.iter() {
            assert!((-1.0..=1.0).contains(v), "{:?} output out of range", kind);
        }
    }
}

#[test]
fn test_duplicate_isolation() {
    let mut ctx = SimContext::seeded(3);
    for kind in [BrainKind::FeedForward, BrainKind::Recurrent, BrainKind::Neat] {
        let original = make(kind, &mut ctx);
        let before = parameters(&original);

        let mut copy = original.duplicate();
        copy.mutate(1.0, 1.0, &mut ctx);

        assert_eq!(
            before,
            parameters(&original),
            "{:?}: mutating a duplicate altered the original",
            kind
        );
    }
}

#[test]
fn test_mutate_zero_rate_is_identity() {
    let mut ctx = SimContext::seeded(4);
    for kind in [BrainKind::FeedForward, BrainKind::Recurrent, BrainKind::Neat] {
        let mut brain = make(kind, &mut ctx);
        let before = parameters(&brain);
        brain.mutate(0.0, 1.0, &mut ctx);
        assert_eq!(before, parameters(&brain), "{:?}", kind);
    }
}

#[test]
fn test_mutate_zero_strength_touches_without_change() {
    // Every parameter is hit, but the noise has zero spread. Holds for the
    // dense variants; NEAT's strength axis is structural instead.
    let mut ctx = SimContext::seeded(5);
    for kind in [BrainKind::FeedForward, BrainKind::Recurrent] {
        let mut brain = make(kind, &mut ctx);
        let before = parameters(&brain);
        brain.mutate(1.0, 0.0, &mut ctx);
        assert_eq!(before, parameters(&brain), "{:?}", kind);
    }
}

#[test]
fn test_same_variant_crossover_mixes_parents() {
    let mut ctx = SimContext::seeded(6);
    let a = make(BrainKind::FeedForward, &mut ctx);
    let b = make(BrainKind::FeedForward, &mut ctx);

    let child = a.crossover(&b, &mut ctx);
    assert_eq!(child.kind(), BrainKind::FeedForward);

    let (pa, pb, pc) = (parameters(&a), parameters(&b), parameters(&child));
    assert_eq!(pc.len(), pa.len());
    let mut from_a = 0;
    let mut from_b = 0;
    for (i, value) in pc.iter().enumerate() {
        assert!(
            *value == pa[i] || *value == pb[i],
            "child parameter {i} came from neither parent"
        );
        if *value == pa[i] {
            from_a += 1;
        } else {
            from_b += 1;
        }
    }
    assert!(from_a > 0 && from_b > 0, "coin-flip inheritance never mixed");
}

#[test]
fn test_cross_variant_crossover_falls_back_to_parent_clone() {
    let mut saw_ff = false;
    let mut saw_neat = false;
    for seed in 0..50 {
        let mut ctx = SimContext::seeded(seed);
        let ff = make(BrainKind::FeedForward, &mut ctx);
        let neat = make(BrainKind::Neat, &mut ctx);

        let child = ff.crossover(&neat, &mut ctx);
        match child.kind() {
            BrainKind::FeedForward => saw_ff = true,
            BrainKind::Neat => saw_neat = true,
            BrainKind::Recurrent => panic!("hybrid child of a variant neither parent has"),
        }
    }
    assert!(saw_ff && saw_neat, "fallback should pick either parent");
}

#[test]
fn test_recurrent_duplicate_resets_state() {
    let mut ctx = SimContext::seeded(8);
    let mut original = make(BrainKind::Recurrent, &mut ctx);

    let first = original.infer(&probe());
    // Original now carries hidden state; a duplicate must start from zero
    // and reproduce the first-pass output exactly.
    let mut copy = original.duplicate();
    let copied_first = copy.infer(&probe());

    assert_eq!(first.to_vec(), copied_first.to_vec());
}

#[test]
fn test_learn_from_reward_is_noop_without_forward_pass() {
    let mut ctx = SimContext::seeded(9);
    let mut brain = make(BrainKind::FeedForward, &mut ctx);
    let before = parameters(&brain);

    brain.learn_from_reward(1.0, 0.1);
    assert_eq!(before, parameters(&brain));

    // Non-learning variants absorb the call at any time.
    let mut rnn = make(BrainKind::Recurrent, &mut ctx);
    let rnn_before = parameters(&rnn);
    rnn.infer(&probe());
    rnn.learn_from_reward(1.0, 0.1);
    assert_eq!(rnn_before, parameters(&rnn));

    let mut neat = make(BrainKind::Neat, &mut ctx);
    let neat_before = parameters(&neat);
    neat.infer(&probe());
    neat.learn_from_reward(1.0, 0.1);
    assert_eq!(neat_before, parameters(&neat));
}

#[test]
fn test_learn_from_reward_shifts_outputs_toward_reward() {
    let mut ctx = SimContext::seeded(10);
    let mut brain = make(BrainKind::FeedForward, &mut ctx);
    let input = probe();

    let initial: f32 = brain.infer(&input).iter().sum();
    for _ in 0..25 {
        brain.infer(&input);
        brain.learn_from_reward(1.0, 0.05);
    }
    let shifted: f32 = brain.infer(&input).iter().sum();

    assert!(
        shifted > initial,
        "positive reward should push outputs upward ({initial} -> {shifted})"
    );
}

#[test]
fn test_learn_from_reward_respects_weight_clamp() {
    let mut ctx = SimContext::seeded(11);
    let mut brain = make(BrainKind::FeedForward, &mut ctx);
    let input = probe();

    for _ in 0..500 {
        brain.infer(&input);
        brain.learn_from_reward(2.0, 0.5);
    }

    for w in parameters(&brain) {
        assert!(w.abs() <= 5.0, "learned weight escaped the clamp: {w}");
    }
}

#[test]
fn test_neat_crossover_keeps_kind_and_closure() {
    let mut ctx = SimContext::seeded(12);
    let mut a = make(BrainKind::Neat, &mut ctx);
    let b = make(BrainKind::Neat, &mut ctx);

    // Grow one parent so the genomes differ structurally.
    for _ in 0..20 {
        a.mutate(1.0, 0.5, &mut ctx);
    }

    let child = a.crossover(&b, &mut ctx);
    assert_eq!(child.kind(), BrainKind::Neat);
    let Brain::Neat(inner) = &child else {
        unreachable!()
    };
    assert!(inner.genome.validate_endpoints());
}
