#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use vivarium::simulation::context::SimContext;
use vivarium::simulation::phenotype::Phenotype;

#[test]
fn test_random_traits_start_near_neutral() {
    let mut ctx = SimContext::seeded(1);
    for _ in 0..100 {
        let p = Phenotype::random(&mut ctx);
        assert!((0.8..=1.2).contains(&p.speed));
        assert!((0.85..=1.15).contains(&p.size));
        assert!((0.9..=1.1).contains(&p.efficiency));
    }
}

#[test]
fn test_derived_quantities_at_neutral() {
    let p = Phenotype::default();
    assert_eq!(p.actual_speed(), 1.2);
    assert_eq!(p.metabolic_rate(), 1.5);
    assert_eq!(p.visual_radius(), 5.0);
}

#[test]
fn test_tradeoffs() {
    let fast = Phenotype {
        speed: 2.0,
        size: 1.0,
        efficiency: 1.0,
    };
    let slow = Phenotype {
        speed: 0.5,
        size: 1.0,
        efficiency: 1.0,
    };
    // Fast costs energy.
    assert!(fast.metabolic_rate() > slow.metabolic_rate());

    let large = Phenotype {
        speed: 1.0,
        size: 1.5,
        efficiency: 1.0,
    };
    let small = Phenotype {
        speed: 1.0,
        size: 0.7,
        efficiency: 1.0,
    };
    // Large is slower but bigger on screen.
    assert!(large.actual_speed() < small.actual_speed());
    assert!(large.visual_radius() > small.visual_radius());
}

#[test]
fn test_crossover_picks_parent_traits() {
    let mut ctx = SimContext::seeded(2);
    let a = Phenotype {
        speed: 0.6,
        size: 0.8,
        efficiency: 1.2,
    };
    let b = Phenotype {
        speed: 1.8,
        size: 1.4,
        efficiency: 0.8,
    };

    for _ in 0..50 {
        let child = Phenotype::crossover(&a, &b, &mut ctx);
        assert!(child.speed == a.speed || child.speed == b.speed);
        assert!(child.size == a.size || child.size == b.size);
        assert!(child.efficiency == a.efficiency || child.efficiency == b.efficiency);
    }
}

#[test]
fn test_mutation_clamps_to_trait_ranges() {
    let mut ctx = SimContext::seeded(3);
    let mut p = Phenotype {
        speed: 2.0,
        size: 0.7,
        efficiency: 1.3,
    };
    for _ in 0..500 {
        p.mutate(1.0, &mut ctx);
        assert!((0.5..=2.0).contains(&p.speed));
        assert!((0.7..=1.5).contains(&p.size));
        assert!((0.7..=1.3).contains(&p.efficiency));
    }
}

#[test]
fn test_zero_rate_mutation_is_identity() {
    let mut ctx = SimContext::seeded(4);
    let mut p = Phenotype::random(&mut ctx);
    let before = p;
    p.mutate(0.0, &mut ctx);
    assert_eq!(before.speed, p.speed);
    assert_eq!(before.size, p.size);
    assert_eq!(before.efficiency, p.efficiency);
}
