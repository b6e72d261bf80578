use biolume_lib::model::actuator::{Actuator, ActuatorBank};
use biolume_lib::model::genome::{Genome, GEN_MAX};
use biolume_lib::model::instruction::{reproduction_probability, Instruction};
use biolume_lib::model::organism::{Biolume, ExecContext, ExecParams, StepOutcome};
use biolume_lib::model::sensors::FixedSensors;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod common;

fn run(organism: &mut Biolume, steps: usize) -> Vec<StepOutcome> {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut sensors = FixedSensors::all(true);
    let params = ExecParams::default();
    let mut ctx = ExecContext {
        rng: &mut rng,
        sensors: &mut sensors,
        params: &params,
    };
    (0..steps).map(|_| organism.step(&mut ctx)).collect()
}

/// Programs without JUMP or conditionals, so the counter moves one slot per step.
fn straight_line_op() -> impl Strategy<Value = Instruction> {
    prop::sample::select(vec![
        Instruction::Nop,
        Instruction::Led0On,
        Instruction::Led1Off,
        Instruction::Led0Toggle,
        Instruction::Label,
        Instruction::BufferSetData,
        Instruction::BufferGetData,
        Instruction::MessageSend,
        Instruction::MessageReceive,
        Instruction::Reproduce,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn pc_returns_after_size_steps(
        ops in prop::collection::vec(straight_line_op(), 1..=GEN_MAX),
        start_seed in any::<usize>()
    ) {
        let mut organism = Biolume::with_genome(Genome::from_instructions(&ops, ActuatorBank::from([1, 2, 3])));
        let start = start_seed % ops.len();
        organism.pc = start;
        run(&mut organism, ops.len());
        prop_assert_eq!(organism.pc, start);
        prop_assert_eq!(organism.age, ops.len() as u64);
    }

    #[test]
    fn reproduction_probability_is_monotone(low in 0i32..=100, high in 0i32..=100) {
        let params = ExecParams::default();
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        prop_assert!(reproduction_probability(low, &params) <= reproduction_probability(high, &params));
    }
}

#[test]
fn test_skip_consumes_a_tick() {
    let mut organism = Biolume::with_genome(Genome::from_instructions(
        &[Instruction::IfMotion, Instruction::Led0On, Instruction::Led1On, Instruction::Nop, Instruction::Nop],
        ActuatorBank::from([10, 20, 30]),
    ));
    organism.energy = 60;
    organism.skip = true;
    let displays = organism.displays;

    let outcomes = run(&mut organism, 1);
    assert_eq!(outcomes[0], StepOutcome::Skipped);
    assert!(!organism.skip);
    assert_eq!(organism.pc, 1);
    assert_eq!(organism.age, 1);
    assert_eq!(organism.energy, 60);
    assert_eq!(organism.displays, displays);
}

#[test]
fn test_false_condition_skips_following_instruction() {
    let mut organism = Biolume::with_genome(Genome::from_instructions(
        &[Instruction::IfSound, Instruction::Led0On, Instruction::Led1On, Instruction::Nop, Instruction::Nop],
        ActuatorBank::from([10, 20, 30]),
    ));
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut sensors = FixedSensors::all(false);
    let params = ExecParams::default();
    let mut ctx = ExecContext {
        rng: &mut rng,
        sensors: &mut sensors,
        params: &params,
    };
    for _ in 0..3 {
        organism.step(&mut ctx);
    }
    assert_display!(organism, [0, 20, 0]);
}

#[test]
fn test_toggle_semantics() {
    let mut organism = Biolume::with_genome(Genome::from_instructions(
        &[Instruction::Led0On, Instruction::Led0Toggle, Instruction::Led0Toggle, Instruction::Led0Off, Instruction::Led0Toggle],
        ActuatorBank::from([77, 0, 0]),
    ));
    // a toggle keeps a lit actuator lit and a dark one dark
    run(&mut organism, 1);
    assert_eq!(organism.display()[Actuator::Led0], 77);
    run(&mut organism, 1);
    assert_eq!(organism.display()[Actuator::Led0], 77);
    run(&mut organism, 1);
    assert_eq!(organism.display()[Actuator::Led0], 77);
    run(&mut organism, 2);
    assert_eq!(organism.display()[Actuator::Led0], 0);
}

#[test]
fn test_jump_loops_back_to_label() {
    let mut organism = Biolume::with_genome(Genome::from_instructions(
        &[Instruction::Led0On, Instruction::Label, Instruction::Led1On, Instruction::Jump, Instruction::SoundOn],
        ActuatorBank::from([1, 2, 3]),
    ));
    run(&mut organism, 12);
    assert_eq!(organism.label, Some(2));
    // SoundOn after the jump is never reached
    assert_display!(organism, [1, 2, 0]);
}

#[test]
fn test_jump_to_label_wrapped_onto_first_slot() {
    let mut organism = Biolume::with_genome(Genome::from_instructions(
        &[Instruction::Nop, Instruction::Nop, Instruction::Jump, Instruction::Label],
        ActuatorBank::from([1, 2, 3]),
    ));
    organism.pc = 3;
    run(&mut organism, 1);
    assert_eq!(organism.label, Some(0));
    assert_eq!(organism.pc, 0);

    run(&mut organism, 2);
    assert_eq!(organism.pc, 2);
    let outcome = run(&mut organism, 1);
    assert!(matches!(
        outcome[0],
        StepOutcome::Executed {
            instruction: Some(Instruction::Jump),
            ..
        }
    ));
    assert_eq!(organism.pc, 0);
    assert_eq!(organism.label, Some(0));
    assert!(!organism.skip);
    assert_eq!(organism.age, 4);
}
