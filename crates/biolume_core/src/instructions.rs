//! Instruction semantics.
//!
//! [`dispatch`] is an exhaustive match over the catalogue. Unknown bytes never
//! reach it: the VM treats them as NOP before dispatch.

use biolume_data::{Actuator, ActuatorBank, Instruction};

use crate::organism::{Biolume, ExecContext, ExecParams};
use crate::random::RandomSource;

/// How the program counter moves after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Advance,
    /// Continue at this tape index on the next step.
    ResumeAt(usize),
}

/// Side effects that leave the organism.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None,
    /// Deliver this payload to every neighbour's message slot.
    Broadcast(ActuatorBank<u8>),
    /// The reproduction flag was raised.
    ReproductionRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub flow: Flow,
    pub effect: Effect,
}

impl Dispatch {
    fn effect(effect: Effect) -> Self {
        Self {
            flow: Flow::Advance,
            effect,
        }
    }
}

/// Probability that REPRODUCE raises the flag at the given energy.
///
/// Linear in energy: `prob_min` at 0 and `prob_max` at `energy_max`.
#[must_use]
pub fn reproduction_probability(energy: i32, params: &ExecParams) -> f32 {
    energy as f32 / params.energy_max as f32 * (params.prob_max - params.prob_min) + params.prob_min
}

/// Byte stored in a variable, as written to an 8-bit actuator register.
#[inline]
fn actuator_value(variable: i32) -> u8 {
    variable as u8
}

fn switch_on(b: &mut Biolume, act: Actuator) {
    b.displays.current[act] = actuator_value(b.genome.variables[act]);
}

fn switch_off(b: &mut Biolume, act: Actuator) {
    b.displays.current[act] = 0;
}

fn toggle(b: &mut Biolume, act: Actuator) {
    if b.displays.previous[act] != 0 {
        switch_on(b, act);
    } else {
        switch_off(b, act);
    }
}

/// Applies one instruction to `b`.
pub fn dispatch(inst: Instruction, b: &mut Biolume, ctx: &mut ExecContext<'_>) -> Dispatch {
    use Instruction as I;

    let half_energy = ctx.params.energy_max / 2;
    match inst {
        I::Nop => {}
        I::Led0On => switch_on(b, Actuator::Led0),
        I::Led1On => switch_on(b, Actuator::Led1),
        I::SoundOn => switch_on(b, Actuator::Speaker),
        I::Led0Off => switch_off(b, Actuator::Led0),
        I::Led1Off => switch_off(b, Actuator::Led1),
        I::SoundOff => switch_off(b, Actuator::Speaker),
        I::Led0Toggle => toggle(b, Actuator::Led0),
        I::Led1Toggle => toggle(b, Actuator::Led1),
        I::Jump => {
            // An unset label restarts the tape.
            return Dispatch {
                flow: Flow::ResumeAt(b.label.unwrap_or(0)),
                effect: Effect::None,
            };
        }
        I::Label => {
            let len = b.genome.len().max(1);
            b.label = Some((b.pc + 1) % len);
        }
        I::BufferSetData => b.displays.buffer = b.displays.current,
        I::BufferGetData => b.displays.current = b.displays.buffer,
        I::MessageSend => return Dispatch::effect(Effect::Broadcast(b.displays.buffer)),
        I::MessageReceive => b.displays.buffer = b.displays.message,
        I::IfMotion
        | I::IfNotMotion
        | I::IfSound
        | I::IfNotSound
        | I::IfTouch
        | I::IfNotTouch
        | I::IfCo2
        | I::IfNotCo2 => {
            if let Some((sensor, negated)) = inst.sensor_condition() {
                let reading = ctx.sensors.poll(sensor, ctx.rng);
                if reading {
                    let reward = ctx.params.rewards.reward(sensor);
                    if reward > 0 {
                        b.energy = (b.energy + reward).min(ctx.params.energy_max);
                    }
                }
                if reading == negated {
                    b.skip = true;
                }
            }
        }
        I::IfHighEnergy => {
            if b.energy > half_energy {
                b.skip = true;
            }
        }
        I::IfLowEnergy => {
            if b.energy < half_energy {
                b.skip = true;
            }
        }
        I::Reproduce => {
            let p = reproduction_probability(b.energy, ctx.params);
            if p > ctx.rng.uniform() {
                b.reproduce = true;
                return Dispatch::effect(Effect::ReproductionRequested);
            }
        }
    }
    Dispatch::default()
}
