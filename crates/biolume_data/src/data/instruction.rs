use serde::{Deserialize, Serialize};

use super::actuator::{Actuator, Sensor};

/// The closed instruction catalogue executed by a biolume.
///
/// Genomes store raw bytes; [`Instruction::decode`] maps a byte back onto the
/// catalogue and returns `None` for anything outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Instruction {
    Nop = 0,
    Led0On,
    Led0Off,
    Led0Toggle,
    Led1On,
    Led1Off,
    Led1Toggle,
    SoundOn,
    SoundOff,
    Jump,
    Label,
    BufferSetData,
    BufferGetData,
    MessageSend,
    MessageReceive,
    IfMotion,
    IfNotMotion,
    IfSound,
    IfNotSound,
    IfTouch,
    IfNotTouch,
    IfCo2,
    IfNotCo2,
    IfHighEnergy,
    IfLowEnergy,
    Reproduce,
}

impl Instruction {
    /// Number of distinct opcodes. Mutation samples from `[0, COUNT)`.
    pub const COUNT: usize = 26;

    pub const ALL: [Instruction; Self::COUNT] = [
        Instruction::Nop,
        Instruction::Led0On,
        Instruction::Led0Off,
        Instruction::Led0Toggle,
        Instruction::Led1On,
        Instruction::Led1Off,
        Instruction::Led1Toggle,
        Instruction::SoundOn,
        Instruction::SoundOff,
        Instruction::Jump,
        Instruction::Label,
        Instruction::BufferSetData,
        Instruction::BufferGetData,
        Instruction::MessageSend,
        Instruction::MessageReceive,
        Instruction::IfMotion,
        Instruction::IfNotMotion,
        Instruction::IfSound,
        Instruction::IfNotSound,
        Instruction::IfTouch,
        Instruction::IfNotTouch,
        Instruction::IfCo2,
        Instruction::IfNotCo2,
        Instruction::IfHighEnergy,
        Instruction::IfLowEnergy,
        Instruction::Reproduce,
    ];

    /// Decodes a genome byte. Unknown values yield `None`.
    #[must_use]
    pub fn decode(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    #[must_use]
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// The actuator written by the on/off/toggle family, if any.
    #[must_use]
    pub fn actuator(self) -> Option<Actuator> {
        match self {
            Self::Led0On | Self::Led0Off | Self::Led0Toggle => Some(Actuator::Led0),
            Self::Led1On | Self::Led1Off | Self::Led1Toggle => Some(Actuator::Led1),
            Self::SoundOn | Self::SoundOff => Some(Actuator::Speaker),
            _ => None,
        }
    }

    /// The sensor polled by a conditional, with `true` for the negated form.
    #[must_use]
    pub fn sensor_condition(self) -> Option<(Sensor, bool)> {
        match self {
            Self::IfMotion => Some((Sensor::Motion, false)),
            Self::IfNotMotion => Some((Sensor::Motion, true)),
            Self::IfSound => Some((Sensor::Sound, false)),
            Self::IfNotSound => Some((Sensor::Sound, true)),
            Self::IfTouch => Some((Sensor::Touch, false)),
            Self::IfNotTouch => Some((Sensor::Touch, true)),
            Self::IfCo2 => Some((Sensor::Co2, false)),
            Self::IfNotCo2 => Some((Sensor::Co2, true)),
            _ => None,
        }
    }

    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Led0On => "LED0_ON",
            Self::Led0Off => "LED0_OFF",
            Self::Led0Toggle => "LED0_TOGGLE",
            Self::Led1On => "LED1_ON",
            Self::Led1Off => "LED1_OFF",
            Self::Led1Toggle => "LED1_TOGGLE",
            Self::SoundOn => "SOUND_ON",
            Self::SoundOff => "SOUND_OFF",
            Self::Jump => "JUMP",
            Self::Label => "LABEL",
            Self::BufferSetData => "BUFFER_SET_DATA",
            Self::BufferGetData => "BUFFER_GET_DATA",
            Self::MessageSend => "MESSAGE_SEND",
            Self::MessageReceive => "MESSAGE_RECEIVE",
            Self::IfMotion => "IF_MOTION",
            Self::IfNotMotion => "IF_N_MOTION",
            Self::IfSound => "IF_SOUND",
            Self::IfNotSound => "IF_N_SOUND",
            Self::IfTouch => "IF_TOUCH",
            Self::IfNotTouch => "IF_N_TOUCH",
            Self::IfCo2 => "IF_CO2",
            Self::IfNotCo2 => "IF_N_CO2",
            Self::IfHighEnergy => "IF_HIGH_ENERGY",
            Self::IfLowEnergy => "IF_LOW_ENERGY",
            Self::Reproduce => "REPRODUCE",
        }
    }
}

impl From<Instruction> for u8 {
    fn from(inst: Instruction) -> Self {
        inst.opcode()
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
