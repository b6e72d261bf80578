use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of actuators carried by every biolume.
pub const NUM_ACT: usize = 3;

/// Output devices driven by the display buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actuator {
    Led0,
    Led1,
    Speaker,
}

impl Actuator {
    pub const ALL: [Actuator; NUM_ACT] = [Actuator::Led0, Actuator::Led1, Actuator::Speaker];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Environmental inputs polled by the conditional instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sensor {
    Motion,
    Sound,
    Touch,
    Co2,
}

/// One value per actuator, indexable by [`Actuator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActuatorBank<T>(pub [T; NUM_ACT]);

impl<T: Copy> ActuatorBank<T> {
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self([value; NUM_ACT])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Actuator, T)> + '_ {
        Actuator::ALL.iter().map(move |&a| (a, self.0[a.index()]))
    }
}

impl<T> Index<Actuator> for ActuatorBank<T> {
    type Output = T;

    fn index(&self, act: Actuator) -> &T {
        &self.0[act.index()]
    }
}

impl<T> IndexMut<Actuator> for ActuatorBank<T> {
    fn index_mut(&mut self, act: Actuator) -> &mut T {
        &mut self.0[act.index()]
    }
}

impl<T> From<[T; NUM_ACT]> for ActuatorBank<T> {
    fn from(values: [T; NUM_ACT]) -> Self {
        Self(values)
    }
}
