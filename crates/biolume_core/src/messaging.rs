//! Neighbour messaging.
//!
//! Broadcasts raised during a generation's step pass are queued and delivered
//! only once every organism has stepped, so a message sent on tick `T` is
//! first readable by MESSAGE_RECEIVE on tick `T + 1`.

use biolume_data::ActuatorBank;

use crate::organism::Biolume;
use crate::topology::Topology;

#[derive(Debug, Clone, Default)]
pub struct MessageBus {
    pending: Vec<(usize, ActuatorBank<u8>)>,
}

impl MessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, sender: usize, payload: ActuatorBank<u8>) {
        self.pending.push((sender, payload));
    }

    /// Writes every queued payload into the senders' neighbours and empties the
    /// queue. Later posts overwrite earlier ones. Returns the number of writes.
    pub fn deliver(&mut self, topology: &Topology, organisms: &mut [Biolume]) -> usize {
        let mut writes = 0;
        for (sender, payload) in self.pending.drain(..) {
            for neighbor in topology.neighbors(sender) {
                if let Some(b) = organisms.get_mut(neighbor) {
                    b.set_message(payload);
                    writes += 1;
                }
            }
        }
        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::GridPos;

    #[test]
    fn test_delivery_reaches_neighbors_only() {
        let topology = Topology::Grid {
            width: 5,
            height: 5,
        };
        let mut organisms: Vec<Biolume> = (0..topology.len()).map(|_| Biolume::new_nop(5)).collect();
        let sender = topology.index_of(GridPos::new(2, 2)).unwrap();
        let far = topology.index_of(GridPos::new(4, 4)).unwrap();

        let mut bus = MessageBus::new();
        bus.post(sender, ActuatorBank::from([9, 8, 7]));
        assert_eq!(bus.deliver(&topology, &mut organisms), 8);
        assert_eq!(bus.deliver(&topology, &mut organisms), 0);

        for n in topology.neighbors(sender) {
            assert_eq!(organisms[n].displays.message, ActuatorBank::from([9, 8, 7]));
        }
        assert_eq!(organisms[sender].displays.message, ActuatorBank::default());
        assert_eq!(organisms[far].displays.message, ActuatorBank::default());
    }

    #[test]
    fn test_flat_delivery_is_dropped() {
        let topology = Topology::Flat { size: 3 };
        let mut organisms = vec![Biolume::new_nop(5); 3];
        let mut bus = MessageBus::new();
        bus.post(0, ActuatorBank::from([1, 1, 1]));
        assert_eq!(bus.deliver(&topology, &mut organisms), 0);
        assert!(organisms
            .iter()
            .all(|b| b.displays.message == ActuatorBank::default()));
    }
}
