//! Standalone networked organism.
//!
//! A node runs one organism on its own and exchanges whole genomes with peers.
//! When its organism reproduces it publishes the packet captured at its last
//! reset; when a packet arrives it installs it and restarts from `pc = 0` on
//! the following tick. Transport trouble is logged and counted, then ignored.

use std::sync::Arc;

use anyhow::Result;
use biolume_core::config::AppConfig;
use biolume_core::metrics::Metrics;
use biolume_core::mutation::SizeLimits;
use biolume_core::organism::{Biolume, ExecContext, ExecParams, StepOutcome};
use biolume_core::random::{seeded_rng, SimRng};
use biolume_core::sensors::{self, SensorOracle};
use biolume_data::GenePacket;
use biolume_io::transfer::{gene_channel, GeneSink, GeneSource};
use biolume_io::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Running,
    /// New genes were installed; runtime state is cleared at the next tick.
    ResettingFromNewGenes,
}

/// What one node tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTick {
    pub outcome: StepOutcome,
    pub sent: bool,
    pub received: bool,
}

pub struct BiolumeNode {
    id: usize,
    organism: Biolume,
    outgoing: GenePacket,
    state: NodeState,
    rng: SimRng,
    sensors: Box<dyn SensorOracle>,
    params: ExecParams,
    limits: SizeLimits,
    source: Box<dyn GeneSource>,
    sink: Option<Box<dyn GeneSink>>,
    metrics: Arc<Metrics>,
    /// Set once a peer link reports `Disconnected`; cleared by the next success.
    link_lost: bool,
}

impl BiolumeNode {
    /// A node with a fresh random genome.
    ///
    /// The node's stream is seeded from the configured seed offset by `id`, so
    /// nodes sharing a configuration still diverge.
    pub fn new(
        id: usize,
        config: &AppConfig,
        source: Box<dyn GeneSource>,
        sink: Option<Box<dyn GeneSink>>,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        config.validate()?;
        let (mut rng, seed) = seeded_rng(
            config
                .population
                .seed
                .map(|s| s.wrapping_add(id as u64)),
        );
        let mut organism = Biolume::new_nop(config.genome.init_size);
        organism.initialize(config.genome.init_size, config.genome.variable_max, &mut rng);
        let limits = SizeLimits::from(&config.genome);
        if config.population.seed_viable {
            biolume_core::mutation::make_viable(&mut organism.genome, &limits, &mut rng);
        }
        tracing::debug!(id, seed, "Node initialised");

        Ok(Self {
            id,
            outgoing: GenePacket::from_genome(&organism.genome),
            organism,
            state: NodeState::Running,
            rng,
            sensors: sensors::from_config(&config.sensors),
            params: ExecParams::from(config),
            limits,
            source,
            sink,
            metrics,
            link_lost: false,
        })
    }

    #[must_use]
    pub fn with_sensors(mut self, sensors: Box<dyn SensorOracle>) -> Self {
        self.sensors = sensors;
        self
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn organism(&self) -> &Biolume {
        &self.organism
    }

    #[must_use]
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// The packet this node publishes on reproduction.
    #[must_use]
    pub fn outgoing(&self) -> &GenePacket {
        &self.outgoing
    }

    pub fn set_sink(&mut self, sink: Box<dyn GeneSink>) {
        self.sink = Some(sink);
    }

    /// Resolves a pending reset, steps once, publishes on reproduction, then
    /// polls the inbox.
    pub fn tick(&mut self) -> NodeTick {
        if self.state == NodeState::ResettingFromNewGenes {
            self.organism.reset();
            self.outgoing = GenePacket::from_genome(&self.organism.genome);
            self.state = NodeState::Running;
        }

        let mut ctx = ExecContext {
            rng: &mut self.rng,
            sensors: self.sensors.as_mut(),
            params: &self.params,
        };
        let outcome = self.organism.step(&mut ctx);

        let sent = if self.organism.reproduce {
            self.organism.reproduce = false;
            self.publish()
        } else {
            false
        };
        let received = self.poll_inbox();

        NodeTick {
            outcome,
            sent,
            received,
        }
    }

    fn publish(&mut self) -> bool {
        let Some(sink) = self.sink.as_mut() else {
            return false;
        };
        match sink.send(&self.outgoing) {
            Ok(()) => {
                tracing::debug!(id = self.id, "Genes sent");
                self.metrics.record_transfer();
                self.link_lost = false;
                true
            }
            Err(e) => {
                self.transfer_failed(&e);
                false
            }
        }
    }

    fn poll_inbox(&mut self) -> bool {
        match self.source.try_receive() {
            Ok(Some(packet)) => {
                self.link_lost = false;
                self.organism.genome = packet.to_genome(self.limits.min, self.limits.max);
                self.state = NodeState::ResettingFromNewGenes;
                tracing::debug!(id = self.id, size = self.organism.genome.len(), "Genes received");
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.transfer_failed(&e);
                false
            }
        }
    }

    /// A dead link is reported once; repeats are only counted.
    fn transfer_failed(&mut self, error: &IoError) {
        let disconnected = matches!(error, IoError::Disconnected);
        if disconnected && self.link_lost {
            self.metrics.count_transfer_failure();
            tracing::debug!(id = self.id, "Peer still disconnected");
            return;
        }
        self.link_lost = disconnected;
        self.metrics.record_transfer_failure(error);
    }
}

/// Nodes wired in a ring: each one's sink feeds the next one's inbox.
pub struct NodeRing {
    nodes: Vec<BiolumeNode>,
}

impl NodeRing {
    pub fn new(count: usize, config: &AppConfig, metrics: Arc<Metrics>) -> Result<Self> {
        anyhow::ensure!(count > 0, "A node ring needs at least one node");
        let links: Vec<_> = (0..count).map(|_| gene_channel()).collect();
        let (sinks, sources): (Vec<_>, Vec<_>) = links.into_iter().unzip();

        let mut nodes = Vec::with_capacity(count);
        for (id, source) in sources.into_iter().enumerate() {
            nodes.push(BiolumeNode::new(id, config, Box::new(source), None, metrics.clone())?);
        }
        // node i sends into the inbox of node i + 1
        for (id, sink) in sinks.into_iter().enumerate() {
            let sender = (id + count - 1) % count;
            nodes[sender].set_sink(Box::new(sink));
        }
        Ok(Self { nodes })
    }

    #[must_use]
    pub fn nodes(&self) -> &[BiolumeNode] {
        &self.nodes
    }

    /// Ticks every node once. Returns the number of packets sent.
    pub fn tick(&mut self) -> usize {
        self.nodes
            .iter_mut()
            .map(|node| node.tick())
            .filter(|t| t.sent)
            .count()
    }
}
