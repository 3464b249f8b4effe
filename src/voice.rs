//! Voices: the set of nodes and timers one sound owns.
//!
//! A generator never touches the engine directly. It receives a
//! [`VoiceBuilder`] that tags everything it creates with the voice, so that
//! [`AudioEngine::release`](crate::AudioEngine::release) can tear the whole
//! graph down without the generator keeping any bookkeeping of its own.

use crate::engine::{AudioEngine, Handle};
use crate::error::EngineError;
use crate::node::{AudioNode, NodeId};
use crate::noise::{NoiseBuffer, NoiseColor};

/// Identifies one live sound in an engine. Never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct VoiceId(pub(crate) u64);

/// What releasing a voice actually did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Nodes removed from the graph
    pub removed: usize,
    /// Nodes the voice still listed but that were already gone
    pub missing: usize,
    /// Pending timers dropped before any node was touched
    pub timers_cancelled: usize,
}

/// Anything that names a node: a [`Handle`] or a bare [`NodeId`].
pub trait NodeRef {
    fn node_id(&self) -> NodeId;
}

impl NodeRef for NodeId {
    fn node_id(&self) -> NodeId {
        *self
    }
}

impl<M: Send + 'static> NodeRef for Handle<M> {
    fn node_id(&self) -> NodeId {
        self.id()
    }
}

/// Callback run by a repeating voice timer
pub type TimerCallback = Box<dyn FnMut(&mut VoiceBuilder<'_>) -> Result<(), EngineError> + Send>;

pub(crate) enum TimerAction {
    RemoveNodes(Vec<NodeId>),
    Callback(TimerCallback),
}

/// A pending action on the engine's sample clock
pub(crate) struct Timer {
    pub(crate) owner: VoiceId,
    /// Frame at which the timer fires
    pub(crate) due: u64,
    /// Re-arm interval in frames
    pub(crate) period: Option<u64>,
    pub(crate) action: TimerAction,
}

/// Scoped access to the engine while building (or extending) one voice.
pub struct VoiceBuilder<'a> {
    pub(crate) engine: &'a mut AudioEngine,
    pub(crate) voice: VoiceId,
}

impl<'a> VoiceBuilder<'a> {
    #[inline]
    pub fn voice(&self) -> VoiceId {
        self.voice
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.engine.sample_rate()
    }

    /// Engine clock in seconds
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.engine.now_secs()
    }

    /// The shared master gain every voice terminates at
    #[inline]
    pub fn master(&self) -> NodeId {
        self.engine.master_id()
    }

    /// Add a node owned by this voice; it starts producing sound on the next block
    pub fn add<N: AudioNode>(&mut self, node: N) -> Handle<N::Message> {
        self.engine.add_owned(self.voice, node)
    }

    pub fn connect<A: NodeRef, B: NodeRef>(&mut self, from: &A, to: &B) -> Result<(), EngineError> {
        self.engine.connect(from, to)
    }

    pub fn connect_to_master<A: NodeRef>(&mut self, from: &A) -> Result<(), EngineError> {
        let master = self.engine.master_id();
        self.engine.connect(from, &master)
    }

    /// A noise loop of the configured length at the engine rate
    pub fn noise(&mut self, color: NoiseColor) -> NoiseBuffer {
        self.engine.noise(color)
    }

    /// Remove `nodes` once `delay_secs` have elapsed on the engine clock
    pub fn remove_after(&mut self, nodes: Vec<NodeId>, delay_secs: f64) {
        let due = self.engine.frames() + self.engine.secs_to_frames(delay_secs);
        self.engine.schedule(Timer {
            owner: self.voice,
            due,
            period: None,
            action: TimerAction::RemoveNodes(nodes),
        });
    }

    /// Run `callback` every `interval_secs`, first after one interval.
    ///
    /// The timer dies with the voice. A callback that fails is logged and not
    /// re-armed.
    pub fn every<F>(&mut self, interval_secs: f64, callback: F)
    where
        F: FnMut(&mut VoiceBuilder<'_>) -> Result<(), EngineError> + Send + 'static,
    {
        let period = self.engine.secs_to_frames(interval_secs).max(1);
        let due = self.engine.frames() + period;
        self.engine.schedule(Timer {
            owner: self.voice,
            due,
            period: Some(period),
            action: TimerAction::Callback(Box::new(callback)),
        });
    }
}
