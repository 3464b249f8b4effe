//! The audio engine: graph, master bus, clock and voice bookkeeping

use std::marker::PhantomData;

use hashbrown::HashMap;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::graph::AudioGraph;
use crate::node::{AudioNode, NodeId, BLOCK_SIZE};
use crate::noise::{NoiseBuffer, NoiseCache, NoiseColor};
use crate::nodes::{Gain, GainMessage};
use crate::voice::{NodeRef, TeardownReport, Timer, TimerAction, VoiceBuilder, VoiceId};

#[cfg(feature = "cpal_sink")]
use crate::device::CpalDevice;

/// A handle for sending messages to a node in the audio graph.
///
/// Handles are returned when a node is added and provide two capabilities:
/// 1. **Connections** - pass handles to [`AudioEngine::connect`] or [`VoiceBuilder::connect`]
/// 2. **Messages** - send parameter updates via [`Handle::send`]
///
/// Messages are buffered in a lock-free ring buffer and processed at the start
/// of each audio block. If the buffer is full, [`Handle::send`] returns `Err(msg)`
/// with the message that couldn't be sent.
pub struct Handle<M: Send + 'static> {
    pub(crate) node_id: NodeId,
    pub(crate) sender: rtrb::Producer<M>,
    pub(crate) _marker: PhantomData<M>,
}

impl<M: Send + 'static> Handle<M> {
    /// Send a message to the node.
    ///
    /// - `Ok(())` if the message was queued
    /// - `Err(msg)` if the queue is full (message dropped)
    pub fn send(&mut self, msg: M) -> Result<(), M> {
        self.sender.push(msg).map_err(|rtrb::PushError::Full(m)| m)
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.node_id
    }
}

/// Counters describing the engine's lifetime so far
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub voices_spawned: u64,
    pub voices_released: u64,
    /// Most voices ever live at the same time
    pub peak_live_voices: usize,
    pub timers_fired: u64,
}

/// Owns the audio graph, the master gain bus and every live voice.
///
/// ```
/// use calmwave::{AudioEngine, EngineConfig};
/// use calmwave::nodes::{Oscillator, RtrbSink};
///
/// let (producer, mut consumer) = rtrb::RingBuffer::new(4096);
/// let mut engine = AudioEngine::new(EngineConfig::default())?
///     .with_output(RtrbSink::stereo(producer));
///
/// let voice = engine.spawn(|v| {
///     let tone = v.add(Oscillator::sine(220.0).with_amplitude(0.2));
///     v.connect_to_master(&tone)
/// })?;
///
/// engine.process();
/// assert!(consumer.pop().is_ok());
///
/// let report = engine.release(voice);
/// assert_eq!(report.removed, 1);
/// # Ok::<(), calmwave::EngineError>(())
/// ```
///
/// Rendering is pull-based: call [`process`](Self::process) often enough to
/// stay ahead of the device, as the demo's render loop does. Timers fire at the
/// start of the block they fall in.
pub struct AudioEngine {
    graph: AudioGraph,
    config: EngineConfig,

    master: Handle<GainMessage>,
    master_level: f32,
    /// Level not yet accepted by the master queue. Only the latest is kept.
    pending_master: Option<f32>,
    sink_node: Option<NodeId>,

    /// Frames rendered so far
    frames: u64,

    voices: HashMap<VoiceId, Vec<NodeId>>,
    next_voice: u64,
    timers: Vec<Timer>,

    noise_cache: Option<NoiseCache>,
    stats: EngineStats,
}

impl AudioEngine {
    /// Create an engine without an output sink.
    ///
    /// Use [`with_output`](Self::with_output) to attach one; voices cannot be
    /// spawned until then.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let mut graph = AudioGraph::new(config.sample_rate);
        let master_gain = Gain::new(config.initial_volume)
            .with_smoothing_ms(config.master_smoothing_ms, config.sample_rate);
        let master = graph.add_with_queue_size(master_gain, config.message_queue_size);

        let noise_cache = config.reuse_noise_buffers.then(NoiseCache::new);

        tracing::debug!(
            sample_rate = config.sample_rate,
            volume = config.initial_volume,
            "audio engine created"
        );

        Ok(Self {
            graph,
            master_level: config.initial_volume,
            pending_master: None,
            config,
            master: Handle {
                node_id: master.id(),
                sender: master.sender,
                _marker: PhantomData,
            },
            sink_node: None,
            frames: 0,
            voices: HashMap::new(),
            next_voice: 0,
            timers: Vec::new(),
            noise_cache,
            stats: EngineStats::default(),
        })
    }

    /// Create an engine rendering to the system's default output device.
    #[cfg(feature = "cpal_sink")]
    pub fn default_output(config: EngineConfig) -> Result<Self, EngineError> {
        let device = CpalDevice::default_output().ok_or(EngineError::NoOutput)?;
        Self::with_device(&device, config)
    }

    /// Create an engine rendering to `device`, at the device's sample rate.
    #[cfg(feature = "cpal_sink")]
    pub fn with_device(device: &CpalDevice, config: EngineConfig) -> Result<Self, EngineError> {
        let config = config.with_sample_rate(device.sample_rate());
        Ok(Self::new(config)?.with_output(device.create_sink()))
    }

    /// Attach the output sink (builder pattern). The master bus feeds it.
    pub fn with_output<S: AudioNode<Message = ()>>(mut self, sink: S) -> Self {
        if let Some(old) = self.sink_node.take() {
            self.graph.remove(old);
        }
        let handle = self.graph.add_with_queue_size(sink, 1);
        self.graph.connect(self.master.id(), handle.id());
        self.graph.set_terminal(handle.id());
        self.sink_node = Some(handle.id());
        self
    }

    /// Get the output sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.graph.sample_rate()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frames rendered since the engine was created
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate() as f64
    }

    pub(crate) fn secs_to_frames(&self, secs: f64) -> u64 {
        (secs.max(0.0) * self.sample_rate() as f64).round() as u64
    }

    #[inline]
    pub fn master_id(&self) -> NodeId {
        self.master.id()
    }

    /// Master level last requested with [`set_master_level`](Self::set_master_level)
    #[inline]
    pub fn master_level(&self) -> f32 {
        self.master_level
    }

    /// Whether the last requested level is still waiting for room in the
    /// master bus queue
    #[inline]
    pub fn master_level_pending(&self) -> bool {
        self.pending_master.is_some()
    }

    /// Change the master bus level. Nothing else in the graph is touched.
    ///
    /// If the master's queue is full the level is held back and sent at the
    /// start of the next [`process`](Self::process). Repeated changes while
    /// the queue is full collapse into the latest one.
    pub fn set_master_level(&mut self, level: f32) {
        self.master_level = level;
        self.pending_master = Some(level);
        self.flush_master_level();
    }

    fn flush_master_level(&mut self) {
        let Some(level) = self.pending_master else {
            return;
        };
        match self.master.send(GainMessage::SetGain(level)) {
            Ok(()) => self.pending_master = None,
            Err(_) => tracing::trace!(level, "master queue full, holding level back"),
        }
    }

    /// Add a node that belongs to no voice.
    ///
    /// Such nodes live until [`remove`](Self::remove) is called.
    pub fn add<N: AudioNode>(&mut self, node: N) -> Handle<N::Message> {
        let handle = self.graph.add_with_queue_size(node, self.config.message_queue_size);
        Handle {
            node_id: handle.id(),
            sender: handle.sender,
            _marker: PhantomData,
        }
    }

    pub(crate) fn add_owned<N: AudioNode>(&mut self, voice: VoiceId, node: N) -> Handle<N::Message> {
        let handle = self.add(node);
        if let Some(nodes) = self.voices.get_mut(&voice) {
            nodes.push(handle.id());
        }
        handle
    }

    /// Connect two nodes together. Audio flows from `from` to `to`.
    pub fn connect<A: NodeRef, B: NodeRef>(&mut self, from: &A, to: &B) -> Result<(), EngineError> {
        let (from, to) = (from.node_id(), to.node_id());
        if self.graph.connect(from, to) {
            Ok(())
        } else {
            Err(EngineError::Construction(format!(
                "cannot connect {:?} -> {:?}: node not in graph",
                from, to
            )))
        }
    }

    /// Connect a node to the master bus
    pub fn output<A: NodeRef>(&mut self, node: &A) -> Result<(), EngineError> {
        let master = self.master.id();
        self.connect(node, &master)
    }

    /// Remove a node and all of its connections. Returns `false` if it was
    /// already gone. The master bus and sink cannot be removed.
    pub fn remove<A: NodeRef>(&mut self, node: &A) -> bool {
        let id = node.node_id();
        if id == self.master.id() || Some(id) == self.sink_node {
            return false;
        }
        self.graph.remove(id)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.graph.contains(node)
    }

    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.graph.is_connected(from, to)
    }

    /// Nodes in the graph, including the master bus and sink
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Build a new voice with `generator`.
    ///
    /// If the generator fails, everything it had already created is released
    /// before the error is returned.
    pub fn spawn<F>(&mut self, generator: F) -> Result<VoiceId, EngineError>
    where
        F: FnOnce(&mut VoiceBuilder<'_>) -> Result<(), EngineError>,
    {
        if self.sink_node.is_none() {
            return Err(EngineError::NoOutput);
        }

        let voice = VoiceId(self.next_voice);
        self.next_voice += 1;
        self.voices.insert(voice, Vec::new());
        self.stats.voices_spawned += 1;
        self.stats.peak_live_voices = self.stats.peak_live_voices.max(self.voices.len());

        let result = generator(&mut VoiceBuilder { engine: self, voice });

        match result {
            Ok(()) => {
                tracing::debug!(?voice, nodes = self.voice_nodes(voice).len(), "voice started");
                Ok(voice)
            }
            Err(err) => {
                tracing::warn!(?voice, %err, "voice construction failed, releasing partial graph");
                self.release(voice);
                Err(err)
            }
        }
    }

    /// Stop and disconnect everything `voice` created.
    ///
    /// Timers are cancelled before any node is removed, so no callback can
    /// rebuild part of the voice afterwards. A node that is already gone is
    /// counted and skipped; it never stops the rest from being removed.
    /// Releasing an unknown voice does nothing.
    pub fn release(&mut self, voice: VoiceId) -> TeardownReport {
        let mut report = TeardownReport::default();
        let Some(nodes) = self.voices.remove(&voice) else {
            return report;
        };

        let pending = self.timers.len();
        self.timers.retain(|t| t.owner != voice);
        report.timers_cancelled = pending - self.timers.len();

        for id in nodes {
            if self.graph.remove(id) {
                report.removed += 1;
            } else {
                tracing::debug!(?voice, ?id, "node already removed during teardown");
                report.missing += 1;
            }
        }

        self.stats.voices_released += 1;
        tracing::debug!(?voice, ?report, "voice released");
        report
    }

    pub fn is_live(&self, voice: VoiceId) -> bool {
        self.voices.contains_key(&voice)
    }

    pub fn live_voices(&self) -> usize {
        self.voices.len()
    }

    /// Nodes currently owned by `voice` (empty if it is not live)
    pub fn voice_nodes(&self, voice: VoiceId) -> &[NodeId] {
        self.voices.get(&voice).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pending timers owned by `voice`
    pub fn voice_timers(&self, voice: VoiceId) -> usize {
        self.timers.iter().filter(|t| t.owner == voice).count()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// A noise loop of the configured length at the engine rate
    pub fn noise(&mut self, color: NoiseColor) -> NoiseBuffer {
        let duration = self.config.noise_duration_secs;
        let rate = self.sample_rate();
        match self.noise_cache.as_mut() {
            Some(cache) => cache.get_or_generate(color, duration, rate),
            None => color.generate(duration, rate),
        }
    }

    pub(crate) fn schedule(&mut self, timer: Timer) {
        self.timers.push(timer);
    }

    /// Process one block of audio (64 frames).
    ///
    /// Due timers run first, then any held-back master level is sent and the
    /// graph renders into the sink. Without a
    /// sink only the clock and timers advance.
    pub fn process(&mut self) {
        self.run_due_timers();
        self.flush_master_level();
        self.graph.process();
        self.frames += BLOCK_SIZE as u64;
    }

    fn run_due_timers(&mut self) {
        let block_end = self.frames + BLOCK_SIZE as u64;

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due < block_end)
                .min_by_key(|(_, t)| t.due)
                .map(|(i, _)| i);
            let Some(index) = next else { break };

            let mut timer = self.timers.swap_remove(index);
            self.stats.timers_fired += 1;

            let ok = match &mut timer.action {
                TimerAction::RemoveNodes(nodes) => {
                    for id in nodes.iter() {
                        self.remove_owned(timer.owner, *id);
                    }
                    true
                }
                TimerAction::Callback(callback) => {
                    let voice = timer.owner;
                    match callback(&mut VoiceBuilder { engine: self, voice }) {
                        Ok(()) => true,
                        Err(err) => {
                            tracing::warn!(?voice, %err, "voice timer failed, not re-arming");
                            false
                        }
                    }
                }
            };

            if let (true, Some(period)) = (ok, timer.period) {
                if self.voices.contains_key(&timer.owner) {
                    timer.due += period;
                    self.timers.push(timer);
                }
            }
        }
    }

    fn remove_owned(&mut self, voice: VoiceId, id: NodeId) {
        if let Some(nodes) = self.voices.get_mut(&voice) {
            nodes.retain(|n| *n != id);
        }
        self.graph.remove(id);
    }
}
