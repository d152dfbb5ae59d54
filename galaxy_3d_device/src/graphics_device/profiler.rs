/// GPU pass profiler and per-frame statistics
///
/// The profiler records one marker per render pass, compute pass and compute
/// dispatch, in submission order. Markers of the previous frame stay readable
/// until the next frame ends.

use crate::graphics_device::PrimitiveTopology;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Render,
    Compute,
    Dispatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassMarker {
    pub kind: PassKind,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct GpuProfiler {
    enabled: bool,
    current: Vec<PassMarker>,
    last_frame: Vec<PassMarker>,
    lost: bool,
}

impl GpuProfiler {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, ..Default::default() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn frame_start(&mut self) {
        self.last_frame = std::mem::take(&mut self.current);
    }

    pub(crate) fn mark(&mut self, kind: PassKind, name: &str) {
        if self.enabled && !self.lost {
            self.current.push(PassMarker { kind, name: name.to_string() });
        }
    }

    /// Markers recorded so far in the current frame
    pub fn current_markers(&self) -> &[PassMarker] {
        &self.current
    }

    /// Markers of the previous frame
    pub fn last_frame_markers(&self) -> &[PassMarker] {
        &self.last_frame
    }

    pub(crate) fn lose_context(&mut self) {
        self.lost = true;
        self.current.clear();
    }

    pub(crate) fn restore_context(&mut self) {
        self.lost = false;
    }
}

/// Counters reset at every `frame_start`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u64,
    pub shader_switches: u64,
    /// Primitives submitted, indexed by `PrimitiveTopology::index`
    pub primitives: [u64; PrimitiveTopology::COUNT],
}

impl FrameStats {
    pub fn primitives_of(&self, topology: PrimitiveTopology) -> u64 {
        self.primitives[topology.index()]
    }

    pub(crate) fn record_draw(&mut self, topology: PrimitiveTopology, count: u32, instances: u32) {
        self.draw_calls += 1;
        self.primitives[topology.index()] += count as u64 * instances.max(1) as u64;
    }
}

#[cfg(test)]
#[path = "profiler_tests.rs"]
mod tests;
