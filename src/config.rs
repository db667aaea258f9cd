//! Engine-wide configuration knobs.
//!
//! A plain `Default`-able struct with consuming `with_*` builder methods,
//! following this crate's usual configuration style.

/// Selects which seam pair of [`crate::message::Message`]'s build/parse
/// methods a caller is expected to use. Both pairs are always compiled —
/// this is a usage convention for callers to document intent against, not a
/// `cfg`-gated code path, so both stay exercised by tests regardless of
/// which mode a given `EngineConfig` selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamingMode {
    /// Build into and parse from a single in-memory buffer
    /// (`build_into_buffer` / `parse_from_buffer`). The natural fit for a
    /// complete UDP datagram.
    #[default]
    Buffer,
    /// Build into and parse from a byte-oriented stream
    /// (`build_into_stream` / `parse_from_stream`), via [`crate::ber::ByteSink`]
    /// / [`crate::ber::ByteSource`].
    Stream,
}

/// Selects how [`crate::varbind::VarBindList`] behaves once its inline
/// capacity is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerBackend {
    /// Never rejects a push; grows onto the heap past the inline capacity
    /// (the ordinary `SmallVec` spill behavior).
    #[default]
    Growable,
    /// Rejects a push past `container_capacity` with
    /// [`crate::error::Error::CapacityExceeded`].
    FixedCapacity,
}

/// Default `container_capacity`, matching [`crate::varbind::VarBindList`]'s
/// `SmallVec<[VarBind; 6]>` inline capacity — a list at or below this size
/// never spills to the heap.
pub const DEFAULT_CONTAINER_CAPACITY: usize = 6;

/// Engine-wide configuration: the streaming seam and VarBindList capacity
/// policy a caller opts into.
///
/// ```
/// use snmp_ber_core::config::{ContainerBackend, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_container_backend(ContainerBackend::FixedCapacity)
///     .with_container_capacity(4);
/// assert_eq!(config.container_capacity(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    streaming_mode: StreamingMode,
    container_backend: ContainerBackend,
    container_capacity: usize,
}

impl EngineConfig {
    /// Construct with all defaults: buffered streaming, growable containers,
    /// capacity 6.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the streaming seam.
    pub fn with_streaming_mode(mut self, mode: StreamingMode) -> Self {
        self.streaming_mode = mode;
        self
    }

    /// Select the container capacity policy.
    pub fn with_container_backend(mut self, backend: ContainerBackend) -> Self {
        self.container_backend = backend;
        self
    }

    /// Set the capacity ceiling used when `container_backend` is
    /// [`ContainerBackend::FixedCapacity`].
    pub fn with_container_capacity(mut self, capacity: usize) -> Self {
        self.container_capacity = capacity;
        self
    }

    pub fn streaming_mode(&self) -> StreamingMode {
        self.streaming_mode
    }

    pub fn container_backend(&self) -> ContainerBackend {
        self.container_backend
    }

    pub fn container_capacity(&self) -> usize {
        self.container_capacity
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            streaming_mode: StreamingMode::default(),
            container_backend: ContainerBackend::default(),
            container_capacity: DEFAULT_CONTAINER_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.streaming_mode(), StreamingMode::Buffer);
        assert_eq!(config.container_backend(), ContainerBackend::Growable);
        assert_eq!(config.container_capacity(), DEFAULT_CONTAINER_CAPACITY);
    }

    #[test]
    fn builder_methods_chain() {
        let config = EngineConfig::new()
            .with_streaming_mode(StreamingMode::Stream)
            .with_container_backend(ContainerBackend::FixedCapacity)
            .with_container_capacity(3);
        assert_eq!(config.streaming_mode(), StreamingMode::Stream);
        assert_eq!(config.container_backend(), ContainerBackend::FixedCapacity);
        assert_eq!(config.container_capacity(), 3);
    }
}
