#![forbid(unsafe_code)]

//! Host bridge that records close requests instead of acting on them.

use snav_backend::HostBridge;
use snav_core::Style;

/// Configurable [`HostBridge`] that counts close requests.
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    embedded: bool,
    closable: bool,
    style: Option<Style>,
    close_calls: u32,
}

impl RecordingBridge {
    /// A bridge for an app embedded in a host that can close it.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            embedded: true,
            closable: true,
            ..Self::default()
        }
    }

    /// A bridge for a standalone page: not embedded, cannot close.
    #[must_use]
    pub fn standalone() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    /// How many times the host was asked to close.
    #[must_use]
    pub const fn close_calls(&self) -> u32 {
        self.close_calls
    }
}

impl HostBridge for RecordingBridge {
    fn is_embedded(&self) -> bool {
        self.embedded
    }

    fn supports_close(&self) -> bool {
        self.closable
    }

    fn close(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(calls = self.close_calls + 1, "host close requested");
        self.close_calls += 1;
    }

    fn preferred_style(&self) -> Option<Style> {
        self.style
    }
}
