//! Process-wide capability checks, resolved once and cached.

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing::debug;

/// A yes/no question about the running environment.
///
/// The probe function runs at most once per process, on the first call to
/// `is_available`; every later call returns the cached answer.
pub struct CapabilityProbe {
    name: &'static str,
    probe: fn() -> bool,
    resolved: OnceLock<bool>,
}

impl CapabilityProbe {
    pub const fn new(name: &'static str, probe: fn() -> bool) -> Self {
        Self {
            name,
            probe,
            resolved: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_available(&self) -> bool {
        *self.resolved.get_or_init(|| {
            let available = (self.probe)();
            debug!(capability = self.name, available, "capability probed");
            available
        })
    }
}

static COLOR_OUTPUT: CapabilityProbe = CapabilityProbe::new("color-output", probe_color_output);

fn probe_color_output() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Whether terminal output should be colored
pub fn color_output_available() -> bool {
    COLOR_OUTPUT.is_available()
}
