//! Runtime control of the log filter.
//!
//! The `EnvFilter` is installed behind a `reload` layer (see `app::init_tracing`), so the
//! directives can be read and replaced while the server is running.

use tracing_subscriber::{EnvFilter, Registry, reload};

use crate::error::{Error, Kind};

pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Clone)]
pub struct LogControl {
    handle: FilterHandle,
}

impl std::fmt::Debug for LogControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogControl").finish_non_exhaustive()
    }
}

impl LogControl {
    pub fn new(handle: FilterHandle) -> Self {
        Self { handle }
    }

    /// Current filter directives, e.g. `info,tower_http=info`.
    pub fn current(&self) -> Result<String, Error> {
        self.handle
            .with_current(|filter| filter.to_string())
            .map_err(|e| Error::wrap_with(Kind::Internal, "log filter unavailable", e))
    }

    /// Replace the filter with `directives` and return the filter now in effect.
    pub fn update(&self, directives: &str) -> Result<String, Error> {
        let filter = EnvFilter::try_new(directives).map_err(|e| {
            Error::wrap_with(Kind::Invalid, "invalid log filter directives", e)
                .with_param("field", "filter")
        })?;

        self.handle
            .reload(filter)
            .map_err(|e| Error::wrap_with(Kind::Internal, "log filter unavailable", e))?;

        let current = self.current()?;
        tracing::info!(filter = %current, "log filter updated");
        Ok(current)
    }
}
