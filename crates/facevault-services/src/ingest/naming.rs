use std::sync::Arc;

use facevault_core::media_type::basename;

/// Source of wall-clock milliseconds used in stored names.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Issues `<prefix>_<millis>_<basename>` names for one request.
///
/// Timestamps handed out by one namer strictly increase, so names stay unique
/// within the request even when the clock does not move. Two namers reading the
/// same millisecond can still produce the same name for the same basename.
pub struct StoredNamer {
    clock: Arc<dyn Clock>,
    prefix: String,
    last_millis: Option<i64>,
}

impl StoredNamer {
    pub fn new(clock: Arc<dyn Clock>, prefix: impl Into<String>) -> Self {
        Self {
            clock,
            prefix: prefix.into(),
            last_millis: None,
        }
    }

    pub fn next_name(&mut self, original: &str) -> String {
        let now = self.clock.now_millis();
        let millis = match self.last_millis {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_millis = Some(millis);

        let name = basename(original).unwrap_or(original);
        format!("{}_{}_{}", self.prefix, millis, name)
    }
}
