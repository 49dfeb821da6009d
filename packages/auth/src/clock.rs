/// Source of "now" in epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> f64;
}

/// Wall clock: `Date.now()` on WASM, `SystemTime` natively.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            js_sys::Date::now()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as f64)
                .unwrap_or(0.0)
        }
    }
}

/// Clock frozen at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_millis(&self) -> f64 {
        self.0
    }
}
