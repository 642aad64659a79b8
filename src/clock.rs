//! Time and randomness ports, so repositories can be driven deterministically.

use chrono::{DateTime, Utc};
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

pub trait RandomPort: Send + Sync {
    /// Short base-36 suffix used to disambiguate ids minted in the same millisecond.
    fn id_suffix(&self) -> String;
}

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses the thread rng.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn id_suffix(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..ID_SUFFIX_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

/// Manually driven clock for testing. Starts at the given epoch millis.
#[cfg(test)]
pub struct FixedClock(std::sync::atomic::AtomicI64);

#[cfg(test)]
impl FixedClock {
    pub fn at(millis: i64) -> Self {
        Self(std::sync::atomic::AtomicI64::new(millis))
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.0.load(std::sync::atomic::Ordering::SeqCst);
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }
}

/// Counter-based suffixes for testing: "000000001", "000000002", ...
#[cfg(test)]
#[derive(Default)]
pub struct FixedRandom(std::sync::atomic::AtomicU64);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn id_suffix(&self) -> String {
        let next = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        format!("{next:09}")
    }
}
