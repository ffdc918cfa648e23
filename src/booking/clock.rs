use chrono::{DateTime, FixedOffset, Local, Utc};

/// Source of "now" for order stamps and scheduling checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time in the rider's zone. Display stamps and "today" come from here.
    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now().fixed_offset()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock pinned to a fixed UTC offset, e.g. `+02:00` for Kigali.
pub struct ZonedClock<C> {
    inner: C,
    offset: FixedOffset,
}

impl<C: Clock> ZonedClock<C> {
    pub fn new(inner: C, offset: FixedOffset) -> Self {
        Self { inner, offset }
    }
}

impl<C: Clock> Clock for ZonedClock<C> {
    fn now(&self) -> DateTime<Utc> {
        self.inner.now()
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.inner.now().with_timezone(&self.offset)
    }
}
