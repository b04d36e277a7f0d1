//! Haystack timezone names.
//!
//! Haystack names zones by the city part of the Olson id (`New_York`,
//! `Toronto`, `UTC`). The core only needs two things from a zone: its
//! canonical name and the UTC offset in effect at an instant. Lookup goes
//! through the [`ZoneDb`] trait so callers (and tests) can inject their own
//! table; [`ZoneTable::builtin`] is the process-wide default, built from
//! the IANA database bundled by `chrono-tz`.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime as ChronoDateTime, NaiveDateTime, Offset, TimeDelta, TimeZone as _, Utc};
use chrono_tz::{OffsetComponents, TZ_VARIANTS, Tz};

/// Olson regions whose zones get a Haystack name.
const REGIONS: &[&str] = &[
    "Africa",
    "America",
    "Antarctica",
    "Asia",
    "Atlantic",
    "Australia",
    "Etc",
    "Europe",
    "Indian",
    "Pacific",
];

#[derive(Clone, Copy)]
enum Rules {
    Fixed(i32),
    Olson(Tz),
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rules::Fixed(offset) => write!(f, "Fixed({offset})"),
            Rules::Olson(tz) => write!(f, "Olson({})", tz.name()),
        }
    }
}

/// A named zone: either a constant offset or a set of Olson rules.
#[derive(Debug, Clone)]
pub struct TimeZone {
    name: Arc<str>,
    rules: Rules,
}

impl TimeZone {
    /// Zone with a constant offset (seconds east of UTC).
    pub fn fixed(name: &str, offset_secs: i32) -> Self {
        TimeZone {
            name: Arc::from(name),
            rules: Rules::Fixed(offset_secs),
        }
    }

    /// Zone following the Olson rules of `tz`, known as `name`.
    pub fn olson(name: &str, tz: Tz) -> Self {
        TimeZone {
            name: Arc::from(name),
            rules: Rules::Olson(tz),
        }
    }

    pub fn utc() -> Self {
        Self::fixed("UTC", 0)
    }

    /// Haystack name of the zone.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full Olson id, when the zone has one.
    pub fn olson_id(&self) -> Option<&'static str> {
        match self.rules {
            Rules::Olson(tz) => Some(tz.name()),
            Rules::Fixed(_) => None,
        }
    }

    /// Offset without daylight saving, as currently in force.
    pub fn std_offset(&self) -> i32 {
        match self.rules {
            Rules::Fixed(offset) => offset,
            Rules::Olson(tz) => {
                let now = tz.offset_from_utc_datetime(&Utc::now().naive_utc());
                seconds(now.base_utc_offset())
            }
        }
    }

    /// Offset in seconds in effect at the given instant.
    pub fn offset_at_utc(&self, epoch_millis: i64) -> i32 {
        match self.rules {
            Rules::Fixed(offset) => offset,
            Rules::Olson(tz) => match ChronoDateTime::from_timestamp_millis(epoch_millis) {
                Some(utc) => {
                    let offset = tz.offset_from_utc_datetime(&utc.naive_utc());
                    offset.fix().local_minus_utc()
                }
                None => self.std_offset(),
            },
        }
    }

    /// Offset in seconds for a wall-clock time in this zone.
    ///
    /// Wall times inside the spring-forward gap resolve to daylight time and
    /// ambiguous fall-back times resolve to standard time.
    pub fn offset_at_local(&self, local: NaiveDateTime) -> i32 {
        let Rules::Olson(tz) = self.rules else {
            return self.std_offset();
        };
        if let Some(dt) = tz.from_local_datetime(&local).latest() {
            return dt.offset().fix().local_minus_utc();
        }
        // in a gap: apply the offset from before the jump
        let wall = local.and_utc().timestamp_millis();
        let before = self.offset_at_utc(wall - 86_400_000);
        self.offset_at_utc(wall - i64::from(before) * 1000)
    }
}

fn seconds(delta: TimeDelta) -> i32 {
    delta.num_seconds() as i32
}

impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && match (self.rules, other.rules) {
                (Rules::Fixed(a), Rules::Fixed(b)) => a == b,
                (Rules::Olson(a), Rules::Olson(b)) => a.name() == b.name(),
                _ => false,
            }
    }
}

impl Eq for TimeZone {}

impl Hash for TimeZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Haystack name for an Olson id: the part after the last `/`, for ids in
/// one of [`REGIONS`].
fn haystack_name(olson: &str) -> Option<&str> {
    let (region, _) = olson.split_once('/')?;
    if !REGIONS.contains(&region) {
        return None;
    }
    olson.rsplit('/').next()
}

/// Name → zone lookup service.
pub trait ZoneDb: Send + Sync {
    fn find(&self, name: &str) -> Option<TimeZone>;
}

/// In-memory [`ZoneDb`].
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    zones: HashMap<String, TimeZone>,
}

impl ZoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, zone: TimeZone) -> &mut Self {
        self.zones.insert(zone.name().to_string(), zone);
        self
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// A fresh table holding every zone of the bundled IANA database.
    ///
    /// When two ids share a city name the later one, in id order, wins.
    pub fn with_builtin_zones() -> Self {
        let mut table = ZoneTable::new();
        for tz in TZ_VARIANTS.iter().copied() {
            if let Some(name) = haystack_name(tz.name()) {
                table.insert(TimeZone::olson(name, tz));
            }
        }
        tracing::debug!(zones = table.len(), "built timezone table");
        table
    }

    /// Shared table of built-in zones, built on first use.
    pub fn builtin() -> &'static ZoneTable {
        static BUILTIN: OnceLock<ZoneTable> = OnceLock::new();
        BUILTIN.get_or_init(ZoneTable::with_builtin_zones)
    }
}

impl ZoneDb for ZoneTable {
    fn find(&self, name: &str) -> Option<TimeZone> {
        self.zones.get(name).cloned()
    }
}

/// Environment variable naming the process default zone.
pub const DEFAULT_ZONE_VAR: &str = "HAYSTACK_TZ";

/// Process default zone, read once from `HAYSTACK_TZ` (falls back to UTC).
pub fn default_zone() -> &'static TimeZone {
    static DEFAULT: OnceLock<TimeZone> = OnceLock::new();
    DEFAULT.get_or_init(|| match env::var(DEFAULT_ZONE_VAR) {
        Ok(name) => ZoneTable::builtin().find(&name).unwrap_or_else(|| {
            tracing::warn!(zone = %name, "unknown {DEFAULT_ZONE_VAR}, using UTC");
            TimeZone::utc()
        }),
        Err(_) => TimeZone::utc(),
    })
}
