//! Native document identifiers and their generator.

use super::ObjectIdError;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

const OBJECT_ID_LEN: usize = 12;
const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Twelve-byte document identifier assigned by a document store.
///
/// The layout is a four-byte big-endian creation timestamp in seconds, a
/// five-byte generator-unique value and a three-byte big-endian counter. The
/// textual form is 24 lowercase hexadecimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Creates an identifier from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw identifier bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; OBJECT_ID_LEN] {
        self.0
    }

    /// Parses the 24-digit hexadecimal representation.
    ///
    /// Upper- and lowercase digits are both accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectIdError::InvalidLength`] when the input is not exactly
    /// 24 characters long and [`ObjectIdError::InvalidCharacter`] when it
    /// contains a non-hexadecimal character.
    pub fn parse_str(value: &str) -> Result<Self, ObjectIdError> {
        let length = value.chars().count();
        if length != OBJECT_ID_HEX_LEN {
            return Err(ObjectIdError::InvalidLength(length));
        }

        let mut nibbles = value.chars().enumerate().map(|(position, character)| {
            character
                .to_digit(16)
                .ok_or(ObjectIdError::InvalidCharacter {
                    character,
                    position,
                })
        });
        let mut bytes = [0_u8; OBJECT_ID_LEN];
        for slot in &mut bytes {
            let high = nibbles.next().ok_or(ObjectIdError::InvalidLength(length))??;
            let low = nibbles.next().ok_or(ObjectIdError::InvalidLength(length))??;
            *slot = u8::try_from((high << 4) | low)
                .map_err(|_| ObjectIdError::InvalidLength(length))?;
        }
        Ok(Self(bytes))
    }

    /// Returns the lowercase hexadecimal representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Returns the creation time encoded in the identifier, to the second.
    #[must_use]
    #[expect(
        clippy::big_endian_bytes,
        reason = "object identifiers encode their timestamp in network byte order"
    )]
    pub fn timestamp(&self) -> DateTime<Utc> {
        let [a, b, c, d, ..] = self.0;
        let seconds = u32::from_be_bytes([a, b, c, d]);
        DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or_default()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Assigns fresh [`ObjectId`] values on behalf of a document store.
///
/// Each generator draws its own random five-byte value and counter seed, so
/// identifiers from one generator never collide with each other and are
/// unlikely to collide with those of another.
pub struct ObjectIdGenerator {
    clock: Arc<dyn Clock + Send + Sync>,
    unique: [u8; 5],
    counter: AtomicU32,
}

impl ObjectIdGenerator {
    /// Creates a generator reading timestamps from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates a generator reading timestamps from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let random = Uuid::new_v4().into_bytes();
        let mut unique = [0_u8; 5];
        for (slot, byte) in unique.iter_mut().zip(random.iter()) {
            *slot = *byte;
        }
        let seed = random
            .iter()
            .skip(unique.len())
            .take(3)
            .fold(0_u32, |acc, byte| (acc << 8) | u32::from(*byte));

        Self {
            clock,
            unique,
            counter: AtomicU32::new(seed),
        }
    }

    /// Returns a new identifier.
    #[expect(
        clippy::big_endian_bytes,
        reason = "object identifiers encode timestamp and counter in network byte order"
    )]
    pub fn generate(&self) -> ObjectId {
        let seconds = clamp_seconds(self.clock.utc().timestamp());
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let parts = seconds
            .to_be_bytes()
            .into_iter()
            .chain(self.unique)
            .chain(counter.to_be_bytes().into_iter().skip(1));
        let mut bytes = [0_u8; OBJECT_ID_LEN];
        for (slot, byte) in bytes.iter_mut().zip(parts) {
            *slot = byte;
        }
        ObjectId(bytes)
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectIdGenerator")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

fn clamp_seconds(timestamp: i64) -> u32 {
    if timestamp < 0 {
        return 0;
    }
    u32::try_from(timestamp).unwrap_or(u32::MAX)
}
