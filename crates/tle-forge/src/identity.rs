//! Catalog identity assignment for forged records
//!
//! Synthetic records still need a catalog number, a classification and an
//! international designator. The forger draws them from an
//! [`IdentitySource`], so callers can keep the fixed placeholder identity,
//! count catalog numbers up, or plug in their own scheme.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Security classification column of line 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    Unclassified,
    Classified,
    Secret,
}

impl Classification {
    pub fn as_char(&self) -> char {
        match self {
            Self::Unclassified => 'U',
            Self::Classified => 'C',
            Self::Secret => 'S',
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Catalog identity written into both element lines
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SatelliteIdentity {
    /// NORAD catalog number, 5 digits on the wire
    pub catalog_number: u32,
    pub classification: Classification,
    /// International designator (launch year, launch number, piece), at most 8 ASCII bytes
    pub international_designator: String,
}

impl SatelliteIdentity {
    /// Fixed identity of sandbox records: `00000`, unclassified, `25001A`
    pub fn placeholder() -> Self {
        Self {
            catalog_number: 0,
            classification: Classification::Unclassified,
            international_designator: "25001A".to_string(),
        }
    }
}

impl Default for SatelliteIdentity {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Supplies identities to a forger, one per record, in forging order
pub trait IdentitySource {
    fn next_identity(&mut self) -> SatelliteIdentity;

    /// Hand the last `count` identities back after their records failed
    ///
    /// The next draw then repeats them. Stateless sources keep the default.
    fn rewind(&mut self, _count: u32) {}
}

impl<T: IdentitySource + ?Sized> IdentitySource for Box<T> {
    fn next_identity(&mut self) -> SatelliteIdentity {
        (**self).next_identity()
    }

    fn rewind(&mut self, count: u32) {
        (**self).rewind(count)
    }
}

impl<T: IdentitySource + ?Sized> IdentitySource for &mut T {
    fn next_identity(&mut self) -> SatelliteIdentity {
        (**self).next_identity()
    }

    fn rewind(&mut self, count: u32) {
        (**self).rewind(count)
    }
}

/// Hands out the same identity to every record
#[derive(Debug, Clone, Default)]
pub struct PlaceholderIdentity {
    identity: SatelliteIdentity,
}

impl PlaceholderIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse `identity` for every record instead of the sandbox default
    pub fn fixed(identity: SatelliteIdentity) -> Self {
        Self { identity }
    }
}

impl IdentitySource for PlaceholderIdentity {
    fn next_identity(&mut self) -> SatelliteIdentity {
        self.identity.clone()
    }
}

/// Counts catalog numbers up and gives every record its own launch piece
///
/// Pieces follow the designator convention `A..Z`, `AA..ZZ`, `AAA..`, all
/// under a single launch `YYNNN`.
#[derive(Debug, Clone)]
pub struct SequentialIdentity {
    next_catalog: u32,
    launch_year: i32,
    launch_number: u16,
    next_piece: u32,
    classification: Classification,
}

impl SequentialIdentity {
    pub fn new(first_catalog_number: u32, launch_year: i32, launch_number: u16) -> Self {
        Self {
            next_catalog: first_catalog_number,
            launch_year,
            launch_number,
            next_piece: 0,
            classification: Classification::Unclassified,
        }
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    fn designator(&self, piece: u32) -> String {
        format!(
            "{:02}{:03}{}",
            self.launch_year.rem_euclid(100),
            self.launch_number,
            piece_code(piece)
        )
    }
}

impl IdentitySource for SequentialIdentity {
    fn next_identity(&mut self) -> SatelliteIdentity {
        let identity = SatelliteIdentity {
            catalog_number: self.next_catalog,
            classification: self.classification,
            international_designator: self.designator(self.next_piece),
        };
        self.next_catalog = self.next_catalog.saturating_add(1);
        self.next_piece = self.next_piece.saturating_add(1);
        identity
    }

    fn rewind(&mut self, count: u32) {
        self.next_catalog = self.next_catalog.saturating_sub(count);
        self.next_piece = self.next_piece.saturating_sub(count);
    }
}

/// Launch piece letters for a zero-based piece index: 0 → A, 25 → Z, 26 → AA
pub fn piece_code(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = index as u64 + 1;
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Identity scheme selectable from configuration files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityConfig {
    #[default]
    Placeholder,
    Sequential {
        first_catalog_number: u32,
        #[serde(default = "default_launch_year")]
        launch_year: i32,
        #[serde(default = "default_launch_number")]
        launch_number: u16,
    },
}

fn default_launch_year() -> i32 {
    2025
}

fn default_launch_number() -> u16 {
    1
}

impl IdentityConfig {
    pub fn build(&self) -> Box<dyn IdentitySource + Send> {
        match *self {
            Self::Placeholder => Box::new(PlaceholderIdentity::new()),
            Self::Sequential {
                first_catalog_number,
                launch_year,
                launch_number,
            } => Box::new(SequentialIdentity::new(
                first_catalog_number,
                launch_year,
                launch_number,
            )),
        }
    }
}
