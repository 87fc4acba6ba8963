//! Selectable regions (Polish voivodeships).
//!
//! A [`RegionKey`] is the slug a user picks (e.g. `opolskie`). It is both the
//! cache key and the input to query construction. The static [`REGIONS`]
//! table maps each key to the administrative-name search pattern used by the
//! Overpass query and to a bounding box for viewport fitting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, immutable identifier for a selectable region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(String);

impl RegionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Look up the static region definition for this key.
    pub fn region(&self) -> Option<&'static Region> {
        find_region(&self.0)
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RegionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Rough size class of a region, which predicts how slow its query will be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSize {
    Small,
    Medium,
    Large,
    XLarge,
    XXLarge,
}

impl RegionSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionSize::Small => "small",
            RegionSize::Medium => "medium",
            RegionSize::Large => "large",
            RegionSize::XLarge => "xlarge",
            RegionSize::XXLarge => "xxlarge",
        }
    }
}

impl fmt::Display for RegionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }
}

/// Static definition of one selectable region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Slug used as [`RegionKey`]
    pub key: &'static str,
    /// Human-readable display name
    pub name: &'static str,
    /// Native administrative name as tagged in the geodata store
    pub admin_name: &'static str,
    /// Regex alternation matched against the boundary relation's `name` tag.
    ///
    /// Covers the native full form, the English synonym, the bare name and,
    /// where the name carries diacritics, an ASCII-folded variant.
    pub search_pattern: &'static str,
    pub bbox: BoundingBox,
    pub size: RegionSize,
}

impl Region {
    pub fn key(&self) -> RegionKey {
        RegionKey::new(self.key)
    }
}

/// All sixteen voivodeships, smallest first.
pub static REGIONS: [Region; 16] = [
    Region {
        key: "opolskie",
        name: "Opolskie",
        admin_name: "opolskie",
        search_pattern: "województwo opolskie|opole voivodeship|opolskie",
        bbox: BoundingBox::new(16.8650, 50.2959, 18.8654, 51.1635),
        size: RegionSize::Small,
    },
    Region {
        key: "lubuskie",
        name: "Lubuskie",
        admin_name: "lubuskie",
        search_pattern: "województwo lubuskie|lubusz voivodeship|lubuskie",
        bbox: BoundingBox::new(14.1225, 51.2568, 16.2444, 52.9739),
        size: RegionSize::Small,
    },
    Region {
        key: "swietokrzyskie",
        name: "Świętokrzyskie",
        admin_name: "świętokrzyskie",
        search_pattern: "województwo świętokrzyskie|holy cross voivodeship|świętokrzyskie|swietokrzyskie",
        bbox: BoundingBox::new(19.6653, 50.0527, 21.4791, 51.2694),
        size: RegionSize::Small,
    },
    Region {
        key: "slaskie",
        name: "Śląskie",
        admin_name: "śląskie",
        search_pattern: "województwo śląskie|silesian voivodeship|śląskie|slaskie",
        bbox: BoundingBox::new(18.4417, 49.8094, 19.9372, 50.8277),
        size: RegionSize::Medium,
    },
    Region {
        key: "kujawsko-pomorskie",
        name: "Kujawsko-pomorskie",
        admin_name: "kujawsko-pomorskie",
        search_pattern:
            "województwo kujawsko-pomorskie|kuyavian-pomeranian voivodeship|kujawsko-pomorskie",
        bbox: BoundingBox::new(17.0282, 52.1849, 19.6703, 53.5504),
        size: RegionSize::Medium,
    },
    Region {
        key: "lodzkie",
        name: "Łódzkie",
        admin_name: "łódzkie",
        search_pattern: "województwo łódzkie|łódź voivodeship|łódzkie|lodzkie",
        bbox: BoundingBox::new(18.2182, 51.0154, 20.6367, 52.5838),
        size: RegionSize::Medium,
    },
    Region {
        key: "pomorskie",
        name: "Pomorskie",
        admin_name: "pomorskie",
        search_pattern: "województwo pomorskie|pomeranian voivodeship|pomorskie",
        bbox: BoundingBox::new(16.9367, 53.4782, 19.3288, 54.8391),
        size: RegionSize::Medium,
    },
    Region {
        key: "dolnoslaskie",
        name: "Dolnośląskie",
        admin_name: "dolnośląskie",
        search_pattern:
            "województwo dolnośląskie|lower silesian voivodeship|dolnośląskie|dolnoslaskie",
        bbox: BoundingBox::new(14.6197, 49.9892, 17.8984, 51.8337),
        size: RegionSize::Large,
    },
    Region {
        key: "lubelskie",
        name: "Lubelskie",
        admin_name: "lubelskie",
        search_pattern: "województwo lubelskie|lublin voivodeship|lubelskie",
        bbox: BoundingBox::new(21.6926, 50.2397, 24.1459, 51.6168),
        size: RegionSize::Large,
    },
    Region {
        key: "malopolskie",
        name: "Małopolskie",
        admin_name: "małopolskie",
        search_pattern:
            "województwo małopolskie|lesser poland voivodeship|małopolskie|malopolskie",
        bbox: BoundingBox::new(19.1044, 49.1441, 21.2697, 50.7837),
        size: RegionSize::Large,
    },
    Region {
        key: "podkarpackie",
        name: "Podkarpackie",
        admin_name: "podkarpackie",
        search_pattern: "województwo podkarpackie|subcarpathian voivodeship|podkarpackie",
        bbox: BoundingBox::new(21.0371, 49.0273, 23.0311, 50.6841),
        size: RegionSize::Large,
    },
    Region {
        key: "podlaskie",
        name: "Podlaskie",
        admin_name: "podlaskie",
        search_pattern: "województwo podlaskie|podlaskie voivodeship|podlaskie",
        bbox: BoundingBox::new(22.1170, 52.8071, 24.1508, 54.3634),
        size: RegionSize::Large,
    },
    Region {
        key: "warminsko-mazurskie",
        name: "Warmińsko-mazurskie",
        admin_name: "warmińsko-mazurskie",
        search_pattern: "województwo warmińsko-mazurskie|warmian-masurian voivodeship|warmińsko-mazurskie|warminsko-mazurskie",
        bbox: BoundingBox::new(19.3288, 53.3274, 23.0260, 54.5186),
        size: RegionSize::Large,
    },
    Region {
        key: "wielkopolskie",
        name: "Wielkopolskie",
        admin_name: "wielkopolskie",
        search_pattern: "województwo wielkopolskie|greater poland voivodeship|wielkopolskie",
        bbox: BoundingBox::new(14.6197, 51.4000, 18.9365, 53.3274),
        size: RegionSize::XLarge,
    },
    Region {
        key: "zachodniopomorskie",
        name: "Zachodniopomorskie",
        admin_name: "zachodniopomorskie",
        search_pattern:
            "województwo zachodniopomorskie|west pomeranian voivodeship|zachodniopomorskie",
        bbox: BoundingBox::new(14.1225, 53.1580, 16.9367, 54.8391),
        size: RegionSize::XLarge,
    },
    Region {
        key: "mazowieckie",
        name: "Mazowieckie",
        admin_name: "mazowieckie",
        search_pattern: "województwo mazowieckie|masovian voivodeship|mazowieckie",
        bbox: BoundingBox::new(19.3152, 51.7294, 23.1826, 53.4839),
        size: RegionSize::XXLarge,
    },
];

/// Find a region by its slug.
pub fn find_region(key: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.key == key)
}
