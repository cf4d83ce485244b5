//! Geospatial encoding on top of sorted sets.
//!
//! Points are stored as sorted-set members whose score is a 52-bit
//! interleaved geohash, so the stored position is the centre of a cell of
//! roughly 0.6 m. Distances are computed between decoded cell centres, which
//! is why two GEODIST calls on the same members always agree exactly.

use std::f64::consts::PI;

use super::sorted_set::SortedSet;

/// Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_372_797.560_856;

pub const LONGITUDE_MIN: f64 = -180.0;
pub const LONGITUDE_MAX: f64 = 180.0;
pub const LATITUDE_MIN: f64 = -85.051_128_78;
pub const LATITUDE_MAX: f64 = 85.051_128_78;

/// Bits per coordinate.
const GEO_STEP: u32 = 26;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoord {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoCoord {
    /// Returns `None` when the pair lies outside the indexable area.
    pub fn new(longitude: f64, latitude: f64) -> Option<Self> {
        if !(LONGITUDE_MIN..=LONGITUDE_MAX).contains(&longitude) {
            return None;
        }
        if !(LATITUDE_MIN..=LATITUDE_MAX).contains(&latitude) {
            return None;
        }

        Some(Self {
            longitude,
            latitude,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl DistanceUnit {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "m" => Some(Self::Meters),
            "km" => Some(Self::Kilometers),
            "mi" => Some(Self::Miles),
            "ft" => Some(Self::Feet),
            _ => None,
        }
    }

    fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1_000.0,
            Self::Miles => 1_609.34,
            Self::Feet => 0.3048,
        }
    }

    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    pub fn from_meters(self, value: f64) -> f64 {
        value / self.meters_per_unit()
    }
}

/// Spreads the low 32 bits of `value` over the even bit positions of a u64.
fn spread_bits(value: u32) -> u64 {
    let mut result = 0u64;
    for bit in 0..32 {
        result |= (((value >> bit) & 1) as u64) << (bit * 2);
    }
    result
}

/// Collects the even bit positions of `value` back into a u32.
fn squash_bits(value: u64) -> u32 {
    let mut result = 0u32;
    for bit in 0..32 {
        result |= (((value >> (bit * 2)) & 1) as u32) << bit;
    }
    result
}

fn scale(value: f64, min: f64, max: f64) -> u32 {
    let offset = (value - min) / (max - min);
    let cells = (1u64 << GEO_STEP) as f64;
    ((offset * cells) as u64).min((1u64 << GEO_STEP) - 1) as u32
}

/// Encodes a coordinate into its 52-bit interleaved geohash.
///
/// Latitude occupies the even bits and longitude the odd bits.
pub fn geohash_encode(coord: &GeoCoord) -> u64 {
    let latitude_bits = scale(coord.latitude, LATITUDE_MIN, LATITUDE_MAX);
    let longitude_bits = scale(coord.longitude, LONGITUDE_MIN, LONGITUDE_MAX);

    spread_bits(latitude_bits) | (spread_bits(longitude_bits) << 1)
}

/// Decodes a geohash into the centre of its cell.
pub fn geohash_decode(hash: u64) -> GeoCoord {
    let latitude_bits = squash_bits(hash) as f64;
    let longitude_bits = squash_bits(hash >> 1) as f64;
    let cells = (1u64 << GEO_STEP) as f64;

    let latitude_step = (LATITUDE_MAX - LATITUDE_MIN) / cells;
    let longitude_step = (LONGITUDE_MAX - LONGITUDE_MIN) / cells;

    let latitude_min = LATITUDE_MIN + latitude_bits * latitude_step;
    let longitude_min = LONGITUDE_MIN + longitude_bits * longitude_step;

    GeoCoord {
        longitude: (longitude_min + longitude_step / 2.0).clamp(LONGITUDE_MIN, LONGITUDE_MAX),
        latitude: (latitude_min + latitude_step / 2.0).clamp(LATITUDE_MIN, LATITUDE_MAX),
    }
}

pub fn score_from_coord(coord: &GeoCoord) -> f64 {
    geohash_encode(coord) as f64
}

pub fn coord_from_score(score: f64) -> GeoCoord {
    geohash_decode(score as u64)
}

/// Great-circle distance in meters.
pub fn haversine_distance(c1: &GeoCoord, c2: &GeoCoord) -> f64 {
    let lat1 = c1.latitude * PI / 180.0;
    let lat2 = c2.latitude * PI / 180.0;
    let lon1 = c1.longitude * PI / 180.0;
    let lon2 = c2.longitude * PI / 180.0;

    let u = ((lat2 - lat1) / 2.0).sin();
    let v = ((lon2 - lon1) / 2.0).sin();

    2.0 * EARTH_RADIUS_METERS * (u * u + lat1.cos() * lat2.cos() * v * v).sqrt().asin()
}

/// Formats a distance with four decimals, as GEODIST and WITHDIST do.
pub fn format_distance(distance: f64) -> String {
    format!("{:.4}", distance)
}

/// A member found by a radius search.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    pub member: String,
    pub distance_meters: f64,
    pub coord: GeoCoord,
}

/// Returns members within `radius_meters` of `center`, nearest first.
///
/// Members at equal distance keep their sorted-set order.
pub fn search_radius(set: &SortedSet, center: &GeoCoord, radius_meters: f64) -> Vec<GeoMatch> {
    let mut matches = set
        .iter()
        .filter_map(|entry| {
            let coord = coord_from_score(entry.score);
            let distance_meters = haversine_distance(center, &coord);

            (distance_meters <= radius_meters).then(|| GeoMatch {
                member: entry.member.clone(),
                distance_meters,
                coord,
            })
        })
        .collect::<Vec<GeoMatch>>();

    matches.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    matches
}
