use crate::{
    collections::{
        geo::{
            coord_from_score, format_distance, haversine_distance, score_from_coord, search_radius,
            DistanceUnit, GeoCoord,
        },
        sorted_set::SortedSet,
    },
    commands::{
        command_error::CommandError,
        command_utils::{parse_count, parse_float},
    },
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct GeoaddArguments {
    key: String,
    points: Vec<(GeoCoord, String)>,
}

impl GeoaddArguments {
    /// Parses `GEOADD key longitude latitude member [longitude latitude member ...]`.
    ///
    /// All coordinates are validated before anything is stored.
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 4 || (arguments.len() - 1) % 3 != 0 {
            return Err(CommandError::WrongNumberOfArguments("geoadd".to_string()));
        }

        let mut points = Vec::with_capacity((arguments.len() - 1) / 3);

        for triple in arguments[1..].chunks(3) {
            let coord = parse_coord(&triple[0], &triple[1])?;
            points.push((coord, triple[2].clone()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            points,
        })
    }
}

pub struct GeodistArguments {
    key: String,
    first_member: String,
    second_member: String,
    unit: DistanceUnit,
}

impl GeodistArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 3 && arguments.len() != 4 {
            return Err(CommandError::WrongNumberOfArguments("geodist".to_string()));
        }

        let unit = match arguments.get(3) {
            Some(unit) => parse_unit(unit)?,
            None => DistanceUnit::Meters,
        };

        Ok(Self {
            key: arguments[0].clone(),
            first_member: arguments[1].clone(),
            second_member: arguments[2].clone(),
            unit,
        })
    }
}

pub struct GeoposArguments {
    key: String,
    members: Vec<String>,
}

impl GeoposArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments("geopos".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            members: arguments[1..].to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOrigin {
    LonLat(GeoCoord),
    Member(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug)]
pub struct GeosearchArguments {
    key: String,
    origin: SearchOrigin,
    radius: f64,
    unit: DistanceUnit,
    order: SortOrder,
    count: Option<usize>,
    with_dist: bool,
    with_coord: bool,
}

impl GeosearchArguments {
    /// Parses `GEOSEARCH key FROMLONLAT lon lat | FROMMEMBER member BYRADIUS radius unit
    /// [ASC | DESC] [COUNT n] [WITHDIST] [WITHCOORD]`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let args = GeosearchArguments::parse(vec![
    ///     "sellers".to_string(),
    ///     "FROMLONLAT".to_string(),
    ///     "106.821666".to_string(),
    ///     "-6.175494".to_string(),
    ///     "BYRADIUS".to_string(),
    ///     "5".to_string(),
    ///     "km".to_string(),
    /// ])?;
    /// ```
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 6 {
            return Err(CommandError::WrongNumberOfArguments("geosearch".to_string()));
        }

        let key = arguments[0].clone();
        let mut origin: Option<SearchOrigin> = None;
        let mut radius: Option<(f64, DistanceUnit)> = None;
        let mut order = SortOrder::Ascending;
        let mut count: Option<usize> = None;
        let mut with_dist = false;
        let mut with_coord = false;

        let mut index = 1;
        while index < arguments.len() {
            let remaining = arguments.len() - index - 1;

            match arguments[index].to_uppercase().as_str() {
                "FROMLONLAT" if remaining >= 2 && origin.is_none() => {
                    let coord = parse_coord(&arguments[index + 1], &arguments[index + 2])?;
                    origin = Some(SearchOrigin::LonLat(coord));
                    index += 3;
                }
                "FROMMEMBER" if remaining >= 1 && origin.is_none() => {
                    origin = Some(SearchOrigin::Member(arguments[index + 1].clone()));
                    index += 2;
                }
                "BYRADIUS" if remaining >= 2 && radius.is_none() => {
                    let value = parse_float(&arguments[index + 1])?;
                    if value < 0.0 {
                        return Err(CommandError::invalid_argument("radius cannot be negative"));
                    }
                    radius = Some((value, parse_unit(&arguments[index + 2])?));
                    index += 3;
                }
                "ASC" => {
                    order = SortOrder::Ascending;
                    index += 1;
                }
                "DESC" => {
                    order = SortOrder::Descending;
                    index += 1;
                }
                "COUNT" if remaining >= 1 => {
                    count = Some(parse_count(&arguments[index + 1])?);
                    index += 2;
                }
                "WITHDIST" => {
                    with_dist = true;
                    index += 1;
                }
                "WITHCOORD" => {
                    with_coord = true;
                    index += 1;
                }
                _ => return Err(CommandError::syntax_error()),
            }
        }

        let Some(origin) = origin else {
            return Err(CommandError::invalid_argument(
                "exactly one of FROMMEMBER or FROMLONLAT can be specified for GEOSEARCH",
            ));
        };

        let Some((radius, unit)) = radius else {
            return Err(CommandError::invalid_argument(
                "exactly one of BYRADIUS and BYBOX can be specified for GEOSEARCH",
            ));
        };

        Ok(Self {
            key,
            origin,
            radius,
            unit,
            order,
            count,
            with_dist,
            with_coord,
        })
    }
}

fn parse_coord(longitude: &str, latitude: &str) -> Result<GeoCoord, CommandError> {
    let longitude = parse_float(longitude)?;
    let latitude = parse_float(latitude)?;

    GeoCoord::new(longitude, latitude).ok_or_else(|| {
        CommandError::InvalidArgument(format!(
            "invalid longitude,latitude pair {:.6},{:.6}",
            longitude, latitude
        ))
    })
}

fn parse_unit(input: &str) -> Result<DistanceUnit, CommandError> {
    DistanceUnit::parse(input).ok_or_else(|| {
        CommandError::invalid_argument("unsupported unit provided. please use M, KM, FT, MI")
    })
}

fn format_coordinate(value: f64) -> String {
    format!("{}", value)
}

/// Stores points as sorted-set members scored by geohash. Replies how many were new.
pub fn geoadd(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let geoadd_arguments = GeoaddArguments::parse(arguments)?;

    let DataType::SortedSet(set) = store.write_or_create(
        &geoadd_arguments.key,
        ValueKind::SortedSet,
        || DataType::SortedSet(SortedSet::new()),
    )?
    else {
        return Err(CommandError::WrongTypeForKey);
    };

    let added = geoadd_arguments
        .points
        .iter()
        .filter(|(coord, member)| set.insert(member, score_from_coord(coord)))
        .count();

    Ok(Reply::Integer(added as i64))
}

/// Distance between two stored members, or `Null` if either is missing.
pub fn geodist(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let geodist_arguments = GeodistArguments::parse(arguments)?;

    let Some(DataType::SortedSet(set)) = store.read(&geodist_arguments.key, ValueKind::SortedSet)?
    else {
        return Ok(Reply::Null);
    };

    let (Some(first), Some(second)) = (
        set.score(&geodist_arguments.first_member),
        set.score(&geodist_arguments.second_member),
    ) else {
        return Ok(Reply::Null);
    };

    let distance = haversine_distance(&coord_from_score(first), &coord_from_score(second));

    Ok(Reply::BulkString(format_distance(
        geodist_arguments.unit.from_meters(distance),
    )))
}

/// Stored position of each member as `[longitude, latitude]`, `Null` for unknown members.
pub fn geopos(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let geopos_arguments = GeoposArguments::parse(arguments)?;

    let set = match store.read(&geopos_arguments.key, ValueKind::SortedSet)? {
        Some(DataType::SortedSet(set)) => Some(set),
        _ => None,
    };

    let positions = geopos_arguments
        .members
        .iter()
        .map(|member| {
            match set.and_then(|set| set.score(member)) {
                Some(score) => {
                    let coord = coord_from_score(score);
                    Reply::Array(vec![
                        Reply::BulkString(format_coordinate(coord.longitude)),
                        Reply::BulkString(format_coordinate(coord.latitude)),
                    ])
                }
                None => Reply::Null,
            }
        })
        .collect();

    Ok(Reply::Array(positions))
}

/// Members within a radius of a point or of another member, nearest first by default.
pub fn geosearch(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let geosearch_arguments = GeosearchArguments::parse(arguments)?;

    let Some(DataType::SortedSet(set)) =
        store.read(&geosearch_arguments.key, ValueKind::SortedSet)?
    else {
        return Ok(Reply::empty_array());
    };

    let center = match &geosearch_arguments.origin {
        SearchOrigin::LonLat(coord) => *coord,
        SearchOrigin::Member(member) => match set.score(member) {
            Some(score) => coord_from_score(score),
            None => {
                return Err(CommandError::invalid_argument(
                    "could not decode requested zset member",
                ))
            }
        },
    };

    let radius_meters = geosearch_arguments.unit.to_meters(geosearch_arguments.radius);
    let mut matches = search_radius(set, &center, radius_meters);

    if geosearch_arguments.order == SortOrder::Descending {
        matches.reverse();
    }

    if let Some(count) = geosearch_arguments.count {
        matches.truncate(count);
    }

    let with_details = geosearch_arguments.with_dist || geosearch_arguments.with_coord;

    let items = matches
        .into_iter()
        .map(|found| {
            if !with_details {
                return Reply::BulkString(found.member);
            }

            let mut item = vec![Reply::BulkString(found.member)];
            if geosearch_arguments.with_dist {
                item.push(Reply::BulkString(format_distance(
                    geosearch_arguments.unit.from_meters(found.distance_meters),
                )));
            }
            if geosearch_arguments.with_coord {
                item.push(Reply::Array(vec![
                    Reply::BulkString(format_coordinate(found.coord.longitude)),
                    Reply::BulkString(format_coordinate(found.coord.latitude)),
                ]));
            }
            Reply::Array(item)
        })
        .collect();

    Ok(Reply::Array(items))
}
