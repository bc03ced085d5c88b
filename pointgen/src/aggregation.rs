//! Greedy merging of stations whose symbols would overlap on the map.

use pointgen_types::geo::{GeoPoint2d, Projection, WebMercator};
use pointgen_types::{CartesianPoint2d, Point2d};

use crate::context::GeneralizeContext;
use crate::registry::{EntryKind, FeatureRegistry, RegistryEntry};

/// Features left after aggregation, in processing order.
#[derive(Debug, Default)]
pub(crate) struct Aggregated {
    /// Input stations that were never merged.
    pub standalone: Vec<String>,
    /// Aggregates created by merging.
    pub aggregates: Vec<String>,
}

/// Checks whether the footprints of two registered features intersect.
///
/// Returns `None` if both ids are the same or one of them is not a registered station or
/// aggregate.
pub fn find_intersection(registry: &FeatureRegistry, a: &str, b: &str) -> Option<bool> {
    if a == b {
        return None;
    }

    let first = registry.symbol(a)?;
    let second = registry.symbol(b)?;
    Some(first.footprint.intersects(&second.footprint))
}

/// Merges stations in the given order until no two remaining footprints that are nearest
/// neighbours of each other intersect.
///
/// For every station still present, the nearest other feature within the merge distance is
/// checked. If their footprints intersect they are replaced by an aggregate and the check is
/// repeated for the aggregate. Processing of a seed stops at the first neighbour that does not
/// intersect, or when the configured merge depth is reached.
pub(crate) fn aggregate(ctx: &mut GeneralizeContext, order: &[String]) -> Aggregated {
    let merge_distance = ctx.config.merge_distance_units(ctx.resolution);
    let max_depth = ctx.config.max_merge_depth();

    let mut result = Aggregated::default();
    let mut merges = 0usize;

    for seed in order {
        if !ctx.registry.contains(seed) {
            continue;
        }

        let mut current = seed.clone();
        let mut depth = 0usize;

        while max_depth.map_or(true, |max| depth < max) {
            let Some(entry) = ctx.registry.get(&current) else {
                break;
            };

            let position = entry.projected;
            let Some(neighbour) = ctx
                .stations
                .knn(
                    position.x(),
                    position.y(),
                    1,
                    merge_distance,
                    Some(current.as_str()),
                )
                .pop()
            else {
                break;
            };

            if find_intersection(&ctx.registry, &current, &neighbour.id) != Some(true) {
                break;
            }

            let Some(merged) = merge(ctx, &current, &neighbour.id) else {
                break;
            };

            current = merged;
            depth += 1;
            merges += 1;
        }

        if current == *seed {
            result.standalone.push(current);
        } else {
            result.aggregates.push(current);
        }
    }

    // Features finished early may have been absorbed by a later seed.
    result.standalone.retain(|id| ctx.registry.contains(id));
    result.aggregates.retain(|id| ctx.registry.contains(id));

    log::debug!(
        "Aggregation made {merges} merges: {} standalone stations, {} aggregates",
        result.standalone.len(),
        result.aggregates.len()
    );

    result
}

/// Replaces two features with their aggregate. Returns the id of the aggregate.
fn merge(ctx: &mut GeneralizeContext, a: &str, b: &str) -> Option<String> {
    let (projected, geodesic) = {
        let first = ctx.registry.get(a)?;
        let second = ctx.registry.get(b)?;
        if !matches!(first.kind, EntryKind::Symbol { .. })
            || !matches!(second.kind, EntryKind::Symbol { .. })
        {
            return None;
        }

        let projected: Point2d = CartesianPoint2d::midpoint(&first.projected, &second.projected);
        let geodesic: GeoPoint2d = WebMercator::default().unproject(&projected)?;
        (projected, geodesic)
    };

    let (
        Some(RegistryEntry {
            kind:
                EntryKind::Symbol {
                    symbol: mut symbol,
                    members: mut members,
                },
            ..
        }),
        Some(RegistryEntry {
            kind:
                EntryKind::Symbol {
                    symbol: absorbed,
                    members: absorbed_members,
                },
            ..
        }),
    ) = (ctx.registry.remove(a), ctx.registry.remove(b))
    else {
        return None;
    };

    symbol.aggregate(absorbed);
    ctx.symbol_builder().refresh_footprint(&mut symbol, geodesic);
    members.extend(absorbed_members);

    let id = aggregate_id(ctx, a, b);
    log::trace!(
        "Merged {a} and {b} into {id} covering {} stations",
        members.len()
    );

    ctx.stations.remove(a);
    ctx.stations.remove(b);
    ctx.stations.insert(id.clone(), projected.x(), projected.y());
    ctx.registry.insert(
        id.clone(),
        RegistryEntry {
            projected,
            geodesic,
            kind: EntryKind::Symbol { symbol, members },
        },
    );

    Some(id)
}

/// Id of the aggregate of `a` and `b`: `agg_<a>:<b>`.
///
/// Feature ids are arbitrary strings, so this can match an id that is already taken (a station
/// named `agg_a:b`, or the aggregates of `x:y` + `z` and `x` + `y:z`). In that case the first
/// free `agg_<a>:<b>#<n>` with `n >= 1` is used.
fn aggregate_id(ctx: &GeneralizeContext, a: &str, b: &str) -> String {
    let base = format!("agg_{a}:{b}");
    let is_taken = |id: &str| ctx.registry.contains(id) || ctx.stations.contains(id);
    if !is_taken(&base) {
        return base;
    }

    let mut n = 1usize;
    loop {
        let id = format!("{base}#{n}");
        if !is_taken(&id) {
            log::debug!("Aggregate id {base} is already taken, using {id}");
            return id;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pointgen_types::geo::GeoPoint;

    use super::*;
    use crate::config::GeneralizerConfig;
    use crate::feature::StationFeature;
    use crate::normalize::MinMax;
    use crate::resolution::Resolution;
    use crate::tests::{catalog, init_logger, temperature_station};

    fn run(
        config: &GeneralizerConfig,
        resolution: f64,
        stations: &[StationFeature],
    ) -> (Aggregated, FeatureRegistry) {
        let catalog = catalog("air_temperature");
        let min_max = MinMax::compute(&catalog, stations);
        let resolution = Resolution::new(resolution).unwrap();
        let mut ctx = GeneralizeContext::new(config, &catalog, &min_max, resolution, 0);

        let builder = ctx.symbol_builder();
        for station in stations {
            let symbol = builder.build(station);
            ctx.registry.insert(
                station.id(),
                RegistryEntry {
                    projected: station.projected(),
                    geodesic: station.geodesic(),
                    kind: EntryKind::Symbol {
                        symbol,
                        members: vec![station.id().to_string()],
                    },
                },
            );
            ctx.stations.insert(
                station.id(),
                station.projected().x(),
                station.projected().y(),
            );
        }

        let order: Vec<String> = stations.iter().map(|s| s.id().to_string()).collect();
        let aggregated = aggregate(&mut ctx, &order);
        (aggregated, ctx.registry)
    }

    #[test]
    fn overlapping_stations_merge() {
        init_logger();
        let stations = [
            temperature_station("a", 0.0, 10.0, 0.1),
            temperature_station("b", 400.0, 10.0, 1.5),
        ];

        let (aggregated, registry) = run(&GeneralizerConfig::default(), 76.437, &stations);

        assert!(aggregated.standalone.is_empty());
        assert_eq!(aggregated.aggregates, ["agg_a:b"]);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.members("agg_a:b"),
            Some(&["a".to_string(), "b".to_string()][..])
        );

        let entry = registry.get("agg_a:b").unwrap();
        assert_abs_diff_eq!(
            entry.projected.x(),
            (stations[0].projected().x() + stations[1].projected().x()) / 2.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(entry.geodesic.lat(), 0.0, epsilon = 1e-9);
        assert!(entry.geodesic.lon() > stations[0].geodesic().lon());
        assert!(entry.geodesic.lon() < stations[1].geodesic().lon());

        let symbol = registry.symbol("agg_a:b").unwrap();
        assert_eq!(symbol.primary.anomaly_value, Some(1.5));
        assert!(symbol.primary.grouped);
        assert_eq!(symbol.footprint.center(), entry.geodesic);
    }

    #[test]
    fn distant_stations_stay_standalone() {
        let stations = [
            temperature_station("a", 0.0, 10.0, 0.1),
            temperature_station("b", 400.0, 10.0, 1.5),
        ];
        let config = GeneralizerConfig::default().with_merge_distance(1000.0);

        let (aggregated, registry) = run(&config, 1.0, &stations);

        assert_eq!(aggregated.standalone, ["a", "b"]);
        assert!(aggregated.aggregates.is_empty());
        assert_eq!(find_intersection(&registry, "a", "b"), Some(false));
        assert_eq!(find_intersection(&registry, "a", "a"), None);
        assert_eq!(find_intersection(&registry, "a", "unknown"), None);
    }

    #[test]
    fn merges_are_chained() {
        let stations = [
            temperature_station("a", 0.0, 10.0, 0.1),
            temperature_station("b", 400.0, 10.0, 0.2),
            temperature_station("c", 800.0, 10.0, 0.3),
        ];

        let (aggregated, registry) = run(&GeneralizerConfig::default(), 76.437, &stations);

        assert!(aggregated.standalone.is_empty());
        assert_eq!(aggregated.aggregates, ["agg_agg_a:b:c"]);
        assert_eq!(registry.members("agg_agg_a:b:c").unwrap().len(), 3);
    }

    #[test]
    fn merge_depth_limit() {
        let stations = [
            temperature_station("a", 0.0, 10.0, 0.1),
            temperature_station("b", 400.0, 10.0, 0.2),
            temperature_station("c", 800.0, 10.0, 0.3),
        ];

        let config = GeneralizerConfig::default().with_max_merge_depth(Some(0));
        let (aggregated, _) = run(&config, 76.437, &stations);
        assert_eq!(aggregated.standalone, ["a", "b", "c"]);
        assert!(aggregated.aggregates.is_empty());

        // "a" stops after merging with "b", the aggregate is later absorbed by "c"
        let config = GeneralizerConfig::default().with_max_merge_depth(Some(1));
        let (aggregated, registry) = run(&config, 76.437, &stations);
        assert!(aggregated.standalone.is_empty());
        assert_eq!(aggregated.aggregates, ["agg_c:agg_a:b"]);
        assert_eq!(
            registry.members("agg_c:agg_a:b"),
            Some(&["c".to_string(), "a".to_string(), "b".to_string()][..])
        );
    }

    #[test]
    fn finished_feature_absorbed_later() {
        // Small symbols of "x" and "w" do not touch, the large symbol of "y" reaches "x" and
        // the resulting aggregate reaches "w".
        let stations = [
            temperature_station("x", 50.0, 0.0, 0.0),
            temperature_station("w", 0.0, 0.0, 0.0),
            temperature_station("y", 105.0, 10.0, 5.0),
        ];
        let config = GeneralizerConfig::default().with_merge_distance(1000.0);

        let (aggregated, registry) = run(&config, 1.0, &stations);

        assert!(aggregated.standalone.is_empty());
        assert_eq!(aggregated.aggregates, ["agg_agg_y:x:w"]);
        assert_eq!(
            registry.members("agg_agg_y:x:w"),
            Some(&["y".to_string(), "x".to_string(), "w".to_string()][..])
        );
        assert_eq!(registry.len(), 1);
    }
}
