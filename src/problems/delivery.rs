//! Delivery-truck routing over a road map.
//!
//! Trucks drive between cities spending fuel (1 liter per 100 km), refuel
//! to capacity whenever they arrive at a depot, and automatically carry
//! every undelivered package sitting in the city they leave. The goal is
//! every package at its destination and every truck parked at a depot.

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use thiserror::Error;

use crate::float_cost::FloatCost;
use crate::problem::InvalidAction;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Path;
use crate::space::State;

/// Fuel efficiency of every truck.
pub const KM_PER_LITER: f64 = 100.0;

/// Fuel volumes double as path costs.
pub type Liters = FloatCost<f64>;

#[inline(always)]
pub fn liters_for_km(km: f64) -> Liters {
    FloatCost::new(km / KM_PER_LITER)
}

/// Interned city name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CityId(u16);

/// Malformed problem instance, rejected at load time.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MapError {
    #[error("city '{0}' is not on the map")]
    UnknownCity(String),
    #[error("city '{0}' is listed twice")]
    DuplicateCity(String),
    #[error("duplicate road between '{0}' and '{1}'")]
    DuplicateRoad(String, String),
    #[error("road between '{0}' and '{1}' has non-positive length {2}km")]
    BadRoadLength(String, String, f64),
}

/// Undirected road network with refueling depots.
#[derive(Clone, Debug)]
pub struct RoadMap {
    names: Vec<String>,
    index: FxHashMap<String, CityId>,
    roads: Vec<Vec<(CityId, f64)>>,
    depots: FxHashSet<CityId>,
    /// Length of the shortest road, used to scale the package heuristic.
    cheapest_road_km: f64,
}

impl RoadMap {
    /// Builds a map from a flat edge list, validating every reference.
    pub fn new(
        cities: &[&str],
        roads: &[(&str, f64, &str)],
        depots: &[&str],
    ) -> Result<Self, MapError> {
        let mut map = Self {
            names: Vec::with_capacity(cities.len()),
            index: FxHashMap::default(),
            roads: vec![vec![]; cities.len()],
            depots: FxHashSet::default(),
            cheapest_road_km: 0.0,
        };

        for city in cities {
            let id = CityId(map.names.len() as u16);
            if map.index.insert(city.to_string(), id).is_some() {
                return Err(MapError::DuplicateCity(city.to_string()));
            }
            map.names.push(city.to_string());
        }

        for (a, km, b) in roads {
            let from = map.city(a)?;
            let to = map.city(b)?;
            if *km <= 0.0 {
                return Err(MapError::BadRoadLength(a.to_string(), b.to_string(), *km));
            }
            if map.road_km(from, to).is_some() {
                return Err(MapError::DuplicateRoad(a.to_string(), b.to_string()));
            }

            map.roads[from.0 as usize].push((to, *km));
            map.roads[to.0 as usize].push((from, *km));
            if map.cheapest_road_km == 0.0 || *km < map.cheapest_road_km {
                map.cheapest_road_km = *km;
            }
        }

        for depot in depots {
            let id = map.city(depot)?;
            map.depots.insert(id);
        }

        Ok(map)
    }

    pub fn city(&self, name: &str) -> Result<CityId, MapError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| MapError::UnknownCity(name.to_string()))
    }

    pub fn name(&self, city: CityId) -> &str {
        &self.names[city.0 as usize]
    }

    pub fn neighbours(&self, city: CityId) -> &[(CityId, f64)] {
        &self.roads[city.0 as usize]
    }

    pub fn road_km(&self, from: CityId, to: CityId) -> Option<f64> {
        self.neighbours(from)
            .iter()
            .find(|(c, _)| *c == to)
            .map(|(_, km)| *km)
    }

    pub fn is_depot(&self, city: CityId) -> bool {
        self.depots.contains(&city)
    }

    pub fn cheapest_road_km(&self) -> f64 {
        self.cheapest_road_km
    }

    pub fn cheapest_road_liters(&self) -> Liters {
        liters_for_km(self.cheapest_road_km)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Truck {
    pub id: String,
    pub city: CityId,
    pub tank_capacity: Liters,
    pub fuel: Liters,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Package {
    pub id: String,
    pub location: CityId,
    pub destination: CityId,
}

impl Package {
    #[inline(always)]
    pub fn delivered(&self) -> bool {
        self.location == self.destination
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeliveryState {
    pub trucks: Vec<Truck>,
    pub packages: Vec<Package>,
}
impl State for DeliveryState {}

impl DeliveryState {
    pub fn undelivered(&self) -> usize {
        self.packages.iter().filter(|p| !p.delivered()).count()
    }
}

/// One truck drives one road, carrying the listed packages.
///
/// `truck` and `packages` index into the state's vectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Drive {
    pub truck: usize,
    pub from: CityId,
    pub to: CityId,
    pub fuel: Liters,
    pub packages: SmallVec<[usize; 4]>,
}
impl Action for Drive {}

#[derive(Clone, Debug)]
pub struct DeliveryProblem {
    map: RoadMap,
    initial: DeliveryState,
}

impl DeliveryProblem {
    /// `trucks` are `(id, home city, tank liters)` and start with a full
    /// tank; `packages` are `(id, origin city, destination city)`.
    pub fn new(
        map: RoadMap,
        trucks: &[(&str, &str, f64)],
        packages: &[(&str, &str, &str)],
    ) -> Result<Self, MapError> {
        let trucks = trucks
            .iter()
            .map(|(id, city, tank)| {
                Ok(Truck {
                    id: id.to_string(),
                    city: map.city(city)?,
                    tank_capacity: FloatCost::new(*tank),
                    fuel: FloatCost::new(*tank),
                })
            })
            .collect::<Result<Vec<_>, MapError>>()?;

        let packages = packages
            .iter()
            .map(|(id, origin, destination)| {
                Ok(Package {
                    id: id.to_string(),
                    location: map.city(origin)?,
                    destination: map.city(destination)?,
                })
            })
            .collect::<Result<Vec<_>, MapError>>()?;

        Ok(Self {
            map,
            initial: DeliveryState { trucks, packages },
        })
    }

    pub fn map(&self) -> &RoadMap {
        &self.map
    }

    /// Every undelivered package sitting where the truck is.
    fn liftable(&self, s: &DeliveryState, truck: &Truck) -> SmallVec<[usize; 4]> {
        s.packages
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.delivered() && p.location == truck.city)
            .map(|(i, _)| i)
            .collect()
    }

    /// Checks that `a` is exactly what `actions` would offer in `s`.
    fn validate(
        &self,
        s: &DeliveryState,
        a: &Drive,
    ) -> Result<(), InvalidAction<DeliveryState, Drive>> {
        let invalid = || InvalidAction {
            state: s.clone(),
            action: a.clone(),
        };

        let truck = s.trucks.get(a.truck).ok_or_else(invalid)?;
        if truck.city != a.from {
            return Err(invalid());
        }
        let km = self.map.road_km(a.from, a.to).ok_or_else(invalid)?;
        let fuel = liters_for_km(km);
        if a.fuel != fuel || truck.fuel < fuel {
            return Err(invalid());
        }
        if a.packages != self.liftable(s, truck) {
            return Err(invalid());
        }
        Ok(())
    }
}

impl Problem<DeliveryState, Drive, Liters> for DeliveryProblem {
    fn initial_state(&self) -> DeliveryState {
        self.initial.clone()
    }

    fn actions(&self, s: &DeliveryState) -> Vec<Drive> {
        let mut actions = vec![];

        for (ti, truck) in s.trucks.iter().enumerate() {
            let liftable = self.liftable(s, truck);

            for (to, km) in self.map.neighbours(truck.city) {
                let fuel = liters_for_km(*km);
                if truck.fuel >= fuel {
                    actions.push(Drive {
                        truck: ti,
                        from: truck.city,
                        to: *to,
                        fuel,
                        packages: liftable.clone(),
                    });
                }
            }
        }

        actions
    }

    fn result(
        &self,
        s: &DeliveryState,
        a: &Drive,
    ) -> Result<DeliveryState, InvalidAction<DeliveryState, Drive>> {
        self.validate(s, a)?;

        let mut next = s.clone();
        let truck = &mut next.trucks[a.truck];
        truck.city = a.to;
        truck.fuel = if self.map.is_depot(a.to) {
            truck.tank_capacity
        } else {
            truck.fuel - a.fuel
        };

        for &pi in &a.packages {
            next.packages[pi].location = a.to;
        }

        Ok(next)
    }

    fn cost(&self, from: &DeliveryState, a: &Drive, _to: &DeliveryState) -> Liters {
        debug_assert_eq!(
            Some(a.fuel),
            self.map.road_km(from.trucks[a.truck].city, a.to).map(liters_for_km),
        );
        a.fuel
    }

    fn is_goal(&self, s: &DeliveryState) -> bool {
        s.trucks.iter().all(|t| self.map.is_depot(t.city))
            && s.packages.iter().all(Package::delivered)
    }

    /// Counts one cheapest road per undelivered package. Admissible as long
    /// as no single drive delivers more than one package; co-located
    /// packages bound for the same neighbour can make it overestimate.
    fn heuristic(&self, s: &DeliveryState) -> Liters {
        FloatCost::new(s.undelivered() as f64 * self.map.cheapest_road_km / KM_PER_LITER)
    }
}

/// One row of a human-readable delivery plan.
#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    pub truck: String,
    pub from: String,
    pub to: String,
    pub fuel: Liters,
    pub packages: Vec<String>,
}

/// Flattens a solution path into legs with resolved truck, city and
/// package names.
pub fn itinerary(problem: &DeliveryProblem, path: &Path<DeliveryState, Drive, Liters>) -> Vec<Leg> {
    let map = problem.map();
    let initial = &problem.initial;

    path.steps
        .iter()
        .filter_map(|(action, _)| action.as_ref())
        .map(|drive| Leg {
            truck: initial.trucks[drive.truck].id.clone(),
            from: map.name(drive.from).to_string(),
            to: map.name(drive.to).to_string(),
            fuel: drive.fuel,
            packages: drive
                .packages
                .iter()
                .map(|&pi| initial.packages[pi].id.clone())
                .collect(),
        })
        .collect()
}

/// The road network of the original Santa Fe delivery exercise.
pub fn santa_fe() -> Result<RoadMap, MapError> {
    RoadMap::new(
        &[
            "sunchales",
            "lehmann",
            "rafaela",
            "susana",
            "angelica",
            "santa_clara_de_saguier",
            "san_vicente",
            "esperanza",
            "recreo",
            "santo_tome",
            "sauce_viejo",
            "santa_fe",
        ],
        &[
            ("sunchales", 32.0, "lehmann"),
            ("lehmann", 8.0, "rafaela"),
            ("rafaela", 10.0, "susana"),
            ("susana", 25.0, "angelica"),
            ("angelica", 18.0, "san_vicente"),
            ("angelica", 60.0, "santa_clara_de_saguier"),
            ("rafaela", 70.0, "esperanza"),
            ("angelica", 85.0, "santo_tome"),
            ("esperanza", 20.0, "recreo"),
            ("santo_tome", 5.0, "santa_fe"),
            ("recreo", 10.0, "santa_fe"),
            ("santo_tome", 15.0, "sauce_viejo"),
        ],
        &["rafaela", "santa_fe"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::search;
    use crate::driver::SearchMode;
    use crate::frontier::Strategy;

    fn line_problem() -> DeliveryProblem {
        // a --400km-- b --600km-- c; costs 4l and 6l.
        let map = RoadMap::new(
            &["a", "b", "c"],
            &[("a", 400.0, "b"), ("b", 600.0, "c")],
            &["c"],
        )
        .unwrap();
        DeliveryProblem::new(map, &[("t1", "a", 10.0)], &[("p1", "a", "c")]).unwrap()
    }

    #[test]
    fn map_rejects_unknown_endpoint() {
        let err = RoadMap::new(&["a"], &[("a", 10.0, "nowhere")], &[]).unwrap_err();
        assert_eq!(err, MapError::UnknownCity("nowhere".to_string()));

        let err = RoadMap::new(&["a"], &[], &["nowhere"]).unwrap_err();
        assert_eq!(err, MapError::UnknownCity("nowhere".to_string()));
    }

    #[test]
    fn map_rejects_duplicate_city() {
        let err = RoadMap::new(&["a", "a"], &[], &[]).unwrap_err();
        assert_eq!(err, MapError::DuplicateCity("a".to_string()));
    }

    #[test]
    fn map_rejects_duplicate_road() {
        let err = RoadMap::new(
            &["a", "b"],
            &[("a", 10.0, "b"), ("b", 12.0, "a")],
            &[],
        )
        .unwrap_err();
        assert_eq!(err, MapError::DuplicateRoad("b".to_string(), "a".to_string()));
    }

    #[test]
    fn map_rejects_non_positive_road() {
        let err = RoadMap::new(&["a", "b"], &[("a", 0.0, "b")], &[]).unwrap_err();
        assert!(matches!(err, MapError::BadRoadLength(_, _, _)));
    }

    #[test]
    fn cheapest_road_is_tracked() {
        let map = santa_fe().unwrap();
        assert_eq!(map.cheapest_road_km(), 5.0);
        assert_eq!(map.cheapest_road_liters(), FloatCost::new(0.05));
    }

    #[test]
    fn uniform_cost_delivers_along_the_line() {
        let problem = line_problem();
        let outcome = search(problem.clone(), Strategy::UniformCost, SearchMode::Graph).unwrap();

        let path = outcome.path().unwrap();
        assert_eq!(path.cost, FloatCost::new(10.0));
        assert_eq!(path.len(), 2);

        let legs = itinerary(&problem, path);
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].to, "b");
        assert_eq!(legs[0].packages, vec!["p1".to_string()]);
        assert_eq!(legs[1].to, "c");
        assert_eq!(legs[1].packages, vec!["p1".to_string()]);
    }

    #[test]
    fn breadth_first_also_finds_the_two_step_line() {
        let outcome =
            search(line_problem(), Strategy::BreadthFirst, SearchMode::Graph).unwrap();
        assert_eq!(outcome.path().unwrap().len(), 2);
    }

    #[test]
    fn trucks_refuel_at_depots() {
        let problem = line_problem();
        let state = problem.initial_state();

        let to_b = Drive {
            truck: 0,
            from: problem.map().city("a").unwrap(),
            to: problem.map().city("b").unwrap(),
            fuel: FloatCost::new(4.0),
            packages: SmallVec::from_slice(&[0]),
        };
        let at_b = problem.result(&state, &to_b).unwrap();
        assert_eq!(at_b.trucks[0].fuel, FloatCost::new(6.0));

        let to_c = Drive {
            truck: 0,
            from: problem.map().city("b").unwrap(),
            to: problem.map().city("c").unwrap(),
            fuel: FloatCost::new(6.0),
            packages: SmallVec::from_slice(&[0]),
        };
        // c is a depot: the tank refills instead of hitting 0.
        let at_c = problem.result(&at_b, &to_c).unwrap();
        assert_eq!(at_c.trucks[0].fuel, at_c.trucks[0].tank_capacity);
        assert!(problem.is_goal(&at_c));
    }

    #[test]
    fn empty_tank_limits_actions() {
        let map = RoadMap::new(&["a", "b"], &[("a", 500.0, "b")], &["a"]).unwrap();
        // 2 liters on board, the only road needs 5.
        let problem = DeliveryProblem::new(map, &[("t1", "a", 2.0)], &[]).unwrap();
        assert!(problem.actions(&problem.initial_state()).is_empty());
    }

    #[test]
    fn invalid_drive_is_rejected() {
        let problem = line_problem();
        let state = problem.initial_state();

        // The truck is in a, not b.
        let bogus = Drive {
            truck: 0,
            from: problem.map().city("b").unwrap(),
            to: problem.map().city("c").unwrap(),
            fuel: FloatCost::new(6.0),
            packages: SmallVec::new(),
        };
        assert!(problem.result(&state, &bogus).is_err());
    }

    #[test]
    fn goal_needs_trucks_parked_at_depots() {
        let problem = line_problem();
        let mut state = problem.initial_state();

        // Deliver the package by hand but leave the truck in b.
        state.packages[0].location = state.packages[0].destination;
        state.trucks[0].city = problem.map().city("b").unwrap();
        assert!(!problem.is_goal(&state));

        state.trucks[0].city = problem.map().city("c").unwrap();
        assert!(problem.is_goal(&state));
    }

    #[test]
    fn unreachable_destination_exhausts() {
        let map = RoadMap::new(&["a", "b", "island"], &[("a", 100.0, "b")], &["a"]).unwrap();
        let problem =
            DeliveryProblem::new(map, &[("t1", "a", 5.0)], &[("p1", "a", "island")]).unwrap();

        let outcome = search(problem, Strategy::UniformCost, SearchMode::Graph).unwrap();
        assert!(!outcome.is_success());
    }

    #[test]
    fn santa_fe_toy_run() {
        let problem = DeliveryProblem::new(
            santa_fe().unwrap(),
            &[("c1", "rafaela", 1.5)],
            &[("p1", "rafaela", "angelica")],
        )
        .unwrap();

        let outcome = search(problem.clone(), Strategy::UniformCost, SearchMode::Graph).unwrap();
        let path = outcome.path().unwrap();

        // rafaela -> susana -> angelica (drop p1) -> susana -> rafaela.
        let legs = itinerary(&problem, path);
        assert_eq!(legs.len(), 4);
        assert_eq!(legs[0].to, "susana");
        assert_eq!(legs[1].to, "angelica");
        assert_eq!(legs[1].packages, vec!["p1".to_string()]);
        assert_eq!(legs[3].to, "rafaela");
        assert!(legs[2].packages.is_empty());

        // 10 + 25 + 25 + 10 km at 100 km/l.
        assert!((path.cost.into_inner() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn heuristic_is_admissible_along_the_optimal_path() {
        let problem = DeliveryProblem::new(
            santa_fe().unwrap(),
            &[("c1", "rafaela", 1.5)],
            &[("p1", "rafaela", "angelica")],
        )
        .unwrap();

        let outcome = search(problem.clone(), Strategy::UniformCost, SearchMode::Graph).unwrap();
        let path = outcome.path().unwrap();
        let total = path.cost.into_inner();

        let mut g = 0.0;
        for (action, state) in &path.steps {
            if let Some(drive) = action {
                g += drive.fuel.into_inner();
            }
            let h = problem.heuristic(state).into_inner();
            assert!(
                h <= (total - g) + 1e-9,
                "h={h} overestimates remaining {}",
                total - g
            );
        }
    }

    #[test]
    fn astar_matches_uniform_cost_on_the_toy() {
        let problem = DeliveryProblem::new(
            santa_fe().unwrap(),
            &[("c1", "rafaela", 1.5)],
            &[("p1", "rafaela", "angelica")],
        )
        .unwrap();

        let ucs = search(problem.clone(), Strategy::UniformCost, SearchMode::Graph).unwrap();
        let astar = search(problem, Strategy::AStar, SearchMode::Graph).unwrap();
        assert_eq!(ucs.cost(), astar.cost());
    }
}
