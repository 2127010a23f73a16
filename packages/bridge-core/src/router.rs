//! Route lookups over one adapter's slice of the registry, and their union across adapters.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::Route;
use crate::{Error, Result};

type RouteKey = (String, String, String);

/// Optional `from` / `to` / `token` filter for [`RouteTable::routes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    pub from: Option<String>,
    pub to: Option<String>,
    pub token: Option<String>,
}

impl RouteFilter {
    pub fn origin(chain: impl Into<String>) -> Self {
        Self { from: Some(chain.into()), ..Self::default() }
    }

    pub fn destination(mut self, chain: impl Into<String>) -> Self {
        self.to = Some(chain.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn matches(&self, route: &Route) -> bool {
        self.from.as_deref().map_or(true, |from| from == route.from)
            && self.to.as_deref().map_or(true, |to| to == route.to)
            && self.token.as_deref().map_or(true, |token| token == route.token)
    }
}

/// Direct routes keyed by `(from, to, token)`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<RouteKey, Route>,
}

impl RouteTable {
    pub fn new(routes: impl IntoIterator<Item = Route>) -> Self {
        let mut table = Self::default();
        table.extend(routes);
        table
    }

    /// Adds `routes`, the first entry for a key wins.
    pub fn extend(&mut self, routes: impl IntoIterator<Item = Route>) {
        for route in routes {
            let key = (route.from.clone(), route.to.clone(), route.token.clone());
            self.routes.entry(key).or_insert(route);
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn destinations_from(&self, origin: &str) -> BTreeSet<String> {
        self.routes
            .values()
            .filter(|route| route.from == origin)
            .map(|route| route.to.clone())
            .collect()
    }

    pub fn tokens_for(&self, origin: &str, destination: &str) -> BTreeSet<String> {
        self.routes
            .values()
            .filter(|route| route.from == origin && route.to == destination)
            .map(|route| route.token.clone())
            .collect()
    }

    pub fn route_for(&self, origin: &str, destination: &str, token: &str) -> Result<&Route> {
        let key = (origin.to_string(), destination.to_string(), token.to_string());
        self.routes.get(&key).ok_or_else(|| Error::RouteNotFound {
            from: origin.to_string(),
            to: destination.to_string(),
            token: token.to_string(),
        })
    }

    pub fn routes(&self, filter: &RouteFilter) -> Vec<&Route> {
        self.routes.values().filter(|route| filter.matches(route)).collect()
    }
}

/// Union of the route tables of every registered adapter.
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    pub fn new<'a>(tables: impl IntoIterator<Item = &'a RouteTable>) -> Self {
        let mut table = RouteTable::default();
        for adapter_table in tables {
            table.extend(adapter_table.routes.values().cloned());
        }
        debug!(routes = table.len(), "router built");
        Self { table }
    }

    pub fn destinations_from(&self, origin: &str) -> BTreeSet<String> {
        self.table.destinations_from(origin)
    }

    pub fn tokens_for(&self, origin: &str, destination: &str) -> BTreeSet<String> {
        self.table.tokens_for(origin, destination)
    }

    pub fn route_for(&self, origin: &str, destination: &str, token: &str) -> Result<&Route> {
        self.table.route_for(origin, destination, token)
    }

    pub fn routes(&self, filter: &RouteFilter) -> Vec<&Route> {
        self.table.routes(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::ChainAmount;
    use crate::config::RouteFee;
    use crate::xcm::WeightLimit;

    fn route(from: &str, to: &str, token: &str) -> Route {
        Route {
            from: from.into(),
            to: to.into(),
            token: token.into(),
            fee: RouteFee { token: token.into(), amount: ChainAmount(1) },
            weight_limit: WeightLimit::Unlimited,
        }
    }

    fn table() -> RouteTable {
        RouteTable::new(vec![
            route("karura", "kusama", "KSM"),
            route("karura", "basilisk", "KSM"),
            route("karura", "basilisk", "KUSD"),
            route("basilisk", "karura", "BSX"),
        ])
    }

    #[test]
    fn destinations_and_tokens() {
        let table = table();
        let destinations: Vec<_> = table.destinations_from("karura").into_iter().collect();
        assert_eq!(destinations, vec!["basilisk", "kusama"]);
        let tokens: Vec<_> = table.tokens_for("karura", "basilisk").into_iter().collect();
        assert_eq!(tokens, vec!["KSM", "KUSD"]);
    }

    #[test]
    fn unconfigured_pairs_have_no_tokens() {
        let table = table();
        assert!(table.tokens_for("kusama", "karura").is_empty());
        assert_eq!(table.tokens_for("kusama", "karura"), table.tokens_for("kusama", "karura"));
        assert!(table.destinations_from("nowhere").is_empty());
    }

    #[test]
    fn missing_route_is_an_error() {
        let err = table().route_for("karura", "kusama", "KAR").unwrap_err();
        assert_eq!(
            err,
            Error::RouteNotFound { from: "karura".into(), to: "kusama".into(), token: "KAR".into() }
        );
    }

    #[test]
    fn filters_combine() {
        let table = table();
        assert_eq!(table.routes(&RouteFilter::default()).len(), 4);
        assert_eq!(table.routes(&RouteFilter::origin("karura")).len(), 3);
        assert_eq!(table.routes(&RouteFilter::origin("karura").destination("basilisk").token("KUSD")).len(), 1);
        let by_token = RouteFilter { token: Some("BSX".into()), ..RouteFilter::default() };
        assert_eq!(table.routes(&by_token)[0].from, "basilisk");
    }

    #[test]
    fn router_unions_tables_by_key() {
        let a = RouteTable::new(vec![route("karura", "kusama", "KSM")]);
        let b = RouteTable::new(vec![route("karura", "kusama", "KSM"), route("kusama", "karura", "KSM")]);
        let router = Router::new([&a, &b]);
        assert_eq!(router.routes(&RouteFilter::default()).len(), 2);
        assert!(router.route_for("kusama", "karura", "KSM").is_ok());
    }
}
