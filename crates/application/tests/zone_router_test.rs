mod helpers;

use helpers::MockHandler;
use std::sync::Arc;
use strata_dns_application::ports::DnsHandler;
use strata_dns_application::services::{HandlerChain, ZoneRouter};

fn chain(zone: &str) -> HandlerChain {
    HandlerChain::new(zone, vec![Arc::new(MockHandler::new(zone)) as Arc<dyn DnsHandler>])
}

#[test]
fn test_route_picks_longest_matching_zone() {
    let router = ZoneRouter::new(vec![
        chain("."),
        chain("example.org."),
        chain("sub.example.org."),
    ]);

    let zone = |q: &str| router.route(q).map(|c| c.zone().to_string());

    assert_eq!(zone("www.sub.example.org."), Some("sub.example.org.".to_string()));
    assert_eq!(zone("sub.example.org."), Some("sub.example.org.".to_string()));
    assert_eq!(zone("www.example.org."), Some("example.org.".to_string()));
    assert_eq!(zone("example.com."), Some(".".to_string()));
}

#[test]
fn test_route_without_root_zone_refuses_foreign_names() {
    let router = ZoneRouter::new(vec![chain("Example.ORG")]);

    assert!(router.route("www.example.org.").is_some());
    assert!(router.route("badexample.org.").is_none());
    assert!(router.route("example.com.").is_none());
}

#[test]
fn test_zones_are_listed_most_specific_first() {
    let router = ZoneRouter::new(vec![chain("."), chain("org."), chain("example.org.")]);
    assert_eq!(router.zones(), vec!["example.org.", "org.", "."]);
}
