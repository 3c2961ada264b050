mod helpers;

use helpers::{MockHandler, RecordingHandler};
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RecordType;
use std::sync::Arc;
use strata_dns_application::ports::{DnsHandler, RequestContext};
use strata_dns_application::services::{HandlerChain, ZoneRouter};
use strata_dns_application::use_cases::HandleDnsQueryUseCase;
use strata_dns_application::DnsRequest;
use strata_dns_domain::DomainError;

#[tokio::test]
async fn test_execute_routes_to_zone_and_sets_context_zone() {
    let recorder = RecordingHandler::new("recorder");
    let terminal = Arc::new(MockHandler::new("terminal"));
    let router = ZoneRouter::new(vec![HandlerChain::new(
        "example.org.",
        vec![recorder.clone() as Arc<dyn DnsHandler>, terminal.clone()],
    )]);
    let use_case = HandleDnsQueryUseCase::new(Arc::new(router));

    let request = DnsRequest::parse("WWW.example.org.", RecordType::A)
        .unwrap()
        .with_id(4242);
    let response = use_case
        .execute(&RequestContext::new("."), &request)
        .await;

    assert_eq!(response.response_code, ResponseCode::NoError);
    assert_eq!(response.id, 4242);
    assert_eq!(response.answers.len(), 1);
    assert_eq!(recorder.seen_zones(), vec!["example.org.".to_string()]);
    assert_eq!(terminal.calls(), 1);
}

#[tokio::test]
async fn test_execute_refuses_names_outside_every_zone() {
    let terminal = Arc::new(MockHandler::new("terminal"));
    let router = ZoneRouter::new(vec![HandlerChain::new(
        "example.org.",
        vec![terminal.clone() as Arc<dyn DnsHandler>],
    )]);
    let use_case = HandleDnsQueryUseCase::new(Arc::new(router));

    let request = DnsRequest::parse("example.com.", RecordType::A).unwrap();
    let response = use_case
        .execute(&RequestContext::new("."), &request)
        .await;

    assert_eq!(response.response_code, ResponseCode::Refused);
    assert!(response.answers.is_empty());
    assert_eq!(terminal.calls(), 0);
}

#[tokio::test]
async fn test_execute_turns_chain_errors_into_servfail() {
    let failing = Arc::new(MockHandler::failing(
        "upstream",
        DomainError::Upstream {
            server: "192.0.2.53:53".to_string(),
            reason: "connection reset".to_string(),
        },
    ));
    let router = ZoneRouter::new(vec![HandlerChain::new(".", vec![failing.clone() as Arc<dyn DnsHandler>])]);
    let use_case = HandleDnsQueryUseCase::new(Arc::new(router));

    let request = DnsRequest::parse("example.org.", RecordType::A).unwrap();
    let response = use_case
        .execute(&RequestContext::new("."), &request)
        .await;

    assert_eq!(response.response_code, ResponseCode::ServFail);
    assert_eq!(failing.calls(), 1);
}
