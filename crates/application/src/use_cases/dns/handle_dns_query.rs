use hickory_proto::op::ResponseCode;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::message::{DnsRequest, DnsResponse};
use crate::ports::RequestContext;
use crate::services::ZoneRouter;

pub struct HandleDnsQueryUseCase {
    router: Arc<ZoneRouter>,
}

impl HandleDnsQueryUseCase {
    pub fn new(router: Arc<ZoneRouter>) -> Self {
        Self { router }
    }

    /// Runs `request` through the chain of its zone.
    ///
    /// Never fails: names outside every zone get REFUSED and chain errors
    /// are answered with SERVFAIL.
    pub async fn execute(&self, ctx: &RequestContext, request: &DnsRequest) -> DnsResponse {
        let qname = request.question.normalized_name();

        let Some(chain) = self.router.route(&qname) else {
            debug!(domain = %qname, "No zone serves query, refusing");
            return DnsResponse::from_request(request, ResponseCode::Refused);
        };

        let ctx = ctx.for_zone(chain.zone());

        match chain.serve(&ctx, request).await {
            Ok(mut response) => {
                response.readdress(request);
                response
            }
            Err(e) => {
                warn!(
                    error = %e,
                    domain = %qname,
                    record_type = %request.question.qtype,
                    zone = %ctx.zone,
                    "Handler chain failed, answering SERVFAIL"
                );
                DnsResponse::from_request(request, ResponseCode::ServFail)
            }
        }
    }
}
