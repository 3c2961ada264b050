use hickory_proto::op::ResponseCode;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use strata_dns_application::ports::RequestContext;
use strata_dns_application::use_cases::HandleDnsQueryUseCase;
use strata_dns_infrastructure::dns::wire::query_parser::header_id;
use strata_dns_infrastructure::dns::wire::{encode_error, encode_with_limit, parse_query};
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

const RECV_BUFFER_SIZE: usize = 4096;

pub async fn start_dns_server(
    bind_addr: String,
    handler: Arc<HandleDnsQueryUseCase>,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = Arc::new(create_udp_socket(socket_addr)?);

    info!(bind_address = %socket_addr, "DNS server ready");

    let mut recv_buf = [0u8; RECV_BUFFER_SIZE];
    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "UDP recv error");
                continue;
            }
        };

        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            if let Some(reply) = handle_datagram(&handler, &query, from).await {
                if let Err(e) = socket.send_to(&reply, from).await {
                    debug!(error = %e, client = %from, "UDP send failed");
                }
            }
        });
    }
}

async fn handle_datagram(
    handler: &HandleDnsQueryUseCase,
    query: &[u8],
    from: SocketAddr,
) -> Option<Vec<u8>> {
    let parsed = match parse_query(query) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, client = %from, "Malformed query, answering FORMERR");
            return header_id(query).map(|id| encode_error(id, ResponseCode::FormErr));
        }
    };

    let max_size = usize::from(parsed.max_udp_size());
    let id = parsed.id;
    let request = parsed.into_request(Some(from));

    // Zone is filled in by the router.
    let ctx = RequestContext::new(".");
    let response = handler.execute(&ctx, &request).await;

    match encode_with_limit(&response, max_size) {
        Ok(wire) => Some(wire),
        Err(e) => {
            warn!(error = %e, domain = %request.question.name, "Failed to encode response");
            Some(encode_error(id, ResponseCode::ServFail))
        }
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::DnsServices;
    use strata_dns_domain::Config;

    fn services() -> DnsServices {
        let config = Config::from_toml(
            r#"
            [[zones]]
            zone = "lan"

            [zones.cache]

            [[zones.records]]
            name = "nas"
            record_type = "A"
            value = "192.168.1.10"
            "#,
        )
        .unwrap();
        DnsServices::new(&config).unwrap()
    }

    fn query(domain: &str) -> Vec<u8> {
        let mut buf = vec![0xAB, 0xCD, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
        for label in domain.split('.').filter(|l| !l.is_empty()) {
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
        buf.extend_from_slice(&[0x00, 0x00, 0x01, 0x00, 0x01]);
        buf
    }

    fn client() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_local_answer_over_wire() {
        let services = services();
        let reply = handle_datagram(&services.handler_use_case, &query("nas.lan"), client())
            .await
            .unwrap();

        assert_eq!(&reply[0..2], &[0xAB, 0xCD]);
        assert_eq!(reply[3] & 0x0F, 0);
        assert_eq!(u16::from_be_bytes([reply[6], reply[7]]), 1);
    }

    #[tokio::test]
    async fn test_name_outside_zones_is_refused() {
        let services = services();
        let reply = handle_datagram(&services.handler_use_case, &query("example.org"), client())
            .await
            .unwrap();

        assert_eq!(reply[3] & 0x0F, u16::from(ResponseCode::Refused) as u8);
    }

    #[tokio::test]
    async fn test_malformed_query_gets_formerr() {
        let services = services();
        let mut bad = query("nas.lan");
        bad[5] = 2;

        let reply = handle_datagram(&services.handler_use_case, &bad, client())
            .await
            .unwrap();
        assert_eq!(reply.len(), 12);
        assert_eq!(reply[3] & 0x0F, u16::from(ResponseCode::FormErr) as u8);

        assert!(handle_datagram(&services.handler_use_case, &[0x01], client())
            .await
            .is_none());
    }
}
