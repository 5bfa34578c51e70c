#![allow(dead_code)]
use ferrous_lookup_infrastructure::dns::serialize_message;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, MX, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::oneshot;

/// Names under this label are answered over UDP with TC set and no records.
pub const TRUNCATED_LABEL: &str = "big";
/// Names under this label get NXDOMAIN.
pub const MISSING_LABEL: &str = "missing";
/// Names under this label are answered over UDP with TC set and the datagram
/// cut inside the last answer record.
pub const CUT_LABEL: &str = "cut";
/// Names under this label get a zero-length reply on both transports.
pub const EMPTY_LABEL: &str = "empty";

#[derive(Default)]
pub struct QueryCounters {
    pub udp: AtomicUsize,
    pub tcp: AtomicUsize,
}

/// Authoritative-looking resolver on 127.0.0.1 serving UDP and TCP on the
/// same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    counters: Arc<QueryCounters>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start() -> Result<Self, std::io::Error> {
        let (socket, listener) = Self::bind_pair().await?;
        let addr = socket.local_addr()?;
        let counters = Arc::new(QueryCounters::default());
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let udp_counters = Arc::clone(&counters);
        let tcp_counters = Arc::clone(&counters);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_counters.udp.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_response(&buf[..len], true) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((stream, _)) = accepted {
                            let counters = Arc::clone(&tcp_counters);
                            tokio::spawn(Self::serve_tcp(stream, counters));
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            counters,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    async fn bind_pair() -> Result<(UdpSocket, TcpListener), std::io::Error> {
        let mut last_err = None;
        for _ in 0..16 {
            let socket = UdpSocket::bind("127.0.0.1:0").await?;
            let port = socket.local_addr()?.port();
            match TcpListener::bind(("127.0.0.1", port)).await {
                Ok(listener) => return Ok((socket, listener)),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| std::io::Error::other("no free port pair")))
    }

    async fn serve_tcp(mut stream: TcpStream, counters: Arc<QueryCounters>) {
        loop {
            let mut len_buf = [0u8; 2];
            if stream.read_exact(&mut len_buf).await.is_err() {
                return;
            }
            let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
            if stream.read_exact(&mut query).await.is_err() {
                return;
            }
            counters.tcp.fetch_add(1, Ordering::SeqCst);

            let Some(response) = Self::build_response(&query, false) else {
                return;
            };
            let len = (response.len() as u16).to_be_bytes();
            if stream.write_all(&len).await.is_err() || stream.write_all(&response).await.is_err() {
                return;
            }
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn udp_queries(&self) -> usize {
        self.counters.udp.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.counters.tcp.load(Ordering::SeqCst)
    }

    fn build_response(query_bytes: &[u8], over_udp: bool) -> Option<Vec<u8>> {
        let query = Message::from_vec(query_bytes).ok()?;
        let question = query.queries().first()?.clone();
        let qname = question.name().to_utf8().to_ascii_lowercase();

        if qname.starts_with(EMPTY_LABEL) {
            return Some(Vec::new());
        }
        let cut = over_udp && qname.starts_with(CUT_LABEL);

        let mut response = Message::new(query.id(), MessageType::Response, OpCode::Query);
        response.set_recursion_desired(query.recursion_desired());
        response.set_recursion_available(true);
        response.add_query(question.clone());

        if qname.starts_with(MISSING_LABEL) {
            response.set_response_code(ResponseCode::NXDomain);
        } else if over_udp && qname.starts_with(TRUNCATED_LABEL) {
            response.set_truncated(true);
        } else {
            let name = question.name().clone();
            for rdata in Self::answers_for(question.query_type(), &qname) {
                response.add_answer(Record::from_rdata(name.clone(), 300, rdata));
            }
            response.set_truncated(cut);
        }

        let mut bytes = serialize_message(&response).ok()?;
        if cut {
            bytes.truncate(bytes.len() - 3);
        }
        Some(bytes)
    }

    fn answers_for(record_type: RecordType, qname: &str) -> Vec<RData> {
        let big = qname.starts_with(TRUNCATED_LABEL);
        match record_type {
            RecordType::A if big => (1..=40)
                .map(|i| RData::A(A(Ipv4Addr::new(198, 51, 100, i))))
                .collect(),
            RecordType::A => vec![RData::A(A(Ipv4Addr::new(192, 0, 2, 10)))],
            RecordType::AAAA => vec![RData::AAAA(AAAA(Ipv6Addr::new(
                0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x10,
            )))],
            RecordType::MX => vec![RData::MX(MX::new(
                10,
                Name::from_str("mail.example.com.").unwrap(),
            ))],
            RecordType::TXT => vec![RData::TXT(TXT::new(vec![
                "v=spf1 include:_spf.example.com ".to_string(),
                "-all".to_string(),
            ]))],
            _ => Vec::new(),
        }
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// UDP socket that swallows every datagram.
pub async fn silent_udp_server() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}
