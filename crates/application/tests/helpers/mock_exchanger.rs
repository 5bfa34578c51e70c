use async_trait::async_trait;
use chrono::Utc;
use ferrous_lookup_application::ports::{DnsExchanger, ExchangeContext};
use ferrous_lookup_domain::{ClientConfig, LookupError};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Clone)]
enum MockResponse {
    Answer {
        rcode: ResponseCode,
        answers: Vec<Record>,
    },
    Error(LookupError),
}

/// In-memory resolver keyed by `(fqdn, type)`. Unknown keys answer NOERROR
/// with an empty answer section.
#[derive(Clone)]
pub struct MockDnsExchanger {
    responses: Arc<RwLock<HashMap<(String, RecordType), MockResponse>>>,
    questions: Arc<Mutex<Vec<Message>>>,
    calls: Arc<AtomicUsize>,
    forbid_io: bool,
    config: ClientConfig,
    server: String,
}

impl MockDnsExchanger {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            forbid_io: false,
            config: ClientConfig::default(),
            server: "127.0.0.1:53".to_string(),
        }
    }

    /// Fails the test if any exchange is attempted.
    pub fn forbidding_io() -> Self {
        Self {
            forbid_io: true,
            ..Self::new()
        }
    }

    pub fn with_server(mut self, server: &str) -> Self {
        self.server = server.to_string();
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_answers(&self, name: &str, record_type: RecordType, answers: Vec<Record>) {
        self.insert(
            name,
            record_type,
            MockResponse::Answer {
                rcode: ResponseCode::NoError,
                answers,
            },
        );
    }

    pub fn set_rcode(&self, name: &str, record_type: RecordType, rcode: ResponseCode) {
        self.insert(
            name,
            record_type,
            MockResponse::Answer {
                rcode,
                answers: vec![],
            },
        );
    }

    pub fn set_error(&self, name: &str, record_type: RecordType, error: LookupError) {
        self.insert(name, record_type, MockResponse::Error(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> Vec<Message> {
        self.questions.lock().unwrap().clone()
    }

    fn insert(&self, name: &str, record_type: RecordType, response: MockResponse) {
        self.responses
            .write()
            .unwrap()
            .insert((key_name(name), record_type), response);
    }
}

impl Default for MockDnsExchanger {
    fn default() -> Self {
        Self::new()
    }
}

fn key_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with('.') {
        lower
    } else {
        format!("{}.", lower)
    }
}

#[async_trait]
impl DnsExchanger for MockDnsExchanger {
    async fn exchange(
        &self,
        question: &Message,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Message, LookupError> {
        assert!(!self.forbid_io, "exchange must not be attempted");

        self.calls.fetch_add(1, Ordering::SeqCst);
        self.questions.lock().unwrap().push(question.clone());

        let query = question.queries()[0].clone();
        let key = (key_name(&query.name().to_utf8()), query.query_type());
        let response = self.responses.read().unwrap().get(&key).cloned();

        let (rcode, answers) = match response {
            Some(MockResponse::Error(e)) => return Err(e),
            Some(MockResponse::Answer { rcode, answers }) => (rcode, answers),
            None => (ResponseCode::NoError, vec![]),
        };

        let mut message = Message::new(question.id(), MessageType::Response, OpCode::Query);
        message.set_recursion_desired(true);
        message.set_recursion_available(true);
        message.set_response_code(rcode);
        message.add_query(query);
        for answer in answers {
            message.add_answer(answer);
        }

        if let Some(ctx) = ctx {
            *ctx = ExchangeContext {
                time: Some(Utc::now()),
                client_address: "127.0.0.1:40000".parse().ok(),
                server_address: Some(self.server.clone()),
                transport: Some("udp"),
                question_message: Some(question.clone()),
                answer_message: Some(message.clone()),
                tls: None,
            };
        }

        Ok(message)
    }

    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn server(&self) -> &str {
        &self.server
    }
}
