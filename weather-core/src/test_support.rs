//! Test doubles shared by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
    task::JoinHandle,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::{WeatherQuery, error::FetchError, provider::WeatherProvider};

pub const CLEAR_SKY: &str = r#"{"main":{"temp":21.5,"humidity":40},"weather":[{"description":"clear sky","icon":"01d"}],"wind":{"speed":3.6,"deg":270}}"#;

pub fn payload(description: &str) -> Vec<u8> {
    format!(
        r#"{{"main":{{"temp":5.0,"humidity":60}},"weather":[{{"description":"{description}","icon":"04d"}}],"wind":{{"speed":2.0,"deg":45}}}}"#
    )
    .into_bytes()
}

/// Hands out canned results in order.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<Vec<u8>, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(responses: impl IntoIterator<Item = Result<Vec<u8>, FetchError>>) -> Self {
        Self { responses: Mutex::new(responses.into_iter().collect()), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn fetch(&self, _query: &WeatherQuery) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("script exhausted".into())))
    }
}

/// Each city's fetch blocks until the test releases it through its gate.
#[derive(Debug, Default)]
pub struct GatedProvider {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<Vec<u8>, FetchError>>>>,
    calls: AtomicUsize,
}

impl GatedProvider {
    pub fn gate(&self, city: &str) -> oneshot::Sender<Result<Vec<u8>, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(city.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for GatedProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<Vec<u8>, FetchError> {
        let rx = self.gates.lock().unwrap().remove(query.city());
        self.calls.fetch_add(1, Ordering::SeqCst);

        match rx {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(FetchError::Network("gate dropped".into()))),
            None => Err(FetchError::Network(format!("no gate for {}", query.city()))),
        }
    }
}

/// Counts WARN events seen while installed as the default subscriber.
#[derive(Debug, Clone, Default)]
pub struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Accepts one connection on loopback, answers it with `status` and `body`, and
/// resolves to the request line it received.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request).lines().next().unwrap_or_default().to_string()
    });

    (format!("http://{addr}/data/2.5/weather"), handle)
}

/// A loopback URL nothing is listening on.
pub async fn refused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/data/2.5/weather")
}
