//! Scripted fakes for the transport and storage seams.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::channel::oneshot;

use crate::net::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::util::storage::KeyValueStore;

struct Route {
    method: Method,
    url_suffix: String,
    reply: Result<HttpResponse, TransportError>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
struct FakeState {
    routes: Vec<Route>,
    requests: Vec<HttpRequest>,
}

/// Transport answering by method + URL suffix and recording every request.
///
/// The most recently registered matching route wins, so tests can override a
/// reply mid-scenario. Unmatched requests fail as transport errors.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn respond(&self, method: Method, url_suffix: &str, status: u16, body: serde_json::Value) {
        self.respond_text(method, url_suffix, status, &body.to_string());
    }

    pub fn respond_text(&self, method: Method, url_suffix: &str, status: u16, body: &str) {
        self.push(method, url_suffix, Ok(HttpResponse { status, body: body.to_owned() }));
    }

    pub fn fail(&self, method: Method, url_suffix: &str, message: &str) {
        self.push(method, url_suffix, Err(TransportError(message.to_owned())));
    }

    /// Like [`respond`](Self::respond), but the first matching request stays
    /// pending until the returned sender fires (or is dropped).
    pub fn respond_held(
        &self,
        method: Method,
        url_suffix: &str,
        status: u16,
        body: serde_json::Value,
    ) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.state.lock().unwrap().routes.push(Route {
            method,
            url_suffix: url_suffix.to_owned(),
            reply: Ok(HttpResponse { status, body: body.to_string() }),
            gate: Some(gate),
        });
        release
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, url_suffix: &str) -> Vec<HttpRequest> {
        self.requests().into_iter().filter(|r| r.url.ends_with(url_suffix)).collect()
    }

    fn push(&self, method: Method, url_suffix: &str, reply: Result<HttpResponse, TransportError>) {
        self.state.lock().unwrap().routes.push(Route { method, url_suffix: url_suffix.to_owned(), reply, gate: None });
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        let (reply, gate) = {
            let mut state = self.state.lock().unwrap();
            let matched = state
                .routes
                .iter_mut()
                .rev()
                .find(|r| r.method == request.method && request.url.ends_with(&r.url_suffix))
                .map(|r| (r.reply.clone(), r.gate.take()));
            state.requests.push(request);
            matched.unzip()
        };
        if let Some(gate) = gate.flatten() {
            let _ = gate.await;
        }
        reply.unwrap_or_else(|| Err(TransportError(format!("no route for {url}"))))
    }
}

/// In-memory [`KeyValueStore`]; optionally refuses writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    read_only: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn insert(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_owned(), value.to_owned());
    }

    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.lock().unwrap() = read_only;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if *self.read_only.lock().unwrap() {
            return Err("quota exceeded".to_owned());
        }
        self.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
