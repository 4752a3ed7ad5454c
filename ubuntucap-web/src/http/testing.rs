//! A recording transport with canned replies.

use super::error::TransportError;
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

enum Reply {
    Ready(HttpResponse),
    Hang,
    Deferred(oneshot::Receiver<()>, HttpResponse),
}

struct Route {
    method: Method,
    path: String,
    replies: VecDeque<Reply>,
}

impl Route {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.method == request.method
            && (request.url == self.path || request.url.ends_with(&format!("/{}", self.path)))
    }
}

/// Records every request and answers from a script. A route's last ready
/// reply repeats; earlier replies are consumed in order. Unscripted requests
/// fail like an unreachable server.
#[derive(Default)]
pub struct StubTransport {
    routes: RefCell<Vec<Route>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        let mut routes = self.routes.borrow_mut();
        if let Some(route) = routes
            .iter_mut()
            .find(|route| route.method == method && route.path == path)
        {
            route.replies.push_back(reply);
        } else {
            routes.push(Route {
                method,
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            });
        }
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_text(method, path, status, &body.to_string());
    }

    /// Like [`respond`](Self::respond) but keyed by an absolute URL.
    pub fn respond_url(&self, method: Method, url: &str, status: u16, body: Value) {
        self.respond(method, url, status, body);
    }

    pub fn respond_text(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Reply::Ready(HttpResponse::new(status, body)));
    }

    /// Never answers.
    pub fn hang(&self, method: Method, path: &str) {
        self.push(method, path, Reply::Hang);
    }

    /// Answers once the returned sender fires (or is dropped).
    pub fn defer(&self, method: Method, path: &str, status: u16, body: Value) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.push(
            method,
            path,
            Reply::Deferred(receiver, HttpResponse::new(status, body.to_string())),
        );
        sender
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Requests whose method and path match.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.url.ends_with(path))
            .count()
    }

    fn next_reply(&self, request: &HttpRequest) -> Option<Reply> {
        let mut routes = self.routes.borrow_mut();
        let route = routes.iter_mut().find(|route| route.matches(request))?;
        if route.replies.len() > 1 {
            return route.replies.pop_front();
        }
        match route.replies.front()? {
            Reply::Ready(response) => Some(Reply::Ready(response.clone())),
            Reply::Hang => Some(Reply::Hang),
            Reply::Deferred(..) => route.replies.pop_front(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self.next_reply(&request);
        let url = request.url.clone();
        self.requests.borrow_mut().push(request);
        match reply {
            Some(Reply::Ready(response)) => Ok(response),
            Some(Reply::Hang) => futures::future::pending().await,
            Some(Reply::Deferred(gate, response)) => {
                let _ = gate.await;
                Ok(response)
            }
            None => Err(TransportError::Network(format!("connection refused: {url}"))),
        }
    }
}
