//! Shared helpers for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::http_client::{FetchRequest, FetchResponse, Transport};

/// A request as the transport saw it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Seen {
    pub url: String,
    pub referer: Option<String>,
    pub cookie: Option<String>,
    pub params: Vec<(String, String)>,
}

/// In-memory transport answering by exact URL. Unknown URLs get a 404.
#[derive(Default)]
pub(crate) struct Scripted {
    routes: HashMap<String, (u16, String)>,
    broken: HashSet<String>,
    seen: RefCell<Vec<Seen>>,
}

impl Scripted {
    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(url.to_string(), (status, body.to_string()));
        self
    }

    /// Make every request to `url` fail at the transport level.
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.borrow().clone()
    }

    fn answer(&self, url: &str) -> Result<(u16, String)> {
        if self.broken.contains(url) {
            return Err(Error::Io(std::io::Error::other("connection reset")));
        }
        Ok(self
            .routes
            .get(url)
            .cloned()
            .unwrap_or((404, String::new())))
    }
}

impl Transport for Scripted {
    fn get(&self, request: &FetchRequest<'_>) -> Result<FetchResponse> {
        self.seen.borrow_mut().push(Seen {
            url: request.url.to_string(),
            referer: request.referer.map(str::to_string),
            cookie: request.cookie.map(str::to_string),
            params: request.params.to_vec(),
        });
        let (status, body) = self.answer(request.url)?;
        Ok(FetchResponse { status, body })
    }

    fn probe(&self, url: &str) -> Result<u16> {
        self.answer(url).map(|(status, _)| status)
    }
}
