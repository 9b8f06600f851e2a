//! In-memory transport that records every call and answers from a script.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde_json::Value;

use crate::{TransportError, transport::Transport};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Get(String),
    Post(String, Value),
    Put(String, Value),
    Delete(String),
}

#[derive(Clone, Debug)]
pub(crate) enum Reply {
    Json(Value),
    Status(u16, String),
    /// Never answers.
    Silent,
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    replies: HashMap<(&'static str, String), Reply>,
}

/// Unscripted requests answer `404` with an empty body.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub(crate) fn on(&self, verb: &'static str, path: &str, reply: Reply) -> &Self {
        let mut script = self.inner.lock().unwrap();
        script.replies.insert((verb, path.to_string()), reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    async fn answer(
        &self,
        verb: &'static str,
        path: &str,
        call: Call,
    ) -> Result<Value, TransportError> {
        let reply = {
            let mut script = self.inner.lock().unwrap();
            script.calls.push(call);
            script.replies.get(&(verb, path.to_string())).cloned()
        };
        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status, body)) => Err(TransportError::Status { status, body }),
            Some(Reply::Silent) => std::future::pending().await,
            None => Err(TransportError::Status {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.answer("GET", path, Call::Get(path.to_string())).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        self.answer("POST", path, Call::Post(path.to_string(), body.clone())).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<(), TransportError> {
        self.answer("PUT", path, Call::Put(path.to_string(), body.clone()))
            .await
            .map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.answer("DELETE", path, Call::Delete(path.to_string()))
            .await
            .map(|_| ())
    }
}
