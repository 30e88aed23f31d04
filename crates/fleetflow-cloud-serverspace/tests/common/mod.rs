use async_trait::async_trait;
use fleetflow_cloud_serverspace::{
    ApiRequest, Method, PollConfig, Result, ServerspaceClient, ServerspaceError, Transport,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Reply = std::result::Result<Value, (u16, String)>;

/// In-memory control plane with scripted replies per `METHOD path`.
///
/// The last reply of a script repeats forever.
#[derive(Default)]
pub struct FakeTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    log: Mutex<Vec<(Method, String, Option<Value>)>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, replies: Vec<Value>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(key(method, path), replies.into_iter().map(Ok).collect());
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, message: &str) {
        self.scripts.lock().unwrap().insert(
            key(method, path),
            VecDeque::from([Err((status, message.to_string()))]),
        );
    }

    /// Number of requests sent to `METHOD path`
    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p, _)| *m == method && p == path)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// Body of the last request sent to `METHOD path`
    pub fn last_body(&self, method: Method, path: &str) -> Option<Value> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(m, p, _)| *m == method && p == path)
            .and_then(|(_, _, body)| body.clone())
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>> {
        self.log
            .lock()
            .unwrap()
            .push((request.method, request.path.clone(), request.body.clone()));

        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts
            .get_mut(&key(request.method, &request.path))
            .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method, request.path));
        let reply = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        };

        match reply {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err((status, message)) => Err(ServerspaceError::Api { status, message }),
        }
    }
}

fn key(method: Method, path: &str) -> String {
    format!("{} {}", method, path)
}

pub fn client(transport: Arc<FakeTransport>, interval_secs: u64, max_wait_secs: u64) -> ServerspaceClient {
    ServerspaceClient::with_transport(
        transport,
        PollConfig::new(
            Duration::from_secs(interval_secs),
            Duration::from_secs(max_wait_secs),
        ),
    )
}

pub fn task(id: &str, status: &str, fields: Value) -> Value {
    let mut task = serde_json::json!({ "id": id, "status": status });
    if let (Some(task), Some(fields)) = (task.as_object_mut(), fields.as_object()) {
        task.extend(fields.clone());
    }
    serde_json::json!({ "task": task })
}

pub fn pending(id: &str) -> Value {
    task(id, "InProgress", Value::Null)
}

pub fn task_ref(id: &str) -> Value {
    serde_json::json!({ "task_id": id })
}
