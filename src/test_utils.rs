// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::checks::{
    default_mutating_webhook_configuration, default_validating_webhook_configuration,
};
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde::Serialize;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::apps::v1::{
    DaemonSet, DaemonSetSpec, DaemonSetStatus, Deployment, DeploymentSpec, DeploymentStatus,
};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::ByteString;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type ResponseQueue = VecDeque<(u16, String)>;

/// A request seen by the mock, in arrival order
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Each (method, path) pair holds a queue of responses. Responses are served
/// in order and the last one keeps being served once the queue is drained,
/// which models a cluster converging on a state over several polls.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), ResponseQueue>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on_sequence("GET", path, vec![(status, body.to_string())])
    }

    /// Serve `responses` to successive GET requests matching the path
    pub fn on_get_sequence(self, path: &str, responses: Vec<(u16, String)>) -> Self {
        self.on_sequence("GET", path, responses)
    }

    /// Add a response for PUT requests matching the path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on_sequence("PUT", path, vec![(status, body.to_string())])
    }

    /// Add a response for DELETE requests matching the path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on_sequence("DELETE", path, vec![(status, body.to_string())])
    }

    pub fn on_sequence(self, method: &str, path: &str, responses: Vec<(u16, String)>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), responses.into());
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for the given method and exact path
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn next_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();

        let key = (method.to_string(), path.to_string());
        let key = if responses.contains_key(&key) {
            key
        } else {
            // Fall back to a prefix match for paths carrying subresources
            responses
                .keys()
                .find(|(m, p)| m == method && path.starts_with(p.as_str()))
                .cloned()?
        };

        let queue = responses.get_mut(&key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let response = self.next_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                body: String::from_utf8_lossy(&body).into_owned(),
            });

            // Default 404 for unmatched requests
            let (status, body) =
                response.unwrap_or_else(|| (404, not_found_json("resource", "unknown")));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Serialize a typed object into a JSON response body
pub fn to_json<T: Serialize>(object: &T) -> String {
    serde_json::to_string(object).unwrap()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a 409 conflict response
pub fn conflict_json(resource: &str, name: &str) -> String {
    status_json(
        409,
        "Conflict",
        &format!(
            "Operation cannot be fulfilled on {} \"{}\": the object has been modified",
            resource, name
        ),
    )
}

/// Create a successful delete response
pub fn deleted_json(name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Success",
        "message": format!("{} deleted", name),
        "code": 200
    })
    .to_string()
}

fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

pub fn deployment_path(namespace: &str, name: &str) -> String {
    format!("/apis/apps/v1/namespaces/{}/deployments/{}", namespace, name)
}

pub fn daemonset_path(namespace: &str, name: &str) -> String {
    format!("/apis/apps/v1/namespaces/{}/daemonsets/{}", namespace, name)
}

pub fn mutating_webhook_configuration_path(name: &str) -> String {
    format!(
        "/apis/admissionregistration.k8s.io/v1/mutatingwebhookconfigurations/{}",
        name
    )
}

pub fn validating_webhook_configuration_path(name: &str) -> String {
    format!(
        "/apis/admissionregistration.k8s.io/v1/validatingwebhookconfigurations/{}",
        name
    )
}

pub fn cluster_operator_path(name: &str) -> String {
    format!("/apis/config.openshift.io/v1/clusteroperators/{}", name)
}

fn labels(app: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("k8s-app".to_string(), app.to_string())])
}

fn pod_template(app: &str) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels(app)),
            ..Default::default()
        }),
        spec: Some(PodSpec {
            containers: vec![Container {
                name: app.to_string(),
                image: Some(format!("quay.io/openshift/{}:latest", app)),
                ..Default::default()
            }],
            ..Default::default()
        }),
    }
}

fn object_meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        resource_version: Some("1".to_string()),
        ..Default::default()
    }
}

/// A Deployment with `replicas` desired replicas of which `available` are available
pub fn make_deployment(name: &str, namespace: &str, replicas: i32, available: i32) -> Deployment {
    Deployment {
        metadata: object_meta(name, namespace),
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            selector: LabelSelector {
                match_labels: Some(labels(name)),
                ..Default::default()
            },
            template: pod_template(name),
            ..Default::default()
        }),
        status: Some(DeploymentStatus {
            replicas: Some(replicas),
            updated_replicas: Some(replicas),
            ready_replicas: Some(available),
            available_replicas: Some(available),
            unavailable_replicas: Some(replicas - available),
            ..Default::default()
        }),
    }
}

/// A DaemonSet scheduled on `desired` nodes with `ready` ready pods
pub fn make_daemonset(name: &str, namespace: &str, desired: i32, ready: i32) -> DaemonSet {
    DaemonSet {
        metadata: object_meta(name, namespace),
        spec: Some(DaemonSetSpec {
            selector: LabelSelector {
                match_labels: Some(labels(name)),
                ..Default::default()
            },
            template: pod_template(name),
            ..Default::default()
        }),
        status: Some(DaemonSetStatus {
            desired_number_scheduled: desired,
            current_number_scheduled: desired,
            updated_number_scheduled: Some(desired),
            number_ready: ready,
            number_available: Some(ready),
            number_unavailable: Some(desired - ready),
            ..Default::default()
        }),
    }
}

fn server_defaults(value: &mut serde_json::Value, ca_bundle: &[u8]) {
    let ca_bundle = ByteString(ca_bundle.to_vec());
    for webhook in value["webhooks"].as_array_mut().unwrap() {
        webhook["clientConfig"]["caBundle"] = serde_json::to_value(&ca_bundle).unwrap();
        webhook["matchPolicy"] = "Equivalent".into();
        webhook["namespaceSelector"] = serde_json::json!({});
        webhook["objectSelector"] = serde_json::json!({});
        webhook["timeoutSeconds"] = 10.into();
        webhook["rules"][0]["scope"] = "*".into();
    }
    value["metadata"]["resourceVersion"] = "1".into();
    value["metadata"]["uid"] = "test-uid".into();
}

/// The default mutating configuration as the API server would return it
pub fn live_mutating_webhook_configuration(
    namespace: &str,
    ca_bundle: &[u8],
) -> MutatingWebhookConfiguration {
    let mut value = serde_json::to_value(default_mutating_webhook_configuration(namespace)).unwrap();
    server_defaults(&mut value, ca_bundle);
    for webhook in value["webhooks"].as_array_mut().unwrap() {
        webhook["reinvocationPolicy"] = "Never".into();
    }
    serde_json::from_value(value).unwrap()
}

/// The default validating configuration as the API server would return it
pub fn live_validating_webhook_configuration(
    namespace: &str,
    ca_bundle: &[u8],
) -> ValidatingWebhookConfiguration {
    let mut value =
        serde_json::to_value(default_validating_webhook_configuration(namespace)).unwrap();
    server_defaults(&mut value, ca_bundle);
    serde_json::from_value(value).unwrap()
}

/// A ClusterOperator JSON body with the given condition statuses
pub fn cluster_operator_json(
    name: &str,
    available: &str,
    progressing: &str,
    degraded: &str,
) -> String {
    serde_json::json!({
        "apiVersion": "config.openshift.io/v1",
        "kind": "ClusterOperator",
        "metadata": { "name": name, "resourceVersion": "1" },
        "spec": {},
        "status": {
            "conditions": [
                { "type": "Available", "status": available },
                { "type": "Progressing", "status": progressing },
                { "type": "Degraded", "status": degraded }
            ]
        }
    })
    .to_string()
}
