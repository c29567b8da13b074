// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Blocking HTTP client for a Rhino.Compute-style kernel server

use super::client::GeometryClient;
use super::wire::{self, Plane, RhinoBox, TransformReply};
use super::{ComputeError, Result};
use crate::config::{ComputeConfig, ConfigError};
use crate::geometry::{Archive, Mesh, Primitive, Solid};
use nalgebra::Matrix4;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Default timeout for health check requests (5 seconds)
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

const API_KEY_HEADER: &str = "RhinoComputeKey";

const USER_AGENT: &str = concat!("polyframe-compute/", env!("CARGO_PKG_VERSION"));

mod endpoint {
    pub const BOX: &str = "rhino/geometry/brep/createfrombox-boundingbox";
    pub const SPHERE: &str = "rhino/geometry/brep/createfromsphere-sphere";
    pub const CYLINDER: &str = "rhino/geometry/brep/createfromcylinder-cylinder_bool_bool";
    pub const SPLIT: &str = "rhino/geometry/brep/split-brep_brep_double";
    pub const JOIN: &str = "rhino/geometry/brep/joinbreps-breparray_double";
    pub const MESH: &str = "rhino/geometry/mesh/createfrombrep-brep";
    pub const TRANSFORM: &str = "rhino/geometry/geometrybase/transform-geometrybase_transform";
    pub const BOUNDING_BOX: &str = "rhino/geometry/brep/getboundingbox-brep_bool";
    pub const IS_VALID: &str = "rhino/geometry/brep/isvalid-brep";
    pub const HEALTH: &str = "healthcheck";
    pub const GRASSHOPPER: &str = "grasshopper";
}

/// Compute server HTTP client.
///
/// Each kernel operation is one POST of a JSON argument array to the
/// operation's endpoint path. Breps travel as rhino3dm archive envelopes;
/// every Brep the server returns costs two more round trips to read back its
/// bounding box and validity. Failures are mapped to [`ComputeError`] and
/// never retried.
///
/// # Example
///
/// ```no_run
/// use polyframe_compute::compute::{GeometryClient, HttpComputeClient};
/// use polyframe_compute::geometry::Primitive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpComputeClient::new("http://localhost:6500/", "my-key");
/// let solid = client.build_primitive(&Primitive::origin_box(10.0, 10.0, 10.0))?;
/// println!("valid: {}", solid.is_valid());
/// # Ok(())
/// # }
/// ```
pub struct HttpComputeClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl HttpComputeClient {
    /// Create a new client with the given server URL and API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(120),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Build a client from validated configuration
    pub fn from_config(config: &ComputeConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let api_key = config.api_key.clone().unwrap_or_default();
        Ok(Self::new(config.base_url.clone(), api_key).with_timeout(config.timeout()))
    }

    /// Set the timeout for kernel operations
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout for health check requests
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn map_send_error(&self, e: reqwest::Error, timeout: Duration) -> ComputeError {
        if e.is_timeout() {
            ComputeError::Timeout(timeout.as_secs())
        } else if e.is_connect() {
            ComputeError::Connection(format!("Failed to connect to {}", self.base_url))
        } else {
            ComputeError::Request(e)
        }
    }

    /// POST `args` to `endpoint` and parse the JSON body
    fn post<T: DeserializeOwned>(&self, endpoint: &str, args: &Value) -> Result<T> {
        debug!(endpoint, "compute request");

        let response = self
            .client
            .post(self.url(endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(args)
            .timeout(self.timeout)
            .send()
            .map_err(|e| self.map_send_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(ComputeError::Server {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .map_err(|e| ComputeError::Parse(format!("Failed to parse {} response: {}", endpoint, e)))
    }

    /// Read back the kernel's bounds and validity for a returned Brep
    fn hydrate(&self, archive: Archive) -> Result<Solid> {
        let bounds: RhinoBox = self.post(endpoint::BOUNDING_BOX, &json!([archive, true]))?;
        let valid: bool = self.post(endpoint::IS_VALID, &json!([archive]))?;
        Ok(Solid::from_archive(archive, bounds.into(), valid))
    }

    fn post_solid(&self, endpoint: &str, operation: &'static str, args: &Value) -> Result<Solid> {
        let archive = self
            .post::<Option<Archive>>(endpoint, args)?
            .ok_or(ComputeError::EmptyResult(operation))?;
        self.hydrate(archive)
    }

    fn post_solids(&self, endpoint: &str, args: &Value) -> Result<Vec<Solid>> {
        self.post::<Option<Vec<Archive>>>(endpoint, args)?
            .unwrap_or_default()
            .into_iter()
            .map(|archive| self.hydrate(archive))
            .collect()
    }

    /// Check the compute server's health endpoint and return its body
    pub fn health_check(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url(endpoint::HEALTH))
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.health_timeout)
            .send()
            .map_err(|e| self.map_send_error(e, self.health_timeout))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(ComputeError::Server {
                status: status.as_u16(),
                body: format!("Compute server is not healthy: {}", body),
            });
        }
        Ok(body)
    }

    /// Solve a Grasshopper definition with string-valued inputs
    pub fn run_definition(&self, definition: &str, inputs: &BTreeMap<String, Value>) -> Result<Value> {
        self.post(endpoint::GRASSHOPPER, &definition_payload(definition, inputs))
    }
}

/// Solve payload: every input becomes a single-item tree of `System.String`
fn definition_payload(definition: &str, inputs: &BTreeMap<String, Value>) -> Value {
    let values: Vec<Value> = inputs
        .iter()
        .map(|(name, value)| {
            let data = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            json!({
                "ParamName": name,
                "InnerTree": { "(0)": [{ "type": "System.String", "data": data }] }
            })
        })
        .collect();

    json!({ "script": definition, "values": values })
}

fn primitive_request(primitive: &Primitive) -> (&'static str, Value) {
    match primitive {
        Primitive::Box { bounds } => (endpoint::BOX, json!([RhinoBox::from(bounds)])),
        Primitive::Sphere { center, radius } => (
            endpoint::SPHERE,
            json!([wire::Sphere {
                center: (*center).into(),
                radius: *radius,
            }]),
        ),
        Primitive::Cylinder {
            base,
            axis,
            radius,
            height,
            capped,
        } => (
            endpoint::CYLINDER,
            json!([
                wire::Cylinder {
                    base_plane: Plane::with_normal(*base, *axis),
                    radius: *radius,
                    height1: 0.0,
                    height2: *height,
                },
                capped,
                capped
            ]),
        ),
    }
}

/// Mesh replies are read as vertex/face JSON. A stock server answers with
/// opennurbs mesh archives, which cannot be decoded without rhino3dm, so the
/// server needs a mesh endpoint that emits plain geometry.
fn parse_meshes(body: Value) -> Result<Vec<Mesh>> {
    let items = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| {
            if item.get("archive3dm").is_some() {
                return Err(ComputeError::Parse(
                    "mesh came back as an opennurbs archive; expected vertex/face JSON".into(),
                ));
            }
            serde_json::from_value(item)
                .map_err(|e| ComputeError::Parse(format!("Failed to parse mesh: {}", e)))
        })
        .collect()
}

impl GeometryClient for HttpComputeClient {
    fn build_primitive(&self, primitive: &Primitive) -> Result<Solid> {
        let (endpoint, args) = primitive_request(primitive);
        self.post_solid(endpoint, "build", &args)
    }

    fn split(&self, solid: &Solid, cutter: &Solid, tolerance: f64) -> Result<Vec<Solid>> {
        self.post_solids(
            endpoint::SPLIT,
            &json!([solid.archive, cutter.archive, tolerance]),
        )
    }

    fn join_breps(&self, solids: &[Solid], tolerance: f64) -> Result<Vec<Solid>> {
        let archives: Vec<&Archive> = solids.iter().map(|s| &s.archive).collect();
        self.post_solids(endpoint::JOIN, &json!([archives, tolerance]))
    }

    fn mesh_from_brep(&self, solid: &Solid) -> Result<Vec<Mesh>> {
        parse_meshes(self.post(endpoint::MESH, &json!([solid.archive]))?)
    }

    fn transform(&self, solid: &Solid, matrix: &Matrix4<f64>) -> Result<Solid> {
        let reply: TransformReply = self.post(
            endpoint::TRANSFORM,
            &json!([solid.archive, wire::Transform(*matrix)]),
        )?;
        let archive = reply
            .into_archive()
            .ok_or(ComputeError::EmptyResult("transform"))?;
        self.hydrate(archive)
    }
}
