use std::collections::HashMap;

use async_trait::async_trait;
use gatherflow_utils::error::Error;
use gatherflow_utils::{GatherFlowResult, Item, RunSummary};
use reqwest::{Client as ReqwestClient, Method, Request};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{push_all, Source};
use crate::config::PluginConfig;
use crate::sinks::Sink;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HttpSourceParams {
    url: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    params: Option<HashMap<String, String>>,
    #[serde(default)]
    pointer: Option<String>,
}

#[derive(Debug)]
pub struct HttpSourceBuilder {
    method: Method,
    url: String,
    token: Option<String>,
    params: Option<HashMap<String, String>>,
    pointer: Option<String>,
}

impl HttpSourceBuilder {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), token: None, params: None, pointer: None }
    }

    pub fn token<T: Into<String>>(mut self, token: Option<T>) -> Self {
        self.token = token.map(|t| t.into());
        self
    }

    pub fn params(mut self, params: HashMap<String, String>) -> Self {
        self.params = Some(params);
        self
    }

    /// JSON pointer to the array of records inside the response body.
    pub fn pointer(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    pub fn build(self, sink: Box<dyn Sink>) -> GatherFlowResult<HttpSource> {
        let url = Url::parse(&self.url)?;
        let client = ReqwestClient::new();
        let mut request = client.request(self.method, url);

        if let Some(params) = self.params {
            request = request.query(&params);
        }
        if let Some(token) = self.token {
            request = request.bearer_auth(token);
        }

        Ok(HttpSource {
            client,
            request: request.build()?,
            pointer: self.pointer,
            sink,
        })
    }
}

/// Fetches a JSON document per run. An array body (or the array at
/// `pointer`) yields one item per element; anything else is a single item.
pub struct HttpSource {
    client: ReqwestClient,
    request: Request,
    pointer: Option<String>,
    sink: Box<dyn Sink>,
}

impl HttpSource {
    pub fn from_config(config: &PluginConfig, sink: Box<dyn Sink>) -> GatherFlowResult<Box<dyn Source>> {
        let params: HttpSourceParams = config.parse_params()?;
        let method = match params.method.as_deref() {
            Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|_| Error::invalid_params(format!("unknown HTTP method `{m}`")))?,
            None => Method::GET,
        };

        let mut builder = HttpSourceBuilder::new(method, params.url).token(params.token);
        if let Some(query) = params.params {
            builder = builder.params(query);
        }
        if let Some(pointer) = params.pointer {
            builder = builder.pointer(pointer);
        }
        Ok(Box::new(builder.build(sink)?))
    }

    fn get_request(&self) -> GatherFlowResult<Request> {
        self.request
            .try_clone()
            .ok_or_else(|| Error::stage("request body cannot be replayed"))
    }

    async fn fetch_data(&self) -> GatherFlowResult<Value> {
        let resp = self.client.execute(self.get_request()?).await?;
        let body = resp.error_for_status()?.json::<Value>().await?;
        Ok(body)
    }
}

/// Split a response body into items keyed by the request path and position.
fn body_items(url: &Url, body: Value, pointer: Option<&str>) -> GatherFlowResult<Vec<Item>> {
    let records = match pointer {
        Some(p) => body
            .pointer(p)
            .cloned()
            .ok_or_else(|| Error::stage(format!("response from {url} has nothing at `{p}`")))?,
        None => body,
    };
    let base = url.path().to_string();
    Ok(match records {
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Item::new(format!("{base}#{i}"), v))
            .collect(),
        single => vec![Item::new(base, single)],
    })
}

#[async_trait]
impl Source for HttpSource {
    fn name(&self) -> &str { "http" }

    async fn gather(&self) -> GatherFlowResult<RunSummary> {
        let body = self.fetch_data().await?;
        let items = body_items(self.request.url(), body, self.pointer.as_deref())?;
        push_all(self.sink.as_ref(), items).await
    }
}
