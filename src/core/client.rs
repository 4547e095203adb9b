use crate::config::BackendConfig;
use crate::utils::error::{BackendError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder};
use std::sync::OnceLock;
use url::Url;

/// Services exposed by the hosted backend under the project URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Rest,
    Auth,
    Storage,
    Realtime,
}

impl Service {
    fn path(&self) -> &'static str {
        match self {
            Service::Rest => "rest/v1/",
            Service::Auth => "auth/v1/",
            Service::Storage => "storage/v1/",
            Service::Realtime => "realtime/v1/",
        }
    }
}

/// Handle to the hosted backend, bound to one URL and anon key.
///
/// Every request made through [`BackendClient::table_request`] carries the `apikey`
/// and `Authorization: Bearer` headers. The handle is immutable once built.
#[derive(Debug)]
pub struct BackendClient {
    config: BackendConfig,
    base_url: Url,
    http: Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;

        let mut base_url = validate_url("url", &config.url)?;
        base_url.set_query(None);
        base_url.set_fragment(None);
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().default_headers(default_headers(&config)?);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        tracing::info!(url = %base_url, "Backend client initialized");

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn service_url(&self, service: Service) -> Result<Url> {
        let mut url = self
            .base_url
            .join(service.path())
            .map_err(|e| invalid_url(&self.base_url, e.to_string()))?;

        if service == Service::Realtime {
            let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
            url.set_scheme(scheme)
                .map_err(|_| invalid_url(&self.base_url, format!("cannot switch to {}", scheme)))?;
        }

        Ok(url)
    }

    /// `<base>/rest/v1/<table>`
    pub fn rest_endpoint(&self, table: &str) -> Result<Url> {
        validate_non_empty_string("table", table)?;
        if table.contains('/') {
            return Err(BackendError::validation(format!(
                "table name '{}' must not contain '/'",
                table
            )));
        }

        self.service_url(Service::Rest)?
            .join(table)
            .map_err(|e| invalid_url(&self.base_url, e.to_string()))
    }

    /// Start a request against a REST table. Reads carry `Accept-Profile`
    /// and writes carry `Content-Profile` when a schema is configured.
    pub fn table_request(&self, method: Method, table: &str) -> Result<RequestBuilder> {
        let url = self.rest_endpoint(table)?;
        let is_read = method == Method::GET || method == Method::HEAD;
        let mut request = self.http.request(method, url);

        if let Some(schema) = &self.config.schema {
            let header = if is_read {
                "Accept-Profile"
            } else {
                "Content-Profile"
            };
            request = request.header(header, schema);
        }

        Ok(request)
    }
}

fn default_headers(config: &BackendConfig) -> Result<HeaderMap> {
    let header_value = |raw: String| {
        HeaderValue::from_str(&raw).map_err(|e| BackendError::InvalidConfigValue {
            field: "anon_key".to_string(),
            value: "[REDACTED]".to_string(),
            reason: format!("Not a valid header value: {}", e),
        })
    };

    let mut apikey = header_value(config.anon_key.clone())?;
    apikey.set_sensitive(true);
    let mut bearer = header_value(format!("Bearer {}", config.anon_key))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", apikey);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

fn invalid_url(base: &Url, reason: String) -> BackendError {
    BackendError::InvalidConfigValue {
        field: "url".to_string(),
        value: base.to_string(),
        reason,
    }
}

/// Lazily-initialized holder for exactly one [`BackendClient`].
#[derive(Debug, Default)]
pub struct SharedClient {
    cell: OnceLock<BackendClient>,
}

impl SharedClient {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Option<&BackendClient> {
        self.cell.get()
    }

    /// Return the stored client, building it from `init` on first use.
    ///
    /// `init` is not called once a client exists. If `init` or client
    /// construction fails, nothing is stored and a later call may retry.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<&BackendClient>
    where
        F: FnOnce() -> Result<BackendConfig>,
    {
        if let Some(client) = self.cell.get() {
            return Ok(client);
        }

        let client = BackendClient::new(init()?)?;
        // 併發初始化時以先寫入者為準
        Ok(self.cell.get_or_init(|| client))
    }
}

static SHARED: SharedClient = SharedClient::new();

/// Process-wide client configured from the environment.
pub fn shared() -> Result<&'static BackendClient> {
    init_shared(BackendConfig::from_env)
}

/// Initialize the process-wide client from another configuration source.
/// Has no effect if the client already exists.
pub fn init_shared<F>(init: F) -> Result<&'static BackendClient>
where
    F: FnOnce() -> Result<BackendConfig>,
{
    SHARED.get_or_try_init(init)
}
