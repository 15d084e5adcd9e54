use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

pub mod contact;
pub mod errors;
pub mod settings;

pub use contact::ContactRecord;
pub use errors::{Result, SalesforceClientError};
pub use settings::SalesforceConfig;

/// Client over the Salesforce REST query API.
///
/// Holds the session obtained from the OAuth2 username-password token grant;
/// all queries go to the instance URL that grant returned.
#[derive(Clone, Debug)]
pub struct SalesforceClient {
    http: reqwest::Client,
    config: SalesforceConfig,
    session: Session,
}

#[derive(Clone, Debug, Deserialize)]
struct Session {
    access_token: String,
    instance_url: Url,
}

#[derive(Debug, Deserialize)]
struct AuthFailure {
    error: String,
    #[serde(default)]
    error_description: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// One page of query results, as returned by the REST query endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T> {
    pub total_size: u64,
    pub done: bool,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    pub next_records_url: Option<String>,
}

enum PageState {
    Start(String),
    Next(String),
    End,
}

impl SalesforceClient {
    /// Authenticates with the username-password grant (the password is the
    /// account password concatenated with the security token).
    pub async fn conn(config: SalesforceConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        let token_url = config.login_url.join("services/oauth2/token")?;
        let password = format!("{}{}", config.password, config.security_token);
        let params = [
            ("grant_type", "password"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("username", config.username.as_str()),
            ("password", password.as_str()),
        ];

        let response = http.post(token_url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let failure = response
                .json::<AuthFailure>()
                .await
                .unwrap_or_else(|_| AuthFailure {
                    error: format!("http status {status}"),
                    error_description: String::new(),
                });
            return Err(SalesforceClientError::Authentication {
                error: failure.error,
                description: failure.error_description,
            });
        }

        let session: Session = response.json().await?;
        info!("authenticated with salesforce at {}", session.instance_url);

        Ok(SalesforceClient {
            http,
            config,
            session,
        })
    }

    /// Runs a SOQL query, returning the first page of results.
    pub async fn query<T>(&self, soql: &str) -> Result<QueryResponse<T>>
    where
        T: DeserializeOwned,
    {
        debug!("salesforce query: {}", soql);
        let url = self.query_url(soql)?;
        self.get_json(url).await
    }

    /// Fetches a continuation page from a previous query's `nextRecordsUrl`.
    pub async fn query_more<T>(&self, next_records_url: &str) -> Result<QueryResponse<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.session.instance_url.join(next_records_url)?;
        self.get_json(url).await
    }

    /// Streams every record of a SOQL query, following `nextRecordsUrl`
    /// until the server reports the result set done.
    pub fn query_stream<'a, T>(&'a self, soql: String) -> impl Stream<Item = Result<T>> + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        stream::try_unfold(PageState::Start(soql), move |state| async move {
            let page = match state {
                PageState::Start(soql) => self.query::<T>(&soql).await?,
                PageState::Next(url) => self.query_more::<T>(&url).await?,
                PageState::End => return Ok(None),
            };

            let next = if page.done {
                PageState::End
            } else {
                match page.next_records_url.clone() {
                    Some(url) => PageState::Next(url),
                    None => return Err(SalesforceClientError::MissingNextRecordsUrl),
                }
            };

            let records = stream::iter(page.records.into_iter().map(Ok));
            Ok(Some((records, next)))
        })
        .try_flatten()
    }

    /// Runs a `SELECT COUNT()` query and returns the total.
    pub async fn count(&self, soql: &str) -> Result<u64> {
        let page: QueryResponse<serde_json::Value> = self.query(soql).await?;
        Ok(page.total_size)
    }

    fn query_url(&self, soql: &str) -> Result<Url> {
        let path = format!("services/data/{}/query", self.config.api_version);
        let mut url = self.session.instance_url.join(&path)?;
        url.query_pairs_mut().append_pair("q", soql);
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.session.access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            // Error bodies look like [{"message": "...", "errorCode": "..."}]
            let message = response
                .json::<Vec<ApiErrorBody>>()
                .await
                .ok()
                .and_then(|mut errors| errors.pop())
                .map(|error| error.message)
                .unwrap_or_else(|| "unknown error".to_string());

            Err(SalesforceClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
