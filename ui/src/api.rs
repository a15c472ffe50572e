use serde::de::DeserializeOwned;
use uuid::Uuid;
use webmail_types::{Email, Envelope, NewEmail};

/// Backend base URL, fixed at build time through `WEBMAIL_BACKEND_URL`.
const API_BASE_URL: &str = match option_env!("WEBMAIL_BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:3001/api",
};

pub struct ApiClient {
    client: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list_emails(&self) -> Result<Vec<Email>, Box<dyn std::error::Error>> {
        let response = self
            .client
            .get(format!("{API_BASE_URL}/emails"))
            .send()
            .await?;

        unwrap_envelope(response).await
    }

    pub async fn search_emails(&self, query: &str) -> Result<Vec<Email>, Box<dyn std::error::Error>> {
        let response = self
            .client
            .get(format!("{API_BASE_URL}/emails/search"))
            .query(&[("q", query)])
            .send()
            .await?;

        unwrap_envelope(response).await
    }

    pub async fn get_email(&self, id: Uuid) -> Result<Email, Box<dyn std::error::Error>> {
        let response = self
            .client
            .get(format!("{API_BASE_URL}/emails/{id}"))
            .send()
            .await?;

        unwrap_envelope(response).await
    }

    pub async fn create_email(&self, email: &NewEmail) -> Result<Email, Box<dyn std::error::Error>> {
        let response = self
            .client
            .post(format!("{API_BASE_URL}/emails"))
            .json(email)
            .send()
            .await?;

        unwrap_envelope(response).await
    }
}

async fn unwrap_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Box<dyn std::error::Error>> {
    let status = response.status();
    let envelope: Envelope<T> = response.json().await?;

    match envelope.data {
        Some(data) if envelope.success => Ok(data),
        _ => {
            let error = envelope
                .error
                .unwrap_or_else(|| format!("unexpected response ({status})"));
            Err(format!("API error: {error}").into())
        }
    }
}
