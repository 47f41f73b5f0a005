use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{LOCATION, REFERER};
use reqwest::{Client, Response, Url, redirect};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use super::events::{collect_answer, ndjson_to_events};
use super::{ChatModel, Credentials};
use crate::error::ServiceError;

pub const DEFAULT_HUGGINGCHAT_URL: &str = "https://huggingface.co";

/// Cookie holding the authorized chat session.
const SESSION_COOKIE: &str = "hf-chat";

/// Upper bound on redirects followed during chat authorization.
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Serialize)]
struct NewConversation<'a> {
    model: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationCreated {
    conversation_id: String,
}

#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    inputs: &'a str,
    is_retry: bool,
    is_continue: bool,
    web_search: bool,
}

/// Client for a HuggingChat-style hosted chat model.
///
/// Logs in on first use and keeps the session cookies for the lifetime of the
/// client. Each prompt opens a fresh conversation, so completions are single-turn.
///
/// Logging in takes two steps: the account sign-in (`POST /login`) and the
/// chat authorization (`POST /chat/login`, then its redirects through the
/// authorize and callback pages). Redirects are followed by hand so every
/// `Set-Cookie` along the way lands in the cookie jar. Login only succeeds once
/// the `hf-chat` session cookie is present.
pub struct HuggingChatClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: String,
    model: String,
    credentials: Credentials,
    session: OnceCell<()>,
}

impl HuggingChatClient {
    pub fn new(
        base_url: String,
        model: String,
        credentials: Credentials,
    ) -> Result<Self, ServiceError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            jar,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            credentials,
            session: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn login(&self) -> Result<(), ServiceError> {
        tracing::info!(email = %self.credentials.email, "logging in to chat model");

        self.sign_in().await?;
        self.authorize().await?;

        if !self.has_session_cookie()? {
            return Err(ServiceError::Auth(
                "no chat session was issued after sign-in".to_string(),
            ));
        }

        tracing::debug!("chat session established");
        Ok(())
    }

    async fn sign_in(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.url("/login"))
            .form(&[
                ("username", self.credentials.email.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            return Err(ServiceError::Auth(format!(
                "server rejected the credentials ({status})"
            )));
        }
        // A successful sign-in answers with a redirect; it is not followed.
        if !status.is_success() && !status.is_redirection() {
            return Err(ServiceError::from_response("chat model login", response).await);
        }

        Ok(())
    }

    async fn authorize(&self) -> Result<(), ServiceError> {
        let mut response = self
            .client
            .post(self.url("/chat/login"))
            .header(REFERER, self.url("/chat/login"))
            .send()
            .await?;

        let mut hops = 0;
        while response.status().is_redirection() {
            if hops == MAX_REDIRECTS {
                return Err(ServiceError::Auth(
                    "too many redirects during chat authorization".to_string(),
                ));
            }
            let next = redirect_target(&response)?;
            tracing::debug!(%next, "following chat authorization redirect");
            response = self.client.get(next).send().await?;
            hops += 1;
        }

        let status = response.status();
        if status.is_client_error() {
            return Err(ServiceError::Auth(format!(
                "chat authorization was refused ({status})"
            )));
        }
        if !status.is_success() {
            return Err(ServiceError::from_response("chat model login", response).await);
        }

        Ok(())
    }

    fn has_session_cookie(&self) -> Result<bool, ServiceError> {
        let chat_url = Url::parse(&self.url("/chat/"))
            .map_err(|e| ServiceError::Parse(format!("invalid chat URL: {e}")))?;

        Ok(self
            .jar
            .cookies(&chat_url)
            .and_then(|header| header.to_str().map(str::to_string).ok())
            .is_some_and(|cookies| {
                cookies.split(';').any(|pair| {
                    pair.trim()
                        .split_once('=')
                        .is_some_and(|(name, _)| name == SESSION_COOKIE)
                })
            }))
    }

    async fn ensure_session(&self) -> Result<(), ServiceError> {
        self.session.get_or_try_init(|| self.login()).await?;
        Ok(())
    }

    async fn open_conversation(&self) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(self.url("/chat/conversation"))
            .json(&NewConversation { model: &self.model })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response("chat model", response).await);
        }

        let created: ConversationCreated = response.json().await?;
        tracing::debug!(id = %created.conversation_id, "opened conversation");
        Ok(created.conversation_id)
    }
}

/// Resolves a redirect's `Location` against the URL that produced it.
fn redirect_target(response: &Response) -> Result<Url, ServiceError> {
    let location = response
        .headers()
        .get(LOCATION)
        .ok_or_else(|| ServiceError::Parse("redirect without a Location header".to_string()))?
        .to_str()
        .map_err(|e| ServiceError::Parse(format!("invalid redirect location: {e}")))?;

    response
        .url()
        .join(location)
        .map_err(|e| ServiceError::Parse(format!("invalid redirect location: {e}")))
}

#[async_trait]
impl ChatModel for HuggingChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self.ensure_session().await?;
        let conversation_id = self.open_conversation().await?;

        let response = self
            .client
            .post(self.url(&format!("/chat/conversation/{conversation_id}")))
            .json(&PromptRequest {
                inputs: prompt,
                is_retry: false,
                is_continue: false,
                web_search: false,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response("chat model", response).await);
        }

        collect_answer(ndjson_to_events(response.bytes_stream())).await
    }
}
