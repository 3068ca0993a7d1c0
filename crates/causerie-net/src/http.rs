//! HTTP implementation of the REST contracts.
//!
//! Talks to the backend the presentation shell was served from. History
//! and directory reads are plain JSON GETs; sends are multipart so staged
//! files travel with the text in one request.

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use causerie_shared::models::{Message, Room, User};
use causerie_shared::types::{RoomId, UserId};

use crate::api::{ApiError, DirectoryApi, MessageApi, OutgoingMessage};
use crate::auth::BearerToken;

/// REST backend client over HTTP.
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    /// Build a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&BearerToken>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.as_str()),
        None => request,
    }
}

fn network(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ApiError::Rejected(format!("Invalid response body: {e}")))
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(ApiError::Unauthorized)
    } else {
        Err(ApiError::Rejected(format!("Server replied {status}")))
    }
}

#[async_trait]
impl MessageApi for HttpApi {
    async fn fetch_history(
        &self,
        token: Option<&BearerToken>,
        room: RoomId,
    ) -> Result<Vec<Message>, ApiError> {
        let url = self.endpoint(&format!("/api/message/{room}"));
        debug!(room = %room, "Fetching history");

        let response = with_bearer(self.client.get(&url), token)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    async fn send_message(
        &self,
        token: Option<&BearerToken>,
        outgoing: OutgoingMessage,
    ) -> Result<Message, ApiError> {
        let mut form = multipart::Form::new()
            .text("chatRoomId", outgoing.room_id.to_string())
            .text("text", outgoing.text.clone());
        if let Some(reply_to) = outgoing.reply_to {
            form = form.text("replyTo", reply_to.to_string());
        }
        for file in &outgoing.attachments {
            let part = multipart::Part::bytes(file.data.to_vec())
                .file_name(file.name.clone())
                .mime_str(&file.mime)
                .map_err(|e| ApiError::Rejected(format!("Invalid media type: {e}")))?;
            form = form.part("attachments", part);
        }

        let url = self.endpoint("/api/message/send");
        debug!(room = %outgoing.room_id, files = outgoing.attachments.len(), "Sending message");

        let response = with_bearer(self.client.post(&url), token)
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }
}

#[async_trait]
impl DirectoryApi for HttpApi {
    async fn fetch_me(&self, token: Option<&BearerToken>) -> Result<User, ApiError> {
        let response = with_bearer(self.client.get(self.endpoint("/api/auth/me")), token)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    async fn fetch_rooms(&self, token: Option<&BearerToken>) -> Result<Vec<Room>, ApiError> {
        let response = with_bearer(self.client.get(self.endpoint("/api/chat")), token)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    async fn fetch_users(&self, token: Option<&BearerToken>) -> Result<Vec<User>, ApiError> {
        let response = with_bearer(self.client.get(self.endpoint("/api/users")), token)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    async fn create_direct_room(
        &self,
        token: Option<&BearerToken>,
        user: UserId,
    ) -> Result<Room, ApiError> {
        let response = with_bearer(self.client.post(self.endpoint("/api/chat/private")), token)
            .json(&json!({ "userId": user }))
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }
}
