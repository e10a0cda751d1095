use crate::error::{Error, Result};
use crate::models::ProviderLabel;
use async_trait::async_trait;
use google_gmail1::Gmail;
use google_gmail1::api::{Label, Message, ModifyMessageRequest};
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;
use tracing::debug;

/// Narrow seam over the remote mailbox. Everything the pipeline and the
/// mutation coordinator need from the provider goes through here.
#[async_trait]
pub trait MailProvider: Send + Sync {
    async fn list_messages(&self, query: &str, max_results: u32) -> Result<Vec<String>>;
    async fn get_message(&self, id: &str) -> Result<Message>;
    async fn modify_labels(&self, id: &str, add: &[String], remove: &[String]) -> Result<()>;
    async fn trash_message(&self, id: &str) -> Result<()>;
    async fn list_labels(&self) -> Result<Vec<ProviderLabel>>;
    async fn create_label(&self, name: &str) -> Result<ProviderLabel>;
}

#[derive(Clone)]
pub struct GmailClient {
    hub: Gmail<HttpsConnector<HttpConnector>>,
}

impl GmailClient {
    pub fn new(hub: Gmail<HttpsConnector<HttpConnector>>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn list_messages(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        let (_, message_list) = self
            .hub
            .users()
            .messages_list("me")
            .q(query)
            .max_results(max_results)
            .doit()
            .await
            .map_err(Error::provider)?;

        let ids = message_list
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.id)
            .collect();

        Ok(ids)
    }

    async fn get_message(&self, id: &str) -> Result<Message> {
        let (_, msg) = self
            .hub
            .users()
            .messages_get("me", id)
            .format("full")
            .doit()
            .await
            .map_err(Error::provider)?;

        Ok(msg)
    }

    async fn modify_labels(&self, id: &str, add: &[String], remove: &[String]) -> Result<()> {
        debug!(id, ?add, ?remove, "modifying message labels");
        let req = ModifyMessageRequest {
            add_label_ids: (!add.is_empty()).then(|| add.to_vec()),
            remove_label_ids: (!remove.is_empty()).then(|| remove.to_vec()),
        };
        self.hub
            .users()
            .messages_modify(req, "me", id)
            .doit()
            .await
            .map_err(Error::provider)?;
        Ok(())
    }

    async fn trash_message(&self, id: &str) -> Result<()> {
        debug!(id, "trashing message");
        self.hub
            .users()
            .messages_trash("me", id)
            .doit()
            .await
            .map_err(Error::provider)?;
        Ok(())
    }

    async fn list_labels(&self) -> Result<Vec<ProviderLabel>> {
        let (_, label_list) = self
            .hub
            .users()
            .labels_list("me")
            .doit()
            .await
            .map_err(Error::provider)?;

        let labels = label_list
            .labels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|l| match (l.id, l.name) {
                (Some(id), Some(name)) => Some(ProviderLabel { id, name }),
                _ => None,
            })
            .collect();

        Ok(labels)
    }

    async fn create_label(&self, name: &str) -> Result<ProviderLabel> {
        let req = Label {
            name: Some(name.to_string()),
            label_list_visibility: Some("labelShow".to_string()),
            message_list_visibility: Some("show".to_string()),
            ..Label::default()
        };
        let (_, created) = self
            .hub
            .users()
            .labels_create(req, "me")
            .doit()
            .await
            .map_err(Error::provider)?;

        match created.id {
            Some(id) => Ok(ProviderLabel {
                id,
                name: created.name.unwrap_or_else(|| name.to_string()),
            }),
            None => Err(Error::Provider(format!(
                "label create for {name} returned no id"
            ))),
        }
    }
}
