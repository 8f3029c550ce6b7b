use crate::domain::SubscriberEmail;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

#[derive(Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    sender_name: String,
    authorization_token: Secret<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        sender_name: String,
        authorization_token: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            sender,
            sender_name,
            authorization_token,
        })
    }

    #[tracing::instrument(name = "Sending email", skip(self, html_content, text_content))]
    pub async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
        text_content: Option<&str>,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/v3/mail/send", self.base_url);
        // text/plain has to come before text/html.
        let mut content = Vec::with_capacity(2);
        if let Some(text) = text_content {
            content.push(MailContent {
                r#type: "text/plain",
                value: text,
            });
        }
        content.push(MailContent {
            r#type: "text/html",
            value: html_content,
        });
        let request_body = SendEmailRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: recipient.as_ref(),
                    name: None,
                }],
            }],
            from: Address {
                email: self.sender.as_ref(),
                name: Some(&self.sender_name),
            },
            subject,
            content,
        };

        self.http_client
            .post(&url)
            .bearer_auth(self.authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

// Request layout of the v3 `mail/send` endpoint.
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<MailContent<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct MailContent<'a> {
    r#type: &'a str,
    value: &'a str,
}
