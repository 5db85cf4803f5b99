//! Disposable mailbox skills on mail.tm
//!
//! `register` creates an account and saves its credentials as JSON; `send`
//! and `check` load that file again. REST calls go through [`SkillClient`],
//! mail is handed to a [`MailTransport`], by default [`SmtpRelay`] which
//! logs in with the account's own credentials.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lettre::message::Mailbox as MailAddress;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::client::SkillClient;
use crate::error::{Result, SkillError};
use crate::pipeline::write_artifact;
use crate::render::render_json;
use crate::slug;
use crate::types::AcquisitionRequest;
use crate::url::{MAIL_TM_API_URL, join_endpoint};

const REGISTER_DIR: &str = "register-email";
const SEND_DIR: &str = "send-mail";
const CHECK_DIR: &str = "check-mail";

const DEFAULT_SUBJECT: &str = "Test Message";
const DEFAULT_TEXT: &str = "Hello from mail.tm API!";

const PASSWORD_LEN: usize = 12;

/// Endpoints used by the mailbox skills
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// REST API root (default: `https://api.mail.tm`)
    pub api_base: String,
    /// SMTP relay host (default: `in.mail.tm`)
    pub smtp_host: String,
    /// SMTP relay port (default: 25)
    pub smtp_port: u16,
    /// Directory under which `register-email/`, `send-mail/` and
    /// `check-mail/` are created (default: current directory)
    pub artifact_root: PathBuf,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_base: MAIL_TM_API_URL.to_string(),
            smtp_host: "in.mail.tm".to_string(),
            smtp_port: 25,
            artifact_root: PathBuf::new(),
        }
    }
}

/// Saved mailbox credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Account {
    /// Read an account file written by `register`
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SkillError::io(path, e))?;
        let account: Account = serde_json::from_str(&raw)?;
        if !account.address.contains('@') {
            return Err(SkillError::Config(format!(
                "{} does not hold a valid address",
                path.display()
            )));
        }
        Ok(account)
    }

    /// Local part of the address
    pub fn username(&self) -> &str {
        self.address
            .split_once('@')
            .map_or(self.address.as_str(), |(user, _)| user)
    }
}

/// A newly created account and where it was saved
#[derive(Debug, Clone)]
pub struct Registration {
    pub account: Account,
    pub output_file: PathBuf,
}

/// SMTP outcome, also saved as the send artifact
#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub code: String,
    pub response: String,
    #[serde(skip)]
    pub output_file: PathBuf,
}

/// Messages found in the inbox
#[derive(Debug, Clone)]
pub struct Inbox {
    pub address: String,
    pub messages: Vec<Value>,
    pub output_file: PathBuf,
}

/// Optional overrides for an outgoing message
#[derive(Debug, Clone, Default)]
pub struct Outgoing {
    /// Recipient; the account's own address when `None`
    pub to: Option<String>,
    pub subject: Option<String>,
    pub text: Option<String>,
}

/// What the relay answered for an accepted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub code: String,
    pub response: String,
}

/// Hands a finished message to a mail server on behalf of `account`
pub trait MailTransport {
    fn deliver(
        &self,
        account: &Account,
        message: Message,
    ) -> impl Future<Output = Result<Delivery>> + Send;
}

/// Plain SMTP relay authenticated with the sending account
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    host: String,
    port: u16,
    timeout: Duration,
}

impl SmtpRelay {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

impl MailTransport for SmtpRelay {
    async fn deliver(&self, account: &Account, message: Message) -> Result<Delivery> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
            .port(self.port)
            .credentials(Credentials::new(
                account.address.clone(),
                account.password.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        debug!(host = %self.host, port = self.port, "relaying message");
        let response = transport
            .send(message)
            .await
            .map_err(|e| SkillError::Mail(e.to_string()))?;

        Ok(Delivery {
            code: response.code().to_string(),
            response: response.message().collect::<Vec<_>>().join("\n"),
        })
    }
}

pub struct Mailbox<T = SmtpRelay> {
    client: SkillClient,
    config: MailConfig,
    transport: T,
}

impl Mailbox<SmtpRelay> {
    pub fn new(config: MailConfig) -> Result<Self> {
        Ok(Self::with_client(SkillClient::new()?, config))
    }

    /// Relay over SMTP at `config.smtp_host`, bounded by the client's deadline
    pub fn with_client(client: SkillClient, config: MailConfig) -> Self {
        let relay = SmtpRelay::new(config.smtp_host.clone(), config.smtp_port, client.timeout());
        Self::with_transport(client, config, relay)
    }
}

impl<T: MailTransport> Mailbox<T> {
    pub fn with_transport(client: SkillClient, config: MailConfig, transport: T) -> Self {
        Self {
            client,
            config,
            transport,
        }
    }

    /// Create an account on the first available domain
    ///
    /// Credentials are written to `output` or `register-email/<user>.json`.
    #[instrument(skip_all)]
    pub async fn register(&self, output: Option<&Path>) -> Result<Registration> {
        let username = format!("user{}", chrono::Utc::now().timestamp_millis());
        let password = generate_password();

        let domain = self.first_domain().await?;
        let address = format!("{}@{}", username, domain);
        debug!(%address, "registering account");

        let request = AcquisitionRequest::post_json(
            &address,
            self.endpoint("accounts"),
            json!({ "address": address, "password": password }),
        );
        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| api_error("registration failed", e))?;
        let created: Value = serde_json::from_str(&response.body)?;

        let account = Account {
            address,
            password,
            id: created.get("id").and_then(Value::as_str).map(str::to_string),
        };

        let output_file = slug::resolve(&username, &self.dir(REGISTER_DIR), output, ".json").await?;
        write_artifact(&output_file, render_json(&account)?.as_bytes()).await?;

        info!(address = %account.address, output = %output_file.display(), "account registered");
        Ok(Registration {
            account,
            output_file,
        })
    }

    /// Fetch the first page of messages for the account saved at `account_path`
    #[instrument(skip_all, fields(account = %account_path.display()))]
    pub async fn check(&self, account_path: &Path, output: Option<&Path>) -> Result<Inbox> {
        let account = Account::load(account_path).await?;
        let output_file =
            slug::resolve(account.username(), &self.dir(CHECK_DIR), output, ".json").await?;

        let token = self.token(&account).await?;
        let request = AcquisitionRequest::get(&account.address, self.endpoint("messages?page=1"))
            .header("Authorization", format!("Bearer {}", token));
        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| api_error("messages request failed", e))?;

        let listing: Value = serde_json::from_str(&response.body)?;
        let messages = listing
            .get("hydra:member")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let artifact = json!({ "address": account.address, "messages": messages });
        write_artifact(&output_file, render_json(&artifact)?.as_bytes()).await?;

        info!(count = messages.len(), output = %output_file.display(), "inbox saved");
        Ok(Inbox {
            address: account.address,
            messages,
            output_file,
        })
    }

    /// Send a message from the account saved at `account_path`
    ///
    /// The receipt is written to `send-mail/<user>-<millis>.json`.
    #[instrument(skip_all, fields(account = %account_path.display()))]
    pub async fn send(&self, account_path: &Path, outgoing: Outgoing) -> Result<SendReceipt> {
        let account = Account::load(account_path).await?;
        let millis = chrono::Utc::now().timestamp_millis();

        let to = outgoing.to.unwrap_or_else(|| account.address.clone());
        let subject = outgoing.subject.unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
        let text = outgoing.text.unwrap_or_else(|| DEFAULT_TEXT.to_string());
        let message_id = message_id(&account.address, millis);

        let message = build_message(&account.address, &to, &subject, &text, &message_id)?;

        debug!(%to, "sending message");
        let delivery = self.transport.deliver(&account, message).await?;

        let output_file = self
            .dir(SEND_DIR)
            .join(format!("{}-{}.json", account.username(), millis));
        let receipt = SendReceipt {
            message_id,
            from: account.address,
            to,
            subject,
            code: delivery.code,
            response: delivery.response,
            output_file,
        };
        write_artifact(&receipt.output_file, render_json(&receipt)?.as_bytes()).await?;

        info!(message_id = %receipt.message_id, output = %receipt.output_file.display(), "message sent");
        Ok(receipt)
    }

    async fn first_domain(&self) -> Result<String> {
        let request = AcquisitionRequest::get("domains", self.endpoint("domains?page=1"));
        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| api_error("failed to fetch domains", e))?;

        let listing: Value = serde_json::from_str(&response.body)?;
        listing
            .pointer("/hydra:member/0/domain")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SkillError::Mail("no domain available".to_string()))
    }

    async fn token(&self, account: &Account) -> Result<String> {
        let request = AcquisitionRequest::post_json(
            &account.address,
            self.endpoint("token"),
            json!({ "address": account.address, "password": account.password }),
        );
        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| api_error("token request failed", e))?;

        let body: Value = serde_json::from_str(&response.body)?;
        body.get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SkillError::MissingPayload("token response has no token".to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.config.api_base, path)
    }

    fn dir(&self, name: &str) -> PathBuf {
        self.config.artifact_root.join(name)
    }
}

fn generate_password() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LEN)
        .map(char::from)
        .collect();
    // mail.tm rejects passwords without mixed character classes
    format!("{}A!1", random)
}

fn message_id(address: &str, millis: i64) -> String {
    let domain = address.split_once('@').map_or("localhost", |(_, d)| d);
    let nonce: u32 = rand::thread_rng().r#gen();
    format!("<{}.{:08x}@{}>", millis, nonce, domain)
}

fn build_message(from: &str, to: &str, subject: &str, text: &str, message_id: &str) -> Result<Message> {
    let from: MailAddress = from
        .parse()
        .map_err(|e| SkillError::Mail(format!("invalid sender {:?}: {}", from, e)))?;
    let to: MailAddress = to
        .parse()
        .map_err(|e| SkillError::Mail(format!("invalid recipient {:?}: {}", to, e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .message_id(Some(message_id.to_string()))
        .header(ContentType::TEXT_PLAIN)
        .body(text.to_string())
        .map_err(|e| SkillError::Mail(e.to_string()))
}

/// Turn a failed REST status into a mailbox error that keeps the provider's message
fn api_error(action: &str, err: SkillError) -> SkillError {
    match err {
        SkillError::HttpStatus { code, body } => SkillError::Mail(match body {
            Some(body) => format!("{}: HTTP {}: {}", action, code, body),
            None => format!("{}: HTTP {}", action, code),
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    /// Keeps every delivered message instead of talking to a server
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String)>>,
        reject: bool,
    }

    impl MailTransport for RecordingTransport {
        async fn deliver(&self, account: &Account, message: Message) -> Result<Delivery> {
            if self.reject {
                return Err(SkillError::Mail("554 relay access denied".to_string()));
            }
            let raw = String::from_utf8(message.formatted()).unwrap();
            self.sent.lock().unwrap().push((account.address.clone(), raw));
            Ok(Delivery {
                code: "250".to_string(),
                response: "2.0.0 Ok: queued as 4F2A1".to_string(),
            })
        }
    }

    fn recording_mailbox(root: &Path, transport: RecordingTransport) -> Mailbox<RecordingTransport> {
        let config = MailConfig {
            artifact_root: root.to_path_buf(),
            ..MailConfig::default()
        };
        Mailbox::with_transport(SkillClient::new().unwrap(), config, transport)
    }

    fn config(server: &MockServer, root: &Path) -> MailConfig {
        MailConfig {
            api_base: server.uri(),
            artifact_root: root.to_path_buf(),
            ..MailConfig::default()
        }
    }

    async fn write_account(dir: &Path) -> PathBuf {
        let path = dir.join("account.json");
        let account = Account {
            address: "user1@example.test".to_string(),
            password: "secretA!1".to_string(),
            id: Some("acc-1".to_string()),
        };
        tokio::fs::write(&path, serde_json::to_string(&account).unwrap())
            .await
            .unwrap();
        path
    }

    #[tokio::test]
    async fn test_register_saves_account() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/domains"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hydra:member": [{"domain": "example.test"}, {"domain": "other.test"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts"))
            .respond_with(|req: &Request| {
                let body: Value = serde_json::from_slice(&req.body).unwrap();
                ResponseTemplate::new(201).set_body_json(json!({
                    "id": "acc-42",
                    "address": body["address"]
                }))
            })
            .expect(1)
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let mailbox = Mailbox::new(config(&server, root.path())).unwrap();
        let registration = mailbox.register(None).await.unwrap();

        let account = &registration.account;
        assert!(account.address.starts_with("user"));
        assert!(account.address.ends_with("@example.test"));
        assert!(account.password.ends_with("A!1"));
        assert_eq!(account.id.as_deref(), Some("acc-42"));

        assert_eq!(
            registration.output_file,
            root.path()
                .join(REGISTER_DIR)
                .join(format!("{}.json", account.username()))
        );
        let saved = Account::load(&registration.output_file).await.unwrap();
        assert_eq!(&saved, account);
    }

    #[tokio::test]
    async fn test_register_without_domain_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/domains"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hydra:member": []})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let mailbox = Mailbox::new(config(&server, root.path())).unwrap();
        let result = mailbox.register(None).await;

        assert!(matches!(result, Err(SkillError::Mail(msg)) if msg.contains("no domain")));
    }

    #[tokio::test]
    async fn test_register_keeps_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/domains"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"hydra:member": [{"domain": "example.test"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(422).set_body_string("address already used"))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let mailbox = Mailbox::new(config(&server, root.path())).unwrap();

        match mailbox.register(None).await {
            Err(SkillError::Mail(msg)) => {
                assert!(msg.starts_with("registration failed: HTTP 422"));
                assert!(msg.contains("address already used"));
            }
            other => panic!("Expected Mail error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_saves_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_json(json!({"address": "user1@example.test", "password": "secretA!1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt-1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .and(header("Authorization", "Bearer jwt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hydra:member": [
                    {"id": "m1", "subject": "Hello"},
                    {"id": "m2", "subject": "Again"}
                ]
            })))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let account_path = write_account(root.path()).await;
        let mailbox = Mailbox::new(config(&server, root.path())).unwrap();

        let inbox = mailbox.check(&account_path, None).await.unwrap();

        assert_eq!(inbox.messages.len(), 2);
        assert_eq!(inbox.output_file, root.path().join(CHECK_DIR).join("user1.json"));

        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(&inbox.output_file).unwrap()).unwrap();
        assert_eq!(saved["address"], "user1@example.test");
        assert_eq!(saved["messages"][1]["subject"], "Again");
    }

    #[tokio::test]
    async fn test_check_with_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let account_path = write_account(root.path()).await;
        let out = root.path().join("inbox.json");
        let mailbox = Mailbox::new(config(&server, root.path())).unwrap();

        let result = mailbox.check(&account_path, Some(&out)).await;

        assert!(matches!(result, Err(SkillError::Mail(msg)) if msg == "token request failed: HTTP 401"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_send_with_defaults_writes_receipt() {
        let root = tempfile::tempdir().unwrap();
        let account_path = write_account(root.path()).await;
        let mailbox = recording_mailbox(root.path(), RecordingTransport::default());

        let receipt = mailbox.send(&account_path, Outgoing::default()).await.unwrap();

        assert_eq!(receipt.from, "user1@example.test");
        assert_eq!(receipt.to, "user1@example.test");
        assert_eq!(receipt.subject, DEFAULT_SUBJECT);
        assert_eq!(receipt.code, "250");
        assert_eq!(receipt.response, "2.0.0 Ok: queued as 4F2A1");
        assert!(receipt.message_id.starts_with('<'));
        assert!(receipt.message_id.ends_with("@example.test>"));

        assert_eq!(receipt.output_file.parent(), Some(root.path().join(SEND_DIR).as_path()));
        let file_name = receipt.output_file.file_name().unwrap().to_str().unwrap();
        let millis = file_name
            .strip_prefix("user1-")
            .and_then(|rest| rest.strip_suffix(".json"))
            .unwrap();
        assert!(millis.parse::<i64>().is_ok());

        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(&receipt.output_file).unwrap()).unwrap();
        assert_eq!(saved["from"], "user1@example.test");
        assert_eq!(saved["to"], "user1@example.test");
        assert_eq!(saved["subject"], DEFAULT_SUBJECT);
        assert_eq!(saved["code"], "250");
        assert_eq!(saved["message_id"], receipt.message_id.as_str());
        assert!(saved.get("output_file").is_none());

        let sent = mailbox.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (login, raw) = &sent[0];
        assert_eq!(login, "user1@example.test");
        assert!(raw.contains("Subject: Test Message"));
        assert!(raw.contains(DEFAULT_TEXT));
    }

    #[tokio::test]
    async fn test_send_with_overrides() {
        let root = tempfile::tempdir().unwrap();
        let account_path = write_account(root.path()).await;
        let mailbox = recording_mailbox(root.path(), RecordingTransport::default());

        let outgoing = Outgoing {
            to: Some("friend@example.test".to_string()),
            subject: Some("Lunch".to_string()),
            text: Some("Noon at the usual place".to_string()),
        };
        let receipt = mailbox.send(&account_path, outgoing).await.unwrap();

        assert_eq!(receipt.to, "friend@example.test");
        assert_eq!(receipt.subject, "Lunch");

        let sent = mailbox.transport.sent.lock().unwrap();
        let (_, raw) = &sent[0];
        assert!(raw.contains("To: friend@example.test"));
        assert!(raw.contains("Noon at the usual place"));
    }

    #[tokio::test]
    async fn test_send_rejected_by_relay_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let account_path = write_account(root.path()).await;
        let transport = RecordingTransport {
            reject: true,
            ..RecordingTransport::default()
        };
        let mailbox = recording_mailbox(root.path(), transport);

        let result = mailbox.send(&account_path, Outgoing::default()).await;

        assert!(matches!(result, Err(SkillError::Mail(msg)) if msg.contains("relay access denied")));
        assert!(!root.path().join(SEND_DIR).exists());
    }

    #[tokio::test]
    async fn test_send_bad_recipient_skips_transport() {
        let root = tempfile::tempdir().unwrap();
        let account_path = write_account(root.path()).await;
        let mailbox = recording_mailbox(root.path(), RecordingTransport::default());

        let outgoing = Outgoing {
            to: Some("not an address".to_string()),
            ..Outgoing::default()
        };
        let result = mailbox.send(&account_path, outgoing).await;

        assert!(matches!(result, Err(SkillError::Mail(msg)) if msg.contains("recipient")));
        assert!(mailbox.transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_account() {
        let root = tempfile::tempdir().unwrap();
        let result = Account::load(&root.path().join("nope.json")).await;
        assert!(matches!(result, Err(SkillError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_account_without_address() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("bad.json");
        std::fs::write(&path, r#"{"address": "nobody", "password": "x"}"#).unwrap();

        let result = Account::load(&path).await;
        assert!(matches!(result, Err(SkillError::Config(_))));
    }

    #[test]
    fn test_username() {
        let account = Account {
            address: "user17@example.test".to_string(),
            password: String::new(),
            id: None,
        };
        assert_eq!(account.username(), "user17");
    }

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), PASSWORD_LEN + 3);
        assert!(password.ends_with("A!1"));
        assert_ne!(generate_password(), password);
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let result = build_message(
            "user1@example.test",
            "not an address",
            DEFAULT_SUBJECT,
            DEFAULT_TEXT,
            "<1@example.test>",
        );
        assert!(matches!(result, Err(SkillError::Mail(msg)) if msg.contains("recipient")));
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(
            "user1@example.test",
            "friend@example.test",
            "Hi",
            "Body text",
            "<1.abc@example.test>",
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Hi"));
        assert!(raw.contains("Message-ID: <1.abc@example.test>"));
        assert!(raw.contains("Body text"));
    }
}
