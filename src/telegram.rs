//! Telegram user-client ingestion: log in, watch a set of public channels,
//! hand every non-empty post to a consumer.

use anyhow::{Context, Result, anyhow, bail};
use grammers_client::{Client, SignInError, Update, UpdatesConfiguration};
use grammers_mtsender::SenderPool;
use grammers_session::storages::SqliteSession;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

const DEFAULT_SESSION_PATH: &str = "./telegram.session.sqlite";

#[derive(Clone)]
pub struct TgCfg {
    pub api_id: i32,
    pub api_hash: String,
    pub phone: String,
    pub two_fa_password: Option<String>,
    pub session_path: String,
    pub channels: Vec<String>,
}

impl TgCfg {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset. All missing required keys are reported
    /// in one error.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            let value = get(key);
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        };
        let api_id = required("TG_API_ID");
        let api_hash = required("TG_API_HASH");
        let phone = required("TG_PHONE");
        let channels = required("TG_CHANNELS");
        if !missing.is_empty() {
            bail!("Missing env vars for watch mode: {}", missing.join(", "));
        }

        let channels = parse_channels(&channels);
        if channels.is_empty() {
            bail!("TG_CHANNELS names no channels");
        }

        Ok(Self {
            api_id: api_id
                .trim()
                .parse()
                .with_context(|| format!("TG_API_ID must be i32, got {api_id:?}"))?,
            api_hash,
            phone,
            two_fa_password: get("TG_2FA_PASSWORD"),
            session_path: get("TG_SESSION_PATH").unwrap_or_else(|| DEFAULT_SESSION_PATH.into()),
            channels,
        })
    }
}

/// A post from one of the watched channels.
#[derive(Debug, Clone)]
pub struct ChannelPost {
    pub channel_id: i64,
    pub channel_title: String,
    pub text: String,
}

/// Connect, log in and forward posts from the configured channels to `tx`
/// until the update stream ends or the receiver is dropped.
pub async fn forward_posts(cfg: &TgCfg, tx: mpsc::Sender<ChannelPost>) -> Result<()> {
    let session = Arc::new(SqliteSession::open(&cfg.session_path)?);
    let pool = SenderPool::new(Arc::clone(&session), cfg.api_id);
    let client = Client::new(&pool);

    let runner = pool.runner;
    tokio::spawn(async move {
        runner.run().await;
    });
    let updates_rx = pool.updates;

    ensure_user_login(&client, cfg).await?;
    let watched = resolve_channels(&client, &cfg.channels).await?;
    if watched.is_empty() {
        return Err(anyhow!("none of TG_CHANNELS could be resolved"));
    }

    let mut stream = client.stream_updates(
        updates_rx,
        UpdatesConfiguration {
            catch_up: true,
            update_queue_limit: Some(2048),
        },
    );

    info!("Watching {} channel(s) for new posts", watched.len());
    loop {
        let Ok(update) = stream.next().await else {
            warn!("Update stream ended.");
            break;
        };
        let Update::NewMessage(msg) = update else {
            continue;
        };
        let Ok(peer) = msg.peer() else {
            continue;
        };
        let channel_id = peer.id().bare_id();
        let Some(username) = watched.get(&channel_id) else {
            continue;
        };
        let text = msg.text().trim();
        if text.is_empty() {
            continue;
        }

        let post = ChannelPost {
            channel_id,
            channel_title: peer.name().unwrap_or(username).to_string(),
            text: text.to_string(),
        };
        if tx.send(post).await.is_err() {
            info!("Post consumer gone; stopping.");
            break;
        }
    }

    Ok(())
}

/// Bare peer id → `@username`, for the usernames that resolve.
async fn resolve_channels(client: &Client, usernames: &[String]) -> Result<HashMap<i64, String>> {
    let mut watched = HashMap::new();
    for uname in usernames {
        let peer = client
            .resolve_username(uname)
            .await
            .with_context(|| format!("resolve_username failed for @{uname}"))?;
        match peer {
            Some(peer) => {
                let id = peer.id().bare_id();
                info!("Watching @{uname} (peer_id={id})");
                watched.insert(id, uname.clone());
            }
            None => warn!("Username @{uname} was not resolved; skipping"),
        }
    }
    Ok(watched)
}

async fn ensure_user_login(client: &Client, cfg: &TgCfg) -> Result<()> {
    if client.is_authorized().await? {
        info!("Session {} is already authorized", cfg.session_path);
        return Ok(());
    }

    info!("Not authorized. Requesting login code for {}...", cfg.phone);
    let token = client
        .request_login_code(&cfg.phone, &cfg.api_hash)
        .await
        .context("request_login_code failed")?;

    let mut prompt = Prompt::stdin();
    let code = prompt.ask("Enter the login code you received: ").await?;

    let password_token = match client.sign_in(&token, &code).await {
        Ok(user) => {
            info!(
                "Signed in as {:?}",
                user.first_name().unwrap_or("<unknown>")
            );
            return Ok(());
        }
        Err(SignInError::PasswordRequired(password_token)) => password_token,
        Err(e) => return Err(anyhow!("sign_in failed: {e}")),
    };

    let password = match &cfg.two_fa_password {
        Some(pw) => pw.clone(),
        None => {
            prompt
                .ask(&password_question(password_token.hint()))
                .await?
        }
    };
    client
        .check_password(password_token, password.as_bytes())
        .await
        .context("check_password failed")?;

    info!("Signed in with 2FA.");
    Ok(())
}

fn password_question(hint: Option<&str>) -> String {
    match hint.map(str::trim).filter(|h| !h.is_empty()) {
        Some(hint) => format!("2FA password required (hint: {hint}). Enter password: "),
        None => "2FA password required. Enter password: ".to_string(),
    }
}

/// Channel list from `TG_CHANNELS`: comma-separated `name`, `@name` or
/// `t.me/name` links. Duplicates (case-insensitive) keep their first spelling.
fn parse_channels(s: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    s.split(',')
        .filter_map(channel_username)
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn channel_username(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);
    let raw = raw.strip_prefix("t.me/").unwrap_or(raw);
    let name = raw.trim_end_matches('/').trim_start_matches('@');
    (!name.is_empty()).then_some(name)
}

/// Interactive login answers. One buffered reader for the whole login so
/// a second question does not lose input buffered by the first.
struct Prompt {
    stdin: io::BufReader<io::Stdin>,
}

impl Prompt {
    fn stdin() -> Self {
        Self {
            stdin: io::BufReader::new(io::stdin()),
        }
    }

    async fn ask(&mut self, question: &str) -> Result<String> {
        print!("{question}");
        std::io::stdout().flush().ok();
        let mut line = String::new();
        if self.stdin.read_line(&mut line).await? == 0 {
            bail!("stdin closed during Telegram login");
        }
        Ok(line.trim().to_string())
    }
}
