use anyhow::Result;
use runyoro::composer::RecordingState;
use runyoro::conversation::{ChatConfig, ChatOrchestrator};
use runyoro::gateway::HttpGateway;
use runyoro::session::{Mode, Role, SessionId};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "audio-io")]
fn default_capture() -> runyoro::composer::CpalCapture {
    runyoro::composer::CpalCapture::new()
}

#[cfg(not(feature = "audio-io"))]
fn default_capture() -> runyoro::composer::NullCapture {
    runyoro::composer::NullCapture
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runyoro=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        std::env::var("RUNYORO_BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".into());
    let config = ChatConfig::default().with_base_url(&base_url);
    if let Err(e) = config.validate() {
        anyhow::bail!("invalid configuration: {}", e);
    }

    info!("Starting Runyoro client against {}", base_url);

    let gateway = HttpGateway::new(&base_url);
    match gateway.health().await {
        Ok(health) => info!(
            "Backend healthy: {} on {}, {} models loaded",
            health.status, health.device, health.loaded_models
        ),
        Err(e) => info!("Backend not reachable yet: {}", e),
    }

    let mut orchestrator = ChatOrchestrator::new(gateway, default_capture(), config);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Runyoro. Type text to send, /help for commands.\n")
        .await?;

    loop {
        stdout.write_all(prompt(&orchestrator).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let reply = match line.split_once(' ') {
            _ if line == "/quit" => break,
            _ if line == "/help" => HELP.to_string(),
            _ if line == "/new" => {
                let mode = orchestrator.mode();
                let id = orchestrator.create_session(mode);
                format!("created session {}\n", id)
            }
            _ if line == "/record" => {
                orchestrator.start_recording();
                match orchestrator.recording_state() {
                    RecordingState::Recording => "recording, /stop to finish\n".to_string(),
                    _ => composer_error(&orchestrator),
                }
            }
            _ if line == "/stop" => {
                orchestrator.stop_recording().await;
                match orchestrator.composer().last_error() {
                    Some(_) => composer_error(&orchestrator),
                    None => format!("draft: {}\n", orchestrator.draft()),
                }
            }
            _ if line == "/send" => {
                orchestrator.send_draft().await;
                last_reply(&orchestrator)
            }
            _ if line == "/sessions" => list_sessions(&orchestrator, ""),
            Some(("/sessions", query)) => list_sessions(&orchestrator, query),
            Some(("/mode", "chat")) => {
                orchestrator.set_mode(Mode::Chat);
                "mode: chat\n".to_string()
            }
            Some(("/mode", "translate")) => {
                orchestrator.set_mode(Mode::Translate);
                "mode: translate\n".to_string()
            }
            Some(("/open", id)) => match id.parse::<u64>() {
                Ok(id) => {
                    orchestrator.select_session(SessionId(id));
                    match orchestrator.store().active() {
                        Some(session) => format!("opened: {}\n", session.title),
                        None => "no such session\n".to_string(),
                    }
                }
                Err(_) => "usage: /open <id>\n".to_string(),
            },
            Some(("/delete", id)) => match id.parse::<u64>() {
                Ok(id) => {
                    orchestrator.delete_session(SessionId(id));
                    "deleted\n".to_string()
                }
                Err(_) => "usage: /delete <id>\n".to_string(),
            },
            _ if line.starts_with('/') => "unknown command, /help for commands\n".to_string(),
            _ => {
                orchestrator.send(&line).await;
                last_reply(&orchestrator)
            }
        };

        stdout.write_all(reply.as_bytes()).await?;
    }

    Ok(())
}

const HELP: &str = "\
/new                start a fresh session in the current mode
/mode chat|translate  select the mode for the next send
/record, /stop      capture speech into the draft
/send               send the current draft
/sessions [query]   list sessions grouped by recency
/open <id>          switch to a session
/delete <id>        remove a session
/quit               exit
anything else is sent as a message
";

fn prompt<B, C>(orchestrator: &ChatOrchestrator<B, C>) -> String
where
    B: runyoro::gateway::ModelBackend,
    C: runyoro::composer::AudioCapture,
{
    let mode = match orchestrator.mode() {
        Mode::Chat => "chat",
        Mode::Translate => "translate",
    };
    format!("[{}]> ", mode)
}

fn composer_error<B, C>(orchestrator: &ChatOrchestrator<B, C>) -> String
where
    B: runyoro::gateway::ModelBackend,
    C: runyoro::composer::AudioCapture,
{
    match orchestrator.composer().last_error() {
        Some(error) => format!("error: {}\n", error),
        None => "nothing to report\n".to_string(),
    }
}

fn last_reply<B, C>(orchestrator: &ChatOrchestrator<B, C>) -> String
where
    B: runyoro::gateway::ModelBackend,
    C: runyoro::composer::AudioCapture,
{
    let Some(session) = orchestrator.store().active() else {
        return String::new();
    };
    match session.messages.last() {
        Some(message) if message.role == Role::Assistant => {
            format!("{}\n", message.content)
        }
        _ => String::new(),
    }
}

fn list_sessions<B, C>(orchestrator: &ChatOrchestrator<B, C>, query: &str) -> String
where
    B: runyoro::gateway::ModelBackend,
    C: runyoro::composer::AudioCapture,
{
    let groups = orchestrator.grouped_sessions(query);
    if groups.is_empty() {
        return if query.is_empty() {
            "no sessions yet\n".to_string()
        } else {
            "no sessions found\n".to_string()
        };
    }

    let mut out = String::new();
    for group in groups {
        out.push_str(group.bucket.label());
        out.push('\n');
        for session in group.sessions {
            out.push_str(&format!("  {} {}\n", session.id, session.title));
        }
    }
    out
}
