//! Anonymous Twitch chat reader
//!
//! Connects to Twitch's IRC-over-WebSocket endpoint as an anonymous
//! `justinfan` user, joins a channel and prints every parsed line for a
//! minute.
//!
//! ```text
//! RUST_LOG=slirc_ws=debug cargo run --example twitch_anonymous -- dallas
//! ```

use std::time::Duration;

use slirc_ws::{
    ClientConfig, ClientEvent, CloseMode, Command, IrcParser, IrcV3Parser, IrcWebSocketClient,
    Message,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const TWITCH_WS: &str = "wss://irc-ws.chat.twitch.tv:443";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let channel = std::env::args().nth(1).unwrap_or_else(|| "dallas".to_string());

    let config = ClientConfig::new(TWITCH_WS).with_ping_interval(Duration::from_secs(60));
    let client = IrcWebSocketClient::new(config);
    let mut events = client.subscribe();
    let cancel = CancellationToken::new();
    let parser = IrcV3Parser::default();

    client.open().await?;
    client
        .send_str("CAP REQ :twitch.tv/tags twitch.tv/commands\r\n", &cancel)
        .await?;
    client.send_str("PASS SCHMOOPIIE\r\n", &cancel).await?;
    client.send_str("NICK justinfan12345\r\n", &cancel).await?;
    client
        .send_message(
            &parser,
            &Message::new(Command::JOIN, [format!("#{}", channel)]).into(),
            false,
            &cancel,
        )
        .await?;

    let reader = async {
        while let Ok(event) = events.recv().await {
            match event {
                ClientEvent::MessageReceived(line) => match parser.parse_message(&line) {
                    Ok(message) if message.message.command == Command::PING => {
                        let pong = Message::new(Command::PONG, message.message.parameters.clone());
                        if let Err(e) = client.send_str(&pong.to_string(), &cancel).await {
                            eprintln!("failed to answer PING: {}", e);
                        }
                    }
                    Ok(message) => {
                        let who = message
                            .message
                            .prefix
                            .as_ref()
                            .map(|p| p.name().to_string())
                            .unwrap_or_default();
                        println!(
                            "← [{}] {} {}",
                            message.message.command,
                            who,
                            message.message.trailing().unwrap_or_default()
                        );
                    }
                    Err(e) => eprintln!("unparseable line {:?}: {}", line, e),
                },
                ClientEvent::Connected { address } => println!("✓ connected to {}", address),
                ClientEvent::Disconnected { address } => println!("✗ disconnected from {}", address),
                _ => {}
            }
        }
    };

    let _ = tokio::time::timeout(Duration::from_secs(60), reader).await;

    client.close(CloseMode::Websocket, &cancel).await?;
    Ok(())
}
