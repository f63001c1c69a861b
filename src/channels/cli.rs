//! CLI channel: stdin/stdout REPL for one conversation.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use crate::assistant::ChatAssistant;
use crate::conversation::Conversation;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "cli";
const PROMPT: &str = "> ";
const QUIT_COMMAND: &str = "/quit";

/// A line-based chat channel.
///
/// Lines are handled strictly one at a time: the next line is not read until
/// the reply to the previous one has been written.
pub struct CliChannel<R, W> {
    reader: R,
    writer: W,
}

impl CliChannel<BufReader<Stdin>, Stdout> {
    /// A channel on the process's stdin and stdout.
    pub fn new() -> Self {
        Self::with_io(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for CliChannel<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> CliChannel<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn with_io(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Run a conversation until EOF or `/quit`, returning its final state.
    pub async fn run(self, assistant: &ChatAssistant) -> Result<Conversation, ChannelError> {
        let Self { reader, mut writer } = self;

        let mut conversation = Conversation::greeted();
        if let Some(greeting) = conversation.last_message() {
            write_all(&mut writer, &format!("{}\n\n", greeting.text)).await?;
        }
        write_all(&mut writer, PROMPT).await?;

        let mut lines = reader.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    return Err(ChannelError::Io(e));
                }
            };

            let text = line.trim();
            if text.is_empty() {
                write_all(&mut writer, PROMPT).await?;
                continue;
            }
            if text == QUIT_COMMAND {
                break;
            }

            let (next, reply) = assistant.submit(conversation, text).await;
            conversation = next;
            write_all(&mut writer, &format!("\n{}\n\n{PROMPT}", reply.text)).await?;
        }

        tracing::info!(
            messages = conversation.history().len(),
            phase = %conversation.phase(),
            "CLI conversation ended"
        );
        Ok(conversation)
    }
}

async fn write_all<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<(), ChannelError> {
    let send_failed = |e: std::io::Error| ChannelError::SendFailed {
        name: CHANNEL_NAME.to_string(),
        reason: e.to_string(),
    };
    writer.write_all(text.as_bytes()).await.map_err(send_failed)?;
    writer.flush().await.map_err(send_failed)
}
