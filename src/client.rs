//! Interactive bidding client
//!
//! Reads commands from the user, forwards them to the server and prints
//! whatever comes back. One request in flight at a time: after sending,
//! the client waits for the response before prompting again.
use crate::{
    diagnostic::SharedSink,
    event::{ClientEvent, Event},
};
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const BUFFER_SIZE: usize = 1024;

pub const HELP: &str = "\nBidding Instructions:\n\
1. Enter the auction ID and bid amount in format: <auction_id> <amount>\n\
2. Enter 'ls' to view the current bids of all auctions\n\
3. Minimum bid must be at least 20% higher than the current bid\n\
4. Enter 'q' to quit\n\n";

pub const PROMPT: &str =
    "\nEnter auction ID and bid amount (or 'ls' to list current auctions, 'q' to quit): ";

pub const GOODBYE: &str = "Thank you for participating in the auction!\n";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    /// Nothing typed
    Skip,
    Send(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.chars().next() {
            None => Command::Skip,
            Some('q' | 'Q') => Command::Quit,
            Some(_) => Command::Send(line),
        }
    }
}

/// Run the interactive loop over an established connection
///
/// Returns when the user quits, input ends or the server hangs up.
pub async fn run<S, I, O>(stream: S, input: I, mut output: O, sink: SharedSink) -> Result<()>
where
    S: AsyncRead + AsyncWrite,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    let mut buf = Vec::with_capacity(BUFFER_SIZE);

    output.write_all(HELP.as_bytes()).await?;

    if !relay_response(&mut reader, &mut buf, &mut output, &sink).await? {
        return finish(&mut output, &sink).await;
    }

    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let request = match Command::parse(&line) {
            Command::Quit => {
                sink.event(&Event::Client(ClientEvent::Quit));
                break;
            }
            Command::Skip => continue,
            Command::Send(request) => request,
        };

        sink.event(&Event::Client(ClientEvent::Sending(request.to_owned())));
        if let Err(e) = writer.write_all(format!("{request}\n").as_bytes()).await {
            sink.event(&Event::Client(ClientEvent::TransportError(e.to_string())));
            output
                .write_all(format!("Error sending request: {e}\n").as_bytes())
                .await?;
            break;
        }

        if !relay_response(&mut reader, &mut buf, &mut output, &sink).await? {
            break;
        }
    }

    finish(&mut output, &sink).await
}

/// Copy one response from the server to `output`
///
/// Responses always end in a newline, so keep reading until the data
/// received so far does. Returns `false` once the server is gone.
///
/// Multi-line responses carry no terminator of their own. A listing that
/// reaches us split exactly between two lines is printed in two goes, and
/// its tail shows up ahead of the next response.
async fn relay_response<R, O>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    output: &mut O,
    sink: &SharedSink,
) -> Result<bool>
where
    R: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    buf.clear();
    let mut chunk = [0u8; BUFFER_SIZE];
    while buf.last() != Some(&b'\n') {
        let n = match reader.read(&mut chunk).await {
            Ok(n) => n,
            Err(e) => {
                sink.event(&Event::Client(ClientEvent::TransportError(e.to_string())));
                output
                    .write_all(format!("Error receiving from server: {e}\n").as_bytes())
                    .await?;
                return Ok(false);
            }
        };
        if n == 0 {
            if !buf.is_empty() {
                output.write_all(&buf[..]).await?;
            }
            sink.event(&Event::Client(ClientEvent::ServerClosed));
            output
                .write_all(b"Server closed the connection.\n")
                .await?;
            return Ok(false);
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    output.write_all(&buf[..]).await?;
    output.flush().await?;
    sink.event(&Event::Client(ClientEvent::Received(
        String::from_utf8_lossy(buf).into_owned(),
    )));
    Ok(true)
}

async fn finish<O>(output: &mut O, sink: &SharedSink) -> Result<()>
where
    O: AsyncWrite + Unpin,
{
    sink.event(&Event::Client(ClientEvent::ShuttingDown));
    output.write_all(GOODBYE.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
