//! Platform-controlled streaming sink.

use std::fmt::Display;

use edge_core::{TimingContext, WorkloadError};
use futures::{Sink, SinkExt};

/// State of the streaming sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// Initial state, shell not yet sent.
    Initial,
    /// Shell has been sent, sections can be streamed.
    ShellSent,
    /// Response has been completed.
    Completed,
}

/// Streaming sink that enforces the shell-first pattern.
///
/// Generic over any `Sink<Vec<u8>>`, including Spin's `OutgoingBody`.
pub struct StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    inner: S,
    state: SinkState,
    timing: TimingContext,
    sections_sent: Vec<String>,
}

impl<S, E> StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    /// Create a new streaming sink.
    pub fn new(sink: S, timing: TimingContext) -> Self {
        Self {
            inner: sink,
            state: SinkState::Initial,
            timing,
            sections_sent: Vec::new(),
        }
    }

    /// Send the shell HTML. Must be called before any sections.
    pub async fn send_shell(&mut self, html: &str) -> Result<(), WorkloadError> {
        if self.state != SinkState::Initial {
            return Err(WorkloadError::StreamError(
                "Shell already sent or sink completed".to_string(),
            ));
        }

        self.write(html.as_bytes().to_vec()).await?;
        self.timing.mark("shell_sent");
        self.state = SinkState::ShellSent;

        Ok(())
    }

    /// Send a named section. Shell must be sent first.
    pub async fn send_section(&mut self, name: &str, html: &str) -> Result<(), WorkloadError> {
        self.ensure_open()?;

        self.write(html.as_bytes().to_vec()).await?;
        self.timing.mark_section_sent(name);
        self.sections_sent.push(name.to_string());

        Ok(())
    }

    /// Close the shell and complete the response.
    pub async fn finish(&mut self, closing_html: &str) -> Result<(), WorkloadError> {
        self.ensure_open()?;
        self.write(closing_html.as_bytes().to_vec()).await?;
        self.complete()
    }

    /// Mark the response complete.
    pub fn complete(&mut self) -> Result<(), WorkloadError> {
        self.state = SinkState::Completed;
        self.timing.mark("complete");
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), WorkloadError> {
        match self.state {
            SinkState::Initial => Err(WorkloadError::ShellNotSent),
            SinkState::Completed => Err(WorkloadError::StreamError(
                "Sink already completed".to_string(),
            )),
            SinkState::ShellSent => Ok(()),
        }
    }

    async fn write(&mut self, bytes: Vec<u8>) -> Result<(), WorkloadError> {
        self.inner
            .send(bytes)
            .await
            .map_err(|e| WorkloadError::StreamError(e.to_string()))
    }

    /// Get the list of sections sent.
    pub fn sections_sent(&self) -> &[String] {
        &self.sections_sent
    }

    /// Get timing context reference.
    pub fn timing(&self) -> &TimingContext {
        &self.timing
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;
    use futures::executor::block_on;
    use futures::StreamExt;

    use super::*;

    #[test]
    fn test_section_before_shell_is_rejected() {
        let (tx, _rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = StreamingSink::new(tx, TimingContext::new());

        let err = block_on(sink.send_section("product", "<p>x</p>")).unwrap_err();
        assert!(matches!(err, WorkloadError::ShellNotSent));
        assert!(sink.timing().time_to_shell().is_none());
    }

    #[test]
    fn test_shell_then_sections_in_order() {
        let (tx, rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = StreamingSink::new(tx, TimingContext::new());

        block_on(async {
            sink.send_shell("<html>").await.unwrap();
            sink.send_section("skeleton", "<div>...</div>").await.unwrap();
            sink.send_section("product", "<h1>Camiseta</h1>").await.unwrap();
            sink.finish("</html>").await.unwrap();
        });

        assert_eq!(sink.sections_sent(), ["skeleton", "product"]);
        assert!(sink.timing().time_to_shell().is_some());
        assert!(sink.timing().section_sent_at("product").is_some());

        drop(sink);
        let chunks: Vec<Vec<u8>> = block_on(rx.collect());
        let body = String::from_utf8(chunks.concat()).unwrap();
        assert_eq!(body, "<html><div>...</div><h1>Camiseta</h1></html>");
    }

    #[test]
    fn test_shell_sent_twice_is_rejected() {
        let (tx, _rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = StreamingSink::new(tx, TimingContext::new());
        block_on(sink.send_shell("<html>")).unwrap();
        assert!(block_on(sink.send_shell("<html>")).is_err());
    }

    #[test]
    fn test_closed_channel_surfaces_stream_error() {
        let (tx, rx) = mpsc::unbounded::<Vec<u8>>();
        drop(rx);
        let mut sink = StreamingSink::new(tx, TimingContext::new());
        let err = block_on(sink.send_shell("<html>")).unwrap_err();
        assert!(matches!(err, WorkloadError::StreamError(_)));
    }

    #[test]
    fn test_writes_after_finish_are_rejected() {
        let (tx, _rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = StreamingSink::new(tx, TimingContext::new());
        block_on(async {
            sink.send_shell("<html>").await.unwrap();
            sink.finish("</html>").await.unwrap();
        });
        assert!(block_on(sink.send_section("late", "<p>late</p>")).is_err());
        assert!(block_on(sink.finish("</html>")).is_err());
    }
}
