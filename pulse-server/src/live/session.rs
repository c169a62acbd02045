use pulse_common::{Notice, WsCommand};

pub const STREAM_INITIATED: &str = "Stream initiated";
pub const STREAM_ALREADY_INITIATED: &str = "Stream already initiated";
pub const STREAM_CONNECTING: &str = "Stream connecting";
pub const STREAM_ALREADY_RUNNING: &str = "Stream already running";
pub const NO_ACTIVE_STREAM: &str = "No active stream";
pub const DISCONNECT_SENT: &str = "Disconnect signal sent";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Loaded,
    Streaming,
}

/// Per-connection stream state. Values from the feed reach the socket only
/// while `Streaming`.
#[derive(Debug)]
pub struct StreamSession {
    state: StreamState,
}

impl StreamSession {
    pub fn new(manual_start: bool) -> Self {
        let state = if manual_start {
            StreamState::Idle
        } else {
            StreamState::Streaming
        };
        Self { state }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.state == StreamState::Streaming
    }

    pub fn apply(&mut self, cmd: WsCommand) -> Notice {
        use StreamState::*;
        let (next, reply) = match (cmd, self.state) {
            (WsCommand::LoadStream, Idle) => (Loaded, STREAM_INITIATED),
            (WsCommand::LoadStream, s) => (s, STREAM_ALREADY_INITIATED),

            (WsCommand::StartStream, Idle) => (Idle, NO_ACTIVE_STREAM),
            (WsCommand::StartStream, Loaded) => (Streaming, STREAM_CONNECTING),
            (WsCommand::StartStream, Streaming) => (Streaming, STREAM_ALREADY_RUNNING),

            (WsCommand::StopStream, Idle) => (Idle, NO_ACTIVE_STREAM),
            (WsCommand::StopStream, _) => (Loaded, DISCONNECT_SENT),
        };
        self.state = next;
        Notice::status(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(session: &mut StreamSession, cmd: WsCommand) -> String {
        match session.apply(cmd) {
            Notice::Status { stream } => stream,
        }
    }

    #[test]
    fn test_manual_lifecycle() {
        let mut s = StreamSession::new(true);
        assert_eq!(s.state(), StreamState::Idle);
        assert!(!s.is_streaming());

        assert_eq!(reply(&mut s, WsCommand::StartStream), NO_ACTIVE_STREAM);
        assert_eq!(reply(&mut s, WsCommand::StopStream), NO_ACTIVE_STREAM);
        assert_eq!(s.state(), StreamState::Idle);

        assert_eq!(reply(&mut s, WsCommand::LoadStream), STREAM_INITIATED);
        assert_eq!(reply(&mut s, WsCommand::LoadStream), STREAM_ALREADY_INITIATED);
        assert!(!s.is_streaming());

        assert_eq!(reply(&mut s, WsCommand::StartStream), STREAM_CONNECTING);
        assert!(s.is_streaming());
        assert_eq!(reply(&mut s, WsCommand::StartStream), STREAM_ALREADY_RUNNING);

        assert_eq!(reply(&mut s, WsCommand::StopStream), DISCONNECT_SENT);
        assert_eq!(s.state(), StreamState::Loaded);
        assert_eq!(reply(&mut s, WsCommand::StartStream), STREAM_CONNECTING);
    }

    #[test]
    fn test_autostart_session() {
        let mut s = StreamSession::new(false);
        assert!(s.is_streaming());
        assert_eq!(reply(&mut s, WsCommand::LoadStream), STREAM_ALREADY_INITIATED);
        assert!(s.is_streaming());
        assert_eq!(reply(&mut s, WsCommand::StopStream), DISCONNECT_SENT);
        assert!(!s.is_streaming());
    }
}
