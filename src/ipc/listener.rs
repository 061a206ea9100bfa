//! Unix-socket [`PromptSource`] implementation.
//!
//! Binds a Unix stream socket and serves every accepted connection on its
//! own thread, so a prompt holding a connection open for a whole session
//! does not block scripts or key bindings.  Each line received is parsed as a JSON-encoded [`PromptEvent`], handed
//! to the session thread, and answered with one JSON [`PromptReply`] line.
//!
//! # Wire format
//!
//! ```text
//! → "Start"                         ← {"Prompt":">"}
//! → {"Complete":"b"}                ← {"Completion":"bind"}
//! → "Accept"                        ← {"LastCompletion":"bind"}
//! → {"Submit":"add news"}           ← "Ok"
//! → {"ShowGroup":"web"}             ← "Ok"
//! → {"Notify":{"message":"hi"}}     ← "Ok"
//! → not json                        ← {"Error":"bad event: …"}
//! ```

use crate::event::{PromptEvent, PromptReply, PromptRequest};
use crate::traits::PromptSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// How long a client waits for the session to answer before it gets an
/// error reply.
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// A [`PromptSource`] that listens on a Unix stream socket for
/// JSON-encoded prompt events.
///
/// Each accepted connection can send multiple newline-delimited events
/// and is served concurrently with every other connection.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](PromptSource::run) is called
    /// and removed when the source shuts down.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Answer every line of one connection until the client hangs up.
///
/// Sets `closed` and returns early once the session is gone.
fn serve(
    stream: UnixStream,
    sink: mpsc::Sender<PromptRequest>,
    closed: &AtomicBool,
) -> Result<(), UnixSocketError> {
    let mut writer = stream.try_clone()?;
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let text = line?;
        if text.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<PromptEvent>(&text) {
            Ok(event) => {
                debug!("received {:?}", event);
                let (reply_tx, reply_rx) = mpsc::channel();
                if sink.send(PromptRequest::with_reply(event, reply_tx)).is_err() {
                    closed.store(true, Ordering::SeqCst);
                    return Ok(());
                }
                reply_rx.recv_timeout(REPLY_TIMEOUT).unwrap_or_else(|e| {
                    warn!("no reply from session: {}", e);
                    PromptReply::Error("no reply from session".into())
                })
            }
            Err(e) => {
                error!("bad event: {}: {}", text, e);
                PromptReply::Error(format!("bad event: {}", e))
            }
        };
        let mut out = serde_json::to_string(&reply)?;
        out.push('\n');
        writer.write_all(out.as_bytes())?;
    }
    Ok(())
}

impl PromptSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks**.  Once the receiving end of `sink` is dropped
    /// it returns at the next accepted connection.  Run it on a dedicated
    /// thread.
    fn run(&mut self, sink: mpsc::Sender<PromptRequest>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        let closed = Arc::new(AtomicBool::new(false));
        for stream in listener.incoming() {
            if closed.load(Ordering::SeqCst) {
                info!("session closed, shutting down");
                break;
            }
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    let sink = sink.clone();
                    let closed = closed.clone();
                    std::thread::spawn(move || {
                        match serve(stream, sink, &closed) {
                            Ok(()) => debug!("client disconnected"),
                            Err(e) => error!("client error: {}", e),
                        }
                    });
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Helper: create a unique temporary socket path for each test.
    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir();
        dir.join(format!(
            "wmprompt-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    /// Start a listener plus a fake session that answers every request
    /// with `answer(event)`.  Returns the events the session saw.
    fn spawn_pair(
        path: &Path,
        answer: fn(&PromptEvent) -> PromptReply,
    ) -> std::thread::JoinHandle<Vec<PromptEvent>> {
        let (tx, rx) = mpsc::channel::<PromptRequest>();
        let listen_path = path.to_path_buf();
        std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&listen_path);
            let _ = listener.run(tx);
        });
        std::thread::spawn(move || {
            let mut seen = Vec::new();
            while let Ok(req) = rx.recv_timeout(Duration::from_millis(500)) {
                let reply = answer(&req.event);
                seen.push(req.event.clone());
                req.respond(reply);
            }
            seen
        })
    }

    fn exchange(path: &Path, lines: &[&str]) -> Vec<String> {
        // Give the listener a moment to bind.
        std::thread::sleep(Duration::from_millis(150));
        let mut stream = UnixStream::connect(path).expect("connect");
        for line in lines {
            writeln!(stream, "{}", line).unwrap();
        }
        stream.shutdown(std::net::Shutdown::Write).unwrap();
        BufReader::new(stream).lines().map(|l| l.unwrap()).collect()
    }

    fn echo(event: &PromptEvent) -> PromptReply {
        match event {
            PromptEvent::Start => PromptReply::Prompt(">".into()),
            PromptEvent::Complete(p) => PromptReply::Completion(format!("{}x", p)),
            _ => PromptReply::Ok,
        }
    }

    #[test]
    fn events_get_one_reply_line_each() {
        let path = tmp_socket_path();
        let session = spawn_pair(&path, echo);

        let replies = exchange(
            &path,
            &[r#""Start""#, r#"{"Complete":"he"}"#, "", r#"{"Submit":"help add"}"#],
        );
        assert_eq!(
            replies,
            vec![r#"{"Prompt":">"}"#, r#"{"Completion":"hex"}"#, r#""Ok""#]
        );

        let seen = session.join().unwrap();
        assert_eq!(
            seen,
            vec![
                PromptEvent::Start,
                PromptEvent::Complete("he".into()),
                PromptEvent::Submit("help add".into()),
            ]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_gets_error_reply() {
        let path = tmp_socket_path();
        let session = spawn_pair(&path, echo);

        let replies = exchange(&path, &["not json at all", r#""Cancel""#]);
        assert_eq!(replies.len(), 2);
        let first: PromptReply = serde_json::from_str(&replies[0]).unwrap();
        assert!(matches!(first, PromptReply::Error(ref m) if m.starts_with("bad event")));
        assert_eq!(replies[1], r#""Ok""#);

        // Only the valid event reached the session.
        assert_eq!(session.join().unwrap(), vec![PromptEvent::Cancel]);
        let _ = std::fs::remove_file(&path);
    }

    /// Send one line on an open connection and read one reply line back.
    fn request(stream: &mut UnixStream, line: &str) -> String {
        writeln!(stream, "{}", line).unwrap();
        let mut reply = String::new();
        BufReader::new(stream.try_clone().unwrap())
            .read_line(&mut reply)
            .unwrap();
        reply.trim_end().to_string()
    }

    #[test]
    fn open_prompt_connection_does_not_block_other_clients() {
        let path = tmp_socket_path();
        let session = spawn_pair(&path, echo);
        std::thread::sleep(Duration::from_millis(150));

        // The prompt keeps its connection open for the whole session.
        let mut prompt = UnixStream::connect(&path).expect("connect prompt");
        assert_eq!(request(&mut prompt, r#""Start""#), r#"{"Prompt":">"}"#);

        // A script notifies while the prompt is still connected.
        let mut script = UnixStream::connect(&path).expect("connect script");
        script
            .set_read_timeout(Some(Duration::from_secs(1)))
            .unwrap();
        assert_eq!(
            request(&mut script, r#"{"Notify":{"message":"hi"}}"#),
            r#""Ok""#
        );

        // The prompt connection still works afterwards.
        assert_eq!(
            request(&mut prompt, r#"{"Complete":"he"}"#),
            r#"{"Completion":"hex"}"#
        );
        drop(script);
        drop(prompt);

        let seen = session.join().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(
            seen[1],
            PromptEvent::Notify {
                message: "hi".into(),
                severity: None,
                duration_ms: None,
            }
        );
        let _ = std::fs::remove_file(&path);
    }
}
