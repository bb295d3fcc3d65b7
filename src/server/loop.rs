// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop on `listener`.
///
/// Returns once `state.shutdown_signal` is notified. Connections already
/// being served keep running in their own tasks.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = state.shutdown_signal.notified() => {
                logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::load_from("does-not-exist/config", None).unwrap();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg))
    }

    async fn exchange(addr: std::net::SocketAddr, raw_request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw_request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_serves_requests_until_shutdown() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = test_state();
        let server = tokio::spawn(start_server_loop(listener, Arc::clone(&state)));

        let resp = exchange(
            addr,
            "GET /suma?dato1=5&dato2=6 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(resp.starts_with("HTTP/1.1 200 OK"));
        assert!(resp.contains("access-control-allow-origin: *"));
        assert!(resp.ends_with(r#"{"op":"suma","by":"query","a":5,"b":6,"result":11}"#));

        let resp = exchange(
            addr,
            "OPTIONS /anything HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(resp.starts_with("HTTP/1.1 204 No Content"));

        state.shutdown_signal.notify_one();
        tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
    }
}
