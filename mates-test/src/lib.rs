use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use mates_server::store::SledUserStore;
use mates_server::{router, AppState};

/// A mates server running in-process on an ephemeral port, backed by a
/// throwaway database. Dropping it stops the server.
pub struct TestServer {
    pub addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Boots a fresh server. Must be called from within a tokio runtime.
pub fn spawn_server() -> anyhow::Result<TestServer> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;

    let store = SledUserStore::temporary()?;
    let state = AppState::new(Arc::new(store));
    let server = axum::Server::from_tcp(listener)?.serve(router(state).into_make_service());

    let handle = tokio::spawn(async move {
        if let Err(err) = server.await {
            eprintln!("test server exited: {err}");
        }
    });
    Ok(TestServer { addr, handle })
}
