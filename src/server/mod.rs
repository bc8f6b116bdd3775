use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, net::SocketAddr};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use routers::route;

use crate::models::state::AppState;

pub mod routers;

/// What request handlers can see.
pub struct ServerContext {
    pub state: Arc<AppState>,
    pub asset_root: PathBuf,
}

pub async fn run_server(
    ctx: Arc<ServerContext>,
    port: u16,
    shutdown: Arc<Notify>,
) -> Result<(), io::Error> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(&addr).await?;
    let stop = shutdown.notified();
    tokio::pin!(stop);

    info!("Listening on http://{}", addr);

    loop {
        let (stream, _) = tokio::select! {
            _ = &mut stop => {
                info!("server stopped");
                return Ok(());
            }
            accepted = listener.accept() => accepted?,
        };
        let ctx = Arc::clone(&ctx);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| route(req, Arc::clone(&ctx)));

            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                error!("Failed to serve connection: {:?}", err);
            }
        });
    }
}
