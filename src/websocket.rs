/// WebSocket sessions that re-render the dashboard on selector changes
use actix::prelude::*;
use actix_web::web;
use actix_web_actors::ws;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::TableCache;
use crate::dashboard::DashboardPage;
use crate::messages::{ClientMessage, ServerMessage};
use crate::view::StatusFilter;

/// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// State shared by every connection: the table cache and the data file.
///
/// Only the loaded table is process-wide; each session keeps its own
/// selector value.
pub struct AppState {
    pub cache: Arc<TableCache>,
    pub data_path: PathBuf,
}

impl AppState {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            cache: Arc::new(TableCache::new()),
            data_path: data_path.into(),
        }
    }

    /// Run one full render pass for `status`.
    pub fn render(&self, status: StatusFilter) -> DashboardPage {
        DashboardPage::load(&self.cache, &self.data_path, status)
    }

    /// Drop the cached table so the next render re-reads the file.
    pub fn reload(&self) -> bool {
        self.cache.invalidate(&self.data_path)
    }
}

/// WebSocket connection actor
pub struct DashboardWebSocket {
    hb: Instant,
    state: web::Data<AppState>,
    status: StatusFilter,
    /// Bumped per render request; replies from older requests are dropped
    render_seq: u64,
}

impl DashboardWebSocket {
    pub fn new(state: web::Data<AppState>) -> Self {
        Self {
            hb: Instant::now(),
            state,
            status: StatusFilter::default(),
            render_seq: 0,
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                log::info!("WebSocket client heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send(&self, msg: ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.text(msg.to_json());
    }

    /// Render on the blocking pool; a cache miss reads the whole CSV.
    fn render(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        self.render_seq += 1;
        let seq = self.render_seq;
        let state = self.state.clone();
        let status = self.status;

        let fut = async move { web::block(move || state.render(status)).await };
        ctx.spawn(fut.into_actor(self).map(move |result, act, ctx| {
            if seq != act.render_seq {
                log::debug!("Dropping stale render for {}", status);
                return;
            }
            match result {
                Ok(page) => act.send(page.into(), ctx),
                Err(e) => act.send(
                    ServerMessage::Error {
                        message: format!("Render failed: {}", e),
                    },
                    ctx,
                ),
            }
        }));
    }

    fn handle_client_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg {
            ClientMessage::SelectStatus { status } => {
                log::debug!("Session switched status {} -> {}", self.status, status);
                self.status = status;
                self.render(ctx);
            }
            ClientMessage::Refresh => self.render(ctx),
        }
    }
}

impl Actor for DashboardWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.hb(ctx);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for DashboardWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => self.handle_client_message(client_msg, ctx),
                Err(e) => self.send(
                    ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    },
                    ctx,
                ),
            },
            Ok(ws::Message::Binary(_)) => {
                log::warn!("Unexpected binary message");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => ctx.stop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::configure;
    use actix_web::App;
    use futures::{Sink, SinkExt, Stream, StreamExt};

    const CSV: &str = "Date,Delivery_Status,Total_Sales_INR,Review_Rating,Product_Category,Payment_Method,Product_Name\n\
                       2025-01-05,Delivered,100,4.5,Electronics,UPI,Earbuds\n\
                       2025-02-05,Returned,200,3.5,Books,UPI,Novel\n";

    async fn request<S>(socket: &mut S, text: &str) -> serde_json::Value
    where
        S: Stream<Item = Result<ws::Frame, ws::ProtocolError>>
            + Sink<ws::Message, Error = ws::ProtocolError>
            + Unpin,
    {
        socket
            .send(ws::Message::Text(text.into()))
            .await
            .unwrap();
        loop {
            match socket.next().await {
                Some(Ok(ws::Frame::Text(bytes))) => {
                    return serde_json::from_slice(&bytes).unwrap();
                }
                Some(Ok(_)) => continue,
                other => panic!("socket closed: {:?}", other),
            }
        }
    }

    #[actix_web::test]
    async fn test_sessions_keep_their_own_status() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let state = web::Data::new(AppState::new(path));
        let mut srv = actix_test::start(move || {
            App::new().app_data(state.clone()).configure(configure)
        });

        let mut first = srv.ws_at("/ws").await.unwrap();
        let mut second = srv.ws_at("/ws").await.unwrap();

        let reply = request(&mut first, r#"{"type":"SelectStatus","status":"Returned"}"#).await;
        assert_eq!(reply["type"], "Dashboard");
        assert_eq!(reply["dashboard"]["status"], "Returned");
        assert_eq!(reply["dashboard"]["product_table"]["rows"][0]["name"], "Novel");

        let reply = request(&mut second, r#"{"type":"Refresh"}"#).await;
        assert_eq!(reply["type"], "Dashboard");
        assert_eq!(reply["dashboard"]["status"], "General");
        assert_eq!(reply["dashboard"]["product_table"]["rows"].as_array().unwrap().len(), 2);

        let reply = request(&mut first, r#"{"type":"Refresh"}"#).await;
        assert_eq!(reply["dashboard"]["status"], "Returned");
    }

    #[actix_web::test]
    async fn test_missing_file_replies_load_failed() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = web::Data::new(AppState::new(dir.path().join("missing.csv")));
        let mut srv = actix_test::start(move || {
            App::new().app_data(state.clone()).configure(configure)
        });

        let mut socket = srv.ws_at("/ws").await.unwrap();
        let reply = request(&mut socket, r#"{"type":"Refresh"}"#).await;
        assert_eq!(reply["type"], "LoadFailed");
        assert!(reply["message"]
            .as_str()
            .unwrap()
            .starts_with("Data file not found"));

        let reply = request(&mut socket, r#"{"type":"SelectStatus","status":"Nowhere"}"#).await;
        assert_eq!(reply["type"], "Error");
    }
}
