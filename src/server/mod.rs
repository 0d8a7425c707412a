mod handler;
mod server;

pub use handler::{AppState, Endpoint, RequestHandler};
pub use server::SetupServer;
