pub mod cases;
pub mod followups;
pub mod tasks;
pub mod users;

use crate::api::ApiClient;
use crate::API_CLIENT;

/// Shared guard for hooks and handlers: the client is built once at
/// bootstrap, so a miss here is a bootstrap failure, not a race.
pub fn api_client() -> Option<&'static ApiClient> {
    let client = API_CLIENT.get();
    if client.is_none() {
        tracing::error!("api client not initialized");
    }
    client
}
