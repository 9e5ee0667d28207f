pub mod http_client;
pub mod logging;
pub mod session_fetch;
pub mod session_storage;
pub mod submit;
