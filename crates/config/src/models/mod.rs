pub mod executor;
pub mod model_server;
pub mod storage;

pub use executor::*;
pub use model_server::*;
pub use storage::*;
