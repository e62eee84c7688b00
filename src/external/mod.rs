pub mod backend;
pub mod osrm;

pub use backend::BackendClient;
pub use osrm::OsrmClient;
