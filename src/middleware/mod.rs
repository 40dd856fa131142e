pub mod request_id;
pub mod session_gate;

pub use request_id::request_id_layer;
pub use session_gate::session_gate;
