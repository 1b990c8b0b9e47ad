mod dispatcher;
mod surface;
mod transport;

pub use dispatcher::{Dispatcher, ResultOrdering};
pub use surface::PanelState;
pub use transport::HttpTransport;
