pub mod transport;

pub use transport::{read_text, HttpResponse, HttpTransport, Transport};
