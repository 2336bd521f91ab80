mod load;
mod migrate;
mod source;

pub use load::{PostgresSink, connect};
pub use migrate::migrate;
pub use source::PostgresSource;
