pub mod banner;

pub use banner::{
    layer_failed_message, source_failed_message, ErrorBanner, AUTHORIZATION_MESSAGE,
    UNSUPPORTED_MESSAGE,
};
