mod root;
mod url;

pub use root::root_handler;
pub use url::{
    analytics_handler, create_link_handler, redirect_handler, shorturls_redirect_handler,
};
