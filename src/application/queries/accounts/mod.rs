mod get;
mod list;
mod service;

pub use service::AccountQueryService;
