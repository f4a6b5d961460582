//! Services - business rules layered over the ports.

mod post_service;

pub use post_service::PostService;

#[cfg(test)]
mod tests;
