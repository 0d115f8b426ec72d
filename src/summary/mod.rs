//! Daily summary service
//!
//! Renders daily plans to free text and hands them to a delivery
//! collaborator. The plan computation itself is pure; everything with a
//! side effect (storage reads, message sends) happens here in the caller.

pub mod batch;
pub mod render;

pub use batch::{run_batch, BatchReport};
pub use render::render_plan;

use crate::user::User;

/// Transport seam. The production deployment sends over a messaging
/// provider; that client lives outside this crate.
pub trait Delivery {
    fn send(&self, user: &User, message: &str) -> anyhow::Result<()>;
}

/// Prints summaries to stdout, one block per user
pub struct StdoutDelivery;

impl Delivery for StdoutDelivery {
    fn send(&self, user: &User, message: &str) -> anyhow::Result<()> {
        println!("--- {} ({}) ---", user.username, user.phone_number);
        println!("{}", message);
        Ok(())
    }
}
