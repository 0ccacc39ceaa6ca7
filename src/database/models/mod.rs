pub(crate) mod macros;

pub mod audit;
pub mod auth;
pub mod event;
pub mod info_card;
pub mod profile;
pub mod sponsor;
pub mod stream;
pub mod team;
pub mod testimonial;

// Re-export all models for easy importing
pub use audit::*;
pub use auth::*;
pub use event::*;
pub use info_card::*;
pub use profile::*;
pub use sponsor::*;
pub use stream::*;
pub use team::*;
pub use testimonial::*;
