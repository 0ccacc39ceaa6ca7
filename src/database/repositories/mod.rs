pub mod audit;
pub mod event;
pub mod info_card;
pub mod profile;
pub mod sponsor;
pub mod stream;
pub mod team;
pub mod team_member;
pub mod testimonial;
