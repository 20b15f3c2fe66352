pub mod chairman;
pub mod event;
pub mod faculty;
pub mod gallery;
pub mod notice;
pub mod project;
pub mod publication;
pub mod stats;
pub mod tech_news;
pub mod view_count;
