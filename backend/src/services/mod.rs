pub mod auth;
pub mod chairman;
pub mod directory;
pub mod events;
pub mod gallery;
pub mod linking;
pub mod notices;
pub mod projects;
pub mod publications;
pub mod stats;
pub mod tech_news;
