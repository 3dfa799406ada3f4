//! This crate contains the screen controllers and shared UI for the workspace.
//!
//! Controllers are plain structs that receive their platform collaborators
//! (auth, document store, blob storage, image picker) as arguments, so every
//! screen can be exercised against the in-memory implementations.

pub mod components;

mod avatar;
pub use avatar::{pick_and_upload, Avatar, AvatarError, AvatarImage};

mod notice;
pub use notice::{Notice, NoticeBanner, NoticeLevel};

mod screen;
pub use screen::Screen;

pub mod goal_history;
pub use goal_history::{GoalFeed, GoalHistory, GoalHistoryRender, GoalList, GoalRow};

pub mod signup;
pub use signup::{SignupError, SignupForm, SignupOutcome, SignupRequest};

pub mod settings;
pub use settings::{ProfileSettings, SettingsChange};

pub mod landing;
pub use landing::{LandingAction, LoginForm};
