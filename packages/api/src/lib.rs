//! # API crate: managed platform collaborators
//!
//! Everything the screens need from the hosted platform besides the document
//! database (which lives in the `store` crate). Each service is a trait so a
//! screen controller can be handed a real client or an in-memory one.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Account creation, sign-in, profile and password updates, sign-out; classified [`AuthError`]s; Argon2 password hashing; [`MemoryAuth`]. |
//! | [`storage`] | Blob upload returning a download URL; [`MemoryBlobStorage`]. |
//! | [`picker`] | Device photo library; [`FsImagePicker`] and [`ScriptedImagePicker`]. |
//! | [`models`] | [`AuthUser`] session info and [`ProfileUpdate`]. |

pub mod auth;
pub mod models;
pub mod picker;
pub mod storage;

pub use auth::{AuthError, AuthService, MemoryAuth};
pub use models::{AuthUser, ProfileUpdate};
pub use picker::{FsImagePicker, ImagePicker, PickOptions, PickedImage, PickerError, ScriptedImagePicker};
pub use storage::{BlobStorage, MemoryBlobStorage, StorageError};
