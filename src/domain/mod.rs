pub mod embedded;
pub mod post;
pub mod profile;
pub mod user;

pub use embedded::{EditError, EmbeddedEntry};
pub use post::{Comment, Like, Post};
pub use profile::{EducationItem, ExperienceItem, Profile, ProfilePatch, SocialLinks};
pub use user::{PublicUser, User};
